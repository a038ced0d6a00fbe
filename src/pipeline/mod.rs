//! Pipeline stages for batch PDF-to-text conversion.
//!
//! Each submodule implements exactly one transformation step. Keeping stages
//! separate makes each independently testable and lets us swap the external
//! tool behind a stage (e.g. `magick` for `convert`) without touching the
//! orchestration loop.
//!
//! ## Data Flow
//!
//! ```text
//! scan ──▶ rasterize ──▶ extract ──▶ cleanup
//! (*.pdf)  (PNG/page)   (txt/page)  (policy-gated rm)
//! ```
//!
//! 1. [`scan`]      — enumerate matching PDF files in deterministic order
//! 2. [`rasterize`] — spawn the external rasterizer, discover the generated
//!    page images
//! 3. [`extract`]   — spawn the external OCR tool per page image, verify the
//!    text file appeared
//! 4. [`cleanup`]   — delete source/intermediate files per the deletion
//!    policy; never retried, never fatal on its own

pub mod cleanup;
pub mod extract;
pub mod rasterize;
pub mod scan;
