//! Text extraction via the external OCR command.
//!
//! The OCR tool (Tesseract by default) is invoked once per page image with
//! Tesseract's argument convention: the image path, the output base path
//! (the tool appends `.txt` itself), the language, and the `txt` output
//! format. Failure is a non-zero exit status, a spawn failure, or a missing
//! output file — Tesseract can exit 0 and still write nothing, so the
//! output file existence check is load-bearing.

use crate::config::JobConfig;
use crate::error::StageError;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

/// Run OCR on one page image, producing `<output_dir>/<image-stem>.txt`.
///
/// Returns the path of the text file after verifying it exists.
pub async fn extract_text(
    image: &Path,
    output_dir: &Path,
    config: &JobConfig,
) -> Result<PathBuf, StageError> {
    let stem = image
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .ok_or_else(|| StageError::Extract {
            image: image.to_path_buf(),
            detail: "image path has no file name".to_string(),
        })?;

    // Tesseract takes the output path without the .txt extension and
    // appends it based on the requested format.
    let out_base = output_dir.join(&stem);
    let text_file = output_dir.join(format!("{stem}.txt"));

    tracing::debug!(
        "extracting {} -> {} via '{}'",
        image.display(),
        text_file.display(),
        config.ocr_program
    );

    let status = Command::new(&config.ocr_program)
        .arg(image)
        .arg(&out_base)
        .arg("-l")
        .arg(&config.lang)
        .arg("txt")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .map_err(|e| StageError::Extract {
            image: image.to_path_buf(),
            detail: format!("failed to run '{}': {}", config.ocr_program, e),
        })?;

    if !status.success() {
        return Err(StageError::Extract {
            image: image.to_path_buf(),
            detail: format!("OCR tool exited with {status}"),
        });
    }

    if !text_file.is_file() {
        return Err(StageError::Extract {
            image: image.to_path_buf(),
            detail: format!("no output file at {}", text_file.display()),
        });
    }

    Ok(text_file)
}
