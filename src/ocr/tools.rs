//! Helpers for the external command-line tools OCR depends on.

use std::path::{Path, PathBuf};
use std::process::Command;

use super::backend::ExtractionError;

/// Tools used by the extraction pipeline.
const REQUIRED_TOOLS: [&str; 2] = ["tesseract", "pdftoppm"];

/// Check if a binary is available in PATH (or is an existing path).
pub fn check_binary(name: &str) -> bool {
    which::which(name).is_ok()
}

/// Check if required tools are available.
pub fn check_tools() -> Vec<(String, bool)> {
    REQUIRED_TOOLS
        .iter()
        .map(|tool| (tool.to_string(), check_binary(tool)))
        .collect()
}

/// Handle command output, extracting stdout on success or returning appropriate error.
pub(crate) fn handle_cmd_output(
    result: std::io::Result<std::process::Output>,
    tool_name: &str,
    error_prefix: &str,
) -> Result<String, ExtractionError> {
    match result {
        Ok(output) => {
            if output.status.success() {
                Ok(String::from_utf8_lossy(&output.stdout).to_string())
            } else {
                let stderr = String::from_utf8_lossy(&output.stderr);
                Err(ExtractionError::OcrFailed(format!(
                    "{}: {}",
                    error_prefix,
                    stderr.trim()
                )))
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(ExtractionError::ToolNotFound(tool_name.to_string()))
        }
        Err(e) => Err(ExtractionError::Io(e)),
    }
}

/// Render one PDF page to PNG inside `output_dir` and return the image path.
pub(crate) fn rasterize_pdf_page(
    pdf_path: &Path,
    page: u32,
    dpi: u32,
    output_dir: &Path,
) -> Result<PathBuf, ExtractionError> {
    let page_str = page.to_string();
    let dpi_str = dpi.to_string();

    let output = Command::new("pdftoppm")
        .args(["-png", "-r", &dpi_str, "-f", &page_str, "-l", &page_str])
        .arg(pdf_path)
        .arg(output_dir.join("page"))
        .output();

    handle_cmd_output(
        output,
        "pdftoppm (install poppler-utils)",
        "pdftoppm failed to convert PDF page",
    )?;

    find_page_image(output_dir, page).ok_or_else(|| ExtractionError::ImageRead {
        path: pdf_path.to_path_buf(),
        reason: format!("no image generated for page {}", page),
    })
}

/// Find the image file for a specific page number.
fn find_page_image(dir: &Path, page_num: u32) -> Option<PathBuf> {
    // pdftoppm pads the page number to the width of the page count
    [1, 2, 3, 4]
        .into_iter()
        .map(|digits| dir.join(format!("page-{:0width$}.png", page_num, width = digits)))
        .find(|path| path.exists())
}
