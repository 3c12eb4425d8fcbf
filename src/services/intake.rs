//! Upload checks applied before a file enters the extraction pipeline.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::UploadSettings;
use crate::utils::format_size;

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("File not found: {0}")]
    MissingFile(PathBuf),

    #[error("Invalid file type: {0} (allowed: {1})")]
    UnsupportedExtension(String, String),

    #[error("File too large: {size} exceeds limit of {limit}")]
    TooLarge { size: String, limit: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Check that `path` exists, has an allowed extension and fits the size limit.
pub fn validate_upload(path: &Path, settings: &UploadSettings) -> Result<(), IntakeError> {
    if !path.is_file() {
        return Err(IntakeError::MissingFile(path.to_path_buf()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    if !settings
        .allowed_extensions
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(&ext))
    {
        return Err(IntakeError::UnsupportedExtension(
            if ext.is_empty() { "(none)".to_string() } else { ext },
            settings.allowed_extensions.join(", "),
        ));
    }

    let size = std::fs::metadata(path)?.len();
    if size > settings.max_file_size {
        return Err(IntakeError::TooLarge {
            size: format_size(size),
            limit: format_size(settings.max_file_size),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, len: usize) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, vec![0u8; len]).unwrap();
        path
    }

    #[test]
    fn test_accepts_allowed_extensions_any_case() {
        let dir = tempfile::tempdir().unwrap();
        let settings = UploadSettings::default();
        for name in ["a.png", "b.JPG", "c.jpeg", "d.Pdf"] {
            validate_upload(&write(dir.path(), name, 10), &settings).unwrap();
        }
    }

    #[test]
    fn test_rejects_other_extensions() {
        let dir = tempfile::tempdir().unwrap();
        let settings = UploadSettings::default();
        let err = validate_upload(&write(dir.path(), "notes.txt", 10), &settings).unwrap_err();
        assert!(matches!(err, IntakeError::UnsupportedExtension(ref ext, _) if ext == "txt"));

        let err = validate_upload(&write(dir.path(), "noext", 10), &settings).unwrap_err();
        assert!(matches!(err, IntakeError::UnsupportedExtension(..)));
    }

    #[test]
    fn test_size_limit_is_inclusive() {
        let dir = tempfile::tempdir().unwrap();
        let settings = UploadSettings {
            max_file_size: 100,
            ..UploadSettings::default()
        };
        validate_upload(&write(dir.path(), "ok.png", 100), &settings).unwrap();
        let err = validate_upload(&write(dir.path(), "big.png", 101), &settings).unwrap_err();
        assert!(matches!(err, IntakeError::TooLarge { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = validate_upload(Path::new("/nonexistent/x.png"), &UploadSettings::default())
            .unwrap_err();
        assert!(matches!(err, IntakeError::MissingFile(_)));
    }
}
