use std::path::PathBuf;

use super::FileType;

/// Result of analyzing one candidate file against a reference version.
///
/// Produced fresh per analysis pass; a mismatch is advisory and does not by
/// itself make the file unsupported.
#[derive(Debug, Clone, PartialEq)]
pub struct FileAnalysisResult {
    pub file: PathBuf,
    pub supported: bool,
    pub detected_version: Option<String>,
    pub version_mismatch: bool,
    pub reason: String,
    pub file_type: FileType,
}

impl FileAnalysisResult {
    pub fn unsupported(file: PathBuf, file_type: FileType, reason: impl Into<String>) -> Self {
        FileAnalysisResult {
            file,
            supported: false,
            detected_version: None,
            version_mismatch: false,
            reason: reason.into(),
            file_type,
        }
    }

    pub fn supported(
        file: PathBuf,
        file_type: FileType,
        detected_version: String,
        version_mismatch: bool,
    ) -> Self {
        let reason = if version_mismatch {
            format!("version {} differs from reference", detected_version)
        } else {
            "version matches".to_string()
        };
        FileAnalysisResult {
            file,
            supported: true,
            detected_version: Some(detected_version),
            version_mismatch,
            reason,
            file_type,
        }
    }
}
