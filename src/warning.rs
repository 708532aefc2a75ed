use std::fmt;
use std::path::PathBuf;

/// Non-fatal conditions met while resolving or analyzing files.
/// They are reported to the user but never abort the run.
#[derive(Debug, Clone, PartialEq)]
pub enum BumpWarning {
    /// File declares a version other than the reference version
    VersionMismatch {
        file: PathBuf,
        found: String,
        expected: String,
    },
    /// File matched the filters but has no recognizable version declaration
    UnsupportedFile { file: PathBuf, reason: String },
    /// Ignore file exists but could not be read; baseline ignores still apply
    IgnoreFileUnreadable { path: PathBuf, reason: String },
    /// Configuration could not be loaded; defaults are used
    ConfigUnreadable { reason: String },
    /// Ignore-file line that is not a valid gitignore pattern
    IgnoreRuleSkipped { rule: String },
}

impl fmt::Display for BumpWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BumpWarning::VersionMismatch {
                file,
                found,
                expected,
            } => write!(
                f,
                "{} declares version {} (expected {})",
                file.display(),
                found,
                expected
            ),
            BumpWarning::UnsupportedFile { file, reason } => {
                write!(f, "{} is not supported: {}", file.display(), reason)
            }
            BumpWarning::IgnoreFileUnreadable { path, reason } => write!(
                f,
                "Cannot read {} ({}); using default ignore rules",
                path.display(),
                reason
            ),
            BumpWarning::ConfigUnreadable { reason } => {
                write!(f, "Cannot load configuration ({}); using defaults", reason)
            }
            BumpWarning::IgnoreRuleSkipped { rule } => {
                write!(f, "Ignore rule '{}' is not a valid pattern; skipped", rule)
            }
        }
    }
}
