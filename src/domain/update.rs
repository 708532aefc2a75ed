use std::path::{Path, PathBuf};

/// What happened to one file during a batch update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Content rewritten on disk
    Updated,
    /// Content would be rewritten, but this is a dry run
    WouldUpdate,
    /// No pattern changed the content (unsupported, or already at target)
    Unchanged,
    /// File vanished between discovery and update
    Skipped,
    Failed(String),
}

/// Per-file entry of a batch update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateResult {
    pub file: PathBuf,
    pub outcome: UpdateOutcome,
}

impl UpdateResult {
    pub fn new(file: impl Into<PathBuf>, outcome: UpdateOutcome) -> Self {
        UpdateResult {
            file: file.into(),
            outcome,
        }
    }

    pub fn success(&self) -> bool {
        !matches!(self.outcome, UpdateOutcome::Failed(_))
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            UpdateOutcome::Failed(e) => Some(e),
            _ => None,
        }
    }

    /// Whether the file's content is (or, in a dry run, would be) changed
    pub fn modified(&self) -> bool {
        matches!(
            self.outcome,
            UpdateOutcome::Updated | UpdateOutcome::WouldUpdate
        )
    }
}

/// A file that could not be updated, with its error message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    pub file: PathBuf,
    pub error: String,
}

impl FileFailure {
    pub fn new(file: impl Into<PathBuf>, error: impl Into<String>) -> Self {
        FileFailure {
            file: file.into(),
            error: error.into(),
        }
    }
}

/// Aggregated results of one batch run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BumpReport {
    pub from: String,
    pub to: String,
    pub dry_run: bool,
    pub results: Vec<UpdateResult>,
}

impl BumpReport {
    pub fn modified_files(&self) -> Vec<&Path> {
        self.results
            .iter()
            .filter(|r| r.modified())
            .map(|r| r.file.as_path())
            .collect()
    }

    pub fn failures(&self) -> Vec<FileFailure> {
        self.results
            .iter()
            .filter_map(|r| r.error().map(|e| FileFailure::new(&r.file, e)))
            .collect()
    }

    pub fn has_failures(&self) -> bool {
        self.results.iter().any(|r| !r.success())
    }
}
