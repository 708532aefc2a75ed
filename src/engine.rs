//! End-to-end bump: read, compute, discover, rewrite, aggregate.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::NamedTempFile;

use crate::analyzer::FileAnalyzer;
use crate::discovery::FileDiscovery;
use crate::domain::{BumpMode, BumpReport, FileAnalysisResult, UpdateOutcome, UpdateResult};
use crate::error::{BumpError, Result};
use crate::patterns::PatternRegistry;
use crate::reader::VersionReader;
use crate::reporter::Reporter;
use crate::version;
use crate::warning::BumpWarning;
use crate::worker;
use crate::workspace::Workspace;

/// Caller-supplied parameters of one bump
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BumpRequest {
    pub mode: BumpMode,
    pub disabled: bool,
    /// File filters; empty selects the manifest only
    pub filters: Vec<String>,
    /// Extra ignore globs on top of baseline and ignore-file rules
    pub ignore: Vec<String>,
    /// Target version, required in manual mode
    pub custom_version: Option<String>,
    /// Alternate version source; defaults to the workspace manifest
    pub source: Option<PathBuf>,
}

/// Resolved versions and candidate files, before anything is written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BumpPlan {
    pub source: PathBuf,
    pub current: String,
    pub next: String,
    pub files: Vec<PathBuf>,
    /// Confirmed files declaring a version other than `current`, with the
    /// value to replace in them
    pub mismatched: BTreeMap<PathBuf, String>,
}

impl BumpPlan {
    /// The target equals the current version; nothing to do
    pub fn is_noop(&self) -> bool {
        self.current == self.next
    }

    /// Version to replace in `file`
    pub fn previous_for(&self, file: &Path) -> &str {
        self.mismatched
            .get(file)
            .map(String::as_str)
            .unwrap_or(&self.current)
    }
}

/// How a bump ended, when it did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BumpOutcome {
    Disabled,
    /// Target already equals the current version
    Unchanged { version: String },
    /// Caller declined after reviewing the analysis
    Cancelled { plan: BumpPlan },
    Bumped(BumpReport),
}

/// Orchestrates version propagation across the workspace
pub struct BumpEngine {
    workspace: Workspace,
    registry: PatternRegistry,
    reporter: Arc<dyn Reporter>,
}

impl BumpEngine {
    /// Engine with the built-in pattern registry
    pub fn new(workspace: Workspace, reporter: Arc<dyn Reporter>) -> Result<Self> {
        Ok(Self::with_registry(
            workspace,
            PatternRegistry::builtin()?,
            reporter,
        ))
    }

    pub fn with_registry(
        workspace: Workspace,
        registry: PatternRegistry,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        BumpEngine {
            workspace,
            registry,
            reporter,
        }
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Run a full bump without analysis.
    ///
    /// # Errors
    /// Version-resolution errors abort before any file is touched.
    /// `AggregateUpdateFailure` is returned after the batch completes if any
    /// file failed; every other file has already been written.
    pub fn bump(&self, request: &BumpRequest) -> Result<BumpOutcome> {
        if request.disabled {
            self.reporter.info("Version bump disabled; nothing to do");
            return Ok(BumpOutcome::Disabled);
        }

        let plan = self.plan(request)?;
        if plan.is_noop() {
            return Ok(self.unchanged(&plan));
        }

        self.apply(&plan).map(BumpOutcome::Bumped)
    }

    /// Run a bump that analyzes candidates first and updates supported files only.
    ///
    /// `confirm` is called with the analysis when any file is unsupported or
    /// mismatched; returning `false` cancels before anything is written.
    /// Confirmed mismatched files have their detected version replaced.
    pub fn bump_analyzed<F>(&self, request: &BumpRequest, confirm: F) -> Result<BumpOutcome>
    where
        F: FnOnce(&[FileAnalysisResult]) -> bool,
    {
        if request.disabled {
            self.reporter.info("Version bump disabled; nothing to do");
            return Ok(BumpOutcome::Disabled);
        }

        let mut plan = self.plan(request)?;
        if plan.is_noop() {
            return Ok(self.unchanged(&plan));
        }

        let analysis = self.analyze(&plan.files, &plan.current);
        let needs_review = self.report_analysis(&analysis, &plan.current);

        if needs_review && !confirm(analysis.as_slice()) {
            self.reporter.info("Version bump cancelled");
            return Ok(BumpOutcome::Cancelled { plan });
        }

        plan.files.clear();
        for result in analysis.into_iter().filter(|r| r.supported) {
            if let Some(found) = result.detected_version.filter(|v| *v != plan.current) {
                plan.mismatched.insert(result.file.clone(), found);
            }
            plan.files.push(result.file);
        }

        self.apply(&plan).map(BumpOutcome::Bumped)
    }

    /// Analyze the candidate files against the current version without
    /// writing anything
    pub fn check(&self, request: &BumpRequest) -> Result<(String, Vec<FileAnalysisResult>)> {
        let source = self.source_path(request);
        let current = self.current_version(&source)?;
        let files = FileDiscovery::new(&self.workspace, self.reporter.as_ref())
            .resolve(&request.filters, &request.ignore)?;

        let analysis = self.analyze(&files, &current);
        self.report_analysis(&analysis, &current);
        Ok((current, analysis))
    }

    /// Resolve versions and candidate files.
    ///
    /// Discovery is skipped when the target equals the current version.
    pub fn plan(&self, request: &BumpRequest) -> Result<BumpPlan> {
        let source = self.source_path(request);
        let current = self.current_version(&source)?;
        let next = self.next_version(request, &current)?;

        let files = if current == next {
            Vec::new()
        } else {
            FileDiscovery::new(&self.workspace, self.reporter.as_ref())
                .resolve(&request.filters, &request.ignore)?
        };

        Ok(BumpPlan {
            source,
            current,
            next,
            files,
            mismatched: BTreeMap::new(),
        })
    }

    /// Rewrite every planned file on the worker pool and aggregate the results
    pub fn apply(&self, plan: &BumpPlan) -> Result<BumpReport> {
        let dry_run = self.workspace.dry_run();
        self.reporter.info(&format!(
            "{}Bumping version {} -> {} in {} file(s)",
            if dry_run { "[dry-run] " } else { "" },
            plan.current,
            plan.next,
            plan.files.len()
        ));

        let results = worker::run_bounded(self.workspace.concurrency(), &plan.files, |file| {
            self.update_file(file, plan.previous_for(file), &plan.next, dry_run)
        });

        for result in &results {
            self.report_update(result);
        }

        let report = BumpReport {
            from: plan.current.clone(),
            to: plan.next.clone(),
            dry_run,
            results,
        };

        if report.has_failures() {
            return Err(BumpError::AggregateUpdateFailure {
                failures: report.failures(),
            });
        }
        Ok(report)
    }

    /// Current version from `source`, validated
    pub fn current_version(&self, source: &Path) -> Result<String> {
        let current = VersionReader::new(&self.registry).current_version(source)?;
        if !version::is_valid(&current) {
            return Err(BumpError::InvalidExistingVersion(current));
        }
        self.reporter.verbose(&format!(
            "Current version {} from {}",
            current,
            self.display_path(source)
        ));
        Ok(current)
    }

    /// Target version for `request` given `current`
    pub fn next_version(&self, request: &BumpRequest, current: &str) -> Result<String> {
        match request.mode.release_type() {
            Some(release) => {
                if request.custom_version.is_some() {
                    self.reporter.verbose(&format!(
                        "Ignoring custom version in {} mode",
                        request.mode
                    ));
                }
                version::increment(current, release)
            }
            None => {
                let target = request
                    .custom_version
                    .as_deref()
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .ok_or_else(|| {
                        BumpError::custom_version("manual mode requires a target version")
                    })?;
                if !version::is_valid(target) {
                    return Err(BumpError::custom_version(format!(
                        "'{}' is not a valid semantic version",
                        target
                    )));
                }
                Ok(target.to_string())
            }
        }
    }

    fn source_path(&self, request: &BumpRequest) -> PathBuf {
        match &request.source {
            Some(source) => self.workspace.resolve(source),
            None => self.workspace.manifest_path(),
        }
    }

    fn analyze(&self, files: &[PathBuf], reference: &str) -> Vec<FileAnalysisResult> {
        FileAnalyzer::new(&self.registry, self.workspace.concurrency()).analyze(files, reference)
    }

    fn unchanged(&self, plan: &BumpPlan) -> BumpOutcome {
        self.reporter.info(&format!(
            "Version is already {}; nothing to update",
            plan.current
        ));
        BumpOutcome::Unchanged {
            version: plan.current.clone(),
        }
    }

    /// Warn about unsupported and mismatched files; true if any were found
    fn report_analysis(&self, analysis: &[FileAnalysisResult], reference: &str) -> bool {
        let mut flagged = false;
        for result in analysis {
            let file = PathBuf::from(self.display_path(&result.file));
            if !result.supported {
                flagged = true;
                let warning = BumpWarning::UnsupportedFile {
                    file,
                    reason: result.reason.clone(),
                };
                self.reporter.warn(&warning.to_string());
            } else if result.version_mismatch {
                flagged = true;
                let warning = BumpWarning::VersionMismatch {
                    file,
                    found: result.detected_version.clone().unwrap_or_default(),
                    expected: reference.to_string(),
                };
                self.reporter.warn(&warning.to_string());
            }
        }
        flagged
    }

    fn update_file(&self, file: &Path, previous: &str, next: &str, dry_run: bool) -> UpdateResult {
        if !file.exists() {
            return UpdateResult::new(file, UpdateOutcome::Skipped);
        }

        let content = match fs::read_to_string(file) {
            Ok(content) => content,
            Err(e) => {
                let err = BumpError::read(file, e);
                return UpdateResult::new(file, UpdateOutcome::Failed(err.to_string()));
            }
        };

        let file_type = self.registry.classify(file, &content);
        if !file_type.is_supported() {
            return UpdateResult::new(file, UpdateOutcome::Unchanged);
        }

        let rewrite = self.registry.rewrite(file_type, &content, previous, next);
        if rewrite.content == content {
            return UpdateResult::new(file, UpdateOutcome::Unchanged);
        }

        if dry_run {
            return UpdateResult::new(file, UpdateOutcome::WouldUpdate);
        }

        match write_atomic(file, &rewrite.content) {
            Ok(()) => UpdateResult::new(file, UpdateOutcome::Updated),
            Err(e) => UpdateResult::new(file, UpdateOutcome::Failed(e.to_string())),
        }
    }

    fn report_update(&self, result: &UpdateResult) {
        let file = self.display_path(&result.file);
        match &result.outcome {
            UpdateOutcome::Updated => self.reporter.info(&format!("Updated {}", file)),
            UpdateOutcome::WouldUpdate => {
                self.reporter.info(&format!("[dry-run] Would update {}", file))
            }
            UpdateOutcome::Unchanged => self.reporter.verbose(&format!("Unchanged {}", file)),
            UpdateOutcome::Skipped => {
                self.reporter.verbose(&format!("Skipped {} (no longer exists)", file))
            }
            UpdateOutcome::Failed(e) => self.reporter.error(e),
        }
    }

    fn display_path(&self, path: &Path) -> String {
        path.strip_prefix(self.workspace.root())
            .unwrap_or(path)
            .display()
            .to_string()
    }
}

/// Replace `path` with `content` through a temporary sibling and a rename.
///
/// Read-only files are refused rather than replaced.
fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let target = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    let metadata = fs::metadata(&target).map_err(|e| BumpError::write(path, e.to_string()))?;
    let permissions = metadata.permissions();
    if permissions.readonly() {
        return Err(BumpError::write(path, "file is read-only"));
    }

    let dir = target.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| BumpError::write(path, e.to_string()))?;
    tmp.write_all(content.as_bytes())
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| BumpError::write(path, e.to_string()))?;
    tmp.as_file()
        .set_permissions(permissions)
        .map_err(|e| BumpError::write(path, e.to_string()))?;
    tmp.persist(&target)
        .map_err(|e| BumpError::write(path, e.error.to_string()))?;
    Ok(())
}
