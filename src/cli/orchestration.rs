//! Main workflow orchestration logic
//!
//! Merges command-line arguments over the configuration file and drives the
//! engine. Kept free of clap so the workflow can be called programmatically.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use thiserror::Error;

use crate::config::{self, BumpSettings};
use crate::domain::{BumpMode, BumpReport, FileAnalysisResult};
use crate::engine::{BumpEngine, BumpOutcome, BumpRequest};
use crate::reporter::Reporter;
use crate::ui;
use crate::workspace::Workspace;

/// Arguments for the bump workflow
///
/// Every `Option` left as `None` (and every empty list) falls back to the
/// configuration file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BumpArgs {
    /// Path to custom config file
    pub config_path: Option<PathBuf>,

    /// Project root; current directory when absent
    pub root: Option<PathBuf>,

    pub mode: Option<BumpMode>,

    /// Target version for manual mode
    pub custom_version: Option<String>,

    pub files: Vec<String>,

    /// Extra ignore globs, added to the configured ones
    pub ignore: Vec<String>,

    /// Alternate version source file
    pub source: Option<PathBuf>,

    /// Preview mode - don't write files
    pub dry_run: bool,

    pub disable: bool,

    /// Analyze only
    pub check: bool,

    /// Skip confirmation prompts
    pub yes: bool,

    pub concurrency: Option<usize>,
}

/// Invalid argument combinations detected before the engine runs
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UsageError {
    #[error("manual mode requires a target version (use --set <VERSION>)")]
    MissingTargetVersion,
}

/// What the workflow did
#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowOutcome {
    Disabled,
    Unchanged { version: String },
    Cancelled,
    Bumped(BumpReport),
    Checked {
        version: String,
        analysis: Vec<FileAnalysisResult>,
    },
}

/// Result of a workflow run that did not fail
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowResult {
    /// Resolved project root
    pub root: PathBuf,

    pub outcome: WorkflowOutcome,
}

impl WorkflowResult {
    /// Process exit code: a check that found problems exits with 1
    pub fn exit_code(&self) -> i32 {
        match &self.outcome {
            WorkflowOutcome::Checked { analysis, .. }
                if analysis
                    .iter()
                    .any(|r| !r.supported || r.version_mismatch) =>
            {
                1
            }
            _ => 0,
        }
    }
}

/// Merge command-line arguments over configured settings.
///
/// A target version given without a mode implies manual mode. Filters given
/// on the command line replace the configured ones; ignore globs are added.
pub fn resolve_request(args: &BumpArgs, settings: &BumpSettings) -> BumpRequest {
    let mut request = settings.request();

    match (args.mode, &args.custom_version) {
        (Some(mode), _) => request.mode = mode,
        (None, Some(_)) => request.mode = BumpMode::Manual,
        (None, None) => {}
    }
    if args.custom_version.is_some() {
        request.custom_version = args.custom_version.clone();
    }
    if !args.files.is_empty() {
        request.filters = args.files.clone();
    }
    request.ignore.extend(args.ignore.iter().cloned());
    request.disabled |= args.disable;
    request.source = args.source.clone();

    request
}

/// Reject requests the engine would refuse, so they surface as usage errors
pub fn validate_request(request: &BumpRequest) -> std::result::Result<(), UsageError> {
    let has_target = request
        .custom_version
        .as_deref()
        .is_some_and(|v| !v.trim().is_empty());
    if !request.disabled && request.mode == BumpMode::Manual && !has_target {
        return Err(UsageError::MissingTargetVersion);
    }
    Ok(())
}

/// Main bump workflow
///
/// 1. Load configuration (explicit path errors are fatal, others warn)
/// 2. Merge arguments over configuration and validate
/// 3. Check, or bump with confirmation when running interactively
pub fn run_bump_workflow(args: BumpArgs, reporter: Arc<dyn Reporter>) -> Result<WorkflowResult> {
    let root = args.root.clone().unwrap_or_else(|| PathBuf::from("."));

    let config = match &args.config_path {
        Some(path) => config::load_config(Some(path), &root)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => config::load_config_or_default(None, &root, reporter.as_ref()),
    };
    let settings = config.bump;

    let request = resolve_request(&args, &settings);
    if !args.check {
        validate_request(&request)?;
    }

    let workspace = Workspace::new(&root)
        .with_manifest(settings.manifest.clone())
        .with_concurrency(args.concurrency.unwrap_or(settings.concurrency))
        .with_dry_run(args.dry_run);
    let engine = BumpEngine::new(workspace, reporter)?;
    let root = engine.workspace().root().to_path_buf();

    if args.check {
        let (version, analysis) = engine.check(&request)?;
        return Ok(WorkflowResult {
            root,
            outcome: WorkflowOutcome::Checked { version, analysis },
        });
    }

    let interactive = !args.yes && !args.dry_run && ui::is_interactive();
    let outcome = if interactive {
        engine.bump_analyzed(&request, |analysis| {
            ui::confirm_action(&ui::format_confirmation_prompt(analysis)).unwrap_or(false)
        })?
    } else {
        engine.bump(&request)?
    };

    let outcome = match outcome {
        BumpOutcome::Disabled => WorkflowOutcome::Disabled,
        BumpOutcome::Unchanged { version } => WorkflowOutcome::Unchanged { version },
        BumpOutcome::Cancelled { .. } => WorkflowOutcome::Cancelled,
        BumpOutcome::Bumped(report) => WorkflowOutcome::Bumped(report),
    };

    Ok(WorkflowResult { root, outcome })
}
