use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::Parser;

use verbump::cli::{run_bump_workflow, BumpArgs, UsageError, WorkflowOutcome, WorkflowResult};
use verbump::domain::BumpMode;
use verbump::ui::{self, ConsoleReporter};

#[derive(clap::Parser)]
#[command(
    name = "verbump",
    version,
    about = "Bump the project version and propagate it to every file that declares it"
)]
struct Args {
    #[arg(short, long, help = "Bump mode: patch, minor, major, auto or manual")]
    mode: Option<BumpMode>,

    #[arg(short = 's', long = "set", value_name = "VERSION", help = "Target version for manual mode")]
    set: Option<String>,

    #[arg(short, long, num_args = 1.., value_name = "FILTER", help = "Files to update (globs, paths or stems)")]
    files: Vec<String>,

    #[arg(long, num_args = 1.., value_name = "GLOB", help = "Extra ignore globs")]
    ignore: Vec<String>,

    #[arg(long, value_name = "PATH", help = "Alternate version source file")]
    source: Option<PathBuf>,

    #[arg(short, long, value_name = "PATH", help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(short = 'C', long, value_name = "DIR", help = "Project root (default: current directory)")]
    root: Option<PathBuf>,

    #[arg(long, help = "Preview what would happen without making changes")]
    dry_run: bool,

    #[arg(long, help = "Do nothing")]
    disable: bool,

    #[arg(long, help = "Analyze files only; exit 1 on mismatched or unsupported files")]
    check: bool,

    #[arg(short, long, help = "Skip confirmation prompts")]
    yes: bool,

    #[arg(short = 'j', long, value_name = "N", help = "Maximum concurrent file operations")]
    concurrency: Option<usize>,

    #[arg(long, help = "Show verbose messages")]
    verbose: bool,
}

impl Args {
    fn workflow_args(self) -> BumpArgs {
        BumpArgs {
            config_path: self.config,
            root: self.root,
            mode: self.mode,
            custom_version: self.set,
            files: self.files,
            ignore: self.ignore,
            source: self.source,
            dry_run: self.dry_run,
            disable: self.disable,
            check: self.check,
            yes: self.yes,
            concurrency: self.concurrency,
        }
    }
}

fn main() {
    let args = Args::parse();
    let reporter = Arc::new(ConsoleReporter::new(args.verbose));

    match run_bump_workflow(args.workflow_args(), reporter) {
        Ok(result) => {
            display_result(&result);
            process::exit(result.exit_code());
        }
        Err(e) => {
            ui::display_error(&format!("{:#}", e));
            if e.downcast_ref::<UsageError>().is_some() {
                process::exit(2);
            }
            process::exit(1);
        }
    }
}

fn display_result(result: &WorkflowResult) {
    match &result.outcome {
        WorkflowOutcome::Bumped(report) => {
            ui::display_version_change(&report.from, &report.to, report.dry_run);
            ui::display_report(report, &result.root);
        }
        WorkflowOutcome::Checked { version, analysis } => {
            ui::display_analysis(analysis, &result.root);
            if result.exit_code() == 0 {
                ui::display_success(&format!("All {} file(s) declare {}", analysis.len(), version));
            }
        }
        WorkflowOutcome::Disabled
        | WorkflowOutcome::Unchanged { .. }
        | WorkflowOutcome::Cancelled => {}
    }
}
