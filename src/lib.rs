pub mod analyzer;
pub mod cli;
pub mod config;
pub mod discovery;
pub mod domain;
pub mod engine;
pub mod error;
pub mod patterns;
pub mod reader;
pub mod reporter;
pub mod ui;
pub mod version;
pub mod warning;
pub mod worker;
pub mod workspace;

pub use domain::{BumpMode, BumpReport, FileAnalysisResult, FileType, UpdateOutcome};
pub use engine::{BumpEngine, BumpOutcome, BumpPlan, BumpRequest};
pub use error::{BumpError, Result};
pub use patterns::{PatternRegistry, VersionPattern};
pub use reporter::{Level, Reporter};
pub use workspace::Workspace;
