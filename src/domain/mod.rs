//! Domain types - plain values shared by the reader, analyzer and engine

pub mod analysis;
pub mod file_type;
pub mod mode;
pub mod update;

pub use analysis::FileAnalysisResult;
pub use file_type::FileType;
pub use mode::BumpMode;
pub use update::{BumpReport, FileFailure, UpdateOutcome, UpdateResult};
