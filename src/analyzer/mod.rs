//! Per-file analysis against a reference version

pub mod file_analyzer;

pub use file_analyzer::FileAnalyzer;
