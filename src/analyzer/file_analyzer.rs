use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::{FileAnalysisResult, FileType};
use crate::patterns::PatternRegistry;
use crate::version;
use crate::worker;

/// Classifies candidate files and flags version mismatches
pub struct FileAnalyzer<'a> {
    registry: &'a PatternRegistry,
    concurrency: usize,
}

impl<'a> FileAnalyzer<'a> {
    pub fn new(registry: &'a PatternRegistry, concurrency: usize) -> Self {
        FileAnalyzer {
            registry,
            concurrency,
        }
    }

    /// Analyze every file against `reference_version`.
    ///
    /// Files are analyzed independently on the bounded worker pool and the
    /// results are returned in input order. Never fails: read errors and
    /// unrecognized content become unsupported entries.
    pub fn analyze(&self, files: &[PathBuf], reference_version: &str) -> Vec<FileAnalysisResult> {
        worker::run_bounded(self.concurrency, files, |file| {
            self.analyze_file(file, reference_version)
        })
    }

    /// Analyze a single file
    pub fn analyze_file(&self, file: &Path, reference_version: &str) -> FileAnalysisResult {
        let content = match fs::read_to_string(file) {
            Ok(content) => content,
            Err(e) => {
                return FileAnalysisResult::unsupported(
                    file.to_path_buf(),
                    FileType::from_extension(file),
                    format!("cannot read file: {}", e),
                )
            }
        };

        let file_type = self.registry.classify(file, &content);
        if !file_type.is_supported() {
            let reason = if FileType::from_extension(file).is_supported() {
                "no version field found"
            } else {
                "unsupported file type"
            };
            return FileAnalysisResult::unsupported(file.to_path_buf(), file_type, reason);
        }

        if self.registry.detect(file_type, &content, reference_version) {
            return FileAnalysisResult::supported(
                file.to_path_buf(),
                file_type,
                reference_version.to_string(),
                false,
            );
        }

        let detected = match self.registry.extract(file_type, &content) {
            Some(detected) => detected,
            None => {
                return FileAnalysisResult::unsupported(
                    file.to_path_buf(),
                    file_type,
                    "no version field found",
                )
            }
        };

        match version::compare(&detected, reference_version) {
            Ok(ordering) => FileAnalysisResult::supported(
                file.to_path_buf(),
                file_type,
                detected,
                ordering != Ordering::Equal,
            ),
            Err(_) if !version::is_valid(&detected) => FileAnalysisResult::unsupported(
                file.to_path_buf(),
                file_type,
                format!("invalid version '{}'", detected),
            ),
            // Reference itself is invalid; nothing sensible to compare against
            Err(_) => FileAnalysisResult::supported(file.to_path_buf(), file_type, detected, true),
        }
    }
}
