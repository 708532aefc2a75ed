use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::domain::FileType;
use crate::error::{BumpError, Result};
use crate::patterns::PatternRegistry;

/// Locates and extracts the current version from a version source file
pub struct VersionReader<'a> {
    registry: &'a PatternRegistry,
}

impl<'a> VersionReader<'a> {
    pub fn new(registry: &'a PatternRegistry) -> Self {
        VersionReader { registry }
    }

    /// Read the version declared in `path`.
    ///
    /// JSON manifests are parsed structurally and the top-level `version`
    /// field is returned. Any other supported file uses the first value
    /// captured by the registry's patterns. The value is returned as found;
    /// semantic-version validation is left to the caller.
    ///
    /// # Errors
    /// * `FileNotFound` - `path` does not exist
    /// * `UnsupportedFileType` - the extension is not a known file type
    /// * `NoVersionField` - a manifest without a `version` key
    /// * `UnparsableVersion` - malformed manifest, non-string version, or no
    ///   pattern matches the content
    /// * `Read` - the file exists but cannot be read
    pub fn current_version(&self, path: &Path) -> Result<String> {
        if !path.is_file() {
            return Err(BumpError::FileNotFound(path.to_path_buf()));
        }

        let file_type = FileType::from_extension(path);
        if !file_type.is_supported() {
            return Err(BumpError::UnsupportedFileType(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| BumpError::read(path, e))?;

        match file_type {
            FileType::ManifestJson => Self::manifest_version(path, &content),
            _ => self
                .registry
                .extract(file_type, &content)
                .ok_or_else(|| BumpError::unparsable(path, "no version declaration found")),
        }
    }

    fn manifest_version(path: &Path, content: &str) -> Result<String> {
        let json: Value = serde_json::from_str(content)
            .map_err(|e| BumpError::unparsable(path, format!("invalid JSON: {}", e)))?;

        match json.get("version") {
            None => Err(BumpError::NoVersionField(path.to_path_buf())),
            Some(Value::String(version)) => Ok(version.clone()),
            Some(other) => Err(BumpError::unparsable(
                path,
                format!("version field is not a string: {}", other),
            )),
        }
    }
}
