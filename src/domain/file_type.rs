use std::fmt;
use std::path::Path;

/// Source-code extensions scanned for version declarations
pub const SOURCE_EXTENSIONS: &[&str] = &[
    "js", "mjs", "cjs", "jsx", "ts", "mts", "cts", "tsx", "py", "rb", "go", "java", "kt", "kts",
    "swift", "php", "cs", "dart", "lua", "scala", "groovy", "gradle", "ex", "exs",
];

/// Closed classification of a candidate file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
    /// JSON project descriptor with a top-level `"version"` key
    ManifestJson,
    /// Source file assigning a version string to a `version` identifier
    SourceDeclaration,
    Unsupported,
}

impl FileType {
    /// Classification from the extension alone.
    ///
    /// This is only a candidate type: a file is finally supported when one of
    /// its type's patterns also matches the content.
    pub fn from_extension(path: &Path) -> FileType {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("json") => FileType::ManifestJson,
            Some(ext) if SOURCE_EXTENSIONS.contains(&ext) => FileType::SourceDeclaration,
            _ => FileType::Unsupported,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, FileType::Unsupported)
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileType::ManifestJson => write!(f, "manifest-json"),
            FileType::SourceDeclaration => write!(f, "source-declaration"),
            FileType::Unsupported => write!(f, "unsupported"),
        }
    }
}
