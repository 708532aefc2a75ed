use std::path::{Path, PathBuf};

/// Default manifest holding the authoritative version
pub const DEFAULT_MANIFEST: &str = "package.json";

/// Default worker limit for analysis and batch updates
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Explicitly constructed project settings passed down to every component.
///
/// Nothing in the library reads the process working directory; callers
/// decide the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    root: PathBuf,
    manifest: String,
    concurrency: usize,
    dry_run: bool,
}

impl Workspace {
    /// Create settings rooted at `root`.
    ///
    /// The root is canonicalized when possible so discovered paths are absolute.
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        let root = root
            .canonicalize()
            .or_else(|_| std::path::absolute(root))
            .unwrap_or_else(|_| root.to_path_buf());

        Workspace {
            root,
            manifest: DEFAULT_MANIFEST.to_string(),
            concurrency: DEFAULT_CONCURRENCY,
            dry_run: false,
        }
    }

    pub fn with_manifest(mut self, manifest: impl Into<String>) -> Self {
        self.manifest = manifest.into();
        self
    }

    /// Worker limit; zero is clamped to one
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn manifest(&self) -> &str {
        &self.manifest
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(&self.manifest)
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// Resolve `path` against the root unless it is already absolute
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}
