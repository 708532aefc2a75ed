//! Expands file filters into concrete paths under the project root.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use glob::{MatchOptions, Pattern};
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use ignore::WalkBuilder;

use crate::error::{BumpError, Result};
use crate::reporter::Reporter;
use crate::warning::BumpWarning;
use crate::workspace::Workspace;

/// Always-ignored locations: VCS metadata, dependencies, build output, lockfiles
pub const BASELINE_IGNORES: &[&str] = &[
    "**/.git/**",
    "**/.hg/**",
    "**/.svn/**",
    "**/node_modules/**",
    "**/bower_components/**",
    "**/vendor/**",
    "**/.venv/**",
    "**/dist/**",
    "**/build/**",
    "**/out/**",
    "**/target/**",
    "**/coverage/**",
    "**/.next/**",
    "**/package-lock.json",
    "**/npm-shrinkwrap.json",
    "**/yarn.lock",
    "**/pnpm-lock.yaml",
    "**/bun.lockb",
    "**/Cargo.lock",
    "**/composer.lock",
    "**/Gemfile.lock",
    "**/poetry.lock",
];

const IGNORE_FILE: &str = ".gitignore";

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Translate a user filter into a glob relative to the root.
///
/// - contains a wildcard: used verbatim
/// - contains a separator or a dot: anchored with `**/`
/// - bare name: treated as a stem, any extension
pub fn filter_to_glob(filter: &str) -> String {
    let filter = filter.trim();
    let filter = filter.strip_prefix("./").unwrap_or(filter);

    if filter.contains(['*', '?', '[']) {
        filter.to_string()
    } else if filter.contains('/') || filter.contains('.') {
        format!("**/{}", filter.trim_start_matches('/'))
    } else {
        format!("**/{}.*", filter)
    }
}

fn compile(pattern: &str) -> Result<Pattern> {
    Pattern::new(pattern)
        .map_err(|e| BumpError::config(format!("Invalid glob '{}': {}", pattern, e)))
}

/// Root-relative path with `/` separators
fn relative(root: &Path, path: &Path) -> Option<String> {
    path.strip_prefix(root)
        .ok()
        .map(|p| p.to_string_lossy().replace('\\', "/"))
}

struct IgnoreRule {
    full: Pattern,
    /// For `<dir>/**` rules, the directory part, matched against ancestors
    dir: Option<Pattern>,
}

/// Compiled baseline and override ignore globs, plus the root ignore file
struct IgnoreSet {
    rules: Vec<IgnoreRule>,
    gitignore: Option<Gitignore>,
}

impl IgnoreSet {
    fn new(patterns: &[String], gitignore: Option<Gitignore>) -> Result<Self> {
        let rules = patterns
            .iter()
            .map(|p| {
                Ok(IgnoreRule {
                    full: compile(p)?,
                    dir: match p.strip_suffix("/**") {
                        Some(dir) => Some(compile(dir)?),
                        None => None,
                    },
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(IgnoreSet { rules, gitignore })
    }

    /// Ignore-file verdict; the last matching rule wins, so `!` rules re-include
    fn gitignored(&self, path: &Path, is_dir: bool) -> bool {
        self.gitignore
            .as_ref()
            .is_some_and(|gi| gi.matched(path, is_dir).is_ignore())
    }

    /// Directories pruned from the walk
    fn is_dir_ignored(&self, rel_dir: &str) -> bool {
        self.rules.iter().any(|rule| {
            rule.dir
                .as_ref()
                .is_some_and(|d| d.matches_with(rel_dir, MATCH_OPTIONS))
        })
    }

    /// Baseline or override rule covering `rel` or one of its ancestors
    fn is_ignored(&self, rel: &str) -> bool {
        if self
            .rules
            .iter()
            .any(|rule| rule.full.matches_with(rel, MATCH_OPTIONS))
        {
            return true;
        }

        // Any ancestor directory under an ignored directory rule
        let mut ancestor = rel;
        while let Some(idx) = ancestor.rfind('/') {
            ancestor = &ancestor[..idx];
            if self.is_dir_ignored(ancestor) {
                return true;
            }
        }
        false
    }
}

/// Resolves filters to files, honoring baseline and ignore-file rules
pub struct FileDiscovery<'a> {
    workspace: &'a Workspace,
    reporter: &'a dyn Reporter,
}

impl<'a> FileDiscovery<'a> {
    pub fn new(workspace: &'a Workspace, reporter: &'a dyn Reporter) -> Self {
        FileDiscovery {
            workspace,
            reporter,
        }
    }

    /// Glob patterns selected by `filters`; the manifest alone when empty
    pub fn include_globs(&self, filters: &[String]) -> Vec<String> {
        let globs: Vec<String> = filters
            .iter()
            .filter(|f| !f.trim().is_empty())
            .map(|f| filter_to_glob(f))
            .collect();

        if globs.is_empty() {
            vec![self.workspace.manifest().to_string()]
        } else {
            globs
        }
    }

    /// Baseline ignores and `overrides`, unioned
    pub fn ignore_globs(&self, overrides: &[String]) -> Vec<String> {
        let mut globs: Vec<String> = BASELINE_IGNORES.iter().map(|s| s.to_string()).collect();
        globs.extend(
            overrides
                .iter()
                .filter(|o| !o.trim().is_empty())
                .map(|o| o.trim().to_string()),
        );
        globs.sort();
        globs.dedup();
        globs
    }

    /// Matcher for the ignore file at the root, in gitignore syntax.
    ///
    /// Absent file: `None`. An unreadable file is reported and skipped; a
    /// single malformed line is skipped on its own.
    pub fn root_gitignore(&self) -> Option<Gitignore> {
        let root = self.workspace.root();
        let path = root.join(IGNORE_FILE);
        if !path.is_file() {
            return None;
        }

        let unreadable = |reason: String| {
            let warning = BumpWarning::IgnoreFileUnreadable {
                path: path.clone(),
                reason,
            };
            self.reporter.warn(&warning.to_string());
        };

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                unreadable(e.to_string());
                return None;
            }
        };

        let mut builder = GitignoreBuilder::new(root);
        for line in content.lines() {
            if builder.add_line(Some(path.clone()), line).is_err() {
                let rule = line.trim().to_string();
                self.reporter
                    .verbose(&BumpWarning::IgnoreRuleSkipped { rule }.to_string());
            }
        }

        match builder.build() {
            Ok(gitignore) => Some(gitignore),
            Err(e) => {
                unreadable(e.to_string());
                None
            }
        }
    }

    /// Expand `filters` into absolute file paths.
    ///
    /// Order is sorted for display only; callers must not rely on it.
    pub fn resolve(&self, filters: &[String], ignore_overrides: &[String]) -> Result<Vec<PathBuf>> {
        let root = self.workspace.root().to_path_buf();
        let includes = self
            .include_globs(filters)
            .iter()
            .map(|g| compile(g))
            .collect::<Result<Vec<_>>>()?;
        let ignores = Arc::new(IgnoreSet::new(
            &self.ignore_globs(ignore_overrides),
            self.root_gitignore(),
        )?);

        self.reporter.verbose(&format!(
            "Resolving {} filter(s) under {}",
            includes.len(),
            root.display()
        ));

        let prune = Arc::clone(&ignores);
        let walk_root = root.clone();
        let walker = WalkBuilder::new(&root)
            .hidden(false)
            .ignore(false)
            .git_ignore(false)
            .git_global(false)
            .git_exclude(false)
            .parents(false)
            .follow_links(false)
            .filter_entry(move |entry| {
                let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
                if !is_dir || entry.depth() == 0 {
                    return true;
                }
                if prune.gitignored(entry.path(), true) {
                    return false;
                }
                relative(&walk_root, entry.path())
                    .map(|rel| !prune.is_dir_ignored(&rel))
                    .unwrap_or(true)
            })
            .build();

        let mut files = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    self.reporter.verbose(&format!("Skipping entry: {}", e));
                    continue;
                }
            };
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }

            let Some(rel) = relative(&root, entry.path()) else {
                continue;
            };
            if ignores.is_ignored(&rel) || ignores.gitignored(entry.path(), false) {
                continue;
            }
            if includes.iter().any(|p| p.matches_with(&rel, MATCH_OPTIONS)) {
                files.push(entry.into_path());
            }
        }

        files.sort();
        self.reporter
            .verbose(&format!("Discovered {} candidate file(s)", files.len()));
        Ok(files)
    }
}
