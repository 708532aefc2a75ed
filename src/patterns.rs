//! Declarative version patterns.
//!
//! One pattern covers one file type and one syntactic form. The registry
//! selects patterns by [`FileType`] and applies them according to the type's
//! [`ApplyPolicy`]. New forms are added by registering another
//! [`VersionPattern`], never by branching inside the engine.
//!
//! Substitution is anchored on the version being replaced: a declaration
//! holding any other value is left as it is.

use std::path::Path;

use regex::{Captures, Regex};

use crate::domain::FileType;
use crate::error::{BumpError, Result};

/// Matches a semantic version with optional prerelease and build suffixes
pub const SEMVER_VALUE: &str = r"\d+\.\d+\.\d+(?:-[0-9A-Za-z.-]+)?(?:\+[0-9A-Za-z.-]+)?";

/// `version`, `VERSION`, `Version`, `__version__`, optionally quoted as a key
const VERSION_IDENT: &str = r#"["']?\b(?i:__version__|version)\b["']?"#;

/// A paired detection/substitution rule for one version-declaration form
pub trait VersionPattern: Send + Sync {
    fn id(&self) -> &'static str;

    fn applies_to(&self) -> FileType;

    /// Returns the first version value declared in this form, whatever it is
    fn extract(&self, content: &str) -> Option<String>;

    /// Whether this form declares `current`
    fn detect(&self, content: &str, current: &str) -> bool;

    /// Rewrites the declarations of `current` to `new_version`.
    ///
    /// Returns `None` when no declaration holds `current`. Only the value
    /// itself is replaced; quotes, separators and trailing punctuation are
    /// preserved.
    fn replace(&self, content: &str, current: &str, new_version: &str) -> Option<String>;
}

/// How the patterns of one file type are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyPolicy {
    /// Stop at the first pattern that matches
    FirstMatch,
    /// Apply every pattern that matches, in registry order
    AllMatches,
}

impl ApplyPolicy {
    pub fn for_type(file_type: FileType) -> ApplyPolicy {
        match file_type {
            FileType::ManifestJson => ApplyPolicy::FirstMatch,
            FileType::SourceDeclaration | FileType::Unsupported => ApplyPolicy::AllMatches,
        }
    }
}

/// Replaces capture group 1 with `new_version` wherever it equals `current`.
///
/// Returns `None` when no capture holds `current`.
fn splice_value(re: &Regex, content: &str, current: &str, new_version: &str) -> Option<String> {
    let mut out = String::with_capacity(content.len());
    let mut last = 0;
    let mut replaced = 0;

    for value in re
        .captures_iter(content)
        .filter_map(|caps| caps.get(1))
        .filter(|value| value.as_str() == current)
    {
        out.push_str(&content[last..value.start()]);
        out.push_str(new_version);
        last = value.end();
        replaced += 1;
    }

    if replaced == 0 {
        return None;
    }
    out.push_str(&content[last..]);
    Some(out)
}

/// First match that sits directly inside the root JSON object.
///
/// Tracks brace/bracket depth outside string literals, so keys of nested
/// objects (`publishConfig.version`, dependency entries) are skipped.
fn top_level_captures<'c>(re: &Regex, content: &'c str) -> Option<Captures<'c>> {
    let bytes = content.as_bytes();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    let mut pos = 0;

    for caps in re.captures_iter(content) {
        let start = caps.get(0)?.start();
        while pos < start {
            let b = bytes[pos];
            if in_string {
                if escaped {
                    escaped = false;
                } else if b == b'\\' {
                    escaped = true;
                } else if b == b'"' {
                    in_string = false;
                }
            } else {
                match b {
                    b'"' => in_string = true,
                    b'{' | b'[' => depth += 1,
                    b'}' | b']' => depth = depth.saturating_sub(1),
                    _ => {}
                }
            }
            pos += 1;
        }
        if !in_string && depth == 1 {
            return Some(caps);
        }
    }
    None
}

fn compile(id: &str, pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| BumpError::Pattern {
        id: id.to_string(),
        source,
    })
}

/// `"version": "<value>"` of the root object in a JSON manifest.
///
/// The first top-level occurrence is authoritative; nested `version` keys
/// are never read or rewritten.
pub struct ManifestVersionPattern {
    regex: Regex,
}

impl ManifestVersionPattern {
    pub const ID: &'static str = "manifest-json-version";

    pub fn new() -> Result<Self> {
        Ok(ManifestVersionPattern {
            regex: compile(Self::ID, r#""version"\s*:\s*"([^"]*)""#)?,
        })
    }
}

impl VersionPattern for ManifestVersionPattern {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn applies_to(&self) -> FileType {
        FileType::ManifestJson
    }

    fn extract(&self, content: &str) -> Option<String> {
        top_level_captures(&self.regex, content)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }

    fn detect(&self, content: &str, current: &str) -> bool {
        self.extract(content).as_deref() == Some(current)
    }

    fn replace(&self, content: &str, current: &str, new_version: &str) -> Option<String> {
        let caps = top_level_captures(&self.regex, content)?;
        let value = caps.get(1)?;
        if value.as_str() != current {
            return None;
        }
        Some(format!(
            "{}{}{}",
            &content[..value.start()],
            new_version,
            &content[value.end()..]
        ))
    }
}

/// Separator between the identifier and the quoted value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separator {
    /// `=`, also Go's `:=`
    Equals,
    Colon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quote {
    Double,
    Single,
}

/// One textual form of a `version` assignment in source code, e.g.
/// `__version__ = "1.2.3"` or `version: '1.2.3',`
pub struct DeclarationPattern {
    id: &'static str,
    regex: Regex,
}

impl DeclarationPattern {
    pub fn new(id: &'static str, separator: Separator, quote: Quote) -> Result<Self> {
        let sep = match separator {
            Separator::Equals => r"\s*:?=\s*",
            Separator::Colon => r"\s*:\s*",
        };
        let q = match quote {
            Quote::Double => "\"",
            Quote::Single => "'",
        };
        let pattern = format!("{VERSION_IDENT}{sep}{q}({SEMVER_VALUE}){q}");

        Ok(DeclarationPattern {
            id,
            regex: compile(id, &pattern)?,
        })
    }
}

impl VersionPattern for DeclarationPattern {
    fn id(&self) -> &'static str {
        self.id
    }

    fn applies_to(&self) -> FileType {
        FileType::SourceDeclaration
    }

    fn extract(&self, content: &str) -> Option<String> {
        self.regex
            .captures(content)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }

    fn detect(&self, content: &str, current: &str) -> bool {
        self.regex
            .captures_iter(content)
            .filter_map(|caps| caps.get(1))
            .any(|value| value.as_str() == current)
    }

    fn replace(&self, content: &str, current: &str, new_version: &str) -> Option<String> {
        splice_value(&self.regex, content, current, new_version)
    }
}

/// Outcome of running a file type's patterns over some content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub content: String,
    /// Ids of the patterns that matched, in application order
    pub matched: Vec<&'static str>,
}

/// Ordered catalog of version patterns
pub struct PatternRegistry {
    patterns: Vec<Box<dyn VersionPattern>>,
}

impl PatternRegistry {
    pub fn empty() -> Self {
        PatternRegistry {
            patterns: Vec::new(),
        }
    }

    /// Registry with the manifest rule and the four source-declaration forms
    pub fn builtin() -> Result<Self> {
        let mut registry = PatternRegistry::empty();
        registry.register(Box::new(ManifestVersionPattern::new()?));
        registry.register(Box::new(DeclarationPattern::new(
            "assign-double-quote",
            Separator::Equals,
            Quote::Double,
        )?));
        registry.register(Box::new(DeclarationPattern::new(
            "assign-single-quote",
            Separator::Equals,
            Quote::Single,
        )?));
        registry.register(Box::new(DeclarationPattern::new(
            "property-double-quote",
            Separator::Colon,
            Quote::Double,
        )?));
        registry.register(Box::new(DeclarationPattern::new(
            "property-single-quote",
            Separator::Colon,
            Quote::Single,
        )?));
        Ok(registry)
    }

    pub fn register(&mut self, pattern: Box<dyn VersionPattern>) {
        self.patterns.push(pattern);
    }

    /// Patterns for `file_type`, in registry order
    pub fn find_for(&self, file_type: FileType) -> Vec<&dyn VersionPattern> {
        self.patterns
            .iter()
            .filter(|p| p.applies_to() == file_type)
            .map(|p| p.as_ref())
            .collect()
    }

    /// Extension-based candidate type, narrowed to `Unsupported` when none of
    /// its patterns occurs in `content`
    pub fn classify(&self, path: &Path, content: &str) -> FileType {
        let candidate = FileType::from_extension(path);
        if !candidate.is_supported() {
            return candidate;
        }

        if self.extract(candidate, content).is_some() {
            candidate
        } else {
            FileType::Unsupported
        }
    }

    /// First version declared in any of the type's forms
    pub fn extract(&self, file_type: FileType, content: &str) -> Option<String> {
        self.find_for(file_type)
            .into_iter()
            .find_map(|p| p.extract(content))
    }

    /// Whether any of the type's forms declares `current`
    pub fn detect(&self, file_type: FileType, content: &str, current: &str) -> bool {
        self.find_for(file_type)
            .into_iter()
            .any(|p| p.detect(content, current))
    }

    /// Rewrites declarations of `current` to `new_version` under the type's
    /// [`ApplyPolicy`].
    ///
    /// Each pattern makes one pass over the content and patterns run in
    /// sequence. Distinct patterns cannot match the same span, and once
    /// rewritten a declaration no longer holds `current`, so applying the
    /// result again is a no-op.
    pub fn rewrite(
        &self,
        file_type: FileType,
        content: &str,
        current: &str,
        new_version: &str,
    ) -> Rewrite {
        let policy = ApplyPolicy::for_type(file_type);
        let mut text = content.to_string();
        let mut matched = Vec::new();

        for pattern in self.find_for(file_type) {
            if let Some(next) = pattern.replace(&text, current, new_version) {
                matched.push(pattern.id());
                text = next;
                if policy == ApplyPolicy::FirstMatch {
                    break;
                }
            }
        }

        Rewrite {
            content: text,
            matched,
        }
    }
}
