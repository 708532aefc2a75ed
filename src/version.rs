//! Semantic version helpers over the `semver` crate.
//!
//! All functions are pure: they take version strings and never touch the
//! file system.

use std::cmp::Ordering;
use std::fmt;

use semver::{Prerelease, Version, VersionReq};

use crate::error::{BumpError, Result};

/// The component of a version to increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseType {
    Major,
    Minor,
    Patch,
}

impl fmt::Display for ReleaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseType::Major => write!(f, "major"),
            ReleaseType::Minor => write!(f, "minor"),
            ReleaseType::Patch => write!(f, "patch"),
        }
    }
}

/// Returns `true` if `s` is a strict semantic version (no `v` prefix, no
/// leading zeros, all three components present).
pub fn is_valid(s: &str) -> bool {
    Version::parse(s).is_ok()
}

/// Parses a strict semantic version.
pub fn parse(s: &str) -> Result<Version> {
    Version::parse(s).map_err(|_| BumpError::InvalidVersion(s.to_string()))
}

/// Increments `current` by `release`.
///
/// A prerelease that already sits on the targeted component is promoted to
/// its release instead of being bumped again:
/// - `1.2.3-beta.1` + patch => `1.2.3`
/// - `1.3.0-rc.1` + minor => `1.3.0`
/// - `2.0.0-alpha` + major => `2.0.0`
///
/// Build metadata is always dropped.
///
/// # Errors
/// * `InvalidVersion` - if `current` is not a valid semantic version
/// * `IncrementFailure` - if the targeted component would overflow
pub fn increment(current: &str, release: ReleaseType) -> Result<String> {
    let version = parse(current)?;
    let pre = !version.pre.is_empty();

    let next = match release {
        ReleaseType::Major if pre && version.minor == 0 && version.patch == 0 => {
            Some(Version::new(version.major, 0, 0))
        }
        ReleaseType::Major => version.major.checked_add(1).map(|m| Version::new(m, 0, 0)),
        ReleaseType::Minor if pre && version.patch == 0 => {
            Some(Version::new(version.major, version.minor, 0))
        }
        ReleaseType::Minor => version
            .minor
            .checked_add(1)
            .map(|m| Version::new(version.major, m, 0)),
        ReleaseType::Patch if pre => Some(Version::new(
            version.major,
            version.minor,
            version.patch,
        )),
        ReleaseType::Patch => version
            .patch
            .checked_add(1)
            .map(|p| Version::new(version.major, version.minor, p)),
    };

    next.map(|v| v.to_string())
        .ok_or_else(|| BumpError::IncrementFailure {
            version: current.to_string(),
            release: release.to_string(),
        })
}

/// Compares two versions by semantic-version precedence.
///
/// Build metadata does not take part in precedence.
pub fn compare(a: &str, b: &str) -> Result<Ordering> {
    let a = parse(a)?;
    let b = parse(b)?;
    Ok(precedence(&a, &b))
}

fn precedence(a: &Version, b: &Version) -> Ordering {
    (a.major, a.minor, a.patch, &a.pre).cmp(&(b.major, b.minor, b.patch, &b.pre))
}

/// Returns the highest valid version, or `None` if no input is valid.
pub fn max_of<S: AsRef<str>>(versions: &[S]) -> Option<String> {
    versions
        .iter()
        .filter_map(|v| Version::parse(v.as_ref()).ok())
        .max_by(precedence)
        .map(|v| v.to_string())
}

/// Returns `true` if `v` is valid and carries a prerelease tag.
pub fn is_prerelease(v: &str) -> bool {
    Version::parse(v)
        .map(|v| v.pre != Prerelease::EMPTY)
        .unwrap_or(false)
}

/// Returns `true` if `v` is valid and satisfies the requirement `range`
/// (e.g. `^1.2`, `>=1.0.0, <2.0.0`). An unparsable range is never satisfied.
pub fn satisfies_range(v: &str, range: &str) -> bool {
    match (Version::parse(v), VersionReq::parse(range)) {
        (Ok(version), Ok(req)) => req.matches(&version),
        _ => false,
    }
}
