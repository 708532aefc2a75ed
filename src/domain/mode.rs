use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BumpError;
use crate::version::ReleaseType;

/// Requested class of version change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BumpMode {
    #[default]
    Patch,
    Minor,
    Major,
    /// Patch-equivalent increment
    Auto,
    /// Explicit target version supplied by caller or configuration
    #[serde(alias = "custom")]
    Manual,
}

impl BumpMode {
    /// The increment this mode delegates to, or `None` for manual mode
    pub fn release_type(&self) -> Option<ReleaseType> {
        match self {
            BumpMode::Patch | BumpMode::Auto => Some(ReleaseType::Patch),
            BumpMode::Minor => Some(ReleaseType::Minor),
            BumpMode::Major => Some(ReleaseType::Major),
            BumpMode::Manual => None,
        }
    }
}

impl fmt::Display for BumpMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BumpMode::Patch => "patch",
            BumpMode::Minor => "minor",
            BumpMode::Major => "major",
            BumpMode::Auto => "auto",
            BumpMode::Manual => "manual",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for BumpMode {
    type Err = BumpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "patch" => Ok(BumpMode::Patch),
            "minor" => Ok(BumpMode::Minor),
            "major" => Ok(BumpMode::Major),
            "auto" => Ok(BumpMode::Auto),
            "manual" | "custom" => Ok(BumpMode::Manual),
            other => Err(BumpError::config(format!(
                "Unknown bump mode '{}' (expected patch, minor, major, auto or manual)",
                other
            ))),
        }
    }
}
