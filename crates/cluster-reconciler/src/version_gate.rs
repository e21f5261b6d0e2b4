//! Minimum version gate
//!
//! Cluster versions are identified as `openshift-v<semver>`, sometimes with
//! only `major.minor`. The gate strips the prefix, pads missing components
//! with zeros and compares with semver ordering, so `4.11.0-rc.1` sorts
//! before `4.11.0`.

use semver::Version;
use thiserror::Error;

const VERSION_PREFIX: &str = "openshift-v";

/// Version parsing errors
#[derive(Debug, Error)]
pub enum VersionError {
    /// The value is not a cluster version, even after normalization
    #[error("Invalid version '{version}': {source}")]
    Invalid {
        version: String,
        source: semver::Error,
    },
}

/// Accepts versions at or above a minimum
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionGate {
    minimum: Version,
    raw_minimum: String,
}

impl VersionGate {
    /// Create a gate accepting `minimum` and anything newer
    ///
    /// # Errors
    ///
    /// Returns `VersionError::Invalid` if `minimum` is not a version.
    pub fn new(minimum: &str) -> Result<Self, VersionError> {
        Ok(Self {
            minimum: parse_version(minimum)?,
            raw_minimum: minimum.to_string(),
        })
    }

    /// Minimum version as configured
    #[must_use]
    pub fn minimum(&self) -> &str {
        &self.raw_minimum
    }

    /// Whether `version` is at or above the minimum
    ///
    /// # Errors
    ///
    /// Returns `VersionError::Invalid` if `version` does not parse.
    pub fn is_supported(&self, version: &str) -> Result<bool, VersionError> {
        Ok(parse_version(version)? >= self.minimum)
    }
}

/// Parse a cluster version identifier into a semver version
///
/// # Errors
///
/// Returns `VersionError::Invalid` if what remains after prefix stripping and
/// padding is not a semver version.
pub fn parse_version(raw: &str) -> Result<Version, VersionError> {
    let stripped = raw.trim().replacen(VERSION_PREFIX, "", 1);
    let stripped = stripped.strip_prefix('v').unwrap_or(&stripped);

    let (core, suffix) = match stripped.find(['-', '+']) {
        Some(index) => stripped.split_at(index),
        None => (stripped, ""),
    };
    let padding = match core.split('.').count() {
        1 => ".0.0",
        2 => ".0",
        _ => "",
    };
    let normalized = format!("{core}{padding}{suffix}");

    Version::parse(&normalized).map_err(|source| VersionError::Invalid {
        version: raw.to_string(),
        source,
    })
}
