//! Reconciler configuration
//!
//! Configuration is loaded from environment variables with defaults, the same
//! way the controller binaries of this workspace configure themselves. It is
//! passed explicitly to the reconciler; nothing is read from globals later.

use crate::error::ReconcilerError;
use crate::version_gate::VersionGate;
use std::env;
use std::time::Duration;
use tracing::debug;

/// Minimum supported cluster version
pub const DEFAULT_MIN_VERSION: &str = "4.10";
/// Interval between poll attempts
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);
/// Deadline for a cluster to become ready after creation
pub const DEFAULT_READY_TIMEOUT: Duration = Duration::from_secs(60 * 60);
/// Deadline for a cluster to disappear after deletion
pub const DEFAULT_REMOVAL_TIMEOUT: Duration = Duration::from_secs(10 * 60);
/// Deadline for the TLS handshake of the thumbprint resolver
pub const DEFAULT_THUMBPRINT_TIMEOUT: Duration = Duration::from_secs(10);

/// Overrides [`DEFAULT_MIN_VERSION`]
pub const ENV_MIN_VERSION: &str = "CLUSTER_MIN_VERSION";
/// Poll interval in seconds, shared by the readiness and removal polls
pub const ENV_POLL_INTERVAL_SECS: &str = "CLUSTER_POLL_INTERVAL_SECS";
/// Readiness deadline in seconds
pub const ENV_READY_TIMEOUT_SECS: &str = "CLUSTER_READY_TIMEOUT_SECS";
/// Removal deadline in seconds
pub const ENV_REMOVAL_TIMEOUT_SECS: &str = "CLUSTER_REMOVAL_TIMEOUT_SECS";
/// Thumbprint handshake deadline in seconds
pub const ENV_THUMBPRINT_TIMEOUT_SECS: &str = "CLUSTER_THUMBPRINT_TIMEOUT_SECS";

/// Interval and deadline of one kind of poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    /// Pause between two attempts
    pub interval: Duration,
    /// Overall deadline, measured from the first attempt
    pub timeout: Duration,
}

impl PollSettings {
    /// Create poll settings
    #[must_use]
    pub const fn new(interval: Duration, timeout: Duration) -> Self {
        Self { interval, timeout }
    }
}

/// Reconciler configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcilerConfig {
    /// Oldest cluster version accepted on create
    pub min_version: String,
    /// Readiness poll after create
    pub ready_poll: PollSettings,
    /// Removal poll after delete
    pub removal_poll: PollSettings,
    /// Handshake deadline when resolving OIDC thumbprints
    pub thumbprint_timeout: Duration,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            min_version: DEFAULT_MIN_VERSION.to_string(),
            ready_poll: PollSettings::new(DEFAULT_POLL_INTERVAL, DEFAULT_READY_TIMEOUT),
            removal_poll: PollSettings::new(DEFAULT_POLL_INTERVAL, DEFAULT_REMOVAL_TIMEOUT),
            thumbprint_timeout: DEFAULT_THUMBPRINT_TIMEOUT,
        }
    }
}

impl ReconcilerConfig {
    /// Load configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns `ReconcilerError::InvalidConfig` if a variable is set but not a
    /// valid number of seconds, or if the resulting configuration is invalid.
    pub fn from_env() -> Result<Self, ReconcilerError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup` instead of the process environment
    ///
    /// # Errors
    ///
    /// Same as [`ReconcilerConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ReconcilerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(min_version) = lookup(ENV_MIN_VERSION) {
            config.min_version = min_version.trim().to_string();
        }
        if let Some(interval) = seconds(&lookup, ENV_POLL_INTERVAL_SECS)? {
            config.ready_poll.interval = interval;
            config.removal_poll.interval = interval;
        }
        if let Some(timeout) = seconds(&lookup, ENV_READY_TIMEOUT_SECS)? {
            config.ready_poll.timeout = timeout;
        }
        if let Some(timeout) = seconds(&lookup, ENV_REMOVAL_TIMEOUT_SECS)? {
            config.removal_poll.timeout = timeout;
        }
        if let Some(timeout) = seconds(&lookup, ENV_THUMBPRINT_TIMEOUT_SECS)? {
            config.thumbprint_timeout = timeout;
        }

        config.validate()?;

        debug!("Reconciler configuration:");
        debug!("  Minimum version: {}", config.min_version);
        debug!("  Poll interval: {:?}", config.ready_poll.interval);
        debug!("  Ready timeout: {:?}", config.ready_poll.timeout);
        debug!("  Removal timeout: {:?}", config.removal_poll.timeout);
        debug!("  Thumbprint timeout: {:?}", config.thumbprint_timeout);

        Ok(config)
    }

    /// Check the configuration for values the reconciler can't work with
    ///
    /// # Errors
    ///
    /// Returns `ReconcilerError::InvalidConfig` describing the first problem found.
    pub fn validate(&self) -> Result<(), ReconcilerError> {
        if self.ready_poll.interval.is_zero() || self.removal_poll.interval.is_zero() {
            return Err(ReconcilerError::InvalidConfig(
                "Poll interval must be greater than zero".to_string(),
            ));
        }
        if self.ready_poll.timeout.is_zero() || self.removal_poll.timeout.is_zero() {
            return Err(ReconcilerError::InvalidConfig(
                "Poll timeout must be greater than zero".to_string(),
            ));
        }
        if self.removal_poll.timeout >= self.ready_poll.timeout {
            return Err(ReconcilerError::InvalidConfig(format!(
                "Removal timeout ({:?}) must be shorter than the ready timeout ({:?})",
                self.removal_poll.timeout, self.ready_poll.timeout
            )));
        }
        if self.thumbprint_timeout.is_zero() {
            return Err(ReconcilerError::InvalidConfig(
                "Thumbprint timeout must be greater than zero".to_string(),
            ));
        }
        VersionGate::new(&self.min_version)
            .map_err(|e| ReconcilerError::InvalidConfig(format!("Invalid minimum version: {e}")))?;
        Ok(())
    }
}

fn seconds<F>(lookup: &F, key: &str) -> Result<Option<Duration>, ReconcilerError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|raw| {
            raw.trim().parse::<u64>().map(Duration::from_secs).map_err(|e| {
                ReconcilerError::InvalidConfig(format!("{key} must be a number of seconds: {e}"))
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ReconcilerConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, ReconcilerConfig::default());
        assert_eq!(config.ready_poll.interval, Duration::from_secs(30));
        assert_eq!(config.ready_poll.timeout, Duration::from_secs(3600));
        assert_eq!(config.removal_poll.timeout, Duration::from_secs(600));
        assert_eq!(config.min_version, "4.10");
    }

    #[test]
    fn test_overrides() {
        let config = ReconcilerConfig::from_lookup(lookup_from(&[
            (ENV_MIN_VERSION, "4.12"),
            (ENV_POLL_INTERVAL_SECS, "5"),
            (ENV_READY_TIMEOUT_SECS, "120"),
            (ENV_REMOVAL_TIMEOUT_SECS, "60"),
        ]))
        .unwrap();
        assert_eq!(config.min_version, "4.12");
        assert_eq!(config.ready_poll, PollSettings::new(Duration::from_secs(5), Duration::from_secs(120)));
        assert_eq!(config.removal_poll, PollSettings::new(Duration::from_secs(5), Duration::from_secs(60)));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = ReconcilerConfig::from_lookup(lookup_from(&[(ENV_POLL_INTERVAL_SECS, "soon")]))
            .unwrap_err();
        assert!(matches!(err, ReconcilerError::InvalidConfig(_)));

        let err = ReconcilerConfig::from_lookup(lookup_from(&[(ENV_POLL_INTERVAL_SECS, "0")]))
            .unwrap_err();
        assert!(matches!(err, ReconcilerError::InvalidConfig(_)));

        let err = ReconcilerConfig::from_lookup(lookup_from(&[(ENV_REMOVAL_TIMEOUT_SECS, "7200")]))
            .unwrap_err();
        assert!(matches!(err, ReconcilerError::InvalidConfig(_)));

        let err = ReconcilerConfig::from_lookup(lookup_from(&[(ENV_MIN_VERSION, "latest")]))
            .unwrap_err();
        assert!(matches!(err, ReconcilerError::InvalidConfig(_)));
    }

    #[test]
    fn test_zero_timeouts_are_rejected() {
        let err = ReconcilerConfig::from_lookup(lookup_from(&[(ENV_REMOVAL_TIMEOUT_SECS, "0")]))
            .unwrap_err();
        assert!(matches!(err, ReconcilerError::InvalidConfig(ref m) if m.contains("timeout")));

        let config = ReconcilerConfig {
            ready_poll: PollSettings::new(Duration::from_secs(30), Duration::ZERO),
            removal_poll: PollSettings::new(Duration::from_secs(30), Duration::ZERO),
            ..ReconcilerConfig::default()
        };
        assert!(matches!(config.validate(), Err(ReconcilerError::InvalidConfig(_))));

        let err = ReconcilerConfig::from_lookup(lookup_from(&[(ENV_THUMBPRINT_TIMEOUT_SECS, "0")]))
            .unwrap_err();
        assert!(matches!(err, ReconcilerError::InvalidConfig(_)));
    }
}
