//! Verifier configuration

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How CT audit paths are checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditPathAlgorithm {
    /// Index-parity walk without the tree size
    ///
    /// Leaves on the right edge of a tree whose size is not a power of two
    /// do not verify.
    #[default]
    Simplified,
    /// Full RFC 6962 inclusion verification using the tree size
    Rfc6962,
}

/// Policy knobs for a verification pass
///
/// Every field is optional in JSON; missing ones take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifierConfig {
    /// Seconds each collaborator call may take before it counts as failed
    pub fetch_timeout: u64,
    pub audit_path_algorithm: AuditPathAlgorithm,
    /// Treat retired logs as if they were not in the registry
    pub skip_retired_logs: bool,
    /// Stop at the first SCT that verifies and accept on any success
    pub stop_at_first_valid: bool,
    /// Fail the verdict when the ledger check could not be completed
    pub require_ledger_consistency: bool,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            fetch_timeout: 30,
            audit_path_algorithm: AuditPathAlgorithm::Simplified,
            skip_retired_logs: false,
            stop_at_first_valid: false,
            require_ledger_consistency: false,
        }
    }
}

impl VerifierConfig {
    /// Parse a configuration from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    fn validate(&self) -> Result<()> {
        if self.fetch_timeout == 0 {
            return Err(Error::Config("fetch_timeout must be positive".to_string()));
        }
        Ok(())
    }

    /// The per-call timeout as a [`Duration`]
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout)
    }

    /// Set the per-call timeout in seconds
    pub fn with_fetch_timeout(mut self, seconds: u64) -> Self {
        self.fetch_timeout = seconds;
        self
    }

    pub fn with_audit_path_algorithm(mut self, algorithm: AuditPathAlgorithm) -> Self {
        self.audit_path_algorithm = algorithm;
        self
    }

    pub fn with_skip_retired_logs(mut self, skip: bool) -> Self {
        self.skip_retired_logs = skip;
        self
    }

    pub fn with_stop_at_first_valid(mut self, stop: bool) -> Self {
        self.stop_at_first_valid = stop;
        self
    }

    pub fn with_require_ledger_consistency(mut self, require: bool) -> Self {
        self.require_ledger_consistency = require;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = VerifierConfig::default();
        assert_eq!(config.fetch_timeout(), Duration::from_secs(30));
        assert_eq!(config.audit_path_algorithm, AuditPathAlgorithm::Simplified);
        assert!(!config.skip_retired_logs);
        assert!(!config.stop_at_first_valid);
        assert!(!config.require_ledger_consistency);
    }

    #[test]
    fn test_partial_json() {
        let config =
            VerifierConfig::from_json(r#"{"audit_path_algorithm": "rfc6962", "fetch_timeout": 5}"#)
                .unwrap();
        assert_eq!(config.audit_path_algorithm, AuditPathAlgorithm::Rfc6962);
        assert_eq!(config.fetch_timeout(), Duration::from_secs(5));
        assert!(!config.skip_retired_logs);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            VerifierConfig::from_json(r#"{"audit_path_algorithm": "sideways"}"#),
            Err(Error::Json(_))
        ));
        assert!(matches!(
            VerifierConfig::from_json(r#"{"fetch_timeout": 0}"#),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_builder() {
        let config = VerifierConfig::default()
            .with_fetch_timeout(2)
            .with_skip_retired_logs(true)
            .with_stop_at_first_valid(true)
            .with_require_ledger_consistency(true);

        assert_eq!(config.fetch_timeout, 2);
        assert!(config.skip_retired_logs);
        assert!(config.stop_at_first_valid);
        assert!(config.require_ledger_consistency);
    }
}
