//! CT log list parsing and lookup
//!
//! Logs are described by the v3 log list JSON that browsers ship: operators
//! each own a set of logs, every log carries its ID (SHA-256 of its public
//! key, base64), submission URL and lifecycle state.

use crate::error::Result;
use chrono::{DateTime, Utc};
use prism_ct_types::Base64;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A published CT log list
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CtLogList {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub log_list_timestamp: Option<DateTime<Utc>>,
    pub operators: Vec<LogOperator>,
}

impl CtLogList {
    /// Parse a log list from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// An organisation running one or more logs
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LogOperator {
    pub name: String,
    #[serde(default)]
    pub email: Vec<String>,
    #[serde(default)]
    pub logs: Vec<LogMetadata>,
    /// Static-CT logs; listed but not queried
    #[serde(default)]
    pub tiled_logs: Vec<serde_json::Value>,
}

/// One RFC 6962 log as listed
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LogMetadata {
    pub description: String,
    /// Base64 SHA-256 of the log's public key
    pub log_id: String,
    /// Base64 DER SubjectPublicKeyInfo
    pub key: Base64,
    /// Submission prefix, `ct/v1/...` endpoints hang off it
    pub url: String,
    /// Maximum merge delay in seconds
    #[serde(default)]
    pub mmd: u64,
    #[serde(default)]
    pub state: Option<LogState>,
    #[serde(default)]
    pub temporal_interval: Option<TemporalInterval>,
}

impl LogMetadata {
    /// Whether the log has been retired by the list publisher
    pub fn is_retired(&self) -> bool {
        matches!(self.state, Some(LogState::Retired { .. }))
    }

    /// Whether a certificate expiring at `timestamp` falls in this shard
    ///
    /// Logs without a temporal interval accept every timestamp.
    pub fn accepts_timestamp(&self, timestamp: DateTime<Utc>) -> bool {
        self.temporal_interval
            .as_ref()
            .map_or(true, |interval| interval.contains(timestamp))
    }

    /// Short lifecycle label for logging
    pub fn state_name(&self) -> &'static str {
        match &self.state {
            Some(state) => state.name(),
            None => "unknown",
        }
    }
}

/// Lifecycle state of a log, as set by the list publisher
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogState {
    Pending {
        timestamp: DateTime<Utc>,
    },
    Qualified {
        timestamp: DateTime<Utc>,
    },
    Usable {
        timestamp: DateTime<Utc>,
    },
    Readonly {
        timestamp: DateTime<Utc>,
        final_tree_head: FinalTreeHead,
    },
    Retired {
        timestamp: DateTime<Utc>,
    },
    Rejected {
        timestamp: DateTime<Utc>,
    },
}

impl LogState {
    fn name(&self) -> &'static str {
        match self {
            LogState::Pending { .. } => "pending",
            LogState::Qualified { .. } => "qualified",
            LogState::Usable { .. } => "usable",
            LogState::Readonly { .. } => "readonly",
            LogState::Retired { .. } => "retired",
            LogState::Rejected { .. } => "rejected",
        }
    }
}

/// Tree head a read-only log was frozen at
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FinalTreeHead {
    pub sha256_root_hash: Base64,
    pub tree_size: u64,
}

/// Certificate expiry range a sharded log accepts
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TemporalInterval {
    pub start_inclusive: DateTime<Utc>,
    pub end_exclusive: DateTime<Utc>,
}

impl TemporalInterval {
    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        timestamp >= self.start_inclusive && timestamp < self.end_exclusive
    }
}

/// Known CT logs indexed by base64 log ID
#[derive(Debug, Clone, Default)]
pub struct LogRegistry {
    logs: HashMap<String, LogMetadata>,
}

impl LogRegistry {
    /// Build a registry from individual log entries
    ///
    /// A later entry with the same log ID replaces an earlier one.
    pub fn new(logs: impl IntoIterator<Item = LogMetadata>) -> Self {
        Self {
            logs: logs
                .into_iter()
                .map(|log| (log.log_id.clone(), log))
                .collect(),
        }
    }

    /// Flatten every operator's logs into one registry
    pub fn from_log_list(list: CtLogList) -> Self {
        Self::new(list.operators.into_iter().flat_map(|op| op.logs))
    }

    /// Parse a log list from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self::from_log_list(CtLogList::from_json(json)?))
    }

    /// Load a log list from a file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Look up a log by its base64 log ID
    pub fn get_log_by_id(&self, log_id: &str) -> Option<&LogMetadata> {
        self.logs.get(log_id)
    }

    pub fn len(&self) -> usize {
        self.logs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.logs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use chrono::TimeZone;

    const LOG_LIST: &str = r#"{
        "version": "54.6",
        "log_list_timestamp": "2025-03-10T12:55:01Z",
        "operators": [
            {
                "name": "Google",
                "email": ["google-ct-logs@googlegroups.com"],
                "logs": [
                    {
                        "description": "Google 'Argon2025h1' log",
                        "log_id": "TnWjJ1yaEMM4W2zU3z9S6x3w4I4bjWnAsfpksWKaOd8=",
                        "key": "MFkwEwYHKoZIzj0CAQYIKoZIzj0DAQcDQgAEIIKh+WdoqOTblJji4WiH5AltIDUzODyvFKrXCBjw/Rab0/98J4LUh7dOJEY7+66+yCNSICuqRAX+VPnV8R1Fmg==",
                        "url": "https://ct.googleapis.com/logs/us1/argon2025h1/",
                        "mmd": 86400,
                        "state": {"usable": {"timestamp": "2024-02-05T18:19:00Z"}},
                        "temporal_interval": {
                            "start_inclusive": "2025-01-01T00:00:00Z",
                            "end_exclusive": "2025-07-01T00:00:00Z"
                        }
                    },
                    {
                        "description": "Google 'Xenon2018' log",
                        "log_id": "sQzVWabWeEaBH335pRUyc5rEjXA76gMj2l04dVvArU4=",
                        "key": "MFkwEwYHKoZIzj0CAQYIKoZIzj0DAQcDQgAE",
                        "url": "https://ct.googleapis.com/logs/xenon2018/",
                        "mmd": 86400,
                        "state": {"retired": {"timestamp": "2020-02-19T00:00:00Z"}}
                    }
                ],
                "tiled_logs": []
            },
            {
                "name": "Let's Encrypt",
                "email": ["sre@letsencrypt.org"],
                "logs": [
                    {
                        "description": "Let's Encrypt 'Oak2020' log",
                        "log_id": "5xLysDd+GmL7jskMYYTx6ns3y1YdESZb8+DzS/JBVG4=",
                        "key": "MFkwEwYHKoZIzj0CAQYIKoZIzj0DAQcDQgAE",
                        "url": "https://oak.ct.letsencrypt.org/2020/",
                        "mmd": 86400,
                        "state": {
                            "readonly": {
                                "timestamp": "2021-02-01T00:00:00Z",
                                "final_tree_head": {
                                    "sha256_root_hash": "Dx+1w2tnkiwsFTPYfg0avLa+VRFavCmPb5y3fdvBaXk=",
                                    "tree_size": 1283214
                                }
                            }
                        }
                    }
                ]
            }
        ]
    }"#;

    #[test]
    fn test_parse_log_list() {
        let list = CtLogList::from_json(LOG_LIST).unwrap();
        assert_eq!(list.operators.len(), 2);
        assert_eq!(list.operators[0].logs.len(), 2);
        assert!(list.operators[1].tiled_logs.is_empty());

        let registry = LogRegistry::from_log_list(list);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_get_log_by_id() {
        let registry = LogRegistry::from_json(LOG_LIST).unwrap();

        let argon = registry
            .get_log_by_id("TnWjJ1yaEMM4W2zU3z9S6x3w4I4bjWnAsfpksWKaOd8=")
            .unwrap();
        assert_eq!(argon.description, "Google 'Argon2025h1' log");
        assert_eq!(argon.url, "https://ct.googleapis.com/logs/us1/argon2025h1/");
        assert_eq!(argon.state_name(), "usable");
        assert!(!argon.is_retired());

        assert!(registry.get_log_by_id("AAAA").is_none());
    }

    #[test]
    fn test_lifecycle_states() {
        let registry = LogRegistry::from_json(LOG_LIST).unwrap();

        let xenon = registry
            .get_log_by_id("sQzVWabWeEaBH335pRUyc5rEjXA76gMj2l04dVvArU4=")
            .unwrap();
        assert!(xenon.is_retired());
        assert_eq!(xenon.state_name(), "retired");
        assert_eq!(
            xenon.state,
            Some(LogState::Retired {
                timestamp: Utc.with_ymd_and_hms(2020, 2, 19, 0, 0, 0).unwrap()
            })
        );

        let oak = registry
            .get_log_by_id("5xLysDd+GmL7jskMYYTx6ns3y1YdESZb8+DzS/JBVG4=")
            .unwrap();
        match &oak.state {
            Some(LogState::Readonly {
                final_tree_head, ..
            }) => assert_eq!(final_tree_head.tree_size, 1283214),
            other => panic!("expected readonly state, got {:?}", other),
        }
    }

    #[test]
    fn test_accepts_timestamp() {
        let registry = LogRegistry::from_json(LOG_LIST).unwrap();
        let argon = registry
            .get_log_by_id("TnWjJ1yaEMM4W2zU3z9S6x3w4I4bjWnAsfpksWKaOd8=")
            .unwrap();

        assert!(argon.accepts_timestamp(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()));
        assert!(argon.accepts_timestamp(Utc.with_ymd_and_hms(2025, 6, 30, 23, 59, 59).unwrap()));
        assert!(!argon.accepts_timestamp(Utc.with_ymd_and_hms(2025, 7, 1, 0, 0, 0).unwrap()));
        assert!(!argon.accepts_timestamp(Utc.with_ymd_and_hms(2024, 12, 31, 0, 0, 0).unwrap()));

        // No interval: unsharded
        let xenon = registry
            .get_log_by_id("sQzVWabWeEaBH335pRUyc5rEjXA76gMj2l04dVvArU4=")
            .unwrap();
        assert!(xenon.accepts_timestamp(Utc.with_ymd_and_hms(1999, 1, 1, 0, 0, 0).unwrap()));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            LogRegistry::from_file("/nonexistent/log_list.json"),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn test_malformed_file() {
        let path = std::env::temp_dir().join(format!("prism-ct-log-list-{}.json", std::process::id()));
        std::fs::write(&path, "{\"operators\": 5}").unwrap();
        let result = LogRegistry::from_file(&path);
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(result, Err(Error::Json(_))));
    }
}
