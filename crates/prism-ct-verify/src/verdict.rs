//! Per-SCT outcomes and how they combine into a verdict

use crate::config::VerifierConfig;
use serde::{Deserialize, Serialize};

/// Result of checking a log's account against the ledger commitment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LedgerConsistency {
    /// Commitment was stable and the account proof resolved to it
    Verified,
    /// Commitment was stable and the account proof did not resolve to it,
    /// or the ledger returned a malformed account
    Invalid,
    /// Commitment changed while the account was being read
    Drifted,
    /// Commitment or account could not be fetched
    Unavailable,
}

impl LedgerConsistency {
    /// Whether the check reached a conclusion
    pub fn is_determinate(&self) -> bool {
        matches!(self, LedgerConsistency::Verified | LedgerConsistency::Invalid)
    }
}

/// What happened to one SCT whose log is known
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SctOutcome {
    /// Log description, as shown to users
    pub log_name: String,
    pub log_id: String,
    /// Audit path held against the STH fetched from the log
    pub direct: bool,
    /// Audit path held against the tree head the ledger witnessed
    pub witnessed: bool,
    pub ledger: LedgerConsistency,
    /// Set when processing stopped early on an error
    pub error: Option<String>,
}

impl SctOutcome {
    /// An SCT that could not be processed
    pub fn failed(log_name: impl Into<String>, log_id: impl Into<String>, error: String) -> Self {
        Self {
            log_name: log_name.into(),
            log_id: log_id.into(),
            direct: false,
            witnessed: false,
            ledger: LedgerConsistency::Unavailable,
            error: Some(error),
        }
    }

    /// Both audit paths held; this is what the log's entry records
    pub fn is_valid(&self) -> bool {
        self.error.is_none() && self.direct && self.witnessed
    }
}

/// Aggregate result of a verification pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Verdict {
    /// Pass started, nothing published yet
    Pending,
    Valid,
    Invalid,
    /// No SCT referenced a known log
    NotVerifiable,
}

/// What a host shows for a verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TrustState {
    Unknown,
    Valid,
    Invalid,
}

impl Verdict {
    pub fn trust_state(&self) -> TrustState {
        match self {
            Verdict::Pending | Verdict::NotVerifiable => TrustState::Unknown,
            Verdict::Valid => TrustState::Valid,
            Verdict::Invalid => TrustState::Invalid,
        }
    }
}

/// Combine the outcomes of one pass
///
/// By default a failure anywhere dominates: every SCT must verify and no
/// conclusive ledger check may have failed. With `stop_at_first_valid` a
/// single verified SCT is enough. Ledger checks that could not conclude
/// only count against the verdict when `require_ledger_consistency` is set.
pub fn aggregate(outcomes: &[SctOutcome], config: &VerifierConfig) -> Verdict {
    if outcomes.is_empty() {
        return Verdict::NotVerifiable;
    }

    let ledger_ok = |outcome: &SctOutcome| {
        if outcome.ledger.is_determinate() {
            outcome.ledger == LedgerConsistency::Verified
        } else {
            !config.require_ledger_consistency
        }
    };

    let valid = if config.stop_at_first_valid {
        outcomes.iter().any(|o| o.is_valid() && ledger_ok(o))
    } else {
        outcomes.iter().all(|o| o.is_valid() && ledger_ok(o))
    };

    if valid {
        Verdict::Valid
    } else {
        Verdict::Invalid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn outcome(direct: bool, witnessed: bool, ledger: LedgerConsistency) -> SctOutcome {
        SctOutcome {
            log_name: "log".to_string(),
            log_id: "id".to_string(),
            direct,
            witnessed,
            ledger,
            error: None,
        }
    }

    #[test]
    fn test_no_outcomes_not_verifiable() {
        let verdict = aggregate(&[], &VerifierConfig::default());
        assert_eq!(verdict, Verdict::NotVerifiable);
        assert_eq!(verdict.trust_state(), TrustState::Unknown);
    }

    #[test]
    fn test_failure_dominates() {
        let outcomes = [
            outcome(true, true, LedgerConsistency::Verified),
            SctOutcome::failed("other", "id2", "STH fetch failed".to_string()),
        ];
        assert_eq!(
            aggregate(&outcomes, &VerifierConfig::default()),
            Verdict::Invalid
        );
    }

    #[test]
    fn test_first_valid_policy_accepts_any_success() {
        let outcomes = [
            SctOutcome::failed("other", "id2", "STH fetch failed".to_string()),
            outcome(true, true, LedgerConsistency::Verified),
        ];
        let config = VerifierConfig::default().with_stop_at_first_valid(true);
        assert_eq!(aggregate(&outcomes, &config), Verdict::Valid);
    }

    #[rstest]
    #[case(true, false)]
    #[case(false, true)]
    #[case(false, false)]
    fn test_both_audit_paths_required(#[case] direct: bool, #[case] witnessed: bool) {
        let outcomes = [outcome(direct, witnessed, LedgerConsistency::Verified)];
        assert_eq!(
            aggregate(&outcomes, &VerifierConfig::default()),
            Verdict::Invalid
        );
    }

    #[rstest]
    #[case(LedgerConsistency::Verified, false, Verdict::Valid)]
    #[case(LedgerConsistency::Invalid, false, Verdict::Invalid)]
    #[case(LedgerConsistency::Drifted, false, Verdict::Valid)]
    #[case(LedgerConsistency::Unavailable, false, Verdict::Valid)]
    #[case(LedgerConsistency::Verified, true, Verdict::Valid)]
    #[case(LedgerConsistency::Drifted, true, Verdict::Invalid)]
    #[case(LedgerConsistency::Unavailable, true, Verdict::Invalid)]
    fn test_ledger_policy(
        #[case] ledger: LedgerConsistency,
        #[case] require: bool,
        #[case] expected: Verdict,
    ) {
        let config = VerifierConfig::default().with_require_ledger_consistency(require);
        let outcomes = [outcome(true, true, ledger)];
        assert_eq!(aggregate(&outcomes, &config), expected);
    }

    #[test]
    fn test_determinate() {
        assert!(LedgerConsistency::Verified.is_determinate());
        assert!(LedgerConsistency::Invalid.is_determinate());
        assert!(!LedgerConsistency::Drifted.is_determinate());
        assert!(!LedgerConsistency::Unavailable.is_determinate());
    }
}
