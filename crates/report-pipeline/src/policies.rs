//! Acceptance policies

use serde::{Deserialize, Serialize};

/// Policy for handling inputs that cannot be converted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcceptancePolicy {
    /// Report the bad input and continue with the rest of the batch
    #[default]
    SkipInvalid,

    /// Fail the entire batch on the first bad input
    FailAll,
}

impl AcceptancePolicy {
    /// Whether a single bad input stops the batch.
    pub fn rejects_on_failure(self) -> bool {
        matches!(self, Self::FailAll)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_skips() {
        assert_eq!(AcceptancePolicy::default(), AcceptancePolicy::SkipInvalid);
        assert!(!AcceptancePolicy::SkipInvalid.rejects_on_failure());
        assert!(AcceptancePolicy::FailAll.rejects_on_failure());
    }

    #[test]
    fn test_policy_names() {
        let policy: AcceptancePolicy = serde_yaml::from_str("fail_all").unwrap();
        assert_eq!(policy, AcceptancePolicy::FailAll);
        assert_eq!(
            serde_yaml::to_string(&AcceptancePolicy::SkipInvalid).unwrap().trim(),
            "skip_invalid"
        );
    }
}
