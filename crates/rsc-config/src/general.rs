//! General portal behavior.

use rsc_core::GuardPolicy;
use serde::{Deserialize, Serialize};

const fn default_min_score() -> u32 {
    7
}

const fn default_max_score() -> u32 {
    10
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Behavior of the submission guard when a class table cannot be read.
    #[serde(default)]
    pub guard_policy: GuardPolicy,

    /// Lower bound (inclusive) for scores assigned at submission time.
    #[serde(default = "default_min_score")]
    pub min_score: u32,

    /// Upper bound (inclusive) for scores assigned at submission time.
    #[serde(default = "default_max_score")]
    pub max_score: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            guard_policy: GuardPolicy::default(),
            min_score: default_min_score(),
            max_score: default_max_score(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = GeneralConfig::default();
        assert_eq!(config.guard_policy, GuardPolicy::FailOpen);
        assert_eq!(config.min_score, 7);
        assert_eq!(config.max_score, 10);
    }
}
