//! Staff access keys.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AccessConfig {
    /// Key that unlocks the audit ledger and roster import.
    #[serde(default)]
    pub admin_key: String,

    /// Password per grade label (e.g., `"JSS 1" = "..."`).
    #[serde(default)]
    pub class_passwords: BTreeMap<String, String>,
}

impl AccessConfig {
    /// Password configured for a grade, if any. Grade labels are trimmed.
    #[must_use]
    pub fn password_for(&self, grade: &str) -> Option<&str> {
        self.class_passwords
            .get(grade.trim())
            .map(String::as_str)
            .filter(|password| !password.is_empty())
    }

    /// Whether an admin key has been configured.
    #[must_use]
    pub fn has_admin_key(&self) -> bool {
        !self.admin_key.is_empty()
    }
}
