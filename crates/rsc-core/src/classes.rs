//! Class-section identifiers and the school's class catalog.
//!
//! A class section (e.g. `JSS 1A`) scopes one sheet in the record workbook
//! and one subdirectory of the results tree. A grade (e.g. `JSS 1`) groups
//! sections for staff access.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::CoreError;

/// Grade levels, in display order.
pub const GRADES: &[&str] = &["JSS 1", "JSS 2", "JSS 3", "SS 1", "SS 2", "SS 3"];

/// Section arms available per grade.
const ARMS: &[(&str, &str)] = &[
    ("JSS 1", "ABCDEFG"),
    ("JSS 2", "ABCDEF"),
    ("JSS 3", "ABCDEF"),
    ("SS 1", "ABCDEF"),
    ("SS 2", "ABCDEF"),
    ("SS 3", "ABC"),
];

/// Validated class-section name.
///
/// The name is used verbatim as a sheet name and as a directory name, so it
/// must be non-empty and must not contain path separators or `..`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClassId(String);

impl ClassId {
    /// Parse and validate a class name. Surrounding whitespace is trimmed.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` for empty names or names that could
    /// escape the results directory.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let name = raw.trim();
        if name.is_empty() {
            return Err(CoreError::Validation("class name is empty".into()));
        }
        if name.contains(['/', '\\']) || name.contains("..") {
            return Err(CoreError::Validation(format!(
                "class name '{name}' must not contain path separators or '..'"
            )));
        }
        Ok(Self(name.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Grade this section belongs to, if it is part of the catalog's naming
    /// scheme (`"JSS 1A"` → `"JSS 1"`).
    #[must_use]
    pub fn grade(&self) -> Option<&'static str> {
        grade_of(&self.0)
    }

    /// Whether this class appears in the school catalog.
    #[must_use]
    pub fn is_cataloged(&self) -> bool {
        catalog().iter().any(|class| class == self)
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ClassId {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ClassId> for String {
    fn from(value: ClassId) -> Self {
        value.0
    }
}

impl AsRef<str> for ClassId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Every cataloged class section, grade by grade.
#[must_use]
pub fn catalog() -> Vec<ClassId> {
    ARMS.iter()
        .flat_map(|(grade, arms)| {
            arms.chars()
                .map(move |arm| ClassId(format!("{grade}{arm}")))
        })
        .collect()
}

/// Longest grade label that prefixes `name`.
///
/// Longest-match matters: `"SS 1A"` must not resolve through a shorter label.
#[must_use]
pub fn grade_of(name: &str) -> Option<&'static str> {
    GRADES
        .iter()
        .filter(|grade| name.trim().starts_with(**grade))
        .max_by_key(|grade| grade.len())
        .copied()
}

/// Whether `label` names one of the known grades.
#[must_use]
pub fn is_grade(label: &str) -> bool {
    GRADES.contains(&label.trim())
}
