//! Gesture identifiers as used for sample labels and library entries.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Rejected gesture names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("gesture name must not be empty")]
    EmptyName,
}

/// A validated gesture label: trimmed, whitespace runs collapsed to `_`,
/// never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GestureName(String);

impl GestureName {
    /// Normalize user input into a label.
    ///
    /// `"  peace  sign "` becomes `"peace_sign"`; blank input is rejected.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let normalized = raw.split_whitespace().collect::<Vec<_>>().join("_");
        if normalized.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Label as shown to people: underscores become spaces.
    pub fn display_name(&self) -> String {
        display_name(&self.0)
    }
}

/// Render any label, validated or not, for display.
pub fn display_name(label: &str) -> String {
    label.replace('_', " ")
}

impl fmt::Display for GestureName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for GestureName {
    type Error = ValidationError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw)
    }
}

impl From<GestureName> for String {
    fn from(name: GestureName) -> Self {
        name.0
    }
}

impl std::str::FromStr for GestureName {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
