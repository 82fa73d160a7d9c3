use std::borrow::Borrow;
use std::fmt;

use serde::Serialize;

use crate::error::{CompositionError, Result};

/// Maximum length of a logical id accepted by the provisioning engine.
const MAX_LOGICAL_ID_LEN: usize = 255;

/// Key of a resource (or output) inside a template.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct LogicalId(String);

impl LogicalId {
    /// Creates a logical id, rejecting anything that is not 1-255 ASCII alphanumerics.
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if is_valid_logical_id(&id) {
            Ok(Self(id))
        } else {
            Err(CompositionError::InvalidLogicalId(id))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LogicalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for LogicalId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for LogicalId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn is_valid_logical_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_LOGICAL_ID_LEN
        && id.chars().all(|c| c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_alphanumeric_ids() {
        let id = LogicalId::new("MlsFootballPlayers").unwrap();
        assert_eq!(id.as_str(), "MlsFootballPlayers");
        assert_eq!(id.to_string(), "MlsFootballPlayers");
    }

    #[test]
    fn test_rejects_empty_id() {
        assert_eq!(
            LogicalId::new(""),
            Err(CompositionError::InvalidLogicalId(String::new()))
        );
    }

    #[test]
    fn test_rejects_non_alphanumeric_ids() {
        for id in ["Football-Api", "Football Api", "Football_Api", "Fußball"] {
            assert!(LogicalId::new(id).is_err(), "{id} should be rejected");
        }
    }

    #[test]
    fn test_rejects_overlong_id() {
        assert!(LogicalId::new("a".repeat(255)).is_ok());
        assert!(LogicalId::new("a".repeat(256)).is_err());
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let id = LogicalId::new("FootballApi").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"FootballApi\"");
    }
}
