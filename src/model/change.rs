//! Configuration change record types

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of configuration change.
///
/// Serialized lower-case; parsing is case-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Add,
    Update,
    Delete,
}

impl ChangeType {
    /// Returns the wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeType::Add => "add",
            ChangeType::Update => "update",
            ChangeType::Delete => "delete",
        }
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Returned when a string is not one of `add`, `update`, `delete`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown change type: '{0}'")]
pub struct ParseChangeTypeError(pub String);

impl FromStr for ChangeType {
    type Err = ParseChangeTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "add" => Ok(ChangeType::Add),
            "update" => Ok(ChangeType::Update),
            "delete" => Ok(ChangeType::Delete),
            other => Err(ParseChangeTypeError(other.to_string())),
        }
    }
}

/// One recorded configuration-change event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigChange {
    /// Assigned by the service at creation, never by the caller
    pub id: Uuid,
    /// Name of the affected rule (1..=20 characters)
    pub rule_name: String,
    pub change_type: ChangeType,
    /// Critical changes are logged at WARN by the handlers
    pub is_critical: bool,
    /// Stamped with the current time on create and on update
    pub changed_at: DateTime<Utc>,
}

impl ConfigChange {
    /// Create a record with a fresh id, stamped at `changed_at`.
    pub fn new(
        rule_name: impl Into<String>,
        change_type: ChangeType,
        is_critical: bool,
        changed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            rule_name: rule_name.into(),
            change_type,
            is_critical,
            changed_at,
        }
    }
}

/// Inbound create/update payload.
///
/// Every field is optional at the deserialization level so that missing or
/// malformed values surface as field errors from `validate` rather than as an
/// opaque body rejection. `id` is accepted and ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRequest {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub rule_name: Option<String>,
    #[serde(default)]
    pub change_type: Option<String>,
    #[serde(default)]
    pub is_critical: Option<bool>,
    #[serde(default)]
    pub changed_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_change_type_parse_is_case_sensitive() {
        assert_eq!("add".parse::<ChangeType>(), Ok(ChangeType::Add));
        assert_eq!("delete".parse::<ChangeType>(), Ok(ChangeType::Delete));
        assert!("Add".parse::<ChangeType>().is_err());
        assert!("remove".parse::<ChangeType>().is_err());
        assert!("".parse::<ChangeType>().is_err());
    }

    #[test]
    fn test_record_json_shape() {
        let change = ConfigChange::new("FirewallRule1", ChangeType::Add, false, Utc::now());
        let value = serde_json::to_value(&change).unwrap();

        assert_eq!(value["id"], json!(change.id.to_string()));
        assert_eq!(value["ruleName"], "FirewallRule1");
        assert_eq!(value["changeType"], "add");
        assert_eq!(value["isCritical"], false);
        assert!(value["changedAt"].is_string());
    }

    #[test]
    fn test_request_accepts_partial_payload() {
        let request: ChangeRequest =
            serde_json::from_value(json!({ "ruleName": "Rule" })).unwrap();
        assert_eq!(request.rule_name.as_deref(), Some("Rule"));
        assert!(request.change_type.is_none());
        assert!(request.is_critical.is_none());
        assert!(request.changed_at.is_none());
    }
}
