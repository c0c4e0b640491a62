//! Payload validation
//!
//! Rules:
//! - `ruleName` is required, non-blank and at most `MAX_RULE_NAME_LEN` characters
//! - `changeType` is required and must be exactly `add`, `update` or `delete`
//! - `changedAt`, when supplied, must not be later than `now`
//!
//! Every failing field is reported, not just the first.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::change::{ChangeRequest, ChangeType};

/// Maximum length of a rule name, in characters
pub const MAX_RULE_NAME_LEN: usize = 20;

/// A single failing field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Ordered list of field errors for one payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    errors: Vec<FieldError>,
}

impl ValidationReport {
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Whether `field` has at least one error
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    pub fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<_> = self.errors.iter().map(|e| e.field).collect();
        write!(f, "invalid fields: {}", fields.join(", "))
    }
}

/// Fields of a payload that passed validation.
///
/// `id` and `changedAt` are not carried: the handlers assign both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidChange {
    pub rule_name: String,
    pub change_type: ChangeType,
    pub is_critical: bool,
}

/// Validate an inbound payload against the current time `now`.
pub fn validate(
    request: &ChangeRequest,
    now: DateTime<Utc>,
) -> Result<ValidChange, ValidationReport> {
    let mut report = ValidationReport::default();

    let rule_name = match request.rule_name.as_deref() {
        None => {
            report.push("ruleName", "RuleName is required.");
            None
        }
        Some(name) if name.trim().is_empty() => {
            report.push("ruleName", "RuleName is required.");
            None
        }
        Some(name) if name.chars().count() > MAX_RULE_NAME_LEN => {
            report.push(
                "ruleName",
                format!(
                    "RuleName cannot be longer than {} characters.",
                    MAX_RULE_NAME_LEN
                ),
            );
            None
        }
        Some(name) => Some(name.to_string()),
    };

    let change_type = match request.change_type.as_deref() {
        None | Some("") => {
            report.push("changeType", "ChangeType is required.");
            None
        }
        Some(raw) => match raw.parse::<ChangeType>() {
            Ok(change_type) => Some(change_type),
            Err(_) => {
                report.push(
                    "changeType",
                    "ChangeType must be 'add', 'update', or 'delete'.",
                );
                None
            }
        },
    };

    if let Some(changed_at) = request.changed_at {
        if changed_at > now {
            report.push("changedAt", "ChangedAt cannot be in the future.");
        }
    }

    match (rule_name, change_type) {
        (Some(rule_name), Some(change_type)) if report.is_empty() => Ok(ValidChange {
            rule_name,
            change_type,
            is_critical: request.is_critical.unwrap_or(false),
        }),
        _ => Err(report),
    }
}
