//! Record model for configuration-change events
//!
//! - `ConfigChange`: the stored record
//! - `ChangeType`: the fixed `add | update | delete` enumeration
//! - `ChangeRequest`: the inbound payload, checked by `validate`
//!
//! Validation is explicit and runs before any storage mutation.

mod change;
mod validation;

pub use change::{ChangeRequest, ChangeType, ConfigChange, ParseChangeTypeError};
pub use validation::{
    validate, FieldError, ValidChange, ValidationReport, MAX_RULE_NAME_LEN,
};
