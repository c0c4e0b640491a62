//! Listing filter
//!
//! All criteria are optional and combined with logical AND. Bounds are
//! inclusive on both ends.

use chrono::{DateTime, Utc};

use crate::model::{ChangeType, ConfigChange};

/// Filter for `ChangeStore::list`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeFilter {
    pub change_type: Option<ChangeType>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl ChangeFilter {
    /// Filter that matches every record
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_type(mut self, change_type: ChangeType) -> Self {
        self.change_type = Some(change_type);
        self
    }

    pub fn since(mut self, from: DateTime<Utc>) -> Self {
        self.from = Some(from);
        self
    }

    pub fn until(mut self, to: DateTime<Utc>) -> Self {
        self.to = Some(to);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.change_type.is_none() && self.from.is_none() && self.to.is_none()
    }

    /// Whether `change` satisfies every supplied criterion
    pub fn matches(&self, change: &ConfigChange) -> bool {
        if let Some(change_type) = self.change_type {
            if change.change_type != change_type {
                return false;
            }
        }
        if let Some(from) = self.from {
            if change.changed_at < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if change.changed_at > to {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, hour, 0, 0).unwrap()
    }

    fn change(change_type: ChangeType, hour: u32) -> ConfigChange {
        ConfigChange::new("Rule", change_type, false, at(hour))
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = ChangeFilter::all();
        assert!(filter.is_empty());
        assert!(filter.matches(&change(ChangeType::Add, 1)));
        assert!(filter.matches(&change(ChangeType::Delete, 23)));
    }

    #[test]
    fn test_type_filter() {
        let filter = ChangeFilter::all().with_type(ChangeType::Update);
        assert!(filter.matches(&change(ChangeType::Update, 5)));
        assert!(!filter.matches(&change(ChangeType::Add, 5)));
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let filter = ChangeFilter::all().since(at(10)).until(at(12));
        assert!(filter.matches(&change(ChangeType::Add, 10)));
        assert!(filter.matches(&change(ChangeType::Add, 12)));
        assert!(!filter.matches(&change(ChangeType::Add, 9)));
        assert!(!filter.matches(&change(ChangeType::Add, 13)));

        let just_after = ConfigChange::new("Rule", ChangeType::Add, false, at(12) + Duration::nanoseconds(1));
        assert!(!filter.matches(&just_after));
    }

    #[test]
    fn test_criteria_are_anded() {
        let filter = ChangeFilter::all().with_type(ChangeType::Delete).since(at(8));
        assert!(filter.matches(&change(ChangeType::Delete, 9)));
        assert!(!filter.matches(&change(ChangeType::Delete, 7)));
        assert!(!filter.matches(&change(ChangeType::Add, 9)));
    }
}
