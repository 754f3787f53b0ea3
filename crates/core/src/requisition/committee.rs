//! Committee identifier resolution.
//!
//! A committee id binds a requisition's approval or rejection to a
//! specific authorization event and date. The format is deterministic:
//! the same requisition resolved at the same date yields the same id.
//! Callers persist the generated id on the requisition rather than
//! regenerating it, since the day of month is part of the key and a
//! regeneration after midnight would produce a different id.

use chrono::{DateTime, Datelike, Utc};
use procura_shared::types::RequisitionId;

/// Builds the committee identifier for a requisition decision.
///
/// Format: `COM-{year}-{month:02}-{day:02}-REQ-{requisition_id}`.
#[must_use]
pub fn committee_id(requisition_id: RequisitionId, at: DateTime<Utc>) -> String {
    format!(
        "COM-{}-{:02}-{:02}-REQ-{}",
        at.year(),
        at.month(),
        at.day(),
        requisition_id
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::str::FromStr;

    #[test]
    fn test_format() {
        let id =
            RequisitionId::from_str("0192aaaa-bbbb-7ccc-8ddd-eeeeffff0000").unwrap();
        let at = Utc.with_ymd_and_hms(2025, 3, 7, 15, 30, 0).unwrap();
        assert_eq!(
            committee_id(id, at),
            "COM-2025-03-07-REQ-0192aaaa-bbbb-7ccc-8ddd-eeeeffff0000"
        );
    }

    #[test]
    fn test_deterministic_for_same_day() {
        let id = RequisitionId::new();
        let morning = Utc.with_ymd_and_hms(2025, 11, 21, 8, 0, 0).unwrap();
        let evening = Utc.with_ymd_and_hms(2025, 11, 21, 20, 0, 0).unwrap();
        assert_eq!(committee_id(id, morning), committee_id(id, evening));
    }

    #[test]
    fn test_changes_across_midnight() {
        let id = RequisitionId::new();
        let before = Utc.with_ymd_and_hms(2025, 11, 21, 23, 59, 59).unwrap();
        let after = Utc.with_ymd_and_hms(2025, 11, 22, 0, 0, 1).unwrap();
        assert_ne!(committee_id(id, before), committee_id(id, after));
    }
}
