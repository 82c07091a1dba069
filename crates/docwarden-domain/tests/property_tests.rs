//! Property-based tests for expiry classification and value objects
//!
//! These tests verify that the classifier keeps its three disjoint bands for
//! any date and window, and that identifiers survive string roundtrips.

use chrono::{Days, NaiveDate};
use proptest::prelude::*;

use docwarden_domain::expiry::{classify, ExpiryPolicy, ExpiryStatus};
use docwarden_domain::value_objects::*;

fn base_day() -> impl Strategy<Value = NaiveDate> {
    // 2000-01-01 .. roughly 2080
    (0u64..30_000).prop_map(|offset| {
        NaiveDate::from_ymd_opt(2000, 1, 1)
            .unwrap()
            .checked_add_days(Days::new(offset))
            .unwrap()
    })
}

// ============================================================================
// Classifier Property Tests
// ============================================================================

proptest! {
    /// Expired iff the expiry date is today or earlier
    #[test]
    fn test_expired_iff_on_or_before_today(today in base_day(), back in 0u64..5_000) {
        let expiry = today.checked_sub_days(Days::new(back)).unwrap();
        prop_assert_eq!(classify(expiry, today, 7), ExpiryStatus::Expired);
    }

    /// Dates inside (today, today + window] are expiring soon
    #[test]
    fn test_expiring_soon_inside_window(today in base_day(), window in 1u32..60, ahead in 1u64..60) {
        prop_assume!(ahead <= u64::from(window));
        let expiry = today.checked_add_days(Days::new(ahead)).unwrap();
        prop_assert_eq!(classify(expiry, today, window), ExpiryStatus::ExpiringSoon);
    }

    /// Dates past the window are ok
    #[test]
    fn test_ok_beyond_window(today in base_day(), window in 1u32..60, extra in 1u64..2_000) {
        let expiry = today
            .checked_add_days(Days::new(u64::from(window) + extra))
            .unwrap();
        prop_assert_eq!(classify(expiry, today, window), ExpiryStatus::Ok);
    }

    /// Later expiry dates never classify as more urgent than earlier ones
    #[test]
    fn test_classification_is_monotonic(today in base_day(), a in -100i64..100, b in -100i64..100) {
        fn rank(status: ExpiryStatus) -> u8 {
            match status {
                ExpiryStatus::Expired => 0,
                ExpiryStatus::ExpiringSoon => 1,
                ExpiryStatus::Ok => 2,
            }
        }
        let shift = |d: i64| {
            if d >= 0 {
                today.checked_add_days(Days::new(d as u64)).unwrap()
            } else {
                today.checked_sub_days(Days::new(d.unsigned_abs())).unwrap()
            }
        };
        let (early, late) = if a <= b { (a, b) } else { (b, a) };
        let policy = ExpiryPolicy::default();
        prop_assert!(rank(policy.classify(shift(early), today)) <= rank(policy.classify(shift(late), today)));
    }
}

// ============================================================================
// Identifier Property Tests
// ============================================================================

proptest! {
    /// DocumentId roundtrip: to_string -> from_string == original
    #[test]
    fn test_document_id_roundtrip(_dummy in 0u8..1) {
        let id = DocumentId::new();
        prop_assert_eq!(DocumentId::from_string(&id.to_string()).unwrap(), id);
    }

    /// DocumentOwner JSON roundtrip keeps the discriminant
    #[test]
    fn test_owner_json_roundtrip(is_member in any::<bool>()) {
        let owner = if is_member {
            DocumentOwner::Member(MemberId::new())
        } else {
            DocumentOwner::Organization(OrganizationId::new())
        };
        let json = serde_json::to_string(&owner).unwrap();
        let back: DocumentOwner = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back, owner);
    }
}

// ============================================================================
// Fixed boundary cases
// ============================================================================

#[test]
fn test_documented_boundaries() {
    let today = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
    let day = |n: u64| today.checked_add_days(Days::new(n)).unwrap();

    assert_eq!(classify(today, today, 7), ExpiryStatus::Expired);
    assert_eq!(classify(day(7), today, 7), ExpiryStatus::ExpiringSoon);
    assert_eq!(classify(day(8), today, 7), ExpiryStatus::Ok);
}
