mod common;

use common::{date, harness, harness_with};
use stamp_card::{DuplicatePolicy, ProfileContext, Rejection, StampCardConfig, StampOutcome};

#[test]
fn test_counts_one_to_four_issue_no_coupon() {
    let h = harness();
    h.service.ensure_profile().unwrap();

    for expected in 1..=4 {
        let outcome = h.stamp_and_sleep(&format!("shop-{}", expected));
        assert_eq!(
            outcome,
            StampOutcome::Accepted {
                count: expected,
                coupon: None
            }
        );
        assert_eq!(h.service.get_count().unwrap(), expected);
    }
    assert!(h.service.list_active_coupons().unwrap().is_empty());
}

#[test]
fn test_fifth_stamp_issues_one_coupon_and_resets() {
    let h = harness();
    h.service.ensure_profile().unwrap();
    for i in 1..=4 {
        h.stamp_and_sleep(&format!("shop-{}", i));
    }

    let outcome = h.service.request_stamp(Some("shop-5")).unwrap();
    assert_eq!(outcome.count(), Some(5));

    let coupon = outcome.coupon().expect("coupon issued on fifth stamp").clone();
    assert_eq!(coupon.issued, date(2024, 6, 5));
    assert_eq!(coupon.expiry, date(2024, 7, 5));
    assert!(!coupon.used);

    assert_eq!(h.service.get_count().unwrap(), 0);
    assert_eq!(h.service.list_active_coupons().unwrap(), vec![coupon.clone()]);
    // The completing stamp is still recorded
    assert!(h.service.is_stamped("shop-5").unwrap());

    let notes = h.ui.notifications();
    assert_eq!(
        &notes[notes.len() - 2..],
        &[
            "Stamp collected! Current stamps: 5".to_string(),
            format!("Coupon issued! Code: {}", coupon.code),
        ]
    );
}

#[test]
fn test_same_source_same_day_is_rejected() {
    let h = harness();
    h.service.ensure_profile().unwrap();

    assert!(h.service.request_stamp(Some("A")).unwrap().is_accepted());
    let outcome = h.service.request_stamp(Some("A")).unwrap();

    assert_eq!(outcome, StampOutcome::Rejected(Rejection::AlreadyStampedToday));
    assert_eq!(h.service.get_count().unwrap(), 1);
    assert_eq!(
        h.ui.last_notification().as_deref(),
        Some("This stamp has already been collected today.")
    );
}

#[test]
fn test_other_source_same_day_hits_daily_limit() {
    let h = harness();
    h.service.ensure_profile().unwrap();

    h.service.request_stamp(Some("A")).unwrap();
    let outcome = h.service.request_stamp(Some("B")).unwrap();

    assert_eq!(outcome.rejection(), Some(Rejection::DailyLimitReached));
    assert_eq!(h.service.get_count().unwrap(), 1);
    assert!(!h.service.is_stamped("B").unwrap());
}

#[test]
fn test_same_source_next_day_is_accepted() {
    let h = harness();
    h.stamp_and_sleep("A");

    let outcome = h.service.request_stamp(Some("A")).unwrap();
    assert_eq!(outcome.count(), Some(2));
    assert_eq!(h.service.stamped_sources().unwrap(), vec!["A"]);
}

#[test]
fn test_per_source_policy_allows_several_sources_a_day() {
    let h = harness_with(
        StampCardConfig::new().with_duplicate_policy(DuplicatePolicy::PerSourcePerDay),
        ProfileContext::default_profile(),
    );

    assert_eq!(h.service.request_stamp(Some("A")).unwrap().count(), Some(1));
    assert_eq!(h.service.request_stamp(Some("B")).unwrap().count(), Some(2));
    assert_eq!(
        h.service.request_stamp(Some("A")).unwrap(),
        StampOutcome::Rejected(Rejection::AlreadyStampedToday)
    );
}

#[test]
fn test_custom_threshold() {
    let h = harness_with(
        StampCardConfig::new()
            .with_threshold(2)
            .with_coupon_prefix("CAFE")
            .with_coupon_valid_months(3),
        ProfileContext::default_profile(),
    );

    h.stamp_and_sleep("A");
    let outcome = h.stamp_and_sleep("A");

    let coupon = outcome.coupon().unwrap();
    assert!(coupon.code.starts_with("CAFE"));
    assert_eq!(coupon.expiry, date(2024, 9, 2));
    assert_eq!(h.service.get_count().unwrap(), 0);
}

#[test]
fn test_full_card_scenario() {
    let h = harness();
    h.service.ensure_profile().unwrap();

    // Day 1
    assert_eq!(h.service.request_stamp(Some("A")).unwrap().count(), Some(1));
    assert_eq!(
        h.service.request_stamp(Some("A")).unwrap(),
        StampOutcome::Rejected(Rejection::AlreadyStampedToday)
    );

    // Days 2..=5 with distinct sources
    let mut last = StampOutcome::NoRequest;
    for (offset, source) in ["B", "C", "D", "E"].into_iter().enumerate() {
        h.clock.advance_days(1);
        last = h.service.request_stamp(Some(source)).unwrap();
        assert_eq!(last.count(), Some(offset as u32 + 2));
    }

    assert_eq!(last.count(), Some(5));
    assert!(last.coupon().is_some());
    assert_eq!(h.service.get_count().unwrap(), 0);
    assert_eq!(h.service.list_active_coupons().unwrap().len(), 1);
    assert_eq!(h.service.stamped_sources().unwrap(), vec!["A", "B", "C", "D", "E"]);
}

#[test]
fn test_second_card_issues_second_coupon() {
    let h = harness();
    for i in 0..10 {
        h.stamp_and_sleep(&format!("S{}", i % 3));
    }

    let coupons = h.service.list_active_coupons().unwrap();
    assert_eq!(coupons.len(), 2);
    assert_ne!(coupons[0].code, coupons[1].code);
    assert!(coupons[0].issued < coupons[1].issued);
}
