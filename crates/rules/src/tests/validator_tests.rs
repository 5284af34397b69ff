// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{ActivePerson, Address, Order, TestContext, create_order};
use crate::{Outcome, Severity, Validator};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

fn address_validator() -> Arc<Validator<Address, TestContext>> {
    Arc::new(
        Validator::<Address, TestContext>::new()
            .check(
                "street",
                |a: &Address| !a.street.is_empty(),
                |_| String::from("street is required"),
            )
            .check(
                "city",
                |a: &Address| !a.city.is_empty(),
                |_| String::from("city is required"),
            ),
    )
}

fn order_validator() -> Validator<Order, TestContext> {
    let address = address_validator();
    Validator::<Order, TestContext>::new()
        .check(
            "reference",
            |o: &Order| !o.reference.is_empty(),
            |_| String::from("reference is required"),
        )
        .rule(ActivePerson {
            field: "owner",
            select: |o| o.owner.as_deref(),
        })
        .rule(ActivePerson {
            field: "approver",
            select: |o| o.approver.as_deref(),
        })
        .nested("shipping", |o: &Order| o.shipping.as_ref(), Arc::clone(&address))
        .nested("billing", |o: &Order| o.billing.as_ref(), address)
}

#[tokio::test]
async fn test_valid_payload_produces_no_failures() {
    let ctx = TestContext::with_active(&["alice", "bob"]);

    let report = order_validator().validate(&create_order(), &ctx).await.unwrap();

    assert_eq!(report.into_outcome(), Outcome::Valid);
}

#[tokio::test]
async fn test_nested_failures_are_reported_under_path() {
    let ctx = TestContext::with_active(&["alice", "bob"]);
    let mut order = create_order();
    order.shipping = Some(Address {
        street: String::new(),
        city: String::from("Springfield"),
    });

    let report = order_validator().validate(&order, &ctx).await.unwrap();

    assert!(!report.is_valid());
    assert!(report.mentions("shipping.street"));
    assert!(!report.mentions("billing.street"));
}

#[tokio::test]
async fn test_absent_sub_record_skips_nested_rules() {
    let ctx = TestContext::with_active(&["alice", "bob"]);
    let mut order = create_order();
    order.shipping = None;

    let report = order_validator().validate(&order, &ctx).await.unwrap();

    assert!(report.is_valid());
}

#[tokio::test]
async fn test_every_failing_rule_is_aggregated() {
    let ctx = TestContext::with_active(&[]);
    let mut order = create_order();
    order.reference = String::new();

    let report = order_validator().validate(&order, &ctx).await.unwrap();

    let fields: Vec<&str> = report.failures().iter().map(|f| f.field.as_str()).collect();
    assert_eq!(fields, vec!["reference", "owner", "approver"]);
}

#[tokio::test]
async fn test_lookups_are_deduplicated_into_one_batch() {
    let ctx = TestContext::with_active(&["alice"]);
    let mut order = create_order();
    order.approver = Some(String::from("alice"));

    let report = order_validator().validate(&order, &ctx).await.unwrap();

    assert!(report.is_valid());
    assert_eq!(ctx.batches(), vec![vec![String::from("alice")]]);
}

#[tokio::test]
async fn test_no_prefetch_without_keys() {
    let ctx = TestContext::with_active(&[]);
    let mut order = create_order();
    order.owner = None;
    order.approver = None;

    let _ = order_validator().validate(&order, &ctx).await.unwrap();

    assert!(ctx.batches().is_empty());
}

#[tokio::test]
async fn test_prefetch_error_aborts_validation() {
    let ctx = TestContext {
        fail_prefetch: true,
        ..TestContext::default()
    };

    let result = order_validator().validate(&create_order(), &ctx).await;

    assert_eq!(result.unwrap_err(), "directory unavailable");
}

#[tokio::test]
async fn test_notice_failures_are_information() {
    let validator = Validator::<Order, TestContext>::new().notice(
        "reference",
        |o: &Order| o.reference.starts_with('X'),
        |o| format!("'{}' is not an X reference", o.reference),
    );

    let report = validator
        .validate(&create_order(), &TestContext::default())
        .await
        .unwrap();

    assert_eq!(report.failures()[0].severity, Severity::Information);
    assert_eq!(report.failures()[0].message, "'R-1' is not an X reference");
    assert!(matches!(report.into_outcome(), Outcome::Skipped(_)));
}

#[tokio::test]
async fn test_messages_are_only_built_on_failure() {
    static BUILT: AtomicUsize = AtomicUsize::new(0);
    let validator = Validator::<Order, TestContext>::new().check(
        "reference",
        |o: &Order| !o.reference.is_empty(),
        |_| {
            BUILT.fetch_add(1, Ordering::SeqCst);
            String::from("reference is required")
        },
    );

    let _ = validator
        .validate(&create_order(), &TestContext::default())
        .await
        .unwrap();

    assert_eq!(BUILT.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_included_validator_runs_against_same_payload() {
    let common = Arc::new(Validator::<Order, TestContext>::new().check(
        "reference",
        |o: &Order| !o.reference.is_empty(),
        |_| String::from("reference is required"),
    ));
    let validator = Validator::<Order, TestContext>::new().include(common);
    let mut order = create_order();
    order.reference = String::new();

    let report = validator
        .validate(&order, &TestContext::default())
        .await
        .unwrap();

    assert!(report.mentions("reference"));
}
