// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{Outcome, RuleFailure, Severity, ValidationReport};

fn failure(field: &str, severity: Severity) -> RuleFailure {
    RuleFailure::new(field.to_string(), String::from("failed"), severity)
}

#[test]
fn test_empty_report_is_valid() {
    let report = ValidationReport::new();
    assert!(report.is_valid());
    assert_eq!(report.into_outcome(), Outcome::Valid);
}

#[test]
fn test_information_only_report_is_skipped() {
    let mut report = ValidationReport::new();
    report.push(failure("versionToken", Severity::Information));

    assert!(report.is_valid());
    assert!(matches!(report.into_outcome(), Outcome::Skipped(f) if f.len() == 1));
}

#[test]
fn test_any_error_makes_report_invalid() {
    let mut report = ValidationReport::new();
    report.push(failure("versionToken", Severity::Information));
    report.push(failure("lifecycleState", Severity::Error));

    assert!(!report.is_valid());
    match report.into_outcome() {
        Outcome::Invalid(failures) => {
            assert_eq!(failures.len(), 2);
            assert_eq!(failures[1].field, "lifecycleState");
        }
        other => panic!("expected invalid outcome, got {other:?}"),
    }
}

#[test]
fn test_report_display_joins_failures() {
    let mut report = ValidationReport::new();
    report.push(failure("a", Severity::Error));
    report.push(failure("b", Severity::Information));

    assert_eq!(
        report.to_string(),
        "[error] a: failed; [information] b: failed"
    );
    assert!(report.mentions("b"));
    assert!(!report.mentions("c"));
}
