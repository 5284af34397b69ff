// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod case_store_tests;

use case_survey_audit::{Actor, Cause};
use case_survey_domain::{Case, CaseId, CaseKey, LifecycleState};

pub fn create_test_actor() -> Actor {
    Actor::new(String::from("test-actor"), String::from("service"))
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("test-cause"), String::from("Test operation"))
}

/// Creates an unsaved Case with no version token.
pub fn create_test_case(id: &str, key: &str) -> Case {
    let mut case: Case = Case::new(CaseId::new(id), CaseKey::new(key));
    case.manager_employee_code = Some(String::from("E1"));
    case
}

/// Creates an unsaved Case in the given lifecycle state.
pub fn create_test_case_in(state: LifecycleState) -> Case {
    let mut case: Case = create_test_case("case-1", "C-100");
    case.lifecycle_state = state;
    case
}
