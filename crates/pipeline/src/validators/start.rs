// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::rules::LifecycleIn;
use crate::validators::{TransitionRequest, TransitionValidator, envelope, manager};
use case_survey_domain::{LifecycleState, present};
use std::sync::Arc;

/// Preconditions for opening the survey of a new Case.
#[must_use]
pub fn start_validator() -> Arc<TransitionValidator> {
    Arc::new(
        TransitionValidator::new()
            .include(envelope())
            .rule(LifecycleIn::new(&[LifecycleState::New]))
            .check(
                "endDate",
                |r: &TransitionRequest| r.case.end_date.is_some(),
                |_| String::from("End date is required"),
            )
            .check(
                "caseName",
                |r: &TransitionRequest| present(r.case.case_name.as_deref()).is_some(),
                |_| String::from("Case name is required"),
            )
            .check(
                "uniqueId",
                |r: &TransitionRequest| present(r.case.unique_id.as_deref()).is_some(),
                |_| String::from("Unique id is required"),
            )
            .check(
                "primaryCapability",
                |r: &TransitionRequest| present(r.case.primary_capability.as_deref()).is_some(),
                |_| String::from("Primary capability is required"),
            )
            .include(manager()),
    )
}
