// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::validators::{TransitionRequest, TransitionValidator, envelope};
use case_survey_domain::VersionToken;
use std::sync::Arc;

/// Preconditions for scheduling the end-date trigger.
#[must_use]
pub fn schedule_validator() -> Arc<TransitionValidator> {
    Arc::new(
        TransitionValidator::new()
            .include(envelope())
            .check(
                "endDate",
                |r: &TransitionRequest| r.case.end_date.is_some(),
                |_| String::from("End date is required"),
            )
            .check(
                "versionToken",
                |r: &TransitionRequest| {
                    r.case
                        .version_token
                        .as_ref()
                        .is_some_and(VersionToken::is_assigned)
                },
                |_| String::from("Version token is required"),
            ),
    )
}
