// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::context::ValidationContext;
use crate::rules::ActiveEmployee;
use crate::validators::{TransitionRequest, TransitionValidator};
use case_survey_domain::{Case, SharePointDirectory};
use case_survey_rules::Validator;
use std::sync::{Arc, LazyLock};

static ENVELOPE: LazyLock<Arc<TransitionValidator>> = LazyLock::new(|| {
    Arc::new(TransitionValidator::new().check(
        "correlationId",
        |r: &TransitionRequest| !r.correlation_id.is_nil(),
        |_| String::from("Correlation id must not be empty"),
    ))
});

static MANAGER: LazyLock<Arc<TransitionValidator>> = LazyLock::new(|| {
    Arc::new(
        TransitionValidator::new()
            .check(
                "managerEmployeeCode",
                |r: &TransitionRequest| r.case.manager_code().is_some(),
                |_| String::from("Manager employee code is required"),
            )
            .rule(ActiveEmployee::new("managerEmployeeCode", Case::manager_code)),
    )
});

static DIRECTORY: LazyLock<Arc<Validator<SharePointDirectory, ValidationContext>>> =
    LazyLock::new(|| {
        Arc::new(
            Validator::new()
                .check(
                    "directoryId",
                    |d: &SharePointDirectory| !d.directory_id.trim().is_empty(),
                    |_| String::from("Directory id must not be empty"),
                )
                .check(
                    "driveId",
                    |d: &SharePointDirectory| !d.drive_id.trim().is_empty(),
                    |_| String::from("Drive id must not be empty"),
                ),
        )
    });

static SHARE_POINT: LazyLock<Arc<TransitionValidator>> = LazyLock::new(|| {
    Arc::new(
        TransitionValidator::new()
            .check(
                "sharePointDirectory",
                |r: &TransitionRequest| r.case.share_point_directory.is_some(),
                |_| String::from("SharePoint directory is required"),
            )
            .nested(
                "sharePointDirectory",
                |r: &TransitionRequest| r.case.share_point_directory.as_ref(),
                Arc::clone(&DIRECTORY),
            ),
    )
});

/// Requires a non-nil correlation id.
#[must_use]
pub fn envelope() -> Arc<TransitionValidator> {
    Arc::clone(&ENVELOPE)
}

/// Requires a manager who is an active employee.
#[must_use]
pub fn manager() -> Arc<TransitionValidator> {
    Arc::clone(&MANAGER)
}

/// Requires a SharePoint directory with both identifiers set.
#[must_use]
pub fn share_point_directory() -> Arc<TransitionValidator> {
    Arc::clone(&SHARE_POINT)
}
