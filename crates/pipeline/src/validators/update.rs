// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::rules::LifecycleIn;
use crate::validators::{TransitionValidator, envelope, manager, share_point_directory};
use case_survey_domain::LifecycleState;
use std::sync::Arc;

/// Preconditions for refreshing an open survey, or archiving a deleted one.
///
/// Runs against the stored Case, never the message snapshot.
#[must_use]
pub fn update_validator() -> Arc<TransitionValidator> {
    Arc::new(
        TransitionValidator::new()
            .include(envelope())
            .rule(LifecycleIn::new(&[
                LifecycleState::SurveyOpened,
                LifecycleState::Deleted,
            ]))
            .include(manager())
            .include(share_point_directory()),
    )
}
