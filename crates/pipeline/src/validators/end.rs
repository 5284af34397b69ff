// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::rules::LifecycleIn;
use crate::validators::{TransitionValidator, envelope, manager, share_point_directory};
use case_survey_domain::LifecycleState;
use std::sync::Arc;

/// Preconditions for closing a survey whose end date has passed.
#[must_use]
pub fn end_validator() -> Arc<TransitionValidator> {
    Arc::new(
        TransitionValidator::new()
            .include(envelope())
            .rule(LifecycleIn::new(&[LifecycleState::SurveyClosing]))
            .include(manager())
            .include(share_point_directory()),
    )
}
