// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Precondition rule sets, one per lifecycle transition.
//!
//! Validators are built once per handler and shared across concurrent
//! deliveries. The envelope, manager and SharePoint directory rule sets are
//! built once per process and included by reference.

mod common;
mod end;
mod schedule;
mod start;
mod trigger;
mod update;

use crate::context::ValidationContext;
use case_survey_domain::Case;
use case_survey_rules::Validator;
use uuid::Uuid;

pub use common::{envelope, manager, share_point_directory};
pub use end::end_validator;
pub use schedule::schedule_validator;
pub use start::start_validator;
pub use trigger::trigger_validator;
pub use update::update_validator;

/// The payload every transition validator checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionRequest {
    pub correlation_id: Uuid,
    pub case: Case,
}

impl TransitionRequest {
    #[must_use]
    pub const fn new(correlation_id: Uuid, case: Case) -> Self {
        Self {
            correlation_id,
            case,
        }
    }
}

pub type TransitionValidator = Validator<TransitionRequest, ValidationContext>;
