// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use case_survey_audit::{AuditEvent, StateSnapshot};
use case_survey_domain::Case;

/// Converts a Case to a snapshot for audit purposes.
#[must_use]
pub fn snapshot(case: &Case) -> StateSnapshot {
    StateSnapshot::new(case.summary())
}

/// The result of a successful lifecycle transition.
///
/// Transitions are atomic: they either succeed completely or fail without side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// The Case after the transition. Its version token is still the one it
    /// was read with; the store assigns a new one on write.
    pub new_case: Case,
    /// The audit event recording this transition.
    pub audit_event: AuditEvent,
}

impl TransitionResult {
    /// Returns true if the transition did not change the Case.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.audit_event.is_noop()
    }
}
