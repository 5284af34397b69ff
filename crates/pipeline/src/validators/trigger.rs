// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::rules::{CaseExists, StoredEndDate, VersionMatches};
use crate::validators::{TransitionValidator, envelope};
use std::sync::Arc;

/// Preconditions for firing a scheduled end-date trigger.
///
/// Everything but the correlation id is checked against the stored Case
/// and fails as Information: a trigger whose Case has moved on is skipped,
/// not rejected.
#[must_use]
pub fn trigger_validator() -> Arc<TransitionValidator> {
    Arc::new(
        TransitionValidator::new()
            .include(envelope())
            .rule(CaseExists)
            .rule(StoredEndDate)
            .rule(VersionMatches),
    )
}
