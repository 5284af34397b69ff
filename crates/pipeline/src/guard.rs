// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Optimistic concurrency checks against the stored version token.
//!
//! A mismatch is an expected condition: the Case moved on after the message
//! was produced. Callers report it rather than fail on it.

use case_survey_domain::VersionToken;

/// How a message's token relates to the stored one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Freshness {
    /// Both timestamp and tag match.
    Current,
    /// The Case was written after the message was produced.
    Stale {
        expected: Option<VersionToken>,
        found: VersionToken,
    },
    /// The Case is no longer stored.
    Missing,
}

impl Freshness {
    #[must_use]
    pub const fn is_current(&self) -> bool {
        matches!(self, Self::Current)
    }
}

/// Compares a message token with the stored token.
///
/// A message without a token is never current against a stored Case.
#[must_use]
pub fn compare(message: Option<&VersionToken>, stored: Option<&VersionToken>) -> Freshness {
    match stored {
        None => Freshness::Missing,
        Some(found) if message == Some(found) => Freshness::Current,
        Some(found) => Freshness::Stale {
            expected: message.cloned(),
            found: found.clone(),
        },
    }
}
