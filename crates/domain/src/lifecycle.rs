// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Survey lifecycle states and the transition graph between them.
//!
//! A Case holds exactly one lifecycle state. The state only changes through a
//! lifecycle transition action; nothing in this module advances it on its own.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The lifecycle state of a Case's survey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum LifecycleState {
    /// Case created, survey not yet started.
    #[default]
    New,
    /// A survey has been scheduled for the Case.
    SurveyScheduled,
    /// The survey is being provisioned.
    SurveyOpening,
    /// The survey is open and accepting responses.
    SurveyOpened,
    /// The end date passed and the survey is being closed.
    SurveyClosing,
    /// The survey is closed.
    SurveyClosed,
    /// Results have been published.
    Published,
    /// The Case was deleted while its survey was open; the survey is archived.
    SurveyOpenedArchive,
    /// The Case was deleted.
    Deleted,
}

impl LifecycleState {
    /// All states, in lifecycle order.
    pub const ALL: [Self; 9] = [
        Self::New,
        Self::SurveyScheduled,
        Self::SurveyOpening,
        Self::SurveyOpened,
        Self::SurveyClosing,
        Self::SurveyClosed,
        Self::Published,
        Self::SurveyOpenedArchive,
        Self::Deleted,
    ];

    /// Returns the string representation used on the wire and in logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::New => "New",
            Self::SurveyScheduled => "SurveyScheduled",
            Self::SurveyOpening => "SurveyOpening",
            Self::SurveyOpened => "SurveyOpened",
            Self::SurveyClosing => "SurveyClosing",
            Self::SurveyClosed => "SurveyClosed",
            Self::Published => "Published",
            Self::SurveyOpenedArchive => "SurveyOpenedArchive",
            Self::Deleted => "Deleted",
        }
    }

    /// Checks if a transition from this state to `target` is permitted.
    ///
    /// Valid transitions are:
    /// - New → `SurveyScheduled` | `SurveyOpened`
    /// - `SurveyScheduled` → `SurveyOpening` | `SurveyOpened`
    /// - `SurveyOpening` → `SurveyOpened`
    /// - `SurveyOpened` → `SurveyOpened` (refresh) | `SurveyClosing`
    /// - `SurveyClosing` → `SurveyClosed`
    /// - `SurveyClosed` → Published
    /// - Deleted → `SurveyOpenedArchive`
    /// - any state other than Deleted and `SurveyOpenedArchive` → Deleted
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        if matches!(target, Self::Deleted) {
            return !matches!(self, Self::Deleted | Self::SurveyOpenedArchive);
        }
        matches!(
            (self, target),
            (Self::New, Self::SurveyScheduled | Self::SurveyOpened)
                | (Self::SurveyScheduled, Self::SurveyOpening | Self::SurveyOpened)
                | (Self::SurveyOpening | Self::SurveyOpened, Self::SurveyOpened)
                | (Self::SurveyOpened, Self::SurveyClosing)
                | (Self::SurveyClosing, Self::SurveyClosed)
                | (Self::SurveyClosed, Self::Published)
                | (Self::Deleted, Self::SurveyOpenedArchive)
        )
    }

    /// Validates a transition, returning a domain error when it is not permitted.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidLifecycleTransition` if the lifecycle graph
    /// has no edge from this state to `target`.
    pub fn validate_transition(&self, target: Self) -> Result<(), DomainError> {
        if self.can_transition_to(target) {
            Ok(())
        } else {
            Err(DomainError::InvalidLifecycleTransition {
                from: *self,
                to: target,
            })
        }
    }
}

impl FromStr for LifecycleState {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| DomainError::InvalidLifecycleState(s.to_string()))
    }
}

impl std::fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
