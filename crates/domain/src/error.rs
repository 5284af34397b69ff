// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::lifecycle::LifecycleState;

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A lifecycle state string could not be parsed.
    InvalidLifecycleState(String),
    /// The lifecycle graph does not permit this transition.
    InvalidLifecycleTransition {
        /// The current state.
        from: LifecycleState,
        /// The requested state.
        to: LifecycleState,
    },
    /// A Case key is empty after trimming.
    InvalidCaseKey(String),
    /// A SharePoint directory is missing one of its identifiers.
    InvalidSharePointDirectory(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLifecycleState(state) => {
                write!(f, "Invalid lifecycle state: '{state}'")
            }
            Self::InvalidLifecycleTransition { from, to } => {
                write!(f, "Cannot transition survey lifecycle from {from} to {to}")
            }
            Self::InvalidCaseKey(msg) => write!(f, "Invalid case key: {msg}"),
            Self::InvalidSharePointDirectory(msg) => {
                write!(f, "Invalid SharePoint directory: {msg}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
