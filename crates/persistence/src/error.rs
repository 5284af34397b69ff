// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use case_survey_domain::{CaseId, CaseKey, DomainError, VersionToken};

/// Errors that can occur during persistence operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No Case is stored under this id and key.
    CaseNotFound { id: CaseId, key: CaseKey },
    /// A Case is already stored under this id and key.
    CaseAlreadyExists { id: CaseId, key: CaseKey },
    /// The stored version token no longer matches the one the write was based on.
    VersionConflict {
        id: CaseId,
        key: CaseKey,
        expected: Option<VersionToken>,
        found: Option<VersionToken>,
    },
    /// The Case cannot be stored as given.
    InvalidCase(DomainError),
    /// The backing store could not be reached.
    Unavailable(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CaseNotFound { id, key } => {
                write!(f, "Case not found: id={id}, key={key}")
            }
            Self::CaseAlreadyExists { id, key } => {
                write!(f, "Case already exists: id={id}, key={key}")
            }
            Self::VersionConflict {
                id,
                key,
                expected,
                found,
            } => write!(
                f,
                "Version conflict for case id={id}, key={key}: expected {}, found {}",
                describe(expected.as_ref()),
                describe(found.as_ref())
            ),
            Self::InvalidCase(err) => write!(f, "Invalid case: {err}"),
            Self::Unavailable(msg) => write!(f, "Store unavailable: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<DomainError> for StoreError {
    fn from(err: DomainError) -> Self {
        Self::InvalidCase(err)
    }
}

fn describe(token: Option<&VersionToken>) -> String {
    token.map_or_else(|| String::from("none"), ToString::to_string)
}
