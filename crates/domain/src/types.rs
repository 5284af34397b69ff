// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::lifecycle::LifecycleState;
use crate::version::VersionToken;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// The opaque, immutable identifier of a Case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CaseId(String);

impl CaseId {
    /// Creates a new `CaseId`.
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self(value.to_string())
    }

    /// Returns the identifier value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CaseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The business code of a Case.
///
/// Keys are whitespace-trimmed on construction, including when deserialized,
/// so `" C-100 "` and `"C-100"` are the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct CaseKey(String);

impl CaseKey {
    /// Creates a new `CaseKey`, trimming surrounding whitespace.
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self(value.trim().to_string())
    }

    /// Returns the trimmed key value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }
}

impl From<String> for CaseKey {
    fn from(value: String) -> Self {
        Self::new(&value)
    }
}

impl From<CaseKey> for String {
    fn from(key: CaseKey) -> Self {
        key.0
    }
}

impl std::fmt::Display for CaseKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The document-library location provisioned for a Case's survey.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharePointDirectory {
    /// The directory (folder) identifier.
    pub directory_id: String,
    /// The drive identifier the directory lives in.
    pub drive_id: String,
}

impl SharePointDirectory {
    /// Creates a new `SharePointDirectory`.
    #[must_use]
    pub fn new(directory_id: &str, drive_id: &str) -> Self {
        Self {
            directory_id: directory_id.to_string(),
            drive_id: drive_id.to_string(),
        }
    }
}

/// An access grant on a Case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    /// The employee code of the grantee.
    pub employee_code: String,
    /// The granted role (e.g., "Owner", "Reader").
    pub role: String,
}

/// The aggregate whose survey lifecycle the pipeline governs.
///
/// `id` and `key` never change once assigned. `version_token` is owned by the
/// store and replaced on every write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Case {
    pub id: CaseId,
    pub key: CaseKey,
    #[serde(default)]
    pub lifecycle_state: LifecycleState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_token: Option<VersionToken>,
    #[serde(default)]
    pub manager_employee_code: Option<String>,
    #[serde(default)]
    pub billing_partner_employee_code: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub end_date: Option<OffsetDateTime>,
    #[serde(default)]
    pub case_name: Option<String>,
    #[serde(default)]
    pub unique_id: Option<String>,
    #[serde(default)]
    pub primary_capability: Option<String>,
    /// Reference into the external client directory.
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub share_point_directory: Option<SharePointDirectory>,
    #[serde(default)]
    pub permissions: Vec<Permission>,
}

impl Case {
    /// Creates a new Case in the `New` state with no business attributes set.
    #[must_use]
    pub fn new(id: CaseId, key: CaseKey) -> Self {
        Self {
            id,
            key,
            lifecycle_state: LifecycleState::New,
            version_token: None,
            manager_employee_code: None,
            billing_partner_employee_code: None,
            end_date: None,
            case_name: None,
            unique_id: None,
            primary_capability: None,
            client_id: None,
            share_point_directory: None,
            permissions: Vec::new(),
        }
    }

    /// Returns the manager employee code if it holds any non-whitespace text.
    #[must_use]
    pub fn manager_code(&self) -> Option<&str> {
        present(self.manager_employee_code.as_deref())
    }

    /// A one-line description used for audit snapshots and logs.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "id={},key={},state={},permissions={}",
            self.id,
            self.key,
            self.lifecycle_state,
            self.permissions.len()
        )
    }
}

/// Returns the value trimmed if it contains non-whitespace text.
#[must_use]
pub fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
