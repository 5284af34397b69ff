// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DirectoryError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;
use uuid::Uuid;

/// What the directory knows about one employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRecord {
    pub is_active: bool,
    pub display_name: String,
}

impl EmployeeRecord {
    /// Creates a new `EmployeeRecord`.
    #[must_use]
    pub fn new(display_name: &str, is_active: bool) -> Self {
        Self {
            is_active,
            display_name: display_name.to_string(),
        }
    }
}

/// Resolves employee codes to directory records.
///
/// Callers pass each code at most once per call. Codes the directory does
/// not know are simply absent from the result.
#[async_trait]
pub trait EmployeeDirectory: Send + Sync {
    async fn resolve(
        &self,
        codes: &[String],
        correlation_id: Uuid,
    ) -> Result<HashMap<String, EmployeeRecord>, DirectoryError>;
}

/// A directory backed by a fixed map, counting how often it is called.
#[derive(Debug, Default)]
pub struct InMemoryEmployeeDirectory {
    employees: HashMap<String, EmployeeRecord>,
    calls: AtomicUsize,
}

impl InMemoryEmployeeDirectory {
    /// Creates a directory holding the given records.
    #[must_use]
    pub fn new(employees: HashMap<String, EmployeeRecord>) -> Self {
        Self {
            employees,
            calls: AtomicUsize::new(0),
        }
    }

    /// Returns how many `resolve` calls have been made.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmployeeDirectory for InMemoryEmployeeDirectory {
    async fn resolve(
        &self,
        codes: &[String],
        correlation_id: Uuid,
    ) -> Result<HashMap<String, EmployeeRecord>, DirectoryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        debug!(%correlation_id, codes = codes.len(), "Resolving employee codes");

        Ok(codes
            .iter()
            .filter_map(|code| {
                self.employees
                    .get(code)
                    .map(|record| (code.clone(), record.clone()))
            })
            .collect())
    }
}
