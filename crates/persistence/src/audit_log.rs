// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::StoreError;
use async_trait::async_trait;
use case_survey_audit::AuditEvent;
use case_survey_domain::CaseId;
use tokio::sync::RwLock;

/// Append-only record of every applied transition.
#[async_trait]
pub trait AuditLog: Send + Sync {
    /// Appends an event and returns its sequence number, starting at 1.
    async fn append(&self, event: AuditEvent) -> Result<u64, StoreError>;

    /// Returns the events recorded for a Case in append order.
    async fn events_for(&self, id: &CaseId) -> Result<Vec<AuditEvent>, StoreError>;
}

/// An `AuditLog` held entirely in process memory.
#[derive(Default)]
pub struct InMemoryAuditLog {
    events: RwLock<Vec<AuditEvent>>,
}

impl InMemoryAuditLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of recorded events.
    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }

    /// Returns true if nothing has been recorded.
    pub async fn is_empty(&self) -> bool {
        self.events.read().await.is_empty()
    }
}

#[async_trait]
impl AuditLog for InMemoryAuditLog {
    async fn append(&self, event: AuditEvent) -> Result<u64, StoreError> {
        let mut events = self.events.write().await;
        events.push(event);
        Ok(u64::try_from(events.len()).unwrap_or(u64::MAX))
    }

    async fn events_for(&self, id: &CaseId) -> Result<Vec<AuditEvent>, StoreError> {
        let events = self.events.read().await;
        Ok(events
            .iter()
            .filter(|event| &event.case_id == id)
            .cloned()
            .collect())
    }
}
