// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::StoreError;
use async_trait::async_trait;
use case_survey_domain::{CaseId, CaseKey, VersionToken};
use std::collections::HashMap;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// A pending end-date trigger for a Case.
///
/// The version token is the one the Case had when the trigger was scheduled.
/// When the trigger fires it is compared against the stored Case, so a trigger
/// that outlived a later update is discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledTrigger {
    pub case_id: CaseId,
    pub case_key: CaseKey,
    pub version_token: VersionToken,
    pub fire_at: OffsetDateTime,
    pub correlation_id: Uuid,
}

/// Durable workflow bookkeeping, currently the scheduled triggers.
#[async_trait]
pub trait WorkflowStateStore: Send + Sync {
    /// Records a trigger, replacing any earlier one for the same Case.
    /// Returns the replaced trigger.
    async fn schedule(
        &self,
        trigger: ScheduledTrigger,
    ) -> Result<Option<ScheduledTrigger>, StoreError>;

    /// Returns the trigger currently scheduled for a Case.
    async fn scheduled(
        &self,
        id: &CaseId,
        key: &CaseKey,
    ) -> Result<Option<ScheduledTrigger>, StoreError>;

    /// Returns every trigger due at or before `now`, earliest first.
    async fn due(&self, now: OffsetDateTime) -> Result<Vec<ScheduledTrigger>, StoreError>;
}

/// A `WorkflowStateStore` held entirely in process memory.
#[derive(Default)]
pub struct InMemoryWorkflowStateStore {
    triggers: RwLock<HashMap<(CaseId, CaseKey), ScheduledTrigger>>,
}

impl InMemoryWorkflowStateStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WorkflowStateStore for InMemoryWorkflowStateStore {
    async fn schedule(
        &self,
        trigger: ScheduledTrigger,
    ) -> Result<Option<ScheduledTrigger>, StoreError> {
        debug!(
            case_id = %trigger.case_id,
            case_code = %trigger.case_key,
            token = %trigger.version_token,
            "Scheduled end-date trigger"
        );
        let slot = (trigger.case_id.clone(), trigger.case_key.clone());
        Ok(self.triggers.write().await.insert(slot, trigger))
    }

    async fn scheduled(
        &self,
        id: &CaseId,
        key: &CaseKey,
    ) -> Result<Option<ScheduledTrigger>, StoreError> {
        let triggers = self.triggers.read().await;
        Ok(triggers.get(&(id.clone(), key.clone())).cloned())
    }

    async fn due(&self, now: OffsetDateTime) -> Result<Vec<ScheduledTrigger>, StoreError> {
        let mut due: Vec<ScheduledTrigger> = self
            .triggers
            .read()
            .await
            .values()
            .filter(|trigger| trigger.fire_at <= now)
            .cloned()
            .collect();
        due.sort_by_key(|trigger| trigger.fire_at);
        Ok(due)
    }
}
