// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::WorkflowError;
use crate::guard::{self, Freshness};
use crate::library::DocumentLibrary;
use async_trait::async_trait;
use case_survey::{Command, TransitionResult, apply};
use case_survey_audit::{Actor, Cause};
use case_survey_domain::{Case, VersionToken};
use case_survey_persistence::{AuditLog, CaseStore, ScheduledTrigger, StoreError, WorkflowStateStore};
use std::sync::Arc;
use time::OffsetDateTime;
use tracing::{debug, info};
use uuid::Uuid;

/// The lifecycle transition actions handlers invoke once validation passes.
///
/// Each action persists its own result. Failures are returned to the handler
/// and never retried here.
#[async_trait]
pub trait SurveyWorkflow: Send + Sync {
    /// Provisions a directory and opens the survey.
    async fn start_survey(
        &self,
        case: Case,
        actor: &Actor,
        correlation_id: Uuid,
    ) -> Result<(), WorkflowError>;

    /// Refreshes an open survey, or archives the survey of a deleted Case.
    async fn update_survey(
        &self,
        case: Case,
        actor: &Actor,
        correlation_id: Uuid,
    ) -> Result<(), WorkflowError>;

    /// Closes a survey that is closing.
    async fn close_survey(
        &self,
        case: Case,
        actor: &Actor,
        correlation_id: Uuid,
    ) -> Result<(), WorkflowError>;

    /// Fires the end-date trigger recorded for the Case.
    async fn trigger_survey(
        &self,
        case: Case,
        actor: &Actor,
        correlation_id: Uuid,
    ) -> Result<(), WorkflowError>;

    /// Records a trigger due at the Case's end date.
    async fn schedule_trigger(
        &self,
        case: Case,
        actor: &Actor,
        correlation_id: Uuid,
    ) -> Result<(), WorkflowError>;
}

/// `SurveyWorkflow` over the pure transitions and the stores.
///
/// Every action re-reads the stored Case, applies the transition to it and
/// replaces it under the token it was read with, so a concurrent write
/// surfaces as a `StoreError::VersionConflict`.
pub struct CaseWorkflow {
    cases: Arc<dyn CaseStore>,
    workflow_state: Arc<dyn WorkflowStateStore>,
    audit: Arc<dyn AuditLog>,
    library: Arc<dyn DocumentLibrary>,
}

impl CaseWorkflow {
    #[must_use]
    pub fn new(
        cases: Arc<dyn CaseStore>,
        workflow_state: Arc<dyn WorkflowStateStore>,
        audit: Arc<dyn AuditLog>,
        library: Arc<dyn DocumentLibrary>,
    ) -> Self {
        Self {
            cases,
            workflow_state,
            audit,
            library,
        }
    }

    async fn load(&self, case: &Case) -> Result<Case, WorkflowError> {
        self.cases
            .get_by_id_and_key(&case.id, &case.key)
            .await?
            .ok_or_else(|| {
                WorkflowError::Store(StoreError::CaseNotFound {
                    id: case.id.clone(),
                    key: case.key.clone(),
                })
            })
    }

    /// Applies `command` to the stored Case, persists the result and records
    /// the audit event. A no-op transition is audited but not written.
    async fn commit(
        &self,
        stored: Case,
        command: Command,
        actor: &Actor,
        correlation_id: Uuid,
    ) -> Result<Case, WorkflowError> {
        let cause: Cause = Cause::new(
            correlation_id.to_string(),
            format!("{} message", command.name()),
        );
        let result: TransitionResult = apply(&stored, command, actor.clone(), cause)?;

        let persisted: Case = if result.is_noop() {
            debug!(case = %stored.summary(), "Transition left the Case unchanged");
            stored
        } else {
            let expected: Option<&VersionToken> = stored.version_token.as_ref();
            self.cases.replace(result.new_case, expected).await?
        };

        let sequence: u64 = self.audit.append(result.audit_event).await?;
        info!(
            %correlation_id,
            case = %persisted.summary(),
            audit_sequence = sequence,
            "Committed survey transition"
        );
        Ok(persisted)
    }
}

#[async_trait]
impl SurveyWorkflow for CaseWorkflow {
    async fn start_survey(
        &self,
        case: Case,
        actor: &Actor,
        correlation_id: Uuid,
    ) -> Result<(), WorkflowError> {
        let stored: Case = self.load(&case).await?;
        let directory = self.library.provision(&stored, correlation_id).await?;
        self.commit(stored, Command::StartSurvey { directory }, actor, correlation_id)
            .await?;
        Ok(())
    }

    async fn update_survey(
        &self,
        case: Case,
        actor: &Actor,
        correlation_id: Uuid,
    ) -> Result<(), WorkflowError> {
        let stored: Case = self.load(&case).await?;
        self.commit(stored, Command::UpdateSurvey, actor, correlation_id)
            .await?;
        Ok(())
    }

    async fn close_survey(
        &self,
        case: Case,
        actor: &Actor,
        correlation_id: Uuid,
    ) -> Result<(), WorkflowError> {
        let stored: Case = self.load(&case).await?;
        self.commit(stored, Command::CloseSurvey, actor, correlation_id)
            .await?;
        Ok(())
    }

    async fn trigger_survey(
        &self,
        case: Case,
        actor: &Actor,
        correlation_id: Uuid,
    ) -> Result<(), WorkflowError> {
        let current: Option<VersionToken> = self
            .cases
            .current_version_token(&case.id, &case.key)
            .await?;
        if !is_fresh(&case, current.as_ref(), correlation_id) {
            return Ok(());
        }

        let stored: Case = self.load(&case).await?;
        if !is_fresh(&case, stored.version_token.as_ref(), correlation_id) {
            return Ok(());
        }
        self.commit(stored, Command::TriggerSurvey, actor, correlation_id)
            .await?;
        Ok(())
    }

    async fn schedule_trigger(
        &self,
        case: Case,
        _actor: &Actor,
        correlation_id: Uuid,
    ) -> Result<(), WorkflowError> {
        let fire_at: OffsetDateTime = case
            .end_date
            .ok_or_else(|| WorkflowError::MissingEndDate {
                id: case.id.clone(),
            })?;
        let version_token: VersionToken = case
            .version_token
            .clone()
            .ok_or_else(|| WorkflowError::MissingVersionToken {
                id: case.id.clone(),
            })?;

        let trigger = ScheduledTrigger {
            case_id: case.id,
            case_key: case.key,
            version_token,
            fire_at,
            correlation_id,
        };
        if let Some(previous) = self.workflow_state.schedule(trigger).await? {
            debug!(
                case_id = %previous.case_id,
                token = %previous.version_token,
                "Replaced earlier trigger"
            );
        }
        Ok(())
    }
}

/// Checks a trigger's token against the stored one. A stale trigger is an
/// expected outcome: a newer one was scheduled when the Case changed.
fn is_fresh(case: &Case, stored: Option<&VersionToken>, correlation_id: Uuid) -> bool {
    let freshness: Freshness = guard::compare(case.version_token.as_ref(), stored);
    if !freshness.is_current() {
        info!(
            %correlation_id,
            case = %case.summary(),
            ?freshness,
            "Case changed after the trigger was scheduled, nothing to close"
        );
    }
    freshness.is_current()
}
