// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::config::PipelineConfig;
use crate::directory::EmployeeDirectory;
use crate::error::WorkflowError;
use crate::handler::{MessageHandler, PayloadSource, TransitionAction};
use crate::validators::{
    TransitionValidator, end_validator, schedule_validator, start_validator, trigger_validator,
    update_validator,
};
use crate::workflow::SurveyWorkflow;
use async_trait::async_trait;
use case_survey_audit::Actor;
use case_survey_domain::Case;
use case_survey_persistence::CaseStore;
use std::sync::Arc;
use uuid::Uuid;

/// The lifecycle transitions the pipeline consumes messages for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    Start,
    Update,
    End,
    Schedule,
    Trigger,
}

impl Transition {
    pub const ALL: [Self; 5] = [
        Self::Start,
        Self::Update,
        Self::End,
        Self::Schedule,
        Self::Trigger,
    ];

    /// Returns the handler name used in logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Start => "StartSurvey",
            Self::Update => "UpdateSurvey",
            Self::End => "EndSurvey",
            Self::Schedule => "ScheduleTrigger",
            Self::Trigger => "TriggerSurvey",
        }
    }

    /// Returns the topic this transition's messages are published on.
    #[must_use]
    pub const fn topic(self) -> &'static str {
        match self {
            Self::Start => "survey-start",
            Self::Update => "survey-update",
            Self::End => "survey-end",
            Self::Schedule => "survey-schedule",
            Self::Trigger => "survey-trigger",
        }
    }

    /// Update always acts on the stored Case.
    #[must_use]
    pub const fn payload_source(self) -> PayloadSource {
        match self {
            Self::Update => PayloadSource::Latest,
            Self::Start | Self::End | Self::Schedule | Self::Trigger => PayloadSource::Snapshot,
        }
    }

    #[must_use]
    pub fn validator(self) -> Arc<TransitionValidator> {
        match self {
            Self::Start => start_validator(),
            Self::Update => update_validator(),
            Self::End => end_validator(),
            Self::Schedule => schedule_validator(),
            Self::Trigger => trigger_validator(),
        }
    }
}

impl std::fmt::Display for Transition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Binds a transition to the matching `SurveyWorkflow` operation.
pub struct WorkflowAction {
    transition: Transition,
    workflow: Arc<dyn SurveyWorkflow>,
}

impl WorkflowAction {
    #[must_use]
    pub fn new(transition: Transition, workflow: Arc<dyn SurveyWorkflow>) -> Self {
        Self {
            transition,
            workflow,
        }
    }
}

#[async_trait]
impl TransitionAction for WorkflowAction {
    async fn invoke(
        &self,
        case: Case,
        actor: &Actor,
        correlation_id: Uuid,
    ) -> Result<(), WorkflowError> {
        let workflow: &dyn SurveyWorkflow = self.workflow.as_ref();
        match self.transition {
            Transition::Start => workflow.start_survey(case, actor, correlation_id).await,
            Transition::Update => workflow.update_survey(case, actor, correlation_id).await,
            Transition::End => workflow.close_survey(case, actor, correlation_id).await,
            Transition::Schedule => workflow.schedule_trigger(case, actor, correlation_id).await,
            Transition::Trigger => workflow.trigger_survey(case, actor, correlation_id).await,
        }
    }
}

/// The external collaborators every handler needs.
#[derive(Clone)]
pub struct Collaborators {
    pub cases: Arc<dyn CaseStore>,
    pub directory: Arc<dyn EmployeeDirectory>,
    pub workflow: Arc<dyn SurveyWorkflow>,
}

/// Builds the handler for one transition.
#[must_use]
pub fn build_handler(
    transition: Transition,
    collaborators: &Collaborators,
    config: &PipelineConfig,
) -> MessageHandler {
    let action = WorkflowAction::new(transition, Arc::clone(&collaborators.workflow));
    MessageHandler::new(
        transition.name(),
        transition.validator(),
        Arc::new(action),
        Arc::clone(&collaborators.cases),
        Arc::clone(&collaborators.directory),
        config,
    )
    .with_source(transition.payload_source())
}

/// Builds one handler per transition.
#[must_use]
pub fn build_handlers(
    collaborators: &Collaborators,
    config: &PipelineConfig,
) -> Vec<(Transition, MessageHandler)> {
    Transition::ALL
        .into_iter()
        .map(|transition| (transition, build_handler(transition, collaborators, config)))
        .collect()
}
