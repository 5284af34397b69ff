// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The handler template shared by every transition.
//!
//! Each delivery goes through the same steps:
//!
//! 1. Open a logging span carrying the correlation id, case code and
//!    delivery count from the message properties
//! 2. Decode the envelope; a body that can never decode is discarded
//! 3. Validate the Case against the transition's rule set
//! 4. Drop the message on an Error failure, skip it on Information failures
//! 5. Otherwise invoke the transition action once as the service identity.
//!    Cancellation is checked before the action starts; a started action
//!    always runs to completion
//!
//! Only failures that a redelivery might cure leave `handle` as `Err`.

use crate::config::PipelineConfig;
use crate::context::ValidationContext;
use crate::directory::EmployeeDirectory;
use crate::envelope::{Envelope, InboundMessage};
use crate::error::{HandlerError, MessageError, WorkflowError};
use crate::validators::{TransitionRequest, TransitionValidator};
use async_trait::async_trait;
use case_survey_audit::Actor;
use case_survey_domain::Case;
use case_survey_persistence::CaseStore;
use case_survey_rules::{Outcome, RuleFailure, ValidationReport};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, error, info, info_span, warn};
use uuid::Uuid;

/// The operation a handler performs once a message validates.
#[async_trait]
pub trait TransitionAction: Send + Sync {
    async fn invoke(
        &self,
        case: Case,
        actor: &Actor,
        correlation_id: Uuid,
    ) -> Result<(), WorkflowError>;
}

/// Where the validated Case comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadSource {
    /// The snapshot embedded in the message.
    Snapshot,
    /// The Case currently stored under the snapshot's id and key.
    Latest,
}

/// How a delivery was settled. Every variant completes the message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandleOutcome {
    /// The action ran.
    Applied,
    /// An Error-severity rule failed; the message was dropped.
    Rejected(Vec<RuleFailure>),
    /// Only Information-severity rules failed; nothing to do.
    Skipped(Vec<RuleFailure>),
    /// The body can never be processed.
    Malformed(String),
}

/// A transition handler: decode, validate, act.
pub struct MessageHandler {
    name: &'static str,
    source: PayloadSource,
    validator: Arc<TransitionValidator>,
    action: Arc<dyn TransitionAction>,
    cases: Arc<dyn CaseStore>,
    directory: Arc<dyn EmployeeDirectory>,
    actor: Actor,
    max_delivery_count: u32,
}

impl MessageHandler {
    /// Creates a handler that validates the message snapshot.
    ///
    /// # Arguments
    ///
    /// * `name` - The transition name used in logs
    /// * `validator` - The transition's precondition rules
    /// * `action` - Invoked once per message that validates
    /// * `cases` - Read by store-backed rules
    /// * `directory` - Read by employee rules
    /// * `config` - Supplies the service identity and delivery limit
    #[must_use]
    pub fn new(
        name: &'static str,
        validator: Arc<TransitionValidator>,
        action: Arc<dyn TransitionAction>,
        cases: Arc<dyn CaseStore>,
        directory: Arc<dyn EmployeeDirectory>,
        config: &PipelineConfig,
    ) -> Self {
        Self {
            name,
            source: PayloadSource::Snapshot,
            validator,
            action,
            cases,
            directory,
            actor: config.actor(),
            max_delivery_count: config.max_delivery_count,
        }
    }

    /// Changes where the validated Case comes from.
    #[must_use]
    pub const fn with_source(mut self, source: PayloadSource) -> Self {
        self.source = source;
        self
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Handles one delivery.
    ///
    /// # Errors
    ///
    /// Returns an error when a collaborator fails, the action fails, or
    /// `cancel` fires. The transport should redeliver the message.
    pub async fn handle(
        &self,
        message: &InboundMessage,
        cancel: &CancellationToken,
    ) -> Result<HandleOutcome, HandlerError> {
        let properties = &message.properties;
        let delivery_count: u32 = properties.delivery_count;
        let span = info_span!(
            "handle_message",
            handler = self.name,
            correlation_id = properties.correlation_id.as_deref().unwrap_or_default(),
            case_code = properties.case_code.as_deref().unwrap_or_default(),
            delivery_count,
        );

        async {
            let result = self.process(message, cancel).await;
            if let Err(err) = &result {
                error!(
                    error = %err,
                    delivery_count,
                    max_delivery_count = self.max_delivery_count,
                    "Message handling failed, leaving it to redelivery"
                );
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn process(
        &self,
        message: &InboundMessage,
        cancel: &CancellationToken,
    ) -> Result<HandleOutcome, HandlerError> {
        if cancel.is_cancelled() {
            return Err(HandlerError::Cancelled);
        }

        let (request, latest) = match self.decode(message, cancel).await {
            Ok(decoded) => decoded,
            Err(HandlerError::Malformed(err)) => {
                warn!(error = %err, "Discarding malformed message");
                return Ok(HandleOutcome::Malformed(err.to_string()));
            }
            Err(err) => return Err(err),
        };

        let mut ctx: ValidationContext = ValidationContext::new(
            request.correlation_id,
            Arc::clone(&self.directory),
            Arc::clone(&self.cases),
            cancel.clone(),
        );
        if let Some(latest) = latest {
            ctx = ctx.with_stored_case(latest);
        }

        let report: ValidationReport = self.validator.validate(&request, &ctx).await?;
        let summary: String = report.to_string();
        match report.into_outcome() {
            Outcome::Invalid(failures) => {
                warn!(failures = %summary, "Validation failed, message dropped");
                Ok(HandleOutcome::Rejected(failures))
            }
            Outcome::Skipped(failures) => {
                info!(reason = %summary, "Transition no longer applies, skipping");
                Ok(HandleOutcome::Skipped(failures))
            }
            Outcome::Valid => {
                let TransitionRequest {
                    correlation_id,
                    case,
                } = request;
                // A started action writes the Case and its audit event as one
                // unit, so cancellation is only honoured before it begins.
                if cancel.is_cancelled() {
                    return Err(HandlerError::Cancelled);
                }
                self.action
                    .invoke(case, &self.actor, correlation_id)
                    .await?;
                info!(%correlation_id, "Transition applied");
                Ok(HandleOutcome::Applied)
            }
        }
    }

    /// Decodes the envelope into the request to validate.
    ///
    /// For `PayloadSource::Latest` the stored Case replaces the snapshot and
    /// is also returned so validation does not read it again.
    async fn decode(
        &self,
        message: &InboundMessage,
        cancel: &CancellationToken,
    ) -> Result<(TransitionRequest, Option<Case>), HandlerError> {
        let envelope: Envelope = Envelope::decode(&message.body)?;
        let correlation_id: Uuid = envelope.correlation_id;
        let snapshot: Case = envelope.entity.into_case()?;

        match self.source {
            PayloadSource::Snapshot => Ok((TransitionRequest::new(correlation_id, snapshot), None)),
            PayloadSource::Latest => {
                let found: Option<Case> = tokio::select! {
                    biased;
                    () = cancel.cancelled() => Err(HandlerError::Cancelled),
                    found = self.cases.get_by_id_and_key(&snapshot.id, &snapshot.key) => {
                        found.map_err(HandlerError::from)
                    }
                }?;
                let Some(latest) = found else {
                    return Err(MessageError::CaseNotFound {
                        id: snapshot.id,
                        key: snapshot.key,
                    }
                    .into());
                };

                debug!(
                    snapshot_state = %snapshot.lifecycle_state,
                    stored_state = %latest.lifecycle_state,
                    "Validating the stored Case instead of the message snapshot"
                );
                Ok((
                    TransitionRequest::new(correlation_id, latest.clone()),
                    Some(latest),
                ))
            }
        }
    }
}
