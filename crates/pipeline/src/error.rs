// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the pipeline boundary.
//!
//! Only `HandlerError` crosses the handler boundary. Everything a handler
//! can recover from locally (malformed bodies, rule failures) is reported
//! as a `HandleOutcome` instead.

use case_survey::CoreError;
use case_survey_domain::{CaseId, CaseKey};
use case_survey_persistence::StoreError;
use std::path::PathBuf;
use thiserror::Error;

/// A message that can never be processed, no matter how often it is redelivered.
#[derive(Debug, Error)]
pub enum MessageError {
    /// The body is not a well-formed envelope.
    #[error("Message body is not a valid envelope: {0}")]
    Body(#[from] serde_json::Error),

    /// The envelope carries a known entity this handler does not act on.
    #[error("Expected a Case entity, found {0}")]
    UnexpectedEntity(&'static str),

    /// The Case the message refers to is no longer stored.
    #[error("Case id={id}, key={key} was not found in the store")]
    CaseNotFound { id: CaseId, key: CaseKey },
}

/// Failures of the employee directory.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    /// The directory could not be reached.
    #[error("Employee directory unavailable: {0}")]
    Unavailable(String),
}

/// Failures of a lifecycle transition action.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// The lifecycle graph rejected the transition.
    #[error(transparent)]
    Transition(#[from] CoreError),

    /// The store rejected or failed the write.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Scheduling needs an end date.
    #[error("Case id={id} has no end date to schedule a trigger for")]
    MissingEndDate { id: CaseId },

    /// Scheduling needs the Case's version token.
    #[error("Case id={id} carries no version token")]
    MissingVersionToken { id: CaseId },

    /// The document library could not provision a directory.
    #[error("Document library failed: {0}")]
    Provisioning(String),
}

/// A failure that escapes the handler so the transport can redeliver.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The message is permanently unusable. Handlers convert this into
    /// `HandleOutcome::Malformed` and never return it.
    #[error(transparent)]
    Malformed(#[from] MessageError),

    /// An employee lookup failed during validation.
    #[error(transparent)]
    Directory(#[from] DirectoryError),

    /// A store read failed during decoding or validation.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The transition action failed.
    #[error("Transition action failed: {0}")]
    Action(#[from] WorkflowError),

    /// The transport cancelled the invocation.
    #[error("Handler invocation was cancelled")]
    Cancelled,
}

/// Invalid pipeline configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Failed to read configuration file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration is not valid JSON for `PipelineConfig`.
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// The service identity has an empty id or type.
    #[error("Service identity must have a non-empty id and type")]
    EmptyServiceIdentity,

    /// `maxDeliveryCount` must allow at least one delivery.
    #[error("maxDeliveryCount must be greater than zero")]
    InvalidMaxDeliveryCount,

    /// `concurrency` must allow at least one in-flight message.
    #[error("concurrency must be greater than zero")]
    InvalidConcurrency,
}
