// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Message validation and survey transition pipeline.
//!
//! Case changes arrive as messages on one topic per lifecycle transition.
//! Each topic's `MessageHandler` decodes the envelope, checks the
//! transition's preconditions and, when they hold, invokes the matching
//! `SurveyWorkflow` action.
//!
//! ## Outcomes
//!
//! - Malformed bodies are discarded; a redelivery would fail the same way
//! - Error-severity rule failures drop the message
//! - Information-severity rule failures skip it; this is the normal fate of
//!   a trigger whose Case changed after it was scheduled
//! - Action, store and directory failures are returned to the transport,
//!   which redelivers up to `maxDeliveryCount` times and then dead-letters
//!
//! ## Concurrency
//!
//! Deliveries run concurrently and in no particular order. Nothing is locked
//! across an await. Every handler re-validates against the store, and every
//! action writes under the version token it read, so duplicated or
//! reordered messages are rejected or skipped rather than applied twice.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod config;
mod context;
mod directory;
mod envelope;
mod error;
pub mod guard;
mod handler;
mod handlers;
mod library;
mod rules;
mod transport;
pub mod validators;
mod workflow;

#[cfg(test)]
mod tests;

pub use config::{DEFAULT_CONCURRENCY, DEFAULT_MAX_DELIVERY_COUNT, PipelineConfig, ServiceIdentity};
pub use context::ValidationContext;
pub use directory::{EmployeeDirectory, EmployeeRecord, InMemoryEmployeeDirectory};
pub use envelope::{EntityPayload, Envelope, InboundMessage, MessageProperties};
pub use error::{ConfigError, DirectoryError, HandlerError, MessageError, WorkflowError};
pub use handler::{HandleOutcome, MessageHandler, PayloadSource, TransitionAction};
pub use handlers::{Collaborators, Transition, WorkflowAction, build_handler, build_handlers};
pub use library::{DocumentLibrary, InMemoryDocumentLibrary};
pub use rules::{ActiveEmployee, CaseExists, LifecycleIn, StoredEndDate, VersionMatches};
pub use transport::{DeadLetter, LocalTransport, RunSummary};
pub use workflow::{CaseWorkflow, SurveyWorkflow};
