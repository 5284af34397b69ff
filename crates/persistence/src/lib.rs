// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Storage for the survey pipeline.
//!
//! This crate defines the storage contracts the pipeline depends on and
//! in-memory implementations of each:
//!
//! - `CaseStore`: authoritative Case state with optimistic version tokens
//!   and a change feed of committed writes
//! - `WorkflowStateStore`: pending end-date triggers
//! - `AuditLog`: the append-only transition history
//!
//! ## Version tokens
//!
//! Every write assigns a fresh token: a timestamp taken from a monotonic
//! counter and a random tag. `CaseStore::replace` only succeeds when the
//! caller presents the token currently stored.
//!
//! ## Change feed
//!
//! Committed writes are published on a `tokio::sync::broadcast` channel.
//! The feed is informational. Subscribers that fall behind observe a lag and
//! must re-read the store for authoritative state.

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

mod audit_log;
mod case_store;
mod error;
mod workflow_state;

#[cfg(test)]
mod tests;

pub use audit_log::{AuditLog, InMemoryAuditLog};
pub use case_store::{CaseChange, CaseStore, ChangeKind, InMemoryCaseStore};
pub use error::StoreError;
pub use workflow_state::{InMemoryWorkflowStateStore, ScheduledTrigger, WorkflowStateStore};
