// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::directory::{EmployeeDirectory, EmployeeRecord};
use crate::error::HandlerError;
use async_trait::async_trait;
use case_survey_domain::{Case, CaseId, CaseKey};
use case_survey_persistence::CaseStore;
use case_survey_rules::RuleContext;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{OnceCell, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::debug;
use uuid::Uuid;

/// Per-delivery state shared by every rule of one validation pass.
///
/// Holds the employee lookups made so far and the stored Case, read at most
/// once. A context belongs to a single message and is dropped with it;
/// validators themselves stay immutable and shared.
pub struct ValidationContext {
    correlation_id: Uuid,
    directory: Arc<dyn EmployeeDirectory>,
    cases: Arc<dyn CaseStore>,
    cancel: CancellationToken,
    /// `None` marks a code the directory did not know.
    employees: RwLock<HashMap<String, Option<EmployeeRecord>>>,
    stored: OnceCell<Option<Case>>,
}

impl ValidationContext {
    /// Creates a context for one delivery.
    #[must_use]
    pub fn new(
        correlation_id: Uuid,
        directory: Arc<dyn EmployeeDirectory>,
        cases: Arc<dyn CaseStore>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            correlation_id,
            directory,
            cases,
            cancel,
            employees: RwLock::new(HashMap::new()),
            stored: OnceCell::new(),
        }
    }

    /// Seeds the stored Case with one the handler already fetched.
    #[must_use]
    pub fn with_stored_case(mut self, case: Case) -> Self {
        self.stored = OnceCell::new_with(Some(Some(case)));
        self
    }

    #[must_use]
    pub const fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    /// Returns the directory record for `code`.
    ///
    /// Codes gathered by the prefetch are answered from memory; anything
    /// else costs one directory call.
    ///
    /// # Errors
    ///
    /// Returns the directory failure, or `HandlerError::Cancelled`.
    pub async fn employee(&self, code: &str) -> Result<Option<EmployeeRecord>, HandlerError> {
        let cached: Option<Option<EmployeeRecord>> = self.employees.read().await.get(code).cloned();
        if let Some(record) = cached {
            return Ok(record);
        }

        self.prefetch(vec![code.to_string()]).await?;
        Ok(self.employees.read().await.get(code).cloned().flatten())
    }

    /// Returns the Case currently stored under `id` and `key`.
    ///
    /// The store is read once per context. Every caller must ask for the
    /// Case the message refers to.
    ///
    /// # Errors
    ///
    /// Returns the store failure, or `HandlerError::Cancelled`.
    pub async fn stored_case(
        &self,
        id: &CaseId,
        key: &CaseKey,
    ) -> Result<Option<&Case>, HandlerError> {
        let stored: &Option<Case> = self
            .stored
            .get_or_try_init(|| self.cancellable(self.cases.get_by_id_and_key(id, key)))
            .await?;
        Ok(stored.as_ref())
    }

    /// Races `future` against the delivery's cancellation token.
    async fn cancellable<F, T, E>(&self, future: F) -> Result<T, HandlerError>
    where
        F: Future<Output = Result<T, E>> + Send,
        HandlerError: From<E>,
    {
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(HandlerError::Cancelled),
            result = future => result.map_err(HandlerError::from),
        }
    }
}

#[async_trait]
impl RuleContext for ValidationContext {
    type Error = HandlerError;

    async fn prefetch(&self, keys: Vec<String>) -> Result<(), HandlerError> {
        let missing: Vec<String> = {
            let known = self.employees.read().await;
            keys.into_iter()
                .filter(|code| !known.contains_key(code))
                .collect()
        };
        if missing.is_empty() {
            return Ok(());
        }

        debug!(codes = ?missing, "Looking up employees");
        let mut resolved: HashMap<String, EmployeeRecord> = self
            .cancellable(self.directory.resolve(&missing, self.correlation_id))
            .await?;

        let mut known = self.employees.write().await;
        for code in missing {
            let record: Option<EmployeeRecord> = resolved.remove(&code);
            known.insert(code, record);
        }
        Ok(())
    }
}
