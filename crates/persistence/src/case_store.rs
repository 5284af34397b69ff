// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::StoreError;
use async_trait::async_trait;
use case_survey_domain::{Case, CaseId, CaseKey, VersionToken, validate_case_key};
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::{RwLock, broadcast};
use tracing::debug;
use uuid::Uuid;

/// Maximum number of changes buffered for slow subscribers.
/// Subscribers that fall further behind observe a lag and skip ahead.
const CHANGE_FEED_BUFFER: usize = 100;

/// What kind of write produced a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Inserted,
    Replaced,
}

/// A committed write, as published on the change feed.
///
/// The Case carries the version token assigned by the write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseChange {
    pub kind: ChangeKind,
    pub case: Case,
}

/// Authoritative storage for Cases, keyed by id and business key.
///
/// Every successful write assigns a fresh `VersionToken`. `replace` is
/// optimistic: it fails with `StoreError::VersionConflict` when the stored
/// token differs from the one the caller read.
#[async_trait]
pub trait CaseStore: Send + Sync {
    /// Returns the current stored Case, if any.
    async fn get_by_id_and_key(
        &self,
        id: &CaseId,
        key: &CaseKey,
    ) -> Result<Option<Case>, StoreError>;

    /// Returns only the current version token of the stored Case.
    async fn current_version_token(
        &self,
        id: &CaseId,
        key: &CaseKey,
    ) -> Result<Option<VersionToken>, StoreError> {
        Ok(self
            .get_by_id_and_key(id, key)
            .await?
            .and_then(|case| case.version_token))
    }

    /// Stores a Case that does not exist yet and returns it with its token.
    async fn insert(&self, case: Case) -> Result<Case, StoreError>;

    /// Overwrites a stored Case if its token still equals `expected`.
    async fn replace(
        &self,
        case: Case,
        expected: Option<&VersionToken>,
    ) -> Result<Case, StoreError>;

    /// Subscribes to committed writes. Writes made before subscribing are not
    /// delivered.
    fn subscribe(&self) -> broadcast::Receiver<CaseChange>;
}

/// A `CaseStore` held entirely in process memory.
pub struct InMemoryCaseStore {
    cases: RwLock<HashMap<(CaseId, CaseKey), Case>>,
    clock: AtomicI64,
    tx: broadcast::Sender<CaseChange>,
}

impl InMemoryCaseStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(CHANGE_FEED_BUFFER);
        Self {
            cases: RwLock::new(HashMap::new()),
            clock: AtomicI64::new(0),
            tx,
        }
    }

    /// Inserts every Case, returning the number stored.
    ///
    /// # Errors
    ///
    /// Stops at the first Case that already exists.
    pub async fn seed<I>(&self, cases: I) -> Result<usize, StoreError>
    where
        I: IntoIterator<Item = Case> + Send,
        I::IntoIter: Send,
    {
        let mut count: usize = 0;
        for case in cases {
            self.insert(case).await?;
            count += 1;
        }
        Ok(count)
    }

    /// Returns the number of stored Cases.
    pub async fn len(&self) -> usize {
        self.cases.read().await.len()
    }

    /// Returns true if no Case is stored.
    pub async fn is_empty(&self) -> bool {
        self.cases.read().await.is_empty()
    }

    fn next_token(&self) -> VersionToken {
        let timestamp: i64 = self.clock.fetch_add(1, Ordering::SeqCst) + 1;
        VersionToken::new(timestamp, &Uuid::new_v4().to_string())
    }

    fn publish(&self, change: CaseChange) {
        let kind = change.kind;
        let id = change.case.id.clone();
        match self.tx.send(change) {
            Ok(receivers) => debug!(%id, ?kind, receivers, "Published case change"),
            Err(_) => debug!(%id, ?kind, "No subscribers for case change"),
        }
    }
}

impl Default for InMemoryCaseStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CaseStore for InMemoryCaseStore {
    async fn get_by_id_and_key(
        &self,
        id: &CaseId,
        key: &CaseKey,
    ) -> Result<Option<Case>, StoreError> {
        let cases = self.cases.read().await;
        Ok(cases.get(&(id.clone(), key.clone())).cloned())
    }

    async fn insert(&self, mut case: Case) -> Result<Case, StoreError> {
        validate_case_key(&case.key)?;
        let stored: Case = {
            let mut cases = self.cases.write().await;
            let slot = (case.id.clone(), case.key.clone());
            if cases.contains_key(&slot) {
                return Err(StoreError::CaseAlreadyExists {
                    id: case.id,
                    key: case.key,
                });
            }
            case.version_token = Some(self.next_token());
            cases.insert(slot, case.clone());
            case
        };

        debug!(case = %stored.summary(), "Inserted case");
        self.publish(CaseChange {
            kind: ChangeKind::Inserted,
            case: stored.clone(),
        });
        Ok(stored)
    }

    async fn replace(
        &self,
        mut case: Case,
        expected: Option<&VersionToken>,
    ) -> Result<Case, StoreError> {
        let stored: Case = {
            let mut cases = self.cases.write().await;
            let slot = (case.id.clone(), case.key.clone());
            let Some(current) = cases.get(&slot) else {
                return Err(StoreError::CaseNotFound {
                    id: case.id,
                    key: case.key,
                });
            };

            if current.version_token.as_ref() != expected {
                return Err(StoreError::VersionConflict {
                    id: case.id,
                    key: case.key,
                    expected: expected.cloned(),
                    found: current.version_token.clone(),
                });
            }

            case.version_token = Some(self.next_token());
            cases.insert(slot, case.clone());
            case
        };

        debug!(case = %stored.summary(), "Replaced case");
        self.publish(CaseChange {
            kind: ChangeKind::Replaced,
            case: stored.clone(),
        });
        Ok(stored)
    }

    fn subscribe(&self) -> broadcast::Receiver<CaseChange> {
        self.tx.subscribe()
    }
}
