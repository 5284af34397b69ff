// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::WorkflowError;
use async_trait::async_trait;
use case_survey_domain::{Case, CaseId, SharePointDirectory};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

/// Provisions the document-library directory a survey is opened in.
///
/// Provisioning is idempotent per Case: asking twice returns the same
/// directory.
#[async_trait]
pub trait DocumentLibrary: Send + Sync {
    async fn provision(
        &self,
        case: &Case,
        correlation_id: Uuid,
    ) -> Result<SharePointDirectory, WorkflowError>;
}

/// A document library that hands out directories on a single drive.
pub struct InMemoryDocumentLibrary {
    drive_id: String,
    directories: RwLock<HashMap<CaseId, SharePointDirectory>>,
}

impl InMemoryDocumentLibrary {
    /// Creates a library whose directories all live on `drive_id`.
    #[must_use]
    pub fn new(drive_id: &str) -> Self {
        Self {
            drive_id: drive_id.to_string(),
            directories: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the directory provisioned for a Case, if any.
    pub async fn directory_for(&self, id: &CaseId) -> Option<SharePointDirectory> {
        self.directories.read().await.get(id).cloned()
    }
}

#[async_trait]
impl DocumentLibrary for InMemoryDocumentLibrary {
    async fn provision(
        &self,
        case: &Case,
        correlation_id: Uuid,
    ) -> Result<SharePointDirectory, WorkflowError> {
        if let Some(existing) = &case.share_point_directory {
            return Ok(existing.clone());
        }

        let mut directories = self.directories.write().await;
        let directory: SharePointDirectory = directories
            .entry(case.id.clone())
            .or_insert_with(|| {
                let directory_id: String = format!("{}-{}", case.key, Uuid::new_v4().simple());
                info!(%correlation_id, case_code = %case.key, %directory_id, "Provisioned survey directory");
                SharePointDirectory::new(&directory_id, &self.drive_id)
            })
            .clone();
        Ok(directory)
    }
}
