// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::ConfigError;
use case_survey_audit::Actor;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default number of deliveries before a message is dead-lettered.
pub const DEFAULT_MAX_DELIVERY_COUNT: u32 = 10;

/// Default number of messages handled concurrently.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// The principal every transition action runs as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceIdentity {
    pub id: String,
    pub actor_type: String,
}

impl Default for ServiceIdentity {
    fn default() -> Self {
        Self {
            id: String::from("case-survey-pipeline"),
            actor_type: String::from("service"),
        }
    }
}

/// Pipeline settings, loaded from JSON with every field optional.
///
/// ```json
/// { "serviceIdentity": { "id": "case-survey-pipeline", "actorType": "service" },
///   "maxDeliveryCount": 10,
///   "concurrency": 4 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PipelineConfig {
    pub service_identity: ServiceIdentity,
    /// Deliveries before the transport dead-letters a message. Handlers
    /// only log it.
    pub max_delivery_count: u32,
    pub concurrency: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            service_identity: ServiceIdentity::default(),
            max_delivery_count: DEFAULT_MAX_DELIVERY_COUNT,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl PipelineConfig {
    /// Parses and validates a configuration document.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed JSON, or the validation
    /// error for out-of-range values.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Read` if the file cannot be read, otherwise as
    /// `from_json`.
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let text: String = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_json(&text)
    }

    /// Checks that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns the first invalid setting found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service_identity.id.trim().is_empty()
            || self.service_identity.actor_type.trim().is_empty()
        {
            return Err(ConfigError::EmptyServiceIdentity);
        }
        if self.max_delivery_count == 0 {
            return Err(ConfigError::InvalidMaxDeliveryCount);
        }
        if self.concurrency == 0 {
            return Err(ConfigError::InvalidConcurrency);
        }
        Ok(())
    }

    /// Returns the actor transition actions are attributed to.
    #[must_use]
    pub fn actor(&self) -> Actor {
        Actor::new(
            self.service_identity.id.clone(),
            self.service_identity.actor_type.clone(),
        )
    }
}
