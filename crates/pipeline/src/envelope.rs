// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::MessageError;
use case_survey_domain::{Case, Permission};
use serde::{Deserialize, Deserializer, Serialize, de};
use uuid::Uuid;

/// Transport metadata carried alongside the body.
///
/// These values feed the logging scope only. The correlation id used for
/// validation and actions comes from the envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageProperties {
    #[serde(default)]
    pub correlation_id: Option<String>,
    #[serde(default)]
    pub case_code: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    /// Number of times this message has been delivered, starting at 1.
    /// Maintained by the transport.
    #[serde(default)]
    pub delivery_count: u32,
}

/// A message as received from the transport, body still undecoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub properties: MessageProperties,
    pub body: String,
}

impl InboundMessage {
    /// Creates a message with the given properties and raw body.
    #[must_use]
    pub const fn new(properties: MessageProperties, body: String) -> Self {
        Self { properties, body }
    }

    /// Encodes an envelope for `case` and fills the properties from it.
    ///
    /// # Errors
    ///
    /// Returns the serializer error if the Case cannot be encoded.
    pub fn for_case(correlation_id: Uuid, case: &Case) -> Result<Self, MessageError> {
        let envelope = Envelope {
            correlation_id,
            entity: EntityPayload::Case(case.clone()),
        };
        let properties = MessageProperties {
            correlation_id: Some(correlation_id.to_string()),
            case_code: Some(case.key.value().to_string()),
            id: Some(case.id.value().to_string()),
            delivery_count: 0,
        };
        Ok(Self::new(properties, serde_json::to_string(&envelope)?))
    }
}

/// The decoded message body.
///
/// A missing, null or blank correlation id decodes as the nil UUID so
/// validation can report it, instead of failing the whole body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    #[serde(default, deserialize_with = "nil_when_blank")]
    pub correlation_id: Uuid,
    pub entity: EntityPayload,
}

fn nil_when_blank<'de, D>(deserializer: D) -> Result<Uuid, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => {
            Uuid::parse_str(raw.trim()).map_err(de::Error::custom)
        }
        _ => Ok(Uuid::nil()),
    }
}

impl Envelope {
    /// Decodes an envelope from a raw body.
    ///
    /// # Errors
    ///
    /// Returns `MessageError::Body` for malformed JSON, a missing entity, or
    /// an entity type tag outside the known set.
    pub fn decode(body: &str) -> Result<Self, MessageError> {
        Ok(serde_json::from_str(body)?)
    }
}

/// The closed set of entity kinds the change feed emits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EntityPayload {
    Case(Case),
    Permission(Permission),
}

impl EntityPayload {
    /// Returns the type tag.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Case(_) => "Case",
            Self::Permission(_) => "Permission",
        }
    }

    /// Returns the Case, rejecting every other kind.
    ///
    /// # Errors
    ///
    /// Returns `MessageError::UnexpectedEntity` naming the actual kind.
    pub fn into_case(self) -> Result<Case, MessageError> {
        match self {
            Self::Case(case) => Ok(case),
            other @ Self::Permission(_) => Err(MessageError::UnexpectedEntity(other.kind())),
        }
    }
}
