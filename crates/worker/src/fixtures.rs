// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Fixture files the worker replays.
//!
//! - Cases: a JSON array of Case documents
//! - Employees: a JSON object mapping employee codes to directory records
//! - Messages: one JSON object per line, `{"topic", "properties", "body"}`.
//!   A string body is used as is, any other body is re-encoded as JSON.
//!   Blank lines and lines starting with `#` are ignored.

use case_survey_domain::Case;
use case_survey_pipeline::{EmployeeRecord, InboundMessage, MessageProperties};
use color_eyre::{Result, eyre::Context};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

/// A message waiting to be published on its topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedMessage {
    pub topic: String,
    pub message: InboundMessage,
}

#[derive(Deserialize)]
struct MessageLine {
    topic: String,
    #[serde(default)]
    properties: MessageProperties,
    body: Value,
}

pub fn parse_cases(text: &str) -> Result<Vec<Case>> {
    serde_json::from_str(text).wrap_err("Failed to parse Case fixtures")
}

pub fn parse_employees(text: &str) -> Result<HashMap<String, EmployeeRecord>> {
    serde_json::from_str(text).wrap_err("Failed to parse employee fixtures")
}

pub fn parse_messages(text: &str) -> Result<Vec<QueuedMessage>> {
    let mut messages: Vec<QueuedMessage> = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let line: &str = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parsed: MessageLine = serde_json::from_str(line)
            .wrap_err_with(|| format!("Failed to parse message on line {}", index + 1))?;
        let body: String = match parsed.body {
            Value::String(raw) => raw,
            other => other.to_string(),
        };
        messages.push(QueuedMessage {
            topic: parsed.topic,
            message: InboundMessage::new(parsed.properties, body),
        });
    }
    Ok(messages)
}

/// Reads a fixture file, naming it in the error.
pub async fn read(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .wrap_err_with(|| format!("Failed to read {}", path.display()))
}
