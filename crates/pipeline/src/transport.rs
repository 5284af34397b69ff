// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! An in-process message transport with at-least-once delivery.
//!
//! Messages are queued per topic and handed to the topic's handler. A
//! handler error triggers redelivery until the configured delivery limit is
//! reached, after which the message moves to the dead-letter list together
//! with the last error.

use crate::config::PipelineConfig;
use crate::envelope::InboundMessage;
use crate::error::HandlerError;
use crate::handler::{HandleOutcome, MessageHandler};
use futures::stream::{self, StreamExt};
use std::collections::{HashMap, VecDeque};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// A message the transport gave up on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeadLetter {
    pub topic: String,
    pub message: InboundMessage,
    pub reason: String,
}

/// Totals for one `LocalTransport::run`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub applied: usize,
    pub rejected: usize,
    pub skipped: usize,
    pub malformed: usize,
    /// Messages left queued because the run was cancelled.
    pub abandoned: usize,
    pub dead_letters: Vec<DeadLetter>,
}

impl RunSummary {
    /// Returns the number of messages the handlers settled.
    #[must_use]
    pub const fn completed(&self) -> usize {
        self.applied + self.rejected + self.skipped + self.malformed
    }

    fn record(&mut self, outcome: &HandleOutcome) {
        match outcome {
            HandleOutcome::Applied => self.applied += 1,
            HandleOutcome::Rejected(_) => self.rejected += 1,
            HandleOutcome::Skipped(_) => self.skipped += 1,
            HandleOutcome::Malformed(_) => self.malformed += 1,
        }
    }
}

enum Settlement {
    Completed(HandleOutcome),
    DeadLettered(DeadLetter),
    Abandoned { topic: String, message: InboundMessage },
}

/// Topic queues and their handlers.
pub struct LocalTransport {
    handlers: HashMap<String, MessageHandler>,
    queue: VecDeque<(String, InboundMessage)>,
    max_delivery_count: u32,
    concurrency: usize,
}

impl LocalTransport {
    /// Creates a transport with no handlers and an empty queue.
    #[must_use]
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            handlers: HashMap::new(),
            queue: VecDeque::new(),
            max_delivery_count: config.max_delivery_count,
            concurrency: config.concurrency.max(1),
        }
    }

    /// Subscribes `handler` to `topic`, replacing any earlier subscription.
    pub fn register(&mut self, topic: &str, handler: MessageHandler) {
        debug!(topic, handler = handler.name(), "Registered handler");
        self.handlers.insert(topic.to_string(), handler);
    }

    /// Queues a message on `topic`.
    pub fn publish(&mut self, topic: &str, message: InboundMessage) {
        self.queue.push_back((topic.to_string(), message));
    }

    /// Returns the number of queued messages.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Delivers every queued message, up to `concurrency` at a time.
    ///
    /// Messages still in flight when `cancel` fires go back on the queue.
    pub async fn run(&mut self, cancel: &CancellationToken) -> RunSummary {
        let batch: Vec<(String, InboundMessage)> = self.queue.drain(..).collect();

        let settlements: Vec<Settlement> = {
            let transport: &Self = self;
            stream::iter(batch)
                .map(|(topic, message)| transport.deliver(topic, message, cancel))
                .buffer_unordered(transport.concurrency)
                .collect()
                .await
        };

        let mut summary = RunSummary::default();
        for settlement in settlements {
            match settlement {
                Settlement::Completed(outcome) => summary.record(&outcome),
                Settlement::DeadLettered(letter) => summary.dead_letters.push(letter),
                Settlement::Abandoned { topic, message } => {
                    summary.abandoned += 1;
                    self.queue.push_back((topic, message));
                }
            }
        }
        summary
    }

    async fn deliver(
        &self,
        topic: String,
        mut message: InboundMessage,
        cancel: &CancellationToken,
    ) -> Settlement {
        let Some(handler) = self.handlers.get(&topic) else {
            warn!(%topic, "No handler registered, dead-lettering message");
            let reason: String = format!("No handler registered for topic '{topic}'");
            return Settlement::DeadLettered(DeadLetter {
                topic,
                message,
                reason,
            });
        };

        let mut last_error: Option<String> = None;
        while message.properties.delivery_count < self.max_delivery_count {
            if cancel.is_cancelled() {
                return Settlement::Abandoned { topic, message };
            }

            message.properties.delivery_count += 1;
            match handler.handle(&message, cancel).await {
                Ok(outcome) => return Settlement::Completed(outcome),
                Err(HandlerError::Cancelled) => {
                    // A cancelled attempt does not count as a delivery.
                    message.properties.delivery_count -= 1;
                    return Settlement::Abandoned { topic, message };
                }
                Err(err) => last_error = Some(err.to_string()),
            }
        }

        warn!(
            %topic,
            delivery_count = message.properties.delivery_count,
            max_delivery_count = self.max_delivery_count,
            "Delivery limit reached, dead-lettering message"
        );
        let reason: String =
            last_error.unwrap_or_else(|| String::from("Delivery limit reached before delivery"));
        Settlement::DeadLettered(DeadLetter {
            topic,
            message,
            reason,
        })
    }
}
