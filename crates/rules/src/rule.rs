// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::outcome::Severity;
use async_trait::async_trait;

/// Per-invocation state shared by every rule of one validation pass.
///
/// A context typically wraps the external collaborators async rules read from
/// and caches what they return for the lifetime of the pass.
#[async_trait]
pub trait RuleContext: Send + Sync {
    /// Failure raised by an external collaborator during validation.
    type Error: Send;

    /// Loads every key the pass will need in one batch.
    ///
    /// Keys arrive deduplicated and sorted. The default does nothing.
    ///
    /// # Errors
    ///
    /// Returns the collaborator's error if the batch lookup fails.
    async fn prefetch(&self, _keys: Vec<String>) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// A named check bound to one field of `T`.
#[async_trait]
pub trait Rule<T, C: RuleContext>: Send + Sync {
    /// The field path this rule is bound to.
    fn field(&self) -> &str;

    /// The severity reported when the rule fails.
    fn severity(&self) -> Severity {
        Severity::Error
    }

    /// Adds the lookup keys this rule will read from the context.
    fn prefetch_keys(&self, _target: &T, _keys: &mut Vec<String>) {}

    /// Evaluates the rule.
    ///
    /// Returns `Ok(None)` when the rule passes and `Ok(Some(message))` when it
    /// fails. The message is only built on failure.
    ///
    /// # Errors
    ///
    /// Returns the context's error if an external lookup fails. This is not a
    /// rule failure and aborts the pass.
    async fn evaluate(&self, target: &T, ctx: &C) -> Result<Option<String>, C::Error>;
}

type Predicate<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;
type MessageBuilder<T> = Box<dyn Fn(&T) -> String + Send + Sync>;

/// A synchronous rule built from a predicate and a lazily formatted message.
pub struct Check<T> {
    field: String,
    severity: Severity,
    predicate: Predicate<T>,
    message: MessageBuilder<T>,
}

impl<T> Check<T> {
    /// Creates an Error-severity check.
    ///
    /// # Arguments
    ///
    /// * `field` - The field path reported on failure
    /// * `predicate` - Returns true when the payload satisfies the rule
    /// * `message` - Builds the failure message from the failing payload
    pub fn new<P, M>(field: &str, predicate: P, message: M) -> Self
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
        M: Fn(&T) -> String + Send + Sync + 'static,
    {
        Self {
            field: field.to_string(),
            severity: Severity::Error,
            predicate: Box::new(predicate),
            message: Box::new(message),
        }
    }

    /// Changes the severity reported on failure.
    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

#[async_trait]
impl<T, C> Rule<T, C> for Check<T>
where
    T: Send + Sync,
    C: RuleContext,
{
    fn field(&self) -> &str {
        &self.field
    }

    fn severity(&self) -> Severity {
        self.severity
    }

    async fn evaluate(&self, target: &T, _ctx: &C) -> Result<Option<String>, C::Error> {
        if (self.predicate)(target) {
            Ok(None)
        } else {
            Ok(Some((self.message)(target)))
        }
    }
}
