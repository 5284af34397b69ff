// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::outcome::{RuleFailure, Severity, ValidationReport};
use crate::rule::{Check, Rule, RuleContext};
use futures::future::BoxFuture;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

/// A child validator applied to part of the parent payload.
trait Child<T, C: RuleContext>: Send + Sync {
    fn collect_keys(&self, target: &T, keys: &mut Vec<String>);

    fn run<'a>(
        &'a self,
        target: &'a T,
        ctx: &'a C,
        prefix: &'a str,
        report: &'a mut ValidationReport,
    ) -> BoxFuture<'a, Result<(), C::Error>>;
}

/// Applies a shared validator to the same payload type.
struct Included<T, C: RuleContext> {
    validator: Arc<Validator<T, C>>,
}

impl<T, C> Child<T, C> for Included<T, C>
where
    T: Send + Sync + 'static,
    C: RuleContext + 'static,
{
    fn collect_keys(&self, target: &T, keys: &mut Vec<String>) {
        self.validator.collect_keys(target, keys);
    }

    fn run<'a>(
        &'a self,
        target: &'a T,
        ctx: &'a C,
        prefix: &'a str,
        report: &'a mut ValidationReport,
    ) -> BoxFuture<'a, Result<(), C::Error>> {
        self.validator.run(target, ctx, prefix, report)
    }
}

/// Applies a shared validator to a sub-record of the payload.
struct Nested<T, S, C: RuleContext> {
    path: String,
    project: for<'t> fn(&'t T) -> Option<&'t S>,
    validator: Arc<Validator<S, C>>,
}

impl<T, S, C> Child<T, C> for Nested<T, S, C>
where
    T: Send + Sync + 'static,
    S: Send + Sync + 'static,
    C: RuleContext + 'static,
{
    fn collect_keys(&self, target: &T, keys: &mut Vec<String>) {
        if let Some(sub) = (self.project)(target) {
            self.validator.collect_keys(sub, keys);
        }
    }

    fn run<'a>(
        &'a self,
        target: &'a T,
        ctx: &'a C,
        prefix: &'a str,
        report: &'a mut ValidationReport,
    ) -> BoxFuture<'a, Result<(), C::Error>> {
        Box::pin(async move {
            // An absent sub-record is reported by the parent's presence rule.
            let Some(sub) = (self.project)(target) else {
                return Ok(());
            };
            let path: String = join(prefix, &self.path);
            self.validator.run(sub, ctx, &path, report).await
        })
    }
}

/// An immutable set of rules and child validators for payloads of type `T`.
///
/// Validators are built once and shared; every call to [`Validator::validate`]
/// gets its own context.
pub struct Validator<T, C: RuleContext> {
    rules: Vec<Box<dyn Rule<T, C>>>,
    children: Vec<Box<dyn Child<T, C>>>,
}

impl<T, C> Default for Validator<T, C>
where
    T: Send + Sync + 'static,
    C: RuleContext + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C> Validator<T, C>
where
    T: Send + Sync + 'static,
    C: RuleContext + 'static,
{
    /// Creates a validator with no rules.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Adds a rule.
    #[must_use]
    pub fn rule<R>(mut self, rule: R) -> Self
    where
        R: Rule<T, C> + 'static,
    {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds an Error-severity synchronous check.
    #[must_use]
    pub fn check<P, M>(self, field: &str, predicate: P, message: M) -> Self
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
        M: Fn(&T) -> String + Send + Sync + 'static,
    {
        self.rule(Check::new(field, predicate, message))
    }

    /// Adds an Information-severity synchronous check.
    #[must_use]
    pub fn notice<P, M>(self, field: &str, predicate: P, message: M) -> Self
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
        M: Fn(&T) -> String + Send + Sync + 'static,
    {
        self.rule(Check::new(field, predicate, message).with_severity(Severity::Information))
    }

    /// Runs every rule of `validator` against the same payload.
    #[must_use]
    pub fn include(mut self, validator: Arc<Self>) -> Self {
        self.children.push(Box::new(Included { validator }));
        self
    }

    /// Runs `validator` against the sub-record selected by `project`.
    ///
    /// Failures are reported under `path`. When `project` returns `None` the
    /// child validator is skipped.
    #[must_use]
    pub fn nested<S>(
        mut self,
        path: &str,
        project: for<'t> fn(&'t T) -> Option<&'t S>,
        validator: Arc<Validator<S, C>>,
    ) -> Self
    where
        S: Send + Sync + 'static,
    {
        self.children.push(Box::new(Nested {
            path: path.to_string(),
            project,
            validator,
        }));
        self
    }

    /// Validates `target`, returning every failure.
    ///
    /// # Errors
    ///
    /// Returns the context's error if the batched prefetch or an async rule's
    /// lookup fails. Rule failures are never errors.
    pub async fn validate(&self, target: &T, ctx: &C) -> Result<ValidationReport, C::Error> {
        let mut keys: Vec<String> = Vec::new();
        self.collect_keys(target, &mut keys);
        let unique: BTreeSet<String> = keys.into_iter().collect();
        if !unique.is_empty() {
            ctx.prefetch(unique.into_iter().collect()).await?;
        }

        let mut report: ValidationReport = ValidationReport::new();
        self.run(target, ctx, "", &mut report).await?;
        Ok(report)
    }

    fn collect_keys(&self, target: &T, keys: &mut Vec<String>) {
        for rule in &self.rules {
            rule.prefetch_keys(target, keys);
        }
        for child in &self.children {
            child.collect_keys(target, keys);
        }
    }

    fn run<'a>(
        &'a self,
        target: &'a T,
        ctx: &'a C,
        prefix: &'a str,
        report: &'a mut ValidationReport,
    ) -> BoxFuture<'a, Result<(), C::Error>> {
        Box::pin(async move {
            for rule in &self.rules {
                if let Some(message) = rule.evaluate(target, ctx).await? {
                    let field: String = join(prefix, rule.field());
                    debug!(field = %field, severity = %rule.severity(), "Rule failed");
                    report.push(RuleFailure::new(field, message, rule.severity()));
                }
            }
            for child in &self.children {
                child.run(target, ctx, prefix, report).await?;
            }
            Ok(())
        })
    }
}

fn join(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{prefix}.{field}")
    }
}
