// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Rules that consult the directory or the store.

use crate::context::ValidationContext;
use crate::error::HandlerError;
use crate::guard::{self, Freshness};
use crate::validators::TransitionRequest;
use async_trait::async_trait;
use case_survey_domain::{Case, LifecycleState, VersionToken};
use case_survey_rules::{Rule, Severity};

/// Fails when the selected employee code is unknown or inactive.
///
/// An absent code passes; the field's presence rule reports it.
pub struct ActiveEmployee {
    field: &'static str,
    select: fn(&Case) -> Option<&str>,
}

impl ActiveEmployee {
    #[must_use]
    pub const fn new(field: &'static str, select: fn(&Case) -> Option<&str>) -> Self {
        Self { field, select }
    }
}

#[async_trait]
impl Rule<TransitionRequest, ValidationContext> for ActiveEmployee {
    fn field(&self) -> &str {
        self.field
    }

    fn prefetch_keys(&self, target: &TransitionRequest, keys: &mut Vec<String>) {
        if let Some(code) = (self.select)(&target.case) {
            keys.push(code.to_string());
        }
    }

    async fn evaluate(
        &self,
        target: &TransitionRequest,
        ctx: &ValidationContext,
    ) -> Result<Option<String>, HandlerError> {
        let Some(code) = (self.select)(&target.case) else {
            return Ok(None);
        };

        Ok(match ctx.employee(code).await? {
            Some(record) if record.is_active => None,
            Some(record) => Some(format!(
                "Employee '{code}' ({}) is not active",
                record.display_name
            )),
            None => Some(format!("Employee '{code}' does not exist")),
        })
    }
}

/// Requires the Case to be in one of `allowed`, both in the message and in
/// the store.
///
/// Checking the stored state is what turns a redelivered message into a
/// rejection once its transition has been applied.
pub struct LifecycleIn {
    allowed: &'static [LifecycleState],
}

impl LifecycleIn {
    #[must_use]
    pub const fn new(allowed: &'static [LifecycleState]) -> Self {
        Self { allowed }
    }

    fn describe(&self) -> String {
        self.allowed
            .iter()
            .map(LifecycleState::as_str)
            .collect::<Vec<&str>>()
            .join(" or ")
    }
}

#[async_trait]
impl Rule<TransitionRequest, ValidationContext> for LifecycleIn {
    fn field(&self) -> &str {
        "lifecycleState"
    }

    async fn evaluate(
        &self,
        target: &TransitionRequest,
        ctx: &ValidationContext,
    ) -> Result<Option<String>, HandlerError> {
        let case: &Case = &target.case;
        if !self.allowed.contains(&case.lifecycle_state) {
            return Ok(Some(format!(
                "Survey lifecycle must be {} but was {}",
                self.describe(),
                case.lifecycle_state
            )));
        }

        if let Some(stored) = ctx.stored_case(&case.id, &case.key).await?
            && !self.allowed.contains(&stored.lifecycle_state)
        {
            return Ok(Some(format!(
                "Stored Case is already {}",
                stored.lifecycle_state
            )));
        }

        Ok(None)
    }
}

/// The Case a trigger refers to must still be stored.
pub struct CaseExists;

#[async_trait]
impl Rule<TransitionRequest, ValidationContext> for CaseExists {
    fn field(&self) -> &str {
        "id"
    }

    fn severity(&self) -> Severity {
        Severity::Information
    }

    async fn evaluate(
        &self,
        target: &TransitionRequest,
        ctx: &ValidationContext,
    ) -> Result<Option<String>, HandlerError> {
        let case: &Case = &target.case;
        Ok(ctx
            .stored_case(&case.id, &case.key)
            .await?
            .is_none()
            .then(|| format!("Case id={}, key={} no longer exists", case.id, case.key)))
    }
}

/// The stored Case must still have an end date to close on.
pub struct StoredEndDate;

#[async_trait]
impl Rule<TransitionRequest, ValidationContext> for StoredEndDate {
    fn field(&self) -> &str {
        "endDate"
    }

    fn severity(&self) -> Severity {
        Severity::Information
    }

    async fn evaluate(
        &self,
        target: &TransitionRequest,
        ctx: &ValidationContext,
    ) -> Result<Option<String>, HandlerError> {
        let case: &Case = &target.case;
        let stored: Option<&Case> = ctx.stored_case(&case.id, &case.key).await?;
        Ok(stored
            .filter(|stored| stored.end_date.is_none())
            .map(|_| String::from("Stored Case no longer has an end date")))
    }
}

/// The trigger's version token must equal the stored one.
///
/// Deletion and ordinary updates both change the token. They are reported
/// with different messages but the same severity, since either way a newer
/// message now governs the Case.
pub struct VersionMatches;

#[async_trait]
impl Rule<TransitionRequest, ValidationContext> for VersionMatches {
    fn field(&self) -> &str {
        "versionToken"
    }

    fn severity(&self) -> Severity {
        Severity::Information
    }

    async fn evaluate(
        &self,
        target: &TransitionRequest,
        ctx: &ValidationContext,
    ) -> Result<Option<String>, HandlerError> {
        let case: &Case = &target.case;
        let Some(stored) = ctx.stored_case(&case.id, &case.key).await? else {
            return Ok(None);
        };

        let freshness: Freshness =
            guard::compare(case.version_token.as_ref(), stored.version_token.as_ref());
        Ok(match freshness {
            Freshness::Current | Freshness::Missing => None,
            Freshness::Stale { expected, found } => {
                let expected: String = expected
                    .as_ref()
                    .map_or_else(|| String::from("none"), VersionToken::to_string);
                if stored.lifecycle_state == LifecycleState::Deleted {
                    Some(format!(
                        "Case was deleted after the trigger was scheduled (token {expected}, now {found})"
                    ))
                } else {
                    Some(format!(
                        "Case changed after the trigger was scheduled (token {expected}, now {found})"
                    ))
                }
            }
        })
    }
}
