// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::Command;
use crate::error::CoreError;
use crate::state::{TransitionResult, snapshot};
use case_survey_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use case_survey_domain::{Case, DomainError, LifecycleState, validate_share_point_directory};

/// Applies a lifecycle command to a Case, producing the new Case and an audit event.
///
/// The input Case is never modified. Callers persist `new_case` themselves.
///
/// # Arguments
///
/// * `case` - The current Case (immutable)
/// * `command` - The transition to apply
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
///
/// # Errors
///
/// Returns an error if:
/// - The Case is not in a state the command can start from
/// - A `StartSurvey` directory is missing an identifier
pub fn apply(
    case: &Case,
    command: Command,
    actor: Actor,
    cause: Cause,
) -> Result<TransitionResult, CoreError> {
    let before: StateSnapshot = snapshot(case);
    let name: &'static str = command.name();
    let current: LifecycleState = case.lifecycle_state;

    let (new_case, details): (Case, String) = match command {
        Command::StartSurvey { directory } => {
            require_state(current, &[LifecycleState::New], LifecycleState::SurveyOpened)?;
            validate_share_point_directory(&directory)?;

            let details = format!(
                "Opened survey in directory '{}' on drive '{}'",
                directory.directory_id, directory.drive_id
            );
            let mut new_case: Case = case.clone();
            new_case.lifecycle_state = LifecycleState::SurveyOpened;
            new_case.share_point_directory = Some(directory);
            (new_case, details)
        }
        Command::UpdateSurvey => match current {
            LifecycleState::SurveyOpened => (
                case.clone(),
                format!(
                    "Refreshed survey for {} permission(s)",
                    case.permissions.len()
                ),
            ),
            LifecycleState::Deleted => {
                current.validate_transition(LifecycleState::SurveyOpenedArchive)?;
                let mut new_case: Case = case.clone();
                new_case.lifecycle_state = LifecycleState::SurveyOpenedArchive;
                (new_case, String::from("Archived survey of deleted case"))
            }
            _ => {
                return Err(invalid(current, LifecycleState::SurveyOpened));
            }
        },
        Command::TriggerSurvey => {
            if current == LifecycleState::SurveyOpened {
                let mut new_case: Case = case.clone();
                new_case.lifecycle_state = LifecycleState::SurveyClosing;
                (new_case, String::from("End date reached, closing survey"))
            } else {
                // A trigger that outlived the open survey records but changes nothing.
                (
                    case.clone(),
                    format!("Trigger ignored, survey is {current}"),
                )
            }
        }
        Command::CloseSurvey => {
            require_state(
                current,
                &[LifecycleState::SurveyClosing],
                LifecycleState::SurveyClosed,
            )?;
            let mut new_case: Case = case.clone();
            new_case.lifecycle_state = LifecycleState::SurveyClosed;
            (new_case, String::from("Survey closed"))
        }
    };

    let after: StateSnapshot = snapshot(&new_case);
    let action: Action = Action::new(String::from(name), Some(details));
    let audit_event: AuditEvent = AuditEvent::new(
        actor,
        cause,
        action,
        before,
        after,
        case.id.clone(),
        case.key.clone(),
    );

    Ok(TransitionResult {
        new_case,
        audit_event,
    })
}

/// Checks the current state is one the command starts from and that the
/// lifecycle graph permits the move to `target`.
fn require_state(
    current: LifecycleState,
    allowed: &[LifecycleState],
    target: LifecycleState,
) -> Result<(), CoreError> {
    if !allowed.contains(&current) {
        return Err(invalid(current, target));
    }
    current.validate_transition(target)?;
    Ok(())
}

const fn invalid(from: LifecycleState, to: LifecycleState) -> CoreError {
    CoreError::DomainViolation(DomainError::InvalidLifecycleTransition { from, to })
}
