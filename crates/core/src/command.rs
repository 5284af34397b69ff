// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use case_survey_domain::SharePointDirectory;

/// A command represents a lifecycle transition request as data only.
///
/// Commands are the only way to request a change to a Case's lifecycle state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Open the survey for a new Case.
    StartSurvey {
        /// The document-library location provisioned for the survey.
        directory: SharePointDirectory,
    },
    /// Re-synchronize an open survey, or archive it once the Case is deleted.
    UpdateSurvey,
    /// The scheduled end-date trigger fired.
    TriggerSurvey,
    /// Close a survey whose end date has passed.
    CloseSurvey,
}

impl Command {
    /// Returns the action name recorded in audit events.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::StartSurvey { .. } => "StartSurvey",
            Self::UpdateSurvey => "UpdateSurvey",
            Self::TriggerSurvey => "TriggerSurvey",
            Self::CloseSurvey => "CloseSurvey",
        }
    }
}
