// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    CaseWorkflow, Collaborators, EmployeeRecord, HandleOutcome, InMemoryDocumentLibrary,
    InMemoryEmployeeDirectory, InboundMessage, MessageHandler, PipelineConfig, SurveyWorkflow,
    Transition, ValidationContext, WorkflowError, build_handler,
};
use async_trait::async_trait;
use case_survey_audit::Actor;
use case_survey_domain::{Case, CaseId, CaseKey, LifecycleState, Permission, SharePointDirectory};
use case_survey_persistence::{
    CaseStore, InMemoryAuditLog, InMemoryCaseStore, InMemoryWorkflowStateStore,
};
use case_survey_rules::RuleFailure;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use time::macros::datetime;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

pub fn create_test_correlation_id() -> Uuid {
    Uuid::from_u128(0x6c8e_4a1f_0d2b_4f3e_9a57_1b2c_3d4e_5f60)
}

pub fn create_test_config() -> PipelineConfig {
    PipelineConfig {
        max_delivery_count: 3,
        ..PipelineConfig::default()
    }
}

/// Creates a Case that satisfies every rule of the transition out of `state`.
pub fn create_test_case(state: LifecycleState) -> Case {
    let mut case: Case = Case::new(CaseId::new("case-1"), CaseKey::new("C-100"));
    case.lifecycle_state = state;
    case.manager_employee_code = Some(String::from("E1"));
    case.billing_partner_employee_code = Some(String::from("E3"));
    case.end_date = Some(datetime!(2026-06-30 17:00 UTC));
    case.case_name = Some(String::from("Acme diligence"));
    case.unique_id = Some(String::from("U-100"));
    case.primary_capability = Some(String::from("Audit"));
    case.permissions = vec![Permission {
        employee_code: String::from("E2"),
        role: String::from("Reader"),
    }];
    if state != LifecycleState::New {
        case.share_point_directory = Some(SharePointDirectory::new("f1", "d1"));
    }
    case
}

/// Creates a directory where E1 and E2 are active and E9 has left.
pub fn create_test_directory() -> Arc<InMemoryEmployeeDirectory> {
    create_directory_with(&[("E1", true), ("E2", true), ("E9", false)])
}

pub fn create_directory_with(employees: &[(&str, bool)]) -> Arc<InMemoryEmployeeDirectory> {
    let records: HashMap<String, EmployeeRecord> = employees
        .iter()
        .map(|(code, active)| {
            (
                (*code).to_string(),
                EmployeeRecord::new(&format!("Employee {code}"), *active),
            )
        })
        .collect();
    Arc::new(InMemoryEmployeeDirectory::new(records))
}

/// Encodes a message for `case` as its first delivery.
pub fn create_test_message(case: &Case) -> InboundMessage {
    let mut message: InboundMessage =
        InboundMessage::for_case(create_test_correlation_id(), case).unwrap();
    message.properties.delivery_count = 1;
    message
}

pub fn create_test_context(
    store: &Arc<InMemoryCaseStore>,
    directory: &Arc<InMemoryEmployeeDirectory>,
) -> ValidationContext {
    ValidationContext::new(
        create_test_correlation_id(),
        Arc::clone(directory) as _,
        Arc::clone(store) as _,
        CancellationToken::new(),
    )
}

/// Inserts `case` and returns it as stored, with its assigned token.
pub async fn store_case(store: &InMemoryCaseStore, case: Case) -> Case {
    store.insert(case).await.unwrap()
}

pub fn failure_fields(failures: &[RuleFailure]) -> Vec<&str> {
    failures.iter().map(|f| f.field.as_str()).collect()
}

pub fn expect_rejected(outcome: HandleOutcome) -> Vec<RuleFailure> {
    match outcome {
        HandleOutcome::Rejected(failures) => failures,
        other => panic!("Expected Rejected, got {other:?}"),
    }
}

pub fn expect_skipped(outcome: HandleOutcome) -> Vec<RuleFailure> {
    match outcome {
        HandleOutcome::Skipped(failures) => failures,
        other => panic!("Expected Skipped, got {other:?}"),
    }
}

// ============================================================================
// Workflow fakes
// ============================================================================

/// One recorded action invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub action: &'static str,
    pub case: Case,
    pub actor: Actor,
    pub correlation_id: Uuid,
}

/// Records every action and optionally fails them all.
#[derive(Default)]
pub struct RecordingWorkflow {
    invocations: Mutex<Vec<Invocation>>,
    fail: bool,
}

impl RecordingWorkflow {
    pub fn failing() -> Self {
        Self {
            invocations: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.lock().unwrap().clone()
    }

    fn record(
        &self,
        action: &'static str,
        case: Case,
        actor: &Actor,
        correlation_id: Uuid,
    ) -> Result<(), WorkflowError> {
        self.invocations.lock().unwrap().push(Invocation {
            action,
            case,
            actor: actor.clone(),
            correlation_id,
        });
        if self.fail {
            return Err(WorkflowError::Provisioning(String::from(
                "document library timed out",
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl SurveyWorkflow for RecordingWorkflow {
    async fn start_survey(&self, case: Case, actor: &Actor, id: Uuid) -> Result<(), WorkflowError> {
        self.record("start_survey", case, actor, id)
    }

    async fn update_survey(&self, case: Case, actor: &Actor, id: Uuid) -> Result<(), WorkflowError> {
        self.record("update_survey", case, actor, id)
    }

    async fn close_survey(&self, case: Case, actor: &Actor, id: Uuid) -> Result<(), WorkflowError> {
        self.record("close_survey", case, actor, id)
    }

    async fn trigger_survey(&self, case: Case, actor: &Actor, id: Uuid) -> Result<(), WorkflowError> {
        self.record("trigger_survey", case, actor, id)
    }

    async fn schedule_trigger(
        &self,
        case: Case,
        actor: &Actor,
        id: Uuid,
    ) -> Result<(), WorkflowError> {
        self.record("schedule_trigger", case, actor, id)
    }
}

// ============================================================================
// Harnesses
// ============================================================================

/// Handlers wired to a recording workflow.
pub struct RecordingHarness {
    pub cases: Arc<InMemoryCaseStore>,
    pub directory: Arc<InMemoryEmployeeDirectory>,
    pub workflow: Arc<RecordingWorkflow>,
}

impl RecordingHarness {
    pub fn new() -> Self {
        Self::with_workflow(RecordingWorkflow::default())
    }

    pub fn with_workflow(workflow: RecordingWorkflow) -> Self {
        Self {
            cases: Arc::new(InMemoryCaseStore::new()),
            directory: create_test_directory(),
            workflow: Arc::new(workflow),
        }
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            cases: Arc::clone(&self.cases) as _,
            directory: Arc::clone(&self.directory) as _,
            workflow: Arc::clone(&self.workflow) as _,
        }
    }

    pub fn handler(&self, transition: Transition) -> MessageHandler {
        build_handler(transition, &self.collaborators(), &create_test_config())
    }
}

/// Handlers wired to the real workflow over in-memory stores.
pub struct WorkflowHarness {
    pub cases: Arc<InMemoryCaseStore>,
    pub workflow_state: Arc<InMemoryWorkflowStateStore>,
    pub audit: Arc<InMemoryAuditLog>,
    pub library: Arc<InMemoryDocumentLibrary>,
    pub directory: Arc<InMemoryEmployeeDirectory>,
}

impl WorkflowHarness {
    pub fn new() -> Self {
        Self {
            cases: Arc::new(InMemoryCaseStore::new()),
            workflow_state: Arc::new(InMemoryWorkflowStateStore::new()),
            audit: Arc::new(InMemoryAuditLog::new()),
            library: Arc::new(InMemoryDocumentLibrary::new("d1")),
            directory: create_test_directory(),
        }
    }

    pub fn workflow(&self) -> CaseWorkflow {
        CaseWorkflow::new(
            Arc::clone(&self.cases) as _,
            Arc::clone(&self.workflow_state) as _,
            Arc::clone(&self.audit) as _,
            Arc::clone(&self.library) as _,
        )
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            cases: Arc::clone(&self.cases) as _,
            directory: Arc::clone(&self.directory) as _,
            workflow: Arc::new(self.workflow()),
        }
    }

    pub fn handler(&self, transition: Transition) -> MessageHandler {
        build_handler(transition, &self.collaborators(), &create_test_config())
    }

    pub async fn stored(&self, case: &Case) -> Case {
        self.cases
            .get_by_id_and_key(&case.id, &case.key)
            .await
            .unwrap()
            .unwrap()
    }
}
