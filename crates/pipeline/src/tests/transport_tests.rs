// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{
    RecordingHarness, RecordingWorkflow, WorkflowHarness, create_test_case, create_test_config,
    create_test_message, store_case,
};
use crate::{
    InboundMessage, LocalTransport, MessageProperties, PipelineConfig, RunSummary, Transition,
};
use case_survey_domain::LifecycleState;
use tokio_util::sync::CancellationToken;

fn transport_for(harness: &RecordingHarness, config: &PipelineConfig) -> LocalTransport {
    let mut transport = LocalTransport::new(config);
    for transition in Transition::ALL {
        transport.register(transition.topic(), harness.handler(transition));
    }
    transport
}

#[tokio::test]
async fn test_settled_messages_complete() {
    let harness = RecordingHarness::new();
    let mut transport = transport_for(&harness, &create_test_config());
    let case = create_test_case(LifecycleState::New);
    transport.publish(Transition::Start.topic(), create_test_message(&case));
    transport.publish(
        Transition::Start.topic(),
        InboundMessage::new(MessageProperties::default(), String::from("garbage")),
    );

    let summary: RunSummary = transport.run(&CancellationToken::new()).await;

    assert_eq!(summary.applied, 1);
    assert_eq!(summary.malformed, 1);
    assert_eq!(summary.completed(), 2);
    assert!(summary.dead_letters.is_empty());
    assert_eq!(transport.pending(), 0);
}

#[tokio::test]
async fn test_failing_action_is_retried_then_dead_lettered() {
    let harness = RecordingHarness::with_workflow(RecordingWorkflow::failing());
    let config = create_test_config();
    let mut transport = transport_for(&harness, &config);
    let mut message = create_test_message(&create_test_case(LifecycleState::New));
    message.properties.delivery_count = 0;
    transport.publish(Transition::Start.topic(), message);

    let summary = transport.run(&CancellationToken::new()).await;

    assert_eq!(summary.completed(), 0);
    assert_eq!(summary.dead_letters.len(), 1);
    let letter = &summary.dead_letters[0];
    assert_eq!(letter.message.properties.delivery_count, config.max_delivery_count);
    assert!(letter.reason.contains("document library timed out"));
    assert_eq!(
        harness.workflow.invocations().len(),
        config.max_delivery_count as usize
    );
}

#[tokio::test]
async fn test_unknown_topic_is_dead_lettered() {
    let harness = RecordingHarness::new();
    let mut transport = transport_for(&harness, &create_test_config());
    transport.publish(
        "survey-publish",
        create_test_message(&create_test_case(LifecycleState::SurveyClosed)),
    );

    let summary = transport.run(&CancellationToken::new()).await;

    assert_eq!(summary.dead_letters.len(), 1);
    assert_eq!(
        summary.dead_letters[0].reason,
        "No handler registered for topic 'survey-publish'"
    );
}

#[tokio::test]
async fn test_cancelled_run_leaves_messages_queued() {
    let harness = RecordingHarness::new();
    let mut transport = transport_for(&harness, &create_test_config());
    transport.publish(
        Transition::Start.topic(),
        create_test_message(&create_test_case(LifecycleState::New)),
    );
    let cancel = CancellationToken::new();
    cancel.cancel();

    let summary = transport.run(&cancel).await;

    assert_eq!(summary.abandoned, 1);
    assert_eq!(transport.pending(), 1);
    assert!(harness.workflow.invocations().is_empty());
}

#[tokio::test]
async fn test_duplicate_deliveries_apply_once() {
    let harness = WorkflowHarness::new();
    let stored = store_case(&harness.cases, create_test_case(LifecycleState::New)).await;
    let mut transport = LocalTransport::new(&PipelineConfig {
        concurrency: 1,
        ..create_test_config()
    });
    transport.register(Transition::Start.topic(), harness.handler(Transition::Start));
    transport.publish(Transition::Start.topic(), create_test_message(&stored));
    transport.publish(Transition::Start.topic(), create_test_message(&stored));

    let summary = transport.run(&CancellationToken::new()).await;

    assert_eq!(summary.applied, 1);
    assert_eq!(summary.rejected, 1);
    assert_eq!(harness.audit.len().await, 1);
}
