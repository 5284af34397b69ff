// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod feed;
mod fixtures;

#[cfg(test)]
mod tests;

use case_survey_domain::Case;
use case_survey_persistence::{
    CaseStore, InMemoryAuditLog, InMemoryCaseStore, InMemoryWorkflowStateStore, ScheduledTrigger,
    WorkflowStateStore,
};
use case_survey_pipeline::{
    CaseWorkflow, Collaborators, InMemoryDocumentLibrary, InMemoryEmployeeDirectory,
    InboundMessage, LocalTransport, PipelineConfig, RunSummary, Transition, build_handlers,
};
use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::{Result, eyre::Context};
use feed::FeedTally;
use fixtures::QueuedMessage;
use std::path::PathBuf;
use std::sync::Arc;
use time::OffsetDateTime;
use tokio_util::sync::CancellationToken;
use tracing::level_filters::LevelFilter;
use tracing::{error, info, warn};
use tracing_log::AsTrace;
use tracing_subscriber::EnvFilter;

/// Case Survey Worker - replays survey messages through the transition pipeline
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a JSON pipeline configuration. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON array of Cases to load into the store before replay
    #[arg(long)]
    seed_cases: Option<PathBuf>,

    /// JSON object mapping employee codes to directory records
    #[arg(long)]
    employees: Option<PathBuf>,

    /// Messages to replay, one JSON object per line
    #[arg(short, long)]
    messages: PathBuf,

    /// Overrides `maxDeliveryCount` from the configuration
    #[arg(long)]
    max_delivery_count: Option<u32>,

    /// Overrides `concurrency` from the configuration
    #[arg(long)]
    concurrency: Option<usize>,

    /// Drive new survey directories are provisioned on
    #[arg(long, default_value = "survey-drive")]
    drive_id: String,

    /// After replay, fire every scheduled trigger whose end date has passed
    #[arg(long)]
    fire_due_triggers: bool,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

impl Args {
    fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }

    async fn pipeline_config(&self) -> Result<PipelineConfig> {
        let mut config: PipelineConfig = match &self.config {
            Some(path) => PipelineConfig::load(path).await?,
            None => PipelineConfig::default(),
        };
        if let Some(max_delivery_count) = self.max_delivery_count {
            config.max_delivery_count = max_delivery_count;
        }
        if let Some(concurrency) = self.concurrency {
            config.concurrency = concurrency;
        }
        config.validate()?;
        Ok(config)
    }
}

/// The in-memory collaborators one replay runs against.
struct Stores {
    cases: Arc<InMemoryCaseStore>,
    workflow_state: Arc<InMemoryWorkflowStateStore>,
    audit: Arc<InMemoryAuditLog>,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(args.log_level().into())
                .from_env_lossy(),
        )
        .init();

    if let Err(err) = run(args).await {
        error!("{err:?}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run(args: Args) -> Result<()> {
    let config: PipelineConfig = args.pipeline_config().await?;
    info!(
        service = %config.service_identity.id,
        max_delivery_count = config.max_delivery_count,
        concurrency = config.concurrency,
        "Starting case survey worker"
    );

    let stores = Stores {
        cases: Arc::new(InMemoryCaseStore::new()),
        workflow_state: Arc::new(InMemoryWorkflowStateStore::new()),
        audit: Arc::new(InMemoryAuditLog::new()),
    };
    if let Some(path) = &args.seed_cases {
        let cases: Vec<Case> = fixtures::parse_cases(&fixtures::read(path).await?)?;
        let count: usize = stores
            .cases
            .seed(cases)
            .await
            .wrap_err("Failed to seed the Case store")?;
        info!(count, path = %path.display(), "Seeded Cases");
    }

    let directory = match &args.employees {
        Some(path) => {
            let employees = fixtures::parse_employees(&fixtures::read(path).await?)?;
            info!(count = employees.len(), path = %path.display(), "Loaded employee directory");
            InMemoryEmployeeDirectory::new(employees)
        }
        None => {
            warn!("No employee directory given, every employee check will fail");
            InMemoryEmployeeDirectory::default()
        }
    };

    let workflow = CaseWorkflow::new(
        Arc::clone(&stores.cases) as _,
        Arc::clone(&stores.workflow_state) as _,
        Arc::clone(&stores.audit) as _,
        Arc::new(InMemoryDocumentLibrary::new(&args.drive_id)),
    );
    let collaborators = Collaborators {
        cases: Arc::clone(&stores.cases) as _,
        directory: Arc::new(directory),
        workflow: Arc::new(workflow),
    };

    let mut transport = LocalTransport::new(&config);
    for (transition, handler) in build_handlers(&collaborators, &config) {
        transport.register(transition.topic(), handler);
    }

    let messages: Vec<QueuedMessage> =
        fixtures::parse_messages(&fixtures::read(&args.messages).await?)?;
    info!(count = messages.len(), "Queued messages for replay");
    for queued in messages {
        transport.publish(&queued.topic, queued.message);
    }

    let stop_feed = CancellationToken::new();
    let follower = feed::follow(stores.cases.subscribe(), stop_feed.clone());

    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, letting in-flight messages go back to the queue");
            shutdown.cancel();
        }
    });

    let mut summary: RunSummary = transport.run(&cancel).await;
    if args.fire_due_triggers && !cancel.is_cancelled() {
        let fired: usize = queue_due_triggers(&stores, &mut transport).await?;
        if fired > 0 {
            info!(count = fired, "Firing due triggers");
            merge(&mut summary, transport.run(&cancel).await);
        }
    }

    stop_feed.cancel();
    let changes: FeedTally = follower
        .await
        .wrap_err("Change feed follower stopped unexpectedly")?;

    report(&summary, &changes, transport.pending(), stores.audit.len().await);
    Ok(())
}

/// Publishes a trigger message for every scheduled trigger that is due.
///
/// The message carries the token the trigger was scheduled with, so the
/// trigger handler skips Cases that changed since.
async fn queue_due_triggers(stores: &Stores, transport: &mut LocalTransport) -> Result<usize> {
    let due: Vec<ScheduledTrigger> = stores
        .workflow_state
        .due(OffsetDateTime::now_utc())
        .await
        .wrap_err("Failed to read scheduled triggers")?;

    let mut fired: usize = 0;
    for trigger in due {
        let stored: Option<Case> = stores
            .cases
            .get_by_id_and_key(&trigger.case_id, &trigger.case_key)
            .await
            .wrap_err("Failed to read a triggered Case")?;
        let mut case: Case = match stored {
            Some(case) => case,
            None => Case::new(trigger.case_id.clone(), trigger.case_key.clone()),
        };
        case.version_token = Some(trigger.version_token.clone());

        let message = InboundMessage::for_case(trigger.correlation_id, &case)
            .wrap_err("Failed to encode a trigger message")?;
        transport.publish(Transition::Trigger.topic(), message);
        fired += 1;
    }
    Ok(fired)
}

fn merge(total: &mut RunSummary, run: RunSummary) {
    total.applied += run.applied;
    total.rejected += run.rejected;
    total.skipped += run.skipped;
    total.malformed += run.malformed;
    total.abandoned += run.abandoned;
    total.dead_letters.extend(run.dead_letters);
}

fn report(summary: &RunSummary, changes: &FeedTally, pending: usize, audit_events: usize) {
    for letter in &summary.dead_letters {
        warn!(
            topic = %letter.topic,
            case_code = letter.message.properties.case_code.as_deref().unwrap_or_default(),
            delivery_count = letter.message.properties.delivery_count,
            reason = %letter.reason,
            "Dead-lettered message"
        );
    }
    info!(
        completed = summary.completed(),
        applied = summary.applied,
        rejected = summary.rejected,
        skipped = summary.skipped,
        malformed = summary.malformed,
        dead_lettered = summary.dead_letters.len(),
        pending,
        audit_events,
        cases_written = changes.replaced,
        feed_missed = changes.missed,
        "Replay finished"
    );
}
