// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Follows the Case change feed while messages replay.
//!
//! Every committed transition re-enters the feed. The worker stands in for
//! the downstream consumers and tallies what it sees.

use case_survey_persistence::{CaseChange, ChangeKind};
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Writes observed on the change feed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedTally {
    pub inserted: usize,
    pub replaced: usize,
    /// Changes dropped because the follower fell behind.
    pub missed: u64,
}

impl FeedTally {
    fn record(&mut self, change: &CaseChange) {
        debug!(
            kind = ?change.kind,
            case = %change.case.summary(),
            "Case re-entered the change feed"
        );
        match change.kind {
            ChangeKind::Inserted => self.inserted += 1,
            ChangeKind::Replaced => self.replaced += 1,
        }
    }

    fn lagged(&mut self, skipped: u64) {
        warn!(skipped, "Change feed follower fell behind");
        self.missed += skipped;
    }
}

/// Consumes `feed` until `stop` fires, then drains what is already buffered.
pub fn follow(
    mut feed: broadcast::Receiver<CaseChange>,
    stop: CancellationToken,
) -> JoinHandle<FeedTally> {
    tokio::spawn(async move {
        let mut tally = FeedTally::default();
        loop {
            tokio::select! {
                received = feed.recv() => match received {
                    Ok(change) => tally.record(&change),
                    Err(RecvError::Lagged(skipped)) => tally.lagged(skipped),
                    Err(RecvError::Closed) => return tally,
                },
                () = stop.cancelled() => break,
            }
        }

        loop {
            match feed.try_recv() {
                Ok(change) => tally.record(&change),
                Err(TryRecvError::Lagged(skipped)) => tally.lagged(skipped),
                Err(TryRecvError::Empty | TryRecvError::Closed) => return tally,
            }
        }
    })
}
