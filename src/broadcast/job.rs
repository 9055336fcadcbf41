//! The paced broadcast state machine.

use std::time::Duration;

use log::{debug, info, warn};
use poise::serenity_prelude::{Permissions, UserId};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::delivery::MessageSink;
use crate::error::{BotError, Result};

/// Permission a requester needs before any mention is sent.
pub const REQUIRED_PERMISSION: Permissions = Permissions::MANAGE_MESSAGES;
pub const REQUIRED_PERMISSION_NAME: &str = "Manage Messages";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BroadcastState {
    Idle,
    Running,
    Completed,
    Cancelled,
    Denied,
}

/// One broadcast, owned by the task that runs it.
#[derive(Debug, Clone)]
pub struct BroadcastJob {
    pub requester_id: UserId,
    pub target_mention: String,
    pub remaining: u32,
    pub interval: Duration,
    state: BroadcastState,
    sent: u32,
    failed: u32,
}

/// Final account of a finished or cancelled broadcast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BroadcastReport {
    pub requester_id: UserId,
    pub state: BroadcastState,
    pub sent: u32,
    pub failed: u32,
    pub skipped: u32,
}

impl BroadcastJob {
    #[must_use]
    pub fn new(
        requester_id: UserId,
        target_mention: String,
        count: u32,
        interval: Duration,
    ) -> Self {
        Self {
            requester_id,
            target_mention,
            remaining: count,
            interval,
            state: BroadcastState::Idle,
            sent: 0,
            failed: 0,
        }
    }

    #[must_use]
    pub fn state(&self) -> BroadcastState {
        self.state
    }

    /// `Idle → Running` when `permissions` include [`REQUIRED_PERMISSION`],
    /// otherwise `Idle → Denied`.
    ///
    /// # Errors
    ///
    /// Returns `MissingPermission` when the requester lacks the permission.
    pub fn authorize(&mut self, permissions: Permissions) -> Result<()> {
        if permissions.contains(REQUIRED_PERMISSION) {
            self.state = BroadcastState::Running;
            Ok(())
        } else {
            warn!(
                "Broadcast by {} denied: missing {REQUIRED_PERMISSION_NAME}",
                self.requester_id
            );
            self.state = BroadcastState::Denied;
            Err(BotError::MissingPermission(REQUIRED_PERMISSION_NAME))
        }
    }

    /// Wait one interval, send one mention, repeat until nothing remains or
    /// `cancel` fires. A failed send is counted and the loop moves on.
    pub async fn run<S: MessageSink>(
        mut self,
        sink: S,
        cancel: CancellationToken,
    ) -> BroadcastReport {
        if self.state != BroadcastState::Running {
            return self.report();
        }

        while self.remaining > 0 {
            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    self.state = BroadcastState::Cancelled;
                    break;
                }
                () = tokio::time::sleep(self.interval) => {}
            }

            match sink.send(&self.target_mention).await {
                Ok(()) => self.sent += 1,
                Err(e) => {
                    warn!(
                        "Broadcast mention {} failed: {e}",
                        self.sent + self.failed + 1
                    );
                    self.failed += 1;
                }
            }
            self.remaining -= 1;
            debug!(
                "Broadcast for {}: {} remaining",
                self.requester_id, self.remaining
            );
        }

        if self.state == BroadcastState::Running {
            self.state = BroadcastState::Completed;
        }
        let report = self.report();
        info!(
            "Broadcast by {} ended {:?}: {} sent, {} failed, {} skipped",
            report.requester_id, report.state, report.sent, report.failed, report.skipped
        );
        report
    }

    fn report(&self) -> BroadcastReport {
        BroadcastReport {
            requester_id: self.requester_id,
            state: self.state,
            sent: self.sent,
            failed: self.failed,
            skipped: self.remaining,
        }
    }
}

/// Starts broadcasts with a fixed count and cadence.
#[derive(Debug, Clone, Copy)]
pub struct PacedBroadcaster {
    count: u32,
    interval: Duration,
}

impl PacedBroadcaster {
    #[must_use]
    pub fn new(count: u32, interval: Duration) -> Self {
        Self { count, interval }
    }

    #[must_use]
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Authorize and spawn a broadcast. Returns as soon as the job is
    /// running; the handle resolves when it ends.
    ///
    /// # Errors
    ///
    /// Returns `MissingPermission` without sending anything when the
    /// requester lacks [`REQUIRED_PERMISSION`].
    pub fn start<S>(
        &self,
        requester_id: UserId,
        permissions: Permissions,
        target_mention: String,
        sink: S,
        cancel: CancellationToken,
    ) -> Result<JoinHandle<BroadcastReport>>
    where
        S: MessageSink + 'static,
    {
        let mut job = BroadcastJob::new(requester_id, target_mention, self.count, self.interval);
        job.authorize(permissions)?;

        info!(
            "Starting broadcast by {requester_id}: {} mentions every {:?}",
            self.count, self.interval
        );
        Ok(tokio::spawn(job.run(sink, cancel)))
    }
}
