//! Asynchronous job polling
//!
//! Tracks one server-side job from submission to a terminal status,
//! publishing each observed snapshot to the session owner. The loop
//! state is an explicit machine value advanced at fixed points rather
//! than ambient flags, which keeps the cancellation races testable.
//!
//! One session issues at most one status fetch at a time: the tick
//! interval uses delayed catch-up, so a slow fetch pushes the next tick
//! back instead of letting a second fetch start for the same job.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use glossa_core::domain::job::{Job, JobStatus, TerminalSet};
use glossa_core::normalize::map_single_job;

use crate::error::{ClientError, Result};

/// Number of events buffered per session before the driver awaits the
/// owner.
const EVENT_BUFFER: usize = 16;

/// Where the poller gets raw job status payloads from.
///
/// The transport implements this; tests substitute a scripted source.
#[async_trait]
pub trait JobStatusSource: Send + Sync + 'static {
    async fn fetch_status(&self, job_id: i64) -> Result<Value>;
}

/// Poll cadence and termination configuration for one job kind
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Time between status fetches. The first fetch is immediate.
    pub interval: Duration,
    /// Statuses that end the session, supplied per job kind.
    pub terminal: TerminalSet,
}

impl PollConfig {
    pub fn new(interval: Duration, terminal: TerminalSet) -> Self {
        Self { interval, terminal }
    }
}

/// Poll session state.
///
/// `Active` is the only state with outgoing transitions; a finished
/// session never resurrects, whatever arrives afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Active,
    Completed,
    Cancelled,
}

impl PollState {
    /// Apply one observed status against the terminal set
    pub fn observe(self, status: JobStatus, terminal: &TerminalSet) -> PollState {
        match self {
            PollState::Active if terminal.contains(status) => PollState::Completed,
            other => other,
        }
    }
}

/// Incremental observations published to the session owner
#[derive(Debug, Clone)]
pub enum PollEvent {
    /// A successfully fetched and normalized job snapshot
    Update(Job),
    /// A tick whose fetch or mapping failed. The session stays active
    /// and retries on the next tick.
    FetchFailed(String),
}

/// How a poll session ended
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// A terminal status was observed; carries the final snapshot
    Completed(Job),
    /// The owner cancelled the session or dropped its event receiver
    Cancelled,
}

/// Handle owned by the caller of [`JobPoller::spawn`]
pub struct PollHandle {
    cancel: CancellationToken,
    task: JoinHandle<PollOutcome>,
}

impl PollHandle {
    /// Stop the session.
    ///
    /// No further ticks fire. A fetch already in flight is not
    /// interrupted on the wire, but its result is dropped when it
    /// arrives and cannot resurrect the session.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Wait for the session to finish and take its outcome
    pub async fn join(self) -> PollOutcome {
        match self.task.await {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(error = %err, "poll session task failed");
                PollOutcome::Cancelled
            }
        }
    }
}

/// Drives poll sessions against a status source.
///
/// Sessions are independent: each `spawn` owns its own timer, state,
/// and event channel, and nothing is shared between jobs.
pub struct JobPoller<S> {
    source: Arc<S>,
    config: PollConfig,
}

impl<S: JobStatusSource> JobPoller<S> {
    pub fn new(source: S, config: PollConfig) -> Self {
        Self {
            source: Arc::new(source),
            config,
        }
    }

    /// Open a poll session for one job.
    ///
    /// The first fetch happens immediately; subsequent fetches run at
    /// the configured interval, each strictly after the previous one
    /// completes. Returns the session handle and the event stream.
    pub fn spawn(&self, job_id: i64) -> (PollHandle, mpsc::Receiver<PollEvent>) {
        let (events, receiver) = mpsc::channel(EVENT_BUFFER);
        let cancel = CancellationToken::new();
        let task = tokio::spawn(run_session(
            Arc::clone(&self.source),
            self.config.clone(),
            job_id,
            events,
            cancel.clone(),
        ));
        (PollHandle { cancel, task }, receiver)
    }
}

async fn run_session<S: JobStatusSource>(
    source: Arc<S>,
    config: PollConfig,
    job_id: i64,
    events: mpsc::Sender<PollEvent>,
    cancel: CancellationToken,
) -> PollOutcome {
    debug!(
        job_id,
        interval_ms = config.interval.as_millis() as u64,
        "poll session started"
    );

    let mut ticker = time::interval(config.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut state = PollState::Active;

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(job_id, "poll session cancelled");
                return PollOutcome::Cancelled;
            }
            _ = ticker.tick() => {}
        }

        let fetched = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(job_id, "poll session cancelled with fetch in flight");
                return PollOutcome::Cancelled;
            }
            fetched = source.fetch_status(job_id) => fetched,
        };

        match fetched.and_then(|raw| map_single_job(&raw).map_err(ClientError::from)) {
            Ok(job) => {
                if events.send(PollEvent::Update(job.clone())).await.is_err() {
                    debug!(job_id, "poll events receiver dropped; disposing session");
                    return PollOutcome::Cancelled;
                }
                state = state.observe(job.status, &config.terminal);
                if state == PollState::Completed {
                    debug!(job_id, status = %job.status, "poll session reached terminal status");
                    return PollOutcome::Completed(job);
                }
            }
            Err(err) => {
                warn!(job_id, error = %err, "poll tick failed; retrying on next tick");
                if events
                    .send(PollEvent::FetchFailed(err.to_string()))
                    .await
                    .is_err()
                {
                    debug!(job_id, "poll events receiver dropped; disposing session");
                    return PollOutcome::Cancelled;
                }
            }
        }
    }
}
