//! Poll worker
//!
//! Polls the order API for pending orders, downloads each order's print file
//! and marks the order as sent.
//!
//! A [`RecurringTimer`] decides when a poll is due; the poll itself runs on an
//! [`ExecutionSlot`], so polls never overlap and a slow poll delays the next
//! one instead of piling up. Any failure during a poll stops the worker: the
//! API is assumed unreachable or misconfigured until the host restarts it.

use hmp_client::Result as ClientResult;
use hmp_core::domain::order::OrderStatus;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::repository::OrderRepository;
use crate::scheduler::{ExecutionSlot, RecurringTimer, SubmitOutcome};

/// Reasons a worker refuses to start
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorkerError {
    /// No repository has been configured yet
    #[error("no order repository configured")]
    NotConfigured,

    /// The poll interval is zero
    #[error("poll interval must be greater than 0")]
    InvalidInterval,

    /// The worker has been shut down
    #[error("poll worker has been shut down")]
    ShutDown,
}

/// Timer-driven orchestrator of polls
///
/// Lifecycle: stopped → running → stopped. The execution slot lives as long
/// as the worker; the timer only while running.
#[derive(Debug)]
pub struct PollWorker {
    shared: Arc<Shared>,
    slot: ExecutionSlot,
}

#[derive(Debug)]
struct Shared {
    /// Where downloaded print files go
    destination: PathBuf,
    /// Never held across an await point
    state: Mutex<State>,
}

impl Shared {
    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Default)]
struct State {
    repository: Option<Arc<dyn OrderRepository>>,
    timer: Option<RecurringTimer>,
    /// Bumped on every start, identifies which run a poll belongs to
    generation: u64,
}

impl State {
    fn is_current(&self, generation: u64) -> bool {
        self.timer.is_some() && self.generation == generation
    }

    fn halt(&mut self) -> bool {
        match self.timer.take() {
            Some(timer) => {
                timer.cancel();
                true
            }
            None => false,
        }
    }
}

impl std::fmt::Debug for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("State")
            .field("configured", &self.repository.is_some())
            .field("running", &self.timer.is_some())
            .field("generation", &self.generation)
            .finish()
    }
}

impl PollWorker {
    /// Creates a stopped worker writing downloads to `destination`
    ///
    /// Must be called within a Tokio runtime.
    pub fn new(destination: impl Into<PathBuf>) -> Self {
        Self {
            shared: Arc::new(Shared {
                destination: destination.into(),
                state: Mutex::new(State::default()),
            }),
            slot: ExecutionSlot::new(),
        }
    }

    /// Directory downloaded print files are written to
    pub fn destination(&self) -> &Path {
        &self.shared.destination
    }

    /// Whether the worker's timer is active
    pub fn is_running(&self) -> bool {
        self.shared.state().timer.is_some()
    }

    /// Sets the repository used by polls from now on
    ///
    /// A running worker keeps its timer and interval; only later polls see
    /// the new repository.
    pub fn set_repository(&self, repository: Arc<dyn OrderRepository>) {
        self.shared.state().repository = Some(repository);
        debug!("Order repository configured");
    }

    /// Starts polling every `interval`, the first poll happening right away
    ///
    /// # Returns
    /// `true` if the worker was started, `false` if it was already running
    pub async fn start(&self, interval: Duration) -> Result<bool, WorkerError> {
        if interval.is_zero() {
            return Err(WorkerError::InvalidInterval);
        }

        let submitter = self.slot.submitter().await.ok_or(WorkerError::ShutDown)?;

        let mut state = self.shared.state();
        if state.timer.is_some() {
            debug!("Poll worker already running");
            return Ok(false);
        }
        if state.repository.is_none() {
            return Err(WorkerError::NotConfigured);
        }

        state.generation += 1;
        let generation = state.generation;
        let shared = Arc::clone(&self.shared);

        state.timer = Some(RecurringTimer::start(interval, move || {
            debug!("Trying to retrieve orders from API server");
            match submitter.submit(run_poll(Arc::clone(&shared), generation)) {
                SubmitOutcome::Queued => {}
                SubmitOutcome::Busy => debug!("A poll is already queued, skipping this one"),
                SubmitOutcome::Closed => warn!("Execution slot closed, poll dropped"),
            }
        }));

        info!("API server poll worker started (interval: {:?})", interval);
        Ok(true)
    }

    /// Stops polling
    ///
    /// A poll already running is left to finish. Safe to call on a stopped
    /// worker.
    ///
    /// # Returns
    /// `true` if the worker was running
    pub fn stop(&self) -> bool {
        let stopped = self.shared.state().halt();
        if stopped {
            info!("API server poll worker stopped");
        }
        stopped
    }

    /// Stops polling and waits for running and queued polls to finish
    ///
    /// The worker cannot be started again afterwards.
    pub async fn shutdown(&self) {
        self.stop();
        self.slot.shutdown().await;
        debug!("Poll worker shut down");
    }
}

impl Drop for PollWorker {
    fn drop(&mut self) {
        // The timer task holds the shared state, so it must not outlive us
        self.shared.state().halt();
    }
}

/// One scheduled poll, run on the execution slot
async fn run_poll(shared: Arc<Shared>, generation: u64) {
    let repository = {
        let state = shared.state();
        if !state.is_current(generation) {
            debug!("Poll worker stopped since this poll was scheduled, skipping");
            return;
        }
        match &state.repository {
            Some(repository) => Arc::clone(repository),
            None => return,
        }
    };

    match process_pending_orders(repository.as_ref(), &shared.destination).await {
        Ok(processed) if processed > 0 => info!("Retrieved {} order(s)", processed),
        Ok(_) => {}
        Err(e) => {
            error!("Stopping poll worker. Issue connecting to the API: {}", e);
            let mut state = shared.state();
            if state.generation == generation {
                state.halt();
            }
        }
    }
}

/// Fetches pending orders, then downloads and marks each one in turn
///
/// Stops at the first failure.
///
/// # Returns
/// The number of orders retrieved
pub async fn process_pending_orders(
    repository: &dyn OrderRepository,
    destination: &Path,
) -> ClientResult<usize> {
    let orders = repository.get_pending_orders().await?;

    if orders.is_empty() {
        debug!("No pending orders");
        return Ok(0);
    }

    info!("Found {} pending order(s)", orders.len());

    for order in &orders {
        let path = repository.download_order(order, destination).await?;
        info!("Downloaded order {} to {}", order.id, path.display());

        repository
            .update_order_status(order.id, OrderStatus::Sent)
            .await?;
    }

    Ok(orders.len())
}
