//! Single-worker execution slot
//!
//! One consumer task runs submitted work one unit at a time. The queue in
//! front of it holds a single unit: work submitted while the consumer is busy
//! waits there, and work submitted while that place is taken is refused.

use std::future::Future;
use std::pin::Pin;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

type Work = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// What happened to submitted work
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The work will run once the consumer is free
    Queued,
    /// A unit is already waiting; this one was dropped
    Busy,
    /// The slot was shut down
    Closed,
}

/// Handle used to hand work to an [`ExecutionSlot`]
#[derive(Debug, Clone)]
pub struct Submitter {
    sender: mpsc::Sender<Work>,
}

impl Submitter {
    /// Submits work without waiting
    pub fn submit<F>(&self, work: F) -> SubmitOutcome
    where
        F: Future<Output = ()> + Send + 'static,
    {
        match self.sender.try_send(Box::pin(work)) {
            Ok(()) => SubmitOutcome::Queued,
            Err(mpsc::error::TrySendError::Full(_)) => SubmitOutcome::Busy,
            Err(mpsc::error::TrySendError::Closed(_)) => SubmitOutcome::Closed,
        }
    }
}

/// A single background worker with a one-unit queue
#[derive(Debug)]
pub struct ExecutionSlot {
    sender: Mutex<Option<mpsc::Sender<Work>>>,
    consumer: Mutex<Option<JoinHandle<()>>>,
}

impl ExecutionSlot {
    /// Spawns the consumer task. Must be called within a Tokio runtime.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<Work>(1);

        let consumer = tokio::spawn(async move {
            while let Some(work) = receiver.recv().await {
                // A panicking unit must not take the consumer down with it
                if let Err(e) = tokio::spawn(work).await {
                    warn!("Background work panicked: {}", e);
                }
            }
            debug!("Execution slot drained");
        });

        Self {
            sender: Mutex::new(Some(sender)),
            consumer: Mutex::new(Some(consumer)),
        }
    }

    /// Returns a submitter, or `None` once the slot has been shut down
    pub async fn submitter(&self) -> Option<Submitter> {
        self.sender
            .lock()
            .await
            .as_ref()
            .map(|sender| Submitter {
                sender: sender.clone(),
            })
    }

    /// Stops accepting work and waits for running and queued work to finish
    ///
    /// Submitters handed out earlier keep the queue open until they are
    /// dropped, so their owners must be stopped first.
    pub async fn shutdown(&self) {
        self.sender.lock().await.take();

        let consumer = self.consumer.lock().await.take();
        if let Some(consumer) = consumer {
            if let Err(e) = consumer.await {
                warn!("Execution slot consumer failed: {}", e);
            }
        }
    }
}

impl Default for ExecutionSlot {
    fn default() -> Self {
        Self::new()
    }
}
