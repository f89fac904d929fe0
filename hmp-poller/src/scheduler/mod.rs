//! Scheduler layer for the poller
//!
//! A recurring timer decides when a poll is due and hands the work to a
//! single-worker execution slot, so at most one poll runs at any instant.
//! The poll worker ties both to the order repository.

mod slot;
mod timer;
pub mod worker;

pub use slot::{ExecutionSlot, SubmitOutcome, Submitter};
pub use timer::RecurringTimer;
pub use worker::{PollWorker, WorkerError};
