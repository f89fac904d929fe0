//! Hire My Printer Poller
//!
//! Background order poller for the Hire My Printer marketplace.
//!
//! Architecture:
//! - Configuration: Settings handed over by the host, plus the download directory
//! - Repositories: Typed access to the order API
//! - Scheduler: Recurring timer, single-worker execution slot and the poll worker
//! - Lifecycle: Hooks the host calls on startup, settings changes and shutdown
//!
//! The poller periodically asks the order API for pending orders, downloads
//! each order's print file into the watched folder and marks the order as sent.

pub mod config;
pub mod lifecycle;
pub mod repository;
pub mod scheduler;

pub use config::{Config, Settings};
pub use lifecycle::Lifecycle;
pub use scheduler::{PollWorker, WorkerError};
