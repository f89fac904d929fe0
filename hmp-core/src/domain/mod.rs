//! Core domain types
//!
//! These types mirror the records served by the remote order API. They are
//! transient snapshots: the canonical state of an order lives server-side.

pub mod order;
