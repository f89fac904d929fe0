//! Repository layer
//!
//! Repositories map order API responses onto typed order records. They hold
//! no business logic: deciding what to do with an order belongs to the poll
//! worker.
//!
//! All repositories are trait-based to enable testing and mocking.

mod orders;

// Re-export traits
pub use orders::OrderRepository;

// Re-export implementations
pub use orders::ApiOrderRepository;
