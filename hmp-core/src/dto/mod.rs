//! Data Transfer Objects sent to the order API

pub mod order;
