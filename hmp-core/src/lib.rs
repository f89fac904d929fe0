//! Hire My Printer Core
//!
//! Core types shared by the Hire My Printer order poller.
//!
//! This crate contains:
//! - Domain types: the order record and its status, as served by the order API
//! - DTOs: request bodies sent back to the order API

pub mod domain;
pub mod dto;
