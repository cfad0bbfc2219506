//! Infrastructure implementations.
//!
//! Contains port traits, their in-memory implementations, and environment
//! configuration.

pub mod clock;
pub mod config;
pub mod memory;
pub mod ports;
