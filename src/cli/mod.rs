//! CLI command implementations
//!
//! This module contains the implementation of the single check-and-remediate
//! pass the binary performs.

pub mod connect;
