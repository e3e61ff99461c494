//! Core types, errors, configuration, identity, and tracing for Prospect.
//!
//! Everything here is pure and store-agnostic: the lead data model, the
//! status state machine, the deterministic identity function, and the
//! layered configuration that every evaluator reads its thresholds from.

pub mod config;
pub mod errors;
pub mod identity;
pub mod tracing;
pub mod traits;
pub mod types;
