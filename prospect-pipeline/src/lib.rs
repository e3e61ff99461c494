//! Pipeline stages and orchestration for Prospect.
//!
//! All decision logic here is pure: input lead + config in, decision out.
//! Side effects happen only in the stage modules, which persist each
//! lead's state change independently and immediately through the store.
//! That split is what makes runs idempotent and safely resumable.

pub mod contact;
pub mod context;
pub mod cooldown;
pub mod enrich;
pub mod fields;
pub mod filter;
pub mod limiter;
pub mod orchestrator;
pub mod output;
pub mod scoring;
pub mod sources;
pub mod stages;

pub use context::RunContext;
pub use orchestrator::{Pipeline, PipelinePlan, PipelineReport};
