//! Spool core engine: one prompt in, a bounded stream of token text out.
//!
//! The pieces, leaves first: [`context::ExecutionContext`] does KV-cache
//! position bookkeeping over an opaque backend session,
//! [`sampling::SamplerChain`] reduces a logits vector to one token, and
//! [`engine::Generator`] owns both and runs the prefill/decode state
//! machine for a single request.

pub mod context;
pub mod engine;
pub mod sampling;
pub mod stats;

pub use context::ExecutionContext;
pub use engine::{GenerateParams, GenerationReport, Generator, StopReason};
pub use sampling::{Greedy, SamplerChain, SamplerStage, Temperature, TopK};
pub use stats::DecodeStats;
