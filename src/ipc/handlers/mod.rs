//! RPC method handlers, grouped by namespace.
//!
//! Every handler has the same shape: `(params, ctx) -> anyhow::Result<Value>`.
//! Errors bubble to the dispatcher, which classifies them into JSON-RPC error
//! codes.

pub mod board;
pub mod daemon;
pub mod task;
