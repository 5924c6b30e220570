//! # Toolstream Core
//!
//! Domain types, traits, and error definitions for the toolstream
//! orchestration loop. This crate has **zero framework dependencies** — it
//! defines the contracts that the provider and agent crates implement against.
//!
//! ## Design Philosophy
//!
//! The two seams of the system are defined as traits here:
//! - [`Provider`] — one streamed (or plain) completion exchange with an LLM
//! - [`ToolExecutor`] — the caller-supplied function that performs tool calls
//!
//! Implementations live in their respective crates, which keeps the
//! dependency graph pointing inward and makes both seams trivially mockable.

pub mod error;
pub mod event;
pub mod message;
pub mod provider;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use error::{ProviderError, ToolError};
pub use event::ChatEvent;
pub use message::{Message, Role, ToolCallRequest};
pub use provider::{CompletionRequest, Provider, StreamFragment, StreamRequest, ToolCallDelta};
pub use tool::{ToolExecutor, ToolOutcome, ToolSchema};
