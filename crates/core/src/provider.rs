//! Provider trait — the abstraction over completion backends.
//!
//! A Provider performs exactly one request/response exchange per call: either
//! a streamed exchange exposing raw incremental fragments, or a plain
//! completion returning the final text. The orchestrator never sees transport
//! details — it consumes [`StreamFragment`]s and leaves reassembly of
//! tool-call fragments to its own accumulator.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::message::Message;
use crate::tool::ToolSchema;

/// Parameters for one streamed completion exchange.
///
/// `messages` must be non-empty and begin with a `system` role entry; the
/// orchestrator upholds this invariant when assembling the buffer.
#[derive(Debug, Clone)]
pub struct StreamRequest {
    /// The model to use (e.g., "llama-3.3-70b-versatile")
    pub model: String,

    /// The full ordered conversation
    pub messages: Vec<Message>,

    /// Maximum tokens to generate
    pub max_tokens: u32,

    /// Tools the model may choose to call (tool choice is always automatic,
    /// never forced). Empty means the request advertises no tools.
    pub tools: Vec<ToolSchema>,
}

/// Parameters for one non-streaming completion exchange.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub max_tokens: u32,
    pub temperature: f32,

    /// Passed through verbatim to request a constrained output shape
    /// (e.g., `{"type": "json_object"}`). `None` leaves the provider default.
    pub response_format: Option<serde_json::Value>,
}

/// One incremental piece of a streamed model response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StreamFragment {
    /// A raw text delta, forwarded in arrival order.
    TextDelta(String),

    /// A tool-call delta; an arbitrary number of these, keyed by call index,
    /// reassemble into one complete call.
    ToolCall(ToolCallDelta),
}

/// A tool-call fragment as it arrives off the wire.
///
/// `id` and `name` are present only on the first delta for an index;
/// `arguments` chunks arrive across many deltas and concatenate in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallDelta {
    /// Accumulation key within one model turn — not part of the wire format
    /// the model sees on replay.
    pub index: u32,
    pub id: Option<String>,
    pub name: Option<String>,
    pub arguments: Option<String>,
}

/// The completion session contract.
///
/// Implementations perform the network exchange and nothing else: no
/// accumulation, no retries, no side effects beyond the request itself.
#[async_trait]
pub trait Provider: Send + Sync {
    /// A human-readable name for this provider (e.g., "groq", "openai").
    fn name(&self) -> &str;

    /// Open one streamed completion exchange.
    ///
    /// Returns a finite, non-restartable sequence of fragments. An `Err`
    /// return means the request could not be established; an `Err` item
    /// means the stream terminated abnormally mid-response. Both are fatal
    /// for the exchange.
    async fn stream(
        &self,
        request: StreamRequest,
    ) -> Result<
        tokio::sync::mpsc::Receiver<Result<StreamFragment, ProviderError>>,
        ProviderError,
    >;

    /// Perform one non-streaming completion.
    ///
    /// Returns the text content, or the empty string if the provider
    /// returned none.
    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragment_text_delta() {
        let frag = StreamFragment::TextDelta("Hel".into());
        match &frag {
            StreamFragment::TextDelta(s) => assert_eq!(s, "Hel"),
            _ => panic!("Wrong variant"),
        }
    }

    #[test]
    fn tool_call_delta_continuation_has_no_id() {
        // Continuations of an already-seen index carry only argument chunks.
        let delta = ToolCallDelta {
            index: 0,
            id: None,
            name: None,
            arguments: Some(r#"{"x":"#.into()),
        };
        assert!(delta.id.is_none());
        assert!(delta.name.is_none());
        assert_eq!(delta.arguments.as_deref(), Some(r#"{"x":"#));
    }
}
