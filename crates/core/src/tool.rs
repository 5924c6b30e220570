//! The tool boundary — schemas, executor contract, and outcomes.
//!
//! The core defines only the contract a tool executor must satisfy. Concrete
//! tools (their schemas and execution logic) are supplied by the caller.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ToolError;

/// A tool schema advertised to the LLM.
///
/// Opaque to the orchestrator except for `name`; the whole descriptor is
/// passed through verbatim to the completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSchema {
    /// The tool name
    pub name: String,

    /// Description of what the tool does
    pub description: String,

    /// JSON Schema describing the tool's parameters
    pub parameters: serde_json::Value,
}

/// The result of one tool invocation, success or failure.
///
/// A tagged union rather than a bare JSON value so callers cannot mistake an
/// error record for data. Both arms flow through the same two paths: the
/// structured form goes to the event consumer, the serialized form into the
/// transcript for the model's next turn.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutcome {
    /// The tool ran and produced structured data.
    Success(serde_json::Value),
    /// The tool failed (or its arguments were malformed); message is
    /// model-readable.
    Failure(String),
}

impl ToolOutcome {
    /// The structured content delivered to the event consumer.
    pub fn into_content(self) -> serde_json::Value {
        match self {
            Self::Success(data) => data,
            Self::Failure(message) => serde_json::json!({ "error": message }),
        }
    }

    /// The string form appended to the conversation transcript.
    pub fn transcript(&self) -> String {
        let content = match self {
            Self::Success(data) => data.clone(),
            Self::Failure(message) => serde_json::json!({ "error": message }),
        };
        content.to_string()
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }
}

/// The caller-supplied executor that actually performs tool calls.
///
/// `input` is the parsed arguments object. Returning `Err` is always safe:
/// the orchestrator converts any error into a [`ToolOutcome::Failure`] and
/// continues the loop — one failing tool never kills the exchange.
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    async fn execute(
        &self,
        name: &str,
        input: serde_json::Value,
    ) -> Result<serde_json::Value, ToolError>;
}
