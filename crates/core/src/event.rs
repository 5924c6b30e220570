//! Normalized streaming events.
//!
//! `ChatEvent` is the only thing the orchestrator ever exposes across its
//! outer boundary — internal message and fragment structures never leak out.
//! The serde representation is SSE-ready, so a server endpoint can forward
//! events to clients verbatim:
//!
//! - `text_delta`  — one raw text fragment from the model, never aggregated
//! - `tool_call`   — a tool invocation is about to run (parsed arguments)
//! - `tool_result` — a tool finished (structured result, or `{"error": ...}`)
//! - `done`        — the loop terminated; always the final event unless a
//!   transport error aborted the sequence first
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatEvent {
    /// Partial text token from the LLM.
    TextDelta { content: String },

    /// The model requested a tool invocation; emitted before the executor runs.
    ToolCall {
        id: String,
        name: String,
        input: serde_json::Value,
    },

    /// Tool execution completed (success or converted failure).
    ToolResult {
        id: String,
        name: String,
        content: serde_json::Value,
    },

    /// The loop is complete.
    Done,
}

impl ChatEvent {
    /// SSE event name for this event type.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::TextDelta { .. } => "text_delta",
            Self::ToolCall { .. } => "tool_call",
            Self::ToolResult { .. } => "tool_result",
            Self::Done => "done",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_serialization_text_delta() {
        let event = ChatEvent::TextDelta {
            content: "Hello".into(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""type":"text_delta""#));
        assert!(json.contains(r#""content":"Hello""#));
    }

    #[test]
    fn event_serialization_tool_call() {
        let event = ChatEvent::ToolCall {
            id: "call_1".into(),
            name: "lookup".into(),
            input: serde_json::json!({"query": "anomalies"}),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""type":"tool_call""#));
        assert!(json.contains(r#""name":"lookup""#));
        assert!(json.contains(r#""query":"anomalies""#));
    }

    #[test]
    fn event_serialization_tool_result_error_record() {
        let event = ChatEvent::ToolResult {
            id: "call_1".into(),
            name: "lookup".into(),
            content: serde_json::json!({"error": "boom"}),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""type":"tool_result""#));
        assert!(json.contains(r#""error":"boom""#));
    }

    #[test]
    fn event_serialization_done() {
        let json = serde_json::to_string(&ChatEvent::Done).unwrap();
        assert_eq!(json, r#"{"type":"done"}"#);
    }

    #[test]
    fn event_type_names() {
        assert_eq!(
            ChatEvent::TextDelta {
                content: "x".into()
            }
            .event_type(),
            "text_delta"
        );
        assert_eq!(
            ChatEvent::ToolCall {
                id: "a".into(),
                name: "b".into(),
                input: serde_json::Value::Null
            }
            .event_type(),
            "tool_call"
        );
        assert_eq!(
            ChatEvent::ToolResult {
                id: "a".into(),
                name: "b".into(),
                content: serde_json::Value::Null
            }
            .event_type(),
            "tool_result"
        );
        assert_eq!(ChatEvent::Done.event_type(), "done");
    }

    #[test]
    fn event_deserialization() {
        let json = r#"{"type":"text_delta","content":"hi"}"#;
        let event: ChatEvent = serde_json::from_str(json).unwrap();
        match event {
            ChatEvent::TextDelta { content } => assert_eq!(content, "hi"),
            _ => panic!("Wrong variant"),
        }
    }
}
