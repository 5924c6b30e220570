//! The streaming tool-use orchestration loop.

use std::sync::Arc;

use tokio::sync::mpsc;
use toolstream_core::error::ProviderError;
use toolstream_core::event::ChatEvent;
use toolstream_core::message::{Message, Role};
use toolstream_core::provider::{CompletionRequest, Provider, StreamFragment, StreamRequest};
use toolstream_core::tool::{ToolExecutor, ToolOutcome, ToolSchema};
use tracing::{debug, warn};

use crate::accumulator::ToolCallAccumulator;

/// Response budget for the non-streaming path. Extraction-style calls return
/// short structured output, so they get a tighter default than the chat loop.
const COMPLETE_MAX_TOKENS: u32 = 2048;

/// One invocation of the tool-use loop.
///
/// `history` is normalized at the boundary: entries whose role is not `user`
/// or `assistant` are silently dropped, since system and tool turns are
/// reconstructed internally and must not be caller-supplied.
pub struct ChatRequest {
    pub history: Vec<Message>,
    pub system_prompt: String,
    pub tools: Vec<ToolSchema>,
    pub executor: Option<Arc<dyn ToolExecutor>>,
    /// Overrides the orchestrator's default chat model.
    pub model: Option<String>,
    /// Overrides the orchestrator's default iteration budget.
    pub max_iterations: Option<u32>,
    /// Overrides the orchestrator's default max tokens.
    pub max_tokens: Option<u32>,
}

impl ChatRequest {
    pub fn new(history: Vec<Message>, system_prompt: impl Into<String>) -> Self {
        Self {
            history,
            system_prompt: system_prompt.into(),
            tools: Vec::new(),
            executor: None,
            model: None,
            max_iterations: None,
            max_tokens: None,
        }
    }

    pub fn with_tools(mut self, tools: Vec<ToolSchema>) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_executor(mut self, executor: Arc<dyn ToolExecutor>) -> Self {
        self.executor = Some(executor);
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_max_iterations(mut self, max: u32) -> Self {
        self.max_iterations = Some(max);
        self
    }

    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }
}

/// Per-call options for the non-streaming [`Orchestrator::complete`] path.
#[derive(Debug, Default, Clone)]
pub struct CompleteOptions {
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    /// Passed through to request a constrained output shape,
    /// e.g. `{"type": "json_object"}`.
    pub response_format: Option<serde_json::Value>,
}

/// The tool-use orchestrator.
///
/// Owns the outer iteration loop, the fragment accumulator, the conversation
/// buffer, executor dispatch, and normalized event emission. One instance is
/// cheap to share; each [`run`](Self::run) call gets exclusive loop state.
pub struct Orchestrator {
    provider: Arc<dyn Provider>,
    chat_model: String,
    extraction_model: String,
    max_iterations: u32,
    max_tokens: u32,
    temperature: f32,
}

impl Orchestrator {
    /// Create an orchestrator with library defaults.
    pub fn new(provider: Arc<dyn Provider>, chat_model: impl Into<String>) -> Self {
        Self {
            provider,
            chat_model: chat_model.into(),
            extraction_model: String::new(),
            max_iterations: 10,
            max_tokens: 4096,
            temperature: 0.1,
        }
    }

    /// Create an orchestrator configured from loaded settings.
    pub fn from_settings(
        provider: Arc<dyn Provider>,
        settings: &toolstream_config::Settings,
    ) -> Self {
        Self {
            provider,
            chat_model: settings.chat_model.clone(),
            extraction_model: settings.extraction_model.clone(),
            max_iterations: settings.max_iterations,
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
        }
    }

    /// Set the default model for the non-streaming extraction path.
    pub fn with_extraction_model(mut self, model: impl Into<String>) -> Self {
        self.extraction_model = model.into();
        self
    }

    /// Set the default iteration budget.
    pub fn with_max_iterations(mut self, max: u32) -> Self {
        self.max_iterations = max;
        self
    }

    /// Set the default max tokens per model response.
    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = max;
        self
    }

    /// Run the tool-use loop, yielding normalized events as they happen.
    ///
    /// Returns an `mpsc::Receiver` populated by a background task — the
    /// caller simply drains it. Dropping the receiver cancels the loop: no
    /// further network or executor work starts once a send fails.
    ///
    /// Every terminating path emits exactly one final [`ChatEvent::Done`],
    /// except a transport error, which surfaces as an `Err` item and ends
    /// the sequence without `done`.
    pub fn run(&self, request: ChatRequest) -> mpsc::Receiver<Result<ChatEvent, ProviderError>> {
        let (tx, rx) = mpsc::channel::<Result<ChatEvent, ProviderError>>(128);

        let provider = self.provider.clone();
        let model = request.model.unwrap_or_else(|| self.chat_model.clone());
        let max_iterations = request.max_iterations.unwrap_or(self.max_iterations);
        let max_tokens = request.max_tokens.unwrap_or(self.max_tokens);
        let tools = request.tools;
        let executor = request.executor;
        let system_prompt = request.system_prompt;
        let history = request.history;

        tokio::spawn(async move {
            // Buffer: system first, then history normalized to user/assistant
            let mut buffer = vec![Message::system(&system_prompt)];
            buffer.extend(
                history
                    .into_iter()
                    .filter(|m| matches!(m.role, Role::User | Role::Assistant)),
            );

            for iteration in 0..max_iterations {
                // Consumer gone — no further network or executor work
                if tx.is_closed() {
                    return;
                }

                debug!(iteration, messages = buffer.len(), "Loop iteration");

                let mut accumulator = ToolCallAccumulator::new();
                let mut collected_text = String::new();

                let mut stream_rx = match provider
                    .stream(StreamRequest {
                        model: model.clone(),
                        messages: buffer.clone(),
                        max_tokens,
                        tools: tools.clone(),
                    })
                    .await
                {
                    Ok(rx) => rx,
                    Err(e) => {
                        // Fatal for this call; not retried
                        let _ = tx.send(Err(e)).await;
                        return;
                    }
                };

                while let Some(fragment) = stream_rx.recv().await {
                    match fragment {
                        Ok(StreamFragment::TextDelta(text)) => {
                            collected_text.push_str(&text);
                            if tx
                                .send(Ok(ChatEvent::TextDelta { content: text }))
                                .await
                                .is_err()
                            {
                                return; // consumer cancelled
                            }
                        }
                        Ok(StreamFragment::ToolCall(delta)) => {
                            accumulator.apply(delta);
                        }
                        Err(e) => {
                            let _ = tx.send(Err(e)).await;
                            return;
                        }
                    }
                }

                // No tool calls — the model gave a final answer
                if accumulator.is_empty() {
                    break;
                }

                // Tool calls requested but nobody can run them; the text
                // already streamed stands as the final output
                let Some(executor) = executor.as_ref() else {
                    warn!("Model requested tool calls but no executor provided");
                    break;
                };

                let calls = accumulator.into_requests();
                buffer.push(Message::assistant_with_tools(
                    Some(collected_text),
                    calls.clone(),
                ));

                for call in &calls {
                    let input = if call.arguments.trim().is_empty() {
                        serde_json::json!({})
                    } else {
                        match serde_json::from_str::<serde_json::Value>(&call.arguments) {
                            Ok(value) => value,
                            Err(_) => {
                                warn!(
                                    tool = %call.name,
                                    arguments = %call.arguments,
                                    "Malformed tool arguments"
                                );
                                let event = ChatEvent::ToolResult {
                                    id: call.id.clone(),
                                    name: call.name.clone(),
                                    content: serde_json::json!({
                                        "error": format!(
                                            "Malformed arguments for '{}' — please retry.",
                                            call.name
                                        ),
                                    }),
                                };
                                if tx.send(Ok(event)).await.is_err() {
                                    return;
                                }
                                buffer.push(Message::tool_result(
                                    &call.id,
                                    serde_json::json!({
                                        "error": format!(
                                            "Malformed arguments for {}.",
                                            call.name
                                        ),
                                    })
                                    .to_string(),
                                ));
                                continue;
                            }
                        }
                    };

                    // Emitted before the executor runs
                    let event = ChatEvent::ToolCall {
                        id: call.id.clone(),
                        name: call.name.clone(),
                        input: input.clone(),
                    };
                    if tx.send(Ok(event)).await.is_err() {
                        return;
                    }

                    let outcome = match executor.execute(&call.name, input).await {
                        Ok(data) => ToolOutcome::Success(data),
                        Err(e) => {
                            warn!(tool = %call.name, error = %e, "Tool execution failed");
                            ToolOutcome::Failure(e.to_string())
                        }
                    };

                    buffer.push(Message::tool_result(&call.id, outcome.transcript()));

                    let event = ChatEvent::ToolResult {
                        id: call.id.clone(),
                        name: call.name.clone(),
                        content: outcome.into_content(),
                    };
                    if tx.send(Ok(event)).await.is_err() {
                        return;
                    }
                }

                // Next iteration sees the extended buffer
            }

            let _ = tx.send(Ok(ChatEvent::Done)).await;
        });

        rx
    }

    /// Non-streaming companion: one request/response, no tool loop.
    ///
    /// Returns the text content, or the empty string if the provider
    /// returned none. Defaults to the extraction model when no override is
    /// given.
    pub async fn complete(
        &self,
        prompt: &str,
        system_prompt: &str,
        options: CompleteOptions,
    ) -> Result<String, ProviderError> {
        let model = options.model.unwrap_or_else(|| {
            if self.extraction_model.is_empty() {
                self.chat_model.clone()
            } else {
                self.extraction_model.clone()
            }
        });

        self.provider
            .complete(CompletionRequest {
                model,
                messages: vec![Message::system(system_prompt), Message::user(prompt)],
                max_tokens: options.max_tokens.unwrap_or(COMPLETE_MAX_TOKENS),
                temperature: options.temperature.unwrap_or(self.temperature),
                response_format: options.response_format,
            })
            .await
    }
}
