//! The tool-use orchestration loop — the heart of toolstream.
//!
//! One `run` invocation drives the cycle:
//!
//! 1. **Assemble** the message buffer (system prompt + normalized history)
//! 2. **Stream** one completion exchange, forwarding text deltas immediately
//! 3. **Reassemble** tool-call fragments split across chunks
//! 4. **If tool calls**: execute them in index order, append results, loop
//! 5. **If text only**: terminate and emit `done`
//!
//! The loop continues until the model answers without tool calls, the
//! iteration budget runs out, or no executor is available — all of which end
//! gracefully with a terminal `done` event.

pub mod accumulator;
pub mod orchestrator;

pub use accumulator::ToolCallAccumulator;
pub use orchestrator::{ChatRequest, CompleteOptions, Orchestrator};
