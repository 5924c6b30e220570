//! Reassembly of tool-call fragments split across stream chunks.
//!
//! The provider emits tool-call deltas keyed by an integer call index, with
//! `id` and `name` present only on the first delta for an index and argument
//! text spread across arbitrarily many chunks. The accumulator merges them
//! back into complete [`ToolCallRequest`]s with two explicit rules:
//!
//! - `id` / `name`: first non-empty value wins, never cleared afterwards
//! - `arguments`: append-only, in arrival order
//!
//! One accumulator lives for exactly one loop iteration and is consumed when
//! the stream for that iteration ends.

use std::collections::BTreeMap;

use toolstream_core::message::ToolCallRequest;
use toolstream_core::provider::ToolCallDelta;

/// A partially assembled tool call for one index.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct PartialToolCall {
    id: String,
    name: String,
    arguments: String,
}

/// Per-iteration accumulator mapping call index to partial tool call.
#[derive(Debug, Default)]
pub struct ToolCallAccumulator {
    slots: BTreeMap<u32, PartialToolCall>,
}

impl ToolCallAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one incoming delta into the slot for its index.
    pub fn apply(&mut self, delta: ToolCallDelta) {
        let slot = self.slots.entry(delta.index).or_default();

        fill_first_non_empty(&mut slot.id, delta.id);
        fill_first_non_empty(&mut slot.name, delta.name);

        if let Some(chunk) = delta.arguments {
            slot.arguments.push_str(&chunk);
        }
    }

    /// True if no tool-call fragments arrived this iteration.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Materialize the accumulated calls, ordered by ascending call index.
    ///
    /// The index is an accumulation key only; it does not appear in the
    /// resulting requests.
    pub fn into_requests(self) -> Vec<ToolCallRequest> {
        self.slots
            .into_values()
            .map(|partial| ToolCallRequest {
                id: partial.id,
                name: partial.name,
                arguments: partial.arguments,
            })
            .collect()
    }
}

/// Monotonic fill: take the incoming value only if the field is still unset
/// and the incoming value is non-empty. A later delta can never clear or
/// replace a previously seen value.
fn fill_first_non_empty(field: &mut String, incoming: Option<String>) {
    if !field.is_empty() {
        return;
    }
    if let Some(value) = incoming
        && !value.is_empty()
    {
        *field = value;
    }
}
