//! Decides whether the trailing tool cycle must stay live in the conversation

use std::collections::HashSet;

use doh_chat::ChatMessage;

/// Marker the agent sends to nudge the model onward after a tool result.
pub const CONTINUE_PROMPT: &str = "Please continue.";

/// Outcome of analyzing the tail of a conversation.
#[derive(Debug, Clone, Default)]
pub struct Strategy {
    /// Whether the final tool cycle must be kept in the message list
    pub keep_last_cycle: bool,
    /// Tool call ids belonging to that cycle
    pub kept_ids: HashSet<String>,
}

/// Analyze the conversation tail.
///
/// When the conversation ends on a tool result (directly, or behind a
/// trailing "Please continue." prompt), the model is still mid-reasoning
/// over that cycle and it must stay in the wire conversation. The whole
/// fan-out of the owning assistant message is kept together so parallel
/// sibling calls are never split.
pub fn analyze(real: &[ChatMessage]) -> Strategy {
    let Some(last) = real.last() else {
        return Strategy::default();
    };

    match last {
        ChatMessage::Tool { tool_call_id, .. } => keep_cycle_of(real, tool_call_id),
        ChatMessage::User { content }
            if content.trim() == CONTINUE_PROMPT && real.len() >= 2 =>
        {
            match &real[real.len() - 2] {
                ChatMessage::Tool { tool_call_id, .. } => keep_cycle_of(real, tool_call_id),
                _ => Strategy::default(),
            }
        }
        _ => Strategy::default(),
    }
}

fn keep_cycle_of(real: &[ChatMessage], tool_call_id: &str) -> Strategy {
    let owner = real
        .iter()
        .find(|m| m.tool_calls().iter().any(|c| c.id == tool_call_id));

    let kept_ids: HashSet<String> = match owner {
        Some(assistant) => assistant
            .tool_calls()
            .iter()
            .map(|c| c.id.clone())
            .collect(),
        None if !tool_call_id.is_empty() => [tool_call_id.to_string()].into(),
        None => HashSet::new(),
    };

    Strategy {
        keep_last_cycle: true,
        kept_ids,
    }
}
