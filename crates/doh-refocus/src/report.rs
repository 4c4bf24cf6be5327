//! Size estimation and per-pass statistics

use doh_chat::ChatMessage;
use serde::Serialize;

/// Estimate token count for a single message (chars/4 heuristic).
pub fn estimate_tokens(message: &ChatMessage) -> u32 {
    let mut char_count = message.text().len();
    for call in message.tool_calls() {
        char_count += call.function.name.len() + call.function.arguments.len();
    }
    (char_count / 4) as u32
}

/// Estimate total tokens for a slice of messages.
pub fn estimate_total_tokens(messages: &[ChatMessage]) -> u32 {
    messages.iter().map(estimate_tokens).sum()
}

/// What a refocusing pass did, for the debug log.
#[derive(Debug, Clone, Serialize)]
pub struct RefocusReport {
    pub messages_before: usize,
    pub messages_after: usize,
    pub tokens_before: u32,
    pub tokens_after: u32,
    /// Non-file tool pairs re-embedded in the system prompt
    pub moved_tool_pairs: usize,
    /// Paths tracked by the VFS snapshot
    pub vfs_paths: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use doh_chat::ToolCall;

    #[test]
    fn test_estimate_tokens_text() {
        // 12 chars -> 3 tokens
        assert_eq!(estimate_tokens(&ChatMessage::user("Hello world!")), 3);
    }

    #[test]
    fn test_estimate_tokens_counts_calls() {
        let msg = ChatMessage::assistant_with_calls(
            None,
            vec![ToolCall::new("c1", "grep", r#"{"pattern":"x"}"#)],
        );
        // "grep" (4) + arguments (15) = 19 chars -> 4 tokens
        assert_eq!(estimate_tokens(&msg), 4);
    }

    #[test]
    fn test_estimate_total_tokens() {
        let messages = vec![
            ChatMessage::user("x".repeat(400)),
            ChatMessage::assistant("y".repeat(800)),
        ];
        assert_eq!(estimate_total_tokens(&messages), 300);
    }
}
