//! Merges runs of consecutive assistant messages

use doh_chat::{ChatMessage, ToolCall};

/// Collapse each run of consecutive assistant messages into one.
///
/// Content strings are trimmed, deduplicated on exact match, and joined
/// with newlines in first-occurrence order; tool-call lists concatenate in
/// order. A run that ends up with neither content nor calls vanishes.
/// Non-assistant messages pass through unchanged.
pub fn collapse_assistants(messages: Vec<ChatMessage>) -> Vec<ChatMessage> {
    let mut out = Vec::with_capacity(messages.len());
    let mut iter = messages.into_iter().peekable();

    while let Some(msg) = iter.next() {
        let (content, tool_calls) = match msg {
            ChatMessage::Assistant {
                content,
                tool_calls,
            } => (content, tool_calls),
            other => {
                out.push(other);
                continue;
            }
        };

        let mut contents: Vec<String> = Vec::new();
        let mut calls: Vec<ToolCall> = Vec::new();
        let mut absorb = |content: Option<String>, tool_calls: Option<Vec<ToolCall>>| {
            if let Some(text) = content {
                let text = text.trim();
                if !text.is_empty() && !contents.iter().any(|c| c == text) {
                    contents.push(text.to_string());
                }
            }
            calls.extend(tool_calls.unwrap_or_default());
        };

        absorb(content, tool_calls);
        while matches!(iter.peek(), Some(ChatMessage::Assistant { .. })) {
            if let Some(ChatMessage::Assistant {
                content,
                tool_calls,
            }) = iter.next()
            {
                absorb(content, tool_calls);
            }
        }

        if !contents.is_empty() || !calls.is_empty() {
            out.push(ChatMessage::assistant_with_calls(
                if contents.is_empty() {
                    None
                } else {
                    Some(contents.join("\n"))
                },
                calls,
            ));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_assistants_pass_through() {
        let msgs = vec![
            ChatMessage::user("a"),
            ChatMessage::tool("c1", "r"),
            ChatMessage::user("b"),
        ];
        assert_eq!(collapse_assistants(msgs.clone()), msgs);
    }

    #[test]
    fn test_run_merges_content_and_calls() {
        let msgs = vec![
            ChatMessage::assistant("thinking..."),
            ChatMessage::assistant_with_calls(None, vec![ToolCall::new("c1", "grep", "{}")]),
            ChatMessage::assistant("done"),
        ];
        let out = collapse_assistants(msgs);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].text(), "thinking...\ndone");
        assert_eq!(out[0].tool_calls().len(), 1);
    }

    #[test]
    fn test_exact_duplicates_suppressed() {
        let msgs = vec![
            ChatMessage::assistant("same"),
            ChatMessage::assistant("  same  "),
            ChatMessage::assistant("other"),
        ];
        let out = collapse_assistants(msgs);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].text(), "same\nother");
    }

    #[test]
    fn test_calls_not_deduplicated() {
        let msgs = vec![
            ChatMessage::assistant_with_calls(None, vec![ToolCall::new("c1", "grep", "{}")]),
            ChatMessage::assistant_with_calls(None, vec![ToolCall::new("c1", "grep", "{}")]),
        ];
        let out = collapse_assistants(msgs);
        assert_eq!(out[0].tool_calls().len(), 2);
    }

    #[test]
    fn test_empty_run_vanishes() {
        let msgs = vec![
            ChatMessage::user("q"),
            ChatMessage::assistant("   "),
            ChatMessage::assistant_with_calls(None, vec![]),
            ChatMessage::user("q2"),
        ];
        let out = collapse_assistants(msgs);
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|m| m.role() == "user"));
    }

    #[test]
    fn test_runs_separated_by_other_roles_stay_separate() {
        let msgs = vec![
            ChatMessage::assistant("one"),
            ChatMessage::tool("c1", "r"),
            ChatMessage::assistant("two"),
        ];
        let out = collapse_assistants(msgs);
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].text(), "one");
        assert_eq!(out[2].text(), "two");
    }
}
