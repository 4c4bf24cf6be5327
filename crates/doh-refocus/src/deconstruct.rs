//! Splits an outgoing message list into its canned preamble, live
//! conversation, and movable tool traffic

use std::collections::{HashMap, HashSet};

use doh_chat::{ChatMessage, ToolCall};

use crate::classify;
use crate::strategy;
use crate::vfs::{self, VirtualFileSystem};

/// How many canned messages the agent injects ahead of the conversation:
/// system prompt, user environment context, assistant acknowledgement.
const PREAMBLE_LEN: usize = 3;

/// A message list broken into the pieces the rebuilder works from.
#[derive(Debug, Default)]
pub struct DeconstructedTranscript {
    /// Content of the original system message
    pub system_prompt: String,
    /// Content of the canned user context (date, OS, working directory)
    pub canned_user_context: String,
    /// Content of the canned assistant acknowledgement
    pub canned_assistant_ack: String,
    /// Everything after the canned preamble
    pub real_conversation: Vec<ChatMessage>,
    /// Completed non-file tool pairs to re-embed in the system prompt
    pub movable_tool_pairs: Vec<(ToolCall, String)>,
    /// Current disk snapshot of every file touched by moved file operations
    pub vfs: VirtualFileSystem,
    /// Ids of moved tool calls that were file operations
    pub file_op_tool_call_ids: HashSet<String>,
}

/// Deconstruct an outgoing message list.
///
/// The first three messages are expected to be the agent's canned
/// (system, user, assistant) preamble; a message whose role does not match
/// yields an empty extracted string, but the slice boundary stays fixed so
/// a malformed preamble never leaks into the real conversation. Every tool
/// result outside the kept last cycle is paired with its originating call
/// and pulled out; file operations feed the VFS, the rest become the
/// residual pairs the system prompt embeds verbatim.
pub fn deconstruct(input: &[ChatMessage]) -> DeconstructedTranscript {
    let mut out = DeconstructedTranscript::default();

    let boundary = if input.len() < PREAMBLE_LEN {
        0
    } else {
        if let ChatMessage::System { content } = &input[0] {
            out.system_prompt = content.clone();
        }
        if let ChatMessage::User { content } = &input[1] {
            out.canned_user_context = content.clone();
        }
        if let ChatMessage::Assistant { content, .. } = &input[2] {
            out.canned_assistant_ack = content.clone().unwrap_or_default();
        }
        PREAMBLE_LEN
    };
    out.real_conversation = input[boundary..].to_vec();

    let strat = strategy::analyze(&out.real_conversation);

    // Pair every tool result anywhere in the input with its originating call.
    let mut calls_by_id: HashMap<&str, &ToolCall> = HashMap::new();
    for msg in input {
        for call in msg.tool_calls() {
            calls_by_id.insert(call.id.as_str(), call);
        }
    }

    let mut all_pairs: Vec<(ToolCall, String)> = Vec::new();
    for msg in input {
        if let ChatMessage::Tool {
            content,
            tool_call_id,
        } = msg
        {
            if strat.keep_last_cycle && strat.kept_ids.contains(tool_call_id) {
                continue;
            }
            if let Some(call) = calls_by_id.get(tool_call_id.as_str()) {
                all_pairs.push(((*call).clone(), content.clone()));
            }
        }
    }

    out.vfs = vfs::build_vfs(&all_pairs);

    for (call, _) in &all_pairs {
        if classify::classify(call).is_some() {
            out.file_op_tool_call_ids.insert(call.id.clone());
        }
    }

    // File operations are represented by the VFS; only the rest get
    // re-embedded as tool call text.
    out.movable_tool_pairs = all_pairs
        .into_iter()
        .filter(|(call, _)| classify::classify(call).is_none())
        .collect();

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn preamble() -> Vec<ChatMessage> {
        vec![
            ChatMessage::system("You are an agent."),
            ChatMessage::user("Today's date is Mon Jan 05 2026.\nMy operating system is: linux\nI'm currently working in the directory: /work"),
            ChatMessage::assistant("Got it. Thanks for the context!"),
        ]
    }

    fn grep_call(id: &str) -> ToolCall {
        ToolCall::new(
            id,
            "search_file_content",
            serde_json::json!({"pattern": "fn"}).to_string(),
        )
    }

    #[test]
    fn test_preamble_extraction() {
        let mut input = preamble();
        input.push(ChatMessage::user("hello"));
        let d = deconstruct(&input);
        assert_eq!(d.system_prompt, "You are an agent.");
        assert!(d.canned_user_context.contains("linux"));
        assert!(d.canned_assistant_ack.starts_with("Got it"));
        assert_eq!(d.real_conversation.len(), 1);
        assert_eq!(d.real_conversation[0].role(), "user");
    }

    #[test]
    fn test_mismatched_preamble_roles_degrade_to_empty() {
        let input = vec![
            ChatMessage::user("not a system message"),
            ChatMessage::assistant("not a user message"),
            ChatMessage::user("not an ack"),
            ChatMessage::user("real"),
        ];
        let d = deconstruct(&input);
        assert_eq!(d.system_prompt, "");
        assert_eq!(d.canned_user_context, "");
        assert_eq!(d.canned_assistant_ack, "");
        // Boundary stays at three regardless of shape.
        assert_eq!(d.real_conversation.len(), 1);
        assert_eq!(d.real_conversation[0].text(), "real");
    }

    #[test]
    fn test_short_input_keeps_everything_real() {
        let input = vec![ChatMessage::system("s"), ChatMessage::user("u")];
        let d = deconstruct(&input);
        assert_eq!(d.system_prompt, "");
        assert_eq!(d.real_conversation.len(), 2);
    }

    #[test]
    fn test_pairs_exclude_kept_last_cycle() {
        let mut input = preamble();
        input.extend([
            ChatMessage::assistant_with_calls(None, vec![grep_call("c1")]),
            ChatMessage::tool("c1", r#"{"output": "L1: old"}"#),
            ChatMessage::assistant("found it"),
            ChatMessage::assistant_with_calls(None, vec![grep_call("c2")]),
            ChatMessage::tool("c2", r#"{"output": "L1: fresh"}"#),
        ]);
        let d = deconstruct(&input);
        // c2 is the live cycle; only c1 is movable.
        assert_eq!(d.movable_tool_pairs.len(), 1);
        assert_eq!(d.movable_tool_pairs[0].0.id, "c1");
    }

    #[test]
    fn test_file_ops_split_from_residual_pairs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f.txt");
        std::fs::write(&path, "hello").unwrap();
        let path = path.to_string_lossy().to_string();

        let mut input = preamble();
        input.extend([
            ChatMessage::assistant_with_calls(
                None,
                vec![
                    ToolCall::new(
                        "c1",
                        "read_file",
                        serde_json::json!({"absolute_path": path}).to_string(),
                    ),
                    grep_call("c2"),
                ],
            ),
            ChatMessage::tool("c1", "hello"),
            ChatMessage::tool("c2", r#"{"output": ""}"#),
            ChatMessage::user("next?"),
        ]);
        let d = deconstruct(&input);
        assert!(d.file_op_tool_call_ids.contains("c1"));
        assert!(!d.file_op_tool_call_ids.contains("c2"));
        assert_eq!(d.movable_tool_pairs.len(), 1);
        assert_eq!(d.movable_tool_pairs[0].0.id, "c2");
        assert_eq!(d.vfs.get(&path).unwrap()[&1], "hello");
    }

    #[test]
    fn test_tool_result_without_call_is_not_paired() {
        let mut input = preamble();
        input.push(ChatMessage::tool("ghost", "r"));
        input.push(ChatMessage::user("q"));
        let d = deconstruct(&input);
        assert!(d.movable_tool_pairs.is_empty());
    }
}
