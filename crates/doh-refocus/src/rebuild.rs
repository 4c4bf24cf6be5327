//! Rebuilds the outgoing message list around the composed system prompt

use std::collections::{HashMap, HashSet};

use doh_chat::{ChatMessage, ToolCall};

use crate::collapse;
use crate::config::RefocusConfig;
use crate::deconstruct::DeconstructedTranscript;
use crate::prompt;
use crate::strategy::{self, CONTINUE_PROMPT};
use crate::truncate;

/// Rebuild the message list from a deconstructed transcript.
///
/// The composed system prompt goes first; the canned preamble is never
/// re-emitted. Tool calls whose results moved into the system prompt (or
/// the VFS) are stripped from their assistant messages together with their
/// results, so the wire protocol's call/result linkage stays intact.
/// Stale "Please continue." prompts are dropped; one survives only as the
/// final message of a kept live cycle.
pub fn rebuild(d: &DeconstructedTranscript, cfg: &RefocusConfig) -> Vec<ChatMessage> {
    let mut out = vec![ChatMessage::system(prompt::compose_system_prompt(d, cfg))];

    let moved_ids: HashSet<&str> = d
        .movable_tool_pairs
        .iter()
        .map(|(call, _)| call.id.as_str())
        .chain(d.file_op_tool_call_ids.iter().map(String::as_str))
        .collect();

    let strat = strategy::analyze(&d.real_conversation);

    // Tool name lookup for re-truncating retained results.
    let mut names_by_id: HashMap<&str, &str> = HashMap::new();
    for msg in &d.real_conversation {
        for call in msg.tool_calls() {
            names_by_id.insert(call.id.as_str(), call.function.name.as_str());
        }
    }

    let last_index = d.real_conversation.len().saturating_sub(1);
    for (i, msg) in d.real_conversation.iter().enumerate() {
        match msg {
            ChatMessage::System { .. } => {}
            ChatMessage::Tool {
                content,
                tool_call_id,
            } => {
                if moved_ids.contains(tool_call_id.as_str()) {
                    continue;
                }
                let name = names_by_id
                    .get(tool_call_id.as_str())
                    .copied()
                    .unwrap_or("");
                out.push(ChatMessage::tool(
                    tool_call_id.clone(),
                    truncate::truncate_search_result(name, content, cfg),
                ));
            }
            ChatMessage::Assistant {
                content,
                tool_calls,
            } => {
                let surviving: Vec<ToolCall> = tool_calls
                    .as_deref()
                    .unwrap_or(&[])
                    .iter()
                    .filter(|c| !moved_ids.contains(c.id.as_str()))
                    .cloned()
                    .collect();
                if !surviving.is_empty() {
                    out.push(ChatMessage::assistant_with_calls(
                        content.clone(),
                        surviving,
                    ));
                } else if !msg.text().trim().is_empty() {
                    out.push(ChatMessage::assistant(msg.text()));
                }
            }
            ChatMessage::User { content } => {
                if content.trim() == CONTINUE_PROMPT {
                    if i == last_index && strat.keep_last_cycle {
                        out.push(msg.clone());
                    }
                } else {
                    out.push(msg.clone());
                }
            }
        }
    }

    collapse::collapse_assistants(out)
}
