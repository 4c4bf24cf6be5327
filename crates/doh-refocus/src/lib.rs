//! doh-refocus: Transcript refocusing for long agent conversations
//!
//! When a chat-completions conversation accumulates tool traffic, this crate
//! rewrites the outgoing message list into a shorter, semantically
//! equivalent one: the final live tool cycle stays in the conversation,
//! earlier tool cycles collapse into a context block inside a regenerated
//! system prompt, and prior file I/O traffic is replaced by a virtual
//! filesystem snapshot read fresh from disk.

pub mod classify;
pub mod collapse;
pub mod config;
pub mod deconstruct;
pub mod disk;
pub mod error;
pub mod logging;
pub mod prompt;
pub mod rebuild;
pub mod report;
pub mod strategy;
pub mod truncate;
pub mod vfs;

pub use classify::{FileOpKind, FileOperation};
pub use config::RefocusConfig;
pub use deconstruct::DeconstructedTranscript;
pub use error::{Error, Result};
pub use report::RefocusReport;
pub use strategy::Strategy;
pub use vfs::VirtualFileSystem;

use doh_chat::ChatMessage;

/// Refocus an outgoing message list with the default configuration.
///
/// The output conforms to the same wire schema as the input and can be
/// submitted to the chat API directly. This never fails: every internal
/// error degrades to keeping more of the original conversation.
pub fn refocus(messages: &[ChatMessage]) -> Vec<ChatMessage> {
    refocus_with_config(messages, &RefocusConfig::default())
}

/// Refocus an outgoing message list.
pub fn refocus_with_config(
    messages: &[ChatMessage],
    config: &RefocusConfig,
) -> Vec<ChatMessage> {
    let deconstructed = deconstruct::deconstruct(messages);
    let output = rebuild::rebuild(&deconstructed, config);

    let report = RefocusReport {
        messages_before: messages.len(),
        messages_after: output.len(),
        tokens_before: report::estimate_total_tokens(messages),
        tokens_after: report::estimate_total_tokens(&output),
        moved_tool_pairs: deconstructed.movable_tool_pairs.len(),
        vfs_paths: deconstructed.vfs.paths(),
    };
    tracing::debug!(
        "Refocused transcript: {} -> {} messages (~{} -> ~{} tokens)",
        report.messages_before,
        report.messages_after,
        report.tokens_before,
        report.tokens_after
    );
    if config.debug_log {
        let moved: Vec<serde_json::Value> = deconstructed
            .movable_tool_pairs
            .iter()
            .map(|(call, result)| {
                serde_json::json!({
                    "name": call.function.name,
                    "arguments": call.function.arguments,
                    "content": result,
                })
            })
            .collect();
        logging::log_event(
            "refocused transcript",
            &serde_json::json!({
                "report": report,
                "moved_tool_calls": moved,
            }),
        );
    }

    output
}
