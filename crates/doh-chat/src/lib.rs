//! doh-chat: Chat-completions wire types
//!
//! This crate models the message union used by chat-completions style LLM
//! APIs: system/user/assistant/tool messages, with assistant messages
//! optionally carrying tool calls. Values serialize directly to the wire
//! format expected by those APIs.

pub mod types;

pub use types::*;
