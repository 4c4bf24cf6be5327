//! Classification of tool calls into file operations

use doh_chat::ToolCall;

/// Tool names that read file contents.
const READ_TOOLS: &[&str] = &["read_file", "read_many_files"];
/// Tool name that writes a whole file.
const WRITE_TOOL: &str = "write_file";
/// Tool name that edits a file in place.
const EDIT_TOOL: &str = "replace";

/// Kind of file operation a tool call performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOpKind {
    Read,
    Write,
    Edit,
}

/// A file operation extracted from a tool call.
#[derive(Debug, Clone, PartialEq)]
pub struct FileOperation {
    pub kind: FileOpKind,
    /// Absolute path as given in the tool arguments, no normalization
    pub path: String,
    /// 0-based first line for ranged reads
    pub offset: Option<u64>,
    /// Line count for ranged reads
    pub limit: Option<u64>,
    pub tool_call_id: String,
}

/// Decide whether a tool call is a file operation and extract its shape.
///
/// Returns `None` for non-file tools and for calls whose arguments fail to
/// decode; such calls flow through the pipeline as ordinary tool traffic.
/// For `read_many_files` only the first entry of `absolute_paths` is
/// tracked.
pub fn classify(call: &ToolCall) -> Option<FileOperation> {
    let args: serde_json::Value = serde_json::from_str(&call.function.arguments).ok()?;
    let name = call.function.name.as_str();

    if READ_TOOLS.contains(&name) {
        let path = match args.get("absolute_path").and_then(|v| v.as_str()) {
            Some(p) => p.to_string(),
            None => args
                .get("absolute_paths")
                .and_then(|v| v.as_array())
                .and_then(|paths| paths.first())
                .and_then(|v| v.as_str())?
                .to_string(),
        };
        return Some(FileOperation {
            kind: FileOpKind::Read,
            path,
            offset: args.get("offset").and_then(|v| v.as_u64()),
            limit: args.get("limit").and_then(|v| v.as_u64()),
            tool_call_id: call.id.clone(),
        });
    }

    if name == WRITE_TOOL {
        let path = args.get("file_path").and_then(|v| v.as_str())?;
        args.get("content")?;
        return Some(FileOperation {
            kind: FileOpKind::Write,
            path: path.to_string(),
            offset: None,
            limit: None,
            tool_call_id: call.id.clone(),
        });
    }

    if name == EDIT_TOOL {
        let path = args.get("file_path").and_then(|v| v.as_str())?;
        return Some(FileOperation {
            kind: FileOpKind::Edit,
            path: path.to_string(),
            offset: None,
            limit: None,
            tool_call_id: call.id.clone(),
        });
    }

    None
}
