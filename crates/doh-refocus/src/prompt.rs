//! Composes the replacement system prompt

use regex::Regex;

use crate::config::RefocusConfig;
use crate::deconstruct::DeconstructedTranscript;
use crate::truncate;
use crate::vfs::FileLines;

/// Fixed agent instructions at the top of every composed system prompt.
const AGENT_PREAMBLE: &str = "\
You are an interactive CLI agent specializing in software engineering tasks. \
Your primary goal is to help users safely and efficiently with coding work in \
their project.

Core discipline:
- Search before you act: locate the relevant code with search and directory \
tools before proposing changes.
- Read before you write: never modify a file you have not read in its current \
state.
- Always use absolute paths when referring to or operating on files.
- Keep communication concise and tool-centric; prefer doing over describing.
- Preserve the surrounding project conventions in any change you make.";

/// Section markers. Cosmetic but stable; nothing parses them downstream.
const ENVIRONMENT_MARKER: &str = "=== ENVIRONMENT ===";
const FILE_STATES_MARKER: &str = "=== CURRENT FILE STATES ===";
const TOOL_CALLS_MARKER: &str = "=== PREVIOUS TOOL CALLS AND RESULTS ===";

/// Divider between file entries in the file-states section.
const FILE_DIVIDER: &str = "--- END OF FILE ---";
/// Divider between entries in the tool-calls section.
const TOOL_CALL_DIVIDER: &str = "--- END OF TOOL CALL ---";

/// Placeholder for a tracked path whose content could not be read back.
const UNTRACKED_CONTENT: &str = "(file modified but content not tracked)";

/// Environment facts recovered from the canned user context.
#[derive(Debug, PartialEq)]
pub struct Environment {
    pub date: String,
    pub os: String,
    pub cwd: String,
}

/// Probe the canned user context for date, OS, and working directory.
///
/// Missing fields fall back to the current date, "unknown", and the
/// process's working directory.
pub fn extract_environment(canned_user_context: &str) -> Environment {
    let probe = |pattern: &str| -> Option<String> {
        Regex::new(pattern)
            .ok()?
            .captures(canned_user_context)
            .map(|c| c[1].trim().to_string())
    };

    Environment {
        date: probe(r"Today's date is ([^.\n]+)")
            .unwrap_or_else(|| chrono::Local::now().format("%a %b %d %Y").to_string()),
        os: probe(r"My operating system is: ([^\n]+)").unwrap_or_else(|| "unknown".to_string()),
        cwd: probe(r"I'm currently working in the directory: ([^\n]+)").unwrap_or_else(|| {
            std::env::current_dir()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "unknown".to_string())
        }),
    }
}

/// Compose the replacement system prompt: agent preamble, environment,
/// current file states, and residual prior tool traffic, in that order.
pub fn compose_system_prompt(d: &DeconstructedTranscript, cfg: &RefocusConfig) -> String {
    let mut out = String::new();
    out.push_str(AGENT_PREAMBLE);

    let env = extract_environment(&d.canned_user_context);
    out.push_str(&format!(
        "\n\n{ENVIRONMENT_MARKER}\nToday's date is {}.\nOperating system: {}\nWorking directory: {}",
        env.date, env.os, env.cwd
    ));

    if !d.vfs.is_empty() {
        out.push_str(&format!("\n\n{FILE_STATES_MARKER}"));
        let total = d.vfs.len();
        for (i, (path, lines)) in d.vfs.iter().enumerate() {
            out.push_str(&format!("\nFile: {path}\n"));
            if lines.is_empty() {
                out.push_str(UNTRACKED_CONTENT);
                out.push('\n');
            } else {
                out.push_str(&render_line_runs(lines));
            }
            if i + 1 < total {
                out.push_str(FILE_DIVIDER);
                out.push('\n');
            }
        }
    }

    if !d.movable_tool_pairs.is_empty() {
        out.push_str(&format!("\n\n{TOOL_CALLS_MARKER}"));
        let total = d.movable_tool_pairs.len();
        for (i, (call, result)) in d.movable_tool_pairs.iter().enumerate() {
            let name = &call.function.name;
            let args = pretty_arguments(&call.function.arguments);
            let result = truncate::truncate_search_result(name, result, cfg);
            out.push_str(&format!(
                "\nTool: {name}\nArguments:\n```json\n{args}\n```\nResult:\n```\n{result}\n```\n"
            ));
            if i + 1 < total {
                out.push_str(TOOL_CALL_DIVIDER);
                out.push('\n');
            }
        }
    }

    out
}

/// Render a sparse line map as maximal consecutive runs, each introduced by
/// a `Line K:` or `Lines K-M:` label and carried in a fenced block.
fn render_line_runs(lines: &FileLines) -> String {
    let mut out = String::new();

    let mut run: Vec<(usize, &str)> = Vec::new();
    let flush = |run: &mut Vec<(usize, &str)>, out: &mut String| {
        if run.is_empty() {
            return;
        }
        let first = run[0].0;
        let last = run[run.len() - 1].0;
        let label = if first == last {
            format!("Line {first}:")
        } else {
            format!("Lines {first}-{last}:")
        };
        let body: Vec<&str> = run.iter().map(|(_, text)| *text).collect();
        out.push_str(&format!("{label}\n```\n{}\n```\n", body.join("\n")));
        run.clear();
    };

    for (&line_no, text) in lines {
        if let Some(&(prev, _)) = run.last() {
            if line_no != prev + 1 {
                flush(&mut run, &mut out);
            }
        }
        run.push((line_no, text));
    }
    flush(&mut run, &mut out);

    out
}

/// Pretty-print a JSON arguments blob, falling back to the raw string.
fn pretty_arguments(arguments: &str) -> String {
    serde_json::from_str::<serde_json::Value>(arguments)
        .and_then(|v| serde_json::to_string_pretty(&v))
        .unwrap_or_else(|_| arguments.to_string())
}
