//! Bounds the size of search results embedded in the system prompt

use regex::Regex;

use crate::config::RefocusConfig;

/// Tool whose results carry grep-style hit lines.
const SEARCH_TOOL: &str = "search_file_content";

/// Pattern a search hit line starts with.
const HIT_PATTERN: &str = r"^L\d+:";

/// Bound a tool result for embedding.
///
/// Only `search_file_content` results are rewritten; everything else passes
/// through untouched. The result envelope is JSON with an `output` string
/// holding newline-separated hit lines of the form `L<n>: <content>`. The
/// first `search_hit_limit` hits are kept (header and separator lines
/// between them survive), the rest are replaced by a single
/// `[... truncated N more results]` marker, and each retained hit is
/// shortened to `search_line_limit` characters. A result that fails to
/// decode, or whose `output` is not a string, is returned unchanged.
pub fn truncate_search_result(function_name: &str, result: &str, cfg: &RefocusConfig) -> String {
    if function_name != SEARCH_TOOL {
        return result.to_string();
    }

    let Ok(mut envelope) = serde_json::from_str::<serde_json::Value>(result) else {
        return result.to_string();
    };
    let Some(output) = envelope.get("output").and_then(|v| v.as_str()) else {
        return result.to_string();
    };

    let Ok(hit_re) = Regex::new(HIT_PATTERN) else {
        return result.to_string();
    };
    let total_hits = output.lines().filter(|l| hit_re.is_match(l)).count();

    let mut kept = Vec::new();
    let mut hits = 0;
    for line in output.lines() {
        if hit_re.is_match(line) {
            hits += 1;
            if hits > cfg.search_hit_limit {
                kept.push(format!(
                    "[... truncated {} more results]",
                    total_hits - cfg.search_hit_limit
                ));
                break;
            }
            kept.push(shorten_hit(line, &hit_re, cfg.search_line_limit));
        } else {
            kept.push(line.to_string());
        }
    }

    envelope["output"] = serde_json::Value::String(kept.join("\n"));
    serde_json::to_string(&envelope).unwrap_or_else(|_| result.to_string())
}

/// Shorten the content of a hit line past its `L<n>: ` prefix.
fn shorten_hit(line: &str, hit_re: &Regex, limit: usize) -> String {
    let prefix_end = match hit_re.find(line) {
        Some(m) if line[m.end()..].starts_with(' ') => m.end() + 1,
        Some(m) => m.end(),
        None => 0,
    };
    let (prefix, content) = line.split_at(prefix_end);
    if content.chars().count() <= limit {
        return line.to_string();
    }
    let shortened: String = content.chars().take(limit).collect();
    format!("{}{}...", prefix, shortened)
}
