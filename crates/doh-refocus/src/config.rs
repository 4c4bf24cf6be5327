//! Configuration for transcript refocusing

/// Configuration for a refocusing pass.
#[derive(Debug, Clone)]
pub struct RefocusConfig {
    /// Keep at most this many search hit lines per embedded search result
    pub search_hit_limit: usize,
    /// Shorten retained search hit lines beyond this many characters
    pub search_line_limit: usize,
    /// Whether to append a debug entry to the on-disk log for each pass
    pub debug_log: bool,
}

impl Default for RefocusConfig {
    fn default() -> Self {
        Self {
            search_hit_limit: 20,
            search_line_limit: 1000,
            debug_log: true,
        }
    }
}
