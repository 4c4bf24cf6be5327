//! Range-limited file reading for VFS snapshots

use std::collections::BTreeMap;
use std::path::Path;

/// Read a line range from a file, keyed by 1-indexed line number.
///
/// `offset` is the 0-based index of the first line to include (absent means
/// start of file); `limit` bounds how many lines are read (absent means to
/// end of file). Any failure — missing file, permissions, invalid UTF-8 —
/// yields an empty map: the virtual filesystem is best-effort and a file
/// that cannot be read is simply not tracked.
pub fn read_range(path: &Path, offset: Option<u64>, limit: Option<u64>) -> BTreeMap<usize, String> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            tracing::debug!("Skipping unreadable file {}: {}", path.display(), e);
            return BTreeMap::new();
        }
    };

    let offset = offset.unwrap_or(0) as usize;
    let mut lines = BTreeMap::new();

    for (i, line) in content.lines().enumerate().skip(offset) {
        if let Some(limit) = limit {
            if i >= offset + limit as usize {
                break;
            }
        }
        lines.insert(i + 1, line.to_string());
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_read_whole_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "a.txt", "one\ntwo\nthree");
        let lines = read_range(&path, None, None);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[&1], "one");
        assert_eq!(lines[&3], "three");
    }

    #[test]
    fn test_terminal_newline_has_no_trailing_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "a.txt", "one\ntwo\n");
        let lines = read_range(&path, None, None);
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_offset_and_limit() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "a.txt", "one\ntwo\nthree\nfour");
        let lines = read_range(&path, Some(1), Some(2));
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[&2], "two");
        assert_eq!(lines[&3], "three");
    }

    #[test]
    fn test_offset_zero_starts_at_line_one() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "a.txt", "one\ntwo");
        let lines = read_range(&path, Some(0), Some(1));
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[&1], "one");
    }

    #[test]
    fn test_offset_past_end() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "a.txt", "one");
        assert!(read_range(&path, Some(10), None).is_empty());
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.txt");
        assert!(read_range(&path, None, None).is_empty());
    }

    #[test]
    fn test_non_utf8_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bin");
        std::fs::write(&path, [0xff, 0xfe, 0x00, 0x41]).unwrap();
        assert!(read_range(&path, None, None).is_empty());
    }
}
