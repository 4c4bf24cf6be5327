//! Virtual filesystem snapshots built from file-operation tool calls

use std::collections::BTreeMap;
use std::path::Path;

use doh_chat::ToolCall;

use crate::classify::{self, FileOpKind};
use crate::disk;

/// Sparse per-file line map, keyed by 1-indexed line number.
pub type FileLines = BTreeMap<usize, String>;

/// Snapshot of the current disk state of every file the assistant touched.
///
/// Keys are the paths exactly as they appeared in tool arguments. A path
/// whose line map is empty was operated on but could not be read back.
#[derive(Debug, Clone, Default)]
pub struct VirtualFileSystem {
    files: BTreeMap<String, FileLines>,
}

impl VirtualFileSystem {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Iterate tracked files in path order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &FileLines)> {
        self.files.iter()
    }

    /// Paths of all tracked files, in order
    pub fn paths(&self) -> Vec<String> {
        self.files.keys().cloned().collect()
    }

    pub fn get(&self, path: &str) -> Option<&FileLines> {
        self.files.get(path)
    }
}

/// Build a VFS from movable tool pairs by re-reading files from disk.
///
/// Tool results are deliberately ignored: disk may have changed since they
/// were produced, and the snapshot must show what the files contain now.
/// Pairs are processed in conversation order, so a later write replaces
/// what an earlier read tracked and the freshest state wins. Ranged reads
/// merge into the existing per-path map; writes and edits replace it with
/// a full fresh read.
pub fn build_vfs(pairs: &[(ToolCall, String)]) -> VirtualFileSystem {
    let mut vfs = VirtualFileSystem::default();

    for (call, _result) in pairs {
        let Some(op) = classify::classify(call) else {
            continue;
        };

        match op.kind {
            FileOpKind::Read => {
                let lines = disk::read_range(Path::new(&op.path), op.offset, op.limit);
                vfs.files.entry(op.path).or_default().extend(lines);
            }
            FileOpKind::Write | FileOpKind::Edit => {
                let lines = disk::read_range(Path::new(&op.path), None, None);
                vfs.files.insert(op.path, lines);
            }
        }
    }

    vfs
}
