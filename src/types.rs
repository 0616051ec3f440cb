use crate::classify::Encoding;
use crate::error::GlobcatError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A file accepted by the walker, handed to a [`Sink`](crate::Sink) as one unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// The path as it should be shown: the walk root joined with the
    /// relative path, without a leading `./`.
    pub path: PathBuf,
    /// Root-relative path with `/` separators; empty when the root itself is
    /// a file.
    pub relative: String,
    /// Label of the sampled prefix, if the file was classified.
    pub encoding: Option<Encoding>,
    /// Full file content, or `None` in list mode.
    pub content: Option<Vec<u8>>,
}

/// Counters for one or more walks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkStats {
    /// Files that passed the include/exclude test.
    pub files_selected: usize,
    pub files_emitted: usize,
    /// Selected files dropped as empty or binary.
    pub files_skipped: usize,
    pub dirs_pruned: usize,
    pub errors: usize,
}

impl WalkStats {
    pub fn merge(&mut self, other: WalkStats) {
        self.files_selected += other.files_selected;
        self.files_emitted += other.files_emitted;
        self.files_skipped += other.files_skipped;
        self.dirs_pruned += other.dirs_pruned;
        self.errors += other.errors;
    }
}

/// The complete result of a [`globcat`](crate::globcat) run.
#[derive(Debug)]
pub struct GlobcatResult {
    /// Accepted files, in traversal order for sequential runs.
    pub files: Vec<FileRecord>,
    /// Per-path failures; none of them stopped the run.
    pub errors: Vec<GlobcatError>,
    pub stats: WalkStats,
}
