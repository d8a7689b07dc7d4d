//! Index Rebuild
//!
//! Re-derives the whole index from the corpus on disk: list node directories,
//! find the latest change of any file in each, scan the title, and persist
//! both index files. Rebuilding is idempotent and is the recovery path for
//! any index left stale by an interrupted mutation.
//!
//! Node directories whose files are all zero-length (or that hold no files)
//! are removed as a side effect. A node whose title fails the grammar is
//! indexed with an empty title rather than failing the rebuild.

use crate::corpus::Corpus;
use crate::dex::{files, Dex, DexCodec, DexEntry};
use crate::error::KegError;
use crate::store::{list_nodes, NodeDir};
use crate::title::read_title;
use crate::types::{truncate_to_seconds, NodeID};
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Summary of the files inside one node directory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeFiles {
    /// Latest modification time of any file, whole seconds
    pub latest: Option<DateTime<Utc>>,
    /// Whether any file has a non-zero length
    pub has_content: bool,
}

impl NodeFiles {
    pub fn is_empty(&self) -> bool {
        !self.has_content
    }
}

/// Walk every file under `dir` recursively.
pub fn scan_node_files(dir: &Path) -> Result<NodeFiles, KegError> {
    let mut files = NodeFiles::default();
    for entry in WalkDir::new(dir).follow_links(false) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            match e.into_io_error() {
                Some(io) => KegError::io(path, io),
                None => KegError::NotFound(format!("filesystem loop at {}", path.display())),
            }
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let metadata = entry.metadata().map_err(|e| {
            let path = entry.path().to_path_buf();
            match e.into_io_error() {
                Some(io) => KegError::io(&path, io),
                None => KegError::not_found(&path),
            }
        })?;
        if metadata.len() > 0 {
            files.has_content = true;
        }
        if let Ok(modified) = metadata.modified() {
            let modified = truncate_to_seconds(DateTime::<Utc>::from(modified));
            files.latest = Some(files.latest.map_or(modified, |l| l.max(modified)));
        }
    }
    Ok(files)
}

/// What one node directory contributes to a rebuild
#[derive(Debug)]
enum Inspection {
    Entry { entry: DexEntry, title_ok: bool },
    Empty,
    Unreadable(KegError),
}

/// Rebuild report
#[derive(Debug, Clone)]
pub struct RebuildReport {
    /// The rebuilt index, most recently changed first
    pub dex: Dex,
    /// Empty node directories removed during the rebuild
    pub removed_empty: Vec<NodeID>,
    /// Nodes indexed with an empty title because the grammar failed
    pub untitled: Vec<NodeID>,
    /// Nodes left out because their files could not be read
    pub skipped: Vec<NodeID>,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

/// Full index rebuild over one corpus.
pub struct IndexBuilder<'a> {
    corpus: &'a Corpus,
    codec: DexCodec,
    parallel: bool,
}

impl<'a> IndexBuilder<'a> {
    pub fn new(corpus: &'a Corpus) -> Result<Self, KegError> {
        let codec = DexCodec::new(corpus.layout().link_prefix.clone())?;
        Ok(Self {
            corpus,
            codec,
            parallel: true,
        })
    }

    /// Inspect nodes on the rayon pool (default) or sequentially.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn codec(&self) -> &DexCodec {
        &self.codec
    }

    /// Derive the index from disk without touching the filesystem.
    ///
    /// Returns the report with nothing removed; empty nodes are listed in
    /// `removed_empty` as candidates.
    pub fn derive(&self) -> Result<RebuildReport, KegError> {
        let start = Instant::now();
        let listing = list_nodes(self.corpus.root())?;

        let inspections: Vec<(NodeID, Inspection)> = if self.parallel {
            listing
                .nodes
                .par_iter()
                .map(|node| (node.id, self.inspect(node)))
                .collect()
        } else {
            listing
                .nodes
                .iter()
                .map(|node| (node.id, self.inspect(node)))
                .collect()
        };

        let mut dex = Dex::new();
        let mut removed_empty = Vec::new();
        let mut untitled = Vec::new();
        let mut skipped = Vec::new();
        for (id, inspection) in inspections {
            match inspection {
                Inspection::Entry { entry, title_ok } => {
                    if !title_ok {
                        untitled.push(id);
                    }
                    dex.push(entry);
                }
                Inspection::Empty => removed_empty.push(id),
                Inspection::Unreadable(err) => {
                    warn!("Skipping unreadable node {}: {}", id, err);
                    skipped.push(id);
                }
            }
        }
        dex.sort_by_changes();

        Ok(RebuildReport {
            dex,
            removed_empty,
            untitled,
            skipped,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    /// Rebuild and persist the index, removing empty node directories.
    pub fn rebuild(&self) -> Result<RebuildReport, KegError> {
        let mut report = self.derive()?;

        let mut removed = Vec::with_capacity(report.removed_empty.len());
        for id in report.removed_empty.drain(..) {
            let dir = self.corpus.node_dir(id);
            match std::fs::remove_dir_all(&dir) {
                Ok(()) => {
                    warn!("Removed empty node directory {}", dir.display());
                    removed.push(id);
                }
                Err(e) => warn!("Failed to remove empty node {}: {}", dir.display(), e),
            }
        }
        report.removed_empty = removed;

        files::write_dex(self.corpus, &self.codec, &report.dex)?;

        info!(
            root = %self.corpus.root().display(),
            entries = report.dex.len(),
            removed = report.removed_empty.len(),
            untitled = report.untitled.len(),
            "Rebuilt index in {}ms",
            report.duration_ms
        );
        Ok(report)
    }

    fn inspect(&self, node: &NodeDir) -> Inspection {
        let files = match scan_node_files(&node.path) {
            Ok(f) => f,
            Err(e) => return Inspection::Unreadable(e),
        };
        if files.is_empty() {
            debug!("Node {} is empty", node.id);
            return Inspection::Empty;
        }

        let content = self.corpus.layout().content_path(&node.path);
        let (title, title_ok) = match read_title(&content) {
            Ok(title) => (title, true),
            Err(e) => {
                warn!("Node {} has no valid title: {}", node.id, e);
                (String::new(), false)
            }
        };
        // has_content implies at least one file, so latest is set
        let updated = files.latest.unwrap_or_default();
        debug!("Indexed node {}: {:?}", node.id, title);
        Inspection::Entry {
            entry: DexEntry::new(node.id, title, updated),
            title_ok,
        }
    }
}
