//! Node Store
//!
//! Enumerates node directories under a corpus root. A node directory is an
//! immediate subdirectory whose name is a canonical non-negative integer;
//! everything else (the index directory, dotfiles, stray files) is skipped.
//! Identifier allocation is derived from the listing: the next id is one past
//! the highest directory name present.

pub mod persistence;

use crate::error::KegError;
use crate::types::{parse_node_id, NodeID};
use std::path::{Path, PathBuf};

/// One node directory found on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeDir {
    pub id: NodeID,
    pub path: PathBuf,
}

/// Result of listing a corpus root
#[derive(Debug, Clone, Default)]
pub struct NodeListing {
    /// Node directories ordered by id ascending
    pub nodes: Vec<NodeDir>,
    /// Lowest id found, None when the corpus has no nodes
    pub min: Option<NodeID>,
    /// Highest id found, None when the corpus has no nodes
    pub max: Option<NodeID>,
}

impl NodeListing {
    /// Next allocatable identifier: `max + 1`, or `0` for an empty corpus.
    pub fn next_id(&self) -> Result<NodeID, KegError> {
        match self.max {
            None => Ok(0),
            Some(max) => max.checked_add(1).ok_or_else(|| {
                KegError::AllocationFailed(format!("highest node id {} has no successor", max))
            }),
        }
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeID> + '_ {
        self.nodes.iter().map(|n| n.id)
    }

    pub fn contains(&self, id: NodeID) -> bool {
        self.nodes.binary_search_by_key(&id, |n| n.id).is_ok()
    }
}

/// List the node directories directly under `root`.
pub fn list_nodes(root: &Path) -> Result<NodeListing, KegError> {
    let entries = std::fs::read_dir(root).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            KegError::not_found(root)
        } else {
            KegError::io(root, e)
        }
    })?;

    let mut nodes = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!("Failed to read directory entry in {}: {}", root.display(), e);
                continue;
            }
        };
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        if !is_dir {
            continue;
        }
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if let Ok(id) = parse_node_id(name) {
            nodes.push(NodeDir {
                id,
                path: entry.path(),
            });
        }
    }

    nodes.sort_by_key(|n| n.id);
    let min = nodes.first().map(|n| n.id);
    let max = nodes.last().map(|n| n.id);
    Ok(NodeListing { nodes, min, max })
}

/// Path of the directory for node `id` under `root`.
pub fn node_path(root: &Path, id: NodeID) -> PathBuf {
    root.join(id.to_string())
}
