//! Corpus handle: a root directory plus the layout of its artifacts.

use crate::config::CorpusLayout;
use crate::error::KegError;
use crate::store::node_path;
use crate::types::NodeID;
use std::path::{Path, PathBuf};

/// An opened corpus root
#[derive(Debug, Clone)]
pub struct Corpus {
    root: PathBuf,
    layout: CorpusLayout,
}

impl Corpus {
    /// Open an existing corpus root.
    pub fn open(root: impl Into<PathBuf>, layout: CorpusLayout) -> Result<Self, KegError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(KegError::not_found(&root));
        }
        Ok(Self { root, layout })
    }

    /// Open with the default layout.
    pub fn with_default_layout(root: impl Into<PathBuf>) -> Result<Self, KegError> {
        Self::open(root, CorpusLayout::default())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn layout(&self) -> &CorpusLayout {
        &self.layout
    }

    pub fn node_dir(&self, id: NodeID) -> PathBuf {
        node_path(&self.root, id)
    }

    pub fn content_path(&self, id: NodeID) -> PathBuf {
        self.layout.content_path(&self.node_dir(id))
    }

    pub fn dex_dir(&self) -> PathBuf {
        self.layout.dex_dir(&self.root)
    }

    pub fn changes_path(&self) -> PathBuf {
        self.layout.changes_path(&self.root)
    }

    pub fn nodes_path(&self) -> PathBuf {
        self.layout.nodes_path(&self.root)
    }

    pub fn tags_path(&self) -> PathBuf {
        self.layout.tags_path(&self.root)
    }

    pub fn meta_path(&self) -> PathBuf {
        self.layout.meta_path(&self.root)
    }
}
