//! CorpusLayout: file names of the persisted artifacts inside a corpus.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn default_dex_dir() -> String {
    "dex".to_string()
}

fn default_changes_file() -> String {
    "changes.md".to_string()
}

fn default_nodes_file() -> String {
    "nodes.tsv".to_string()
}

fn default_tags_file() -> String {
    "tags".to_string()
}

fn default_content_file() -> String {
    "README.md".to_string()
}

fn default_meta_file() -> String {
    "keg".to_string()
}

fn default_link_prefix() -> String {
    "../".to_string()
}

/// Layout configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusLayout {
    /// Reserved index subdirectory (relative to corpus root)
    #[serde(default = "default_dex_dir")]
    pub dex_dir: String,

    /// Change-log file inside the index directory
    #[serde(default = "default_changes_file")]
    pub changes_file: String,

    /// Tabular file inside the index directory
    #[serde(default = "default_nodes_file")]
    pub nodes_file: String,

    /// Tags file inside the index directory
    #[serde(default = "default_tags_file")]
    pub tags_file: String,

    /// Title-bearing content file inside each node directory
    #[serde(default = "default_content_file")]
    pub content_file: String,

    /// Corpus metadata file (relative to corpus root)
    #[serde(default = "default_meta_file")]
    pub meta_file: String,

    /// Prefix of the change-log link to a node
    #[serde(default = "default_link_prefix")]
    pub link_prefix: String,
}

impl Default for CorpusLayout {
    fn default() -> Self {
        Self {
            dex_dir: default_dex_dir(),
            changes_file: default_changes_file(),
            nodes_file: default_nodes_file(),
            tags_file: default_tags_file(),
            content_file: default_content_file(),
            meta_file: default_meta_file(),
            link_prefix: default_link_prefix(),
        }
    }
}

impl CorpusLayout {
    pub fn dex_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.dex_dir)
    }

    pub fn changes_path(&self, root: &Path) -> PathBuf {
        self.dex_dir(root).join(&self.changes_file)
    }

    pub fn nodes_path(&self, root: &Path) -> PathBuf {
        self.dex_dir(root).join(&self.nodes_file)
    }

    pub fn tags_path(&self, root: &Path) -> PathBuf {
        self.dex_dir(root).join(&self.tags_file)
    }

    pub fn meta_path(&self, root: &Path) -> PathBuf {
        root.join(&self.meta_file)
    }

    pub fn content_path(&self, node_dir: &Path) -> PathBuf {
        node_dir.join(&self.content_file)
    }
}
