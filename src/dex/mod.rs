//! Node Index (Dex)
//!
//! In-memory records summarizing each node (identifier, title, last change)
//! and the ordered collection of them. The index is always re-derivable from
//! the corpus on disk; see [`builder`] for the full rebuild and [`files`] for
//! loading and persisting the two serialized forms.

pub mod builder;
pub mod codec;
pub mod files;

pub use builder::{IndexBuilder, RebuildReport};
pub use codec::DexCodec;
pub use files::{has_dex, load_dex, write_dex};

use crate::types::{format_timestamp, NodeID};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One line of the index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DexEntry {
    /// Latest modification of any file within the node
    #[serde(rename = "U", with = "crate::types::timestamp_text")]
    pub updated: DateTime<Utc>,
    #[serde(rename = "N")]
    pub id: NodeID,
    /// First line of the node content file, empty when it fails the grammar
    #[serde(rename = "T")]
    pub title: String,
}

impl DexEntry {
    pub fn new(id: NodeID, title: impl Into<String>, updated: DateTime<Utc>) -> Self {
        Self {
            updated,
            title: title.into(),
            id,
        }
    }

    /// Include-list form without the timestamp: `* [title](<prefix><id>)`
    pub fn as_include(&self, link_prefix: &str) -> String {
        format!("* [{}]({}{})", self.title, link_prefix, self.id)
    }
}

impl std::fmt::Display for DexEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\t{}\t{}", self.id, format_timestamp(&self.updated), self.title)
    }
}

/// Ordered collection of index entries
///
/// Duplicated identifiers are tolerated in memory and removed on
/// serialization (first occurrence wins).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dex {
    entries: Vec<DexEntry>,
}

impl Dex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DexEntry> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[DexEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<DexEntry> {
        self.entries
    }

    pub fn push(&mut self, entry: DexEntry) {
        self.entries.push(entry);
    }

    /// Sort from lowest to highest identifier.
    pub fn sort_by_id(&mut self) -> &mut Self {
        self.entries.sort_by_key(|e| e.id);
        self
    }

    /// Sort most recently changed first; ties put the higher identifier first.
    pub fn sort_by_changes(&mut self) -> &mut Self {
        self.entries
            .sort_by(|a, b| b.updated.cmp(&a.updated).then_with(|| b.id.cmp(&a.id)));
        self
    }

    pub fn lookup(&self, id: NodeID) -> Option<&DexEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Entry with the lowest identifier.
    pub fn first(&self) -> Option<&DexEntry> {
        self.entries.iter().min_by_key(|e| e.id)
    }

    /// Entry with the highest identifier.
    pub fn last(&self) -> Option<&DexEntry> {
        self.entries.iter().max_by_key(|e| e.id)
    }

    /// Most recently changed entry.
    pub fn last_changed(&self) -> Option<&DexEntry> {
        self.entries.iter().max_by_key(|e| (e.updated, e.id))
    }

    /// Latest `updated` across all entries.
    pub fn latest_update(&self) -> Option<DateTime<Utc>> {
        self.entries.iter().map(|e| e.updated).max()
    }

    /// Entries whose title contains `keyword`, ignoring case, in current order.
    pub fn with_title_text(&self, keyword: &str) -> Dex {
        let needle = keyword.to_lowercase();
        self.entries
            .iter()
            .filter(|e| e.title.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    /// Pick an entry using the caller's random source.
    pub fn random<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&DexEntry> {
        if self.entries.is_empty() {
            return None;
        }
        let i = rng.gen_range(0..self.entries.len());
        self.entries.get(i)
    }

    /// Remove every entry with `id`, keeping the order of the rest.
    /// Returns the first removed entry.
    pub fn delete(&mut self, id: NodeID) -> Option<DexEntry> {
        let removed = self.lookup(id).cloned();
        self.entries.retain(|e| e.id != id);
        removed
    }

    /// Replace the entry with the same identifier in place, or append.
    pub fn upsert(&mut self, entry: DexEntry) {
        match self.entries.iter().position(|e| e.id == entry.id) {
            Some(i) => {
                self.entries[i] = entry;
                let id = self.entries[i].id;
                let mut seen_first = false;
                self.entries.retain(|e| {
                    if e.id != id {
                        return true;
                    }
                    let keep = !seen_first;
                    seen_first = true;
                    keep
                });
            }
            None => self.entries.push(entry),
        }
    }

    /// Drop later occurrences of repeated identifiers.
    pub fn dedup(&mut self) -> &mut Self {
        let mut seen = HashSet::with_capacity(self.entries.len());
        self.entries.retain(|e| seen.insert(e.id));
        self
    }

    /// JSON array with one entry object per line.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        if self.entries.is_empty() {
            return Ok("[]".to_string());
        }
        let lines = self
            .entries
            .iter()
            .map(serde_json::to_string)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(format!("[{}]", lines.join(",\n")))
    }

    /// Include list (one `* [title](link)` per entry) for composing nodes.
    pub fn to_includes(&self, link_prefix: &str) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            out.push_str(&entry.as_include(link_prefix));
            out.push('\n');
        }
        out
    }
}

impl FromIterator<DexEntry> for Dex {
    fn from_iter<I: IntoIterator<Item = DexEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<DexEntry>> for Dex {
    fn from(entries: Vec<DexEntry>) -> Self {
        Self { entries }
    }
}

impl IntoIterator for Dex {
    type Item = DexEntry;
    type IntoIter = std::vec::IntoIter<DexEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Dex {
    type Item = &'a DexEntry;
    type IntoIter = std::slice::Iter<'a, DexEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
