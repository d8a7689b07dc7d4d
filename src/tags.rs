//! Tag Index
//!
//! Maps tag names to the nodes carrying them, persisted separately from the
//! node index as one line per tag: `<tag> <id> <id> ...`.

use crate::corpus::Corpus;
use crate::error::KegError;
use crate::store::persistence::write_atomic;
use crate::types::{parse_node_id, NodeID};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Tag name to node identifiers, identifiers kept in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagsMap {
    tags: BTreeMap<String, Vec<NodeID>>,
}

impl TagsMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn get(&self, tag: &str) -> Option<&[NodeID]> {
        self.tags.get(tag).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[NodeID])> {
        self.tags.iter().map(|(t, ids)| (t.as_str(), ids.as_slice()))
    }

    /// Add `id` under `tag`; returns false if it was already there.
    pub fn add(&mut self, tag: &str, id: NodeID) -> bool {
        let ids = self.tags.entry(tag.to_string()).or_default();
        if ids.contains(&id) {
            return false;
        }
        ids.push(id);
        true
    }

    /// Remove `id` from `tag`, dropping the tag once no ids remain.
    pub fn remove(&mut self, tag: &str, id: NodeID) -> bool {
        let Some(ids) = self.tags.get_mut(tag) else {
            return false;
        };
        let before = ids.len();
        ids.retain(|&i| i != id);
        let removed = ids.len() != before;
        if ids.is_empty() {
            self.tags.remove(tag);
        }
        removed
    }

    /// Tags carrying `id`.
    pub fn tags_for(&self, id: NodeID) -> Vec<&str> {
        self.tags
            .iter()
            .filter(|(_, ids)| ids.contains(&id))
            .map(|(t, _)| t.as_str())
            .collect()
    }
}

impl fmt::Display for TagsMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (tag, ids) in &self.tags {
            if ids.is_empty() {
                continue;
            }
            write!(f, "{}", tag)?;
            for id in ids {
                write!(f, " {}", id)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl FromStr for TagsMap {
    type Err = KegError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut map = TagsMap::new();
        for line in text.lines() {
            let mut fields = line.split_whitespace();
            let Some(tag) = fields.next() else {
                continue;
            };
            for field in fields {
                map.add(tag, parse_node_id(field)?);
            }
        }
        Ok(map)
    }
}

/// Split a comma-separated tag list into validated, de-duplicated names.
pub fn parse_tag_list(csv: &str) -> Result<Vec<String>, KegError> {
    let mut tags: Vec<String> = Vec::new();
    for raw in csv.split(',') {
        let tag = raw.trim();
        if tag.is_empty() {
            continue;
        }
        if tag.chars().any(char::is_whitespace) {
            return Err(KegError::InvalidTag(tag.to_string()));
        }
        if !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    Ok(tags)
}

/// Load the corpus tags file; a missing file is an empty map.
pub fn load_tags(corpus: &Corpus) -> Result<TagsMap, KegError> {
    let path = corpus.tags_path();
    match std::fs::read_to_string(&path) {
        Ok(text) => text.parse(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(TagsMap::new()),
        Err(e) => Err(KegError::io(&path, e)),
    }
}

pub fn save_tags(corpus: &Corpus, tags: &TagsMap) -> Result<(), KegError> {
    write_atomic(&corpus.tags_path(), tags.to_string().as_bytes())
}

/// Tag node `id` with every tag in `tags_csv`.
pub fn tag(corpus: &Corpus, id: &str, tags_csv: &str) -> Result<TagsMap, KegError> {
    let id = parse_node_id(id)?;
    let names = parse_tag_list(tags_csv)?;
    let mut map = load_tags(corpus)?;
    let mut changed = false;
    for name in &names {
        changed |= map.add(name, id);
    }
    if changed {
        save_tags(corpus, &map)?;
        tracing::info!("Tagged node {} with {}", id, names.join(","));
    }
    Ok(map)
}

/// Remove node `id` from every tag in `tags_csv`.
pub fn untag(corpus: &Corpus, id: &str, tags_csv: &str) -> Result<TagsMap, KegError> {
    let id = parse_node_id(id)?;
    let names = parse_tag_list(tags_csv)?;
    let mut map = load_tags(corpus)?;
    let mut changed = false;
    for name in &names {
        changed |= map.remove(name, id);
    }
    if changed {
        save_tags(corpus, &map)?;
        tracing::info!("Untagged node {} from {}", id, names.join(","));
    }
    Ok(map)
}

/// Lines of the tags file whose tag is one of `tags_csv`, in file order.
pub fn grep(corpus: &Corpus, tags_csv: &str) -> Result<Vec<String>, KegError> {
    let names = parse_tag_list(tags_csv)?;
    let path = corpus.tags_path();
    let text = match std::fs::read_to_string(&path) {
        Ok(t) => t,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(KegError::io(&path, e)),
    };
    let prefixes: Vec<String> = names.iter().map(|n| format!("{} ", n)).collect();
    Ok(text
        .lines()
        .filter(|line| prefixes.iter().any(|p| line.starts_with(p.as_str())))
        .map(str::to_string)
        .collect())
}
