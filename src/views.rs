//! Index Views
//!
//! Selects and orders a bounded set of index entries based on a policy
//! (ordering, title filters, limit), plus the corpus-level lookups built on
//! top of the persisted change log.

use crate::corpus::Corpus;
use crate::dex::{load_dex, Dex, DexCodec, DexEntry};
use crate::error::KegError;
use crate::types::NodeID;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Ordering policy for entry selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderingPolicy {
    /// Most recently changed first
    #[default]
    Recency,
    /// Lowest identifier first
    Id,
}

/// Entry filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryFilter {
    /// Case-insensitive substring of the title
    TitleContains(String),
    /// Identifier within an inclusive range
    IdRange { from: NodeID, to: NodeID },
}

impl EntryFilter {
    fn matches(&self, entry: &DexEntry) -> bool {
        match self {
            EntryFilter::TitleContains(text) => {
                entry.title.to_lowercase().contains(&text.to_lowercase())
            }
            EntryFilter::IdRange { from, to } => (*from..=*to).contains(&entry.id),
        }
    }
}

/// View policy
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ViewPolicy {
    /// Maximum number of entries; None is unbounded
    pub max_entries: Option<usize>,
    pub ordering: OrderingPolicy,
    /// All filters must match
    pub filters: Vec<EntryFilter>,
}

impl ViewPolicy {
    pub fn recent(n: usize) -> Self {
        Self {
            max_entries: Some(n),
            ..Self::default()
        }
    }

    pub fn with_filter(mut self, filter: EntryFilter) -> Self {
        self.filters.push(filter);
        self
    }
}

/// Apply `policy` to `dex`.
pub fn select(dex: &Dex, policy: &ViewPolicy) -> Dex {
    let mut view: Dex = dex
        .iter()
        .filter(|e| policy.filters.iter().all(|f| f.matches(e)))
        .cloned()
        .collect();
    view.dedup();
    match policy.ordering {
        OrderingPolicy::Recency => view.sort_by_changes(),
        OrderingPolicy::Id => view.sort_by_id(),
    };
    match policy.max_entries {
        Some(max) => view.into_iter().take(max).collect(),
        None => view,
    }
}

/// Read-only queries against a corpus's persisted index
pub struct IndexQuery<'a> {
    corpus: &'a Corpus,
    codec: DexCodec,
}

impl<'a> IndexQuery<'a> {
    pub fn new(corpus: &'a Corpus) -> Result<Self, KegError> {
        let codec = DexCodec::new(corpus.layout().link_prefix.clone())?;
        Ok(Self { corpus, codec })
    }

    pub fn dex(&self) -> Result<Dex, KegError> {
        load_dex(self.corpus, &self.codec)
    }

    pub fn view(&self, policy: &ViewPolicy) -> Result<Dex, KegError> {
        Ok(select(&self.dex()?, policy))
    }

    /// The `n` most recently changed entries.
    pub fn changes(&self, n: usize) -> Result<Dex, KegError> {
        self.view(&ViewPolicy::recent(n))
    }

    /// Entries whose title contains `keyword`, most recent first.
    pub fn titles(&self, keyword: &str) -> Result<Dex, KegError> {
        Ok(self.dex()?.with_title_text(keyword))
    }

    pub fn lookup(&self, id: NodeID) -> Result<DexEntry, KegError> {
        self.dex()?
            .lookup(id)
            .cloned()
            .ok_or_else(|| KegError::NotFound(format!("node {} is not indexed", id)))
    }

    /// Entry with the highest identifier.
    pub fn last(&self) -> Result<Option<DexEntry>, KegError> {
        Ok(self.dex()?.last().cloned())
    }

    /// Entry with the lowest identifier.
    pub fn first(&self) -> Result<Option<DexEntry>, KegError> {
        Ok(self.dex()?.first().cloned())
    }

    pub fn last_changed(&self) -> Result<Option<DexEntry>, KegError> {
        Ok(self.dex()?.last_changed().cloned())
    }

    pub fn random<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Option<DexEntry>, KegError> {
        Ok(self.dex()?.random(rng).cloned())
    }
}
