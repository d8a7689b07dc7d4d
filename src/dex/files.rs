//! Loading and persisting the index files of a corpus.

use crate::corpus::Corpus;
use crate::dex::{Dex, DexCodec};
use crate::error::KegError;
use crate::meta;
use crate::store::persistence::write_atomic;

/// Whether the corpus has a change log.
pub fn has_dex(corpus: &Corpus) -> bool {
    corpus.changes_path().is_file()
}

/// Parse the persisted change log.
pub fn load_dex(corpus: &Corpus, codec: &DexCodec) -> Result<Dex, KegError> {
    let path = corpus.changes_path();
    let text = std::fs::read_to_string(&path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            KegError::not_found(&path)
        } else {
            KegError::io(&path, e)
        }
    })?;
    codec.parse_changes(&text)
}

/// Like [`load_dex`], but a corpus that has never been indexed yields an
/// empty index.
pub(crate) fn load_dex_or_empty(corpus: &Corpus, codec: &DexCodec) -> Result<Dex, KegError> {
    match load_dex(corpus, codec) {
        Err(KegError::NotFound(_)) => Ok(Dex::new()),
        other => other,
    }
}

/// Persist both serializations and the metadata `updated` field.
///
/// `dex` is written to the change log in its current order; the tabular file
/// is written sorted by id.
pub fn write_dex(corpus: &Corpus, codec: &DexCodec, dex: &Dex) -> Result<(), KegError> {
    write_atomic(&corpus.changes_path(), codec.serialize_changes(dex).as_bytes())?;

    let mut by_id = dex.clone();
    by_id.dedup().sort_by_id();
    write_atomic(&corpus.nodes_path(), codec.serialize_tsv(&by_id).as_bytes())?;

    if let Some(latest) = dex.latest_update() {
        meta::set_updated(&corpus.meta_path(), &latest)?;
    }
    Ok(())
}
