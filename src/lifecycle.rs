//! Node Lifecycle
//!
//! Creation, import, editing and deletion of nodes, each followed by an
//! incremental update of the persisted index. Identifiers are allocated from
//! the highest node directory present; there is no stored counter.
//!
//! Mutations are single-writer: two processes allocating at the same time can
//! pick the same identifier, and concurrent index writes are last-writer-wins.
//! A full rebuild restores the canonical index after any interruption.

use crate::corpus::Corpus;
use crate::dex::builder::scan_node_files;
use crate::dex::files::{load_dex_or_empty, write_dex};
use crate::dex::{Dex, DexCodec, DexEntry};
use crate::error::KegError;
use crate::store::list_nodes;
use crate::title::read_title;
use crate::types::{truncate_to_seconds, NodeID};
use chrono::Utc;
use std::path::Path;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Opens a content file for the user to edit, returning once they are done.
pub trait NodeEditor {
    fn edit(&self, path: &Path) -> Result<(), KegError>;
}

fn codec_for(corpus: &Corpus) -> Result<DexCodec, KegError> {
    DexCodec::new(corpus.layout().link_prefix.clone())
}

/// Next free identifier: one past the highest node directory, or 0.
pub fn allocate(corpus: &Corpus) -> Result<NodeID, KegError> {
    list_nodes(corpus.root())?.next_id()
}

/// Create a node directory holding an empty content file.
///
/// The returned entry is provisional: the title is empty until content is
/// written and [`update_entry`] runs. An untouched node stays empty and is
/// removed by the next rebuild.
pub fn create(corpus: &Corpus) -> Result<DexEntry, KegError> {
    let id = allocate(corpus)?;
    let dir = corpus.node_dir(id);
    std::fs::create_dir(&dir).map_err(|e| {
        if e.kind() == std::io::ErrorKind::AlreadyExists {
            KegError::AllocationFailed(format!("node directory {} already exists", dir.display()))
        } else {
            KegError::io(&dir, e)
        }
    })?;
    let content = corpus.content_path(id);
    std::fs::write(&content, b"").map_err(|e| KegError::io(&content, e))?;
    info!("Created node {}", id);
    Ok(DexEntry::new(id, String::new(), truncate_to_seconds(Utc::now())))
}

/// Create a node and hand its content file to `editor`.
///
/// Returns None, with the directory removed again, when the editor leaves the
/// node empty.
pub fn create_with_editor(
    corpus: &Corpus,
    editor: &dyn NodeEditor,
) -> Result<Option<DexEntry>, KegError> {
    let provisional = create(corpus)?;
    let id = provisional.id;
    let dir = corpus.node_dir(id);

    if let Err(e) = editor.edit(&corpus.content_path(id)) {
        remove_if_empty(&dir)?;
        return Err(e);
    }
    if remove_if_empty(&dir)? {
        info!("Discarded empty node {}", id);
        return Ok(None);
    }
    update_entry(corpus, id).map(Some)
}

/// Hand an existing node's content file to `editor`, then refresh its entry.
pub fn edit(corpus: &Corpus, id: NodeID, editor: &dyn NodeEditor) -> Result<DexEntry, KegError> {
    let dir = corpus.node_dir(id);
    if !dir.is_dir() {
        return Err(KegError::not_found(&dir));
    }
    editor.edit(&corpus.content_path(id))?;
    update_entry(corpus, id)
}

fn remove_if_empty(dir: &Path) -> Result<bool, KegError> {
    if scan_node_files(dir)?.is_empty() {
        std::fs::remove_dir_all(dir).map_err(|e| KegError::io(dir, e))?;
        return Ok(true);
    }
    Ok(false)
}

/// Derive the current entry for node `id` from disk.
///
/// Unlike a rebuild, a title that fails the grammar is an error here.
pub fn derive_entry(corpus: &Corpus, id: NodeID) -> Result<DexEntry, KegError> {
    let dir = corpus.node_dir(id);
    if !dir.is_dir() {
        return Err(KegError::not_found(&dir));
    }
    let files = scan_node_files(&dir)?;
    let title = read_title(&corpus.content_path(id))?;
    let updated = files
        .latest
        .unwrap_or_else(|| truncate_to_seconds(Utc::now()));
    Ok(DexEntry::new(id, title, updated))
}

/// Re-derive node `id` and insert or replace it in the persisted index.
///
/// The change log is re-sorted so the refreshed entry takes its
/// reverse-chronological place; untouched entries keep their relative order.
pub fn update_entry(corpus: &Corpus, id: NodeID) -> Result<DexEntry, KegError> {
    let codec = codec_for(corpus)?;
    let entry = derive_entry(corpus, id)?;
    let dex = load_dex_or_empty(corpus, &codec)?;
    store_entry(corpus, &codec, dex, entry)
}

fn store_entry(
    corpus: &Corpus,
    codec: &DexCodec,
    mut dex: Dex,
    entry: DexEntry,
) -> Result<DexEntry, KegError> {
    dex.upsert(entry.clone());
    dex.sort_by_changes();
    write_dex(corpus, codec, &dex)?;
    debug!("Updated index entry for node {}", entry.id);
    Ok(entry)
}

/// Move the directory at `source` into the corpus as a new node.
///
/// The title and the persisted index are both checked before anything
/// moves; when either fails the source is left where it is.
pub fn import_node(corpus: &Corpus, source: &Path) -> Result<DexEntry, KegError> {
    if !source.is_dir() {
        return Err(KegError::not_found(source));
    }
    let title = read_title(&corpus.layout().content_path(source))?;
    let codec = codec_for(corpus)?;
    let dex = load_dex_or_empty(corpus, &codec)?;

    let id = allocate(corpus)?;
    let target = corpus.node_dir(id);
    if target.exists() {
        return Err(KegError::AllocationFailed(format!(
            "node directory {} already exists",
            target.display()
        )));
    }

    if let Err(e) = std::fs::rename(source, &target) {
        debug!("rename {} failed ({}), copying instead", source.display(), e);
        move_by_copy(source, &target)?;
    }
    info!("Imported {} as node {} ({:?})", source.display(), id, title);
    let entry = derive_entry(corpus, id)?;
    store_entry(corpus, &codec, dex, entry)
}

fn move_by_copy(source: &Path, target: &Path) -> Result<(), KegError> {
    if let Err(e) = copy_tree(source, target) {
        if target.exists() {
            if let Err(cleanup) = std::fs::remove_dir_all(target) {
                warn!("Failed to clean up partial import {}: {}", target.display(), cleanup);
            }
        }
        return Err(e);
    }
    std::fs::remove_dir_all(source).map_err(|e| KegError::io(source, e))
}

fn copy_tree(source: &Path, target: &Path) -> Result<(), KegError> {
    for entry in WalkDir::new(source).follow_links(false) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(source).to_path_buf();
            match e.into_io_error() {
                Some(io) => KegError::io(path, io),
                None => KegError::NotFound(format!("filesystem loop at {}", path.display())),
            }
        })?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|_| KegError::NotFound(entry.path().display().to_string()))?;
        let dest = target.join(relative);
        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&dest).map_err(|e| KegError::io(&dest, e))?;
        } else if entry.file_type().is_file() {
            std::fs::copy(entry.path(), &dest).map_err(|e| KegError::io(&dest, e))?;
        }
    }
    Ok(())
}

/// Remove node `id` and its entry; the rest of the index keeps its order.
///
/// Returns the removed entry when the index had one.
pub fn delete(corpus: &Corpus, id: NodeID) -> Result<Option<DexEntry>, KegError> {
    let dir = corpus.node_dir(id);
    if !dir.is_dir() {
        return Err(KegError::not_found(&dir));
    }
    let codec = codec_for(corpus)?;
    let mut dex = load_dex_or_empty(corpus, &codec)?;

    std::fs::remove_dir_all(&dir).map_err(|e| KegError::io(&dir, e))?;
    let removed = dex.delete(id);
    write_dex(corpus, &codec, &dex)?;
    info!("Deleted node {}", id);
    Ok(removed)
}
