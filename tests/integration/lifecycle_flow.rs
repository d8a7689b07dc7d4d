use kegdex::dex::{has_dex, load_dex, DexCodec};
use kegdex::lifecycle::{allocate, create, create_with_editor, delete, edit, import_node, update_entry};
use kegdex::views::IndexQuery;
use kegdex::KegError;
use std::fs;

use crate::integration::support::{corpus_with, read, set_mtime, WriteEditor};

#[test]
fn allocation_follows_highest_directory() {
    let (_temp, corpus) = corpus_with(&[]);
    assert_eq!(allocate(&corpus).unwrap(), 0);

    let (_temp, corpus) = corpus_with(&[(0, "# a\n"), (3, "# b\n"), (12, "# c\n")]);
    assert_eq!(allocate(&corpus).unwrap(), 13);
}

#[test]
fn create_edit_delete_round() {
    let (_temp, corpus) = corpus_with(&[]);
    let codec = DexCodec::new("../").unwrap();

    let first = create_with_editor(&corpus, &WriteEditor("# First note\n"))
        .unwrap()
        .unwrap();
    let second = create_with_editor(&corpus, &WriteEditor("# Second note\n"))
        .unwrap()
        .unwrap();
    assert_eq!((first.id, second.id), (0, 1));
    assert!(has_dex(&corpus));

    let edited = edit(&corpus, 0, &WriteEditor("# First note, revised\n")).unwrap();
    assert_eq!(edited.title, "First note, revised");

    let dex = load_dex(&corpus, &codec).unwrap();
    assert_eq!(dex.len(), 2);
    assert_eq!(dex.lookup(0).unwrap().title, "First note, revised");

    delete(&corpus, 1).unwrap();
    let dex = load_dex(&corpus, &codec).unwrap();
    assert_eq!(dex.len(), 1);
    assert!(dex.lookup(1).is_none());
    assert!(!corpus.node_dir(1).exists());
    assert_eq!(read(corpus.nodes_path()), format!("{}\n", dex.lookup(0).unwrap()));
}

#[test]
fn update_entry_keeps_reverse_chronological_order() {
    let (_temp, corpus) = corpus_with(&[(0, "# Zero\n"), (1, "# One\n")]);
    set_mtime(corpus.content_path(0), "2023-01-01T00:00:00Z");
    set_mtime(corpus.content_path(1), "2023-02-01T00:00:00Z");
    update_entry(&corpus, 0).unwrap();
    update_entry(&corpus, 1).unwrap();

    fs::write(corpus.content_path(0), "# Zero again\n").unwrap();
    set_mtime(corpus.content_path(0), "2023-03-01T00:00:00Z");
    update_entry(&corpus, 0).unwrap();

    assert_eq!(
        read(corpus.changes_path()),
        "* 2023-03-01 00:00:00Z [Zero again](../0)\n* 2023-02-01 00:00:00Z [One](../1)\n"
    );
}

#[test]
fn plain_create_is_provisional_until_rebuild() {
    let (_temp, corpus) = corpus_with(&[(0, "# Zero\n")]);
    let entry = create(&corpus).unwrap();
    assert_eq!(entry.id, 1);
    assert!(entry.title.is_empty());
    assert!(corpus.content_path(1).is_file());
    assert!(!has_dex(&corpus));
}

#[test]
fn import_then_query() {
    let (_temp, corpus) = corpus_with(&[(0, "# Zero\n")]);
    let outside = tempfile::tempdir().unwrap();
    let source = outside.path().join("incoming");
    fs::create_dir_all(&source).unwrap();
    fs::write(source.join("README.md"), "# Imported note\n\ntext\n").unwrap();

    let entry = import_node(&corpus, &source).unwrap();
    assert_eq!(entry.id, 1);

    let query = IndexQuery::new(&corpus).unwrap();
    assert_eq!(query.lookup(1).unwrap().title, "Imported note");
    assert_eq!(query.last().unwrap().unwrap().id, 1);
    assert_eq!(query.titles("IMPORTED").unwrap().len(), 1);
}

#[test]
fn queries_need_an_index() {
    let (_temp, corpus) = corpus_with(&[(0, "# Zero\n")]);
    let query = IndexQuery::new(&corpus).unwrap();
    assert!(matches!(query.changes(5), Err(KegError::NotFound(_))));
}

#[test]
fn delete_missing_node_is_not_found() {
    let (_temp, corpus) = corpus_with(&[(0, "# Zero\n")]);
    assert!(matches!(delete(&corpus, 9), Err(KegError::NotFound(_))));
}
