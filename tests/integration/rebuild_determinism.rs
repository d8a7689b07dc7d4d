use kegdex::dex::{load_dex, DexCodec, IndexBuilder};
use kegdex::lifecycle;
use kegdex::KegError;
use std::fs;

use crate::integration::support::{corpus_with, read, set_mtime, write_node};

#[test]
fn rebuild_writes_both_forms_and_metadata() {
    let (temp, corpus) = corpus_with(&[(0, "# Zero\n\nbody\n"), (1, "# One\n")]);
    set_mtime(corpus.content_path(0), "2022-12-10T06:10:04Z");
    set_mtime(corpus.content_path(1), "2023-01-02T03:04:05Z");

    IndexBuilder::new(&corpus).unwrap().rebuild().unwrap();

    assert_eq!(
        read(corpus.changes_path()),
        "* 2023-01-02 03:04:05Z [One](../1)\n* 2022-12-10 06:10:04Z [Zero](../0)\n"
    );
    assert_eq!(
        read(corpus.nodes_path()),
        "0\t2022-12-10 06:10:04Z\tZero\n1\t2023-01-02 03:04:05Z\tOne\n"
    );
    assert_eq!(
        read(temp.path().join("keg")),
        "title: test keg\nupdated: 2023-01-02 03:04:05Z\n"
    );
}

#[test]
fn nested_file_change_updates_node() {
    let (temp, corpus) = corpus_with(&[(0, "# Zero\n")]);
    let asset = temp.path().join("0").join("assets").join("x");
    fs::create_dir_all(asset.parent().unwrap()).unwrap();
    fs::write(&asset, "attachment").unwrap();
    set_mtime(corpus.content_path(0), "2020-01-01T00:00:00Z");
    set_mtime(&asset, "2023-05-06T07:08:09Z");

    IndexBuilder::new(&corpus).unwrap().rebuild().unwrap();

    assert_eq!(
        read(corpus.changes_path()),
        "* 2023-05-06 07:08:09Z [Zero](../0)\n"
    );
    assert_eq!(
        read(corpus.nodes_path()),
        "0\t2023-05-06 07:08:09Z\tZero\n"
    );
}

#[test]
fn rebuild_is_idempotent() {
    let (temp, corpus) = corpus_with(&[(0, "# Zero\n"), (3, "# Three\n"), (7, "# Seven\n")]);
    for id in [0, 3, 7] {
        set_mtime(corpus.content_path(id), "2024-02-29T12:00:00Z");
    }

    IndexBuilder::new(&corpus).unwrap().rebuild().unwrap();
    let first = (
        read(corpus.changes_path()),
        read(corpus.nodes_path()),
        read(temp.path().join("keg")),
    );
    IndexBuilder::new(&corpus)
        .unwrap()
        .with_parallel(false)
        .rebuild()
        .unwrap();
    let second = (
        read(corpus.changes_path()),
        read(corpus.nodes_path()),
        read(temp.path().join("keg")),
    );
    assert_eq!(first, second);
    // equal timestamps fall back to id, highest first
    assert!(first.0.starts_with("* 2024-02-29 12:00:00Z [Seven](../7)\n"));
}

#[test]
fn rebuild_drops_empty_node() {
    let (temp, corpus) = corpus_with(&[(0, "# Zero\n"), (1, "# One\n"), (2, "")]);

    let report = IndexBuilder::new(&corpus).unwrap().rebuild().unwrap();
    assert_eq!(report.removed_empty, vec![2]);
    assert!(!temp.path().join("2").exists());

    let codec = DexCodec::new("../").unwrap();
    let mut ids: Vec<u64> = load_dex(&corpus, &codec)
        .unwrap()
        .iter()
        .map(|e| e.id)
        .collect();
    ids.sort();
    assert_eq!(ids, vec![0, 1]);
    assert_eq!(read(corpus.nodes_path()).lines().count(), 2);
}

#[test]
fn delete_then_rebuild_agree() {
    let (_temp, corpus) = corpus_with(&[(0, "# Zero\n"), (1, "# One\n"), (2, "# Two\n")]);
    set_mtime(corpus.content_path(0), "2021-01-01T00:00:00Z");
    set_mtime(corpus.content_path(1), "2021-06-01T00:00:00Z");
    set_mtime(corpus.content_path(2), "2022-01-01T00:00:00Z");
    IndexBuilder::new(&corpus).unwrap().rebuild().unwrap();

    let removed = lifecycle::delete(&corpus, 1).unwrap().unwrap();
    assert_eq!(removed.title, "One");
    let after_delete = (read(corpus.changes_path()), read(corpus.nodes_path()));

    IndexBuilder::new(&corpus).unwrap().rebuild().unwrap();
    let after_rebuild = (read(corpus.changes_path()), read(corpus.nodes_path()));
    assert_eq!(after_delete, after_rebuild);
    assert_eq!(
        after_rebuild.0,
        "* 2022-01-01 00:00:00Z [Two](../2)\n* 2021-01-01 00:00:00Z [Zero](../0)\n"
    );
}

#[test]
fn rebuild_ignores_non_node_entries() {
    let (temp, corpus) = corpus_with(&[(4, "# Four\n")]);
    write_node(temp.path(), 0, "# Zero\n");
    fs::create_dir_all(temp.path().join("drafts")).unwrap();
    fs::write(temp.path().join("drafts").join("README.md"), "# Draft\n").unwrap();
    fs::create_dir_all(temp.path().join("007")).unwrap();
    fs::write(temp.path().join("007").join("README.md"), "# Bond\n").unwrap();

    let report = IndexBuilder::new(&corpus).unwrap().rebuild().unwrap();
    let mut ids: Vec<u64> = report.dex.iter().map(|e| e.id).collect();
    ids.sort();
    assert_eq!(ids, vec![0, 4]);
}

#[test]
fn malformed_change_log_reports_line() {
    let (_temp, corpus) = corpus_with(&[]);
    fs::create_dir_all(corpus.dex_dir()).unwrap();
    fs::write(
        corpus.changes_path(),
        "* 2022-12-10 06:10:04Z [Fine](../2)\nnot an entry\n",
    )
    .unwrap();

    let codec = DexCodec::new("../").unwrap();
    match load_dex(&corpus, &codec) {
        Err(KegError::MalformedIndexLine { line, content }) => {
            assert_eq!(line, 2);
            assert_eq!(content, "not an entry");
        }
        other => panic!("expected malformed line error, got {:?}", other),
    }
}
