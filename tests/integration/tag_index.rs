use kegdex::tags::{grep, load_tags, tag, untag};
use kegdex::KegError;

use crate::integration::support::{corpus_with, read};

#[test]
fn tag_and_grep() {
    let (_temp, corpus) = corpus_with(&[(5, "# Five\n"), (6, "# Six\n")]);
    tag(&corpus, "5", "foo,bar").unwrap();
    tag(&corpus, "6", "foo").unwrap();

    assert_eq!(read(corpus.tags_path()), "bar 5\nfoo 5 6\n");
    assert_eq!(grep(&corpus, "foo").unwrap(), vec!["foo 5 6".to_string()]);
    assert_eq!(
        grep(&corpus, "bar,foo").unwrap(),
        vec!["bar 5".to_string(), "foo 5 6".to_string()]
    );
}

#[test]
fn retagging_does_not_duplicate() {
    let (_temp, corpus) = corpus_with(&[]);
    tag(&corpus, "5", "foo").unwrap();
    tag(&corpus, "5", "foo, foo").unwrap();
    assert_eq!(load_tags(&corpus).unwrap().get("foo"), Some(&[5][..]));
}

#[test]
fn untag_removes_id() {
    let (_temp, corpus) = corpus_with(&[]);
    tag(&corpus, "1", "alpha,beta").unwrap();
    untag(&corpus, "1", "alpha").unwrap();
    assert_eq!(read(corpus.tags_path()), "beta 1\n");
    assert!(grep(&corpus, "alpha").unwrap().is_empty());
}

#[test]
fn invalid_tags_and_ids_are_rejected() {
    let (_temp, corpus) = corpus_with(&[]);
    assert!(matches!(tag(&corpus, "x", "foo"), Err(KegError::InvalidIdentifier(_))));
    assert!(matches!(tag(&corpus, "1", "a b"), Err(KegError::InvalidTag(_))));
    assert!(!corpus.tags_path().exists());
}
