use crate::open_store;
use docstore::{Document, Error, Predicate, QueryParams};

fn stored(store: &docstore::Store, pk: &str) -> Option<Document> {
    let q = QueryParams::new().with_filter(Predicate::equal("pk", pk));
    store.get(&[q]).unwrap().remove(0).pop()
}

#[test]
fn test_non_increasing_revision_never_changes_row() {
    let (_temp, store) = open_store("revs");
    let mut winner = Document::new("k", 10, "winner");
    winner.set_string_index(1, "kept").unwrap();
    winner.set_int_index(2, 42).unwrap();
    store.put(&[winner.clone()]).unwrap();

    for rev in [10, 9, 1, 0, i64::MIN] {
        let mut loser = Document::new("k", rev, "loser");
        loser.set_string_index(1, "lost").unwrap();
        let err = store.put(&[loser]).unwrap_err();
        assert_eq!(err.conflicting_document(), Some(&winner));
        assert_eq!(stored(&store, "k"), Some(winner.clone()));
    }
}

#[test]
fn test_increasing_revisions_keep_only_latest() {
    let (_temp, store) = open_store("revs");
    let mut last = None;
    for rev in 1..=3 {
        let mut doc = Document::new("k", rev, format!("v{rev}"));
        doc.set_int_index(0, rev).unwrap();
        if rev == 1 {
            doc.set_string_index(4, "only-first").unwrap();
        }
        store.put(&[doc.clone()]).unwrap();
        last = Some(doc);
    }
    assert_eq!(stored(&store, "k"), last);

    let count = QueryParams::count().with_filter(Predicate::equal("pk", "k"));
    assert_eq!(store.get(&[count]).unwrap()[0][0].count(), Some(1));
}

#[test]
fn test_caller_can_reconcile_and_retry() {
    let (_temp, store) = open_store("revs");
    store.put(&[Document::new("k", 3, "theirs")]).unwrap();

    let mine = Document::new("k", 1, "mine");
    let retry = match store.put(&[mine.clone()]) {
        Err(Error::DocumentConflict(current)) => Document {
            rev: current.rev + 1,
            ..mine
        },
        other => panic!("expected document conflict, got {other:?}"),
    };
    store.put(&[retry]).unwrap();

    let doc = stored(&store, "k").unwrap();
    assert_eq!((doc.rev, doc.data.as_str()), (4, "mine"));
}
