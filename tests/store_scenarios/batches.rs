use crate::open_store;
use docstore::{Document, Error, Predicate, QueryParams};

fn docs(prefix: &str, n: i64) -> Vec<Document> {
    (0..n)
        .map(|i| {
            let mut doc = Document::new(format!("{prefix}{i}"), 1, "{}");
            doc.set_int_index(0, i).unwrap();
            doc
        })
        .collect()
}

fn total(store: &docstore::Store) -> Option<i64> {
    store.get(&[QueryParams::count()]).unwrap()[0][0].count()
}

#[test]
fn test_batch_put_all_or_nothing() {
    let (_temp, store) = open_store("batches");
    store.put(&[Document::new("b2", 7, "{}")]).unwrap();

    // Item 3 of 5 collides with a newer stored revision.
    let batch = docs("b", 5);
    let err = store.put(&batch).unwrap_err();
    assert!(err.is_conflict());

    assert_eq!(total(&store), Some(1));
    let res = store
        .get(&[QueryParams::new().with_filter(Predicate::equal("pk", "b2"))])
        .unwrap();
    assert_eq!(res[0][0].rev, 7);
}

#[test]
fn test_batch_put_invalid_item_rolls_back() {
    let (_temp, store) = open_store("batches");
    let mut batch = docs("ok", 3);
    batch.push(Document::new("", 1, "{}"));

    assert!(matches!(
        store.put(&batch),
        Err(Error::InvalidDocument { .. })
    ));
    assert_eq!(total(&store), Some(0));
}

#[test]
fn test_batch_put_success() {
    let (_temp, store) = open_store("batches");
    store.put(&docs("d", 10)).unwrap();
    assert_eq!(total(&store), Some(10));
}

#[test]
fn test_batch_get_returns_one_list_per_param() {
    let (_temp, store) = open_store("batches");
    store.put(&docs("d", 10)).unwrap();

    let res = store
        .get(&[
            QueryParams::new()
                .with_filter(Predicate::less("ni0", 3))
                .with_order_by("ni0", true),
            QueryParams::count().with_filter(Predicate::greater_equal("ni0", 5)),
            QueryParams::new().with_filter(Predicate::equal("pk", "missing")),
            QueryParams::new().with_order_by("ni0", false).with_limit(1),
        ])
        .unwrap();

    assert_eq!(res.len(), 4);
    let pks: Vec<_> = res[0].iter().map(|d| d.pk.as_str()).collect();
    assert_eq!(pks, ["d0", "d1", "d2"]);
    assert_eq!(res[1][0].count(), Some(5));
    assert!(res[2].is_empty());
    assert_eq!(res[3][0].pk, "d9");
}
