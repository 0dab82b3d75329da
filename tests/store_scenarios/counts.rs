use crate::open_store;
use docstore::{Document, Predicate, QueryParams};

#[test]
fn test_count_follows_insert_and_delete() {
    let (_temp, store) = open_store("counts");
    let count = || {
        let q = QueryParams::count().with_filter(Predicate::equal("pk", "data1"));
        store.get(&[q]).unwrap()[0][0].count()
    };

    assert_eq!(count(), Some(0));
    store.put(&[Document::new("data1", 1, "{}")]).unwrap();
    assert_eq!(count(), Some(1));
    let filter = Predicate::equal("pk", "data1");
    assert_eq!(store.delete(Some(&filter)).unwrap(), 1);
    assert_eq!(count(), Some(0));
}

#[test]
fn test_delete_without_filter_removes_everything() {
    let (_temp, store) = open_store("counts");
    let docs: Vec<_> = (0..7)
        .map(|i| Document::new(format!("k{i}"), 1, "{}"))
        .collect();
    store.put(&docs).unwrap();

    assert_eq!(store.delete(None).unwrap(), 7);
    assert_eq!(store.get(&[QueryParams::count()]).unwrap()[0][0].count(), Some(0));
    assert_eq!(store.delete(None).unwrap(), 0);
}

#[test]
fn test_delete_by_index_predicate() {
    let (_temp, store) = open_store("counts");
    let docs: Vec<_> = (0..6)
        .map(|i| {
            let mut doc = Document::new(format!("k{i}"), 1, "{}");
            doc.set_string_index(0, if i % 2 == 0 { "even" } else { "odd" })
                .unwrap();
            doc
        })
        .collect();
    store.put(&docs).unwrap();

    let filter = Predicate::equal("si0", "odd").or(Predicate::equal("pk", "k0"));
    assert_eq!(store.delete(Some(&filter)).unwrap(), 4);

    let res = store.get(&[QueryParams::new().with_order_by("pk", true)]).unwrap();
    let pks: Vec<_> = res[0].iter().map(|d| d.pk.as_str()).collect();
    assert_eq!(pks, ["k2", "k4"]);
}
