use crate::open_store;
use docstore::{codec, Document, Error, Predicate, QueryParams, Value};

fn payload(n: i64, f: f64, s: &str) -> String {
    let value: Value = [("n", Value::Int(n)), ("f", Value::Float(f)), ("s", Value::from(s))]
        .into_iter()
        .collect();
    codec::encode(&value).unwrap()
}

#[test]
fn test_walkthrough() {
    let (_temp, store) = open_store("testdb");

    // Insert
    let mut doc = Document::new("data1", 1, payload(1, 2.3, "hello"));
    doc.set_string_index(0, "h").unwrap();
    doc.set_int_index(0, 1).unwrap();
    store.put(&[doc.clone()]).unwrap();

    // Update
    doc.rev += 1;
    doc.data = payload(2, 3.4, "world");
    doc.set_string_index(0, "w").unwrap();
    doc.set_int_index(0, 1).unwrap();
    store.put(&[doc.clone()]).unwrap();

    // Same revision again is rejected with the stored row
    match store.put(&[doc.clone()]) {
        Err(Error::DocumentConflict(current)) => {
            assert_eq!(current.rev, 2);
            let data = current.decode().unwrap().unwrap();
            assert_eq!(data["n"], Value::Int(2));
            assert_eq!(data["f"], Value::Float(3.4));
            assert_eq!(data["s"], Value::from("world"));
        }
        other => panic!("expected document conflict, got {other:?}"),
    }

    // Count
    let count = QueryParams::new()
        .with_filter(Predicate::equal("pk", "data1"))
        .with_count();
    let res = store.get(&[count]).unwrap();
    assert_eq!(res.len(), 1);
    assert_eq!(res[0].len(), 1);
    assert_eq!(res[0][0].count(), Some(1));

    // Get
    let res = store
        .get(&[QueryParams::new().with_filter(Predicate::equal("pk", "data1"))])
        .unwrap();
    assert_eq!(res.len(), 1);
    assert_eq!(res[0].len(), 1);
    let data = res[0][0].decode().unwrap().unwrap();
    assert_eq!(data["n"].as_int(), Some(2));
    assert_eq!(data["f"].as_float(), Some(3.4));
    assert_eq!(data["s"].as_str(), Some("world"));
    assert_eq!(res[0][0].string_index(0), Some("w"));

    // Delete
    let filter = Predicate::equal("pk", "data2");
    assert_eq!(store.delete(Some(&filter)).unwrap(), 0);
    assert_eq!(store.delete(None).unwrap(), 1);

    store.close();
}

#[test]
fn test_nested_payload_round_trip() {
    let (_temp, store) = open_store("nested");
    let text = r#"{"a":{"b":[1,2.5,{"c":3}]},"d":[[4]]}"#;
    store.put(&[Document::new("k", 1, text)]).unwrap();

    let res = store.get(&[QueryParams::new()]).unwrap();
    let data = res[0][0].decode().unwrap().unwrap();
    let b = data["a"].get("b").and_then(Value::as_array).unwrap();
    assert_eq!(b[0], Value::Int(1));
    assert_eq!(b[1], Value::Float(2.5));
    assert_eq!(b[2].get("c"), Some(&Value::Int(3)));
    assert_eq!(data["d"], Value::Array(vec![Value::Array(vec![Value::Int(4)])]));
}
