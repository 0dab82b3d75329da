//! docstore - revision-gated document store over embedded SQLite
//!
//! Documents are opaque payloads (usually JSON) stored under a primary key
//! with a caller-supplied revision and a fixed set of string/integer index
//! slots that can be filtered on.
//!
//! # Quick Start
//!
//! ```no_run
//! use docstore::{codec, Document, Predicate, QueryParams, Store, Value};
//!
//! let store = Store::new("testdb", "./data")?;
//! store.open()?;
//!
//! let payload: Value = [("n", Value::Int(1)), ("s", Value::from("hello"))]
//!     .into_iter()
//!     .collect();
//! let mut doc = Document::new("data1", 1, codec::encode(&payload)?);
//! doc.set_string_index(0, "h")?;
//! store.put(&[doc])?;
//!
//! let filter = Predicate::equal("pk", "data1");
//! let res = store.get(&[QueryParams::new().with_filter(filter)])?;
//! let decoded = res[0][0].decode()?;
//! assert_eq!(decoded.unwrap()["n"], Value::Int(1));
//!
//! store.close();
//! # Ok::<(), docstore::Error>(())
//! ```
//!
//! # Architecture
//!
//! - `docstore-core`: [`Value`] model and the payload [`codec`]
//! - `docstore-engine`: [`Store`], [`Table`], [`Document`], [`Predicate`],
//!   [`QueryParams`]

pub use docstore_engine::*;
