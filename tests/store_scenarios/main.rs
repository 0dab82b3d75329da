//! Store scenario tests
//!
//! End-to-end behavior through the public `docstore` surface:
//! - end_to_end: the insert/update/conflict/get/delete walkthrough
//! - revisions: revision gate properties
//! - batches: batch atomicity and snapshot reads
//! - counts: count reads and delete-by-filter

mod batches;
mod counts;
mod end_to_end;
mod revisions;

use docstore::Store;
use tempfile::TempDir;

/// Install a test-writer subscriber once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing_subscriber::filter::LevelFilter::DEBUG)
        .try_init();
}

/// Open a fresh store in its own temp directory.
pub fn open_store(name: &str) -> (TempDir, Store) {
    init_tracing();
    let temp = TempDir::new().unwrap();
    let store = Store::new(name, temp.path().join("data")).unwrap();
    store.open().unwrap();
    (temp, store)
}
