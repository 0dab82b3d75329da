//! Store handle and open/close logic
//!
//! ## Lifecycle
//!
//! ```text
//! Unopened --open()--> Open --close()--> Closed
//! ```
//!
//! - `open()` creates the data directory, opens the single connection,
//!   creates the schema and runs a one-row read to fail fast. On failure the
//!   connection is dropped and the store stays `Unopened`.
//! - `close()` runs VACUUM (best-effort), releases the connection and moves
//!   to `Closed`. Dropping an open store closes it.
//! - Get/Put/Delete outside `Open` fail with [`Error::NotOpen`].
//!
//! ## Batches
//!
//! | Operation | 1 item | N > 1 items |
//! |-----------|--------|-------------|
//! | Get | direct | read transaction, always rolled back |
//! | Put | direct | write transaction, committed only if every put succeeds |
//!
//! The connection lives behind a mutex, so calls on one store are
//! serialized and the store can be shared between threads.

use crate::config::StoreConfig;
use crate::document::Document;
use crate::error::{Error, Result};
use crate::predicate::Predicate;
use crate::query::QueryParams;
use crate::table::Table;
use parking_lot::Mutex;
use rusqlite::{Connection, TransactionBehavior};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

enum State {
    Unopened,
    Open(Connection),
    Closed,
}

impl State {
    fn connection(&mut self) -> Result<&mut Connection> {
        match self {
            State::Open(conn) => Ok(conn),
            State::Unopened | State::Closed => Err(Error::NotOpen),
        }
    }
}

/// A named document store backed by one SQLite file
///
/// # Example
///
/// ```no_run
/// use docstore_engine::{Document, Predicate, QueryParams, Store};
///
/// let store = Store::new("testdb", "./data")?;
/// store.open()?;
///
/// store.put(&[Document::new("data1", 1, r#"{"n":1}"#)])?;
/// let res = store.get(&[QueryParams::new().with_filter(Predicate::equal("pk", "data1"))])?;
/// assert_eq!(res[0].len(), 1);
///
/// store.close();
/// # Ok::<(), docstore_engine::Error>(())
/// ```
pub struct Store {
    config: StoreConfig,
    table: Table,
    state: Mutex<State>,
}

impl Store {
    /// Store `name` in `data_dir` with default settings
    pub fn new(name: impl Into<String>, data_dir: impl Into<PathBuf>) -> Result<Self> {
        Self::with_config(StoreConfig::new(name, data_dir))
    }

    /// Store described by `config`
    ///
    /// Validates the name; nothing touches the filesystem until `open()`.
    pub fn with_config(config: StoreConfig) -> Result<Self> {
        let table = Table::new(&config.name)?;
        Ok(Self {
            config,
            table,
            state: Mutex::new(State::Unopened),
        })
    }

    /// Store name
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Path of the database file
    pub fn path(&self) -> PathBuf {
        self.config.db_path()
    }

    /// Settings this store was built with
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Check if the store is open
    pub fn is_open(&self) -> bool {
        matches!(*self.state.lock(), State::Open(_))
    }

    /// Open the backing file and make sure the schema exists.
    pub fn open(&self) -> Result<()> {
        let mut state = self.state.lock();
        match *state {
            State::Unopened => {}
            State::Open(_) => return Err(Error::AlreadyOpen),
            State::Closed => return Err(Error::Closed),
        }

        create_data_dir(&self.config.data_dir, self.config.dir_mode)?;
        let path = self.config.db_path();
        let conn = Connection::open(&path)?;
        conn.busy_timeout(Duration::from_millis(self.config.busy_timeout_ms))?;
        self.table.create(&conn)?;

        let probe = QueryParams::new().with_limit(1);
        self.table
            .get(&conn, &[probe])
            .map_err(|e| Error::OpenCheck(Box::new(e)))?;

        info!(target: "docstore::store", path = ?path, table = self.name(), "Store opened");
        *state = State::Open(conn);
        Ok(())
    }

    /// Compact and release the connection.
    ///
    /// Failures are logged, not returned. Calling this more than once is a
    /// no-op.
    pub fn close(&self) {
        let previous = std::mem::replace(&mut *self.state.lock(), State::Closed);
        let State::Open(conn) = previous else {
            return;
        };

        if self.config.vacuum_on_close {
            if let Err(e) = conn.execute_batch("VACUUM") {
                warn!(target: "docstore::store", table = self.name(), error = %e, "Vacuum failed");
            }
        }
        if let Err((_, e)) = conn.close() {
            warn!(target: "docstore::store", table = self.name(), error = %e, "Connection close failed");
        }
        info!(target: "docstore::store", table = self.name(), "Store closed");
    }

    /// Run a batch of reads, returning one result list per entry.
    ///
    /// More than one read runs inside a single read transaction so all of
    /// them see the same snapshot.
    pub fn get(&self, params: &[QueryParams]) -> Result<Vec<Vec<Document>>> {
        let mut state = self.state.lock();
        let conn = state.connection()?;
        match params.len() {
            0 => Err(Error::EmptyBatch),
            1 => {
                debug!(target: "docstore::store", op = "get", batch = 1, tx = false, "Direct read");
                self.table.get(conn, params)
            }
            n => {
                debug!(target: "docstore::store", op = "get", batch = n, tx = true, "Batched read in transaction");
                let tx = conn.transaction_with_behavior(TransactionBehavior::Deferred)?;
                let result = self.table.get(&tx, params);
                if let Err(e) = tx.rollback() {
                    warn!(target: "docstore::store", error = %e, "Read transaction rollback failed");
                }
                result
            }
        }
    }

    /// Write a batch of documents through the revision gate.
    ///
    /// More than one document is all-or-nothing: the first failure rolls
    /// back every write in the batch and is returned.
    pub fn put(&self, docs: &[Document]) -> Result<()> {
        let mut state = self.state.lock();
        let conn = state.connection()?;
        match docs.len() {
            0 => Err(Error::EmptyBatch),
            1 => {
                debug!(target: "docstore::store", op = "put", batch = 1, tx = false, "Direct write");
                self.table.put(conn, docs)
            }
            n => {
                debug!(target: "docstore::store", op = "put", batch = n, tx = true, "Batched write in transaction");
                let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
                match self.table.put(&tx, docs) {
                    Ok(()) => Ok(tx.commit()?),
                    Err(e) => {
                        if let Err(rollback) = tx.rollback() {
                            warn!(target: "docstore::store", error = %rollback, "Write transaction rollback failed");
                        }
                        Err(e)
                    }
                }
            }
        }
    }

    /// Delete rows matching `filter`; `None` deletes every row.
    ///
    /// Returns the number of rows removed.
    pub fn delete(&self, filter: Option<&Predicate>) -> Result<usize> {
        let mut state = self.state.lock();
        let conn = state.connection()?;
        let removed = self.table.delete(conn, filter)?;
        debug!(target: "docstore::store", op = "delete", removed, "Delete complete");
        Ok(removed)
    }
}

impl Drop for Store {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("name", &self.config.name)
            .field("path", &self.config.db_path())
            .field("open", &self.is_open())
            .finish()
    }
}

#[cfg(unix)]
fn create_data_dir(dir: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    std::fs::DirBuilder::new()
        .recursive(true)
        .mode(mode)
        .create(dir)?;
    Ok(())
}

#[cfg(not(unix))]
fn create_data_dir(dir: &Path, _mode: u32) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    Ok(())
}
