//! Table engine
//!
//! Batched get/put/delete against one store table. Every operation takes a
//! `&Connection`; a `rusqlite::Transaction` dereferences to one, so the same
//! code runs directly on the store connection or inside a transaction opened
//! by the caller. Choosing between the two is [`Store`](crate::Store)'s job.
//!
//! ## Revision Gate
//!
//! Put is an upsert whose update branch only fires when the incoming
//! revision is strictly greater than the stored one. When the statement
//! changes no rows the current row is re-read by primary key and returned
//! inside [`Error::DocumentConflict`]. If that re-read finds nothing the
//! write fails with [`Error::GetConflicted`].

use crate::document::Document;
use crate::error::{Error, Result};
use crate::predicate::{bind_params, where_sql, Predicate};
use crate::query::QueryParams;
use crate::schema::Schema;
use rusqlite::{params_from_iter, Connection, OptionalExtension};
use tracing::debug;

/// Get/put/delete for one store table
#[derive(Debug, Clone)]
pub struct Table {
    schema: Schema,
}

impl Table {
    /// Table engine for store `name`
    pub fn new(name: &str) -> Result<Self> {
        Ok(Self {
            schema: Schema::new(name)?,
        })
    }

    /// Schema backing this table
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Create the table and indexes if absent
    pub fn create(&self, conn: &Connection) -> Result<()> {
        self.schema.create(conn)
    }

    /// Run each read in `params`, returning one result list per entry.
    ///
    /// A count read yields a single document whose first integer slot is
    /// the count. Stops at the first failing read.
    pub fn get(&self, conn: &Connection, params: &[QueryParams]) -> Result<Vec<Vec<Document>>> {
        if params.is_empty() {
            return Err(Error::EmptyBatch);
        }
        params
            .iter()
            .map(|param| {
                if param.is_count() {
                    self.get_count(conn, param.filter())
                } else {
                    self.get_items(conn, param)
                }
            })
            .collect()
    }

    fn get_items(&self, conn: &Connection, param: &QueryParams) -> Result<Vec<Document>> {
        let sql = format!("{}{}", self.schema.select_items_sql(), param.select_tail());
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(bind_params(param.filter())), |row| {
            Document::from_row(row)
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn get_count(&self, conn: &Connection, filter: Option<&Predicate>) -> Result<Vec<Document>> {
        let sql = format!("{}{}", self.schema.select_count_sql(), where_sql(filter));
        let count: i64 =
            conn.query_row(&sql, params_from_iter(bind_params(filter)), |row| row.get(0))?;
        Ok(vec![Document::with_count(count)])
    }

    /// Upsert each document through the revision gate.
    ///
    /// Stops at the first failure; earlier writes in the same call are only
    /// undone if `conn` is a transaction the caller rolls back.
    pub fn put(&self, conn: &Connection, docs: &[Document]) -> Result<()> {
        if docs.is_empty() {
            return Err(Error::EmptyBatch);
        }
        let mut stmt = conn.prepare_cached(self.schema.upsert_sql())?;
        for doc in docs {
            if doc.pk.is_empty() {
                return Err(Error::InvalidDocument {
                    reason: "primary key is empty".to_string(),
                });
            }

            let changed = stmt.execute(doc.bind_values().as_slice())?;
            if changed == 0 {
                return Err(self.conflict(conn, doc)?);
            }
        }
        Ok(())
    }

    /// Build the error for a write the revision gate rejected
    fn conflict(&self, conn: &Connection, rejected: &Document) -> Result<Error> {
        let current = conn
            .query_row(
                self.schema.select_by_pk_sql(),
                [&rejected.pk],
                Document::from_row,
            )
            .optional()?;

        Ok(match current {
            Some(current) => {
                debug!(
                    target: "docstore::table",
                    table = self.schema.table(),
                    pk = %rejected.pk,
                    incoming_rev = rejected.rev,
                    stored_rev = current.rev,
                    "Write rejected by revision gate"
                );
                Error::DocumentConflict(Box::new(current))
            }
            None => Error::GetConflicted {
                pk: rejected.pk.clone(),
            },
        })
    }

    /// Delete rows matching `filter`, or every row for `None`.
    ///
    /// Returns the number of rows removed.
    pub fn delete(&self, conn: &Connection, filter: Option<&Predicate>) -> Result<usize> {
        let sql = format!("{}{}", self.schema.delete_sql(), where_sql(filter));
        Ok(conn.execute(&sql, params_from_iter(bind_params(filter)))?)
    }
}
