//! Table schema and statement text
//!
//! One table per store. Columns:
//!
//! | Column | Type | Notes |
//! |--------|------|-------|
//! | `pk` | TEXT | primary key |
//! | `rev` | INTEGER | revision, gates overwrites |
//! | `data` | TEXT | opaque payload |
//! | `si0..si{K-1}` | TEXT | string index slots |
//! | `ni0..ni{K-1}` | INTEGER | integer index slots |
//!
//! Every index column gets a partial index over its non-null rows. All DDL
//! uses `IF NOT EXISTS`, so creating the schema on every open is harmless.
//! There is no migration path: the shape is fixed by [`MAX_INDEX`].
//!
//! Identifiers cannot be bound as parameters, so the table name is spliced
//! into statement text. It is validated once in [`Schema::new`] and always
//! emitted quoted.

use crate::document::MAX_INDEX;
use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use rusqlite::Connection;

/// Longest accepted store name, in bytes
pub const MAX_NAME_LENGTH: usize = 64;

/// `, si0, ni0, si1, ni1, ...` in column order
static INDEX_COLUMNS: Lazy<String> = Lazy::new(|| {
    (0..MAX_INDEX)
        .map(|slot| format!(", {}, {}", string_column(slot), int_column(slot)))
        .collect()
});

/// `, excluded.si0, excluded.ni0, ...` in column order
static EXCLUDED_INDEX_COLUMNS: Lazy<String> = Lazy::new(|| {
    (0..MAX_INDEX)
        .map(|slot| {
            format!(
                ", excluded.{}, excluded.{}",
                string_column(slot),
                int_column(slot)
            )
        })
        .collect()
});

/// Number of bound values in one document row
pub(crate) const ROW_WIDTH: usize = 3 + MAX_INDEX * 2;

/// Name of the string index column for `slot`
pub fn string_column(slot: usize) -> String {
    format!("si{slot}")
}

/// Name of the integer index column for `slot`
pub fn int_column(slot: usize) -> String {
    format!("ni{slot}")
}

/// Quote an identifier, doubling any embedded `"`.
pub(crate) fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Check that `name` can be used as a store/table name.
pub fn validate_name(name: &str) -> Result<()> {
    let reject = |reason| {
        Err(Error::InvalidName {
            name: name.to_string(),
            reason,
        })
    };

    if name.is_empty() {
        return reject("name is empty");
    }
    if name.len() > MAX_NAME_LENGTH {
        return reject("name is longer than 64 bytes");
    }
    if !name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_') {
        return reject("only ASCII letters, digits and '_' are allowed");
    }
    if name.as_bytes()[0].is_ascii_digit() {
        return reject("name must not start with a digit");
    }
    if name.len() >= 7 && name[..7].eq_ignore_ascii_case("sqlite_") {
        return reject("the sqlite_ prefix is reserved");
    }
    Ok(())
}

/// Generated DDL and statement text for one store table
#[derive(Debug, Clone)]
pub struct Schema {
    table: String,
    create_table: String,
    create_indexes: Vec<String>,
    select_items: String,
    select_by_pk: String,
    select_count: String,
    upsert: String,
    delete: String,
}

impl Schema {
    /// Build the schema for table `name`.
    ///
    /// Fails with [`Error::InvalidName`] if the name is not acceptable.
    pub fn new(name: &str) -> Result<Self> {
        validate_name(name)?;
        let table = quote_ident(name);

        let mut create_table = format!(
            "CREATE TABLE IF NOT EXISTS {table} (pk TEXT NOT NULL PRIMARY KEY, rev INTEGER NOT NULL, data TEXT NOT NULL"
        );
        let mut create_indexes = Vec::with_capacity(MAX_INDEX * 2);
        for slot in 0..MAX_INDEX {
            for (column, ty) in [(string_column(slot), "TEXT"), (int_column(slot), "INTEGER")] {
                create_table.push_str(&format!(", {column} {ty}"));
                let index = quote_ident(&format!("idx_{name}_{column}"));
                create_indexes.push(format!(
                    "CREATE INDEX IF NOT EXISTS {index} ON {table} ({column}) WHERE {column} NOTNULL"
                ));
            }
        }
        create_table.push(')');

        let columns = INDEX_COLUMNS.as_str();
        let placeholders = vec!["?"; ROW_WIDTH].join(", ");
        let upsert = format!(
            "INSERT INTO {table} (pk, rev, data{columns}) VALUES ({placeholders}) \
             ON CONFLICT (pk) DO UPDATE SET (rev, data{columns}) = (excluded.rev, excluded.data{excluded}) \
             WHERE rev < excluded.rev",
            excluded = EXCLUDED_INDEX_COLUMNS.as_str(),
        );

        Ok(Self {
            select_items: format!("SELECT pk, rev, data{columns} FROM {table}"),
            select_by_pk: format!("SELECT pk, rev, data{columns} FROM {table} WHERE pk = ?"),
            select_count: format!("SELECT COUNT(*) FROM {table}"),
            delete: format!("DELETE FROM {table}"),
            table: name.to_string(),
            create_table,
            create_indexes,
            upsert,
        })
    }

    /// Unquoted table name
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Create the table and its partial indexes if they do not exist.
    pub fn create(&self, conn: &Connection) -> Result<()> {
        conn.execute(&self.create_table, [])?;
        for sql in &self.create_indexes {
            conn.execute(sql, [])?;
        }
        Ok(())
    }

    /// `CREATE TABLE` statement
    pub fn create_table_sql(&self) -> &str {
        &self.create_table
    }

    /// `CREATE INDEX` statements, one per index column
    pub fn create_index_sql(&self) -> &[String] {
        &self.create_indexes
    }

    /// Item select without filter/order/limit
    pub fn select_items_sql(&self) -> &str {
        &self.select_items
    }

    /// Item select restricted to one primary key
    pub fn select_by_pk_sql(&self) -> &str {
        &self.select_by_pk
    }

    /// Count select without filter
    pub fn select_count_sql(&self) -> &str {
        &self.select_count
    }

    /// Revision-gated upsert
    pub fn upsert_sql(&self) -> &str {
        &self.upsert
    }

    /// Delete without filter
    pub fn delete_sql(&self) -> &str {
        &self.delete
    }
}
