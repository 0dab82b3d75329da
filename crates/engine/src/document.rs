//! Document record
//!
//! A [`Document`] is one table row: primary key, revision, opaque payload
//! and [`MAX_INDEX`] string/integer index slots the caller extracts from the
//! payload so they can be filtered on.
//!
//! Documents are plain values. Every Get returns fresh copies and a Put
//! only borrows its input.

use crate::error::{Error, Result};
use crate::schema::ROW_WIDTH;
use docstore_core::{codec, Map};
use rusqlite::{Row, ToSql};

/// Number of string and of integer index slots per document
pub const MAX_INDEX: usize = 5;

/// One stored row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    /// Primary key (non-empty)
    pub pk: String,
    /// Revision; a write must carry a strictly greater one to overwrite
    pub rev: i64,
    /// Payload, usually JSON produced by [`codec::encode`]
    pub data: String,
    /// String index slots (`si0..`)
    pub string_index: [Option<String>; MAX_INDEX],
    /// Integer index slots (`ni0..`)
    pub int_index: [Option<i64>; MAX_INDEX],
}

impl Document {
    /// Create a document with all index slots empty
    pub fn new(pk: impl Into<String>, rev: i64, data: impl Into<String>) -> Self {
        Self {
            pk: pk.into(),
            rev,
            data: data.into(),
            ..Self::default()
        }
    }

    /// Synthetic row returned by a count query
    pub(crate) fn with_count(count: i64) -> Self {
        let mut doc = Self::default();
        doc.int_index[0] = Some(count);
        doc
    }

    /// Set string index slot `slot`
    pub fn set_string_index(&mut self, slot: usize, value: impl Into<String>) -> Result<()> {
        *slot_mut(&mut self.string_index, slot)? = Some(value.into());
        Ok(())
    }

    /// Set integer index slot `slot`
    pub fn set_int_index(&mut self, slot: usize, value: i64) -> Result<()> {
        *slot_mut(&mut self.int_index, slot)? = Some(value);
        Ok(())
    }

    /// String index slot `slot`, if set
    pub fn string_index(&self, slot: usize) -> Option<&str> {
        self.string_index.get(slot)?.as_deref()
    }

    /// Integer index slot `slot`, if set
    pub fn int_index(&self, slot: usize) -> Option<i64> {
        *self.int_index.get(slot)?
    }

    /// Row count carried by a count-query result
    pub fn count(&self) -> Option<i64> {
        self.int_index[0]
    }

    /// Decode the payload as a JSON object with normalized numbers.
    ///
    /// An empty payload decodes to `None`.
    pub fn decode(&self) -> Result<Option<Map>> {
        if self.data.is_empty() {
            return Ok(None);
        }
        Ok(Some(codec::decode(&self.data)?))
    }

    /// Read a row laid out as `pk, rev, data, si0, ni0, si1, ni1, ...`
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let mut doc = Self {
            pk: row.get(0)?,
            rev: row.get(1)?,
            data: row.get(2)?,
            ..Self::default()
        };
        let slots = doc.string_index.iter_mut().zip(doc.int_index.iter_mut());
        for (slot, (si, ni)) in slots.enumerate() {
            *si = row.get(3 + slot * 2)?;
            *ni = row.get(4 + slot * 2)?;
        }
        Ok(doc)
    }

    /// Values bound to the upsert statement, in column order
    pub(crate) fn bind_values(&self) -> Vec<&dyn ToSql> {
        let mut values: Vec<&dyn ToSql> = Vec::with_capacity(ROW_WIDTH);
        values.push(&self.pk);
        values.push(&self.rev);
        values.push(&self.data);
        for (si, ni) in self.string_index.iter().zip(self.int_index.iter()) {
            values.push(si);
            values.push(ni);
        }
        values
    }
}

fn slot_mut<T>(slots: &mut [Option<T>; MAX_INDEX], slot: usize) -> Result<&mut Option<T>> {
    slots.get_mut(slot).ok_or_else(|| Error::InvalidDocument {
        reason: format!("index slot {slot} out of range (max {MAX_INDEX})"),
    })
}
