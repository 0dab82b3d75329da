//! Query parameters
//!
//! [`QueryParams`] describes one logical read inside a Get batch: an
//! optional filter and a [`Selection`]. A selection is either a row count or
//! a list of items with ordering and limit. The two are exclusive by
//! construction; switching to count drops any order/limit, and adding an
//! order or limit switches back to items.

use crate::predicate::{where_sql, Predicate};
use crate::schema::quote_ident;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    /// Ascending
    Asc,
    /// Descending
    Desc,
}

/// One `ORDER BY` term
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    /// Column to sort by
    pub field: String,
    /// Direction
    pub order: Order,
}

/// `LIMIT count [OFFSET offset]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limit {
    /// Maximum rows returned
    pub count: u64,
    /// Rows skipped first
    pub offset: Option<u64>,
}

/// What a read returns
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Matching documents
    Items {
        /// Sort terms, applied in order
        order_by: Vec<OrderBy>,
        /// Optional limit
        limit: Option<Limit>,
    },
    /// A single synthetic document whose first integer slot holds the count
    Count,
}

impl Default for Selection {
    fn default() -> Self {
        Selection::Items {
            order_by: Vec::new(),
            limit: None,
        }
    }
}

/// Parameters for one read
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    filter: Option<Predicate>,
    selection: Selection,
}

impl QueryParams {
    /// Item read of every row, unordered and unlimited
    pub fn new() -> Self {
        Self::default()
    }

    /// Count read of every row
    pub fn count() -> Self {
        Self::new().with_count()
    }

    /// Restrict the read to rows matching `filter`
    pub fn with_filter(mut self, filter: Predicate) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Switch to count mode, dropping any order or limit
    pub fn with_count(mut self) -> Self {
        self.selection = Selection::Count;
        self
    }

    /// Limit the number of items returned
    pub fn with_limit(self, count: u64) -> Self {
        self.set_limit(Limit {
            count,
            offset: None,
        })
    }

    /// Limit the number of items returned, skipping `offset` first
    pub fn with_limit_offset(self, count: u64, offset: u64) -> Self {
        self.set_limit(Limit {
            count,
            offset: Some(offset),
        })
    }

    /// Append a sort term
    pub fn with_order_by(mut self, field: impl Into<String>, ascending: bool) -> Self {
        let (mut order_by, limit) = self.take_items();
        order_by.push(OrderBy {
            field: field.into(),
            order: if ascending { Order::Asc } else { Order::Desc },
        });
        self.selection = Selection::Items { order_by, limit };
        self
    }

    fn set_limit(mut self, limit: Limit) -> Self {
        let (order_by, _) = self.take_items();
        self.selection = Selection::Items {
            order_by,
            limit: Some(limit),
        };
        self
    }

    /// Current order/limit, empty when in count mode
    fn take_items(&mut self) -> (Vec<OrderBy>, Option<Limit>) {
        match std::mem::take(&mut self.selection) {
            Selection::Items { order_by, limit } => (order_by, limit),
            Selection::Count => (Vec::new(), None),
        }
    }

    /// Filter, if any
    pub fn filter(&self) -> Option<&Predicate> {
        self.filter.as_ref()
    }

    /// Selection mode
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Check if this is a count read
    pub fn is_count(&self) -> bool {
        self.selection == Selection::Count
    }

    /// ` WHERE ... ORDER BY ... LIMIT ...` appended to an item select
    pub(crate) fn select_tail(&self) -> String {
        let mut sql = where_sql(self.filter());
        if let Selection::Items { order_by, limit } = &self.selection {
            for (i, term) in order_by.iter().enumerate() {
                sql.push_str(if i == 0 { " ORDER BY " } else { ", " });
                sql.push_str(&quote_ident(&term.field));
                sql.push_str(match term.order {
                    Order::Asc => " ASC",
                    Order::Desc => " DESC",
                });
            }
            if let Some(limit) = limit {
                // SQLite reads LIMIT/OFFSET as signed 64-bit.
                let clamp = |n: u64| n.min(i64::MAX as u64);
                sql.push_str(&format!(" LIMIT {}", clamp(limit.count)));
                if let Some(offset) = limit.offset {
                    sql.push_str(&format!(" OFFSET {}", clamp(offset)));
                }
            }
        }
        sql
    }
}
