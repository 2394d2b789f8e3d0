//! Shared pieces of dynamic list queries

use sqlx::{Postgres, QueryBuilder};

use crate::models::Page;

/// Appends ` WHERE ` before the first predicate and ` AND ` before the rest.
pub(crate) struct Conditions {
    any: bool,
}

impl Conditions {
    pub(crate) fn new() -> Self {
        Self { any: false }
    }

    /// Start the next predicate and hand back the builder to finish it.
    pub(crate) fn next<'q, 'b>(
        &mut self,
        qb: &'b mut QueryBuilder<'q, Postgres>,
    ) -> &'b mut QueryBuilder<'q, Postgres> {
        qb.push(if self.any { " AND " } else { " WHERE " });
        self.any = true;
        qb
    }
}

/// Qualify a comma separated column list with a table alias.
pub(crate) fn qualified(columns: &str, alias: &str) -> String {
    columns
        .split(',')
        .map(|c| format!("{alias}.{}", c.trim()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Push `LIMIT`/`OFFSET` for whichever halves of the page are set.
pub(crate) fn push_page(qb: &mut QueryBuilder<'_, Postgres>, page: Page) {
    if let Some(limit) = page.limit {
        qb.push(" LIMIT ").push_bind(limit);
    }
    if let Some(offset) = page.offset {
        qb.push(" OFFSET ").push_bind(offset);
    }
}
