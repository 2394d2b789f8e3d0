//! Field-level merge helpers for partial updates
//!
//! Update inputs carry `Option<T>` for required columns (absent keeps the
//! stored value) and `MaybeUndefined<T>` for nullable ones, where an explicit
//! `null` clears the column and an omitted field leaves it alone.

use async_graphql::MaybeUndefined;

/// Overwrite `slot` when a value was provided.
pub fn set<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

/// Apply a tri-state patch to a nullable field.
pub fn set_nullable<T>(slot: &mut Option<T>, patch: MaybeUndefined<T>) {
    match patch {
        MaybeUndefined::Undefined => {}
        MaybeUndefined::Null => *slot = None,
        MaybeUndefined::Value(value) => *slot = Some(value),
    }
}
