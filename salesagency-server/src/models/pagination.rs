//! Limit/offset pagination for list queries

use super::ValidationError;

/// Pagination parameters.
///
/// Both halves are optional and independent: a missing limit returns every
/// row after the offset, a missing offset starts at the first row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Page {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl Page {
    /// Build a page from raw GraphQL arguments, rejecting negative values.
    pub fn new(limit: Option<i32>, offset: Option<i32>) -> Result<Self, ValidationError> {
        if limit.is_some_and(|l| l < 0) {
            return Err(ValidationError::Negative { field: "limit" });
        }
        if offset.is_some_and(|o| o < 0) {
            return Err(ValidationError::Negative { field: "offset" });
        }
        Ok(Self {
            limit: limit.map(i64::from),
            offset: offset.map(i64::from),
        })
    }

    /// No limit, no offset.
    pub fn all() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_optional() {
        let p = Page::new(None, None).unwrap();
        assert_eq!(p, Page::all());

        let p = Page::new(Some(2), None).unwrap();
        assert_eq!(p.limit, Some(2));
        assert_eq!(p.offset, None);

        let p = Page::new(None, Some(4)).unwrap();
        assert_eq!(p.limit, None);
        assert_eq!(p.offset, Some(4));
    }

    #[test]
    fn rejects_negative() {
        assert_eq!(
            Page::new(Some(-1), None).unwrap_err(),
            ValidationError::Negative { field: "limit" }
        );
        assert_eq!(
            Page::new(Some(10), Some(-5)).unwrap_err(),
            ValidationError::Negative { field: "offset" }
        );
    }

    #[test]
    fn zero_limit_is_allowed() {
        assert_eq!(Page::new(Some(0), Some(0)).unwrap().limit, Some(0));
    }
}
