//! Clamping of pagination arguments.

use crate::pbs;

/// Maximal number of items returned by a single list query.
pub const MAX_RETURNED_ITEMS: u32 = 50;

/// Normalized pagination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub skip: u32,
    pub limit: u32,
}

/// Normalize `skip` and `limit`.
///
/// A negative or absent `skip` becomes `0`.  A `limit` that is absent or
/// outside of `1..=MAX_RETURNED_ITEMS` becomes `MAX_RETURNED_ITEMS`.
pub fn normalize_pagination(skip: Option<i64>, limit: Option<i64>) -> Pagination {
    let skip = match skip {
        Some(skip) if skip >= 0 => u32::try_from(skip).unwrap_or(u32::MAX),
        _ => 0,
    };
    let limit = match limit {
        Some(limit) if (1..=MAX_RETURNED_ITEMS as i64).contains(&limit) => limit as u32,
        _ => MAX_RETURNED_ITEMS,
    };
    Pagination { skip, limit }
}

impl From<Pagination> for pbs::Page {
    fn from(val: Pagination) -> Self {
        pbs::Page {
            skip: val.skip,
            limit: val.limit,
        }
    }
}
