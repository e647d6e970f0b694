//! The paginated response envelope.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub total: usize,
    pub page: usize,
    pub limit: usize,
    #[serde(rename = "totalPages")]
    pub total_pages: usize,
    #[serde(rename = "hasNextPage")]
    pub has_next_page: bool,
    #[serde(rename = "hasPrevPage")]
    pub has_prev_page: bool,
}

/// One page of results plus pagination metadata.
///
/// Invariants: `total_pages = ceil(total / limit)`,
/// `has_next_page = page < total_pages`, `has_prev_page = page > 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

impl<T> Page<T> {
    /// Assemble the envelope. `limit` is already validated to be >= 1.
    pub fn new(data: Vec<T>, total: usize, page: usize, limit: usize) -> Self {
        let total_pages = total.div_ceil(limit);
        Self {
            data,
            meta: PageMeta {
                total,
                page,
                limit,
                total_pages,
                has_next_page: page < total_pages,
                has_prev_page: page > 1,
            },
        }
    }
}
