//! Offset/limit pagination shared by list operations.

use serde::{Deserialize, Serialize};

use domain::{DEFAULT_LIMIT, DEFAULT_SKIP, MAX_LIMIT};

/// Pagination query parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PageParams {
    #[serde(default = "default_skip")]
    pub skip: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_skip() -> u64 {
    DEFAULT_SKIP
}

fn default_limit() -> u64 {
    DEFAULT_LIMIT
}

impl PageParams {
    pub fn new(skip: u64, limit: u64) -> Self {
        Self { skip, limit }
    }

    /// Rows to skip
    pub fn offset(&self) -> u64 {
        self.skip
    }

    /// Rows to return, capped at [`MAX_LIMIT`]
    pub fn limit(&self) -> u64 {
        self.limit.min(MAX_LIMIT)
    }
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            skip: DEFAULT_SKIP,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Paginated response wrapper
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub meta: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationMeta {
    pub skip: u64,
    pub limit: u64,
    pub total: u64,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, params: PageParams, total: u64) -> Self {
        Self {
            data,
            meta: PaginationMeta {
                skip: params.offset(),
                limit: params.limit(),
                total,
            },
        }
    }

    /// Convert every item, keeping the metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            data: self.data.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }

    /// True when rows exist past this page.
    pub fn has_more(&self) -> bool {
        self.meta.skip + (self.data.len() as u64) < self.meta.total
    }
}
