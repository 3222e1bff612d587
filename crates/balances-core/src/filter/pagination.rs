//! Page arithmetic for LIMIT/OFFSET queries.

use serde::{Deserialize, Serialize};

use crate::error::{BalancesError, Result};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// A 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    pub fn new(page: u32, page_size: u32) -> Result<Self> {
        if page < 1 {
            return Err(BalancesError::bad_request("page must be at least 1"));
        }
        if page_size < 1 {
            return Err(BalancesError::bad_request("page size must be at least 1"));
        }
        Ok(Self { page, page_size })
    }

    /// Single page wide enough to hold every row.
    pub fn unbounded() -> Self {
        Self {
            page: 1,
            page_size: u32::MAX,
        }
    }

    pub fn limit(&self) -> u64 {
        u64::from(self.page_size)
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
    }

    /// Number of pages needed for `total_count` rows.
    pub fn page_count(&self, total_count: u64) -> u64 {
        if self.page_size == 0 {
            return 0;
        }
        total_count.div_ceil(u64::from(self.page_size))
    }

    pub fn page_info(&self, total_count: u64) -> PageInfo {
        PageInfo {
            page: self.page,
            page_size: self.page_size,
            total_count,
            page_count: self.page_count(total_count),
        }
    }
}

/// Paging metadata returned next to a result page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub page: u32,
    pub page_size: u32,
    pub total_count: u64,
    pub page_count: u64,
}
