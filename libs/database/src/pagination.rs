//! Offset pagination shared by every listing endpoint.
//!
//! Count and fetch run as separate statements, so rows inserted or removed in
//! between can make `total` disagree with what the page actually holds.

use serde::Serialize;
use utoipa::ToSchema;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;
/// Largest page size a caller can ask for; larger values are lowered to it.
pub const MAX_LIMIT: u64 = 10_000;
/// SQL drivers bind OFFSET as a signed 64-bit integer.
const MAX_OFFSET: u64 = i64::MAX as u64;

/// Normalised page/limit pair. Page is at least 1, limit is within `1..=MAX_LIMIT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl PageRequest {
    /// Missing values fall back to page 1 / limit 10; zero is raised to 1.
    pub fn new(page: Option<u64>, limit: Option<u64>) -> Self {
        Self {
            page: page.unwrap_or(DEFAULT_PAGE).max(1),
            limit: limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
        }
    }

    /// Rows to skip, capped at `i64::MAX` so absurd pages just come back empty.
    pub fn offset(&self) -> u64 {
        self.page
            .saturating_sub(1)
            .saturating_mul(self.limit)
            .min(MAX_OFFSET)
    }

    /// `ceil(total / limit)`
    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Paged result envelope: `{data, total, page, totalPages}`.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub data: Vec<T>,
    /// Matching rows, ignoring pagination
    pub total: u64,
    pub page: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            data,
            total,
            page: request.page,
            total_pages: request.total_pages(total),
        }
    }
}
