//! Pagination parameters.

use serde::{Deserialize, Serialize};

/// Upper bound for `limit`; keeps a single page from materializing the whole table.
pub const MAX_LIMIT: u32 = 100;

/// Pagination parameters for list endpoints.
///
/// - `limit`: 1–100, default 20
/// - `page`: ≥ 1, default 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    20
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
        }
    }
}

impl PageRequest {
    /// Clamp `limit` to 1–100 and `page` to ≥ 1.
    ///
    /// Call after deserializing from query params to enforce bounds.
    pub fn clamped(self) -> Self {
        Self {
            page: self.page.max(1),
            limit: self.limit.clamp(1, MAX_LIMIT),
        }
    }

    /// Number of items to skip. Assumes `self` is clamped.
    pub fn offset(self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }

    /// `ceil(total / limit)`; zero when there is nothing to show.
    pub fn total_pages(self, total: u64) -> u64 {
        total.div_ceil(self.limit.max(1) as u64)
    }
}
