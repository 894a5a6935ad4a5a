//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};

/// Maximum number of rows a single list call may return.
pub const MAX_LIMIT: u64 = 100;

fn default_limit() -> u64 {
    50
}

/// Limit/offset window for list queries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ListRange {
    /// Maximum number of items to return.
    #[serde(default = "default_limit")]
    pub limit: u64,
    /// Number of items to skip.
    #[serde(default)]
    pub offset: u64,
}

impl Default for ListRange {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            offset: 0,
        }
    }
}

impl ListRange {
    /// Returns the limit clamped to [`MAX_LIMIT`].
    #[must_use]
    pub fn clamped_limit(&self) -> u64 {
        self.limit.clamp(1, MAX_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_range() {
        let range = ListRange::default();
        assert_eq!(range.limit, 50);
        assert_eq!(range.offset, 0);
    }

    #[test]
    fn test_limit_clamped() {
        let range = ListRange {
            limit: 10_000,
            offset: 0,
        };
        assert_eq!(range.clamped_limit(), MAX_LIMIT);

        let range = ListRange {
            limit: 0,
            offset: 0,
        };
        assert_eq!(range.clamped_limit(), 1);
    }
}
