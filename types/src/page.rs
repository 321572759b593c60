//! Listing page types
//!
//! A `UrlPage` is what the listing operation returns and what the cache
//! stores as a snapshot, so it must round-trip through JSON unchanged.

use serde::{Deserialize, Serialize};

use crate::record::UrlRecord;

/// A record as presented in a listing, with its fully-qualified short URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListedUrl {
    #[serde(flatten)]
    pub record: UrlRecord,
    pub short_url: String,
}

/// Pagination metadata, computed over the merged result of every shard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u64,
}

impl Pagination {
    /// Build pagination metadata; `limit` must be non-zero
    pub fn new(page: u32, limit: u32, total: u64) -> Self {
        let limit_wide = u64::from(limit.max(1));
        Self {
            page,
            limit,
            total,
            total_pages: total.div_ceil(limit_wide),
        }
    }
}

/// One page of the global listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlPage {
    pub urls: Vec<ListedUrl>,
    pub pagination: Pagination,
}
