// ========== Core Modules ==========
pub mod record;
pub mod page;

// Export commonly used types
pub use record::{UrlRecord, ShardStats, RECORD_TTL_DAYS};
pub use page::{ListedUrl, Pagination, UrlPage};

/// Shard identifier shared by every layer (0-indexed, contiguous)
pub type ShardId = u32;
