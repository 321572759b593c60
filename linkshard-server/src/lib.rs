//! linkshard Server - sharded URL shortening service
//!
//! The server is responsible for:
//! - Creating short codes and storing them in their home shard
//! - Resolving short codes through the cache and a single shard
//! - Listing every mapping across all shards with pagination
//! - Re-homing existing records into shards

pub mod error;
pub mod http;
pub mod migrate;
pub mod service;

pub use error::{ServiceError, ServiceResult};
pub use http::{cors_layer, router};
pub use migrate::{migrate_records, MigrationReport};
pub use service::{CreatedUrl, UrlMappingService, MAX_CODE_ATTEMPTS};
