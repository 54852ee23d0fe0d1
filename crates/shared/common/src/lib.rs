//! Common utilities shared across services.
//!
//! This crate provides:
//! - Unified error handling with HTTP conversion
//! - Configuration structures
//! - Offset/limit pagination types
//! - A validating JSON extractor for request payloads

pub mod config;
pub mod error;
pub mod extract;
pub mod pagination;

pub use config::*;
pub use error::{AppError, AppResult, OptionExt};
pub use extract::ValidatedJson;
pub use pagination::{PageParams, Paginated, PaginationMeta};
