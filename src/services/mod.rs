//! Audit data sources and the fetch cache.

pub mod audit_source;
pub mod cache;

pub use audit_source::{AuditSource, FileSource, SheetSource, source_from_arg};
pub use cache::CachedSource;
