//! Movie catalog fetch library for moviefetch.
//!
//! Fetches the category listing and movie detail payloads off the calling
//! thread and delivers the decoded result back on the caller's event loop.

/// Catalog domain types and JSON decoders.
pub mod catalog;

/// One-shot fetch tasks and caller-side delivery.
pub mod fetch;
