//! State management module
//!
//! This module handles all application state, including:
//! - The record model and manifest format (data.rs)
//! - Storage seams and the SQLite work store (store.rs, library.rs)
//! - The sorted in-memory catalog (catalog.rs)
//! - Public/admin session mode (session.rs)
//! - The application state value driving every user action (gallery.rs)

pub mod catalog;
pub mod data;
pub mod gallery;
pub mod library;
pub mod session;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

/// Current time in milliseconds since the Unix epoch
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
