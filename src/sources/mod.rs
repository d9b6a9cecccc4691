//! Record sources feeding the catalog
//!
//! - Bundled preset works (defaults.rs)
//! - The published manifest, over HTTP or from disk (remote.rs)
//! - The three-way merge that produces the catalog (reconcile.rs)

pub mod defaults;
pub mod reconcile;
pub mod remote;
