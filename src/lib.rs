//! Neural Canvas: a local-first portfolio gallery.
//!
//! The catalog is merged from three sources (bundled presets, a published
//! manifest and the local SQLite store). Admin edits land in the local store
//! immediately and reach public viewers through an exported manifest.

pub mod config;
pub mod enrich;
pub mod error;
pub mod export;
pub mod media;
pub mod sources;
pub mod state;
