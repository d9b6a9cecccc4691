//! Catalog export
//!
//! Writes the whole catalog (defaults, remote and local works alike) as a
//! manifest file. Publishing that file at the configured manifest location
//! makes local edits visible to public viewers.

use std::path::{Path, PathBuf};

use crate::state::catalog::Catalog;
use crate::state::data::to_manifest;

/// Name of the exported file for a given timestamp
pub fn export_file_name(stamp: i64) -> String {
    format!("portfolio_data_{stamp}.json")
}

/// Serialize the catalog to the manifest format
pub fn snapshot_json(catalog: &Catalog) -> Result<String, serde_json::Error> {
    to_manifest(catalog.works())
}

/// Write a snapshot into `dir`, returning the file path
pub async fn write_snapshot(json: &str, dir: &Path, stamp: i64) -> std::io::Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(export_file_name(stamp));
    tokio::fs::write(&path, json).await?;
    Ok(path)
}
