//! Environment-driven configuration.
//!
//! | Variable                 | Default                          | Description                          |
//! |--------------------------|----------------------------------|--------------------------------------|
//! | `GALLERY_DATA_DIR`       | `<data dir>/neural-canvas`       | Directory holding `gallery.db`       |
//! | `GALLERY_MANIFEST_URL`   | --                               | Published manifest (URL or path)     |
//! | `GALLERY_ADMIN_PASSWORD` | `admin`                          | Shared secret for admin mode         |
//! | `GEMINI_API_KEY`         | --                               | Enables description polish/insights  |
//! | `GALLERY_ENRICH_MODEL`   | [`DEFAULT_MODEL`]                | Model used for enrichment            |

use std::path::PathBuf;

use crate::enrich::{GeminiEnricher, NoopEnricher, TextEnricher, DEFAULT_MODEL};

/// Shared secret used when none is configured.
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin";

/// Application directory name under the platform data dir.
const APP_DIR: &str = "neural-canvas";

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub manifest_location: Option<String>,
    pub admin_password: String,
    pub enrich_api_key: Option<String>,
    pub enrich_model: String,
}

impl Config {
    /// Load from the process environment (after `.env`, if present).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let data_dir = var("GALLERY_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);

        Self {
            data_dir,
            manifest_location: var("GALLERY_MANIFEST_URL"),
            admin_password: var("GALLERY_ADMIN_PASSWORD")
                .unwrap_or_else(|| DEFAULT_ADMIN_PASSWORD.to_string()),
            enrich_api_key: var("GEMINI_API_KEY"),
            enrich_model: var("GALLERY_ENRICH_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        }
    }

    /// The enricher this configuration enables.
    pub fn enricher(&self) -> Box<dyn TextEnricher> {
        match &self.enrich_api_key {
            Some(key) => Box::new(GeminiEnricher::new(key.clone(), self.enrich_model.clone())),
            None => Box::new(NoopEnricher),
        }
    }
}

/// Platform data directory, falling back to the home directory and then
/// the working directory:
/// - Linux: ~/.local/share/neural-canvas
/// - macOS: ~/Library/Application Support/neural-canvas
/// - Windows: %APPDATA%\neural-canvas
fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}
