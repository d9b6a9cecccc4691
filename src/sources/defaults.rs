//! Compiled-in preset works
//!
//! To publish works without a manifest server, export the catalog from
//! admin mode and paste the file into `assets/preset_works.json`.

use crate::state::data::{parse_manifest, WorkRecord};

const PRESET_WORKS_JSON: &str = include_str!("../../assets/preset_works.json");

/// The bundled works. A broken bundle contributes nothing.
pub fn preset_works() -> Vec<WorkRecord> {
    match parse_manifest(PRESET_WORKS_JSON) {
        Ok(works) => works,
        Err(e) => {
            tracing::warn!("Bundled preset works are malformed, ignoring them: {}", e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_bundled_presets_parse() {
        let works = preset_works();
        assert!(!works.is_empty());

        let ids: HashSet<_> = works.iter().map(|w| w.id.as_str()).collect();
        assert_eq!(ids.len(), works.len());
        assert!(works.iter().all(|w| !w.media_url.is_empty()));
    }
}
