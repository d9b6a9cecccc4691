//! Shared data structures for the application state
//!
//! These structs represent the data model that flows between
//! the store, the remote manifest, the catalog and the shell.

use serde::{Deserialize, Serialize};

/// Prefix that marks a `media_url` as an inline, self-contained payload
pub const INLINE_MEDIA_PREFIX: &str = "data:";

/// Kind of media a work displays
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Image => "image",
            MediaType::Video => "video",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "image" => Some(MediaType::Image),
            "video" => Some(MediaType::Video),
            _ => None,
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// A single portfolio entry
///
/// The field names on the wire are camelCase so manifests exported by
/// earlier versions of the gallery load unchanged. Unknown fields are
/// ignored; `coverUrl`, `prompt` and `tools` may be missing.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WorkRecord {
    /// Stable identifier, the merge key and the store's primary key
    pub id: String,
    pub title: String,
    pub description: String,
    /// External reference or inline `data:` payload
    pub media_url: String,
    /// Poster image for videos that cannot preview themselves
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    pub media_type: MediaType,
    /// Generative provenance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default)]
    pub tools: Vec<String>,
    /// Milliseconds since the Unix epoch, assigned once at creation
    pub created_at: i64,
}

impl WorkRecord {
    /// Whether the media is embedded in the record rather than referenced
    pub fn has_inline_media(&self) -> bool {
        is_inline_media(&self.media_url)
    }
}

/// Check whether a media reference is an inline payload
pub fn is_inline_media(url: &str) -> bool {
    url.starts_with(INLINE_MEDIA_PREFIX)
}

/// Static display record for the gallery owner
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub name: String,
    pub role: String,
    pub bio: String,
    pub avatar: String,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: "Neural Pioneer".to_string(),
            role: "Neural Curator".to_string(),
            bio: "Painting with algorithms where machine intelligence meets human feeling."
                .to_string(),
            avatar: "https://api.dicebear.com/7.x/notionists/svg?seed=Art".to_string(),
        }
    }
}

/// Which works the shell displays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Only(MediaType),
}

impl Filter {
    pub fn matches(&self, work: &WorkRecord) -> bool {
        match self {
            Filter::All => true,
            Filter::Only(kind) => work.media_type == *kind,
        }
    }
}

/// Parse a manifest document (a JSON array of records)
///
/// A single malformed record rejects the whole document.
pub fn parse_manifest(json: &str) -> Result<Vec<WorkRecord>, serde_json::Error> {
    serde_json::from_str(json)
}

/// Serialize records to the manifest format, pretty-printed with 2-space indent
pub fn to_manifest(records: &[WorkRecord]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_optional_fields_default() {
        let json = r#"[{
            "id": "1",
            "title": "Dune",
            "description": "Sand",
            "mediaUrl": "https://example.com/a.png",
            "mediaType": "image",
            "createdAt": 100,
            "someFutureField": true
        }]"#;

        let records = parse_manifest(json).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].cover_url, None);
        assert_eq!(records[0].prompt, None);
        assert!(records[0].tools.is_empty());
        assert_eq!(records[0].created_at, 100);
    }

    #[test]
    fn test_missing_required_field_rejects_whole_manifest() {
        let json = r#"[
            {"id": "1", "title": "a", "description": "b", "mediaUrl": "x", "mediaType": "image", "createdAt": 1},
            {"id": "2", "title": "a", "description": "b", "mediaType": "image", "createdAt": 2}
        ]"#;

        assert!(parse_manifest(json).is_err());
    }

    #[test]
    fn test_unknown_media_type_rejected() {
        let json = r#"[{"id": "1", "title": "a", "description": "b", "mediaUrl": "x", "mediaType": "audio", "createdAt": 1}]"#;
        assert!(parse_manifest(json).is_err());
    }

    #[test]
    fn test_manifest_uses_two_space_indent() {
        let record = WorkRecord {
            id: "1".to_string(),
            title: "t".to_string(),
            description: "d".to_string(),
            media_url: "m".to_string(),
            cover_url: None,
            media_type: MediaType::Video,
            prompt: None,
            tools: vec![],
            created_at: 5,
        };

        let text = to_manifest(&[record]).unwrap();

        assert!(text.starts_with("[\n  {\n    \"id\": \"1\""));
        assert!(text.contains("\"mediaType\": \"video\""));
        assert!(!text.contains("coverUrl"));
    }

    #[test]
    fn test_filter_matches_media_type() {
        let mut record = WorkRecord {
            id: "1".to_string(),
            title: "t".to_string(),
            description: "d".to_string(),
            media_url: "data:image/png;base64,AAAA".to_string(),
            cover_url: None,
            media_type: MediaType::Image,
            prompt: None,
            tools: vec![],
            created_at: 5,
        };

        assert!(record.has_inline_media());
        assert!(Filter::All.matches(&record));
        assert!(Filter::Only(MediaType::Image).matches(&record));
        assert!(!Filter::Only(MediaType::Video).matches(&record));

        record.media_url = "videos/clip.mp4".to_string();
        assert!(!record.has_inline_media());
    }
}
