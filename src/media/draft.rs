//! Create/edit submissions
//!
//! A draft is what the editor form holds. `build_record` turns it into a
//! complete record, or refuses it without side effects.

use super::inline::Blob;
use crate::error::ValidationError;
use crate::state::data::{MediaType, WorkRecord};

/// Where a draft's media comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaInput {
    /// External reference (URL or relative path), used verbatim
    Url(String),
    /// Uploaded payload, embedded inline
    Upload(Blob),
}

impl MediaInput {
    /// Resolve to a `media_url`. Blank references count as "nothing supplied".
    fn resolve(self) -> Option<String> {
        match self {
            MediaInput::Url(url) if url.trim().is_empty() => None,
            MediaInput::Url(url) => Some(url),
            MediaInput::Upload(blob) => Some(blob.to_inline()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkDraft {
    pub title: String,
    pub description: String,
    pub prompt: Option<String>,
    /// Comma-separated tool labels as typed
    pub tools: String,
    /// Only honored on creation; an edited work keeps its type
    pub media_type: MediaType,
    /// `None` on edit keeps the current media
    pub media: Option<MediaInput>,
    /// `None` on edit keeps the current cover
    pub cover: Option<MediaInput>,
}

impl WorkDraft {
    pub fn new(media_type: MediaType) -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            prompt: None,
            tools: String::new(),
            media_type,
            media: None,
            cover: None,
        }
    }

    /// Prefill an edit form from an existing work
    pub fn from_record(record: &WorkRecord) -> Self {
        Self {
            title: record.title.clone(),
            description: record.description.clone(),
            prompt: record.prompt.clone(),
            tools: record.tools.join(", "),
            media_type: record.media_type,
            media: None,
            cover: None,
        }
    }
}

/// Split a comma-separated tools string, trimming each entry and dropping
/// empty ones. Order and duplicates are kept.
pub fn normalize_tools(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Fresh identifier for a new work (UUIDv7, time-ordered)
pub fn new_work_id() -> String {
    uuid::Uuid::now_v7().to_string()
}

/// Validate a draft and resolve it into the record to store.
///
/// `existing` is the current version when editing; its id, creation time,
/// media type and, unless replaced, its media and cover carry over.
pub fn build_record(
    draft: WorkDraft,
    existing: Option<&WorkRecord>,
    now: i64,
) -> Result<WorkRecord, ValidationError> {
    if draft.title.trim().is_empty() {
        return Err(ValidationError::MissingTitle);
    }
    if draft.description.trim().is_empty() {
        return Err(ValidationError::MissingDescription);
    }

    let media_url = draft
        .media
        .and_then(MediaInput::resolve)
        .or_else(|| existing.map(|w| w.media_url.clone()))
        .filter(|url| !url.is_empty())
        .ok_or(ValidationError::MissingMedia)?;

    let cover_url = match draft.cover.and_then(MediaInput::resolve) {
        Some(cover) => Some(cover),
        None => existing.and_then(|w| w.cover_url.clone()),
    };

    let prompt = draft.prompt.filter(|p| !p.trim().is_empty());
    let tools = normalize_tools(&draft.tools);

    let record = match existing {
        Some(current) => WorkRecord {
            id: current.id.clone(),
            title: draft.title,
            description: draft.description,
            media_url,
            cover_url,
            media_type: current.media_type,
            prompt,
            tools,
            created_at: current.created_at,
        },
        None => WorkRecord {
            id: new_work_id(),
            title: draft.title,
            description: draft.description,
            media_url,
            cover_url,
            media_type: draft.media_type,
            prompt,
            tools,
            created_at: now,
        },
    };

    Ok(record)
}
