//! Inline media payloads
//!
//! Uploaded files are embedded in the record as `data:<mime>;base64,<payload>`
//! so a work stays self-contained when it is exported to a manifest.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::Path;

use crate::state::data::INLINE_MEDIA_PREFIX;

/// Fallback when the payload type cannot be determined
const OCTET_STREAM: &str = "application/octet-stream";

/// Binary media supplied by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub bytes: Vec<u8>,
    /// Declared MIME type, if the caller knows it
    pub mime: Option<String>,
}

impl Blob {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes, mime: None }
    }

    pub fn with_mime(bytes: Vec<u8>, mime: impl Into<String>) -> Self {
        Self {
            bytes,
            mime: Some(mime.into()),
        }
    }

    /// Encode into the inline `media_url` form
    pub fn to_inline(&self) -> String {
        let mime = self
            .mime
            .as_deref()
            .or_else(|| sniff_mime(&self.bytes))
            .unwrap_or(OCTET_STREAM);

        format!(
            "{}{};base64,{}",
            INLINE_MEDIA_PREFIX,
            mime,
            STANDARD.encode(&self.bytes)
        )
    }
}

/// Read an uploaded file. The MIME type comes from the content when it
/// is recognizable, otherwise from the file extension.
pub async fn read_upload(path: &Path) -> std::io::Result<Blob> {
    let bytes = tokio::fs::read(path).await?;
    let mime = sniff_mime(&bytes)
        .or_else(|| mime_from_extension(path))
        .map(str::to_string);

    tracing::debug!(
        "Read upload {} ({} bytes, {})",
        path.display(),
        bytes.len(),
        mime.as_deref().unwrap_or(OCTET_STREAM)
    );

    Ok(Blob { bytes, mime })
}

/// Recognize common image and video containers from their leading bytes
pub fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    if let Ok(format) = image::guess_format(bytes) {
        return Some(format.to_mime_type());
    }

    // ISO base media (MP4, MOV): box size, then "ftyp" and a brand
    if bytes.len() >= 12 && &bytes[4..8] == b"ftyp" {
        return Some(if &bytes[8..12] == b"qt  " {
            "video/quicktime"
        } else {
            "video/mp4"
        });
    }

    // EBML header (WebM, Matroska)
    if bytes.starts_with(&[0x1A, 0x45, 0xDF, 0xA3]) {
        return Some("video/webm");
    }

    None
}

fn mime_from_extension(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_string_lossy().to_lowercase();
    let mime = match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "mp4" | "m4v" => "video/mp4",
        "mov" => "video/quicktime",
        "webm" => "video/webm",
        _ => return None,
    };
    Some(mime)
}
