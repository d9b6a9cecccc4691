//! Media handling for submissions
//!
//! This module handles:
//! - Turning uploaded files into inline payloads (inline.rs)
//! - Validating and resolving create/edit drafts (draft.rs)

pub mod draft;
pub mod inline;
