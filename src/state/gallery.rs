use std::path::{Path, PathBuf};

use super::catalog::Catalog;
use super::data::{Filter, Profile, WorkRecord};
use super::now_millis;
use super::session::{LoginOutcome, Mode, Session};
use super::store::{FlagStore, WorkStore};
use crate::enrich::TextEnricher;
use crate::error::{GalleryError, ValidationError};
use crate::export::{snapshot_json, write_snapshot};
use crate::media::draft::{build_record, WorkDraft};
use crate::sources::reconcile::{reconcile, Reconciled};
use crate::sources::remote::ManifestSource;

/// The work currently open in the detail view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    pub work_id: String,
    /// Generated commentary, empty when enrichment is unavailable
    pub insight: String,
}

/// Upload/edit form lifecycle
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Editor {
    #[default]
    Closed,
    Creating,
    Editing(String),
}

/// Main application state
///
/// Every user action goes through a method on this type, which keeps the
/// catalog, the store, the session and the open views consistent.
/// Mutations write to the store first and patch the catalog only once the
/// write succeeded.
pub struct Gallery<S> {
    /// Local work store, also holding the session flag
    store: S,
    enricher: Box<dyn TextEnricher>,
    catalog: Catalog,
    session: Session,
    profile: Profile,
    filter: Filter,
    detail: Option<DetailView>,
    editor: Editor,
    /// Status message to display to the user
    status: String,
}

impl<S: WorkStore + FlagStore> Gallery<S> {
    /// Reconcile the catalog and restore the session.
    ///
    /// Never fails: an unreadable store leaves the catalog with defaults and
    /// remote works only, and the problem is reported through `status()`.
    pub async fn load(
        store: S,
        enricher: Box<dyn TextEnricher>,
        defaults: Vec<WorkRecord>,
        remote: Option<&dyn ManifestSource>,
        admin_password: &str,
    ) -> Self {
        let Reconciled {
            catalog,
            local_error,
        } = reconcile(defaults, remote, &store).await;

        let mut warnings = Vec::new();
        if let Some(e) = local_error {
            warnings.push(format!("Local works unavailable: {e}"));
        }

        let session = match Session::restore(admin_password, &store).await {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!("Could not restore session flag: {}", e);
                warnings.push(format!("Session state unavailable: {e}"));
                Session::new(admin_password)
            }
        };

        let status = if warnings.is_empty() {
            format!("Ready. {} works in catalog.", catalog.len())
        } else {
            format!("⚠️  {}", warnings.join("; "))
        };

        tracing::info!(
            "🎨 Gallery loaded with {} works in {:?} mode",
            catalog.len(),
            session.mode()
        );

        Gallery {
            store,
            enricher,
            catalog,
            session,
            profile: Profile::default(),
            filter: Filter::All,
            detail: None,
            editor: Editor::Closed,
            status,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Works passing the current filter, newest first
    pub fn visible(&self) -> Vec<&WorkRecord> {
        self.catalog.filtered(self.filter).collect()
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn mode(&self) -> Mode {
        self.session.mode()
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The open work and its insight, if a detail view is open
    pub fn detail(&self) -> Option<(&WorkRecord, &str)> {
        let view = self.detail.as_ref()?;
        let work = self.catalog.get(&view.work_id)?;
        Some((work, view.insight.as_str()))
    }

    fn require_admin(&self) -> Result<(), GalleryError> {
        if self.session.is_admin() {
            Ok(())
        } else {
            Err(GalleryError::Forbidden)
        }
    }

    // ========== Session ==========

    pub async fn login(&mut self, password: &str) -> Result<LoginOutcome, GalleryError> {
        let outcome = self.session.login(password, &self.store).await?;
        self.status = match outcome {
            LoginOutcome::Granted => "Admin mode enabled.".to_string(),
            LoginOutcome::Denied => "Wrong password / access denied.".to_string(),
        };
        Ok(outcome)
    }

    pub async fn logout(&mut self) -> Result<(), GalleryError> {
        self.session.logout(&self.store).await?;
        self.editor = Editor::Closed;
        self.status = "Public mode.".to_string();
        Ok(())
    }

    // ========== Views ==========

    /// Open the detail view for a work and fetch its insight
    pub async fn open_detail(&mut self, id: &str) -> Result<(), GalleryError> {
        let work = self
            .catalog
            .get(id)
            .ok_or_else(|| GalleryError::NotFound(id.to_string()))?;

        let insight = self.enricher.feedback(&work.description).await;

        self.detail = Some(DetailView {
            work_id: id.to_string(),
            insight,
        });
        Ok(())
    }

    pub fn close_detail(&mut self) {
        self.detail = None;
    }

    /// Open an empty form for a new work
    pub fn open_creator(&mut self) -> Result<(), GalleryError> {
        self.require_admin()?;
        self.editor = Editor::Creating;
        Ok(())
    }

    /// Open the form for an existing work, prefilled with its fields
    pub fn open_editor(&mut self, id: &str) -> Result<WorkDraft, GalleryError> {
        self.require_admin()?;
        let work = self
            .catalog
            .get(id)
            .ok_or_else(|| GalleryError::NotFound(id.to_string()))?;

        let draft = WorkDraft::from_record(work);
        self.editor = Editor::Editing(id.to_string());
        Ok(draft)
    }

    pub fn close_editor(&mut self) {
        self.editor = Editor::Closed;
    }

    // ========== Mutations ==========

    /// Let the enricher rewrite the draft's description.
    /// Needs a title and a description; the prompt is optional context and
    /// not required. On any failure the draft is untouched.
    pub async fn polish(&self, draft: &mut WorkDraft) {
        if draft.title.trim().is_empty() || draft.description.trim().is_empty() {
            return;
        }

        let polished = self
            .enricher
            .polish(&draft.title, &draft.description, draft.prompt.as_deref())
            .await;

        if !polished.trim().is_empty() {
            draft.description = polished;
        }
    }

    /// Create a work, or update `existing_id` in place.
    ///
    /// Nothing is written unless the draft validates, and the catalog is
    /// only patched after the store accepted the record.
    pub async fn submit(
        &mut self,
        draft: WorkDraft,
        existing_id: Option<&str>,
    ) -> Result<WorkRecord, GalleryError> {
        self.require_admin()?;

        let existing = match existing_id {
            Some(id) => Some(
                self.catalog
                    .get(id)
                    .cloned()
                    .ok_or_else(|| ValidationError::UnknownRecord(id.to_string()))?,
            ),
            None => None,
        };

        let record = build_record(draft, existing.as_ref(), now_millis())?;

        if let Err(e) = self.store.put(&record).await {
            tracing::error!("Failed to persist work {}: {}", record.id, e);
            self.status = format!("❌ Save failed: {e}");
            return Err(e.into());
        }

        self.catalog.upsert(record.clone());
        self.editor = Editor::Closed;
        self.status = format!("✅ Saved \"{}\".", record.title);
        tracing::info!(
            "{} work {}",
            if existing.is_some() { "Updated" } else { "Created" },
            record.id
        );

        Ok(record)
    }

    /// Delete a work from the store and the catalog.
    /// Deleting an id that is not stored succeeds.
    pub async fn remove(&mut self, id: &str) -> Result<(), GalleryError> {
        self.require_admin()?;

        if let Err(e) = self.store.delete(id).await {
            tracing::error!("Failed to delete work {}: {}", id, e);
            self.status = format!("❌ Delete failed: {e}");
            return Err(e.into());
        }

        let removed = self.catalog.remove(id);

        if self.detail.as_ref().is_some_and(|d| d.work_id == id) {
            self.detail = None;
        }
        if matches!(&self.editor, Editor::Editing(editing) if editing == id) {
            self.editor = Editor::Closed;
        }

        self.status = match removed {
            Some(work) => format!("🗑️  Deleted \"{}\".", work.title),
            None => format!("Nothing to delete for {id}."),
        };
        tracing::info!("Deleted work {}", id);

        Ok(())
    }

    // ========== Export ==========

    /// The whole catalog in the manifest format
    pub fn export_json(&self) -> Result<String, GalleryError> {
        self.require_admin()?;
        Ok(snapshot_json(&self.catalog)?)
    }

    /// Write the manifest into `dir` as `portfolio_data_<millis>.json`
    pub async fn export_snapshot(&mut self, dir: &Path) -> Result<PathBuf, GalleryError> {
        let json = self.export_json()?;
        let path = write_snapshot(&json, dir, now_millis())
            .await
            .map_err(GalleryError::Export)?;

        self.status = format!(
            "Exported {} works to {}. Publish it at the manifest location to share it.",
            self.catalog.len(),
            path.display()
        );
        tracing::info!("📦 Exported catalog to {}", path.display());

        Ok(path)
    }
}
