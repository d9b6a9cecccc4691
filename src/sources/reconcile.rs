//! Catalog reconciliation
//!
//! Sources are applied in fixed rank order: bundled defaults, then the
//! remote manifest, then the local store. A later source's record replaces
//! an earlier one with the same id in full, whatever the timestamps say.

use std::collections::HashMap;

use super::remote::ManifestSource;
use crate::error::StoreError;
use crate::state::catalog::Catalog;
use crate::state::data::WorkRecord;
use crate::state::store::WorkStore;

/// Result of a startup reconciliation
#[derive(Debug)]
pub struct Reconciled {
    pub catalog: Catalog,
    /// Set when the local store could not be read; the catalog then
    /// holds defaults and remote works only
    pub local_error: Option<StoreError>,
}

/// Merge the three sources into a sorted catalog.
///
/// A replaced record keeps the position of the first record seen with its
/// id, so equal timestamps sort the same way on every run.
pub fn merge_sources(
    defaults: Vec<WorkRecord>,
    remote: Vec<WorkRecord>,
    local: Vec<WorkRecord>,
) -> Catalog {
    let mut merged: Vec<WorkRecord> = Vec::new();
    let mut slots: HashMap<String, usize> = HashMap::new();

    for (source, records) in [("defaults", defaults), ("remote", remote), ("local", local)] {
        for record in records {
            match slots.get(&record.id) {
                Some(&slot) => {
                    tracing::debug!("{} overrides work {}", source, record.id);
                    merged[slot] = record;
                }
                None => {
                    slots.insert(record.id.clone(), merged.len());
                    merged.push(record);
                }
            }
        }
    }

    Catalog::new(merged)
}

/// Fetch the remote manifest, degrading any failure to an empty source
pub async fn fetch_or_absent(remote: Option<&dyn ManifestSource>) -> Vec<WorkRecord> {
    let Some(source) = remote else {
        return Vec::new();
    };

    match source.fetch().await {
        Ok(works) => works,
        Err(e) => {
            tracing::warn!("Remote manifest {} unavailable: {}", source.describe(), e);
            Vec::new()
        }
    }
}

/// Build the catalog from all three sources.
///
/// Remote failures are logged and ignored. A local store failure is
/// returned alongside the catalog so the caller can tell the user.
pub async fn reconcile(
    defaults: Vec<WorkRecord>,
    remote: Option<&dyn ManifestSource>,
    store: &dyn WorkStore,
) -> Reconciled {
    let remote_works = fetch_or_absent(remote).await;

    let (local_works, local_error) = match store.get_all().await {
        Ok(works) => (works, None),
        Err(e) => {
            tracing::warn!("Local work store unreadable: {}", e);
            (Vec::new(), Some(e))
        }
    };

    tracing::info!(
        "📊 Reconciling {} default, {} remote, {} local works",
        defaults.len(),
        remote_works.len(),
        local_works.len()
    );

    Reconciled {
        catalog: merge_sources(defaults, remote_works, local_works),
        local_error,
    }
}
