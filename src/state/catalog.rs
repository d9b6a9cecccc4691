//! The in-memory catalog shown by the shell
//!
//! Works are kept sorted by `created_at`, newest first, at all times.
//! Equal timestamps keep the order they arrived in.

use super::data::{Filter, WorkRecord};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    works: Vec<WorkRecord>,
}

impl Catalog {
    /// Build a catalog from works in arrival order
    pub fn new(mut works: Vec<WorkRecord>) -> Self {
        // sort_by is stable, so ties keep arrival order
        works.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Self { works }
    }

    pub fn works(&self) -> &[WorkRecord] {
        &self.works
    }

    pub fn len(&self) -> usize {
        self.works.len()
    }

    pub fn is_empty(&self) -> bool {
        self.works.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&WorkRecord> {
        self.works.iter().find(|w| w.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// Works matching a display filter, in catalog order
    pub fn filtered(&self, filter: Filter) -> impl Iterator<Item = &WorkRecord> + '_ {
        self.works.iter().filter(move |w| filter.matches(w))
    }

    /// Replace the work with the same id, or insert a new one ahead of
    /// every work that is not newer than it
    pub fn upsert(&mut self, record: WorkRecord) {
        if let Some(index) = self.position(&record.id) {
            if self.works[index].created_at == record.created_at {
                self.works[index] = record;
                return;
            }
            self.works.remove(index);
        }

        let at = self
            .works
            .partition_point(|w| w.created_at > record.created_at);
        self.works.insert(at, record);
    }

    /// Drop the work with `id`, returning it if it was present
    pub fn remove(&mut self, id: &str) -> Option<WorkRecord> {
        let index = self.position(id)?;
        Some(self.works.remove(index))
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.works.iter().position(|w| w.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::MediaType;

    fn work(id: &str, created_at: i64, media_type: MediaType) -> WorkRecord {
        WorkRecord {
            id: id.to_string(),
            title: id.to_uppercase(),
            description: "desc".to_string(),
            media_url: format!("{id}.bin"),
            cover_url: None,
            media_type,
            prompt: None,
            tools: vec![],
            created_at,
        }
    }

    fn ids(catalog: &Catalog) -> Vec<&str> {
        catalog.works().iter().map(|w| w.id.as_str()).collect()
    }

    #[test]
    fn test_new_sorts_newest_first_with_stable_ties() {
        let catalog = Catalog::new(vec![
            work("a", 10, MediaType::Image),
            work("b", 30, MediaType::Image),
            work("c", 10, MediaType::Image),
            work("d", 20, MediaType::Image),
        ]);

        assert_eq!(ids(&catalog), vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn test_upsert_inserts_at_timestamp_position() {
        let mut catalog = Catalog::new(vec![
            work("a", 30, MediaType::Image),
            work("b", 10, MediaType::Image),
        ]);

        catalog.upsert(work("new", 20, MediaType::Video));
        catalog.upsert(work("newest", 40, MediaType::Video));
        catalog.upsert(work("tie", 10, MediaType::Video));

        assert_eq!(ids(&catalog), vec!["newest", "a", "new", "tie", "b"]);
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let mut catalog = Catalog::new(vec![
            work("a", 10, MediaType::Image),
            work("b", 10, MediaType::Image),
        ]);

        let mut edited = work("b", 10, MediaType::Image);
        edited.description = "edited".to_string();
        catalog.upsert(edited);

        assert_eq!(ids(&catalog), vec!["a", "b"]);
        assert_eq!(catalog.get("b").unwrap().description, "edited");
    }

    #[test]
    fn test_upsert_moves_record_when_timestamp_differs() {
        let mut catalog = Catalog::new(vec![
            work("a", 30, MediaType::Image),
            work("b", 20, MediaType::Image),
        ]);

        catalog.upsert(work("b", 50, MediaType::Image));

        assert_eq!(ids(&catalog), vec!["b", "a"]);
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_remove_and_filter() {
        let mut catalog = Catalog::new(vec![
            work("a", 3, MediaType::Image),
            work("b", 2, MediaType::Video),
            work("c", 1, MediaType::Image),
        ]);

        let videos: Vec<_> = catalog
            .filtered(Filter::Only(MediaType::Video))
            .map(|w| w.id.as_str())
            .collect();
        assert_eq!(videos, vec!["b"]);

        assert!(catalog.remove("a").is_some());
        assert!(catalog.remove("a").is_none());
        assert!(!catalog.contains("a"));
        assert_eq!(ids(&catalog), vec!["b", "c"]);
    }
}
