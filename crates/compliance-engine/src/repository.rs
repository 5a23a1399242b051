//! Tag storage seam
//!
//! The engine reads tags through [`TagRepository`] and never holds on to
//! them between calls. The tag manager owns the real store; the in-memory
//! implementation here backs tests and one-shot validation of a JSON
//! snapshot.

use crate::error::{RepositoryError, RepositoryResult};
use serde::Deserialize;
use shared_types::{Rules, Tag};
use std::collections::BTreeMap;

pub trait TagRepository {
    fn get(&self, id: &str) -> Option<Tag>;

    /// All tags, ordered by id
    fn list(&self) -> Vec<Tag>;

    /// Insert or replace a tag, returning the previous version
    fn upsert(&mut self, tag: Tag) -> RepositoryResult<Option<Tag>>;

    fn delete(&mut self, id: &str) -> RepositoryResult<Tag>;
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryTagRepository {
    tags: BTreeMap<String, Tag>,
}

/// Value side of the `{tagId: {...}}` tag store object
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredTag {
    label: String,
    #[serde(default)]
    color_hint: Option<String>,
    #[serde(default)]
    rules: Option<Rules>,
}

impl InMemoryTagRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tags(tags: impl IntoIterator<Item = Tag>) -> RepositoryResult<Self> {
        let mut repo = Self::new();
        for tag in tags {
            repo.upsert(tag)?;
        }
        Ok(repo)
    }

    /// Load the tag store snapshot: an object keyed by tag id
    pub fn from_json(json: &str) -> RepositoryResult<Self> {
        let stored: BTreeMap<String, StoredTag> = serde_json::from_str(json)?;
        Self::from_tags(stored.into_iter().map(|(id, stored)| Tag {
            id,
            label: stored.label,
            color_hint: stored.color_hint,
            rules: stored.rules,
        }))
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl TagRepository for InMemoryTagRepository {
    fn get(&self, id: &str) -> Option<Tag> {
        self.tags.get(id).cloned()
    }

    fn list(&self) -> Vec<Tag> {
        self.tags.values().cloned().collect()
    }

    fn upsert(&mut self, tag: Tag) -> RepositoryResult<Option<Tag>> {
        if tag.id.trim().is_empty() {
            return Err(RepositoryError::InvalidTag("tag id is empty".to_string()));
        }
        if tag.label.trim().is_empty() {
            return Err(RepositoryError::InvalidTag(format!(
                "tag {} has an empty label",
                tag.id
            )));
        }
        Ok(self.tags.insert(tag.id.clone(), tag))
    }

    fn delete(&mut self, id: &str) -> RepositoryResult<Tag> {
        self.tags
            .remove(id)
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))
    }
}
