//! Article persistence boundary.
//!
//! Storage itself belongs to the host application; the editor only produces
//! and consumes [`ArticleRecord`]s.

use crate::EditorError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleRecord {
    pub id: String,
    pub title: String,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    pub html: String,
    pub updated_at: DateTime<Utc>,
}

pub trait ArticleStore {
    fn load(&self, id: &str) -> Result<Option<ArticleRecord>, EditorError>;
    fn save(&mut self, record: ArticleRecord) -> Result<(), EditorError>;
}

/// In-process store
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: HashMap<String, ArticleRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ArticleStore for MemoryStore {
    fn load(&self, id: &str) -> Result<Option<ArticleRecord>, EditorError> {
        Ok(self.records.get(id).cloned())
    }

    fn save(&mut self, record: ArticleRecord) -> Result<(), EditorError> {
        self.records.insert(record.id.clone(), record);
        Ok(())
    }
}

/// One `<id>.json` file per article
#[derive(Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }
}

impl ArticleStore for JsonFileStore {
    fn load(&self, id: &str) -> Result<Option<ArticleRecord>, EditorError> {
        let path = self.path_for(id);
        if !path.exists() {
            return Ok(None);
        }
        let json = std::fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&json)?))
    }

    fn save(&mut self, record: ArticleRecord) -> Result<(), EditorError> {
        std::fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(&record)?;
        std::fs::write(self.path_for(&record.id), json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str) -> ArticleRecord {
        ArticleRecord {
            id: id.to_string(),
            title: "Title".to_string(),
            summary: "Summary".to_string(),
            cover_image: None,
            html: "<p>x</p>".to_string(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemoryStore::new();
        store.save(record("a")).unwrap();

        assert_eq!(store.load("a").unwrap().unwrap().title, "Title");
        assert!(store.load("b").unwrap().is_none());
    }

    #[test]
    fn test_json_file_store_round_trip() {
        let dir = std::env::temp_dir().join(format!("folio-store-{}", std::process::id()));
        let mut store = JsonFileStore::new(&dir);

        let saved = record("article-1");
        store.save(saved.clone()).unwrap();
        assert_eq!(store.load("article-1").unwrap(), Some(saved));
        assert!(store.load("missing").unwrap().is_none());

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_record_uses_camel_case() {
        let json = serde_json::to_string(&ArticleRecord {
            cover_image: Some("cover.png".to_string()),
            ..record("a")
        })
        .unwrap();
        assert!(json.contains("\"coverImage\":\"cover.png\""));
        assert!(json.contains("\"updatedAt\""));
    }
}
