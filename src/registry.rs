// Local assistant registry: a JSON array of {name, description} records in a
// single file. Each append reads the whole array, pushes one record and
// rewrites the file.

use crate::error::RegistryError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AssistantRecord {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct AssistantRegistry {
    path: PathBuf,
}

impl AssistantRegistry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        AssistantRegistry { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All records. A missing or unreadable file is an empty registry.
    pub fn load(&self) -> Vec<AssistantRecord> {
        let data = match std::fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) => {
                tracing::debug!(path = %self.path.display(), error = %e, "registry not readable, starting empty");
                return Vec::new();
            }
        };
        match serde_json::from_str(&data) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "registry is not a valid record list, starting empty");
                Vec::new()
            }
        }
    }

    /// Append `record` and rewrite the file. Returns the records now stored.
    pub fn append(&self, record: AssistantRecord) -> Result<Vec<AssistantRecord>, RegistryError> {
        let mut records = self.load();
        records.push(record);

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(&records)?;
        std::fs::write(&self.path, json)?;
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, description: &str) -> AssistantRecord {
        AssistantRecord {
            name: name.into(),
            description: description.into(),
        }
    }

    #[test]
    fn append_to_absent_file_creates_single_record_array() {
        let dir = tempfile::tempdir().unwrap();
        let registry = AssistantRegistry::new(dir.path().join("assistants.json"));

        registry.append(record("Bot", "test")).unwrap();

        let raw = std::fs::read_to_string(registry.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(
            value,
            serde_json::json!([{"name": "Bot", "description": "test"}])
        );
    }

    #[test]
    fn appends_keep_insertion_order() {
        let dir = tempfile::tempdir().unwrap();
        let registry = AssistantRegistry::new(dir.path().join("nested").join("assistants.json"));

        for i in 0..5 {
            registry.append(record(&format!("bot-{i}"), "d")).unwrap();
        }

        let names: Vec<_> = registry.load().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["bot-0", "bot-1", "bot-2", "bot-3", "bot-4"]);
    }

    #[test]
    fn corrupted_file_behaves_like_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("assistants.json");
        std::fs::write(&path, "{ not json").unwrap();
        let registry = AssistantRegistry::new(&path);

        assert!(registry.load().is_empty());
        let records = registry.append(record("Bot", "test")).unwrap();
        assert_eq!(records, vec![record("Bot", "test")]);
        assert_eq!(registry.load(), vec![record("Bot", "test")]);
    }
}
