use crate::domain::ports::KeyValueStore;
use crate::utils::error::Result;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// One `<key>.json` file per slot under a state directory.
#[derive(Debug, Clone)]
pub struct LocalStore {
    base_path: PathBuf,
}

impl LocalStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        self.base_path.join(format!("{}.json", key))
    }
}

impl KeyValueStore for LocalStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        match tokio::fs::read_to_string(self.slot_path(key)).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        tokio::fs::create_dir_all(&self.base_path).await?;

        // 先寫暫存檔再改名，避免中途失敗留下半份資料
        let target = self.slot_path(key);
        let tmp = target.with_extension("json.tmp");
        tokio::fs::write(&tmp, value).await?;
        tokio::fs::rename(&tmp, &target).await?;

        tracing::debug!("Wrote slot '{}' to {}", key, target.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_slot_reads_none() {
        let dir = TempDir::new().unwrap();
        let store = LocalStore::new(dir.path());

        assert_eq!(store.get("raffle-data").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_creates_directory_and_overwrites() {
        let dir = TempDir::new().unwrap();
        let store = LocalStore::new(dir.path().join("nested").join("state"));

        store.set("raffle-sheet-url", "\"first\"").await.unwrap();
        store.set("raffle-sheet-url", "\"second\"").await.unwrap();

        assert_eq!(
            store.get("raffle-sheet-url").await.unwrap().as_deref(),
            Some("\"second\"")
        );
        assert!(store.base_path().join("raffle-sheet-url.json").exists());
        assert!(!store.base_path().join("raffle-sheet-url.json.tmp").exists());
    }
}
