// src/storage.rs

//! Durable client flags.
//!
//! The only persisted state is a handful of string flags that survive
//! between sessions:
//!
//! ```text
//! newsletter_subscribed       = "true"
//! affiliate_notice_dismissed  = "true"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::error::{AppError, Result};

/// Set once the visitor submits the newsletter form.
pub const NEWSLETTER_SUBSCRIBED: &str = "newsletter_subscribed";

/// Set once the affiliate notice has been closed or timed out.
pub const NOTICE_DISMISSED: &str = "affiliate_notice_dismissed";

/// Value written for every boolean flag.
pub const FLAG_TRUE: &str = "true";

/// Trait for flag storage backends.
#[async_trait]
pub trait FlagStore: Send + Sync {
    /// Read a flag.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a flag, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Whether a flag holds the literal `"true"`.
    async fn is_true(&self, key: &str) -> Result<bool> {
        Ok(self.get(key).await?.as_deref() == Some(FLAG_TRUE))
    }
}

/// Flags kept in a JSON object on disk.
pub struct LocalFlagStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl LocalFlagStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read all flags, treating a missing file as empty.
    async fn read_all(&self) -> Result<BTreeMap<String, String>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Write all flags atomically (write to temp, then rename).
    async fn write_all(&self, flags: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let bytes = serde_json::to_vec_pretty(flags)?;
        let tmp = self.path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(&bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl FlagStore for LocalFlagStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut flags = self.read_all().await?;
        flags.insert(key.to_string(), value.to_string());
        self.write_all(&flags).await?;
        log::debug!("Flag {} = {} written to {}", key, value, self.path.display());
        Ok(())
    }
}

/// Flags held in memory for the lifetime of the process.
#[derive(Default)]
pub struct MemoryFlagStore {
    flags: Mutex<BTreeMap<String, String>>,
}

impl MemoryFlagStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store with some flags already set.
    pub fn with_flags<'a>(flags: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            flags: Mutex::new(
                flags
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            ),
        }
    }
}

#[async_trait]
impl FlagStore for MemoryFlagStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.flags.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.flags
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_local_missing_file_reads_empty() {
        let tmp = TempDir::new().unwrap();
        let store = LocalFlagStore::new(tmp.path().join("flags.json"));
        assert_eq!(store.get(NOTICE_DISMISSED).await.unwrap(), None);
        assert!(!store.is_true(NOTICE_DISMISSED).await.unwrap());
    }

    #[tokio::test]
    async fn test_local_flags_persist_across_instances() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested/flags.json");

        let store = LocalFlagStore::new(&path);
        store.set(NOTICE_DISMISSED, FLAG_TRUE).await.unwrap();
        store.set(NEWSLETTER_SUBSCRIBED, FLAG_TRUE).await.unwrap();
        drop(store);

        let reopened = LocalFlagStore::new(&path);
        assert!(reopened.is_true(NOTICE_DISMISSED).await.unwrap());
        assert!(reopened.is_true(NEWSLETTER_SUBSCRIBED).await.unwrap());
        assert!(!path.with_extension("tmp").exists());
    }

    #[tokio::test]
    async fn test_local_corrupt_file_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("flags.json");
        std::fs::write(&path, "not json").unwrap();
        let store = LocalFlagStore::new(&path);
        assert!(matches!(
            store.get(NOTICE_DISMISSED).await,
            Err(AppError::Json(_))
        ));
    }

    #[tokio::test]
    async fn test_only_literal_true_counts() {
        let store = MemoryFlagStore::with_flags([(NOTICE_DISMISSED, "yes")]);
        assert!(!store.is_true(NOTICE_DISMISSED).await.unwrap());
        store.set(NOTICE_DISMISSED, FLAG_TRUE).await.unwrap();
        assert!(store.is_true(NOTICE_DISMISSED).await.unwrap());
    }
}
