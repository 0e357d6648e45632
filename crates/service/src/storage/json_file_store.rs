use std::{marker::PhantomData, path::PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tokio::{fs, sync::Mutex};

use crate::errors::ServiceError;

/// JSON file-backed collection store.
///
/// The file holds a single JSON array. Nothing is cached: every call reads the
/// file again, so edits made outside the process are picked up. Read-modify-write
/// cycles run under one mutex, which keeps writers inside this process from
/// losing each other's updates. Separate processes sharing the file still race.
pub struct JsonFileStore<T> {
    file_path: PathBuf,
    lock: Mutex<()>,
    _items: PhantomData<fn() -> T>,
}

impl<T> JsonFileStore<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Initialize the store from a path. Creates the file with an empty array if missing.
    pub async fn new<P: Into<PathBuf>>(path: P) -> Result<Self, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await.map_err(ServiceError::storage)?;
            }
        }
        let store = Self { file_path, lock: Mutex::new(()), _items: PhantomData };
        store.ensure_file().await?;
        Ok(store)
    }

    async fn ensure_file(&self) -> Result<(), ServiceError> {
        if fs::metadata(&self.file_path).await.is_err() {
            fs::write(&self.file_path, b"[]").await.map_err(ServiceError::storage)?;
        }
        Ok(())
    }

    async fn read_all(&self) -> Result<Vec<T>, ServiceError> {
        self.ensure_file().await?;
        let bytes = fs::read(&self.file_path).await.map_err(ServiceError::storage)?;
        serde_json::from_slice(&bytes)
            .map_err(|e| ServiceError::Storage(format!("{}: {e}", self.file_path.display())))
    }

    async fn write_all(&self, items: &[T]) -> Result<(), ServiceError> {
        let data = serde_json::to_vec_pretty(items).map_err(ServiceError::storage)?;
        // write-then-rename so readers never see a truncated document
        let mut tmp = self.file_path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, data).await.map_err(ServiceError::storage)?;
        fs::rename(&tmp, &self.file_path).await.map_err(ServiceError::storage)?;
        Ok(())
    }

    /// Load the whole collection.
    pub async fn load(&self) -> Result<Vec<T>, ServiceError> {
        let _guard = self.lock.lock().await;
        self.read_all().await
    }

    /// Replace the whole collection.
    pub async fn save(&self, items: &[T]) -> Result<(), ServiceError> {
        let _guard = self.lock.lock().await;
        self.write_all(items).await
    }

    /// Run one read-modify-write cycle under the store lock.
    ///
    /// The closure returns its result together with a dirty flag; the collection
    /// is written back only when the flag is set and the closure succeeded.
    pub async fn update<R, F>(&self, f: F) -> Result<R, ServiceError>
    where
        F: FnOnce(&mut Vec<T>) -> Result<(R, bool), ServiceError>,
    {
        let _guard = self.lock.lock().await;
        let mut items = self.read_all().await?;
        let (out, dirty) = f(&mut items)?;
        if dirty {
            self.write_all(&items).await?;
        }
        Ok(out)
    }
}
