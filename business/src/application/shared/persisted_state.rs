use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::runtime::Handle;
use tokio::sync::{Mutex, watch};

use super::local_state::{read_blob, write_blob};
use crate::domain::errors::StorageError;
use crate::domain::logger::Logger;
use crate::domain::sync::storage::LocalStorage;

/// State that can be written to local storage as a single blob.
pub trait Persisted: Clone + Default + Send + Sync + 'static {
    type Stored: Serialize + DeserializeOwned + Send + Sync;

    fn to_stored(&self) -> Self::Stored;
    fn from_stored(stored: Self::Stored) -> Self;
}

/// Observable, locally authoritative state mirrored to one storage key.
///
/// Mutations notify subscribers immediately and schedule a background save.
pub struct PersistedState<T> {
    inner: Arc<Inner<T>>,
}

struct Inner<T> {
    state: watch::Sender<T>,
    storage: Arc<dyn LocalStorage>,
    key: &'static str,
    logger: Arc<dyn Logger>,
    save_lock: Mutex<()>,
}

impl<T> Clone for PersistedState<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Persisted> PersistedState<T> {
    pub fn new(storage: Arc<dyn LocalStorage>, key: &'static str, logger: Arc<dyn Logger>) -> Self {
        let (state, _) = watch::channel(T::default());
        Self {
            inner: Arc::new(Inner {
                state,
                storage,
                key,
                logger,
                save_lock: Mutex::new(()),
            }),
        }
    }

    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.state.borrow())
    }

    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.inner.state.subscribe()
    }

    /// Runs `f` on the state. When it returns `true` subscribers are notified
    /// and a save is scheduled.
    pub fn modify(&self, f: impl FnOnce(&mut T) -> bool) -> bool {
        let modified = self.inner.state.send_if_modified(f);
        if modified {
            self.schedule_save();
        }
        modified
    }

    /// Replaces the state from storage. A missing blob keeps the default,
    /// an undecodable one resets it.
    pub async fn load(&self) -> Result<(), StorageError> {
        match read_blob::<T::Stored>(self.inner.storage.as_ref(), self.inner.key).await {
            Ok(Some(stored)) => {
                self.inner.state.send_replace(T::from_stored(stored));
                Ok(())
            }
            Ok(None) => {
                self.inner
                    .logger
                    .debug(&format!("Nothing stored under {}", self.inner.key));
                Ok(())
            }
            Err(StorageError::Decode) => {
                self.inner.logger.warn(&format!(
                    "Stored {} could not be decoded, starting empty",
                    self.inner.key
                ));
                self.inner.state.send_replace(T::default());
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Writes the latest state. Concurrent saves are serialized.
    pub async fn save(&self) -> Result<(), StorageError> {
        let _guard = self.inner.save_lock.lock().await;
        let stored = self.inner.state.borrow().to_stored();
        write_blob(self.inner.storage.as_ref(), self.inner.key, &stored).await
    }

    fn schedule_save(&self) {
        let Ok(handle) = Handle::try_current() else {
            self.inner.logger.warn(&format!(
                "No runtime available, {} not saved",
                self.inner.key
            ));
            return;
        };

        let state = self.clone();
        handle.spawn(async move {
            if let Err(e) = state.save().await {
                state
                    .inner
                    .logger
                    .error(&format!("Failed to save {}: {}", state.inner.key, e));
            }
        });
    }
}
