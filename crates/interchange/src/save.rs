//! Single-flight saving.
//!
//! Editing continues while a save is pending, but only one save runs at a
//! time. A second request made while one is in flight is refused rather than
//! queued; the front end disables its save action while
//! [`SaveController::is_saving`] is true.

use crate::backend::{LayoutBackend, PersistenceError};
use crate::record::SaveRequest;
use std::cell::{Cell, RefCell};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum SaveError {
    /// Another save has not settled yet.
    InFlight,
    Backend(PersistenceError),
}

impl fmt::Display for SaveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveError::InFlight => write!(f, "a save is already in progress"),
            SaveError::Backend(e) => write!(f, "save failed: {}", e),
        }
    }
}

impl std::error::Error for SaveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SaveError::Backend(e) => Some(e),
            SaveError::InFlight => None,
        }
    }
}

impl From<PersistenceError> for SaveError {
    fn from(e: PersistenceError) -> Self {
        SaveError::Backend(e)
    }
}

/// Tracks the record being edited and whether a save is running.
#[derive(Debug, Default)]
pub struct SaveController {
    record_id: RefCell<Option<String>>,
    in_flight: Cell<bool>,
}

/// Clears the in-flight flag however the save future ends, including when it
/// is dropped before completion.
struct InFlightGuard<'a>(&'a Cell<bool>);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl SaveController {
    /// Controller for a layout that has never been saved.
    pub fn new() -> Self {
        Self::default()
    }

    /// Controller for editing an existing record; saves update it in place.
    pub fn for_record(id: impl Into<String>) -> Self {
        Self {
            record_id: RefCell::new(Some(id.into())),
            in_flight: Cell::new(false),
        }
    }

    pub fn record_id(&self) -> Option<String> {
        self.record_id.borrow().clone()
    }

    pub fn is_saving(&self) -> bool {
        self.in_flight.get()
    }

    /// Save `request`, creating the record on first save and updating it
    /// afterwards. On failure nothing changes and the save can be retried.
    pub async fn save<B: LayoutBackend>(
        &self,
        backend: &B,
        request: SaveRequest,
    ) -> Result<String, SaveError> {
        if self.in_flight.replace(true) {
            log::warn!("save requested while another is in flight");
            return Err(SaveError::InFlight);
        }
        let _guard = InFlightGuard(&self.in_flight);

        let existing = self.record_id();
        match backend.upsert(existing.as_deref(), request).await {
            Ok(id) => {
                log::info!("saved layout record {}", id);
                *self.record_id.borrow_mut() = Some(id.clone());
                Ok(id)
            }
            Err(e) => {
                log::warn!("saving layout failed: {}", e);
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use crate::record::{Associations, LayoutRecord, RecordListing};
    use scene::Layout;
    use smol::future::{poll_once, yield_now};

    /// Takes one extra poll before reaching the inner backend.
    struct SlowBackend(MemoryBackend);

    impl LayoutBackend for SlowBackend {
        async fn upsert(&self, id: Option<&str>, request: SaveRequest) -> Result<String, PersistenceError> {
            yield_now().await;
            self.0.upsert(id, request).await
        }

        async fn fetch(&self, id: &str) -> Result<LayoutRecord, PersistenceError> {
            self.0.fetch(id).await
        }

        async fn list(&self) -> Result<Vec<RecordListing>, PersistenceError> {
            self.0.list().await
        }

        async fn delete(&self, id: &str) -> Result<(), PersistenceError> {
            self.0.delete(id).await
        }
    }

    fn request() -> SaveRequest {
        SaveRequest::new("layout", &Layout::new(), Associations::default())
    }

    #[test]
    fn second_save_is_refused_while_first_is_pending() {
        let backend = SlowBackend(MemoryBackend::new());
        let controller = SaveController::new();

        smol::block_on(async {
            let mut first = Box::pin(controller.save(&backend, request()));
            assert!(poll_once(&mut first).await.is_none());
            assert!(controller.is_saving());

            assert_eq!(controller.save(&backend, request()).await, Err(SaveError::InFlight));

            let id = first.await.unwrap();
            assert!(!controller.is_saving());
            assert_eq!(controller.record_id(), Some(id));
        });
    }

    #[test]
    fn later_saves_update_the_same_record() {
        let backend = MemoryBackend::new();
        let controller = SaveController::new();
        smol::block_on(async {
            let first = controller.save(&backend, request()).await.unwrap();
            let second = controller.save(&backend, request()).await.unwrap();
            assert_eq!(first, second);
            assert_eq!(backend.len(), 1);
        });
    }

    #[test]
    fn failure_is_retryable() {
        let backend = MemoryBackend::new();
        let controller = SaveController::new();
        smol::block_on(async {
            backend.set_offline(true);
            assert!(matches!(
                controller.save(&backend, request()).await,
                Err(SaveError::Backend(PersistenceError::Unavailable(_)))
            ));
            assert!(!controller.is_saving());
            assert_eq!(controller.record_id(), None);

            backend.set_offline(false);
            assert!(controller.save(&backend, request()).await.is_ok());
        });
    }

    #[test]
    fn dropping_a_pending_save_releases_the_slot() {
        let backend = SlowBackend(MemoryBackend::new());
        let controller = SaveController::new();
        smol::block_on(async {
            let mut pending = Box::pin(controller.save(&backend, request()));
            assert!(poll_once(&mut pending).await.is_none());
            drop(pending);
            assert!(!controller.is_saving());
        });
    }
}
