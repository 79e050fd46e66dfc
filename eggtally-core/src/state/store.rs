use serde::de::DeserializeOwned;
use serde::Serialize;

use super::error::StateError;
use crate::models::{
    default_catalog, Aviary, Batch, CollectionMode, EggTypeCounter, Settings, DEFAULT_TRAY_VALUE,
};
use crate::storage::{KeyValueStore, SnapshotKey, StorageError};
use crate::sync::AviaryDto;

/// Tunables for a [`StateStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    /// Eggs per tray used for counting when no aviary is selected
    pub default_tray_value: u32,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            default_tray_value: DEFAULT_TRAY_VALUE,
        }
    }
}

/// Current selection, by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub batch_id: Option<String>,
    pub aviary_id: Option<String>,
    pub egg_id: Option<String>,
}

/// Immutable copy of the store's state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSnapshot {
    pub eggs: Vec<EggTypeCounter>,
    pub batches: Vec<Batch>,
    pub selection: Selection,
    pub collection_mode: CollectionMode,
}

/// What a successful mutation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    BatchAdded(String),
    BatchUpdated(String),
    BatchDeleted(String),
    BatchActivated(String),
    AviaryAdded { batch_id: String, aviary_id: String },
    AviaryUpdated { batch_id: String, aviary_id: String },
    AviaryDeleted { batch_id: String, aviary_id: String },
    EggCountUpdated { id: String, count: u32 },
    EggCountCleared(String),
    EggCountsCleared,
    SelectionChanged(Selection),
    CollectionModeChanged(CollectionMode),
    AviariesImported { batches_created: usize, aviaries: usize },
}

/// Batches shipped with a fresh install.
pub fn default_batches() -> Vec<Batch> {
    vec![
        Batch::new("Lote 1")
            .with_id("1")
            .with_active(true)
            .with_aviaries(vec![
                Aviary::new("1", "Aviário 1"),
                Aviary::new("2", "Aviário 2"),
                Aviary::new("3", "Aviário 3"),
            ]),
        Batch::new("Lote 2")
            .with_id("2")
            .with_aviaries(vec![Aviary::new("1", "Aviário 1")]),
    ]
}

/// Single source of truth for batches, aviaries and category tallies.
///
/// Every mutation is validated first and leaves the state untouched on error.
/// Successful mutations write the affected snapshots to storage; write
/// failures are logged and otherwise ignored.
pub struct StateStore<S: KeyValueStore> {
    storage: S,
    options: StoreOptions,
    eggs: Vec<EggTypeCounter>,
    batches: Vec<Batch>,
    selection: Selection,
    collection_mode: CollectionMode,
}

impl<S: KeyValueStore> StateStore<S> {
    /// Loads state from storage, falling back to defaults for missing or unreadable snapshots.
    ///
    /// Saved selection ids are restored when they still point at an existing
    /// batch/aviary pair; otherwise the active batch (or the first one) and its
    /// first aviary are selected.
    pub fn load(storage: S, options: StoreOptions) -> Result<Self, StorageError> {
        let eggs = read_snapshot(&storage, SnapshotKey::Eggs)?.unwrap_or_else(default_catalog);
        let batches: Vec<Batch> =
            read_snapshot(&storage, SnapshotKey::Batches)?.unwrap_or_else(default_batches);
        let settings: Settings =
            read_snapshot(&storage, SnapshotKey::EggSettings)?.unwrap_or_default();

        let mut store = Self {
            storage,
            options,
            eggs,
            batches,
            selection: Selection::default(),
            collection_mode: settings.collection_mode,
        };
        store.restore_selection(&settings);

        tracing::debug!(
            "Loaded {} categories and {} batches",
            store.eggs.len(),
            store.batches.len()
        );
        Ok(store)
    }

    // Read access

    pub fn eggs(&self) -> &[EggTypeCounter] {
        &self.eggs
    }

    pub fn egg(&self, id: &str) -> Option<&EggTypeCounter> {
        self.eggs.iter().find(|e| e.id == id)
    }

    pub fn batches(&self) -> &[Batch] {
        &self.batches
    }

    pub fn batch(&self, id: &str) -> Option<&Batch> {
        self.batches.iter().find(|b| b.id == id)
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selected_batch(&self) -> Option<&Batch> {
        self.selection
            .batch_id
            .as_deref()
            .and_then(|id| self.batch(id))
    }

    /// Like [`selected_batch`](Self::selected_batch), but an error when nothing is selected.
    pub fn require_selected_batch(&self) -> Result<&Batch, StateError> {
        self.selected_batch().ok_or(StateError::NoBatchSelected)
    }

    pub fn selected_aviary(&self) -> Option<&Aviary> {
        let aviary_id = self.selection.aviary_id.as_deref()?;
        self.selected_batch()?.aviary(aviary_id)
    }

    pub fn selected_egg(&self) -> Option<&EggTypeCounter> {
        self.selection.egg_id.as_deref().and_then(|id| self.egg(id))
    }

    pub fn collection_mode(&self) -> CollectionMode {
        self.collection_mode
    }

    /// Tray value used for counting right now.
    pub fn tray_value(&self) -> u32 {
        self.selected_aviary()
            .map(|a| a.tray_value)
            .unwrap_or(self.options.default_tray_value)
    }

    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            eggs: self.eggs.clone(),
            batches: self.batches.clone(),
            selection: self.selection.clone(),
            collection_mode: self.collection_mode,
        }
    }

    // Batches

    /// Appends a batch. Ids are taken as given.
    pub fn add_batch(&mut self, batch: Batch) -> Result<Change, StateError> {
        validate_batch(&batch)?;

        let id = batch.id.clone();
        self.batches.push(batch);
        self.persist_batches();

        Ok(Change::BatchAdded(id))
    }

    /// Replaces the batch with the same id.
    pub fn update_batch(&mut self, batch: Batch) -> Result<Change, StateError> {
        validate_batch(&batch)?;

        let slot = self
            .batches
            .iter_mut()
            .find(|b| b.id == batch.id)
            .ok_or_else(|| StateError::BatchNotFound(batch.id.clone()))?;

        let id = batch.id.clone();
        *slot = batch;
        self.persist_batches();

        if self.is_selected_batch(&id) {
            self.revalidate_selected_aviary();
            self.persist_settings();
        }

        Ok(Change::BatchUpdated(id))
    }

    /// Removes a batch. The last remaining batch cannot be deleted.
    pub fn delete_batch(&mut self, id: &str) -> Result<Change, StateError> {
        let index = self
            .batches
            .iter()
            .position(|b| b.id == id)
            .ok_or_else(|| StateError::BatchNotFound(id.to_string()))?;

        if self.batches.len() <= 1 {
            return Err(StateError::LastBatch);
        }

        self.batches.remove(index);
        self.persist_batches();

        if self.is_selected_batch(id) {
            let first = self.batches.first();
            self.selection.batch_id = first.map(|b| b.id.clone());
            self.selection.aviary_id =
                first.and_then(|b| b.aviaries.first().map(|a| a.id.clone()));
            self.persist_settings();
        }

        Ok(Change::BatchDeleted(id.to_string()))
    }

    /// Makes `id` the only active batch and selects it with its first aviary.
    pub fn activate_batch(&mut self, id: &str) -> Result<Change, StateError> {
        if self.batch(id).is_none() {
            return Err(StateError::BatchNotFound(id.to_string()));
        }

        for batch in self.batches.iter_mut().filter(|b| b.id != id) {
            batch.active = false;
        }
        if let Some(batch) = self.batches.iter_mut().find(|b| b.id == id) {
            batch.active = true;
        }
        self.persist_batches();

        self.selection.batch_id = Some(id.to_string());
        self.selection.aviary_id = self
            .batch(id)
            .and_then(|b| b.aviaries.first())
            .map(|a| a.id.clone());
        self.persist_settings();

        tracing::info!("Activated batch {}", id);
        Ok(Change::BatchActivated(id.to_string()))
    }

    // Aviaries

    pub fn add_aviary(&mut self, batch_id: &str, aviary: Aviary) -> Result<Change, StateError> {
        validate_aviary(&aviary)?;

        let batch = self.batch_mut(batch_id)?;
        let aviary_id = aviary.id.clone();
        batch.aviaries.push(aviary);
        self.persist_batches();

        Ok(Change::AviaryAdded {
            batch_id: batch_id.to_string(),
            aviary_id,
        })
    }

    pub fn update_aviary(&mut self, batch_id: &str, aviary: Aviary) -> Result<Change, StateError> {
        validate_aviary(&aviary)?;

        let batch = self.batch_mut(batch_id)?;
        let slot = batch
            .aviaries
            .iter_mut()
            .find(|a| a.id == aviary.id)
            .ok_or_else(|| StateError::AviaryNotFound {
                batch_id: batch_id.to_string(),
                aviary_id: aviary.id.clone(),
            })?;

        let aviary_id = aviary.id.clone();
        *slot = aviary;
        self.persist_batches();

        Ok(Change::AviaryUpdated {
            batch_id: batch_id.to_string(),
            aviary_id,
        })
    }

    /// Removes an aviary. The last aviary of a batch cannot be deleted.
    pub fn delete_aviary(&mut self, batch_id: &str, aviary_id: &str) -> Result<Change, StateError> {
        let batch = self.batch_mut(batch_id)?;

        let index = batch
            .aviaries
            .iter()
            .position(|a| a.id == aviary_id)
            .ok_or_else(|| StateError::AviaryNotFound {
                batch_id: batch_id.to_string(),
                aviary_id: aviary_id.to_string(),
            })?;

        if batch.aviaries.len() <= 1 {
            return Err(StateError::LastAviary(batch_id.to_string()));
        }

        batch.aviaries.remove(index);
        self.persist_batches();

        if self.is_selected_batch(batch_id)
            && self.selection.aviary_id.as_deref() == Some(aviary_id)
        {
            self.revalidate_selected_aviary();
            self.persist_settings();
        }

        Ok(Change::AviaryDeleted {
            batch_id: batch_id.to_string(),
            aviary_id: aviary_id.to_string(),
        })
    }

    /// Merges backend aviaries into local batches, keyed by the backend batch id.
    ///
    /// Existing aviaries keep their local tray value; new ones get the default.
    pub fn import_remote_aviaries(&mut self, remote: &[AviaryDto]) -> Change {
        let default_tray_value = self.options.default_tray_value;
        let mut batches_created = 0;

        for dto in remote {
            let batch_id = dto.batch_id.to_string();
            let aviary_id = dto.id.to_string();
            let name = if dto.name.trim().is_empty() {
                format!("Aviário {}", aviary_id)
            } else {
                dto.name.clone()
            };

            let batch = match self.batches.iter().position(|b| b.id == batch_id) {
                Some(index) => &mut self.batches[index],
                None => {
                    batches_created += 1;
                    self.batches.push(
                        Batch::new(format!("Lote {}", batch_id))
                            .with_id(batch_id.clone())
                            .with_aviaries(Vec::new()),
                    );
                    let last = self.batches.len() - 1;
                    &mut self.batches[last]
                }
            };

            match batch.aviaries.iter_mut().find(|a| a.id == aviary_id) {
                Some(existing) => existing.name = name,
                None => batch.aviaries.push(
                    Aviary::new(aviary_id, name).with_tray_value(default_tray_value),
                ),
            }
        }

        if !remote.is_empty() {
            self.persist_batches();
            if self.selected_batch().is_none() {
                self.select_default();
            } else {
                self.revalidate_selected_aviary();
            }
            self.persist_settings();
        }

        tracing::info!(
            "Imported {} aviaries ({} new batches)",
            remote.len(),
            batches_created
        );
        Change::AviariesImported {
            batches_created,
            aviaries: remote.len(),
        }
    }

    // Category tallies

    /// Stores an entry for a category and recomputes its total with the current tray value.
    pub fn update_egg_count(
        &mut self,
        id: &str,
        trays: u32,
        units: u32,
    ) -> Result<Change, StateError> {
        let tray_value = self.tray_value();
        let egg = self
            .eggs
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| StateError::CategoryNotFound(id.to_string()))?;

        egg.record(trays, units, tray_value);
        let count = egg.count;
        self.persist_eggs();

        Ok(Change::EggCountUpdated {
            id: id.to_string(),
            count,
        })
    }

    pub fn clear_egg_count(&mut self, id: &str) -> Result<Change, StateError> {
        let egg = self
            .eggs
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| StateError::CategoryNotFound(id.to_string()))?;

        egg.reset();
        self.persist_eggs();

        Ok(Change::EggCountCleared(id.to_string()))
    }

    pub fn clear_all_egg_counts(&mut self) -> Change {
        for egg in &mut self.eggs {
            egg.reset();
        }
        self.persist_eggs();

        Change::EggCountsCleared
    }

    // Selection and settings

    /// Selects a batch. The selected aviary is kept when it belongs to the
    /// batch, otherwise the batch's first aviary is selected.
    pub fn set_selected_batch(&mut self, id: Option<&str>) -> Result<Change, StateError> {
        match id {
            None => {
                self.selection.batch_id = None;
                self.selection.aviary_id = None;
            }
            Some(id) => {
                let batch = self
                    .batch(id)
                    .ok_or_else(|| StateError::BatchNotFound(id.to_string()))?;

                let aviary_id = self
                    .selection
                    .aviary_id
                    .as_deref()
                    .filter(|aviary_id| self.is_selected_batch(id) && batch.has_aviary(aviary_id))
                    .map(str::to_string)
                    .or_else(|| batch.aviaries.first().map(|a| a.id.clone()));

                self.selection.batch_id = Some(id.to_string());
                self.selection.aviary_id = aviary_id;
            }
        }
        self.persist_settings();

        Ok(Change::SelectionChanged(self.selection.clone()))
    }

    /// Selects an aviary of the selected batch.
    pub fn set_selected_aviary(&mut self, id: Option<&str>) -> Result<Change, StateError> {
        if let Some(id) = id {
            let batch = self.require_selected_batch()?;
            if !batch.has_aviary(id) {
                return Err(StateError::AviaryNotInBatch(id.to_string()));
            }
        }

        self.selection.aviary_id = id.map(str::to_string);
        self.persist_settings();

        Ok(Change::SelectionChanged(self.selection.clone()))
    }

    /// Selects the category being edited. Not persisted.
    pub fn set_selected_egg(&mut self, id: Option<&str>) -> Result<Change, StateError> {
        if let Some(id) = id {
            if self.egg(id).is_none() {
                return Err(StateError::CategoryNotFound(id.to_string()));
            }
        }

        self.selection.egg_id = id.map(str::to_string);
        Ok(Change::SelectionChanged(self.selection.clone()))
    }

    pub fn set_collection_mode(&mut self, mode: CollectionMode) -> Change {
        self.collection_mode = mode;
        self.persist_settings();
        Change::CollectionModeChanged(mode)
    }

    // Internals

    fn batch_mut(&mut self, id: &str) -> Result<&mut Batch, StateError> {
        self.batches
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| StateError::BatchNotFound(id.to_string()))
    }

    fn is_selected_batch(&self, id: &str) -> bool {
        self.selection.batch_id.as_deref() == Some(id)
    }

    /// Falls back to the first aviary of the selected batch (or none) when the
    /// selected aviary is no longer part of it. An empty selection is kept.
    fn revalidate_selected_aviary(&mut self) {
        let Some(batch) = self.selected_batch() else {
            self.selection.aviary_id = None;
            return;
        };

        // No aviary selected is a valid state.
        let valid = match self.selection.aviary_id.as_deref() {
            Some(aviary_id) => batch.has_aviary(aviary_id),
            None => true,
        };
        let fallback = batch.aviaries.first().map(|a| a.id.clone());
        if !valid {
            self.selection.aviary_id = fallback;
        }
    }

    fn select_default(&mut self) {
        let batch = self
            .batches
            .iter()
            .find(|b| b.active)
            .or_else(|| self.batches.first());

        self.selection.batch_id = batch.map(|b| b.id.clone());
        self.selection.aviary_id = batch.and_then(|b| b.aviaries.first().map(|a| a.id.clone()));
    }

    fn restore_selection(&mut self, settings: &Settings) {
        let saved_batch = settings
            .selected_batch_id
            .as_deref()
            .and_then(|id| self.batch(id));

        let restored = saved_batch.map(|batch| {
            let aviary_id = settings
                .selected_aviary_id
                .as_deref()
                .filter(|id| batch.has_aviary(id))
                .map(str::to_string)
                .or_else(|| batch.aviaries.first().map(|a| a.id.clone()));
            (batch.id.clone(), aviary_id)
        });

        match restored {
            Some((batch_id, aviary_id)) => {
                self.selection.batch_id = Some(batch_id);
                self.selection.aviary_id = aviary_id;
            }
            None => self.select_default(),
        }
    }

    fn persist_eggs(&self) {
        self.persist(SnapshotKey::Eggs, &self.eggs);
    }

    fn persist_batches(&self) {
        self.persist(SnapshotKey::Batches, &self.batches);
    }

    fn persist_settings(&self) {
        let settings = Settings {
            collection_mode: self.collection_mode,
            selected_batch_id: self.selection.batch_id.clone(),
            selected_aviary_id: self.selection.aviary_id.clone(),
        };
        self.persist(SnapshotKey::EggSettings, &settings);
    }

    fn persist<T: Serialize + ?Sized>(&self, key: SnapshotKey, value: &T) {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("Failed to serialize snapshot '{}': {}", key.key(), e);
                return;
            }
        };

        if let Err(e) = self.storage.set(key.key(), &json) {
            tracing::warn!("Failed to persist snapshot '{}': {}", key.key(), e);
        }
    }
}

fn read_snapshot<S: KeyValueStore, T: DeserializeOwned>(
    storage: &S,
    key: SnapshotKey,
) -> Result<Option<T>, StorageError> {
    let Some(raw) = storage.get(key.key())? else {
        return Ok(None);
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            tracing::warn!(
                "{}; using defaults",
                StorageError::SerializationError(key.key().to_string(), e)
            );
            Ok(None)
        }
    }
}

fn validate_name(name: &str) -> Result<(), StateError> {
    if name.trim().is_empty() {
        return Err(StateError::EmptyName);
    }
    Ok(())
}

fn validate_aviary(aviary: &Aviary) -> Result<(), StateError> {
    validate_name(&aviary.name)?;
    if aviary.tray_value == 0 {
        return Err(StateError::InvalidTrayValue(aviary.id.clone()));
    }
    Ok(())
}

fn validate_batch(batch: &Batch) -> Result<(), StateError> {
    validate_name(&batch.name)?;
    batch.aviaries.iter().try_for_each(validate_aviary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileStore, MemoryStore};
    use std::io;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn test_store() -> StateStore<MemoryStore> {
        StateStore::load(MemoryStore::new(), StoreOptions::default()).unwrap()
    }

    fn stored<T: DeserializeOwned>(store: &StateStore<MemoryStore>, key: SnapshotKey) -> T {
        let raw = store.storage.get(key.key()).unwrap().unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    /// Storage whose writes always fail.
    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn set(&self, key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::IoError(
                PathBuf::from(format!("{}.json", key)),
                io::Error::new(io::ErrorKind::PermissionDenied, "read-only"),
            ))
        }
    }

    fn remote_aviary(id: i64, name: &str, batch_id: i64) -> AviaryDto {
        AviaryDto {
            id,
            name: name.to_string(),
            initial_amount_of_roosters: 0,
            initial_amount_of_chickens: 0,
            current_amount_of_rooster: 0,
            current_amount_of_chickens: 0,
            batch_id,
        }
    }

    #[test]
    fn test_load_defaults() {
        let store = test_store();

        assert_eq!(store.eggs().len(), 11);
        assert_eq!(store.batches().len(), 2);
        assert_eq!(store.selection().batch_id.as_deref(), Some("1"));
        assert_eq!(store.selection().aviary_id.as_deref(), Some("1"));
        assert_eq!(store.collection_mode(), CollectionMode::Trays);
        assert!(store.selected_egg().is_none());
    }

    #[test]
    fn test_load_restores_saved_selection() {
        let storage = MemoryStore::new();
        storage
            .set(
                "eggSettings",
                r#"{"collectionMode":"units","selectedBatchId":"1","selectedAviaryId":"3"}"#,
            )
            .unwrap();

        let store = StateStore::load(storage, StoreOptions::default()).unwrap();
        assert_eq!(store.selection().batch_id.as_deref(), Some("1"));
        assert_eq!(store.selection().aviary_id.as_deref(), Some("3"));
        assert_eq!(store.collection_mode(), CollectionMode::Units);
    }

    #[test]
    fn test_load_ignores_stale_selection() {
        let storage = MemoryStore::new();
        storage
            .set(
                "eggSettings",
                r#"{"selectedBatchId":"2","selectedAviaryId":"3"}"#,
            )
            .unwrap();

        let store = StateStore::load(storage, StoreOptions::default()).unwrap();
        assert_eq!(store.selection().batch_id.as_deref(), Some("2"));
        assert_eq!(store.selection().aviary_id.as_deref(), Some("1"));
    }

    #[test]
    fn test_load_unparsable_snapshot_uses_defaults() {
        let storage = MemoryStore::new();
        storage.set("batches", "{not json").unwrap();

        let store = StateStore::load(storage, StoreOptions::default()).unwrap();
        assert_eq!(store.batches(), default_batches().as_slice());
    }

    #[test]
    fn test_state_survives_reload_from_disk() {
        let temp_dir = TempDir::new().unwrap();

        {
            let mut store = StateStore::load(
                FileStore::new(temp_dir.path().to_path_buf()),
                StoreOptions::default(),
            )
            .unwrap();
            store.activate_batch("2").unwrap();
            store.update_egg_count("3", 1, 2).unwrap();
            store.set_collection_mode(CollectionMode::Units);
        }

        let store = StateStore::load(
            FileStore::new(temp_dir.path().to_path_buf()),
            StoreOptions::default(),
        )
        .unwrap();
        assert!(store.batch("2").unwrap().active);
        assert!(!store.batch("1").unwrap().active);
        assert_eq!(store.selection().batch_id.as_deref(), Some("2"));
        assert_eq!(store.egg("3").unwrap().count, 32);
        assert_eq!(store.collection_mode(), CollectionMode::Units);
    }

    #[test]
    fn test_failed_writes_keep_in_memory_changes() {
        let mut store = StateStore::load(ReadOnlyStore, StoreOptions::default()).unwrap();

        let change = store.update_egg_count("3", 2, 5).unwrap();
        assert_eq!(
            change,
            Change::EggCountUpdated {
                id: "3".to_string(),
                count: 65
            }
        );
        assert_eq!(store.egg("3").unwrap().count, 65);

        store.add_batch(Batch::new("Lote 3").with_id("3")).unwrap();
        assert_eq!(store.batches().len(), 3);
        assert!(store.batch("3").is_some());

        store.set_collection_mode(CollectionMode::Units);
        assert_eq!(store.collection_mode(), CollectionMode::Units);
    }

    #[test]
    fn test_add_batch_persists() {
        let mut store = test_store();
        let batch = Batch::new("Lote 3").with_id("3");

        let change = store.add_batch(batch).unwrap();
        assert_eq!(change, Change::BatchAdded("3".to_string()));

        let saved: Vec<Batch> = stored(&store, SnapshotKey::Batches);
        assert_eq!(saved.len(), 3);
        assert_eq!(saved[2].name, "Lote 3");
    }

    #[test]
    fn test_add_batch_rejects_empty_name() {
        let mut store = test_store();
        let result = store.add_batch(Batch::new("   "));

        assert_eq!(result, Err(StateError::EmptyName));
        assert_eq!(store.batches().len(), 2);
    }

    #[test]
    fn test_update_selected_batch_falls_back_to_first_aviary() {
        let mut store = test_store();
        store.set_selected_aviary(Some("3")).unwrap();

        let mut batch = store.batch("1").unwrap().clone();
        batch.aviaries.retain(|a| a.id != "3");
        store.update_batch(batch).unwrap();

        assert_eq!(store.selection().aviary_id.as_deref(), Some("1"));
        let settings: Settings = stored(&store, SnapshotKey::EggSettings);
        assert_eq!(settings.selected_aviary_id.as_deref(), Some("1"));
    }

    #[test]
    fn test_update_selected_batch_without_aviaries_clears_aviary() {
        let mut store = test_store();
        let batch = store.batch("1").unwrap().clone().with_aviaries(Vec::new());

        store.update_batch(batch).unwrap();
        assert_eq!(store.selection().aviary_id, None);
        assert!(store.selected_aviary().is_none());
    }

    #[test]
    fn test_cleared_aviary_selection_survives_batch_and_aviary_changes() {
        let mut store = test_store();
        store.set_selected_aviary(None).unwrap();

        let renamed = Batch {
            name: "Lote Principal".to_string(),
            ..store.batch("1").unwrap().clone()
        };
        store.update_batch(renamed).unwrap();
        assert_eq!(store.selection().aviary_id, None);

        store
            .add_aviary("1", Aviary::new("4", "Aviário 4"))
            .unwrap();
        assert_eq!(store.selection().aviary_id, None);

        store.import_remote_aviaries(&[remote_aviary(9, "Galpão 9", 1)]);
        assert_eq!(store.selection().aviary_id, None);
        assert!(store.selected_aviary().is_none());

        let settings: Settings = stored(&store, SnapshotKey::EggSettings);
        assert_eq!(settings.selected_aviary_id, None);
    }

    #[test]
    fn test_update_unknown_batch() {
        let mut store = test_store();
        let result = store.update_batch(Batch::new("Ghost").with_id("99"));
        assert_eq!(result, Err(StateError::BatchNotFound("99".to_string())));
    }

    #[test]
    fn test_delete_last_batch_rejected() {
        let mut store = test_store();
        store.delete_batch("2").unwrap();

        let before = store.batches().to_vec();
        assert_eq!(store.delete_batch("1"), Err(StateError::LastBatch));
        assert_eq!(store.batches(), before.as_slice());
    }

    #[test]
    fn test_delete_selected_batch_selects_first_remaining() {
        let mut store = test_store();
        store.delete_batch("1").unwrap();

        assert_eq!(store.selection().batch_id.as_deref(), Some("2"));
        assert_eq!(store.selection().aviary_id.as_deref(), Some("1"));
    }

    #[test]
    fn test_delete_unselected_batch_keeps_selection() {
        let mut store = test_store();
        store.set_selected_aviary(Some("2")).unwrap();
        store.delete_batch("2").unwrap();

        assert_eq!(store.selection().batch_id.as_deref(), Some("1"));
        assert_eq!(store.selection().aviary_id.as_deref(), Some("2"));
    }

    #[test]
    fn test_activate_batch_is_exclusive() {
        let mut store = test_store();
        store.add_batch(Batch::new("Lote 3").with_id("3")).unwrap();
        // Two active batches can exist after a raw update; activation repairs it.
        let forced = store.batch("3").unwrap().clone().with_active(true);
        store.update_batch(forced).unwrap();

        store.activate_batch("2").unwrap();

        let active: Vec<&str> = store
            .batches()
            .iter()
            .filter(|b| b.active)
            .map(|b| b.id.as_str())
            .collect();
        assert_eq!(active, vec!["2"]);
        assert_eq!(store.selection().batch_id.as_deref(), Some("2"));
        assert_eq!(store.selection().aviary_id.as_deref(), Some("1"));
    }

    #[test]
    fn test_activate_unknown_batch() {
        let mut store = test_store();
        assert_eq!(
            store.activate_batch("42"),
            Err(StateError::BatchNotFound("42".to_string()))
        );
        assert!(store.batch("1").unwrap().active);
    }

    #[test]
    fn test_add_aviary() {
        let mut store = test_store();
        let next = store.batch("2").unwrap().next_aviary_id();
        store
            .add_aviary("2", Aviary::new(next, "Aviário 2").with_tray_value(20))
            .unwrap();

        let batch = store.batch("2").unwrap();
        assert_eq!(batch.aviaries.len(), 2);
        assert_eq!(batch.aviaries[1].id, "2");
        assert_eq!(batch.aviaries[1].tray_value, 20);
    }

    #[test]
    fn test_add_aviary_rejects_zero_tray_value() {
        let mut store = test_store();
        let result = store.add_aviary("1", Aviary::new("9", "Bad").with_tray_value(0));

        assert_eq!(result, Err(StateError::InvalidTrayValue("9".to_string())));
        assert_eq!(store.batch("1").unwrap().aviaries.len(), 3);
    }

    #[test]
    fn test_update_aviary_changes_tray_value_used_for_counting() {
        let mut store = test_store();
        store
            .update_aviary("1", Aviary::new("1", "Aviário 1").with_tray_value(12))
            .unwrap();

        assert_eq!(store.tray_value(), 12);
        store.update_egg_count("3", 2, 1).unwrap();
        assert_eq!(store.egg("3").unwrap().count, 25);
    }

    #[test]
    fn test_update_unknown_aviary() {
        let mut store = test_store();
        let result = store.update_aviary("2", Aviary::new("5", "Nope"));
        assert_eq!(
            result,
            Err(StateError::AviaryNotFound {
                batch_id: "2".to_string(),
                aviary_id: "5".to_string(),
            })
        );
    }

    #[test]
    fn test_delete_last_aviary_rejected() {
        let mut store = test_store();
        let before = store.batch("2").unwrap().aviaries.clone();

        assert_eq!(
            store.delete_aviary("2", "1"),
            Err(StateError::LastAviary("2".to_string()))
        );
        assert_eq!(store.batch("2").unwrap().aviaries, before);
    }

    #[test]
    fn test_delete_selected_aviary_falls_back() {
        let mut store = test_store();
        store.delete_aviary("1", "1").unwrap();

        assert_eq!(store.selection().aviary_id.as_deref(), Some("2"));
        assert_eq!(store.batch("1").unwrap().aviaries.len(), 2);
    }

    #[test]
    fn test_delete_same_aviary_id_in_other_batch_keeps_selection() {
        let mut store = test_store();
        store
            .add_aviary("2", Aviary::new("2", "Aviário 2"))
            .unwrap();
        store.delete_aviary("2", "1").unwrap();

        assert_eq!(store.selection().batch_id.as_deref(), Some("1"));
        assert_eq!(store.selection().aviary_id.as_deref(), Some("1"));
    }

    #[test]
    fn test_update_egg_count_formula() {
        let mut store = test_store();

        let change = store.update_egg_count("3", 2, 5).unwrap();
        assert_eq!(
            change,
            Change::EggCountUpdated {
                id: "3".to_string(),
                count: 65
            }
        );

        store.update_egg_count("1", 4, 3).unwrap();
        let male = store.egg("1").unwrap();
        assert_eq!((male.trays, male.units, male.count), (4, 3, 3));

        let saved: Vec<EggTypeCounter> = stored(&store, SnapshotKey::Eggs);
        assert_eq!(saved[2].count, 65);
    }

    #[test]
    fn test_update_egg_count_uses_configured_default_without_aviary() {
        let mut store = StateStore::load(
            MemoryStore::new(),
            StoreOptions {
                default_tray_value: 24,
            },
        )
        .unwrap();
        store.set_selected_aviary(None).unwrap();

        store.update_egg_count("4", 1, 1).unwrap();
        assert_eq!(store.egg("4").unwrap().count, 25);
    }

    #[test]
    fn test_update_unknown_category() {
        let mut store = test_store();
        assert_eq!(
            store.update_egg_count("12", 1, 1),
            Err(StateError::CategoryNotFound("12".to_string()))
        );
    }

    #[test]
    fn test_clear_all_egg_counts() {
        let mut store = test_store();
        store.update_egg_count("1", 0, 3).unwrap();
        store.update_egg_count("3", 2, 5).unwrap();
        store.update_egg_count("11", 0, 10).unwrap();

        assert_eq!(store.clear_all_egg_counts(), Change::EggCountsCleared);
        assert!(store
            .eggs()
            .iter()
            .all(|e| e.trays == 0 && e.units == 0 && e.count == 0));

        let saved: Vec<EggTypeCounter> = stored(&store, SnapshotKey::Eggs);
        assert!(saved.iter().all(|e| !e.has_entry()));
    }

    #[test]
    fn test_select_batch_picks_first_aviary() {
        let mut store = test_store();
        store.set_selected_aviary(Some("3")).unwrap();

        store.set_selected_batch(Some("2")).unwrap();
        assert_eq!(store.selection().aviary_id.as_deref(), Some("1"));

        store.set_selected_batch(None).unwrap();
        assert_eq!(store.selection().batch_id, None);
        assert_eq!(store.selection().aviary_id, None);
    }

    #[test]
    fn test_reselect_same_batch_keeps_aviary() {
        let mut store = test_store();
        store.set_selected_aviary(Some("2")).unwrap();
        store.set_selected_batch(Some("1")).unwrap();
        assert_eq!(store.selection().aviary_id.as_deref(), Some("2"));
    }

    #[test]
    fn test_select_aviary_outside_batch_rejected() {
        let mut store = test_store();
        store.set_selected_batch(Some("2")).unwrap();

        assert_eq!(
            store.set_selected_aviary(Some("3")),
            Err(StateError::AviaryNotInBatch("3".to_string()))
        );
        assert_eq!(store.selection().aviary_id.as_deref(), Some("1"));
    }

    #[test]
    fn test_select_aviary_without_batch() {
        let mut store = test_store();
        store.set_selected_batch(None).unwrap();
        assert_eq!(
            store.set_selected_aviary(Some("1")),
            Err(StateError::NoBatchSelected)
        );
    }

    #[test]
    fn test_select_egg() {
        let mut store = test_store();
        store.set_selected_egg(Some("11")).unwrap();
        assert_eq!(store.selected_egg().unwrap().name, "Água");

        assert!(store.set_selected_egg(Some("0")).is_err());
        store.set_selected_egg(None).unwrap();
        assert!(store.selected_egg().is_none());
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut store = test_store();
        let before = store.snapshot();
        store.update_egg_count("3", 1, 0).unwrap();

        assert_eq!(before.eggs[2].count, 0);
        assert_eq!(store.snapshot().eggs[2].count, 30);
    }

    #[test]
    fn test_import_remote_aviaries() {
        let mut store = test_store();
        store
            .update_aviary("1", Aviary::new("2", "Aviário 2").with_tray_value(18))
            .unwrap();

        let change = store.import_remote_aviaries(&[
            remote_aviary(2, "Galpão Norte", 1),
            remote_aviary(7, "Galpão Sul", 1),
            remote_aviary(8, "", 5),
        ]);

        assert_eq!(
            change,
            Change::AviariesImported {
                batches_created: 1,
                aviaries: 3
            }
        );

        let batch = store.batch("1").unwrap();
        let existing = batch.aviary("2").unwrap();
        assert_eq!(existing.name, "Galpão Norte");
        assert_eq!(existing.tray_value, 18);
        assert_eq!(batch.aviary("7").unwrap().tray_value, 30);

        let created = store.batch("5").unwrap();
        assert_eq!(created.name, "Lote 5");
        assert!(!created.active);
        assert_eq!(created.aviaries, vec![Aviary::new("8", "Aviário 8")]);
    }

    #[test]
    fn test_import_nothing_is_noop() {
        let mut store = test_store();
        let before = store.snapshot();
        store.import_remote_aviaries(&[]);
        assert_eq!(store.snapshot(), before);
        assert!(store.storage.is_empty());
    }
}
