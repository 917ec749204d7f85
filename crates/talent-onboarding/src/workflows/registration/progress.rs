use std::sync::Arc;

use tracing::warn;

use super::domain::{ApplicantId, ApplicantRole, ProgressRecord, Step};
use crate::storage::{KeyValueStore, StorageError};

/// Durable `{applicant_id, current_step}` persistence for one registration flow.
pub trait ProgressStore: Send + Sync {
    /// Last persisted record, or the fresh default when nothing usable is stored.
    fn load(&self) -> ProgressRecord;
    fn save(&self, record: &ProgressRecord) -> Result<(), StorageError>;
    fn clear(&self) -> Result<(), StorageError>;
}

/// Progress kept in the shared key-value space under role-scoped keys
/// (`model_id` / `model_current_step`, `hostess_id` / `hostess_current_step`).
#[derive(Debug)]
pub struct LocalProgressStore<K> {
    storage: Arc<K>,
    id_key: String,
    step_key: String,
}

impl<K: KeyValueStore> LocalProgressStore<K> {
    pub fn new(storage: Arc<K>, role: ApplicantRole) -> Self {
        Self {
            storage,
            id_key: role.id_field().to_string(),
            step_key: format!("{}_current_step", role.label()),
        }
    }

    pub fn keys(&self) -> (&str, &str) {
        (&self.id_key, &self.step_key)
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.storage.get(key) {
            Ok(value) => value,
            Err(err) => {
                warn!(key, error = %err, "progress storage unreadable; treating as empty");
                None
            }
        }
    }
}

impl<K: KeyValueStore> ProgressStore for LocalProgressStore<K> {
    fn load(&self) -> ProgressRecord {
        let Some(raw_step) = self.read(&self.step_key) else {
            return ProgressRecord::default();
        };

        let Some(step) = raw_step
            .trim()
            .parse::<u8>()
            .ok()
            .and_then(Step::from_number)
        else {
            warn!(value = %raw_step, "stored step outside 1..=4; starting fresh");
            return ProgressRecord::default();
        };

        let applicant_id = self
            .read(&self.id_key)
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .map(ApplicantId);

        ProgressRecord::new(applicant_id, step)
    }

    fn save(&self, record: &ProgressRecord) -> Result<(), StorageError> {
        match &record.applicant_id {
            Some(id) => self.storage.set(&self.id_key, id.as_str())?,
            None => self.storage.remove(&self.id_key)?,
        }
        self.storage
            .set(&self.step_key, &record.current_step.number().to_string())
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.storage.remove(&self.id_key)?;
        self.storage.remove(&self.step_key)
    }
}

impl<P: ProgressStore + ?Sized> ProgressStore for Arc<P> {
    fn load(&self) -> ProgressRecord {
        (**self).load()
    }

    fn save(&self, record: &ProgressRecord) -> Result<(), StorageError> {
        (**self).save(record)
    }

    fn clear(&self) -> Result<(), StorageError> {
        (**self).clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryKeyValueStore;

    fn store(role: ApplicantRole) -> (Arc<MemoryKeyValueStore>, LocalProgressStore<MemoryKeyValueStore>) {
        let storage = Arc::new(MemoryKeyValueStore::default());
        let progress = LocalProgressStore::new(storage.clone(), role);
        (storage, progress)
    }

    #[test]
    fn load_defaults_when_nothing_stored() {
        let (_, progress) = store(ApplicantRole::Model);
        assert_eq!(progress.load(), ProgressRecord::default());
    }

    #[test]
    fn save_writes_string_values_under_role_keys() {
        let (storage, progress) = store(ApplicantRole::Hostess);
        progress
            .save(&ProgressRecord::new(
                Some(ApplicantId("42".to_string())),
                Step::Profile,
            ))
            .expect("save succeeds");

        let snapshot = storage.snapshot();
        assert_eq!(snapshot.get("hostess_id").map(String::as_str), Some("42"));
        assert_eq!(
            snapshot.get("hostess_current_step").map(String::as_str),
            Some("2")
        );
        assert_eq!(
            progress.load(),
            ProgressRecord::new(Some(ApplicantId("42".to_string())), Step::Profile)
        );
    }

    #[test]
    fn out_of_range_step_loads_as_default() {
        let (storage, progress) = store(ApplicantRole::Model);
        storage.set("model_id", "7").expect("set");
        storage.set("model_current_step", "9").expect("set");
        assert_eq!(progress.load(), ProgressRecord::default());

        storage.set("model_current_step", "two").expect("set");
        assert_eq!(progress.load(), ProgressRecord::default());
    }

    #[test]
    fn flows_do_not_share_progress() {
        let storage = Arc::new(MemoryKeyValueStore::default());
        let model = LocalProgressStore::new(storage.clone(), ApplicantRole::Model);
        let hostess = LocalProgressStore::new(storage, ApplicantRole::Hostess);

        model
            .save(&ProgressRecord::new(
                Some(ApplicantId("m-1".to_string())),
                Step::Documents,
            ))
            .expect("save");

        assert_eq!(hostess.load(), ProgressRecord::default());
        assert_eq!(model.load().current_step, Step::Documents);
    }

    #[test]
    fn clear_removes_both_keys() {
        let (storage, progress) = store(ApplicantRole::Model);
        progress
            .save(&ProgressRecord::new(
                Some(ApplicantId("1".to_string())),
                Step::IdentityCheck,
            ))
            .expect("save");
        progress.clear().expect("clear");
        assert!(storage.snapshot().is_empty());
        assert_eq!(progress.load(), ProgressRecord::default());
    }
}
