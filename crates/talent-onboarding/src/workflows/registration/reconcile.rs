use tracing::{debug, info, warn};

use super::domain::{ApplicantId, ProgressRecord, Step};
use super::gateway::RemoteProgress;
use super::progress::ProgressStore;
use crate::api::ApiError;
use crate::storage::StorageError;

/// Where the adopted progress came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressSource {
    Local,
    Remote,
    Fresh,
}

/// Outcome of mounting the wizard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    pub record: ProgressRecord,
    pub source: ProgressSource,
}

/// Chooses between locally cached and server-reported progress without ever moving a user
/// backwards.
#[derive(Debug)]
pub struct ProgressReconciler<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: ProgressStore + ?Sized> ProgressReconciler<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Phase one: the stored record, if it carries both an identifier and a step.
    pub fn adopt_local(&self) -> Option<ProgressRecord> {
        let record = self.store.load();
        if record.applicant_id.is_some() {
            debug!(step = record.current_step.number(), "adopting local progress");
            Some(record)
        } else {
            None
        }
    }

    /// Phase two: fold the remote answer into the local one and persist when it changes.
    ///
    /// A remote failure or missing record leaves local progress untouched.
    pub fn reconcile(
        &self,
        local: Option<ProgressRecord>,
        remote: Result<Option<RemoteProgress>, ApiError>,
    ) -> Result<Reconciliation, StorageError> {
        let remote = match remote {
            Ok(Some(progress)) => usable_remote(progress),
            Ok(None) => None,
            Err(err) => {
                warn!(error = %err, "remote progress unavailable; keeping local state");
                None
            }
        };

        let reconciliation = match (local, remote) {
            (Some(local), Some((remote_id, remote_step))) if remote_step > local.current_step => {
                info!(
                    local_step = local.current_step.number(),
                    remote_step = remote_step.number(),
                    "server reports further progress; adopting it"
                );
                let record = ProgressRecord::new(remote_id.or(local.applicant_id), remote_step);
                self.store.save(&record)?;
                Reconciliation {
                    record,
                    source: ProgressSource::Remote,
                }
            }
            (Some(local), _) => Reconciliation {
                record: local,
                source: ProgressSource::Local,
            },
            (None, Some((Some(remote_id), remote_step))) => {
                info!(step = remote_step.number(), "resuming from server progress");
                let record = ProgressRecord::new(Some(remote_id), remote_step);
                self.store.save(&record)?;
                Reconciliation {
                    record,
                    source: ProgressSource::Remote,
                }
            }
            (None, _) => Reconciliation {
                record: ProgressRecord::default(),
                source: ProgressSource::Fresh,
            },
        };

        Ok(reconciliation)
    }
}

fn usable_remote(progress: RemoteProgress) -> Option<(Option<ApplicantId>, Step)> {
    let step = u8::try_from(progress.current_step)
        .ok()
        .and_then(Step::from_number);
    match step {
        Some(step) => Some((progress.applicant_id, step)),
        None => {
            warn!(
                current_step = progress.current_step,
                "remote progress step outside 1..=4; ignoring"
            );
            None
        }
    }
}
