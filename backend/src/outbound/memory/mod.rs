//! In-memory adapters for every repository port.
//!
//! Used when no database is configured and by integration tests. One
//! [`InMemoryStore`] holds all tables behind a single mutex, so the atomic
//! create/delete contracts of `ChildRepository` hold trivially. Clones share
//! state.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::ports::{
    ChildRepository, ChildRepositoryError, DoseRecordRepository, DoseRecordRepositoryError,
    GuardianDirectory, GuardianDirectoryError, NotificationLogRepository,
    NotificationLogRepositoryError,
};
use crate::domain::{
    Child, ChildId, DoseRecord, DoseRecordId, DoseStatus, Guardian, GuardianId,
    NotificationLogEntry,
};

#[derive(Default)]
struct Tables {
    guardians: HashMap<GuardianId, Guardian>,
    // Insertion order doubles as enrolment order.
    children: Vec<Child>,
    doses: HashMap<DoseRecordId, DoseRecord>,
    log: Vec<NotificationLogEntry>,
    offline: bool,
}

/// Shared in-memory backing store.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a guardian account, replacing any with the same id.
    pub fn insert_guardian(&self, guardian: Guardian) {
        let mut tables = self.lock();
        tables.guardians.insert(guardian.id(), guardian);
    }

    /// Remove a guardian account, leaving their children in place.
    pub fn remove_guardian(&self, guardian_id: &GuardianId) {
        self.lock().guardians.remove(guardian_id);
    }

    /// Simulate an unreachable database: every port call fails with a
    /// connection error while set.
    pub fn set_offline(&self, offline: bool) {
        self.lock().offline = offline;
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        // Every mutation completes under one guard, so poisoned data is
        // still consistent.
        self.tables
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn online<E>(&self, offline: impl FnOnce() -> E) -> Result<MutexGuard<'_, Tables>, E> {
        let tables = self.lock();
        if tables.offline {
            return Err(offline());
        }
        Ok(tables)
    }
}

const OFFLINE: &str = "in-memory store is offline";

#[async_trait]
impl ChildRepository for InMemoryStore {
    async fn create_with_schedule(
        &self,
        child: &Child,
        schedule: &[DoseRecord],
    ) -> Result<(), ChildRepositoryError> {
        let mut tables = self.online(|| ChildRepositoryError::connection(OFFLINE))?;
        let duplicate_child = tables.children.iter().any(|c| c.id() == child.id());
        let duplicate_dose = schedule
            .iter()
            .any(|dose| tables.doses.contains_key(&dose.id()));
        if duplicate_child || duplicate_dose {
            return Err(ChildRepositoryError::query("duplicate record"));
        }
        tables.children.push(child.clone());
        for dose in schedule {
            tables.doses.insert(dose.id(), dose.clone());
        }
        Ok(())
    }

    async fn find_by_id(&self, child_id: &ChildId) -> Result<Option<Child>, ChildRepositoryError> {
        let tables = self.online(|| ChildRepositoryError::connection(OFFLINE))?;
        Ok(tables
            .children
            .iter()
            .find(|child| child.id() == *child_id)
            .cloned())
    }

    async fn list_for_guardian(
        &self,
        guardian_id: &GuardianId,
    ) -> Result<Vec<Child>, ChildRepositoryError> {
        let tables = self.online(|| ChildRepositoryError::connection(OFFLINE))?;
        Ok(tables
            .children
            .iter()
            .filter(|child| child.is_owned_by(*guardian_id))
            .cloned()
            .collect())
    }

    async fn save_profile(&self, child: &Child) -> Result<bool, ChildRepositoryError> {
        let mut tables = self.online(|| ChildRepositoryError::connection(OFFLINE))?;
        match tables.children.iter_mut().find(|c| c.id() == child.id()) {
            Some(stored) => {
                *stored = child.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_with_schedule(&self, child_id: &ChildId) -> Result<bool, ChildRepositoryError> {
        let mut tables = self.online(|| ChildRepositoryError::connection(OFFLINE))?;
        let before = tables.children.len();
        tables.children.retain(|child| child.id() != *child_id);
        if tables.children.len() == before {
            return Ok(false);
        }
        tables.doses.retain(|_, dose| dose.child_id() != *child_id);
        Ok(true)
    }
}

#[async_trait]
impl DoseRecordRepository for InMemoryStore {
    async fn list_for_child(
        &self,
        child_id: &ChildId,
    ) -> Result<Vec<DoseRecord>, DoseRecordRepositoryError> {
        let tables = self.online(|| DoseRecordRepositoryError::connection(OFFLINE))?;
        Ok(tables
            .doses
            .values()
            .filter(|dose| dose.child_id() == *child_id)
            .cloned()
            .collect())
    }

    async fn find_by_id(
        &self,
        dose_id: &DoseRecordId,
    ) -> Result<Option<DoseRecord>, DoseRecordRepositoryError> {
        let tables = self.online(|| DoseRecordRepositoryError::connection(OFFLINE))?;
        Ok(tables.doses.get(dose_id).cloned())
    }

    async fn save_status(&self, dose: &DoseRecord) -> Result<bool, DoseRecordRepositoryError> {
        let mut tables = self.online(|| DoseRecordRepositoryError::connection(OFFLINE))?;
        match tables.doses.get_mut(&dose.id()) {
            Some(stored) => {
                *stored = dose.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_pending_due_on(
        &self,
        due_date: NaiveDate,
    ) -> Result<Vec<DoseRecord>, DoseRecordRepositoryError> {
        let tables = self.online(|| DoseRecordRepositoryError::connection(OFFLINE))?;
        Ok(tables
            .doses
            .values()
            .filter(|dose| dose.status() == DoseStatus::Pending && dose.due_date() == due_date)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl GuardianDirectory for InMemoryStore {
    async fn find_by_id(
        &self,
        guardian_id: &GuardianId,
    ) -> Result<Option<Guardian>, GuardianDirectoryError> {
        let tables = self.online(|| GuardianDirectoryError::connection(OFFLINE))?;
        Ok(tables.guardians.get(guardian_id).cloned())
    }
}

fn newest_first(mut entries: Vec<NotificationLogEntry>) -> Vec<NotificationLogEntry> {
    entries.sort_by(|a, b| b.sent_at.cmp(&a.sent_at));
    entries
}

#[async_trait]
impl NotificationLogRepository for InMemoryStore {
    async fn append(
        &self,
        entry: &NotificationLogEntry,
    ) -> Result<(), NotificationLogRepositoryError> {
        let mut tables = self.online(|| NotificationLogRepositoryError::connection(OFFLINE))?;
        tables.log.push(entry.clone());
        Ok(())
    }

    async fn list_for_child(
        &self,
        child_id: &ChildId,
    ) -> Result<Vec<NotificationLogEntry>, NotificationLogRepositoryError> {
        let tables = self.online(|| NotificationLogRepositoryError::connection(OFFLINE))?;
        let entries = tables
            .log
            .iter()
            .filter(|entry| entry.child_id == *child_id)
            .cloned()
            .collect();
        Ok(newest_first(entries))
    }

    async fn list_for_dose(
        &self,
        dose_id: &DoseRecordId,
    ) -> Result<Vec<NotificationLogEntry>, NotificationLogRepositoryError> {
        let tables = self.online(|| NotificationLogRepositoryError::connection(OFFLINE))?;
        let entries = tables
            .log
            .iter()
            .filter(|entry| entry.dose_record_id == *dose_id)
            .cloned()
            .collect();
        Ok(newest_first(entries))
    }
}
