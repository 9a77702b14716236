use crate::data::{NewTimetable, TimetableId, TimetableRecord};
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Storage for generated timetables. The engine never touches this; only the
/// caller layer does.
pub trait TimetableRepository: Send + Sync {
    fn list(&self) -> Vec<TimetableRecord>;
    fn get(&self, id: TimetableId) -> Option<TimetableRecord>;
    /// Assigns an id and creation time, then stores the timetable.
    fn save(&self, timetable: NewTimetable) -> TimetableRecord;
    /// Returns false when nothing was stored under `id`.
    fn delete(&self, id: TimetableId) -> bool;
}

#[derive(Debug, Default)]
struct Store {
    next_id: TimetableId,
    records: BTreeMap<TimetableId, TimetableRecord>,
}

/// Process-local repository, ids start at 1.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    store: Mutex<Store>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn store(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TimetableRepository for InMemoryRepository {
    fn list(&self) -> Vec<TimetableRecord> {
        self.store().records.values().cloned().collect()
    }

    fn get(&self, id: TimetableId) -> Option<TimetableRecord> {
        self.store().records.get(&id).cloned()
    }

    fn save(&self, timetable: NewTimetable) -> TimetableRecord {
        let mut store = self.store();
        store.next_id += 1;
        let record = TimetableRecord {
            id: store.next_id,
            created_at: Utc::now(),
            year_level: timetable.year_level,
            days: timetable.days,
            entries: timetable.entries,
        };
        store.records.insert(record.id, record.clone());
        record
    }

    fn delete(&self, id: TimetableId) -> bool {
        self.store().records.remove(&id).is_some()
    }
}
