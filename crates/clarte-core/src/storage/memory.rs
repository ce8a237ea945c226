//! In-memory entry store with the same key layout as [`super::Database`].

use std::cell::RefCell;
use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::{
    decode_entry, encode_entry, entry_key, quarantine_key, EntryStore, ENTRY_KEY_PREFIX,
};
use crate::entry::JournalEntry;
use crate::error::StoreError;

#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: RefCell<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a raw value under `key`, bypassing entry encoding.
    pub fn insert_raw(&self, key: impl Into<String>, value: impl Into<String>) {
        self.slots.borrow_mut().insert(key.into(), value.into());
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.slots.borrow().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.slots.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.borrow().is_empty()
    }
}

impl EntryStore for MemoryStore {
    fn get(&self, date: NaiveDate) -> Result<Option<JournalEntry>, StoreError> {
        match self.slots.borrow().get(&entry_key(date)) {
            Some(raw) => decode_entry(date, raw).map(Some),
            None => Ok(None),
        }
    }

    fn put(&self, date: NaiveDate, entry: &JournalEntry) -> Result<(), StoreError> {
        let value = encode_entry(entry)?;
        self.slots.borrow_mut().insert(entry_key(date), value);
        Ok(())
    }

    fn merge_if_absent(&self, date: NaiveDate, entry: &JournalEntry) -> Result<bool, StoreError> {
        let key = entry_key(date);
        let mut slots = self.slots.borrow_mut();
        if slots.contains_key(&key) {
            return Ok(false);
        }
        slots.insert(key, encode_entry(entry)?);
        Ok(true)
    }

    fn delete_all(&self) -> Result<usize, StoreError> {
        let mut slots = self.slots.borrow_mut();
        let before = slots.len();
        slots.retain(|key, _| !key.starts_with(ENTRY_KEY_PREFIX));
        Ok(before - slots.len())
    }

    fn quarantine(&self, date: NaiveDate) -> Result<Option<String>, StoreError> {
        let mut slots = self.slots.borrow_mut();
        let Some(raw) = slots.remove(&entry_key(date)) else {
            return Ok(None);
        };
        let mut attempt = 0;
        while slots.contains_key(&quarantine_key(date, attempt)) {
            attempt += 1;
        }
        slots.insert(quarantine_key(date, attempt), raw.clone());
        Ok(Some(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration};

    fn completed(at: &str) -> JournalEntry {
        JournalEntry {
            step5: Some("agir".into()),
            committed: Some(true),
            completed_at: Some(DateTime::parse_from_rfc3339(at).unwrap()),
            ..Default::default()
        }
    }

    #[test]
    fn list_completed_filters_and_orders() {
        let store = MemoryStore::new();
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        store.put(today - Duration::days(3), &completed("2024-03-07T20:00:00Z")).unwrap();
        store.put(today, &completed("2024-03-10T20:00:00Z")).unwrap();
        store.put(today - Duration::days(1), &JournalEntry::default()).unwrap();

        let listed = store.list_completed(today, 365).unwrap();
        let dates: Vec<_> = listed.iter().map(|e| e.date).collect();
        assert_eq!(dates, vec![today, today - Duration::days(3)]);
    }

    #[test]
    fn list_completed_respects_horizon() {
        let store = MemoryStore::new();
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        store.put(today - Duration::days(5), &completed("2024-03-05T20:00:00Z")).unwrap();
        assert!(store.list_completed(today, 5).unwrap().is_empty());
        assert_eq!(store.list_completed(today, 6).unwrap().len(), 1);
    }

    #[test]
    fn list_completed_skips_corrupt_days() {
        let store = MemoryStore::new();
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        store.insert_raw("journey_2024-03-09", "[1, 2");
        store.put(today, &completed("2024-03-10T20:00:00Z")).unwrap();

        assert_eq!(store.list_completed(today, 30).unwrap().len(), 1);
        assert_eq!(store.raw("journey_2024-03-09").as_deref(), Some("[1, 2"));
    }

    #[test]
    fn delete_all_only_touches_entries() {
        let store = MemoryStore::new();
        store.put(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(), &JournalEntry::default()).unwrap();
        store.insert_raw("corrupt_journey_2024-02-01", "??");
        store.insert_raw("settings", "{}");

        assert_eq!(store.delete_all().unwrap(), 1);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn quarantine_never_overwrites_an_earlier_slot() {
        let store = MemoryStore::new();
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        store.insert_raw("journey_2024-03-01", "first-garbage");
        assert_eq!(store.quarantine(date).unwrap().as_deref(), Some("first-garbage"));
        store.insert_raw("journey_2024-03-01", "second-garbage");
        assert_eq!(store.quarantine(date).unwrap().as_deref(), Some("second-garbage"));
        store.insert_raw("journey_2024-03-01", "third-garbage");
        store.quarantine(date).unwrap();

        assert_eq!(store.raw("corrupt_journey_2024-03-01").as_deref(), Some("first-garbage"));
        assert_eq!(store.raw("corrupt_journey_2024-03-01.1").as_deref(), Some("second-garbage"));
        assert_eq!(store.raw("corrupt_journey_2024-03-01.2").as_deref(), Some("third-garbage"));
        assert!(store.get(date).unwrap().is_none());
    }

    #[test]
    fn list_completed_caps_an_oversized_horizon() {
        let store = MemoryStore::new();
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        store.put(today, &completed("2024-03-10T20:00:00Z")).unwrap();
        store
            .put(today - Duration::days(400), &completed("2023-02-04T20:00:00Z"))
            .unwrap();

        let entries = store.list_completed(today, u32::MAX).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].date, today);
    }
}
