//! The displayed row list, kept consistent with the record store.

use crate::models::Record;
use crate::row::{build_row, Row};
use crate::store::{RecordStore, StoreError};
use crate::validation::Locale;

/// Rows materialized from a store, in store order.
#[derive(Debug, Clone, Default)]
pub struct RowTable {
    rows: Vec<Row>,
    locale: Locale,
}

impl RowTable {
    /// Build rows for every record in `store`.
    pub fn from_store(store: &RecordStore, locale: Locale) -> Self {
        let mut table = Self {
            rows: Vec::new(),
            locale,
        };
        table.rebuild(store);
        table
    }

    /// Discard all rows and rebuild them from `store`.
    pub fn rebuild(&mut self, store: &RecordStore) {
        self.rows = store
            .records()
            .iter()
            .map(|record| build_row(record, self.locale))
            .collect();
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, id: u64) -> Option<&Row> {
        self.rows.iter().find(|r| r.id == id)
    }

    pub fn get_mut(&mut self, id: u64) -> Option<&mut Row> {
        self.rows.iter_mut().find(|r| r.id == id)
    }

    /// Insert an empty record under the next free id and materialize its
    /// row. Returns the new id.
    pub fn add_row(&mut self, store: &mut RecordStore) -> Result<u64, StoreError> {
        let id = store.next_id()?;
        let record = Record::new(id);
        self.rows.push(build_row(&record, self.locale));
        if let Err(e) = store.add(record) {
            self.rows.pop();
            return Err(e);
        }
        tracing::info!("Added row {}", id);
        Ok(id)
    }

    /// Remove the row and the record with `id`. Returns `false` when
    /// neither existed.
    pub fn delete_row(&mut self, store: &mut RecordStore, id: u64) -> bool {
        let before = self.rows.len();
        self.rows.retain(|r| r.id != id);
        let removed_row = self.rows.len() != before;
        let removed_record = store.remove(id).is_some();
        if removed_row || removed_record {
            tracing::info!("Deleted row {}", id);
        }
        removed_row || removed_record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecordType;
    use crate::row::Column;
    use crate::store::StoreEvent;
    use std::cell::Cell;
    use std::rc::Rc;

    fn store_with_ids(ids: &[u64]) -> RecordStore {
        RecordStore::with_records(
            ids.iter()
                .map(|&id| Record {
                    login: format!("user{id}"),
                    ..Record::new(id)
                })
                .collect(),
        )
    }

    fn ids(table: &RowTable) -> Vec<u64> {
        table.rows().iter().map(|r| r.id).collect()
    }

    #[test]
    fn add_to_empty_store_uses_zero() {
        let mut store = RecordStore::new();
        let mut table = RowTable::from_store(&store, Locale::En);

        assert_eq!(table.add_row(&mut store), Ok(0));
        assert_eq!(ids(&table), vec![0]);
        let record = store.get_by_id(0).unwrap();
        assert_eq!(record.record_type, RecordType::Unset);
        assert!(record.login.is_empty());
        assert_eq!(record.secret, None);
    }

    #[test]
    fn add_after_gap_uses_max_plus_one() {
        let mut store = store_with_ids(&[0, 1, 3]);
        let mut table = RowTable::from_store(&store, Locale::En);

        assert_eq!(table.add_row(&mut store), Ok(4));
        assert_eq!(ids(&table), vec![0, 1, 3, 4]);
    }

    #[test]
    fn add_fails_cleanly_when_ids_are_exhausted() {
        let mut store = store_with_ids(&[u64::MAX]);
        let mut table = RowTable::from_store(&store, Locale::En);

        assert_eq!(table.add_row(&mut store), Err(StoreError::IdsExhausted));
        assert_eq!(ids(&table), vec![u64::MAX]);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn delete_removes_one_row_and_record() {
        let mut store = store_with_ids(&[0, 1, 3]);
        let mut table = RowTable::from_store(&store, Locale::En);

        assert!(table.delete_row(&mut store, 1));
        assert_eq!(ids(&table), vec![0, 3]);
        assert!(store.get_by_id(1).is_none());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn delete_unknown_id_changes_nothing() {
        let mut store = store_with_ids(&[0, 1]);
        let mut table = RowTable::from_store(&store, Locale::En);

        assert!(!table.delete_row(&mut store, 7));
        assert_eq!(ids(&table), vec![0, 1]);
        assert_eq!(table.get(1).unwrap().cell(Column::Login).display(), "user1");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn subscription_drives_rebuild() {
        let mut store = store_with_ids(&[0]);
        let mut table = RowTable::from_store(&store, Locale::En);
        let dirty = Rc::new(Cell::new(false));
        let flag = dirty.clone();
        store.subscribe(move |event, _| {
            if matches!(event, StoreEvent::Updated(_)) {
                flag.set(true);
            }
        });

        store.update(0, crate::models::RecordPatch::login("renamed"));
        assert!(dirty.get());
        table.rebuild(&store);
        assert_eq!(table.get(0).unwrap().cell(Column::Login).display(), "renamed");
    }
}
