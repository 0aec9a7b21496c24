//! Writing edited cell values back to the record store.

use crate::models::RecordPatch;
use crate::row::{split_tags, Column, Row};
use crate::store::RecordStore;
use crate::validation::FieldValue;
use crate::visibility;

/// Result of committing one cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The value was written to the store.
    Committed,
    /// Validation failed; the store is untouched.
    Rejected(String),
    /// The cell is hidden for the row's type.
    Skipped,
    /// The row's record no longer exists.
    Missing,
}

impl CommitOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, CommitOutcome::Committed)
    }
}

/// Validates cells and writes them through to a borrowed store.
pub struct CommitController<'a> {
    store: &'a mut RecordStore,
}

impl<'a> CommitController<'a> {
    pub fn new(store: &'a mut RecordStore) -> Self {
        Self { store }
    }

    /// Commit `column` of `row`. Called when a text cell loses focus or the
    /// type selector changes.
    pub fn commit(&mut self, row: &mut Row, column: Column) -> CommitOutcome {
        if !visibility::is_editable(row.record_type(), column) {
            row.cell_mut(column).end_edit();
            return CommitOutcome::Skipped;
        }

        if self.store.get_by_id(row.id).is_none() {
            tracing::debug!("Commit for missing record {} dropped", row.id);
            return CommitOutcome::Missing;
        }

        let cell = row.cell_mut(column);
        if !cell.validate() {
            let message = cell.error.clone().unwrap_or_default();
            tracing::debug!("Rejected {:?} on record {}: {}", column, row.id, message);
            return CommitOutcome::Rejected(message);
        }
        let text = cell.value.as_str().unwrap_or_default().to_string();
        cell.end_edit();

        let patch = match column {
            Column::Tags => RecordPatch::tags(split_tags(&text)),
            Column::Type => RecordPatch::record_type(row.record_type()),
            Column::Login => RecordPatch::login(text),
            Column::Secret => RecordPatch::secret(Some(text)),
        };
        self.store.update(row.id, patch);

        // Committing directory starts the secret over; any other type may
        // not carry one.
        if column == Column::Type {
            self.store.update(row.id, RecordPatch::secret(None));
            row.cell_mut(Column::Secret).value = FieldValue::Text(None);
        }

        CommitOutcome::Committed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Label, Record, RecordType};
    use crate::row::build_row;
    use crate::validation::Locale;

    fn scenario_store() -> RecordStore {
        RecordStore::with_records(vec![Record {
            id: 1,
            tags: vec![],
            record_type: RecordType::Local,
            login: "a".into(),
            secret: Some(String::new()),
        }])
    }

    fn row_for(store: &RecordStore, id: u64) -> Row {
        build_row(store.get_by_id(id).unwrap(), Locale::En)
    }

    #[test]
    fn login_then_directory_scenario() {
        let mut store = scenario_store();
        let mut row = row_for(&store, 1);

        row.set_text(Column::Login, "ab");
        assert!(CommitController::new(&mut store).commit(&mut row, Column::Login).is_committed());
        assert_eq!(store.get_by_id(1).unwrap().login, "ab");

        row.select_type(RecordType::Directory);
        assert!(CommitController::new(&mut store).commit(&mut row, Column::Type).is_committed());
        let record = store.get_by_id(1).unwrap();
        assert_eq!(record.record_type, RecordType::Directory);
        assert_eq!(record.secret, None);

        let rebuilt = row_for(&store, 1);
        assert!(visibility::is_editable(rebuilt.record_type(), Column::Secret));
    }

    #[test]
    fn directory_then_local_clears_secret() {
        let mut store = scenario_store();
        let mut row = row_for(&store, 1);
        let mut controller = CommitController::new(&mut store);

        row.select_type(RecordType::Directory);
        controller.commit(&mut row, Column::Type);
        row.set_text(Column::Secret, "hunter2");
        assert!(controller.commit(&mut row, Column::Secret).is_committed());

        row.select_type(RecordType::Local);
        controller.commit(&mut row, Column::Type);

        assert_eq!(store.get_by_id(1).unwrap().secret, None);
    }

    #[test]
    fn invalid_value_leaves_store_untouched() {
        let mut store = scenario_store();
        let mut row = row_for(&store, 1);
        row.set_text(Column::Login, "x".repeat(101));

        let outcome = CommitController::new(&mut store).commit(&mut row, Column::Login);

        assert_eq!(outcome, CommitOutcome::Rejected("Must be at most 100 characters".into()));
        assert_eq!(store.get_by_id(1).unwrap().login, "a");
        assert!(row.cell(Column::Login).error.is_some());
    }

    #[test]
    fn tags_are_split_on_commit() {
        let mut store = scenario_store();
        let mut row = row_for(&store, 1);
        row.set_text(Column::Tags, "ops; ; vpn ");

        CommitController::new(&mut store).commit(&mut row, Column::Tags);

        assert_eq!(
            store.get_by_id(1).unwrap().tags,
            vec![Label::new("ops"), Label::new("vpn")]
        );
    }

    #[test]
    fn unchanged_tags_round_trip() {
        let mut store = RecordStore::with_records(vec![Record {
            tags: vec![Label::new("a b"), Label::new("c")],
            ..Record::new(0)
        }]);
        let mut row = row_for(&store, 0);

        CommitController::new(&mut store).commit(&mut row, Column::Tags);

        assert_eq!(
            store.get_by_id(0).unwrap().tags,
            vec![Label::new("a b"), Label::new("c")]
        );
    }

    #[test]
    fn hidden_secret_is_skipped() {
        let mut store = scenario_store();
        let mut row = row_for(&store, 1);
        row.set_text(Column::Secret, "nope");

        let outcome = CommitController::new(&mut store).commit(&mut row, Column::Secret);

        assert_eq!(outcome, CommitOutcome::Skipped);
        assert_eq!(store.get_by_id(1).unwrap().secret.as_deref(), Some(""));
    }

    #[test]
    fn empty_directory_secret_is_rejected() {
        let mut store = scenario_store();
        let mut row = row_for(&store, 1);
        let mut controller = CommitController::new(&mut store);
        row.select_type(RecordType::Directory);
        controller.commit(&mut row, Column::Type);

        row.set_text(Column::Secret, "");
        assert!(matches!(
            controller.commit(&mut row, Column::Secret),
            CommitOutcome::Rejected(_)
        ));
    }

    #[test]
    fn committing_directory_again_clears_secret() {
        let mut store = RecordStore::with_records(vec![Record {
            record_type: RecordType::Directory,
            login: "svc".into(),
            secret: Some("pw".into()),
            ..Record::new(3)
        }]);
        let mut row = row_for(&store, 3);

        row.select_type(RecordType::Directory);
        let outcome = CommitController::new(&mut store).commit(&mut row, Column::Type);

        assert!(outcome.is_committed());
        assert_eq!(store.get_by_id(3).unwrap().secret, None);
        assert_eq!(row.cell(Column::Secret).value, FieldValue::Text(None));
    }

    #[test]
    fn overlong_tags_leave_store_untouched() {
        let mut store = RecordStore::with_records(vec![Record {
            tags: vec![Label::new("ops")],
            ..Record::new(0)
        }]);
        let mut row = row_for(&store, 0);
        // 48 + "; " + "x" joins to 51 characters.
        row.set_text(Column::Tags, format!("{}; x", "a".repeat(48)));

        let outcome = CommitController::new(&mut store).commit(&mut row, Column::Tags);

        assert_eq!(outcome, CommitOutcome::Rejected("Must be at most 50 characters".into()));
        assert_eq!(store.get_by_id(0).unwrap().tags, vec![Label::new("ops")]);
        assert!(row.cell(Column::Tags).error.is_some());

        row.set_text(Column::Tags, format!("{}; x", "a".repeat(47)));
        assert!(CommitController::new(&mut store).commit(&mut row, Column::Tags).is_committed());
        assert_eq!(store.get_by_id(0).unwrap().tags.len(), 2);
    }

    #[test]
    fn commit_for_deleted_record_is_missing() {
        let mut store = scenario_store();
        let mut row = row_for(&store, 1);
        store.remove(1);

        assert_eq!(
            CommitController::new(&mut store).commit(&mut row, Column::Login),
            CommitOutcome::Missing
        );
        assert!(store.is_empty());
    }
}
