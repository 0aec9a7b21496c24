//! Which cells of a row render as editable fields.

use crate::models::RecordType;
use crate::row::{Column, Row};
use crate::validation::FieldValue;

/// How a cell is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellVisibility {
    Editable,
    Hidden,
}

/// Visibility of `column` for a row of `record_type`.
pub fn visibility(record_type: RecordType, column: Column) -> CellVisibility {
    match column {
        Column::Secret if record_type != RecordType::Directory => CellVisibility::Hidden,
        _ => CellVisibility::Editable,
    }
}

pub fn is_editable(record_type: RecordType, column: Column) -> bool {
    visibility(record_type, column) == CellVisibility::Editable
}

/// Number of columns `column` occupies. Login takes over the secret column
/// while the secret is hidden; a hidden column occupies none.
pub fn column_span(record_type: RecordType, column: Column) -> u16 {
    match (column, visibility(record_type, Column::Secret)) {
        (Column::Login, CellVisibility::Hidden) => 2,
        (Column::Secret, CellVisibility::Hidden) => 0,
        _ => 1,
    }
}

/// Apply the policy to `row`: a hidden secret cell loses its value and
/// leaves edit mode.
pub fn apply(row: &mut Row) {
    if is_editable(row.record_type(), Column::Secret) {
        return;
    }
    let cell = row.cell_mut(Column::Secret);
    cell.value = FieldValue::Text(None);
    cell.editing = false;
    cell.error = None;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Record;
    use crate::row::build_row;
    use crate::validation::Locale;

    #[test]
    fn secret_is_editable_only_for_directory() {
        assert!(is_editable(RecordType::Directory, Column::Secret));
        assert!(!is_editable(RecordType::Local, Column::Secret));
        assert!(!is_editable(RecordType::Unset, Column::Secret));
    }

    #[test]
    fn tags_and_type_are_always_editable() {
        for t in [RecordType::Directory, RecordType::Local, RecordType::Unset] {
            assert!(is_editable(t, Column::Tags));
            assert!(is_editable(t, Column::Type));
            assert!(is_editable(t, Column::Login));
        }
    }

    #[test]
    fn login_spans_hidden_secret() {
        assert_eq!(column_span(RecordType::Local, Column::Login), 2);
        assert_eq!(column_span(RecordType::Local, Column::Secret), 0);
        assert_eq!(column_span(RecordType::Directory, Column::Login), 1);
        assert_eq!(column_span(RecordType::Directory, Column::Secret), 1);
    }

    #[test]
    fn hiding_secret_clears_row_value() {
        let record = Record {
            record_type: RecordType::Directory,
            secret: Some("pw".into()),
            ..Record::new(1)
        };
        let mut row = build_row(&record, Locale::En);
        row.cell_mut(Column::Secret).begin_edit();

        row.select_type(RecordType::Local);

        let secret = row.cell(Column::Secret);
        assert_eq!(secret.value, FieldValue::Text(None));
        assert!(!secret.editing);
    }

    #[test]
    fn builder_hides_stray_secret_on_local_record() {
        let record = Record {
            record_type: RecordType::Local,
            secret: Some(String::new()),
            ..Record::new(1)
        };
        let row = build_row(&record, Locale::En);
        assert_eq!(row.cell(Column::Secret).value, FieldValue::Text(None));
    }
}
