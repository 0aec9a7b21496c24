//! Row view-models built from records.
//!
//! A [`Row`] is a disposable projection of one [`Record`]. Cell values are
//! edited in place and flow back to the store only through a commit.

use crate::models::{Label, Record, RecordType};
use crate::validation::{validate, FieldValue, Locale, Rule, SelectOption};
use crate::visibility;
use std::fmt;
use std::rc::Rc;

/// Separator placed between label texts in the tags cell.
pub const TAG_SEPARATOR: &str = "; ";

pub const TAGS_MAX_LEN: usize = 50;
pub const LOGIN_MAX_LEN: usize = 100;
pub const SECRET_MAX_LEN: usize = 100;

/// Editable columns, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Tags,
    Type,
    Login,
    Secret,
}

impl Column {
    pub const ALL: [Column; 4] = [Column::Tags, Column::Type, Column::Login, Column::Secret];

    pub fn index(self) -> usize {
        match self {
            Column::Tags => 0,
            Column::Type => 1,
            Column::Login => 2,
            Column::Secret => 3,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Column::Tags => "Tags",
            Column::Type => "Type",
            Column::Login => "Login",
            Column::Secret => "Password",
        }
    }
}

/// How a cell is edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Input,
    Select,
}

/// Validation function stored with a cell and called on commit.
pub type Validator = Rc<dyn Fn(&FieldValue) -> Result<(), String>>;

/// One editable field of a row.
#[derive(Clone)]
pub struct Cell {
    pub column: Column,
    pub kind: CellKind,
    pub value: FieldValue,
    pub rules: Vec<Rule>,
    validator: Validator,
    /// Whether the cell is currently in edit mode.
    pub editing: bool,
    /// Message from the last failed validation.
    pub error: Option<String>,
}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cell")
            .field("column", &self.column)
            .field("kind", &self.kind)
            .field("value", &self.value)
            .field("rules", &self.rules)
            .field("editing", &self.editing)
            .field("error", &self.error)
            .finish()
    }
}

impl Cell {
    fn new(column: Column, kind: CellKind, value: FieldValue, rules: Vec<Rule>, locale: Locale) -> Self {
        let checked = rules.clone();
        Self {
            column,
            kind,
            value,
            rules,
            validator: Rc::new(move |value| validate(&checked, value, locale)),
            editing: false,
            error: None,
        }
    }

    /// Run the validator on the current value, recording any message.
    pub fn validate(&mut self) -> bool {
        match (self.validator)(&self.value) {
            Ok(()) => {
                self.error = None;
                true
            }
            Err(message) => {
                self.error = Some(message);
                false
            }
        }
    }

    pub fn begin_edit(&mut self) {
        self.editing = true;
    }

    /// Leave edit mode. Errors are kept until the next validation.
    pub fn end_edit(&mut self) {
        self.editing = false;
    }

    /// Text shown in the table, or the selected option's label.
    pub fn display(&self) -> &str {
        match &self.value {
            FieldValue::Text(text) => text.as_deref().unwrap_or(""),
            FieldValue::Select(option) => option.as_ref().map(|o| o.label.as_str()).unwrap_or(""),
        }
    }
}

/// Editable view-model of one record.
#[derive(Debug, Clone)]
pub struct Row {
    pub id: u64,
    cells: [Cell; 4],
}

impl Row {
    pub fn cell(&self, column: Column) -> &Cell {
        &self.cells[column.index()]
    }

    pub fn cell_mut(&mut self, column: Column) -> &mut Cell {
        &mut self.cells[column.index()]
    }

    /// Type currently selected in the row, which may differ from the store
    /// until committed.
    pub fn record_type(&self) -> RecordType {
        self.cell(Column::Type)
            .value
            .as_str()
            .and_then(RecordType::from_value)
            .unwrap_or_default()
    }

    /// Select a type in the row and re-apply the visibility policy.
    pub fn select_type(&mut self, record_type: RecordType) {
        self.cell_mut(Column::Type).value = FieldValue::Select(type_option(record_type));
        visibility::apply(self);
    }

    /// Replace a text cell's value.
    pub fn set_text(&mut self, column: Column, text: impl Into<String>) {
        self.cell_mut(column).value = FieldValue::text(text);
    }
}

/// The selector option for `record_type`; `Unset` has none.
pub fn type_option(record_type: RecordType) -> Option<SelectOption> {
    match record_type {
        RecordType::Unset => None,
        t => Some(SelectOption::new(t.as_str(), t.label())),
    }
}

/// Options offered by the type selector.
pub fn type_options() -> Vec<SelectOption> {
    RecordType::SELECTABLE
        .iter()
        .filter_map(|&t| type_option(t))
        .collect()
}

/// Join label texts for display.
pub fn join_tags(tags: &[Label]) -> String {
    tags.iter()
        .map(|l| l.text.as_str())
        .collect::<Vec<_>>()
        .join(TAG_SEPARATOR)
}

/// Split edited tag text back into labels: segments are trimmed and empty
/// ones dropped.
pub fn split_tags(text: &str) -> Vec<Label> {
    text.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(Label::new)
        .collect()
}

/// Build the editable row for `record`.
pub fn build_row(record: &Record, locale: Locale) -> Row {
    let cells = [
        Cell::new(
            Column::Tags,
            CellKind::Input,
            FieldValue::text(join_tags(&record.tags)),
            vec![Rule::LimitedLength(TAGS_MAX_LEN)],
            locale,
        ),
        Cell::new(
            Column::Type,
            CellKind::Select,
            FieldValue::Select(type_option(record.record_type)),
            vec![Rule::Required],
            locale,
        ),
        Cell::new(
            Column::Login,
            CellKind::Input,
            FieldValue::text(record.login.clone()),
            vec![Rule::Required, Rule::LimitedLength(LOGIN_MAX_LEN)],
            locale,
        ),
        Cell::new(
            Column::Secret,
            CellKind::Input,
            FieldValue::Text(record.secret.clone()),
            vec![Rule::Required, Rule::LimitedLength(SECRET_MAX_LEN)],
            locale,
        ),
    ];

    let mut row = Row {
        id: record.id,
        cells,
    };
    visibility::apply(&mut row);
    row
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> Record {
        Record {
            id: 7,
            tags: vec![Label::new("ops"), Label::new("vpn gateway")],
            record_type: RecordType::Directory,
            login: "alice".into(),
            secret: Some("pw".into()),
        }
    }

    #[test]
    fn tags_are_joined_for_display() {
        let row = build_row(&record(), Locale::En);
        assert_eq!(row.cell(Column::Tags).display(), "ops; vpn gateway");
        assert_eq!(join_tags(&[]), "");
    }

    #[test]
    fn joined_tags_split_back_to_the_same_labels() {
        let original = record().tags;
        assert_eq!(split_tags(&join_tags(&original)), original);
    }

    #[test]
    fn split_trims_and_drops_empty_segments() {
        assert_eq!(
            split_tags(" a ;; b;  ;c "),
            vec![Label::new("a"), Label::new("b"), Label::new("c")]
        );
        assert!(split_tags("").is_empty());
    }

    #[test]
    fn cells_carry_kind_and_rules() {
        let row = build_row(&record(), Locale::En);
        assert_eq!(row.cell(Column::Type).kind, CellKind::Select);
        assert_eq!(row.cell(Column::Login).kind, CellKind::Input);
        assert_eq!(row.cell(Column::Tags).rules, vec![Rule::LimitedLength(50)]);
        assert_eq!(
            row.cell(Column::Secret).rules,
            vec![Rule::Required, Rule::LimitedLength(100)]
        );
        assert_eq!(row.record_type(), RecordType::Directory);
    }

    #[test]
    fn validator_records_localized_message() {
        let mut row = build_row(&record(), Locale::De);
        row.set_text(Column::Login, "");
        let cell = row.cell_mut(Column::Login);
        assert!(!cell.validate());
        assert_eq!(cell.error.as_deref(), Some("Dieses Feld ist erforderlich"));

        cell.value = FieldValue::text("bob");
        assert!(cell.validate());
        assert!(cell.error.is_none());
    }

    #[test]
    fn unset_type_has_no_selection() {
        let mut row = build_row(&Record::new(0), Locale::En);
        assert_eq!(row.cell(Column::Type).value, FieldValue::Select(None));
        assert!(!row.cell_mut(Column::Type).validate());
    }

    #[test]
    fn type_options_exclude_unset() {
        let values: Vec<_> = type_options().into_iter().map(|o| o.value).collect();
        assert_eq!(values, vec!["directory", "local"]);
    }
}
