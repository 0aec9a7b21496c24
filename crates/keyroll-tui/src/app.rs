//! Application state management.

use crate::config::Config;
use keyroll_core::row::type_options;
use keyroll_core::visibility;
use keyroll_core::{
    CellKind, Column, CommitController, CommitOutcome, RecordStore, RecordType, Row, RowTable,
};
use std::cell::Cell;
use std::collections::HashSet;
use std::rc::Rc;

/// Application state.
#[derive(Debug, Clone, PartialEq)]
pub enum AppState {
    Running,
    /// Application should quit.
    Quit,
}

/// Input mode for the application.
#[derive(Debug, Clone, PartialEq)]
pub enum InputMode {
    /// Table navigation.
    Normal,
    /// A text cell is being edited.
    Editing,
    /// The type selector is open.
    SelectType,
    /// Filter query entry.
    Search,
    /// Waiting for delete confirmation.
    ConfirmDelete,
}

/// Number of table columns: the editable ones plus the delete action.
pub const COLUMN_COUNT: usize = Column::ALL.len() + 1;

/// Main application model.
pub struct App {
    /// Current application state.
    pub state: AppState,
    /// Current input mode.
    pub input_mode: InputMode,
    /// Canonical record list.
    pub store: RecordStore,
    /// Rows projected from the store.
    pub table: RowTable,
    /// Set by the store subscription; rows are rebuilt when it is raised.
    stale: Rc<Cell<bool>>,

    /// Ids of the rows currently shown, in display order.
    pub visible: Vec<u64>,
    /// Index into `visible`.
    pub selected_row: usize,
    /// Index into the table columns; the last one is the delete action.
    pub selected_column: usize,

    /// Draft of the cell being edited.
    pub edit_buffer: String,
    /// Highlighted option in the type selector.
    pub type_choice: usize,

    /// Rows whose password is shown in clear.
    pub toggled_secrets: HashSet<u64>,
    /// Whether passwords are shown in clear unless toggled.
    pub reveal_by_default: bool,

    /// Filter query.
    pub search_query: String,
    /// Message shown in the status line.
    pub status: Option<String>,
}

impl App {
    /// Create a new application instance over `store`.
    pub fn new(mut store: RecordStore, config: &Config) -> Self {
        let stale = Rc::new(Cell::new(false));
        let flag = stale.clone();
        store.subscribe(move |_, _| flag.set(true));

        let table = RowTable::from_store(&store, config.locale);
        let mut app = Self {
            state: AppState::Running,
            input_mode: InputMode::Normal,
            store,
            table,
            stale,
            visible: Vec::new(),
            selected_row: 0,
            selected_column: 0,
            edit_buffer: String::new(),
            type_choice: 0,
            toggled_secrets: HashSet::new(),
            reveal_by_default: config.reveal_secrets,
            search_query: String::new(),
            status: None,
        };
        app.refilter();
        app
    }

    /// Rebuild rows if the store changed since the last call.
    fn sync(&mut self) {
        if self.stale.replace(false) {
            self.table.rebuild(&self.store);
        }
        self.refilter();
    }

    /// Recompute the visible rows from the filter query.
    pub fn refilter(&mut self) {
        use fuzzy_matcher::skim::SkimMatcherV2;
        use fuzzy_matcher::FuzzyMatcher;

        let selected = self.selected_id();

        if self.search_query.trim().is_empty() {
            self.visible = self.table.rows().iter().map(|r| r.id).collect();
        } else {
            let matcher = SkimMatcherV2::default();
            let mut scored: Vec<_> = self
                .table
                .rows()
                .iter()
                .filter_map(|row| {
                    let search_text = format!(
                        "{} {}",
                        row.cell(Column::Tags).display(),
                        row.cell(Column::Login).display()
                    );
                    matcher
                        .fuzzy_match(&search_text, &self.search_query)
                        .map(|score| (row.id, score))
                })
                .collect();
            scored.sort_by(|a, b| b.1.cmp(&a.1));
            self.visible = scored.into_iter().map(|(id, _)| id).collect();
        }

        // Keep the selection on the same record when it is still shown.
        if let Some(index) = selected.and_then(|id| self.visible.iter().position(|&v| v == id)) {
            self.selected_row = index;
        }
        self.selected_row = self.selected_row.min(self.visible.len().saturating_sub(1));
    }

    pub fn selected_id(&self) -> Option<u64> {
        self.visible.get(self.selected_row).copied()
    }

    pub fn current_row(&self) -> Option<&Row> {
        self.selected_id().and_then(|id| self.table.get(id))
    }

    /// The editable column under the cursor; `None` on the delete action.
    pub fn current_column(&self) -> Option<Column> {
        Column::ALL.get(self.selected_column).copied()
    }

    /// Whether the password of row `id` is shown in clear.
    pub fn secret_revealed(&self, id: u64) -> bool {
        self.reveal_by_default != self.toggled_secrets.contains(&id)
    }

    /// Move selection up.
    pub fn move_up(&mut self) {
        if self.selected_row > 0 {
            self.selected_row -= 1;
        }
    }

    /// Move selection down.
    pub fn move_down(&mut self) {
        if self.selected_row + 1 < self.visible.len() {
            self.selected_row += 1;
        }
    }

    pub fn move_left(&mut self) {
        if self.selected_column > 0 {
            self.selected_column -= 1;
        }
    }

    pub fn move_right(&mut self) {
        if self.selected_column + 1 < COLUMN_COUNT {
            self.selected_column += 1;
        }
    }

    /// Activate the cell under the cursor: start editing, open the type
    /// selector, or ask to delete the row.
    pub fn activate(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };
        let Some(column) = self.current_column() else {
            self.request_delete();
            return;
        };
        let Some(row) = self.table.get_mut(id) else {
            return;
        };

        if !visibility::is_editable(row.record_type(), column) {
            self.status = Some("Password is only kept for directory accounts".to_string());
            return;
        }

        row.cell_mut(column).begin_edit();
        match row.cell(column).kind {
            CellKind::Select => {
                let current = row.record_type();
                self.type_choice = RecordType::SELECTABLE
                    .iter()
                    .position(|&t| t == current)
                    .unwrap_or(0);
                self.input_mode = InputMode::SelectType;
            }
            CellKind::Input => {
                self.edit_buffer = row.cell(column).display().to_string();
                self.input_mode = InputMode::Editing;
            }
        }
        self.status = None;
    }

    /// Append a character to the draft.
    pub fn edit_push(&mut self, c: char) {
        self.edit_buffer.push(c);
        self.write_draft();
    }

    /// Remove the last character of the draft.
    pub fn edit_pop(&mut self) {
        self.edit_buffer.pop();
        self.write_draft();
    }

    fn write_draft(&mut self) {
        let (Some(id), Some(column)) = (self.selected_id(), self.current_column()) else {
            return;
        };
        if let Some(row) = self.table.get_mut(id) {
            row.set_text(column, self.edit_buffer.clone());
        }
    }

    /// The edited cell lost focus: commit it.
    pub fn blur(&mut self) {
        let (Some(id), Some(column)) = (self.selected_id(), self.current_column()) else {
            self.input_mode = InputMode::Normal;
            return;
        };
        let Some(row) = self.table.get_mut(id) else {
            self.input_mode = InputMode::Normal;
            return;
        };

        let outcome = CommitController::new(&mut self.store).commit(row, column);
        self.finish_commit(outcome);
    }

    /// Leave edit mode and restore the stored values.
    pub fn cancel_edit(&mut self) {
        self.input_mode = InputMode::Normal;
        self.edit_buffer.clear();
        self.status = None;
        self.table.rebuild(&self.store);
        self.refilter();
    }

    pub fn type_choice_up(&mut self) {
        if self.type_choice > 0 {
            self.type_choice -= 1;
        }
    }

    pub fn type_choice_down(&mut self) {
        if self.type_choice + 1 < type_options().len() {
            self.type_choice += 1;
        }
    }

    /// Apply the highlighted type to the selected row.
    pub fn choose_type(&mut self) {
        let Some(record_type) = RecordType::SELECTABLE.get(self.type_choice).copied() else {
            return;
        };
        let Some(row) = self.selected_id().and_then(|id| self.table.get_mut(id)) else {
            self.input_mode = InputMode::Normal;
            return;
        };
        if row.record_type() == record_type {
            row.cell_mut(Column::Type).end_edit();
            self.input_mode = InputMode::Normal;
            return;
        }

        row.select_type(record_type);
        let outcome = CommitController::new(&mut self.store).commit(row, Column::Type);
        let needs_secret = outcome.is_committed() && record_type == RecordType::Directory;
        self.finish_commit(outcome);
        if needs_secret {
            self.status = Some("Directory accounts need a password".to_string());
        }
    }

    fn finish_commit(&mut self, outcome: CommitOutcome) {
        match outcome {
            CommitOutcome::Rejected(message) => {
                // Stay in edit mode until the value is fixed or cancelled.
                self.status = Some(message);
            }
            CommitOutcome::Committed | CommitOutcome::Skipped | CommitOutcome::Missing => {
                self.input_mode = InputMode::Normal;
                self.edit_buffer.clear();
                self.status = None;
                self.sync();
            }
        }
    }

    /// Add an empty row and select its first cell.
    pub fn add_row(&mut self) {
        match self.table.add_row(&mut self.store) {
            Ok(id) => {
                self.search_query.clear();
                self.sync();
                if let Some(index) = self.visible.iter().position(|&v| v == id) {
                    self.selected_row = index;
                }
                self.selected_column = 0;
                self.status = None;
            }
            Err(e) => {
                tracing::error!("Failed to add row: {}", e);
                self.status = Some(format!("Failed to add row: {e}"));
            }
        }
    }

    pub fn request_delete(&mut self) {
        if self.selected_id().is_some() {
            self.input_mode = InputMode::ConfirmDelete;
        }
    }

    /// Delete the selected row after confirmation.
    pub fn confirm_delete(&mut self) {
        if let Some(id) = self.selected_id() {
            self.table.delete_row(&mut self.store, id);
            self.toggled_secrets.remove(&id);
            self.sync();
        }
        self.input_mode = InputMode::Normal;
    }

    pub fn cancel_delete(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    /// Toggle password visibility for the selected row.
    pub fn toggle_secret(&mut self) {
        if let Some(id) = self.selected_id() {
            if !self.toggled_secrets.remove(&id) {
                self.toggled_secrets.insert(id);
            }
        }
    }

    /// Start search mode.
    pub fn start_search(&mut self) {
        self.input_mode = InputMode::Search;
    }

    /// Leave search mode, keeping the filter.
    pub fn accept_search(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    /// Leave search mode and drop the filter.
    pub fn clear_search(&mut self) {
        self.input_mode = InputMode::Normal;
        self.search_query.clear();
        self.refilter();
    }
}
