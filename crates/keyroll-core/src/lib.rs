//! Core models and row editing logic for keyroll.
//!
//! This crate provides the record store, the row view-models built from it,
//! field validation, the cell visibility policy and the commit controller
//! used by the terminal frontend.

pub mod commit;
pub mod models;
pub mod persistence;
pub mod row;
pub mod store;
pub mod table;
pub mod validation;
pub mod visibility;

pub use commit::{CommitController, CommitOutcome};
pub use models::{Label, Record, RecordPatch, RecordType};
pub use persistence::{JsonFilePersistence, MemoryPersistence, Persistence};
pub use row::{build_row, Cell, CellKind, Column, Row};
pub use store::{RecordStore, StoreError, StoreEvent, SubscriptionId};
pub use table::RowTable;
pub use validation::{FieldValue, Locale, Rule, SelectOption, ValidationError};
