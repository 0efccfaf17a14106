//! Write-side traits for the catalog store.
//!
//! # Design Principles
//!
//! - The record set changes first
//! - The snapshot and change set are derived from it
//! - Side-effects are emitted last
//! - A rejected write changes nothing and emits nothing

use crate::changes::ChangeSet;
use crate::layout::LayoutTransition;
use crate::types::{EditOrigin, Record, RecordId};
use crate::{CatalogError, CatalogWarning};

/// What `replace` ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplaceOutcome {
    /// An existing record was overwritten in place.
    Replaced(ChangeSet),
    /// No record had this identity; the record was added instead.
    Inserted(ChangeSet),
}

impl ReplaceOutcome {
    pub fn changes(&self) -> &ChangeSet {
        match self {
            ReplaceOutcome::Replaced(changes) | ReplaceOutcome::Inserted(changes) => changes,
        }
    }
}

/// What `delete` ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted(ChangeSet),
    /// Nothing had this identity. The store is unchanged.
    NotFound(CatalogWarning),
}

impl DeleteOutcome {
    pub fn is_deleted(&self) -> bool {
        matches!(self, DeleteOutcome::Deleted(_))
    }
}

/// What an editor submission ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    Added(ChangeSet),
    Replaced(ReplaceOutcome),
}

impl EditOutcome {
    pub fn changes(&self) -> &ChangeSet {
        match self {
            EditOutcome::Added(changes) => changes,
            EditOutcome::Replaced(outcome) => outcome.changes(),
        }
    }
}

/// A writer for catalog data.
///
/// Every successful mutation follows the same order:
/// 1. Update the record set
/// 2. Rebuild the snapshot and advance the version
/// 3. Store the change set as the last changes
/// 4. Emit a side-effect
pub trait CatalogWriter {
    /// Adds a record. Fails if its identity is already present.
    fn add(&mut self, record: Record) -> Result<ChangeSet, CatalogError>;

    /// Overwrites the record with the same identity, or adds it if none exists.
    ///
    /// An overwrite keeps every section as it was; only the record's content
    /// is re-rendered.
    fn replace(&mut self, record: Record) -> ReplaceOutcome;

    /// Removes a record.
    fn delete(&mut self, id: &RecordId) -> DeleteOutcome;

    /// Applies a finished editor submission.
    fn apply_edit(&mut self, origin: EditOrigin, record: Record)
        -> Result<EditOutcome, CatalogError>;

    /// Toggles the layout mode.
    ///
    /// `materialized` lists the items the presenter has on screen; `None`
    /// means all of them.
    fn toggle_layout(&mut self, materialized: Option<&[RecordId]>) -> LayoutTransition;
}
