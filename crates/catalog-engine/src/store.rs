//! The catalog store: owner of the authoritative record set.
//!
//! # Write Path (strict order)
//!
//! 1. Mutate the record set
//! 2. Derive the next snapshot
//! 3. Reconcile it against the current one and keep the change set
//! 4. Emit a side-effect
//!
//! If step 1 is rejected, nothing else runs.
//!
//! # Initial Load (silent)
//!
//! `with_records` validates identities and derives the first snapshot. It
//! emits no side-effects.

use std::collections::HashSet;
use std::sync::Arc;

use crate::changes::ChangeSet;
use crate::grouping::build_snapshot;
use crate::layout::{LayoutController, LayoutMode, LayoutTransition};
use crate::reader::CatalogReader;
use crate::reconciler::reconcile;
use crate::side_effect::{SideEffect, SideEffectSink};
use crate::snapshot::Snapshot;
use crate::types::{EditOrigin, Record, RecordId};
use crate::writer::{CatalogWriter, DeleteOutcome, EditOutcome, ReplaceOutcome};
use crate::{CatalogError, CatalogWarning};

/// The catalog store.
///
/// Mutations take `&mut self`, so there is only ever one writer.
pub struct CatalogStore<S: SideEffectSink> {
    records: Vec<Record>,
    snapshot: Snapshot,
    last_changes: ChangeSet,
    layout: LayoutController,
    sink: Arc<S>,
}

impl<S: SideEffectSink> CatalogStore<S> {
    /// Creates an empty store at version 0.
    pub fn new(sink: S) -> Self {
        Self {
            records: Vec::new(),
            snapshot: Snapshot::empty(0),
            last_changes: ChangeSet::empty(0, 0),
            layout: LayoutController::default(),
            sink: Arc::new(sink),
        }
    }

    /// Creates a store holding `records` at version 0.
    ///
    /// Fails on the first repeated identity. Emits nothing.
    pub fn with_records(records: Vec<Record>, sink: S) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            if !seen.insert(record.symbol.as_str()) {
                return Err(CatalogError::DuplicateId(record.id()));
            }
        }

        let snapshot = build_snapshot(&records, 0);
        tracing::info!(
            records = records.len(),
            sections = snapshot.len(),
            "catalog: initial load complete"
        );

        Ok(Self {
            records,
            snapshot,
            last_changes: ChangeSet::empty(0, 0),
            layout: LayoutController::default(),
            sink: Arc::new(sink),
        })
    }

    /// Sets the starting layout mode.
    pub fn with_layout(mut self, mode: LayoutMode) -> Self {
        self.layout = LayoutController::new(mode);
        self
    }

    /// Returns a reference to the side-effect sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    fn position_of(&self, id: &RecordId) -> Option<usize> {
        self.records.iter().position(|r| r.symbol == id.as_str())
    }

    /// Rebuilds the snapshot from the record set at the next version.
    fn rebuild(&mut self) -> ChangeSet {
        let next = build_snapshot(&self.records, self.snapshot.version() + 1);
        let changes = reconcile(&self.snapshot, &next);
        self.commit(next, changes)
    }

    fn commit(&mut self, next: Snapshot, changes: ChangeSet) -> ChangeSet {
        self.snapshot = next;
        self.last_changes = changes.clone();
        changes
    }

    /// Appends a record whose identity is known to be absent.
    fn insert(&mut self, record: Record) -> ChangeSet {
        let record_id = record.id();
        self.records.push(record);
        let changes = self.rebuild();

        tracing::debug!(
            record_id = %record_id,
            version = changes.to_version(),
            ops = changes.len(),
            "catalog: record added"
        );
        self.sink.emit(SideEffect::RecordAdded {
            record_id,
            changes: changes.clone(),
        });
        changes
    }
}

impl<S: SideEffectSink> CatalogReader for CatalogStore<S> {
    fn current_snapshot(&self) -> Snapshot {
        self.snapshot.clone()
    }

    fn last_changes(&self) -> ChangeSet {
        self.last_changes.clone()
    }

    fn record(&self, id: &RecordId) -> Option<Record> {
        self.position_of(id).map(|i| self.records[i].clone())
    }

    fn records(&self) -> Vec<Record> {
        self.records.clone()
    }

    fn version(&self) -> u64 {
        self.snapshot.version()
    }

    fn layout(&self) -> LayoutMode {
        self.layout.mode()
    }
}

impl<S: SideEffectSink> CatalogWriter for CatalogStore<S> {
    fn add(&mut self, record: Record) -> Result<ChangeSet, CatalogError> {
        if self.position_of(&record.id()).is_some() {
            tracing::warn!(record_id = %record.symbol, "catalog: rejected duplicate add");
            return Err(CatalogError::DuplicateId(record.id()));
        }
        Ok(self.insert(record))
    }

    fn replace(&mut self, record: Record) -> ReplaceOutcome {
        let record_id = record.id();
        let Some(index) = self.position_of(&record_id) else {
            tracing::warn!(
                record_id = %record_id,
                "catalog: replace target not found, adding instead"
            );
            return ReplaceOutcome::Inserted(self.insert(record));
        };

        self.records[index] = record;

        // Sections are left as they were until the next full rebuild.
        let from = self.snapshot.version();
        let next = self.snapshot.with_version(from + 1);
        let changes = ChangeSet::reconfigure(from, from + 1, [record_id.clone()]);
        let changes = self.commit(next, changes);

        tracing::debug!(
            record_id = %record_id,
            version = changes.to_version(),
            "catalog: record replaced"
        );
        self.sink.emit(SideEffect::RecordReplaced {
            record_id,
            changes: changes.clone(),
        });
        ReplaceOutcome::Replaced(changes)
    }

    fn delete(&mut self, id: &RecordId) -> DeleteOutcome {
        let Some(index) = self.position_of(id) else {
            tracing::warn!(record_id = %id, "catalog: delete target not found");
            return DeleteOutcome::NotFound(CatalogWarning::NotFound(id.clone()));
        };

        self.records.remove(index);
        let changes = self.rebuild();

        tracing::debug!(
            record_id = %id,
            version = changes.to_version(),
            ops = changes.len(),
            "catalog: record deleted"
        );
        self.sink.emit(SideEffect::RecordDeleted {
            record_id: id.clone(),
            changes: changes.clone(),
        });
        DeleteOutcome::Deleted(changes)
    }

    fn apply_edit(
        &mut self,
        origin: EditOrigin,
        record: Record,
    ) -> Result<EditOutcome, CatalogError> {
        match origin {
            EditOrigin::New => self.add(record).map(EditOutcome::Added),
            EditOrigin::Existing(previous) => {
                if previous != record.id() {
                    tracing::warn!(
                        previous_id = %previous,
                        record_id = %record.symbol,
                        "catalog: edit changed the symbol, previous record is kept"
                    );
                }
                Ok(EditOutcome::Replaced(self.replace(record)))
            }
        }
    }

    fn toggle_layout(&mut self, materialized: Option<&[RecordId]>) -> LayoutTransition {
        let transition = self.layout.toggle(&self.snapshot, materialized);

        tracing::info!(
            from = %transition.from,
            to = %transition.to,
            "catalog: layout toggled"
        );
        self.sink.emit(SideEffect::LayoutChanged {
            transition: transition.clone(),
        });
        transition
    }
}
