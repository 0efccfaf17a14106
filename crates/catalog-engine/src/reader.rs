//! Read-side traits for the catalog store.
//!
//! Reads are pure and never emit side-effects. A read issued after a
//! mutation observes that mutation and every one before it.

use crate::changes::ChangeSet;
use crate::layout::LayoutMode;
use crate::snapshot::Snapshot;
use crate::types::{Record, RecordId};

/// A reader for catalog data.
pub trait CatalogReader {
    /// The snapshot for the current record set.
    fn current_snapshot(&self) -> Snapshot;

    /// The change set produced by the most recent mutation.
    fn last_changes(&self) -> ChangeSet;

    /// Looks up a record by identity.
    fn record(&self, id: &RecordId) -> Option<Record>;

    /// All records in insertion order.
    fn records(&self) -> Vec<Record>;

    /// The version of the current snapshot.
    fn version(&self) -> u64;

    /// The current layout mode.
    fn layout(&self) -> LayoutMode;
}
