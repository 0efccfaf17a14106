//! # Catalog Engine
//!
//! An in-memory catalog that groups records into sorted sections, derives
//! immutable snapshots, and reconciles consecutive snapshots into ordered
//! change sets.
//!
//! ## Principles
//!
//! - **The record set is the only source of truth** - Snapshots are derived from it
//! - **Every mutation produces a new snapshot** - Snapshots are never edited
//! - **Change sets are sound** - Replaying one on the previous view yields the next
//! - **Side-effects reflect committed state** - Emitted after the snapshot is in place
//! - **Reads are free of side-effects**
//!
//! ## Architecture
//!
//! ```text
//! WRITE:
//!   record set → snapshot → reconcile → side-effect
//!
//! READ:
//!   current snapshot + last changes
//! ```
//!
//! ## Example
//!
//! ```rust
//! use catalog_engine::{CatalogReader, CatalogStore, CatalogWriter, Record, RecordingSink};
//!
//! let mut store = CatalogStore::new(RecordingSink::new());
//!
//! store.add(Record::new("😀", "Grinning Face", "A typical smiley face.", "happiness")).unwrap();
//! store.add(Record::new("😕", "Confused Face", "A confused, puzzled face.", "unsure")).unwrap();
//!
//! let keys: Vec<_> = store.current_snapshot().section_keys().map(|k| k.to_string()).collect();
//! assert_eq!(keys, vec!["C", "G"]);
//! assert_eq!(store.sink().len(), 2);
//! ```
//!
//! ## Crate Structure
//!
//! - [`store`] - The catalog store
//! - [`reader`] - Read-side traits
//! - [`writer`] - Write-side traits
//! - [`side_effect`] - Side-effect contracts
//! - [`types`] - Core types
//! - [`grouping`] - Grouping and sorting policy
//! - [`snapshot`] - Immutable snapshot views
//! - [`reconciler`] - Snapshot diffing
//! - [`changes`] - Change sets
//! - [`view`] - Structural view model that change sets apply to
//! - [`layout`] - Layout-mode state machine
//! - [`seed`] - Starter catalog

pub mod changes;
pub mod grouping;
pub mod layout;
pub mod reader;
pub mod reconciler;
pub mod seed;
pub mod side_effect;
pub mod snapshot;
pub mod store;
pub mod types;
pub mod view;
pub mod writer;

#[cfg(test)]
mod tests;

pub use changes::{ChangeOp, ChangeSet};
pub use grouping::build_snapshot;
pub use layout::{
    ItemTemplate, LayoutController, LayoutDescriptor, LayoutEffect, LayoutMode, LayoutTransition,
};
pub use reader::CatalogReader;
pub use reconciler::reconcile;
pub use seed::starter_catalog;
pub use side_effect::{NullSink, RecordingSink, SideEffect, SideEffectSink};
pub use snapshot::{SectionSnapshot, Snapshot};
pub use store::CatalogStore;
pub use types::{EditOrigin, ItemPosition, Record, RecordId, SectionKey, FALLBACK_SECTION_KEY};
pub use view::{SkeletonView, ViewError};
pub use writer::{CatalogWriter, DeleteOutcome, EditOutcome, ReplaceOutcome};

/// Errors that can occur in the catalog engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// A record with this identity already exists.
    #[error("a record with id {0} already exists")]
    DuplicateId(RecordId),
}

/// Non-fatal conditions reported back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogWarning {
    /// No record has this identity.
    #[error("no record with id {0}")]
    NotFound(RecordId),
}
