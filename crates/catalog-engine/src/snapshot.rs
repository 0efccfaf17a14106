//! Snapshot views for the catalog engine.
//!
//! A snapshot is the grouped, ordered view of record identities at one
//! store version.
//!
//! # Design Principles
//!
//! - Snapshots hold identities, never record payloads
//! - Snapshots are immutable after creation
//! - A mutation always produces a brand-new snapshot

use std::sync::Arc;

use crate::types::{ItemPosition, RecordId, SectionKey};

/// An immutable snapshot of every section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    version: u64,
    sections: Arc<Vec<SectionSnapshot>>,
}

impl Snapshot {
    /// Creates a snapshot with no sections at the given version.
    pub fn empty(version: u64) -> Self {
        Self {
            version,
            sections: Arc::new(Vec::new()),
        }
    }

    /// Creates a snapshot from already ordered sections.
    pub fn new(version: u64, sections: Vec<SectionSnapshot>) -> Self {
        Self {
            version,
            sections: Arc::new(sections),
        }
    }

    /// Returns the same sections stamped with another version.
    ///
    /// The section storage is shared, not copied.
    pub fn with_version(&self, version: u64) -> Self {
        Self {
            version,
            sections: Arc::clone(&self.sections),
        }
    }

    /// The store version this snapshot was produced at.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Sections in display order.
    pub fn sections(&self) -> &[SectionSnapshot] {
        &self.sections
    }

    /// Looks up a section by key.
    pub fn section(&self, key: &SectionKey) -> Option<&SectionSnapshot> {
        self.sections.iter().find(|s| &s.key == key)
    }

    /// Section keys in display order.
    pub fn section_keys(&self) -> impl Iterator<Item = &SectionKey> + '_ {
        self.sections.iter().map(|s| &s.key)
    }

    /// Every record ID, section by section.
    pub fn item_ids(&self) -> impl Iterator<Item = &RecordId> + '_ {
        self.sections.iter().flat_map(|s| s.items.iter())
    }

    /// Returns true if the record appears anywhere in the snapshot.
    pub fn contains(&self, id: &RecordId) -> bool {
        self.locate(id).is_some()
    }

    /// Finds the rendered position of a record.
    pub fn locate(&self, id: &RecordId) -> Option<ItemPosition> {
        self.sections.iter().enumerate().find_map(|(section, s)| {
            s.items
                .iter()
                .position(|item| item == id)
                .map(|item| ItemPosition { section, item })
        })
    }

    /// Resolves a rendered position back to a record ID.
    pub fn item_at(&self, position: ItemPosition) -> Option<&RecordId> {
        self.sections
            .get(position.section)
            .and_then(|s| s.items.get(position.item))
    }

    /// Number of sections.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Returns true when there are no sections.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Total number of items across all sections.
    pub fn item_count(&self) -> usize {
        self.sections.iter().map(|s| s.items.len()).sum()
    }

    /// Compares section keys and item orderings, ignoring versions.
    pub fn same_structure(&self, other: &Snapshot) -> bool {
        self.sections == other.sections
    }
}

/// An immutable section: its key and ordered record IDs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionSnapshot {
    key: SectionKey,
    items: Vec<RecordId>,
}

impl SectionSnapshot {
    pub fn new(key: SectionKey, items: Vec<RecordId>) -> Self {
        Self { key, items }
    }

    pub fn key(&self) -> &SectionKey {
        &self.key
    }

    /// Record IDs in display order.
    pub fn items(&self) -> &[RecordId] {
        &self.items
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}
