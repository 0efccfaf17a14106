//! Change sets produced by the reconciler.
//!
//! A change set is the ordered list of structural operations that carries a
//! rendered view from one snapshot to the next.
//!
//! # Design Principles
//!
//! - Operations are applied strictly in order
//! - Every index is relative to the view as it is when that op is applied
//! - A change set never contains a no-op

use std::fmt;

use crate::types::{RecordId, SectionKey};

/// A single structural operation on a rendered view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeOp {
    /// Remove an item that no longer exists.
    DeleteItem {
        id: RecordId,
        section: SectionKey,
        index: usize,
    },
    /// Insert an empty section.
    InsertSection { key: SectionKey, index: usize },
    /// Move a section, with its items, to a new index.
    ///
    /// `index` is the destination after the section has been taken out.
    MoveSection { key: SectionKey, index: usize },
    /// Move an existing item, possibly into another section.
    ///
    /// `index` is the destination after the item has been taken out.
    MoveItem {
        id: RecordId,
        from_section: SectionKey,
        to_section: SectionKey,
        index: usize,
    },
    /// Insert a new item.
    InsertItem {
        id: RecordId,
        section: SectionKey,
        index: usize,
    },
    /// Remove a section together with whatever items it still holds.
    DeleteSection { key: SectionKey },
    /// Re-render an item's content in place.
    ReconfigureItem { id: RecordId },
}

impl ChangeOp {
    /// Returns true for operations that change the view's structure.
    pub fn is_structural(&self) -> bool {
        !matches!(self, ChangeOp::ReconfigureItem { .. })
    }
}

impl fmt::Display for ChangeOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeOp::DeleteItem { id, section, index } => {
                write!(f, "delete item {id} from {section}[{index}]")
            }
            ChangeOp::InsertSection { key, index } => {
                write!(f, "insert section {key} at {index}")
            }
            ChangeOp::MoveSection { key, index } => write!(f, "move section {key} to {index}"),
            ChangeOp::MoveItem {
                id,
                from_section,
                to_section,
                index,
            } => write!(f, "move item {id} from {from_section} to {to_section}[{index}]"),
            ChangeOp::InsertItem { id, section, index } => {
                write!(f, "insert item {id} into {section}[{index}]")
            }
            ChangeOp::DeleteSection { key } => write!(f, "delete section {key}"),
            ChangeOp::ReconfigureItem { id } => write!(f, "reconfigure item {id}"),
        }
    }
}

/// The operations that carry a view from one snapshot version to another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSet {
    from_version: u64,
    to_version: u64,
    ops: Vec<ChangeOp>,
}

impl ChangeSet {
    /// Creates an empty change set between two versions.
    pub fn empty(from_version: u64, to_version: u64) -> Self {
        Self {
            from_version,
            to_version,
            ops: Vec::new(),
        }
    }

    /// Creates a change set from already ordered operations.
    pub fn new(from_version: u64, to_version: u64, ops: Vec<ChangeOp>) -> Self {
        Self {
            from_version,
            to_version,
            ops,
        }
    }

    /// Creates a change set that only re-renders the given items.
    pub fn reconfigure(
        from_version: u64,
        to_version: u64,
        ids: impl IntoIterator<Item = RecordId>,
    ) -> Self {
        Self {
            from_version,
            to_version,
            ops: ids
                .into_iter()
                .map(|id| ChangeOp::ReconfigureItem { id })
                .collect(),
        }
    }

    pub fn from_version(&self) -> u64 {
        self.from_version
    }

    pub fn to_version(&self) -> u64 {
        self.to_version
    }

    pub fn ops(&self) -> &[ChangeOp] {
        &self.ops
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChangeOp> {
        self.ops.iter()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Returns true if any operation changes the view's structure.
    pub fn has_structural_changes(&self) -> bool {
        self.ops.iter().any(ChangeOp::is_structural)
    }

    /// IDs of the items to re-render, in order.
    pub fn reconfigured_ids(&self) -> impl Iterator<Item = &RecordId> + '_ {
        self.ops.iter().filter_map(|op| match op {
            ChangeOp::ReconfigureItem { id } => Some(id),
            _ => None,
        })
    }
}

impl IntoIterator for ChangeSet {
    type Item = ChangeOp;
    type IntoIter = std::vec::IntoIter<ChangeOp>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_change_set() {
        let changes = ChangeSet::empty(1, 1);
        assert!(changes.is_empty());
        assert_eq!(changes.len(), 0);
        assert!(!changes.has_structural_changes());
    }

    #[test]
    fn reconfigure_only() {
        let changes = ChangeSet::reconfigure(4, 5, vec![RecordId::from("🐢")]);

        assert_eq!(changes.from_version(), 4);
        assert_eq!(changes.to_version(), 5);
        assert_eq!(
            changes.ops(),
            &[ChangeOp::ReconfigureItem {
                id: RecordId::from("🐢")
            }]
        );
        assert!(!changes.has_structural_changes());

        let ids: Vec<_> = changes.reconfigured_ids().collect();
        assert_eq!(ids, vec![&RecordId::from("🐢")]);
    }

    #[test]
    fn display_is_readable() {
        let op = ChangeOp::MoveItem {
            id: RecordId::from("🐢"),
            from_section: SectionKey::from("T"),
            to_section: SectionKey::from("S"),
            index: 2,
        };
        assert_eq!(op.to_string(), "move item 🐢 from T to S[2]");

        let op = ChangeOp::DeleteSection {
            key: SectionKey::from("C"),
        };
        assert_eq!(op.to_string(), "delete section C");
    }
}
