//! Structural view model.
//!
//! A skeleton is what a presenter has on screen with the payloads stripped:
//! section keys and the record IDs in each section. Change sets are replayed
//! onto it one operation at a time.

use crate::changes::{ChangeOp, ChangeSet};
use crate::snapshot::Snapshot;
use crate::types::{ItemPosition, RecordId, SectionKey};

/// Errors raised when an operation does not fit the skeleton.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ViewError {
    #[error("unknown section: {0}")]
    UnknownSection(SectionKey),

    #[error("unknown item: {0}")]
    UnknownItem(RecordId),

    #[error("section already present: {0}")]
    DuplicateSection(SectionKey),

    #[error("item already present: {0}")]
    DuplicateItem(RecordId),

    #[error("item {id} is not at {section}[{index}]")]
    ItemNotAt {
        id: RecordId,
        section: SectionKey,
        index: usize,
    },

    #[error("item {id} is not in section {section}")]
    ItemNotInSection { id: RecordId, section: SectionKey },

    #[error("index {index} out of range for section {section} (len {len})")]
    ItemIndexOutOfRange {
        section: SectionKey,
        index: usize,
        len: usize,
    },

    #[error("section index {index} out of range (len {len})")]
    SectionIndexOutOfRange { index: usize, len: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct SkeletonSection {
    key: SectionKey,
    items: Vec<RecordId>,
}

/// Section keys and item IDs, in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkeletonView {
    sections: Vec<SkeletonSection>,
}

impl SkeletonView {
    /// Creates a view with no sections.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a view mirroring a snapshot.
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        Self {
            sections: snapshot
                .sections()
                .iter()
                .map(|s| SkeletonSection {
                    key: s.key().clone(),
                    items: s.items().to_vec(),
                })
                .collect(),
        }
    }

    /// Returns true if the view has exactly the snapshot's structure.
    pub fn matches(&self, snapshot: &Snapshot) -> bool {
        self.sections.len() == snapshot.len()
            && self
                .sections
                .iter()
                .zip(snapshot.sections())
                .all(|(mine, theirs)| &mine.key == theirs.key() && mine.items == theirs.items())
    }

    /// Section keys in display order.
    pub fn section_keys(&self) -> impl Iterator<Item = &SectionKey> + '_ {
        self.sections.iter().map(|s| &s.key)
    }

    /// Items of a section, if present.
    pub fn items(&self, key: &SectionKey) -> Option<&[RecordId]> {
        self.section_index(key).map(|i| self.sections[i].items.as_slice())
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn item_count(&self) -> usize {
        self.sections.iter().map(|s| s.items.len()).sum()
    }

    /// Index of a section by key.
    pub fn section_index(&self, key: &SectionKey) -> Option<usize> {
        self.sections.iter().position(|s| &s.key == key)
    }

    /// Position of an item.
    pub fn locate(&self, id: &RecordId) -> Option<ItemPosition> {
        self.sections.iter().enumerate().find_map(|(section, s)| {
            s.items
                .iter()
                .position(|item| item == id)
                .map(|item| ItemPosition { section, item })
        })
    }

    /// Resolves a position to the item shown there.
    pub fn item_at(&self, position: ItemPosition) -> Option<&RecordId> {
        self.sections
            .get(position.section)
            .and_then(|s| s.items.get(position.item))
    }

    /// Key of the section at an index.
    pub fn section_key_at(&self, index: usize) -> Option<&SectionKey> {
        self.sections.get(index).map(|s| &s.key)
    }

    /// Replays a whole change set.
    ///
    /// Stops at the first operation that does not fit; earlier operations
    /// stay applied.
    pub fn apply(&mut self, changes: &ChangeSet) -> Result<(), ViewError> {
        for op in changes.iter() {
            self.apply_op(op)?;
        }
        Ok(())
    }

    /// Replays one operation. On error the view is left untouched.
    pub fn apply_op(&mut self, op: &ChangeOp) -> Result<(), ViewError> {
        match op {
            ChangeOp::DeleteItem { id, section, index } => {
                let s = self.require_section(section)?;
                if self.sections[s].items.get(*index) != Some(id) {
                    return Err(ViewError::ItemNotAt {
                        id: id.clone(),
                        section: section.clone(),
                        index: *index,
                    });
                }
                self.sections[s].items.remove(*index);
            }
            ChangeOp::InsertSection { key, index } => {
                if self.section_index(key).is_some() {
                    return Err(ViewError::DuplicateSection(key.clone()));
                }
                self.check_section_index(*index, self.sections.len())?;
                self.sections.insert(
                    *index,
                    SkeletonSection {
                        key: key.clone(),
                        items: Vec::new(),
                    },
                );
            }
            ChangeOp::MoveSection { key, index } => {
                let from = self.require_section(key)?;
                self.check_section_index(*index, self.sections.len() - 1)?;
                let section = self.sections.remove(from);
                self.sections.insert(*index, section);
            }
            ChangeOp::MoveItem {
                id,
                from_section,
                to_section,
                index,
            } => {
                let position = self
                    .locate(id)
                    .ok_or_else(|| ViewError::UnknownItem(id.clone()))?;
                if &self.sections[position.section].key != from_section {
                    return Err(ViewError::ItemNotInSection {
                        id: id.clone(),
                        section: from_section.clone(),
                    });
                }
                let to = self.require_section(to_section)?;
                let len_after_removal = if to == position.section {
                    self.sections[to].items.len() - 1
                } else {
                    self.sections[to].items.len()
                };
                self.check_item_index(to_section, *index, len_after_removal)?;

                let item = self.sections[position.section].items.remove(position.item);
                self.sections[to].items.insert(*index, item);
            }
            ChangeOp::InsertItem { id, section, index } => {
                if self.locate(id).is_some() {
                    return Err(ViewError::DuplicateItem(id.clone()));
                }
                let s = self.require_section(section)?;
                self.check_item_index(section, *index, self.sections[s].items.len())?;
                self.sections[s].items.insert(*index, id.clone());
            }
            ChangeOp::DeleteSection { key } => {
                let s = self.require_section(key)?;
                self.sections.remove(s);
            }
            ChangeOp::ReconfigureItem { id } => {
                if self.locate(id).is_none() {
                    return Err(ViewError::UnknownItem(id.clone()));
                }
            }
        }
        Ok(())
    }

    fn require_section(&self, key: &SectionKey) -> Result<usize, ViewError> {
        self.section_index(key)
            .ok_or_else(|| ViewError::UnknownSection(key.clone()))
    }

    fn check_section_index(&self, index: usize, max: usize) -> Result<(), ViewError> {
        if index > max {
            return Err(ViewError::SectionIndexOutOfRange {
                index,
                len: self.sections.len(),
            });
        }
        Ok(())
    }

    fn check_item_index(&self, section: &SectionKey, index: usize, max: usize) -> Result<(), ViewError> {
        if index > max {
            return Err(ViewError::ItemIndexOutOfRange {
                section: section.clone(),
                index,
                len: max,
            });
        }
        Ok(())
    }
}
