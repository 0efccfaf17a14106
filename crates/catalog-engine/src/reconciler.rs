//! Snapshot reconciliation.
//!
//! Computes the change set that carries a view rendered from one snapshot to
//! the structure of another.
//!
//! # Emission order
//!
//! 1. Delete items that are gone, inside sections that survive
//! 2. Insert new sections and move sections that changed relative order
//! 3. Section by section, move or insert items to reach the target order
//! 4. Delete sections that are gone, along with anything left in them
//!
//! Within a section the items that keep their relative order are the longest
//! common subsequence of the current and target orderings; every other item
//! is placed right after its target predecessor. An item that changed section
//! is moved, not deleted and re-inserted, so its identity survives.
//!
//! Every operation is applied to a working skeleton as soon as it is
//! emitted, so each index is exactly what a presenter replaying the ops in
//! order will see.

use std::collections::HashSet;

use crate::changes::{ChangeOp, ChangeSet};
use crate::snapshot::Snapshot;
use crate::types::{RecordId, SectionKey};
use crate::view::SkeletonView;

/// Computes the operations that turn `previous` into `next`.
///
/// Identical structures produce an empty change set.
pub fn reconcile(previous: &Snapshot, next: &Snapshot) -> ChangeSet {
    let mut builder = Builder {
        work: SkeletonView::from_snapshot(previous),
        ops: Vec::new(),
    };

    let next_ids: HashSet<&RecordId> = next.item_ids().collect();
    let next_keys: HashSet<&SectionKey> = next.section_keys().collect();
    let previous_keys: HashSet<&SectionKey> = previous.section_keys().collect();

    // 1. Removed items in surviving sections
    for section in previous.sections() {
        if !next_keys.contains(section.key()) {
            continue;
        }
        for id in section.items() {
            if next_ids.contains(id) {
                continue;
            }
            if let Some(position) = builder.work.locate(id) {
                builder.emit(ChangeOp::DeleteItem {
                    id: id.clone(),
                    section: section.key().clone(),
                    index: position.item,
                });
            }
        }
    }

    // 2. Section structure
    let current_common: Vec<&SectionKey> = previous
        .section_keys()
        .filter(|k| next_keys.contains(k))
        .collect();
    let target_common: Vec<&SectionKey> = next
        .section_keys()
        .filter(|k| previous_keys.contains(k))
        .collect();
    let stable_sections: HashSet<&SectionKey> =
        longest_common_subsequence(&current_common, &target_common)
            .into_iter()
            .map(|i| current_common[i])
            .collect();

    let next_sections = next.sections();
    for (k, section) in next_sections.iter().enumerate() {
        let key = section.key();
        if stable_sections.contains(key) {
            continue;
        }
        let predecessor = k.checked_sub(1).map(|p| next_sections[p].key());

        match builder.work.section_index(key) {
            Some(from) => {
                let index = match predecessor.and_then(|p| builder.work.section_index(p)) {
                    Some(p) if p > from => p,
                    Some(p) => p + 1,
                    None => 0,
                };
                if index != from {
                    builder.emit(ChangeOp::MoveSection {
                        key: key.clone(),
                        index,
                    });
                }
            }
            None => {
                let index = predecessor
                    .and_then(|p| builder.work.section_index(p))
                    .map_or(0, |p| p + 1);
                builder.emit(ChangeOp::InsertSection {
                    key: key.clone(),
                    index,
                });
            }
        }
    }

    // 3. Items, section by section
    for section in next_sections {
        let key = section.key();
        let target = section.items();
        let target_set: HashSet<&RecordId> = target.iter().collect();

        let current: Vec<&RecordId> = builder
            .work
            .items(key)
            .unwrap_or_default()
            .iter()
            .filter(|id| target_set.contains(id))
            .collect();
        let target_refs: Vec<&RecordId> = target.iter().collect();
        let stable: HashSet<RecordId> = longest_common_subsequence(&current, &target_refs)
            .into_iter()
            .map(|i| current[i].clone())
            .collect();

        for (j, id) in target.iter().enumerate() {
            if stable.contains(id) {
                continue;
            }
            let Some(to) = builder.work.section_index(key) else {
                continue;
            };
            let predecessor = j
                .checked_sub(1)
                .and_then(|p| builder.work.locate(&target[p]))
                .map(|position| position.item);

            match builder.work.locate(id) {
                Some(position) => {
                    let index = match predecessor {
                        Some(p) if position.section == to && position.item < p => p,
                        Some(p) => p + 1,
                        None => 0,
                    };
                    if position.section == to && position.item == index {
                        continue;
                    }
                    let from_section = builder
                        .work
                        .section_key_at(position.section)
                        .cloned()
                        .unwrap_or_else(|| key.clone());
                    builder.emit(ChangeOp::MoveItem {
                        id: id.clone(),
                        from_section,
                        to_section: key.clone(),
                        index,
                    });
                }
                None => {
                    builder.emit(ChangeOp::InsertItem {
                        id: id.clone(),
                        section: key.clone(),
                        index: predecessor.map_or(0, |p| p + 1),
                    });
                }
            }
        }
    }

    // 4. Removed sections
    for key in previous.section_keys() {
        if !next_keys.contains(key) {
            builder.emit(ChangeOp::DeleteSection { key: key.clone() });
        }
    }

    debug_assert!(
        builder.work.matches(next),
        "reconciled view does not match the next snapshot"
    );

    tracing::trace!(
        from_version = previous.version(),
        to_version = next.version(),
        ops = builder.ops.len(),
        "reconciled snapshots"
    );

    ChangeSet::new(previous.version(), next.version(), builder.ops)
}

struct Builder {
    work: SkeletonView,
    ops: Vec<ChangeOp>,
}

impl Builder {
    fn emit(&mut self, op: ChangeOp) {
        let applied = self.work.apply_op(&op);
        debug_assert!(applied.is_ok(), "emitted op does not fit: {op} ({applied:?})");
        self.ops.push(op);
    }
}

/// Indices into `a` of one longest common subsequence of `a` and `b`.
///
/// Common prefixes and suffixes are matched directly; the remaining middle
/// is solved with the classic quadratic table.
fn longest_common_subsequence<T: PartialEq>(a: &[T], b: &[T]) -> Vec<usize> {
    let prefix = a.iter().zip(b).take_while(|(x, y)| x == y).count();
    let suffix = a[prefix..]
        .iter()
        .rev()
        .zip(b[prefix..].iter().rev())
        .take_while(|(x, y)| x == y)
        .count();

    let a_mid = &a[prefix..a.len() - suffix];
    let b_mid = &b[prefix..b.len() - suffix];
    let (n, m) = (a_mid.len(), b_mid.len());

    // table[i][j] = LCS length of a_mid[i..] and b_mid[j..]
    let mut table = vec![vec![0u32; m + 1]; n + 1];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            table[i][j] = if a_mid[i] == b_mid[j] {
                table[i + 1][j + 1] + 1
            } else {
                table[i + 1][j].max(table[i][j + 1])
            };
        }
    }

    let mut matched: Vec<usize> = (0..prefix).collect();
    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if a_mid[i] == b_mid[j] {
            matched.push(prefix + i);
            i += 1;
            j += 1;
        } else if table[i + 1][j] >= table[i][j + 1] {
            i += 1;
        } else {
            j += 1;
        }
    }
    matched.extend(a.len() - suffix..a.len());
    matched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::SectionSnapshot;

    fn id(s: &str) -> RecordId {
        RecordId::from(s)
    }

    fn key(s: &str) -> SectionKey {
        SectionKey::from(s)
    }

    fn snapshot(version: u64, sections: &[(&str, &[&str])]) -> Snapshot {
        Snapshot::new(
            version,
            sections
                .iter()
                .map(|(k, ids)| SectionSnapshot::new(key(k), ids.iter().map(|i| id(i)).collect()))
                .collect(),
        )
    }

    fn assert_sound(previous: &Snapshot, next: &Snapshot) -> ChangeSet {
        let changes = reconcile(previous, next);
        let mut view = SkeletonView::from_snapshot(previous);
        view.apply(&changes).unwrap();
        assert!(view.matches(next), "replay of {changes:?} does not reach {next:?}");
        changes
    }

    #[test]
    fn lcs_basic() {
        assert_eq!(longest_common_subsequence(&[1, 2, 3], &[1, 2, 3]), vec![0, 1, 2]);
        assert_eq!(longest_common_subsequence::<i32>(&[], &[1]), Vec::<usize>::new());
        assert_eq!(longest_common_subsequence(&[1, 2, 3], &[3, 1, 2]), vec![0, 1]);
        assert_eq!(longest_common_subsequence(&[1, 9, 2, 8, 3], &[1, 2, 3]), vec![0, 2, 4]);
        assert_eq!(longest_common_subsequence(&[4, 5], &[6, 7]), Vec::<usize>::new());
    }

    #[test]
    fn identical_snapshots_produce_no_ops() {
        let a = snapshot(1, &[("C", &["😕"]), ("G", &["😀", "🤓"])]);
        let b = a.with_version(2);

        let changes = reconcile(&a, &b);
        assert!(changes.is_empty());
        assert_eq!(changes.from_version(), 1);
        assert_eq!(changes.to_version(), 2);
    }

    #[test]
    fn insert_into_new_section() {
        let previous = snapshot(1, &[("G", &["😀"])]);
        let next = snapshot(2, &[("C", &["😕"]), ("G", &["😀"])]);

        let changes = assert_sound(&previous, &next);
        assert_eq!(
            changes.ops(),
            &[
                ChangeOp::InsertSection { key: key("C"), index: 0 },
                ChangeOp::InsertItem {
                    id: id("😕"),
                    section: key("C"),
                    index: 0
                },
            ]
        );
    }

    #[test]
    fn removing_last_item_deletes_the_section_only() {
        let previous = snapshot(1, &[("C", &["😕"]), ("G", &["😀"])]);
        let next = snapshot(2, &[("G", &["😀"])]);

        let changes = assert_sound(&previous, &next);
        assert_eq!(changes.ops(), &[ChangeOp::DeleteSection { key: key("C") }]);
    }

    #[test]
    fn delete_item_in_surviving_section() {
        let previous = snapshot(1, &[("S", &["💤", "🍝", "📚"])]);
        let next = snapshot(2, &[("S", &["💤", "📚"])]);

        let changes = assert_sound(&previous, &next);
        assert_eq!(
            changes.ops(),
            &[ChangeOp::DeleteItem {
                id: id("🍝"),
                section: key("S"),
                index: 1
            }]
        );
    }

    #[test]
    fn reorder_within_section_moves_outside_lcs() {
        let previous = snapshot(1, &[("S", &["a", "b", "c", "d"])]);
        let next = snapshot(2, &[("S", &["b", "c", "d", "a"])]);

        let changes = assert_sound(&previous, &next);
        assert_eq!(
            changes.ops(),
            &[ChangeOp::MoveItem {
                id: id("a"),
                from_section: key("S"),
                to_section: key("S"),
                index: 3
            }]
        );
    }

    #[test]
    fn item_changing_section_is_moved() {
        let previous = snapshot(1, &[("S", &["🐢"]), ("T", &["⛺️"])]);
        let next = snapshot(2, &[("T", &["⛺️", "🐢"])]);

        let changes = assert_sound(&previous, &next);
        assert_eq!(
            changes.ops(),
            &[
                ChangeOp::MoveItem {
                    id: id("🐢"),
                    from_section: key("S"),
                    to_section: key("T"),
                    index: 1
                },
                ChangeOp::DeleteSection { key: key("S") },
            ]
        );
    }

    #[test]
    fn section_order_change_uses_move_section() {
        let previous = snapshot(1, &[("A", &["1"]), ("B", &["2"]), ("C", &["3"])]);
        let next = snapshot(2, &[("C", &["3"]), ("A", &["1"]), ("B", &["2"])]);

        let changes = assert_sound(&previous, &next);
        assert_eq!(
            changes.ops(),
            &[ChangeOp::MoveSection { key: key("C"), index: 0 }]
        );
    }

    #[test]
    fn from_empty_and_to_empty() {
        let empty = Snapshot::empty(0);
        let full = snapshot(1, &[("E", &["🐘"]), ("T", &["⛺️", "🐢"])]);

        let build = assert_sound(&empty, &full);
        assert_eq!(build.len(), 5);

        let teardown = assert_sound(&full, &empty);
        assert_eq!(
            teardown.ops(),
            &[
                ChangeOp::DeleteSection { key: key("E") },
                ChangeOp::DeleteSection { key: key("T") },
            ]
        );
    }

    #[test]
    fn mixed_changes_are_sound_and_free_of_no_ops() {
        let previous = snapshot(
            1,
            &[
                ("B", &["💔"]),
                ("C", &["🏁", "😕"]),
                ("D", &["🧑‍💻", "🎲"]),
                ("H", &["😍"]),
            ],
        );
        let next = snapshot(
            2,
            &[
                ("C", &["😕", "🏁", "🆕"]),
                ("D", &["🎲", "😍"]),
                ("E", &["🐘"]),
                ("H", &["🧑‍💻"]),
            ],
        );

        let changes = assert_sound(&previous, &next);

        let mut view = SkeletonView::from_snapshot(&previous);
        for op in changes.iter() {
            let before = view.clone();
            view.apply_op(op).unwrap();
            if op.is_structural() {
                assert_ne!(view, before, "no-op emitted: {op}");
            }
        }
    }
}
