//! Grouping and sorting policy.
//!
//! Turns the flat record list into a snapshot: records are grouped by
//! section key, sections ascend by key, and items ascend by name. Equal
//! names keep their input order.

use std::collections::BTreeMap;

use crate::snapshot::{SectionSnapshot, Snapshot};
use crate::types::{Record, SectionKey};

/// Builds the snapshot for `records` at `version`.
pub fn build_snapshot(records: &[Record], version: u64) -> Snapshot {
    let mut groups: BTreeMap<SectionKey, Vec<&Record>> = BTreeMap::new();
    for record in records {
        groups.entry(record.section_key()).or_default().push(record);
    }

    let sections = groups
        .into_iter()
        .map(|(key, mut members)| {
            // sort_by is stable
            members.sort_by(|a, b| a.name.cmp(&b.name));
            SectionSnapshot::new(key, members.into_iter().map(Record::id).collect())
        })
        .collect();

    Snapshot::new(version, sections)
}
