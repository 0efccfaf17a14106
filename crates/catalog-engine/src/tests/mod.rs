//! Integration tests for the catalog engine.
//!
//! - `scenarios.rs`      - End-to-end user flows (add, delete, duplicate, edit)
//! - `ordering.rs`       - Section and item ordering of derived snapshots
//! - `uniqueness.rs`     - Identity uniqueness across add/delete sequences
//! - `reconciliation.rs` - Change-set soundness, including property tests
//! - `side_effects.rs`   - Side-effect emission
//! - `layout.rs`         - Layout toggles through the store

mod layout;

use proptest::prelude::*;

use crate::reader::CatalogReader;
use crate::side_effect::RecordingSink;
use crate::snapshot::Snapshot;
use crate::store::CatalogStore;
use crate::types::Record;
use crate::view::SkeletonView;
use crate::writer::CatalogWriter;
use crate::SideEffect;

pub(crate) fn record(symbol: &str, name: &str) -> Record {
    Record::new(symbol, name, format!("{name} description"), format!("{name} usage"))
}

/// Replays the last change set on `previous` and checks it lands on the
/// current snapshot.
pub(crate) fn assert_last_changes_sound<S: crate::SideEffectSink>(
    store: &CatalogStore<S>,
    previous: &Snapshot,
) {
    let mut view = SkeletonView::from_snapshot(previous);
    view.apply(&store.last_changes())
        .unwrap_or_else(|e| panic!("change set failed to apply: {e}"));
    assert!(
        view.matches(&store.current_snapshot()),
        "replayed view {view:?} does not match {:?}",
        store.current_snapshot()
    );
}

/// One step of a generated mutation sequence.
#[derive(Debug, Clone)]
pub(crate) enum Mutation {
    Add { symbol: u8, name: String },
    Replace { symbol: u8, name: String },
    Delete { symbol: u8 },
}

/// Small symbol pool so that generated sequences hit duplicates and misses.
pub(crate) fn mutation() -> impl Strategy<Value = Mutation> {
    let name = "[A-Za-z0-9 ]{0,6}";
    prop_oneof![
        4 => (0u8..12, name).prop_map(|(symbol, name)| Mutation::Add { symbol, name }),
        1 => (0u8..12, name).prop_map(|(symbol, name)| Mutation::Replace { symbol, name }),
        2 => (0u8..12).prop_map(|symbol| Mutation::Delete { symbol }),
    ]
}

/// Applies a generated mutation, ignoring duplicate-add rejections.
pub(crate) fn apply_mutation<S: crate::SideEffectSink>(
    store: &mut CatalogStore<S>,
    mutation: &Mutation,
) {
    match mutation {
        Mutation::Add { symbol, name } => {
            let _ = store.add(record(&format!("s{symbol}"), name));
        }
        Mutation::Replace { symbol, name } => {
            store.replace(record(&format!("s{symbol}"), name));
        }
        Mutation::Delete { symbol } => {
            store.delete(&format!("s{symbol}").into());
        }
    }
}

/// Basic workflow test demonstrating core functionality.
#[test]
fn basic_workflow() {
    let mut store = CatalogStore::new(RecordingSink::new());

    // Add two records in different sections
    let v0 = store.current_snapshot();
    store.add(record("🐢", "Turtle")).unwrap();
    assert_last_changes_sound(&store, &v0);

    let v1 = store.current_snapshot();
    store.add(record("🐘", "Elephant")).unwrap();
    assert_last_changes_sound(&store, &v1);

    // Delete one
    let v2 = store.current_snapshot();
    assert!(store.delete(&"🐢".into()).is_deleted());
    assert_last_changes_sound(&store, &v2);

    let snapshot = store.current_snapshot();
    assert_eq!(snapshot.version(), 3);
    let keys: Vec<_> = snapshot.section_keys().map(|k| k.as_str()).collect();
    assert_eq!(keys, vec!["E"]);

    let effects = store.sink().effects();
    assert_eq!(effects.len(), 3);
    assert!(matches!(effects[0], SideEffect::RecordAdded { .. }));
    assert!(matches!(effects[1], SideEffect::RecordAdded { .. }));
    assert!(matches!(effects[2], SideEffect::RecordDeleted { .. }));
}
