//! Layout toggles through the store.

use super::record;
use crate::layout::{LayoutEffect, LayoutMode};
use crate::reader::CatalogReader;
use crate::side_effect::RecordingSink;
use crate::store::CatalogStore;
use crate::types::RecordId;
use crate::writer::CatalogWriter;
use crate::SideEffect;

#[test]
fn toggle_does_not_advance_version() {
    let mut store = CatalogStore::new(RecordingSink::new());
    store.add(record("🐢", "Turtle")).unwrap();
    let changes = store.last_changes();

    let transition = store.toggle_layout(None);

    assert_eq!(transition.to, LayoutMode::Column);
    assert_eq!(store.layout(), LayoutMode::Column);
    assert_eq!(store.version(), 1);
    assert_eq!(store.last_changes(), changes);
}

#[test]
fn toggle_reconfigures_against_the_old_snapshot_first() {
    let mut store = CatalogStore::new(RecordingSink::new());
    store.add(record("🐢", "Turtle")).unwrap();
    store.add(record("🐘", "Elephant")).unwrap();

    let transition = store.toggle_layout(None);

    let LayoutEffect::Reconfigure(reconfigure) = &transition.effects[0] else {
        panic!("first effect must reconfigure");
    };
    assert_eq!(reconfigure.from_version(), 2);
    let ids: Vec<_> = reconfigure.reconfigured_ids().map(|id| id.as_str()).collect();
    assert_eq!(ids, vec!["🐘", "🐢"]);

    let LayoutEffect::ApplyArrangement(descriptor) = &transition.effects[1] else {
        panic!("second effect must apply the arrangement");
    };
    assert_eq!(descriptor.columns, 1);
}

#[test]
fn toggle_only_reconfigures_materialized_items() {
    let mut store = CatalogStore::new(RecordingSink::new());
    store.add(record("🐢", "Turtle")).unwrap();
    store.add(record("🐘", "Elephant")).unwrap();

    let visible = [RecordId::from("🐢")];
    let transition = store.toggle_layout(Some(visible.as_slice()));

    let ids: Vec<_> = transition
        .reconfigure()
        .unwrap()
        .reconfigured_ids()
        .cloned()
        .collect();
    assert_eq!(ids, visible.to_vec());
}

#[test]
fn toggle_emits_layout_changed() {
    let mut store = CatalogStore::new(RecordingSink::new());
    store.add(record("🐢", "Turtle")).unwrap();
    store.sink().clear();

    let first = store.toggle_layout(None);
    let second = store.toggle_layout(None);

    assert_eq!(second.to, LayoutMode::Grid);
    assert_eq!(
        store.sink().effects(),
        vec![
            SideEffect::LayoutChanged { transition: first },
            SideEffect::LayoutChanged { transition: second },
        ]
    );
}

#[test]
fn toggle_on_empty_store_reconfigures_nothing() {
    let mut store = CatalogStore::new(RecordingSink::new());
    let transition = store.toggle_layout(None);

    assert!(transition.reconfigure().unwrap().is_empty());
    assert_eq!(transition.arrangement().unwrap().mode, LayoutMode::Column);
}
