//! Text presenter.
//!
//! Keeps a replica of what is on screen and moves it forward only by
//! replaying the change sets the store emits. Rendering looks record
//! payloads up by id at draw time.

use std::collections::HashMap;
use std::fmt::Write;

use catalog_engine::{
    ItemPosition, ItemTemplate, LayoutDescriptor, LayoutEffect, LayoutMode, Record, RecordId,
    SideEffect, SkeletonView, Snapshot, ViewError,
};

/// Width of one grid tile, in characters.
const TILE_WIDTH: usize = 30;

#[derive(Debug, thiserror::Error)]
pub enum PresenterError {
    #[error("change set does not apply: {0}")]
    View(#[from] ViewError),

    #[error("expected changes from version {expected}, got {found}")]
    VersionGap { expected: u64, found: u64 },
}

pub struct Presenter {
    view: SkeletonView,
    version: u64,
    layout: LayoutDescriptor,
}

impl Presenter {
    pub fn new(snapshot: &Snapshot, mode: LayoutMode) -> Self {
        Self {
            view: SkeletonView::from_snapshot(snapshot),
            version: snapshot.version(),
            layout: mode.descriptor(),
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn layout(&self) -> &LayoutDescriptor {
        &self.layout
    }

    /// Returns true if the replica has exactly the snapshot's structure.
    #[cfg(test)]
    pub fn is_in_sync(&self, snapshot: &Snapshot) -> bool {
        self.view.matches(snapshot)
    }

    /// Every item currently drawn. A terminal has no scrolling viewport,
    /// so that is all of them.
    pub fn materialized(&self) -> Vec<RecordId> {
        self.view
            .section_keys()
            .filter_map(|key| self.view.items(key))
            .flatten()
            .cloned()
            .collect()
    }

    /// The item drawn at a position.
    pub fn resolve(&self, position: ItemPosition) -> Option<&RecordId> {
        self.view.item_at(position)
    }

    /// Replays one side-effect onto the replica.
    pub fn apply(&mut self, effect: &SideEffect) -> Result<(), PresenterError> {
        match effect {
            SideEffect::RecordAdded { changes, .. }
            | SideEffect::RecordReplaced { changes, .. }
            | SideEffect::RecordDeleted { changes, .. } => {
                if changes.from_version() != self.version {
                    return Err(PresenterError::VersionGap {
                        expected: self.version,
                        found: changes.from_version(),
                    });
                }
                self.view.apply(changes)?;
                self.version = changes.to_version();
            }
            SideEffect::LayoutChanged { transition } => {
                for step in &transition.effects {
                    match step {
                        LayoutEffect::Reconfigure(changes) => self.view.apply(changes)?,
                        LayoutEffect::ApplyArrangement(descriptor) => {
                            self.layout = descriptor.clone();
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Throws the replica away and rebuilds it from a snapshot.
    pub fn resync(&mut self, snapshot: &Snapshot) {
        self.view = SkeletonView::from_snapshot(snapshot);
        self.version = snapshot.version();
    }

    /// Draws the replica using `records` for payloads.
    pub fn render(&self, records: &[Record]) -> String {
        let by_id: HashMap<&str, &Record> =
            records.iter().map(|r| (r.symbol.as_str(), r)).collect();

        let mut out = String::new();
        if self.view.is_empty() {
            out.push_str("(catalog is empty)\n");
        }

        for (section_no, key) in self.view.section_keys().enumerate() {
            let _ = writeln!(out, "[{}] {key}", section_no + 1);

            let items = self.view.items(key).unwrap_or_default();
            for (row_no, chunk) in items.chunks(self.layout.columns.max(1)).enumerate() {
                let mut line = String::new();
                for (offset, id) in chunk.iter().enumerate() {
                    let number = row_no * self.layout.columns.max(1) + offset + 1;
                    let cell = match by_id.get(id.as_str()) {
                        Some(record) => self.cell(number, record),
                        None => format!("{number:>3}. {id} (missing)"),
                    };
                    if offset + 1 < chunk.len() {
                        let _ = write!(line, "{cell:<TILE_WIDTH$}");
                    } else {
                        line.push_str(&cell);
                    }
                }
                let _ = writeln!(out, "  {}", line.trim_end());
            }
        }

        let _ = writeln!(
            out,
            "{} records in {} sections, layout: {} [{}]",
            self.view.item_count(),
            self.view.len(),
            self.layout.mode,
            self.layout.indicator
        );
        out
    }

    fn cell(&self, number: usize, record: &Record) -> String {
        match self.layout.template {
            ItemTemplate::Tile => format!("{number:>3}. {} {}", record.symbol, record.name),
            ItemTemplate::Row => format!(
                "{number:>3}. {} {}: {}",
                record.symbol, record.name, record.description
            ),
        }
    }
}
