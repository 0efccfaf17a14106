//! Layout-mode state machine.
//!
//! The catalog is shown either as a two-column grid of tiles or as a single
//! column of rows. A toggle is an explicit transition that returns the
//! effects a presenter must apply, in order:
//!
//! 1. reconfigure every materialized item against the *old* snapshot
//! 2. swap in the new arrangement
//!
//! Applying them the other way round renders old content into the new
//! arrangement.

use serde::{Deserialize, Serialize};

use crate::changes::ChangeSet;
use crate::snapshot::Snapshot;
use crate::types::RecordId;

/// The two arrangements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    #[default]
    Grid,
    Column,
}

impl LayoutMode {
    /// The other mode.
    pub fn toggled(self) -> Self {
        match self {
            LayoutMode::Grid => LayoutMode::Column,
            LayoutMode::Column => LayoutMode::Grid,
        }
    }

    /// Arrangement descriptor for this mode.
    pub fn descriptor(self) -> LayoutDescriptor {
        match self {
            LayoutMode::Grid => LayoutDescriptor {
                mode: self,
                columns: 2,
                template: ItemTemplate::Tile,
                indicator: "rectangle.grid.2x2",
            },
            LayoutMode::Column => LayoutDescriptor {
                mode: self,
                columns: 1,
                template: ItemTemplate::Row,
                indicator: "rectangle.grid.1x2",
            },
        }
    }

    /// Parses `grid` or `column`, ignoring case.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "grid" => Some(LayoutMode::Grid),
            "column" => Some(LayoutMode::Column),
            _ => None,
        }
    }
}

impl std::fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayoutMode::Grid => write!(f, "grid"),
            LayoutMode::Column => write!(f, "column"),
        }
    }
}

/// How a single item is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemTemplate {
    /// Symbol and name only.
    Tile,
    /// Symbol, name and description.
    Row,
}

/// What a presenter needs to know to lay items out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutDescriptor {
    pub mode: LayoutMode,
    /// Items per row.
    pub columns: usize,
    pub template: ItemTemplate,
    /// Name of the indicator shown on the toggle control.
    pub indicator: &'static str,
}

/// One step of a layout transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutEffect {
    /// Re-render these items with the old snapshot still in place.
    Reconfigure(ChangeSet),
    /// Switch to the new arrangement.
    ApplyArrangement(LayoutDescriptor),
}

/// Result of a toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutTransition {
    pub from: LayoutMode,
    pub to: LayoutMode,
    pub effects: Vec<LayoutEffect>,
}

impl LayoutTransition {
    /// The reconfigure step.
    pub fn reconfigure(&self) -> Option<&ChangeSet> {
        self.effects.iter().find_map(|effect| match effect {
            LayoutEffect::Reconfigure(changes) => Some(changes),
            _ => None,
        })
    }

    /// The arrangement step.
    pub fn arrangement(&self) -> Option<&LayoutDescriptor> {
        self.effects.iter().find_map(|effect| match effect {
            LayoutEffect::ApplyArrangement(descriptor) => Some(descriptor),
            _ => None,
        })
    }
}

/// Holds the current layout mode.
#[derive(Debug, Clone, Default)]
pub struct LayoutController {
    mode: LayoutMode,
}

impl LayoutController {
    pub fn new(mode: LayoutMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> LayoutMode {
        self.mode
    }

    pub fn descriptor(&self) -> LayoutDescriptor {
        self.mode.descriptor()
    }

    /// Switches to the other mode.
    ///
    /// `materialized` lists the items the presenter currently has on screen;
    /// `None` means every item in the snapshot. IDs missing from the
    /// snapshot are skipped.
    pub fn toggle(
        &mut self,
        snapshot: &Snapshot,
        materialized: Option<&[RecordId]>,
    ) -> LayoutTransition {
        let from = self.mode;
        let to = from.toggled();

        let ids: Vec<RecordId> = match materialized {
            Some(ids) => ids
                .iter()
                .filter(|id| snapshot.contains(id))
                .cloned()
                .collect(),
            None => snapshot.item_ids().cloned().collect(),
        };
        let version = snapshot.version();

        self.mode = to;

        LayoutTransition {
            from,
            to,
            effects: vec![
                LayoutEffect::Reconfigure(ChangeSet::reconfigure(version, version, ids)),
                LayoutEffect::ApplyArrangement(to.descriptor()),
            ],
        }
    }
}
