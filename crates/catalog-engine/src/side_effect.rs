//! Side-effect contracts for the catalog store.
//!
//! Side-effects are emitted after a mutation has been applied to the record
//! set and the new snapshot is in place. Each one carries the change set a
//! presenter needs to catch up.
//!
//! # Design Principles
//!
//! - The store emits side-effects
//! - The sink decides what they mean
//! - Tests assert emission, not behavior
//! - Initial loads and rejected mutations emit nothing

use crate::changes::ChangeSet;
use crate::layout::LayoutTransition;
use crate::types::RecordId;

/// A side-effect emitted by the store after a committed change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SideEffect {
    /// A record was added.
    RecordAdded {
        record_id: RecordId,
        changes: ChangeSet,
    },
    /// A record was overwritten in place.
    RecordReplaced {
        record_id: RecordId,
        changes: ChangeSet,
    },
    /// A record was removed.
    RecordDeleted {
        record_id: RecordId,
        changes: ChangeSet,
    },
    /// The layout mode was toggled.
    LayoutChanged { transition: LayoutTransition },
}

impl SideEffect {
    /// The change set carried by a record side-effect.
    pub fn changes(&self) -> Option<&ChangeSet> {
        match self {
            SideEffect::RecordAdded { changes, .. }
            | SideEffect::RecordReplaced { changes, .. }
            | SideEffect::RecordDeleted { changes, .. } => Some(changes),
            SideEffect::LayoutChanged { .. } => None,
        }
    }
}

/// A sink that receives side-effects from the store.
///
/// Implementations decide how to handle side-effects (re-render a view,
/// log, forward to another task).
pub trait SideEffectSink: Send + Sync {
    /// Emit a side-effect.
    fn emit(&self, effect: SideEffect);
}

/// A no-op sink that discards all side-effects.
#[derive(Debug, Default)]
pub struct NullSink;

impl SideEffectSink for NullSink {
    fn emit(&self, _effect: SideEffect) {}
}

/// A sink that records all side-effects for testing.
#[derive(Debug, Default)]
pub struct RecordingSink {
    effects: std::sync::Mutex<Vec<SideEffect>>,
}

impl RecordingSink {
    /// Creates a new recording sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all recorded side-effects.
    pub fn effects(&self) -> Vec<SideEffect> {
        self.effects.lock().expect("lock poisoned").clone()
    }

    /// Clears all recorded side-effects.
    pub fn clear(&self) {
        self.effects.lock().expect("lock poisoned").clear();
    }

    /// Returns the number of recorded side-effects.
    pub fn len(&self) -> usize {
        self.effects.lock().expect("lock poisoned").len()
    }

    /// Returns true if no side-effects have been recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SideEffectSink for RecordingSink {
    fn emit(&self, effect: SideEffect) {
        self.effects.lock().expect("lock poisoned").push(effect);
    }
}
