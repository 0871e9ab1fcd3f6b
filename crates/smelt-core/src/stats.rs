//! Simulation statistics collection trait

use std::ops::AddAssign;

/// Trait for collecting simulation statistics
///
/// The tick pipeline reports events through this hook so hosts can count
/// them without the core owning any reporting policy.
pub trait SimStats {
    /// Record that a cell was displaced during a sweep
    fn record_cell_moved(&mut self);

    /// Record that a cell changed phase or decomposed during an update
    fn record_state_change(&mut self);

    /// Record one oxidation step
    fn record_reaction(&mut self);
}

/// A no-op implementation for when stats collection is not needed
#[derive(Default)]
pub struct NoopStats;

impl SimStats for NoopStats {
    fn record_cell_moved(&mut self) {}
    fn record_state_change(&mut self) {}
    fn record_reaction(&mut self) {}
}

/// Event counters for one or more ticks
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickStats {
    pub cells_moved: u64,
    pub state_changes: u64,
    pub reactions: u64,
}

impl TickStats {
    pub fn is_quiet(&self) -> bool {
        *self == Self::default()
    }
}

impl SimStats for TickStats {
    fn record_cell_moved(&mut self) {
        self.cells_moved += 1;
    }

    fn record_state_change(&mut self) {
        self.state_changes += 1;
    }

    fn record_reaction(&mut self) {
        self.reactions += 1;
    }
}

impl AddAssign for TickStats {
    fn add_assign(&mut self, other: Self) {
        self.cells_moved += other.cells_moved;
        self.state_changes += other.state_changes;
        self.reactions += other.reactions;
    }
}
