//! Displacement rules - how grains fall and fluids flow
//!
//! A cell only ever moves by swapping with a cell it may displace, one row
//! further down. Gas uses the same downward rule as liquid and only differs
//! by being light enough to lose most comparisons.

use smelt_simulation::{MaterialId, Phase};

use crate::grid::Grid;
use crate::stats::SimStats;

/// Whether the cell at `src` may swap into `dst`
#[inline]
pub fn can_displace(grid: &Grid, src: usize, dst: usize) -> bool {
    if grid.material[dst] == MaterialId::NONE {
        return true;
    }
    if grid.phase[dst] == Phase::Static {
        return false;
    }
    grid.weight[dst] < grid.weight[src]
}

/// Movement physics for mobile phases
pub struct Gravity;

impl Gravity {
    /// Move the cell at (x, y) according to its cached phase.
    ///
    /// The cell must have a row below it. Returns whether it moved.
    pub fn apply(grid: &mut Grid, x: usize, y: usize, stats: &mut dyn SimStats) -> bool {
        match grid.phase(x, y) {
            Phase::Grain => Self::update_grain(grid, x, y, stats),
            Phase::Liquid | Phase::Gas => Self::update_fluid(grid, x, y, stats),
            Phase::Static => false,
        }
    }

    /// Fall straight down, else down-left, else down-right
    pub fn update_grain(grid: &mut Grid, x: usize, y: usize, stats: &mut dyn SimStats) -> bool {
        let from = grid.index(x, y);

        if Self::try_move(grid, from, grid.index(x, y + 1), stats) {
            return true;
        }
        if x > 0 && Self::try_move(grid, from, grid.index(x - 1, y + 1), stats) {
            return true;
        }
        x + 1 < grid.width() && Self::try_move(grid, from, grid.index(x + 1, y + 1), stats)
    }

    /// Fall straight down, else slide into the first free spot of the row
    /// below, scanning left then right.
    ///
    /// A scan stops at the first static or grain cell in its way.
    pub fn update_fluid(grid: &mut Grid, x: usize, y: usize, stats: &mut dyn SimStats) -> bool {
        let from = grid.index(x, y);
        let below = y + 1;

        if Self::try_move(grid, from, grid.index(x, below), stats) {
            return true;
        }

        for dx in (0..x).rev() {
            match Self::try_flow(grid, from, grid.index(dx, below), stats) {
                Flow::Moved => return true,
                Flow::Blocked => break,
                Flow::Continue => {}
            }
        }

        for dx in x + 1..grid.width() {
            match Self::try_flow(grid, from, grid.index(dx, below), stats) {
                Flow::Moved => return true,
                Flow::Blocked => break,
                Flow::Continue => {}
            }
        }

        false
    }

    fn try_flow(grid: &mut Grid, from: usize, to: usize, stats: &mut dyn SimStats) -> Flow {
        if Self::try_move(grid, from, to, stats) {
            Flow::Moved
        } else if grid.phase[to].blocks_flow() {
            Flow::Blocked
        } else {
            Flow::Continue
        }
    }

    /// Swap `from` into `to` if allowed
    #[inline]
    pub fn try_move(grid: &mut Grid, from: usize, to: usize, stats: &mut dyn SimStats) -> bool {
        if !can_displace(grid, from, to) {
            return false;
        }

        grid.swap(from, to);
        stats.record_cell_moved();
        true
    }
}

enum Flow {
    Moved,
    Blocked,
    Continue,
}
