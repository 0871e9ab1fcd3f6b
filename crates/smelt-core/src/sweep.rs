//! Visiting order of one simulate pass
//!
//! The pass runs in five stages:
//! 1. bottom row, left to right, without gravity
//! 2. interior rows from `height - 2` up to 1, alternating column direction
//!    every row and always starting left to right
//! 3. top row, left to right
//! 4. left column, bottom to top
//! 5. right column, bottom to top
//!
//! The bottom corners are never visited. Which neighbors a visit conducts
//! heat to and reacts with depends on the stage, see [`Region`].

/// Column scan direction of an interior row
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowDirection {
    LeftToRight,
    RightToLeft,
}

impl RowDirection {
    pub fn flip(self) -> Self {
        match self {
            RowDirection::LeftToRight => RowDirection::RightToLeft,
            RowDirection::RightToLeft => RowDirection::LeftToRight,
        }
    }
}

/// Axis neighbor offsets (y grows downward)
pub const DOWN: (i32, i32) = (0, 1);
pub const UP: (i32, i32) = (0, -1);
pub const LEFT: (i32, i32) = (-1, 0);
pub const RIGHT: (i32, i32) = (1, 0);

/// Part of the grid a visit belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Region {
    BottomRow,
    Interior(RowDirection),
    TopRow,
    LeftColumn,
    RightColumn,
}

impl Region {
    /// Neighbors exchanging heat with the visited cell, in order
    pub fn conduction_neighbors(self) -> &'static [(i32, i32)] {
        match self {
            Region::BottomRow => &[LEFT, RIGHT],
            Region::Interior(_) | Region::TopRow => &[DOWN, LEFT, RIGHT],
            Region::LeftColumn | Region::RightColumn => &[DOWN],
        }
    }

    /// Neighbors checked for an oxidizer, in order
    pub fn reaction_neighbors(self) -> &'static [(i32, i32)] {
        match self {
            Region::BottomRow => &[LEFT, RIGHT, UP],
            Region::Interior(_) => &[DOWN, UP, LEFT, RIGHT],
            Region::TopRow => &[DOWN, LEFT, RIGHT],
            Region::LeftColumn => &[DOWN, RIGHT],
            Region::RightColumn => &[DOWN, LEFT],
        }
    }

    /// Whether the visited cell may fall or flow
    pub fn applies_gravity(self) -> bool {
        !matches!(self, Region::BottomRow)
    }
}

/// One cell visit of the pass
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Visit {
    pub x: usize,
    pub y: usize,
    pub region: Region,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Stage {
    BottomRow,
    Interior,
    TopRow,
    LeftColumn,
    RightColumn,
    Done,
}

/// Iterator over the visits of one simulate pass.
///
/// It only yields coordinates; the caller reads the live grid at each
/// visit, since earlier visits may have moved cells into later positions.
#[derive(Clone, Debug)]
pub struct Sweep {
    width: usize,
    height: usize,
    stage: Stage,
    direction: RowDirection,
    // Next cell of the current stage
    x: usize,
    y: usize,
}

impl Sweep {
    /// Panics on grids narrower or shorter than 3 cells.
    pub fn new(width: usize, height: usize) -> Self {
        assert!(
            width >= 3 && height >= 3,
            "sweep needs at least a 3x3 grid, got {width}x{height}"
        );
        Self {
            width,
            height,
            stage: Stage::BottomRow,
            direction: RowDirection::LeftToRight,
            x: 1,
            y: height - 1,
        }
    }

    fn last_column(&self) -> usize {
        self.width - 2
    }

    fn enter(&mut self, stage: Stage) {
        self.stage = stage;
        match stage {
            Stage::Interior => {
                self.direction = RowDirection::LeftToRight;
                self.x = 1;
                self.y = self.height - 2;
            }
            Stage::TopRow => {
                self.x = 1;
                self.y = 0;
            }
            Stage::LeftColumn => {
                self.x = 0;
                self.y = self.height - 2;
            }
            Stage::RightColumn => {
                self.x = self.width - 1;
                self.y = self.height - 2;
            }
            Stage::BottomRow | Stage::Done => {}
        }
    }

    /// Step along a row left to right, moving on to `next` past the end
    fn advance_row(&mut self, next: Stage) {
        if self.x < self.last_column() {
            self.x += 1;
        } else {
            self.enter(next);
        }
    }

    /// Step up a column, moving on to `next` past the top
    fn advance_column(&mut self, next: Stage) {
        if self.y > 0 {
            self.y -= 1;
        } else {
            self.enter(next);
        }
    }

    fn advance_interior(&mut self) {
        let row_done = match self.direction {
            RowDirection::LeftToRight => self.x == self.last_column(),
            RowDirection::RightToLeft => self.x == 1,
        };

        if !row_done {
            match self.direction {
                RowDirection::LeftToRight => self.x += 1,
                RowDirection::RightToLeft => self.x -= 1,
            }
        } else if self.y > 1 {
            self.y -= 1;
            self.direction = self.direction.flip();
            self.x = match self.direction {
                RowDirection::LeftToRight => 1,
                RowDirection::RightToLeft => self.last_column(),
            };
        } else {
            self.enter(Stage::TopRow);
        }
    }
}

impl Iterator for Sweep {
    type Item = Visit;

    fn next(&mut self) -> Option<Visit> {
        let region = match self.stage {
            Stage::BottomRow => Region::BottomRow,
            Stage::Interior => Region::Interior(self.direction),
            Stage::TopRow => Region::TopRow,
            Stage::LeftColumn => Region::LeftColumn,
            Stage::RightColumn => Region::RightColumn,
            Stage::Done => return None,
        };
        let visit = Visit {
            x: self.x,
            y: self.y,
            region,
        };

        match self.stage {
            Stage::BottomRow => self.advance_row(Stage::Interior),
            Stage::Interior => self.advance_interior(),
            Stage::TopRow => self.advance_row(Stage::LeftColumn),
            Stage::LeftColumn => self.advance_column(Stage::RightColumn),
            Stage::RightColumn => self.advance_column(Stage::Done),
            Stage::Done => {}
        }

        Some(visit)
    }
}
