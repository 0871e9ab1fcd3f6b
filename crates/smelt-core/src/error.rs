//! World construction errors

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum WorldError {
    /// Border handling in the sweep needs at least one interior row and column
    #[error("world of {width}x{height} is too small, both sides must be at least 3 cells")]
    DegenerateSize { width: usize, height: usize },

    #[error("world of {width}x{height} does not fit in memory")]
    TooLarge { width: usize, height: usize },

    #[error("ambient temperature {0}K is not a temperature")]
    InvalidTemperature(f32),
}
