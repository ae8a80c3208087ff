use serde::{Deserialize, Serialize};
use std::fmt;

/// A bookable position in the hall, identified by row and column.
/// Two seats are equal iff both coordinates match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Seat {
    pub row: i32,
    pub column: i32,
}

impl Seat {
    pub fn new(row: i32, column: i32) -> Self {
        Seat { row, column }
    }

    /// Structurally valid means both coordinates are non-negative.
    pub fn is_valid(&self) -> bool {
        self.row >= 0 && self.column >= 0
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}
