use serde::{Deserialize, Serialize};

/// Player-visible state of a single cell. `Revealed` carries the cell's
/// adjacent-hazard count as determined at reveal time.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CellState {
    Hidden,
    Marked,
    Revealed(u8),
}

impl CellState {
    /// Hidden or marked: the cell has not been opened yet.
    pub const fn is_concealed(self) -> bool {
        matches!(self, Self::Hidden | Self::Marked)
    }
}

impl Default for CellState {
    fn default() -> Self {
        Self::Hidden
    }
}
