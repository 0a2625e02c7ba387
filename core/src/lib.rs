#![no_std]

extern crate alloc;

use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use board::*;
pub use cell::*;
pub use error::*;
pub use generator::*;
pub use protocol::*;
pub use session::*;
pub use types::*;

mod board;
mod cell;
mod error;
mod generator;
mod protocol;
mod session;
mod types;

/// Smallest board edge a session accepts; smaller requests are clamped up.
pub const MIN_EDGE: Coord = 5;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord2,
    pub hazards: CellCount,
}

impl GameConfig {
    pub const fn new_unchecked(size: Coord2, hazards: CellCount) -> Self {
        Self { size, hazards }
    }

    /// Applies the session clamp rules: each edge at least [`MIN_EDGE`] and
    /// the hazard count within `[1, cells - 1]`, so one safe cell always
    /// exists.
    pub fn new((rows, cols): Coord2, hazards: CellCount) -> Self {
        let rows = rows.clamp(MIN_EDGE, Coord::MAX);
        let cols = cols.clamp(MIN_EDGE, Coord::MAX);
        let hazards = hazards.clamp(1, cell_area(rows, cols) - 1);
        Self::new_unchecked((rows, cols), hazards)
    }

    pub const fn total_cells(&self) -> CellCount {
        cell_area(self.size.0, self.size.1)
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells().saturating_sub(self.hazards)
    }
}

/// Where the hazards are. A board starts with an empty layout; a generator
/// fills it in on the first reveal.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HazardLayout {
    mask: Array2<bool>,
    hazard_count: CellCount,
}

impl HazardLayout {
    /// All-clear layout of the given size, the state before placement.
    pub fn empty(size: Coord2) -> Self {
        Self {
            mask: Array2::default(size.nd_index()),
            hazard_count: 0,
        }
    }

    pub fn from_mask(mask: Array2<bool>) -> Self {
        let hazard_count = mask
            .iter()
            .filter(|&&hazard| hazard)
            .count()
            .try_into()
            .unwrap();
        Self { mask, hazard_count }
    }

    pub fn from_coords(size: Coord2, hazard_coords: &[Coord2]) -> Result<Self> {
        let mut mask: Array2<bool> = Array2::default(size.nd_index());

        for &coords in hazard_coords {
            if coords.0 >= size.0 || coords.1 >= size.1 {
                return Err(GameError::InvalidCoords);
            }
            mask[coords.nd_index()] = true;
        }

        Ok(Self::from_mask(mask))
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size.0 && coords.1 < size.1 {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn size(&self) -> Coord2 {
        let dim = self.mask.dim();
        (dim.0.try_into().unwrap(), dim.1.try_into().unwrap())
    }

    pub fn total_cells(&self) -> CellCount {
        self.mask.len().try_into().unwrap()
    }

    pub fn hazard_count(&self) -> CellCount {
        self.hazard_count
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.hazard_count
    }

    pub fn contains(&self, coords: Coord2) -> bool {
        self[coords]
    }

    /// Count of hazardous cells among the up-to-8 in-bounds neighbors.
    pub fn adjacent_hazards(&self, coords: Coord2) -> u8 {
        self.mask
            .neighbor_coords(coords)
            .filter(|&pos| self[pos])
            .count()
            .try_into()
            .unwrap()
    }
}

impl Index<Coord2> for HazardLayout {
    type Output = bool;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.mask[coords.nd_index()]
    }
}

/// Outcome of a reveal operation.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitHazard,
    Won,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

/// Outcome of a mark toggle.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum MarkOutcome {
    NoChange,
    Marked,
    Unmarked,
}

impl MarkOutcome {
    /// The new marked state, when the toggle changed anything.
    pub const fn marked(self) -> Option<bool> {
        match self {
            Self::NoChange => None,
            Self::Marked => Some(true),
            Self::Unmarked => Some(false),
        }
    }
}
