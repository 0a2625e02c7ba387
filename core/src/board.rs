use alloc::collections::{BTreeSet, VecDeque};
use alloc::vec::Vec;
use core::num::Saturating;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// One entry of a reveal diff: a cell that switched to revealed this call.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RevealedCell {
    pub pos: Coord2,
    pub adjacent_hazards: u8,
}

/// Everything a single [`Board::reveal`] call changed.
#[derive(Clone, Debug, PartialEq)]
pub struct RevealReport {
    pub outcome: RevealOutcome,
    pub revealed: Vec<RevealedCell>,
}

impl RevealReport {
    const fn unchanged() -> Self {
        Self {
            outcome: RevealOutcome::NoChange,
            revealed: Vec::new(),
        }
    }
}

/// Grid state for one play-through: cell states, hazard layout, per-cell
/// adjacency counts, and the derived counters the win check relies on.
/// Purely logical; rendering and input belong to whoever embeds the session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    config: GameConfig,
    hazards: HazardLayout,
    adjacency: Array2<u8>,
    cells: Array2<CellState>,
    revealed_safe: Saturating<CellCount>,
    marked: Saturating<CellCount>,
    triggered_hazard: Option<Coord2>,
}

impl Board {
    /// Allocates an all-hidden board with no hazards placed yet.
    pub fn new(config: GameConfig) -> Result<Self> {
        let (rows, cols) = config.size;
        if rows == 0 || cols == 0 {
            return Err(GameError::InvalidConfiguration);
        }
        if config.hazards == 0 || config.hazards > config.total_cells() - 1 {
            return Err(GameError::InvalidConfiguration);
        }

        Ok(Self {
            config,
            hazards: HazardLayout::empty(config.size),
            adjacency: Array2::default(config.size.nd_index()),
            cells: Array2::default(config.size.nd_index()),
            revealed_safe: Saturating(0),
            marked: Saturating(0),
            triggered_hazard: None,
        })
    }

    pub fn size(&self) -> Coord2 {
        self.config.size
    }

    pub fn total_hazards(&self) -> CellCount {
        self.config.hazards
    }

    pub fn contains(&self, coords: Coord2) -> bool {
        coords.0 < self.config.size.0 && coords.1 < self.config.size.1
    }

    pub fn cell_at(&self, coords: Coord2) -> CellState {
        self.cells[coords.nd_index()]
    }

    pub fn has_hazard_at(&self, coords: Coord2) -> bool {
        self.hazards.contains(coords)
    }

    pub fn adjacent_hazards_at(&self, coords: Coord2) -> u8 {
        self.adjacency[coords.nd_index()]
    }

    pub fn revealed_safe_count(&self) -> CellCount {
        self.revealed_safe.0
    }

    pub fn marked_count(&self) -> CellCount {
        self.marked.0
    }

    /// How many hazards have not been marked yet; negative when over-marked.
    pub fn hazards_left(&self) -> isize {
        (self.config.hazards as isize) - (self.marked.0 as isize)
    }

    pub fn triggered_hazard(&self) -> Option<Coord2> {
        self.triggered_hazard
    }

    pub fn is_won(&self) -> bool {
        self.revealed_safe == Saturating(self.config.safe_cells())
    }

    /// Installs the layout produced by `generator`. Hazard flags only;
    /// adjacency counts stay untouched until [`Board::compute_adjacency`].
    pub fn place_hazards<G: HazardGenerator>(&mut self, generator: G) -> Result<()> {
        let layout = generator.generate(self.config);
        if layout.size() != self.config.size {
            return Err(GameError::InvalidBoardShape);
        }
        if layout.hazard_count() >= layout.total_cells() {
            return Err(GameError::InvalidConfiguration);
        }

        self.hazards = layout;
        Ok(())
    }

    /// Derives every non-hazard cell's neighbor count from the installed
    /// layout. Meaningful only after placement.
    pub fn compute_adjacency(&mut self) {
        let (rows, cols) = self.config.size;
        for row in 0..rows {
            for col in 0..cols {
                let coords = (row, col);
                if !self.hazards.contains(coords) {
                    self.adjacency[coords.nd_index()] = self.hazards.adjacent_hazards(coords);
                }
            }
        }
    }

    /// Opens a cell. Revealed and marked cells are sealed (empty report);
    /// a hazard ends the call without touching the grid. A zero-adjacency
    /// cell expands across its concealed region, and the report lists every
    /// cell that became revealed.
    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealReport> {
        let coords = self.validate_coords(coords)?;

        if !matches!(self.cells[coords.nd_index()], CellState::Hidden) {
            return Ok(RevealReport::unchanged());
        }

        if self.hazards.contains(coords) {
            self.triggered_hazard = Some(coords);
            log::debug!("hazard hit at {:?}", coords);
            return Ok(RevealReport {
                outcome: RevealOutcome::HitHazard,
                revealed: Vec::new(),
            });
        }

        let mut revealed = Vec::new();
        self.reveal_safe_cell(coords, &mut revealed);
        if self.adjacency[coords.nd_index()] == 0 {
            self.flood_from(coords, &mut revealed);
        }

        let outcome = if self.is_won() {
            RevealOutcome::Won
        } else {
            RevealOutcome::Revealed
        };
        Ok(RevealReport { outcome, revealed })
    }

    /// Flips a concealed cell between hidden and marked. Revealed cells are
    /// not markable.
    pub fn toggle_mark(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        let coords = self.validate_coords(coords)?;

        Ok(match self.cells[coords.nd_index()] {
            CellState::Hidden => {
                self.cells[coords.nd_index()] = CellState::Marked;
                self.marked += 1;
                MarkOutcome::Marked
            }
            CellState::Marked => {
                self.cells[coords.nd_index()] = CellState::Hidden;
                self.marked -= 1;
                MarkOutcome::Unmarked
            }
            CellState::Revealed(_) => MarkOutcome::NoChange,
        })
    }

    /// Every hazard coordinate, row-major.
    pub fn hazard_coords(&self) -> Vec<Coord2> {
        let (rows, cols) = self.config.size;
        let mut coords = Vec::with_capacity(self.hazards.hazard_count().into());
        for row in 0..rows {
            for col in 0..cols {
                if self.hazards.contains((row, col)) {
                    coords.push((row, col));
                }
            }
        }
        coords
    }

    /// Marks every still-hidden hazard, returning the newly marked
    /// coordinates in row-major order.
    pub fn mark_remaining_hazards(&mut self) -> Vec<Coord2> {
        let (rows, cols) = self.config.size;
        let mut newly_marked = Vec::new();
        for row in 0..rows {
            for col in 0..cols {
                let coords = (row, col);
                if self.hazards.contains(coords)
                    && matches!(self.cells[coords.nd_index()], CellState::Hidden)
                {
                    self.cells[coords.nd_index()] = CellState::Marked;
                    self.marked += 1;
                    newly_marked.push(coords);
                }
            }
        }
        newly_marked
    }

    fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        self.hazards.validate_coords(coords)
    }

    fn reveal_safe_cell(&mut self, coords: Coord2, revealed: &mut Vec<RevealedCell>) {
        let adjacent_hazards = self.adjacency[coords.nd_index()];
        self.cells[coords.nd_index()] = CellState::Revealed(adjacent_hazards);
        self.revealed_safe += 1;
        revealed.push(RevealedCell {
            pos: coords,
            adjacent_hazards,
        });
        log::trace!("revealed {:?}, adjacent hazards: {}", coords, adjacent_hazards);
    }

    /// Breadth-first expansion across the zero-adjacency region around
    /// `origin`. Positive-count cells are revealed but do not expand;
    /// marked and already-revealed cells are never entered. Each cell
    /// enters the frontier at most once.
    fn flood_from(&mut self, origin: Coord2, revealed: &mut Vec<RevealedCell>) {
        let mut visited = BTreeSet::from([origin]);
        let mut frontier: VecDeque<_> = self
            .cells
            .neighbor_coords(origin)
            .filter(|&pos| matches!(self.cells[pos.nd_index()], CellState::Hidden))
            .collect();

        while let Some(coords) = frontier.pop_front() {
            if !visited.insert(coords) {
                continue;
            }
            if !matches!(self.cells[coords.nd_index()], CellState::Hidden) {
                continue;
            }

            self.reveal_safe_cell(coords, revealed);

            if self.adjacency[coords.nd_index()] == 0 {
                frontier.extend(
                    self.cells
                        .neighbor_coords(coords)
                        .filter(|&pos| matches!(self.cells[pos.nd_index()], CellState::Hidden))
                        .filter(|pos| !visited.contains(pos)),
                );
            }
        }
    }
}
