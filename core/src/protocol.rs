use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

/// A single user-initiated action request, as delivered by the presentation
/// layer.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum Intent {
    Start {
        rows: Coord,
        cols: Coord,
        hazards: CellCount,
    },
    Reveal {
        pos: Coord2,
    },
    Mark {
        pos: Coord2,
    },
}

/// State deltas the session reports back after handling an intent. The
/// presentation layer maintains its own coordinate-to-element mapping and
/// repaints from these alone.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Notification {
    BoardInitialized {
        rows: Coord,
        cols: Coord,
    },
    CellsRevealed {
        cells: Vec<RevealedCell>,
    },
    CellMarked {
        pos: Coord2,
        marked: bool,
    },
    GameLost {
        hazards: Vec<Coord2>,
        triggered: Coord2,
    },
    GameWon,
    RemainingHazardCount {
        value: isize,
    },
}

/// Read-only view of one cell. `hazard` stays unset until the game is over.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CellSnapshot {
    pub pos: Coord2,
    pub state: CellState,
    pub hazard: Option<bool>,
}
