use alloc::vec;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

/// Session lifecycle. `Won` and `Lost` are terminal: the session accepts no
/// further mutation and a fresh one is created per play-through.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Phase {
    Configuring,
    AwaitingFirstReveal,
    InProgress,
    Won,
    Lost,
}

impl Phase {
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }

    const fn accepts_reveals(self) -> bool {
        matches!(self, Self::AwaitingFirstReveal | Self::InProgress)
    }
}

impl Default for Phase {
    fn default() -> Self {
        Self::Configuring
    }
}

/// Drives one play-through of a [`Board`]: configuration, the first-reveal
/// hazard placement, intent handling, and the notifications a presentation
/// layer repaints from. Intents that do not apply in the current phase are
/// benign no-ops, reported as an empty batch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSession {
    seed: u64,
    phase: Phase,
    board: Option<Board>,
}

impl GameSession {
    /// `seed` drives hazard placement on the first reveal; two sessions with
    /// the same seed, configuration, and first reveal play out identically.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            phase: Phase::default(),
            board: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    /// Single entry point for presentation-layer intents.
    pub fn apply(&mut self, intent: Intent) -> Result<Vec<Notification>> {
        match intent {
            Intent::Start { rows, cols, hazards } => self.start(rows, cols, hazards),
            Intent::Reveal { pos } => Ok(self.reveal(pos)),
            Intent::Mark { pos } => Ok(self.toggle_mark(pos)),
        }
    }

    /// Clamps the requested parameters, allocates the board, and arms the
    /// first-reveal hazard placement. Accepted only while configuring; a
    /// session is not reused across games.
    pub fn start(&mut self, rows: Coord, cols: Coord, hazards: CellCount) -> Result<Vec<Notification>> {
        if !matches!(self.phase, Phase::Configuring) {
            return Ok(Vec::new());
        }

        let config = GameConfig::new((rows, cols), hazards);
        let board = Board::new(config)?;
        log::debug!(
            "starting {}x{} board with {} hazards",
            config.size.0,
            config.size.1,
            config.hazards
        );

        let notifications = vec![
            Notification::BoardInitialized {
                rows: config.size.0,
                cols: config.size.1,
            },
            Notification::RemainingHazardCount {
                value: board.hazards_left(),
            },
        ];
        self.board = Some(board);
        self.phase = Phase::AwaitingFirstReveal;
        Ok(notifications)
    }

    /// Handles a reveal intent. Total: anything inapplicable is an empty
    /// batch, never an error. The first reveal places the hazards with the
    /// revealed cell excluded, then computes adjacency, so the opening move
    /// can never detonate.
    pub fn reveal(&mut self, pos: Coord2) -> Vec<Notification> {
        if !self.phase.accepts_reveals() {
            return Vec::new();
        }
        let Some(board) = self.board.as_mut() else {
            return Vec::new();
        };
        if !board.contains(pos) {
            log::warn!("ignoring out-of-range reveal at {:?}", pos);
            return Vec::new();
        }

        if matches!(self.phase, Phase::AwaitingFirstReveal) {
            let generator = RandomHazardGenerator::new(self.seed, pos);
            if let Err(err) = board.place_hazards(generator) {
                log::warn!("hazard placement failed: {}", err);
                return Vec::new();
            }
            board.compute_adjacency();
            self.phase = Phase::InProgress;
        }

        let report = match board.reveal(pos) {
            Ok(report) => report,
            Err(err) => {
                log::warn!("ignoring reveal at {:?}: {}", pos, err);
                return Vec::new();
            }
        };

        match report.outcome {
            RevealOutcome::NoChange => Vec::new(),
            RevealOutcome::Revealed => vec![Notification::CellsRevealed {
                cells: report.revealed,
            }],
            RevealOutcome::HitHazard => {
                self.phase = Phase::Lost;
                let triggered = board.triggered_hazard().unwrap_or(pos);
                log::debug!("session lost, hazard at {:?}", triggered);
                vec![Notification::GameLost {
                    hazards: board.hazard_coords(),
                    triggered,
                }]
            }
            RevealOutcome::Won => {
                self.phase = Phase::Won;
                log::debug!("session won");
                let mut notifications = vec![
                    Notification::CellsRevealed {
                        cells: report.revealed,
                    },
                    Notification::GameWon,
                ];
                for coords in board.mark_remaining_hazards() {
                    notifications.push(Notification::CellMarked {
                        pos: coords,
                        marked: true,
                    });
                }
                notifications.push(Notification::RemainingHazardCount {
                    value: board.hazards_left(),
                });
                notifications
            }
        }
    }

    /// Handles a mark intent, total like `reveal`. Marks are live only while
    /// the game is in progress: before the first reveal no hazards exist to
    /// mark, and terminal sessions are inert.
    pub fn toggle_mark(&mut self, pos: Coord2) -> Vec<Notification> {
        if !matches!(self.phase, Phase::InProgress) {
            return Vec::new();
        }
        let Some(board) = self.board.as_mut() else {
            return Vec::new();
        };

        match board.toggle_mark(pos) {
            Ok(outcome) => match outcome.marked() {
                Some(marked) => vec![
                    Notification::CellMarked { pos, marked },
                    Notification::RemainingHazardCount {
                        value: board.hazards_left(),
                    },
                ],
                None => Vec::new(),
            },
            Err(err) => {
                log::warn!("ignoring mark at {:?}: {}", pos, err);
                Vec::new()
            }
        }
    }

    /// Read-only view of one cell; `None` without a board or out of bounds.
    /// The hazard flag is withheld until the session is terminal.
    pub fn cell(&self, pos: Coord2) -> Option<CellSnapshot> {
        let board = self.board.as_ref()?;
        if !board.contains(pos) {
            return None;
        }

        let hazard = self.phase.is_terminal().then(|| board.has_hazard_at(pos));
        Some(CellSnapshot {
            pos,
            state: board.cell_at(pos),
            hazard,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started(seed: u64, rows: Coord, cols: Coord, hazards: CellCount) -> GameSession {
        let mut session = GameSession::new(seed);
        session.start(rows, cols, hazards).unwrap();
        session
    }

    fn revealed_cells(notifications: &[Notification]) -> usize {
        notifications
            .iter()
            .map(|notification| match notification {
                Notification::CellsRevealed { cells } => cells.len(),
                _ => 0,
            })
            .sum()
    }

    fn first_concealed(session: &GameSession) -> Coord2 {
        let board = session.board().unwrap();
        let (rows, cols) = board.size();
        for row in 0..rows {
            for col in 0..cols {
                if board.cell_at((row, col)).is_concealed() {
                    return (row, col);
                }
            }
        }
        unreachable!("no concealed cell left");
    }

    #[test]
    fn start_clamps_and_reports_the_board() {
        let mut session = GameSession::new(1);

        let notifications = session.start(2, 2, 99).unwrap();

        assert_eq!(
            notifications,
            [
                Notification::BoardInitialized { rows: 5, cols: 5 },
                Notification::RemainingHazardCount { value: 24 },
            ]
        );
        assert_eq!(session.phase(), Phase::AwaitingFirstReveal);
    }

    #[test]
    fn repeated_start_is_a_no_op() {
        let mut session = started(1, 9, 9, 10);

        assert!(session.start(5, 5, 1).unwrap().is_empty());
        assert_eq!(session.board().unwrap().size(), (9, 9));
    }

    #[test]
    fn intents_before_start_are_ignored() {
        let mut session = GameSession::new(0);

        assert!(session.reveal((0, 0)).is_empty());
        assert!(session.toggle_mark((0, 0)).is_empty());
        assert!(session.cell((0, 0)).is_none());
    }

    #[test]
    fn first_reveal_is_always_safe() {
        for seed in 0..32 {
            let mut session = started(seed, 9, 9, 10);

            let notifications = session.reveal((4, 4));

            assert_ne!(session.phase(), Phase::Lost, "seed {seed}");
            assert!(revealed_cells(&notifications) >= 1, "seed {seed}");
            let board = session.board().unwrap();
            assert!(!board.has_hazard_at((4, 4)), "seed {seed}");
            assert_eq!(board.total_hazards(), 10, "seed {seed}");
            assert_eq!(board.hazard_coords().len(), 10, "seed {seed}");
        }
    }

    #[test]
    fn marks_before_the_first_reveal_are_ignored() {
        let mut session = started(3, 9, 9, 10);

        assert!(session.toggle_mark((0, 0)).is_empty());
        assert_eq!(session.phase(), Phase::AwaitingFirstReveal);
    }

    #[test]
    fn out_of_bounds_first_reveal_does_not_place_hazards() {
        let mut session = started(3, 9, 9, 10);

        assert!(session.reveal((9, 9)).is_empty());

        assert_eq!(session.phase(), Phase::AwaitingFirstReveal);
        assert!(session.board().unwrap().hazard_coords().is_empty());
    }

    #[test]
    fn marking_emits_the_updated_remaining_count() {
        let mut session = started(5, 9, 9, 10);
        session.reveal((4, 4));
        assert_eq!(session.phase(), Phase::InProgress);

        let target = first_concealed(&session);
        assert_eq!(
            session.toggle_mark(target),
            [
                Notification::CellMarked {
                    pos: target,
                    marked: true
                },
                Notification::RemainingHazardCount { value: 9 },
            ]
        );
        assert_eq!(
            session.toggle_mark(target),
            [
                Notification::CellMarked {
                    pos: target,
                    marked: false
                },
                Notification::RemainingHazardCount { value: 10 },
            ]
        );
    }

    #[test]
    fn revealing_a_hazard_loses_and_freezes_the_session() {
        let mut session = started(5, 9, 9, 10);
        session.reveal((4, 4));
        assert_eq!(session.phase(), Phase::InProgress);

        let hazard = session.board().unwrap().hazard_coords()[0];
        let notifications = session.reveal(hazard);

        assert_eq!(session.phase(), Phase::Lost);
        match &notifications[..] {
            [Notification::GameLost { hazards, triggered }] => {
                assert_eq!(hazards.len(), 10);
                assert_eq!(*triggered, hazard);
                assert!(hazards.contains(&hazard));
            }
            other => panic!("expected GameLost, got {:?}", other),
        }

        let board = session.board().unwrap();
        let revealed_before = board.revealed_safe_count();
        let marked_before = board.marked_count();

        assert!(session.reveal((0, 0)).is_empty());
        assert!(session.toggle_mark((0, 1)).is_empty());

        let board = session.board().unwrap();
        assert_eq!(board.revealed_safe_count(), revealed_before);
        assert_eq!(board.marked_count(), marked_before);
    }

    #[test]
    fn max_hazards_make_the_first_reveal_an_instant_win() {
        let mut session = started(8, 5, 5, 24);

        let notifications = session.reveal((2, 2));

        assert_eq!(session.phase(), Phase::Won);
        assert_eq!(
            notifications[0],
            Notification::CellsRevealed {
                cells: alloc::vec![RevealedCell {
                    pos: (2, 2),
                    adjacent_hazards: 8
                }]
            }
        );
        assert_eq!(notifications[1], Notification::GameWon);
        let auto_marks = notifications
            .iter()
            .filter(|notification| {
                matches!(notification, Notification::CellMarked { marked: true, .. })
            })
            .count();
        assert_eq!(auto_marks, 24);
        assert_eq!(
            notifications.last().unwrap(),
            &Notification::RemainingHazardCount { value: 0 }
        );

        // terminal: nothing moves anymore, and hazards become visible
        assert!(session.reveal((0, 0)).is_empty());
        assert_eq!(session.cell((0, 0)).unwrap().hazard, Some(true));
        assert_eq!(session.cell((0, 0)).unwrap().state, CellState::Marked);
    }

    #[test]
    fn snapshots_withhold_hazard_flags_while_the_game_is_live() {
        let mut session = started(9, 9, 9, 10);
        session.reveal((4, 4));
        assert_eq!(session.phase(), Phase::InProgress);

        assert_eq!(session.cell((4, 4)).unwrap().hazard, None);
        assert!(session.cell((200, 200)).is_none());
    }

    #[test]
    fn intents_dispatch_to_the_matching_operation() {
        let mut session = GameSession::new(11);

        session
            .apply(Intent::Start {
                rows: 9,
                cols: 9,
                hazards: 10,
            })
            .unwrap();
        assert_eq!(session.phase(), Phase::AwaitingFirstReveal);

        let notifications = session.apply(Intent::Reveal { pos: (4, 4) }).unwrap();
        assert!(revealed_cells(&notifications) >= 1);
        assert_eq!(session.phase(), Phase::InProgress);

        let target = first_concealed(&session);
        let notifications = session.apply(Intent::Mark { pos: target }).unwrap();
        assert!(matches!(
            notifications[0],
            Notification::CellMarked { marked: true, .. }
        ));
    }
}
