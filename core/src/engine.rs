use alloc::vec::Vec;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::*;

/// Hints granted per game unless the caller asks otherwise.
pub const DEFAULT_HINTS: u8 = 2;

/// State changes published to whoever drives the session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    BoardCreated { config: GameConfig },
    CellsRevealed(Vec<Coord2>),
    FlagChanged { coords: Coord2, flagged: bool },
    HintUsed { coords: Coord2, hints_left: u8 },
    GameWon,
    GameLost { detonated: Coord2 },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HintOutcome {
    pub coords: Coord2,
    pub reveal: RevealOutcome,
}

/// One game from board creation to win or loss. Owns its board exclusively;
/// a new game always means a new session.
#[derive(Clone, Debug)]
pub struct GameSession {
    board: Board,
    hints_left: u8,
    status: GameStatus,
    rng: SmallRng,
    events: Vec<GameEvent>,
}

impl GameSession {
    /// Generates a random board from `seed`. Hint selection continues from
    /// the same random stream, so a seed replays the whole game.
    pub fn start(config: GameConfig, hints: u8, seed: u64) -> Result<Self> {
        let mut rng = SmallRng::seed_from_u64(seed);
        let board = Board::generate(config, &mut rng)?;
        Ok(Self::with_rng(board, hints, rng))
    }

    pub fn new(board: Board, hints: u8, seed: u64) -> Self {
        Self::with_rng(board, hints, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(board: Board, hints: u8, rng: SmallRng) -> Self {
        let config = board.config();
        let status = board.evaluate();
        log::debug!(
            "New game {}x{} with {} mines, {} hints",
            config.rows(),
            config.cols(),
            config.mines,
            hints
        );
        Self {
            board,
            hints_left: hints,
            status,
            rng,
            events: Vec::from([GameEvent::BoardCreated { config }]),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn config(&self) -> GameConfig {
        self.board.config()
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    pub fn hints_left(&self) -> u8 {
        self.hints_left
    }

    pub fn flag_count(&self) -> CellCount {
        self.board.flagged_count()
    }

    pub fn revealed_count(&self) -> CellCount {
        self.board.revealed_count()
    }

    pub fn mines_left(&self) -> i32 {
        self.board.mines_left()
    }

    pub fn view_at(&self, coords: Coord2) -> Result<CellView> {
        self.board.view_at(coords)
    }

    /// Re-derives the status from the board.
    pub fn evaluate(&self) -> GameStatus {
        self.board.evaluate()
    }

    /// Takes every event published since the last call.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        core::mem::take(&mut self.events)
    }

    /// Reveals a cell. Once the game is over this is a no-op.
    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.board.validate_coords(coords)?;
        if self.is_finished() {
            return Ok(RevealOutcome::unchanged());
        }

        let outcome = self.board.reveal(coords)?;
        if outcome.has_update() {
            self.events
                .push(GameEvent::CellsRevealed(outcome.revealed.clone()));
        }
        self.refresh_status();
        Ok(outcome)
    }

    /// Toggles a flag and returns the cell's flagged state afterwards.
    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<bool> {
        let coords = self.board.validate_coords(coords)?;
        let was_flagged = self.board.cell(coords).is_flagged();
        if self.is_finished() {
            return Ok(was_flagged);
        }

        let flagged = self.board.toggle_flag(coords)?;
        if flagged != was_flagged {
            self.events.push(GameEvent::FlagChanged { coords, flagged });
        }
        Ok(flagged)
    }

    /// Spends one hint on a random safe cell and reveals it. Nothing is spent
    /// when the quota is exhausted, the game is over, or no safe cell is left.
    pub fn use_hint(&mut self) -> Result<Option<HintOutcome>> {
        if self.hints_left == 0 || self.is_finished() {
            return Ok(None);
        }
        let Some(coords) = self.board.select_hint(&mut self.rng) else {
            return Ok(None);
        };

        self.hints_left -= 1;
        self.events.push(GameEvent::HintUsed {
            coords,
            hints_left: self.hints_left,
        });
        log::debug!("Hint at {:?}, {} left", coords, self.hints_left);

        let reveal = self.reveal(coords)?;
        Ok(Some(HintOutcome { coords, reveal }))
    }

    fn refresh_status(&mut self) {
        let status = self.board.evaluate();
        if status == self.status {
            return;
        }
        self.status = status;

        match status {
            GameStatus::Won => {
                log::debug!("Game won");
                self.events.push(GameEvent::GameWon);
            }
            GameStatus::Lost => {
                let detonated = self.board.detonated().unwrap_or_default();
                log::debug!("Game lost at {:?}", detonated);
                let mines = self.board.reveal_all_mines();
                if !mines.is_empty() {
                    self.events.push(GameEvent::CellsRevealed(mines));
                }
                self.events.push(GameEvent::GameLost { detonated });
            }
            GameStatus::Ongoing => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(size: Coord2, mines: &[Coord2]) -> GameSession {
        let board = Board::from_mine_coords(size, mines).unwrap();
        let mut session = GameSession::new(board, DEFAULT_HINTS, 0);
        session.drain_events();
        session
    }

    #[test]
    fn new_session_publishes_board_created() {
        let config = Difficulty::Easy.config();
        let mut session = GameSession::start(config, DEFAULT_HINTS, 1).unwrap();

        assert_eq!(
            session.drain_events(),
            [GameEvent::BoardCreated { config }]
        );
        assert!(session.drain_events().is_empty());
        assert_eq!(session.status(), GameStatus::Ongoing);
        assert_eq!(session.hints_left(), 2);
    }

    #[test]
    fn start_rejects_invalid_config() {
        let config = GameConfig::new_unchecked((0, 3), 0);

        assert!(matches!(
            GameSession::start(config, DEFAULT_HINTS, 1),
            Err(GameError::InvalidParameters { .. })
        ));
    }

    #[test]
    fn winning_publishes_reveals_then_win() {
        let mut session = session((3, 3), &[(0, 0)]);
        let safe: Vec<Coord2> = session
            .board()
            .iter_coords()
            .filter(|&c| c != (0, 0))
            .collect();

        for coords in safe {
            session.reveal(coords).unwrap();
        }

        assert_eq!(session.status(), GameStatus::Won);
        assert_eq!(session.evaluate(), GameStatus::Won);
        let events = session.drain_events();
        assert_eq!(events.last(), Some(&GameEvent::GameWon));
        assert_eq!(
            events
                .iter()
                .filter(|event| matches!(event, GameEvent::GameWon))
                .count(),
            1
        );
    }

    #[test]
    fn losing_reveals_mines_and_stops_play() {
        let mut session = session((3, 3), &[(0, 0), (2, 2)]);
        session.toggle_flag((2, 2)).unwrap();
        session.drain_events();

        let outcome = session.reveal((0, 0)).unwrap();

        assert!(outcome.hit_mine());
        assert_eq!(session.status(), GameStatus::Lost);
        assert_eq!(
            session.drain_events(),
            [
                GameEvent::CellsRevealed(Vec::from([(0, 0)])),
                GameEvent::GameLost { detonated: (0, 0) },
            ]
        );
        assert_eq!(session.view_at((0, 0)), Ok(CellView::Detonated));
        assert_eq!(session.view_at((2, 2)), Ok(CellView::Flagged));

        assert_eq!(session.reveal((1, 1)).unwrap(), RevealOutcome::unchanged());
        assert!(session.toggle_flag((2, 2)).unwrap());
        assert_eq!(session.use_hint().unwrap(), None);
        assert_eq!(session.hints_left(), 2);
        assert_eq!(session.revealed_count(), 0);
        assert!(session.drain_events().is_empty());
    }

    #[test]
    fn mine_first_on_three_by_three_loses() {
        let mut session = session((3, 3), &[(0, 0)]);

        session.reveal((0, 0)).unwrap();
        session.reveal((2, 2)).unwrap();

        assert_eq!(session.evaluate(), GameStatus::Lost);
        assert_eq!(session.revealed_count(), 0);
    }

    #[test]
    fn flag_events_and_mine_counter() {
        let mut session = session((3, 3), &[(0, 0)]);

        assert!(session.toggle_flag((1, 1)).unwrap());
        assert!(session.toggle_flag((2, 2)).unwrap());
        assert_eq!(session.mines_left(), -1);
        assert!(!session.toggle_flag((1, 1)).unwrap());

        assert_eq!(session.flag_count(), 1);
        assert_eq!(
            session.drain_events(),
            [
                GameEvent::FlagChanged {
                    coords: (1, 1),
                    flagged: true
                },
                GameEvent::FlagChanged {
                    coords: (2, 2),
                    flagged: true
                },
                GameEvent::FlagChanged {
                    coords: (1, 1),
                    flagged: false
                },
            ]
        );
    }

    #[test]
    fn flag_on_revealed_cell_publishes_nothing() {
        let mut session = session((3, 3), &[(0, 0)]);
        session.reveal((1, 1)).unwrap();
        session.drain_events();

        assert!(!session.toggle_flag((1, 1)).unwrap());
        assert!(session.drain_events().is_empty());
    }

    #[test]
    fn hints_consume_quota_and_never_hit_mines() {
        let mut session = session((4, 4), &[(0, 0), (0, 3), (3, 0), (3, 3)]);

        let first = session.use_hint().unwrap().unwrap();
        assert!(!session.board().cell(first.coords).is_mine());
        assert!(!first.reveal.hit_mine());
        assert_eq!(session.hints_left(), 1);

        let second = session.use_hint().unwrap().unwrap();
        assert!(!session.board().cell(second.coords).is_mine());
        assert_eq!(session.hints_left(), 0);

        assert_eq!(session.use_hint().unwrap(), None);
        assert_eq!(session.status(), GameStatus::Ongoing);
    }

    #[test]
    fn hint_on_zero_cell_cascades() {
        let mut session = session((5, 5), &[]);

        let hint = session.use_hint().unwrap().unwrap();

        assert_eq!(hint.reveal.revealed.len(), 25);
        assert_eq!(session.status(), GameStatus::Won);
        let events = session.drain_events();
        assert_eq!(
            events[0],
            GameEvent::HintUsed {
                coords: hint.coords,
                hints_left: 1
            }
        );
        assert_eq!(events.last(), Some(&GameEvent::GameWon));
    }

    #[test]
    fn hint_without_safe_cells_spends_nothing() {
        let mut session = session((1, 2), &[(0, 0)]);
        session.toggle_flag((0, 1)).unwrap();

        assert_eq!(session.use_hint().unwrap(), None);
        assert_eq!(session.hints_left(), 2);
    }

    #[test]
    fn seeded_sessions_replay_identically() {
        let config = Difficulty::Medium.config();
        let mut a = GameSession::start(config, 3, 99).unwrap();
        let mut b = GameSession::start(config, 3, 99).unwrap();

        assert_eq!(a.board(), b.board());
        assert_eq!(a.use_hint().unwrap(), b.use_hint().unwrap());
    }

    #[test]
    fn view_outside_the_board_is_an_error() {
        let session = session((3, 3), &[(0, 0)]);

        assert_eq!(
            session.view_at((3, 1)),
            Err(GameError::CoordinateOutOfRange(3, 1))
        );
        assert_eq!(session.view_at((2, 2)), Ok(CellView::Hidden));
    }

    #[test]
    fn out_of_range_is_an_error_even_after_game_end() {
        let mut session = session((2, 2), &[(0, 0)]);
        session.reveal((0, 0)).unwrap();

        assert_eq!(
            session.reveal((2, 0)),
            Err(GameError::CoordinateOutOfRange(2, 0))
        );
        assert_eq!(
            session.toggle_flag((0, 9)),
            Err(GameError::CoordinateOutOfRange(0, 9))
        );
    }
}
