use alloc::collections::{BTreeSet, VecDeque};
use alloc::vec;
use alloc::vec::Vec;
use ndarray::Array2;
use rand::Rng;
use rand::seq::IndexedRandom;

use crate::*;

/// Minefield for one game: fixed mine layout plus per-cell play state.
///
/// Persist a [`BoardSnapshot`] rather than the board itself; [`Board::restore`]
/// checks it against the layout.
#[derive(Clone, Debug, PartialEq)]
pub struct Board {
    cells: Array2<Cell>,
    mine_count: CellCount,
    revealed_count: CellCount,
    flagged_count: CellCount,
    detonated: Option<Coord2>,
}

impl Board {
    /// Generates a board with mines placed uniformly at random by `rng`.
    /// The config is checked again, so a hand-built one cannot slip through.
    pub fn generate<R: Rng + ?Sized>(config: GameConfig, rng: &mut R) -> Result<Self> {
        let config = GameConfig::new(config.size, config.mines)?;
        Ok(Self::from_mine_mask(place_mines(config, rng)))
    }

    /// Builds a board from a mine mask, computing every adjacency count once.
    /// Callers guarantee the mask came from a validated config.
    pub(crate) fn from_mine_mask(mine_mask: Array2<bool>) -> Self {
        let cells = Array2::from_shape_fn(mine_mask.raw_dim(), |(row, col)| {
            let coords = (row as Coord, col as Coord);
            let adjacent = mine_mask
                .iter_neighbors(coords)
                .filter(|&pos| mine_mask[pos.to_nd_index()])
                .count() as u8;
            Cell::new(mine_mask[[row, col]], adjacent)
        });
        let mine_count = mine_mask.iter().filter(|&&mine| mine).count() as CellCount;
        log::debug!(
            "Created {}x{} board with {} mines",
            cells.nrows(),
            cells.ncols(),
            mine_count
        );

        Self {
            cells,
            mine_count,
            revealed_count: 0,
            flagged_count: 0,
            detonated: None,
        }
    }

    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let mut mine_mask: Array2<bool> = Array2::default(size.to_nd_index());

        for &coords in mine_coords {
            if coords.0 >= size.0 || coords.1 >= size.1 {
                return Err(GameError::CoordinateOutOfRange(coords.0, coords.1));
            }
            mine_mask[coords.to_nd_index()] = true;
        }

        let mines = mine_mask.iter().filter(|&&mine| mine).count() as CellCount;
        GameConfig::new(size, mines)?;
        Ok(Self::from_mine_mask(mine_mask))
    }

    pub fn config(&self) -> GameConfig {
        GameConfig::new_unchecked(self.size(), self.mine_count)
    }

    pub fn size(&self) -> Coord2 {
        let (rows, cols) = self.cells.dim();
        (rows as Coord, cols as Coord)
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size.0 && coords.1 < size.1 {
            Ok(coords)
        } else {
            Err(GameError::CoordinateOutOfRange(coords.0, coords.1))
        }
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn total_cells(&self) -> CellCount {
        self.cells.len() as CellCount
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    /// Revealed non-mine cells.
    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count
    }

    pub fn flagged_count(&self) -> CellCount {
        self.flagged_count
    }

    /// Mines minus flags; negative when over-flagged.
    pub fn mines_left(&self) -> i32 {
        i32::from(self.mine_count) - i32::from(self.flagged_count)
    }

    pub fn detonated(&self) -> Option<Coord2> {
        self.detonated
    }

    pub fn iter_coords(&self) -> impl Iterator<Item = Coord2> + use<> {
        iter_coords(self.size())
    }

    pub fn cell_at(&self, coords: Coord2) -> Result<Cell> {
        let coords = self.validate_coords(coords)?;
        Ok(self.cell(coords))
    }

    /// Cell lookup for coordinates already known to be on the board.
    pub(crate) fn cell(&self, coords: Coord2) -> Cell {
        self.cells[coords.to_nd_index()]
    }

    pub fn view_at(&self, coords: Coord2) -> Result<CellView> {
        let cell = self.cell_at(coords)?;
        let view = if cell.is_flagged() {
            CellView::Flagged
        } else if !cell.is_revealed() {
            CellView::Hidden
        } else if !cell.is_mine() {
            CellView::Revealed(cell.adjacent_mines())
        } else if self.detonated == Some(coords) {
            CellView::Detonated
        } else {
            CellView::Mine
        };
        Ok(view)
    }

    /// Reveals a cell, flood-filling across zero cells.
    ///
    /// Revealed and flagged cells are left untouched and produce an empty
    /// outcome. Hitting a mine reveals only that mine; showing the remaining
    /// mines is up to [`Board::reveal_all_mines`].
    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.validate_coords(coords)?;
        let cell = self.cell(coords);

        if !cell.is_openable() {
            return Ok(RevealOutcome::unchanged());
        }

        self.cells[coords.to_nd_index()].set_revealed();

        if cell.is_mine() {
            log::debug!("Hit mine at {:?}", coords);
            self.detonated = Some(coords);
            return Ok(RevealOutcome {
                kind: RevealKind::HitMine,
                revealed: vec![coords],
            });
        }

        self.revealed_count += 1;
        log::debug!(
            "Revealed cell at {:?}, adjacent mines: {}",
            coords,
            cell.adjacent_mines()
        );

        let mut revealed = vec![coords];
        if cell.adjacent_mines() == 0 {
            self.flood_fill(coords, &mut revealed);
        }

        Ok(RevealOutcome {
            kind: RevealKind::Continue,
            revealed,
        })
    }

    /// Opens everything reachable from the zero cell at `origin`. Each cell
    /// is queued at most once, so the traversal is bounded by the cell count.
    fn flood_fill(&mut self, origin: Coord2, revealed: &mut Vec<Coord2>) {
        let mut visited = BTreeSet::from([origin]);
        let mut to_visit = VecDeque::new();
        self.enqueue_openable_neighbors(origin, &mut visited, &mut to_visit);
        log::trace!(
            "Starting flood-fill from {:?}, initial neighbors: {:?}",
            origin,
            to_visit
        );

        while let Some(visit_coords) = to_visit.pop_front() {
            let cell = self.cell(visit_coords);
            // neighbours of a zero cell are never mines
            debug_assert!(!cell.is_mine());

            self.cells[visit_coords.to_nd_index()].set_revealed();
            self.revealed_count += 1;
            revealed.push(visit_coords);
            log::trace!(
                "Flood revealed cell at {:?}, adjacent mines: {}",
                visit_coords,
                cell.adjacent_mines()
            );

            if cell.adjacent_mines() == 0 {
                self.enqueue_openable_neighbors(visit_coords, &mut visited, &mut to_visit);
            }
        }
    }

    fn enqueue_openable_neighbors(
        &self,
        coords: Coord2,
        visited: &mut BTreeSet<Coord2>,
        to_visit: &mut VecDeque<Coord2>,
    ) {
        for pos in self.cells.iter_neighbors(coords) {
            // flags are barriers: the fill never opens or crosses them
            if self.cell(pos).is_openable() && visited.insert(pos) {
                to_visit.push_back(pos);
            }
        }
    }

    /// Toggles the flag on a hidden cell and returns the new flagged state.
    /// Revealed cells cannot be flagged and always report `false`.
    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<bool> {
        let coords = self.validate_coords(coords)?;
        let cell = &mut self.cells[coords.to_nd_index()];

        if cell.is_revealed() {
            return Ok(false);
        }

        let flagged = !cell.is_flagged();
        cell.set_flagged(flagged);
        if flagged {
            self.flagged_count += 1;
        } else {
            self.flagged_count -= 1;
        }
        Ok(flagged)
    }

    /// Win/loss state derived from the board alone.
    pub fn evaluate(&self) -> GameStatus {
        debug_assert_eq!(
            self.revealed_count + self.hidden_safe_count(),
            self.safe_cell_count(),
            "revealed counter out of sync with the board"
        );

        if self.detonated.is_some() {
            GameStatus::Lost
        } else if self.revealed_count == self.safe_cell_count() {
            GameStatus::Won
        } else {
            GameStatus::Ongoing
        }
    }

    fn hidden_safe_count(&self) -> CellCount {
        self.cells
            .iter()
            .filter(|cell| !cell.is_mine() && !cell.is_revealed())
            .count() as CellCount
    }

    /// Picks a random safe cell that is neither revealed nor flagged.
    pub fn select_hint<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Coord2> {
        let candidates: Vec<Coord2> = self
            .iter_coords()
            .filter(|&coords| self.cell(coords).is_hint_candidate())
            .collect();
        candidates.choose(rng).copied()
    }

    /// Reveals every hidden, unflagged mine for end-of-game display. No flood
    /// fill, no counter changes, and [`Board::evaluate`] is unaffected.
    pub fn reveal_all_mines(&mut self) -> Vec<Coord2> {
        let mines: Vec<Coord2> = self
            .iter_coords()
            .filter(|&coords| {
                let cell = self.cell(coords);
                cell.is_mine() && cell.is_openable()
            })
            .collect();

        for &coords in &mines {
            self.cells[coords.to_nd_index()].set_revealed();
        }
        mines
    }

    pub(crate) fn cells_mut(&mut self) -> &mut Array2<Cell> {
        &mut self.cells
    }

    pub(crate) fn set_counters(
        &mut self,
        revealed_count: CellCount,
        flagged_count: CellCount,
        detonated: Option<Coord2>,
    ) {
        self.revealed_count = revealed_count;
        self.flagged_count = flagged_count;
        self.detonated = detonated;
    }
}
