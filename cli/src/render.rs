use std::fmt::Write;

use minesweeping_core::{CellView, GameSession, GameStatus};

fn cell_char(view: CellView) -> char {
    match view {
        CellView::Hidden => '#',
        CellView::Flagged => 'F',
        CellView::Revealed(0) => '.',
        CellView::Revealed(count) => char::from(b'0' + count),
        CellView::Mine => '*',
        CellView::Detonated => 'X',
    }
}

fn face(status: GameStatus) -> &'static str {
    match status {
        GameStatus::Ongoing => ":)",
        GameStatus::Won => "B)",
        GameStatus::Lost => "X(",
    }
}

/// Draws the counter line followed by the grid, rows and columns labelled.
pub fn render(session: &GameSession, elapsed_secs: u64) -> anyhow::Result<String> {
    let (rows, cols) = session.board().size();
    let label_width = rows.saturating_sub(1).to_string().len().max(2);
    let margin = " ".repeat(label_width + 1);
    let mut out = String::new();

    // counters are padded like a classic three-digit display
    let _ = writeln!(
        out,
        "mines {:03}  time {:03}  hints {}  {}",
        session.mines_left(),
        elapsed_secs,
        session.hints_left(),
        face(session.status())
    );

    if cols > 10 {
        out.push_str(&margin);
        for col in 0..cols {
            out.push(if col % 10 == 0 {
                char::from(b'0' + col / 10 % 10)
            } else {
                ' '
            });
        }
        out.push('\n');
    }
    out.push_str(&margin);
    for col in 0..cols {
        out.push(char::from(b'0' + col % 10));
    }
    out.push('\n');

    for row in 0..rows {
        let _ = write!(out, "{row:>label_width$} ");
        for col in 0..cols {
            out.push(cell_char(session.view_at((row, col))?));
        }
        out.push('\n');
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use minesweeping_core::Board;

    fn session() -> GameSession {
        let board = Board::from_mine_coords((3, 3), &[(0, 0), (2, 2)]).unwrap();
        GameSession::new(board, 2, 0)
    }

    #[test]
    fn renders_hidden_board() {
        let out = render(&session(), 0).unwrap();

        assert_eq!(
            out,
            "mines 002  time 000  hints 2  :)\n   012\n 0 ###\n 1 ###\n 2 ###\n"
        );
    }

    #[test]
    fn renders_numbers_flags_and_mines() {
        let mut session = session();
        session.reveal((1, 1)).unwrap();
        session.toggle_flag((2, 2)).unwrap();
        session.reveal((0, 0)).unwrap();

        let out = render(&session, 12).unwrap();

        assert!(out.starts_with("mines 001  time 012  hints 2  X(\n"));
        assert!(out.contains(" 0 X##\n"));
        assert!(out.contains(" 1 #2#\n"));
        assert!(out.contains(" 2 ##F\n"));
    }

    #[test]
    fn wide_boards_get_a_tens_row() {
        let board = Board::from_mine_coords((1, 12), &[]).unwrap();
        let session = GameSession::new(board, 0, 0);

        let out = render(&session, 0).unwrap();

        assert!(out.contains("\n   0         1 \n   012345678901\n"));
    }

    #[test]
    fn tall_boards_widen_the_row_labels() {
        let board = Board::from_mine_coords((101, 1), &[]).unwrap();
        let session = GameSession::new(board, 0, 0);

        let out = render(&session, 0).unwrap();

        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[1], "    0");
        assert_eq!(lines[2], "  0 #");
        assert_eq!(lines[11], "  9 #");
        assert_eq!(lines[12], " 10 #");
        assert_eq!(lines[102], "100 #");
        assert!(lines[1..].iter().all(|line| line.len() == 5));
    }
}
