use std::str::FromStr;

use anyhow::{Context, anyhow, bail};
use minesweeping_core::{Coord, Coord2};

pub const HELP: &str = "\
commands:
  r ROW COL   reveal a cell
  f ROW COL   toggle a flag
  h           use a hint
  n           new game
  s           show statistics
  ?           this help
  q           quit";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Reveal(Coord2),
    Flag(Coord2),
    Hint,
    NewGame,
    Stats,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let verb = words.next().ok_or_else(|| anyhow!("empty command"))?;

        let command = match verb.to_ascii_lowercase().as_str() {
            "r" | "reveal" => Command::Reveal(parse_coords(&mut words)?),
            "f" | "flag" => Command::Flag(parse_coords(&mut words)?),
            "h" | "hint" => Command::Hint,
            "n" | "new" => Command::NewGame,
            "s" | "stats" => Command::Stats,
            "?" | "help" => Command::Help,
            "q" | "quit" | "exit" => Command::Quit,
            other => bail!("unknown command {other:?}, type ? for help"),
        };

        if let Some(extra) = words.next() {
            bail!("unexpected argument {extra:?}");
        }
        Ok(command)
    }
}

fn parse_coords<'a>(words: &mut impl Iterator<Item = &'a str>) -> anyhow::Result<Coord2> {
    let row = parse_coord(words.next(), "row")?;
    let col = parse_coord(words.next(), "column")?;
    Ok((row, col))
}

fn parse_coord(word: Option<&str>, what: &str) -> anyhow::Result<Coord> {
    let word = word.with_context(|| format!("missing {what}"))?;
    word.parse()
        .with_context(|| format!("invalid {what} {word:?}"))
}
