use std::io;

use clap::Parser;
use minesweeping_core::{CellCount, Coord, DEFAULT_HINTS};

use crate::app::App;
use crate::settings::{DifficultyArg, Settings};

mod app;
mod command;
mod daily;
mod render;
mod settings;
mod stats;

#[derive(Parser, Debug)]
#[command(version, about = "Minesweeper in the terminal", long_about = None)]
pub struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Board preset
    #[arg(short, long, value_enum, default_value_t = DifficultyArg::Easy)]
    difficulty: DifficultyArg,

    /// Custom board height, requires --cols and --mines
    #[arg(long)]
    rows: Option<Coord>,

    /// Custom board width
    #[arg(long)]
    cols: Option<Coord>,

    /// Custom mine count
    #[arg(long)]
    mines: Option<CellCount>,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Hints granted per game
    #[arg(long, default_value_t = DEFAULT_HINTS)]
    hints: u8,

    /// Play today's daily challenge
    #[arg(long)]
    daily: bool,

    /// Print the run's statistics as JSON on exit
    #[arg(long)]
    json: bool,
}

fn init_logging(verbose: &clap_verbosity_flag::Verbosity) {
    tracing_subscriber::fmt()
        .with_max_level(verbose.tracing_level_filter())
        .with_writer(io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args.verbose);

    let today = chrono::Utc::now().date_naive();
    let settings = Settings::from_args(&args, today)?;
    log::debug!("settings: {:?}", settings);

    let mut app = App::new(settings)?;
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    app.run(stdin.lock(), &mut stdout)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(app.stats())?);
    } else {
        print!("\n{}", app.stats().summary());
    }
    Ok(())
}
