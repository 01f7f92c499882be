use std::io::{BufRead, Write};

use anyhow::Context;
use minesweeping_core::{GameEvent, GameSession, GameStatus};
use web_time::Instant;

use crate::command::{Command, HELP};
use crate::render::render;
use crate::settings::Settings;
use crate::stats::Stats;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Terminal front end: owns the current session and the run's statistics.
pub struct App {
    settings: Settings,
    session: GameSession,
    stats: Stats,
    games_started: u64,
    started_at: Option<Instant>,
    final_secs: Option<u64>,
}

impl App {
    pub fn new(settings: Settings) -> anyhow::Result<Self> {
        let session = start_session(&settings, 0)?;
        Ok(Self {
            settings,
            session,
            stats: Stats::default(),
            games_started: 1,
            started_at: None,
            final_secs: None,
        })
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Replaces the current game. An unfinished game is dropped without
    /// being recorded.
    pub fn new_game(&mut self) -> anyhow::Result<()> {
        self.session = start_session(&self.settings, self.games_started)?;
        self.games_started += 1;
        self.started_at = None;
        self.final_secs = None;
        Ok(())
    }

    /// Seconds since the first move, frozen once the game ends.
    pub fn elapsed_secs(&self) -> u64 {
        match (self.final_secs, self.started_at) {
            (Some(secs), _) => secs,
            (None, Some(started_at)) => started_at.elapsed().as_secs(),
            (None, None) => 0,
        }
    }

    pub fn run(&mut self, input: impl BufRead, out: &mut impl Write) -> anyhow::Result<()> {
        writeln!(out, "{}", render(&self.session, self.elapsed_secs())?)?;
        write!(out, "> ")?;
        out.flush()?;

        for line in input.lines() {
            let line = line.context("failed to read command")?;
            if line.trim().is_empty() {
                write!(out, "> ")?;
                out.flush()?;
                continue;
            }

            let flow = match line.parse::<Command>() {
                Ok(command) => self.handle(command, out)?,
                Err(err) => {
                    writeln!(out, "error: {err:#}")?;
                    Flow::Continue
                }
            };
            if flow == Flow::Quit {
                break;
            }
            write!(out, "> ")?;
            out.flush()?;
        }
        Ok(())
    }

    pub fn handle(&mut self, command: Command, out: &mut impl Write) -> anyhow::Result<Flow> {
        let result = match command {
            Command::Reveal(coords) => {
                self.mark_started();
                self.session.reveal(coords).map(drop)
            }
            Command::Flag(coords) => {
                self.mark_started();
                self.session.toggle_flag(coords).map(drop)
            }
            Command::Hint => {
                self.mark_started();
                self.session.use_hint().map(|hint| {
                    if hint.is_none() {
                        log::info!("No hint available");
                    }
                })
            }
            Command::NewGame => {
                self.new_game()?;
                Ok(())
            }
            Command::Stats => {
                write!(out, "{}", self.stats.summary())?;
                return Ok(Flow::Continue);
            }
            Command::Help => {
                writeln!(out, "{HELP}")?;
                return Ok(Flow::Continue);
            }
            Command::Quit => return Ok(Flow::Quit),
        };

        if let Err(err) = result {
            writeln!(out, "error: {err}")?;
            return Ok(Flow::Continue);
        }

        self.process_events(out)?;
        writeln!(out, "{}", render(&self.session, self.elapsed_secs())?)?;
        Ok(Flow::Continue)
    }

    fn mark_started(&mut self) {
        if self.started_at.is_none() && !self.session.is_finished() {
            self.started_at = Some(Instant::now());
        }
    }

    fn process_events(&mut self, out: &mut impl Write) -> anyhow::Result<()> {
        for event in self.session.drain_events() {
            log::debug!("{:?}", event);
            match event {
                GameEvent::HintUsed { coords, hints_left } => {
                    writeln!(
                        out,
                        "hint: ({}, {}) is safe, {} left",
                        coords.0, coords.1, hints_left
                    )?;
                }
                GameEvent::GameWon => {
                    self.finish(GameStatus::Won);
                    writeln!(out, "You won in {}s!", self.elapsed_secs())?;
                }
                GameEvent::GameLost { detonated } => {
                    self.finish(GameStatus::Lost);
                    writeln!(
                        out,
                        "Boom! Mine at ({}, {}). Type n for a new game.",
                        detonated.0, detonated.1
                    )?;
                }
                GameEvent::BoardCreated { .. }
                | GameEvent::CellsRevealed(_)
                | GameEvent::FlagChanged { .. } => {}
            }
        }
        Ok(())
    }

    fn finish(&mut self, status: GameStatus) {
        let secs = self.elapsed_secs();
        self.final_secs = Some(secs);
        self.stats
            .record(self.settings.mode, status == GameStatus::Won, secs);
    }
}

fn start_session(settings: &Settings, game_index: u64) -> anyhow::Result<GameSession> {
    let seed = settings.seed_for(game_index);
    log::info!("Starting {} game with seed {}", settings.mode, seed);
    GameSession::start(settings.config, settings.hints, seed)
        .with_context(|| format!("cannot start a {} game", settings.mode))
}
