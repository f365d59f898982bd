//! Terminal Bonus Tetris runner (default binary).
//!
//! Drives [`GameState`] from crossterm key events with a ~60 FPS frame loop,
//! draws through the framebuffer diff renderer, records the final score on
//! the local leaderboard when a game ends and lists the best scores of the
//! current difficulty under the game-over overlay.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};
use tracing::{info, warn, Level};
use tracing_subscriber::prelude::*;

use bonus_tetris::core::{GameState, StandardScoring};
use bonus_tetris::input::{handle_key_event, should_quit, InputHandler};
use bonus_tetris::services::{
    default_player_id_path, default_scores_path, FallbackLeaderboard, LeaderboardService,
    LocalLeaderboard, LocalSessions, NoLocator, Presence, SessionContext, TracingAudio,
    DISPLAY_TOP, PLAYER_ID_FILE,
};
use bonus_tetris::settings::Settings;
use bonus_tetris::term::{FrameBuffer, GameView, ScoreLine, TerminalRenderer, Viewport};
use bonus_tetris::types::{Difficulty, GameAction, TICK_MS};

#[derive(Debug, Parser)]
#[command(name = "bonus-tetris", version, about = "Falling blocks with random row bonuses")]
struct Cli {
    #[arg(long, help = "RNG seed (random when omitted)")]
    seed: Option<u64>,

    #[arg(long, value_parser = parse_difficulty, help = "EASY, MEDIUM or HARD")]
    difficulty: Option<Difficulty>,

    #[arg(long, help = "Board width in cells")]
    width: Option<u16>,

    #[arg(long, help = "Board height in cells")]
    height: Option<u16>,

    #[arg(long, help = "Path to a JSON settings file")]
    config: Option<PathBuf>,

    #[arg(long, help = "Name recorded on the leaderboard (remembered between runs)")]
    name: Option<String>,

    #[arg(long, help = "Leaderboard file (defaults to the user config directory)")]
    scores: Option<PathBuf>,

    #[arg(long, help = "Write logs to this file")]
    log_file: Option<PathBuf>,

    #[arg(short = 'v', long, action = clap::ArgAction::Count, help = "Increase log verbosity")]
    verbose: u8,
}

fn parse_difficulty(s: &str) -> Result<Difficulty, String> {
    Difficulty::from_str(s).ok_or_else(|| format!("unknown difficulty '{s}'"))
}

fn init_logging(cli: &Cli) -> Result<()> {
    // The terminal is owned by the game; logs only go to a file.
    let Some(path) = &cli.log_file else {
        return Ok(());
    };
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(level))
        .init();
    Ok(())
}

fn open_leaderboard(cli: &Cli) -> FallbackLeaderboard<LocalLeaderboard> {
    let path = cli.scores.clone().unwrap_or_else(default_scores_path);
    let board = LocalLeaderboard::open(&path).unwrap_or_else(|err| {
        warn!(%err, path = %path.display(), "leaderboard unreadable, starting empty");
        LocalLeaderboard::in_memory()
    });
    FallbackLeaderboard::new(board)
}

fn open_session(
    cli: &Cli,
    difficulty: Difficulty,
    leaderboard: &mut dyn LeaderboardService,
) -> SessionContext {
    // the player id lives next to the scores file
    let id_path = match cli.scores.as_deref().and_then(Path::parent) {
        Some(dir) => dir.join(PLAYER_ID_FILE),
        None => default_player_id_path(),
    };
    let mut session = SessionContext::load_or_create(&id_path, difficulty).unwrap_or_else(|err| {
        warn!(%err, path = %id_path.display(), "player id not stored, using a new one");
        SessionContext::new(difficulty)
    });

    let restored = session.initialize(leaderboard).unwrap_or_else(|err| {
        warn!(%err, "returning player lookup failed");
        false
    });
    match &cli.name {
        Some(name) => session.set_name(name.as_str()),
        None if !restored => session.set_name("Player"),
        None => info!(name = session.name(), "welcome back"),
    }
    session
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let mut settings = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    if let Some(difficulty) = cli.difficulty {
        settings.game.difficulty = difficulty;
    }
    if let Some(width) = cli.width {
        settings.game.width = width;
    }
    if let Some(height) = cli.height {
        settings.game.height = height;
    }

    let seed = cli.seed.unwrap_or_else(rand_seed);
    let game = GameState::with_collaborators(
        settings.game.clone(),
        seed,
        Box::new(TracingAudio::new()),
        Box::new(StandardScoring),
    )?;

    let mut leaderboard = open_leaderboard(&cli);
    let session = open_session(&cli, settings.game.difficulty, &mut leaderboard);
    let presence = Presence::new(LocalSessions::new(), session.player_id());

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let mut runner = Runner {
        game,
        input: InputHandler::with_config(settings.input),
        session,
        leaderboard: &mut leaderboard,
        presence,
        submitted: false,
        top_scores: Vec::new(),
    };
    let result = runner.run(&mut term);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn rand_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(1)
}

struct Runner<'a> {
    game: GameState,
    input: InputHandler,
    session: SessionContext,
    leaderboard: &'a mut dyn LeaderboardService,
    presence: Presence<LocalSessions>,
    submitted: bool,
    top_scores: Vec<ScoreLine>,
}

impl Runner<'_> {
    fn run(&mut self, term: &mut TerminalRenderer) -> Result<()> {
        let origin = Instant::now();
        let now_ms = || origin.elapsed().as_millis() as u64;

        let view = GameView::default();
        let mut fb = FrameBuffer::new(0, 0);
        let frame = Duration::from_millis(TICK_MS as u64);
        let mut last_frame = Instant::now();

        self.game.start(now_ms());
        self.presence.start(
            self.session.name(),
            self.session.difficulty(),
            0,
            now_ms(),
        );

        loop {
            let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
            let viewport = Viewport::new(w, h);
            let snap = self.game.snapshot();
            view.render_into(&snap, viewport, &mut fb);
            view.draw_high_scores(&mut fb, &snap, viewport, &self.top_scores);
            term.draw_swap(&mut fb)?;

            let timeout = frame
                .checked_sub(last_frame.elapsed())
                .unwrap_or(Duration::ZERO);
            if event::poll(timeout)? {
                match event::read()? {
                    Event::Key(key) => match key.kind {
                        KeyEventKind::Press | KeyEventKind::Repeat => {
                            if should_quit(key) {
                                self.game.stop();
                                self.presence.end();
                                return Ok(());
                            }
                            if let Some(action) = handle_key_event(key) {
                                self.press(action, now_ms());
                            }
                        }
                        KeyEventKind::Release => {
                            if let Some(action) = handle_key_event(key) {
                                self.input.release(action);
                            }
                        }
                    },
                    Event::Resize(..) => term.invalidate(),
                    _ => {}
                }
            }

            let elapsed = last_frame.elapsed();
            if elapsed >= frame {
                last_frame = Instant::now();
                for action in self.input.update(elapsed.as_millis() as u32) {
                    self.game.apply_action(action, now_ms());
                }
                if let Some(ticket) = self.game.clock().ticket() {
                    self.game.tick(ticket, now_ms());
                }
                self.presence.update(self.game.score(), now_ms());
            }

            if self.game.is_game_over() && !self.submitted {
                self.submitted = true;
                self.submit_score();
                self.load_top_scores();
            }
        }
    }

    fn press(&mut self, action: GameAction, now_ms: u64) {
        let Some(action) = self.input.press(action) else {
            return;
        };
        if action == GameAction::Restart {
            self.input.reset();
            self.submitted = false;
            self.top_scores.clear();
        }
        self.game.apply_action(action, now_ms);
    }

    fn submit_score(&mut self) {
        let record = match self.session.build_record(
            self.game.score(),
            self.game.elapsed_ms(),
            &mut NoLocator,
        ) {
            Ok(record) => record,
            Err(err) => {
                warn!(%err, "score not recorded");
                return;
            }
        };
        match self.leaderboard.submit_score(record) {
            Ok(stored) => info!(score = stored.score, time = %stored.time, "score recorded"),
            Err(err) => warn!(%err, "score not recorded"),
        }
    }

    fn load_top_scores(&mut self) {
        match self
            .leaderboard
            .fetch_top_players(DISPLAY_TOP, self.game.difficulty())
        {
            Ok(players) => {
                self.top_scores = players
                    .into_iter()
                    .map(|p| ScoreLine {
                        name: p.name,
                        score: p.score,
                        time: p.time,
                    })
                    .collect();
            }
            Err(err) => warn!(%err, "top scores unavailable"),
        }
    }
}
