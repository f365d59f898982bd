//! Game state module - the aggregate root of a session
//!
//! Ties together the board, the active and next pieces, the movement engine,
//! the clock, scoring and the bonus banner. All mutation happens through
//! [`GameState::tick`], [`GameState::apply_action`] and
//! [`GameState::move_token`]; a lock and its line clear complete inside a
//! single call.

use tracing::{debug, info};

use crate::audio::{AudioNotifier, Silent, SoundCue};
use crate::banner::{BonusBanner, LineScorePopup};
use crate::board::Board;
use crate::bonus::BonusAssigner;
use crate::clock::{ClockState, GameClock, TickTicket};
use crate::collision::check_collision;
use crate::config::GameConfig;
use crate::error::{ConfigError, GameError};
use crate::line_clear::LineClearReport;
use crate::lock::LockPipeline;
use crate::movement::{parse_direction, MoveOutcome, MovementEngine};
use crate::pieces::Piece;
use crate::rng::PieceSource;
use crate::scoring::{ScoringPolicy, StandardScoring};
use crate::snapshot::{GameSnapshot, PieceSnapshot};
use crate::types::{Difficulty, Direction, GameAction};

pub struct GameState {
    config: GameConfig,
    seed: u64,
    board: Board,
    piece: Option<Piece>,
    next_piece: Piece,
    pieces: PieceSource,
    movement: MovementEngine<LockPipeline>,
    scoring: Box<dyn ScoringPolicy>,
    clock: GameClock,
    banner: BonusBanner,
    line_score: LineScorePopup,
    score: u64,
    lines: u32,
    /// Monotonic episode id (increments on restart).
    episode_id: u32,
    started: bool,
    last_clear: Option<LineClearReport>,
}

impl GameState {
    /// Default configuration, silent audio, standard scoring.
    pub fn new(seed: u64) -> Self {
        Self::build(
            GameConfig::default(),
            seed,
            Box::new(Silent),
            Box::new(StandardScoring),
        )
    }

    pub fn with_config(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_collaborators(config, seed, Box::new(Silent), Box::new(StandardScoring))
    }

    pub fn with_collaborators(
        config: GameConfig,
        seed: u64,
        audio: Box<dyn AudioNotifier>,
        scoring: Box<dyn ScoringPolicy>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, seed, audio, scoring))
    }

    fn build(
        config: GameConfig,
        seed: u64,
        audio: Box<dyn AudioNotifier>,
        scoring: Box<dyn ScoringPolicy>,
    ) -> Self {
        let mut bonus = BonusAssigner::new(seed, config.bonus_eligibility_percent);
        let board = Board::with_marks(config.width, config.height, || bonus.mark_eligible());
        let mut pieces = PieceSource::new(config.difficulty, seed);
        let next_piece = Piece::spawn(&pieces.draw(), config.width);
        let clock = GameClock::new(config.drop_interval_ms);

        Self {
            config,
            seed,
            board,
            piece: None,
            next_piece,
            pieces,
            movement: MovementEngine::new(LockPipeline::new(bonus, audio)),
            scoring,
            clock,
            banner: BonusBanner::default(),
            line_score: LineScorePopup::default(),
            score: 0,
            lines: 0,
            episode_id: 0,
            started: false,
            last_clear: None,
        }
    }

    /// Begin a fresh game anchored at `now_ms` and spawn the first piece.
    ///
    /// Any earlier ticket becomes stale.
    pub fn start(&mut self, now_ms: u64) -> TickTicket {
        self.reset_round();
        self.started = true;
        let ticket = self.clock.start(now_ms);
        self.audio().start_background_loop();
        info!(
            seed = self.seed,
            difficulty = self.config.difficulty.as_str(),
            episode = self.episode_id,
            "game started"
        );
        if !self.spawn_piece() {
            self.end_game();
        }
        ticket
    }

    pub fn restart(&mut self, now_ms: u64) -> TickTicket {
        self.episode_id = self.episode_id.wrapping_add(1);
        self.start(now_ms)
    }

    fn reset_round(&mut self) {
        let bonus = self.movement.hooks_mut().bonus_mut();
        bonus.reset();
        self.board.clear(|| bonus.mark_eligible());
        self.movement.hooks_mut().take_report();
        self.piece = None;
        if self.started {
            // a restart must not open with the previous round's preview
            self.next_piece = Piece::spawn(&self.pieces.draw(), self.config.width);
        }
        self.score = 0;
        self.lines = 0;
        self.banner.clear();
        self.line_score.clear();
        self.last_clear = None;
    }

    /// Freeze the game. Returns false unless it was running.
    pub fn pause(&mut self) -> bool {
        if !self.clock.pause() {
            return false;
        }
        self.audio().pause_background_loop();
        debug!("paused");
        true
    }

    /// Continue a paused game; returns the ticket for the new tick loop.
    pub fn resume(&mut self, now_ms: u64) -> Option<TickTicket> {
        let ticket = self.clock.resume(now_ms)?;
        self.audio().start_background_loop();
        debug!("resumed");
        Some(ticket)
    }

    /// End the session without a game over. Pending ticks become no-ops.
    pub fn stop(&mut self) {
        if self.clock.state() == ClockState::Running {
            self.audio().pause_background_loop();
        }
        self.clock.stop();
    }

    /// Advance the clock to `now_ms`.
    ///
    /// Returns the ticket to schedule the next tick with, or `None` when the
    /// loop should stop (stale ticket, paused, stopped or game over).
    pub fn tick(&mut self, ticket: TickTicket, now_ms: u64) -> Option<TickTicket> {
        let step = self.clock.advance(ticket, now_ms)?;
        self.line_score.advance(step.delta_ms);
        if self.banner.advance(step.delta_ms) {
            self.audio().play(SoundCue::BonusEnd);
        }
        if step.auto_drop {
            self.step(Direction::Down);
        }
        self.clock.ticket()
    }

    /// Apply an input action. Returns true if it changed anything.
    pub fn apply_action(&mut self, action: GameAction, now_ms: u64) -> bool {
        match action {
            GameAction::Pause => {
                if self.is_paused() {
                    self.resume(now_ms).is_some()
                } else {
                    self.pause()
                }
            }
            GameAction::Restart => {
                self.restart(now_ms);
                true
            }
            _ => match action.direction() {
                Some(direction) => self.move_direction(direction) != MoveOutcome::Blocked,
                None => false,
            },
        }
    }

    /// Move the active piece. Ignored (Blocked) unless the game is running.
    pub fn move_direction(&mut self, direction: Direction) -> MoveOutcome {
        if !self.clock.is_running() {
            return MoveOutcome::Blocked;
        }
        if direction == Direction::Down {
            self.clock.reset_drop_counter();
        }
        self.step(direction)
    }

    /// Parse a direction token ("left", "right", "down", "rotate", "space") and apply it.
    pub fn move_token(&mut self, token: &str) -> Result<MoveOutcome, GameError> {
        let direction = parse_direction(token)?;
        Ok(self.move_direction(direction))
    }

    fn step(&mut self, direction: Direction) -> MoveOutcome {
        let Some(piece) = self.piece.as_mut() else {
            return MoveOutcome::Blocked;
        };
        let outcome = self.movement.apply(&mut self.board, piece, direction);
        if outcome == MoveOutcome::Locked {
            self.after_lock();
        }
        outcome
    }

    fn after_lock(&mut self) {
        self.piece = None;

        if let Some(report) = self.movement.hooks_mut().take_report() {
            if report.line_count > 0 {
                let points = self
                    .scoring
                    .score_for(report.line_count, report.total_bonus_multiplier_sum);
                self.score = self.score.saturating_add(points);
                self.lines = self.lines.saturating_add(report.line_count as u32);
                if let Some(&row) = report.cleared_rows.last() {
                    self.line_score.show(row, points, self.config.line_score_ms);
                }

                if report.total_bonus_multiplier_sum > 0 {
                    self.banner
                        .show(report.total_bonus_multiplier_sum, self.config.bonus_banner_ms);
                    self.audio().play(SoundCue::BonusStart);
                }
                debug!(
                    lines = report.line_count,
                    bonus_sum = report.total_bonus_multiplier_sum,
                    points,
                    score = self.score,
                    "line clear scored"
                );
            }
            self.last_clear = Some(report);
        }

        if !self.spawn_piece() {
            self.end_game();
        }
    }

    /// Promote the next piece and draw a new one. False if the spawn is blocked.
    fn spawn_piece(&mut self) -> bool {
        let entry = self.pieces.draw();
        let spawned = std::mem::replace(
            &mut self.next_piece,
            Piece::spawn(&entry, self.config.width),
        );
        if check_collision(&self.board, &spawned) {
            debug!(x = spawned.position.x, "spawn blocked");
            return false;
        }
        self.piece = Some(spawned);
        true
    }

    fn end_game(&mut self) {
        self.clock.finish();
        let audio = self.audio();
        audio.pause_background_loop();
        audio.play(SoundCue::GameOver);
        info!(score = self.score, lines = self.lines, "game over");
    }

    fn audio(&mut self) -> &mut dyn AudioNotifier {
        self.movement.hooks_mut().audio_mut()
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.clock.elapsed_ms()
    }

    pub fn started(&self) -> bool {
        self.started
    }

    pub fn is_running(&self) -> bool {
        self.clock.is_running()
    }

    pub fn is_paused(&self) -> bool {
        self.clock.state() == ClockState::Paused
    }

    pub fn is_game_over(&self) -> bool {
        self.clock.state() == ClockState::GameOver
    }

    pub fn clock(&self) -> &GameClock {
        &self.clock
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Direct board access for scripted setups (puzzles, replays, tests).
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn piece(&self) -> Option<&Piece> {
        self.piece.as_ref()
    }

    pub fn next_piece(&self) -> &Piece {
        &self.next_piece
    }

    pub fn bonus(&self) -> &BonusAssigner {
        self.movement.hooks().bonus()
    }

    pub fn banner(&self) -> &BonusBanner {
        &self.banner
    }

    pub fn last_clear(&self) -> Option<&LineClearReport> {
        self.last_clear.as_ref()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn difficulty(&self) -> Difficulty {
        self.config.difficulty
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            width: self.board.width(),
            height: self.board.height(),
            board: self.board.cells().to_vec(),
            active: self.piece.as_ref().map(PieceSnapshot::from),
            next: Some(PieceSnapshot::from(&self.next_piece)),
            score: self.score,
            lines: self.lines,
            elapsed_ms: self.clock.elapsed_ms(),
            paused: self.is_paused(),
            game_over: self.is_game_over(),
            started: self.started,
            difficulty: self.config.difficulty,
            seed: self.seed,
            episode_id: self.episode_id,
            banner: self.banner.text(),
            line_score: self.line_score.current(),
        }
    }
}
