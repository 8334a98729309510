//! Headless gameplay simulation.
//!
//! The engine owns every entity collection and advances one frame per
//! [`GameplaySession::step`] call. Rendering, audio, input polling and
//! persistence live behind the small traits defined here, so the same
//! simulation drives interactive frontends, scripted replays and tests.

mod game;

use std::cell::Cell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::constants::{
    self, ASTEROID_EXTENT_LARGE, ASTEROID_EXTENT_MEDIUM, ASTEROID_EXTENT_SMALL,
    SCORE_LARGE_ASTEROID, SCORE_MEDIUM_ASTEROID, SCORE_SMALL_ASTEROID,
};
use crate::error::RuleCode;
use crate::input::{decode_input_byte, FrameInput};
use game::Game;

/// Asteroid tier. Larger rocks split into smaller ones when destroyed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SizeClass {
    Small,
    Medium,
    Large,
}

impl SizeClass {
    /// Parses the numeric tier used by external tooling. Anything outside
    /// {1,2,3} is a programming error and is rejected.
    pub fn from_tier(tier: u8) -> Result<Self, RuleCode> {
        match tier {
            1 => Ok(Self::Small),
            2 => Ok(Self::Medium),
            3 => Ok(Self::Large),
            _ => Err(RuleCode::AsteroidSizeClass),
        }
    }

    pub fn tier(self) -> u8 {
        match self {
            Self::Small => 1,
            Self::Medium => 2,
            Self::Large => 3,
        }
    }

    pub fn extent(self) -> f32 {
        match self {
            Self::Small => ASTEROID_EXTENT_SMALL,
            Self::Medium => ASTEROID_EXTENT_MEDIUM,
            Self::Large => ASTEROID_EXTENT_LARGE,
        }
    }

    pub fn score(self) -> u32 {
        match self {
            Self::Small => SCORE_SMALL_ASTEROID,
            Self::Medium => SCORE_MEDIUM_ASTEROID,
            Self::Large => SCORE_LARGE_ASTEROID,
        }
    }

    /// The tier fragments take when this tier is destroyed.
    pub fn smaller(self) -> Option<SizeClass> {
        match self {
            Self::Large => Some(Self::Medium),
            Self::Medium => Some(Self::Small),
            Self::Small => None,
        }
    }
}

/// The two persisted high-score slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreSlot {
    BestTime,
    BestScore,
}

impl ScoreSlot {
    pub fn index(self) -> usize {
        match self {
            Self::BestTime => 0,
            Self::BestScore => 1,
        }
    }
}

/// Persisted-value pair for high scores. Implementations never fail: a
/// missing or unreadable value reads as zero, and writes are best-effort.
pub trait ScoreStore {
    fn load(&self, slot: ScoreSlot) -> u32;
    fn save(&mut self, slot: ScoreSlot, value: u32);
}

/// In-process store used by replays and tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct MemoryScoreStore {
    slots: [u32; 2],
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values(best_time: u32, best_score: u32) -> Self {
        Self {
            slots: [best_time, best_score],
        }
    }
}

impl ScoreStore for MemoryScoreStore {
    fn load(&self, slot: ScoreSlot) -> u32 {
        self.slots[slot.index()]
    }

    fn save(&mut self, slot: ScoreSlot, value: u32) {
        self.slots[slot.index()] = value;
    }
}

/// Fire-and-forget feedback hooks. The engine raises these for audio and
/// visual effects but never inspects any outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEvent {
    ShotFired,
    Thrust,
    Explosion(SizeClass),
    Damage,
    PowerUpPickup,
}

pub trait EventSink {
    fn notify(&mut self, event: GameEvent);
}

/// Headless runs discard feedback entirely.
impl EventSink for () {
    fn notify(&mut self, _event: GameEvent) {}
}

/// Monotonic clock consulted for survival-time tracking. The engine captures
/// `now()` at construction and reports elapsed time relative to it.
pub trait Clock {
    fn now(&self) -> f64;
}

/// Deterministic clock advanced explicitly by the driver, one fixed tick per
/// frame. Clones share the same underlying time.
#[derive(Clone, Debug, Default)]
pub struct FrameClock {
    seconds: Rc<Cell<f64>>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&self, seconds: f64) {
        self.seconds.set(self.seconds.get() + seconds);
    }

    pub fn set(&self, seconds: f64) {
        self.seconds.set(seconds);
    }
}

impl Clock for FrameClock {
    fn now(&self) -> f64 {
        self.seconds.get()
    }
}

/// Why a session stopped stepping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExitReason {
    Quit,
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub screen_width: f32,
    pub screen_height: f32,
    pub seed: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            screen_width: constants::SCREEN_WIDTH,
            screen_height: constants::SCREEN_HEIGHT,
            seed: 1,
        }
    }
}

impl SessionConfig {
    pub fn with_seed(seed: u32) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }
}

/// Renderable player state, read-only.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub x: f32,
    pub y: f32,
    pub angle: f32,
    pub speed: f32,
    pub lives: i32,
    pub score: u32,
    pub alpha: f32,
    pub invulnerable: bool,
    pub powered_up: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AsteroidSnapshot {
    pub x: f32,
    pub y: f32,
    pub angle: f32,
    pub size: SizeClass,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShotSnapshot {
    pub x: f32,
    pub y: f32,
    pub angle: f32,
    pub frames_left: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PowerUpSnapshot {
    pub x: f32,
    pub y: f32,
    pub frames_left: i32,
}

/// Full renderable world state at a frame boundary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub frame: u32,
    pub elapsed_seconds: f64,
    pub player: PlayerSnapshot,
    pub asteroids: Vec<AsteroidSnapshot>,
    pub shots: Vec<ShotSnapshot>,
    pub power_up: Option<PowerUpSnapshot>,
    pub rng_state: u32,
    pub exit: Option<ExitReason>,
}

/// Outcome summary of a finished (or abandoned) session.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    pub frames: u32,
    pub final_score: u32,
    pub survived_seconds: f64,
    pub final_rng_state: u32,
    pub exit: Option<ExitReason>,
}

/// One gameplay run: a seeded world plus its collaborator seams.
pub struct GameplaySession<S: ScoreStore, E: EventSink, C: Clock> {
    game: Game<S, E, C>,
}

impl<S: ScoreStore, E: EventSink, C: Clock> GameplaySession<S, E, C> {
    pub fn new(config: SessionConfig, store: S, sink: E, clock: C) -> Self {
        Self {
            game: Game::new(config, store, sink, clock),
        }
    }

    /// Advances the simulation by one frame. A no-op once finished.
    pub fn step(&mut self, input: FrameInput) {
        self.game.step(input);
    }

    /// Steps from the compact byte encoding used by scripted input streams.
    pub fn step_byte(&mut self, byte: u8) {
        self.game.step(decode_input_byte(byte));
    }

    pub fn is_finished(&self) -> bool {
        self.game.exit.is_some()
    }

    pub fn exit_reason(&self) -> Option<ExitReason> {
        self.game.exit
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        self.game.snapshot()
    }

    /// Checks the structural rules the world must satisfy between frames.
    pub fn validate(&self) -> Result<(), RuleCode> {
        self.game.validate_invariants()
    }

    pub fn result(&self) -> RunResult {
        RunResult {
            frames: self.game.frame_count,
            final_score: self.game.player.score,
            survived_seconds: self.game.elapsed_seconds(),
            final_rng_state: self.game.rng.state(),
            exit: self.game.exit,
        }
    }

    pub fn store(&self) -> &S {
        &self.game.store
    }
}

/// Replays a scripted input stream headlessly and returns the outcome.
/// The same config and bytes always produce the same result.
pub fn replay(config: SessionConfig, inputs: &[u8]) -> RunResult {
    let clock = FrameClock::new();
    let mut session = GameplaySession::new(config, MemoryScoreStore::new(), (), clock.clone());
    for &byte in inputs {
        if session.is_finished() {
            break;
        }
        clock.tick(constants::FRAME_SECONDS);
        session.step_byte(byte);
    }
    session.result()
}
