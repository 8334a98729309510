//! Tuning table for the gameplay simulation.
//!
//! Frame-based durations assume the fixed 60 FPS step the frontends drive.

/// Default viewport extents, used when the frontend does not override them.
pub const SCREEN_WIDTH: f32 = 800.0;
pub const SCREEN_HEIGHT: f32 = 450.0;

pub const FRAMES_PER_SECOND: f64 = 60.0;
pub const FRAME_SECONDS: f64 = 1.0 / FRAMES_PER_SECOND;

pub const STARTING_LIVES: i32 = 3;

/// Degrees added to the facing angle per frame of full rotation input.
pub const PLAYER_ROTATION_RATE: f32 = 10.0;
/// Scalar speed applied while thrust input is held.
pub const PLAYER_SPEED: f32 = 5.0;
/// Per-frame speed decay while coasting.
pub const PLAYER_DECELERATION: f32 = 0.1;
/// Sprite "up" is visual-forward, so forward displacement is offset -90°.
pub const FORWARD_OFFSET_DEGREES: f32 = -90.0;
pub const PLAYER_EXTENT: f32 = 32.0;
/// Alpha hint shown while the invulnerability window is open.
pub const PLAYER_HIT_ALPHA: f32 = 0.3;
/// Frames after a hit during which further damage is suppressed.
pub const INVULNERABILITY_FRAMES: u32 = 120;

pub const ASTEROID_SPEED: f32 = 5.0;
pub const ASTEROID_EXTENT_SMALL: f32 = 16.0;
pub const ASTEROID_EXTENT_MEDIUM: f32 = 32.0;
pub const ASTEROID_EXTENT_LARGE: f32 = 48.0;
/// Fragments spawned when a size-2 or size-3 asteroid is destroyed.
pub const ASTEROID_SPLIT_COUNT: u32 = 3;
/// Smaller rocks are harder to hit and score higher.
pub const SCORE_LARGE_ASTEROID: u32 = 10;
pub const SCORE_MEDIUM_ASTEROID: u32 = 20;
pub const SCORE_SMALL_ASTEROID: u32 = 30;
/// Edge-spawn batch bounds: round start and empty-field replenishment.
pub const ROUND_START_MIN: i32 = 1;
pub const ROUND_START_MAX: i32 = 8;
pub const REPLENISH_MIN: i32 = 1;
pub const REPLENISH_MAX: i32 = 4;

pub const SHOT_SPEED: f32 = 10.0;
pub const SHOT_EXTENT: f32 = 8.0;
pub const SHOT_LIFETIME_FRAMES: i32 = 60;
pub const SHOT_COOLDOWN_FRAMES: u32 = 20;

/// Power-up spawn rolls happen only on frames divisible by this rate.
pub const POWER_UP_GENERATION_RATE: u32 = 300;
pub const POWER_UP_LIFETIME_FRAMES: i32 = 300;
/// Frames the multi-shot buff stays active after pickup.
pub const POWER_UP_EFFECT_FRAMES: i32 = 300;
pub const POWER_UP_EXTENT: f32 = 24.0;
/// Inward margin keeping power-ups away from the wrap seam.
pub const POWER_UP_SPAWN_MARGIN: f32 = 32.0;

/// Fan-fire parameters while the buff is active: offsets step from
/// `-DEVIATION` up to (excluding) `(COUNT - 1) * DEVIATION` by `2 * DEVIATION`.
pub const FAN_SHOT_DEVIATION: f32 = 15.0;
pub const FAN_SHOT_COUNT: u32 = 3;
