//! Per-frame world state and the phase functions that advance it.
//!
//! Frame order: read input, update player (timers, rotation, thrust,
//! firing), advance shots, advance the power-up, advance asteroids, resolve
//! shot/asteroid collisions, resolve player collisions, replenish an empty
//! field, flush pending spawns, prune inactive entities.

use crate::constants::*;
use crate::error::RuleCode;
use crate::geom::{wrap_axis, Rect, Vec2};
use crate::input::FrameInput;
use crate::rng::SeededRng;

use super::{
    AsteroidSnapshot, Clock, EventSink, ExitReason, GameEvent, PlayerSnapshot, PowerUpSnapshot,
    ScoreSlot, ScoreStore, SessionConfig, ShotSnapshot, SizeClass, WorldSnapshot,
};

const PRUNE_ASTEROIDS: u8 = 1 << 0;
const PRUNE_SHOTS: u8 = 1 << 1;
const PRUNE_POWER_UP: u8 = 1 << 2;

/// Per-frame control intent decoded from raw input flags.
struct Controls {
    rotation: f32,
    thrust: f32,
    fire: bool,
}

impl Controls {
    fn from_input(input: FrameInput) -> Self {
        let rotation = match (input.left, input.right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        };
        let thrust = match (input.up, input.down) {
            (true, false) => 1.0,
            (false, true) => -1.0,
            _ => 0.0,
        };
        Self {
            rotation,
            thrust,
            fire: input.fire,
        }
    }
}

pub(super) struct Player {
    pub(super) position: Vec2,
    pub(super) angle: f32,
    pub(super) speed: f32,
    pub(super) lives: i32,
    pub(super) score: u32,
    pub(super) alpha: f32,
    pub(super) invulnerable: bool,
    pub(super) last_hit_frame: u32,
    pub(super) cooling_down: bool,
    pub(super) last_shot_frame: u32,
    pub(super) powered_up: bool,
    pub(super) power_frames_left: i32,
    pub(super) hitbox: Rect,
}

pub(super) struct Asteroid {
    pub(super) position: Vec2,
    pub(super) angle: f32,
    pub(super) size: SizeClass,
    pub(super) active: bool,
    pub(super) hitbox: Rect,
}

pub(super) struct Shot {
    pub(super) position: Vec2,
    pub(super) angle: f32,
    pub(super) frames_left: i32,
    pub(super) active: bool,
    pub(super) hitbox: Rect,
}

pub(super) struct PowerUp {
    pub(super) position: Vec2,
    pub(super) frames_left: i32,
    pub(super) active: bool,
    pub(super) hitbox: Rect,
}

pub(super) struct Game<S: ScoreStore, E: EventSink, C: Clock> {
    pub(super) frame_count: u32,
    pub(super) screen_width: f32,
    pub(super) screen_height: f32,
    pub(super) rng: SeededRng,
    pub(super) player: Player,
    pub(super) asteroids: Vec<Asteroid>,
    pub(super) shots: Vec<Shot>,
    pub(super) power_up: Option<PowerUp>,
    /// Asteroids staged by splits and replenishment; merged into the live
    /// collection only after all collision resolution for the frame.
    pub(super) pending_asteroids: Vec<Asteroid>,
    pub(super) exit: Option<ExitReason>,
    prune_mask: u8,
    start_seconds: f64,
    pub(super) store: S,
    pub(super) sink: E,
    pub(super) clock: C,
}

/// Moves a position by `speed` along `angle + offset` degrees, wraps each
/// axis into the screen, and drags the hitbox origin along.
fn advance(
    position: &mut Vec2,
    hitbox: &mut Rect,
    angle: f32,
    speed: f32,
    offset: f32,
    width: f32,
    height: f32,
) {
    let theta = (angle + offset).to_radians();
    position.x = wrap_axis(position.x + speed * theta.cos(), width);
    position.y = wrap_axis(position.y + speed * theta.sin(), height);
    hitbox.move_to(*position);
}

impl<S: ScoreStore, E: EventSink, C: Clock> Game<S, E, C> {
    pub(super) fn new(config: SessionConfig, store: S, sink: E, clock: C) -> Self {
        let center = Vec2::new(config.screen_width / 2.0, config.screen_height / 2.0);
        let player = Player {
            position: center,
            angle: 0.0,
            speed: 0.0,
            lives: STARTING_LIVES,
            score: 0,
            alpha: 1.0,
            invulnerable: false,
            last_hit_frame: 0,
            cooling_down: false,
            last_shot_frame: 0,
            powered_up: false,
            power_frames_left: 0,
            hitbox: Rect::at(center, PLAYER_EXTENT, PLAYER_EXTENT),
        };
        let start_seconds = clock.now();
        let mut game = Self {
            frame_count: 0,
            screen_width: config.screen_width,
            screen_height: config.screen_height,
            rng: SeededRng::new(config.seed),
            player,
            asteroids: Vec::new(),
            shots: Vec::new(),
            power_up: None,
            pending_asteroids: Vec::new(),
            exit: None,
            prune_mask: 0,
            start_seconds,
            store,
            sink,
            clock,
        };
        let count = game.rng.next_range(ROUND_START_MIN, ROUND_START_MAX + 1);
        game.spawn_edge_batch(count as u32);
        game.flush_pending();
        game
    }

    pub(super) fn step(&mut self, input: FrameInput) {
        if self.exit.is_some() {
            return;
        }
        if input.quit {
            self.exit = Some(ExitReason::Quit);
            return;
        }
        self.frame_count += 1;
        let controls = Controls::from_input(input);
        self.update_player(controls);
        self.update_shots();
        self.update_power_up();
        self.update_asteroids();
        self.resolve_shot_asteroid_collisions();
        self.resolve_player_collisions();
        self.replenish_if_cleared();
        self.flush_pending();
        self.prune_inactive();
    }

    fn update_player(&mut self, controls: Controls) {
        let frame = self.frame_count;
        {
            let player = &mut self.player;
            if player.cooling_down && frame - player.last_shot_frame >= SHOT_COOLDOWN_FRAMES {
                player.cooling_down = false;
            }
            if player.invulnerable && frame - player.last_hit_frame >= INVULNERABILITY_FRAMES {
                player.invulnerable = false;
                player.alpha = 1.0;
            }
            if player.powered_up {
                player.power_frames_left -= 1;
                if player.power_frames_left <= 0 {
                    player.powered_up = false;
                    player.power_frames_left = 0;
                }
            }
            player.angle += controls.rotation * PLAYER_ROTATION_RATE;
        }

        let (width, height) = (self.screen_width, self.screen_height);
        let angle = self.player.angle;
        advance(
            &mut self.player.position,
            &mut self.player.hitbox,
            angle,
            PLAYER_SPEED * controls.thrust,
            FORWARD_OFFSET_DEGREES,
            width,
            height,
        );
        if controls.thrust != 0.0 {
            self.player.speed = PLAYER_SPEED * controls.thrust;
            self.sink.notify(GameEvent::Thrust);
        } else if self.player.speed != 0.0 {
            // Coasting: decay toward zero without overshooting, then apply a
            // second displacement at the decayed speed. Matches the original
            // inertia model, wrap correction and all.
            if self.player.speed > 0.0 {
                self.player.speed = (self.player.speed - PLAYER_DECELERATION).max(0.0);
            } else {
                self.player.speed = (self.player.speed + PLAYER_DECELERATION).min(0.0);
            }
            let speed = self.player.speed;
            advance(
                &mut self.player.position,
                &mut self.player.hitbox,
                angle,
                speed,
                FORWARD_OFFSET_DEGREES,
                width,
                height,
            );
        }

        if controls.fire && !self.player.cooling_down {
            self.fire_shots();
        }
    }

    fn fire_shots(&mut self) {
        self.player.cooling_down = true;
        self.player.last_shot_frame = self.frame_count;
        let angle = self.player.angle;
        self.spawn_shot(angle);
        if self.player.powered_up {
            let limit = (FAN_SHOT_COUNT - 1) as f32 * FAN_SHOT_DEVIATION;
            let mut offset = -FAN_SHOT_DEVIATION;
            while offset < limit {
                self.spawn_shot(angle + offset);
                offset += 2.0 * FAN_SHOT_DEVIATION;
            }
        }
        self.sink.notify(GameEvent::ShotFired);
    }

    fn spawn_shot(&mut self, angle: f32) {
        let position = self.player.position;
        self.shots.push(Shot {
            position,
            angle,
            frames_left: SHOT_LIFETIME_FRAMES,
            active: true,
            hitbox: Rect::at(position, SHOT_EXTENT, SHOT_EXTENT),
        });
    }

    fn update_shots(&mut self) {
        let (width, height) = (self.screen_width, self.screen_height);
        let mut expired = false;
        for shot in &mut self.shots {
            if !shot.active {
                continue;
            }
            shot.frames_left -= 1;
            if shot.frames_left <= 0 {
                shot.active = false;
                expired = true;
                continue;
            }
            advance(
                &mut shot.position,
                &mut shot.hitbox,
                shot.angle,
                SHOT_SPEED,
                FORWARD_OFFSET_DEGREES,
                width,
                height,
            );
        }
        if expired {
            self.prune_mask |= PRUNE_SHOTS;
        }
    }

    fn update_power_up(&mut self) {
        if let Some(power_up) = self.power_up.as_mut() {
            if power_up.active {
                power_up.frames_left -= 1;
                if power_up.frames_left <= 0 {
                    power_up.frames_left = 0;
                    power_up.active = false;
                    self.prune_mask |= PRUNE_POWER_UP;
                }
                return;
            }
        }
        if self.frame_count % POWER_UP_GENERATION_RATE == 0 && self.rng.coin_flip() {
            let max_x = (self.screen_width - POWER_UP_SPAWN_MARGIN - POWER_UP_EXTENT) as i32;
            let max_y = (self.screen_height - POWER_UP_SPAWN_MARGIN - POWER_UP_EXTENT) as i32;
            let margin = POWER_UP_SPAWN_MARGIN as i32;
            let position = Vec2::new(
                self.rng.next_range(margin, max_x) as f32,
                self.rng.next_range(margin, max_y) as f32,
            );
            self.power_up = Some(PowerUp {
                position,
                frames_left: POWER_UP_LIFETIME_FRAMES,
                active: true,
                hitbox: Rect::at(position, POWER_UP_EXTENT, POWER_UP_EXTENT),
            });
        }
    }

    fn update_asteroids(&mut self) {
        let (width, height) = (self.screen_width, self.screen_height);
        for asteroid in &mut self.asteroids {
            if !asteroid.active {
                continue;
            }
            advance(
                &mut asteroid.position,
                &mut asteroid.hitbox,
                asteroid.angle,
                ASTEROID_SPEED,
                0.0,
                width,
                height,
            );
        }
    }

    fn resolve_shot_asteroid_collisions(&mut self) {
        for shot_idx in 0..self.shots.len() {
            if !self.shots[shot_idx].active {
                continue;
            }
            for asteroid_idx in 0..self.asteroids.len() {
                if !self.asteroids[asteroid_idx].active {
                    continue;
                }
                if !self.shots[shot_idx]
                    .hitbox
                    .overlaps(&self.asteroids[asteroid_idx].hitbox)
                {
                    continue;
                }
                self.shots[shot_idx].active = false;
                self.prune_mask |= PRUNE_SHOTS;
                self.split_asteroid(asteroid_idx);
                break;
            }
        }
    }

    /// Destroys the asteroid at `index`: awards score, stages fragments for
    /// the next frame, raises the explosion event.
    fn split_asteroid(&mut self, index: usize) {
        let (position, size) = {
            let asteroid = &mut self.asteroids[index];
            asteroid.active = false;
            (asteroid.position, asteroid.size)
        };
        self.prune_mask |= PRUNE_ASTEROIDS;
        self.player.score += size.score();
        self.sink.notify(GameEvent::Explosion(size));
        if let Some(fragment_size) = size.smaller() {
            self.stage_asteroids(ASTEROID_SPLIT_COUNT, position, fragment_size);
        }
    }

    /// Stages `count` asteroids at `position`, each with an independent
    /// random facing angle. They join the live collection at end of frame.
    fn stage_asteroids(&mut self, count: u32, position: Vec2, size: SizeClass) {
        for _ in 0..count {
            let angle = self.rng.next_range(1, 361) as f32;
            self.pending_asteroids.push(Asteroid {
                position,
                angle,
                size,
                active: true,
                hitbox: Rect::at(position, size.extent(), size.extent()),
            });
        }
    }

    fn resolve_player_collisions(&mut self) {
        for idx in 0..self.asteroids.len() {
            if !self.asteroids[idx].active {
                continue;
            }
            if self.player.invulnerable {
                break;
            }
            if self.asteroids[idx].hitbox.overlaps(&self.player.hitbox) {
                self.apply_player_damage();
                if self.exit.is_some() {
                    return;
                }
            }
        }

        if let Some(power_up) = self.power_up.as_mut() {
            if power_up.active && power_up.hitbox.overlaps(&self.player.hitbox) {
                power_up.active = false;
                self.prune_mask |= PRUNE_POWER_UP;
                self.player.powered_up = true;
                self.player.power_frames_left = POWER_UP_EFFECT_FRAMES;
                self.sink.notify(GameEvent::PowerUpPickup);
            }
        }
    }

    fn apply_player_damage(&mut self) {
        if self.player.lives <= 1 {
            // Terminal hit. Records persist before the session finishes.
            self.persist_records();
            self.player.lives = 0;
            self.exit = Some(ExitReason::GameOver);
            return;
        }
        self.player.lives -= 1;
        self.player.last_hit_frame = self.frame_count;
        self.player.invulnerable = true;
        self.player.alpha = PLAYER_HIT_ALPHA;
        self.sink.notify(GameEvent::Damage);
    }

    /// Writes each record slot independently, only when beaten.
    fn persist_records(&mut self) {
        let elapsed = self.elapsed_seconds() as u32;
        if self.player.score > self.store.load(ScoreSlot::BestScore) {
            self.store.save(ScoreSlot::BestScore, self.player.score);
        }
        if elapsed > self.store.load(ScoreSlot::BestTime) {
            self.store.save(ScoreSlot::BestTime, elapsed);
        }
    }

    /// Repopulates an emptied field. Fragments staged this frame count as
    /// population, so a split never races a replenishment batch.
    fn replenish_if_cleared(&mut self) {
        if self.exit.is_some() || !self.pending_asteroids.is_empty() {
            return;
        }
        if self.asteroids.iter().any(|asteroid| asteroid.active) {
            return;
        }
        let count = self.rng.next_range(REPLENISH_MIN, REPLENISH_MAX + 1);
        self.spawn_edge_batch(count as u32);
    }

    /// Stages `count` large asteroids at one random edge position: either
    /// the left edge at a random y, or the top edge at a random x.
    fn spawn_edge_batch(&mut self, count: u32) {
        let position = if self.rng.coin_flip() {
            Vec2::new(0.0, self.rng.next_range(0, self.screen_height as i32) as f32)
        } else {
            Vec2::new(self.rng.next_range(0, self.screen_width as i32) as f32, 0.0)
        };
        self.stage_asteroids(count, position, SizeClass::Large);
    }

    fn flush_pending(&mut self) {
        self.asteroids.append(&mut self.pending_asteroids);
    }

    fn prune_inactive(&mut self) {
        if self.prune_mask & PRUNE_ASTEROIDS != 0 {
            self.asteroids.retain(|asteroid| asteroid.active);
        }
        if self.prune_mask & PRUNE_SHOTS != 0 {
            self.shots.retain(|shot| shot.active);
        }
        if self.prune_mask & PRUNE_POWER_UP != 0
            && self.power_up.as_ref().map_or(false, |p| !p.active)
        {
            self.power_up = None;
        }
        self.prune_mask = 0;
    }

    pub(super) fn elapsed_seconds(&self) -> f64 {
        self.clock.now() - self.start_seconds
    }

    fn in_bounds(&self, position: Vec2) -> bool {
        position.x >= 0.0
            && position.x < self.screen_width
            && position.y >= 0.0
            && position.y < self.screen_height
    }

    /// Structural rules that must hold at every frame boundary.
    pub(super) fn validate_invariants(&self) -> Result<(), RuleCode> {
        if !(0..=STARTING_LIVES).contains(&self.player.lives) {
            return Err(RuleCode::PlayerLivesRange);
        }
        if !self.in_bounds(self.player.position) {
            return Err(RuleCode::PlayerBounds);
        }
        let buff_ok = if self.player.powered_up {
            (1..=POWER_UP_EFFECT_FRAMES).contains(&self.player.power_frames_left)
        } else {
            self.player.power_frames_left == 0
        };
        if !buff_ok {
            return Err(RuleCode::PlayerBuffRange);
        }
        for asteroid in &self.asteroids {
            if asteroid.active && !self.in_bounds(asteroid.position) {
                return Err(RuleCode::AsteroidBounds);
            }
        }
        for shot in &self.shots {
            if shot.active && !(1..=SHOT_LIFETIME_FRAMES).contains(&shot.frames_left) {
                return Err(RuleCode::ShotState);
            }
        }
        if let Some(power_up) = &self.power_up {
            let ok = power_up.active
                && (1..=POWER_UP_LIFETIME_FRAMES).contains(&power_up.frames_left)
                && self.in_bounds(power_up.position);
            if !ok {
                return Err(RuleCode::PowerUpState);
            }
        }
        if !self.pending_asteroids.is_empty() {
            return Err(RuleCode::PendingNotFlushed);
        }
        Ok(())
    }

    pub(super) fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            frame: self.frame_count,
            elapsed_seconds: self.elapsed_seconds(),
            player: PlayerSnapshot {
                x: self.player.position.x,
                y: self.player.position.y,
                angle: self.player.angle,
                speed: self.player.speed,
                lives: self.player.lives,
                score: self.player.score,
                alpha: self.player.alpha,
                invulnerable: self.player.invulnerable,
                powered_up: self.player.powered_up,
            },
            asteroids: self
                .asteroids
                .iter()
                .filter(|asteroid| asteroid.active)
                .map(|asteroid| AsteroidSnapshot {
                    x: asteroid.position.x,
                    y: asteroid.position.y,
                    angle: asteroid.angle,
                    size: asteroid.size,
                })
                .collect(),
            shots: self
                .shots
                .iter()
                .filter(|shot| shot.active)
                .map(|shot| ShotSnapshot {
                    x: shot.position.x,
                    y: shot.position.y,
                    angle: shot.angle,
                    frames_left: shot.frames_left,
                })
                .collect(),
            power_up: self.power_up.as_ref().filter(|p| p.active).map(|p| {
                PowerUpSnapshot {
                    x: p.position.x,
                    y: p.position.y,
                    frames_left: p.frames_left,
                }
            }),
            rng_state: self.rng.state(),
            exit: self.exit,
        }
    }
}
