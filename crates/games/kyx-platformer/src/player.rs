use serde::{Deserialize, Serialize};

use kyx_core::body::SimulatedBody;
use kyx_core::input::{Action, InputSnapshot};

use crate::config::{PlayerConfig, WorldConfig};
use crate::physics::{self, Kinematic};
use crate::room::Platform;
use crate::snapshot::PlayerSnapshot;

/// Speed ratio above which running kicks up dust.
const RUN_DUST_SPEED_RATIO: f32 = 1.05;
/// Extra ticks between dust puffs when running (vs. dashing).
const RUN_DUST_EXTRA_COOLDOWN: u32 = 3;
/// Particles per dust puff.
const DASH_DUST_COUNT: u32 = 3;
const RUN_DUST_COUNT: u32 = 1;
/// How far below the feet dust spawns.
const DUST_FOOT_OFFSET: f32 = 3.0;
/// Flicker half-period while invulnerable.
const FLICKER_PERIOD: u32 = 4;

/// A puff of ground dust requested by the player this tick. Purely
/// presentational; the simulation only reports it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DustEmission {
    pub x: f32,
    pub y: f32,
    pub facing: f32,
    pub intense: bool,
    pub count: u32,
}

/// Borrowed data the player needs for one tick.
pub struct PlayerTickContext<'a> {
    pub input: &'a InputSnapshot,
    pub platforms: &'a [Platform],
    pub world: &'a WorldConfig,
}

/// The player character. Position is the body center; negative y is up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub width: f32,
    pub height: f32,
    /// -1.0 (left) or +1.0 (right); persists from the last nonzero input.
    pub facing: f32,
    pub health: u32,
    pub max_health: u32,
    pub invuln_timer: u32,
    pub dash_timer: u32,
    pub dash_cooldown_timer: u32,
    pub dash_direction: f32,
    pub dust_timer: u32,
    pub on_ground: bool,
    pub is_jumping: bool,
    pub is_dashing: bool,
    pub is_running: bool,
    pub alive: bool,
    /// Dash input from the previous tick; a dash needs a fresh press.
    dash_held: bool,
    config: PlayerConfig,
    #[serde(skip)]
    pending_dust: Option<DustEmission>,
}

impl Player {
    pub fn new(x: f32, y: f32, config: &PlayerConfig) -> Self {
        let max_health = config.max_health.max(1);
        Self {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            width: config.width,
            height: config.height,
            facing: 1.0,
            health: max_health,
            max_health,
            invuln_timer: 0,
            dash_timer: 0,
            dash_cooldown_timer: 0,
            dash_direction: 1.0,
            dust_timer: 0,
            on_ground: false,
            is_jumping: false,
            is_dashing: false,
            is_running: false,
            alive: true,
            dash_held: false,
            config: config.clone(),
            pending_dust: None,
        }
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn half_width(&self) -> f32 {
        self.width / 2.0
    }

    pub fn half_height(&self) -> f32 {
        self.height / 2.0
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invuln_timer > 0
    }

    /// Whether the sprite should be drawn in its "hit" color this tick.
    pub fn is_flickering(&self) -> bool {
        self.invuln_timer > 0 && (self.invuln_timer / FLICKER_PERIOD) % 2 == 0
    }

    /// Dust requested during the last update, if any. Cleared on read.
    pub fn take_dust(&mut self) -> Option<DustEmission> {
        self.pending_dust.take()
    }

    /// Advance one tick. Returns the room transition: -1 (left edge),
    /// +1 (right edge) or 0.
    pub fn update(
        &mut self,
        input: &InputSnapshot,
        platforms: &[Platform],
        world: &WorldConfig,
    ) -> i32 {
        self.tick_timers();

        let run_held = input.held(Action::Run);
        let dx = if self.alive {
            let speed = self.config.speed * if run_held { self.config.run_multiplier } else { 1.0 };
            input.horizontal_axis() * speed
        } else {
            self.vx = 0.0;
            0.0
        };

        if dx != 0.0 {
            self.facing = dx.signum();
        }
        self.is_running = run_held && dx != 0.0 && !self.is_dashing;

        let dash_pressed = input.held(Action::Dash) && !self.dash_held;
        self.dash_held = input.held(Action::Dash);
        if dash_pressed
            && !self.is_dashing
            && self.dash_cooldown_timer == 0
            && self.alive
        {
            self.start_dash(if dx != 0.0 { dx.signum() } else { self.facing });
        }

        self.apply_horizontal_velocity(dx);
        self.apply_jump(input.held(Action::Jump));

        self.vy += if self.is_dashing {
            self.config.gravity * self.config.dash_gravity_scale
        } else {
            self.config.gravity
        };

        self.move_and_collide(platforms, world.ground_level);
        let room_change = self.apply_screen_bounds(world);
        self.maybe_emit_dust();

        room_change
    }

    fn tick_timers(&mut self) {
        self.invuln_timer = self.invuln_timer.saturating_sub(1);
        self.dash_cooldown_timer = self.dash_cooldown_timer.saturating_sub(1);
        self.dust_timer = self.dust_timer.saturating_sub(1);
        if self.is_dashing {
            self.dash_timer = self.dash_timer.saturating_sub(1);
            if self.dash_timer == 0 {
                self.end_dash();
            }
        }
    }

    fn start_dash(&mut self, direction: f32) {
        self.is_dashing = true;
        self.dash_direction = if direction == 0.0 { 1.0 } else { direction };
        self.dash_timer = self.config.dash_duration;
        self.dash_cooldown_timer = self.config.dash_cooldown;
        self.vy = 0.0;
        tracing::trace!(direction = self.dash_direction, "Dash started");
    }

    /// Leave the dash at no more than walking speed.
    fn end_dash(&mut self) {
        self.is_dashing = false;
        self.dash_timer = 0;
        self.vx = self.vx.clamp(-self.config.speed, self.config.speed);
    }

    fn apply_horizontal_velocity(&mut self, dx: f32) {
        if self.is_dashing {
            self.vx = self.dash_direction * self.config.dash_speed;
        } else if dx != 0.0 {
            self.vx = dx;
        } else if self.on_ground {
            self.vx *= self.config.friction;
            if self.vx.abs() < self.config.friction_snap {
                self.vx = 0.0;
            }
        }
    }

    fn apply_jump(&mut self, jump_held: bool) {
        if self.alive && jump_held && self.on_ground {
            self.vy = self.config.initial_jump_velocity;
            self.on_ground = false;
            self.is_jumping = true;
        }

        if self.is_jumping && jump_held && self.vy < 0.0 {
            self.vy = (self.vy + self.config.jump_hold_impulse).max(self.config.max_jump_velocity);
        } else if self.vy >= 0.0 || !jump_held {
            self.is_jumping = false;
        }
    }

    fn move_and_collide(&mut self, platforms: &[Platform], ground_level: f32) {
        let prev_y = self.y;
        let mut body = self.kinematic();

        physics::move_horizontal(&mut body, platforms);
        let contact = physics::move_vertical(&mut body, prev_y, platforms);
        let mut on_ground = contact.grounded();
        if !on_ground {
            on_ground = physics::resolve_ground(&mut body, ground_level);
        }

        self.x = body.x;
        self.y = body.y;
        self.vx = body.vx;
        self.vy = body.vy;
        self.on_ground = on_ground;
        if on_ground {
            self.is_jumping = false;
        }
    }

    fn apply_screen_bounds(&mut self, world: &WorldConfig) -> i32 {
        let half_w = self.half_width();
        let room_change = if self.x - half_w < 0.0 {
            self.x = world.width - half_w - world.room_entry_margin;
            -1
        } else if self.x + half_w > world.width {
            self.x = half_w + world.room_entry_margin;
            1
        } else {
            0
        };

        if room_change == 0 {
            self.x = self.x.clamp(half_w, world.width - half_w);
        }

        let half_h = self.half_height();
        if self.y - half_h < 0.0 {
            self.y = half_h;
            self.vy = 0.0;
        }

        room_change
    }

    fn maybe_emit_dust(&mut self) {
        self.pending_dust = None;
        if !self.on_ground || self.dust_timer > 0 {
            return;
        }

        let (intense, count, cooldown) = if self.is_dashing {
            (true, DASH_DUST_COUNT, self.config.run_dust_cooldown)
        } else if self.is_running && self.vx.abs() > self.config.speed * RUN_DUST_SPEED_RATIO {
            (
                false,
                RUN_DUST_COUNT,
                self.config.run_dust_cooldown + RUN_DUST_EXTRA_COOLDOWN,
            )
        } else {
            return;
        };

        self.dust_timer = cooldown;
        self.pending_dust = Some(DustEmission {
            x: self.x,
            y: self.y + self.half_height() + DUST_FOOT_OFFSET,
            facing: self.facing,
            intense,
            count,
        });
    }

    /// Apply a hit. Ignored while invulnerable or dead.
    pub fn take_damage(&mut self, amount: u32, knockback: f32) {
        if self.is_invulnerable() || !self.alive {
            return;
        }

        self.health = self.health.saturating_sub(amount);
        if self.health == 0 {
            self.alive = false;
            self.is_dashing = false;
            self.dash_timer = 0;
            self.vx = 0.0;
            self.vy = self.config.initial_jump_velocity;
            tracing::info!("Player died");
        } else {
            self.invuln_timer = self.config.invulnerability_ticks;
            self.vx = knockback;
            self.vy = self.config.initial_jump_velocity / 2.0;
            self.on_ground = false;
            tracing::debug!(health = self.health, knockback, "Player damaged");
        }
    }

    /// Upward bounce after stomping an enemy.
    pub fn bounce(&mut self) {
        self.vy = self.config.initial_jump_velocity;
        self.on_ground = false;
    }

    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            x: self.x,
            y: self.y,
            vx: self.vx,
            vy: self.vy,
            facing: self.facing,
            on_ground: self.on_ground,
            alive: self.alive,
            health: self.health,
            max_health: self.max_health,
            invulnerable_ticks: self.invuln_timer,
            flickering: self.is_flickering(),
            dashing: self.is_dashing,
            running: self.is_running,
        }
    }

    fn kinematic(&self) -> Kinematic {
        Kinematic {
            x: self.x,
            y: self.y,
            vx: self.vx,
            vy: self.vy,
            half_w: self.half_width(),
            half_h: self.half_height(),
        }
    }
}

impl SimulatedBody for Player {
    type TickContext<'a> = PlayerTickContext<'a>;
    type TickOutput = i32;

    fn center(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    fn half_extents(&self) -> (f32, f32) {
        (self.half_width(), self.half_height())
    }

    fn velocity(&self) -> (f32, f32) {
        (self.vx, self.vy)
    }

    fn is_alive(&self) -> bool {
        self.alive
    }

    fn tick(&mut self, ctx: Self::TickContext<'_>) -> Self::TickOutput {
        self.update(ctx.input, ctx.platforms, ctx.world)
    }
}
