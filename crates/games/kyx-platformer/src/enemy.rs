use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use kyx_core::body::SimulatedBody;

use crate::config::{EnemyConfig, WorldConfig};
use crate::physics::{self, Kinematic};
use crate::room::Platform;
use crate::snapshot::EnemySnapshot;

/// Enemy behavior mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AiState {
    /// Wander the supporting platform.
    Patrol,
    /// Move toward a detected player.
    Chase,
    /// Committed lunge; lasts for the attack timer.
    Attack,
}

/// What an enemy can see of the player.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    pub x: f32,
    pub y: f32,
    pub half_height: f32,
    pub alive: bool,
}

impl Target {
    pub fn bottom(&self) -> f32 {
        self.y + self.half_height
    }
}

pub struct EnemyTickContext<'a> {
    pub platforms: &'a [Platform],
    pub world: &'a WorldConfig,
    pub target: Target,
    pub rng: &'a mut dyn RngCore,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub width: f32,
    pub height: f32,
    /// -1.0 or +1.0.
    pub direction: f32,
    pub state: AiState,
    pub attack_timer: u32,
    pub attack_cooldown_timer: u32,
    pub jump_timer: u32,
    pub patrol_timer: u32,
    pub on_ground: bool,
    /// Index into the room's platform list.
    pub current_platform: Option<usize>,
    pub alive: bool,
    config: EnemyConfig,
}

impl Enemy {
    pub fn new<R: Rng + ?Sized>(x: f32, y: f32, config: &EnemyConfig, rng: &mut R) -> Self {
        let patrol_timer = random_timer(
            rng,
            config.initial_patrol_timer_min,
            config.patrol_timer_max,
        );
        Self {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            width: config.width,
            height: config.height,
            direction: 1.0,
            state: AiState::Patrol,
            attack_timer: 0,
            attack_cooldown_timer: 0,
            jump_timer: 0,
            patrol_timer,
            on_ground: false,
            current_platform: None,
            alive: true,
            config: config.clone(),
        }
    }

    pub fn config(&self) -> &EnemyConfig {
        &self.config
    }

    pub fn half_width(&self) -> f32 {
        self.width / 2.0
    }

    pub fn half_height(&self) -> f32 {
        self.height / 2.0
    }

    pub fn top(&self) -> f32 {
        self.y - self.half_height()
    }

    /// Kill the enemy. Permanent.
    pub fn stomp(&mut self) {
        self.alive = false;
        self.vx = 0.0;
    }

    pub fn update<R: Rng + ?Sized>(
        &mut self,
        platforms: &[Platform],
        world: &WorldConfig,
        target: &Target,
        rng: &mut R,
    ) {
        if !self.alive {
            return;
        }

        self.jump_timer = self.jump_timer.saturating_sub(1);
        self.update_state(target);
        self.tick_attack_timers();

        let speed = self.move_speed();
        match self.state {
            AiState::Chase | AiState::Attack if target.alive => self.face(target),
            AiState::Chase | AiState::Attack => {},
            AiState::Patrol => self.patrol_direction(platforms, rng),
        }

        self.steer(speed);
        self.move_and_collide(platforms, world.ground_level);
        self.keep_in_bounds(world.width);
        self.maybe_jump(platforms, target, rng);
    }

    fn update_state(&mut self, target: &Target) {
        let cfg = &self.config;
        if self.attack_timer > 0 {
            self.state = AiState::Attack;
            return;
        }
        if !target.alive {
            self.state = AiState::Patrol;
            return;
        }

        let dx = (target.x - self.x).abs();
        let dy = (target.y - self.y).abs();
        let next = if dx <= cfg.attack_range
            && dy <= cfg.attack_vertical_tolerance
            && self.attack_cooldown_timer == 0
        {
            self.attack_timer = cfg.attack_duration;
            AiState::Attack
        } else if dx <= cfg.detection_range && dy <= cfg.vertical_tolerance {
            AiState::Chase
        } else {
            AiState::Patrol
        };

        if next != self.state {
            tracing::trace!(from = ?self.state, to = ?next, "Enemy state change");
        }
        self.state = next;
    }

    fn tick_attack_timers(&mut self) {
        if self.attack_timer > 0 {
            self.attack_timer -= 1;
            if self.attack_timer == 0 {
                self.attack_cooldown_timer = self.config.attack_cooldown;
            }
        } else {
            self.attack_cooldown_timer = self.attack_cooldown_timer.saturating_sub(1);
        }
    }

    fn move_speed(&self) -> f32 {
        let base = self.config.base_speed;
        match self.state {
            AiState::Patrol => base,
            AiState::Chase => base * self.config.chase_multiplier,
            AiState::Attack => base * self.config.attack_multiplier,
        }
    }

    fn face(&mut self, target: &Target) {
        let dx = target.x - self.x;
        if dx.abs() > self.config.facing_dead_zone {
            self.direction = dx.signum();
        }
    }

    fn patrol_direction<R: Rng + ?Sized>(&mut self, platforms: &[Platform], rng: &mut R) {
        if !self.on_ground {
            return;
        }

        self.patrol_timer = self.patrol_timer.saturating_sub(1);
        if self.patrol_timer == 0 {
            if rng.random_bool(self.config.patrol_flip_chance) {
                self.direction = -self.direction;
            }
            self.patrol_timer =
                random_timer(rng, self.config.patrol_timer_min, self.config.patrol_timer_max);
        }

        // Turn away from whichever edge is near so we never step off.
        if let Some(platform) = self.supporting(platforms) {
            let pad = self.config.edge_padding;
            if self.x - self.half_width() <= platform.left() + pad {
                self.direction = 1.0;
            } else if self.x + self.half_width() >= platform.right() - pad {
                self.direction = -1.0;
            }
        }
    }

    fn steer(&mut self, speed: f32) {
        let target_vx = self.direction * speed;
        let control = if self.on_ground { 1.0 } else { self.config.air_control };
        self.vx += self.config.acceleration * control * (target_vx - self.vx);

        let max = speed
            * if self.on_ground {
                self.config.ground_max_factor
            } else {
                self.config.air_max_factor
            };
        self.vx = self.vx.clamp(-max, max);
    }

    fn move_and_collide(&mut self, platforms: &[Platform], ground_level: f32) {
        let prev_y = self.y;
        let mut body = self.kinematic();

        physics::move_horizontal(&mut body, platforms);
        body.vy += self.config.gravity;
        let contact = physics::move_vertical(&mut body, prev_y, platforms);

        if contact.hit_ceiling {
            let lockout =
                (self.config.jump_cooldown as f32 * self.config.ceiling_jump_lockout).round() as u32;
            self.jump_timer = self.jump_timer.max(lockout);
        }

        self.current_platform = contact.landed_on;
        self.on_ground = contact.grounded();
        if !self.on_ground && physics::resolve_ground(&mut body, ground_level) {
            self.on_ground = true;
            body.vx *= self.config.ground_landing_damping;
        }

        self.x = body.x;
        self.y = body.y;
        self.vx = body.vx;
        self.vy = body.vy;
    }

    fn keep_in_bounds(&mut self, width: f32) {
        let half_w = self.half_width();
        if self.x - half_w < 0.0 {
            self.x = half_w;
            self.direction = 1.0;
            self.vx = 0.0;
        } else if self.x + half_w > width {
            self.x = width - half_w;
            self.direction = -1.0;
            self.vx = 0.0;
        }
    }

    fn maybe_jump<R: Rng + ?Sized>(&mut self, platforms: &[Platform], target: &Target, rng: &mut R) {
        if !self.on_ground || self.jump_timer > 0 {
            return;
        }

        // Patrol turns around inside `edge_padding`, so its hop uses the same zone.
        let wants_jump = match self.state {
            AiState::Chase | AiState::Attack => {
                target.bottom() < self.y - self.config.chase_jump_height
                    || self.near_edge(platforms, self.config.jump_edge_padding)
            },
            AiState::Patrol => {
                self.near_edge(platforms, self.config.edge_padding)
                    && rng.random_bool(self.config.patrol_jump_chance)
            },
        };

        if wants_jump {
            self.vy = self.config.jump_velocity;
            self.on_ground = false;
            self.current_platform = None;
            self.jump_timer = self.config.jump_cooldown;
            tracing::trace!(state = ?self.state, x = self.x, "Enemy jump");
        }
    }

    fn supporting<'p>(&self, platforms: &'p [Platform]) -> Option<&'p Platform> {
        self.current_platform.and_then(|i| platforms.get(i))
    }

    fn near_edge(&self, platforms: &[Platform], padding: f32) -> bool {
        self.supporting(platforms).is_some_and(|p| {
            self.x - self.half_width() <= p.left() + padding
                || self.x + self.half_width() >= p.right() - padding
        })
    }

    pub fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            x: self.x,
            y: self.y,
            vx: self.vx,
            vy: self.vy,
            direction: self.direction,
            on_ground: self.on_ground,
            alive: self.alive,
            state: self.state,
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

fn random_timer<R: Rng + ?Sized>(rng: &mut R, min: u32, max: u32) -> u32 {
    if min >= max {
        return min.max(1);
    }
    rng.random_range(min..=max).max(1)
}

impl SimulatedBody for Enemy {
    type TickContext<'a> = EnemyTickContext<'a>;
    type TickOutput = ();

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
        self.update(ctx.platforms, ctx.world, &ctx.target, ctx.rng);
    }
}
