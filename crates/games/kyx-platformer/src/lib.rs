pub mod config;
pub mod enemy;
pub mod physics;
pub mod player;
pub mod room;
pub mod snapshot;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use kyx_core::body::SimulatedBody;
use kyx_core::input::InputSnapshot;

use config::PlatformerConfig;
use enemy::{Enemy, EnemyTickContext, Target};
use player::{DustEmission, Player, PlayerTickContext};
use room::{Room, World, default_rooms};
use snapshot::FrameSnapshot;

/// Player spawn height above the ground plane (center to ground).
const PLAYER_SPAWN_HEIGHT: f32 = 30.0;

/// Something that happened during a tick, for presentation and logging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    RoomChanged { from: usize, to: usize },
    PlayerDamaged { health: u32 },
    PlayerDied,
    EnemyStomped { room: usize },
    DustKicked(DustEmission),
    GameOver,
}

/// Fixed-step platformer simulation: one player, a ring of rooms, and the
/// enemies living in each room.
pub struct Simulation {
    config: PlatformerConfig,
    world: World,
    player: Player,
    /// Enemies grouped by room index. Only the current room's enemies move.
    enemies: Vec<Vec<Enemy>>,
    rng: StdRng,
    paused: bool,
    game_over: bool,
    tick_count: u64,
}

impl Simulation {
    pub fn new(config: PlatformerConfig) -> Self {
        Self::with_rooms(config, default_rooms())
    }

    pub fn with_rooms(config: PlatformerConfig, rooms: Vec<Room>) -> Self {
        let config = config.sanitized();
        let world = World::new(rooms);
        let mut rng = StdRng::seed_from_u64(config.seed);

        let enemies = world
            .rooms()
            .iter()
            .map(|room| {
                let (x, y) = room.enemy_spawn(&config.world, &config.enemy);
                vec![Enemy::new(x, y, &config.enemy, &mut rng)]
            })
            .collect();

        let player = Player::new(
            config.world.width / 2.0,
            config.world.ground_level - PLAYER_SPAWN_HEIGHT,
            &config.player,
        );

        tracing::info!(
            rooms = world.room_count(),
            seed = config.seed,
            "Simulation created"
        );

        Self {
            config,
            world,
            player,
            enemies,
            rng,
            paused: false,
            game_over: false,
            tick_count: 0,
        }
    }

    pub fn config(&self) -> &PlatformerConfig {
        &self.config
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    /// Live enemies in `room`. Empty for an out-of-range index.
    pub fn enemies_in(&self, room: usize) -> &[Enemy] {
        self.enemies.get(room).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn enemies_in_mut(&mut self, room: usize) -> Option<&mut Vec<Enemy>> {
        self.enemies.get_mut(room)
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Advance one fixed step. Paused simulations ignore the call.
    pub fn tick(&mut self, input: &InputSnapshot) -> Vec<SimEvent> {
        if self.paused {
            return Vec::new();
        }
        self.tick_count += 1;
        let mut events = Vec::new();

        let prev_player_bottom = self.player.bottom();
        let room_change = self.player.tick(PlayerTickContext {
            input,
            platforms: self.world.current_room().platforms(),
            world: &self.config.world,
        });
        if let Some(dust) = self.player.take_dust() {
            events.push(SimEvent::DustKicked(dust));
        }

        if room_change != 0 && !self.game_over {
            let from = self.world.current_index();
            let to = self.world.shift(room_change);
            tracing::info!(from, to, "Room changed");
            events.push(SimEvent::RoomChanged { from, to });
        }

        let room = self.world.current_index();
        self.update_enemies(room);
        self.resolve_interactions(room, prev_player_bottom, &mut events);
        if let Some(enemies) = self.enemies.get_mut(room) {
            enemies.retain(|e| e.alive);
        }
        self.check_game_over(&mut events);

        events
    }

    fn update_enemies(&mut self, room: usize) {
        let Some(enemies) = self.enemies.get_mut(room) else {
            return;
        };
        let platforms = self.world.current_room().platforms();
        let target = Target {
            x: self.player.x,
            y: self.player.y,
            half_height: self.player.half_height(),
            alive: self.player.alive,
        };

        for enemy in enemies.iter_mut() {
            enemy.tick(EnemyTickContext {
                platforms,
                world: &self.config.world,
                target,
                rng: &mut self.rng,
            });
        }
    }

    /// Contact between the player and the room's live enemies: landing on top
    /// stomps, anything else hurts.
    fn resolve_interactions(&mut self, room: usize, prev_player_bottom: f32, events: &mut Vec<SimEvent>) {
        let Some(enemies) = self.enemies.get_mut(room) else {
            return;
        };
        let knockback = self.config.player.contact_knockback;

        for enemy in enemies.iter_mut() {
            if !enemy.alive || !self.player.alive {
                continue;
            }
            if !self.player.bounds().overlaps(&enemy.bounds()) {
                continue;
            }

            if prev_player_bottom <= enemy.top() && self.player.vy > 0.0 {
                enemy.stomp();
                self.player.bounce();
                tracing::debug!(room, x = enemy.x, "Enemy stomped");
                events.push(SimEvent::EnemyStomped { room });
            } else {
                let push = if self.player.x < enemy.x { -knockback } else { knockback };
                let before = self.player.health;
                self.player.take_damage(enemy.config().attack_damage, push);
                if self.player.health < before {
                    events.push(SimEvent::PlayerDamaged {
                        health: self.player.health,
                    });
                    if !self.player.alive {
                        events.push(SimEvent::PlayerDied);
                    }
                }
            }
        }
    }

    fn check_game_over(&mut self, events: &mut Vec<SimEvent>) {
        if !self.player.alive && !self.game_over {
            self.game_over = true;
            tracing::info!(tick = self.tick_count, "Game over");
            events.push(SimEvent::GameOver);
        }
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        let room = self.world.current_index();
        FrameSnapshot {
            tick: self.tick_count,
            room_index: room,
            room_count: self.world.room_count(),
            player: self.player.snapshot(),
            enemies: self
                .enemies_in(room)
                .iter()
                .filter(|e| e.alive)
                .map(Enemy::snapshot)
                .collect(),
            game_over: self.game_over,
        }
    }
}
