use serde::{Deserialize, Serialize};

use crate::enemy::AiState;

/// Read-only view of the player for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub facing: f32,
    pub on_ground: bool,
    pub alive: bool,
    pub health: u32,
    pub max_health: u32,
    pub invulnerable_ticks: u32,
    /// Draw in the "hit" color this frame.
    pub flickering: bool,
    pub dashing: bool,
    pub running: bool,
}

/// Read-only view of one enemy for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemySnapshot {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub direction: f32,
    pub on_ground: bool,
    pub alive: bool,
    pub state: AiState,
}

/// Everything a renderer needs for one frame. Only the current room's
/// enemies are included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub tick: u64,
    pub room_index: usize,
    pub room_count: usize,
    pub player: PlayerSnapshot,
    pub enemies: Vec<EnemySnapshot>,
    pub game_over: bool,
}
