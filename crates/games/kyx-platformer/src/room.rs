use serde::{Deserialize, Serialize};

use kyx_core::geometry::Rect;

use crate::config::{EnemyConfig, WorldConfig};

/// A static, immovable rectangular obstacle. Position is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Platform {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

/// One screen of platforms. Platform order only matters for drawing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Room {
    platforms: Vec<Platform>,
}

impl Room {
    pub fn new(platforms: Vec<Platform>) -> Self {
        Self { platforms }
    }

    pub fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    /// Center position where this room's enemy is placed: on top of the first
    /// platform, or on the ground in the middle of the screen.
    pub fn enemy_spawn(&self, world: &WorldConfig, enemy: &EnemyConfig) -> (f32, f32) {
        let half_h = enemy.height / 2.0;
        match self.platforms.first() {
            Some(p) => (p.x + p.width / 2.0, p.y - half_h),
            None => (world.width / 2.0, world.ground_level - half_h),
        }
    }
}

/// Ordered rooms with cyclic left/right adjacency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    rooms: Vec<Room>,
    current_room: usize,
}

impl World {
    /// Build a world. An empty room list gets a single empty room so the
    /// current room is always valid.
    pub fn new(mut rooms: Vec<Room>) -> Self {
        if rooms.is_empty() {
            rooms.push(Room::default());
        }
        Self {
            rooms,
            current_room: 0,
        }
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn current_index(&self) -> usize {
        self.current_room
    }

    pub fn current_room(&self) -> &Room {
        &self.rooms[self.current_room]
    }

    /// Move `delta` rooms (negative = left), wrapping at both ends.
    /// Returns the new room index.
    pub fn shift(&mut self, delta: i32) -> usize {
        self.current_room = wrap_index(self.current_room, delta, self.rooms.len());
        self.current_room
    }
}

/// Cyclic index arithmetic: `-1` wraps to `len - 1`, `len` wraps to `0`.
pub fn wrap_index(current: usize, delta: i32, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let len = len as i64;
    (current as i64 + delta as i64).rem_euclid(len) as usize
}

/// The five built-in room layouts.
pub fn default_rooms() -> Vec<Room> {
    vec![
        // Progressive path
        Room::new(vec![
            Platform::new(80.0, 480.0, 240.0, 32.0),
            Platform::new(500.0, 450.0, 180.0, 25.0),
            Platform::new(120.0, 400.0, 200.0, 28.0),
            Platform::new(600.0, 350.0, 160.0, 22.0),
            Platform::new(200.0, 300.0, 140.0, 20.0),
        ]),
        // Zigzag
        Room::new(vec![
            Platform::new(100.0, 480.0, 220.0, 30.0),
            Platform::new(580.0, 450.0, 250.0, 33.0),
            Platform::new(50.0, 400.0, 120.0, 18.0),
            Platform::new(500.0, 350.0, 190.0, 26.0),
            Platform::new(150.0, 300.0, 130.0, 19.0),
        ]),
        // Staircase
        Room::new(vec![
            Platform::new(60.0, 500.0, 230.0, 31.0),
            Platform::new(120.0, 400.0, 100.0, 15.0),
            Platform::new(200.0, 300.0, 280.0, 34.0),
            Platform::new(580.0, 250.0, 150.0, 21.0),
        ]),
        // Circular spread
        Room::new(vec![
            Platform::new(350.0, 480.0, 260.0, 32.0),
            Platform::new(50.0, 450.0, 120.0, 18.0),
            Platform::new(650.0, 450.0, 180.0, 24.0),
            Platform::new(120.0, 400.0, 220.0, 29.0),
            Platform::new(250.0, 350.0, 190.0, 25.0),
            Platform::new(400.0, 300.0, 200.0, 26.0),
        ]),
        // Mixed
        Room::new(vec![
            Platform::new(80.0, 500.0, 230.0, 31.0),
            Platform::new(560.0, 480.0, 250.0, 33.0),
            Platform::new(150.0, 450.0, 110.0, 17.0),
            Platform::new(600.0, 420.0, 210.0, 29.0),
            Platform::new(220.0, 300.0, 280.0, 34.0),
        ]),
    ]
}
