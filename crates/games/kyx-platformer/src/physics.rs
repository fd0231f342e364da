use kyx_core::geometry::Rect;

use crate::room::Platform;

/// Velocity below which a horizontal collision is treated as "not moving".
const STATIONARY_EPSILON: f32 = 0.01;

/// Position, velocity and half-size of a moving body, shared by the player and
/// enemy controllers for collision resolution. Positions are centers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kinematic {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub half_w: f32,
    pub half_h: f32,
}

impl Kinematic {
    pub fn bounds(&self) -> Rect {
        Rect::from_center(self.x, self.y, self.half_w * 2.0, self.half_h * 2.0)
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.half_h
    }

    pub fn top(&self) -> f32 {
        self.y - self.half_h
    }
}

/// Outcome of the vertical collision pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VerticalContact {
    /// Index of the platform the body came to rest on, if any.
    pub landed_on: Option<usize>,
    /// Whether the body struck the underside of a platform.
    pub hit_ceiling: bool,
}

impl VerticalContact {
    pub fn grounded(&self) -> bool {
        self.landed_on.is_some()
    }
}

/// Apply `vx` and push the body out of any platform it now overlaps.
///
/// Moving bodies snap against the face they ran into. A body with no
/// horizontal velocity is pushed out through whichever side is closer.
/// Returns true if any platform blocked the move.
pub fn move_horizontal(body: &mut Kinematic, platforms: &[Platform]) -> bool {
    body.x += body.vx;
    let mut blocked = false;

    for platform in platforms {
        if !body.bounds().overlaps(&platform.bounds()) {
            continue;
        }
        blocked = true;

        if body.vx > STATIONARY_EPSILON {
            body.x = platform.left() - body.half_w;
        } else if body.vx < -STATIONARY_EPSILON {
            body.x = platform.right() + body.half_w;
        } else {
            // Center left of the platform's center means less overlap on the left.
            let (platform_cx, _) = platform.bounds().center();
            if body.x < platform_cx {
                body.x = platform.left() - body.half_w;
            } else {
                body.x = platform.right() + body.half_w;
            }
        }
        body.vx = 0.0;
    }

    blocked
}

/// Apply `vy` and resolve vertical overlaps using the position before the move
/// (`prev_y`) to tell landings from head bumps.
///
/// A body whose bottom was at or above a platform's top and is not rising
/// lands on it; one whose top was at or below the platform's bottom and is not
/// falling bumps its head. Anything else (a diagonal approach into a corner)
/// is pushed out along the smaller vertical overlap.
pub fn move_vertical(body: &mut Kinematic, prev_y: f32, platforms: &[Platform]) -> VerticalContact {
    body.y += body.vy;
    let mut contact = VerticalContact::default();
    let prev_bottom = prev_y + body.half_h;
    let prev_top = prev_y - body.half_h;

    for (index, platform) in platforms.iter().enumerate() {
        if !body.bounds().overlaps(&platform.bounds()) {
            continue;
        }

        if prev_bottom <= platform.top() && body.vy >= 0.0 {
            land_on(body, platform, index, &mut contact);
        } else if prev_top >= platform.bottom() && body.vy <= 0.0 {
            bump_under(body, platform, &mut contact);
        } else {
            // Above the platform's center, the top overlap is the smaller one.
            let (_, platform_cy) = platform.bounds().center();
            if body.y < platform_cy {
                land_on(body, platform, index, &mut contact);
            } else {
                bump_under(body, platform, &mut contact);
            }
        }
    }

    contact
}

fn land_on(body: &mut Kinematic, platform: &Platform, index: usize, contact: &mut VerticalContact) {
    body.y = platform.top() - body.half_h;
    body.vy = 0.0;
    contact.landed_on = Some(index);
}

fn bump_under(body: &mut Kinematic, platform: &Platform, contact: &mut VerticalContact) {
    body.y = platform.bottom() + body.half_h;
    body.vy = 0.0;
    contact.hit_ceiling = true;
}

/// Clamp the body onto the world ground plane. Returns true if it is resting
/// on the ground afterwards.
pub fn resolve_ground(body: &mut Kinematic, ground_level: f32) -> bool {
    if body.bottom() >= ground_level {
        body.y = ground_level - body.half_h;
        body.vy = 0.0;
        true
    } else {
        false
    }
}
