use crate::geometry::Rect;

/// Capability shared by every simulated entity (player and enemies).
///
/// Bodies are positioned by their center. The tick context and output are
/// per-implementation: the player consumes input and reports room transitions,
/// enemies consume the player's position and report nothing.
pub trait SimulatedBody {
    /// Borrowed world data a body needs to advance one tick.
    type TickContext<'a>;
    /// Value reported back to the simulation loop after a tick.
    type TickOutput;

    fn center(&self) -> (f32, f32);

    /// Half width and half height.
    fn half_extents(&self) -> (f32, f32);

    fn velocity(&self) -> (f32, f32);

    fn is_alive(&self) -> bool;

    /// Advance one fixed simulation step.
    fn tick(&mut self, ctx: Self::TickContext<'_>) -> Self::TickOutput;

    /// Bounding box used for every overlap test.
    fn bounds(&self) -> Rect {
        let (cx, cy) = self.center();
        let (hw, hh) = self.half_extents();
        Rect::from_center(cx, cy, hw * 2.0, hh * 2.0)
    }

    fn bottom(&self) -> f32 {
        self.center().1 + self.half_extents().1
    }

    fn top(&self) -> f32 {
        self.center().1 - self.half_extents().1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Crate {
        x: f32,
        y: f32,
        vy: f32,
    }

    impl SimulatedBody for Crate {
        type TickContext<'a> = f32;
        type TickOutput = ();

        fn center(&self) -> (f32, f32) {
            (self.x, self.y)
        }

        fn half_extents(&self) -> (f32, f32) {
            (5.0, 10.0)
        }

        fn velocity(&self) -> (f32, f32) {
            (0.0, self.vy)
        }

        fn is_alive(&self) -> bool {
            true
        }

        fn tick(&mut self, gravity: Self::TickContext<'_>) -> Self::TickOutput {
            self.vy += gravity;
            self.y += self.vy;
        }
    }

    #[test]
    fn bounds_are_centered() {
        let c = Crate {
            x: 50.0,
            y: 100.0,
            vy: 0.0,
        };
        assert_eq!(c.bounds(), Rect::new(45.0, 90.0, 10.0, 20.0));
        assert_eq!(c.top(), 90.0);
        assert_eq!(c.bottom(), 110.0);
    }

    #[test]
    fn tick_uses_context() {
        let mut c = Crate {
            x: 0.0,
            y: 0.0,
            vy: 0.0,
        };
        c.tick(2.0);
        c.tick(2.0);
        assert_eq!(c.y, 6.0);
    }
}
