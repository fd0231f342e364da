pub mod body;
pub mod geometry;
pub mod input;
pub mod tuning;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use std::collections::HashMap;

    use serde_json::Value;

    use crate::geometry::Rect;
    use crate::input::{Action, InputSnapshot};

    /// Input with only the given actions held.
    pub fn held(actions: &[Action]) -> InputSnapshot {
        InputSnapshot::from_actions(actions)
    }

    /// Input with nothing held.
    pub fn idle() -> InputSnapshot {
        InputSnapshot::default()
    }

    /// Build a flat tuning map from `(key, number)` pairs.
    pub fn tuning_map(pairs: &[(&str, f64)]) -> HashMap<String, Value> {
        pairs
            .iter()
            .map(|&(k, v)| (k.to_string(), Value::from(v)))
            .collect()
    }

    /// Assert that `body` does not penetrate any of `obstacles`.
    pub fn assert_no_penetration(body: &Rect, obstacles: &[Rect]) {
        for (i, obstacle) in obstacles.iter().enumerate() {
            assert!(
                !body.overlaps(obstacle),
                "Body {body:?} penetrates obstacle {i} {obstacle:?}"
            );
        }
    }
}
