use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Key for the player's maximum health in a flat tuning map.
pub const KEY_PLAYER_MAX_HEALTH: &str = "playerMaxHealth";
/// Key for the run-modifier speed multiplier.
pub const KEY_RUN_MULTIPLIER: &str = "runMultiplier";
/// Key for the dash horizontal speed.
pub const KEY_DASH_SPEED: &str = "dashSpeed";
/// Key for the enemy base (patrol) speed.
pub const KEY_ENEMY_BASE_SPEED: &str = "enemyBaseSpeed";

/// Optional numeric overrides for the handful of values a game author can tune.
///
/// `None` means "keep the default".
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TuningOverrides {
    pub player_max_health: Option<u32>,
    pub run_multiplier: Option<f32>,
    pub dash_speed: Option<f32>,
    pub enemy_base_speed: Option<f32>,
}

/// Errors from parsing a tuning document.
#[derive(Debug)]
pub enum TuningError {
    /// The document was not valid JSON.
    Parse(serde_json::Error),
    /// The document (or its `tuning` section) was not a JSON object.
    NotAnObject,
}

impl std::fmt::Display for TuningError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(e) => write!(f, "invalid tuning JSON: {e}"),
            Self::NotAnObject => write!(f, "tuning section must be a JSON object"),
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(e) => Some(e),
            Self::NotAnObject => None,
        }
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}

impl TuningOverrides {
    /// Read overrides from a flat key/value map. Unknown keys are ignored;
    /// missing, non-numeric, or non-finite values leave the default in place.
    pub fn from_map(map: &HashMap<String, Value>) -> Self {
        let number = |key: &str| -> Option<f64> {
            let v = map.get(key)?.as_f64();
            match v {
                Some(n) if n.is_finite() => Some(n),
                Some(_) | None => {
                    tracing::warn!(key, "Ignoring non-numeric tuning value");
                    None
                },
            }
        };

        Self {
            player_max_health: number(KEY_PLAYER_MAX_HEALTH).map(|n| n.trunc().max(1.0) as u32),
            run_multiplier: number(KEY_RUN_MULTIPLIER).map(|n| n as f32),
            dash_speed: number(KEY_DASH_SPEED).map(|n| n as f32),
            enemy_base_speed: number(KEY_ENEMY_BASE_SPEED).map(|n| n as f32),
        }
    }

    /// Read overrides from a full game config document, using its `tuning`
    /// object. A document without a `tuning` key yields no overrides.
    pub fn from_game_config_json(json: &str) -> Result<Self, TuningError> {
        let doc: Value = serde_json::from_str(json)?;
        let Some(root) = doc.as_object() else {
            return Err(TuningError::NotAnObject);
        };
        match root.get("tuning") {
            None => Ok(Self::default()),
            Some(Value::Object(section)) => {
                let flat: HashMap<String, Value> = section
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect();
                Ok(Self::from_map(&flat))
            },
            Some(_) => Err(TuningError::NotAnObject),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
