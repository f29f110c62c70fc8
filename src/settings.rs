//! Game configuration
//!
//! Loaded from a JSON file by the native binary; every field has a default so
//! partial files work.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors from loading or validating a config
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config value for `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// How projectile progress advances
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MotionModel {
    /// Fixed increment per frame update (flight time depends on frame rate)
    PerFrame { increment: f32 },
    /// Progress is elapsed time over a fixed flight duration
    Timed { flight_ms: u64 },
}

impl Default for MotionModel {
    fn default() -> Self {
        MotionModel::Timed {
            flight_ms: FLIGHT_MS,
        }
    }
}

/// All tunable game parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Tracking ===
    /// Max anchor movement between frames that keeps a track's identity
    pub match_radius: f32,
    /// Drop tracks not seen for this long (ms)
    pub stale_after_ms: u64,
    /// Landmarks must exceed this confidence to count toward the anchor
    pub landmark_confidence: f32,
    /// Subjects below this overall confidence are ignored
    pub min_subject_confidence: f32,

    // === Firing ===
    /// Per-target cooldown (ms)
    pub cooldown_ms: u64,
    /// Offset added to the anchor when aiming
    pub aim_offset: Vec2,
    pub motion: MotionModel,
    /// Hit projectiles stay visible this long (ms)
    pub linger_ms: u64,

    // === Session ===
    pub countdown_ticks: u32,
    pub session_secs: u32,
    /// How long the "Hit!" banner stays up (ms)
    pub banner_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            match_radius: MATCH_RADIUS,
            stale_after_ms: STALE_AFTER_MS,
            landmark_confidence: LANDMARK_CONFIDENCE,
            min_subject_confidence: 0.0,

            cooldown_ms: COOLDOWN_MS,
            aim_offset: Vec2::new(0.0, AIM_OFFSET_Y),
            motion: MotionModel::default(),
            linger_ms: LINGER_MS,

            countdown_ticks: COUNTDOWN_TICKS,
            session_secs: SESSION_SECS,
            banner_ms: BANNER_MS,
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON config
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Load a config file, falling back to defaults on any error
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::from_file(path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("{} ({}), using default config", e, path.display());
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.match_radius.is_finite() || self.match_radius <= 0.0 {
            return Err(ConfigError::invalid("match_radius", "must be positive"));
        }
        for (field, value) in [
            ("landmark_confidence", self.landmark_confidence),
            ("min_subject_confidence", self.min_subject_confidence),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::invalid(field, format!("{} not in [0, 1]", value)));
            }
        }
        if !self.aim_offset.is_finite() {
            return Err(ConfigError::invalid("aim_offset", "must be finite"));
        }
        match self.motion {
            MotionModel::PerFrame { increment } if !increment.is_finite() || increment <= 0.0 => {
                return Err(ConfigError::invalid("motion.increment", "must be positive"));
            }
            MotionModel::Timed { flight_ms: 0 } => {
                return Err(ConfigError::invalid("motion.flight_ms", "must be non-zero"));
            }
            _ => {}
        }
        if self.countdown_ticks == 0 {
            return Err(ConfigError::invalid("countdown_ticks", "must be non-zero"));
        }
        if self.session_secs == 0 {
            return Err(ConfigError::invalid("session_secs", "must be non-zero"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference() {
        let config = GameConfig::default();
        assert_eq!(config.match_radius, 100.0);
        assert_eq!(config.cooldown_ms, 2000);
        assert_eq!(config.countdown_ticks, 3);
        assert_eq!(config.session_secs, 30);
        assert_eq!(config.linger_ms, 1000);
        assert_eq!(config.landmark_confidence, 0.5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = GameConfig::from_json_str(r#"{ "cooldown_ms": 500 }"#).unwrap();
        assert_eq!(config.cooldown_ms, 500);
        assert_eq!(config.session_secs, 30);
    }

    #[test]
    fn test_motion_model_json() {
        let config = GameConfig::from_json_str(
            r#"{ "motion": { "kind": "per_frame", "increment": 0.1 } }"#,
        )
        .unwrap();
        assert_eq!(config.motion, MotionModel::PerFrame { increment: 0.1 });
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = GameConfig::from_json_str(r#"{ "landmark_confidence": 1.5 }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "landmark_confidence",
                ..
            }
        ));

        let err = GameConfig::from_json_str(r#"{ "countdown_ticks": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));

        let err = GameConfig::from_json_str(r#"{ "motion": { "kind": "timed", "flight_ms": 0 } }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_malformed_json() {
        let err = GameConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let config = GameConfig::load("/nonexistent/pose-blaster.json");
        assert_eq!(config, GameConfig::default());
    }
}
