//! # Session Configuration
//!
//! 세션 단위 튜닝 값을 한 곳에서 관리합니다.
//!
//! ## 사용법
//! ```rust
//! use fp_core::config::SessionConfig;
//!
//! let config = SessionConfig::default();
//! assert_eq!(config.timings.wait_ms, 2500);
//!
//! let demo = SessionConfig::instant();
//! assert!(demo.validate().is_ok());
//! ```

mod env;

pub use env::{config_from_env, SESSION_CONFIG_PATH_ENV};

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::engine::layout::LayoutTiers;
use crate::engine::outcome::MIN_PARTICIPANTS;
use crate::engine::timing::PhaseTimings;
use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Dwell before each timed transition
    pub timings: PhaseTimings,
    /// Radius tiers and label rules
    pub layout: LayoutTiers,
    /// Smallest roster `start` accepts (at least 2)
    pub min_participants: usize,
    /// Fixed seed for the session random source; entropy when absent
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timings: PhaseTimings::default(),
            layout: LayoutTiers::default(),
            min_participants: MIN_PARTICIPANTS,
            seed: None,
        }
    }
}

impl SessionConfig {
    /// 데모용 (대기 시간 1ms)
    pub fn instant() -> Self {
        Self { timings: PhaseTimings::instant(), ..Self::default() }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.timings;
        if t.throw_ms == 0 || t.wait_ms == 0 || t.catch_ms == 0 {
            return Err(ConfigError::Invalid(format!(
                "dwell must be non-zero (throw={} wait={} catch={})",
                t.throw_ms, t.wait_ms, t.catch_ms
            )));
        }
        if self.min_participants < MIN_PARTICIPANTS {
            return Err(ConfigError::Invalid(format!(
                "min_participants must be at least {}, got {}",
                MIN_PARTICIPANTS, self.min_participants
            )));
        }

        let l = &self.layout;
        if l.medium_above >= l.dense_above {
            return Err(ConfigError::Invalid(format!(
                "medium_above ({}) must be below dense_above ({})",
                l.medium_above, l.dense_above
            )));
        }
        let radii = [l.base_radius, l.medium_radius, l.dense_radius];
        if radii.iter().any(|r| !r.is_finite() || *r <= 0.0) {
            return Err(ConfigError::Invalid(format!("radii must be positive, got {:?}", radii)));
        }
        if l.label_max_chars == 0 {
            return Err(ConfigError::Invalid("label_max_chars must be non-zero".to_string()));
        }
        Ok(())
    }
}
