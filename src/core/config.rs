//! Configuration for the tween engine and the standard toast choreography
//!
//! Configuration is an explicit value handed to whatever needs it; there is
//! no process-wide state. Presets are available through [`AnimationProfile`],
//! and any config can round-trip through a JSON file.

use crate::core::constants::DEFAULT_TICK_INTERVAL_MS;
use crate::{PrateError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub enum AnimationProfile {
    /// 5ms ticks, the library's historical default
    Smooth,
    /// One tick per 60Hz frame
    Balanced,
    /// One tick per 30Hz frame
    Battery,
    Custom(EngineConfig),
}

impl AnimationProfile {
    pub fn resolve(&self) -> EngineConfig {
        match self {
            Self::Smooth => EngineConfig {
                tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
                ..EngineConfig::base()
            },
            Self::Balanced => EngineConfig {
                tick_interval_ms: 16,
                ..EngineConfig::base()
            },
            Self::Battery => EngineConfig {
                tick_interval_ms: 33,
                ..EngineConfig::base()
            },
            Self::Custom(config) => config.clone(),
        }
    }
}

impl Default for AnimationProfile {
    fn default() -> Self {
        Self::Smooth
    }
}

/// How the plan DSL reads the two coordinate fields of a `move` instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MoveSemantics {
    /// `(x,y)` fields are the start and end point
    #[default]
    Endpoints,
    /// Both fields land in one slot, so start and end are the last pair
    /// parsed and the move has zero length. Kept for plans authored against
    /// that behaviour.
    Legacy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct EngineConfig {
    pub tick_interval_ms: u64,
    pub move_semantics: MoveSemantics,
    pub toast: ToastTimings,
}

impl EngineConfig {
    fn base() -> Self {
        Self {
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            move_semantics: MoveSemantics::default(),
            toast: ToastTimings::default(),
        }
    }

    /// Tick interval clamped to at least one millisecond
    pub fn tick_interval_ms(&self) -> u64 {
        self.tick_interval_ms.max(1)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Load from `path`, falling back to defaults when it is missing or invalid
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => config,
            Err(PrateError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("no config at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                log::warn!("ignoring config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json_string()?)?;
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        AnimationProfile::default().resolve()
    }
}

/// Durations and travel of the standard pop-up animation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ToastTimings {
    pub fade_in_ms: u64,
    pub rise_ms: u64,
    pub hold_ms: u64,
    pub fade_out_ms: u64,
    pub sink_ms: u64,
    pub travel: i32,
}

impl Default for ToastTimings {
    fn default() -> Self {
        Self {
            fade_in_ms: 600,
            rise_ms: 600,
            hold_ms: 4000,
            fade_out_ms: 450,
            sink_ms: 600,
            travel: 100,
        }
    }
}

impl ToastTimings {
    /// Nominal length of the whole choreography
    pub fn total_ms(&self) -> u64 {
        self.fade_in_ms
            .max(self.rise_ms)
            .saturating_add(self.hold_ms)
            .saturating_add(self.fade_out_ms.max(self.sink_ms))
    }
}
