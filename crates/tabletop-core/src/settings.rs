//! Engine-wide defaults, loadable from JSON.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;
use crate::locator::PileCache;
use crate::moves::MoveKind;
use crate::sound::SoundSetting;
use crate::trajectory::{Elevation, ElevationCurve};

/// Defaults used when no animation config matches a move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Duration of any move kind missing from `durations`, seconds.
    #[serde(default = "default_duration")]
    pub default_duration: f32,
    /// Per move kind durations, seconds.
    #[serde(default)]
    pub durations: HashMap<MoveKind, f32>,
    /// Peak height of the default arc, em. 0 keeps pieces on the table.
    #[serde(default = "default_elevation")]
    pub elevation: f32,
    #[serde(default = "default_peak")]
    pub peak: f32,
    #[serde(default)]
    pub curve: ElevationCurve,
    /// Full turns a die makes while rolling.
    #[serde(default = "default_roll_turns")]
    pub roll_turns: f32,
    #[serde(default = "default_min_zoom")]
    pub min_zoom: f32,
    #[serde(default = "default_max_zoom")]
    pub max_zoom: f32,
    /// Margin around focused items, em.
    #[serde(default = "default_focus_margin")]
    pub focus_margin: f32,
    /// Seed of pile jitter; random when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pile_seed: Option<u64>,
    /// Sounds played for a move kind when nothing more specific is set.
    #[serde(default)]
    pub sounds: HashMap<MoveKind, SoundSetting>,
}

fn default_duration() -> f32 {
    1.0
}

fn default_elevation() -> f32 {
    5.0
}

fn default_peak() -> f32 {
    0.5
}

fn default_roll_turns() -> f32 {
    2.0
}

fn default_min_zoom() -> f32 {
    0.2
}

fn default_max_zoom() -> f32 {
    4.0
}

fn default_focus_margin() -> f32 {
    1.0
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            default_duration: default_duration(),
            durations: HashMap::new(),
            elevation: default_elevation(),
            peak: default_peak(),
            curve: ElevationCurve::default(),
            roll_turns: default_roll_turns(),
            min_zoom: default_min_zoom(),
            max_zoom: default_max_zoom(),
            focus_margin: default_focus_margin(),
            pile_seed: None,
            sounds: HashMap::new(),
        }
    }
}

impl EngineSettings {
    /// Loads settings from a JSON string; missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn with_duration(mut self, kind: MoveKind, seconds: f32) -> Self {
        self.durations.insert(kind, seconds);
        self
    }

    pub fn with_sound(mut self, kind: MoveKind, sound: impl Into<SoundSetting>) -> Self {
        self.sounds.insert(kind, sound.into());
        self
    }

    /// Default duration of a move kind.
    pub fn duration(&self, kind: MoveKind) -> Duration {
        let seconds = self
            .durations
            .get(&kind)
            .copied()
            .unwrap_or(self.default_duration);
        Duration::try_from_secs_f32(seconds.max(0.0)).unwrap_or_else(|_| {
            tracing::warn!(kind = ?kind, seconds, "[settings] duration out of range");
            Duration::from_secs_f32(default_duration())
        })
    }

    /// Default arc, `None` when elevation is disabled.
    pub fn arc(&self) -> Option<Elevation> {
        (self.elevation > 0.0).then(|| Elevation::new(self.elevation).peak(self.peak).curve(self.curve))
    }

    pub fn sound(&self, kind: MoveKind) -> Option<&SoundSetting> {
        self.sounds.get(&kind)
    }

    /// A fresh jitter cache for a new view of the table.
    pub fn pile_cache(&self) -> PileCache {
        self.pile_seed.map_or_else(PileCache::default, PileCache::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_gives_defaults() {
        let settings = EngineSettings::from_json("{}").unwrap();
        assert_eq!(settings, EngineSettings::default());
    }

    #[test]
    fn test_partial_json() {
        let settings = EngineSettings::from_json(
            r#"{
                "default_duration": 0.5,
                "durations": {"roll": 2.0},
                "elevation": 0,
                "curve": "linear",
                "sounds": {"move": "slide", "shuffle": false}
            }"#,
        )
        .unwrap();
        assert_eq!(settings.duration(MoveKind::Roll), Duration::from_secs(2));
        assert_eq!(settings.duration(MoveKind::Move), Duration::from_millis(500));
        assert!(settings.arc().is_none());
        assert_eq!(settings.curve, ElevationCurve::Linear);
        assert_eq!(settings.sound(MoveKind::Move), Some(&SoundSetting::from("slide")));
        assert_eq!(settings.sound(MoveKind::Shuffle), Some(&SoundSetting::Flag(false)));
    }

    #[test]
    fn test_out_of_range_duration_falls_back() {
        let settings = EngineSettings::from_json(
            r#"{"default_duration": 1e30, "durations": {"roll": -3.0}}"#,
        )
        .unwrap();
        assert_eq!(settings.duration(MoveKind::Move), Duration::from_secs(1));
        assert_eq!(settings.duration(MoveKind::Roll), Duration::ZERO);
        let infinite = EngineSettings::default().with_duration(MoveKind::Move, f32::INFINITY);
        assert_eq!(infinite.duration(MoveKind::Move), Duration::from_secs(1));
    }

    #[test]
    fn test_json_round_trip_keeps_settings() {
        let settings = EngineSettings {
            pile_seed: Some(9),
            ..EngineSettings::default()
        }
        .with_duration(MoveKind::Create, 0.25);
        let json = settings.to_json().unwrap();
        assert_eq!(EngineSettings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(matches!(
            EngineSettings::from_json(r#"{"peak": "high"}"#),
            Err(SettingsError::Json(_))
        ));
    }
}
