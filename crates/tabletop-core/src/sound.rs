//! Sound lookups for animated moves.
//!
//! Playback belongs to the audio subsystem; this module only answers which
//! sound, if any, goes with a move.

use serde::{Deserialize, Serialize};

/// Full sound configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoundConfig {
    pub sound: String,
    #[serde(default = "default_one")]
    pub volume: f32,
    #[serde(default, rename = "loop")]
    pub looped: bool,
    #[serde(default = "default_one")]
    pub speed: f32,
    /// Offset into the sound, in seconds.
    #[serde(default)]
    pub starts_at: f32,
    /// Play at most this long, in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f32>,
}

fn default_one() -> f32 {
    1.0
}

impl SoundConfig {
    pub fn new(sound: impl Into<String>) -> Self {
        Self {
            sound: sound.into(),
            volume: 1.0,
            looped: false,
            speed: 1.0,
            starts_at: 0.0,
            duration: None,
        }
    }

    pub fn volume(mut self, volume: f32) -> Self {
        self.volume = volume;
        self
    }
}

/// A sound as written in configuration: `false`, an id, or a full config.
///
/// `true` defers to the next level (material override, then defaults).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SoundSetting {
    Flag(bool),
    Id(String),
    Config(SoundConfig),
}

impl From<&str> for SoundSetting {
    fn from(id: &str) -> Self {
        Self::Id(id.to_string())
    }
}

impl From<String> for SoundSetting {
    fn from(id: String) -> Self {
        Self::Id(id)
    }
}

impl From<SoundConfig> for SoundSetting {
    fn from(config: SoundConfig) -> Self {
        Self::Config(config)
    }
}

impl From<bool> for SoundSetting {
    fn from(flag: bool) -> Self {
        Self::Flag(flag)
    }
}

/// Outcome of one level of the lookup.
enum Decision {
    Play(SoundConfig),
    Silence,
    Defer,
}

impl SoundSetting {
    fn decide(&self) -> Decision {
        match self {
            Self::Flag(false) => Decision::Silence,
            Self::Flag(true) => Decision::Defer,
            Self::Id(id) => Decision::Play(SoundConfig::new(id.clone())),
            Self::Config(config) => Decision::Play(config.clone()),
        }
    }
}

/// Walks the levels from most to least specific; the first decisive one wins.
pub fn resolve_sound<'a>(
    levels: impl IntoIterator<Item = Option<&'a SoundSetting>>,
) -> Option<SoundConfig> {
    for setting in levels.into_iter().flatten() {
        match setting.decide() {
            Decision::Play(config) => return Some(config),
            Decision::Silence => return None,
            Decision::Defer => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_decisive_level_wins() {
        let config = SoundSetting::Flag(true);
        let material = SoundSetting::from("coin");
        let default = SoundSetting::from("whoosh");
        let sound = resolve_sound([Some(&config), Some(&material), Some(&default)]);
        assert_eq!(sound.map(|s| s.sound), Some("coin".to_string()));
    }

    #[test]
    fn test_false_silences() {
        let config = SoundSetting::Flag(false);
        let default = SoundSetting::from("whoosh");
        assert!(resolve_sound([Some(&config), None, Some(&default)]).is_none());
    }

    #[test]
    fn test_parse_setting_shapes() {
        let flag: SoundSetting = serde_json::from_str("false").unwrap();
        assert_eq!(flag, SoundSetting::Flag(false));
        let id: SoundSetting = serde_json::from_str(r#""card""#).unwrap();
        assert_eq!(id, SoundSetting::from("card"));
        let config: SoundSetting =
            serde_json::from_str(r#"{"sound": "dice", "volume": 0.5, "loop": true}"#).unwrap();
        let SoundSetting::Config(config) = config else {
            panic!("expected a full config");
        };
        assert!(config.looped);
        assert!((config.volume - 0.5).abs() < f32::EPSILON);
        assert!((config.speed - 1.0).abs() < f32::EPSILON);
    }
}
