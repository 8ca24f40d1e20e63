//! Render settings loaded from JSON and merged with command line flags.
//!
//! Precedence: command line, then the settings file, then the scene's own
//! defaults. Every field is optional at every level.

use crate::scenes::{Scene, SceneName};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Output path used when nothing else names one.
pub const DEFAULT_OUTPUT: &str = "image.ppm";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid setting: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Partial render settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderSettings {
    pub scene: Option<SceneName>,
    pub image_width: Option<u32>,
    pub samples_per_pixel: Option<u32>,
    pub max_depth: Option<u32>,
    pub seed: Option<u64>,
    pub output: Option<PathBuf>,
}

impl RenderSettings {
    /// Read settings from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        log::debug!("Loaded settings from {}", path.display());
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> ConfigResult<Self> {
        let settings: Self = serde_json::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Fill every field `self` leaves unset from `fallback`.
    pub fn or(self, fallback: RenderSettings) -> Self {
        Self {
            scene: self.scene.or(fallback.scene),
            image_width: self.image_width.or(fallback.image_width),
            samples_per_pixel: self.samples_per_pixel.or(fallback.samples_per_pixel),
            max_depth: self.max_depth.or(fallback.max_depth),
            seed: self.seed.or(fallback.seed),
            output: self.output.or(fallback.output),
        }
    }

    /// Reject zero sizes, which would produce an empty or black image.
    pub fn validate(&self) -> ConfigResult<()> {
        let checks = [
            ("image_width", self.image_width),
            ("samples_per_pixel", self.samples_per_pixel),
            ("max_depth", self.max_depth),
        ];
        for (name, value) in checks {
            if value == Some(0) {
                return Err(ConfigError::Invalid(format!("{name} must be at least 1")));
            }
        }
        Ok(())
    }

    pub fn scene(&self) -> SceneName {
        self.scene.unwrap_or_default()
    }

    pub fn seed(&self) -> u64 {
        self.seed.unwrap_or(ember_math::random::DEFAULT_SEED)
    }

    pub fn output(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT))
    }

    /// Override the scene's camera width and render quality where set.
    pub fn apply(&self, scene: &mut Scene) {
        if let Some(width) = self.image_width {
            scene.camera = scene.camera.clone().with_aspect(width, scene.aspect_ratio);
        }
        if let Some(samples) = self.samples_per_pixel {
            scene.config.samples_per_pixel = samples;
        }
        if let Some(depth) = self.max_depth {
            scene.config.max_depth = depth;
        }
    }
}

/// Combine command line settings with an optional settings file.
pub fn resolve(cli: RenderSettings, file: Option<&Path>) -> ConfigResult<RenderSettings> {
    let settings = match file {
        Some(path) => cli.or(RenderSettings::from_file(path)?),
        None => cli,
    };
    settings.validate()?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenes;
    use std::fs;

    #[test]
    fn test_parse_partial_settings() {
        let settings =
            RenderSettings::from_json(r#"{ "scene": "perlin-spheres", "samples_per_pixel": 8 }"#)
                .unwrap();

        assert_eq!(settings.scene, Some(SceneName::PerlinSpheres));
        assert_eq!(settings.samples_per_pixel, Some(8));
        assert_eq!(settings.image_width, None);
        assert_eq!(settings.output(), PathBuf::from(DEFAULT_OUTPUT));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            RenderSettings::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            RenderSettings::from_json(r#"{ "samples": 4 }"#),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            RenderSettings::from_json(r#"{ "max_depth": 0 }"#),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_command_line_wins_over_file() {
        let cli = RenderSettings {
            image_width: Some(64),
            seed: Some(9),
            ..Default::default()
        };
        let file = RenderSettings {
            scene: Some(SceneName::Quads),
            image_width: Some(800),
            max_depth: Some(12),
            ..Default::default()
        };

        let merged = cli.or(file);
        assert_eq!(merged.scene(), SceneName::Quads);
        assert_eq!(merged.image_width, Some(64));
        assert_eq!(merged.max_depth, Some(12));
        assert_eq!(merged.seed(), 9);
    }

    #[test]
    fn test_resolve_reads_file() {
        let path = std::env::temp_dir().join(format!("ember-settings-{}.json", std::process::id()));
        fs::write(&path, r#"{ "scene": "simple-light", "output": "light.png" }"#).unwrap();

        let settings = resolve(RenderSettings::default(), Some(&path)).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(settings.scene(), SceneName::SimpleLight);
        assert_eq!(settings.output(), PathBuf::from("light.png"));
    }

    #[test]
    fn test_resolve_missing_file() {
        let path = Path::new("/nonexistent/ember/settings.json");
        assert!(matches!(
            resolve(RenderSettings::default(), Some(path)),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn test_resolve_rejects_zero_from_command_line() {
        let cli = RenderSettings {
            samples_per_pixel: Some(0),
            ..Default::default()
        };
        assert!(matches!(resolve(cli, None), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_apply_overrides_scene_defaults() {
        let mut scene = scenes::build(SceneName::CheckeredSpheres);
        let settings = RenderSettings {
            image_width: Some(160),
            samples_per_pixel: Some(3),
            ..Default::default()
        };
        settings.apply(&mut scene);

        assert_eq!(scene.camera.image_width, 160);
        assert_eq!(scene.camera.image_height, 90);
        assert_eq!(scene.config.samples_per_pixel, 3);
        assert_eq!(scene.config.max_depth, 50);
    }
}
