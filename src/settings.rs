//! Demo settings and scene configuration
//!
//! Persisted as JSON in LocalStorage.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{BODY_RADIUS, GRAVITY};
use crate::sim::{Body, BodyError, Scene};

/// Errors raised while loading or validating settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings are not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("body {index}: {source}")]
    Body {
        index: usize,
        #[source]
        source: BodyError,
    },
    #[error("gravity must be finite, got {0}")]
    InvalidGravity(f32),
}

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    /// Triangle fan segments per drawn circle
    pub fn circle_segments(&self) -> u32 {
        match self {
            QualityPreset::Low => 16,
            QualityPreset::Medium => 32,
            QualityPreset::High => 64,
        }
    }
}

/// Initial state of one body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyConfig {
    pub center: [f32; 2],
    #[serde(default)]
    pub velocity: [f32; 2],
    pub radius: f32,
}

impl BodyConfig {
    pub fn build(&self) -> Result<Body, BodyError> {
        Body::new(
            Vec2::from(self.center),
            Vec2::from(self.velocity),
            self.radius,
        )
    }
}

/// Demo settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,
    /// Show FPS counter
    pub show_fps: bool,
    /// Downward acceleration (pixels/s²)
    pub gravity: f32,
    /// Bodies created at session start
    pub bodies: Vec<BodyConfig>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            show_fps: true,
            gravity: GRAVITY,
            bodies: vec![
                BodyConfig {
                    center: [100.0, 100.0],
                    velocity: [150.0, 0.0],
                    radius: BODY_RADIUS,
                },
                BodyConfig {
                    center: [300.0, 150.0],
                    velocity: [-120.0, 0.0],
                    radius: BODY_RADIUS,
                },
            ],
        }
    }
}

impl Settings {
    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "bounce_lab_settings";

    /// Parse settings from JSON; missing fields fall back to defaults
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Check everything `build_scene` would reject
    pub fn validate(&self) -> Result<(), SettingsError> {
        self.build_scene().map(|_| ())
    }

    /// Construct the session's scene from the configured bodies
    pub fn build_scene(&self) -> Result<Scene, SettingsError> {
        if !self.gravity.is_finite() {
            return Err(SettingsError::InvalidGravity(self.gravity));
        }
        let bodies = self
            .bodies
            .iter()
            .enumerate()
            .map(|(index, config)| {
                config
                    .build()
                    .map_err(|source| SettingsError::Body { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Scene::with_gravity(bodies, self.gravity))
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        if let Some(json) = crate::platform::web::storage_get(Self::STORAGE_KEY) {
            match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
                Err(e) => log::warn!("Ignoring stored settings: {}", e),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        match self.to_json() {
            Ok(json) => {
                if crate::platform::web::storage_set(Self::STORAGE_KEY, &json) {
                    log::info!("Settings saved");
                }
            }
            Err(e) => log::warn!("Could not serialize settings: {}", e),
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
