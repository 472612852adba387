//! Persistent settings for the visualizer.

use crate::timeline::playback::EndPolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// All persistable UI settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    // Display
    pub node_size: f32,
    pub show_links: bool,

    // Timeline
    pub playback_speed: f32,
    #[serde(default)]
    pub end_policy: EndPolicy,
    #[serde(default = "default_event_duration")]
    pub event_duration: f64,
    #[serde(default = "default_max_time")]
    pub max_time: f64,
    #[serde(default = "default_event_count")]
    pub event_count: usize,

    // Physics
    pub physics_enabled: bool,
    pub repulsion: f32,
    pub link_distance: f32,
    pub link_strength: f32,
    pub centering: f32,
    pub collide_radius: f32,
}

fn default_event_duration() -> f64 {
    crate::sample::EVENT_DURATION
}

fn default_max_time() -> f64 {
    crate::sample::MAX_TIME
}

fn default_event_count() -> usize {
    crate::sample::EVENT_COUNT
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            node_size: 60.0,
            show_links: true,

            playback_speed: 1.0,
            end_policy: EndPolicy::Wrap,
            event_duration: default_event_duration(),
            max_time: default_max_time(),
            event_count: default_event_count(),

            physics_enabled: true,
            repulsion: 12000.0,
            link_distance: 240.0,
            link_strength: 0.1,
            centering: 1.0,
            collide_radius: 150.0,
        }
    }
}

impl Settings {
    /// Get the path to the settings file
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut p| {
            p.push("pulsegraph");
            p.push("settings.json");
            p
        })
    }

    /// Load settings from disk, returning defaults if the file is
    /// missing or invalid
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            tracing::warn!("could not determine config directory, using defaults");
            return Self::default();
        };

        match std::fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(settings) => {
                    tracing::info!("loaded settings from {:?}", path);
                    settings
                }
                Err(e) => {
                    tracing::warn!("failed to parse settings file: {e}, using defaults");
                    Self::default()
                }
            },
            // File doesn't exist yet, that's fine
            Err(_) => Self::default(),
        }
    }

    /// Save settings to disk
    pub fn save(&self) {
        let Some(path) = Self::config_path() else {
            tracing::warn!("could not determine config directory, settings not saved");
            return;
        };

        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::warn!("failed to create config directory: {e}");
                return;
            }
        }

        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&path, json) {
                    tracing::warn!("failed to write settings file: {e}");
                }
            }
            Err(e) => {
                tracing::warn!("failed to serialize settings: {e}");
            }
        }
    }
}
