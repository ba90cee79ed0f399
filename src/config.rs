use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use crate::map_view::MAX_ZOOM;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// `[lat, lon]` used before the first fix arrives.
    pub default_center: [f64; 2],
    pub zoom: u8,
    pub tile_url: String,
    pub tile_subdomains: Vec<String>,
    pub attribution: String,
    pub polyline_color: String,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            default_center: [12.977439, 77.570839],
            zoom: 13,
            tile_url: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".into(),
            tile_subdomains: vec!["a".into(), "b".into(), "c".into()],
            attribution: "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors".into(),
            polyline_color: "blue".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeolocationConfig {
    pub enable_high_accuracy: bool,
    pub watch_position: bool,
    pub user_decision_timeout_ms: u64,
}

impl Default for GeolocationConfig {
    fn default() -> Self {
        Self {
            enable_high_accuracy: true,
            watch_position: true,
            user_decision_timeout_ms: 2000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Branding {
    pub title: String,
    pub tagline: String,
    pub footer: String,
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            title: "Radar Rescuer".into(),
            tagline: "Navigating Your Safety, One Scan at a Time".into(),
            footer: "A product by CatAssThrophics".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub map: MapConfig,
    pub geolocation: GeolocationConfig,
    pub scan_for_humans_url: String,
    pub branding: Branding,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            map: MapConfig::default(),
            geolocation: GeolocationConfig::default(),
            scan_for_humans_url:
                "https://colab.research.google.com/drive/1NBnr8pJBz2pH4k_iEQzsS7K7ZpfjcVZd".into(),
            branding: Branding::default(),
        }
    }
}

impl AppConfig {
    /// A missing file means defaults; a present but broken one is an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let mut config: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config at {}", path.display()))?;
        if config.map.zoom > MAX_ZOOM {
            warn!("zoom {} is too deep, using {}", config.map.zoom, MAX_ZOOM);
            config.map.zoom = MAX_ZOOM;
        }
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write config to {}", path.display()))
    }
}
