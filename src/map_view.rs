use serde::{Deserialize, Serialize};

use crate::config::MapConfig;
use crate::tracking::TrackingMachine;
use crate::utils;

/// Deepest zoom any common tile server offers.
pub const MAX_ZOOM: u8 = 22;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TileLayer {
    pub url: String,
    pub subdomains: Vec<String>,
    pub attribution: String,
}

impl TileLayer {
    /// Resolves the template for the tile containing the given point, picking
    /// the subdomain the same way Leaflet does.
    /// Zoom levels beyond [`MAX_ZOOM`] are treated as [`MAX_ZOOM`].
    pub fn tile_url(&self, lat: f64, lng: f64, zoom: u8) -> String {
        let zoom = zoom.min(MAX_ZOOM) as i32;
        let (x, y) = utils::lng_lat_to_tile_x_y(lng, lat, zoom);
        let mut url = self.url.clone();
        if !self.subdomains.is_empty() {
            let idx = (x as i64 + y as i64).unsigned_abs() % self.subdomains.len() as u64;
            url = url.replace("{s}", &self.subdomains[idx as usize]);
        }
        url.replace("{z}", &zoom.to_string())
            .replace("{x}", &x.to_string())
            .replace("{y}", &y.to_string())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    pub positions: Vec<[f64; 2]>,
    pub color: String,
}

/// Everything a map widget needs for one frame of the tracking screen.
/// Coordinates are `[lat, lon]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    pub center: [f64; 2],
    pub zoom: u8,
    pub tile_layer: TileLayer,
    pub marker: Option<[f64; 2]>,
    pub polyline: Option<Polyline>,
}

impl MapView {
    pub fn build(machine: &TrackingMachine, config: &MapConfig) -> Self {
        let current = machine.current_position().map(|p| p.lat_lng());
        MapView {
            center: current.unwrap_or(config.default_center),
            zoom: config.zoom.min(MAX_ZOOM),
            tile_layer: TileLayer {
                url: config.tile_url.clone(),
                subdomains: config.tile_subdomains.clone(),
                attribution: config.attribution.clone(),
            },
            marker: current,
            polyline: machine.path().polyline().map(|positions| Polyline {
                positions,
                color: config.polyline_color.clone(),
            }),
        }
    }

    pub fn center_tile_url(&self) -> String {
        self.tile_layer
            .tile_url(self.center[0], self.center[1], self.zoom)
    }
}

/// The drawing side of the tracking screen.
pub trait MapWidget {
    fn render(&mut self, view: &MapView);

    /// Called when the tracking screen goes away.
    fn clear(&mut self) {}
}
