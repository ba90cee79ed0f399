#![allow(dead_code)]

use radar_rescuer_core::app::{App, ExternalLauncher};
use radar_rescuer_core::config::AppConfig;
use radar_rescuer_core::geolocation::{Availability, FeedGeolocation};
use radar_rescuer_core::import_data;
use radar_rescuer_core::map_view::{MapView, MapWidget};
use radar_rescuer_core::position::PositionSample;
use rand::Rng;
use std::path::Path;
use std::sync::{Arc, Mutex};

pub const WALK_GPX: &str = "./tests/data/cubbon_park_walk.gpx";

pub fn sample(latitude: f64, longitude: f64) -> PositionSample {
    PositionSample::new(latitude, longitude)
}

pub fn load_walk() -> Vec<PositionSample> {
    import_data::load_gpx(Path::new(WALK_GPX)).unwrap()
}

pub fn random_samples(n: usize) -> Vec<PositionSample> {
    let mut rng = rand::rng();
    (0..n)
        .map(|_| sample(rng.random_range(-90.0..=90.0), rng.random_range(-180.0..=180.0)))
        .collect()
}

pub fn unavailable() -> Availability {
    Availability {
        is_geolocation_available: false,
        is_geolocation_enabled: false,
    }
}

pub fn disabled() -> Availability {
    Availability {
        is_geolocation_available: true,
        is_geolocation_enabled: false,
    }
}

/// An app on default config fed by the returned geolocation handle.
pub fn new_app() -> (App, FeedGeolocation) {
    let geolocation = FeedGeolocation::new();
    let app = App::new(AppConfig::default(), Box::new(geolocation.clone()));
    (app, geolocation)
}

/// Delivers fixes through the watch and applies them, like the event loop.
pub fn deliver(app: &mut App, geolocation: &FeedGeolocation, samples: &[PositionSample]) {
    for sample in samples {
        geolocation.emit(*sample);
        app.pump();
    }
}

#[derive(Clone, Default)]
pub struct RecordingMapWidget {
    pub frames: Arc<Mutex<Vec<MapView>>>,
    pub clears: Arc<Mutex<usize>>,
}

impl MapWidget for RecordingMapWidget {
    fn render(&mut self, view: &MapView) {
        self.frames.lock().unwrap().push(view.clone());
    }

    fn clear(&mut self) {
        *self.clears.lock().unwrap() += 1;
    }
}

#[derive(Clone, Default)]
pub struct RecordingLauncher {
    pub opened: Arc<Mutex<Vec<String>>>,
}

impl ExternalLauncher for RecordingLauncher {
    fn open(&mut self, url: &str) {
        self.opened.lock().unwrap().push(url.to_string());
    }
}
