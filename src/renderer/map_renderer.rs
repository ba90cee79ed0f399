use std::sync::{Arc, Mutex};

use crate::map_view::{MapView, MapWidget};

/// Holds the latest map frame for HTTP clients, with a version that changes
/// whenever the frame does.
pub struct MapRenderer {
    map_view: Option<MapView>,
    version: u64,
}

impl MapRenderer {
    pub fn new() -> Self {
        Self {
            map_view: None,
            version: 0,
        }
    }

    pub fn update(&mut self, map_view: &MapView) {
        if self.map_view.as_ref() != Some(map_view) {
            self.map_view = Some(map_view.clone());
            self.reset();
        }
    }

    pub fn clear(&mut self) {
        if self.map_view.take().is_some() {
            self.reset();
        }
    }

    fn reset(&mut self) {
        self.version = self.version.wrapping_add(1);
    }

    pub fn get_current_version(&self) -> u64 {
        self.version
    }

    pub fn get_version_string(&self) -> String {
        format!("\"{:x}\"", self.version)
    }

    pub fn parse_version_string(version_str: &str) -> Option<u64> {
        // Remove quotes if present
        let cleaned = version_str.trim_matches('"');
        u64::from_str_radix(cleaned, 16).ok()
    }

    /// `None` when the client already has the current version.
    pub fn get_latest_view_if_changed(
        &self,
        client_version: Option<&str>,
    ) -> Option<(Option<&MapView>, String)> {
        match client_version {
            Some(v_str) if (Self::parse_version_string(v_str) == Some(self.version)) => None,
            _ => Some((self.map_view.as_ref(), self.get_version_string())),
        }
    }

    pub fn peek_latest_view(&self) -> Option<&MapView> {
        self.map_view.as_ref()
    }
}

impl Default for MapRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MapWidget for Arc<Mutex<MapRenderer>> {
    fn render(&mut self, view: &MapView) {
        self.lock().unwrap().update(view);
    }

    fn clear(&mut self) {
        self.lock().unwrap().clear();
    }
}
