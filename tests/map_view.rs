pub mod test_utils;

use assert_float_eq::assert_f64_near;
use radar_rescuer_core::config::MapConfig;
use radar_rescuer_core::map_view::{MapView, TileLayer, MAX_ZOOM};
use radar_rescuer_core::tracking::TrackingMachine;
use test_utils::sample;

#[test]
fn empty_session_frames_default_center() {
    let config = MapConfig::default();
    let view = MapView::build(&TrackingMachine::new(), &config);
    assert_f64_near!(view.center[0], 12.977439);
    assert_f64_near!(view.center[1], 77.570839);
    assert_eq!(view.zoom, 13);
    assert!(view.marker.is_none());
    assert!(view.polyline.is_none());
    assert!(view.tile_layer.attribution.contains("OpenStreetMap"));
}

#[test]
fn line_connects_points_in_order() {
    let mut machine = TrackingMachine::new();
    let walk = test_utils::load_walk();
    for s in &walk {
        machine.on_position_update(*s);
    }
    let view = MapView::build(&machine, &MapConfig::default());
    let polyline = view.polyline.unwrap();
    assert_eq!(polyline.positions.len(), walk.len());
    for (position, s) in polyline.positions.iter().zip(&walk) {
        assert_f64_near!(position[0], s.latitude);
        assert_f64_near!(position[1], s.longitude);
    }
    assert_eq!(view.marker, Some(walk.last().unwrap().lat_lng()));
}

#[test]
fn custom_config() {
    let config = MapConfig {
        default_center: [48.8566, 2.3522],
        zoom: 15,
        polyline_color: "red".into(),
        ..MapConfig::default()
    };
    let mut machine = TrackingMachine::new();
    let view = MapView::build(&machine, &config);
    assert_eq!(view.center, [48.8566, 2.3522]);
    assert_eq!(view.zoom, 15);

    machine.on_position_update(sample(48.85, 2.35));
    machine.on_position_update(sample(48.86, 2.36));
    let view = MapView::build(&machine, &config);
    assert_eq!(view.polyline.unwrap().color, "red");
}

#[test]
fn tile_url() {
    let layer = TileLayer {
        url: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".into(),
        subdomains: vec!["a".into(), "b".into(), "c".into()],
        attribution: String::new(),
    };
    // tile 5861/3798, (5861 + 3798) % 3 == 2
    assert_eq!(
        layer.tile_url(12.977439, 77.570839, 13),
        "https://c.tile.openstreetmap.org/13/5861/3798.png"
    );

    let layer = TileLayer {
        url: "https://tiles.example.org/{z}/{x}/{y}.png".into(),
        subdomains: Vec::new(),
        attribution: String::new(),
    };
    assert_eq!(
        layer.tile_url(0.0, 0.0, 0),
        "https://tiles.example.org/0/0/0.png"
    );
}

#[test]
fn deep_zoom_is_capped() {
    let layer = TileLayer {
        url: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".into(),
        subdomains: vec!["a".into(), "b".into(), "c".into()],
        attribution: String::new(),
    };
    let deepest = "https://b.tile.openstreetmap.org/22/3000917/1944644.png";
    assert_eq!(layer.tile_url(12.977439, 77.570839, MAX_ZOOM), deepest);
    assert_eq!(layer.tile_url(12.977439, 77.570839, 31), deepest);
    assert_eq!(layer.tile_url(12.977439, 77.570839, u8::MAX), deepest);

    let config = MapConfig {
        zoom: 40,
        ..MapConfig::default()
    };
    let view = MapView::build(&TrackingMachine::new(), &config);
    assert_eq!(view.zoom, MAX_ZOOM);
}

#[test]
fn center_tile_follows_marker() {
    let mut machine = TrackingMachine::new();
    machine.on_position_update(sample(12.90, 77.58));
    let view = MapView::build(&machine, &MapConfig::default());
    assert_eq!(
        view.center_tile_url(),
        "https://a.tile.openstreetmap.org/13/5861/3799.png"
    );
}

#[test]
fn serializes_for_map_page() {
    let mut machine = TrackingMachine::new();
    machine.on_position_update(sample(12.90, 77.58));
    let view = MapView::build(&machine, &MapConfig::default());
    let json: serde_json::Value = serde_json::to_value(&view).unwrap();
    assert_eq!(json["zoom"], 13);
    assert_eq!(json["marker"][0], 12.90);
    assert!(json["polyline"].is_null());
    assert_eq!(json["tile_layer"]["subdomains"][1], "b");

    let back: MapView = serde_json::from_value(json).unwrap();
    assert_eq!(back, view);
}
