use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use anyhow::Result;

use crate::app::{App, UiAction};
use crate::config::AppConfig;
use crate::geolocation::{Availability, FeedGeolocation};
use crate::logs;
use crate::position::PositionSample;
use crate::renderer::MapRenderer;

// Lock order: `app` before `map_renderer` (the app renders into it).
struct MainState {
    app: Mutex<App>,
    geolocation: FeedGeolocation,
    map_renderer: Arc<Mutex<MapRenderer>>,
    log_dir: PathBuf,
}

static MAIN_STATE: OnceLock<MainState> = OnceLock::new();

/// Sets up logging and the process-wide app. Fixes are pushed in through
/// [`on_location_update`] by whoever owns the platform's location service.
pub fn init(log_dir: String, config_path: Option<String>) -> Result<()> {
    if MAIN_STATE.get().is_some() {
        warn!("`init` is called multiple times");
        return Ok(());
    }

    // Nothing global is set up before the config loads, so a failed `init`
    // can be retried.
    let config = match config_path {
        Some(config_path) => AppConfig::load(Path::new(&config_path))?,
        None => AppConfig::default(),
    };
    let log_dir = PathBuf::from(log_dir);
    logs::init(&log_dir)?;
    let geolocation = FeedGeolocation::new();
    let map_renderer = Arc::new(Mutex::new(MapRenderer::new()));
    let app = App::new(config, Box::new(geolocation.clone()))
        .with_map_widget(Box::new(map_renderer.clone()));

    let state = MainState {
        app: Mutex::new(app),
        geolocation,
        map_renderer,
        log_dir,
    };
    if MAIN_STATE.set(state).is_err() {
        warn!("`init` raced with another `init`");
    } else {
        info!("initialized");
    }
    Ok(())
}

fn get() -> &'static MainState {
    MAIN_STATE.get().expect("main state is not initialized")
}

fn dispatch(action: UiAction) {
    get().app.lock().unwrap().dispatch(action);
}

pub fn set_geolocation_status(is_available: bool, is_enabled: bool) {
    get().geolocation.set_availability(Availability {
        is_geolocation_available: is_available,
        is_geolocation_enabled: is_enabled,
    });
}

/// Feeds a batch of fixes in the order given and applies them before
/// returning.
pub fn on_location_update(samples: Vec<PositionSample>) {
    let state = get();
    let mut app = state.app.lock().unwrap();
    for sample in samples {
        state.geolocation.emit(sample);
    }
    app.pump();
}

pub fn start_tracking() {
    dispatch(UiAction::FindYourPath);
}

pub fn stop_tracking() {
    dispatch(UiAction::StopTracking);
}

pub fn exit_tracking() {
    dispatch(UiAction::ExitTracking);
}

pub fn toggle_theme() {
    dispatch(UiAction::ToggleTheme);
}

pub fn scan_for_humans() {
    dispatch(UiAction::ScanForHumans);
}

pub fn is_tracking() -> bool {
    !get().app.lock().unwrap().view().is_home()
}

/// The `data-theme` attribute value.
pub fn current_theme() -> String {
    get().app.lock().unwrap().theme().data_theme().to_string()
}

pub fn render_screen() -> String {
    get().app.lock().unwrap().render().to_string()
}

/// `null` while no map is shown.
pub fn map_view_json() -> Result<String> {
    let map_view = get().app.lock().unwrap().map_view();
    Ok(serde_json::to_string(&map_view)?)
}

pub fn get_map_renderer() -> Arc<Mutex<MapRenderer>> {
    get().map_renderer.clone()
}

pub fn export_logs(target_file_path: String) -> Result<()> {
    log::logger().flush();
    logs::export(&get().log_dir, Path::new(&target_file_path))
}
