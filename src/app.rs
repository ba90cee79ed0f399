use std::sync::mpsc::{self, Receiver, Sender};

use strum_macros::Display;

use crate::config::AppConfig;
use crate::geolocation::{GeolocationSource, PositionOptions};
use crate::map_view::{MapView, MapWidget};
use crate::position::PositionSample;
use crate::screen::Screen;
use crate::theme::Theme;
use crate::tracking::{RouterNotice, SampleResult, TrackingSession};

/// Buttons of the UI.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Display)]
pub enum UiAction {
    #[strum(to_string = "Find your path")]
    FindYourPath,
    #[strum(to_string = "Scan for Humans")]
    ScanForHumans,
    #[strum(to_string = "Stop Tracking")]
    StopTracking,
    #[strum(to_string = "Exit Tracking")]
    ExitTracking,
    #[strum(to_string = "Toggle Theme")]
    ToggleTheme,
}

/// Opens a resource outside the app, e.g. in a new browser tab. Nothing comes
/// back from it.
pub trait ExternalLauncher {
    fn open(&mut self, url: &str);
}

/// Only records the request in the log.
pub struct LogLauncher;

impl ExternalLauncher for LogLauncher {
    fn open(&mut self, url: &str) {
        info!("open external resource: {}", url);
    }
}

pub enum View {
    Home,
    Tracking(Box<TrackingSession>),
}

impl View {
    pub fn is_home(&self) -> bool {
        matches!(self, View::Home)
    }

    pub fn tracking(&self) -> Option<&TrackingSession> {
        match self {
            View::Home => None,
            View::Tracking(session) => Some(&**session),
        }
    }
}

pub type BoxedGeolocation = Box<dyn GeolocationSource + Send>;

pub struct App {
    config: AppConfig,
    theme: Theme,
    view: View,
    geolocation: BoxedGeolocation,
    launcher: Box<dyn ExternalLauncher + Send>,
    map_widget: Option<Box<dyn MapWidget + Send>>,
    router_tx: Sender<RouterNotice>,
    router_rx: Receiver<RouterNotice>,
}

impl App {
    pub fn new(config: AppConfig, geolocation: BoxedGeolocation) -> Self {
        let (router_tx, router_rx) = mpsc::channel();
        App {
            config,
            theme: Theme::default(),
            view: View::Home,
            geolocation,
            launcher: Box::new(LogLauncher),
            map_widget: None,
            router_tx,
            router_rx,
        }
    }

    pub fn with_launcher(mut self, launcher: Box<dyn ExternalLauncher + Send>) -> Self {
        self.launcher = launcher;
        self
    }

    pub fn with_map_widget(mut self, map_widget: Box<dyn MapWidget + Send>) -> Self {
        self.map_widget = Some(map_widget);
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn dispatch(&mut self, action: UiAction) {
        debug!("ui action: {:?}", action);
        match action {
            UiAction::ToggleTheme => {
                self.theme = self.theme.toggled();
                info!("theme set to {}", self.theme);
            }
            UiAction::FindYourPath if self.view.is_home() => {
                let options = PositionOptions::from(&self.config.geolocation);
                let session = TrackingSession::start(
                    self.geolocation.as_mut(),
                    &options,
                    self.router_tx.clone(),
                );
                self.view = View::Tracking(Box::new(session));
            }
            UiAction::ScanForHumans if self.view.is_home() => {
                self.launcher.open(&self.config.scan_for_humans_url);
            }
            UiAction::StopTracking | UiAction::ExitTracking => match &mut self.view {
                View::Tracking(session) => {
                    if action == UiAction::StopTracking {
                        session.stop();
                    } else {
                        // Also honored while a notice is shown, so the user
                        // can get back home.
                        session.exit();
                    }
                }
                View::Home => debug!("{:?} does nothing on the home screen", action),
            },
            _ => debug!("{:?} does nothing on the tracking screen", action),
        }
        self.handle_router_notices();
        self.refresh_map();
    }

    /// Applies queued fixes from the geolocation watch in delivery order.
    pub fn pump(&mut self) -> Vec<SampleResult> {
        let results = match &mut self.view {
            View::Tracking(session) => session.pump(),
            View::Home => Vec::new(),
        };
        self.handle_router_notices();
        if !results.is_empty() {
            self.refresh_map();
        }
        results
    }

    /// For frontends that receive fixes themselves instead of through a watch.
    pub fn on_position_update(&mut self, sample: PositionSample) -> Option<SampleResult> {
        let result = match &mut self.view {
            View::Tracking(session) => session.on_position_update(sample),
            View::Home => None,
        };
        if result.is_some() {
            self.refresh_map();
        }
        result
    }

    fn handle_router_notices(&mut self) {
        while let Ok(notice) = self.router_rx.try_recv() {
            match notice {
                RouterNotice::ExitTracking { session_id } => {
                    let is_current =
                        self.view.tracking().map(|session| session.id()) == Some(session_id);
                    if is_current {
                        info!("back to home from session {}", session_id);
                        self.view = View::Home;
                        if let Some(map_widget) = self.map_widget.as_mut() {
                            map_widget.clear();
                        }
                    } else {
                        debug!("stale exit notice for session {}", session_id);
                    }
                }
            }
        }
    }

    pub fn map_view(&self) -> Option<MapView> {
        self.view
            .tracking()
            .and_then(|session| session.machine())
            .map(|machine| MapView::build(machine, &self.config.map))
    }

    fn refresh_map(&mut self) {
        if let Some(map_view) = self.map_view() {
            if let Some(map_widget) = self.map_widget.as_mut() {
                map_widget.render(&map_view);
            }
        }
    }

    pub fn render(&self) -> Screen {
        Screen::build(self)
    }
}
