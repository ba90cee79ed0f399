use std::fmt;

use itertools::Itertools;

use crate::app::{App, UiAction, View};
use crate::geolocation::GeolocationNotice;
use crate::map_view::MapView;
use crate::position::PositionSample;
use crate::tracking::SessionState;

#[derive(Clone, Debug, PartialEq)]
pub struct Header {
    pub title: String,
    pub tagline: String,
    pub theme_button: &'static str,
    pub data_theme: &'static str,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Body {
    Home {
        heading: String,
        buttons: Vec<UiAction>,
    },
    Notice(GeolocationNotice),
    Tracking {
        current: Option<PositionSample>,
        buttons: Vec<UiAction>,
        map: MapView,
        recorded: Vec<PositionSample>,
    },
}

/// A snapshot of the whole page, rebuilt after every event.
#[derive(Clone, Debug, PartialEq)]
pub struct Screen {
    pub header: Header,
    pub body: Body,
    pub footer: String,
}

impl Screen {
    pub fn build(app: &App) -> Self {
        let branding = &app.config().branding;
        let theme = app.theme();
        let header = Header {
            title: branding.title.clone(),
            tagline: branding.tagline.clone(),
            theme_button: theme.toggle_label(),
            data_theme: theme.data_theme(),
        };

        let body = match app.view() {
            View::Home => Body::Home {
                heading: format!("Welcome to {}", branding.title),
                buttons: vec![UiAction::FindYourPath, UiAction::ScanForHumans],
            },
            View::Tracking(session) => match session.state() {
                SessionState::Notice(notice) => Body::Notice(notice),
                SessionState::Live(machine) => Body::Tracking {
                    current: machine.current_position().copied(),
                    buttons: vec![UiAction::StopTracking, UiAction::ExitTracking],
                    map: MapView::build(machine, &app.config().map),
                    recorded: machine.path().as_slice().to_vec(),
                },
            },
        };

        Screen {
            header,
            body,
            footer: branding.footer.clone(),
        }
    }

    pub fn buttons(&self) -> Vec<UiAction> {
        let mut buttons = vec![UiAction::ToggleTheme];
        match &self.body {
            Body::Home { buttons: body, .. } | Body::Tracking { buttons: body, .. } => {
                buttons.extend(body.iter().copied())
            }
            Body::Notice(_) => (),
        }
        buttons
    }
}

fn button_row(buttons: &[UiAction]) -> String {
    buttons.iter().map(|b| format!("[{b}]")).join(" ")
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "== {} ==  ({})", self.header.title, self.header.data_theme)?;
        writeln!(f, "{}", self.header.tagline)?;
        writeln!(f, "[{}]", self.header.theme_button)?;
        writeln!(f)?;
        match &self.body {
            Body::Home { heading, buttons } => {
                writeln!(f, "{heading}")?;
                writeln!(f, "{}", button_row(buttons))?;
            }
            Body::Notice(notice) => writeln!(f, "{notice}")?,
            Body::Tracking {
                current,
                buttons,
                map,
                recorded,
            } => {
                writeln!(f, "Current Location")?;
                if let Some(current) = current {
                    writeln!(f, "Latitude: {}", current.latitude)?;
                    writeln!(f, "Longitude: {}", current.longitude)?;
                }
                writeln!(f, "{}", button_row(buttons))?;
                writeln!(
                    f,
                    "Map: center {:?} zoom {}, marker {}, line {}",
                    map.center,
                    map.zoom,
                    if map.marker.is_some() { "shown" } else { "none" },
                    map.polyline
                        .as_ref()
                        .map(|p| format!("through {} points", p.positions.len()))
                        .unwrap_or_else(|| "none".to_string())
                )?;
                writeln!(f, "Recorded Coordinates")?;
                for point in recorded {
                    writeln!(
                        f,
                        "- Latitude: {}, Longitude: {}",
                        point.latitude, point.longitude
                    )?;
                }
            }
        }
        writeln!(f)?;
        write!(f, "{}", self.footer)
    }
}
