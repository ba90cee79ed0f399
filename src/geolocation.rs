use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use strum_macros::Display;
use uuid::Uuid;

use crate::config::GeolocationConfig;
use crate::position::PositionSample;

/// What we ask of the platform when opening a watch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PositionOptions {
    pub enable_high_accuracy: bool,
    pub watch_position: bool,
    /// How long the platform waits for the user's permission decision
    /// before reporting geolocation as not enabled.
    pub user_decision_timeout: Duration,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self::from(&GeolocationConfig::default())
    }
}

impl From<&GeolocationConfig> for PositionOptions {
    fn from(config: &GeolocationConfig) -> Self {
        PositionOptions {
            enable_high_accuracy: config.enable_high_accuracy,
            watch_position: config.watch_position,
            user_decision_timeout: Duration::from_millis(config.user_decision_timeout_ms),
        }
    }
}

/// The two reasons a tracking session cannot show a map. These are displayed
/// to the user as-is.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Display)]
pub enum GeolocationNotice {
    #[strum(to_string = "Your browser does not support Geolocation.")]
    Unavailable,
    #[strum(to_string = "Geolocation is not enabled.")]
    Disabled,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Availability {
    pub is_geolocation_available: bool,
    pub is_geolocation_enabled: bool,
}

impl Availability {
    pub fn notice(&self) -> Option<GeolocationNotice> {
        if !self.is_geolocation_available {
            Some(GeolocationNotice::Unavailable)
        } else if !self.is_geolocation_enabled {
            Some(GeolocationNotice::Disabled)
        } else {
            None
        }
    }
}

pub trait GeolocationSource {
    fn availability(&self) -> Availability;

    /// Opens a continuous subscription. Fixes keep arriving until the returned
    /// [`Watch`] is cancelled or dropped.
    fn watch(&mut self, options: &PositionOptions) -> Watch;
}

/// A live geolocation subscription.
///
/// Fixes are queued by the source and only applied when the owner drains
/// them, so they are handled one at a time on the owner's thread.
pub struct Watch {
    id: Uuid,
    cancelled: Arc<AtomicBool>,
    receiver: Receiver<PositionSample>,
}

impl Watch {
    /// Creates a watch and the sending half a source keeps for it.
    pub fn new() -> (Watch, WatchSender) {
        let id = Uuid::new_v4();
        let cancelled = Arc::new(AtomicBool::new(false));
        let (sender, receiver) = mpsc::channel();
        (
            Watch {
                id,
                cancelled: cancelled.clone(),
                receiver,
            },
            WatchSender {
                id,
                cancelled,
                sender,
            },
        )
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn cancel(&self) {
        if !self.cancelled.swap(true, Ordering::SeqCst) {
            debug!("geolocation watch {} cancelled", self.id);
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Takes every fix queued so far, in delivery order. Nothing is returned
    /// once the watch is cancelled, even if fixes were already queued.
    pub fn drain(&self) -> Vec<PositionSample> {
        if self.is_cancelled() {
            return Vec::new();
        }
        self.receiver.try_iter().collect()
    }
}

impl Drop for Watch {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// The source's end of a [`Watch`].
pub struct WatchSender {
    id: Uuid,
    cancelled: Arc<AtomicBool>,
    sender: Sender<PositionSample>,
}

impl WatchSender {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Returns false when the watch is gone; the sender should be dropped then.
    pub fn send(&self, sample: PositionSample) -> bool {
        !self.is_cancelled() && self.sender.send(sample).is_ok()
    }
}

struct FeedState {
    availability: Availability,
    watchers: Vec<WatchSender>,
    last_options: Option<PositionOptions>,
}

/// A geolocation source whose fixes are pushed in from outside: a platform
/// bridge, a GPX replay or a test. Clones share the same state, so one clone
/// can live in the app while another feeds it from a different thread.
#[derive(Clone)]
pub struct FeedGeolocation {
    state: Arc<Mutex<FeedState>>,
}

impl FeedGeolocation {
    pub fn new() -> Self {
        Self::with_availability(Availability {
            is_geolocation_available: true,
            is_geolocation_enabled: true,
        })
    }

    pub fn with_availability(availability: Availability) -> Self {
        FeedGeolocation {
            state: Arc::new(Mutex::new(FeedState {
                availability,
                watchers: Vec::new(),
                last_options: None,
            })),
        }
    }

    pub fn set_availability(&self, availability: Availability) {
        let mut state = self.state.lock().unwrap();
        if state.availability != availability {
            info!("geolocation availability changed: {:?}", availability);
        }
        state.availability = availability;
    }

    /// Delivers a fix to every live watch and returns how many received it.
    pub fn emit(&self, sample: PositionSample) -> usize {
        let mut state = self.state.lock().unwrap();
        state.watchers.retain(|watcher| watcher.send(sample));
        state.watchers.len()
    }

    pub fn live_watch_count(&self) -> usize {
        let mut state = self.state.lock().unwrap();
        state.watchers.retain(|watcher| !watcher.is_cancelled());
        state.watchers.len()
    }

    pub fn last_options(&self) -> Option<PositionOptions> {
        self.state.lock().unwrap().last_options.clone()
    }
}

impl Default for FeedGeolocation {
    fn default() -> Self {
        Self::new()
    }
}

impl GeolocationSource for FeedGeolocation {
    fn availability(&self) -> Availability {
        self.state.lock().unwrap().availability
    }

    fn watch(&mut self, options: &PositionOptions) -> Watch {
        let (watch, sender) = Watch::new();
        let mut state = self.state.lock().unwrap();
        debug!("geolocation watch {} opened with {:?}", sender.id(), options);
        state.last_options = Some(options.clone());
        state.watchers.push(sender);
        watch
    }
}

#[cfg(test)]
mod tests {
    use crate::geolocation::{Availability, GeolocationNotice};

    #[test]
    fn notice_text() {
        assert_eq!(
            GeolocationNotice::Unavailable.to_string(),
            "Your browser does not support Geolocation."
        );
        assert_eq!(
            GeolocationNotice::Disabled.to_string(),
            "Geolocation is not enabled."
        );
    }

    #[test]
    fn unavailable_wins_over_disabled() {
        let availability = Availability {
            is_geolocation_available: false,
            is_geolocation_enabled: false,
        };
        assert_eq!(availability.notice(), Some(GeolocationNotice::Unavailable));
        let availability = Availability {
            is_geolocation_available: true,
            is_geolocation_enabled: false,
        };
        assert_eq!(availability.notice(), Some(GeolocationNotice::Disabled));
        let availability = Availability {
            is_geolocation_available: true,
            is_geolocation_enabled: true,
        };
        assert_eq!(availability.notice(), None);
    }
}
