use std::sync::mpsc::Sender;

use strum_macros::Display;
use uuid::Uuid;

use crate::geolocation::{GeolocationNotice, GeolocationSource, PositionOptions, Watch};
use crate::path::Path;
use crate::position::PositionSample;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(i8)]
pub enum SampleResult {
    Recorded = 0,
    // negative values are for samples that did not make it into the path.
    Discarded = -1,
    Invalid = -2,
}

impl SampleResult {
    pub fn to_int(&self) -> i8 {
        *self as i8
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Display)]
pub enum TrackingState {
    Active,
    Stopped,
}

/// Records fixes into a [`Path`] until stopped. The live position keeps
/// following new fixes after that; only recording ends.
pub struct TrackingMachine {
    path: Path,
    state: TrackingState,
    current: Option<PositionSample>,
}

impl TrackingMachine {
    pub fn new() -> Self {
        TrackingMachine {
            path: Path::new(),
            state: TrackingState::Active,
            current: None,
        }
    }

    pub fn on_position_update(&mut self, sample: PositionSample) -> SampleResult {
        if !sample.is_valid() {
            warn!("ignoring invalid position {:?}", sample);
            return SampleResult::Invalid;
        }
        self.current = Some(sample);
        match self.state {
            TrackingState::Active => {
                self.path.push(sample);
                SampleResult::Recorded
            }
            TrackingState::Stopped => {
                debug!("tracking stopped, not recording {:?}", sample);
                SampleResult::Discarded
            }
        }
    }

    /// Returns whether this call changed anything.
    pub fn stop(&mut self) -> bool {
        match self.state {
            TrackingState::Active => {
                self.state = TrackingState::Stopped;
                info!("tracking stopped with {} recorded points", self.path.len());
                true
            }
            TrackingState::Stopped => false,
        }
    }

    pub fn state(&self) -> TrackingState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == TrackingState::Active
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn current_position(&self) -> Option<&PositionSample> {
        self.current.as_ref()
    }
}

impl Default for TrackingMachine {
    fn default() -> Self {
        Self::new()
    }
}

/// Sent to the view router when a session asks to be closed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RouterNotice {
    ExitTracking { session_id: Uuid },
}

/// What the tracking screen should show for a session.
pub enum SessionState<'a> {
    Live(&'a TrackingMachine),
    Notice(GeolocationNotice),
}

enum SessionStatus {
    Live {
        machine: TrackingMachine,
        watch: Watch,
    },
    Notice(GeolocationNotice),
}

/// One visit of the tracking screen, from "Find your path" to "Exit Tracking".
pub struct TrackingSession {
    id: Uuid,
    notifier: Sender<RouterNotice>,
    status: SessionStatus,
}

impl TrackingSession {
    /// Checks the source and opens a watch on it. When geolocation is missing
    /// or not enabled the session only carries the notice and never watches.
    pub fn start(
        source: &mut dyn GeolocationSource,
        options: &PositionOptions,
        notifier: Sender<RouterNotice>,
    ) -> Self {
        let id = Uuid::new_v4();
        let status = match source.availability().notice() {
            Some(notice) => {
                warn!("tracking session {} cannot start: {}", id, notice);
                SessionStatus::Notice(notice)
            }
            None => {
                let watch = source.watch(options);
                info!("tracking session {} started", id);
                SessionStatus::Live {
                    machine: TrackingMachine::new(),
                    watch,
                }
            }
        };
        TrackingSession {
            id,
            notifier,
            status,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> SessionState<'_> {
        match &self.status {
            SessionStatus::Live { machine, .. } => SessionState::Live(machine),
            SessionStatus::Notice(notice) => SessionState::Notice(*notice),
        }
    }

    pub fn machine(&self) -> Option<&TrackingMachine> {
        match &self.status {
            SessionStatus::Live { machine, .. } => Some(machine),
            SessionStatus::Notice(_) => None,
        }
    }

    pub fn notice(&self) -> Option<GeolocationNotice> {
        match &self.status {
            SessionStatus::Live { .. } => None,
            SessionStatus::Notice(notice) => Some(*notice),
        }
    }

    /// Applies every fix the watch has queued, one after the other.
    pub fn pump(&mut self) -> Vec<SampleResult> {
        match &mut self.status {
            SessionStatus::Live { machine, watch } => watch
                .drain()
                .into_iter()
                .map(|sample| machine.on_position_update(sample))
                .collect(),
            SessionStatus::Notice(_) => Vec::new(),
        }
    }

    pub fn on_position_update(&mut self, sample: PositionSample) -> Option<SampleResult> {
        match &mut self.status {
            SessionStatus::Live { machine, .. } => Some(machine.on_position_update(sample)),
            SessionStatus::Notice(_) => None,
        }
    }

    pub fn stop(&mut self) -> bool {
        match &mut self.status {
            SessionStatus::Live { machine, .. } => machine.stop(),
            SessionStatus::Notice(_) => false,
        }
    }

    /// Closes the watch and tells the router, once per call.
    pub fn exit(&mut self) {
        if let SessionStatus::Live { watch, .. } = &self.status {
            watch.cancel();
        }
        info!("tracking session {} exiting", self.id);
        if self
            .notifier
            .send(RouterNotice::ExitTracking {
                session_id: self.id,
            })
            .is_err()
        {
            warn!("router is gone, exit of session {} not delivered", self.id);
        }
    }
}
