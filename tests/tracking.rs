pub mod test_utils;

use radar_rescuer_core::geolocation::{FeedGeolocation, GeolocationNotice, PositionOptions};
use radar_rescuer_core::tracking::{
    RouterNotice, SampleResult, SessionState, TrackingMachine, TrackingSession, TrackingState,
};
use std::sync::mpsc;
use test_utils::sample;

#[test]
fn records_every_sample_while_active() {
    for n in [0, 1, 2, 17, 500] {
        let mut machine = TrackingMachine::new();
        let samples = test_utils::random_samples(n);
        for s in &samples {
            assert_eq!(machine.on_position_update(*s), SampleResult::Recorded);
        }
        assert_eq!(machine.path().len(), n);
        assert_eq!(machine.path().as_slice(), &samples[..]);
    }
}

#[test]
fn nothing_recorded_after_stop() {
    let mut machine = TrackingMachine::new();
    for s in test_utils::random_samples(10) {
        machine.on_position_update(s);
    }
    assert!(machine.stop());
    assert_eq!(machine.state(), TrackingState::Stopped);
    for s in test_utils::random_samples(100) {
        assert_eq!(machine.on_position_update(s), SampleResult::Discarded);
        assert_eq!(machine.path().len(), 10);
    }
}

#[test]
fn stop_is_idempotent() {
    let mut once = TrackingMachine::new();
    let mut twice = TrackingMachine::new();
    once.on_position_update(sample(12.90, 77.58));
    twice.on_position_update(sample(12.90, 77.58));

    assert!(once.stop());
    assert!(twice.stop());
    assert!(!twice.stop());

    once.on_position_update(sample(12.95, 77.60));
    twice.on_position_update(sample(12.95, 77.60));
    assert_eq!(once.state(), twice.state());
    assert_eq!(once.path(), twice.path());
    assert_eq!(once.current_position(), twice.current_position());
}

#[test]
fn marker_follows_live_position_after_stop() {
    let mut machine = TrackingMachine::new();
    assert!(machine.current_position().is_none());
    machine.on_position_update(sample(12.90, 77.58));
    machine.stop();
    machine.on_position_update(sample(12.95, 77.60));
    assert_eq!(machine.current_position(), Some(&sample(12.95, 77.60)));
    assert_eq!(machine.path().as_slice(), &[sample(12.90, 77.58)]);
}

#[test]
fn invalid_samples_are_not_updates() {
    let mut machine = TrackingMachine::new();
    machine.on_position_update(sample(12.90, 77.58));
    assert_eq!(
        machine.on_position_update(sample(f64::NAN, 77.58)),
        SampleResult::Invalid
    );
    assert_eq!(
        machine.on_position_update(sample(95.0, 77.58)),
        SampleResult::Invalid
    );
    assert_eq!(machine.path().len(), 1);
    assert_eq!(machine.current_position(), Some(&sample(12.90, 77.58)));
}

#[test]
fn polyline_needs_two_points() {
    let mut machine = TrackingMachine::new();
    assert!(machine.path().polyline().is_none());
    machine.on_position_update(sample(12.90, 77.58));
    assert!(machine.path().polyline().is_none());
    machine.on_position_update(sample(12.91, 77.59));
    assert_eq!(
        machine.path().polyline().unwrap(),
        vec![[12.90, 77.58], [12.91, 77.59]]
    );
}

#[test]
fn sample_result_ints() {
    assert_eq!(SampleResult::Recorded.to_int(), 0);
    assert_eq!(SampleResult::Discarded.to_int(), -1);
    assert_eq!(SampleResult::Invalid.to_int(), -2);
}

#[test]
fn session_pumps_watch_in_order() {
    let mut geolocation = FeedGeolocation::new();
    let (tx, _rx) = mpsc::channel();
    let mut session = TrackingSession::start(&mut geolocation, &PositionOptions::default(), tx);

    let walk = test_utils::load_walk();
    for s in &walk {
        assert_eq!(geolocation.emit(*s), 1);
    }
    let results = session.pump();
    assert_eq!(results.len(), walk.len());
    assert!(results.iter().all(|r| *r == SampleResult::Recorded));
    assert_eq!(session.machine().unwrap().path().as_slice(), &walk[..]);

    // already drained
    assert!(session.pump().is_empty());
}

#[test]
fn session_exit_notifies_once_per_call_and_closes_watch() {
    let mut geolocation = FeedGeolocation::new();
    let (tx, rx) = mpsc::channel();
    let mut session = TrackingSession::start(&mut geolocation, &PositionOptions::default(), tx);
    assert_eq!(geolocation.live_watch_count(), 1);

    session.exit();
    assert_eq!(
        rx.try_recv().unwrap(),
        RouterNotice::ExitTracking {
            session_id: session.id()
        }
    );
    assert!(rx.try_recv().is_err());
    assert_eq!(geolocation.live_watch_count(), 0);
    assert_eq!(geolocation.emit(sample(12.90, 77.58)), 0);
    assert!(session.pump().is_empty());

    session.exit();
    assert!(rx.try_recv().is_ok());
    assert!(rx.try_recv().is_err());
}

#[test]
fn session_with_notice_never_watches() {
    let mut geolocation = FeedGeolocation::with_availability(test_utils::disabled());
    let (tx, _rx) = mpsc::channel();
    let mut session = TrackingSession::start(&mut geolocation, &PositionOptions::default(), tx);

    assert_eq!(session.notice(), Some(GeolocationNotice::Disabled));
    assert!(matches!(
        session.state(),
        SessionState::Notice(GeolocationNotice::Disabled)
    ));
    assert!(session.machine().is_none());
    assert_eq!(geolocation.live_watch_count(), 0);
    assert!(!session.stop());
    assert!(session.on_position_update(sample(12.90, 77.58)).is_none());
}
