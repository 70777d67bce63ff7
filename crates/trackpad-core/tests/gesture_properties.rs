//! Integration tests for the gesture recognizer.
//!
//! These tests drive whole contacts through the public API and check the
//! behavioural guarantees of each gesture: tap versus drag, scroll sign,
//! three-finger axis exclusivity, the zoom cooldown, and the interaction
//! between the recognizer and the wire codec.

use std::time::Duration;

use trackpad_core::{
    decode_event, encode_event, GestureConfig, GestureRecognizer, MouseButton, SemanticEvent,
    TouchPoint, TouchSample, TouchSurface, VerticalDirection,
};

fn finger(ms: u64, id: u64, x: f64, y: f64) -> TouchSample {
    TouchSample::at_millis(ms, vec![TouchPoint::new(id, x, y)])
}

fn fingers(ms: u64, points: &[(f64, f64)]) -> TouchSample {
    TouchSample::at_millis(
        ms,
        points
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| TouchPoint::new(i as u64, x, y))
            .collect(),
    )
}

/// Three fingers in a row whose centroid is `(cx, cy)`.
fn three_at(ms: u64, cx: f64, cy: f64) -> TouchSample {
    fingers(ms, &[(cx - 25.0, cy), (cx, cy), (cx + 25.0, cy)])
}

fn lifted(ms: u64) -> TouchSample {
    TouchSample::lifted(Duration::from_millis(ms))
}

fn run(recognizer: &mut GestureRecognizer, samples: &[TouchSample]) -> Vec<SemanticEvent> {
    samples
        .iter()
        .flat_map(|sample| recognizer.process(sample))
        .collect()
}

fn clicks(events: &[SemanticEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, SemanticEvent::Click { .. }))
        .count()
}

// ── Tap vs drag ───────────────────────────────────────────────────────────────

#[test]
fn test_short_still_contact_yields_exactly_one_left_click() {
    let mut recognizer = GestureRecognizer::default();

    let events = run(
        &mut recognizer,
        &[
            finger(0, 7, 50.0, 50.0),
            finger(40, 7, 50.0, 50.0),
            finger(80, 7, 50.0, 50.0),
            lifted(120),
        ],
    );

    assert_eq!(
        events,
        vec![SemanticEvent::Click {
            button: MouseButton::Left
        }]
    );
}

#[test]
fn test_short_contact_with_any_motion_yields_no_click() {
    let mut recognizer = GestureRecognizer::default();

    let events = run(
        &mut recognizer,
        &[finger(0, 7, 50.0, 50.0), finger(10, 7, 50.5, 50.0), lifted(20)],
    );

    assert_eq!(clicks(&events), 0);
    assert_eq!(events, vec![SemanticEvent::Move { dx: 1.75, dy: 0.0 }]);
}

#[test]
fn test_long_still_contact_yields_no_click() {
    let mut recognizer = GestureRecognizer::default();

    let events = run(
        &mut recognizer,
        &[finger(0, 7, 50.0, 50.0), finger(100, 7, 50.0, 50.0), lifted(400)],
    );

    assert!(events.is_empty());
}

#[test]
fn test_tap_threshold_follows_config() {
    let config = GestureConfig {
        tap_threshold_ms: 500,
        ..GestureConfig::default()
    };
    let mut recognizer = GestureRecognizer::new(config).unwrap();

    let events = run(&mut recognizer, &[finger(0, 1, 0.0, 0.0), lifted(400)]);

    assert_eq!(clicks(&events), 1);
}

#[test]
fn test_consecutive_taps_each_click() {
    let mut recognizer = GestureRecognizer::default();

    let events = run(
        &mut recognizer,
        &[
            finger(0, 1, 10.0, 10.0),
            lifted(50),
            finger(200, 2, 10.0, 10.0),
            lifted(260),
        ],
    );

    assert_eq!(clicks(&events), 2);
}

// ── Two-finger scroll ─────────────────────────────────────────────────────────

#[test]
fn test_two_finger_upward_motion_scrolls_positive() {
    let mut recognizer = GestureRecognizer::default();

    let events = run(
        &mut recognizer,
        &[
            fingers(0, &[(0.0, 100.0), (40.0, 100.0)]),
            fingers(16, &[(0.0, 80.0), (40.0, 80.0)]),
        ],
    );

    assert_eq!(events.len(), 1);
    let SemanticEvent::Scroll { dx, dy } = events[0] else {
        panic!("expected a scroll event, got {:?}", events[0]);
    };
    assert_eq!(dx, 0.0);
    assert!(dy > 0.0);
}

#[test]
fn test_two_finger_horizontal_motion_keeps_sign() {
    let mut recognizer = GestureRecognizer::default();

    let events = run(
        &mut recognizer,
        &[
            fingers(0, &[(0.0, 100.0), (40.0, 100.0)]),
            fingers(16, &[(30.0, 100.0), (70.0, 100.0)]),
        ],
    );

    let SemanticEvent::Scroll { dx, dy } = events[0] else {
        panic!("expected a scroll event, got {:?}", events[0]);
    };
    assert!((dx - 3.0).abs() < 1e-9);
    assert_eq!(dy, 0.0);
}

#[test]
fn test_two_finger_first_sample_emits_nothing() {
    let mut recognizer = GestureRecognizer::default();

    let events = run(
        &mut recognizer,
        &[
            finger(0, 0, 0.0, 100.0),
            fingers(16, &[(0.0, 100.0), (40.0, 300.0)]),
        ],
    );

    assert!(events.is_empty());
}

// ── Three-finger swipes ───────────────────────────────────────────────────────

#[test]
fn test_three_finger_dominant_horizontal_motion_only_switches_window() {
    let mut recognizer = GestureRecognizer::default();

    let events = run(
        &mut recognizer,
        &[three_at(0, 0.0, 0.0), three_at(16, 60.0, 10.0)],
    );

    assert_eq!(events, vec![SemanticEvent::NextWindow]);
}

#[test]
fn test_three_finger_dominant_vertical_motion_only_fires_vertical_gesture() {
    let mut recognizer = GestureRecognizer::default();

    let events = run(
        &mut recognizer,
        &[three_at(0, 0.0, 0.0), three_at(16, 10.0, -60.0)],
    );

    assert_eq!(
        events,
        vec![SemanticEvent::VerticalGesture {
            direction: VerticalDirection::Up
        }]
    );
}

#[test]
fn test_three_finger_motion_below_threshold_emits_nothing() {
    let mut recognizer = GestureRecognizer::default();

    let events = run(
        &mut recognizer,
        &[
            three_at(0, 0.0, 0.0),
            three_at(16, 30.0, 0.0),
            three_at(32, 50.0, 0.0),
        ],
    );

    assert!(events.is_empty());
}

#[test]
fn test_long_three_finger_swipe_fires_once_per_threshold_advance() {
    // Re-anchoring on fire means a sustained swipe switches window repeatedly.
    let mut recognizer = GestureRecognizer::default();
    let samples: Vec<TouchSample> = (0..=20)
        .map(|step| three_at(step * 16, step as f64 * 10.0, 0.0))
        .collect();

    let events = run(&mut recognizer, &samples);

    // Anchor at 0, fires at 60, 120, 180: each needs > 50 px from the last anchor.
    assert_eq!(events, vec![SemanticEvent::NextWindow; 3]);
}

#[test]
fn test_three_finger_anchor_resets_after_finger_count_change() {
    let mut recognizer = GestureRecognizer::default();

    let events = run(
        &mut recognizer,
        &[
            three_at(0, 0.0, 0.0),
            three_at(16, 40.0, 0.0),
            fingers(32, &[(15.0, 0.0), (40.0, 0.0)]),
            three_at(48, 80.0, 0.0),
            three_at(64, 100.0, 0.0),
        ],
    );

    // Without the reset, 100 would be 100 px past the first anchor.
    assert!(!events.contains(&SemanticEvent::NextWindow));
}

// ── Rails ─────────────────────────────────────────────────────────────────────

#[test]
fn test_zoom_crossings_inside_cooldown_yield_one_zoom() {
    let mut recognizer = GestureRecognizer::default();
    let zoom = TouchSurface::ZoomRail;

    let mut events = Vec::new();
    events.extend(recognizer.process_surface(zoom, &finger(0, 1, 0.0, 0.0)));
    events.extend(recognizer.process_surface(zoom, &finger(100, 1, 110.0, 0.0)));
    events.extend(recognizer.process_surface(zoom, &finger(200, 1, 220.0, 0.0)));

    assert_eq!(events, vec![SemanticEvent::Zoom { factor: 1.1 }]);
}

#[test]
fn test_zoom_crossings_after_cooldown_yield_two_zooms() {
    let mut recognizer = GestureRecognizer::default();
    let zoom = TouchSurface::ZoomRail;

    let mut events = Vec::new();
    events.extend(recognizer.process_surface(zoom, &finger(0, 1, 300.0, 0.0)));
    events.extend(recognizer.process_surface(zoom, &finger(100, 1, 190.0, 0.0)));
    events.extend(recognizer.process_surface(zoom, &finger(400, 1, 80.0, 0.0)));

    assert_eq!(events, vec![SemanticEvent::Zoom { factor: 0.9 }; 2]);
}

#[test]
fn test_rails_and_trackpad_are_independent() {
    let mut recognizer = GestureRecognizer::default();

    // Three fingers anchor on the trackpad while the scroll rail is dragged.
    recognizer.process(&three_at(0, 0.0, 0.0));
    recognizer.process_surface(TouchSurface::ScrollRail, &finger(5, 9, 0.0, 0.0));
    let rail = recognizer.process_surface(TouchSurface::ScrollRail, &finger(10, 9, 0.0, -4.0));
    let swipe = recognizer.process(&three_at(16, 60.0, 0.0));

    assert_eq!(rail, vec![SemanticEvent::Scroll { dx: 0.0, dy: -4.0 }]);
    assert_eq!(swipe, vec![SemanticEvent::NextWindow]);
}

// ── Wire format ───────────────────────────────────────────────────────────────

#[test]
fn test_every_recognized_event_survives_the_wire() {
    let mut recognizer = GestureRecognizer::default();
    let mut events = run(
        &mut recognizer,
        &[
            finger(0, 1, 0.0, 0.0),
            finger(16, 1, 3.0, 4.0),
            lifted(32),
            finger(100, 1, 0.0, 0.0),
            lifted(120),
            fingers(200, &[(0.0, 0.0), (10.0, 0.0)]),
            fingers(216, &[(0.0, 9.0), (10.0, 9.0)]),
            lifted(232),
            three_at(300, 0.0, 0.0),
            three_at(316, 0.0, 80.0),
            three_at(332, 70.0, 80.0),
            lifted(348),
        ],
    );
    events.extend(recognizer.process_surface(TouchSurface::ZoomRail, &finger(400, 1, 0.0, 0.0)));
    events.extend(recognizer.process_surface(TouchSurface::ZoomRail, &finger(416, 1, 150.0, 0.0)));

    assert_eq!(events.len(), 6);
    for event in events {
        let text = encode_event(&event).unwrap();
        assert_eq!(decode_event(&text).unwrap(), event, "wire text: {text}");
    }
}
