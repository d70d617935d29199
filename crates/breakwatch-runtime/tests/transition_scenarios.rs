#![forbid(unsafe_code)]

//! End-to-end transition scenarios against a host-driven viewport.
//!
//! Run:
//!   cargo test -p breakwatch-runtime --test transition_scenarios

use std::cell::RefCell;
use std::rc::Rc;

use breakwatch_core::{BreakpointError, ClassMarker, PointSet, TrackerOptions, Viewport};
use breakwatch_runtime::{BreakpointTracker, TransitionEvent, TransitionKind};

// ============================================================================
// Helpers
// ============================================================================

type Log = Rc<RefCell<Vec<String>>>;

fn two_point_tracker(width: f64) -> (Viewport, BreakpointTracker) {
    let viewport = Viewport::new(width);
    let tracker = BreakpointTracker::new(
        viewport.clone(),
        PointSet::new().with("phone", 0).with("tablet", 600),
        TrackerOptions::default().remove_default_breakpoints(true),
    )
    .unwrap();
    (viewport, tracker)
}

/// Register a listener on every channel that appends the notification name.
fn record_all(tracker: &BreakpointTracker, names: &[&str]) -> Log {
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    for name in names {
        for kind in TransitionKind::ALL {
            let log = Rc::clone(&log);
            tracker
                .listen(name, kind, move |event: &TransitionEvent| {
                    log.borrow_mut().push(event.event_name());
                })
                .unwrap();
        }
    }
    log
}

#[derive(Clone, Default)]
struct RecordingMarker(Rc<RefCell<Vec<String>>>);

impl ClassMarker for RecordingMarker {
    fn apply(&mut self, added: Option<&str>, removed: Option<&str>) {
        let mut log = self.0.borrow_mut();
        if let Some(class) = added {
            log.push(format!("+{class}"));
        }
        if let Some(class) = removed {
            log.push(format!("-{class}"));
        }
    }
}

// ============================================================================
// Transitions
// ============================================================================

#[test]
fn growing_past_a_threshold() {
    let (vp, tracker) = two_point_tracker(500.0);
    let log = record_all(&tracker, &["phone", "tablet"]);

    vp.set_width(700.0);

    assert_eq!(*log.borrow(), vec!["tabletenter", "phoneleave", "tabletmin"]);
    assert_eq!(tracker.active().breakpoint().name(), "tablet");
    assert_eq!(tracker.active().observed_width(), 700.0);
}

#[test]
fn shrinking_past_a_threshold() {
    let (vp, tracker) = two_point_tracker(700.0);
    let log = record_all(&tracker, &["phone", "tablet"]);

    vp.set_width(500.0);

    assert_eq!(*log.borrow(), vec!["phoneenter", "tabletleave", "tabletmax"]);
    assert_eq!(tracker.active().breakpoint().name(), "phone");
}

#[test]
fn moving_within_a_breakpoint_raises_nothing() {
    let (vp, tracker) = two_point_tracker(700.0);
    let log = record_all(&tracker, &["phone", "tablet"]);

    vp.set_width(650.0);
    vp.set_width(999.0);

    assert!(log.borrow().is_empty());
    assert_eq!(tracker.transition_count(), 0);
}

#[test]
fn repeated_signals_raise_once() {
    let (vp, tracker) = two_point_tracker(500.0);
    let log = record_all(&tracker, &["phone", "tablet"]);

    vp.set_width(700.0);
    vp.notify_resize();
    vp.notify_resize();
    assert_eq!(log.borrow().len(), 3);
    assert_eq!(tracker.transition_count(), 1);
}

#[test]
fn skipping_breakpoints_raises_only_endpoints() {
    let viewport = Viewport::new(100.0);
    let tracker =
        BreakpointTracker::new(viewport.clone(), PointSet::new(), TrackerOptions::default())
            .unwrap();
    let log = record_all(
        &tracker,
        &["phone", "tabletPortrait", "tabletLandscape", "desktop", "bigDesktop"],
    );

    viewport.set_width(2000.0);
    assert_eq!(
        *log.borrow(),
        vec!["bigdesktopenter", "phoneleave", "bigdesktopmin"]
    );

    log.borrow_mut().clear();
    viewport.set_width(650.0);
    assert_eq!(
        *log.borrow(),
        vec!["tabletportraitenter", "bigdesktopleave", "bigdesktopmax"]
    );
}

#[test]
fn exact_threshold_belongs_to_upper_breakpoint() {
    let (vp, tracker) = two_point_tracker(599.0);
    vp.set_width(600.0);
    assert_eq!(tracker.active().breakpoint().name(), "tablet");
    vp.set_width(599.99);
    assert_eq!(tracker.active().breakpoint().name(), "phone");
}

#[test]
fn listeners_run_in_registration_order() {
    let (vp, tracker) = two_point_tracker(500.0);
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    for tag in ["A", "B", "C"] {
        let log = Rc::clone(&log);
        tracker
            .on_enter("tablet", move |_| log.borrow_mut().push(tag.to_string()))
            .unwrap();
    }
    vp.set_width(800.0);
    assert_eq!(*log.borrow(), vec!["A", "B", "C"]);
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn removing_defaults_keeps_only_caller_points() {
    let (_vp, tracker) = two_point_tracker(0.0);
    let names: Vec<&str> = tracker.table().names().collect();
    assert_eq!(names, vec!["phone", "tablet"]);
    assert!(matches!(
        tracker.lookup("desktop"),
        Err(BreakpointError::NotFound { .. })
    ));
}

#[test]
fn override_replaces_default_threshold() {
    let viewport = Viewport::new(1000.0);
    let tracker = BreakpointTracker::new(
        viewport,
        PointSet::new().with("Desktop", 960),
        TrackerOptions::default(),
    )
    .unwrap();
    assert_eq!(tracker.table().len(), 5);
    assert_eq!(tracker.lookup("desktop").unwrap().threshold(), 960);
    assert_eq!(tracker.active().breakpoint().name(), "Desktop");
}

#[test]
fn names_are_case_insensitive_everywhere() {
    let (vp, tracker) = two_point_tracker(500.0);
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let log_clone = Rc::clone(&log);
    tracker
        .on_enter("TABLET", move |e| log_clone.borrow_mut().push(e.to_string()))
        .unwrap();
    assert!(tracker.is_at_most("Tablet").unwrap());

    vp.set_width(601.0);
    assert_eq!(*log.borrow(), vec!["tabletenter"]);
}

// ============================================================================
// Class marker
// ============================================================================

#[test]
fn marker_tracks_active_breakpoint() {
    let marker = RecordingMarker::default();
    let vp = Viewport::new(500.0);
    let _tracker = BreakpointTracker::builder(vp.clone())
        .point("phone", 0)
        .point("tabletPortrait", 600)
        .options(
            TrackerOptions::default()
                .remove_default_breakpoints(true)
                .class_prefix("bp-"),
        )
        .class_marker(marker.clone())
        .build()
        .unwrap();

    vp.set_width(700.0);
    vp.set_width(300.0);

    assert_eq!(
        *marker.0.borrow(),
        vec![
            "+bp-phone",
            "+bp-tabletportrait",
            "-bp-phone",
            "+bp-phone",
            "-bp-tabletportrait",
        ]
    );
}

#[test]
fn marker_applies_after_listeners() {
    let marker = RecordingMarker::default();
    let vp = Viewport::new(500.0);
    let tracker = BreakpointTracker::builder(vp.clone())
        .point("phone", 0)
        .point("tablet", 600)
        .options(TrackerOptions::default().remove_default_breakpoints(true))
        .class_marker(marker.clone())
        .build()
        .unwrap();

    let seen = Rc::new(RefCell::new(Vec::new()));
    let seen_clone = Rc::clone(&seen);
    let marker_log = Rc::clone(&marker.0);
    tracker
        .on_crossed_min("tablet", move |_| {
            seen_clone.borrow_mut().extend(marker_log.borrow().iter().cloned());
        })
        .unwrap();

    vp.set_width(900.0);
    // Only the initial class was present while the listener ran.
    assert_eq!(*seen.borrow(), vec!["+mgb-phone"]);
    assert_eq!(marker.0.borrow().len(), 3);
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn disposed_tracker_is_silent() {
    let (vp, mut tracker) = two_point_tracker(500.0);
    let log = record_all(&tracker, &["phone", "tablet"]);

    tracker.dispose();
    vp.set_width(700.0);
    vp.set_width(300.0);

    assert!(log.borrow().is_empty());
    assert!(tracker.is_disposed());
    assert_eq!(tracker.transition_count(), 0);
}

#[test]
fn two_trackers_share_a_viewport() {
    let vp = Viewport::new(500.0);
    let a = BreakpointTracker::new(vp.clone(), PointSet::new(), TrackerOptions::default()).unwrap();
    let b = BreakpointTracker::new(
        vp.clone(),
        PointSet::new().with("narrow", 0).with("wide", 1000),
        TrackerOptions::default().remove_default_breakpoints(true),
    )
    .unwrap();

    vp.set_width(1100.0);
    assert_eq!(a.active().breakpoint().name(), "tabletLandscape");
    assert_eq!(b.active().breakpoint().name(), "wide");
    assert_eq!(vp.subscriber_count(), 2);
}

#[test]
fn final_sigma_spellings_name_one_breakpoint() {
    let vp = Viewport::new(100.0);
    let tracker = BreakpointTracker::new(
        vp.clone(),
        PointSet::new().with("base", 0).with("ΑΣ", 500).with("ας", 1000),
        TrackerOptions::default().remove_default_breakpoints(true),
    )
    .unwrap();
    assert_eq!(tracker.table().len(), 2);

    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let log_clone = Rc::clone(&log);
    tracker
        .on_enter("ΑΣ", move |e| log_clone.borrow_mut().push(e.breakpoint().to_string()))
        .unwrap();

    vp.set_width(600.0);
    assert!(log.borrow().is_empty());
    vp.set_width(1100.0);
    assert_eq!(*log.borrow(), vec!["ας"]);

    // Lookup and subscription agree on which spellings exist.
    assert!(tracker.lookup("ασ").is_err());
    assert!(tracker.on_enter("ασ", |_| {}).is_err());
    assert!(tracker.lookup("ΑΣ").is_ok());
}
