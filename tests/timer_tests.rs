use std::time::{Duration, Instant};

use rust_slideshow::timer::{OneShot, Timers};

#[test]
fn fires_once_at_or_after_the_deadline() {
    let now = Instant::now();
    let mut t = OneShot::new();
    t.schedule(now, Duration::from_millis(100));

    assert!(!t.fire(now));
    assert!(!t.fire(now + Duration::from_millis(99)));
    assert!(t.is_pending());

    assert!(t.fire(now + Duration::from_millis(100)));
    assert!(!t.is_pending());

    // edge-triggered: consumed on first observation
    assert!(!t.fire(now + Duration::from_secs(10)));
}

#[test]
fn scheduling_replaces_a_pending_deadline() {
    let now = Instant::now();
    let mut t = OneShot::new();
    t.schedule(now, Duration::from_secs(60));
    t.schedule(now, Duration::from_millis(10));

    assert!(t.fire(now + Duration::from_millis(10)));
    // the superseded 60s deadline must not fire later
    assert!(!t.fire(now + Duration::from_secs(61)));
}

#[test]
fn cancel_clears_the_deadline() {
    let now = Instant::now();
    let mut t = OneShot::new();
    t.schedule(now, Duration::from_millis(1));
    t.cancel();

    assert!(!t.is_pending());
    assert!(!t.fire(now + Duration::from_secs(1)));
}

#[test]
fn unscheduled_timer_never_fires() {
    let mut t = OneShot::new();
    assert!(!t.fire(Instant::now()));
    assert_eq!(t.deadline(), None);
}

#[test]
fn next_deadline_is_the_earliest_pending() {
    let now = Instant::now();
    let mut timers = Timers::default();
    assert_eq!(timers.next_deadline(), None);

    timers.advance.schedule(now, Duration::from_secs(3));
    timers.resize.schedule(now, Duration::from_millis(100));
    assert_eq!(
        timers.next_deadline(),
        Some(now + Duration::from_millis(100))
    );

    timers.resize.cancel();
    assert_eq!(timers.next_deadline(), Some(now + Duration::from_secs(3)));
}
