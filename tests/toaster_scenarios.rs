use std::time::{Duration, Instant};

use pretty_assertions::assert_eq;
use rstest::*;

use toaster::{Dispatcher, NotificationId, NotificationPatch, QueueConfig, Toaster};

const FRAME: u64 = 50;

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

/// Drive frames every 50 ms from `from` to `to` (inclusive), collecting expirations
fn run_frames(toaster: &mut Toaster, t0: Instant, from: u64, to: u64) -> Vec<(u64, NotificationId)> {
    let mut expired = Vec::new();
    for at in (from..=to).step_by(FRAME as usize) {
        let report = toaster.on_frame(t0 + ms(at));
        expired.extend(report.expired.into_iter().map(|id| (at, id)));
    }
    expired
}

#[fixture]
fn setup() -> (Dispatcher, Toaster) {
    let dispatcher = Dispatcher::new();
    let toaster = Toaster::with_dispatcher(QueueConfig::default(), dispatcher.clone());
    (dispatcher, toaster)
}

#[rstest]
fn expires_exactly_once_after_duration(setup: (Dispatcher, Toaster)) {
    let (dispatcher, mut toaster) = setup;
    let t0 = Instant::now();

    dispatcher.add(NotificationPatch::for_id("a").duration(ms(2000)).show_progress(true));
    assert_eq!(toaster.process_pending(), 1);

    let expired = run_frames(&mut toaster, t0, 0, 4000);

    assert_eq!(expired, vec![(2000, NotificationId::from("a"))]);
    assert!(toaster.is_empty());
    assert_eq!(toaster.active_timers(), 0);

    // no further ticks once the entry is gone
    let report = toaster.on_frame(t0 + ms(4050));
    assert!(!report.advanced);
    assert!(report.expired.is_empty());
}

#[rstest]
fn paused_time_does_not_count(setup: (Dispatcher, Toaster)) {
    let (dispatcher, mut toaster) = setup;
    let t0 = Instant::now();
    let a = NotificationId::from("a");

    dispatcher.add(NotificationPatch::for_id("a").duration(ms(2000)).pause_on_hover(true));
    toaster.process_pending();

    assert!(run_frames(&mut toaster, t0, 0, 1000).is_empty());
    assert_eq!(toaster.get(&a).map(|n| n.elapsed), Some(ms(1000)));

    assert!(toaster.pointer_enter(&a));
    assert!(run_frames(&mut toaster, t0, 1050, 6000).is_empty());
    assert_eq!(toaster.get(&a).map(|n| n.elapsed), Some(ms(1000)));

    assert!(toaster.pointer_leave(&a));
    assert!(run_frames(&mut toaster, t0, 6000, 6950).is_empty());
    assert_eq!(toaster.len(), 1);

    assert_eq!(run_frames(&mut toaster, t0, 7000, 7000), vec![(7000, a)]);
    assert!(toaster.is_empty());
}

#[rstest]
fn shortened_duration_expires_on_next_frame(setup: (Dispatcher, Toaster)) {
    let (dispatcher, mut toaster) = setup;
    let t0 = Instant::now();
    let a = NotificationId::from("a");

    dispatcher.add(NotificationPatch::for_id("a").duration(ms(2000)));
    toaster.process_pending();
    assert!(run_frames(&mut toaster, t0, 0, 1000).is_empty());

    dispatcher.update(NotificationPatch::for_id("a").duration(ms(500)));
    toaster.process_pending();
    assert_eq!(toaster.timer(&a).map(|timer| timer.duration()), Some(ms(500)));
    assert_eq!(toaster.get(&a).map(|n| n.elapsed), Some(ms(500)));

    assert_eq!(run_frames(&mut toaster, t0, 1050, 1500), vec![(1050, a)]);
    assert!(toaster.is_empty());
    assert_eq!(toaster.active_timers(), 0);
}

#[rstest]
fn paused_update_stops_the_countdown(setup: (Dispatcher, Toaster)) {
    let (dispatcher, mut toaster) = setup;
    let t0 = Instant::now();
    let a = NotificationId::from("a");

    dispatcher.add(NotificationPatch::for_id("a").duration(ms(1000)));
    toaster.process_pending();
    assert!(run_frames(&mut toaster, t0, 0, 500).is_empty());

    dispatcher.update(NotificationPatch::for_id("a").paused(true));
    toaster.process_pending();
    assert!(toaster.timer(&a).is_some_and(|timer| timer.is_paused()));
    assert!(run_frames(&mut toaster, t0, 550, 3000).is_empty());
    assert_eq!(toaster.get(&a).map(|n| n.elapsed), Some(ms(500)));

    dispatcher.update(NotificationPatch::for_id("a").paused(false));
    toaster.process_pending();
    assert!(run_frames(&mut toaster, t0, 3000, 3450).is_empty());
    assert_eq!(run_frames(&mut toaster, t0, 3500, 3500), vec![(3500, a)]);
}

#[rstest]
fn persistent_entries_never_expire(setup: (Dispatcher, Toaster)) {
    let (dispatcher, mut toaster) = setup;
    let t0 = Instant::now();

    dispatcher.add(NotificationPatch::for_id("a").duration(Duration::ZERO));
    toaster.process_pending();

    assert!(run_frames(&mut toaster, t0, 0, 10_000).is_empty());
    assert_eq!(toaster.len(), 1);
    assert_eq!(toaster.active_timers(), 0);
}

#[rstest]
fn explicit_remove_cancels_pending_expiry(setup: (Dispatcher, Toaster)) {
    let (dispatcher, mut toaster) = setup;
    let t0 = Instant::now();

    dispatcher.add(NotificationPatch::for_id("a").duration(ms(500)));
    toaster.process_pending();
    run_frames(&mut toaster, t0, 0, 200);

    dispatcher.remove("a");
    toaster.process_pending();
    assert_eq!(toaster.active_timers(), 0);

    assert!(run_frames(&mut toaster, t0, 250, 1000).is_empty());
}

#[rstest]
fn dispatcher_decouples_publishers_from_toaster(setup: (Dispatcher, Toaster)) {
    let (dispatcher, mut toaster) = setup;
    let publisher = dispatcher.clone();

    publisher.add(NotificationPatch::for_id("a"));
    publisher.add(NotificationPatch::for_id("b"));
    publisher.update(NotificationPatch::for_id("a").title("renamed"));
    // nothing changes until the toaster drains its subscription
    assert!(toaster.is_empty());

    assert_eq!(toaster.process_pending(), 3);
    let ids: Vec<String> = toaster.snapshot().iter().map(|n| n.id.to_string()).collect();
    assert_eq!(ids, vec!["b", "a"]);
    assert_eq!(toaster.get(&"a".into()).map(|n| n.title.as_str()), Some("renamed"));
}

#[rstest]
fn every_mounted_toaster_sees_every_intent() {
    let dispatcher = Dispatcher::new();
    let mut first = Toaster::with_dispatcher(QueueConfig::default(), dispatcher.clone());
    let mut second = Toaster::with_dispatcher(QueueConfig::with_capacity(1), dispatcher.clone());

    assert_eq!(dispatcher.add(NotificationPatch::for_id("a")), 2);
    dispatcher.add(NotificationPatch::for_id("b"));
    first.process_pending();
    second.process_pending();

    assert_eq!(first.len(), 2);
    assert_eq!(second.len(), 1);

    drop(second);
    assert_eq!(dispatcher.subscriber_count(), 1);
}

#[rstest]
fn unmounted_toaster_stops_listening(setup: (Dispatcher, Toaster)) {
    let (dispatcher, mut toaster) = setup;
    let t0 = Instant::now();

    dispatcher.add(NotificationPatch::for_id("a").duration(ms(100)));
    toaster.process_pending();
    toaster.unmount();

    assert_eq!(dispatcher.subscriber_count(), 0);
    assert_eq!(dispatcher.add(NotificationPatch::for_id("b")), 0);
    assert!(run_frames(&mut toaster, t0, 0, 500).is_empty());
    assert!(toaster.is_empty());
}

#[tokio::test]
async fn recv_and_apply_waits_for_publish() {
    let dispatcher = Dispatcher::new();
    let mut toaster = Toaster::with_dispatcher(QueueConfig::default(), dispatcher.clone());

    tokio::spawn(async move {
        dispatcher.add(NotificationPatch::new().title("from task"));
    });

    assert_eq!(toaster.recv_and_apply().await, Some(true));
    assert_eq!(toaster.snapshot()[0].title, "from task");
}
