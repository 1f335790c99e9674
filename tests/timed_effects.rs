use spark_effects::{
    CountUpOptions, CountUpPhase, Host, StaggerOptions, VirtualHost, effect, effect_scope, signal,
    untrack, use_count_up, use_stagger_reveal,
};
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

// =============================================================================
// COUNT UP
// =============================================================================

#[test]
fn test_count_up_monotonic_and_exact_at_end() {
    let host = Rc::new(VirtualHost::new());
    let start = signal(false);
    let counter = use_count_up(&host, CountUpOptions::new(30).with_duration_ms(1800), &start);

    host.advance(250.0);
    start.set(true);
    let started_at = host.now();
    assert_eq!(counter.value().get_untracked(), 0);
    assert_eq!(counter.phase().get_untracked(), CountUpPhase::Animating);

    let mut previous = 0;
    while host.now() - started_at < 1800.0 {
        host.next_frame();
        let value = counter.value().get_untracked();
        assert!(value >= previous, "count went from {previous} to {value}");
        previous = value;
    }

    assert_eq!(counter.value().get_untracked(), 30);
    assert_eq!(counter.phase().get_untracked(), CountUpPhase::Done);
    assert_eq!(host.pending_frames(), 0);

    host.frames(10);
    assert_eq!(counter.value().get_untracked(), 30);
}

#[test]
fn test_count_up_reset_is_immediate() {
    let host = Rc::new(VirtualHost::new());
    let start = signal(true);
    let counter = use_count_up(&host, CountUpOptions::new(30).with_duration_ms(1800), &start);

    host.advance(600.0);
    assert!(counter.value().get_untracked() > 0);

    start.set(false);
    assert_eq!(counter.value().get_untracked(), 0);
    assert_eq!(counter.phase().get_untracked(), CountUpPhase::Idle);
    assert_eq!(host.pending_frames(), 0);

    host.advance(600.0);
    assert_eq!(counter.value().get_untracked(), 0);
}

#[test]
fn test_count_up_restarts_from_zero() {
    let host = Rc::new(VirtualHost::new());
    let start = signal(true);
    let counter = use_count_up(&host, CountUpOptions::new(100).with_duration_ms(1000), &start);

    host.advance(2000.0);
    assert_eq!(counter.value().get_untracked(), 100);

    start.set(false);
    start.set(true);
    assert_eq!(counter.value().get_untracked(), 0);
    host.advance(100.0);
    let early = counter.value().get_untracked();
    assert!(early > 0 && early < 100, "restarted count is {early}");
}

#[test]
fn test_count_up_unmount_freezes_value() {
    let host = Rc::new(VirtualHost::new());
    let start = signal(true);
    let scope = effect_scope(false);
    let counter = scope
        .run(|| use_count_up(&host, CountUpOptions::new(500).with_duration_ms(2000), &start))
        .unwrap();

    host.advance(500.0);
    let frozen = counter.value().get_untracked();
    assert!(frozen > 0);

    let writes = Rc::new(RefCell::new(Vec::new()));
    let value = counter.value();
    let _watch = effect({
        let writes = writes.clone();
        move || writes.borrow_mut().push(value.get())
    });

    scope.stop();
    host.advance(5000.0);
    start.set(false);
    start.set(true);
    host.advance(5000.0);

    assert_eq!(counter.value().get_untracked(), frozen);
    assert_eq!(*writes.borrow(), vec![frozen]);
}

#[test]
fn test_count_up_start_written_untracked() {
    let host = Rc::new(VirtualHost::new());
    let start = signal(false);
    let counter = use_count_up(&host, CountUpOptions::new(30).with_duration_ms(1800), &start);

    untrack(|| start.set(true));
    assert_eq!(start.subscriber_count(), 1);
    host.advance(600.0);
    assert!(counter.value().get_untracked() > 0);

    start.set(false);
    assert_eq!(counter.value().get_untracked(), 0);
    assert_eq!(counter.phase().get_untracked(), CountUpPhase::Idle);
    assert_eq!(host.pending_frames(), 0);
}

#[test]
fn test_count_up_start_written_from_effect() {
    let host = Rc::new(VirtualHost::new());
    let source = signal(false);
    let start = signal(false);
    let counter = use_count_up(&host, CountUpOptions::new(30).with_duration_ms(1800), &start);

    let _forward = effect({
        let (source, start) = (source.clone(), start.clone());
        move || { start.set(source.get()); }
    });

    source.set(true);
    assert_eq!(counter.phase().get_untracked(), CountUpPhase::Animating);
    host.advance(600.0);

    source.set(false);
    assert_eq!(counter.value().get_untracked(), 0);
    assert_eq!(counter.phase().get_untracked(), CountUpPhase::Idle);

    source.set(true);
    host.advance(2000.0);
    assert_eq!(counter.value().get_untracked(), 30);
}

// =============================================================================
// STAGGER REVEAL
// =============================================================================

#[test]
fn test_stagger_reveals_in_index_order_on_schedule() {
    let host = Rc::new(VirtualHost::new());
    let trigger = signal(false);
    let stagger = use_stagger_reveal(&host, StaggerOptions::new(5).with_stagger_delay_ms(60), &trigger);

    host.advance(1000.0);
    assert!(stagger.revealed().with(BTreeSet::is_empty));

    trigger.set(true);
    let triggered_at = host.now();

    let appearances = Rc::new(RefCell::new(Vec::<(usize, f64)>::new()));
    let revealed = stagger.revealed();
    let _watch = effect({
        let appearances = appearances.clone();
        let host = host.clone();
        move || {
            let set = revealed.get();
            let mut log = appearances.borrow_mut();
            for &i in &set {
                if !log.iter().any(|(seen, _)| *seen == i) {
                    log.push((i, host.now() - triggered_at));
                }
            }
        }
    });

    for _ in 0..40 {
        host.advance(10.0);
    }

    let log = appearances.borrow();
    assert_eq!(log.len(), 5);
    for (position, &(index, at)) in log.iter().enumerate() {
        assert_eq!(index, position, "indices appear in increasing order");
        assert!(at >= index as f64 * 60.0, "index {index} appeared at {at}ms");
    }
}

#[test]
fn test_stagger_exact_boundaries() {
    let host = Rc::new(VirtualHost::new());
    let trigger = signal(true);
    let stagger = use_stagger_reveal(&host, StaggerOptions::new(3).with_stagger_delay_ms(100), &trigger);

    host.advance(0.0);
    assert!(stagger.is_revealed(0));
    host.advance(99.0);
    assert!(!stagger.is_revealed(1));
    host.advance(1.0);
    assert!(stagger.is_revealed(1));
    assert!(!stagger.is_revealed(2));
    host.advance(100.0);
    assert!(stagger.is_revealed(2));
    assert_eq!(host.pending_timers(), 0);
}

#[test]
fn test_stagger_trigger_off_clears_pending() {
    let host = Rc::new(VirtualHost::new());
    let trigger = signal(true);
    let stagger = use_stagger_reveal(&host, StaggerOptions::new(5), &trigger);

    host.advance(130.0);
    assert_eq!(
        stagger.revealed().get_untracked(),
        BTreeSet::from([0, 1, 2])
    );

    trigger.set(false);
    assert!(stagger.revealed().with(BTreeSet::is_empty));
    assert_eq!(host.pending_timers(), 0);

    host.advance(1000.0);
    assert!(stagger.revealed().with(BTreeSet::is_empty));

    trigger.set(true);
    host.advance(60.0);
    assert_eq!(stagger.revealed().get_untracked(), BTreeSet::from([0, 1]));
}

#[test]
fn test_stagger_unmount_stops_reveals() {
    let host = Rc::new(VirtualHost::new());
    let trigger = signal(true);
    let stagger = use_stagger_reveal(&host, StaggerOptions::new(10), &trigger);

    host.advance(100.0);
    let before = stagger.revealed().get_untracked();
    stagger.dispose();

    host.advance(10_000.0);
    assert_eq!(stagger.revealed().get_untracked(), before);
    assert_eq!(host.pending_timers(), 0);
}

#[test]
fn test_stagger_trigger_written_untracked() {
    let host = Rc::new(VirtualHost::new());
    let trigger = signal(false);
    let stagger = use_stagger_reveal(&host, StaggerOptions::new(4), &trigger);

    untrack(|| trigger.set(true));
    host.advance(100.0);
    assert!(stagger.is_revealed(1));

    trigger.set(false);
    assert!(stagger.revealed().with(BTreeSet::is_empty));
    assert_eq!(host.pending_timers(), 0);
}
