use super::*;

fn filter_task(n: usize) -> TimerTask {
    TimerTask::FilterMenu { input: NodeId(n) }
}

#[test]
fn tasks_run_by_due_time_then_insertion_order() {
    let mut scheduler = Scheduler::new(100);
    let late = scheduler.schedule(20, filter_task(1));
    let early = scheduler.schedule(10, filter_task(2));
    let tie = scheduler.schedule(10, filter_task(3));

    let order = std::iter::from_fn(|| scheduler.take_next(None))
        .map(|task| task.id)
        .collect::<Vec<_>>();
    assert_eq!(order, vec![early, tie, late]);
}

#[test]
fn due_limit_holds_back_future_tasks() {
    let mut scheduler = Scheduler::new(100);
    scheduler.schedule(5, filter_task(1));
    scheduler.schedule(50, filter_task(2));

    assert!(scheduler.take_next(Some(10)).is_some());
    assert!(scheduler.peek_next(Some(10)).is_none());
    assert_eq!(scheduler.len(), 1);
}

#[test]
fn negative_delay_is_due_now() {
    let mut scheduler = Scheduler::new(100);
    scheduler.now_ms = 40;
    scheduler.schedule(-10, filter_task(1));
    assert_eq!(scheduler.pending()[0].due_at, 40);
}

#[test]
fn clear_removes_only_the_named_timer() {
    let mut scheduler = Scheduler::new(100);
    let a = scheduler.schedule(1, filter_task(1));
    let b = scheduler.schedule(2, filter_task(2));
    assert!(scheduler.clear(a));
    assert!(!scheduler.clear(a));
    assert_eq!(
        scheduler.pending(),
        vec![PendingTimer {
            id: b,
            due_at: 2,
            order: 1
        }]
    );
    assert_eq!(scheduler.clear_all(), 1);
    assert_eq!(scheduler.len(), 0);
}

#[test]
fn debouncer_keeps_one_timer_per_key() {
    let mut scheduler = Scheduler::new(100);
    let mut debouncer = Debouncer::default();
    let key = NodeId(7);

    let first = debouncer.call(&mut scheduler, key, 300, filter_task(7));
    scheduler.now_ms = 100;
    let second = debouncer.call(&mut scheduler, key, 300, filter_task(7));
    assert_ne!(first, second);

    let pending = scheduler.pending();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, second);
    assert_eq!(pending[0].due_at, 400);
}

#[test]
fn debouncer_keys_are_independent() {
    let mut scheduler = Scheduler::new(100);
    let mut debouncer = Debouncer::default();
    debouncer.call(&mut scheduler, NodeId(1), 10, filter_task(1));
    debouncer.call(&mut scheduler, NodeId(2), 10, filter_task(2));
    assert_eq!(scheduler.len(), 2);
}

#[test]
fn fired_timer_is_not_cancelled_by_the_next_call() {
    let mut scheduler = Scheduler::new(100);
    let mut debouncer = Debouncer::default();
    let key = NodeId(3);

    let first = debouncer.call(&mut scheduler, key, 10, filter_task(3));
    let fired = scheduler.take_next(None).map(|task| task.id);
    assert_eq!(fired, Some(first));
    debouncer.fired(key, first);

    let unrelated = scheduler.schedule(10, filter_task(9));
    debouncer.call(&mut scheduler, key, 10, filter_task(3));
    assert!(scheduler.pending().iter().any(|timer| timer.id == unrelated));
}

#[test]
fn page_flush_stops_at_step_limit() -> Result<()> {
    let mut page = Page::from_html("<input id='searchBox'>")?;
    let input = page.select_one("#searchBox")?;
    page.set_timer_step_limit(2)?;
    for delay in [1, 2, 3] {
        page.scheduler
            .schedule(delay, TimerTask::FilterMenu { input });
    }
    match page.flush() {
        Err(Error::Runtime(msg)) => {
            assert!(msg.contains("exceeded max task steps"));
            assert!(msg.contains("limit=2"));
        }
        other => panic!("unexpected flush result: {other:?}"),
    }
    Ok(())
}
