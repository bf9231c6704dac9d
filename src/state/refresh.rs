//! Drives [`GestureState`] from live touch input and runs the refresh it commits.
//!
//! The fetch and the indicator floor run side by side: the fetch is started at
//! commit time, and `is_refreshing` clears once `min_refresh_ms` has elapsed
//! whatever the fetch is doing. A refresh committed while a fetch is still in
//! flight is deferred: one coalesced fetch follows once the pending one settles.

use std::cell::Cell;
use std::rc::Rc;

use futures::future::LocalBoxFuture;

use super::gesture::{GestureConfig, GestureEffect, GestureInput, GestureState};
use crate::services::members::MemberSource;

/// Future the host must spawn after a committed refresh.
pub type RefreshTask = LocalBoxFuture<'static, ()>;

pub trait Sleep {
    fn sleep(&self, ms: u32) -> LocalBoxFuture<'static, ()>;
}

impl<T: Sleep + ?Sized> Sleep for Rc<T> {
    fn sleep(&self, ms: u32) -> LocalBoxFuture<'static, ()> {
        (**self).sleep(ms)
    }
}

/// Timer backed by `setTimeout`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserSleep;

impl Sleep for BrowserSleep {
    fn sleep(&self, ms: u32) -> LocalBoxFuture<'static, ()> {
        Box::pin(gloo_timers::future::TimeoutFuture::new(ms))
    }
}

pub struct PullToRefresh<S: ?Sized, T> {
    state: Rc<Cell<GestureState>>,
    fetch_in_flight: Rc<Cell<bool>>,
    refetch_pending: Rc<Cell<bool>>,
    source: Rc<S>,
    sleep: T,
    config: GestureConfig,
    on_change: Rc<dyn Fn(GestureState)>,
}

impl<S, T> PullToRefresh<S, T>
where
    S: MemberSource + ?Sized + 'static,
    T: Sleep,
{
    pub fn new(source: Rc<S>, sleep: T, config: GestureConfig, on_change: impl Fn(GestureState) + 'static) -> Self {
        Self {
            state: Rc::new(Cell::new(GestureState::default())),
            fetch_in_flight: Rc::new(Cell::new(false)),
            refetch_pending: Rc::new(Cell::new(false)),
            source,
            sleep,
            config,
            on_change: Rc::new(on_change),
        }
    }

    pub fn state(&self) -> GestureState {
        self.state.get()
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    fn apply(&self, input: GestureInput) -> Option<GestureEffect> {
        let before = self.state.get();
        let (next, effect) = before.step(input, &self.config);
        self.publish(before, next);
        effect
    }

    fn publish(&self, before: GestureState, next: GestureState) {
        if before != next {
            self.state.set(next);
            (self.on_change)(next);
        }
    }

    pub fn touch_start(&self, y: f64, scroll_top: f64) {
        self.apply(GestureInput::TouchStart { y, scroll_top });
    }

    /// Returns true when the native scroll for this frame must be cancelled.
    pub fn touch_move(&self, y: f64, scroll_top: f64) -> bool {
        matches!(
            self.apply(GestureInput::TouchMove { y, scroll_top }),
            Some(GestureEffect::SuppressScroll)
        )
    }

    /// The touch was taken away by the host; the pull is abandoned.
    pub fn touch_cancel(&self) {
        self.apply(GestureInput::TouchCancel);
    }

    pub fn touch_end(&self) -> Option<RefreshTask> {
        match self.apply(GestureInput::TouchEnd) {
            Some(GestureEffect::Refresh) => self.refresh(),
            _ => None,
        }
    }

    /// Reset the listing to its first page and refetch. `None` while a refresh is showing.
    pub fn refresh(&self) -> Option<RefreshTask> {
        let current = self.state.get();
        if current.is_refreshing {
            tracing::debug!("refresh already running");
            return None;
        }
        self.publish(current, GestureState { is_refreshing: true, ..current });
        self.source.reset_page_cursor();

        let fetch = if self.fetch_in_flight.get() {
            tracing::debug!("previous fetch still pending, refetch deferred");
            self.refetch_pending.set(true);
            None
        } else {
            self.fetch_in_flight.set(true);
            Some(self.source.fetch())
        };
        let fetch_done = {
            let in_flight = self.fetch_in_flight.clone();
            let refetch_pending = self.refetch_pending.clone();
            let source = self.source.clone();
            let state = self.state.clone();
            let on_change = self.on_change.clone();
            async move {
                let Some(mut fetch) = fetch else { return };
                loop {
                    match fetch.await {
                        Ok(()) => tracing::info!("member list refreshed"),
                        Err(err) => tracing::warn!(error = %err, "member refresh failed"),
                    }
                    on_change(state.get());
                    if !refetch_pending.replace(false) {
                        break;
                    }
                    tracing::debug!("running deferred refetch");
                    fetch = source.fetch();
                }
                in_flight.set(false);
            }
        };

        let floor = self.sleep.sleep(self.config.min_refresh_ms);
        let indicator_done = {
            let state = self.state.clone();
            let on_change = self.on_change.clone();
            async move {
                floor.await;
                let next = GestureState { is_refreshing: false, ..state.get() };
                state.set(next);
                on_change(next);
            }
        };

        Some(Box::pin(async move {
            futures::future::join(fetch_done, indicator_done).await;
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use futures::channel::oneshot;
    use futures::executor::LocalPool;
    use futures::task::LocalSpawnExt;
    use std::cell::RefCell;

    #[derive(Default)]
    struct FakeSource {
        resets: Cell<u32>,
        fetches: Cell<u32>,
        replies: RefCell<Vec<oneshot::Sender<Result<(), ClientError>>>>,
    }

    impl FakeSource {
        fn reply(&self, result: Result<(), ClientError>) {
            let tx = self.replies.borrow_mut().remove(0);
            let _ = tx.send(result);
        }
    }

    impl MemberSource for FakeSource {
        fn reset_page_cursor(&self) {
            self.resets.set(self.resets.get() + 1);
        }

        fn fetch(&self) -> LocalBoxFuture<'static, Result<(), ClientError>> {
            self.fetches.set(self.fetches.get() + 1);
            let (tx, rx) = oneshot::channel();
            self.replies.borrow_mut().push(tx);
            Box::pin(async move { rx.await.unwrap_or(Ok(())) })
        }
    }

    #[derive(Default)]
    struct FakeSleep {
        requested: RefCell<Vec<u32>>,
        timers: RefCell<Vec<oneshot::Sender<()>>>,
    }

    impl FakeSleep {
        fn elapse(&self) {
            for tx in self.timers.borrow_mut().drain(..) {
                let _ = tx.send(());
            }
        }
    }

    impl Sleep for FakeSleep {
        fn sleep(&self, ms: u32) -> LocalBoxFuture<'static, ()> {
            self.requested.borrow_mut().push(ms);
            let (tx, rx) = oneshot::channel();
            self.timers.borrow_mut().push(tx);
            Box::pin(async move {
                let _ = rx.await;
            })
        }
    }

    struct Harness {
        source: Rc<FakeSource>,
        sleep: Rc<FakeSleep>,
        changes: Rc<Cell<u32>>,
        ctl: PullToRefresh<FakeSource, Rc<FakeSleep>>,
        pool: LocalPool,
    }

    fn harness() -> Harness {
        let source = Rc::new(FakeSource::default());
        let sleep = Rc::new(FakeSleep::default());
        let changes = Rc::new(Cell::new(0));
        let c = changes.clone();
        let ctl = PullToRefresh::new(source.clone(), sleep.clone(), GestureConfig::default(), move |_| {
            c.set(c.get() + 1)
        });
        Harness {
            source,
            sleep,
            changes,
            ctl,
            pool: LocalPool::new(),
        }
    }

    impl Harness {
        fn spawn(&mut self, task: Option<RefreshTask>) {
            if let Some(task) = task {
                self.pool.spawner().spawn_local(task).unwrap();
            }
            self.pool.run_until_stalled();
        }
    }

    #[test]
    fn committed_pull_resets_cursor_and_fetches_once() {
        let mut h = harness();
        h.ctl.touch_start(200.0, 0.0);
        assert!(h.ctl.touch_move(330.0, 0.0));
        assert_eq!(h.ctl.state().pull_distance, 65.0);
        let task = h.ctl.touch_end();
        assert!(task.is_some());
        assert_eq!(h.source.resets.get(), 1);
        assert_eq!(h.source.fetches.get(), 1);
        assert!(h.ctl.state().is_refreshing);
        assert_eq!(h.ctl.state().pull_distance, 0.0);
        assert_eq!(*h.sleep.requested.borrow(), vec![1000]);
        h.spawn(task);
    }

    #[test]
    fn short_pull_touches_nothing() {
        let mut h = harness();
        h.ctl.touch_start(200.0, 0.0);
        assert!(!h.ctl.touch_move(210.0, 0.0));
        let task = h.ctl.touch_end();
        assert!(task.is_none());
        h.spawn(task);
        assert_eq!(h.source.resets.get(), 0);
        assert_eq!(h.source.fetches.get(), 0);
        assert!(h.sleep.requested.borrow().is_empty());
    }

    #[test]
    fn indicator_waits_for_floor_not_fetch() {
        let mut h = harness();
        let task = h.ctl.refresh();
        h.spawn(task);
        h.source.reply(Ok(()));
        h.pool.run_until_stalled();
        assert!(h.ctl.state().is_refreshing, "fast fetch must not end the indicator early");
        h.sleep.elapse();
        h.pool.run_until_stalled();
        assert!(!h.ctl.state().is_refreshing);
    }

    #[test]
    fn failed_fetch_never_sticks_the_indicator() {
        let mut h = harness();
        let task = h.ctl.refresh();
        h.spawn(task);
        h.source.reply(Err(ClientError::Status {
            status: 500,
            message: "down".into(),
        }));
        h.sleep.elapse();
        h.pool.run_until_stalled();
        assert!(!h.ctl.state().is_refreshing);
    }

    #[test]
    fn refresh_is_latched_while_showing() {
        let mut h = harness();
        let first = h.ctl.refresh();
        assert!(first.is_some());
        assert!(h.ctl.refresh().is_none());
        assert_eq!(h.source.fetches.get(), 1);
        h.spawn(first);
    }

    #[test]
    fn gesture_while_refreshing_is_ignored() {
        let mut h = harness();
        let task = h.ctl.refresh();
        h.spawn(task);
        h.ctl.touch_start(0.0, 0.0);
        assert!(!h.ctl.touch_move(300.0, 0.0));
        assert!(h.ctl.touch_end().is_none());
        assert_eq!(h.source.fetches.get(), 1);
    }

    #[test]
    fn pull_during_slow_fetch_refetches_after_it_settles() {
        let mut h = harness();
        let task = h.ctl.refresh();
        h.spawn(task);
        h.sleep.elapse();
        h.pool.run_until_stalled();
        assert!(!h.ctl.state().is_refreshing);

        // First fetch still pending: cursor resets, request waits.
        h.ctl.touch_start(200.0, 0.0);
        h.ctl.touch_move(330.0, 0.0);
        let task = h.ctl.touch_end();
        assert!(task.is_some());
        h.spawn(task);
        assert_eq!(h.source.resets.get(), 2);
        assert_eq!(h.source.fetches.get(), 1);

        h.source.reply(Ok(()));
        h.sleep.elapse();
        h.pool.run_until_stalled();
        assert_eq!(h.source.fetches.get(), 2);
        assert!(!h.ctl.state().is_refreshing);

        h.source.reply(Ok(()));
        h.pool.run_until_stalled();
        let task = h.ctl.refresh();
        h.spawn(task);
        assert_eq!(h.source.fetches.get(), 3);
    }

    #[test]
    fn several_deferred_pulls_coalesce_into_one_fetch() {
        let mut h = harness();
        let task = h.ctl.refresh();
        h.spawn(task);
        for _ in 0..2 {
            h.sleep.elapse();
            h.pool.run_until_stalled();
            let task = h.ctl.refresh();
            h.spawn(task);
        }
        assert_eq!(h.source.fetches.get(), 1);

        h.source.reply(Err(ClientError::Status {
            status: 503,
            message: "busy".into(),
        }));
        h.pool.run_until_stalled();
        assert_eq!(h.source.fetches.get(), 2);
        h.source.reply(Ok(()));
        h.pool.run_until_stalled();
        assert_eq!(h.source.fetches.get(), 2);
    }

    #[test]
    fn cancelled_pull_never_refreshes() {
        let h = harness();
        h.ctl.touch_start(0.0, 0.0);
        assert!(h.ctl.touch_move(200.0, 0.0));
        h.ctl.touch_cancel();
        assert!(!h.ctl.state().is_tracking);
        assert_eq!(h.ctl.state().pull_distance, 0.0);
        assert!(h.ctl.touch_end().is_none());
        assert_eq!(h.source.resets.get(), 0);
        assert_eq!(h.source.fetches.get(), 0);
    }

    #[test]
    fn listener_hears_state_changes_only() {
        let h = harness();
        h.ctl.touch_start(0.0, 12.0);
        h.ctl.touch_move(50.0, 12.0);
        assert_eq!(h.changes.get(), 0);
        h.ctl.touch_start(0.0, 0.0);
        assert_eq!(h.changes.get(), 1);
    }
}
