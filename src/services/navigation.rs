//! In-app routing. Views are switched by state like the rest of the app; a
//! navigation resolves once the root has rendered the new route.

use std::cell::RefCell;
use std::rc::Rc;

use futures::channel::oneshot;
use yew::{Callback, Reducible};

use crate::state::reset_bus::ResetBus;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    Home,
    Members,
    LearnMore,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Members => "/members",
            Route::LearnMore => "/learn-more",
        }
    }

    pub fn from_path(path: &str) -> Self {
        match path.trim_end_matches('/') {
            "/members" => Route::Members,
            "/learn-more" => Route::LearnMore,
            _ => Route::Home,
        }
    }
}

/// Current route plus a counter bumped on every navigation, so re-navigating
/// to the current route still completes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NavState {
    pub route: Route,
    pub seq: u64,
}

impl NavState {
    pub fn new(route: Route) -> Self {
        Self { route, seq: 0 }
    }
}

impl Reducible for NavState {
    type Action = Route;

    fn reduce(self: Rc<Self>, route: Self::Action) -> Rc<Self> {
        Rc::new(NavState {
            route,
            seq: self.seq.wrapping_add(1),
        })
    }
}

#[derive(Clone)]
pub struct Navigator {
    dispatch: Callback<Route>,
    pending: Rc<RefCell<Vec<oneshot::Sender<()>>>>,
}

impl PartialEq for Navigator {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.pending, &other.pending)
    }
}

impl Navigator {
    pub fn new(dispatch: Callback<Route>) -> Self {
        Self {
            dispatch,
            pending: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Resolves to true once the route has been rendered, false if the
    /// navigator was torn down first.
    pub fn navigate_to(&self, route: Route) -> impl Future<Output = bool> + 'static {
        let (tx, rx) = oneshot::channel();
        self.pending.borrow_mut().push(tx);
        tracing::debug!(path = route.path(), "navigate");
        self.dispatch.emit(route);
        async move { rx.await.is_ok() }
    }

    /// Called by the root after it rendered a navigation.
    pub fn complete_pending(&self) {
        let waiting: Vec<_> = self.pending.borrow_mut().drain(..).collect();
        for tx in waiting {
            let _ = tx.send(());
        }
    }
}

/// Go to the home view and, once it is mounted, reset it.
pub async fn go_home(nav: Navigator, bus: ResetBus) {
    if nav.navigate_to(Route::Home).await {
        bus.reset_home();
    } else {
        tracing::debug!("navigation dropped, home not reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::LocalPool;
    use futures::task::LocalSpawnExt;
    use std::cell::Cell;

    #[test]
    fn paths_round_trip() {
        for r in [Route::Home, Route::Members, Route::LearnMore] {
            assert_eq!(Route::from_path(r.path()), r);
        }
        assert_eq!(Route::from_path("/members/"), Route::Members);
        assert_eq!(Route::from_path("/nowhere"), Route::Home);
    }

    #[test]
    fn renavigating_bumps_sequence() {
        let s = Rc::new(NavState::new(Route::Home));
        let s = s.reduce(Route::Home);
        assert_eq!(s.route, Route::Home);
        assert_eq!(s.seq, 1);
    }

    #[test]
    fn reset_waits_for_navigation_to_complete() {
        let routes = Rc::new(RefCell::new(Vec::new()));
        let r = routes.clone();
        let nav = Navigator::new(Callback::from(move |route| r.borrow_mut().push(route)));
        let bus = ResetBus::new();

        let mut pool = LocalPool::new();
        pool.spawner().spawn_local(go_home(nav.clone(), bus.clone())).unwrap();
        pool.run_until_stalled();
        assert_eq!(*routes.borrow(), vec![Route::Home]);

        // Home mounts and subscribes before the navigation completes.
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let _sub = bus.subscribe(move || {
            h.set(h.get() + 1);
            Ok(())
        });
        assert_eq!(hits.get(), 0);

        nav.complete_pending();
        pool.run_until_stalled();
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn dropped_navigator_skips_reset() {
        let nav = Navigator::new(Callback::from(|_| ()));
        let bus = ResetBus::new();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let _sub = bus.subscribe(move || {
            h.set(h.get() + 1);
            Ok(())
        });
        let mut pool = LocalPool::new();
        pool.spawner().spawn_local(go_home(nav.clone(), bus)).unwrap();
        pool.run_until_stalled();
        nav.pending.borrow_mut().clear();
        pool.run_until_stalled();
        assert_eq!(hits.get(), 0);
    }
}
