//! Screen-to-screen navigation seam.

use std::sync::{Mutex, PoisonError};

use shared::domain::Route;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationMode {
    /// Adds the route on top of the history.
    Push,
    /// Swaps the current route, so going back skips it.
    Replace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigation {
    pub route: Route,
    pub mode: NavigationMode,
}

pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route, mode: NavigationMode);
}

/// Route stack plus a log of every navigation request.
pub struct History {
    inner: Mutex<HistoryState>,
}

struct HistoryState {
    stack: Vec<Route>,
    log: Vec<Navigation>,
}

impl History {
    pub fn new(initial: Route) -> Self {
        Self {
            inner: Mutex::new(HistoryState {
                stack: vec![initial],
                log: Vec::new(),
            }),
        }
    }

    pub fn current(&self) -> Route {
        let guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        guard.stack.last().copied().unwrap_or(Route::Landing)
    }

    pub fn navigations(&self) -> Vec<Navigation> {
        let guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        guard.log.clone()
    }

    pub fn last_navigation(&self) -> Option<Navigation> {
        let guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        guard.log.last().copied()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(Route::Landing)
    }
}

impl Navigator for History {
    fn navigate(&self, route: Route, mode: NavigationMode) {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        match mode {
            NavigationMode::Push => guard.stack.push(route),
            NavigationMode::Replace => match guard.stack.last_mut() {
                Some(top) => *top = route,
                None => guard.stack.push(route),
            },
        }
        guard.log.push(Navigation { route, mode });
        tracing::debug!(route = %route, ?mode, "navigated");
    }
}
