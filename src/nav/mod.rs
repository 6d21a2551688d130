pub mod page;
pub mod route;

use thiserror::Error;
use tracing::debug;

use route::{Resolved, Route};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NavError {
    #[error("no link from {from} to {to}")]
    NotReachable { from: Route, to: Route },
}

fn is_sidebar_target(route: &Route) -> bool {
    matches!(
        route,
        Route::Home | Route::Calendar | Route::Projects | Route::UploadMeeting
    )
}

/// Whether an in-app link from `from` to `to` exists.
pub fn can_link(from: &Route, to: &Route) -> bool {
    if from.has_sidebar() && is_sidebar_target(to) {
        return true;
    }
    match (from, to) {
        (Route::Login, Route::Home) => true,
        (Route::Calendar, Route::CalendarDay { .. }) => true,
        (Route::CalendarDay { .. }, Route::Calendar) => true,
        (
            Route::Home | Route::Calendar | Route::CalendarDay { .. } | Route::Projects,
            Route::Meeting { .. },
        ) => true,
        (Route::Meeting { id }, Route::Email { meeting_id })
        | (Route::Meeting { id }, Route::Schedule { meeting_id })
        | (Route::Email { meeting_id }, Route::Meeting { id })
        | (Route::Schedule { meeting_id }, Route::Meeting { id }) => id == meeting_id,
        _ => false,
    }
}

/// Current screen plus the history stack behind it.
#[derive(Debug)]
pub struct Navigator {
    current: Route,
    history: Vec<Route>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    pub fn new() -> Self {
        Navigator {
            current: Route::Login,
            history: Vec::new(),
        }
    }

    pub fn current(&self) -> &Route {
        &self.current
    }

    pub fn depth(&self) -> usize {
        self.history.len()
    }

    /// Direct entry of a path. Unknown paths land on login.
    pub fn go(&mut self, path: &str) -> Resolved {
        let resolved = Route::resolve(path);
        if resolved.redirected {
            debug!(path, "unknown path, redirecting to login");
        }
        self.push(resolved.route.clone());
        resolved
    }

    /// Follow an in-app link from the current screen.
    pub fn follow(&mut self, to: Route) -> Result<&Route, NavError> {
        if !can_link(&self.current, &to) {
            return Err(NavError::NotReachable {
                from: self.current.clone(),
                to,
            });
        }
        debug!(from = %self.current, to = %to, "follow");
        self.push(to);
        Ok(&self.current)
    }

    /// Return to the previous screen. Stays put when there is none.
    pub fn back(&mut self) -> &Route {
        if let Some(prev) = self.history.pop() {
            self.current = prev;
        }
        &self.current
    }

    fn push(&mut self, route: Route) {
        let prev = std::mem::replace(&mut self.current, route);
        self.history.push(prev);
    }
}
