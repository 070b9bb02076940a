//! Per-navigation access decision for guarded views.
//!
//! Each entry into a guarded view starts in `Checking` and resolves to
//! `Allowed` or `Redirected` from the session token alone. Nothing is cached
//! between entries, so a logout is honoured on the next navigation.

use crate::error::Result;
use crate::routes::Route;
use crate::services::session_store::SessionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    Checking,
    Allowed,
    Redirected(Route),
}

impl GuardState {
    pub fn is_settled(&self) -> bool {
        !matches!(self, GuardState::Checking)
    }
}

/// Guard for a single view entry.
#[derive(Debug, Clone)]
pub struct AccessGuard {
    route: Route,
    state: GuardState,
}

impl AccessGuard {
    pub fn enter(route: Route) -> Self {
        Self {
            route,
            state: GuardState::Checking,
        }
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn state(&self) -> GuardState {
        self.state
    }

    /// Resolves `Checking`. Public views are allowed without consulting the
    /// session. A settled guard is not re-evaluated; navigate again instead.
    pub fn evaluate(&mut self, session: &SessionStore) -> Result<GuardState> {
        if self.state.is_settled() {
            return Ok(self.state);
        }

        self.state = if self.route.is_public() || session.is_logged_in()? {
            GuardState::Allowed
        } else {
            tracing::info!(route = %self.route, "No session token, redirecting to sign-in");
            GuardState::Redirected(Route::SignIn)
        };
        Ok(self.state)
    }

    /// Whether protected content may be produced. False until evaluated.
    pub fn may_render(&self) -> bool {
        self.state == GuardState::Allowed
    }
}

pub fn check(route: Route, session: &SessionStore) -> Result<GuardState> {
    AccessGuard::enter(route).evaluate(session)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guarded_view_without_token_redirects() {
        let session = SessionStore::in_memory();
        let mut guard = AccessGuard::enter(Route::Home);
        assert_eq!(guard.state(), GuardState::Checking);
        assert!(!guard.may_render());

        let state = guard.evaluate(&session).unwrap();

        assert_eq!(state, GuardState::Redirected(Route::SignIn));
        assert!(!guard.may_render());
    }

    #[test]
    fn guarded_view_with_token_is_allowed() {
        let session = SessionStore::in_memory();
        session.set_session("tok", "Ada", None).unwrap();

        for route in [Route::Home, Route::Analytics, Route::Settings] {
            assert_eq!(check(route, &session).unwrap(), GuardState::Allowed);
        }
    }

    #[test]
    fn public_views_bypass_the_guard() {
        let session = SessionStore::in_memory();
        for route in [Route::Landing, Route::SignIn, Route::Register, Route::Info] {
            assert_eq!(check(route, &session).unwrap(), GuardState::Allowed);
        }
    }

    #[test]
    fn settled_guard_keeps_its_decision() {
        let session = SessionStore::in_memory();
        session.set_session("tok", "Ada", None).unwrap();
        let mut guard = AccessGuard::enter(Route::Settings);
        guard.evaluate(&session).unwrap();

        session.clear_session().unwrap();

        assert_eq!(guard.evaluate(&session).unwrap(), GuardState::Allowed);
        assert_eq!(
            check(Route::Settings, &session).unwrap(),
            GuardState::Redirected(Route::SignIn)
        );
    }
}
