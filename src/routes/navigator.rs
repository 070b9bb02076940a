use crate::error::{Error, Result};
use crate::middleware::access_guard::{AccessGuard, GuardState};
use crate::routes::{Resolved, Route};
use crate::services::session_store::SessionStore;

/// Result of one navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigation {
    pub requested: Route,
    /// Where the client ends up after aliases and the guard are applied.
    pub location: Route,
    pub guard: GuardState,
}

impl Navigation {
    pub fn was_redirected(&self) -> bool {
        self.requested != self.location
    }
}

/// Tracks the current location and runs the access guard on every entry
/// into a guarded view.
pub struct Navigator {
    session: SessionStore,
    current: Route,
    history: Vec<Route>,
}

impl Navigator {
    pub fn new(session: SessionStore) -> Self {
        Self {
            session,
            current: Route::Landing,
            history: Vec::new(),
        }
    }

    pub fn current(&self) -> Route {
        self.current
    }

    pub fn history(&self) -> &[Route] {
        &self.history
    }

    pub fn navigate(&mut self, path: &str) -> Result<Navigation> {
        let resolved = Route::resolve(path)
            .ok_or_else(|| Error::NotFound(format!("no view at '{}'", path)))?;
        let requested = match resolved {
            Resolved::View(route) | Resolved::Redirect(route) => route,
        };
        self.go(requested)
    }

    pub fn go(&mut self, requested: Route) -> Result<Navigation> {
        let mut guard = AccessGuard::enter(requested);
        let state = guard.evaluate(&self.session)?;
        let location = match state {
            GuardState::Redirected(target) => target,
            _ => requested,
        };

        self.history.push(location);
        self.current = location;
        tracing::debug!(requested = %requested, location = %location, "Navigated");

        Ok(Navigation {
            requested,
            location,
            guard: state,
        })
    }

    /// Removing the token is the whole logout; the client then returns to
    /// the landing page.
    pub fn logout(&mut self) -> Result<Navigation> {
        self.session.clear_session()?;
        self.go(Route::Landing)
    }

    /// Target of the brand link in the navigation bar.
    pub fn brand_target(&self) -> Result<Route> {
        Ok(if self.session.is_logged_in()? {
            Route::Home
        } else {
            Route::Landing
        })
    }

    /// The navigation menu is hidden on the landing and auth pages.
    pub fn menu_visible(&self) -> bool {
        !matches!(
            self.current,
            Route::Landing | Route::SignIn | Route::Register
        )
    }

    /// Links offered by the menu for the current session.
    pub fn menu_links(&self) -> Result<Vec<Route>> {
        if !self.menu_visible() {
            return Ok(vec![Route::SignIn]);
        }
        if self.session.is_logged_in()? {
            Ok(vec![Route::Home, Route::Analytics, Route::Settings])
        } else {
            Ok(Vec::new())
        }
    }
}
