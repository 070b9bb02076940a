//! Client-side views and their paths.

pub mod navigator;

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Landing,
    SignIn,
    Register,
    Info,
    Home,
    Analytics,
    Settings,
}

/// Outcome of resolving a raw path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolved {
    View(Route),
    /// Alias that immediately forwards elsewhere, e.g. `/auth`.
    Redirect(Route),
}

impl Route {
    pub const ALL: [Route; 7] = [
        Route::Landing,
        Route::SignIn,
        Route::Register,
        Route::Info,
        Route::Home,
        Route::Analytics,
        Route::Settings,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Landing => "/",
            Route::SignIn => "/auth/signin",
            Route::Register => "/auth/register",
            Route::Info => "/info",
            Route::Home => "/home",
            Route::Analytics => "/analytics",
            Route::Settings => "/settings",
        }
    }

    pub fn is_public(&self) -> bool {
        matches!(
            self,
            Route::Landing | Route::SignIn | Route::Register | Route::Info
        )
    }

    pub fn resolve(path: &str) -> Option<Resolved> {
        let path = path.split(['?', '#']).next().unwrap_or("");
        let trimmed = path.trim().trim_end_matches('/');
        let normalized = if trimmed.is_empty() { "/" } else { trimmed };

        if normalized == "/auth" {
            return Some(Resolved::Redirect(Route::SignIn));
        }
        Route::ALL
            .iter()
            .find(|r| r.path() == normalized)
            .map(|r| Resolved::View(*r))
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
