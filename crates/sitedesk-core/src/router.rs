// ── Routes and navigation guard ──
//
// A static path table for the admin surface plus the single guard every
// navigation passes through. Only `/login` is reachable signed out.

use std::sync::Arc;

use strum::{AsRefStr, Display};
use tracing::debug;

use crate::auth::AuthStore;

pub const LOGIN_PATH: &str = "/login";
pub const HOME_PATH: &str = "/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "kebab-case")]
pub enum View {
    Login,
    Hero,
    About,
    Dashboard,
    Projects,
    Locations,
    Installation,
    Timeline,
    WhyWeDifferent,
    CompanyStatistics,
    NotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub path: &'static str,
    pub view: View,
}

pub static ROUTES: &[Route] = &[
    Route { path: LOGIN_PATH, view: View::Login },
    Route { path: HOME_PATH, view: View::Hero },
    Route { path: "/about", view: View::About },
    Route { path: "/features", view: View::Dashboard },
    Route { path: "/projects", view: View::Projects },
    Route { path: "/locations", view: View::Locations },
    Route { path: "/installation", view: View::Installation },
    Route { path: "/timeline", view: View::Timeline },
    Route { path: "/why-we-different", view: View::WhyWeDifferent },
    Route { path: "/company-statistics", view: View::CompanyStatistics },
];

static NOT_FOUND: Route = Route {
    path: "/:catchAll(.*)*",
    view: View::NotFound,
};

/// The route for `path`, ignoring a trailing slash. Unknown paths map to
/// the catch-all.
pub fn resolve(path: &str) -> &'static Route {
    let trimmed = match path.trim_end_matches('/') {
        "" => HOME_PATH,
        p => p,
    };
    ROUTES
        .iter()
        .find(|r| r.path == trimmed)
        .unwrap_or(&NOT_FOUND)
}

/// Outcome of a guard pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Proceed,
    Redirect(&'static str),
}

#[derive(Clone)]
pub struct RouteGuard {
    auth: Arc<AuthStore>,
}

impl RouteGuard {
    pub fn new(auth: Arc<AuthStore>) -> Self {
        Self { auth }
    }

    /// Decide whether navigation to `path` may proceed.
    pub async fn before_each(&self, path: &str) -> Navigation {
        if self.auth.phase().is_pending() {
            self.auth.init().await;
        }

        let is_login = resolve(path).view == View::Login;
        let signed_in = self.auth.is_authenticated();
        let decision = match (is_login, signed_in) {
            (true, true) => Navigation::Redirect(HOME_PATH),
            (false, false) => Navigation::Redirect(LOGIN_PATH),
            _ => Navigation::Proceed,
        };
        debug!(path, ?decision, "navigation guard");
        decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_paths_resolve() {
        assert_eq!(resolve("/projects").view, View::Projects);
        assert_eq!(resolve("/projects/").view, View::Projects);
        assert_eq!(resolve("").view, View::Hero);
        assert_eq!(resolve("/features").view, View::Dashboard);
    }

    #[test]
    fn unknown_paths_hit_catch_all() {
        assert_eq!(resolve("/nope").view, View::NotFound);
        assert_eq!(resolve("/projects/12").view, View::NotFound);
    }

    #[test]
    fn views_have_kebab_names() {
        assert_eq!(View::WhyWeDifferent.to_string(), "why-we-different");
    }
}
