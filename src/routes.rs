use std::collections::HashMap;
use std::fmt;

use crate::foundation::error::{MotionError, MotionResult};

/// Pages of the site.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub enum Page {
    Home,
    UseCases,
    Features,
    Security,
    Faq,
    ReleaseNotes,
    RequestAccess,
}

impl Page {
    pub const ALL: [Self; 7] = [
        Self::Home,
        Self::UseCases,
        Self::Features,
        Self::Security,
        Self::Faq,
        Self::ReleaseNotes,
        Self::RequestAccess,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::UseCases => "/use-cases",
            Self::Features => "/features",
            Self::Security => "/security",
            Self::Faq => "/faq",
            Self::ReleaseNotes => "/release-notes",
            Self::RequestAccess => "/request-access",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum Route {
    Page(Page),
    /// Unmatched path; replace the history entry with the target.
    Redirect(Page),
}

impl Route {
    pub fn resolve(path: &str) -> Self {
        Page::ALL
            .into_iter()
            .find(|p| p.path() == path)
            .map_or(Self::Redirect(Page::Home), Self::Page)
    }

    /// Page that ends up rendered.
    pub fn page(self) -> Page {
        match self {
            Self::Page(p) | Self::Redirect(p) => p,
        }
    }
}

/// Scroll-cache key: a location's path, query and fragment.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub struct RouteKey {
    pub path: String,
    pub query: String,
    pub hash: String,
}

impl RouteKey {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: String::new(),
            hash: String::new(),
        }
    }

    /// Split a hash-router URL (`#/faq?x=1#pricing`) or bare location (`/faq?x=1#pricing`).
    ///
    /// `query` keeps its leading `?` and `hash` its leading `#`, so the parts concatenate
    /// back into the location.
    pub fn parse(url: &str) -> MotionResult<Self> {
        let loc = url.strip_prefix('#').unwrap_or(url);
        let loc = if loc.is_empty() { "/" } else { loc };
        if !loc.starts_with('/') {
            return Err(MotionError::route(format!(
                "location '{url}' must start with '/' or '#/'"
            )));
        }
        let (rest, hash) = match loc.find('#') {
            Some(i) => loc.split_at(i),
            None => (loc, ""),
        };
        let (path, query) = match rest.find('?') {
            Some(i) => rest.split_at(i),
            None => (rest, ""),
        };
        Ok(Self {
            path: path.to_string(),
            query: query.to_string(),
            hash: hash.to_string(),
        })
    }

    pub fn route(&self) -> Route {
        Route::resolve(&self.path)
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.path, self.query, self.hash)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum NavigationKind {
    Push,
    Replace,
    /// Back/forward.
    Pop,
}

/// The scrolling element plus the body overflow lock left by overlays.
pub trait Viewport {
    fn scroll_top(&self) -> f64;

    fn set_scroll_top(&mut self, top: f64);

    fn overflow_locked(&self) -> bool;

    fn unlock_overflow(&mut self);
}

/// Scroll offsets per [`RouteKey`], owned by the router integration.
#[derive(Clone, Debug, Default)]
pub struct ScrollRestorer {
    positions: HashMap<RouteKey, f64>,
}

impl ScrollRestorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, key: RouteKey, offset: f64) {
        self.positions.insert(key, offset.max(0.0));
    }

    pub fn get(&self, key: &RouteKey) -> Option<f64> {
        self.positions.get(key).copied()
    }

    /// Scroll event on the current location.
    pub fn on_scroll(&mut self, key: &RouteKey, viewport: &dyn Viewport) {
        self.record(key.clone(), viewport.scroll_top());
    }

    /// Apply the scroll position for a navigation that just landed on `key`.
    pub fn navigate(&mut self, key: &RouteKey, kind: NavigationKind, viewport: &mut dyn Viewport) {
        if viewport.overflow_locked() {
            viewport.unlock_overflow();
        }
        match kind {
            NavigationKind::Pop => {
                let top = self.get(key).unwrap_or(0.0);
                viewport.set_scroll_top(top);
            }
            NavigationKind::Push | NavigationKind::Replace => {
                viewport.set_scroll_top(0.0);
                self.record(key.clone(), 0.0);
            }
        }
        tracing::trace!(route = %key, ?kind, top = viewport.scroll_top(), "scroll applied");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Window {
        top: f64,
        locked: bool,
    }

    impl Viewport for Window {
        fn scroll_top(&self) -> f64 {
            self.top
        }

        fn set_scroll_top(&mut self, top: f64) {
            self.top = top;
        }

        fn overflow_locked(&self) -> bool {
            self.locked
        }

        fn unlock_overflow(&mut self) {
            self.locked = false;
        }
    }

    #[test]
    fn resolves_known_paths_and_redirects_the_rest() {
        assert_eq!(Route::resolve("/faq"), Route::Page(Page::Faq));
        assert_eq!(Route::resolve("/nope"), Route::Redirect(Page::Home));
        assert_eq!(Route::resolve("/nope").page(), Page::Home);
    }

    #[test]
    fn parses_hash_locations() {
        let key = RouteKey::parse("#/features?tab=budget#pricing").unwrap();
        assert_eq!(key.path, "/features");
        assert_eq!(key.query, "?tab=budget");
        assert_eq!(key.hash, "#pricing");
        assert_eq!(key.to_string(), "/features?tab=budget#pricing");
        assert_eq!(RouteKey::parse("#").unwrap(), RouteKey::new("/"));
        assert!(RouteKey::parse("faq").is_err());
    }

    #[test]
    fn pop_restores_and_push_resets() {
        let mut restorer = ScrollRestorer::new();
        let mut win = Window::default();
        let faq = RouteKey::new("/faq");
        let home = RouteKey::new("/");

        restorer.navigate(&faq, NavigationKind::Push, &mut win);
        win.top = 840.0;
        restorer.on_scroll(&faq, &win);

        win.locked = true;
        restorer.navigate(&home, NavigationKind::Push, &mut win);
        assert_eq!(win.top, 0.0);
        assert!(!win.locked);

        restorer.navigate(&faq, NavigationKind::Pop, &mut win);
        assert_eq!(win.top, 840.0);

        restorer.navigate(&RouteKey::new("/security"), NavigationKind::Pop, &mut win);
        assert_eq!(win.top, 0.0);
    }

    #[test]
    fn keys_differ_by_query_and_hash() {
        let mut restorer = ScrollRestorer::new();
        restorer.record(RouteKey::parse("/faq?a=1").unwrap(), 100.0);
        assert_eq!(restorer.get(&RouteKey::parse("/faq?a=1").unwrap()), Some(100.0));
        assert_eq!(restorer.get(&RouteKey::parse("/faq").unwrap()), None);
    }
}
