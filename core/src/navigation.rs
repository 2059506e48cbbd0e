//! Screen routes and the navigation capability.
//!
//! The core never performs navigation itself; it asks a host-supplied
//! [`Navigator`] to show a [`Route`].

use serde::{Deserialize, Serialize};

use crate::types::{EntityId, ResourceKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum Route {
    Characters,
    CharacterDetail { character_id: EntityId },
    Episodes,
    EpisodeDetail { episode_id: EntityId },
    Locations,
    LocationDetail { location_id: EntityId },
    Favorites,
}

impl Route {
    /// Detail route for an entity of `kind`.
    pub fn detail(kind: ResourceKind, id: EntityId) -> Self {
        match kind {
            ResourceKind::Character => Route::CharacterDetail { character_id: id },
            ResourceKind::Episode => Route::EpisodeDetail { episode_id: id },
            ResourceKind::Location => Route::LocationDetail { location_id: id },
        }
    }
}

pub trait Navigator {
    fn navigate(&mut self, route: Route);
}

/// Stack-based navigator for hosts that keep their history in the core.
#[derive(Debug, Clone)]
pub struct RouteStack {
    routes: Vec<Route>,
}

impl RouteStack {
    pub fn new(root: Route) -> Self {
        Self { routes: vec![root] }
    }

    pub fn current(&self) -> Route {
        // The root is never popped.
        self.routes[self.routes.len() - 1]
    }

    /// Go back one screen. Returns `false` at the root.
    pub fn back(&mut self) -> bool {
        if self.routes.len() > 1 {
            self.routes.pop();
            true
        } else {
            false
        }
    }

    pub fn depth(&self) -> usize {
        self.routes.len()
    }
}

impl Navigator for RouteStack {
    fn navigate(&mut self, route: Route) {
        tracing::debug!(?route, "navigate");
        self.routes.push(route);
    }
}
