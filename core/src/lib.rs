//! Client core for browsing a public franchise catalog (characters, episodes,
//! locations).
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern), and layers the screen logic on
//! top: fetch-and-accumulate pagination, persisted favorites, detail
//! aggregation and client-side name search.
//!
//! # Design
//! - `CatalogClient` is stateless; it holds only `base_url`.
//! - Each endpoint is split into `build_*` and `parse_*`, so the I/O boundary
//!   is explicit. The async `fetch_*` helpers run the pair over a `Transport`.
//! - Screen state (`ListScreen`, `CharactersScreen`) is owned per screen
//!   session; favorites persistence is an injected `KeyValueStore`.
//! - Failures surface to the UI as sentinels (`CatalogPage::empty`,
//!   `DetailState::NotFound` / `Failed`), never as panics.

pub mod client;
pub mod config;
pub mod detail;
pub mod error;
pub mod favorites;
pub mod http;
pub mod navigation;
pub mod paginate;
pub mod screen;
pub mod search;
#[cfg(feature = "reqwest")]
pub mod transport;
pub mod types;

#[cfg(test)]
mod testing;

pub use client::CatalogClient;
pub use config::CatalogConfig;
pub use detail::{
    get_character_detail, get_detail, get_episode_detail, get_favorite_characters,
    get_location_detail, CharacterDetailView, DetailState, EpisodeDetailView, LocationDetailView,
    MAX_EPISODES,
};
pub use error::{CatalogError, ErrorKind};
pub use favorites::{FavoritesSet, FavoritesStore, FileStore, KeyValueStore, MemoryStore};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use navigation::{Navigator, Route, RouteStack};
pub use paginate::{Completion, PageState, PageTicket, Paginator};
pub use screen::{CharacterRow, CharactersScreen, EpisodesScreen, ListScreen, LocationsScreen};
pub use search::filter_by_name;
#[cfg(feature = "reqwest")]
pub use transport::ReqwestTransport;
pub use types::{
    ref_id, CatalogPage, Character, EntityId, Episode, Location, PlaceRef, Resource, ResourceKind,
};
