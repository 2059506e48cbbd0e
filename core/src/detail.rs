//! Detail screens: one entity plus a bounded amount of related data.
//!
//! # Design
//! Every aggregator resolves to a [`DetailState`] instead of a `Result`, so
//! the UI can tell "does not exist" apart from "could not load" without ever
//! seeing an error value. Related records are best-effort: a failed episode or
//! character lookup shrinks the related list, it never fails the screen.

use futures::future::join_all;
use serde::Serialize;

use crate::client::CatalogClient;
use crate::error::{CatalogError, ErrorKind};
use crate::favorites::FavoritesSet;
use crate::http::Transport;
use crate::types::{ref_id, Character, EntityId, Episode, Location, Resource};

/// Episodes resolved for a character detail view. Bounds request fan-out.
pub const MAX_EPISODES: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailState<T> {
    Loading,
    Ready(T),
    /// The API answered that the entity does not exist.
    NotFound,
    /// The entity could not be loaded (transport, status or body problem).
    Failed(ErrorKind),
}

impl<T> DetailState<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            DetailState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> DetailState<U> {
        match self {
            DetailState::Loading => DetailState::Loading,
            DetailState::Ready(value) => DetailState::Ready(f(value)),
            DetailState::NotFound => DetailState::NotFound,
            DetailState::Failed(kind) => DetailState::Failed(kind),
        }
    }
}

impl<T> From<Result<T, CatalogError>> for DetailState<T> {
    fn from(result: Result<T, CatalogError>) -> Self {
        match result {
            Ok(value) => DetailState::Ready(value),
            Err(CatalogError::NotFound) => DetailState::NotFound,
            Err(e) => DetailState::Failed(e.kind()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CharacterDetailView {
    pub character: Character,
    /// At most [`MAX_EPISODES`], in the character's episode order.
    pub episodes: Vec<Episode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EpisodeDetailView {
    pub episode: Episode,
    pub characters: Vec<Character>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationDetailView {
    pub location: Location,
    pub resident_count: usize,
}

/// Fetch one entity, degrading failures to a sentinel.
pub async fn get_detail<T: Resource>(
    client: &CatalogClient,
    transport: &impl Transport,
    id: EntityId,
) -> DetailState<T> {
    let result = client.fetch_detail::<T>(transport, id).await;
    if let Err(e) = &result {
        tracing::warn!(kind = ?T::KIND, id, error = %e, "detail fetch failed");
    }
    result.into()
}

/// Character plus its first [`MAX_EPISODES`] episodes.
///
/// Episode fetches run concurrently; the output keeps `episode_refs` order
/// regardless of completion order, and failed lookups are left out.
pub async fn get_character_detail(
    client: &CatalogClient,
    transport: &impl Transport,
    id: EntityId,
) -> DetailState<CharacterDetailView> {
    let character = match get_detail::<Character>(client, transport, id).await {
        DetailState::Ready(character) => character,
        DetailState::Loading => return DetailState::Loading,
        DetailState::NotFound => return DetailState::NotFound,
        DetailState::Failed(kind) => return DetailState::Failed(kind),
    };

    let lookups = character
        .episode_refs
        .iter()
        .take(MAX_EPISODES)
        .filter_map(|url| {
            let id = ref_id(url);
            if id.is_none() {
                tracing::warn!(%url, "episode reference without id skipped");
            }
            id
        })
        .map(|episode_id| async move {
            (episode_id, client.fetch_detail::<Episode>(transport, episode_id).await)
        });

    let episodes = join_all(lookups)
        .await
        .into_iter()
        .filter_map(|(episode_id, result)| match result {
            Ok(episode) => Some(episode),
            Err(e) => {
                tracing::warn!(character = id, episode = episode_id, error = %e, "episode omitted");
                None
            }
        })
        .collect();

    DetailState::Ready(CharacterDetailView { character, episodes })
}

/// Episode plus every character appearing in it, fetched in one batch.
pub async fn get_episode_detail(
    client: &CatalogClient,
    transport: &impl Transport,
    id: EntityId,
) -> DetailState<EpisodeDetailView> {
    let episode = match get_detail::<Episode>(client, transport, id).await {
        DetailState::Ready(episode) => episode,
        DetailState::Loading => return DetailState::Loading,
        DetailState::NotFound => return DetailState::NotFound,
        DetailState::Failed(kind) => return DetailState::Failed(kind),
    };

    let ids: Vec<EntityId> = episode.character_refs.iter().filter_map(|url| ref_id(url)).collect();
    let characters = client
        .fetch_characters_by_ids(transport, &ids)
        .await
        .unwrap_or_else(|e| {
            tracing::warn!(episode = id, error = %e, "episode cast unavailable");
            Vec::new()
        });

    DetailState::Ready(EpisodeDetailView { episode, characters })
}

pub async fn get_location_detail(
    client: &CatalogClient,
    transport: &impl Transport,
    id: EntityId,
) -> DetailState<LocationDetailView> {
    get_detail::<Location>(client, transport, id)
        .await
        .map(|location| LocationDetailView {
            resident_count: location.resident_refs.len(),
            location,
        })
}

/// Resolve favorite ids to characters in favorites order. Ids the API no
/// longer knows are simply absent from the result, including the 404 a
/// single unknown id produces. Any other failure is reported as `Failed`.
pub async fn get_favorite_characters(
    client: &CatalogClient,
    transport: &impl Transport,
    favorites: &FavoritesSet,
) -> DetailState<Vec<Character>> {
    let mut characters = match client.fetch_characters_by_ids(transport, favorites.ids()).await {
        Ok(characters) => characters,
        Err(CatalogError::NotFound) => Vec::new(),
        Err(e) => {
            tracing::warn!(count = favorites.len(), error = %e, "favorites unavailable");
            return DetailState::Failed(e.kind());
        }
    };
    characters.retain(|c| favorites.contains(c.id));
    characters.sort_by_key(|c| favorites.ids().iter().position(|&id| id == c.id));
    DetailState::Ready(characters)
}
