//! Domain records for the catalog API.
//!
//! # Design
//! Field names follow the upstream wire format through `serde` renames, so the
//! same types serialize back into the shape the host already knows. Every
//! field the screens rely on is required: a body missing one fails to parse
//! instead of surfacing a half-filled record.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Server-assigned, stable entity identifier.
pub type EntityId = u32;

/// The three resource collections exposed by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Character,
    Episode,
    Location,
}

impl ResourceKind {
    /// Path segment of the collection under the API base URL.
    pub fn path(self) -> &'static str {
        match self {
            ResourceKind::Character => "character",
            ResourceKind::Episode => "episode",
            ResourceKind::Location => "location",
        }
    }
}

/// A record that lives in one of the API collections.
pub trait Resource: DeserializeOwned + Serialize + Clone {
    const KIND: ResourceKind;

    fn id(&self) -> EntityId;
    fn name(&self) -> &str;
}

/// Name and URL of a related location, as embedded in a character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceRef {
    pub name: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub id: EntityId,
    pub name: String,
    pub status: String,
    pub species: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub gender: String,
    pub origin: PlaceRef,
    pub location: PlaceRef,
    pub image: String,
    #[serde(rename = "episode")]
    pub episode_refs: Vec<String>,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    pub id: EntityId,
    pub name: String,
    pub air_date: String,
    /// Season/episode code such as `S01E01`.
    #[serde(rename = "episode")]
    pub code: String,
    #[serde(rename = "characters")]
    pub character_refs: Vec<String>,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: EntityId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub dimension: String,
    #[serde(rename = "residents")]
    pub resident_refs: Vec<String>,
    #[serde(default)]
    pub url: String,
}

impl Resource for Character {
    const KIND: ResourceKind = ResourceKind::Character;

    fn id(&self) -> EntityId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Resource for Episode {
    const KIND: ResourceKind = ResourceKind::Episode;

    fn id(&self) -> EntityId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Resource for Location {
    const KIND: ResourceKind = ResourceKind::Location;

    fn id(&self) -> EntityId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// One page of list results plus the continuation indicator.
///
/// `next_page` is the only source of truth for continuation, so "has next"
/// and "next page number present" cannot disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogPage<T> {
    pub results: Vec<T>,
    pub next_page: Option<u32>,
}

impl<T> CatalogPage<T> {
    /// The degraded page handed out when a fetch fails.
    pub fn empty() -> Self {
        Self {
            results: Vec::new(),
            next_page: None,
        }
    }

    pub fn has_next(&self) -> bool {
        self.next_page.is_some()
    }
}

/// Wire envelope of list endpoints: `{ info: {...}, results: [...] }`.
#[derive(Debug, Deserialize)]
pub(crate) struct PageEnvelope<T> {
    pub info: PageInfo,
    pub results: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PageInfo {
    pub next: Option<String>,
}

/// Extract the trailing numeric id from a reference URL such as
/// `https://rickandmortyapi.com/api/episode/28`.
pub fn ref_id(url: &str) -> Option<EntityId> {
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .and_then(|segment| segment.parse().ok())
        .filter(|id| *id > 0)
}
