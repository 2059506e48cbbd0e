use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::net::TcpListener;

pub const PAGE_SIZE: usize = 20;
pub const CHARACTER_COUNT: u32 = 45;
pub const EPISODE_COUNT: u32 = 26;
pub const LOCATION_COUNT: u32 = 12;

const NAMES: &[&str] = &[
    "Rick Sanchez",
    "Morty Smith",
    "Summer Smith",
    "Beth Smith",
    "Jerry Smith",
    "Abadango Cluster Princess",
    "Abradolf Lincler",
    "Adjudicator Rick",
    "Agency Director",
    "Alan Rails",
];

const LOCATION_NAMES: &[&str] = &[
    "Earth (C-137)",
    "Abadango",
    "Citadel of Ricks",
    "Worldender's lair",
    "Anatomy Park",
    "Interdimensional Cable",
];

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NamedUrl {
    pub name: String,
    pub url: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Character {
    pub id: u32,
    pub name: String,
    pub status: String,
    pub species: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub gender: String,
    pub origin: NamedUrl,
    pub location: NamedUrl,
    pub image: String,
    pub episode: Vec<String>,
    pub url: String,
    pub created: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Episode {
    pub id: u32,
    pub name: String,
    pub air_date: String,
    pub episode: String,
    pub characters: Vec<String>,
    pub url: String,
    pub created: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Location {
    pub id: u32,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub dimension: String,
    pub residents: Vec<String>,
    pub url: String,
    pub created: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PageInfo {
    pub count: usize,
    pub pages: usize,
    pub next: Option<String>,
    pub prev: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Page<T> {
    pub info: PageInfo,
    pub results: Vec<T>,
}

/// Deterministic catalog shared by all handlers.
#[derive(Debug)]
pub struct Catalog {
    pub base: String,
    pub characters: Vec<Character>,
    pub episodes: Vec<Episode>,
    pub locations: Vec<Location>,
}

const CREATED: &str = "2017-11-04T18:48:46.250Z";

/// Episodes character `id` appears in, ascending.
fn episodes_of(id: u32) -> Vec<u32> {
    let appearances = 1 + id % 9;
    let mut eps: Vec<u32> = (0..appearances)
        .map(|k| (id + k * 3) % EPISODE_COUNT + 1)
        .collect();
    eps.sort_unstable();
    eps.dedup();
    eps
}

fn location_of(id: u32) -> u32 {
    id % LOCATION_COUNT + 1
}

fn location_name(id: u32) -> String {
    match LOCATION_NAMES.get(id as usize - 1) {
        Some(name) => name.to_string(),
        None => format!("Location {id}"),
    }
}

impl Catalog {
    pub fn seeded(base: &str) -> Self {
        let base = base.trim_end_matches('/').to_string();

        let characters: Vec<Character> = (1..=CHARACTER_COUNT)
            .map(|id| {
                let name = match NAMES.get(id as usize - 1) {
                    Some(name) => name.to_string(),
                    None => format!("Character {id}"),
                };
                let origin = location_of(id + 1);
                let location = location_of(id);
                Character {
                    id,
                    name,
                    status: ["Alive", "Dead", "unknown"][id as usize % 3].to_string(),
                    species: ["Human", "Alien"][id as usize % 2].to_string(),
                    kind: String::new(),
                    gender: ["Male", "Female"][id as usize % 2].to_string(),
                    origin: NamedUrl {
                        name: location_name(origin),
                        url: format!("{base}/location/{origin}"),
                    },
                    location: NamedUrl {
                        name: location_name(location),
                        url: format!("{base}/location/{location}"),
                    },
                    image: format!("{base}/character/avatar/{id}.jpeg"),
                    episode: episodes_of(id)
                        .into_iter()
                        .map(|e| format!("{base}/episode/{e}"))
                        .collect(),
                    url: format!("{base}/character/{id}"),
                    created: CREATED.to_string(),
                }
            })
            .collect();

        let episodes = (1..=EPISODE_COUNT)
            .map(|id| Episode {
                id,
                name: format!("Episode {id}"),
                air_date: format!("December {}, 2013", id % 28 + 1),
                episode: format!("S{:02}E{:02}", (id - 1) / 11 + 1, (id - 1) % 11 + 1),
                characters: (1..=CHARACTER_COUNT)
                    .filter(|c| episodes_of(*c).contains(&id))
                    .map(|c| format!("{base}/character/{c}"))
                    .collect(),
                url: format!("{base}/episode/{id}"),
                created: CREATED.to_string(),
            })
            .collect();

        let locations = (1..=LOCATION_COUNT)
            .map(|id| Location {
                id,
                name: location_name(id),
                kind: "Planet".to_string(),
                dimension: "Dimension C-137".to_string(),
                residents: (1..=CHARACTER_COUNT)
                    .filter(|c| location_of(*c) == id)
                    .map(|c| format!("{base}/character/{c}"))
                    .collect(),
                url: format!("{base}/location/{id}"),
                created: CREATED.to_string(),
            })
            .collect();

        Self {
            base,
            characters,
            episodes,
            locations,
        }
    }
}

pub type Db = Arc<Catalog>;

#[derive(Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

/// Router with refs pointing at `http://localhost:3000/api`.
pub fn app() -> Router {
    app_with_base("http://localhost:3000/api")
}

pub fn app_with_base(base: &str) -> Router {
    let db: Db = Arc::new(Catalog::seeded(base));
    Router::new()
        .route("/api/character", get(list_characters))
        .route("/api/character/{ids}", get(get_characters))
        .route("/api/episode", get(list_episodes))
        .route("/api/episode/{ids}", get(get_episodes))
        .route("/api/location", get(list_locations))
        .route("/api/location/{ids}", get(get_locations))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    axum::serve(listener, app_with_base(&format!("http://{addr}/api"))).await
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn paginate<T: Serialize + Clone>(
    items: &[T],
    base: &str,
    collection: &str,
    query: PageQuery,
) -> Response {
    let page = match query.page.as_deref() {
        None => 1,
        Some(raw) => match raw.parse::<usize>() {
            Ok(page) => page,
            Err(_) => return error(StatusCode::NOT_FOUND, "There is nothing here"),
        },
    };
    let pages = items.len().div_ceil(PAGE_SIZE);
    if page == 0 || page > pages {
        return error(StatusCode::NOT_FOUND, "There is nothing here");
    }
    tracing::info!(collection, page, "list");

    let start = (page - 1) * PAGE_SIZE;
    let end = (start + PAGE_SIZE).min(items.len());
    let link = |p: usize| format!("{base}/{collection}?page={p}");
    Json(Page {
        info: PageInfo {
            count: items.len(),
            pages,
            next: (page < pages).then(|| link(page + 1)),
            prev: (page > 1).then(|| link(page - 1)),
        },
        results: items[start..end].to_vec(),
    })
    .into_response()
}

/// Single id → bare object (404 if absent); several ids → array of the ones
/// that exist, in id-list order.
fn lookup<T: Serialize + Clone>(
    items: &[T],
    id_of: impl Fn(&T) -> u32,
    ids: &str,
    missing: &str,
) -> Response {
    let parsed: Result<Vec<u32>, _> = ids.split(',').map(|s| s.trim().parse::<u32>()).collect();
    let Ok(parsed) = parsed else {
        return error(StatusCode::BAD_REQUEST, "Hey! you must provide an id");
    };
    let find = |id: u32| items.iter().find(|item| id_of(item) == id).cloned();
    tracing::info!(ids, "lookup");

    if parsed.len() == 1 && !ids.contains(',') {
        return match find(parsed[0]) {
            Some(item) => Json(item).into_response(),
            None => error(StatusCode::NOT_FOUND, missing),
        };
    }
    let found: Vec<T> = parsed.into_iter().filter_map(find).collect();
    Json(found).into_response()
}

async fn list_characters(State(db): State<Db>, Query(q): Query<PageQuery>) -> Response {
    paginate(&db.characters, &db.base, "character", q)
}

async fn get_characters(State(db): State<Db>, Path(ids): Path<String>) -> Response {
    lookup(&db.characters, |c| c.id, &ids, "Character not found")
}

async fn list_episodes(State(db): State<Db>, Query(q): Query<PageQuery>) -> Response {
    paginate(&db.episodes, &db.base, "episode", q)
}

async fn get_episodes(State(db): State<Db>, Path(ids): Path<String>) -> Response {
    lookup(&db.episodes, |e| e.id, &ids, "Episode not found")
}

async fn list_locations(State(db): State<Db>, Query(q): Query<PageQuery>) -> Response {
    paginate(&db.locations, &db.base, "location", q)
}

async fn get_locations(State(db): State<Db>, Path(ids): Path<String>) -> Response {
    lookup(&db.locations, |l| l.id, &ids, "Location not found")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_catalog_sizes() {
        let catalog = Catalog::seeded("http://x/api");
        assert_eq!(catalog.characters.len(), CHARACTER_COUNT as usize);
        assert_eq!(catalog.episodes.len(), EPISODE_COUNT as usize);
        assert_eq!(catalog.locations.len(), LOCATION_COUNT as usize);
        assert_eq!(catalog.characters[0].name, "Rick Sanchez");
    }

    #[test]
    fn character_serializes_with_wire_names() {
        let catalog = Catalog::seeded("http://x/api");
        let json = serde_json::to_value(&catalog.characters[0]).unwrap();
        assert_eq!(json["type"], "");
        assert!(json["episode"].as_array().is_some());
        assert!(json.get("kind").is_none());
    }

    #[test]
    fn episode_and_character_refs_agree() {
        let catalog = Catalog::seeded("http://x/api");
        for character in &catalog.characters {
            assert!(!character.episode.is_empty());
            for url in &character.episode {
                let ep_id: usize = url.rsplit('/').next().unwrap().parse().unwrap();
                let episode = &catalog.episodes[ep_id - 1];
                assert!(episode.characters.contains(&character.url));
            }
        }
    }

    #[test]
    fn some_character_has_more_than_five_episodes() {
        let catalog = Catalog::seeded("http://x/api");
        assert!(catalog.characters.iter().any(|c| c.episode.len() > 5));
    }

    #[test]
    fn residents_cover_every_character_once() {
        let catalog = Catalog::seeded("http://x/api");
        let total: usize = catalog.locations.iter().map(|l| l.residents.len()).sum();
        assert_eq!(total, CHARACTER_COUNT as usize);
    }

    #[test]
    fn episode_codes_roll_over_seasons() {
        let catalog = Catalog::seeded("http://x/api");
        assert_eq!(catalog.episodes[0].episode, "S01E01");
        assert_eq!(catalog.episodes[11].episode, "S02E01");
    }
}
