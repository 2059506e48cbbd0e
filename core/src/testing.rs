//! Fixtures and an in-memory transport shared by the unit tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use serde_json::{json, Value};

use crate::error::CatalogError;
use crate::http::{HttpRequest, HttpResponse, Transport};

pub const BASE: &str = "http://mock/api";

pub fn character_json(id: u32, name: &str) -> Value {
    character_with_episodes(id, name, &[1])
}

pub fn character_with_episodes(id: u32, name: &str, episodes: &[u32]) -> Value {
    json!({
        "id": id,
        "name": name,
        "status": "Alive",
        "species": "Human",
        "type": "",
        "gender": "Male",
        "origin": {"name": "Earth (C-137)", "url": format!("{BASE}/location/1")},
        "location": {"name": "Citadel of Ricks", "url": format!("{BASE}/location/3")},
        "image": format!("{BASE}/character/avatar/{id}.jpeg"),
        "episode": episodes.iter().map(|e| format!("{BASE}/episode/{e}")).collect::<Vec<_>>(),
        "url": format!("{BASE}/character/{id}"),
    })
}

pub fn episode_json(id: u32, name: &str, characters: &[u32]) -> Value {
    json!({
        "id": id,
        "name": name,
        "air_date": "December 2, 2013",
        "episode": format!("S01E{id:02}"),
        "characters": characters.iter().map(|c| format!("{BASE}/character/{c}")).collect::<Vec<_>>(),
        "url": format!("{BASE}/episode/{id}"),
    })
}

pub fn location_json(id: u32, name: &str, residents: &[u32]) -> Value {
    json!({
        "id": id,
        "name": name,
        "type": "Planet",
        "dimension": "Dimension C-137",
        "residents": residents.iter().map(|c| format!("{BASE}/character/{c}")).collect::<Vec<_>>(),
        "url": format!("{BASE}/location/{id}"),
    })
}

pub fn list_body(results: &[Value], has_next: bool) -> String {
    let next = has_next.then(|| format!("{BASE}/character?page=2"));
    json!({
        "info": {
            "count": results.len(),
            "pages": 1,
            "next": next,
            "prev": null,
        },
        "results": results,
    })
    .to_string()
}

struct Route {
    status: u16,
    body: String,
    delay: Duration,
}

/// Transport that answers from a path table and records every request.
/// Unknown paths fail as transport errors.
#[derive(Default)]
pub struct MockTransport {
    routes: HashMap<String, Route>,
    requests: Mutex<Vec<String>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, path: &str, status: u16, body: impl Into<String>) -> Self {
        self.respond_after(path, status, body, Duration::ZERO)
    }

    pub fn respond_after(
        mut self,
        path: &str,
        status: u16,
        body: impl Into<String>,
        delay: Duration,
    ) -> Self {
        self.routes.insert(
            format!("{BASE}{path}"),
            Route {
                status,
                body: body.into(),
                delay,
            },
        );
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl Transport for MockTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, CatalogError> {
        self.requests.lock().unwrap().push(request.path.clone());
        let Some(route) = self.routes.get(&request.path) else {
            return Err(CatalogError::transport(format!("no route for {}", request.path)));
        };
        if !route.delay.is_zero() {
            tokio::time::sleep(route.delay).await;
        }
        Ok(HttpResponse::new(route.status, route.body.clone()))
    }
}
