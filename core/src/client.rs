//! HTTP request builder and response parser for the catalog API.
//!
//! # Design
//! `CatalogClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`, so a
//! native host can drive the round-trip itself. The `fetch_*` helpers compose
//! the two over a [`Transport`] for hosts that run the async core directly.

use serde::Deserialize;

use crate::config::CatalogConfig;
use crate::error::CatalogError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport};
use crate::types::{CatalogPage, Character, EntityId, PageEnvelope, Resource, ResourceKind};

/// Stateless client for the catalog API.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    base_url: String,
}

impl CatalogClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &CatalogConfig) -> Self {
        Self::new(&config.base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_list_page(&self, kind: ResourceKind, page: u32) -> HttpRequest {
        get(format!("{}/{}?page={page}", self.base_url, kind.path()))
    }

    pub fn build_detail(&self, kind: ResourceKind, id: EntityId) -> HttpRequest {
        get(format!("{}/{}/{id}", self.base_url, kind.path()))
    }

    /// Build the batched character request. Returns `None` for an empty id
    /// list: upstream answers `/character/` with the first list page, not
    /// with an empty batch.
    pub fn build_characters_by_ids(&self, ids: &[EntityId]) -> Option<HttpRequest> {
        if ids.is_empty() {
            return None;
        }
        let joined = ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");
        Some(get(format!("{}/character/{joined}", self.base_url)))
    }

    /// Parse a list response for `page`. The next page number is derived from
    /// the envelope's `info.next` being non-null; a page number past `u32::MAX`
    /// reads as the end of the list.
    pub fn parse_list_page<T: Resource>(
        &self,
        page: u32,
        response: HttpResponse,
    ) -> Result<CatalogPage<T>, CatalogError> {
        check_status(&response)?;
        let envelope: PageEnvelope<T> = serde_json::from_str(&response.body)?;
        Ok(CatalogPage {
            results: envelope.results,
            next_page: envelope.info.next.and_then(|_| page.checked_add(1)),
        })
    }

    pub fn parse_detail<T: Resource>(&self, response: HttpResponse) -> Result<T, CatalogError> {
        check_status(&response)?;
        Ok(serde_json::from_str(&response.body)?)
    }

    /// Parse a batched character response. Upstream returns a bare object
    /// when exactly one id was requested; both shapes come out as a `Vec`.
    pub fn parse_characters_by_ids(
        &self,
        response: HttpResponse,
    ) -> Result<Vec<Character>, CatalogError> {
        check_status(&response)?;
        let batch: OneOrMany<Character> = serde_json::from_str(&response.body)?;
        Ok(batch.into_vec())
    }

    pub async fn fetch_page<T: Resource>(
        &self,
        transport: &impl Transport,
        page: u32,
    ) -> Result<CatalogPage<T>, CatalogError> {
        let response = transport.execute(self.build_list_page(T::KIND, page)).await?;
        self.parse_list_page(page, response)
    }

    pub async fn fetch_detail<T: Resource>(
        &self,
        transport: &impl Transport,
        id: EntityId,
    ) -> Result<T, CatalogError> {
        let response = transport.execute(self.build_detail(T::KIND, id)).await?;
        self.parse_detail(response)
    }

    pub async fn fetch_characters_by_ids(
        &self,
        transport: &impl Transport,
        ids: &[EntityId],
    ) -> Result<Vec<Character>, CatalogError> {
        let Some(request) = self.build_characters_by_ids(ids) else {
            return Ok(Vec::new());
        };
        let response = transport.execute(request).await?;
        self.parse_characters_by_ids(response)
    }

    /// `fetch_page` with failures degraded to an empty, final page.
    pub async fn list_page_or_empty<T: Resource>(
        &self,
        transport: &impl Transport,
        page: u32,
    ) -> CatalogPage<T> {
        match self.fetch_page(transport, page).await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!(kind = ?T::KIND, page, error = %e, "page fetch failed");
                CatalogPage::empty()
            }
        }
    }
}

fn get(path: String) -> HttpRequest {
    tracing::debug!(%path, "building request");
    HttpRequest {
        method: HttpMethod::Get,
        path,
        headers: vec![("accept".to_string(), "application/json".to_string())],
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

/// Map non-success status codes to the appropriate `CatalogError` variant.
fn check_status(response: &HttpResponse) -> Result<(), CatalogError> {
    if (200..300).contains(&response.status) {
        return Ok(());
    }
    if response.status == 404 {
        return Err(CatalogError::NotFound);
    }
    Err(CatalogError::Network {
        status: Some(response.status),
        message: response.body.clone(),
    })
}
