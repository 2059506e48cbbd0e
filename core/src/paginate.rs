//! Fetch-and-accumulate pagination for list screens.
//!
//! # Design
//! `Paginator` is sans-IO: `begin` hands out a [`PageTicket`] naming the page
//! to fetch, and `complete` applies the outcome. Only one ticket can be
//! outstanding, so rapid repeated "load more" requests collapse into a single
//! fetch. A failed fetch leaves the page counter where it was, which makes the
//! next "load more" retry the same page. Completions that arrive after
//! `detach` (screen unmounted) are dropped.
//!
//! Results are appended in the order received and never deduplicated.

use crate::client::CatalogClient;
use crate::error::{CatalogError, ErrorKind};
use crate::http::Transport;
use crate::types::{CatalogPage, Resource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageState {
    /// Mounted, first page not requested yet (or its fetch failed).
    Idle,
    LoadingFirst,
    /// At least one page loaded and the server reported more.
    Ready,
    LoadingMore,
    /// The last fetched page had no successor. Terminal.
    Exhausted,
    /// The owning screen was unmounted. Terminal.
    Detached,
}

/// Permission to fetch one page. Issued by [`Paginator::begin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageTicket {
    page: u32,
}

impl PageTicket {
    pub fn page(&self) -> u32 {
        self.page
    }
}

/// What `complete` did with a fetch outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied { added: usize },
    /// The fetch failed; nothing was appended and the counter did not move.
    Failed(ErrorKind),
    /// The ticket no longer matches the paginator (detached or superseded).
    Discarded,
    /// `begin` refused to start a fetch (already loading, exhausted, detached).
    Skipped,
}

#[derive(Debug)]
pub struct Paginator<T> {
    items: Vec<T>,
    page: u32,
    state: PageState,
    last_error: Option<ErrorKind>,
}

impl<T> Default for Paginator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Paginator<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            page: 1,
            state: PageState::Idle,
            last_error: None,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn state(&self) -> PageState {
        self.state
    }

    /// Page number the next successful fetch will load.
    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn has_more(&self) -> bool {
        matches!(
            self.state,
            PageState::Idle | PageState::LoadingFirst | PageState::Ready | PageState::LoadingMore
        )
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, PageState::LoadingFirst | PageState::LoadingMore)
    }

    /// Error of the most recent fetch, cleared by the next success.
    pub fn last_error(&self) -> Option<ErrorKind> {
        self.last_error
    }

    /// Start a fetch if one is allowed. Returns `None` while a fetch is in
    /// flight, after exhaustion, and after detach.
    pub fn begin(&mut self) -> Option<PageTicket> {
        self.state = match self.state {
            PageState::Idle => PageState::LoadingFirst,
            PageState::Ready => PageState::LoadingMore,
            other => {
                tracing::debug!(state = ?other, page = self.page, "load request ignored");
                return None;
            }
        };
        tracing::debug!(page = self.page, "page fetch started");
        Some(PageTicket { page: self.page })
    }

    /// Apply the outcome of the fetch authorized by `ticket`.
    pub fn complete(
        &mut self,
        ticket: PageTicket,
        outcome: Result<CatalogPage<T>, CatalogError>,
    ) -> Completion {
        if !self.is_loading() || ticket.page != self.page {
            tracing::debug!(page = ticket.page, state = ?self.state, "stale page completion dropped");
            return Completion::Discarded;
        }
        match outcome {
            Ok(page) => {
                let added = page.results.len();
                self.items.extend(page.results);
                let next = self.page.checked_add(1);
                if let Some(n) = next {
                    self.page = n;
                }
                self.last_error = None;
                self.state = if page.next_page.is_some() && next.is_some() {
                    PageState::Ready
                } else {
                    PageState::Exhausted
                };
                tracing::debug!(added, total = self.items.len(), state = ?self.state, "page applied");
                Completion::Applied { added }
            }
            Err(e) => {
                tracing::warn!(page = self.page, error = %e, "page fetch failed");
                self.state = match self.state {
                    PageState::LoadingFirst => PageState::Idle,
                    _ => PageState::Ready,
                };
                self.last_error = Some(e.kind());
                Completion::Failed(e.kind())
            }
        }
    }

    /// Mark the owning screen as gone. Later completions become no-ops.
    pub fn detach(&mut self) {
        self.state = PageState::Detached;
    }
}

impl<T: Resource> Paginator<T> {
    /// Fetch and apply the next page through `transport`.
    pub async fn load_next(
        &mut self,
        client: &CatalogClient,
        transport: &impl Transport,
    ) -> Completion {
        let Some(ticket) = self.begin() else {
            return Completion::Skipped;
        };
        let outcome = client.fetch_page(transport, ticket.page()).await;
        self.complete(ticket, outcome)
    }
}
