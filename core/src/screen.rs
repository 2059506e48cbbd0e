//! Per-screen controllers for the list screens.
//!
//! # Design
//! Each controller owns its session state: the accumulated list, the search
//! query and, for characters, the favorites. Nothing is global; a screen is
//! created on mount and dropped on unmount. Hosts that drive I/O themselves
//! use `begin_load` / `complete_load`; everyone else awaits `load_more`.

use serde::Serialize;

use crate::client::CatalogClient;
use crate::error::CatalogError;
use crate::favorites::{FavoritesStore, KeyValueStore};
use crate::http::Transport;
use crate::navigation::{Navigator, Route};
use crate::paginate::{Completion, PageState, PageTicket, Paginator};
use crate::search::filter_by_name;
use crate::types::{CatalogPage, Character, EntityId, Episode, Location, Resource};

/// A paginated, searchable list of one resource kind.
#[derive(Debug)]
pub struct ListScreen<T> {
    paginator: Paginator<T>,
    query: String,
}

pub type EpisodesScreen = ListScreen<Episode>;
pub type LocationsScreen = ListScreen<Location>;

impl<T: Resource> Default for ListScreen<T> {
    fn default() -> Self {
        Self::mount()
    }
}

impl<T: Resource> ListScreen<T> {
    pub fn mount() -> Self {
        Self {
            paginator: Paginator::new(),
            query: String::new(),
        }
    }

    /// Load the first page. A no-op once the screen has loaded anything.
    pub async fn activate(
        &mut self,
        client: &CatalogClient,
        transport: &impl Transport,
    ) -> Completion {
        if self.paginator.state() != PageState::Idle {
            return Completion::Skipped;
        }
        self.paginator.load_next(client, transport).await
    }

    pub async fn load_more(
        &mut self,
        client: &CatalogClient,
        transport: &impl Transport,
    ) -> Completion {
        self.paginator.load_next(client, transport).await
    }

    pub fn begin_load(&mut self) -> Option<PageTicket> {
        self.paginator.begin()
    }

    pub fn complete_load(
        &mut self,
        ticket: PageTicket,
        outcome: Result<CatalogPage<T>, CatalogError>,
    ) -> Completion {
        self.paginator.complete(ticket, outcome)
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// The accumulated list filtered by the current query.
    pub fn visible(&self) -> Vec<&T> {
        filter_by_name(self.paginator.items(), &self.query)
    }

    pub fn items(&self) -> &[T] {
        self.paginator.items()
    }

    pub fn paginator(&self) -> &Paginator<T> {
        &self.paginator
    }

    /// Ask the host to show the detail screen for `id`.
    pub fn open(&self, id: EntityId, navigator: &mut impl Navigator) {
        navigator.navigate(Route::detail(T::KIND, id));
    }

    /// Late completions for this screen are dropped from now on.
    pub fn unmount(&mut self) {
        self.paginator.detach();
    }
}

/// A visible character row with its favorite indicator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CharacterRow<'a> {
    pub character: &'a Character,
    pub favorite: bool,
}

/// The character list: a [`ListScreen`] plus favorites.
#[derive(Debug)]
pub struct CharactersScreen<S> {
    list: ListScreen<Character>,
    favorites: FavoritesStore<S>,
}

impl<S: KeyValueStore> CharactersScreen<S> {
    /// Mount the screen; favorites are read from `store` right away.
    pub fn mount(store: S, favorites_key: &str) -> Self {
        Self {
            list: ListScreen::mount(),
            favorites: FavoritesStore::open(store, favorites_key),
        }
    }

    pub fn list(&self) -> &ListScreen<Character> {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut ListScreen<Character> {
        &mut self.list
    }

    pub fn favorites(&self) -> &FavoritesStore<S> {
        &self.favorites
    }

    /// Flip the favorite flag of `id`. Returns the new flag.
    pub fn toggle_favorite(&mut self, id: EntityId) -> Result<bool, CatalogError> {
        Ok(self.favorites.toggle(id)?.contains(id))
    }

    pub fn is_favorite(&self, id: EntityId) -> bool {
        self.favorites.is_favorite(id)
    }

    pub fn rows(&self) -> Vec<CharacterRow<'_>> {
        self.list
            .visible()
            .into_iter()
            .map(|character| CharacterRow {
                character,
                favorite: self.favorites.is_favorite(character.id),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::favorites::MemoryStore;
    use crate::navigation::RouteStack;
    use crate::testing::{character_json, episode_json, list_body, MockTransport, BASE};

    fn page_one_of_two() -> MockTransport {
        let first: Vec<_> = (1..=20).map(|id| character_json(id, &format!("Character {id}"))).collect();
        let second: Vec<_> = (21..=40).map(|id| character_json(id, &format!("Character {id}"))).collect();
        MockTransport::new()
            .respond("/character?page=1", 200, list_body(&first, true))
            .respond("/character?page=2", 200, list_body(&second, false))
    }

    #[tokio::test]
    async fn characters_screen_pages_to_exhaustion() {
        let transport = page_one_of_two();
        let client = CatalogClient::new(BASE);
        let mut screen = CharactersScreen::mount(MemoryStore::new(), "favorites");

        screen.list_mut().activate(&client, &transport).await;
        assert_eq!(screen.list().items().len(), 20);
        assert!(screen.list().paginator().has_more());

        screen.list_mut().load_more(&client, &transport).await;
        assert_eq!(screen.list().items().len(), 40);
        assert_eq!(screen.list().paginator().state(), PageState::Exhausted);

        let outcome = screen.list_mut().load_more(&client, &transport).await;
        assert_eq!(outcome, Completion::Skipped);
        assert_eq!(screen.list().items().len(), 40);
        assert_eq!(transport.requests().len(), 2);
    }

    #[tokio::test]
    async fn activate_twice_fetches_once() {
        let transport = page_one_of_two();
        let client = CatalogClient::new(BASE);
        let mut screen: ListScreen<Character> = ListScreen::mount();
        screen.activate(&client, &transport).await;
        assert_eq!(screen.activate(&client, &transport).await, Completion::Skipped);
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn search_filters_accumulated_list_and_rows_show_favorites() {
        let transport = page_one_of_two();
        let client = CatalogClient::new(BASE);
        let store = MemoryStore::new().with_value("favorites", "[2,12]");
        let mut screen = CharactersScreen::mount(store, "favorites");
        screen.list_mut().activate(&client, &transport).await;

        screen.list_mut().set_query("character 1");
        let rows = screen.rows();
        let ids: Vec<_> = rows.iter().map(|r| r.character.id).collect();
        assert_eq!(ids, vec![1, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19]);
        assert!(rows.iter().find(|r| r.character.id == 12).unwrap().favorite);
        assert!(!rows.iter().find(|r| r.character.id == 1).unwrap().favorite);

        screen.list_mut().set_query("character 12");
        assert_eq!(screen.rows().len(), 1);
        screen.list_mut().set_query("");
        assert_eq!(screen.rows().len(), 20);
    }

    #[test]
    fn toggle_favorite_updates_indicator_and_store() {
        let mut screen = CharactersScreen::mount(MemoryStore::new(), "favorites");
        assert!(screen.toggle_favorite(7).unwrap());
        assert!(screen.is_favorite(7));
        assert_eq!(
            screen.favorites().store().get("favorites").unwrap().as_deref(),
            Some("[7]")
        );
        assert!(!screen.toggle_favorite(7).unwrap());
        assert!(!screen.is_favorite(7));
    }

    #[test]
    fn host_driven_completion_after_unmount_is_dropped() {
        let mut screen: EpisodesScreen = ListScreen::mount();
        let ticket = screen.begin_load().unwrap();
        assert!(screen.begin_load().is_none());
        screen.unmount();

        let page = CatalogPage {
            results: vec![serde_json::from_value(episode_json(1, "Pilot", &[])).unwrap()],
            next_page: Some(2),
        };
        assert_eq!(screen.complete_load(ticket, Ok(page)), Completion::Discarded);
        assert!(screen.items().is_empty());
    }

    #[test]
    fn open_requests_typed_detail_route() {
        let screen: LocationsScreen = ListScreen::mount();
        let mut stack = RouteStack::new(Route::Locations);
        screen.open(4, &mut stack);
        assert_eq!(stack.current(), Route::LocationDetail { location_id: 4 });
    }
}
