//! End-to-end browsing against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then exercises the sans-IO client
//! over real HTTP with ureq, and the async screens over `ReqwestTransport`.

use catalog_core::{
    get_character_detail, get_episode_detail, get_favorite_characters, get_location_detail,
    CatalogClient, CatalogConfig, CatalogError, Character, CharactersScreen, Completion,
    DetailState, Episode, EpisodesScreen, HttpMethod, HttpResponse, ListScreen, MemoryStore,
    PageState, ReqwestTransport, ResourceKind, Transport, MAX_EPISODES,
};

/// Execute an `HttpRequest` using ureq and return an `HttpResponse`.
///
/// Disables ureq's automatic status-code-as-error behavior so 4xx/5xx
/// responses are returned as data rather than `Err`, letting the core
/// client handle status interpretation.
fn execute(req: catalog_core::HttpRequest) -> HttpResponse {
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();

    let mut response = match req.method {
        HttpMethod::Get => agent.get(&req.path).call(),
    }
    .expect("HTTP transport error");

    let status = response.status().as_u16();
    let body = response.body_mut().read_to_string().unwrap_or_default();

    HttpResponse::new(status, body)
}

/// Start the mock server on its own runtime thread and return its API root.
fn spawn_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}/api")
}

fn transport() -> ReqwestTransport {
    ReqwestTransport::new(&CatalogConfig::default()).unwrap()
}

#[test]
fn sans_io_browse_lifecycle() {
    let client = CatalogClient::new(&spawn_server());

    // Step 1: first character page has a successor.
    let req = client.build_list_page(ResourceKind::Character, 1);
    let page = client.parse_list_page::<Character>(1, execute(req)).unwrap();
    assert_eq!(page.results.len(), 20);
    assert_eq!(page.next_page, Some(2));

    // Step 2: last page has none.
    let req = client.build_list_page(ResourceKind::Character, 3);
    let page = client.parse_list_page::<Character>(3, execute(req)).unwrap();
    assert_eq!(page.results.len(), 5);
    assert!(!page.has_next());

    // Step 3: detail.
    let req = client.build_detail(ResourceKind::Episode, 1);
    let episode: Episode = client.parse_detail(execute(req)).unwrap();
    assert_eq!(episode.code, "S01E01");

    // Step 4: batch with several ids.
    let req = client.build_characters_by_ids(&[1, 2]).unwrap();
    let characters = client.parse_characters_by_ids(execute(req)).unwrap();
    assert_eq!(characters.len(), 2);

    // Step 5: batch with one id comes back as a bare object upstream.
    let req = client.build_characters_by_ids(&[1]).unwrap();
    let characters = client.parse_characters_by_ids(execute(req)).unwrap();
    assert_eq!(characters.len(), 1);
    assert_eq!(characters[0].name, "Rick Sanchez");

    // Step 6: unknown entity.
    let req = client.build_detail(ResourceKind::Character, 999);
    let err = client.parse_detail::<Character>(execute(req)).unwrap_err();
    assert!(matches!(err, CatalogError::NotFound));

    // Step 7: page past the end.
    let req = client.build_list_page(ResourceKind::Episode, 5);
    let err = client.parse_list_page::<Episode>(5, execute(req)).unwrap_err();
    assert!(matches!(err, CatalogError::NotFound));
}

#[tokio::test(flavor = "multi_thread")]
async fn characters_screen_accumulates_every_page() {
    let client = CatalogClient::new(&spawn_server());
    let transport = transport();
    let mut screen = CharactersScreen::mount(MemoryStore::new(), "favorites");

    screen.list_mut().activate(&client, &transport).await;
    let mut loads = 1;
    while screen.list().paginator().has_more() {
        screen.list_mut().load_more(&client, &transport).await;
        loads += 1;
    }
    assert_eq!(loads, 3);
    assert_eq!(screen.list().items().len(), mock_server::CHARACTER_COUNT as usize);
    assert_eq!(screen.list().paginator().state(), PageState::Exhausted);
    assert_eq!(
        screen.list_mut().load_more(&client, &transport).await,
        Completion::Skipped
    );

    screen.toggle_favorite(2).unwrap();
    screen.toggle_favorite(1).unwrap();
    screen.list_mut().set_query("smith");
    let favorites: Vec<_> = screen
        .rows()
        .into_iter()
        .filter(|row| row.favorite)
        .map(|row| row.character.id)
        .collect();
    assert_eq!(favorites, vec![2]);

    let resolved = get_favorite_characters(&client, &transport, screen.favorites().favorites()).await;
    let names: Vec<_> = resolved.ready().unwrap().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Morty Smith", "Rick Sanchez"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn episodes_screen_reaches_the_end() {
    let client = CatalogClient::new(&spawn_server());
    let transport = transport();
    let mut screen: EpisodesScreen = ListScreen::mount();

    screen.activate(&client, &transport).await;
    screen.load_more(&client, &transport).await;
    assert_eq!(screen.items().len(), mock_server::EPISODE_COUNT as usize);
    assert!(!screen.paginator().has_more());
}

#[tokio::test(flavor = "multi_thread")]
async fn detail_screens_resolve_related_records() {
    let client = CatalogClient::new(&spawn_server());
    let transport = transport();

    // Character 8 appears in nine episodes.
    let state = get_character_detail(&client, &transport, 8).await;
    let view = state.ready().unwrap();
    assert!(view.character.episode_refs.len() > MAX_EPISODES);
    let expected: Vec<_> = view
        .character
        .episode_refs
        .iter()
        .take(MAX_EPISODES)
        .filter_map(|url| catalog_core::ref_id(url))
        .collect();
    let got: Vec<_> = view.episodes.iter().map(|e| e.id).collect();
    assert_eq!(got, expected);

    let state = get_episode_detail(&client, &transport, 1).await;
    let view = state.ready().unwrap();
    assert_eq!(view.characters.len(), view.episode.character_refs.len());

    let state = get_location_detail(&client, &transport, 1).await;
    assert!(state.ready().unwrap().resident_count > 0);

    assert_eq!(
        get_character_detail(&client, &transport, 999).await,
        DetailState::NotFound
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn unresponsive_server_times_out() {
    // Accepts connections into the backlog but never answers.
    let silent = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = silent.local_addr().unwrap();

    let config = CatalogConfig {
        base_url: format!("http://{addr}/api"),
        request_timeout_secs: 1,
        ..CatalogConfig::default()
    };
    let client = CatalogClient::from_config(&config);
    let transport = ReqwestTransport::new(&config).unwrap();

    let err = transport
        .execute(client.build_detail(ResourceKind::Character, 1))
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::Network { status: None, .. }));

    let page = client.list_page_or_empty::<Character>(&transport, 1).await;
    assert!(page.results.is_empty());
    assert!(!page.has_next());
    drop(silent);
}
