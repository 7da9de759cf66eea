//! Tests for paging sources and types

use super::*;
use crate::error::Error;
use crate::testing::{movies, Call, FakeRepository, Outcome};
use pretty_assertions::assert_eq;
use test_case::test_case;

fn ids(items: &[crate::model::MovieSummary]) -> Vec<u64> {
    items.iter().map(|m| m.id).collect()
}

#[tokio::test]
async fn test_popular_source_first_page_when_key_absent() {
    let repo = FakeRepository::new();
    repo.script(Call::Popular(1), Outcome::Movies(movies(1..=20)));
    let source = PopularMoviesSource::new(repo.clone());

    let result = source.load(LoadParams::refresh(None, 30)).await;

    let page = result.page().unwrap();
    assert_eq!(ids(&page.data), (1..=20).collect::<Vec<_>>());
    assert_eq!(page.prev_key, None);
    assert_eq!(page.next_key, Some(2));
    assert_eq!(repo.calls(), vec![Call::Popular(1)]);
}

#[test_case(1, 20, Some(2) ; "full first page")]
#[test_case(3, 7, Some(4) ; "short page still continues")]
#[test_case(5, 0, None ; "empty page ends")]
#[tokio::test]
async fn test_popular_source_next_key(key: u32, count: u64, expected: Option<u32>) {
    let repo = FakeRepository::new();
    repo.script(Call::Popular(key), Outcome::Movies(movies(1..=count)));
    let source = PopularMoviesSource::new(repo);

    let result = source.load(LoadParams::append(key, 10)).await;

    assert_eq!(result.page().unwrap().next_key, expected);
}

#[tokio::test]
async fn test_search_source_passes_query_and_page() {
    let repo = FakeRepository::new();
    repo.script(
        Call::Search("dune".to_string(), 2),
        Outcome::Movies(movies([438631, 693134])),
    );
    let source = SearchMoviesSource::new(repo.clone(), "dune");

    let result = source.load(LoadParams::append(2, 10)).await;

    assert_eq!(source.query(), "dune");
    assert_eq!(ids(&result.page().unwrap().data), vec![438631, 693134]);
    assert_eq!(result.page().unwrap().next_key, Some(3));
    assert_eq!(repo.calls(), vec![Call::Search("dune".to_string(), 2)]);
}

#[tokio::test]
async fn test_search_source_no_results_is_terminal() {
    let repo = FakeRepository::new();
    let source = SearchMoviesSource::new(repo, "zzzzzz");

    let result = source.load(LoadParams::refresh(None, 30)).await;

    let page = result.page().unwrap();
    assert!(page.data.is_empty());
    assert_eq!(page.next_key, None);
}

#[test_case(Outcome::Offline ; "network")]
#[test_case(Outcome::Status(503) ; "server error")]
#[test_case(Outcome::Status(401) ; "unauthorized")]
#[test_case(Outcome::Malformed ; "decode")]
#[tokio::test]
async fn test_source_failures_become_error_results(outcome: Outcome) {
    let repo = FakeRepository::new();
    repo.script(Call::Popular(1), outcome.clone());
    let source = PopularMoviesSource::new(repo);

    let result = source.load(LoadParams::refresh(None, 30)).await;

    assert!(result.is_error());
    let err = result.error().unwrap();
    match outcome {
        Outcome::Offline => assert!(err.is_network()),
        Outcome::Status(status) => assert_eq!(err.status(), Some(status)),
        Outcome::Malformed => assert!(matches!(err, Error::Decode { .. })),
        Outcome::Movies(_) => unreachable!(),
    }
}

#[tokio::test]
async fn test_source_does_not_cache_failures() {
    let repo = FakeRepository::new();
    repo.script(Call::Popular(2), Outcome::Offline)
        .script(Call::Popular(2), Outcome::Movies(movies(21..=40)));
    let source = PopularMoviesSource::new(repo.clone());

    let first = source.load(LoadParams::append(2, 10)).await;
    let second = source.load(LoadParams::append(2, 10)).await;

    assert!(first.is_error());
    assert_eq!(ids(&second.page().unwrap().data), (21..=40).collect::<Vec<_>>());
    assert_eq!(repo.call_count(&Call::Popular(2)), 2);
}

fn page_info(next_key: Option<u32>, item_count: usize) -> PageInfo {
    PageInfo {
        prev_key: None,
        next_key,
        item_count,
    }
}

#[test_case(None, None ; "no anchor")]
#[test_case(Some(5), Some(1) ; "anchor in first page")]
#[test_case(Some(25), Some(2) ; "anchor in second page")]
#[test_case(Some(500), Some(3) ; "anchor past end clamps to last page")]
fn test_refresh_key_from_anchor(anchor: Option<usize>, expected: Option<u32>) {
    let source = PopularMoviesSource::new(FakeRepository::new());
    let state = PagingState {
        pages: vec![
            page_info(Some(2), 20),
            page_info(Some(3), 20),
            page_info(Some(4), 20),
        ],
        anchor_position: anchor,
    };

    assert_eq!(source.refresh_key(&state), expected);
}

#[test]
fn test_refresh_key_none_for_terminal_page_without_prev() {
    let source = PopularMoviesSource::new(FakeRepository::new());
    let state = PagingState {
        pages: vec![page_info(None, 0)],
        anchor_position: Some(0),
    };

    assert_eq!(source.refresh_key(&state), None);
}

#[test]
fn test_refresh_key_none_without_pages() {
    let source = PopularMoviesSource::new(FakeRepository::new());
    let state = PagingState {
        pages: Vec::new(),
        anchor_position: Some(3),
    };

    assert_eq!(source.refresh_key(&state), None);
}

#[test]
fn test_pager_config_defaults_from_page_size() {
    let config = PagerConfig::new(10);
    assert_eq!(config.page_size, 10);
    assert_eq!(config.prefetch_distance, 10);
    assert_eq!(config.initial_load_size, 30);

    let zero = PagerConfig::new(0);
    assert_eq!(zero.page_size, 1);

    let huge = PagerConfig::new(usize::MAX);
    assert_eq!(huge.initial_load_size, usize::MAX);

    let custom = PagerConfig::new(20).with_prefetch_distance(3);
    assert_eq!(custom.prefetch_distance, 3);
}

#[test]
fn test_load_state_equality_tracks_the_same_failure() {
    let err = std::sync::Arc::new(Error::network("offline"));
    let a = LoadState::Error(err.clone());
    let b = LoadState::Error(err);
    let c = LoadState::Error(std::sync::Arc::new(Error::network("offline")));

    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(LoadState::Loading, LoadState::Loading);
    assert_ne!(LoadState::Loading, LoadState::NotLoading);
}

#[test]
fn test_snapshot_error_prefers_refresh() {
    let mut snapshot: PagerSnapshot<u32> = PagerSnapshot::empty();
    assert!(snapshot.error().is_none());
    assert!(!snapshot.is_loading());

    snapshot.append = LoadState::Error(std::sync::Arc::new(Error::http_status(500, "")));
    assert_eq!(snapshot.error().and_then(Error::status), Some(500));

    snapshot.refresh = LoadState::Error(std::sync::Arc::new(Error::network("offline")));
    assert!(snapshot.error().unwrap().is_network());

    assert!(PagerSnapshot::<u32>::loading().is_loading());
}
