//! End-to-end session flows against a scripted fetcher and an in-memory
//! store.

use std::sync::Arc;
use std::time::Duration;

use catalog::{CatalogError, FetchOutcome, Movie};
use filters::FilterSpec;
use session::{
    Phase, ScriptedFetcher, SessionConfig, SessionDriver, SessionError, SwipeDirection,
};
use store::{KvStore, MemoryStore, keys, read_or_default, write};

fn test_movie(id: u32) -> Movie {
    Movie {
        id,
        title: format!("Movie {id}"),
        rating: 7.0,
        poster_path: None,
        overview: "Synopsis.".to_string(),
        runtime: Some(95),
    }
}

fn test_config() -> SessionConfig {
    SessionConfig::default().with_relaxation_delay(Duration::from_millis(5))
}

#[tokio::test]
async fn test_first_candidate_presented_and_recorded() {
    // The page the fetcher samples from held ids 1..=3; the scripted pick is 2
    let fetcher = Arc::new(ScriptedFetcher::found([test_movie(2)]));
    let store = Arc::new(MemoryStore::new());
    let mut driver = SessionDriver::new(
        fetcher.clone(),
        store.clone(),
        FilterSpec::unconstrained(),
        test_config(),
    );

    driver.start().await.unwrap();

    let current = driver.current().unwrap();
    assert!([1, 2, 3].contains(&current.id));
    assert!(driver.ledger().was_shown(current.id));

    driver.settle_prefetch().await.unwrap();
    let shown: Vec<u32> = read_or_default(store.as_ref(), keys::SHOWN_MOVIES);
    assert_eq!(shown, vec![2]);
}

#[tokio::test(start_paused = true)]
async fn test_no_results_relaxes_exactly_once_before_reporting() {
    let fetcher = Arc::new(ScriptedFetcher::new([
        Ok(FetchOutcome::NoResults),
        Ok(FetchOutcome::NoResults),
    ]));
    let store = Arc::new(MemoryStore::new());
    let filter = FilterSpec::unconstrained().with_genres(vec![999]);
    let mut driver = SessionDriver::new(fetcher.clone(), store, filter.clone(), test_config());

    let error = driver.start().await.unwrap_err();
    assert!(matches!(error, SessionError::ExhaustedResults));
    assert_eq!(driver.phase(), Phase::Idle);

    // Exactly one constrained fetch, then exactly one unconstrained retry
    let calls = fetcher.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0], filter);
    assert!(calls[1].is_unconstrained());
}

#[tokio::test]
async fn test_exposed_candidates_are_refetched() {
    let store = Arc::new(MemoryStore::new());
    // Movie 7 was shown in an earlier run
    write(store.as_ref(), keys::SHOWN_MOVIES, &vec![7u32]).unwrap();

    let fetcher = Arc::new(ScriptedFetcher::found([test_movie(7), test_movie(8)]));
    let mut driver = SessionDriver::new(
        fetcher.clone(),
        store,
        FilterSpec::unconstrained(),
        test_config(),
    );

    driver.start().await.unwrap();
    assert_eq!(driver.current().unwrap().id, 8);

    driver.settle_prefetch().await.unwrap();
    // Two calls for the main fetch, one for the (empty) prefetch
    assert_eq!(fetcher.call_count(), 3);
}

#[tokio::test]
async fn test_repeat_accepted_after_refetch_budget() {
    let store = Arc::new(MemoryStore::new());
    write(store.as_ref(), keys::SEEN_MOVIES, &vec![7u32]).unwrap();

    let outcomes = (0..3).map(|_| Ok(FetchOutcome::Found(test_movie(7))));
    let fetcher = Arc::new(ScriptedFetcher::new(outcomes));
    let config = test_config().with_max_refetch_attempts(2);
    let mut driver = SessionDriver::new(fetcher, store, FilterSpec::unconstrained(), config);

    driver.start().await.unwrap();
    // The budget ran out, so the repeat is served rather than looping
    assert_eq!(driver.current().unwrap().id, 7);
}

#[tokio::test]
async fn test_session_hands_off_shortlist_at_cap() {
    let store = Arc::new(MemoryStore::new());
    let fetcher = Arc::new(ScriptedFetcher::found([
        test_movie(1),
        test_movie(2),
        test_movie(3),
        test_movie(4),
        test_movie(5),
        test_movie(6),
    ]));
    let config = test_config().with_swipe_cap(3);
    let mut driver = SessionDriver::new(fetcher, store.clone(), FilterSpec::unconstrained(), config);

    driver.start().await.unwrap();
    driver.settle_prefetch().await.unwrap();

    driver.swipe(SwipeDirection::Right).await.unwrap();
    driver.settle_prefetch().await.unwrap();
    driver.swipe(SwipeDirection::Left).await.unwrap();
    driver.settle_prefetch().await.unwrap();
    driver.swipe(SwipeDirection::Right).await.unwrap();

    assert_eq!(driver.phase(), Phase::SessionComplete);
    assert_eq!(driver.swipe_count(), 3);

    // Rights landed on the first and third presented movies
    let handoff = driver.take_handoff().unwrap();
    let ids: Vec<u32> = handoff.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![1, 3]);

    let picks: Vec<Movie> = read_or_default(store.as_ref(), keys::PENDING_PICKS);
    let pick_ids: Vec<u32> = picks.iter().map(|m| m.id).collect();
    assert_eq!(pick_ids, vec![1, 3]);

    // Restarting zeroes the counter and opens a fresh shortlist
    driver.start().await.unwrap();
    assert_eq!(driver.swipe_count(), 0);
    assert!(driver.shortlist().is_empty());
}

#[tokio::test]
async fn test_vertical_swipes_update_side_collections() {
    let store = Arc::new(MemoryStore::new());
    let fetcher = Arc::new(ScriptedFetcher::found([
        test_movie(1),
        test_movie(2),
        test_movie(3),
    ]));
    let mut driver = SessionDriver::new(
        fetcher,
        store.clone(),
        FilterSpec::unconstrained(),
        test_config(),
    );

    driver.start().await.unwrap();
    driver.settle_prefetch().await.unwrap();
    driver.swipe(SwipeDirection::Up).await.unwrap();
    driver.settle_prefetch().await.unwrap();
    driver.swipe(SwipeDirection::Down).await.unwrap();

    assert_eq!(driver.favorites().len(), 1);
    assert_eq!(driver.favorites().movies()[0].id, 1);
    assert!(driver.ledger().was_seen(2));
    assert!(driver.shortlist().is_empty());

    let favorites: Vec<Movie> = read_or_default(store.as_ref(), keys::FAVORITES);
    assert_eq!(favorites.len(), 1);
    let seen: Vec<u32> = read_or_default(store.as_ref(), keys::SEEN_MOVIES);
    assert!(seen.contains(&2));

    let summary = driver.journal().summary();
    assert_eq!(summary.total, 2);
    assert_eq!(summary.favorited, 1);
    assert_eq!(summary.dismissed, 1);
    assert_eq!(summary.like_rate, 0.0);
}

#[tokio::test]
async fn test_transport_error_surfaces_and_idles() {
    let fetcher = Arc::new(ScriptedFetcher::new([Err(CatalogError::Upstream {
        endpoint: "discover/movie".to_string(),
        status: 503,
    })]));
    let store = Arc::new(MemoryStore::new());
    let mut driver =
        SessionDriver::new(fetcher, store, FilterSpec::unconstrained(), test_config());

    let error = driver.start().await.unwrap_err();
    assert!(matches!(error, SessionError::Catalog(_)));
    assert_eq!(driver.phase(), Phase::Idle);
}

#[tokio::test]
async fn test_filter_replacement_skips_prefetched_candidate() {
    let store = Arc::new(MemoryStore::new());
    let fetcher = Arc::new(ScriptedFetcher::found([
        test_movie(1),
        test_movie(2),
        test_movie(3),
    ]));
    let mut driver = SessionDriver::new(
        fetcher,
        store,
        FilterSpec::unconstrained(),
        test_config(),
    );

    driver.start().await.unwrap();
    driver.settle_prefetch().await.unwrap();

    // Movie 2 was prefetched for the old filter; the swap discards it
    driver
        .replace_filter(FilterSpec::unconstrained().with_max_runtime(90))
        .await
        .unwrap();

    assert_eq!(driver.phase(), Phase::Presenting);
    assert_eq!(driver.current().unwrap().id, 3);
}

#[tokio::test]
async fn test_malformed_store_records_start_clean() {
    let store = Arc::new(MemoryStore::new());
    store.set_raw(keys::SHOWN_MOVIES, "{oops").unwrap();
    store.set_raw(keys::FAVORITES, "[1, 2,").unwrap();
    store.set_raw(keys::SWIPE_STATS, "\"not an array\"").unwrap();

    let fetcher = Arc::new(ScriptedFetcher::found([test_movie(1)]));
    let mut driver = SessionDriver::new(
        fetcher,
        store,
        FilterSpec::unconstrained(),
        test_config(),
    );

    driver.start().await.unwrap();
    assert_eq!(driver.ledger().shown_len(), 1);
    assert!(driver.favorites().is_empty());
    assert!(driver.journal().is_empty());
}
