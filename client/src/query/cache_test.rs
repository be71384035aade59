use std::cell::{Cell, RefCell};

use futures::channel::oneshot;
use futures::executor::block_on;

use super::*;
use crate::net::api::{ApiClient, CURRENT_USER_ENDPOINT};
use crate::net::transport::Method;
use crate::net::types::User;
use crate::test_support::{MockTransport, api_client, user_json, user_with_roles};

// =============================================================
// Helpers
// =============================================================

fn user_fetcher(api: &ApiClient) -> impl Fn() -> LocalBoxFuture<'static, Result<User, ApiError>> + 'static {
    let api = api.clone();
    move || {
        let api = api.clone();
        async move { api.current_user().await }.boxed_local()
    }
}

/// Fetcher whose single run resolves when the returned sender fires.
fn gated_fetcher() -> (
    oneshot::Sender<u32>,
    impl Fn() -> LocalBoxFuture<'static, Result<u32, ApiError>> + 'static,
) {
    let (tx, rx) = oneshot::channel::<u32>();
    let slot = Rc::new(RefCell::new(Some(rx)));
    let fetcher = move || {
        let rx = slot.borrow_mut().take();
        async move {
            match rx {
                Some(rx) => rx.await.map_err(|_| ApiError::Unavailable),
                None => Err(ApiError::Unavailable),
            }
        }
        .boxed_local()
    };
    (tx, fetcher)
}

fn key() -> QueryKey {
    QueryKey::new(["counter"])
}

// =============================================================
// De-duplication and staleness
// =============================================================

#[test]
fn concurrent_fetches_share_one_request() {
    let mock = MockTransport::new();
    let user = user_with_roles(&["user"]);
    mock.respond(Method::Get, CURRENT_USER_ENDPOINT, 200, user_json(&user));
    let api = api_client(&mock);
    let client = QueryClient::new();

    let (a, b) = block_on(async {
        futures::join!(
            client.fetch_query(QueryKey::current_user(), QueryOptions::default(), user_fetcher(&api)),
            client.fetch_query(QueryKey::current_user(), QueryOptions::default(), user_fetcher(&api)),
        )
    });

    assert_eq!(a, Ok(user.clone()));
    assert_eq!(b, Ok(user));
    assert_eq!(mock.count(Method::Get, CURRENT_USER_ENDPOINT), 1);
}

#[test]
fn fresh_data_is_served_from_cache() {
    let mock = MockTransport::new();
    mock.respond(Method::Get, CURRENT_USER_ENDPOINT, 200, user_json(&user_with_roles(&["user"])));
    let api = api_client(&mock);
    let client = QueryClient::new();

    for _ in 0..3 {
        block_on(client.fetch_query(QueryKey::current_user(), QueryOptions::default(), user_fetcher(&api))).unwrap();
    }

    assert_eq!(mock.count(Method::Get, CURRENT_USER_ENDPOINT), 1);
}

#[test]
fn stale_data_is_refetched() {
    let mock = MockTransport::new();
    mock.respond(Method::Get, CURRENT_USER_ENDPOINT, 200, user_json(&user_with_roles(&["user"])));
    let api = api_client(&mock);
    let client = QueryClient::new();
    let options = QueryOptions::default().with_stale_time(0.0);

    block_on(client.fetch_query(QueryKey::current_user(), options, user_fetcher(&api))).unwrap();
    block_on(client.fetch_query(QueryKey::current_user(), options, user_fetcher(&api))).unwrap();

    assert_eq!(mock.count(Method::Get, CURRENT_USER_ENDPOINT), 2);
}

// =============================================================
// Retry
// =============================================================

#[test]
fn server_errors_retry_three_times() {
    let mock = MockTransport::new();
    mock.respond(Method::Get, "/dashboard/onload", 500, serde_json::Value::Null);
    let api = api_client(&mock);
    let client = QueryClient::new();

    let api_for_fetch = api.clone();
    let result = block_on(client.fetch_query(QueryKey::page_data("dashboard"), QueryOptions::default(), move || {
        let api = api_for_fetch.clone();
        async move { api.page_data::<serde_json::Value>("dashboard").await }
    }));

    assert!(result.is_err());
    assert_eq!(mock.count(Method::Get, "/dashboard/onload"), 4);
    assert!(client.query_state(&QueryKey::page_data("dashboard")).error.is_some());
}

#[test]
fn unauthorized_is_not_retried() {
    let mock = MockTransport::new();
    mock.respond(Method::Get, CURRENT_USER_ENDPOINT, 401, serde_json::Value::Null);
    let api = api_client(&mock);
    let client = QueryClient::new();

    let result = block_on(client.fetch_query(QueryKey::current_user(), QueryOptions::default(), user_fetcher(&api)));

    assert!(result.unwrap_err().is_unauthorized());
    assert_eq!(mock.count(Method::Get, CURRENT_USER_ENDPOINT), 1);
}

#[test]
fn retry_recovers_after_transient_failures() {
    let mock = MockTransport::new();
    let user = user_with_roles(&["user"]);
    mock.respond(Method::Get, CURRENT_USER_ENDPOINT, 503, serde_json::Value::Null);
    mock.fail(Method::Get, CURRENT_USER_ENDPOINT, ApiError::Network("reset".to_owned()));
    mock.respond(Method::Get, CURRENT_USER_ENDPOINT, 200, user_json(&user));
    let api = api_client(&mock);
    let client = QueryClient::new();

    let result = block_on(client.fetch_query(QueryKey::current_user(), QueryOptions::default(), user_fetcher(&api)));

    assert_eq!(result, Ok(user));
    assert_eq!(mock.count(Method::Get, CURRENT_USER_ENDPOINT), 3);
}

#[test]
fn never_policy_makes_one_attempt() {
    let mock = MockTransport::new();
    mock.respond(Method::Get, CURRENT_USER_ENDPOINT, 500, serde_json::Value::Null);
    let api = api_client(&mock);
    let client = QueryClient::new();
    let options = QueryOptions::default().with_retry(RetryPolicy::never());

    let _ = block_on(client.fetch_query(QueryKey::current_user(), options, user_fetcher(&api)));

    assert_eq!(mock.count(Method::Get, CURRENT_USER_ENDPOINT), 1);
}

// =============================================================
// Direct writes, clearing, and ordering
// =============================================================

#[test]
fn set_query_data_is_readable_without_fetch() {
    let client = QueryClient::new();
    let user = user_with_roles(&["admin"]);
    client.set_query_data(&QueryKey::current_user(), &user);

    assert_eq!(client.get_query_data::<User>(&QueryKey::current_user()), Some(user));
    assert_eq!(client.cached_len(), 1);
}

#[test]
fn clear_drops_every_key() {
    let client = QueryClient::new();
    client.set_query_data(&QueryKey::current_user(), &user_with_roles(&["user"]));
    client.set_query_data(&QueryKey::page_data("dashboard"), &serde_json::json!({ "x": 1 }));

    client.clear();

    assert_eq!(client.cached_len(), 0);
    assert_eq!(client.get_query_data::<User>(&QueryKey::current_user()), None);
    assert_eq!(client.get_query_data::<serde_json::Value>(&QueryKey::page_data("dashboard")), None);
}

#[test]
fn result_in_flight_during_clear_is_discarded() {
    let client = QueryClient::new();
    let (tx, fetcher) = gated_fetcher();

    block_on(async {
        let mut fetch = Box::pin(client.fetch_query(key(), QueryOptions::default(), fetcher));
        assert!(futures::poll!(fetch.as_mut()).is_pending());
        assert!(client.query_state(&key()).is_fetching);

        client.clear();
        tx.send(5).unwrap();

        // The caller still gets its answer; the cache does not.
        assert_eq!(fetch.await, Ok(5));
    });

    assert_eq!(client.get_query_data::<u32>(&key()), None);
}

#[test]
fn older_result_landing_after_newer_is_discarded() {
    let client = QueryClient::new();
    let (old_tx, old_fetcher) = gated_fetcher();
    let (new_tx, new_fetcher) = gated_fetcher();

    block_on(async {
        let mut old = Box::pin(client.fetch_query(key(), QueryOptions::default(), old_fetcher));
        assert!(futures::poll!(old.as_mut()).is_pending());

        client.clear();
        assert!(!client.query_state(&key()).is_fetching);
        let mut new = Box::pin(client.fetch_query(key(), QueryOptions::default(), new_fetcher));
        assert!(futures::poll!(new.as_mut()).is_pending());

        new_tx.send(2).unwrap();
        assert_eq!(new.await, Ok(2));
        old_tx.send(1).unwrap();
        assert_eq!(old.await, Ok(1));
    });

    assert_eq!(client.get_query_data::<u32>(&key()), Some(2));
}

#[test]
fn direct_write_wins_over_older_fetch() {
    let client = QueryClient::new();
    let (tx, fetcher) = gated_fetcher();

    block_on(async {
        let mut fetch = Box::pin(client.fetch_query(key(), QueryOptions::default(), fetcher));
        assert!(futures::poll!(fetch.as_mut()).is_pending());

        client.set_query_data(&key(), &9_u32);
        tx.send(1).unwrap();
        let _ = fetch.await;
    });

    assert_eq!(client.get_query_data::<u32>(&key()), Some(9));
    assert!(!client.query_state(&key()).is_fetching);
}

#[test]
fn settled_fetch_notifies_listeners() {
    let client = QueryClient::new();
    let count = Rc::new(Cell::new(0));
    let seen = count.clone();
    client.notifier().subscribe(move || seen.set(seen.get() + 1));

    let _ = block_on(client.fetch_query(key(), QueryOptions::default(), || async { Ok(3_u32) }));

    assert_eq!(count.get(), 1);
}
