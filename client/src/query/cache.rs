//! Query cache with per-key request de-duplication and staleness.
//!
//! DESIGN
//! ======
//! Entries store JSON values so one cache can hold every response type;
//! typed access goes through serde. A key has at most one in-flight fetch:
//! later callers await a clone of the same `Shared` future. The shared
//! future writes its own result back, so the entry settles even when the
//! caller that started the fetch is dropped.
//!
//! Every write carries a sequence number. A result older than the one already
//! stored is discarded, and `clear` bumps a generation counter so fetches that
//! were in flight at the time cannot repopulate the cache.

#[cfg(test)]
#[path = "cache_test.rs"]
mod cache_test;

use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;
use std::rc::Rc;

use futures::future::{FutureExt, LocalBoxFuture, Shared};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::key::QueryKey;
use super::notify::Notifier;
use super::retry::RetryPolicy;
use crate::net::error::ApiError;
use crate::util::clock;

/// Data younger than this is served from cache without a request.
pub const DEFAULT_STALE_TIME_MS: f64 = 5.0 * 60.0 * 1000.0;

/// Per-call fetch behaviour.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QueryOptions {
    pub stale_time_ms: f64,
    pub retry: RetryPolicy,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            stale_time_ms: DEFAULT_STALE_TIME_MS,
            retry: RetryPolicy::default(),
        }
    }
}

impl QueryOptions {
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    #[must_use]
    pub fn with_stale_time(mut self, stale_time_ms: f64) -> Self {
        self.stale_time_ms = stale_time_ms;
        self
    }
}

/// Snapshot of one cache entry, for views and tests.
#[derive(Clone, Debug, PartialEq)]
pub struct QueryState {
    pub has_data: bool,
    pub error: Option<ApiError>,
    pub is_fetching: bool,
}

type SharedFetch = Shared<LocalBoxFuture<'static, Result<Value, ApiError>>>;

struct InFlight {
    seq: u64,
    future: SharedFetch,
}

#[derive(Default)]
struct Entry {
    data: Option<Value>,
    error: Option<ApiError>,
    updated_at: f64,
    written_seq: u64,
}

impl Entry {
    fn is_fresh(&self, now: f64, stale_time_ms: f64) -> bool {
        self.data.is_some() && self.error.is_none() && now - self.updated_at < stale_time_ms
    }
}

#[derive(Default)]
struct Inner {
    entries: HashMap<QueryKey, Entry>,
    in_flight: HashMap<QueryKey, InFlight>,
    next_seq: u64,
    generation: u64,
}

impl Inner {
    fn allocate_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    /// Records a finished fetch. Returns whether the cache changed.
    fn settle(&mut self, key: &QueryKey, seq: u64, generation: u64, result: &Result<Value, ApiError>) -> bool {
        if self.in_flight.get(key).is_some_and(|f| f.seq == seq) {
            self.in_flight.remove(key);
        }
        if generation != self.generation {
            log::debug!("discarding result for {key}: cache cleared while in flight");
            return false;
        }
        let entry = self.entries.entry(key.clone()).or_default();
        if seq < entry.written_seq {
            log::debug!("discarding superseded result for {key}");
            return false;
        }
        entry.written_seq = seq;
        match result {
            Ok(value) => {
                entry.data = Some(value.clone());
                entry.error = None;
                entry.updated_at = clock::now_ms();
            }
            Err(err) => {
                entry.error = Some(err.clone());
            }
        }
        true
    }
}

/// Shared cache handle. Clones refer to the same cache.
#[derive(Clone, Default)]
pub struct QueryClient {
    inner: Rc<RefCell<Inner>>,
    notifier: Notifier,
}

impl QueryClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Change notifications for every write, clear, and settled fetch.
    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Returns cached data for `key` while fresh, otherwise fetches it.
    ///
    /// Concurrent calls for one key share a single fetch. Failed attempts are
    /// retried according to `options.retry`.
    ///
    /// # Errors
    ///
    /// Returns the last fetch error once retries are exhausted, or a decode
    /// error when the cached value does not match `T`.
    pub async fn fetch_query<T, F, Fut>(&self, key: QueryKey, options: QueryOptions, fetcher: F) -> Result<T, ApiError>
    where
        T: Serialize + DeserializeOwned + 'static,
        F: Fn() -> Fut + 'static,
        Fut: Future<Output = Result<T, ApiError>> + 'static,
    {
        let shared = {
            let mut inner = self.inner.borrow_mut();
            if let Some(entry) = inner.entries.get(&key)
                && entry.is_fresh(clock::now_ms(), options.stale_time_ms)
                && let Some(value) = entry.data.clone()
            {
                return decode(value);
            }
            if let Some(in_flight) = inner.in_flight.get(&key) {
                in_flight.future.clone()
            } else {
                let seq = inner.allocate_seq();
                let generation = inner.generation;
                let future = self.spawn_fetch(key.clone(), seq, generation, options.retry, fetcher);
                inner.in_flight.insert(
                    key.clone(),
                    InFlight {
                        seq,
                        future: future.clone(),
                    },
                );
                future
            }
        };

        decode(shared.await?)
    }

    fn spawn_fetch<T, F, Fut>(&self, key: QueryKey, seq: u64, generation: u64, retry: RetryPolicy, fetcher: F) -> SharedFetch
    where
        T: Serialize + 'static,
        F: Fn() -> Fut + 'static,
        Fut: Future<Output = Result<T, ApiError>> + 'static,
    {
        let inner = Rc::clone(&self.inner);
        let notifier = self.notifier.clone();
        async move {
            let result = fetch_with_retry(&key, retry, fetcher)
                .await
                .and_then(|data| serde_json::to_value(data).map_err(|e| ApiError::Decode(e.to_string())));
            let changed = inner.borrow_mut().settle(&key, seq, generation, &result);
            if changed {
                notifier.notify();
            }
            result
        }
        .boxed_local()
        .shared()
    }

    /// Cached data for `key`, fresh or stale.
    pub fn get_query_data<T: DeserializeOwned>(&self, key: &QueryKey) -> Option<T> {
        let value = self.inner.borrow().entries.get(key)?.data.clone()?;
        decode(value).ok()
    }

    /// Writes `data` under `key` as if a fetch had just succeeded.
    ///
    /// Fetches already in flight for `key` are older than this write, so their
    /// results are discarded when they land.
    pub fn set_query_data<T: Serialize>(&self, key: &QueryKey, data: &T) {
        let Ok(value) = serde_json::to_value(data) else {
            log::error!("failed to serialize cache data for {key}");
            return;
        };
        {
            let mut inner = self.inner.borrow_mut();
            let seq = inner.allocate_seq();
            let entry = inner.entries.entry(key.clone()).or_default();
            entry.data = Some(value);
            entry.error = None;
            entry.updated_at = clock::now_ms();
            entry.written_seq = seq;
        }
        self.notifier.notify();
    }

    /// Drops every entry. Results of fetches in flight are discarded.
    pub fn clear(&self) {
        {
            let mut inner = self.inner.borrow_mut();
            inner.entries.clear();
            inner.in_flight.clear();
            inner.generation += 1;
        }
        self.notifier.notify();
    }

    pub fn query_state(&self, key: &QueryKey) -> QueryState {
        let inner = self.inner.borrow();
        let entry = inner.entries.get(key);
        QueryState {
            has_data: entry.is_some_and(|e| e.data.is_some()),
            error: entry.and_then(|e| e.error.clone()),
            is_fetching: inner.in_flight.contains_key(key),
        }
    }

    /// Number of keys holding data.
    #[cfg(test)]
    pub(crate) fn cached_len(&self) -> usize {
        self.inner
            .borrow()
            .entries
            .values()
            .filter(|e| e.data.is_some())
            .count()
    }
}

async fn fetch_with_retry<T, F, Fut>(key: &QueryKey, retry: RetryPolicy, fetcher: F) -> Result<T, ApiError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let mut failures = 0;
    loop {
        match fetcher().await {
            Ok(data) => return Ok(data),
            Err(err) => {
                if !retry.should_retry(failures, &err) {
                    return Err(err);
                }
                let delay = retry.delay_ms(failures);
                log::warn!("query {key} failed ({err}); retrying in {delay}ms");
                clock::sleep_ms(delay).await;
                failures += 1;
            }
        }
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}
