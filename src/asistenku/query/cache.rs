// src/asistenku/query/cache.rs
//
// Request cache in front of the backend actor. Queries are cached per key and
// concurrent fetches of one key share a single call. Mutations invalidate the
// kinds they affect and report through toasts.

use crate::config::ClientConfig;
use crate::error::AsistenkuError;
use crate::query::keys::{QueryKey, QueryKind};
use crate::query::toast::Toasts;
use futures::future::{FutureExt, LocalBoxFuture, Shared};
use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::future::Future;
use std::rc::Rc;

type CachedValue = Rc<dyn Any>;
type InFlight = Shared<LocalBoxFuture<'static, Result<CachedValue, AsistenkuError>>>;

/// Whether the backend actor is reachable. `Connecting` shows a banner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectionState {
    Ready,
    Connecting,
}

/// Cache effects and toasts of one mutation.
#[derive(Clone, Copy, Debug)]
pub struct MutationSpec {
    pub invalidates: &'static [QueryKind],
    pub success: &'static str,
    pub failure: &'static str,
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<QueryKey, CachedValue>,
    in_flight: HashMap<QueryKey, InFlight>,
}

pub struct QueryClient {
    state: RefCell<CacheState>,
    connection: Cell<ConnectionState>,
    toasts: Toasts,
    default_retry: u32,
}

impl Default for QueryClient {
    fn default() -> Self {
        Self::new(&ClientConfig::default())
    }
}

/// Runs `fetcher` once, then up to `retry` more times while it fails with a
/// retryable error.
async fn with_retry<T, F, Fut>(key: QueryKey, retry: u32, fetcher: F) -> Result<T, AsistenkuError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, AsistenkuError>>,
{
    let mut attempt = 0;
    loop {
        match fetcher().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < retry && err.is_retryable() => {
                attempt += 1;
                log_warn!("Query {} failed ({}), retry {}/{}", key, err, attempt, retry);
            }
            Err(err) => return Err(err),
        }
    }
}

impl QueryClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            state: RefCell::new(CacheState::default()),
            connection: Cell::new(ConnectionState::Ready),
            toasts: Toasts::default(),
            default_retry: config.query_retry,
        }
    }

    pub fn default_retry(&self) -> u32 {
        self.default_retry
    }

    pub fn connection(&self) -> ConnectionState {
        self.connection.get()
    }

    pub fn toasts(&self) -> &Toasts {
        &self.toasts
    }

    pub fn is_cached(&self, key: &QueryKey) -> bool {
        self.state.borrow().entries.contains_key(key)
    }

    /// Returns the cached value of `key`, joins a fetch already running for
    /// it, or starts one.
    pub async fn fetch<T, F, Fut>(
        &self,
        key: QueryKey,
        retry: u32,
        fetcher: F,
    ) -> Result<Rc<T>, AsistenkuError>
    where
        T: 'static,
        F: Fn() -> Fut + 'static,
        Fut: Future<Output = Result<T, AsistenkuError>> + 'static,
    {
        let cached = self.state.borrow().entries.get(&key).cloned();
        if let Some(value) = cached {
            return downcast(&key, value);
        }

        let call = {
            let mut state = self.state.borrow_mut();
            match state.in_flight.get(&key) {
                Some(running) => running.clone(),
                None => {
                    let call = with_retry(key.clone(), retry, fetcher)
                        .map(|result| result.map(|value| Rc::new(value) as CachedValue))
                        .boxed_local()
                        .shared();
                    state.in_flight.insert(key.clone(), call.clone());
                    call
                }
            }
        };

        let result = call.clone().await;
        self.settle(&key, &call, &result);
        downcast(&key, result?)
    }

    fn settle(
        &self,
        key: &QueryKey,
        call: &InFlight,
        result: &Result<CachedValue, AsistenkuError>,
    ) {
        {
            let mut state = self.state.borrow_mut();
            // An invalidated or cleared call must not repopulate the cache.
            let current = matches!(state.in_flight.get(key), Some(running) if running.ptr_eq(call));
            if current {
                state.in_flight.remove(key);
                if let Ok(value) = result {
                    state.entries.insert(key.clone(), value.clone());
                }
            }
        }
        match result {
            Ok(_) => self.connection.set(ConnectionState::Ready),
            Err(AsistenkuError::ActorNotReady) => self.connection.set(ConnectionState::Connecting),
            Err(err) => log_error!("Query {} failed: {}", key, err),
        }
    }

    /// Drops every cached entry and running fetch of the given kinds.
    pub fn invalidate(&self, kinds: &[QueryKind]) {
        let mut state = self.state.borrow_mut();
        state.entries.retain(|key, _| !kinds.contains(&key.kind));
        state.in_flight.retain(|key, _| !kinds.contains(&key.kind));
    }

    pub fn remove(&self, key: &QueryKey) {
        let mut state = self.state.borrow_mut();
        state.entries.remove(key);
        state.in_flight.remove(key);
    }

    pub fn clear(&self) {
        let mut state = self.state.borrow_mut();
        state.entries.clear();
        state.in_flight.clear();
    }

    /// Awaits a mutation. Success invalidates and toasts; failure toasts the
    /// server message or the fallback and leaves the cache as it was.
    pub async fn mutate<T, Fut>(
        &self,
        spec: MutationSpec,
        mutation: Fut,
    ) -> Result<T, AsistenkuError>
    where
        Fut: Future<Output = Result<T, AsistenkuError>>,
    {
        match mutation.await {
            Ok(value) => {
                self.connection.set(ConnectionState::Ready);
                self.invalidate(spec.invalidates);
                self.toasts.success(spec.success);
                Ok(value)
            }
            Err(AsistenkuError::ActorNotReady) => {
                log_warn!("Mutation attempted before the backend actor was ready");
                self.connection.set(ConnectionState::Connecting);
                Err(AsistenkuError::ActorNotReady)
            }
            Err(err) => {
                log_error!("Mutation failed: {}", err);
                self.toasts.error(err.user_message(spec.failure));
                Err(err)
            }
        }
    }
}

fn downcast<T: 'static>(key: &QueryKey, value: CachedValue) -> Result<Rc<T>, AsistenkuError> {
    value.downcast::<T>().map_err(|_| {
        AsistenkuError::InternalError(format!("cached value of {} has an unexpected type", key))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::toast::ToastKind;
    use futures::executor::block_on;

    fn counting(
        calls: &Rc<Cell<u32>>,
        outcomes: Vec<Result<u32, AsistenkuError>>,
    ) -> impl Fn() -> futures::future::Ready<Result<u32, AsistenkuError>> {
        let calls = calls.clone();
        let outcomes = Rc::new(outcomes);
        move || {
            let n = calls.get();
            calls.set(n + 1);
            let outcome = outcomes.get(n as usize).cloned().unwrap_or(Ok(n));
            futures::future::ready(outcome)
        }
    }

    #[test]
    fn second_fetch_is_served_from_cache() {
        let client = QueryClient::default();
        let calls = Rc::new(Cell::new(0));
        let key = QueryKey::new(QueryKind::Services);
        let first = block_on(client.fetch(key.clone(), 1, counting(&calls, vec![Ok(7)])));
        let second = block_on(client.fetch(key.clone(), 1, counting(&calls, vec![])));
        let (first, second) = (first.expect("fetches"), second.expect("cached"));
        assert_eq!((*first, *second), (7, 7));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn retries_once_then_gives_up() {
        let client = QueryClient::default();
        let calls = Rc::new(Cell::new(0));
        let fail = || Err(AsistenkuError::Rejected("busy".to_string()));
        let result = block_on(client.fetch(
            QueryKey::new(QueryKind::Users),
            1,
            counting(&calls, vec![fail(), fail(), Ok(1)]),
        ));
        assert_eq!(result, Err(AsistenkuError::Rejected("busy".to_string())));
        assert_eq!(calls.get(), 2);
        assert!(!client.is_cached(&QueryKey::new(QueryKind::Users)));
    }

    #[test]
    fn zero_retry_calls_once() {
        let client = QueryClient::default();
        let calls = Rc::new(Cell::new(0));
        let result = block_on(client.fetch(
            QueryKey::new(QueryKind::CallerProfile),
            0,
            counting(&calls, vec![Err(AsistenkuError::Backend("x".to_string()))]),
        ));
        assert!(result.is_err());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn actor_not_ready_is_not_retried_and_sets_connecting() {
        let client = QueryClient::default();
        let calls = Rc::new(Cell::new(0));
        let result = block_on(client.fetch(
            QueryKey::new(QueryKind::Services),
            3,
            counting(&calls, vec![Err(AsistenkuError::ActorNotReady)]),
        ));
        assert_eq!(result, Err(AsistenkuError::ActorNotReady));
        assert_eq!(calls.get(), 1);
        assert_eq!(client.connection(), ConnectionState::Connecting);
    }

    #[test]
    fn invalidation_is_by_kind() {
        let client = QueryClient::default();
        let calls = Rc::new(Cell::new(0));
        let task_a = QueryKey::with_param(QueryKind::Task, "T-1");
        let services = QueryKey::new(QueryKind::Services);
        block_on(client.fetch(task_a.clone(), 0, counting(&calls, vec![]))).expect("fetches");
        block_on(client.fetch(services.clone(), 0, counting(&calls, vec![]))).expect("fetches");
        client.invalidate(&[QueryKind::Task]);
        assert!(!client.is_cached(&task_a));
        assert!(client.is_cached(&services));
        client.clear();
        assert!(!client.is_cached(&services));
    }

    #[test]
    fn invalidated_fetch_does_not_repopulate_the_cache() {
        let client = QueryClient::default();
        let key = QueryKey::new(QueryKind::Services);
        let (tx, rx) = futures::channel::oneshot::channel::<u32>();
        let rx = RefCell::new(Some(rx));
        let running = client.fetch(key.clone(), 0, move || {
            let rx = rx.borrow_mut().take().expect("fetched once");
            async move { rx.await.map_err(|_| AsistenkuError::Rejected("dropped".to_string())) }
        });
        let invalidate_then_answer = async {
            client.invalidate(&[QueryKind::Services]);
            tx.send(5).expect("fetch is waiting");
        };

        let (value, ()) = block_on(futures::future::join(running, invalidate_then_answer));
        assert_eq!(*value.expect("caller still gets its answer"), 5);
        assert!(!client.is_cached(&key));

        let calls = Rc::new(Cell::new(0));
        let fresh = block_on(client.fetch(key.clone(), 0, counting(&calls, vec![Ok(9)])))
            .expect("refetches");
        assert_eq!((*fresh, calls.get()), (9, 1));
        assert!(client.is_cached(&key));
    }

    const SAVE: MutationSpec = MutationSpec {
        invalidates: &[QueryKind::Services],
        success: "Layanan disimpan",
        failure: "Gagal menyimpan layanan",
    };

    #[test]
    fn mutation_success_invalidates_then_toasts() {
        let client = QueryClient::default();
        let calls = Rc::new(Cell::new(0));
        let key = QueryKey::new(QueryKind::Services);
        block_on(client.fetch(key.clone(), 0, counting(&calls, vec![]))).expect("fetches");
        block_on(client.mutate(SAVE, async { Ok::<_, AsistenkuError>(()) })).expect("mutates");
        assert!(!client.is_cached(&key));
        let toast = client.toasts().last().expect("toast");
        assert_eq!((toast.kind, toast.message.as_str()), (ToastKind::Success, "Layanan disimpan"));
    }

    #[test]
    fn mutation_failure_keeps_cache_and_prefers_server_message() {
        let client = QueryClient::default();
        let calls = Rc::new(Cell::new(0));
        let key = QueryKey::new(QueryKind::Services);
        block_on(client.fetch(key.clone(), 0, counting(&calls, vec![]))).expect("fetches");

        let failed = block_on(client.mutate(SAVE, async {
            Err::<(), _>(AsistenkuError::Backend("Nama layanan sudah dipakai".to_string()))
        }));
        assert!(failed.is_err());
        assert!(client.is_cached(&key));
        let message = client.toasts().last().map(|t| t.message);
        assert_eq!(message.as_deref(), Some("Nama layanan sudah dipakai"));

        let undecodable = async { Err::<(), _>(AsistenkuError::Decode("bad".to_string())) };
        let _ = block_on(client.mutate(SAVE, undecodable));
        let message = client.toasts().last().map(|t| t.message);
        assert_eq!(message.as_deref(), Some("Gagal menyimpan layanan"));
    }

    #[test]
    fn mutation_before_ready_shows_banner_instead_of_toast() {
        let client = QueryClient::default();
        let not_ready = async { Err::<(), _>(AsistenkuError::ActorNotReady) };
        let result = block_on(client.mutate(SAVE, not_ready));
        assert_eq!(result, Err(AsistenkuError::ActorNotReady));
        assert!(client.toasts().is_empty());
        assert_eq!(client.connection(), ConnectionState::Connecting);
    }
}
