//! In-flight request coalescing
//!
//! The first lookup for a key starts the upstream work as a shared future.
//! Identical lookups arriving while it runs await that same future and get
//! its outcome, failures and degraded answers included, so a slow or failing
//! upstream costs every waiter one round-trip instead of one each.

use std::collections::HashMap;
use std::future::Future;

use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::Mutex;
use tracing::debug;

type Call<T> = Shared<BoxFuture<'static, T>>;

struct Table<T> {
    next_id: u64,
    running: HashMap<String, (u64, Call<T>)>,
}

/// Running lookups keyed by cache key.
pub struct InFlight<T> {
    table: Mutex<Table<T>>,
}

impl<T> Default for InFlight<T> {
    fn default() -> Self {
        Self {
            table: Mutex::new(Table {
                next_id: 0,
                running: HashMap::new(),
            }),
        }
    }
}

impl<T> InFlight<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `call` for `key`, or joins the call already running for it.
    ///
    /// `call` is dropped unpolled when another lookup is already running.
    /// The entry is cleared by the first caller to see the call finish.
    pub async fn run<F>(&self, key: &str, call: F) -> T
    where
        F: Future<Output = T> + Send + 'static,
    {
        let (id, shared) = {
            let mut table = self.table.lock().await;
            let existing = table
                .running
                .get(key)
                .map(|(id, running)| (*id, running.clone()));

            match existing {
                Some(joined) => {
                    debug!(key, "joining in-flight lookup");
                    joined
                }
                None => {
                    table.next_id += 1;
                    let id = table.next_id;
                    let shared = call.boxed().shared();
                    table.running.insert(key.to_string(), (id, shared.clone()));
                    (id, shared)
                }
            }
        };

        let outcome = shared.await;

        let mut table = self.table.lock().await;
        if table.running.get(key).is_some_and(|(running, _)| *running == id) {
            table.running.remove(key);
        }
        outcome
    }

    /// Number of keys with a running lookup.
    pub async fn len(&self) -> usize {
        self.table.lock().await.running.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    fn counted(
        calls: &Arc<AtomicUsize>,
        delay: Duration,
        outcome: Result<u32, String>,
    ) -> impl Future<Output = Result<u32, String>> + Send + 'static {
        let calls = Arc::clone(calls);
        async move {
            calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(delay).await;
            outcome
        }
    }

    #[tokio::test]
    async fn test_joined_callers_share_one_call() {
        let flights = Arc::new(InFlight::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let flights = Arc::clone(&flights);
                let call = counted(&calls, Duration::from_millis(50), Ok(7));
                tokio::spawn(async move { flights.run("prices:DZ5485-612", call).await })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.await.unwrap(), Ok(7));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(flights.len().await, 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_failure_is_shared_not_retried_in_turn() {
        let flights = Arc::new(InFlight::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let started = Instant::now();

        let handles: Vec<_> = (0..5)
            .map(|_| {
                let flights = Arc::clone(&flights);
                let call = counted(&calls, Duration::from_millis(200), Err("down".to_string()));
                tokio::spawn(async move { flights.run("search:dunk:5", call).await })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.await.unwrap(), Err("down".to_string()));
        }
        assert!(started.elapsed() < Duration::from_millis(600));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_distinct_keys_run_separately() {
        let flights = InFlight::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let (a, b) = tokio::join!(
            flights.run("search:dunk:5", counted(&calls, Duration::from_millis(20), Ok(1))),
            flights.run("search:dunk:6", counted(&calls, Duration::from_millis(20), Ok(2))),
        );

        assert_eq!((a, b), (Ok(1), Ok(2)));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_finished_key_runs_again() {
        let flights = InFlight::new();
        let calls = Arc::new(AtomicUsize::new(0));

        flights.run("k", counted(&calls, Duration::ZERO, Ok(1))).await.unwrap();
        assert_eq!(flights.len().await, 0);
        flights.run("k", counted(&calls, Duration::ZERO, Ok(2))).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
