//! Latest-wins fetch slots.
//!
//! Each dashboard panel owns one [`Superseding`] slot. Fetches are grouped by
//! the caller's client id: starting a new fetch for an id aborts the one that
//! id still has in flight, and a fetch that finishes after a newer one for the
//! same id started never reaches its caller. Different ids never interfere,
//! and a fetch without an id is never superseded.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use tokio::task::AbortHandle;
use tracing::debug;

use crate::error::{AppError, AppResult};

/// Longest client id accepted as a slot key.
pub const MAX_CLIENT_ID_LEN: usize = 64;

pub struct Superseding<T> {
    name: &'static str,
    generation: AtomicU64,
    running: Mutex<HashMap<String, (u64, AbortHandle)>>,
    _value: std::marker::PhantomData<fn() -> T>,
}

/// Registration of one run; dropping it evicts the run's entry if no newer
/// run replaced it, and aborts the fetch if it is still going.
struct InFlight<'a> {
    running: &'a Mutex<HashMap<String, (u64, AbortHandle)>>,
    key: String,
    gen: u64,
}

impl InFlight<'_> {
    fn is_current(&self) -> bool {
        self.running
            .lock()
            .map(|map| matches!(map.get(&self.key), Some((gen, _)) if *gen == self.gen))
            .unwrap_or(false)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if let Ok(mut map) = self.running.lock() {
            if matches!(map.get(&self.key), Some((gen, _)) if *gen == self.gen) {
                if let Some((_, handle)) = map.remove(&self.key) {
                    handle.abort();
                }
            }
        }
    }
}

impl<T> Superseding<T>
where
    T: Send + 'static,
{
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            generation: AtomicU64::new(0),
            running: Mutex::new(HashMap::new()),
            _value: std::marker::PhantomData,
        }
    }

    /// Number of clients with a fetch in flight.
    pub fn in_flight(&self) -> usize {
        self.running.lock().map(|map| map.len()).unwrap_or(0)
    }

    /// Run `fetch` as the newest request of `client`.
    ///
    /// Resolves to [`AppError::Superseded`] if the same client started another
    /// run before this one finished. Without a usable client id the fetch just
    /// runs to completion.
    pub async fn run<F>(&self, client: Option<&str>, fetch: F) -> AppResult<T>
    where
        F: Future<Output = AppResult<T>> + Send + 'static,
    {
        let Some(key) = client_key(client) else {
            return fetch.await;
        };

        // Generation bump and handle swap happen under one lock so that a
        // client's handles are always replaced in generation order.
        let (flight, handle) = {
            let mut running = self
                .running
                .lock()
                .map_err(|_| AppError::Internal(format!("{} fetch slot poisoned", self.name)))?;
            let gen = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            let handle = tokio::spawn(fetch);
            if let Some((_, previous)) = running.insert(key.clone(), (gen, handle.abort_handle())) {
                previous.abort();
            }
            let flight = InFlight {
                running: &self.running,
                key,
                gen,
            };
            (flight, handle)
        };

        let result = match handle.await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => {
                debug!(slot = self.name, gen = flight.gen, "Fetch aborted by a newer request");
                return Err(AppError::Superseded);
            }
            Err(e) => return Err(AppError::Internal(format!("{} fetch failed: {}", self.name, e))),
        };

        if !flight.is_current() {
            debug!(slot = self.name, gen = flight.gen, "Discarding stale fetch result");
            return Err(AppError::Superseded);
        }
        result
    }
}

fn client_key(client: Option<&str>) -> Option<String> {
    client
        .map(str::trim)
        .filter(|id| !id.is_empty() && id.len() <= MAX_CLIENT_ID_LEN)
        .map(str::to_string)
}
