//! Cache-coherent snippet access.
//!
//! [`SnippetService`] is the only way callers touch snippets. It reads through
//! the LRU cache to the durable store, writes through both, and applies the
//! expiry and burn-after-read policies.
//!
//! Coherence rules:
//!
//! - Operations on one id are serialized by a striped async lock held across
//!   the store call.
//! - The cache is only cleared *before* a store mutation and only filled
//!   *after* the store confirms one. A failed, timed-out, or dropped call may
//!   leave the cache without an entry, never with a value the store disagrees
//!   with.
//! - Mutations carry a [`Deadline`] checked on the connection thread up to
//!   commit. A mutation that reports `Error::Timeout`, or whose future was
//!   dropped before the store reached it, leaves the row as it was.

use std::collections::hash_map::DefaultHasher;
use std::future::Future;
use std::hash::{Hash, Hasher};
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tokio::sync::{Mutex as AsyncMutex, MutexGuard};
use tracing::{debug, info, warn};

use crate::Error;
use crate::clock::{Clock, SystemClock, truncate_to_millis};
use crate::config::AppConfig;
use crate::db::{Deadline, SnippetDb};
use crate::ids::{IdGenerator, NanoId};
use crate::lru::LruCache;
use crate::snippet::{ExpiryClass, Language, Snippet};

const LOCK_STRIPES: usize = 64;

/// Fixed table of async locks; an id always maps to the same stripe.
struct KeyLocks {
    stripes: Box<[AsyncMutex<()>]>,
}

impl KeyLocks {
    fn new(stripes: usize) -> Self {
        Self { stripes: (0..stripes).map(|_| AsyncMutex::new(())).collect() }
    }

    async fn lock(&self, id: &str) -> MutexGuard<'_, ()> {
        let mut hasher = DefaultHasher::new();
        id.hash(&mut hasher);
        let stripe = (hasher.finish() % self.stripes.len() as u64) as usize;
        self.stripes[stripe].lock().await
    }
}

struct Inner {
    db: SnippetDb,
    cache: Mutex<LruCache<String, Snippet>>,
    locks: KeyLocks,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    store_timeout: Duration,
    id_attempts: u32,
}

/// Coordinator between the LRU cache and the durable store.
///
/// Cheap to clone; all clones share one cache and one store handle.
#[derive(Clone)]
pub struct SnippetService {
    inner: Arc<Inner>,
}

/// Wiring for a [`SnippetService`].
pub struct SnippetServiceBuilder {
    db: SnippetDb,
    cache_capacity: NonZeroUsize,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    store_timeout: Duration,
    id_attempts: u32,
}

impl SnippetServiceBuilder {
    pub fn cache_capacity(mut self, capacity: NonZeroUsize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn id_generator(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Arc::new(ids);
        self
    }

    pub fn store_timeout(mut self, timeout: Duration) -> Self {
        self.store_timeout = timeout;
        self
    }

    /// Attempts per create; values below one are treated as one.
    pub fn id_attempts(mut self, attempts: u32) -> Self {
        self.id_attempts = attempts.max(1);
        self
    }

    pub fn build(self) -> SnippetService {
        SnippetService {
            inner: Arc::new(Inner {
                db: self.db,
                cache: Mutex::new(LruCache::new(self.cache_capacity)),
                locks: KeyLocks::new(LOCK_STRIPES),
                clock: self.clock,
                ids: self.ids,
                store_timeout: self.store_timeout,
                id_attempts: self.id_attempts,
            }),
        }
    }
}

impl SnippetService {
    pub fn builder(db: SnippetDb) -> SnippetServiceBuilder {
        let defaults = AppConfig::default();
        SnippetServiceBuilder {
            db,
            cache_capacity: defaults.cache_capacity(),
            clock: Arc::new(SystemClock),
            ids: Arc::new(NanoId::default()),
            store_timeout: defaults.store_timeout(),
            id_attempts: defaults.id_max_attempts,
        }
    }

    /// Open the configured database and wire a service around it.
    pub async fn from_config(config: &AppConfig) -> Result<Self, Error> {
        let db = SnippetDb::open(&config.db_path).await?;
        Ok(Self::builder(db)
            .cache_capacity(config.cache_capacity())
            .id_generator(NanoId::new(config.id_length))
            .store_timeout(config.store_timeout())
            .id_attempts(config.id_max_attempts)
            .build())
    }

    /// Store a new snippet and return it as persisted.
    ///
    /// A generated id that already exists is replaced by a fresh one, up to the
    /// configured number of attempts.
    pub async fn create(
        &self, text: impl Into<String>, burn_after_read: bool, expiry: ExpiryClass, language: Language,
    ) -> Result<Snippet, Error> {
        let text = text.into();
        let created_at = self.now();
        let expires_at = expiry.expires_at(created_at);

        for attempt in 1..=self.inner.id_attempts {
            let snippet = Snippet {
                id: self.inner.ids.generate(),
                text: text.clone(),
                language,
                burn_after_read,
                is_read: false,
                created_at,
                expires_at,
            };

            let _guard = self.inner.locks.lock(&snippet.id).await;
            let deadline = self.deadline();
            let _armed = deadline.arm();
            match self.inner.db.insert_snippet_by(&snippet, &deadline).await {
                Ok(()) => {
                    self.cache_put(&snippet);
                    info!(id = %snippet.id, %expiry, %language, burn_after_read, "created snippet");
                    return Ok(snippet);
                }
                Err(Error::IdentifierCollision(id)) => {
                    warn!(%id, attempt, "generated snippet id already exists; retrying");
                }
                Err(e) => return Err(e),
            }
        }

        Err(Error::IdentifiersExhausted(self.inner.id_attempts))
    }

    /// Fetch a live snippet.
    ///
    /// Expired snippets are deleted and reported as absent. A burn-after-read
    /// snippet is deleted and returned once. Otherwise the first read persists
    /// `is_read = true` and returns the snippet as it was before that read.
    pub async fn get_by_id(&self, id: &str) -> Result<Option<Snippet>, Error> {
        let _guard = self.inner.locks.lock(id).await;
        let now = self.now();

        let cached = self.inner.cache.lock().get(id).cloned();
        let snippet = match cached {
            Some(snippet) => {
                debug!(%id, "snippet cache hit");
                snippet
            }
            None => {
                debug!(%id, "snippet cache miss");
                match self.bounded("find_snippet", self.inner.db.find_snippet(id)).await? {
                    Some(snippet) => snippet,
                    None => return Ok(None),
                }
            }
        };

        if snippet.is_expired_at(now) {
            self.remove(id).await?;
            debug!(%id, "removed expired snippet on read");
            return Ok(None);
        }

        if snippet.burn_after_read {
            self.remove(id).await?;
            info!(%id, "burned snippet after read");
            return Ok(Some(snippet));
        }

        if snippet.is_read {
            self.cache_put(&snippet);
        } else {
            let marked = Snippet { is_read: true, ..snippet.clone() };
            self.write_through(&marked).await?;
        }

        Ok(Some(snippet))
    }

    /// Persist a read-state transition and refresh the cache.
    ///
    /// Content and timestamps are never rewritten; the returned value is the
    /// row as stored. Returns None if the snippet no longer exists.
    pub async fn update(&self, snippet: &Snippet) -> Result<Option<Snippet>, Error> {
        let _guard = self.inner.locks.lock(&snippet.id).await;
        self.write_through(snippet).await
    }

    /// Delete a snippet from both tiers. Returns whether the store held it.
    pub async fn delete(&self, id: &str) -> Result<bool, Error> {
        let _guard = self.inner.locks.lock(id).await;
        let existed = self.remove(id).await?;
        debug!(%id, existed, "deleted snippet");
        Ok(existed)
    }

    /// Remove every snippet whose expiry has passed. Returns how many rows went.
    pub async fn sweep_expired(&self) -> Result<usize, Error> {
        let now = self.now();
        let ids = self
            .bounded("find_expired_ids", self.inner.db.find_expired_ids(now))
            .await?;
        if ids.is_empty() {
            debug!("sweep found no expired snippets");
            return Ok(0);
        }

        let deadline = self.deadline();
        let _armed = deadline.arm();
        let removed = self.inner.db.delete_snippets_by(&ids, &deadline).await?;

        for id in &ids {
            let _guard = self.inner.locks.lock(id).await;
            self.inner.cache.lock().delete(id.as_str());
        }

        info!(removed, candidates = ids.len(), "swept expired snippets");
        Ok(removed as usize)
    }

    /// Number of snippets currently held in memory.
    pub fn cached_len(&self) -> usize {
        self.inner.cache.lock().len()
    }

    /// Whether `id` is currently held in memory, without touching recency.
    pub fn is_cached(&self, id: &str) -> bool {
        self.inner.cache.lock().contains(id)
    }

    pub fn db(&self) -> &SnippetDb {
        &self.inner.db
    }

    fn now(&self) -> DateTime<Utc> {
        truncate_to_millis(self.inner.clock.now())
    }

    fn cache_put(&self, snippet: &Snippet) {
        if let Some((evicted, _)) = self.inner.cache.lock().put(snippet.id.clone(), snippet.clone()) {
            debug!(id = %evicted, "evicted snippet from cache");
        }
    }

    /// Caller must hold the id's lock.
    async fn remove(&self, id: &str) -> Result<bool, Error> {
        self.inner.cache.lock().delete(id);
        let deadline = self.deadline();
        let _armed = deadline.arm();
        self.inner.db.delete_snippet_by(id, &deadline).await
    }

    /// Caller must hold the id's lock.
    async fn write_through(&self, snippet: &Snippet) -> Result<Option<Snippet>, Error> {
        self.inner.cache.lock().delete(snippet.id.as_str());
        let deadline = self.deadline();
        let _armed = deadline.arm();
        let stored = self.inner.db.update_snippet_by(snippet, &deadline).await?;
        if let Some(stored) = &stored {
            self.cache_put(stored);
        }
        Ok(stored)
    }

    fn deadline(&self) -> Deadline {
        Deadline::after(self.inner.store_timeout)
    }

    /// Bounds a read. Mutations use [`Deadline`] instead: a timed-out call
    /// still runs on the connection thread.
    async fn bounded<T>(&self, op: &str, fut: impl Future<Output = Result<T, Error>>) -> Result<T, Error> {
        tokio::time::timeout(self.inner.store_timeout, fut)
            .await
            .map_err(|_| Error::Timeout(format!("{op} exceeded {}ms", self.inner.store_timeout.as_millis())))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use chrono::{Duration as ChronoDuration, TimeZone};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 4, 10, 0, 0).unwrap()
    }

    async fn service_with(clock: ManualClock, capacity: usize) -> SnippetService {
        let db = SnippetDb::open_in_memory().await.unwrap();
        SnippetService::builder(db)
            .clock(clock)
            .cache_capacity(NonZeroUsize::new(capacity).unwrap())
            .build()
    }

    async fn service() -> (SnippetService, ManualClock) {
        let clock = ManualClock::new(start());
        (service_with(clock.clone(), 100).await, clock)
    }

    /// Replays a fixed list of ids, repeating the last one forever.
    struct ScriptedIds {
        ids: Vec<&'static str>,
        next: AtomicUsize,
    }

    impl ScriptedIds {
        fn new(ids: Vec<&'static str>) -> Self {
            Self { ids, next: AtomicUsize::new(0) }
        }
    }

    impl IdGenerator for ScriptedIds {
        fn generate(&self) -> String {
            let i = self.next.fetch_add(1, Ordering::SeqCst).min(self.ids.len() - 1);
            self.ids[i].to_string()
        }
    }

    /// Blocks the store's connection thread for `hold`; returns once the block has started.
    async fn stall_connection(db: &SnippetDb, hold: Duration) -> tokio::task::JoinHandle<()> {
        let (started_tx, started_rx) = tokio::sync::oneshot::channel();
        let conn = db.conn.clone();
        let handle = tokio::spawn(async move {
            let _ = conn
                .call(move |_| -> Result<(), Error> {
                    let _ = started_tx.send(());
                    std::thread::sleep(hold);
                    Ok(())
                })
                .await;
        });
        started_rx.await.unwrap();
        handle
    }

    #[tokio::test]
    async fn test_create_then_get_round_trip() {
        let (svc, _) = service().await;
        let created = svc
            .create("fn main() {}", false, ExpiryClass::OneHour, Language::Rust)
            .await
            .unwrap();

        assert_eq!(created.expires_at, Some(start() + ChronoDuration::hours(1)));
        assert!(svc.is_cached(&created.id));

        let fetched = svc.get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_get_reads_through_on_cache_miss() {
        let (svc, _) = service().await;
        let created = svc.create("text", false, ExpiryClass::Never, Language::Plaintext).await.unwrap();

        svc.inner.cache.lock().clear();
        let fetched = svc.get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
        assert!(svc.is_cached(&created.id));
    }

    #[tokio::test]
    async fn test_get_missing() {
        let (svc, _) = service().await;
        assert!(svc.get_by_id("nope").await.unwrap().is_none());
        assert!(!svc.is_cached("nope"));
    }

    #[tokio::test]
    async fn test_first_read_marks_is_read() {
        let (svc, _) = service().await;
        let created = svc.create("text", false, ExpiryClass::OneDay, Language::Go).await.unwrap();

        let first = svc.get_by_id(&created.id).await.unwrap().unwrap();
        assert!(!first.is_read);

        let cached = svc.inner.cache.lock().peek(created.id.as_str()).cloned().unwrap();
        assert!(cached.is_read);
        let stored = svc.db().find_snippet(&created.id).await.unwrap().unwrap();
        assert!(stored.is_read);

        let second = svc.get_by_id(&created.id).await.unwrap().unwrap();
        assert!(second.is_read);
        assert_eq!(second.text, created.text);
    }

    #[tokio::test]
    async fn test_one_minute_expiry_scenario() {
        let (svc, clock) = service().await;
        let created = svc.create("short lived", false, ExpiryClass::OneMinute, Language::Plaintext).await.unwrap();

        clock.advance(ChronoDuration::seconds(30));
        assert!(svc.get_by_id(&created.id).await.unwrap().is_some());

        clock.advance(ChronoDuration::seconds(31));
        assert!(svc.get_by_id(&created.id).await.unwrap().is_none());
        assert!(svc.db().find_snippet(&created.id).await.unwrap().is_none());
        assert!(!svc.is_cached(&created.id));
    }

    #[tokio::test]
    async fn test_expired_row_on_cache_miss_is_removed() {
        let (svc, clock) = service().await;
        let created = svc.create("x", false, ExpiryClass::OneMinute, Language::Plaintext).await.unwrap();
        svc.inner.cache.lock().clear();

        clock.advance(ChronoDuration::minutes(1));
        assert!(svc.get_by_id(&created.id).await.unwrap().is_none());
        assert_eq!(svc.db().count_snippets().await.unwrap(), 0);
        assert!(!svc.is_cached(&created.id));
    }

    #[tokio::test]
    async fn test_burn_after_read() {
        let (svc, _) = service().await;
        let created = svc.create("secret", true, ExpiryClass::OneDay, Language::Plaintext).await.unwrap();

        let first = svc.get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(first.text, "secret");

        assert!(svc.get_by_id(&created.id).await.unwrap().is_none());
        assert!(svc.get_by_id(&created.id).await.unwrap().is_none());
        assert!(svc.db().find_snippet(&created.id).await.unwrap().is_none());
        assert!(!svc.is_cached(&created.id));
    }

    #[tokio::test]
    async fn test_expired_burn_snippet_is_not_served() {
        let (svc, clock) = service().await;
        let created = svc.create("secret", true, ExpiryClass::OneMinute, Language::Plaintext).await.unwrap();

        clock.advance(ChronoDuration::minutes(2));
        assert!(svc.get_by_id(&created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_concurrent_burn_is_served_once() {
        let (svc, _) = service().await;
        let created = svc.create("once", true, ExpiryClass::OneDay, Language::Plaintext).await.unwrap();

        let readers: Vec<_> = (0..16)
            .map(|_| {
                let svc = svc.clone();
                let id = created.id.clone();
                tokio::spawn(async move { svc.get_by_id(&id).await.unwrap() })
            })
            .collect();

        let mut served = 0;
        for reader in readers {
            if reader.await.unwrap().is_some() {
                served += 1;
            }
        }
        assert_eq!(served, 1);
    }

    #[tokio::test]
    async fn test_delete_removes_both_tiers() {
        let (svc, _) = service().await;
        let created = svc.create("bye", false, ExpiryClass::OneHour, Language::Plaintext).await.unwrap();

        assert!(svc.delete(&created.id).await.unwrap());
        assert!(!svc.is_cached(&created.id));
        assert!(svc.db().find_snippet(&created.id).await.unwrap().is_none());
        assert!(svc.get_by_id(&created.id).await.unwrap().is_none());

        assert!(!svc.delete(&created.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_writes_through() {
        let (svc, _) = service().await;
        let created = svc.create("body", false, ExpiryClass::OneHour, Language::Plaintext).await.unwrap();

        let changed = Snippet { is_read: true, language: Language::Toml, text: "ignored".into(), ..created.clone() };
        let stored = svc.update(&changed).await.unwrap().unwrap();
        assert!(stored.is_read);
        assert_eq!(stored.language, Language::Toml);
        assert_eq!(stored.text, "body");

        let cached = svc.inner.cache.lock().peek(created.id.as_str()).cloned().unwrap();
        assert_eq!(cached, stored);
        assert_eq!(svc.db().find_snippet(&created.id).await.unwrap(), Some(stored));
    }

    #[tokio::test]
    async fn test_update_missing_does_not_cache() {
        let (svc, _) = service().await;
        let ghost = Snippet {
            id: "ghost".into(),
            text: "boo".into(),
            language: Language::Plaintext,
            burn_after_read: false,
            is_read: true,
            created_at: start(),
            expires_at: None,
        };

        assert!(svc.update(&ghost).await.unwrap().is_none());
        assert!(!svc.is_cached("ghost"));
    }

    #[tokio::test]
    async fn test_sweep_expired() {
        let (svc, clock) = service().await;
        let mut expired = Vec::new();
        for _ in 0..3 {
            expired.push(svc.create("old", false, ExpiryClass::OneMinute, Language::Plaintext).await.unwrap());
        }
        let live = [
            svc.create("day", false, ExpiryClass::OneDay, Language::Plaintext).await.unwrap(),
            svc.create("forever", false, ExpiryClass::Never, Language::Plaintext).await.unwrap(),
        ];

        clock.advance(ChronoDuration::minutes(5));
        assert_eq!(svc.sweep_expired().await.unwrap(), 3);

        for snippet in &expired {
            assert!(!svc.is_cached(&snippet.id));
            assert!(svc.db().find_snippet(&snippet.id).await.unwrap().is_none());
        }
        for snippet in &live {
            assert!(svc.is_cached(&snippet.id));
            assert!(svc.db().find_snippet(&snippet.id).await.unwrap().is_some());
        }
        assert_eq!(svc.sweep_expired().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_id_collision_is_retried() {
        let db = SnippetDb::open_in_memory().await.unwrap();
        let svc = SnippetService::builder(db)
            .clock(ManualClock::new(start()))
            .id_generator(ScriptedIds::new(vec!["taken", "taken", "fresh"]))
            .build();

        let first = svc.create("a", false, ExpiryClass::Never, Language::Plaintext).await.unwrap();
        assert_eq!(first.id, "taken");

        let second = svc.create("b", false, ExpiryClass::Never, Language::Plaintext).await.unwrap();
        assert_eq!(second.id, "fresh");
        assert_eq!(svc.db().count_snippets().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_id_collision_exhausts() {
        let db = SnippetDb::open_in_memory().await.unwrap();
        let svc = SnippetService::builder(db)
            .id_generator(ScriptedIds::new(vec!["same"]))
            .id_attempts(2)
            .build();

        svc.create("a", false, ExpiryClass::Never, Language::Plaintext).await.unwrap();
        let result = svc.create("b", false, ExpiryClass::Never, Language::Plaintext).await;
        assert!(matches!(result, Err(Error::IdentifiersExhausted(2))));
        assert_eq!(svc.get_by_id("same").await.unwrap().unwrap().text, "a");
    }

    #[tokio::test]
    async fn test_cache_eviction_stays_coherent() {
        let svc = service_with(ManualClock::new(start()), 2).await;
        let a = svc.create("a", false, ExpiryClass::Never, Language::Plaintext).await.unwrap();
        let b = svc.create("b", false, ExpiryClass::Never, Language::Plaintext).await.unwrap();
        let c = svc.create("c", false, ExpiryClass::Never, Language::Plaintext).await.unwrap();

        assert_eq!(svc.cached_len(), 2);
        assert!(!svc.is_cached(&a.id));
        assert!(svc.is_cached(&b.id) && svc.is_cached(&c.id));

        assert_eq!(svc.get_by_id(&a.id).await.unwrap().unwrap().text, "a");
        assert!(svc.is_cached(&a.id));
        assert!(!svc.is_cached(&b.id));
    }

    #[tokio::test]
    async fn test_never_returns_expired_value() {
        let (svc, clock) = service().await;
        let mut ids = Vec::new();
        for class in [ExpiryClass::OneMinute, ExpiryClass::OneHour, ExpiryClass::OneDay, ExpiryClass::Never] {
            ids.push(svc.create("x", false, class, Language::Plaintext).await.unwrap().id);
        }

        for step in [30, 60, 3_600, 86_400, 86_401] {
            clock.set(start() + ChronoDuration::seconds(step));
            let now = clock.now();
            for id in &ids {
                if let Some(snippet) = svc.get_by_id(id).await.unwrap() {
                    assert!(!snippet.is_expired_at(now));
                }
            }
        }
    }

    #[tokio::test]
    async fn test_timed_out_mutations_leave_store_unchanged() {
        let db = SnippetDb::open_in_memory().await.unwrap();
        let svc = SnippetService::builder(db)
            .clock(ManualClock::new(start()))
            .store_timeout(Duration::from_millis(50))
            .build();
        let hold = Duration::from_millis(300);

        let plain = svc.create("plain", false, ExpiryClass::Never, Language::Plaintext).await.unwrap();
        let burn = svc.create("secret", true, ExpiryClass::Never, Language::Plaintext).await.unwrap();

        let stall = stall_connection(svc.db(), hold).await;
        assert!(matches!(svc.delete(&plain.id).await, Err(Error::Timeout(_))));
        stall.await.unwrap();
        assert_eq!(svc.db().find_snippet(&plain.id).await.unwrap(), Some(plain.clone()));

        let stall = stall_connection(svc.db(), hold).await;
        let changed = Snippet { is_read: true, language: Language::Rust, ..plain.clone() };
        assert!(matches!(svc.update(&changed).await, Err(Error::Timeout(_))));
        stall.await.unwrap();
        assert_eq!(svc.db().find_snippet(&plain.id).await.unwrap(), Some(plain.clone()));
        assert!(!svc.is_cached(&plain.id));

        let stall = stall_connection(svc.db(), hold).await;
        assert!(matches!(svc.get_by_id(&burn.id).await, Err(Error::Timeout(_))));
        stall.await.unwrap();
        assert_eq!(svc.db().find_snippet(&burn.id).await.unwrap(), Some(burn.clone()));
        assert_eq!(svc.get_by_id(&burn.id).await.unwrap().map(|s| s.text), Some("secret".to_string()));
        assert!(svc.get_by_id(&burn.id).await.unwrap().is_none());

        let stall = stall_connection(svc.db(), hold).await;
        let created = svc.create("late", false, ExpiryClass::Never, Language::Plaintext).await;
        assert!(matches!(created, Err(Error::Timeout(_))));
        stall.await.unwrap();
        assert_eq!(svc.db().count_snippets().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_dropped_delete_leaves_row() {
        let (svc, _) = service().await;
        let created = svc.create("keep me", false, ExpiryClass::Never, Language::Plaintext).await.unwrap();

        let stall = stall_connection(svc.db(), Duration::from_millis(200)).await;
        let gave_up = tokio::time::timeout(Duration::from_millis(20), svc.delete(&created.id)).await;
        assert!(gave_up.is_err());
        stall.await.unwrap();

        assert_eq!(svc.db().find_snippet(&created.id).await.unwrap(), Some(created.clone()));
        assert_eq!(svc.get_by_id(&created.id).await.unwrap().map(|s| s.id), Some(created.id));
    }
}
