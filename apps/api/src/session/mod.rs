//! Per-visitor sessions. Each session owns its own state store and
//! navigator behind an async mutex, so actions on one session run one at a
//! time and nothing is shared between sessions.
//!
//! Sessions live until they sit idle past the configured TTL. Idle sessions
//! are swept whenever a new one is initialized, so the live-session cap only
//! counts visitors that are still around.

pub mod handlers;
pub mod upload;

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::navigation::Navigator;
use crate::store::ids::IdMode;
use crate::store::StateStore;

pub struct Session {
    pub store: StateStore,
    pub navigator: Navigator,
}

impl Session {
    pub fn new(id_mode: IdMode) -> Self {
        let store = StateStore::new(id_mode.generator());
        let navigator = Navigator::new(store.default_section_key());
        Self { store, navigator }
    }
}

pub type SessionHandle = Arc<Mutex<Session>>;

struct SessionEntry {
    handle: SessionHandle,
    /// Milliseconds since the registry started, at the last access.
    last_seen: AtomicU64,
}

pub struct SessionRegistry {
    sessions: RwLock<HashMap<Uuid, SessionEntry>>,
    max_sessions: usize,
    idle_ttl: Duration,
    id_mode: IdMode,
    started: Instant,
}

impl SessionRegistry {
    pub fn new(max_sessions: usize, idle_ttl: Duration, id_mode: IdMode) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_sessions,
            idle_ttl,
            id_mode,
            started: Instant::now(),
        }
    }

    /// Mints a new session id and initializes its store.
    pub async fn create(&self) -> Result<Uuid, AppError> {
        let id = Uuid::new_v4();
        self.get_or_init(id).await?;
        Ok(id)
    }

    /// Returns the session for `id`, creating it on first access. Every call
    /// counts as activity for the idle TTL.
    pub async fn get_or_init(&self, id: Uuid) -> Result<SessionHandle, AppError> {
        let now = self.now_millis();
        if let Some(entry) = self.sessions.read().await.get(&id) {
            entry.last_seen.store(now, Ordering::Relaxed);
            return Ok(entry.handle.clone());
        }

        let mut sessions = self.sessions.write().await;
        if let Some(entry) = sessions.get(&id) {
            entry.last_seen.store(now, Ordering::Relaxed);
            return Ok(entry.handle.clone());
        }

        self.evict_idle(&mut sessions, now);
        if sessions.len() >= self.max_sessions {
            return Err(AppError::TooManySessions(self.max_sessions));
        }

        let handle = Arc::new(Mutex::new(Session::new(self.id_mode)));
        sessions.insert(
            id,
            SessionEntry {
                handle: handle.clone(),
                last_seen: AtomicU64::new(now),
            },
        );
        info!("Initialized session {id}");
        Ok(handle)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drops sessions idle for at least the TTL. A session whose handle is
    /// still held by a request is kept regardless of age.
    fn evict_idle(&self, sessions: &mut HashMap<Uuid, SessionEntry>, now: u64) {
        let ttl = self.idle_ttl.as_millis();
        sessions.retain(|id, entry| {
            let idle_for = now.saturating_sub(entry.last_seen.load(Ordering::Relaxed));
            let expired = u128::from(idle_for) >= ttl && Arc::strong_count(&entry.handle) == 1;
            if expired {
                info!("Evicted session {id} after {idle_for} ms idle");
            }
            !expired
        });
    }

    fn now_millis(&self) -> u64 {
        u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(60);

    #[tokio::test]
    async fn test_get_or_init_is_idempotent() {
        let registry = SessionRegistry::new(8, TTL, IdMode::Sequential);
        let id = registry.create().await.unwrap();

        let session = registry.get_or_init(id).await.unwrap();
        session
            .lock()
            .await
            .store
            .add_custom_section("Volunteering")
            .unwrap();

        let again = registry.get_or_init(id).await.unwrap();
        assert_eq!(again.lock().await.store.order().len(), 7);
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let registry = SessionRegistry::new(8, TTL, IdMode::Sequential);
        let a = registry.get_or_init(Uuid::new_v4()).await.unwrap();
        let b = registry.get_or_init(Uuid::new_v4()).await.unwrap();

        a.lock().await.store.add_custom_section("Awards").unwrap();

        assert_eq!(a.lock().await.store.order().len(), 7);
        assert_eq!(b.lock().await.store.order().len(), 6);
    }

    #[tokio::test]
    async fn test_session_cap_enforced() {
        let registry = SessionRegistry::new(1, TTL, IdMode::Random);
        let first = registry.create().await.unwrap();

        assert!(matches!(
            registry.create().await,
            Err(AppError::TooManySessions(1))
        ));
        // Existing sessions stay reachable at the cap.
        assert!(registry.get_or_init(first).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_session_frees_its_slot() {
        let registry = SessionRegistry::new(1, TTL, IdMode::Random);
        let first = registry.create().await.unwrap();
        assert!(registry.create().await.is_err());

        tokio::time::advance(TTL + Duration::from_secs(1)).await;

        let second = registry.create().await.unwrap();
        assert_ne!(first, second);
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_access_resets_idle_clock() {
        let registry = SessionRegistry::new(1, TTL, IdMode::Random);
        let first = registry.create().await.unwrap();

        tokio::time::advance(Duration::from_secs(40)).await;
        registry.get_or_init(first).await.unwrap();
        tokio::time::advance(Duration::from_secs(40)).await;

        assert!(matches!(
            registry.create().await,
            Err(AppError::TooManySessions(1))
        ));
    }

    #[tokio::test]
    async fn test_session_in_use_is_not_evicted() {
        let registry = SessionRegistry::new(1, Duration::ZERO, IdMode::Random);
        let first = registry.create().await.unwrap();
        let held = registry.get_or_init(first).await.unwrap();

        assert!(registry.create().await.is_err());

        drop(held);
        assert!(registry.create().await.is_ok());
        assert_eq!(registry.len().await, 1);
    }
}
