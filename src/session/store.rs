//! In-memory session registry
//!
//! The map lock is only held to look a session up. Each context sits behind
//! its own mutex, so a slow render for one browser never stalls another.

use super::context::SessionContext;
use super::filters::PageFilters;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info};
use uuid::Uuid;

/// Handle on one session's context
pub type SessionHandle = Arc<Mutex<SessionContext>>;

#[derive(Debug)]
struct SessionSlot {
    context: SessionHandle,
    /// Milliseconds since the store's epoch
    last_seen: AtomicU64,
}

/// One context per session id, shared by the HTTP handlers
#[derive(Debug, Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, SessionSlot>>>,
    defaults: Arc<PageFilters>,
    epoch: Instant,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_defaults(PageFilters::default())
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store whose new sessions start from `defaults`
    pub fn with_defaults(defaults: PageFilters) -> Self {
        Self {
            sessions: Arc::default(),
            defaults: Arc::new(defaults),
            epoch: Instant::now(),
        }
    }

    /// Filter records a new or reset session starts from
    pub fn defaults(&self) -> &PageFilters {
        &self.defaults
    }

    /// A fresh session id
    pub fn mint_id() -> String {
        Uuid::new_v4().to_string()
    }

    fn now_millis(&self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }

    /// The session's context, created when absent. Marks the session as seen.
    pub async fn session(&self, session_id: &str) -> SessionHandle {
        let now = self.now_millis();
        if let Some(slot) = self.sessions.read().await.get(session_id) {
            slot.last_seen.store(now, Ordering::Relaxed);
            return slot.context.clone();
        }

        let mut sessions = self.sessions.write().await;
        let slot = sessions.entry(session_id.to_string()).or_insert_with(|| {
            debug!(session = session_id, "New session");
            SessionSlot {
                context: Arc::new(Mutex::new(SessionContext::with_filters(
                    session_id,
                    (*self.defaults).clone(),
                ))),
                last_seen: AtomicU64::new(now),
            }
        });
        slot.last_seen.store(now, Ordering::Relaxed);
        slot.context.clone()
    }

    /// Run `f` on the session's context, creating it when absent
    pub async fn with_session<F, R>(&self, session_id: &str, f: F) -> R
    where
        F: FnOnce(&mut SessionContext) -> R,
    {
        let handle = self.session(session_id).await;
        let mut ctx = handle.lock().await;
        f(&mut ctx)
    }

    pub async fn snapshot(&self, session_id: &str) -> Option<SessionContext> {
        let handle = self.sessions.read().await.get(session_id).map(|slot| slot.context.clone())?;
        let ctx = handle.lock().await;
        Some(ctx.clone())
    }

    pub async fn remove(&self, session_id: &str) -> Option<SessionContext> {
        let slot = self.sessions.write().await.remove(session_id)?;
        let ctx = slot.context.lock().await;
        Some(ctx.clone())
    }

    /// Drop sessions not seen for `max_idle`. Sessions with a request in
    /// flight are kept. Returns the number dropped.
    pub async fn expire_idle(&self, max_idle: Duration) -> usize {
        let cutoff = self.now_millis().saturating_sub(max_idle.as_millis() as u64);
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, slot| {
            slot.last_seen.load(Ordering::Relaxed) > cutoff || Arc::strong_count(&slot.context) > 1
        });
        before - sessions.len()
    }

    /// Sweep idle sessions every `interval` until the runtime stops
    pub fn spawn_sweeper(&self, max_idle: Duration, interval: Duration) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let expired = store.expire_idle(max_idle).await;
                if expired > 0 {
                    let remaining = store.len().await;
                    info!(expired, remaining, "Expired idle sessions");
                }
            }
        })
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::PageId;

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let store = SessionStore::new();
        store.with_session("a", |ctx| ctx.increment_page_view(PageId::Risks)).await;
        store.with_session("b", |ctx| ctx.filters.risks.min_value = 20).await;

        let a = store.snapshot("a").await.unwrap();
        let b = store.snapshot("b").await.unwrap();
        assert_eq!(a.page_views.get("risks"), Some(&1));
        assert_eq!(a.filters.risks.min_value, 5);
        assert!(b.page_views.is_empty());
        assert_eq!(b.filters.risks.min_value, 20);
        assert_eq!(store.len().await, 2);

        assert!(store.remove("a").await.is_some());
        assert!(store.snapshot("a").await.is_none());
    }

    #[tokio::test]
    async fn test_new_sessions_start_from_defaults() {
        let mut defaults = PageFilters::default();
        defaults.network.options.layout = agreste_layout::LayoutAlgorithm::Circular;
        let store = SessionStore::with_defaults(defaults);
        let layout = store.with_session("x", |ctx| ctx.filters.network.options.layout).await;
        assert_eq!(layout, agreste_layout::LayoutAlgorithm::Circular);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_busy_session_does_not_block_others() {
        let store = SessionStore::new();
        let busy = store.session("a").await;
        let guard = busy.lock().await;

        let started = Instant::now();
        let views = tokio::time::timeout(
            Duration::from_secs(2),
            store.with_session("b", |ctx| {
                ctx.increment_page_view(PageId::Network);
                ctx.page_views.len()
            }),
        )
        .await
        .unwrap();
        assert_eq!(views, 1);
        assert!(started.elapsed() < Duration::from_millis(200));

        let blocked = tokio::time::timeout(Duration::from_millis(50), store.with_session("a", |_| ())).await;
        assert!(blocked.is_err());
        drop(guard);
        store.with_session("a", |_| ()).await;
    }

    #[tokio::test]
    async fn test_idle_sessions_expire() {
        let store = SessionStore::new();
        store.session("stale").await;
        store.session("held").await;
        tokio::time::sleep(Duration::from_millis(120)).await;
        store.session("fresh").await;
        let held = store.session("held").await;
        tokio::time::sleep(Duration::from_millis(120)).await;
        store.session("fresh").await;

        assert_eq!(store.expire_idle(Duration::from_millis(60)).await, 1);
        assert!(store.snapshot("stale").await.is_none());
        assert!(store.snapshot("fresh").await.is_some());
        assert!(store.snapshot("held").await.is_some());

        drop(held);
        assert_eq!(store.expire_idle(Duration::from_millis(60)).await, 1);
        assert_eq!(store.len().await, 1);
    }

    #[test]
    fn test_minted_ids_are_unique() {
        assert_ne!(SessionStore::mint_id(), SessionStore::mint_id());
    }
}
