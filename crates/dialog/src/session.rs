//! Session state and store
//!
//! Sessions are keyed by the opaque call identifier the telephony
//! layer assigns. The store hands out per-call leases so concurrent
//! turns for one call serialize while distinct calls proceed fully in
//! parallel; the store's own map is never held across an await.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::sync::{Mutex, OwnedMutexGuard};

use clinic_voice_core::{CallStage, TurnRecord};

/// Per-call mutable state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallSession {
    /// Consecutive empty utterances seen
    pub no_input_count: u32,
    /// Append-only turn log
    pub turns: Vec<TurnRecord>,
    /// Current lifecycle stage
    pub stage: CallStage,
    /// Last read or write, drives idle eviction
    pub last_activity: DateTime<Utc>,
}

impl Default for CallSession {
    fn default() -> Self {
        // A session materialized by a turn event is already past the
        // greeting and awaiting input.
        Self {
            no_input_count: 0,
            turns: Vec::new(),
            stage: CallStage::AwaitingInput,
            last_activity: Utc::now(),
        }
    }
}

impl CallSession {
    /// Fresh session at call start, before the welcome prompt
    pub fn greeting() -> Self {
        Self {
            stage: CallStage::Greeting,
            ..Self::default()
        }
    }

    /// Move to the next lifecycle stage
    pub fn advance(&mut self, to: CallStage) {
        if !self.stage.can_transition_to(to) {
            tracing::warn!(from = %self.stage, to = %to, "unexpected stage transition");
        }
        self.stage = to;
    }

    /// Record an empty utterance, returning the new count
    pub fn record_no_input(&mut self) -> u32 {
        self.no_input_count += 1;
        self.no_input_count
    }

    /// A non-blank utterance resets the silence counter
    pub fn reset_no_input(&mut self) {
        self.no_input_count = 0;
    }

    /// Append a completed exchange to the turn log
    pub fn push_turn(&mut self, turn: TurnRecord) {
        self.turns.push(turn);
    }

    /// Refresh the activity timestamp
    pub fn touch(&mut self) {
        self.last_activity = Utc::now();
    }

    /// Idle longer than `timeout`?
    pub fn is_idle(&self, timeout: Duration) -> bool {
        let idle = Utc::now().signed_duration_since(self.last_activity);
        idle.to_std().map(|d| d > timeout).unwrap_or(false)
    }
}

/// Guard serializing turns for a single call identifier
pub type SessionLease = OwnedMutexGuard<()>;

/// Session store interface
///
/// Snapshot semantics: `get` clones (a fresh default when absent),
/// `put` replaces atomically. Callers serialize a read-modify-write
/// sequence for one call by holding that call's [`SessionLease`];
/// nothing here blocks unrelated call identifiers.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Session snapshot, a fresh default when absent
    async fn get(&self, call_id: &str) -> CallSession;

    /// Full replace
    async fn put(&self, call_id: &str, session: CallSession);

    /// Drop the session for a finished call
    async fn remove(&self, call_id: &str);

    /// Acquire the per-call turn lease
    async fn lease(&self, call_id: &str) -> SessionLease;

    /// Number of live sessions
    async fn count(&self) -> usize;

    /// Live call identifiers
    async fn list(&self) -> Vec<String>;
}

/// In-memory store on a concurrency-safe keyed map
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: DashMap<String, CallSession>,
    // Lease entries outlive their session so an in-flight turn for a
    // removed call stays serialized against a late duplicate event.
    // Cleanup passes reclaim them once no session exists and no turn
    // holds a clone of the mutex.
    leases: DashMap<String, Arc<Mutex<()>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evict sessions idle longer than `timeout`, returning how many
    /// were removed
    pub fn cleanup_idle(&self, timeout: Duration) -> usize {
        let idle: Vec<String> = self
            .sessions
            .iter()
            .filter(|entry| entry.value().is_idle(timeout))
            .map(|entry| entry.key().clone())
            .collect();

        for call_id in &idle {
            self.sessions.remove(call_id);
            tracing::info!(call_id = %call_id, "evicted idle session");
        }

        // Reclaim lease entries whose session is gone (idle eviction or
        // call-end removal) and whose mutex no one else still holds.
        self.leases.retain(|call_id, mutex| {
            self.sessions.contains_key(call_id) || Arc::strong_count(mutex) > 1
        });

        idle.len()
    }

    /// Start a background task that periodically evicts idle sessions
    ///
    /// Returns a shutdown sender; send `true` to stop the task.
    pub fn start_cleanup_task(
        self: &Arc<Self>,
        idle_timeout: Duration,
        interval: Duration,
    ) -> watch::Sender<bool> {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let store = Arc::clone(self);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let removed = store.cleanup_idle(idle_timeout);
                        if removed > 0 {
                            tracing::info!(removed, remaining = store.sessions.len(),
                                "session cleanup pass");
                        }
                    }
                    _ = shutdown_rx.changed() => {
                        if *shutdown_rx.borrow() {
                            tracing::info!("session cleanup task shutting down");
                            break;
                        }
                    }
                }
            }
        });

        shutdown_tx
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, call_id: &str) -> CallSession {
        self.sessions
            .get(call_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    async fn put(&self, call_id: &str, session: CallSession) {
        self.sessions.insert(call_id.to_string(), session);
    }

    async fn remove(&self, call_id: &str) {
        self.sessions.remove(call_id);
    }

    async fn lease(&self, call_id: &str) -> SessionLease {
        let mutex = self
            .leases
            .entry(call_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .value()
            .clone();
        mutex.lock_owned().await
    }

    async fn count(&self) -> usize {
        self.sessions.len()
    }

    async fn list(&self) -> Vec<String> {
        self.sessions.iter().map(|e| e.key().clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_absent_is_fresh_default() {
        let store = InMemorySessionStore::new();
        let session = store.get("CA-missing").await;
        assert_eq!(session.no_input_count, 0);
        assert!(session.turns.is_empty());
        assert_eq!(session.stage, CallStage::AwaitingInput);
        // Defensive get does not create an entry
        assert_eq!(store.count().await, 0);
    }

    #[tokio::test]
    async fn test_put_replaces() {
        let store = InMemorySessionStore::new();
        let mut session = CallSession::default();
        session.record_no_input();
        store.put("CA-1", session).await;

        assert_eq!(store.get("CA-1").await.no_input_count, 1);
        store.put("CA-1", CallSession::default()).await;
        assert_eq!(store.get("CA-1").await.no_input_count, 0);
        assert_eq!(store.count().await, 1);
    }

    #[tokio::test]
    async fn test_remove() {
        let store = InMemorySessionStore::new();
        store.put("CA-1", CallSession::default()).await;
        store.remove("CA-1").await;
        assert_eq!(store.count().await, 0);
        assert!(store.list().await.is_empty());
    }

    #[tokio::test]
    async fn test_lease_serializes_same_call() {
        let store = Arc::new(InMemorySessionStore::new());

        let first = store.lease("CA-1").await;
        // A second lease for the same call must wait
        let pending = {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                let _lease = store.lease("CA-1").await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!pending.is_finished());

        drop(first);
        pending.await.unwrap();
    }

    #[tokio::test]
    async fn test_lease_does_not_block_other_calls() {
        let store = Arc::new(InMemorySessionStore::new());
        let _held = store.lease("CA-1").await;
        // Different call identifier proceeds immediately
        let _other = store.lease("CA-2").await;
    }

    #[tokio::test]
    async fn test_cleanup_idle() {
        let store = InMemorySessionStore::new();
        let mut stale = CallSession::default();
        stale.last_activity = Utc::now() - chrono::Duration::hours(2);
        store.put("CA-old", stale).await;
        store.put("CA-new", CallSession::default()).await;

        let removed = store.cleanup_idle(Duration::from_secs(3600));
        assert_eq!(removed, 1);
        assert_eq!(store.list().await, vec!["CA-new".to_string()]);
    }

    #[tokio::test]
    async fn test_cleanup_reclaims_leases_of_removed_calls() {
        let store = InMemorySessionStore::new();
        store.put("CA-1", CallSession::default()).await;
        drop(store.lease("CA-1").await);
        store.remove("CA-1").await;
        assert_eq!(store.leases.len(), 1);

        store.cleanup_idle(Duration::from_secs(3600));
        assert!(store.leases.is_empty());
    }

    #[tokio::test]
    async fn test_cleanup_keeps_leases_still_held() {
        let store = InMemorySessionStore::new();
        let held = store.lease("CA-1").await;

        // No session exists for CA-1, but a turn is still in flight
        store.cleanup_idle(Duration::from_secs(3600));
        assert_eq!(store.leases.len(), 1);

        drop(held);
        store.cleanup_idle(Duration::from_secs(3600));
        assert!(store.leases.is_empty());
    }

    #[test]
    fn test_stage_helpers() {
        let mut session = CallSession::greeting();
        assert_eq!(session.stage, CallStage::Greeting);
        session.advance(CallStage::AwaitingInput);
        session.advance(CallStage::Responding);
        session.advance(CallStage::Ended);
        assert!(session.stage.is_terminal());
    }

    #[test]
    fn test_no_input_counter() {
        let mut session = CallSession::default();
        assert_eq!(session.record_no_input(), 1);
        assert_eq!(session.record_no_input(), 2);
        session.reset_no_input();
        assert_eq!(session.no_input_count, 0);
    }
}
