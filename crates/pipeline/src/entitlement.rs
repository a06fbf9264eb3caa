//! Entitlement collaborator: gates whether a new generation may start.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use kvstore::{KvStore, Storage};

/// The free-tier limit is a product parameter injected by the host app,
/// never hard-coded in the orchestrator.
pub const DEFAULT_FREE_VIDEO_LIMIT: i64 = 1;

pub const VIDEO_COUNT_KEY: &str = "video_count";

#[async_trait]
pub trait Entitlement: Send + Sync {
    async fn can_create_video(&self) -> bool;

    /// Whether completed generations count against a usage limit. Premium
    /// sessions are not metered.
    fn is_metered(&self) -> bool;

    /// Called by the orchestrator exactly once per successful generation of
    /// a metered session.
    async fn increment_usage(&self) -> anyhow::Result<()>;

    /// Ask the host UI to present the paywall.
    fn show_paywall(&self);
}

/// Usage-counter entitlement: a persisted per-device counter against an
/// injected free limit, bypassed entirely for premium users.
pub struct UsageEntitlement<S: Storage> {
    store: Mutex<KvStore<S>>,
    free_limit: i64,
    premium: AtomicBool,
    paywall_visible: AtomicBool,
}

impl<S: Storage> UsageEntitlement<S> {
    pub fn new(store: KvStore<S>, free_limit: i64) -> Self {
        Self {
            store: Mutex::new(store),
            free_limit,
            premium: AtomicBool::new(false),
            paywall_visible: AtomicBool::new(false),
        }
    }

    pub fn set_premium(&self, premium: bool) {
        self.premium.store(premium, Ordering::SeqCst);
        if premium {
            self.hide_paywall();
        }
    }

    pub fn video_count(&self) -> i64 {
        self.store
            .lock()
            .unwrap()
            .get(VIDEO_COUNT_KEY)
            .ok()
            .flatten()
            .unwrap_or(0)
    }

    pub fn remaining_free_videos(&self) -> i64 {
        (self.free_limit - self.video_count()).max(0)
    }

    pub fn is_paywall_visible(&self) -> bool {
        self.paywall_visible.load(Ordering::SeqCst)
    }

    pub fn hide_paywall(&self) {
        self.paywall_visible.store(false, Ordering::SeqCst);
    }
}

#[async_trait]
impl<S: Storage + 'static> Entitlement for UsageEntitlement<S> {
    async fn can_create_video(&self) -> bool {
        self.premium.load(Ordering::SeqCst) || self.video_count() < self.free_limit
    }

    fn is_metered(&self) -> bool {
        !self.premium.load(Ordering::SeqCst)
    }

    async fn increment_usage(&self) -> anyhow::Result<()> {
        self.store.lock().unwrap().increment(VIDEO_COUNT_KEY, 1)?;
        Ok(())
    }

    fn show_paywall(&self) {
        self.paywall_visible.store(true, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kvstore::InMemoryStorage;

    fn entitlement(limit: i64) -> UsageEntitlement<InMemoryStorage> {
        UsageEntitlement::new(KvStore::new(InMemoryStorage::new()), limit)
    }

    #[tokio::test]
    async fn free_limit_blocks_after_enough_completions() {
        let ent = entitlement(1);
        assert!(ent.can_create_video().await);
        assert_eq!(ent.remaining_free_videos(), 1);

        ent.increment_usage().await.unwrap();

        assert!(!ent.can_create_video().await);
        assert_eq!(ent.remaining_free_videos(), 0);
    }

    #[tokio::test]
    async fn premium_bypasses_the_counter_and_is_not_metered() {
        let ent = entitlement(1);
        ent.increment_usage().await.unwrap();
        assert!(!ent.can_create_video().await);

        ent.set_premium(true);
        assert!(ent.can_create_video().await);
        assert!(!ent.is_metered());
    }

    #[tokio::test]
    async fn paywall_visibility_toggles() {
        let ent = entitlement(1);
        assert!(!ent.is_paywall_visible());
        ent.show_paywall();
        assert!(ent.is_paywall_visible());
        ent.hide_paywall();
        assert!(!ent.is_paywall_visible());
    }
}
