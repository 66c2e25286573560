use moka::future::Cache;
use std::time::Duration;

/// Live refresh tokens and revoked access tokens, keyed by token id.
///
/// Entries expire with the tokens they track, so the caches never outgrow
/// the set of tokens that could still verify.
#[derive(Clone)]
pub struct SessionStore {
    /// refresh jti => user id
    refresh: Cache<String, String>,
    revoked_access: Cache<String, ()>,
}

impl SessionStore {
    pub fn new(access_ttl: Duration, refresh_ttl: Duration) -> Self {
        Self {
            refresh: Cache::builder()
                .max_capacity(100_000)
                .time_to_live(refresh_ttl)
                .build(),
            revoked_access: Cache::builder()
                .max_capacity(100_000)
                .time_to_live(access_ttl)
                .build(),
        }
    }

    /// Starts a session on login.
    pub async fn open(&self, refresh_jti: &str, user_id: &str) {
        self.refresh
            .insert(refresh_jti.to_string(), user_id.to_string())
            .await;
    }

    pub async fn is_open(&self, refresh_jti: &str) -> bool {
        self.refresh.get(refresh_jti).await.is_some()
    }

    /// Swaps a refresh token for a new one. Fails if `old_jti` was already
    /// used or closed.
    pub async fn rotate(&self, old_jti: &str, new_jti: &str, user_id: &str) -> bool {
        match self.refresh.remove(old_jti).await {
            Some(owner) if owner == user_id => {
                self.open(new_jti, user_id).await;
                true
            }
            _ => false,
        }
    }

    /// Ends a session on logout. Idempotent.
    pub async fn close(&self, refresh_jti: &str) {
        self.refresh.invalidate(refresh_jti).await;
    }

    pub async fn revoke_access(&self, access_jti: &str) {
        self.revoked_access.insert(access_jti.to_string(), ()).await;
    }

    pub fn is_revoked(&self, access_jti: &str) -> bool {
        self.revoked_access.contains_key(access_jti)
    }
}
