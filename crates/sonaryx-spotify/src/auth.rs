// SPDX-FileCopyrightText: 2026 Sonaryx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client-credentials access token cache.
//!
//! A token is reused until one minute before it expires. Refresh happens
//! lazily on the next request rather than on a timer.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

/// How long before expiry a token is considered stale.
pub const REFRESH_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    refresh_at: Instant,
}

/// Holds the current access token, if any.
#[derive(Debug, Default)]
pub struct TokenCache {
    inner: Mutex<Option<CachedToken>>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached token, unless it is within the refresh margin.
    pub async fn current(&self) -> Option<String> {
        let guard = self.inner.lock().await;
        guard
            .as_ref()
            .filter(|t| Instant::now() < t.refresh_at)
            .map(|t| t.value.clone())
    }

    /// Store a token that lives for `expires_in` from now.
    pub async fn store(&self, value: String, expires_in: Duration) {
        let refresh_at = Instant::now() + expires_in.saturating_sub(REFRESH_MARGIN);
        *self.inner.lock().await = Some(CachedToken { value, refresh_at });
    }

    /// Drop the token, e.g. after the API rejected it.
    pub async fn invalidate(&self) {
        *self.inner.lock().await = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn token_goes_stale_one_minute_before_expiry() {
        let cache = TokenCache::new();
        cache.store("tok".into(), Duration::from_secs(3600)).await;
        assert_eq!(cache.current().await.as_deref(), Some("tok"));

        tokio::time::advance(Duration::from_secs(3600 - 61)).await;
        assert_eq!(cache.current().await.as_deref(), Some("tok"));

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(cache.current().await.is_none());
    }

    #[tokio::test]
    async fn short_lived_token_is_immediately_stale() {
        let cache = TokenCache::new();
        cache.store("tok".into(), Duration::from_secs(30)).await;
        assert!(cache.current().await.is_none());
    }

    #[tokio::test]
    async fn invalidate_clears_token() {
        let cache = TokenCache::new();
        cache.store("tok".into(), Duration::from_secs(3600)).await;
        cache.invalidate().await;
        assert!(cache.current().await.is_none());
    }
}
