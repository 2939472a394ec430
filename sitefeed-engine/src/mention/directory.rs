use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

use crate::api::FeedApi;
use sitefeed_types::MentionSuggestion;

/// How long a fetched roster stays valid.
pub const DIRECTORY_TTL: Duration = Duration::from_secs(5 * 60);

/// Directory page size requested from the backend; large enough to cover
/// a whole company roster in one page.
const DIRECTORY_PAGE_SIZE: u32 = 200;

struct DirectoryCache {
    roster: Vec<MentionSuggestion>,
    fetched_at: Option<Instant>,
}

/// Process-wide cached roster of mentionable users.
///
/// One directory is created at startup and a clone of the handle is
/// injected into every composer; all of them observe the same data and
/// the same staleness clock. The cache outlives any single composer and
/// is never torn down within a session.
#[derive(Clone)]
pub struct MentionDirectory {
    api: Arc<dyn FeedApi>,
    ttl: Duration,
    cache: Arc<Mutex<DirectoryCache>>,
}

impl MentionDirectory {
    pub fn new(api: Arc<dyn FeedApi>) -> Self {
        Self::with_ttl(api, DIRECTORY_TTL)
    }

    /// Directory with a custom TTL; used by tests to control the
    /// staleness clock deterministically.
    pub fn with_ttl(api: Arc<dyn FeedApi>, ttl: Duration) -> Self {
        Self {
            api,
            ttl,
            cache: Arc::new(Mutex::new(DirectoryCache {
                roster: Vec::new(),
                fetched_at: None,
            })),
        }
    }

    /// Return the roster, fetching it if the cache is absent or stale.
    ///
    /// Holding the cache lock across the fetch means concurrent callers
    /// share a single in-flight request: the first caller populates the
    /// cache, the rest see the fresh timestamp and return it. A failed
    /// fetch yields an empty roster without poisoning the cache, so the
    /// next access retries.
    pub async fn ensure_loaded(&self) -> Vec<MentionSuggestion> {
        let mut cache = self.cache.lock().await;

        if let Some(fetched_at) = cache.fetched_at {
            if fetched_at.elapsed() < self.ttl {
                return cache.roster.clone();
            }
        }

        match self.api.fetch_users(DIRECTORY_PAGE_SIZE).await {
            Ok(roster) => {
                cache.roster = roster.clone();
                cache.fetched_at = Some(Instant::now());
                log::debug!("mention directory refreshed: {} users", roster.len());
                roster
            }
            Err(err) => {
                log::error!("mention directory fetch failed: {}", err);
                Vec::new()
            }
        }
    }

    /// Drop any cached roster so the next access refetches.
    pub async fn reset(&self) {
        let mut cache = self.cache.lock().await;
        cache.roster.clear();
        cache.fetched_at = None;
    }
}
