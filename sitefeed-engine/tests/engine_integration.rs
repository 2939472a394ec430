//! End-to-end engine flows against a scripted transport: feed loading
//! with demo fallback, display ordering, the mention pipeline, and the
//! shared directory cache.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use uuid::Uuid;

use sitefeed_engine::api::{ApiError, ApiResult, FeedApi};
use sitefeed_engine::feed::{display_order, FeedStore, MutationCoordinator};
use sitefeed_engine::mention::{Composer, ComposerKey, MentionDirectory};
use sitefeed_types::*;

struct ScriptedApi {
    pages: Vec<FeedPage>,
    roster: Vec<MentionSuggestion>,
    user_fetches: AtomicU32,
    calls: Mutex<Vec<String>>,
}

impl ScriptedApi {
    fn new(pages: Vec<FeedPage>, roster: Vec<MentionSuggestion>) -> Self {
        Self {
            pages,
            roster,
            user_fetches: AtomicU32::new(0),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl FeedApi for ScriptedApi {
    async fn fetch_feed(&self, page: u32, _size: u32) -> ApiResult<FeedPage> {
        self.calls.lock().unwrap().push(format!("fetch_feed:{}", page));
        let total = self.pages.len() as u32;
        Ok(self
            .pages
            .get(page.saturating_sub(1) as usize)
            .cloned()
            .unwrap_or(FeedPage {
                items: Vec::new(),
                page,
                pages: total,
            }))
    }

    async fn create_post(&self, _request: CreatePostRequest) -> ApiResult<Post> {
        self.calls.lock().unwrap().push("create_post".to_string());
        Err(ApiError::Api("not scripted".to_string()))
    }

    async fn fetch_post(&self, id: &str) -> ApiResult<Post> {
        self.calls.lock().unwrap().push(format!("fetch_post:{}", id));
        Err(ApiError::NotFound(id.to_string()))
    }

    async fn delete_post(&self, id: &str) -> ApiResult<()> {
        self.calls.lock().unwrap().push(format!("delete:{}", id));
        Ok(())
    }

    async fn like_post(&self, id: &str) -> ApiResult<()> {
        self.calls.lock().unwrap().push(format!("like:{}", id));
        Ok(())
    }

    async fn unlike_post(&self, id: &str) -> ApiResult<()> {
        self.calls.lock().unwrap().push(format!("unlike:{}", id));
        Ok(())
    }

    async fn pin_post(&self, id: &str) -> ApiResult<()> {
        self.calls.lock().unwrap().push(format!("pin:{}", id));
        Ok(())
    }

    async fn unpin_post(&self, id: &str) -> ApiResult<()> {
        self.calls.lock().unwrap().push(format!("unpin:{}", id));
        Ok(())
    }

    async fn add_comment(&self, id: &str, _request: CreateCommentRequest) -> ApiResult<Post> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("add_comment:{}", id));
        Err(ApiError::Api("not scripted".to_string()))
    }

    async fn fetch_users(&self, _size: u32) -> ApiResult<Vec<MentionSuggestion>> {
        self.user_fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.roster.clone())
    }
}

fn worker(n: u128, first: &str, last: &str) -> Author {
    Author {
        id: Uuid::from_u128(n),
        first_name: first.to_string(),
        last_name: last.to_string(),
        role: "crew".to_string(),
        color: "#2a6f4e".to_string(),
    }
}

fn feed_post(id: &str, pinned: bool, hours_ago: i64) -> Post {
    Post {
        id: PostId::Real(id.to_string()),
        content: format!("update {}", id),
        author: worker(0xa0, "Marta", "Diaz"),
        audience: Audience::Everyone,
        pinned,
        urgent: false,
        created_at: Utc::now() - Duration::hours(hours_ago),
        likes: Vec::new(),
        like_count: 0,
        comments: Vec::new(),
    }
}

fn roster() -> Vec<MentionSuggestion> {
    vec![
        MentionSuggestion {
            id: Uuid::from_u128(0xb1),
            first_name: "Marta".to_string(),
            last_name: "Diaz".to_string(),
            role: "Site Supervisor".to_string(),
            color: "#2a6f4e".to_string(),
        },
        MentionSuggestion {
            id: Uuid::from_u128(0xb2),
            first_name: "Omar".to_string(),
            last_name: "Haddad".to_string(),
            role: "Project Manager".to_string(),
            color: "#8a4b12".to_string(),
        },
    ]
}

#[tokio::test]
async fn test_paged_load_and_display_order() {
    let api = Arc::new(ScriptedApi::new(
        vec![
            FeedPage {
                items: vec![feed_post("a", false, 1), feed_post("b", true, 40)],
                page: 1,
                pages: 2,
            },
            FeedPage {
                items: vec![feed_post("c", false, 60)],
                page: 2,
                pages: 2,
            },
        ],
        Vec::new(),
    ));
    let mut store = FeedStore::new();

    store.load(api.as_ref(), 1).await;
    assert!(store.has_more());
    store.load(api.as_ref(), 2).await;
    assert!(!store.has_more());
    assert_eq!(store.posts.len(), 3);

    // Pinned "b" leads despite being the oldest; the rest follow by recency
    let ordered = display_order(&store.posts);
    let ids: Vec<_> = ordered.iter().map(|p| p.id.to_string()).collect();
    assert_eq!(ids, vec!["b", "a", "c"]);
}

#[tokio::test]
async fn test_empty_backend_seeds_demo_feed_and_mutations_stay_local() {
    let api = Arc::new(ScriptedApi::new(
        vec![FeedPage {
            items: Vec::new(),
            page: 1,
            pages: 1,
        }],
        Vec::new(),
    ));
    let mut store = FeedStore::new();
    let mut coordinator =
        MutationCoordinator::new(api.clone(), worker(0xee, "Noor", "Aziz"));

    store.load(api.as_ref(), 1).await;
    assert!(!store.posts.is_empty());
    assert!(store.posts.iter().all(|p| p.id.is_demo()));

    let feed_calls = api.calls().len();
    let id = store.posts[0].id.clone();
    coordinator.toggle_like(&mut store, &id).await.unwrap();
    coordinator
        .add_comment(&mut store, &id, "looks good")
        .await
        .unwrap();

    assert_eq!(
        api.calls().len(),
        feed_calls,
        "demo mutations must not add transport calls"
    );
}

#[tokio::test]
async fn test_mention_pipeline_end_to_end() {
    let api = Arc::new(ScriptedApi::new(Vec::new(), roster()));
    let directory = MentionDirectory::new(api.clone());
    let mut composer = Composer::new(directory.clone());

    composer.set_text("handover to @om", 15);
    assert!(composer.is_suggesting());
    composer.refresh().await;

    composer.handle_key(ComposerKey::Enter);
    assert_eq!(composer.text(), "handover to @Omar ");
    assert!(!composer.is_suggesting());
}

#[tokio::test]
async fn test_directory_is_shared_across_composers() {
    let api = Arc::new(ScriptedApi::new(Vec::new(), roster()));
    let directory = MentionDirectory::new(api.clone());

    // Two independent composer surfaces share one roster fetch
    let mut first = Composer::new(directory.clone());
    let mut second = Composer::new(directory.clone());

    first.set_text("@ma", 3);
    first.refresh().await;
    second.set_text("@om", 3);
    second.refresh().await;

    assert_eq!(api.user_fetches.load(Ordering::SeqCst), 1);
    assert_eq!(second.panel().unwrap().candidates.len(), 1);
}
