use std::time::{Duration, Instant};

use crate::api::FeedApi;
use sitefeed_types::{CreatePostRequest, Post, PostId};

use super::demo;

/// Page size requested from `GET /feed`.
pub const FEED_PAGE_SIZE: u32 = 10;

/// How long a transient notice stays visible.
const NOTICE_TTL: Duration = Duration::from_secs(3);

/// Holds the ordered post collection, the pagination cursor, and loading
/// state. The single source of truth for the feed; presenters derive from
/// it, mutation code writes through it.
pub struct FeedStore {
    pub posts: Vec<Post>,
    pub current_page: u32,
    pub total_pages: u32,
    pub loading: bool,
    // (text, shown-at); auto-expires, never a blocking dialog
    notice: Option<(String, Instant)>,
}

impl FeedStore {
    pub fn new() -> Self {
        Self {
            posts: Vec::new(),
            current_page: 0,
            total_pages: 0,
            loading: false,
            notice: None,
        }
    }

    pub fn has_more(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// Fetch one feed page. Page 1 replaces the collection, later pages
    /// append. An empty or failed page 1 substitutes the seeded
    /// demonstration collection so the feed is never blank; a failed
    /// later page leaves the collection unchanged.
    pub async fn load(&mut self, api: &dyn FeedApi, page: u32) {
        self.loading = true;

        match api.fetch_feed(page, FEED_PAGE_SIZE).await {
            Ok(fetched) => {
                if page == 1 {
                    if fetched.items.is_empty() {
                        log::info!("feed page 1 is empty, seeding demonstration posts");
                        self.seed_demo();
                    } else {
                        self.posts = fetched.items;
                        self.current_page = fetched.page;
                        self.total_pages = fetched.pages;
                    }
                } else {
                    self.posts.extend(fetched.items);
                    self.current_page = fetched.page;
                    self.total_pages = fetched.pages;
                }
            }
            Err(err) => {
                log::error!("feed load failed: page={} error={}", page, err);
                if page == 1 {
                    self.seed_demo();
                }
            }
        }

        self.loading = false;
    }

    /// Publish a composed post and prepend the authoritative copy.
    pub async fn create_post(&mut self, api: &dyn FeedApi, request: CreatePostRequest) {
        match api.create_post(request).await {
            Ok(post) => {
                self.posts.insert(0, post);
            }
            Err(err) => {
                log::error!("create_post failed: {}", err);
                self.set_notice("Could not publish the post");
            }
        }
    }

    fn seed_demo(&mut self) {
        self.posts = demo::seed_posts();
        self.current_page = 1;
        self.total_pages = 1;
    }

    pub fn post(&self, id: &PostId) -> Option<&Post> {
        self.posts.iter().find(|p| &p.id == id)
    }

    pub fn post_mut(&mut self, id: &PostId) -> Option<&mut Post> {
        self.posts.iter_mut().find(|p| &p.id == id)
    }

    pub fn remove_post(&mut self, id: &PostId) -> Option<Post> {
        let index = self.posts.iter().position(|p| &p.id == id)?;
        Some(self.posts.remove(index))
    }

    /// Show a one-shot transient notice.
    pub fn set_notice(&mut self, text: impl Into<String>) {
        self.notice = Some((text.into(), Instant::now()));
    }

    /// Current notice text, if any and not yet expired.
    pub fn notice(&self) -> Option<&str> {
        self.notice
            .as_ref()
            .filter(|(_, shown_at)| shown_at.elapsed() < NOTICE_TTL)
            .map(|(text, _)| text.as_str())
    }

    /// Drop the notice once it has aged out (call once per render tick).
    pub fn clear_expired_notice(&mut self) {
        if let Some((_, shown_at)) = &self.notice {
            if shown_at.elapsed() >= NOTICE_TTL {
                self.notice = None;
            }
        }
    }
}

impl Default for FeedStore {
    fn default() -> Self {
        Self::new()
    }
}
