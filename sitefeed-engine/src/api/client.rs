use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

use super::{ApiError, ApiResult};
use sitefeed_types::*;

/// Transport seam for everything the feed engine asks of the backend.
///
/// The engine only ever talks to this trait; production code uses
/// [`ApiClient`], tests substitute a recording mock so they can assert
/// that demo-post mutations issue zero network calls.
#[async_trait]
pub trait FeedApi: Send + Sync {
    async fn fetch_feed(&self, page: u32, size: u32) -> ApiResult<FeedPage>;
    async fn create_post(&self, request: CreatePostRequest) -> ApiResult<Post>;
    async fn fetch_post(&self, id: &str) -> ApiResult<Post>;
    async fn delete_post(&self, id: &str) -> ApiResult<()>;
    async fn like_post(&self, id: &str) -> ApiResult<()>;
    async fn unlike_post(&self, id: &str) -> ApiResult<()>;
    async fn pin_post(&self, id: &str) -> ApiResult<()>;
    async fn unpin_post(&self, id: &str) -> ApiResult<()>;
    async fn add_comment(&self, id: &str, request: CreateCommentRequest) -> ApiResult<Post>;
    async fn fetch_users(&self, size: u32) -> ApiResult<Vec<MentionSuggestion>>;
}

/// API client for communicating with the Sitefeed backend
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session_token: Option<String>,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            session_token: None,
        }
    }

    /// Set the session token for authenticated requests
    pub fn set_session_token(&mut self, token: Option<String>) {
        self.session_token = token;
    }

    /// Helper to add session token to request if available
    fn add_auth_header(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(token) = &self.session_token {
            req.header("X-Session-Token", token)
        } else {
            req
        }
    }

    /// Helper to handle API responses
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> ApiResult<T> {
        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            Err(self.response_error(response).await)
        }
    }

    /// Helper for endpoints that return no useful body
    async fn expect_ok(&self, response: reqwest::Response) -> ApiResult<()> {
        if response.status().is_success() {
            Ok(())
        } else {
            Err(self.response_error(response).await)
        }
    }

    async fn response_error(&self, response: reqwest::Response) -> ApiError {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        ApiError::from_status(status, error_message(status, &body))
    }
}

/// Extract a displayable message from a non-2xx body: prefer the
/// backend's structured `ErrorResponse`, and clean up HTML error pages
/// (e.g., from nginx 404 pages) down to a generic hint.
fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(parsed) => parsed.error,
        Err(_) if body.contains("<html>") || body.contains("<!DOCTYPE") => format!(
            "Server returned {} error. Please check the server URL.",
            status.as_u16()
        ),
        Err(_) => body.to_string(),
    }
}

#[async_trait]
impl FeedApi for ApiClient {
    /// Get one page of the activity feed
    async fn fetch_feed(&self, page: u32, size: u32) -> ApiResult<FeedPage> {
        let url = format!("{}/feed?page={}&size={}", self.base_url, page, size);
        let req = self.add_auth_header(self.client.get(&url));
        let response = req.send().await?;
        self.handle_response(response).await
    }

    /// Create a new post
    async fn create_post(&self, request: CreatePostRequest) -> ApiResult<Post> {
        let url = format!("{}/posts", self.base_url);
        let req = self.add_auth_header(self.client.post(&url).json(&request));
        let response = req.send().await?;
        self.handle_response(response).await
    }

    /// Get a single post by ID
    async fn fetch_post(&self, id: &str) -> ApiResult<Post> {
        let url = format!("{}/posts/{}", self.base_url, id);
        let req = self.add_auth_header(self.client.get(&url));
        let response = req.send().await?;
        self.handle_response(response).await
    }

    /// Delete a post
    async fn delete_post(&self, id: &str) -> ApiResult<()> {
        let url = format!("{}/posts/{}", self.base_url, id);
        let req = self.add_auth_header(self.client.delete(&url));
        let response = req.send().await?;
        self.expect_ok(response).await
    }

    /// Like a post
    async fn like_post(&self, id: &str) -> ApiResult<()> {
        let url = format!("{}/posts/{}/like", self.base_url, id);
        let req = self.add_auth_header(self.client.post(&url));
        let response = req.send().await?;
        self.expect_ok(response).await
    }

    /// Remove the current user's like from a post
    async fn unlike_post(&self, id: &str) -> ApiResult<()> {
        let url = format!("{}/posts/{}/like", self.base_url, id);
        let req = self.add_auth_header(self.client.delete(&url));
        let response = req.send().await?;
        self.expect_ok(response).await
    }

    /// Pin a post to the top of the feed
    async fn pin_post(&self, id: &str) -> ApiResult<()> {
        let url = format!("{}/posts/{}/pin", self.base_url, id);
        let req = self.add_auth_header(self.client.post(&url));
        let response = req.send().await?;
        self.expect_ok(response).await
    }

    /// Unpin a post
    async fn unpin_post(&self, id: &str) -> ApiResult<()> {
        let url = format!("{}/posts/{}/pin", self.base_url, id);
        let req = self.add_auth_header(self.client.delete(&url));
        let response = req.send().await?;
        self.expect_ok(response).await
    }

    /// Add a comment; the backend returns the updated post
    async fn add_comment(&self, id: &str, request: CreateCommentRequest) -> ApiResult<Post> {
        let url = format!("{}/posts/{}/comments", self.base_url, id);
        let req = self.add_auth_header(self.client.post(&url).json(&request));
        let response = req.send().await?;
        self.handle_response(response).await
    }

    /// Get mentionable users for the directory
    async fn fetch_users(&self, size: u32) -> ApiResult<Vec<MentionSuggestion>> {
        let url = format!("{}/users?size={}", self.base_url, size);
        let req = self.add_auth_header(self.client.get(&url));
        let response = req.send().await?;
        let page: UserPage = self.handle_response(response).await?;
        Ok(page.items)
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        // Check for override or use the production URL
        let base_url = std::env::var("SITEFEED_API_URL")
            .unwrap_or_else(|_| "https://api.sitefeed.app/v1".to_string());
        Self::new(base_url)
    }
}
