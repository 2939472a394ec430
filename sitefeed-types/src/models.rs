use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ids::PostId;

// Custom serde module for DateTime to ensure RFC3339 string format
mod datetime_format {
    use chrono::{DateTime, Utc};
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let s = date.to_rfc3339();
        serializer.serialize_str(&s)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<DateTime<Utc>>().map_err(serde::de::Error::custom)
    }
}

/// Color assigned when the directory has none for a user.
pub const DEFAULT_DISPLAY_COLOR: &str = "#607d8b";

fn default_color() -> String {
    DEFAULT_DISPLAY_COLOR.to_string()
}

/// Post author as embedded in feed responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Author {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default = "default_color")]
    pub color: String,
}

impl Author {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Who a post is shown to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "type", content = "sites", rename_all = "snake_case")]
pub enum Audience {
    #[default]
    Everyone,
    Sites(Vec<String>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub content: String,
    pub author: Author,
    #[serde(default)]
    pub audience: Audience,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub urgent: bool,
    #[serde(with = "datetime_format")]
    pub created_at: DateTime<Utc>,
    /// Ids of users who liked this post; never contains duplicates.
    #[serde(default)]
    pub likes: Vec<Uuid>,
    /// Denormalized like counter kept in step with `likes`.
    #[serde(default)]
    pub like_count: i32,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl Post {
    pub fn is_liked_by(&self, user_id: Uuid) -> bool {
        self.likes.contains(&user_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub content: String,
    pub author: Author,
    #[serde(with = "datetime_format")]
    pub created_at: DateTime<Utc>,
}

/// Directory entry offered by the mention autocomplete. Immutable once
/// fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MentionSuggestion {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default = "default_color")]
    pub color: String,
}

impl MentionSuggestion {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// One page of the activity feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedPage {
    pub items: Vec<Post>,
    pub page: u32,
    pub pages: u32,
}

/// One page of the user directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPage {
    pub items: Vec<MentionSuggestion>,
    pub page: u32,
    pub pages: u32,
}

// Request types for API

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub content: String,
    pub audience: Audience,
    pub urgent: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateCommentRequest {
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub details: Option<String>,
}
