pub mod client;
pub mod error;

pub use client::{ApiClient, FeedApi};
pub use error::{ApiError, ApiResult};
