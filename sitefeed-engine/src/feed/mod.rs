pub mod demo;
pub mod mutations;
pub mod sort;
pub mod store;


pub use mutations::{MutationCoordinator, MutationError};
pub use sort::display_order;
pub use store::{FeedStore, FEED_PAGE_SIZE};
