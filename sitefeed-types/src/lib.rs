pub mod ids;
pub mod models;

// Re-export commonly used types at the crate root
pub use ids::*;
pub use models::*;
