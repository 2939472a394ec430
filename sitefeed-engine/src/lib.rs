// Library interface for the Sitefeed activity-feed engine. The engine is
// front-end agnostic: it exposes plain state plus async methods for a UI
// layer to bind, and never blocks the caller's event loop.
pub mod api;
pub mod feed;
pub mod logging;
pub mod mention;
