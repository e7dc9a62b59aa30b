pub mod config;
pub mod errors;
pub mod handlers;
pub mod metrics;
pub mod models;

// Re-exports for convenience
pub use errors::{ApiError, ApiResult};
pub use handlers::AppState;
