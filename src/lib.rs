// Re-export modules
pub mod analyzer;
pub mod api;
pub mod config;
pub mod crawler;
pub mod matcher;
pub mod score;
pub mod search;
pub mod types;

// Re-export commonly used types for convenience
pub use config::AppConfig;
pub use types::{PageRecord, SiteIndex};
