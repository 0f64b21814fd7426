pub mod manager;
pub mod search;

pub use manager::{AppConfig, ConfigManager};
pub use search::SearchConfig;
