pub mod config;
pub mod debug;
pub mod error;
pub mod fetcher;
pub mod models;
pub mod monitoring;
pub mod output;
pub mod query;

pub use config::{ConfigManager, ConfigProvider, ReloadPolicy, StaticConfig};
pub use debug::DebugLookup;
pub use error::DebugError;
pub use models::{AdminConfig, CategoryKind, CustomCategory, DebugEnvelope, DebugRequest, SourceConfig};
