mod app_config;
mod structs;

pub use app_config::AppConfig;
pub use structs::{DatabaseSection, LoggingSection, RawConfigFile, ServerSection};
