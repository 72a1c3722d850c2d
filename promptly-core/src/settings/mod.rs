pub mod config;
pub mod manager;
pub mod theme;


pub use config::{ProviderConfig, Settings};
pub use manager::SettingsManager;
