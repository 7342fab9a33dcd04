pub mod config;
pub mod error;
pub mod theme;

pub use config::{Config, MarkdownConfig, PlaygroundConfig, VideoConfig};
pub use error::ConfigError;
pub use theme::Theme;
