//! Configuration loading and env substitution.
//!
//! Config files: `glimpse.toml`, `glimpse.yaml`, or `glimpse.json`
//! Searched in `./` then `~/.config/glimpse/`.
//!
//! Supports `${ENV_VAR}` substitution in all string values.

pub mod env_subst;
pub mod error;
pub mod loader;
pub mod schema;

pub use {
    error::ConfigError,
    loader::{config_dir, discover_and_load, find_or_default_config_path, load_config, save_config},
    schema::{
        AgentsConfig, BrowseClientConfig, BrowserConfig, BrowserServiceConfig, GatewayConfig,
        GlimpseConfig, StreamConfig,
    },
};
