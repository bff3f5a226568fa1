//! Configuration loading.
//!
//! - [`types`]: config struct definitions and [`Config::load`]
//! - [`defaults`]: serde default functions

mod defaults;
mod types;

pub use types::{
    Casemapping, ChannelsConfig, Config, ConfigError, CtcpConfig, FloodConfig, IdentityConfig,
    ReconnectConfig, ServerConfig,
};
