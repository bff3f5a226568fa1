//! Core configuration types and loading.

use serde::Deserialize;
use slirc_proto::CaseMapping;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use super::defaults::{
    default_burst, default_connect_timeout, default_ctcp_version, default_ident,
    default_lines_per_second, default_port, default_realname, default_reconnect_delay,
    default_true,
};
use crate::client::Identity;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Main client configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Where to connect.
    pub server: ServerConfig,
    /// Who to be once connected.
    pub identity: IdentityConfig,
    /// Outbound flood control.
    #[serde(default)]
    pub flood: FloodConfig,
    /// CTCP replies.
    #[serde(default)]
    pub ctcp: CtcpConfig,
    /// What to do when the connection drops.
    #[serde(default)]
    pub reconnect: ReconnectConfig,
    /// Channels joined after registration.
    #[serde(default)]
    pub channels: ChannelsConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

/// Server to connect to.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Hostname or address (e.g., "irc.libera.chat").
    pub host: String,
    /// TCP port (default: 6667).
    #[serde(default = "default_port")]
    pub port: u16,
    /// Connection password sent as PASS (optional).
    pub password: Option<String>,
    /// Seconds to wait for the TCP connect (default: 30).
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

impl ServerConfig {
    /// `host:port`, as passed to the resolver.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// Case mapping names accepted in the config file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Casemapping {
    #[default]
    Rfc1459,
    Ascii,
}

impl From<Casemapping> for CaseMapping {
    fn from(value: Casemapping) -> Self {
        match value {
            Casemapping::Rfc1459 => CaseMapping::Rfc1459,
            Casemapping::Ascii => CaseMapping::Ascii,
        }
    }
}

/// Local identity.
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityConfig {
    pub nick: String,
    #[serde(default = "default_ident")]
    pub ident: String,
    #[serde(default = "default_realname")]
    pub realname: String,
    /// Nick comparison rules of the network (default: rfc1459).
    #[serde(default)]
    pub casemapping: Casemapping,
}

impl IdentityConfig {
    pub fn to_identity(&self) -> Identity {
        Identity::new(&self.nick, &self.ident, &self.realname)
    }
}

/// Outbound flood control.
#[derive(Debug, Clone, Deserialize)]
pub struct FloodConfig {
    /// Throttle outbound lines at all (default: true).
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Sustained lines per second (default: 2).
    #[serde(default = "default_lines_per_second")]
    pub lines_per_second: u32,
    /// Lines that may be sent back to back before throttling (default: 4).
    #[serde(default = "default_burst")]
    pub burst: u32,
}

impl Default for FloodConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            lines_per_second: default_lines_per_second(),
            burst: default_burst(),
        }
    }
}

/// CTCP replies.
#[derive(Debug, Clone, Deserialize)]
pub struct CtcpConfig {
    /// Reply to CTCP VERSION.
    #[serde(default = "default_ctcp_version")]
    pub version: String,
}

impl Default for CtcpConfig {
    fn default() -> Self {
        Self {
            version: default_ctcp_version(),
        }
    }
}

/// Reconnect policy.
#[derive(Debug, Clone, Deserialize)]
pub struct ReconnectConfig {
    /// Reconnect after the connection drops (default: true).
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Seconds to wait before reconnecting (default: 5).
    #[serde(default = "default_reconnect_delay")]
    pub delay_secs: u64,
}

impl ReconnectConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_secs(self.delay_secs)
    }
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            delay_secs: default_reconnect_delay(),
        }
    }
}

/// Channels joined on connect.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChannelsConfig {
    #[serde(default)]
    pub autojoin: Vec<String>,
}
