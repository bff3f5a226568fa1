//! Default value functions for configuration.

use crate::client::DEFAULT_CTCP_VERSION;

/// Returns `true` (for serde defaults).
pub fn default_true() -> bool {
    true
}

// =============================================================================
// Server Defaults
// =============================================================================

pub fn default_port() -> u16 {
    6667
}

pub fn default_connect_timeout() -> u64 {
    30
}

// =============================================================================
// Identity Defaults
// =============================================================================

pub fn default_ident() -> String {
    "slirc".to_string()
}

pub fn default_realname() -> String {
    "slirc client".to_string()
}

// =============================================================================
// Flood Defaults
// =============================================================================

pub fn default_lines_per_second() -> u32 {
    2
}

pub fn default_burst() -> u32 {
    4
}

// =============================================================================
// CTCP / Reconnect Defaults
// =============================================================================

pub fn default_ctcp_version() -> String {
    DEFAULT_CTCP_VERSION.to_string()
}

pub fn default_reconnect_delay() -> u64 {
    5
}
