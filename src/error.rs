//! Unified error handling for slirc-client.
//!
//! Handler errors never abort processing: the dispatcher logs them with their
//! [`HandlerError::error_code`] label and moves on. Connection errors are what
//! the supervisor reports on its failure channel.

use slirc_proto::{ModeParseError, ProtocolError};
use thiserror::Error;

// ============================================================================
// Handler Errors (inbound line processing)
// ============================================================================

/// Errors that can occur while applying an inbound line to tracked state.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("not enough parameters")]
    NeedMoreParams,

    #[error("message has no nick origin")]
    NoOrigin,

    #[error("unknown nick: {0}")]
    UnknownNick(String),

    #[error("unknown channel: {0}")]
    UnknownChannel(String),

    #[error("user mode for {0}, which is not us")]
    NotMe(String),

    #[error("{nick} is not on {channel}")]
    NotOnChannel { nick: String, channel: String },

    #[error("malformed mode string: {0}")]
    MalformedMode(#[from] ModeParseError),
}

impl HandlerError {
    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NeedMoreParams => "need_more_params",
            Self::NoOrigin => "no_origin",
            Self::UnknownNick(_) => "unknown_nick",
            Self::UnknownChannel(_) => "unknown_channel",
            Self::NotMe(_) => "not_me",
            Self::NotOnChannel { .. } => "not_on_channel",
            Self::MalformedMode(_) => "malformed_mode",
        }
    }

    /// True for errors caused by the tracker disagreeing with the server.
    pub fn is_inconsistency(&self) -> bool {
        matches!(
            self,
            Self::UnknownNick(_)
                | Self::UnknownChannel(_)
                | Self::NotMe(_)
                | Self::NotOnChannel { .. }
        )
    }
}

/// Result type for event handlers.
pub type HandlerResult = Result<(), HandlerError>;

// ============================================================================
// Connection Errors (supervisor)
// ============================================================================

/// Why a connection ended.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("timed out connecting to {0}")]
    Timeout(String),

    #[error("connection closed by server")]
    Closed,
}

impl ConnectionError {
    /// Get a static error code string for log labeling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::Protocol(_) => "protocol",
            Self::Timeout(_) => "timeout",
            Self::Closed => "closed",
        }
    }
}
