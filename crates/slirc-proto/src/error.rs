//! Error types for the IRC protocol library.
//!
//! This module defines error types for transport-level failures, line
//! parsing failures, and mode parsing issues.

use thiserror::Error;

/// Convenience type alias for Results using [`ProtocolError`].
pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;

/// Top-level protocol errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// I/O error during reading or writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Line was not valid UTF-8 and the codec runs in strict mode.
    #[error("invalid utf-8 at byte {valid_up_to}")]
    InvalidUtf8 {
        /// Length of the valid prefix of the line.
        valid_up_to: usize,
    },

    /// Line exceeded maximum allowed length.
    #[error("message too long: {actual} bytes (limit: {limit})")]
    MessageTooLong {
        /// Actual line length.
        actual: usize,
        /// Maximum allowed length.
        limit: usize,
    },

    /// Outgoing line contained a character that cannot be put on the wire.
    #[error("illegal character in outgoing line: {0:?}")]
    IllegalChar(char),

    /// Failed to parse an IRC line.
    #[error("invalid message: {string:?}")]
    InvalidMessage {
        /// The offending line.
        string: String,
        /// The underlying parse error.
        #[source]
        cause: MessageParseError,
    },
}

impl ProtocolError {
    /// Returns true for errors that only affect a single line.
    ///
    /// The read loop drops such lines and keeps going; anything else means the
    /// connection is no longer usable.
    pub fn is_line_local(&self) -> bool {
        matches!(
            self,
            Self::InvalidMessage { .. } | Self::MessageTooLong { .. } | Self::InvalidUtf8 { .. }
        )
    }
}

/// Errors encountered when parsing IRC lines.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum MessageParseError {
    /// Line was empty after stripping the terminator.
    #[error("empty message")]
    EmptyMessage,

    /// Line carried a prefix (or tags) but no command token.
    #[error("missing command")]
    MissingCommand,

    /// A line meant for sending carried a `:origin` prefix.
    #[error("outgoing line must not carry an origin prefix")]
    UnexpectedOrigin,

    /// Command token was neither letters nor a three digit numeric.
    #[error("invalid command at position {position}")]
    InvalidCommand {
        /// Byte offset of the rejected token.
        position: usize,
    },
}

/// Errors encountered when parsing mode strings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ModeParseError {
    /// A mode that requires a value had none left in the argument list.
    #[error("mode '{sign}{mode}' requires an argument but none provided")]
    MissingArgument {
        /// `+` or `-`.
        sign: char,
        /// The mode character.
        mode: char,
    },
}
