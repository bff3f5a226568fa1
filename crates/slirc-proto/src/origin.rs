//! Message origin (the `:prefix` of an IRC line).
//!
//! An origin identifies who sent a line: either a server name or a
//! `nick!ident@host` mask, where the ident and host parts may be missing.
//!
//! # Reference
//! - RFC 2812 Section 2.3.1: Message format

use std::fmt;

/// The sender of a message.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Origin {
    /// Server name (e.g., "irc.example.com").
    Server(String),
    /// A user mask. Missing parts are empty strings.
    User {
        /// Nickname.
        nick: String,
        /// Ident (username) part.
        ident: String,
        /// Host part.
        host: String,
    },
}

impl Origin {
    /// Decompose a raw prefix token.
    ///
    /// This is lenient and never fails. A bare token containing a dot is a
    /// server; anything with `!` or `@`, or without a dot, is a user.
    pub fn parse(s: &str) -> Self {
        let (name, host) = match s.split_once('@') {
            Some((name, host)) => (name, Some(host)),
            None => (s, None),
        };
        let (nick, ident) = match name.split_once('!') {
            Some((nick, ident)) => (nick, Some(ident)),
            None => (name, None),
        };

        if ident.is_none() && host.is_none() && nick.contains('.') {
            return Self::Server(nick.to_owned());
        }

        Self::User {
            nick: nick.to_owned(),
            ident: ident.unwrap_or_default().to_owned(),
            host: host.unwrap_or_default().to_owned(),
        }
    }

    /// Build a user origin from its parts.
    pub fn user(
        nick: impl Into<String>,
        ident: impl Into<String>,
        host: impl Into<String>,
    ) -> Self {
        Self::User {
            nick: nick.into(),
            ident: ident.into(),
            host: host.into(),
        }
    }

    /// The nickname, if this is a user origin.
    pub fn nick(&self) -> Option<&str> {
        match self {
            Self::User { nick, .. } => Some(nick),
            Self::Server(_) => None,
        }
    }

    /// The ident, if this is a user origin and one was given.
    pub fn ident(&self) -> Option<&str> {
        match self {
            Self::User { ident, .. } if !ident.is_empty() => Some(ident),
            _ => None,
        }
    }

    /// The host, if this is a user origin and one was given.
    pub fn host(&self) -> Option<&str> {
        match self {
            Self::User { host, .. } if !host.is_empty() => Some(host),
            _ => None,
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Server(name) => f.write_str(name),
            Self::User { nick, ident, host } => {
                f.write_str(nick)?;
                if !ident.is_empty() {
                    write!(f, "!{ident}")?;
                }
                if !host.is_empty() {
                    write!(f, "@{host}")?;
                }
                Ok(())
            }
        }
    }
}
