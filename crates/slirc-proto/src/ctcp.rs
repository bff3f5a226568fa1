//! CTCP framing inside PRIVMSG and NOTICE bodies.
//!
//! A CTCP payload is `\x01COMMAND [params]\x01`. Requests arrive in PRIVMSG,
//! answers go back in NOTICE. Only the framing lives here; which requests get
//! answered is up to the client.
//!
//! ```
//! use slirc_proto::{Ctcp, CtcpKind};
//!
//! let req = Ctcp::parse("\x01PING 1234567890\x01").unwrap();
//! assert_eq!(req.kind, CtcpKind::Ping);
//! assert_eq!(req.to_string(), "\x01PING 1234567890\x01");
//! ```

use std::fmt;

/// Marks the start and end of a CTCP payload.
pub const CTCP_DELIM: char = '\x01';

/// CTCP commands the client distinguishes.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum CtcpKind {
    /// `/me` text. Dispatched as its own event, never answered.
    Action,
    /// Client name and version.
    Version,
    /// Echo the token back.
    Ping,
    /// Local time.
    Time,
    /// Supported CTCP commands.
    Clientinfo,
    /// Anything else, name as received.
    Unknown(String),
}

const NAMES: [(&str, CtcpKind); 5] = [
    ("ACTION", CtcpKind::Action),
    ("VERSION", CtcpKind::Version),
    ("PING", CtcpKind::Ping),
    ("TIME", CtcpKind::Time),
    ("CLIENTINFO", CtcpKind::Clientinfo),
];

impl CtcpKind {
    /// Look up a command name, ignoring case.
    pub fn parse(name: &str) -> Self {
        NAMES
            .iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(name))
            .map_or_else(|| Self::Unknown(name.to_owned()), |(_, kind)| kind.clone())
    }

    /// Wire name of the command.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Unknown(name) => name,
            known => NAMES
                .iter()
                .find(|(_, kind)| kind == known)
                .map_or("", |(name, _)| name),
        }
    }
}

impl fmt::Display for CtcpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One CTCP payload, borrowing its parameters from the message body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ctcp<'a> {
    /// The command.
    pub kind: CtcpKind,
    /// Everything after the command, if non-empty.
    pub params: Option<&'a str>,
}

impl<'a> Ctcp<'a> {
    /// Build a payload for sending.
    pub fn new(kind: CtcpKind, params: Option<&'a str>) -> Self {
        Self { kind, params }
    }

    /// Unwrap a message body. `None` unless the body starts with
    /// [`CTCP_DELIM`] and names a command; the closing delimiter is optional.
    pub fn parse(body: &'a str) -> Option<Self> {
        let inner = body.strip_prefix(CTCP_DELIM)?;
        let inner = inner.strip_suffix(CTCP_DELIM).unwrap_or(inner);
        let (command, params) = inner.split_once(' ').unwrap_or((inner, ""));
        if command.is_empty() {
            return None;
        }
        Some(Self {
            kind: CtcpKind::parse(command),
            params: (!params.is_empty()).then_some(params),
        })
    }

    /// True if `body` is framed as CTCP.
    #[inline]
    pub fn is_ctcp(body: &str) -> bool {
        body.starts_with(CTCP_DELIM)
    }
}

impl fmt::Display for Ctcp<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.params {
            Some(params) => write!(f, "{CTCP_DELIM}{} {params}{CTCP_DELIM}", self.kind),
            None => write!(f, "{CTCP_DELIM}{}{CTCP_DELIM}", self.kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_request_has_no_params() {
        let req = Ctcp::parse("\x01VERSION\x01").unwrap();
        assert_eq!(req.kind, CtcpKind::Version);
        assert_eq!(req.params, None);

        let reply = Ctcp::new(CtcpKind::Version, Some("slirc-client 0.4.0"));
        assert_eq!(reply.to_string(), "\x01VERSION slirc-client 0.4.0\x01");
    }

    #[test]
    fn action_from_sloppy_client() {
        // lower case, no closing delimiter
        let ctcp = Ctcp::parse("\x01action waves at #test1").unwrap();
        assert_eq!(ctcp.kind, CtcpKind::Action);
        assert_eq!(ctcp.params, Some("waves at #test1"));
    }

    #[test]
    fn unknown_commands_keep_their_name() {
        let ctcp = Ctcp::parse("\x01FINGER\x01").unwrap();
        assert_eq!(ctcp.kind, CtcpKind::Unknown("FINGER".into()));
        assert_eq!(ctcp.to_string(), "\x01FINGER\x01");
        assert_eq!(CtcpKind::parse("clientinfo").as_str(), "CLIENTINFO");
    }

    #[test]
    fn plain_text_is_not_ctcp() {
        assert!(Ctcp::parse("hello \x01 there").is_none());
        assert!(Ctcp::parse("\x01\x01").is_none());
        assert!(Ctcp::parse("\x01 PING\x01").is_none());
        assert!(Ctcp::is_ctcp("\x01TIME\x01"));
        assert!(!Ctcp::is_ctcp(""));
    }
}
