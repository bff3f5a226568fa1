//! Event dispatch and the intrinsic protocol handlers.
//!
//! Every inbound line is turned into an event name by [`event_name`] and run
//! through the [`Registry`]. The handlers in this module keep the tracker in
//! sync with the server; they are installed from [`INTRINSICS`] when a
//! [`Client`] is built, ahead of anything the application registers.

mod channel;
mod connection;
mod ctcp;
mod mode;
mod registry;
mod user_query;

pub use registry::{Handler, Registry};

use crate::client::Client;
use crate::error::HandlerResult;
use slirc_proto::{CtcpKind, Message};

/// Signature of an intrinsic handler.
pub type HandlerFn = fn(&mut Client, &Message) -> HandlerResult;

/// Synthetic event dispatched after `001`.
pub const CONNECTED: &str = "CONNECTED";
/// Synthetic event dispatched when the read loop ends.
pub const DISCONNECTED: &str = "DISCONNECTED";

/// Event name to intrinsic handler.
pub const INTRINSICS: &[(&str, HandlerFn)] = &[
    // Connection
    ("PING", connection::ping),
    ("001", connection::welcome),
    ("433", connection::nick_in_use),
    ("NICK", connection::nick),
    ("ERROR", connection::error),
    // Channels
    ("JOIN", channel::join),
    ("PART", channel::part),
    ("KICK", channel::kick),
    ("QUIT", channel::quit),
    ("TOPIC", channel::topic),
    ("331", channel::no_topic),
    ("332", channel::topic_reply),
    ("353", channel::names_reply),
    // Modes
    ("MODE", mode::mode),
    ("324", mode::channel_mode_is),
    // Queries
    ("311", user_query::whois_user),
    ("352", user_query::who_reply),
    ("671", user_query::whois_secure),
    // CTCP
    ("CTCP", ctcp::reply),
];

/// The event a message is dispatched as.
///
/// This is the command, except for CTCP payloads: a `PRIVMSG` carrying one
/// is `ACTION` or `CTCP`, a `NOTICE` carrying one is `CTCPREPLY`.
pub fn event_name(msg: &Message) -> &str {
    match msg.ctcp() {
        Some(_) if msg.command == "NOTICE" => "CTCPREPLY",
        Some(ctcp) if ctcp.kind == CtcpKind::Action => "ACTION",
        Some(_) => "CTCP",
        None => &msg.command,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(line: &str) -> String {
        let msg = Message::parse(line).unwrap();
        event_name(&msg).to_owned()
    }

    #[test]
    fn ctcp_events() {
        assert_eq!(name(":a!b@c PRIVMSG test :\x01VERSION\x01"), "CTCP");
        assert_eq!(name(":a!b@c PRIVMSG #chan :\x01ACTION waves\x01"), "ACTION");
        assert_eq!(name(":a!b@c NOTICE test :\x01PING 123\x01"), "CTCPREPLY");
    }

    #[test]
    fn plain_events_use_the_command() {
        assert_eq!(name(":a!b@c PRIVMSG test :hello"), "PRIVMSG");
        assert_eq!(name("ping :123"), "PING");
        assert_eq!(name(":irc.server.org 001 test :Welcome"), "001");
    }

    #[test]
    fn intrinsic_events_are_unique() {
        let mut names: Vec<&str> = INTRINSICS.iter().map(|(name, _)| *name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), INTRINSICS.len());
    }
}
