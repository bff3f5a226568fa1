//! # slirc-proto
//!
//! Wire-level building blocks for the slirc IRC client: the line parser,
//! mode string parsing, CTCP framing, case mapping and a tokio line codec.
//! Nothing in here knows about tracked client state.
//!
//! ## Quick Start
//!
//! ```rust
//! use slirc_proto::{Message, Origin};
//!
//! let msg: Message = ":nick!user@host PRIVMSG #channel :Hello!".parse().unwrap();
//! assert_eq!(msg.origin, Some(Origin::user("nick", "user", "host")));
//! assert_eq!(msg.args, vec!["#channel", "Hello!"]);
//!
//! let reply = Message::privmsg("#channel", "Hi there");
//! assert_eq!(reply.to_string(), "PRIVMSG #channel :Hi there");
//! ```
//!
//! ## Acknowledgments
//!
//! This project was inspired by the architectural patterns established by
//! [Aaron Weiss (aatxe)](https://github.com/aatxe) in the
//! [irc](https://github.com/aatxe/irc) crate.

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod casemap;
pub mod chan;
pub mod ctcp;
pub mod error;
#[cfg(feature = "tokio")]
pub mod line;
pub mod message;
pub mod mode;
pub mod origin;

pub use self::casemap::{irc_eq, irc_to_lower, CaseMapping};
pub use self::chan::ChannelExt;
pub use self::ctcp::{Ctcp, CtcpKind};
pub use self::error::{MessageParseError, ModeParseError, ProtocolError};
#[cfg(feature = "tokio")]
pub use self::line::LineCodec;
pub use self::message::Message;
pub use self::mode::{ArgRule, ChannelMode, Mode, ModeChanges, ModeType, UserMode};
pub use self::origin::Origin;
