//! slirc-client - Straylight IRC client core.
//!
//! Tracks what an IRC connection knows about itself, the nicks it can see and
//! the channels it is on, and keeps that model in step with the server.
//!
//! - [`Client`] is the sans-IO core: feed it lines, collect outbound messages.
//! - [`state::Tracker`] owns every nick, channel and membership.
//! - [`handlers`] maps events to handlers and holds the intrinsic protocol
//!   handlers.
//! - [`network`] runs a [`Client`] over a socket with flood control.
//!
//! ```
//! use slirc_client::{Client, Identity};
//!
//! let mut client = Client::new(Identity::new("test", "test", "Testing IRC"));
//! client.handle_line("PING :1234567890").unwrap();
//! let out = client.take_outgoing();
//! assert_eq!(out[0].to_string(), "PONG :1234567890");
//! ```

pub mod client;
pub mod config;
pub mod console;
pub mod error;
pub mod handlers;
pub mod network;
pub mod state;

pub use client::{Client, Identity};
pub use config::Config;
pub use error::{ConnectionError, HandlerError, HandlerResult};
pub use network::{ClientCommand, Session, Throttle};
