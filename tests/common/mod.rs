//! Integration test common infrastructure.
//!
//! Provides a ready-made client, helpers for driving it line by line, and a
//! scripted server peer for tests that run a real [`Session`].

pub mod peer;

#[allow(unused_imports)]
pub use peer::ServerPeer;

use slirc_client::{Client, Identity};

/// A client named `test`, as used throughout the handler tests.
#[allow(dead_code)]
pub fn client() -> Client {
    Client::new(Identity::new("test", "test", "Testing IRC"))
}

/// A client that has already seen `001`.
#[allow(dead_code)]
pub fn registered_client() -> Client {
    let mut client = client();
    feed(
        &mut client,
        &[":irc.server.org 001 test :Welcome to IRC test!test@somehost.com"],
    );
    client.take_outgoing();
    client
}

/// Feed raw lines to the client, failing the test on a parse error.
#[allow(dead_code)]
pub fn feed(client: &mut Client, lines: &[&str]) {
    for line in lines {
        client
            .handle_line(line)
            .unwrap_or_else(|e| panic!("failed to parse {line:?}: {e}"));
    }
}

/// Drain the client's outbound queue as wire strings.
#[allow(dead_code)]
pub fn sent(client: &mut Client) -> Vec<String> {
    client
        .take_outgoing()
        .iter()
        .map(ToString::to_string)
        .collect()
}
