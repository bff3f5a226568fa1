//! Replies to CTCP requests.

use crate::client::Client;
use crate::error::{HandlerError, HandlerResult};
use slirc_proto::{Ctcp, CtcpKind, Message};
use tracing::debug;

/// `:nick!ident@host PRIVMSG target :\x01COMMAND [params]\x01`
///
/// VERSION and PING are answered with a NOTICE back to the sender; anything
/// else is left to application listeners.
pub(super) fn reply(client: &mut Client, msg: &Message) -> HandlerResult {
    let Some(ctcp) = msg.ctcp() else {
        return Ok(());
    };
    let from = msg.origin_nick().ok_or(HandlerError::NoOrigin)?;

    let body = match ctcp.kind {
        CtcpKind::Version => {
            Ctcp::new(CtcpKind::Version, Some(client.ctcp_version.as_str())).to_string()
        }
        CtcpKind::Ping => ctcp.to_string(),
        _ => {
            debug!(from = %from, command = %ctcp.kind, "Unhandled CTCP request");
            return Ok(());
        }
    };

    debug!(from = %from, command = %ctcp.kind, "Answering CTCP request");
    client.send(Message::notice(from, &body));
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::client::{Client, Identity};

    #[test]
    fn version_uses_configured_string() {
        let mut c = Client::new(Identity::new("test", "test", "Testing IRC"))
            .with_ctcp_version("slirc-test 0.0");
        c.handle_line(":blah!moo@cows.com PRIVMSG test :\x01VERSION\x01").unwrap();
        let out: Vec<String> = c.take_outgoing().iter().map(ToString::to_string).collect();
        assert_eq!(out, vec!["NOTICE blah :\x01VERSION slirc-test 0.0\x01"]);
    }

    #[test]
    fn actions_are_not_answered() {
        let mut c = Client::new(Identity::new("test", "test", "Testing IRC"));
        c.handle_line(":blah!moo@cows.com PRIVMSG #test :\x01ACTION waves\x01").unwrap();
        assert!(!c.has_outgoing());
    }
}
