//! Registration and connection-level handlers: PING, 001, 433, NICK, ERROR.

use super::CONNECTED;
use crate::client::Client;
use crate::error::{HandlerError, HandlerResult};
use slirc_proto::{Message, Origin};
use tracing::{debug, info, warn};

/// Suffix appended to a nick the server says is taken.
const NICK_COLLISION_SUFFIX: char = '_';

/// `PING :token`
pub(super) fn ping(client: &mut Client, msg: &Message) -> HandlerResult {
    let token = msg.arg(0).ok_or(HandlerError::NeedMoreParams)?;
    client.send(Message::pong(token));
    Ok(())
}

/// `001 nick :Welcome to the network nick!ident@host`
pub(super) fn welcome(client: &mut Client, msg: &Message) -> HandlerResult {
    let nick = msg.arg(0).ok_or(HandlerError::NeedMoreParams)?;

    // The server has the final word on which nick we registered with.
    let current = client.me_nick().to_owned();
    if current != nick {
        client.tracker.re_nick(&current, nick);
        info!(old = %current, new = %nick, "Registered under a different nick");
    }

    if msg.args.len() > 1 {
        let mask = msg
            .trailing()
            .and_then(|text| text.rsplit(' ').next())
            .filter(|word| word.contains('@'));
        if let Some(mask) = mask {
            let origin = Origin::parse(mask);
            let me = client.me;
            if let Some(me) = client.tracker.nick_mut(me) {
                if let Some(ident) = origin.ident() {
                    me.ident = ident.to_owned();
                }
                if let Some(host) = origin.host() {
                    me.host = host.to_owned();
                }
            }
        }
    }

    client.registered = true;
    info!(nick = %nick, "Registered with server");
    client.dispatch(CONNECTED, msg);
    Ok(())
}

/// `433 current attempted :Nickname is already in use`
pub(super) fn nick_in_use(client: &mut Client, msg: &Message) -> HandlerResult {
    let attempted = msg.arg(1).ok_or(HandlerError::NeedMoreParams)?;
    let mut fallback = attempted.to_owned();
    fallback.push(NICK_COLLISION_SUFFIX);

    let current = client.me_nick().to_owned();
    if !client.tracker.casemapping().eq(attempted, &current) {
        // A nick change we asked for was refused; we keep the current one.
        debug!(attempted = %attempted, retry = %fallback, "Nick in use, retrying");
        client.send(Message::nick(&fallback));
        return Ok(());
    }

    // The collision concerns the nick we already hold: rename locally only.
    client.tracker.re_nick(&current, &fallback);
    info!(
        old = %current,
        new = %fallback,
        registered = client.registered,
        "Nick collision, renamed locally"
    );
    Ok(())
}

/// `:old!ident@host NICK new`
pub(super) fn nick(client: &mut Client, msg: &Message) -> HandlerResult {
    let old = msg.origin_nick().ok_or(HandlerError::NoOrigin)?;
    let new = msg.arg(0).ok_or(HandlerError::NeedMoreParams)?;

    let id = client
        .tracker
        .re_nick(old, new)
        .ok_or_else(|| HandlerError::UnknownNick(old.to_owned()))?;

    if id == client.me {
        info!(old = %old, new = %new, "Our nick changed");
    } else {
        debug!(old = %old, new = %new, "Nick changed");
    }
    Ok(())
}

/// `ERROR :Closing link`
pub(super) fn error(_client: &mut Client, msg: &Message) -> HandlerResult {
    warn!(reason = %msg.trailing().unwrap_or(""), "Server sent ERROR");
    Ok(())
}
