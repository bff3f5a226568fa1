//! Channel membership and topic handlers.

use crate::client::Client;
use crate::error::{HandlerError, HandlerResult};
use crate::state::ChanPrivs;
use slirc_proto::{Message, Origin};
use tracing::debug;

/// `:nick!ident@host JOIN #channel`
pub(super) fn join(client: &mut Client, msg: &Message) -> HandlerResult {
    let nick = msg.origin_nick().ok_or(HandlerError::NoOrigin)?;
    let chan = msg.arg(0).ok_or(HandlerError::NeedMoreParams)?;

    // Only our own JOIN may introduce a channel.
    let is_me = client.tracker.nick_id(nick) == Some(client.me);
    let chan_id = match client.tracker.channel_id(chan) {
        Some(id) => id,
        None if is_me => {
            let (id, _) = client.tracker.ensure_channel(chan);
            debug!(channel = %chan, "Tracking new channel");
            client.send(Message::mode(chan, &[]));
            client.send(Message::who(chan));
            id
        }
        None => return Err(HandlerError::UnknownChannel(chan.to_owned())),
    };

    let (nick_id, new_nick) = client.tracker.ensure_nick(nick);
    if let (Some(Origin::User { ident, host, .. }), Some(known)) =
        (&msg.origin, client.tracker.nick_mut(nick_id))
    {
        if known.ident.is_empty() {
            known.ident.clone_from(ident);
        }
        if known.host.is_empty() {
            known.host.clone_from(host);
        }
    }
    if new_nick {
        debug!(nick = %nick, "Tracking new nick");
        client.send(Message::who(nick));
    }

    client.tracker.add_member(chan_id, nick_id);
    debug!(nick = %nick, channel = %chan, "Joined");
    Ok(())
}

/// `:nick!ident@host PART #channel [:message]`
pub(super) fn part(client: &mut Client, msg: &Message) -> HandlerResult {
    let nick = msg.origin_nick().ok_or(HandlerError::NoOrigin)?;
    let chan = msg.arg(0).ok_or(HandlerError::NeedMoreParams)?;
    depart(client, chan, nick)
}

/// `:op!ident@host KICK #channel nick [:reason]`
pub(super) fn kick(client: &mut Client, msg: &Message) -> HandlerResult {
    let chan = msg.arg(0).ok_or(HandlerError::NeedMoreParams)?;
    let nick = msg.arg(1).ok_or(HandlerError::NeedMoreParams)?;
    depart(client, chan, nick)
}

/// Drop the `nick`/`chan` edge. A channel we leave, or one left with nobody
/// in it, is forgotten.
fn depart(client: &mut Client, chan: &str, nick: &str) -> HandlerResult {
    let tracker = &mut client.tracker;
    let chan_id = tracker
        .channel_id(chan)
        .ok_or_else(|| HandlerError::UnknownChannel(chan.to_owned()))?;
    let nick_id = tracker
        .nick_id(nick)
        .ok_or_else(|| HandlerError::UnknownNick(nick.to_owned()))?;
    tracker
        .remove_member(chan_id, nick_id)
        .ok_or_else(|| HandlerError::NotOnChannel {
            nick: nick.to_owned(),
            channel: chan.to_owned(),
        })?;

    let empty = tracker.channel(chan_id).is_none_or(|c| c.is_empty());
    if nick_id == client.me || empty {
        tracker.del_channel(chan);
        debug!(channel = %chan, "Forgot channel");
    }
    debug!(nick = %nick, channel = %chan, "Left");
    Ok(())
}

/// `:nick!ident@host QUIT [:message]`
pub(super) fn quit(client: &mut Client, msg: &Message) -> HandlerResult {
    let nick = msg.origin_nick().ok_or(HandlerError::NoOrigin)?;
    let nick_id = client
        .tracker
        .nick_id(nick)
        .ok_or_else(|| HandlerError::UnknownNick(nick.to_owned()))?;
    if nick_id == client.me {
        // The connection is going away; the supervisor resets the client.
        debug!(nick = %nick, "Saw our own QUIT");
        return Ok(());
    }

    let Some(gone) = client.tracker.del_nick(nick) else {
        return Err(HandlerError::UnknownNick(nick.to_owned()));
    };
    let emptied: Vec<String> = gone
        .channel_ids()
        .filter_map(|id| client.tracker.channel(id))
        .filter(|c| c.is_empty())
        .map(|c| c.name().to_owned())
        .collect();
    for chan in emptied {
        client.tracker.del_channel(&chan);
        debug!(channel = %chan, "Forgot empty channel");
    }
    debug!(nick = %nick, "Quit");
    Ok(())
}

/// `:nick!ident@host TOPIC #channel :topic`
pub(super) fn topic(client: &mut Client, msg: &Message) -> HandlerResult {
    let chan = msg.arg(0).ok_or(HandlerError::NeedMoreParams)?;
    let text = msg.arg(1).unwrap_or_default();
    set_topic(client, chan, text)
}

/// `332 me #channel :topic`
pub(super) fn topic_reply(client: &mut Client, msg: &Message) -> HandlerResult {
    let chan = msg.arg(1).ok_or(HandlerError::NeedMoreParams)?;
    let text = msg.arg(2).ok_or(HandlerError::NeedMoreParams)?;
    set_topic(client, chan, text)
}

/// `331 me #channel :No topic is set`
pub(super) fn no_topic(client: &mut Client, msg: &Message) -> HandlerResult {
    let chan = msg.arg(1).ok_or(HandlerError::NeedMoreParams)?;
    set_topic(client, chan, "")
}

fn set_topic(client: &mut Client, chan: &str, text: &str) -> HandlerResult {
    let channel = client
        .tracker
        .get_channel_mut(chan)
        .ok_or_else(|| HandlerError::UnknownChannel(chan.to_owned()))?;
    channel.topic = text.to_owned();
    debug!(channel = %chan, topic = %text, "Topic set");
    Ok(())
}

/// `353 me = #channel :nick @op +voice ...`
///
/// Replies may be split over several lines; each one adds to the member list.
pub(super) fn names_reply(client: &mut Client, msg: &Message) -> HandlerResult {
    // The channel type token (`=`, `*`, `@`) is optional on older servers.
    let [.., chan, names] = msg.args.as_slice() else {
        return Err(HandlerError::NeedMoreParams);
    };
    if msg.args.len() < 3 {
        return Err(HandlerError::NeedMoreParams);
    }

    let tracker = &mut client.tracker;
    let chan_id = tracker
        .channel_id(chan)
        .ok_or_else(|| HandlerError::UnknownChannel(chan.clone()))?;

    for token in names.split_whitespace() {
        let mut privs = ChanPrivs::default();
        let name = token.trim_start_matches(|c| privs.add_sigil(c));
        if name.is_empty() {
            continue;
        }
        let (nick_id, _) = tracker.ensure_nick(name);
        if let Some(edge) = tracker.add_member(chan_id, nick_id) {
            edge.merge(privs);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::client::{Client, Identity};

    fn client() -> Client {
        Client::new(Identity::new("test", "test", "Testing IRC"))
    }

    #[test]
    fn join_fills_in_unknown_mask() {
        let mut c = client();
        c.handle_line(":test!ident@somehost.com JOIN #test1").unwrap();
        let me = c.tracker().nick(c.me()).unwrap();
        assert_eq!(me.ident, "ident");
        assert_eq!(me.host, "somehost.com");
    }

    #[test]
    fn kick_of_last_member_forgets_channel() {
        let mut c = client();
        let chan = c.tracker_mut().new_channel("#test1").unwrap();
        let user = c.tracker_mut().new_nick("user1").unwrap();
        c.tracker_mut().add_member(chan, user);

        c.handle_line(":op!o@h KICK #test1 user1 :bye").unwrap();
        assert!(c.tracker().get_channel("#test1").is_none());
        assert!(c.tracker().get_nick("user1").is_some());
    }

    #[test]
    fn names_without_channel_type() {
        let mut c = client();
        c.tracker_mut().new_channel("#test1").unwrap();
        c.handle_line(":irc.server.org 353 test #test1 :@user1").unwrap();
        assert!(c.tracker().is_on("#test1", "user1"));
    }

    #[test]
    fn no_topic_clears() {
        let mut c = client();
        let chan = c.tracker_mut().new_channel("#test1").unwrap();
        c.tracker_mut().channel_mut(chan).unwrap().topic = "old".into();
        c.handle_line(":irc.server.org 331 test #test1 :No topic is set").unwrap();
        assert!(c.tracker().channel(chan).unwrap().topic.is_empty());
    }
}
