//! MODE and RPL_CHANNELMODEIS (324).
//!
//! Flags are applied one at a time, left to right. A flag missing its value
//! stops processing; everything before it stays applied. Other bad flags
//! (non-numeric limit, privilege for a nick not on the channel) are logged
//! and skipped.

use crate::client::Client;
use crate::error::{HandlerError, HandlerResult};
use crate::state::ChanId;
use slirc_proto::{ChannelExt, ChannelMode, Mode, ModeChanges, Message, UserMode};
use tracing::{debug, warn};

/// `:setter MODE target flags [args...]`
pub(super) fn mode(client: &mut Client, msg: &Message) -> HandlerResult {
    let target = msg.arg(0).ok_or(HandlerError::NeedMoreParams)?;
    if msg.args.len() < 2 {
        return Err(HandlerError::NeedMoreParams);
    }

    if target.is_channel_name() {
        let chan_id = client
            .tracker
            .channel_id(target)
            .ok_or_else(|| HandlerError::UnknownChannel(target.to_owned()))?;
        apply_channel_modes(client, chan_id, target, &msg.args[1..])
    } else {
        apply_user_modes(client, target, &msg.args[1..])
    }
}

/// `324 me #channel flags [args...]`
pub(super) fn channel_mode_is(client: &mut Client, msg: &Message) -> HandlerResult {
    let chan = msg.arg(1).ok_or(HandlerError::NeedMoreParams)?;
    if msg.args.len() < 3 {
        return Err(HandlerError::NeedMoreParams);
    }
    let chan_id = client
        .tracker
        .channel_id(chan)
        .ok_or_else(|| HandlerError::UnknownChannel(chan.to_owned()))?;
    apply_channel_modes(client, chan_id, chan, &msg.args[2..])
}

fn apply_channel_modes(
    client: &mut Client,
    chan_id: ChanId,
    chan: &str,
    pieces: &[String],
) -> HandlerResult {
    for change in ModeChanges::<ChannelMode>::new(pieces) {
        let change = change?;
        let mode = change.mode();

        if mode.is_privilege() {
            set_privilege(client, chan_id, chan, &change);
            continue;
        }

        let Some(channel) = client.tracker.channel_mut(chan_id) else {
            return Err(HandlerError::UnknownChannel(chan.to_owned()));
        };
        match channel.modes.apply(&change) {
            Ok(true) => debug!(channel = %chan, change = %change, "Channel mode"),
            Ok(false) => {}
            Err(e) => warn!(
                channel = %chan,
                change = %change,
                error = %e,
                "Ignoring channel limit that is not a number"
            ),
        }
    }
    Ok(())
}

fn set_privilege(client: &mut Client, chan_id: ChanId, chan: &str, change: &Mode<ChannelMode>) {
    // Privilege flags always carry a nick; the parser enforces it.
    let Some(nick) = change.arg() else {
        return;
    };
    let Some(nick_id) = client.tracker.nick_id(nick) else {
        warn!(channel = %chan, nick = %nick, change = %change, "Privilege change for unknown nick");
        return;
    };
    match client.tracker.privs_mut(chan_id, nick_id) {
        Some(privs) => {
            privs.set(change.mode(), change.is_plus());
            debug!(channel = %chan, change = %change, "Privilege changed");
        }
        None => warn!(
            channel = %chan,
            nick = %nick,
            change = %change,
            "Privilege change for nick not on channel"
        ),
    }
}

fn apply_user_modes(client: &mut Client, target: &str, pieces: &[String]) -> HandlerResult {
    let nick_id = client
        .tracker
        .nick_id(target)
        .ok_or_else(|| HandlerError::UnknownNick(target.to_owned()))?;
    // Servers only ever tell us about our own user modes.
    if nick_id != client.me {
        return Err(HandlerError::NotMe(target.to_owned()));
    }

    for change in ModeChanges::<UserMode>::new(pieces) {
        let change = change?;
        let Some(nick) = client.tracker.nick_mut(nick_id) else {
            return Err(HandlerError::UnknownNick(target.to_owned()));
        };
        if nick.modes.apply(&change) {
            debug!(nick = %target, change = %change, "User mode");
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
    fn malformed_mode_keeps_earlier_changes() {
        let mut c = client();
        let chan = c.tracker_mut().new_channel("#test1").unwrap();
        c.handle_line(":op!o@h MODE #test1 +mk").unwrap();
        let modes = &c.tracker().channel(chan).unwrap().modes;
        assert!(modes.moderated);
        assert!(modes.key.is_empty());
    }

    #[test]
    fn bad_limit_is_skipped() {
        let mut c = client();
        let chan = c.tracker_mut().new_channel("#test1").unwrap();
        c.handle_line(":op!o@h MODE #test1 +lm lots").unwrap();
        let modes = &c.tracker().channel(chan).unwrap().modes;
        assert_eq!(modes.limit, 0);
        assert!(modes.moderated);
    }

    #[test]
    fn privilege_for_absent_nick_consumes_value() {
        let mut c = client();
        let chan = c.tracker_mut().new_channel("#test1").unwrap();
        c.handle_line(":op!o@h MODE #test1 +ok ghost sekrit").unwrap();
        assert_eq!(c.tracker().channel(chan).unwrap().modes.key, "sekrit");
    }

    #[test]
    fn limit_and_removal() {
        let mut c = client();
        let chan = c.tracker_mut().new_channel("#test1").unwrap();
        c.handle_line(":op!o@h MODE #test1 +l 20").unwrap();
        assert_eq!(c.tracker().channel(chan).unwrap().modes.limit, 20);
        c.handle_line(":op!o@h MODE #test1 -l").unwrap();
        assert_eq!(c.tracker().channel(chan).unwrap().modes.limit, 0);
    }

    #[test]
    fn long_channel_names_take_channel_modes() {
        let mut c = client();
        let name = format!("#{}", "a".repeat(59));
        c.handle_line(&format!(":test!test@somehost.com JOIN {name}"))
            .unwrap();
        c.handle_line(&format!(":op!o@h MODE {name} +m")).unwrap();
        assert!(c.tracker().get_channel(&name).unwrap().modes.moderated);
    }

    #[test]
    fn user_mode_for_someone_else_is_refused() {
        let mut c = client();
        let user = c.tracker_mut().new_nick("user1").unwrap();
        c.handle_line(":user1!ident1@host1.com MODE user1 +i").unwrap();
        assert!(!c.tracker().nick(user).unwrap().modes.invisible);
    }

    #[test]
    fn user_mode_on_unknown_nick_is_ignored() {
        let mut c = client();
        c.handle_line(":nobody MODE nobody +i").unwrap();
        assert_eq!(c.tracker().nick_count(), 1);
    }
}
