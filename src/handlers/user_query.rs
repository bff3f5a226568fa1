//! WHOIS and WHO replies.

use crate::client::Client;
use crate::error::{HandlerError, HandlerResult};
use crate::state::ChanPrivs;
use slirc_proto::{ChannelExt, Message};
use tracing::debug;

/// `311 me nick ident host * :realname`
pub(super) fn whois_user(client: &mut Client, msg: &Message) -> HandlerResult {
    let [_, name, ident, host, _, realname, ..] = msg.args.as_slice() else {
        return Err(HandlerError::NeedMoreParams);
    };
    let nick = client
        .tracker
        .get_nick_mut(name)
        .ok_or_else(|| HandlerError::UnknownNick(name.clone()))?;
    nick.ident.clone_from(ident);
    nick.host.clone_from(host);
    nick.realname.clone_from(realname);
    debug!(mask = %nick.mask(), "WHOIS user");
    Ok(())
}

/// `352 me #channel ident host server nick flags :hops realname`
///
/// The flags token is `H` (here) or `G` (gone), then `*` for opers, then the
/// member's privilege sigils on that channel.
pub(super) fn who_reply(client: &mut Client, msg: &Message) -> HandlerResult {
    let [_, chan, ident, host, _, name, flags, rest, ..] = msg.args.as_slice() else {
        return Err(HandlerError::NeedMoreParams);
    };
    let realname = rest.split_once(' ').map_or("", |(_, realname)| realname);

    let nick_id = client
        .tracker
        .nick_id(name)
        .ok_or_else(|| HandlerError::UnknownNick(name.clone()))?;

    let mut privs = ChanPrivs::default();
    if let Some(nick) = client.tracker.nick_mut(nick_id) {
        nick.ident.clone_from(ident);
        nick.host.clone_from(host);
        nick.realname = realname.to_owned();
        for flag in flags.chars() {
            match flag {
                'G' => nick.modes.away = true,
                'H' => nick.modes.away = false,
                '*' => nick.modes.oper = true,
                sigil => {
                    privs.add_sigil(sigil);
                }
            }
        }
    }

    if privs != ChanPrivs::default() && chan.is_channel_name() {
        if let Some(chan_id) = client.tracker.channel_id(chan) {
            if let Some(edge) = client.tracker.privs_mut(chan_id, nick_id) {
                edge.merge(privs);
            }
        }
    }
    debug!(nick = %name, channel = %chan, flags = %flags, "WHO reply");
    Ok(())
}

/// `671 me nick :is using a secure connection`
pub(super) fn whois_secure(client: &mut Client, msg: &Message) -> HandlerResult {
    let name = msg.arg(1).ok_or(HandlerError::NeedMoreParams)?;
    let nick = client
        .tracker
        .get_nick_mut(name)
        .ok_or_else(|| HandlerError::UnknownNick(name.to_owned()))?;
    nick.modes.secure = true;
    Ok(())
}
