//! The nick/channel/membership store.

use super::channel::{ChanId, Channel};
use super::modes::ChanPrivs;
use super::nick::{Nick, NickId};
use slirc_proto::CaseMapping;
use std::collections::HashMap;
use std::fmt;

/// Everything known about the network as seen from one connection.
///
/// Names are looked up case-insensitively under the configured
/// [`CaseMapping`]. Membership is stored once per `(channel, nick)` edge and
/// mirrored in the id sets of both ends; only tracker methods touch either.
#[derive(Debug, Default)]
pub struct Tracker {
    casemapping: CaseMapping,
    next_id: u64,
    nicks: HashMap<NickId, Nick>,
    nick_index: HashMap<String, NickId>,
    chans: HashMap<ChanId, Channel>,
    chan_index: HashMap<String, ChanId>,
    memberships: HashMap<(ChanId, NickId), ChanPrivs>,
}

impl Tracker {
    pub fn new(casemapping: CaseMapping) -> Self {
        Self {
            casemapping,
            ..Default::default()
        }
    }

    /// An empty tracker that already knows the local identity.
    pub fn with_me(casemapping: CaseMapping, nick: &str) -> (Self, NickId) {
        let mut tracker = Self::new(casemapping);
        let (id, _) = tracker.ensure_nick(nick);
        (tracker, id)
    }

    pub fn casemapping(&self) -> CaseMapping {
        self.casemapping
    }

    fn key(&self, name: &str) -> String {
        self.casemapping.fold(name)
    }

    fn alloc_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    // ------------------------------------------------------------------
    // Nicks
    // ------------------------------------------------------------------

    /// Start tracking `name`. Returns `None` without touching anything if the
    /// name is already tracked.
    pub fn new_nick(&mut self, name: &str) -> Option<NickId> {
        match self.ensure_nick(name) {
            (id, true) => Some(id),
            (_, false) => None,
        }
    }

    /// Look `name` up, creating it if needed. The flag is true when the nick
    /// was created by this call.
    pub fn ensure_nick(&mut self, name: &str) -> (NickId, bool) {
        match self.nick_id(name) {
            Some(id) => (id, false),
            None => {
                let id = NickId(self.alloc_id());
                let key = self.key(name);
                self.nick_index.insert(key, id);
                self.nicks.insert(id, Nick::new(id, name));
                (id, true)
            }
        }
    }

    pub fn nick_id(&self, name: &str) -> Option<NickId> {
        self.nick_index.get(&self.key(name)).copied()
    }

    pub fn get_nick(&self, name: &str) -> Option<&Nick> {
        self.nick_id(name).and_then(|id| self.nicks.get(&id))
    }

    pub fn get_nick_mut(&mut self, name: &str) -> Option<&mut Nick> {
        let id = self.nick_id(name)?;
        self.nicks.get_mut(&id)
    }

    pub fn nick(&self, id: NickId) -> Option<&Nick> {
        self.nicks.get(&id)
    }

    pub fn nick_mut(&mut self, id: NickId) -> Option<&mut Nick> {
        self.nicks.get_mut(&id)
    }

    /// Move the nick known as `old` to `new`, keeping its id and channels.
    ///
    /// If `new` already belongs to a different nick, the two swap names:
    /// the occupant moves to `old`. Returns the id of the renamed nick, or
    /// `None` if `old` is not tracked.
    pub fn re_nick(&mut self, old: &str, new: &str) -> Option<NickId> {
        let old_key = self.key(old);
        let new_key = self.key(new);
        let id = self.nick_index.remove(&old_key)?;

        let previous = match self.nicks.get_mut(&id) {
            Some(nick) => {
                let previous = nick.name().to_owned();
                nick.set_name(new);
                previous
            }
            None => old.to_owned(),
        };

        if let Some(displaced) = self.nick_index.insert(new_key, id) {
            if displaced != id {
                self.nick_index.insert(old_key, displaced);
                if let Some(nick) = self.nicks.get_mut(&displaced) {
                    nick.set_name(&previous);
                }
            }
        }
        Some(id)
    }

    /// Forget a nick and every membership it had. Returns the removed nick;
    /// its channel set still lists where it was.
    pub fn del_nick(&mut self, name: &str) -> Option<Nick> {
        let key = self.key(name);
        let id = self.nick_index.remove(&key)?;
        let nick = self.nicks.remove(&id)?;
        for chan_id in &nick.channels {
            self.memberships.remove(&(*chan_id, id));
            if let Some(chan) = self.chans.get_mut(chan_id) {
                chan.nicks.remove(&id);
            }
        }
        Some(nick)
    }

    // ------------------------------------------------------------------
    // Channels
    // ------------------------------------------------------------------

    /// Start tracking channel `name`. Returns `None` if it already exists.
    pub fn new_channel(&mut self, name: &str) -> Option<ChanId> {
        match self.ensure_channel(name) {
            (id, true) => Some(id),
            (_, false) => None,
        }
    }

    /// Look channel `name` up, creating it if needed. The flag is true when
    /// the channel was created by this call.
    pub fn ensure_channel(&mut self, name: &str) -> (ChanId, bool) {
        match self.channel_id(name) {
            Some(id) => (id, false),
            None => {
                let id = ChanId(self.alloc_id());
                let key = self.key(name);
                self.chan_index.insert(key, id);
                self.chans.insert(id, Channel::new(id, name));
                (id, true)
            }
        }
    }

    pub fn channel_id(&self, name: &str) -> Option<ChanId> {
        self.chan_index.get(&self.key(name)).copied()
    }

    pub fn get_channel(&self, name: &str) -> Option<&Channel> {
        self.channel_id(name).and_then(|id| self.chans.get(&id))
    }

    pub fn get_channel_mut(&mut self, name: &str) -> Option<&mut Channel> {
        let id = self.channel_id(name)?;
        self.chans.get_mut(&id)
    }

    pub fn channel(&self, id: ChanId) -> Option<&Channel> {
        self.chans.get(&id)
    }

    pub fn channel_mut(&mut self, id: ChanId) -> Option<&mut Channel> {
        self.chans.get_mut(&id)
    }

    /// Forget a channel and purge it from every member's channel set.
    pub fn del_channel(&mut self, name: &str) -> Option<Channel> {
        let key = self.key(name);
        let id = self.chan_index.remove(&key)?;
        let chan = self.chans.remove(&id)?;
        for nick_id in &chan.nicks {
            self.memberships.remove(&(id, *nick_id));
            if let Some(nick) = self.nicks.get_mut(nick_id) {
                nick.channels.remove(&id);
            }
        }
        Some(chan)
    }

    // ------------------------------------------------------------------
    // Memberships
    // ------------------------------------------------------------------

    /// True iff both exist and `nick` is on `chan`.
    pub fn is_on(&self, chan: &str, nick: &str) -> bool {
        match (self.channel_id(chan), self.nick_id(nick)) {
            (Some(c), Some(n)) => self.memberships.contains_key(&(c, n)),
            _ => false,
        }
    }

    /// Put `nick` on `chan`, or return the existing edge. `None` if either id
    /// is stale.
    pub fn add_member(&mut self, chan: ChanId, nick: NickId) -> Option<&mut ChanPrivs> {
        let channel = self.chans.get_mut(&chan)?;
        let member = self.nicks.get_mut(&nick)?;
        channel.nicks.insert(nick);
        member.channels.insert(chan);
        Some(self.memberships.entry((chan, nick)).or_default())
    }

    /// Take `nick` off `chan`, returning the privileges it had there.
    pub fn remove_member(&mut self, chan: ChanId, nick: NickId) -> Option<ChanPrivs> {
        let privs = self.memberships.remove(&(chan, nick))?;
        if let Some(channel) = self.chans.get_mut(&chan) {
            channel.nicks.remove(&nick);
        }
        if let Some(member) = self.nicks.get_mut(&nick) {
            member.channels.remove(&chan);
        }
        Some(privs)
    }

    pub fn privs(&self, chan: ChanId, nick: NickId) -> Option<ChanPrivs> {
        self.memberships.get(&(chan, nick)).copied()
    }

    pub fn privs_mut(&mut self, chan: ChanId, nick: NickId) -> Option<&mut ChanPrivs> {
        self.memberships.get_mut(&(chan, nick))
    }

    // ------------------------------------------------------------------
    // Views
    // ------------------------------------------------------------------

    /// Members of a channel with their privileges there.
    pub fn members(&self, chan: ChanId) -> impl Iterator<Item = (&Nick, ChanPrivs)> + '_ {
        self.chans
            .get(&chan)
            .into_iter()
            .flat_map(|c| c.nicks.iter())
            .filter_map(move |id| {
                let nick = self.nicks.get(id)?;
                let privs = self.privs(chan, *id)?;
                Some((nick, privs))
            })
    }

    /// Channels a nick is on with its privileges there.
    pub fn channels_of(&self, nick: NickId) -> impl Iterator<Item = (&Channel, ChanPrivs)> + '_ {
        self.nicks
            .get(&nick)
            .into_iter()
            .flat_map(|n| n.channels.iter())
            .filter_map(move |id| {
                let chan = self.chans.get(id)?;
                let privs = self.privs(*id, nick)?;
                Some((chan, privs))
            })
    }

    pub fn nick_count(&self) -> usize {
        self.nicks.len()
    }

    pub fn channel_count(&self) -> usize {
        self.chans.len()
    }

    pub fn nicks(&self) -> impl Iterator<Item = &Nick> + '_ {
        self.nicks.values()
    }

    pub fn channels(&self) -> impl Iterator<Item = &Channel> + '_ {
        self.chans.values()
    }
}

impl fmt::Display for Tracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut chans: Vec<&Channel> = self.channels().collect();
        chans.sort_by_key(|c| self.key(c.name()));
        let mut nicks: Vec<&Nick> = self.nicks().collect();
        nicks.sort_by_key(|n| self.key(n.name()));

        writeln!(f, "Channels ({}):", chans.len())?;
        for chan in chans {
            writeln!(f, "  {} {}", chan.name(), chan.modes)?;
            if !chan.topic.is_empty() {
                writeln!(f, "    topic: {}", chan.topic)?;
            }
            let mut members: Vec<String> = self
                .members(chan.id())
                .map(|(nick, privs)| format!("{}{}", privs.prefixes(), nick.name()))
                .collect();
            members.sort();
            writeln!(f, "    members: {}", members.join(" "))?;
        }

        writeln!(f, "Nicks ({}):", nicks.len())?;
        for nick in nicks {
            write!(f, "  {} {}", nick.mask(), nick.modes)?;
            if !nick.realname.is_empty() {
                write!(f, " :{}", nick.realname)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> Tracker {
        Tracker::new(CaseMapping::Rfc1459)
    }

    #[test]
    fn new_nick_rejects_duplicates() {
        let mut st = tracker();
        let id = st.new_nick("test1").unwrap();
        assert_eq!(st.nick(id).unwrap().name(), "test1");
        assert!(st.new_nick("TEST1").is_none());
        assert_eq!(st.nick_count(), 1);
    }

    #[test]
    fn with_me_tracks_local_identity() {
        let (st, me) = Tracker::with_me(CaseMapping::Rfc1459, "test");
        assert_eq!(st.nick_id("TEST"), Some(me));
        assert_eq!(st.nick_count(), 1);
        assert_eq!(st.channel_count(), 0);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let mut st = tracker();
        let id = st.new_nick("Nick[away]").unwrap();
        assert_eq!(st.nick_id("nick{AWAY}"), Some(id));
        assert_eq!(st.get_nick("NICK[AWAY]").unwrap().name(), "Nick[away]");
        assert!(st.get_nick("other").is_none());
    }

    #[test]
    fn re_nick_keeps_identity() {
        let mut st = tracker();
        let id = st.new_nick("test1").unwrap();
        let chan = st.new_channel("#test1").unwrap();
        st.add_member(chan, id).unwrap().op = true;

        assert_eq!(st.re_nick("test1", "test2"), Some(id));
        assert!(st.get_nick("test1").is_none());
        let nick = st.get_nick("test2").unwrap();
        assert_eq!(nick.id(), id);
        assert_eq!(nick.name(), "test2");
        assert_eq!(st.nick_count(), 1);
        assert!(st.is_on("#test1", "test2"));
        assert!(st.privs(chan, id).unwrap().op);
    }

    #[test]
    fn re_nick_case_change_only() {
        let mut st = tracker();
        let id = st.new_nick("test").unwrap();
        assert_eq!(st.re_nick("test", "TEST"), Some(id));
        assert_eq!(st.get_nick("test").unwrap().name(), "TEST");
        assert_eq!(st.nick_count(), 1);
    }

    #[test]
    fn re_nick_swaps_with_occupant() {
        let mut st = tracker();
        let a = st.new_nick("test1").unwrap();
        let b = st.new_nick("test2").unwrap();

        st.re_nick("test1", "test2");
        assert_eq!(st.nick_id("test2"), Some(a));
        assert_eq!(st.nick_id("test1"), Some(b));
        assert_eq!(st.nick(b).unwrap().name(), "test1");
        assert_eq!(st.nick(a).unwrap().name(), "test2");
        assert_eq!(st.nick_count(), 2);
    }

    #[test]
    fn re_nick_unknown_is_noop() {
        let mut st = tracker();
        st.new_nick("test1").unwrap();
        assert_eq!(st.re_nick("nobody", "test1"), None);
        assert!(st.get_nick("test1").is_some());
        assert_eq!(st.nick_count(), 1);
    }

    #[test]
    fn del_nick_removes_memberships() {
        let mut st = tracker();
        let n = st.new_nick("test1").unwrap();
        let c1 = st.new_channel("#test1").unwrap();
        let c2 = st.new_channel("#test2").unwrap();
        st.add_member(c1, n);
        st.add_member(c2, n);

        let gone = st.del_nick("test1").unwrap();
        assert_eq!(gone.channel_ids().count(), 2);
        assert!(st.get_nick("test1").is_none());
        assert!(st.channel(c1).unwrap().is_empty());
        assert!(st.channel(c2).unwrap().is_empty());
        assert!(st.privs(c1, n).is_none());

        assert!(st.del_nick("test1").is_none());
    }

    #[test]
    fn ensure_creates_once() {
        let mut st = tracker();
        let (n, created) = st.ensure_nick("user1");
        assert!(created);
        assert_eq!(st.ensure_nick("USER1"), (n, false));
        let (c, created) = st.ensure_channel("#test");
        assert!(created);
        assert_eq!(st.ensure_channel("#Test"), (c, false));
        assert_eq!((st.nick_count(), st.channel_count()), (1, 1));
    }

    #[test]
    fn channels_mirror_nicks() {
        let mut st = tracker();
        let c = st.new_channel("#test1").unwrap();
        assert!(st.new_channel("#TEST1").is_none());
        assert_eq!(st.get_channel("#Test1").unwrap().name(), "#test1");

        let n = st.new_nick("test1").unwrap();
        assert!(!st.is_on("#test1", "test1"));
        st.add_member(c, n).unwrap().voice = true;
        assert!(st.is_on("#test1", "test1"));

        let members: Vec<_> = st.members(c).map(|(n, p)| (n.name().to_owned(), p)).collect();
        assert_eq!(members.len(), 1);
        assert!(members[0].1.voice);
        let chans: Vec<_> = st.channels_of(n).map(|(c, _)| c.name().to_owned()).collect();
        assert_eq!(chans, vec!["#test1"]);

        // re-adding returns the same edge
        assert!(st.add_member(c, n).unwrap().voice);

        assert_eq!(st.remove_member(c, n).map(|p| p.voice), Some(true));
        assert!(!st.is_on("#test1", "test1"));
        assert!(st.remove_member(c, n).is_none());
    }

    #[test]
    fn del_channel_purges_members() {
        let mut st = tracker();
        let c = st.new_channel("#test1").unwrap();
        let a = st.new_nick("a").unwrap();
        let b = st.new_nick("b").unwrap();
        st.add_member(c, a);
        st.add_member(c, b);

        assert!(st.del_channel("#TEST1").is_some());
        assert_eq!(st.channel_count(), 0);
        assert_eq!(st.nick(a).unwrap().channel_ids().count(), 0);
        assert_eq!(st.channels_of(b).count(), 0);
        assert!(st.del_channel("#test1").is_none());
    }

    #[test]
    fn add_member_with_stale_ids() {
        let mut st = tracker();
        let c = st.new_channel("#c").unwrap();
        let n = st.new_nick("n").unwrap();
        st.del_nick("n");
        assert!(st.add_member(c, n).is_none());
        assert!(st.channel(c).unwrap().is_empty());
    }

    #[test]
    fn ascii_casemapping() {
        let mut st = Tracker::new(CaseMapping::Ascii);
        st.new_nick("a[b]").unwrap();
        assert!(st.get_nick("A[B]").is_some());
        assert!(st.get_nick("a{b}").is_none());
    }

    #[test]
    fn dump_lists_everything() {
        let mut st = tracker();
        let c = st.new_channel("#test").unwrap();
        let n = st.new_nick("nick").unwrap();
        st.add_member(c, n).unwrap().op = true;
        st.channel_mut(c).unwrap().topic = "hello".into();

        let dump = st.to_string();
        assert!(dump.contains("Channels (1):"));
        assert!(dump.contains("#test"));
        assert!(dump.contains("topic: hello"));
        assert!(dump.contains("members: @nick"));
        assert!(dump.contains("Nicks (1):"));
    }
}
