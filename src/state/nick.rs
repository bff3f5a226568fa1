//! Tracked nick (a known user, including ourselves).

use super::modes::NickModes;
use super::ChanId;
use std::collections::BTreeSet;
use std::fmt;

/// Stable handle to a tracked nick. Survives renames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NickId(pub(crate) u64);

impl fmt::Display for NickId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// A user we know about.
#[derive(Debug, Clone)]
pub struct Nick {
    id: NickId,
    name: String,
    pub ident: String,
    pub host: String,
    pub realname: String,
    pub modes: NickModes,
    pub(super) channels: BTreeSet<ChanId>,
}

impl Nick {
    pub(super) fn new(id: NickId, name: &str) -> Self {
        Self {
            id,
            name: name.to_owned(),
            ident: String::new(),
            host: String::new(),
            realname: String::new(),
            modes: NickModes::default(),
            channels: BTreeSet::new(),
        }
    }

    pub fn id(&self) -> NickId {
        self.id
    }

    /// Current nickname as last seen on the wire.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(super) fn set_name(&mut self, name: &str) {
        self.name = name.to_owned();
    }

    /// Channels this nick is believed to be on.
    pub fn channel_ids(&self) -> impl Iterator<Item = ChanId> + '_ {
        self.channels.iter().copied()
    }

    /// `nick!ident@host`, with missing parts left out.
    pub fn mask(&self) -> String {
        let mut s = self.name.clone();
        if !self.ident.is_empty() {
            s.push('!');
            s.push_str(&self.ident);
        }
        if !self.host.is_empty() {
            s.push('@');
            s.push_str(&self.host);
        }
        s
    }
}
