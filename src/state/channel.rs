//! Tracked channel.

use super::NickId;
use super::modes::ChanModes;
use std::collections::BTreeSet;
use std::fmt;

/// Stable handle to a tracked channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChanId(pub(crate) u64);

impl fmt::Display for ChanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

/// A channel we know about.
#[derive(Debug, Clone)]
pub struct Channel {
    id: ChanId,
    name: String,
    pub topic: String,
    pub modes: ChanModes,
    pub(super) nicks: BTreeSet<NickId>,
}

impl Channel {
    pub(super) fn new(id: ChanId, name: &str) -> Self {
        Self {
            id,
            name: name.to_owned(),
            topic: String::new(),
            modes: ChanModes::default(),
            nicks: BTreeSet::new(),
        }
    }

    pub fn id(&self) -> ChanId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn nick_ids(&self) -> impl Iterator<Item = NickId> + '_ {
        self.nicks.iter().copied()
    }

    pub fn member_count(&self) -> usize {
        self.nicks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nicks.is_empty()
    }
}
