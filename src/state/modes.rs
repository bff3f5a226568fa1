//! Mode flag sets tracked for nicks, channels and memberships.

use slirc_proto::{ChannelMode, Mode, UserMode};
use std::fmt;
use std::num::ParseIntError;

/// User modes of a tracked nick.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NickModes {
    pub invisible: bool,   // +i
    pub oper: bool,        // +o
    pub wallops: bool,     // +w
    pub hidden_host: bool, // +x
    pub secure: bool,      // +z (TLS connection)
    pub registered: bool,  // +r (identified to services)
    pub bot: bool,         // +B
    /// Not a mode letter: learned from WHO (`G`/`H`).
    pub away: bool,
}

impl NickModes {
    /// Apply one parsed change. Returns `false` for letters we do not track.
    pub fn apply(&mut self, change: &Mode<UserMode>) -> bool {
        let on = change.is_plus();
        let flag = match change.mode() {
            UserMode::Invisible => &mut self.invisible,
            UserMode::Oper => &mut self.oper,
            UserMode::Wallops => &mut self.wallops,
            UserMode::MaskedHost => &mut self.hidden_host,
            UserMode::Secure => &mut self.secure,
            UserMode::Registered => &mut self.registered,
            UserMode::Bot => &mut self.bot,
            _ => return false,
        };
        *flag = on;
        true
    }

    /// Convert modes to a string like "+iw".
    pub fn as_mode_string(&self) -> String {
        let mut s = String::from("+");
        for (set, c) in [
            (self.invisible, 'i'),
            (self.oper, 'o'),
            (self.wallops, 'w'),
            (self.hidden_host, 'x'),
            (self.secure, 'z'),
            (self.registered, 'r'),
            (self.bot, 'B'),
        ] {
            if set {
                s.push(c);
            }
        }
        s
    }
}

impl fmt::Display for NickModes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_mode_string())?;
        if self.away {
            f.write_str(" (away)")?;
        }
        Ok(())
    }
}

/// Channel attribute modes. `key` is empty and `limit` is zero when unset.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ChanModes {
    pub secret: bool,          // +s
    pub private: bool,         // +p
    pub moderated: bool,       // +m
    pub invite_only: bool,     // +i
    pub no_external: bool,     // +n
    pub topic_lock: bool,      // +t
    pub registered_only: bool, // +r
    pub oper_only: bool,       // +O
    pub tls_only: bool,        // +z
    pub key: String,           // +k
    pub limit: u32,            // +l
}

impl ChanModes {
    /// Apply one parsed change.
    ///
    /// Returns `Ok(false)` for flags that are not channel attributes
    /// (privileges, list masks, unknown letters). A non-numeric `+l` value is
    /// an error and leaves the limit untouched.
    pub fn apply(&mut self, change: &Mode<ChannelMode>) -> Result<bool, ParseIntError> {
        let on = change.is_plus();
        let flag = match change.mode() {
            ChannelMode::Secret => &mut self.secret,
            ChannelMode::Private => &mut self.private,
            ChannelMode::Moderated => &mut self.moderated,
            ChannelMode::InviteOnly => &mut self.invite_only,
            ChannelMode::NoExternalMessages => &mut self.no_external,
            ChannelMode::ProtectedTopic => &mut self.topic_lock,
            ChannelMode::RegisteredOnly => &mut self.registered_only,
            ChannelMode::OperOnly => &mut self.oper_only,
            ChannelMode::TlsOnly => &mut self.tls_only,
            ChannelMode::Key => {
                self.key = match (on, change.arg()) {
                    (true, Some(key)) => key.to_owned(),
                    _ => String::new(),
                };
                return Ok(true);
            }
            ChannelMode::Limit => {
                self.limit = match (on, change.arg()) {
                    (true, Some(limit)) => limit.parse()?,
                    _ => 0,
                };
                return Ok(true);
            }
            _ => return Ok(false),
        };
        *flag = on;
        Ok(true)
    }

    /// Convert modes to a string like "+ntk secret".
    pub fn as_mode_string(&self) -> String {
        let mut s = String::from("+");
        for (set, c) in [
            (self.secret, 's'),
            (self.private, 'p'),
            (self.moderated, 'm'),
            (self.invite_only, 'i'),
            (self.no_external, 'n'),
            (self.topic_lock, 't'),
            (self.registered_only, 'r'),
            (self.oper_only, 'O'),
            (self.tls_only, 'z'),
            (!self.key.is_empty(), 'k'),
            (self.limit != 0, 'l'),
        ] {
            if set {
                s.push(c);
            }
        }
        if !self.key.is_empty() {
            s.push(' ');
            s.push_str(&self.key);
        }
        if self.limit != 0 {
            s.push(' ');
            s.push_str(&self.limit.to_string());
        }
        s
    }
}

impl fmt::Display for ChanModes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_mode_string())
    }
}

/// Privileges of one nick on one channel.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ChanPrivs {
    pub owner: bool,  // +q (~)
    pub admin: bool,  // +a (&)
    pub op: bool,     // +o (@)
    pub halfop: bool, // +h (%)
    pub voice: bool,  // +v (+)
}

impl ChanPrivs {
    /// Set the flag a NAMES/WHO sigil stands for. Returns `false` if `c` is
    /// not a sigil.
    pub fn add_sigil(&mut self, c: char) -> bool {
        match c {
            '~' => self.owner = true,
            '&' => self.admin = true,
            '@' => self.op = true,
            '%' => self.halfop = true,
            '+' => self.voice = true,
            _ => return false,
        }
        true
    }

    /// Toggle the flag for a privilege mode letter. Returns `false` if the
    /// mode is not a privilege.
    pub fn set(&mut self, mode: &ChannelMode, on: bool) -> bool {
        match mode {
            ChannelMode::Founder => self.owner = on,
            ChannelMode::Admin => self.admin = on,
            ChannelMode::Oper => self.op = on,
            ChannelMode::Halfop => self.halfop = on,
            ChannelMode::Voice => self.voice = on,
            _ => return false,
        }
        true
    }

    /// Set every flag that is set in `other`.
    pub fn merge(&mut self, other: ChanPrivs) {
        self.owner |= other.owner;
        self.admin |= other.admin;
        self.op |= other.op;
        self.halfop |= other.halfop;
        self.voice |= other.voice;
    }

    /// Get all prefix characters for this member.
    /// Returns in order from highest to lowest: ~ & @ % +
    pub fn prefixes(&self) -> String {
        let mut s = String::with_capacity(5);
        for (set, c) in [
            (self.owner, '~'),
            (self.admin, '&'),
            (self.op, '@'),
            (self.halfop, '%'),
            (self.voice, '+'),
        ] {
            if set {
                s.push(c);
            }
        }
        s
    }
}
