//! IRC case-mapping functions.
//!
//! Nick and channel names compare case-insensitively, and under the
//! `rfc1459` mapping a few punctuation characters are considered the upper
//! case form of others (`[` and `{`, `]` and `}`, `\` and `|`, `~` and `^`).

use std::fmt;
use std::str::FromStr;

/// Case mapping used to fold names into lookup keys.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CaseMapping {
    /// ASCII letters plus `[]\~`, the de-facto IRC default.
    #[default]
    Rfc1459,
    /// ASCII letters only.
    Ascii,
}

impl CaseMapping {
    /// Fold a single character to its lower case form.
    #[inline]
    pub const fn fold_char(self, c: char) -> char {
        match (self, c) {
            (Self::Rfc1459, '[') => '{',
            (Self::Rfc1459, ']') => '}',
            (Self::Rfc1459, '\\') => '|',
            (Self::Rfc1459, '~') => '^',
            (_, 'A'..='Z') => (c as u8 + 32) as char,
            _ => c,
        }
    }

    /// Fold a whole name into a lookup key.
    pub fn fold(self, s: &str) -> String {
        s.chars().map(|c| self.fold_char(c)).collect()
    }

    /// Compare two names under this mapping.
    pub fn eq(self, a: &str, b: &str) -> bool {
        a.len() == b.len()
            && a
                .chars()
                .zip(b.chars())
                .all(|(ca, cb)| self.fold_char(ca) == self.fold_char(cb))
    }

    /// The name used for this mapping in `CASEMAPPING=` and config files.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rfc1459 => "rfc1459",
            Self::Ascii => "ascii",
        }
    }
}

impl fmt::Display for CaseMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CaseMapping {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rfc1459" => Ok(Self::Rfc1459),
            "ascii" => Ok(Self::Ascii),
            other => Err(format!("unknown case mapping: {other}")),
        }
    }
}

/// Fold a name with the default `rfc1459` mapping.
pub fn irc_to_lower(s: &str) -> String {
    CaseMapping::Rfc1459.fold(s)
}

/// Compare two names with the default `rfc1459` mapping.
pub fn irc_eq(a: &str, b: &str) -> bool {
    CaseMapping::Rfc1459.eq(a, b)
}
