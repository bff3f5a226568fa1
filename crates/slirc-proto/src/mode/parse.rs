//! IRC mode parsing.

use std::marker::PhantomData;
use std::str::Chars;

use crate::error::ModeParseError;

use super::types::{ArgRule, ChannelMode, Mode, ModeType, UserMode};

/// Iterator over the changes in a mode argument list such as
/// `["+ov-k", "alice", "bob", "*"]`.
///
/// Value tokens are consumed strictly left to right. A flag that requires a
/// value when none remain yields [`ModeParseError::MissingArgument`], after
/// which the iterator is fused. Surplus value tokens are ignored.
pub struct ModeChanges<'a, T, S = String> {
    flags: Chars<'a>,
    args: std::slice::Iter<'a, S>,
    adding: bool,
    fused: bool,
    _mode: PhantomData<T>,
}

impl<'a, T, S> ModeChanges<'a, T, S>
where
    T: ModeType,
    S: AsRef<str>,
{
    /// Start iterating over `pieces`; the first element is the flag string.
    pub fn new(pieces: &'a [S]) -> Self {
        let (flags, args) = match pieces.split_first() {
            Some((first, rest)) => (first.as_ref().chars(), rest.iter()),
            None => ("".chars(), pieces.iter()),
        };
        Self {
            flags,
            args,
            adding: true,
            fused: false,
            _mode: PhantomData,
        }
    }
}

impl<T, S> Iterator for ModeChanges<'_, T, S>
where
    T: ModeType,
    S: AsRef<str>,
{
    type Item = Result<Mode<T>, ModeParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.fused {
            return None;
        }

        loop {
            let c = self.flags.next()?;
            match c {
                '+' => self.adding = true,
                '-' => self.adding = false,
                _ => {
                    let mode = T::from_char(c);
                    let arg = match mode.arg_rule(self.adding) {
                        ArgRule::None => None,
                        ArgRule::Optional => self.args.next().map(|a| a.as_ref().to_owned()),
                        ArgRule::Required => match self.args.next() {
                            Some(a) => Some(a.as_ref().to_owned()),
                            None => {
                                self.fused = true;
                                return Some(Err(ModeParseError::MissingArgument {
                                    sign: if self.adding { '+' } else { '-' },
                                    mode: c,
                                }));
                            }
                        },
                    };
                    return Some(Ok(if self.adding {
                        Mode::Plus(mode, arg)
                    } else {
                        Mode::Minus(mode, arg)
                    }));
                }
            }
        }
    }
}

impl Mode<UserMode> {
    /// Parse user mode strings like `+iw` into a vector of modes.
    pub fn as_user_modes<S: AsRef<str>>(
        pieces: &[S],
    ) -> Result<Vec<Mode<UserMode>>, ModeParseError> {
        ModeChanges::new(pieces).collect()
    }
}

impl Mode<ChannelMode> {
    /// Parse channel mode strings like `+o nick` into a vector of modes.
    pub fn as_channel_modes<S: AsRef<str>>(
        pieces: &[S],
    ) -> Result<Vec<Mode<ChannelMode>>, ModeParseError> {
        ModeChanges::new(pieces).collect()
    }
}
