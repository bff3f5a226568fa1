//! Interactive console input.
//!
//! Lines starting with `:` are commands; anything else is sent to the server
//! as typed.
//!
//! | Input                   | Action                           |
//! |-------------------------|----------------------------------|
//! | `:q [message]`          | quit, do not reconnect           |
//! | `:j <channel> [key]`    | join                             |
//! | `:p <channel> [message]`| part                             |
//! | `:m <target> <text>`    | private message                  |
//! | `:n <nick>`             | change nick                      |
//! | `:d`                    | dump tracked state               |

use crate::network::ClientCommand;
use slirc_proto::ChannelExt;
use thiserror::Error;

/// A parsed console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleInput {
    Quit(Option<String>),
    Join { channel: String, key: Option<String> },
    Part { channel: String, message: Option<String> },
    Privmsg { target: String, text: String },
    Nick(String),
    Dump,
    Raw(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConsoleError {
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("not a channel name: {0}")]
    NotAChannel(String),
    #[error("unknown console command :{0}")]
    UnknownCommand(String),
}

/// Parse one line of console input. Blank lines are `Ok(None)`.
pub fn parse(line: &str) -> Result<Option<ConsoleInput>, ConsoleError> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return Ok(None);
    }
    let Some(command) = line.strip_prefix(':') else {
        return Ok(Some(ConsoleInput::Raw(line.to_owned())));
    };

    let (name, rest) = command.split_once(' ').unwrap_or((command, ""));
    let rest = rest.trim();
    let input = match name {
        "q" => ConsoleInput::Quit(non_empty(rest)),
        "j" => {
            let (channel, key) =
                split_word(rest).ok_or(ConsoleError::Usage(":j <channel> [key]"))?;
            ConsoleInput::Join {
                channel: channel_name(channel)?,
                key: non_empty(key),
            }
        }
        "p" => {
            let (channel, message) =
                split_word(rest).ok_or(ConsoleError::Usage(":p <channel> [message]"))?;
            ConsoleInput::Part {
                channel: channel_name(channel)?,
                message: non_empty(message),
            }
        }
        "m" => match split_word(rest) {
            Some((target, text)) if !text.is_empty() => ConsoleInput::Privmsg {
                target: target.to_owned(),
                text: text.to_owned(),
            },
            _ => return Err(ConsoleError::Usage(":m <target> <text>")),
        },
        "n" => match split_word(rest) {
            Some((nick, "")) => ConsoleInput::Nick(nick.to_owned()),
            _ => return Err(ConsoleError::Usage(":n <nick>")),
        },
        "d" => ConsoleInput::Dump,
        other => return Err(ConsoleError::UnknownCommand(other.to_owned())),
    };
    Ok(Some(input))
}

impl ConsoleInput {
    /// The read loop command for this input. `Dump` needs a reply channel
    /// and is built by the caller.
    pub fn into_command(self) -> Option<ClientCommand> {
        Some(match self {
            Self::Quit(message) => ClientCommand::Quit(message),
            Self::Join { channel, key } => ClientCommand::Join { channel, key },
            Self::Part { channel, message } => ClientCommand::Part { channel, message },
            Self::Privmsg { target, text } => ClientCommand::Privmsg { target, text },
            Self::Nick(nick) => ClientCommand::Nick(nick),
            Self::Raw(line) => ClientCommand::Raw(line),
            Self::Dump => return None,
        })
    }
}

/// First word and the trimmed remainder; `None` if there is no first word.
fn split_word(s: &str) -> Option<(&str, &str)> {
    if s.is_empty() {
        return None;
    }
    let (word, rest) = s.split_once(' ').unwrap_or((s, ""));
    Some((word, rest.trim()))
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_owned())
}

fn channel_name(s: &str) -> Result<String, ConsoleError> {
    if s.is_channel_name() {
        Ok(s.to_owned())
    } else {
        Err(ConsoleError::NotAChannel(s.to_owned()))
    }
}
