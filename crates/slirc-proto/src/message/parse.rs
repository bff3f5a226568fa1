//! Nom-based IRC line parser.
//!
//! ```text
//! [@tags] [:prefix] <command> [params...] [:trailing]
//! ```
//!
//! Tags are recognised and skipped.

use std::str::FromStr;

use nom::{
    bytes::complete::{take_till, take_while1},
    character::complete::{char, space0},
    combinator::opt,
    sequence::{preceded, terminated},
    IResult,
};
use smallvec::SmallVec;

use super::types::Message;
use crate::error::{MessageParseError, ProtocolError};
use crate::origin::Origin;

/// Parse IRCv3 message tags (the part after `@` and before the first space).
fn parse_tags(input: &str) -> IResult<&str, &str> {
    preceded(char('@'), take_till(|c| c == ' '))(input)
}

/// Parse message prefix (the part after `:` and before the first space).
fn parse_prefix(input: &str) -> IResult<&str, &str> {
    preceded(char(':'), take_while1(|c| c != ' '))(input)
}

/// Take the command token. Validation happens in [`validate_command`].
fn parse_command(input: &str) -> IResult<&str, &str> {
    take_while1(|c| c != ' ')(input)
}

/// RFC 2812: command = 1*letter / 3digit
fn validate_command(cmd: &str) -> bool {
    let is_all_letters = cmd.chars().all(|c| c.is_ascii_alphabetic());
    let is_three_digits = cmd.len() == 3 && cmd.chars().all(|c| c.is_ascii_digit());
    is_all_letters || is_three_digits
}

/// Split the parameter section into middle params and an optional trailing
/// param. Runs of spaces count as one separator.
fn parse_params(input: &str) -> (SmallVec<[&str; 15]>, bool) {
    let mut params: SmallVec<[&str; 15]> = SmallVec::new();
    let mut rest = input;

    loop {
        rest = rest.trim_start_matches(' ');
        if rest.is_empty() {
            return (params, false);
        }

        if let Some(trailing) = rest.strip_prefix(':') {
            params.push(trailing);
            return (params, true);
        }

        let end = rest.find(' ').unwrap_or(rest.len());
        params.push(&rest[..end]);
        rest = &rest[end..];
    }
}

struct ParsedLine<'a> {
    prefix: Option<&'a str>,
    command: &'a str,
    params: SmallVec<[&'a str; 15]>,
    trailing: bool,
}

fn parse_line(input: &str) -> IResult<&str, ParsedLine<'_>> {
    let (input, _) = space0(input)?;
    let (input, _tags) = opt(terminated(parse_tags, space0))(input)?;
    let (input, prefix) = opt(terminated(parse_prefix, space0))(input)?;
    let (input, command) = parse_command(input)?;
    let (params, trailing) = parse_params(input);

    Ok((
        "",
        ParsedLine {
            prefix,
            command,
            params,
            trailing,
        },
    ))
}

fn classify(line: &str) -> Result<ParsedLine<'_>, MessageParseError> {
    if line.trim().is_empty() {
        return Err(MessageParseError::EmptyMessage);
    }

    let parsed = match parse_line(line) {
        Ok((_, parsed)) => parsed,
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) if e.input.is_empty() => {
            return Err(MessageParseError::MissingCommand)
        }
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            return Err(MessageParseError::InvalidCommand {
                position: line.len() - e.input.len(),
            })
        }
        Err(nom::Err::Incomplete(_)) => return Err(MessageParseError::MissingCommand),
    };

    if !validate_command(parsed.command) {
        let position = parsed.command.as_ptr() as usize - line.as_ptr() as usize;
        return Err(MessageParseError::InvalidCommand { position });
    }

    Ok(parsed)
}

impl FromStr for Message {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let line = s.trim_end_matches(['\r', '\n']);

        let parsed = classify(line).map_err(|cause| ProtocolError::InvalidMessage {
            string: s.to_owned(),
            cause,
        })?;

        Ok(Message {
            origin: parsed.prefix.map(Origin::parse),
            command: parsed.command.to_ascii_uppercase(),
            args: parsed.params.iter().map(|p| (*p).to_owned()).collect(),
            trailing: parsed.trailing,
        })
    }
}
