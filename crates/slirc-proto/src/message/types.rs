use crate::ctcp::Ctcp;
use crate::error::{ProtocolError, Result};
use crate::origin::Origin;

/// An owned IRC message.
///
/// # Example
///
/// ```
/// use slirc_proto::Message;
///
/// let msg: Message = ":nick!user@host PRIVMSG #channel :Hello!".parse().unwrap();
/// assert_eq!(msg.command, "PRIVMSG");
/// assert_eq!(msg.origin_nick(), Some("nick"));
/// assert_eq!(msg.trailing(), Some("Hello!"));
///
/// let msg = Message::privmsg("#channel", "Hello!");
/// assert_eq!(msg.to_string(), "PRIVMSG #channel :Hello!");
/// ```
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Message {
    /// Who sent the message, if the line carried a prefix.
    pub origin: Option<Origin>,
    /// Upper-cased command name or three digit numeric.
    pub command: String,
    /// Positional arguments, the trailing argument last.
    pub args: Vec<String>,
    /// Whether the final argument was (or should be) sent after a colon.
    pub(crate) trailing: bool,
}

impl Message {
    /// Build a message from a command and arguments.
    ///
    /// The final argument is only colon-prefixed on the wire when it needs to
    /// be. Use [`Message::with_trailing`] to force it.
    pub fn new<I, S>(command: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            origin: None,
            command: command.to_ascii_uppercase(),
            args: args.into_iter().map(Into::into).collect(),
            trailing: false,
        }
    }

    /// Parse a raw line. See [`FromStr`](std::str::FromStr) for the grammar.
    pub fn parse(raw: &str) -> Result<Self> {
        raw.parse()
    }

    /// Attach an origin.
    #[must_use]
    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = Some(origin);
        self
    }

    /// Append a final argument that is always sent after a colon.
    #[must_use]
    pub fn with_trailing(mut self, text: impl Into<String>) -> Self {
        self.args.push(text.into());
        self.trailing = true;
        self
    }

    /// Positional argument `n`, counting from zero.
    pub fn arg(&self, n: usize) -> Option<&str> {
        self.args.get(n).map(String::as_str)
    }

    /// The final argument, whether or not it arrived after a colon.
    pub fn trailing(&self) -> Option<&str> {
        self.args.last().map(String::as_str)
    }

    /// Nickname of the sender, if the origin is a user.
    pub fn origin_nick(&self) -> Option<&str> {
        self.origin.as_ref().and_then(Origin::nick)
    }

    /// True for three digit numeric replies.
    pub fn is_numeric(&self) -> bool {
        self.command.len() == 3 && self.command.bytes().all(|b| b.is_ascii_digit())
    }

    /// The CTCP payload of a PRIVMSG or NOTICE, if it carries one.
    pub fn ctcp(&self) -> Option<Ctcp<'_>> {
        match self.command.as_str() {
            "PRIVMSG" | "NOTICE" => self.arg(1).and_then(Ctcp::parse),
            _ => None,
        }
    }

    /// `PONG :token`
    pub fn pong(token: &str) -> Self {
        Self::new("PONG", None::<String>).with_trailing(token)
    }

    /// `NICK nick`
    pub fn nick(nick: &str) -> Self {
        Self::new("NICK", [nick])
    }

    /// `USER ident 0 * :realname`
    pub fn user(ident: &str, realname: &str) -> Self {
        Self::new("USER", [ident, "0", "*"]).with_trailing(realname)
    }

    /// `PASS password`
    pub fn pass(password: &str) -> Self {
        Self::new("PASS", [password])
    }

    /// `JOIN channel [key]`
    pub fn join(channel: &str, key: Option<&str>) -> Self {
        Self::new("JOIN", std::iter::once(channel).chain(key))
    }

    /// `PART channel [:message]`
    pub fn part(channel: &str, message: Option<&str>) -> Self {
        let msg = Self::new("PART", [channel]);
        match message {
            Some(text) => msg.with_trailing(text),
            None => msg,
        }
    }

    /// `QUIT [:message]`
    pub fn quit(message: Option<&str>) -> Self {
        let msg = Self::new("QUIT", None::<String>);
        match message {
            Some(text) => msg.with_trailing(text),
            None => msg,
        }
    }

    /// `PRIVMSG target :text`
    pub fn privmsg(target: &str, text: &str) -> Self {
        Self::new("PRIVMSG", [target]).with_trailing(text)
    }

    /// `NOTICE target :text`
    pub fn notice(target: &str, text: &str) -> Self {
        Self::new("NOTICE", [target]).with_trailing(text)
    }

    /// `MODE target [modes [args...]]`
    pub fn mode(target: &str, modes: &[&str]) -> Self {
        Self::new("MODE", std::iter::once(target).chain(modes.iter().copied()))
    }

    /// `WHO target`
    pub fn who(target: &str) -> Self {
        Self::new("WHO", [target])
    }

    /// `WHOIS nick`
    pub fn whois(nick: &str) -> Self {
        Self::new("WHOIS", [nick])
    }

    /// `TOPIC channel [:topic]`; without a topic this queries it.
    pub fn topic(channel: &str, topic: Option<&str>) -> Self {
        let msg = Self::new("TOPIC", [channel]);
        match topic {
            Some(text) => msg.with_trailing(text),
            None => msg,
        }
    }

    /// `KICK channel nick [:reason]`
    pub fn kick(channel: &str, nick: &str, reason: Option<&str>) -> Self {
        let msg = Self::new("KICK", [channel, nick]);
        match reason {
            Some(text) => msg.with_trailing(text),
            None => msg,
        }
    }

    /// `AWAY [:message]`; without a message this clears the away state.
    pub fn away(message: Option<&str>) -> Self {
        let msg = Self::new("AWAY", None::<String>);
        match message {
            Some(text) => msg.with_trailing(text),
            None => msg,
        }
    }

    /// `INVITE nick channel`
    pub fn invite(nick: &str, channel: &str) -> Self {
        Self::new("INVITE", [nick, channel])
    }

    /// `OPER name password`
    pub fn oper(name: &str, password: &str) -> Self {
        Self::new("OPER", [name, password])
    }

    /// Parse a line typed by hand, e.g. from a console.
    pub fn raw(line: &str) -> Result<Self> {
        let msg: Self = line.parse()?;
        if msg.origin.is_some() {
            // Servers ignore or reject client-supplied prefixes.
            return Err(ProtocolError::InvalidMessage {
                string: line.to_owned(),
                cause: crate::error::MessageParseError::UnexpectedOrigin,
            });
        }
        Ok(msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let msg = Message::parse(":nick!id@host KICK #chan victim :bye now").unwrap();
        assert_eq!(msg.arg(0), Some("#chan"));
        assert_eq!(msg.arg(1), Some("victim"));
        assert_eq!(msg.arg(3), None);
        assert_eq!(msg.trailing(), Some("bye now"));
        assert_eq!(msg.origin_nick(), Some("nick"));
        assert!(!msg.is_numeric());
    }

    #[test]
    fn test_numeric_detection() {
        let msg = Message::parse(":irc.example.com 001 me :Welcome").unwrap();
        assert!(msg.is_numeric());
        assert_eq!(msg.origin_nick(), None);
    }

    #[test]
    fn test_ctcp_payload() {
        let msg = Message::parse(":a!b@c PRIVMSG me :\x01VERSION\x01").unwrap();
        assert!(msg.ctcp().is_some());

        let msg = Message::parse(":a!b@c PRIVMSG me :hello").unwrap();
        assert!(msg.ctcp().is_none());

        let msg = Message::parse(":a!b@c TOPIC #c :\x01VERSION\x01").unwrap();
        assert!(msg.ctcp().is_none());
    }

    #[test]
    fn test_raw_refuses_origin() {
        assert_eq!(Message::raw("LIST").unwrap().to_string(), "LIST");
        let err = Message::raw(":spoof PRIVMSG #c :hi").unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::InvalidMessage {
                cause: crate::error::MessageParseError::UnexpectedOrigin,
                ..
            }
        ));
    }

    #[test]
    fn test_constructors() {
        assert_eq!(Message::pong("123").to_string(), "PONG :123");
        assert_eq!(Message::nick("me").to_string(), "NICK me");
        assert_eq!(
            Message::user("ident", "Real Name").to_string(),
            "USER ident 0 * :Real Name"
        );
        assert_eq!(Message::join("#c", None).to_string(), "JOIN #c");
        assert_eq!(Message::join("#c", Some("key")).to_string(), "JOIN #c key");
        assert_eq!(Message::part("#c", None).to_string(), "PART #c");
        assert_eq!(Message::quit(Some("bye")).to_string(), "QUIT :bye");
        assert_eq!(Message::quit(None).to_string(), "QUIT");
        assert_eq!(Message::mode("#c", &[]).to_string(), "MODE #c");
        assert_eq!(
            Message::mode("#c", &["+ov", "a", "b"]).to_string(),
            "MODE #c +ov a b"
        );
        assert_eq!(Message::who("#c").to_string(), "WHO #c");
        assert_eq!(Message::topic("#c", None).to_string(), "TOPIC #c");
        assert_eq!(
            Message::kick("#c", "n", Some("out")).to_string(),
            "KICK #c n :out"
        );
        assert_eq!(Message::invite("n", "#c").to_string(), "INVITE n #c");
        assert_eq!(Message::away(None).to_string(), "AWAY");
    }

    #[test]
    fn test_raw_rejects_prefix() {
        assert!(Message::raw("PRIVMSG #c :hi").is_ok());
        assert!(Message::raw(":me PRIVMSG #c :hi").is_err());
        assert!(Message::raw("").is_err());
    }
}
