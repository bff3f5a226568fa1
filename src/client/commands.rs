//! Outbound command helpers.
//!
//! These only queue lines. Tracked state changes when the server echoes the
//! command back, never before.

use super::Client;
use slirc_proto::{Ctcp, CtcpKind, Message, ProtocolError};

impl Client {
    pub fn nick(&mut self, nick: &str) {
        self.send(Message::nick(nick));
    }

    pub fn join(&mut self, channel: &str, key: Option<&str>) {
        self.send(Message::join(channel, key));
    }

    pub fn part(&mut self, channel: &str, message: Option<&str>) {
        self.send(Message::part(channel, message));
    }

    pub fn quit(&mut self, message: Option<&str>) {
        self.send(Message::quit(message));
    }

    pub fn privmsg(&mut self, target: &str, text: &str) {
        self.send(Message::privmsg(target, text));
    }

    pub fn notice(&mut self, target: &str, text: &str) {
        self.send(Message::notice(target, text));
    }

    /// `/me` style action.
    pub fn action(&mut self, target: &str, text: &str) {
        self.ctcp(target, "ACTION", Some(text));
    }

    /// CTCP request, carried in a PRIVMSG.
    pub fn ctcp(&mut self, target: &str, command: &str, params: Option<&str>) {
        let body = Ctcp::new(CtcpKind::parse(command), params).to_string();
        self.send(Message::privmsg(target, &body));
    }

    /// CTCP reply, carried in a NOTICE.
    pub fn ctcp_reply(&mut self, target: &str, command: &str, params: Option<&str>) {
        let body = Ctcp::new(CtcpKind::parse(command), params).to_string();
        self.send(Message::notice(target, &body));
    }

    /// Ask `target` which client it runs.
    pub fn version(&mut self, target: &str) {
        self.ctcp(target, "VERSION", None);
    }

    pub fn mode(&mut self, target: &str, modes: &[&str]) {
        self.send(Message::mode(target, modes));
    }

    /// Set the topic, or query it when `topic` is `None`.
    pub fn topic(&mut self, channel: &str, topic: Option<&str>) {
        self.send(Message::topic(channel, topic));
    }

    pub fn kick(&mut self, channel: &str, nick: &str, reason: Option<&str>) {
        self.send(Message::kick(channel, nick, reason));
    }

    pub fn whois(&mut self, nick: &str) {
        self.send(Message::whois(nick));
    }

    pub fn who(&mut self, target: &str) {
        self.send(Message::who(target));
    }

    /// Mark ourselves away, or back when `message` is `None`.
    pub fn away(&mut self, message: Option<&str>) {
        self.send(Message::away(message));
    }

    pub fn invite(&mut self, nick: &str, channel: &str) {
        self.send(Message::invite(nick, channel));
    }

    pub fn oper(&mut self, name: &str, password: &str) {
        self.send(Message::oper(name, password));
    }

    /// Queue a hand-written line. It must parse and must not carry a prefix.
    pub fn raw(&mut self, line: &str) -> Result<(), ProtocolError> {
        let msg = Message::raw(line)?;
        self.send(msg);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::client::{Client, Identity};

    fn sent(f: impl FnOnce(&mut Client)) -> Vec<String> {
        let mut client = Client::new(Identity::new("test", "test", "Testing IRC"));
        f(&mut client);
        client
            .take_outgoing()
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn channel_commands() {
        assert_eq!(sent(|c| c.join("#test", None)), vec!["JOIN #test"]);
        assert_eq!(sent(|c| c.join("#test", Some("key"))), vec!["JOIN #test key"]);
        assert_eq!(sent(|c| c.part("#test", Some("bye now"))), vec!["PART #test :bye now"]);
        assert_eq!(
            sent(|c| c.kick("#test", "user1", None)),
            vec!["KICK #test user1"]
        );
        assert_eq!(sent(|c| c.topic("#test", None)), vec!["TOPIC #test"]);
        assert_eq!(sent(|c| c.mode("#test", &["+o", "user1"])), vec!["MODE #test +o user1"]);
    }

    #[test]
    fn ctcp_commands() {
        assert_eq!(
            sent(|c| c.action("#test", "waves")),
            vec!["PRIVMSG #test :\x01ACTION waves\x01"]
        );
        assert_eq!(sent(|c| c.version("user1")), vec!["PRIVMSG user1 :\x01VERSION\x01"]);
        assert_eq!(
            sent(|c| c.ctcp_reply("user1", "PING", Some("123"))),
            vec!["NOTICE user1 :\x01PING 123\x01"]
        );
    }

    #[test]
    fn raw_lines_must_parse() {
        assert_eq!(sent(|c| c.raw("LIST").unwrap()), vec!["LIST"]);
        let mut client = Client::new(Identity::new("test", "test", "Testing IRC"));
        assert!(client.raw("").is_err());
        assert!(client.raw(":spoof PRIVMSG #c :hi").is_err());
        assert!(!client.has_outgoing());
    }

    #[test]
    fn away_and_back() {
        assert_eq!(sent(|c| c.away(Some("lunch"))), vec!["AWAY :lunch"]);
        assert_eq!(sent(|c| c.away(None)), vec!["AWAY"]);
    }
}
