//! The sans-IO protocol core.
//!
//! A [`Client`] consumes inbound lines through [`Client::handle_line`] and
//! produces outbound [`Message`]s, which the caller collects with
//! [`Client::take_outgoing`]. It performs no I/O itself; the network
//! supervisor in [`crate::network`] owns one and feeds it.

mod commands;

use crate::handlers::{self, Handler, Registry};
use crate::state::{Nick, NickId, Tracker};
use slirc_proto::{CaseMapping, Message, ProtocolError};
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Who we say we are when registering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub nick: String,
    pub ident: String,
    pub realname: String,
}

impl Identity {
    pub fn new(
        nick: impl Into<String>,
        ident: impl Into<String>,
        realname: impl Into<String>,
    ) -> Self {
        Self {
            nick: nick.into(),
            ident: ident.into(),
            realname: realname.into(),
        }
    }
}

/// Default reply to CTCP VERSION.
pub const DEFAULT_CTCP_VERSION: &str = concat!("slirc-client ", env!("CARGO_PKG_VERSION"));

/// State of one IRC connection.
pub struct Client {
    identity: Identity,
    pub(crate) tracker: Tracker,
    pub(crate) me: NickId,
    registry: Registry,
    pub(crate) registered: bool,
    pub(crate) ctcp_version: String,
    outbox: Vec<Message>,
}

impl Client {
    /// Build a client with the intrinsic handlers installed.
    pub fn new(identity: Identity) -> Self {
        Self::build(identity, CaseMapping::default())
    }

    fn build(identity: Identity, casemapping: CaseMapping) -> Self {
        let (tracker, me) = Tracker::with_me(casemapping, &identity.nick);
        if let Some(nick) = tracker.nick(me) {
            debug!(nick = %nick.name(), id = %me, "Tracking local identity");
        }

        let mut registry = Registry::new();
        for (event, handler) in handlers::INTRINSICS {
            registry.register(event, Arc::new(*handler));
        }

        Self {
            identity,
            tracker,
            me,
            registry,
            registered: false,
            ctcp_version: DEFAULT_CTCP_VERSION.to_owned(),
            outbox: Vec::new(),
        }
    }

    /// Set the string sent in reply to CTCP VERSION.
    pub fn with_ctcp_version(mut self, version: impl Into<String>) -> Self {
        self.ctcp_version = version.into();
        self
    }

    /// Rebuild the tracker under a different case mapping. Only meaningful
    /// before anything has been tracked.
    pub fn with_casemapping(mut self, casemapping: CaseMapping) -> Self {
        let (tracker, me) = Tracker::with_me(casemapping, &self.identity.nick);
        self.tracker = tracker;
        self.me = me;
        self
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Handle to our own nick in the tracker.
    pub fn me(&self) -> NickId {
        self.me
    }

    /// Our current nick as the server knows it.
    pub fn me_nick(&self) -> &str {
        self.tracker
            .nick(self.me)
            .map(Nick::name)
            .unwrap_or(self.identity.nick.as_str())
    }

    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut Tracker {
        &mut self.tracker
    }

    /// True once `001` has been seen on this connection.
    pub fn is_registered(&self) -> bool {
        self.registered
    }

    pub fn ctcp_version(&self) -> &str {
        &self.ctcp_version
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    /// Add a listener for `event`. Listeners run after the intrinsic
    /// handlers, in registration order.
    pub fn register<F>(&mut self, event: &str, handler: F)
    where
        F: Fn(&mut Client, &Message) -> crate::error::HandlerResult + Send + Sync + 'static,
    {
        self.registry.register(event, Arc::new(handler));
    }

    /// Add an already shared handler for `event`.
    pub fn register_handler(&mut self, event: &str, handler: Arc<dyn Handler>) {
        self.registry.register(event, handler);
    }

    /// Run every handler for `event` against `msg`.
    ///
    /// Handler errors are logged and do not stop the remaining handlers.
    pub fn dispatch(&mut self, event: &str, msg: &Message) {
        for handler in self.registry.handlers(event) {
            match handler.handle(self, msg) {
                Ok(()) => {}
                // Replies about nicks and channels we never saw are routine.
                Err(e) if e.is_inconsistency() => debug!(
                    event = %event,
                    error = %e,
                    code = e.error_code(),
                    line = %msg,
                    "Line does not match tracked state"
                ),
                Err(e) => warn!(
                    event = %event,
                    error = %e,
                    code = e.error_code(),
                    line = %msg,
                    "Handler failed"
                ),
            }
        }
    }

    /// Parse one raw line and dispatch it.
    ///
    /// A line that does not parse is logged and dropped; the error is
    /// returned so the caller can count it, but it is never fatal.
    pub fn handle_line(&mut self, raw: &str) -> Result<(), ProtocolError> {
        trace!(line = %raw, "<<");
        match Message::parse(raw) {
            Ok(msg) => {
                self.handle_message(&msg);
                Ok(())
            }
            Err(e) => {
                debug!(line = %raw, error = %e, "Dropping unparseable line");
                Err(e)
            }
        }
    }

    /// Dispatch an already parsed message.
    pub fn handle_message(&mut self, msg: &Message) {
        let event = handlers::event_name(msg).to_owned();
        self.dispatch(&event, msg);
    }

    // ------------------------------------------------------------------
    // Outbound queue
    // ------------------------------------------------------------------

    /// Queue a line for the server.
    pub fn send(&mut self, msg: Message) {
        trace!(line = %msg, "queued");
        self.outbox.push(msg);
    }

    /// Drain everything queued since the last call.
    pub fn take_outgoing(&mut self) -> Vec<Message> {
        std::mem::take(&mut self.outbox)
    }

    pub fn has_outgoing(&self) -> bool {
        !self.outbox.is_empty()
    }

    /// Queue the registration burst: `PASS` (if any), `NICK`, `USER`.
    pub fn login(&mut self, password: Option<&str>) {
        if let Some(password) = password {
            self.send(Message::pass(password));
        }
        let nick = self.me_nick().to_owned();
        self.send(Message::nick(&nick));
        self.send(Message::user(&self.identity.ident, &self.identity.realname));
    }

    /// Forget everything learned on the last connection.
    ///
    /// The tracker is rebuilt with only ourselves in it, under the
    /// configured nick. Registered listeners are kept.
    pub fn reset(&mut self) {
        let (tracker, me) = Tracker::with_me(self.tracker.casemapping(), &self.identity.nick);
        self.tracker = tracker;
        self.me = me;
        self.registered = false;
        self.outbox.clear();
        debug!(nick = %self.identity.nick, "Client state reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HandlerError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn client() -> Client {
        Client::new(Identity::new("test", "test", "Testing IRC"))
    }

    fn lines(client: &mut Client) -> Vec<String> {
        client
            .take_outgoing()
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn login_burst() {
        let mut c = client();
        c.login(Some("hunter2"));
        assert_eq!(
            lines(&mut c),
            vec!["PASS hunter2", "NICK test", "USER test 0 * :Testing IRC"]
        );

        c.login(None);
        assert_eq!(lines(&mut c), vec!["NICK test", "USER test 0 * :Testing IRC"]);
    }

    #[test]
    fn listeners_run_in_order_after_failures() {
        let mut c = client();
        let hits = Arc::new(AtomicUsize::new(0));

        c.register("privmsg", |_, _| Err(HandlerError::NeedMoreParams));
        let counter = Arc::clone(&hits);
        c.register("PRIVMSG", move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        c.handle_line(":a!b@c PRIVMSG test :hi").unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unparseable_lines_are_reported() {
        let mut c = client();
        assert!(c.handle_line("").is_err());
        assert!(c.handle_line(":prefix.only").is_err());
        assert!(!c.has_outgoing());
    }

    #[test]
    fn reset_keeps_listeners() {
        let mut c = client();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        c.register("connected", move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        c.handle_line(":irc.server.org 001 test :Welcome to IRC test!ident@somehost.com")
            .unwrap();
        let chan = c.tracker_mut().new_channel("#test").unwrap();
        let me = c.me();
        c.tracker_mut().add_member(chan, me);
        assert!(c.is_registered());

        c.reset();
        assert!(!c.is_registered());
        assert_eq!(c.tracker().channel_count(), 0);
        assert_eq!(c.tracker().nick_count(), 1);
        assert_eq!(c.me_nick(), "test");

        c.handle_line(":irc.server.org 001 test :Welcome to IRC test!ident@somehost.com")
            .unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn ctcp_version_is_configurable() {
        let c = client().with_ctcp_version("custom 1.0");
        assert_eq!(c.ctcp_version(), "custom 1.0");
        assert!(client().ctcp_version().starts_with("slirc-client "));
    }

    #[test]
    fn casemapping_can_be_changed() {
        let c = client().with_casemapping(CaseMapping::Ascii);
        assert_eq!(c.tracker().casemapping(), CaseMapping::Ascii);
        assert_eq!(c.tracker().nick_id("TEST"), Some(c.me()));
    }
}
