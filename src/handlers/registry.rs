//! Event handler registry and dispatch.
//!
//! The `Registry` maps event names to an ordered list of handlers. Event names
//! are stored upper-cased so `"connected"` and `"CONNECTED"` are the same
//! event. Dispatch itself lives on [`Client::dispatch`], which needs `&mut`
//! access to the client while iterating the handlers of one event.

use crate::client::Client;
use crate::error::HandlerResult;
use slirc_proto::Message;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// An event handler.
///
/// Handlers run synchronously on the read loop, one line at a time. They
/// mutate the client's tracker and queue outbound lines with
/// [`Client::send`]; they never block.
pub trait Handler: Send + Sync {
    fn handle(&self, client: &mut Client, msg: &Message) -> HandlerResult;
}

impl<F> Handler for F
where
    F: Fn(&mut Client, &Message) -> HandlerResult + Send + Sync,
{
    fn handle(&self, client: &mut Client, msg: &Message) -> HandlerResult {
        self(client, msg)
    }
}

/// Registry of event handlers.
#[derive(Default, Clone)]
pub struct Registry {
    handlers: HashMap<String, Vec<Arc<dyn Handler>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `handler` to the list for `event`.
    pub fn register(&mut self, event: &str, handler: Arc<dyn Handler>) {
        self.handlers
            .entry(event.to_ascii_uppercase())
            .or_default()
            .push(handler);
    }

    /// Snapshot of the handlers for `event`, in registration order.
    ///
    /// Returned by value so the caller can run them while mutating whatever
    /// owns the registry.
    pub fn handlers(&self, event: &str) -> Vec<Arc<dyn Handler>> {
        self.handlers
            .get(&event.to_ascii_uppercase())
            .cloned()
            .unwrap_or_default()
    }

    pub fn has_handlers(&self, event: &str) -> bool {
        self.handlers
            .get(&event.to_ascii_uppercase())
            .is_some_and(|list| !list.is_empty())
    }

    /// Number of distinct events with at least one handler.
    pub fn event_count(&self) -> usize {
        self.handlers.len()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut events: Vec<(&str, usize)> = self
            .handlers
            .iter()
            .map(|(name, list)| (name.as_str(), list.len()))
            .collect();
        events.sort_unstable();
        f.debug_struct("Registry").field("events", &events).finish()
    }
}
