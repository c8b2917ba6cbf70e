//! Events - named notification channels owned by a component
//!
//! A component creates its events and drops them with itself. Other parts of
//! the pipeline connect handlers to an event; raising the event executes the
//! connected handlers in connection order.

use crate::handler::{EventHandler, HandlerRef};
use crate::{Error, Result};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// A named notification channel
#[derive(Debug, Default)]
pub struct Event {
    /// Event name
    name: String,
    /// Connected handlers; the event does not keep them alive
    handlers: Vec<Weak<RefCell<dyn EventHandler>>>,
}

impl Event {
    /// Create an event with no connected handlers
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            handlers: Vec::new(),
        }
    }

    /// Get the event name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Connect a handler to this event
    pub fn connect(&mut self, handler: &HandlerRef) {
        self.handlers.push(Rc::downgrade(handler));
    }

    /// Number of connected handlers that are still alive
    pub fn handler_count(&self) -> usize {
        self.handlers
            .iter()
            .filter(|h| h.strong_count() > 0)
            .count()
    }

    /// Execute every live connected handler, in connection order
    ///
    /// Handlers whose owner has dropped them are skipped. The first failing
    /// handler aborts the raise and its error is returned.
    ///
    /// Returns the number of handlers executed.
    pub fn raise(&self) -> Result<usize> {
        let mut executed = 0;
        for handler in self.handlers.iter().filter_map(Weak::upgrade) {
            let mut handler = handler
                .try_borrow_mut()
                .map_err(|_| Error::HandlerBusy(format!("{} listener", self.name)))?;
            handler.execute().map_err(|source| Error::EventFault {
                event: self.name.clone(),
                source,
            })?;
            executed += 1;
        }
        log::trace!("event '{}' raised, {} handler(s) executed", self.name, executed);
        Ok(executed)
    }
}
