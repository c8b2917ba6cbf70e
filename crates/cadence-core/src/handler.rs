//! Executable handlers
//!
//! Handlers are owned by whoever builds the pipeline stage. Components and
//! events only keep weak references to them and invoke them by name.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Boxed error returned by user code
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result of a single handler execution
pub type HandlerResult = std::result::Result<(), BoxError>;

/// Shared handle to a handler, as held by its owner
pub type HandlerRef = Rc<RefCell<dyn EventHandler>>;

/// A named unit of logic executed by the scheduler or by an event
pub trait EventHandler {
    /// Run the handler
    ///
    /// An `Err` is propagated unchanged to whoever triggered the execution.
    fn execute(&mut self) -> HandlerResult;
}

/// Wrap a handler into a shared handle
pub fn shared<H: EventHandler + 'static>(handler: H) -> HandlerRef {
    Rc::new(RefCell::new(handler))
}

/// A handler backed by a closure
pub struct FnHandler<F> {
    f: F,
}

impl<F> FnHandler<F>
where
    F: FnMut() -> HandlerResult,
{
    /// Create a handler from a closure
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> FnHandler<F>
where
    F: FnMut() -> HandlerResult + 'static,
{
    /// Create a shared handle directly from a closure
    pub fn shared(f: F) -> HandlerRef {
        shared(Self::new(f))
    }
}

impl<F> EventHandler for FnHandler<F>
where
    F: FnMut() -> HandlerResult,
{
    fn execute(&mut self) -> HandlerResult {
        (self.f)()
    }
}

impl<F> fmt::Debug for FnHandler<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnHandler").finish_non_exhaustive()
    }
}
