//! Component lifecycle: states, operations and user hooks
//!
//! A component moves between three states:
//!
//! ```text
//!   Unready --initialize--> Ready --start--> Running
//!      ^                    |   ^              |
//!      +------finish--------+   +----stop------+
//! ```
//!
//! Each transition runs one [`Lifecycle`] hook. A hook returning `false`
//! aborts the transition and leaves the state untouched.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum State {
    /// Constructed or finished; not initialized
    #[default]
    Unready,
    /// Initialized but not processing
    Ready,
    /// Processing; `step()` executes handlers
    Running,
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            State::Unready => write!(f, "unready"),
            State::Ready => write!(f, "ready"),
            State::Running => write!(f, "running"),
        }
    }
}

/// A lifecycle operation requested by the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    Initialize,
    Start,
    Stop,
    Finish,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Initialize => write!(f, "initialize"),
            Operation::Start => write!(f, "start"),
            Operation::Stop => write!(f, "stop"),
            Operation::Finish => write!(f, "finish"),
        }
    }
}

/// The hook run by a lifecycle operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hook {
    Init,
    Start,
    Stop,
    Finish,
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Hook::Init => write!(f, "on_init"),
            Hook::Start => write!(f, "on_start"),
            Hook::Stop => write!(f, "on_stop"),
            Hook::Finish => write!(f, "on_finish"),
        }
    }
}

/// Hooks implemented by a concrete pipeline stage
///
/// Every hook returns `true` on success. The defaults succeed without doing
/// anything, so a stage only overrides what it needs (e.g. opening a device
/// in `on_init`, releasing it in `on_finish`).
pub trait Lifecycle {
    /// Called by `initialize()` when leaving `Unready`
    fn on_init(&mut self) -> bool {
        true
    }

    /// Called by `start()` when leaving `Ready`
    fn on_start(&mut self) -> bool {
        true
    }

    /// Called by `stop()` when leaving `Running`
    fn on_stop(&mut self) -> bool {
        true
    }

    /// Called by `finish()` when returning to `Unready`
    fn on_finish(&mut self) -> bool {
        true
    }

    /// Dispatch to the hook matching `hook`
    fn run(&mut self, hook: Hook) -> bool {
        match hook {
            Hook::Init => self.on_init(),
            Hook::Start => self.on_start(),
            Hook::Stop => self.on_stop(),
            Hook::Finish => self.on_finish(),
        }
    }
}

/// Hooks that always succeed, for components without setup or teardown
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl Lifecycle for NoHooks {}
