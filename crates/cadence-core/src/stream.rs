//! Data stream capability
//!
//! Concrete streams live outside this crate. The scheduler only needs to know
//! a stream's direction and whether it currently holds fresh data.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

/// Direction of a data stream relative to the component that registers it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StreamDirection {
    /// Data flows into the component; may gate handlers
    In,
    /// Data flows out of the component
    Out,
}

impl fmt::Display for StreamDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamDirection::In => write!(f, "in"),
            StreamDirection::Out => write!(f, "out"),
        }
    }
}

/// A named, directional data channel
pub trait DataStream {
    /// Stream name, used in diagnostics
    fn name(&self) -> &str;

    /// Stream direction
    fn direction(&self) -> StreamDirection;

    /// Whether the stream holds data not yet consumed
    fn fresh(&self) -> bool;
}

/// Shared handle to a stream, as held by its owner
pub type StreamRef = Rc<dyn DataStream>;
