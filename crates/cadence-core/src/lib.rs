//! Cadence Core - Component runtime for data-flow pipelines
//!
//! This crate provides the skeleton every pipeline stage is built on:
//! - A lifecycle state machine (`Unready -> Ready -> Running`) with user hooks
//! - Named extension points: events, handlers, data streams and properties
//! - A per-tick scheduler that runs each handler once all of the input
//!   streams it depends on are fresh
//!
//! Execution is single-threaded. An external driver owns the tick loop and
//! calls [`Component::step`] once per tick.
//!
//! ## Ownership
//!
//! A component owns its [`Event`]s. Handlers, streams and properties belong
//! to whoever created them; the component only keeps weak references, so a
//! dropped object simply stops being found.
//!
//! ## Example
//!
//! ```
//! use cadence_core::{Component, DataStream, FnHandler, StreamDirection, StreamRef};
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! struct Input(Cell<bool>);
//!
//! impl DataStream for Input {
//!     fn name(&self) -> &str { "in_img" }
//!     fn direction(&self) -> StreamDirection { StreamDirection::In }
//!     fn fresh(&self) -> bool { self.0.get() }
//! }
//!
//! let input = Rc::new(Input(Cell::new(false)));
//! let stream: StreamRef = input.clone();
//! let on_image = FnHandler::shared(|| Ok(()));
//!
//! let mut component = Component::plain("blur");
//! component.register_stream("in_img", &stream).unwrap();
//! component.register_handler("on_image", &on_image).unwrap();
//! component.add_dependency("on_image", Some(&stream));
//!
//! component.initialize().unwrap();
//! component.start().unwrap();
//! assert!(component.step().unwrap().is_idle());
//!
//! input.0.set(true);
//! assert!(component.step().unwrap().ran("on_image"));
//! ```

mod component;
mod config;
mod error;
mod event;
pub mod handler;
pub mod lifecycle;
mod property;
mod registry;
mod stream;
pub mod trigger;

pub use component::{Component, StepReport};
pub use config::{ComponentConfig, DispatchOrder, DuplicatePolicy};
pub use error::{Error, Result};
pub use event::Event;
pub use handler::{shared, BoxError, EventHandler, FnHandler, HandlerRef, HandlerResult};
pub use lifecycle::{Hook, Lifecycle, NoHooks, Operation, State};
pub use property::{Property, PropertyRef};
pub use registry::Registry;
pub use stream::{DataStream, StreamDirection, StreamRef};
pub use trigger::{Dependency, TriggerTable};
