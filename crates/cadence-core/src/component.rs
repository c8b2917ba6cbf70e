//! Component - lifecycle-managed unit of pipeline logic
//!
//! A [`Component`] bundles:
//! - a lifecycle state machine driven by user [`Lifecycle`] hooks
//! - four named registries: events (owned), handlers, streams and
//!   properties (weak references to objects owned elsewhere)
//! - a [`TriggerTable`] saying which input streams gate which handler
//!
//! An external driver calls `initialize()`, then alternates `start()`,
//! repeated `step()` calls and `stop()`, and finally `finish()`. Each `step()`
//! executes every handler whose input streams are all fresh.

use crate::config::{ComponentConfig, DispatchOrder};
use crate::event::Event;
use crate::handler::{EventHandler, HandlerRef};
use crate::lifecycle::{Hook, Lifecycle, NoHooks, Operation, State};
use crate::property::{Property, PropertyRef};
use crate::registry::Registry;
use crate::stream::{DataStream, StreamRef};
use crate::trigger::{Dependency, TriggerTable};
use crate::{Error, Result};
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::{Duration, Instant};

/// Result of one scheduling cycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepReport {
    /// Handlers executed during the cycle, in execution order
    pub executed: Vec<String>,
    /// Wall-clock time spent executing handlers
    pub elapsed: Duration,
}

impl StepReport {
    /// A report for a cycle that did no work
    pub fn idle() -> Self {
        Self::default()
    }

    /// Check if no handler ran
    pub fn is_idle(&self) -> bool {
        self.executed.is_empty()
    }

    /// Check if the named handler ran
    pub fn ran(&self, handler: &str) -> bool {
        self.executed.iter().any(|h| h == handler)
    }
}

/// A lifecycle-managed pipeline component
pub struct Component<H = NoHooks> {
    /// Identity, used as the prefix of every diagnostic
    name: String,
    /// Current lifecycle state
    state: State,
    /// User hooks run on each transition
    hooks: H,
    /// Registration and dispatch policies
    config: ComponentConfig,
    /// Events created and owned by this component
    events: Registry<Event>,
    /// Handlers owned elsewhere
    handlers: Registry<Weak<RefCell<dyn EventHandler>>>,
    /// Streams owned elsewhere
    streams: Registry<Weak<dyn DataStream>>,
    /// Properties owned elsewhere
    properties: Registry<Weak<dyn Property>>,
    /// Handler name -> gating input streams
    triggers: TriggerTable,
}

impl Component<NoHooks> {
    /// Create a component without lifecycle hooks
    pub fn plain(name: impl Into<String>) -> Self {
        Self::new(name, NoHooks)
    }
}

impl<H: Lifecycle> Component<H> {
    /// Create a component with the default configuration
    pub fn new(name: impl Into<String>, hooks: H) -> Self {
        Self::with_config(name, hooks, ComponentConfig::default())
    }

    /// Create a component with an explicit configuration
    pub fn with_config(name: impl Into<String>, hooks: H, config: ComponentConfig) -> Self {
        let policy = config.duplicate_policy();
        Self {
            name: name.into(),
            state: State::Unready,
            hooks,
            config,
            events: Registry::with_policy("event", policy),
            handlers: Registry::with_policy("handler", policy),
            streams: Registry::with_policy("stream", policy),
            properties: Registry::with_policy("property", policy),
            triggers: TriggerTable::new(),
        }
    }

    /// Get the component name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the current lifecycle state
    pub fn state(&self) -> State {
        self.state
    }

    /// Get the configuration
    pub fn config(&self) -> &ComponentConfig {
        &self.config
    }

    /// Switch the dispatch order used by subsequent steps
    pub fn set_dispatch_order(&mut self, order: DispatchOrder) {
        self.config.set_dispatch_order(order);
    }

    /// Get the lifecycle hooks
    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    /// Get the lifecycle hooks for modification
    pub fn hooks_mut(&mut self) -> &mut H {
        &mut self.hooks
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Unready -> Ready
    ///
    /// Calling this on an initialized component only logs a warning.
    pub fn initialize(&mut self) -> Result<()> {
        match self.state {
            State::Unready => {
                self.run_hook(Hook::Init)?;
                self.state = State::Ready;
                Ok(())
            }
            State::Ready => {
                log::warn!("{} already initialized.", self.name);
                Ok(())
            }
            State::Running => {
                log::warn!("{} already initialized and running.", self.name);
                Ok(())
            }
        }
    }

    /// Ready -> Running
    ///
    /// Ranks the trigger table before running the start hook. Fails on an
    /// uninitialized component.
    pub fn start(&mut self) -> Result<()> {
        match self.state {
            State::Ready => {
                self.triggers.rebuild_priority();
                self.run_hook(Hook::Start)?;
                self.state = State::Running;
                Ok(())
            }
            State::Running => {
                log::warn!("{} already running.", self.name);
                Ok(())
            }
            State::Unready => {
                log::warn!("{} is not ready to run.", self.name);
                Err(self.invalid(Operation::Start))
            }
        }
    }

    /// Running -> Ready
    ///
    /// Fails on an uninitialized component.
    pub fn stop(&mut self) -> Result<()> {
        match self.state {
            State::Running => {
                self.run_hook(Hook::Stop)?;
                self.state = State::Ready;
                Ok(())
            }
            State::Ready => {
                log::warn!("{} already stopped.", self.name);
                Ok(())
            }
            State::Unready => {
                log::warn!("{} is not initialized.", self.name);
                Err(self.invalid(Operation::Stop))
            }
        }
    }

    /// Ready -> Unready
    ///
    /// On a running component this stops it first, runs the finish hook
    /// whether or not the stop succeeded, and always returns
    /// [`Error::ForcedFinish`]. The component ends `Unready` whenever the
    /// finish hook succeeds.
    pub fn finish(&mut self) -> Result<()> {
        match self.state {
            State::Ready => {
                self.run_hook(Hook::Finish)?;
                self.state = State::Unready;
                Ok(())
            }
            State::Unready => {
                log::warn!("{} is already finished.", self.name);
                Ok(())
            }
            State::Running => {
                log::warn!("{} still running. Trying to stop...", self.name);
                let stopped = match self.stop() {
                    Ok(()) => {
                        log::warn!("{} stopped. Finishing...", self.name);
                        true
                    }
                    Err(err) => {
                        log::warn!("{} didn't stop ({}). Finishing anyway...", self.name, err);
                        false
                    }
                };

                if self.hooks.run(Hook::Finish) {
                    self.state = State::Unready;
                } else {
                    log::warn!("{} {} hook failed.", self.name, Hook::Finish);
                }

                Err(Error::ForcedFinish {
                    component: self.name.clone(),
                    stopped,
                })
            }
        }
    }

    /// Check if the component is running
    pub fn running(&self) -> bool {
        self.state == State::Running
    }

    /// Check if the component is initialized and not running
    pub fn initialized(&self) -> bool {
        self.state == State::Ready
    }

    fn run_hook(&mut self, hook: Hook) -> Result<()> {
        if self.hooks.run(hook) {
            Ok(())
        } else {
            Err(Error::HookFailed {
                component: self.name.clone(),
                hook,
            })
        }
    }

    fn invalid(&self, operation: Operation) -> Error {
        Error::InvalidTransition {
            component: self.name.clone(),
            operation,
            state: self.state,
        }
    }

    // ------------------------------------------------------------------
    // Scheduling
    // ------------------------------------------------------------------

    /// Run one processing cycle
    ///
    /// Visits the trigger table in the configured dispatch order and executes
    /// each handler whose input streams are all fresh at the moment it is
    /// visited. A failing handler aborts the cycle and its error is returned.
    /// On a component that is not running this only logs a warning.
    pub fn step(&mut self) -> Result<StepReport> {
        if self.state != State::Running {
            log::warn!("{} is not running. Step can't be done.", self.name);
            return Ok(StepReport::idle());
        }

        let started = Instant::now();
        let mut executed = Vec::new();

        for name in self.triggers.dispatch_order(self.config.dispatch_order()) {
            if !self.triggers.is_ready(&self.name, &name) {
                continue;
            }
            let Some(handler) = self.handler(&name) else {
                log::warn!("{} has a trigger for unknown handler '{}'. Skipping.", self.name, name);
                continue;
            };

            log::debug!("{}::{} executing", self.name, name);
            let mut guard = handler
                .try_borrow_mut()
                .map_err(|_| Error::HandlerBusy(name.clone()))?;
            guard.execute().map_err(|source| Error::HandlerFault {
                component: self.name.clone(),
                handler: name.clone(),
                source,
            })?;
            drop(guard);

            executed.push(name);
        }

        if executed.is_empty() {
            log::debug!("{} has no active handler.", self.name);
        }

        Ok(StepReport {
            executed,
            elapsed: started.elapsed(),
        })
    }

    /// Name of the first ready handler in dispatch order
    ///
    /// Only handlers that are still registered are considered.
    pub fn ready_handler_name(&self) -> Option<String> {
        self.triggers
            .dispatch_order(self.config.dispatch_order())
            .into_iter()
            .find(|name| {
                self.triggers.is_ready(&self.name, name) && self.handler(name).is_some()
            })
    }

    /// First ready handler in dispatch order, without executing it
    pub fn ready_handler(&self) -> Option<HandlerRef> {
        self.ready_handler_name()
            .and_then(|name| self.handler(&name))
    }

    // ------------------------------------------------------------------
    // Dependencies
    // ------------------------------------------------------------------

    /// Declare that `handler` runs only when `stream` is fresh
    ///
    /// Passing `None` clears the handler's dependencies, so it runs on every
    /// cycle. Output streams cannot gate a handler and are ignored with a
    /// warning.
    pub fn add_dependency(&mut self, handler: &str, stream: Option<&StreamRef>) -> Dependency {
        let outcome = self.triggers.add(handler, stream);
        if outcome == Dependency::Rejected {
            log::warn!(
                "{}: handlers can only depend on input streams ('{}' ignored for {}).",
                self.name,
                stream.map(|s| s.name()).unwrap_or_default(),
                handler
            );
        }
        outcome
    }

    /// Number of streams gating `handler`, or `None` if it has no trigger
    pub fn dependencies(&self, handler: &str) -> Option<usize> {
        self.triggers.dependency_count(handler)
    }

    /// Handler names ranked at the last `start()`, most dependencies first
    pub fn priority_order(&self) -> Vec<&str> {
        self.triggers.priority_order()
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    /// Create and register an event owned by this component
    pub fn register_event(&mut self, name: impl Into<String>) -> Result<&mut Event> {
        let name = name.into();
        let event = Event::new(name.clone());
        self.events.register(name, event)
    }

    /// Look up an event
    pub fn event(&self, name: &str) -> Option<&Event> {
        self.events.get(name)
    }

    /// Look up an event for connecting handlers
    pub fn event_mut(&mut self, name: &str) -> Option<&mut Event> {
        self.events.get_mut(name)
    }

    /// Registered event names
    pub fn event_names(&self) -> Vec<String> {
        self.events.names()
    }

    /// Log registered events
    pub fn print_events(&self) {
        print_registry("Registered events:", &self.events);
    }

    // ------------------------------------------------------------------
    // Handlers
    // ------------------------------------------------------------------

    /// Register a handler owned by the caller
    pub fn register_handler(
        &mut self,
        name: impl Into<String>,
        handler: &HandlerRef,
    ) -> Result<HandlerRef> {
        self.handlers.register(name, Rc::downgrade(handler))?;
        Ok(Rc::clone(handler))
    }

    /// Look up a handler; `None` if unknown or dropped by its owner
    pub fn handler(&self, name: &str) -> Option<HandlerRef> {
        self.handlers.get(name).and_then(Weak::upgrade)
    }

    /// Registered handler names
    pub fn handler_names(&self) -> Vec<String> {
        self.handlers.names()
    }

    /// Registered handler names, one per line
    pub fn list_handlers(&self) -> String {
        self.handlers.listing()
    }

    /// Log registered handlers
    pub fn print_handlers(&self) {
        print_registry("Registered handlers:", &self.handlers);
    }

    // ------------------------------------------------------------------
    // Streams
    // ------------------------------------------------------------------

    /// Register a stream owned by the caller
    pub fn register_stream(
        &mut self,
        name: impl Into<String>,
        stream: &StreamRef,
    ) -> Result<StreamRef> {
        self.streams.register(name, Rc::downgrade(stream))?;
        Ok(Rc::clone(stream))
    }

    /// Look up a stream; `None` if unknown or dropped by its owner
    pub fn stream(&self, name: &str) -> Option<StreamRef> {
        self.streams.get(name).and_then(Weak::upgrade)
    }

    /// Registered stream names
    pub fn stream_names(&self) -> Vec<String> {
        self.streams.names()
    }

    /// Log registered streams
    pub fn print_streams(&self) {
        print_registry("Registered data streams:", &self.streams);
    }

    // ------------------------------------------------------------------
    // Properties
    // ------------------------------------------------------------------

    /// Register a property owned by the caller under an explicit name
    pub fn register_property(
        &mut self,
        name: impl Into<String>,
        property: &PropertyRef,
    ) -> Result<PropertyRef> {
        self.properties.register(name, Rc::downgrade(property))?;
        Ok(Rc::clone(property))
    }

    /// Register a property under its own name
    pub fn register_named_property(&mut self, property: &PropertyRef) -> Result<PropertyRef> {
        let name = property.name().to_string();
        self.register_property(name, property)
    }

    /// Look up a property; `None` if unknown or dropped by its owner
    pub fn property(&self, name: &str) -> Option<PropertyRef> {
        self.properties.get(name).and_then(Weak::upgrade)
    }

    /// Registered property names
    pub fn property_names(&self) -> Vec<String> {
        self.properties.names()
    }

    /// Registered property names, one per line
    pub fn list_properties(&self) -> String {
        self.properties.listing()
    }

    /// Log registered properties; logs nothing if there are none
    pub fn print_properties(&self) {
        if self.properties.is_empty() {
            return;
        }
        print_registry("Registered properties:", &self.properties);
    }
}

fn print_registry<V>(header: &str, registry: &Registry<V>) {
    log::info!("{}", header);
    for (name, _) in registry.iter() {
        log::info!("\t{}", name);
    }
}

impl<H> fmt::Debug for Component<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("name", &self.name)
            .field("state", &self.state)
            .field("events", &self.events.len())
            .field("handlers", &self.handlers.len())
            .field("streams", &self.streams.len())
            .field("properties", &self.properties.len())
            .field("triggers", &self.triggers.len())
            .finish()
    }
}
