//! Dependency triggers - which input streams gate which handler
//!
//! Each handler that declared at least one dependency (or an explicit empty
//! dependency set) has an entry here. A handler is ready when every stream in
//! its entry is fresh; an empty entry is always ready.
//!
//! # Priority view
//!
//! [`TriggerTable::rebuild_priority`] ranks entries by descending dependency
//! count so that the most specific handlers can be visited first. Ties are
//! broken by handler name. The view is a snapshot: it is only refreshed when the
//! owning component starts.

use crate::config::DispatchOrder;
use crate::stream::{DataStream, StreamDirection, StreamRef};
use indexmap::IndexMap;
use std::rc::{Rc, Weak};

/// Outcome of declaring a dependency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dependency {
    /// The stream was appended to the handler's trigger list
    Added,
    /// The handler's trigger list was reset to empty
    Cleared,
    /// The stream is not an input stream and was ignored
    Rejected,
}

/// Handler name -> ordered list of input streams
#[derive(Debug, Default)]
pub struct TriggerTable {
    /// Trigger entries in declaration order
    entries: IndexMap<String, Vec<Weak<dyn DataStream>>>,
    /// Handler names ranked by dependency count at the last rebuild
    priority: Vec<String>,
}

impl TriggerTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare that `handler` depends on `stream`
    ///
    /// `None` resets the handler's list to empty, making it ready on every
    /// cycle. Output streams are rejected; a rejected stream does not create
    /// an entry for a handler that has none.
    pub fn add(&mut self, handler: &str, stream: Option<&StreamRef>) -> Dependency {
        match stream {
            None => {
                self.entries.entry(handler.to_string()).or_default().clear();
                Dependency::Cleared
            }
            Some(stream) if stream.direction() == StreamDirection::In => {
                self.entries
                    .entry(handler.to_string())
                    .or_default()
                    .push(Rc::downgrade(stream));
                Dependency::Added
            }
            Some(_) => Dependency::Rejected,
        }
    }

    /// Number of streams gating `handler`, or `None` if it has no entry
    pub fn dependency_count(&self, handler: &str) -> Option<usize> {
        self.entries.get(handler).map(Vec::len)
    }

    /// Check if `handler` has an entry
    pub fn contains(&self, handler: &str) -> bool {
        self.entries.contains_key(handler)
    }

    /// Handler names in the order their triggers were first declared
    pub fn handlers(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Handler names in ascending order
    pub fn sorted_handlers(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers().collect();
        names.sort_unstable();
        names
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check if every stream gating `handler` is fresh
    ///
    /// `owner` only prefixes the trace output. A stream whose owner dropped it
    /// never counts as fresh. Handlers without an entry are never ready.
    pub fn is_ready(&self, owner: &str, handler: &str) -> bool {
        let Some(streams) = self.entries.get(handler) else {
            return false;
        };
        log::trace!("{}::{}", owner, handler);
        streams.iter().all(|stream| match stream.upgrade() {
            Some(stream) => {
                let fresh = stream.fresh();
                log::trace!(
                    "{} is {}",
                    stream.name(),
                    if fresh { "fresh" } else { "old" }
                );
                fresh
            }
            None => {
                log::trace!("{}::{} depends on a dropped stream", owner, handler);
                false
            }
        })
    }

    /// Rank entries by descending dependency count
    ///
    /// Replaces the previous ranking. Entries with the same count are ordered
    /// by handler name.
    pub fn rebuild_priority(&mut self) {
        let mut ranked: Vec<(&str, usize)> = self
            .sorted_handlers()
            .into_iter()
            .map(|name| (name, self.entries[name].len()))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        self.priority = ranked.into_iter().map(|(name, _)| name.to_string()).collect();
    }

    /// Handler names as ranked by the last [`rebuild_priority`](Self::rebuild_priority)
    pub fn priority_order(&self) -> Vec<&str> {
        self.priority.iter().map(String::as_str).collect()
    }

    /// Handler names in the order `step()` visits them
    ///
    /// With [`DispatchOrder::Priority`], entries added after the last rebuild
    /// follow the ranked ones in name order.
    pub fn dispatch_order(&self, order: DispatchOrder) -> Vec<String> {
        match order {
            DispatchOrder::Name => self
                .sorted_handlers()
                .into_iter()
                .map(str::to_string)
                .collect(),
            DispatchOrder::Registration => self.handlers().map(str::to_string).collect(),
            DispatchOrder::Priority => {
                let mut names = self.priority.clone();
                names.extend(
                    self.sorted_handlers()
                        .into_iter()
                        .filter(|name| {
                            !self.priority.iter().any(|ranked| ranked.as_str() == *name)
                        })
                        .map(str::to_string),
                );
                names
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct TestStream {
        name: &'static str,
        direction: StreamDirection,
        fresh: Cell<bool>,
    }

    impl DataStream for TestStream {
        fn name(&self) -> &str {
            self.name
        }

        fn direction(&self) -> StreamDirection {
            self.direction
        }

        fn fresh(&self) -> bool {
            self.fresh.get()
        }
    }

    fn stream(name: &'static str, direction: StreamDirection, fresh: bool) -> Rc<TestStream> {
        Rc::new(TestStream {
            name,
            direction,
            fresh: Cell::new(fresh),
        })
    }

    #[test]
    fn test_add_input_stream() {
        let mut table = TriggerTable::new();
        let a: StreamRef = stream("a", StreamDirection::In, false);

        assert_eq!(table.add("h", Some(&a)), Dependency::Added);
        assert_eq!(table.add("h", Some(&a)), Dependency::Added);
        assert_eq!(table.dependency_count("h"), Some(2));
    }

    #[test]
    fn test_output_stream_rejected() {
        let mut table = TriggerTable::new();
        let a: StreamRef = stream("a", StreamDirection::In, true);
        let out: StreamRef = stream("out", StreamDirection::Out, true);

        assert_eq!(table.add("h", Some(&out)), Dependency::Rejected);
        assert!(!table.contains("h"));

        table.add("h", Some(&a));
        assert_eq!(table.add("h", Some(&out)), Dependency::Rejected);
        assert_eq!(table.dependency_count("h"), Some(1));
    }

    #[test]
    fn test_clear_makes_ready() {
        let mut table = TriggerTable::new();
        let a: StreamRef = stream("a", StreamDirection::In, false);
        table.add("h", Some(&a));
        assert!(!table.is_ready("c", "h"));

        assert_eq!(table.add("h", None), Dependency::Cleared);
        assert_eq!(table.dependency_count("h"), Some(0));
        assert!(table.is_ready("c", "h"));
    }

    #[test]
    fn test_readiness_needs_all_fresh() {
        let mut table = TriggerTable::new();
        let a = stream("a", StreamDirection::In, true);
        let b = stream("b", StreamDirection::In, false);
        let a_ref: StreamRef = a.clone();
        let b_ref: StreamRef = b.clone();
        table.add("h", Some(&a_ref));
        table.add("h", Some(&b_ref));

        assert!(!table.is_ready("c", "h"));
        b.fresh.set(true);
        assert!(table.is_ready("c", "h"));
        a.fresh.set(false);
        assert!(!table.is_ready("c", "h"));
    }

    #[test]
    fn test_unknown_handler_not_ready() {
        let table = TriggerTable::new();
        assert!(!table.is_ready("c", "nobody"));
    }

    #[test]
    fn test_dropped_stream_not_fresh() {
        let mut table = TriggerTable::new();
        {
            let a: StreamRef = stream("a", StreamDirection::In, true);
            table.add("h", Some(&a));
            assert!(table.is_ready("c", "h"));
        }
        assert!(!table.is_ready("c", "h"));
    }

    #[test]
    fn test_priority_descending_and_stable() {
        let mut table = TriggerTable::new();
        let a: StreamRef = stream("a", StreamDirection::In, true);
        let b: StreamRef = stream("b", StreamDirection::In, true);

        table.add("one_a", Some(&a));
        table.add("none", None);
        table.add("two", Some(&a));
        table.add("two", Some(&b));
        table.add("one_b", Some(&b));

        table.rebuild_priority();
        assert_eq!(table.priority_order(), vec!["two", "one_a", "one_b", "none"]);

        // Rebuilding replaces the previous ranking instead of appending to it
        table.rebuild_priority();
        assert_eq!(table.priority_order().len(), 4);
    }

    #[test]
    fn test_dispatch_order() {
        let mut table = TriggerTable::new();
        let a: StreamRef = stream("a", StreamDirection::In, true);
        table.add("free", None);
        table.add("gated", Some(&a));
        table.rebuild_priority();
        table.add("late", None);

        assert_eq!(
            table.dispatch_order(DispatchOrder::Registration),
            vec!["free", "gated", "late"]
        );
        assert_eq!(
            table.dispatch_order(DispatchOrder::Priority),
            vec!["gated", "free", "late"]
        );
        assert_eq!(
            table.dispatch_order(DispatchOrder::Name),
            vec!["free", "gated", "late"]
        );
    }

    #[test]
    fn test_name_order_ignores_declaration_order() {
        let mut table = TriggerTable::new();
        let a: StreamRef = stream("a", StreamDirection::In, true);
        table.add("zeta", None);
        table.add("alpha", None);
        table.add("mid", Some(&a));

        assert_eq!(table.handlers().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);
        assert_eq!(table.sorted_handlers(), vec!["alpha", "mid", "zeta"]);
        assert_eq!(
            table.dispatch_order(DispatchOrder::Name),
            vec!["alpha", "mid", "zeta"]
        );

        // Equal counts rank by name, not by declaration
        table.rebuild_priority();
        assert_eq!(table.priority_order(), vec!["mid", "alpha", "zeta"]);

        table.add("beta", None);
        assert_eq!(
            table.dispatch_order(DispatchOrder::Priority),
            vec!["mid", "alpha", "zeta", "beta"]
        );
    }
}
