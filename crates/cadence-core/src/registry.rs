//! Named registries for component extension points
//!
//! One generic [`Registry`] backs all four kinds of extension points. The
//! value type decides ownership: a component stores its events by value and
//! everything else as `Weak` handles, so dropping the component never drops
//! handlers, streams or properties that belong to someone else.

use crate::config::DuplicatePolicy;
use crate::{Error, Result};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

/// Mapping from unique names to values, iterated in ascending name order
#[derive(Debug)]
pub struct Registry<V> {
    /// Kind of item stored, used in messages ("event", "handler", ...)
    kind: &'static str,
    /// Behaviour on duplicate names
    policy: DuplicatePolicy,
    /// Registered items
    entries: BTreeMap<String, V>,
}

impl<V> Registry<V> {
    /// Create an empty registry with the default duplicate policy
    pub fn new(kind: &'static str) -> Self {
        Self::with_policy(kind, DuplicatePolicy::default())
    }

    /// Create an empty registry with an explicit duplicate policy
    pub fn with_policy(kind: &'static str, policy: DuplicatePolicy) -> Self {
        Self {
            kind,
            policy,
            entries: BTreeMap::new(),
        }
    }

    /// Get the item kind
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Get the duplicate policy
    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    /// Register `value` under `name`
    ///
    /// An existing entry with the same name is replaced under
    /// [`DuplicatePolicy::Overwrite`]; under
    /// [`DuplicatePolicy::Reject`] the registry is left untouched and
    /// [`Error::DuplicateName`] is returned.
    pub fn register(&mut self, name: impl Into<String>, value: V) -> Result<&mut V> {
        match self.entries.entry(name.into()) {
            Entry::Occupied(mut slot) => match self.policy {
                DuplicatePolicy::Reject => Err(Error::DuplicateName {
                    registry: self.kind,
                    name: slot.key().clone(),
                }),
                DuplicatePolicy::Overwrite => {
                    log::debug!("{} '{}' registered again, replacing", self.kind, slot.key());
                    slot.insert(value);
                    Ok(slot.into_mut())
                }
            },
            Entry::Vacant(slot) => Ok(slot.insert(value)),
        }
    }

    /// Look up an item by name
    pub fn get(&self, name: &str) -> Option<&V> {
        self.entries.get(name)
    }

    /// Look up an item by name for modification
    pub fn get_mut(&mut self, name: &str) -> Option<&mut V> {
        self.entries.get_mut(name)
    }

    /// Check if a name is registered
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered names in ascending order
    pub fn names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// Iterate over `(name, item)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Registered names, one per line
    pub fn listing(&self) -> String {
        self.entries.keys().fold(String::new(), |mut out, name| {
            out.push_str(name);
            out.push('\n');
            out
        })
    }

    /// Number of registered items
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing is registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_get() {
        let mut registry = Registry::new("stream");
        registry.register("in_img", 1).unwrap();
        registry.register("out_img", 2).unwrap();

        assert_eq!(registry.get("in_img"), Some(&1));
        assert_eq!(registry.get("missing"), None);
        assert_eq!(registry.len(), 2);
        assert!(registry.contains("out_img"));
    }

    #[test]
    fn test_overwrite_keeps_last() {
        let mut registry = Registry::new("handler");
        registry.register("on_frame", "first").unwrap();
        let current = registry.register("on_frame", "second").unwrap();
        assert_eq!(*current, "second");

        assert_eq!(registry.get("on_frame"), Some(&"second"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_reject_keeps_first() {
        let mut registry = Registry::with_policy("handler", DuplicatePolicy::Reject);
        registry.register("on_frame", "first").unwrap();

        let err = registry.register("on_frame", "second").unwrap_err();
        assert!(matches!(
            err,
            Error::DuplicateName { registry: "handler", ref name } if name == "on_frame"
        ));
        assert_eq!(registry.get("on_frame"), Some(&"first"));
        assert_eq!(registry.policy(), DuplicatePolicy::Reject);
    }

    #[test]
    fn test_names_and_listing() {
        let mut registry = Registry::new("property");
        registry.register("threshold", ()).unwrap();
        registry.register("device", ()).unwrap();

        assert_eq!(registry.names(), vec!["device", "threshold"]);
        assert_eq!(registry.listing(), "device\nthreshold\n");
        assert_eq!(
            registry.iter().map(|(name, _)| name).collect::<Vec<_>>(),
            vec!["device", "threshold"]
        );
    }

    #[test]
    fn test_empty() {
        let registry: Registry<u8> = Registry::new("event");
        assert!(registry.is_empty());
        assert_eq!(registry.listing(), "");
        assert_eq!(registry.kind(), "event");
        assert_eq!(registry.policy(), DuplicatePolicy::Overwrite);
    }
}
