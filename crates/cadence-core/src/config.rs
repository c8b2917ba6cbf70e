//! Component Configuration - Registration and dispatch policies
//!
//! Both settings default to the legacy behaviour: duplicate names silently
//! replace earlier registrations, and handlers are dispatched in ascending
//! name order.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// What a registry does when a name is registered twice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DuplicatePolicy {
    /// The last registration wins; the earlier entry is no longer reachable
    #[default]
    Overwrite,
    /// The second registration fails with [`Error::DuplicateName`]
    Reject,
}

/// Order in which `step()` visits trigger entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DispatchOrder {
    /// Ascending handler name
    #[default]
    Name,
    /// Order in which triggers were first declared
    Registration,
    /// Descending dependency count, as ranked at the last `start()`
    ///
    /// Equal counts keep name order. Handlers whose triggers were declared
    /// after that `start()` follow the ranked ones in name order.
    Priority,
}

/// Configuration for a component
///
/// # Example
///
/// ```
/// use cadence_core::{ComponentConfig, DispatchOrder, DuplicatePolicy};
///
/// // Legacy behaviour (default)
/// let config = ComponentConfig::default();
/// assert_eq!(config.duplicate_policy(), DuplicatePolicy::Overwrite);
/// assert_eq!(config.dispatch_order(), DispatchOrder::Name);
///
/// // Strict registration, most specific handlers first
/// let config = ComponentConfig::new()
///     .with_duplicate_policy(DuplicatePolicy::Reject)
///     .with_dispatch_order(DispatchOrder::Priority);
/// assert_eq!(config.dispatch_order(), DispatchOrder::Priority);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentConfig {
    /// Behaviour on duplicate names in every registry of the component
    duplicate_policy: DuplicatePolicy,
    /// Handler dispatch order used by `step()` and `ready_handler()`
    dispatch_order: DispatchOrder,
}

impl ComponentConfig {
    /// Create a configuration with legacy defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from RON
    ///
    /// Missing fields keep their defaults.
    ///
    /// ```
    /// use cadence_core::{ComponentConfig, DuplicatePolicy};
    ///
    /// let config = ComponentConfig::from_ron("(duplicate_policy: Reject)").unwrap();
    /// assert_eq!(config.duplicate_policy(), DuplicatePolicy::Reject);
    /// ```
    pub fn from_ron(source: &str) -> Result<Self> {
        ron::from_str(source).map_err(|e| Error::Config(e.to_string()))
    }

    /// Set the duplicate policy
    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    /// Set the dispatch order
    pub fn with_dispatch_order(mut self, order: DispatchOrder) -> Self {
        self.dispatch_order = order;
        self
    }

    /// Get the duplicate policy
    pub fn duplicate_policy(&self) -> DuplicatePolicy {
        self.duplicate_policy
    }

    /// Get the dispatch order
    pub fn dispatch_order(&self) -> DispatchOrder {
        self.dispatch_order
    }

    /// Change the dispatch order
    ///
    /// Takes effect on the next `step()`.
    pub fn set_dispatch_order(&mut self, order: DispatchOrder) {
        self.dispatch_order = order;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_legacy() {
        let config = ComponentConfig::default();
        assert_eq!(config.duplicate_policy(), DuplicatePolicy::Overwrite);
        assert_eq!(config.dispatch_order(), DispatchOrder::Name);
    }

    #[test]
    fn test_builder() {
        let config = ComponentConfig::new()
            .with_duplicate_policy(DuplicatePolicy::Reject)
            .with_dispatch_order(DispatchOrder::Priority);
        assert_eq!(config.duplicate_policy(), DuplicatePolicy::Reject);
        assert_eq!(config.dispatch_order(), DispatchOrder::Priority);
    }

    #[test]
    fn test_from_ron_partial() {
        let config = ComponentConfig::from_ron("(dispatch_order: Priority)").unwrap();
        assert_eq!(config.dispatch_order(), DispatchOrder::Priority);
        assert_eq!(config.duplicate_policy(), DuplicatePolicy::Overwrite);
    }

    #[test]
    fn test_from_ron_invalid() {
        let err = ComponentConfig::from_ron("(dispatch_order: Sideways)").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_ron_round_trip() {
        let config = ComponentConfig::new().with_duplicate_policy(DuplicatePolicy::Reject);
        let text = ron::to_string(&config).unwrap();
        assert_eq!(ComponentConfig::from_ron(&text).unwrap(), config);
    }
}
