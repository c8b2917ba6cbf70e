//! Property capability

use std::rc::Rc;

/// A named configuration or state slot
///
/// Components index properties by name and never touch their values.
pub trait Property {
    /// Property name; used as the key by `register_named_property`
    fn name(&self) -> &str;

    /// Human-readable type of the stored value
    fn type_name(&self) -> &str;
}

/// Shared handle to a property, as held by its owner
pub type PropertyRef = Rc<dyn Property>;
