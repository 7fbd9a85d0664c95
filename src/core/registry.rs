//! Per-state-type flyweight instances.
//!
//! Every concrete state type used anywhere in the program has exactly one
//! shared, stateless instance, lazily constructed on first access and alive
//! for the remainder of the process. All machine instances that enter a
//! given state reference that single instance.

use std::any::{Any, TypeId};

use dashmap::DashMap;
use once_cell::sync::Lazy;

/// Process-wide table of flyweights, keyed by the concrete state type.
static INSTANCES: Lazy<DashMap<TypeId, &'static (dyn Any + Send + Sync)>> =
    Lazy::new(DashMap::new);

/// Returns the shared flyweight instance for the concrete state type `T`.
///
/// The instance is default-constructed on first access and lives for the
/// remainder of the process. Two lookups for the same type always yield the
/// same instance, no matter how many machine instances or machine types
/// reference it. First construction is serialized per type; later lookups
/// take no lock on the value.
///
/// `T::default()` must be cheap and side-effect-free: it runs while the
/// registry shard for `T` is held, and the instance it produces is shared
/// by every machine that ever enters that state.
///
/// # Example
///
/// ```rust
/// use flystate::instance_of;
///
/// #[derive(Default)]
/// struct Idle;
///
/// let a = instance_of::<Idle>();
/// let b = instance_of::<Idle>();
/// assert!(std::ptr::eq(a, b));
/// ```
pub fn instance_of<T>() -> &'static T
where
    T: Default + Send + Sync + 'static,
{
    let shared: &'static (dyn Any + Send + Sync) = *INSTANCES
        .entry(TypeId::of::<T>())
        .or_insert_with(|| Box::leak(Box::<T>::default()));
    shared
        .downcast_ref::<T>()
        .expect("registry entries are keyed by their own TypeId")
}

/// Resolves a concrete state type to its flyweight, erased to the
/// generic-state form a machine stores.
///
/// Implemented on the `dyn` generic-state trait of each machine by
/// [`generic_state!`](crate::generic_state), once for all concrete states
/// of that machine. This is what lets the engine accept a state *type*
/// parameter in [`Machine::transit`](crate::Machine::transit) and
/// [`Machine::is_in`](crate::Machine::is_in) while storing an erased
/// reference.
pub trait StateInstance<T>: 'static {
    /// Reference to the flyweight for `T` in the erased generic-state form.
    fn instance() -> &'static Self;
}
