//! State capability and per-event dispatch glue.
//!
//! A state is a behavior-only unit: it defines what happens when a machine
//! enters it, leaves it, or encounters an event while it is current. States
//! hold no data of their own. All per-run data belongs to the machine,
//! because the same state flyweight is shared by every machine instance
//! that enters that state.

use crate::core::event::Event;
use crate::core::machine::Machine;
use crate::core::registry::StateInstance;

/// Polymorphic behavior unit active on behalf of a machine instance.
///
/// Concrete states implement this for their machine type and override only
/// the hooks they care about; everything defaults to a no-op. The machine
/// is passed by reference into every hook, so state behavior mutates the
/// machine's owned data, never the state itself.
///
/// Implementors must not hold mutable fields. The flyweight for a state
/// type is shared across all machine instances, so any field would leak
/// between machines that are supposed to be independent. This is a contract
/// the engine relies on rather than checks; use unit structs.
///
/// # Example
///
/// ```rust
/// use flystate::State;
///
/// struct Heater {
///     target_celsius: f64,
/// }
///
/// #[derive(Default)]
/// struct Standby;
///
/// impl State<Heater> for Standby {
///     fn entry(&self, fsm: &mut Heater) {
///         fsm.target_celsius = 0.0;
///     }
/// }
/// ```
pub trait State<M>: Send + Sync {
    /// Invoked immediately after a transition makes this state current.
    ///
    /// Runs on every entry, including re-entry into the initial state
    /// during [`Machine::reset`]. Not invoked at machine construction.
    fn entry(&self, fsm: &mut M) {
        let _ = fsm;
    }

    /// Invoked immediately before a transition moves away from this state,
    /// including on [`Machine::reset`].
    fn exit(&self, fsm: &mut M) {
        let _ = fsm;
    }

    /// Short name used in history records and diagnostics.
    ///
    /// Defaults to the trailing segment of the concrete type name.
    fn name(&self) -> &'static str {
        let full = std::any::type_name::<Self>();
        full.rsplit("::").next().unwrap_or(full)
    }

    /// Transition helper for reactions.
    ///
    /// Runs the full transition protocol on `fsm`: `exit` on the current
    /// state, swap to the flyweight of `T`, `entry` on `T`. Reactions call
    /// this instead of reaching for the machine's wider interface.
    ///
    /// ```rust,ignore
    /// fn on_turn_off(&self, fsm: &mut Switch, _event: &TurnOff) {
    ///     self.transit::<Off>(fsm);
    /// }
    /// ```
    fn transit<T>(&self, fsm: &mut M)
    where
        Self: Sized,
        T: 'static,
        M: Machine,
        M::GenericState: StateInstance<T>,
    {
        fsm.transit::<T>();
    }
}

/// Per-event dispatch point for a machine's generic state.
///
/// [`Machine::react`] selects the `React` impl for the event's concrete
/// type at compile time; the impl then forwards through the generic-state
/// trait object, which selects the current state's reaction at runtime.
/// That pair is the double dispatch: static over events, dynamic over
/// states.
///
/// Implementations are generated by [`generic_state!`](crate::generic_state)
/// on the `dyn` generic-state trait, one per declared event type. An event
/// for which the current state provides no override lands in the generated
/// default reaction and is silently discarded.
pub trait React<M, E: Event> {
    /// Forwards `event` to the current state's reaction for `E`.
    fn react(&self, fsm: &mut M, event: &E);
}
