//! Macros for declaring a machine's generic state.

/// Declares the generic-state trait of a machine: one reaction per event
/// type, each defaulting to a silent no-op.
///
/// Besides the trait itself, the macro generates the dispatch glue that
/// routes [`Machine::react`](crate::Machine::react) calls to the named
/// reaction for each event type, and the flyweight resolution that lets
/// `transit`/`is_in` take concrete state types. Concrete states implement
/// the generated trait and override only the reactions they care about.
///
/// # Example
///
/// ```rust
/// use flystate::{generic_state, Event, MachineCore};
///
/// struct TurnOn;
/// impl Event for TurnOn {}
///
/// struct TurnOff;
/// impl Event for TurnOff {}
///
/// struct Switch {
///     core: MachineCore<dyn SwitchState>,
/// }
///
/// generic_state! {
///     /// Behavior shared by every switch state.
///     pub trait SwitchState for Switch {
///         /// Reaction to [`TurnOn`].
///         on_turn_on: TurnOn,
///         /// Reaction to [`TurnOff`].
///         on_turn_off: TurnOff,
///     }
/// }
/// ```
#[macro_export]
macro_rules! generic_state {
    (
        $(#[$trait_meta:meta])*
        $vis:vis trait $name:ident for $machine:ty {
            $(
                $(#[$react_meta:meta])*
                $method:ident: $event:ty
            ),* $(,)?
        }
    ) => {
        $(#[$trait_meta])*
        $vis trait $name: $crate::State<$machine> {
            $(
                $(#[$react_meta])*
                fn $method(&self, fsm: &mut $machine, event: &$event) {
                    let _ = (fsm, event);
                }
            )*
        }

        $(
            impl $crate::React<$machine, $event> for dyn $name {
                fn react(&self, fsm: &mut $machine, event: &$event) {
                    self.$method(fsm, event);
                }
            }
        )*

        impl<S> $crate::StateInstance<S> for dyn $name
        where
            S: $name + ::core::default::Default + 'static,
        {
            fn instance() -> &'static Self {
                $crate::instance_of::<S>()
            }
        }
    };
}
