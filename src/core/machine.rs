//! Machine engine: per-instance data, event dispatch, transition, reset.

use std::any::TypeId;
use std::cell::Cell;
use std::fmt;

use serde::Serialize;
use uuid::Uuid;

use crate::core::event::Event;
use crate::core::history::{StateHistory, TransitionRecord};
use crate::core::registry::StateInstance;
use crate::core::state::{React, State};

/// Opaque identifier distinguishing machine instances in diagnostics.
///
/// Machines of the same concrete type share state flyweights, so the state
/// reference alone cannot tell two instances apart in a log stream; the id
/// can.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct MachineId(Uuid);

impl MachineId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// The raw UUID behind this id.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for MachineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Engine-owned data of one machine instance.
///
/// `S` is the machine's generic-state form, a `dyn` trait generated by
/// [`generic_state!`](crate::generic_state). The core holds the references
/// to the initial and current state flyweights, the instance id, the
/// transition history, and the dispatch flag backing the reentrancy
/// contract check. Concrete machines embed one `MachineCore` and add their
/// own fields next to it.
///
/// The core is `Send` but not `Sync`: an instance may move between threads,
/// but must be driven by one thread at a time.
pub struct MachineCore<S: ?Sized + 'static> {
    id: MachineId,
    initial: &'static S,
    initial_type: TypeId,
    current: &'static S,
    current_type: TypeId,
    history: StateHistory,
    dispatching: Cell<bool>,
}

impl<S: ?Sized + 'static> MachineCore<S> {
    /// Engine data bound to the flyweight of the initial state type `T`.
    ///
    /// Both the initial and the current reference point at
    /// `instance_of::<T>()`. No `entry` hook runs here; construction is
    /// not a transition.
    pub fn starting_in<T>() -> Self
    where
        T: 'static,
        S: StateInstance<T>,
    {
        let initial = S::instance();
        Self {
            id: MachineId::generate(),
            initial,
            initial_type: TypeId::of::<T>(),
            current: initial,
            current_type: TypeId::of::<T>(),
            history: StateHistory::new(),
            dispatching: Cell::new(false),
        }
    }

    /// This instance's diagnostic id.
    pub fn id(&self) -> MachineId {
        self.id
    }

    /// The currently active state flyweight.
    pub fn current(&self) -> &'static S {
        self.current
    }

    /// The flyweight of the state the machine was started in.
    pub fn initial(&self) -> &'static S {
        self.initial
    }

    /// Log of every transition and reset performed so far.
    pub fn history(&self) -> &StateHistory {
        &self.history
    }
}

impl<S: ?Sized + 'static> fmt::Debug for MachineCore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MachineCore")
            .field("id", &self.id)
            .field("transitions", &self.history.len())
            .finish_non_exhaustive()
    }
}

/// The machine engine.
///
/// A concrete machine is a struct that embeds a [`MachineCore`] and
/// implements this trait by pointing `GenericState` at its `dyn`
/// generic-state trait and exposing the core. Everything else (event
/// dispatch, the transition protocol, reset, state checks) comes as
/// provided methods.
///
/// Multiple instances of the same concrete machine are fully independent:
/// they reference the same state flyweights but never share mutable data.
///
/// # Example
///
/// ```rust
/// use flystate::{generic_state, start, Construct, Event, Machine, MachineCore, State};
///
/// struct Pulse;
/// impl Event for Pulse {}
///
/// struct Counter {
///     core: MachineCore<dyn CounterState>,
///     ticks: u32,
/// }
///
/// generic_state! {
///     trait CounterState for Counter {
///         on_pulse: Pulse,
///     }
/// }
///
/// #[derive(Default)]
/// struct Armed;
///
/// impl State<Counter> for Armed {}
///
/// impl CounterState for Armed {
///     fn on_pulse(&self, fsm: &mut Counter, _event: &Pulse) {
///         fsm.ticks += 1;
///         self.transit::<Fired>(fsm);
///     }
/// }
///
/// #[derive(Default)]
/// struct Fired;
///
/// impl State<Counter> for Fired {}
/// impl CounterState for Fired {}
///
/// impl Machine for Counter {
///     type GenericState = dyn CounterState;
///
///     fn core(&self) -> &MachineCore<dyn CounterState> {
///         &self.core
///     }
///
///     fn core_mut(&mut self) -> &mut MachineCore<dyn CounterState> {
///         &mut self.core
///     }
/// }
///
/// impl Construct<()> for Counter {
///     fn construct(core: MachineCore<dyn CounterState>, _args: ()) -> Self {
///         Counter { core, ticks: 0 }
///     }
/// }
///
/// let mut fsm: Counter = start::<Counter, Armed, _>(());
/// assert!(fsm.is_in::<Armed>());
///
/// fsm.react(Pulse);
/// assert!(fsm.is_in::<Fired>());
/// assert_eq!(fsm.ticks, 1);
/// ```
pub trait Machine: Sized {
    /// The machine's generic-state form: the `dyn` trait carrying one
    /// reaction per event type, generated by
    /// [`generic_state!`](crate::generic_state).
    type GenericState: ?Sized + State<Self> + 'static;

    /// The embedded engine data.
    fn core(&self) -> &MachineCore<Self::GenericState>;

    /// The embedded engine data, mutably.
    fn core_mut(&mut self) -> &mut MachineCore<Self::GenericState>;

    /// Hook invoked during [`reset`](Machine::reset), after the current
    /// state reference is back on the initial state and before the initial
    /// state's `entry` runs. Override it to restore machine-owned data to
    /// its construction-time snapshot. Default is a no-op.
    fn on_reset(&mut self) {}

    /// Dispatches `event` to the current state's reaction for its type.
    ///
    /// The reaction is selected twice: the `React` impl for the event's
    /// concrete type at compile time, the current state's override at
    /// runtime. A state without an override for this event type inherits
    /// the generated no-op, so the event is silently discarded.
    ///
    /// Reactions must not call `react` on the machine they are reacting
    /// for; with `debug_assertions` enabled the engine panics on such a
    /// reentrant dispatch.
    fn react<E: Event>(&mut self, event: E)
    where
        Self::GenericState: React<Self, E>,
    {
        let core = self.core();
        debug_assert!(
            !core.dispatching.get(),
            "reentrant react() on machine {}: reactions must not dispatch \
             events on the machine currently reacting",
            core.id
        );
        core.dispatching.set(true);
        tracing::trace!(
            machine = %core.id,
            state = core.current.name(),
            event = std::any::type_name::<E>(),
            "dispatching event"
        );
        let current = core.current;
        <Self::GenericState as React<Self, E>>::react(current, self, &event);
        self.core().dispatching.set(false);
    }

    /// Runs the transition protocol into state `T`: `exit` on the current
    /// state, swap of the current-state reference, `entry` on `T`.
    ///
    /// Transitions are meant to be requested from within a reaction (via
    /// [`State::transit`]), never from outside the machine. Transitioning
    /// into the state that is already current re-runs its `exit` and
    /// `entry` hooks.
    fn transit<T>(&mut self)
    where
        T: 'static,
        Self::GenericState: StateInstance<T>,
    {
        let target = <Self::GenericState as StateInstance<T>>::instance();
        let from = self.core().current;
        from.exit(self);
        let record = TransitionRecord::new(from.name(), target.name());
        tracing::debug!(
            machine = %self.core().id,
            from = record.from,
            to = record.to,
            "transition"
        );
        let core = self.core_mut();
        core.current = target;
        core.current_type = TypeId::of::<T>();
        core.history.record(record);
        target.entry(self);
    }

    /// Performs a full lifecycle re-entry into the initial state.
    ///
    /// Runs `exit` on the current state, puts the current-state reference
    /// back on the initial state, invokes [`on_reset`](Machine::on_reset),
    /// then runs the initial state's `entry`. State-specific setup reruns
    /// even when the machine already sits in its initial state.
    fn reset(&mut self) {
        let from = self.core().current;
        let initial = self.core().initial;
        let initial_type = self.core().initial_type;
        from.exit(self);
        let record = TransitionRecord::new(from.name(), initial.name());
        tracing::debug!(
            machine = %self.core().id,
            from = record.from,
            to = record.to,
            "reset"
        );
        let core = self.core_mut();
        core.current = initial;
        core.current_type = initial_type;
        core.history.record(record);
        self.on_reset();
        initial.entry(self);
    }

    /// Whether the machine currently sits in state `T`.
    ///
    /// O(1) and side-effect-free: the check compares the identity of the
    /// current state flyweight with `T`'s, not any state value.
    fn is_in<T>(&self) -> bool
    where
        T: 'static,
        Self::GenericState: StateInstance<T>,
    {
        self.core().current_type == TypeId::of::<T>()
    }
}

/// Construction seam between the engine and a concrete machine.
///
/// [`start`] builds the engine data and hands it to the concrete machine
/// together with whatever extra arguments the caller forwarded. Machines
/// taking several arguments accept them as a tuple; machines taking none
/// accept `()`.
pub trait Construct<Args>: Machine {
    /// Builds the concrete machine around its engine data.
    fn construct(core: MachineCore<Self::GenericState>, args: Args) -> Self;
}

/// Constructs a machine instance bound to the initial state type `T`.
///
/// The new machine's current and initial state both reference
/// `instance_of::<T>()`. The initial state's `entry` hook is **not**
/// invoked; only [`Machine::reset`] and transitions run lifecycle hooks.
///
/// ```rust,ignore
/// let mut fsm: Switch = start::<Switch, Off, _>(10.0);
/// assert!(fsm.is_in::<Off>());
/// ```
pub fn start<M, T, A>(args: A) -> M
where
    M: Construct<A>,
    T: 'static,
    M::GenericState: StateInstance<T>,
{
    let fsm = M::construct(MachineCore::starting_in::<T>(), args);
    tracing::debug!(
        machine = %fsm.core().id,
        initial = fsm.core().initial.name(),
        "machine started"
    );
    fsm
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generic_state;

    struct TurnOn {
        amps: f64,
    }
    impl Event for TurnOn {}

    struct TurnOff;
    impl Event for TurnOff {}

    struct Switch {
        core: MachineCore<dyn SwitchState>,
        amps: f64,
        initial_amps: f64,
    }

    generic_state! {
        trait SwitchState for Switch {
            on_turn_on: TurnOn,
            on_turn_off: TurnOff,
        }
    }

    #[derive(Default)]
    struct On;

    impl State<Switch> for On {}

    impl SwitchState for On {
        fn on_turn_on(&self, fsm: &mut Switch, event: &TurnOn) {
            fsm.amps = event.amps;
        }

        fn on_turn_off(&self, fsm: &mut Switch, _event: &TurnOff) {
            self.transit::<Off>(fsm);
        }
    }

    #[derive(Default)]
    struct Off;

    impl State<Switch> for Off {
        fn entry(&self, fsm: &mut Switch) {
            fsm.amps = 0.0;
        }
    }

    impl SwitchState for Off {
        fn on_turn_on(&self, fsm: &mut Switch, event: &TurnOn) {
            fsm.amps = event.amps;
            self.transit::<On>(fsm);
        }
    }

    impl Machine for Switch {
        type GenericState = dyn SwitchState;

        fn core(&self) -> &MachineCore<dyn SwitchState> {
            &self.core
        }

        fn core_mut(&mut self) -> &mut MachineCore<dyn SwitchState> {
            &mut self.core
        }

        fn on_reset(&mut self) {
            self.amps = self.initial_amps;
        }
    }

    impl Construct<f64> for Switch {
        fn construct(core: MachineCore<dyn SwitchState>, amps: f64) -> Self {
            Self {
                core,
                amps,
                initial_amps: amps,
            }
        }
    }

    #[test]
    fn start_binds_initial_state_without_running_entry() {
        let fsm: Switch = start::<Switch, Off, _>(5.0);

        assert!(fsm.is_in::<Off>());
        assert!(!fsm.is_in::<On>());
        // Off::entry would have zeroed this.
        assert_eq!(fsm.amps, 5.0);
        assert!(fsm.core().history().is_empty());
    }

    #[test]
    fn events_dispatch_to_the_current_state() {
        let mut fsm: Switch = start::<Switch, Off, _>(0.0);

        fsm.react(TurnOn { amps: 10.0 });

        assert!(fsm.is_in::<On>());
        assert_eq!(fsm.amps, 10.0);
    }

    #[test]
    fn unhandled_events_are_silently_discarded() {
        let mut fsm: Switch = start::<Switch, Off, _>(3.0);

        // Off declares no reaction to TurnOff.
        fsm.react(TurnOff);

        assert!(fsm.is_in::<Off>());
        assert_eq!(fsm.amps, 3.0);
        assert!(fsm.core().history().is_empty());
    }

    #[test]
    fn reaction_without_transition_stays_in_state() {
        let mut fsm: Switch = start::<Switch, On, _>(10.0);

        fsm.react(TurnOn { amps: 20.0 });

        assert!(fsm.is_in::<On>());
        assert_eq!(fsm.amps, 20.0);
        assert!(fsm.core().history().is_empty());
    }

    #[test]
    fn entry_of_the_target_state_runs_on_transition() {
        let mut fsm: Switch = start::<Switch, On, _>(10.0);

        fsm.react(TurnOff);

        assert!(fsm.is_in::<Off>());
        assert_eq!(fsm.amps, 0.0);
    }

    #[test]
    fn reset_restores_state_and_custom_data() {
        let mut fsm: Switch = start::<Switch, On, _>(10.0);

        fsm.react(TurnOff);
        assert_eq!(fsm.amps, 0.0);

        fsm.reset();

        assert!(fsm.is_in::<On>());
        assert_eq!(fsm.amps, 10.0);

        fsm.react(TurnOn { amps: 20.0 });
        assert!(fsm.is_in::<On>());
        assert_eq!(fsm.amps, 20.0);
    }

    #[test]
    fn transit_into_current_state_reruns_lifecycle() {
        let mut fsm: Switch = start::<Switch, Off, _>(5.0);
        assert_eq!(fsm.amps, 5.0);

        fsm.transit::<Off>();

        assert!(fsm.is_in::<Off>());
        assert_eq!(fsm.amps, 0.0);
        assert_eq!(fsm.core().history().len(), 1);
    }

    #[test]
    fn instances_do_not_observe_each_other() {
        let mut fsm1: Switch = start::<Switch, Off, _>(0.0);
        let mut fsm2: Switch = start::<Switch, On, _>(7.0);

        fsm1.react(TurnOn { amps: 3.0 });

        assert!(fsm1.is_in::<On>());
        assert_eq!(fsm1.amps, 3.0);
        assert!(fsm2.is_in::<On>());
        assert_eq!(fsm2.amps, 7.0);

        fsm2.react(TurnOff);

        assert!(fsm1.is_in::<On>());
        assert_eq!(fsm1.amps, 3.0);
        assert!(fsm2.is_in::<Off>());
        assert_eq!(fsm2.amps, 0.0);
    }

    #[test]
    fn instances_share_state_flyweights() {
        let fsm1: Switch = start::<Switch, Off, _>(0.0);
        let fsm2: Switch = start::<Switch, Off, _>(1.0);

        let a: *const dyn SwitchState = fsm1.core().current();
        let b: *const dyn SwitchState = fsm2.core().current();
        assert!(std::ptr::addr_eq(a, b));
    }

    #[test]
    fn ids_distinguish_instances() {
        let fsm1: Switch = start::<Switch, Off, _>(0.0);
        let fsm2: Switch = start::<Switch, Off, _>(0.0);

        assert_ne!(fsm1.core().id(), fsm2.core().id());
    }

    #[test]
    fn history_logs_transitions_and_resets() {
        let mut fsm: Switch = start::<Switch, Off, _>(0.0);

        fsm.react(TurnOn { amps: 1.0 });
        fsm.react(TurnOff);
        assert_eq!(
            fsm.core().history().get_path(),
            vec!["Off", "On", "Off"]
        );

        fsm.reset();
        assert_eq!(fsm.core().history().len(), 3);
    }

    mod lifecycle_order {
        use super::*;

        struct Step;
        impl Event for Step {}

        struct Tracer {
            core: MachineCore<dyn TracerState>,
            log: Vec<&'static str>,
        }

        generic_state! {
            trait TracerState for Tracer {
                on_step: Step,
            }
        }

        #[derive(Default)]
        struct First;

        impl State<Tracer> for First {
            fn entry(&self, fsm: &mut Tracer) {
                fsm.log.push("First.entry");
            }

            fn exit(&self, fsm: &mut Tracer) {
                fsm.log.push("First.exit");
            }
        }

        impl TracerState for First {
            fn on_step(&self, fsm: &mut Tracer, _event: &Step) {
                fsm.log.push("First.react");
                self.transit::<Second>(fsm);
            }
        }

        #[derive(Default)]
        struct Second;

        impl State<Tracer> for Second {
            fn entry(&self, fsm: &mut Tracer) {
                fsm.log.push("Second.entry");
            }

            fn exit(&self, fsm: &mut Tracer) {
                fsm.log.push("Second.exit");
            }
        }

        impl TracerState for Second {
            fn on_step(&self, fsm: &mut Tracer, _event: &Step) {
                // Contract violation on purpose: dispatch while dispatching.
                fsm.react(Step);
            }
        }

        impl Machine for Tracer {
            type GenericState = dyn TracerState;

            fn core(&self) -> &MachineCore<dyn TracerState> {
                &self.core
            }

            fn core_mut(&mut self) -> &mut MachineCore<dyn TracerState> {
                &mut self.core
            }
        }

        impl Construct<()> for Tracer {
            fn construct(core: MachineCore<dyn TracerState>, _args: ()) -> Self {
                Self {
                    core,
                    log: Vec::new(),
                }
            }
        }

        #[test]
        fn no_hook_runs_at_start() {
            let fsm: Tracer = start::<Tracer, First, _>(());
            assert!(fsm.log.is_empty());
        }

        #[test]
        fn transition_runs_exit_then_entry_exactly_once() {
            let mut fsm: Tracer = start::<Tracer, First, _>(());

            fsm.react(Step);

            assert_eq!(fsm.log, vec!["First.react", "First.exit", "Second.entry"]);
        }

        #[test]
        fn reset_runs_exit_and_initial_entry() {
            let mut fsm: Tracer = start::<Tracer, First, _>(());
            fsm.react(Step);
            fsm.log.clear();

            fsm.reset();

            assert_eq!(fsm.log, vec!["Second.exit", "First.entry"]);
        }

        #[test]
        #[should_panic(expected = "reentrant react()")]
        fn reentrant_dispatch_is_a_contract_violation() {
            let mut fsm: Tracer = start::<Tracer, Second, _>(());
            fsm.react(Step);
        }
    }
}
