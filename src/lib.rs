//! Flystate: a flyweight finite state machine library
//!
//! Flystate targets embedded and other latency-sensitive systems where
//! dynamic allocation and dispatch overhead must stay minimal. States and
//! events are distinct types; reactions attach at the type level; and any
//! number of independent machine instances of the same shape can run side
//! by side, sharing stateless state flyweights but never mutable data.
//!
//! # Core Concepts
//!
//! - **Event**: a typed value submitted to a machine, marked by the
//!   [`Event`] trait
//! - **State**: a stateless behavior unit implementing [`State`], shared
//!   as a process-lifetime flyweight across all machine instances
//! - **Machine**: the stateful unit implementing [`Machine`], owning the
//!   current/initial state references and any user-defined instance data
//! - **Generic state**: the per-machine trait declared with
//!   [`generic_state!`], carrying one overridable reaction per event type
//!
//! Events dispatch twice: the reaction for an event's concrete type is
//! selected at compile time, the reaction of the current state at runtime.
//! Events no state cares about are silently discarded. Construction never
//! runs `entry`; only transitions and [`Machine::reset`] do.
//!
//! # Example
//!
//! ```rust
//! use flystate::{generic_state, start, Construct, Event, Machine, MachineCore, State};
//!
//! struct TurnOn;
//! impl Event for TurnOn {}
//!
//! struct TurnOff;
//! impl Event for TurnOff {}
//!
//! struct Switch {
//!     core: MachineCore<dyn SwitchState>,
//! }
//!
//! generic_state! {
//!     /// Behavior shared by every switch state.
//!     trait SwitchState for Switch {
//!         on_turn_on: TurnOn,
//!         on_turn_off: TurnOff,
//!     }
//! }
//!
//! #[derive(Default)]
//! struct On;
//!
//! impl State<Switch> for On {}
//!
//! impl SwitchState for On {
//!     fn on_turn_off(&self, fsm: &mut Switch, _event: &TurnOff) {
//!         self.transit::<Off>(fsm);
//!     }
//! }
//!
//! #[derive(Default)]
//! struct Off;
//!
//! impl State<Switch> for Off {}
//!
//! impl SwitchState for Off {
//!     fn on_turn_on(&self, fsm: &mut Switch, _event: &TurnOn) {
//!         self.transit::<On>(fsm);
//!     }
//! }
//!
//! impl Machine for Switch {
//!     type GenericState = dyn SwitchState;
//!
//!     fn core(&self) -> &MachineCore<dyn SwitchState> {
//!         &self.core
//!     }
//!
//!     fn core_mut(&mut self) -> &mut MachineCore<dyn SwitchState> {
//!         &mut self.core
//!     }
//! }
//!
//! impl Construct<()> for Switch {
//!     fn construct(core: MachineCore<dyn SwitchState>, _args: ()) -> Self {
//!         Switch { core }
//!     }
//! }
//!
//! let mut fsm: Switch = start::<Switch, Off, _>(());
//! assert!(fsm.is_in::<Off>());
//!
//! fsm.react(TurnOn);
//! assert!(fsm.is_in::<On>());
//!
//! fsm.react(TurnOn); // On has no TurnOn reaction: silently discarded
//! assert!(fsm.is_in::<On>());
//!
//! fsm.reset();
//! assert!(fsm.is_in::<Off>());
//! ```

pub mod core;
mod macros;

// Re-export commonly used types
pub use crate::core::{
    instance_of, start, Construct, Event, Machine, MachineCore, MachineId, React, State,
    StateHistory, StateInstance, TransitionRecord,
};
