//! Core engine types.
//!
//! This module contains the whole machine engine:
//! - Event and state capabilities ([`Event`], [`State`], [`React`])
//! - The per-state-type flyweight registry ([`instance_of`],
//!   [`StateInstance`])
//! - The machine engine and factory ([`Machine`], [`MachineCore`],
//!   [`Construct`], [`start`])
//! - Transition history ([`StateHistory`], [`TransitionRecord`])
//!
//! States are stateless shared flyweights; machines own all mutable data.

mod event;
mod history;
mod machine;
mod registry;
mod state;

pub use event::Event;
pub use history::{StateHistory, TransitionRecord};
pub use machine::{start, Construct, Machine, MachineCore, MachineId};
pub use registry::{instance_of, StateInstance};
pub use state::{React, State};
