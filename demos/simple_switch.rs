//! Simple On-Off Switch
//!
//! Minimal example: two states, two events, transitions both ways and
//! reactions that deliberately do nothing.
//!
//! Run with: cargo run --example simple_switch

use std::io::{self, BufRead, Write};

use flystate::{generic_state, start, Construct, Event, Machine, MachineCore, State};

struct TurnOn;
impl Event for TurnOn {}

struct TurnOff;
impl Event for TurnOff {}

struct Switch {
    core: MachineCore<dyn SwitchState>,
}

generic_state! {
    /// Behavior shared by every switch state.
    trait SwitchState for Switch {
        on_turn_on: TurnOn,
        on_turn_off: TurnOff,
    }
}

#[derive(Default)]
struct On;

impl State<Switch> for On {}

impl SwitchState for On {
    fn on_turn_on(&self, _fsm: &mut Switch, _event: &TurnOn) {
        // a reaction doesn't require a state transition...
        println!("On: TurnOn: doing nothing");
    }

    fn on_turn_off(&self, fsm: &mut Switch, _event: &TurnOff) {
        // ...but when we want one, we request it from inside the reaction
        println!("On: TurnOff: switching off");
        self.transit::<Off>(fsm);
    }
}

#[derive(Default)]
struct Off;

impl State<Switch> for Off {}

impl SwitchState for Off {
    fn on_turn_on(&self, fsm: &mut Switch, _event: &TurnOn) {
        println!("Off: TurnOn: switching on");
        self.transit::<On>(fsm);
    }

    fn on_turn_off(&self, _fsm: &mut Switch, _event: &TurnOff) {
        println!("Off: TurnOff: doing nothing");
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
}

impl Construct<()> for Switch {
    fn construct(core: MachineCore<dyn SwitchState>, _args: ()) -> Self {
        Switch { core }
    }
}

fn main() {
    tracing_subscriber::fmt::init();

    let mut fsm: Switch = start::<Switch, Off, _>(());

    println!("Send events to the switch:");
    println!(" TurnOn:  1");
    println!(" TurnOff: 2");
    println!("Press r to reset and q to quit");

    let stdin = io::stdin();
    loop {
        print!("1 2 r q? ");
        io::stdout().flush().expect("flushing stdout");

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).expect("reading stdin") == 0 {
            break;
        }

        match line.trim() {
            "1" => fsm.react(TurnOn),
            "2" => fsm.react(TurnOff),
            "r" => fsm.reset(),
            "q" => break,
            _ => eprintln!("Wrong usage!"),
        }

        let state = if fsm.is_in::<On>() { "on" } else { "off" };
        println!("switch is {state}");
    }
}
