//! Multiple Independent Instances
//!
//! Two instances of the same switch machine, driven alternately. They
//! share the On/Off state flyweights but each keeps its own current
//! state, which is the point of the exercise.
//!
//! Run with: cargo run --example multiple_instances

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
    fn on_turn_off(&self, fsm: &mut Switch, _event: &TurnOff) {
        self.transit::<Off>(fsm);
    }
}

#[derive(Default)]
struct Off;

impl State<Switch> for Off {}

impl SwitchState for Off {
    fn on_turn_on(&self, fsm: &mut Switch, _event: &TurnOn) {
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
}

impl Construct<()> for Switch {
    fn construct(core: MachineCore<dyn SwitchState>, _args: ()) -> Self {
        Switch { core }
    }
}

fn print_state(fsm: &Switch, name: &str) {
    let state = if fsm.is_in::<On>() { "on" } else { "off" };
    println!("{name} is {state}");
}

/// Prompts for one command and applies it. Returns `true` on quit.
fn drive(fsm: &mut Switch, name: &str) -> bool {
    print!("{name}: 1 2 3 r q? ");
    io::stdout().flush().expect("flushing stdout");

    let mut line = String::new();
    if io::stdin()
        .lock()
        .read_line(&mut line)
        .expect("reading stdin")
        == 0
    {
        return true;
    }

    match line.trim() {
        "1" => fsm.react(TurnOn),
        "2" => fsm.react(TurnOff),
        "3" => {}
        "r" => fsm.reset(),
        "q" => return true,
        _ => eprintln!("Wrong usage!"),
    }
    false
}

fn main() {
    tracing_subscriber::fmt::init();

    // two instances of the same machine shape
    let mut fsm1: Switch = start::<Switch, Off, _>(());
    let mut fsm2: Switch = start::<Switch, On, _>(());

    println!("Send events to the switches:");
    println!(" TurnOn:   1");
    println!(" TurnOff:  2");
    println!(" no event: 3");
    println!("Press r to reset and q to quit");

    print_state(&fsm1, "switch1");
    print_state(&fsm2, "switch2");

    loop {
        if drive(&mut fsm1, "switch1") {
            return;
        }
        if drive(&mut fsm2, "switch2") {
            return;
        }
        print_state(&fsm1, "switch1");
        print_state(&fsm2, "switch2");
    }
}
