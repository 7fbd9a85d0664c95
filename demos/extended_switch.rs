//! Extended On-Off Switch
//!
//! The simple switch, extended with machine-owned data: events carry a
//! current, the machine tracks it, the off state forces it to zero on
//! entry, and reset restores the construction-time value.
//!
//! Run with: cargo run --example extended_switch

use std::io::{self, BufRead, Write};

use flystate::{generic_state, start, Construct, Event, Machine, MachineCore, State};

/// Request to close the circuit with a given current.
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

impl Switch {
    fn amps(&self) -> f64 {
        self.amps
    }

    fn set_amps(&mut self, amps: f64) {
        self.amps = amps;
    }
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
    fn on_turn_on(&self, fsm: &mut Switch, event: &TurnOn) {
        fsm.set_amps(event.amps);
    }

    fn on_turn_off(&self, fsm: &mut Switch, _event: &TurnOff) {
        self.transit::<Off>(fsm);
    }
}

/// Off leaves `TurnOff` to the generated default reaction, which discards
/// the event.
#[derive(Default)]
struct Off;

impl State<Switch> for Off {
    fn entry(&self, fsm: &mut Switch) {
        // no current through an open switch
        fsm.set_amps(0.0);
    }
}

impl SwitchState for Off {
    fn on_turn_on(&self, fsm: &mut Switch, event: &TurnOn) {
        fsm.set_amps(event.amps);
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
        Switch {
            core,
            amps,
            initial_amps: amps,
        }
    }
}

fn main() {
    tracing_subscriber::fmt::init();

    // start in On with some current
    let mut fsm: Switch = start::<Switch, On, _>(10.0);

    let print_state = |fsm: &Switch| {
        let state = if fsm.is_in::<On>() { "on" } else { "off" };
        println!("switch is {state}, current: {}", fsm.amps());
    };

    print_state(&fsm);

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
            "1" => {
                print!("Current? ");
                io::stdout().flush().expect("flushing stdout");
                let mut amps_line = String::new();
                stdin
                    .lock()
                    .read_line(&mut amps_line)
                    .expect("reading stdin");
                match amps_line.trim().parse::<f64>() {
                    Ok(amps) => fsm.react(TurnOn { amps }),
                    Err(_) => eprintln!("Wrong usage!"),
                }
            }
            "2" => fsm.react(TurnOff),
            "r" => fsm.reset(),
            "q" => break,
            _ => eprintln!("Wrong usage!"),
        }

        print_state(&fsm);
    }
}
