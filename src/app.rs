use crate::circuit::{self, PowerFormula};
use crate::error::InputError;
use crate::format::FixedFormat;
use crate::input::{Console, DoubleRule};
use std::io::{BufRead, Write};
use tracing::{debug, info};

const RULE: &str = "------------------------------------------------------------";

const PROMPT_CURRENT: &str = "Enter current I (amps, > 0): ";
const PROMPT_RESISTANCE: &str = "Enter resistance R (ohms, > 0): ";
const PROMPT_VOLTAGE: &str = "Enter voltage V (volts, > 0): ";

// Top-level menu entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Quit,
    Voltage,
    Current,
    Resistance,
    Power,
}

impl TryFrom<i32> for MenuChoice {
    type Error = i32;

    fn try_from(choice: i32) -> Result<Self, Self::Error> {
        match choice {
            0 => Ok(MenuChoice::Quit),
            1 => Ok(MenuChoice::Voltage),
            2 => Ok(MenuChoice::Current),
            3 => Ok(MenuChoice::Resistance),
            4 => Ok(MenuChoice::Power),
            other => Err(other),
        }
    }
}

pub struct App<R, W> {
    console: Console<R, W>,
    format: FixedFormat,
}

impl<R: BufRead, W: Write> App<R, W> {
    pub fn new(console: Console<R, W>, format: FixedFormat) -> Self {
        Self { console, format }
    }

    pub fn into_writer(self) -> W {
        self.console.into_writer()
    }

    /// Runs the menu until the user quits. Fails only when the console does.
    pub fn run(&mut self) -> Result<(), InputError> {
        loop {
            self.print_menu()?;
            let choice: MenuChoice = self.console.read_choice("Enter choice: ", 0, 4)?;
            debug!(?choice, "menu selection");

            match choice {
                MenuChoice::Quit => {
                    self.console.say("Goodbye!")?;
                    info!("session ended by user");
                    return Ok(());
                }
                MenuChoice::Voltage => self.compute_voltage()?,
                MenuChoice::Current => self.compute_current()?,
                MenuChoice::Resistance => self.compute_resistance()?,
                MenuChoice::Power => self.compute_power()?,
            }
        }
    }

    fn print_menu(&mut self) -> Result<(), InputError> {
        for line in [
            RULE,
            "Ohm's Law & Circuit Calculator",
            "Choose an option:",
            "  1) Calculate Voltage (V = I * R)",
            "  2) Calculate Current (I = V / R)",
            "  3) Calculate Resistance (R = V / I)",
            "  4) Calculate Power (choose formula)",
            "  0) Quit program",
        ] {
            self.console.say(line)?;
        }
        Ok(())
    }

    fn header(&mut self, title: &str) -> Result<(), InputError> {
        self.console.say(RULE)?;
        self.console.say(title)
    }

    fn positive(&mut self, prompt: &str) -> Result<f64, InputError> {
        self.console.read_double(prompt, DoubleRule::default())
    }

    fn report(&mut self, label: &str, value: f64, unit: &str) -> Result<(), InputError> {
        let line = format!("{} = {} {}", label, self.format.render(value), unit);
        self.console.say(&line)
    }

    pub fn compute_voltage(&mut self) -> Result<(), InputError> {
        self.header("Compute Voltage (V = I * R)")?;
        let i = self.positive(PROMPT_CURRENT)?;
        let r = self.positive(PROMPT_RESISTANCE)?;
        let v = circuit::voltage(i, r);
        let p = circuit::power(v, i);
        debug!(i, r, v, p, "computed voltage");
        self.report("Voltage V", v, "V")?;
        self.report("Power   P", p, "W")
    }

    pub fn compute_current(&mut self) -> Result<(), InputError> {
        self.header("Compute Current (I = V / R)")?;
        let v = self.positive(PROMPT_VOLTAGE)?;
        let r = self.positive(PROMPT_RESISTANCE)?;
        let i = circuit::current(v, r);
        let p = circuit::power(v, i);
        debug!(v, r, i, p, "computed current");
        self.report("Current I", i, "A")?;
        self.report("Power   P", p, "W")
    }

    pub fn compute_resistance(&mut self) -> Result<(), InputError> {
        self.header("Compute Resistance (R = V / I)")?;
        let v = self.positive(PROMPT_VOLTAGE)?;
        let i = self.positive(PROMPT_CURRENT)?;
        let r = circuit::resistance(v, i);
        let p = circuit::power(v, i);
        debug!(v, i, r, p, "computed resistance");
        self.report("Resistance R", r, "ohms")?;
        self.report("Power     P", p, "W")
    }

    pub fn compute_power(&mut self) -> Result<(), InputError> {
        self.header("Compute Power P")?;
        self.console.say("Choose method:")?;
        for (n, formula) in PowerFormula::ALL.iter().enumerate() {
            let line = format!("  {}) {}", n + 1, formula.label());
            self.console.say(&line)?;
        }
        let formula: PowerFormula = self.console.read_choice("Enter choice (1-3): ", 1, 3)?;

        let (first, second) = match formula {
            PowerFormula::VoltageCurrent => (PROMPT_VOLTAGE, PROMPT_CURRENT),
            PowerFormula::CurrentResistance => (PROMPT_CURRENT, PROMPT_RESISTANCE),
            PowerFormula::VoltageResistance => (PROMPT_VOLTAGE, PROMPT_RESISTANCE),
        };
        let a = self.positive(first)?;
        let b = self.positive(second)?;
        let p = formula.evaluate(a, b);
        debug!(?formula, a, b, p, "computed power");
        self.report("Power P", p, "W")
    }
}
