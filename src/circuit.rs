//! Ohm's Law relations between voltage, current, resistance and power.
//!
//! Divisors are expected to be strictly positive; the console reader
//! guarantees this before any of these functions are called.

/// V = I * R
pub fn voltage(current: f64, resistance: f64) -> f64 {
    current * resistance
}

/// I = V / R
pub fn current(voltage: f64, resistance: f64) -> f64 {
    voltage / resistance
}

/// R = V / I
pub fn resistance(voltage: f64, current: f64) -> f64 {
    voltage / current
}

/// P = V * I
pub fn power(voltage: f64, current: f64) -> f64 {
    voltage * current
}

/// The three ways of deriving power from a pair of known quantities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerFormula {
    /// P = V * I
    VoltageCurrent,
    /// P = I^2 * R
    CurrentResistance,
    /// P = V^2 / R
    VoltageResistance,
}

impl PowerFormula {
    pub const ALL: [PowerFormula; 3] = [
        PowerFormula::VoltageCurrent,
        PowerFormula::CurrentResistance,
        PowerFormula::VoltageResistance,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PowerFormula::VoltageCurrent => "P = V * I",
            PowerFormula::CurrentResistance => "P = I^2 * R",
            PowerFormula::VoltageResistance => "P = V^2 / R",
        }
    }

    /// Evaluates the formula. Operands are taken in the order they are asked
    /// for: (V, I), (I, R) or (V, R).
    pub fn evaluate(&self, first: f64, second: f64) -> f64 {
        match self {
            PowerFormula::VoltageCurrent => power(first, second),
            PowerFormula::CurrentResistance => (first * first) * second,
            PowerFormula::VoltageResistance => (first * first) / second,
        }
    }
}

impl TryFrom<i32> for PowerFormula {
    type Error = i32;

    fn try_from(choice: i32) -> Result<Self, Self::Error> {
        match choice {
            1 => Ok(PowerFormula::VoltageCurrent),
            2 => Ok(PowerFormula::CurrentResistance),
            3 => Ok(PowerFormula::VoltageResistance),
            other => Err(other),
        }
    }
}
