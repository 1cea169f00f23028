use thiserror::Error;

/// Failures raised while reading a value from the console.
///
/// Most variants are recoverable: the reader prints them and asks again.
/// `EndOfInput` and `Io` end the session.
#[derive(Debug, Error)]
pub enum InputError {
    // Same wording for every integer prompt, including the power sub-menu.
    #[error("Invalid input. Please enter an integer between 0 and 4.")]
    IntegerFormat,
    #[error("Invalid input. Please enter a number (e.g., 12.5).")]
    Format,
    #[error("Please enter an integer from {lo} to {hi}.")]
    OutOfRange { lo: i32, hi: i32 },
    #[error("Value must be > 0.")]
    NotPositive,
    #[error("Zero is not allowed here.")]
    ZeroNotAllowed,
    #[error("input stream closed while waiting for a value")]
    EndOfInput,
    #[error("console I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

impl InputError {
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, InputError::EndOfInput | InputError::Io(_))
    }
}
