use crate::error::InputError;
use std::io::{BufRead, Write};
use tracing::{debug, trace};

pub const DEFAULT_ZERO_EPSILON: f64 = 1e-15;

/// Acceptance rule for floating point input.
///
/// `allow_zero` is only consulted when `require_positive` is false.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoubleRule {
    pub require_positive: bool,
    pub allow_zero: bool,
}

impl Default for DoubleRule {
    fn default() -> Self {
        Self {
            require_positive: true,
            allow_zero: false,
        }
    }
}

impl DoubleRule {
    /// Accepts negative values; zero only when `allow_zero` is set.
    #[allow(dead_code)]
    pub fn signed(allow_zero: bool) -> Self {
        Self {
            require_positive: false,
            allow_zero,
        }
    }

    pub fn check(&self, value: f64, epsilon: f64) -> Result<f64, InputError> {
        if value > 0.0 {
            return Ok(value);
        }
        if self.require_positive {
            return Err(InputError::NotPositive);
        }
        if value.abs() < epsilon {
            return if self.allow_zero {
                Ok(0.0)
            } else {
                Err(InputError::ZeroNotAllowed)
            };
        }
        Ok(value)
    }
}

/// Line-oriented prompt/response channel over any reader and writer.
///
/// Each read consumes exactly one line that holds a token: blank lines are
/// skipped, and whatever follows the first token is discarded.
pub struct Console<R, W> {
    reader: R,
    writer: W,
    zero_epsilon: f64,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            zero_epsilon: DEFAULT_ZERO_EPSILON,
        }
    }

    pub fn with_zero_epsilon(mut self, epsilon: f64) -> Self {
        self.zero_epsilon = epsilon;
        self
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    pub fn say(&mut self, line: &str) -> Result<(), InputError> {
        writeln!(self.writer, "{}", line)?;
        Ok(())
    }

    /// Reads an integer in `[lo, hi]`, asking again until one arrives.
    pub fn read_int_in_range(&mut self, prompt: &str, lo: i32, hi: i32) -> Result<i32, InputError> {
        loop {
            self.prompt(prompt)?;
            let token = self.next_token()?;
            let attempt = parse_int_prefix(&token)
                .ok_or(InputError::IntegerFormat)
                .and_then(|x| {
                    if (lo..=hi).contains(&x) {
                        Ok(x)
                    } else {
                        Err(InputError::OutOfRange { lo, hi })
                    }
                });
            match attempt {
                Ok(x) => return Ok(x),
                Err(e) => self.reject(&token, e)?,
            }
        }
    }

    /// Reads a menu selection in `[lo, hi]`. Numbers in range that `T` has no
    /// entry for are refused like out-of-range ones.
    pub fn read_choice<T: TryFrom<i32>>(&mut self, prompt: &str, lo: i32, hi: i32) -> Result<T, InputError> {
        loop {
            let raw = self.read_int_in_range(prompt, lo, hi)?;
            match T::try_from(raw) {
                Ok(choice) => return Ok(choice),
                Err(_) => self.reject(&raw.to_string(), InputError::OutOfRange { lo, hi })?,
            }
        }
    }

    /// Reads a double accepted by `rule`, asking again until one arrives.
    pub fn read_double(&mut self, prompt: &str, rule: DoubleRule) -> Result<f64, InputError> {
        loop {
            self.prompt(prompt)?;
            let token = self.next_token()?;
            let attempt = parse_double_prefix(&token)
                .ok_or(InputError::Format)
                .and_then(|x| rule.check(x, self.zero_epsilon));
            match attempt {
                Ok(x) => return Ok(x),
                Err(e) => self.reject(&token, e)?,
            }
        }
    }

    fn prompt(&mut self, prompt: &str) -> Result<(), InputError> {
        write!(self.writer, "{}", prompt)?;
        self.writer.flush()?;
        Ok(())
    }

    fn reject(&mut self, token: &str, err: InputError) -> Result<(), InputError> {
        if !err.is_recoverable() {
            return Err(err);
        }
        debug!(token, reason = %err, "rejected console input");
        self.say(&err.to_string())
    }

    /// Returns the first token of the next non-blank line. The rest of that
    /// line is dropped.
    ///
    /// Bytes that are not UTF-8 are replaced rather than refused, so such a
    /// line ends up as an ordinary format error.
    fn next_token(&mut self) -> Result<String, InputError> {
        let mut raw = Vec::new();
        loop {
            raw.clear();
            if self.reader.read_until(b'\n', &mut raw)? == 0 {
                return Err(InputError::EndOfInput);
            }
            let line = String::from_utf8_lossy(&raw);
            if let Some(token) = line.split_whitespace().next() {
                trace!(token, "read token");
                return Ok(token.to_string());
            }
        }
    }
}

/// Longest leading `[+-]?digits` of `token` as an `i32`.
pub fn parse_int_prefix(token: &str) -> Option<i32> {
    let bytes = token.as_bytes();
    let mut end = sign_len(bytes);
    let digits = count_digits(&bytes[end..]);
    if digits == 0 {
        return None;
    }
    end += digits;
    token[..end].parse().ok()
}

/// Longest leading decimal floating point literal of `token`.
///
/// Accepts `[+-]?(digits[.digits]?|.digits)([eE][+-]?digits)?`. An exponent
/// marker without digits after it makes the whole token invalid, as does a
/// value that overflows to infinity.
pub fn parse_double_prefix(token: &str) -> Option<f64> {
    let bytes = token.as_bytes();
    let mut end = sign_len(bytes);

    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;
    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        exp_end += sign_len(&bytes[exp_end..]);
        let exp_digits = count_digits(&bytes[exp_end..]);
        if exp_digits == 0 {
            return None;
        }
        end = exp_end + exp_digits;
    }

    token[..end].parse::<f64>().ok().filter(|x| x.is_finite())
}

fn sign_len(bytes: &[u8]) -> usize {
    usize::from(matches!(bytes.first(), Some(b'+' | b'-')))
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Cursor;

    fn console(input: &str) -> Console<Cursor<Vec<u8>>, Vec<u8>> {
        Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn output(console: Console<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(console.into_writer()).expect("utf8 output")
    }

    #[rstest]
    #[case("42", Some(42))]
    #[case("-7", Some(-7))]
    #[case("+3", Some(3))]
    #[case("5abc", Some(5))]
    #[case("3.9", Some(3))]
    #[case("abc", None)]
    #[case("-", None)]
    #[case("+x", None)]
    #[case("99999999999", None)]
    fn test_parse_int_prefix(#[case] token: &str, #[case] expected: Option<i32>) {
        assert_eq!(parse_int_prefix(token), expected);
    }

    #[rstest]
    #[case("12.5", Some(12.5))]
    #[case("3", Some(3.0))]
    #[case(".5", Some(0.5))]
    #[case("5.", Some(5.0))]
    #[case("-2.25", Some(-2.25))]
    #[case("1e3", Some(1000.0))]
    #[case("2.5E-1", Some(0.25))]
    #[case("4e", None)]
    #[case("4e+", None)]
    #[case("4Ex", None)]
    #[case("7volts", Some(7.0))]
    #[case("1.2.3", Some(1.2))]
    #[case(".", None)]
    #[case("abc", None)]
    #[case("e5", None)]
    #[case("inf", None)]
    #[case("1e400", None)]
    fn test_parse_double_prefix(#[case] token: &str, #[case] expected: Option<f64>) {
        assert_eq!(parse_double_prefix(token), expected);
    }

    #[test]
    fn test_positive_rule() {
        let rule = DoubleRule::default();
        assert_eq!(rule.check(2.0, DEFAULT_ZERO_EPSILON).ok(), Some(2.0));
        assert!(matches!(
            rule.check(0.0, DEFAULT_ZERO_EPSILON),
            Err(InputError::NotPositive)
        ));
        assert!(matches!(
            rule.check(-1.0, DEFAULT_ZERO_EPSILON),
            Err(InputError::NotPositive)
        ));
    }

    #[test]
    fn test_signed_rule() {
        let no_zero = DoubleRule::signed(false);
        assert_eq!(no_zero.check(-3.0, DEFAULT_ZERO_EPSILON).ok(), Some(-3.0));
        assert!(matches!(
            no_zero.check(0.0, DEFAULT_ZERO_EPSILON),
            Err(InputError::ZeroNotAllowed)
        ));

        let zero_ok = DoubleRule::signed(true);
        assert_eq!(zero_ok.check(-1e-16, DEFAULT_ZERO_EPSILON).ok(), Some(0.0));
        assert_eq!(zero_ok.check(1.5, DEFAULT_ZERO_EPSILON).ok(), Some(1.5));
    }

    #[test]
    fn test_int_reader_reprompts_until_in_range() {
        let mut c = console("9\nabc\n2\n");
        let value = c.read_int_in_range("Enter choice: ", 0, 4).unwrap();
        assert_eq!(value, 2);
        assert_eq!(
            output(c),
            "Enter choice: Please enter an integer from 0 to 4.\n\
             Enter choice: Invalid input. Please enter an integer between 0 and 4.\n\
             Enter choice: "
        );
    }

    #[test]
    fn test_int_reader_drops_trailing_tokens() {
        let mut c = console("1 3 extra\n4\n");
        assert_eq!(c.read_int_in_range("> ", 0, 4).unwrap(), 1);
        assert_eq!(c.read_int_in_range("> ", 0, 4).unwrap(), 4);
    }

    #[test]
    fn test_out_of_range_line_is_discarded() {
        let mut c = console("7 2\n3\n");
        assert_eq!(c.read_int_in_range("> ", 0, 4).unwrap(), 3);
    }

    #[test]
    fn test_blank_lines_do_not_reprompt() {
        let mut c = console("\n   \n\t\n2\n");
        assert_eq!(c.read_int_in_range("> ", 0, 4).unwrap(), 2);
        assert_eq!(output(c), "> ");
    }

    #[test]
    fn test_double_reader_messages() {
        let mut c = console("volts\n0\n-4\n2.5 ohms\n");
        let value = c.read_double("V: ", DoubleRule::default()).unwrap();
        assert_eq!(value, 2.5);
        assert_eq!(
            output(c),
            "V: Invalid input. Please enter a number (e.g., 12.5).\n\
             V: Value must be > 0.\n\
             V: Value must be > 0.\n\
             V: "
        );
    }

    #[test]
    fn test_double_reader_signed_zero_rejected() {
        let mut c = console("0\n-2\n");
        let value = c.read_double("x: ", DoubleRule::signed(false)).unwrap();
        assert_eq!(value, -2.0);
        assert_eq!(output(c), "x: Zero is not allowed here.\nx: ");
    }

    #[test]
    fn test_custom_epsilon() {
        let mut c = console("0.001\n").with_zero_epsilon(0.01);
        let value = c.read_double("x: ", DoubleRule::signed(true)).unwrap();
        assert_eq!(value, 0.001);

        let mut c = console("-0.001\n").with_zero_epsilon(0.01);
        let value = c.read_double("x: ", DoubleRule::signed(true)).unwrap();
        assert_eq!(value, 0.0);
    }

    #[test]
    fn test_end_of_input_is_fatal() {
        let mut c = console("abc\n");
        let err = c.read_double("x: ", DoubleRule::default()).unwrap_err();
        assert!(matches!(err, InputError::EndOfInput));

        let mut c = console("");
        let err = c.read_int_in_range("> ", 0, 4).unwrap_err();
        assert!(matches!(err, InputError::EndOfInput));
    }

    #[test]
    fn test_non_utf8_line_is_a_format_error() {
        let mut c = Console::new(Cursor::new(b"\xff\xfe\n3\n".to_vec()), Vec::new());
        assert_eq!(c.read_int_in_range("> ", 0, 4).unwrap(), 3);
        assert_eq!(
            output(c),
            "> Invalid input. Please enter an integer between 0 and 4.\n> "
        );

        let mut c = Console::new(Cursor::new(b"\xc3(\n2.5\n".to_vec()), Vec::new());
        assert_eq!(c.read_double("V: ", DoubleRule::default()).unwrap(), 2.5);
    }

    #[test]
    fn test_dangling_exponent_reprompts() {
        let mut c = console("4e\n4e2\n");
        assert_eq!(c.read_double("V: ", DoubleRule::default()).unwrap(), 400.0);
        assert_eq!(
            output(c),
            "V: Invalid input. Please enter a number (e.g., 12.5).\nV: "
        );
    }

    #[test]
    fn test_sub_menu_parse_error_keeps_fixed_wording() {
        let mut c = console("x\n2\n");
        assert_eq!(c.read_int_in_range("Enter choice (1-3): ", 1, 3).unwrap(), 2);
        assert!(output(c).contains("Invalid input. Please enter an integer between 0 and 4.\n"));
    }

    #[derive(Debug, PartialEq)]
    enum Gap {
        One,
        Three,
    }

    impl TryFrom<i32> for Gap {
        type Error = i32;

        fn try_from(n: i32) -> Result<Self, Self::Error> {
            match n {
                1 => Ok(Gap::One),
                3 => Ok(Gap::Three),
                other => Err(other),
            }
        }
    }

    #[test]
    fn test_read_choice_refuses_unmapped_numbers() {
        let mut c = console("2\n3\n1\n");
        assert_eq!(c.read_choice::<Gap>("> ", 1, 3).unwrap(), Gap::Three);
        assert_eq!(c.read_choice::<Gap>("> ", 1, 3).unwrap(), Gap::One);
        assert_eq!(output(c), "> Please enter an integer from 1 to 3.\n> > ");
    }

    #[test]
    fn test_final_line_without_newline() {
        let mut c = console("3");
        assert_eq!(c.read_int_in_range("> ", 0, 4).unwrap(), 3);
    }
}
