//! Operand parsing.
//!
//! Operands are base-10 signed integer literals:
//!
//! ```text
//! operand := [ '+' | '-' ] digit { digit } [ '\n' ]
//! ```
//!
//! A single trailing newline is tolerated because shell clients
//! (`echo 12 > first`) append one. Anything else outside the grammar,
//! including leading or inner whitespace, is rejected.

use calcdev_core::ParseError;

/// Parse an operand buffer's logical content into an `i64`.
///
/// # Errors
///
/// Returns a [`ParseError`] if:
/// - The input is empty (or only a newline)
/// - The input is a bare sign with no digits
/// - The input contains a character outside the grammar
/// - The value does not fit in an `i64`
///
/// # Examples
///
/// ```
/// use calcdev_engine::parse_operand;
/// use calcdev_core::ParseError;
///
/// assert_eq!(parse_operand(b"-42\n"), Ok(-42));
/// assert_eq!(parse_operand(b"+7"), Ok(7));
/// assert_eq!(parse_operand(b""), Err(ParseError::Empty));
/// assert!(parse_operand(b"4 2").is_err());
/// ```
pub fn parse_operand(text: &[u8]) -> Result<i64, ParseError> {
    let body = text.strip_suffix(b"\n").unwrap_or(text);
    if body.is_empty() {
        return Err(ParseError::Empty);
    }

    let digits_start = usize::from(matches!(body[0], b'+' | b'-'));
    let digits = &body[digits_start..];
    if digits.is_empty() {
        return Err(ParseError::NoDigits);
    }

    if let Some(offset) = digits.iter().position(|b| !b.is_ascii_digit()) {
        return Err(ParseError::InvalidCharacter {
            position: digits_start + offset,
            byte: digits[offset],
        });
    }

    // Validated as ASCII sign + digits above
    let literal = std::str::from_utf8(body).map_err(|_| ParseError::NoDigits)?;
    literal.parse::<i64>().map_err(|_| ParseError::OutOfRange)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(b"0", 0)]
    #[case(b"12", 12)]
    #[case(b"+12", 12)]
    #[case(b"-12", -12)]
    #[case(b"007", 7)]
    #[case(b"42\n", 42)]
    #[case(b"-0", 0)]
    #[case(b"9223372036854775807", i64::MAX)]
    #[case(b"-9223372036854775808", i64::MIN)]
    fn test_parse_valid(#[case] input: &[u8], #[case] expected: i64) {
        assert_eq!(parse_operand(input), Ok(expected));
    }

    #[rstest]
    #[case(b"", ParseError::Empty)]
    #[case(b"\n", ParseError::Empty)]
    #[case(b"+", ParseError::NoDigits)]
    #[case(b"-\n", ParseError::NoDigits)]
    #[case(b"9223372036854775808", ParseError::OutOfRange)]
    #[case(b"-9223372036854775809", ParseError::OutOfRange)]
    fn test_parse_rejected(#[case] input: &[u8], #[case] expected: ParseError) {
        assert_eq!(parse_operand(input), Err(expected));
    }

    #[rstest]
    #[case(b"12a", 2, b'a')]
    #[case(b" 12", 0, b' ')]
    #[case(b"1 2", 1, b' ')]
    #[case(b"--1", 1, b'-')]
    #[case(b"12\n\n", 2, b'\n')]
    #[case(b"3.5", 1, b'.')]
    fn test_parse_invalid_character(
        #[case] input: &[u8],
        #[case] position: usize,
        #[case] byte: u8,
    ) {
        assert_eq!(
            parse_operand(input),
            Err(ParseError::InvalidCharacter { position, byte })
        );
    }

    #[test]
    fn test_parse_non_utf8_is_invalid_character() {
        let result = parse_operand(&[b'1', 0xFF]);
        assert_eq!(
            result,
            Err(ParseError::InvalidCharacter {
                position: 1,
                byte: 0xFF
            })
        );
    }
}
