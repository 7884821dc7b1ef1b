//! # Parsing Utilities
//!
//! Small nom parsers shared by the field conversions. Every parser here
//! works on a single wire token (the text between two commas) and never
//! allocates.

use nom::{
    Parser,
    bytes::complete::{take, take_while},
    character::complete::{char, digit1, one_of},
    combinator::{all_consuming, map_res, opt, recognize, verify},
};

/// Result type of the token parsers, using nom's default error.
pub type FieldResult<'a, O> = nom::IResult<&'a str, O>;

/// Runs `parser` over a whole token.
///
/// Returns [`None`] if the parser fails or leaves part of the token
/// unconsumed. This is how the conversions turn a malformed field into an
/// empty value instead of an error.
///
/// # Examples
///
/// ```rust
/// use nmea0183_codec::parsing::{fixed_digits, parse_token};
///
/// assert_eq!(parse_token(fixed_digits(2), "09"), Some(9));
/// assert_eq!(parse_token(fixed_digits(2), "091"), None);
/// assert_eq!(parse_token(fixed_digits(2), "9x"), None);
/// ```
pub fn parse_token<'a, O, F>(parser: F, token: &'a str) -> Option<O>
where
    F: Parser<&'a str, Output = O, Error = nom::error::Error<&'a str>>,
{
    all_consuming(parser)
        .parse(token)
        .ok()
        .map(|(_, output)| output)
}

/// Parses exactly `n` ASCII digits as an unsigned number.
pub fn fixed_digits<'a>(
    n: usize,
) -> impl Parser<&'a str, Output = u32, Error = nom::error::Error<&'a str>> {
    verify(take(n), |s: &str| s.bytes().all(|b| b.is_ascii_digit())).map(|s: &str| {
        s.bytes()
            .fold(0u32, |acc, b| acc * 10 + u32::from(b - b'0'))
    })
}

/// Recognizes a possibly empty run of ASCII digits.
pub fn digits(i: &str) -> FieldResult<'_, &str> {
    take_while(|c: char| c.is_ascii_digit()).parse(i)
}

/// Recognizes an unsigned decimal number, `d+` or `d+.d*`.
pub fn decimal(i: &str) -> FieldResult<'_, &str> {
    recognize((digit1, opt((char('.'), digits)))).parse(i)
}

/// Parses an unsigned decimal number as `f64`.
pub fn decimal_f64(i: &str) -> FieldResult<'_, f64> {
    map_res(decimal, str::parse::<f64>).parse(i)
}

/// Parses an integer with an optional `+`/`-` sign.
///
/// The sign is reported separately so that `-00` is still seen as negative.
pub fn signed_int(i: &str) -> FieldResult<'_, (bool, u32)> {
    (opt(one_of("+-")), map_res(digit1, str::parse::<u32>))
        .map(|(sign, value)| (sign == Some('-'), value))
        .parse(i)
}

/// Parses a run of digits as an unsigned number.
pub fn unsigned(i: &str) -> FieldResult<'_, u32> {
    map_res(digit1, str::parse::<u32>).parse(i)
}
