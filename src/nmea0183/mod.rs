//! # NMEA 0183 Framing
//!
//! This module handles the outer structure of an NMEA 0183 sentence:
//! `$HHH,D1,D2,...,Dn*CC`
//!
//! It validates the wire limits, separates the body from the optional
//! checksum suffix and computes the XOR checksum. Interpreting the fields of
//! the body is left to [`Sentences`](crate::Sentences).

use nom::{Parser, combinator::all_consuming, number::complete::hex_u32};

use crate::Error;

/// Shortest sentence accepted on decode, `$` included.
pub const MIN_SENTENCE_LEN: usize = 5;

/// Longest sentence accepted on decode, `$` and checksum included.
pub const MAX_SENTENCE_LEN: usize = 89;

/// A sentence split into its body and optional checksum.
///
/// The body is everything strictly between `$` and `*` (or the end of the
/// sentence when no checksum is present).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame<'a> {
    body: &'a str,
    found: Option<u8>,
    calculated: u8,
}

impl<'a> Frame<'a> {
    /// The sentence body, without `$` and without the `*CC` suffix.
    pub fn body(&self) -> &'a str {
        self.body
    }

    /// The checksum found on the wire, [`None`] if the sentence carried none.
    pub fn found_checksum(&self) -> Option<u8> {
        self.found
    }

    /// The checksum calculated over the body.
    pub fn calculated_checksum(&self) -> u8 {
        self.calculated
    }

    /// Compares the found checksum against the calculated one.
    ///
    /// A sentence without a checksum always verifies. A mismatch is reported
    /// as [`Error::ChecksumMismatch`] without a decode attached; whether to
    /// keep going is up to the caller.
    pub fn verify(&self) -> Result<(), Error> {
        match self.found {
            Some(found) if found != self.calculated => Err(Error::ChecksumMismatch {
                expected: self.calculated,
                found,
                decoded: None,
            }),
            _ => Ok(()),
        }
    }
}

/// Splits a raw sentence into a [`Frame`].
///
/// Surrounding whitespace (including a trailing `\r\n`) is ignored. The
/// sentence must:
/// * be ASCII-only,
/// * be between [`MIN_SENTENCE_LEN`] and [`MAX_SENTENCE_LEN`] characters long,
/// * start with `$`,
/// * if its third-to-last character is `*`, end with two hex digits.
///
/// The checksum itself is not enforced here, see [`Frame::verify`].
///
/// # Examples
///
/// ```rust
/// use nmea0183_codec::nmea0183::frame;
///
/// let frame = frame("$HCHDM,172.5,M*28\r\n").unwrap();
/// assert_eq!(frame.body(), "HCHDM,172.5,M");
/// assert_eq!(frame.found_checksum(), Some(0x28));
/// assert!(frame.verify().is_ok());
/// ```
pub fn frame(raw: &str) -> Result<Frame<'_>, Error> {
    let raw = raw.trim();

    if !raw.is_ascii() {
        return Err(Error::NonAscii);
    }

    if raw.len() < MIN_SENTENCE_LEN || raw.len() > MAX_SENTENCE_LEN {
        return Err(Error::InvalidLength(raw.len()));
    }

    let i = raw.strip_prefix('$').ok_or(Error::MissingStart)?;
    let (body, found) = split_checksum(i)?;

    Ok(Frame {
        body,
        found,
        calculated: checksum(body),
    })
}

/// Separates a trailing `*CC` from the body, parsing `CC` as hex.
fn split_checksum(i: &str) -> Result<(&str, Option<u8>), Error> {
    let Some(at) = i.len().checked_sub(3) else {
        return Ok((i, None));
    };

    let (body, tail) = i.split_at(at);
    let Some(digits) = tail.strip_prefix('*') else {
        return Ok((i, None));
    };

    let parsed: nom::IResult<&str, u32> = all_consuming(hex_u32).parse(digits);
    match parsed {
        Ok((_, cc)) => Ok((body, Some(cc as u8))),
        Err(_) => Err(Error::InvalidChecksumField(digits.to_string())),
    }
}

/// Calculates the NMEA 0183 checksum for the given sentence body.
///
/// The checksum is the XOR of every byte of the body. The body is everything
/// between the `$` prefix and the `*` delimiter, excluding both.
pub fn checksum(body: &str) -> u8 {
    body.as_bytes()
        .iter()
        .fold(0u8, |accumulated_xor, &byte| accumulated_xor ^ byte)
}

/// Renders the checksum of a sentence as two uppercase hex digits.
///
/// A leading `$` is skipped and the calculation stops at the first `*`, so
/// the input may be a bare body, a sentence under construction or a complete
/// sentence.
///
/// # Examples
///
/// ```rust
/// use nmea0183_codec::nmea0183::checksum_hex;
///
/// assert_eq!(checksum_hex("$9"), "39");
/// assert_eq!(checksum_hex("$99"), "00");
/// assert_eq!(checksum_hex("$HCHDM,172.5,M*28"), "28");
/// ```
pub fn checksum_hex(sentence: &str) -> String {
    let body = sentence.strip_prefix('$').unwrap_or(sentence);
    let body = body.split_once('*').map_or(body, |(body, _)| body);

    format!("{:02X}", checksum(body))
}

/// Checks the checksum of a complete sentence.
///
/// Returns `Ok(())` for a sentence whose checksum matches or that carries
/// none, [`Error::ChecksumMismatch`] otherwise, or a framing error.
pub fn verify(sentence: &str) -> Result<(), Error> {
    frame(sentence)?.verify()
}

#[cfg(test)]
mod tests {
    mod framing;
}
