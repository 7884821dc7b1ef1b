//! # Position Utilities
//!
//! Conversions between the formatted position strings produced by the
//! `lat,NS`, `long,WE` and `lat,NS,long,WE` templates and signed decimal
//! degrees. South and West are negative.

use crate::{
    Error,
    parsing::{decimal_f64, parse_token},
};

const TEN_THOUSANDTHS_PER_DEGREE: f64 = 600_000.0;

/// Reads `dd° mm.mmmm'H` into signed degrees.
fn angle_to_float(value: &str, positive: char, negative: char) -> Result<f64, Error> {
    let invalid = || Error::InvalidPosition(value.to_string());

    let (degrees, rest) = value.split_once('°').ok_or_else(invalid)?;
    let (minutes, hemisphere) = rest.trim_start().rsplit_once('\'').ok_or_else(invalid)?;

    let degrees = parse_token(decimal_f64, degrees.trim()).ok_or_else(invalid)?;
    let minutes = parse_token(decimal_f64, minutes).ok_or_else(invalid)?;
    let angle = degrees + minutes / 60.0;

    match hemisphere.trim() {
        h if h.eq_ignore_ascii_case(&positive.to_string()) => Ok(angle),
        h if h.eq_ignore_ascii_case(&negative.to_string()) => Ok(-angle),
        _ => Err(invalid()),
    }
}

/// Renders signed degrees as `dd° mm.mmmm'H`, degrees zero-padded to `width`.
fn angle_to_string(
    value: f64,
    width: usize,
    positive: char,
    negative: char,
) -> Result<String, Error> {
    if !value.is_finite() {
        return Err(Error::InvalidCoordinate(value));
    }

    let total = (value.abs() * TEN_THOUSANDTHS_PER_DEGREE).round() as u64;
    let degrees = total / 600_000;
    let minutes = total % 600_000;
    let hemisphere = if value < 0.0 && total != 0 {
        negative
    } else {
        positive
    };

    Ok(format!(
        "{degrees:0width$}° {:02}.{:04}'{hemisphere}",
        minutes / 10_000,
        minutes % 10_000
    ))
}

/// Converts formatted latitude and longitude strings to signed degrees.
///
/// # Examples
///
/// ```rust
/// use nmea0183_codec::position::lat_long_to_float;
///
/// let (lat, long) = lat_long_to_float("50° 47.3986'N", "000° 54.6007'W").unwrap();
/// assert!((lat - 50.789977).abs() < 1e-6);
/// assert!((long + 0.910012).abs() < 1e-6);
/// ```
pub fn lat_long_to_float(lat: &str, long: &str) -> Result<(f64, f64), Error> {
    Ok((
        angle_to_float(lat, 'N', 'S')?,
        angle_to_float(long, 'E', 'W')?,
    ))
}

/// Converts a combined `lat, long` position string to signed degrees.
pub fn position_to_float(position: &str) -> Result<(f64, f64), Error> {
    let (lat, long) = position
        .split_once(", ")
        .ok_or_else(|| Error::InvalidPosition(position.to_string()))?;

    lat_long_to_float(lat, long)
}

/// Converts signed degrees to formatted latitude and longitude strings.
///
/// Minutes are rounded to four decimal places.
pub fn lat_long_to_string(lat: f64, long: f64) -> Result<(String, String), Error> {
    Ok((
        angle_to_string(lat, 2, 'N', 'S')?,
        angle_to_string(long, 3, 'E', 'W')?,
    ))
}

/// Converts signed degrees to a combined `lat, long` position string.
pub fn position_to_string(lat: f64, long: f64) -> Result<String, Error> {
    let (lat, long) = lat_long_to_string(lat, long)?;

    Ok(format!("{lat}, {long}"))
}
