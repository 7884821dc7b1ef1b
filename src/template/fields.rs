//! Decode/encode pairs for the individual wire shapes.
//!
//! Decoders return [`None`] for a malformed token; the caller turns that into
//! an empty value. Encoders return [`None`] for a value they cannot render,
//! which becomes blank fields on the wire.

use std::iter;

use nom::{
    Parser,
    character::complete::{char, one_of},
    combinator::{opt, recognize},
    sequence::preceded,
};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::parsing::{
    FieldResult, decimal, digits, fixed_digits, parse_token, signed_int, unsigned,
};

/// Seconds with a two-digit integer part and optional fraction, `ss` or `ss.s*`.
fn seconds(i: &str) -> FieldResult<'_, (u32, &str)> {
    (fixed_digits(2), opt(preceded(char('.'), digits)))
        .map(|(whole, fraction)| (whole, fraction.unwrap_or_default()))
        .parse(i)
}

/// `hhmmss.ss` to `hh:mm:ss.ss`, always with two decimals on the seconds.
///
/// Extra fraction digits are cut, never rounded, so the seconds stay below 60.
pub(crate) fn decode_time(token: &str) -> Option<String> {
    let (hour, minute, (second, fraction)) =
        parse_token((fixed_digits(2), fixed_digits(2), seconds), token)?;
    let hundredths: String = fraction.chars().chain(iter::repeat('0')).take(2).collect();

    Some(format!("{hour:02}:{minute:02}:{second:02}.{hundredths}"))
}

pub(crate) fn encode_time(value: &str) -> Option<String> {
    let token: String = value.chars().filter(|&c| c != ':').collect();
    decode_time(&token).map(|_| token)
}

/// Expands a two-digit year: below 60 is 20xx, otherwise 19xx.
///
/// Years that already have more than two digits are returned unchanged.
///
/// # Examples
///
/// ```rust
/// use nmea0183_codec::template::expand_year;
///
/// assert_eq!(expand_year(21), 2021);
/// assert_eq!(expand_year(59), 2059);
/// assert_eq!(expand_year(60), 1960);
/// assert_eq!(expand_year(2024), 2024);
/// ```
pub fn expand_year(year: u32) -> u32 {
    match year {
        0..=59 => year + 2000,
        60..=99 => year + 1900,
        _ => year,
    }
}

/// `ddmmyy` to ISO `yyyy-mm-dd`.
pub(crate) fn decode_date(token: &str) -> Option<String> {
    let (day, month, year) =
        parse_token((fixed_digits(2), fixed_digits(2), fixed_digits(2)), token)?;

    Some(format!("{:04}-{month:02}-{day:02}", expand_year(year)))
}

fn iso_date(i: &str) -> FieldResult<'_, (u32, u32, u32)> {
    (
        fixed_digits(4),
        char('-'),
        fixed_digits(2),
        char('-'),
        fixed_digits(2),
    )
        .map(|(year, _, month, _, day)| (year, month, day))
        .parse(i)
}

pub(crate) fn encode_date(value: &str) -> Option<String> {
    let (year, month, day) = parse_token(iso_date, value)?;

    Some(format!("{day:02}{month:02}{:02}", year % 100))
}

/// `ddmm.mmmm` (or `dddmm.mmmm` for `width == 3`) to `dd° mm.mmmm'`.
///
/// The minutes are kept as they appear on the wire.
pub(crate) fn decode_angle(token: &str, width: usize) -> Option<String> {
    let (degrees, minutes) = parse_token((recognize(fixed_digits(width)), decimal), token)?;

    Some(format!("{degrees}° {minutes}'"))
}

/// Splits `dd° mm.mmmm'H` into the angle token and the hemisphere letter.
///
/// The hemisphere is empty or a single ASCII letter.
pub(crate) fn encode_angle(value: &str, width: usize) -> Option<(String, String)> {
    let (degrees, rest) = value.split_once('°')?;
    let (minutes, hemisphere) = rest.trim_start().rsplit_once('\'')?;
    if hemisphere.len() > 1 || !hemisphere.bytes().all(|b| b.is_ascii_alphabetic()) {
        return None;
    }

    let degrees = parse_token(unsigned, degrees.trim())?;
    let minutes = parse_token(decimal, minutes)?;
    let integer_digits = minutes.split('.').next().map_or(0, str::len);
    let pad = if integer_digits < 2 { "0" } else { "" };

    Some((
        format!("{degrees:0width$}{pad}{minutes}"),
        hemisphere.to_string(),
    ))
}

/// Angle plus hemisphere letter, `dd° mm.mmmm'N`.
pub(crate) fn decode_hemisphere(angle: &str, hemisphere: &str, width: usize) -> String {
    if angle.is_empty() {
        return String::new();
    }

    decode_angle(angle, width)
        .map(|angle| angle + hemisphere)
        .unwrap_or_default()
}

pub(crate) fn encode_hemisphere(value: &str, width: usize) -> Option<Vec<String>> {
    let (angle, hemisphere) = encode_angle(value, width)?;

    Some(vec![angle, hemisphere])
}

/// Magnitude plus `E`/`W` to a signed magnitude, West negative.
pub(crate) fn decode_deviation(magnitude: &str, direction: &str) -> String {
    if magnitude.is_empty() || parse_token(decimal, magnitude).is_none() {
        return String::new();
    }

    if direction.eq_ignore_ascii_case("W") {
        format!("-{magnitude}")
    } else {
        magnitude.to_string()
    }
}

pub(crate) fn encode_deviation(value: &str) -> Option<Vec<String>> {
    let (magnitude, direction) = match value.strip_prefix('-') {
        Some(magnitude) => (magnitude, "W"),
        None => (value, "E"),
    };
    parse_token(decimal, magnitude)?;

    Some(vec![magnitude.to_string(), direction.to_string()])
}

/// Magnitude, steer direction and units to `<dir><magnitude><units>`.
pub(crate) fn decode_cross_track(magnitude: &str, direction: &str, units: &str) -> String {
    if !magnitude.is_empty() && parse_token(decimal, magnitude).is_none() {
        return String::new();
    }

    format!("{direction}{magnitude}{units}")
}

pub(crate) fn encode_cross_track(value: &str) -> Option<Vec<String>> {
    let mut rest = value;

    let direction = match rest.chars().next() {
        Some(c @ ('L' | 'R' | 'l' | 'r')) => {
            rest = &rest[c.len_utf8()..];
            c.to_string()
        }
        _ => String::new(),
    };

    let units = match rest.chars().last() {
        Some(c) if c.is_ascii_alphabetic() => {
            rest = &rest[..rest.len() - 1];
            c.to_string()
        }
        _ => String::new(),
    };

    if !rest.is_empty() {
        parse_token(decimal, rest)?;
    }

    Some(vec![rest.to_string(), direction, units])
}

/// Hour and minute offsets to `±hh:mm`.
///
/// Either token carrying a `-` makes the whole offset negative. A missing
/// token counts as zero.
pub(crate) fn decode_zone(hours: &str, minutes: &str) -> Option<String> {
    let part = |token: &str| {
        if token.is_empty() {
            Some((false, 0))
        } else {
            parse_token(signed_int, token)
        }
    };

    let (negative_hours, hours) = part(hours)?;
    let (negative_minutes, minutes) = part(minutes)?;
    let sign = if negative_hours || negative_minutes {
        '-'
    } else {
        '+'
    };

    Some(format!("{sign}{hours:02}:{minutes:02}"))
}

fn zone(i: &str) -> FieldResult<'_, (bool, u32, u32)> {
    (one_of("+-"), fixed_digits(2), char(':'), fixed_digits(2))
        .map(|(sign, hours, _, minutes)| (sign == '-', hours, minutes))
        .parse(i)
}

/// `±hh:mm` back to hour and minute tokens.
///
/// A negative offset puts the sign on every non-zero part, so `-01:30`
/// becomes `-01,-30` and `-00:30` becomes `00,-30`.
pub(crate) fn encode_zone(value: &str) -> Option<Vec<String>> {
    if value == "Z" {
        return Some(vec!["00".to_string(), "00".to_string()]);
    }

    let (negative, hours, minutes) = parse_token(zone, value)?;
    let part = |n: u32| {
        if negative && n != 0 {
            format!("-{n:02}")
        } else {
            format!("{n:02}")
        }
    };

    Some(vec![part(hours), part(minutes)])
}

/// Time, day, month, year and zone tokens fused into an RFC 3339 instant.
pub(crate) fn decode_datetime(tokens: &[&str]) -> Option<String> {
    let [time, day, month, year, zone_hours, zone_minutes] = tokens else {
        return None;
    };

    let time = decode_time(time)?;
    let day = parse_token(unsigned, day)?;
    let month = parse_token(unsigned, month)?;
    let year = expand_year(parse_token(unsigned, year)?);
    let zone = decode_zone(zone_hours, zone_minutes)?;

    let instant = format!("{year:04}-{month:02}-{day:02}T{time}{zone}");
    OffsetDateTime::parse(&instant, &Rfc3339).ok()?;

    Some(instant)
}

/// Splits an RFC 3339 instant back into the six ZDA-style tokens:
/// `hhmmss.ss`, day, month, four-digit year, zone hours, zone minutes.
///
/// # Examples
///
/// ```rust
/// use nmea0183_codec::template::datetime_to_tokens;
///
/// let tokens = datetime_to_tokens("2021-09-15T11:09:10.59+01:40").unwrap();
/// assert_eq!(tokens.join(","), "110910.59,15,09,2021,01,40");
/// ```
pub fn datetime_to_tokens(value: &str) -> Option<Vec<String>> {
    let (date, rest) = value.split_once('T')?;
    let (year, month, day) = parse_token(iso_date, date)?;

    let (time, zone) = match rest.strip_suffix('Z') {
        Some(time) => (time, "Z"),
        None => rest.split_at_checked(rest.len().checked_sub(6)?)?,
    };

    let time = encode_time(time)?;
    let mut tokens = vec![
        time,
        format!("{day:02}"),
        format!("{month:02}"),
        format!("{year:04}"),
    ];
    tokens.extend(encode_zone(zone)?);

    Some(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time() {
        assert_eq!(decode_time("110910.59").as_deref(), Some("11:09:10.59"));
        assert_eq!(decode_time("113156.3").as_deref(), Some("11:31:56.30"));
        assert_eq!(decode_time("001031").as_deref(), Some("00:10:31.00"));
        assert_eq!(decode_time("000005.5").as_deref(), Some("00:00:05.50"));
        assert_eq!(decode_time("163354.").as_deref(), Some("16:33:54.00"));
        assert_eq!(decode_time("11091"), None);
        assert_eq!(decode_time("1109aa.00"), None);

        assert_eq!(encode_time("11:31:56.30").as_deref(), Some("113156.30"));
        assert_eq!(encode_time("garbage"), None);
    }

    #[test]
    fn test_time_fraction_is_cut() {
        assert_eq!(decode_time("115959.999").as_deref(), Some("11:59:59.99"));
        assert_eq!(decode_time("110910.5912").as_deref(), Some("11:09:10.59"));
        assert_eq!(encode_time("11:59:59.99").as_deref(), Some("115959.99"));
    }

    #[test]
    fn test_date() {
        assert_eq!(decode_date("150920").as_deref(), Some("2020-09-15"));
        assert_eq!(decode_date("010199").as_deref(), Some("1999-01-01"));
        assert_eq!(decode_date("01016").as_deref(), None);
        assert_eq!(encode_date("2020-09-15").as_deref(), Some("150920"));
        assert_eq!(encode_date("1999-01-01").as_deref(), Some("010199"));
        assert_eq!(encode_date("15/09/20"), None);
    }

    #[test]
    fn test_century_rule() {
        assert_eq!(expand_year(21), 2021);
        assert_eq!(expand_year(99), 1999);
        assert_eq!(expand_year(60), 1960);
        assert_eq!(expand_year(59), 2059);
        assert_eq!(expand_year(0), 2000);
    }

    #[test]
    fn test_angle() {
        assert_eq!(
            decode_angle("5047.3986", 2).as_deref(),
            Some("50° 47.3986'")
        );
        assert_eq!(
            decode_angle("00054.6007", 3).as_deref(),
            Some("000° 54.6007'")
        );
        assert_eq!(decode_angle("5x47.3986", 2), None);

        assert_eq!(
            encode_angle("50° 47.3986'N", 2),
            Some(("5047.3986".to_string(), "N".to_string()))
        );
        assert_eq!(
            encode_angle("0° 5.5'W", 3),
            Some(("00005.5".to_string(), "W".to_string()))
        );
        assert_eq!(encode_angle("north", 2), None);
        assert_eq!(
            encode_angle("50° 47.3986'", 2),
            Some(("5047.3986".to_string(), String::new()))
        );
    }

    #[test]
    fn test_hemisphere_must_be_one_letter() {
        assert_eq!(encode_angle("50° 47.3986'N,9*", 2), None);
        assert_eq!(encode_angle("50° 47.3986'NS", 2), None);
        assert_eq!(encode_angle("50° 47.3986'1", 2), None);
        assert_eq!(encode_hemisphere("50° 47.3986'N*", 2), None);
    }

    #[test]
    fn test_deviation() {
        assert_eq!(decode_deviation("0.24", "W"), "-0.24");
        assert_eq!(decode_deviation("0.65", "E"), "0.65");
        assert_eq!(decode_deviation("", "E"), "");
        assert_eq!(decode_deviation("bad", "E"), "");
        assert_eq!(
            encode_deviation("-0.24"),
            Some(vec!["0.24".to_string(), "W".to_string()])
        );
        assert_eq!(
            encode_deviation("0.65"),
            Some(vec!["0.65".to_string(), "E".to_string()])
        );
    }

    #[test]
    fn test_cross_track() {
        assert_eq!(decode_cross_track("0.02617", "R", "N"), "R0.02617N");
        assert_eq!(
            encode_cross_track("L8.30M"),
            Some(vec!["8.30".to_string(), "L".to_string(), "M".to_string()])
        );
        assert_eq!(
            encode_cross_track("N"),
            Some(vec![String::new(), String::new(), "N".to_string()])
        );
        assert_eq!(encode_cross_track("Lx1N"), None);
    }

    #[test]
    fn test_zone() {
        assert_eq!(decode_zone("01", "30").as_deref(), Some("+01:30"));
        assert_eq!(decode_zone("-01", "-30").as_deref(), Some("-01:30"));
        assert_eq!(decode_zone("00", "-30").as_deref(), Some("-00:30"));
        assert_eq!(decode_zone("+03", "").as_deref(), Some("+03:00"));
        assert_eq!(decode_zone("x", "00"), None);

        assert_eq!(
            encode_zone("-01:30"),
            Some(vec!["-01".to_string(), "-30".to_string()])
        );
        assert_eq!(
            encode_zone("-00:30"),
            Some(vec!["00".to_string(), "-30".to_string()])
        );
        assert_eq!(
            encode_zone("+00:00"),
            Some(vec!["00".to_string(), "00".to_string()])
        );
    }

    #[test]
    fn test_datetime() {
        let tokens = ["110910.59", "15", "09", "21", "01", "40"];
        assert_eq!(
            decode_datetime(&tokens).as_deref(),
            Some("2021-09-15T11:09:10.59+01:40")
        );

        let tokens = ["110910.59", "15", "13", "2020", "00", "00"];
        assert_eq!(decode_datetime(&tokens), None);

        assert_eq!(
            datetime_to_tokens("2020-09-15T11:09:10.59-01:30").map(|t| t.join(",")),
            Some("110910.59,15,09,2020,-01,-30".to_string())
        );
        assert_eq!(
            datetime_to_tokens("2020-09-15T11:09:10.59Z").map(|t| t.join(",")),
            Some("110910.59,15,09,2020,00,00".to_string())
        );
        assert_eq!(datetime_to_tokens("2020-09-15"), None);
    }
}
