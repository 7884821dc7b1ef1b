//! # Field Conversion Registry
//!
//! Every variable in a sentence is described by a *template key*, a short
//! string naming the wire shape of its field(s), e.g. `hhmmss.ss` or
//! `lat,NS,long,WE`. This module resolves those keys once, when the tables are
//! built, into [`Template`] variants that know how many tokens they consume
//! and how to decode and encode them.
//!
//! | key | tokens | decoded form |
//! |---|---|---|
//! | `x.x`, `x`, `xxx`, `-x.x`, `A`, `T`, `str`, `c--c`, `NS`, `WE`, `R`, `N`, `tz_h`, `tz_m` | 1 | verbatim |
//! | `DD_day`, `DD_month`, `DD_year` | 1 | verbatim |
//! | `hhmmss.ss` | 1 | `11:09:10.59` |
//! | `ddmmyy` | 1 | `2020-09-15` |
//! | `lat` / `long` | 1 | `50° 47.3986'` / `000° 54.6007'` |
//! | `lat,NS` / `long,WE` | 2 | `50° 47.3986'N` / `000° 54.6007'W` |
//! | `lat,NS,long,WE` | 4 | `50° 47.3986'N, 000° 54.6007'W` |
//! | `x.x,w` | 2 | `-0.24` (West negative) |
//! | `x.x,R,N` | 3 | `R0.02617N` |
//! | `tz_h,tz_m` | 2 | `+01:30` |
//! | `hhmmss,day,month,year,tz` | 6 | `2020-09-15T11:09:10.59+01:30` |
//!
//! Keys the registry does not know consume one token and decode to nothing.

mod fields;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub use fields::{datetime_to_tokens, expand_year};

/// Secondary classification of a decoded value, used to synthesize the
/// message time.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeTag {
    /// Time of day, `hh:mm:ss.ss`
    Time,
    /// ISO date, `yyyy-mm-dd`
    Date,
    /// Day of month as on the wire
    Day,
    /// Month as on the wire
    Month,
    /// Year as on the wire, two or four digits
    Year,
    /// UTC offset, `±hh:mm`
    Zone,
    /// Complete RFC 3339 instant
    DateTime,
}

/// One wire-level field shape and its decode/encode pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    /// Copied as is.
    Verbatim(&'static str),
    /// Day of month, copied as is.
    Day,
    /// Month, copied as is.
    Month,
    /// Year, copied as is.
    Year,
    /// `hhmmss.ss`
    Time,
    /// `ddmmyy`
    Date,
    /// `ddmm.mmmm` without hemisphere
    Latitude,
    /// `dddmm.mmmm` without hemisphere
    Longitude,
    /// `ddmm.mmmm,N|S`
    LatitudeNS,
    /// `dddmm.mmmm,E|W`
    LongitudeWE,
    /// Latitude and longitude with hemispheres
    Position,
    /// Magnitude with `E`/`W`
    Deviation,
    /// Magnitude, steer direction and units
    CrossTrack,
    /// Zone hours and minutes
    Zone,
    /// Time, day, month, year, zone hours, zone minutes
    DateTime,
    /// Unknown key: one token, nothing decoded
    Unknown,
}

const VERBATIM_KEYS: &[&str] = &[
    "x.x", "x", "xxx", "-x.x", "A", "T", "str", "c--c", "NS", "WE", "R", "N", "tz_h", "tz_m",
];

const REGISTRY: &[(&str, Template)] = &[
    ("DD_day", Template::Day),
    ("DD_month", Template::Month),
    ("DD_year", Template::Year),
    ("hhmmss.ss", Template::Time),
    ("ddmmyy", Template::Date),
    ("lat", Template::Latitude),
    ("long", Template::Longitude),
    ("lat,NS", Template::LatitudeNS),
    ("long,WE", Template::LongitudeWE),
    ("lat,NS,long,WE", Template::Position),
    ("x.x,w", Template::Deviation),
    ("x.x,R,N", Template::CrossTrack),
    ("tz_h,tz_m", Template::Zone),
    ("hhmmss,day,month,year,tz", Template::DateTime),
];

impl Template {
    /// Looks up a registered key, including the multi-token composite keys.
    ///
    /// Returns [`None`] for a key the registry does not know.
    pub fn from_key(key: &str) -> Option<Template> {
        if let Some(&verbatim) = VERBATIM_KEYS.iter().find(|&&k| k == key) {
            return Some(Template::Verbatim(verbatim));
        }

        REGISTRY
            .iter()
            .find(|(k, _)| *k == key)
            .map(|&(_, template)| template)
    }

    /// Number of wire tokens this template consumes.
    pub fn token_count(&self) -> usize {
        match self {
            Template::LatitudeNS | Template::LongitudeWE | Template::Deviation | Template::Zone => 2,
            Template::CrossTrack => 3,
            Template::Position => 4,
            Template::DateTime => 6,
            _ => 1,
        }
    }

    /// The type tag attached to values decoded by this template.
    pub fn tag(&self) -> Option<TypeTag> {
        match self {
            Template::Time => Some(TypeTag::Time),
            Template::Date => Some(TypeTag::Date),
            Template::Day => Some(TypeTag::Day),
            Template::Month => Some(TypeTag::Month),
            Template::Year => Some(TypeTag::Year),
            Template::Zone => Some(TypeTag::Zone),
            Template::DateTime => Some(TypeTag::DateTime),
            _ => None,
        }
    }

    /// Decodes exactly [`token_count`](Self::token_count) tokens.
    ///
    /// Empty or malformed fields give an empty string.
    pub fn decode(&self, tokens: &[&str]) -> String {
        if tokens.len() != self.token_count() || tokens.iter().all(|t| t.is_empty()) {
            return String::new();
        }

        match (self, tokens) {
            (Template::Verbatim(_) | Template::Day | Template::Month | Template::Year, [t]) => {
                t.to_string()
            }
            (Template::Time, [t]) => fields::decode_time(t).unwrap_or_default(),
            (Template::Date, [t]) => fields::decode_date(t).unwrap_or_default(),
            (Template::Latitude, [t]) => fields::decode_angle(t, 2).unwrap_or_default(),
            (Template::Longitude, [t]) => fields::decode_angle(t, 3).unwrap_or_default(),
            (Template::LatitudeNS, [angle, hemisphere]) => {
                fields::decode_hemisphere(angle, hemisphere, 2)
            }
            (Template::LongitudeWE, [angle, hemisphere]) => {
                fields::decode_hemisphere(angle, hemisphere, 3)
            }
            (Template::Position, [lat, ns, long, we]) => {
                let lat = fields::decode_hemisphere(lat, ns, 2);
                let long = fields::decode_hemisphere(long, we, 3);
                if lat.is_empty() && long.is_empty() {
                    String::new()
                } else {
                    format!("{lat}, {long}")
                }
            }
            (Template::Deviation, [magnitude, direction]) => {
                fields::decode_deviation(magnitude, direction)
            }
            (Template::CrossTrack, [magnitude, direction, units]) => {
                fields::decode_cross_track(magnitude, direction, units)
            }
            (Template::Zone, [hours, minutes]) => {
                fields::decode_zone(hours, minutes).unwrap_or_default()
            }
            (Template::DateTime, tokens) => fields::decode_datetime(tokens).unwrap_or_default(),
            _ => String::new(),
        }
    }

    /// Encodes a decoded value back into exactly
    /// [`token_count`](Self::token_count) tokens.
    ///
    /// Returns [`None`] if the value is not in the form this template
    /// decodes to.
    pub fn encode(&self, value: &str) -> Option<Vec<String>> {
        if value.is_empty() {
            return Some(vec![String::new(); self.token_count()]);
        }

        match self {
            Template::Verbatim(_) | Template::Day | Template::Month | Template::Year => {
                if value.contains([',', '*', '$']) {
                    None
                } else {
                    Some(vec![value.to_string()])
                }
            }
            Template::Time => fields::encode_time(value).map(|t| vec![t]),
            Template::Date => fields::encode_date(value).map(|d| vec![d]),
            Template::Latitude => fields::encode_angle(value, 2).map(|(angle, _)| vec![angle]),
            Template::Longitude => fields::encode_angle(value, 3).map(|(angle, _)| vec![angle]),
            Template::LatitudeNS => fields::encode_hemisphere(value, 2),
            Template::LongitudeWE => fields::encode_hemisphere(value, 3),
            Template::Position => {
                let (lat, long) = value.split_once(", ").unwrap_or((value, ""));
                let mut tokens = Template::LatitudeNS.encode(lat)?;
                tokens.extend(Template::LongitudeWE.encode(long)?);
                Some(tokens)
            }
            Template::Deviation => fields::encode_deviation(value),
            Template::CrossTrack => fields::encode_cross_track(value),
            Template::Zone => fields::encode_zone(value),
            Template::DateTime => fields::datetime_to_tokens(value),
            Template::Unknown => Some(vec![String::new()]),
        }
    }
}

/// The ordered templates describing one variable.
///
/// A key that names a registered template, composite or not, resolves to a
/// single member. Any other comma-joined key resolves member by member; its
/// members each consume one token and its value is their decoded values
/// joined with `,`.
///
/// # Examples
///
/// ```rust
/// use nmea0183_codec::template::Group;
///
/// let position = Group::resolve("lat,NS,long,WE");
/// assert_eq!(position.token_count(), 4);
/// assert_eq!(
///     position.decode(&["5047.3986", "N", "00054.6007", "W"]),
///     "50° 47.3986'N, 000° 54.6007'W"
/// );
///
/// let heading = Group::resolve("x.x,T");
/// assert_eq!(heading.token_count(), 2);
/// assert_eq!(heading.decode(&["172.5", "M"]), "172.5,M");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    key: String,
    members: Vec<Template>,
}

impl Group {
    /// Resolves a comma-joined template key.
    pub fn resolve(key: &str) -> Group {
        let key = key.split(',').map(str::trim).collect::<Vec<_>>().join(",");

        let members = match Template::from_key(&key) {
            Some(template) => vec![template],
            None => key
                .split(',')
                .map(|atom| Template::from_key(atom).unwrap_or(Template::Unknown))
                .collect(),
        };

        Group { key, members }
    }

    /// Resolves a template key given as a list of member keys.
    pub fn from_keys<I, S>(keys: I) -> Group
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let key = keys
            .into_iter()
            .map(|k| k.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(",");
        Group::resolve(&key)
    }

    /// The normalized key this group was resolved from.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The resolved member templates.
    pub fn members(&self) -> &[Template] {
        &self.members
    }

    /// Total number of wire tokens consumed by the group.
    pub fn token_count(&self) -> usize {
        self.members.iter().map(Template::token_count).sum()
    }

    /// The type tag of the group; only single-template groups carry one.
    pub fn tag(&self) -> Option<TypeTag> {
        match self.members.as_slice() {
            [template] => template.tag(),
            _ => None,
        }
    }

    /// Decodes exactly [`token_count`](Self::token_count) tokens into one value.
    pub fn decode(&self, tokens: &[&str]) -> String {
        if let [template] = self.members.as_slice() {
            return template.decode(tokens);
        }

        let mut values = Vec::with_capacity(self.members.len());
        let mut rest = tokens;
        for template in &self.members {
            let Some((own, tail)) = rest.split_at_checked(template.token_count()) else {
                return String::new();
            };
            values.push(template.decode(own));
            rest = tail;
        }

        if values.iter().all(String::is_empty) {
            String::new()
        } else {
            values.join(",")
        }
    }

    /// Encodes a value into exactly [`token_count`](Self::token_count) tokens.
    ///
    /// Returns [`None`] if the value cannot be rendered in this shape.
    pub fn encode(&self, value: &str) -> Option<Vec<String>> {
        if let [template] = self.members.as_slice() {
            return template.encode(value);
        }

        if value.is_empty() {
            return Some(vec![String::new(); self.token_count()]);
        }

        let mut parts = value.splitn(self.members.len(), ',');
        let mut tokens = Vec::with_capacity(self.token_count());
        for template in &self.members {
            tokens.extend(template.encode(parts.next().unwrap_or_default())?);
        }

        Some(tokens)
    }
}
