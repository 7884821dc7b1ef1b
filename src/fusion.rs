//! # Temporal Fusion
//!
//! Sentences carry time in different shapes: ZDA has a full date, time and
//! zone, RMC has a time and a two-digit-year date, other layouts spread day,
//! month and year over separate fields. The type tags collected during a
//! decode are combined here into a single message instant.

use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::{
    parsing::{parse_token, unsigned},
    sentences::TagMap,
    template::{TypeTag, expand_year},
};

/// Builds the RFC 3339 text of the message instant from decoded tags.
///
/// Priority:
/// 1. a `datetime` value is used as is;
/// 2. otherwise a date comes from `date`, or from `day` + `month` + `year`
///    together (two-digit years follow [`expand_year`]), and is joined with
///    `time` (midnight if absent) and `zone` (`+00:00` if absent).
///
/// Returns [`None`] when no date can be assembled.
pub fn compose(tags: &TagMap) -> Option<String> {
    if let Some(instant) = tags.get(&TypeTag::DateTime) {
        return Some(instant.clone());
    }

    let date = match tags.get(&TypeTag::Date) {
        Some(date) => date.clone(),
        None => {
            let part = |tag: TypeTag| tags.get(&tag).and_then(|v| parse_token(unsigned, v));
            let day = part(TypeTag::Day)?;
            let month = part(TypeTag::Month)?;
            let year = expand_year(part(TypeTag::Year)?);
            format!("{year:04}-{month:02}-{day:02}")
        }
    };

    let time = tags.get(&TypeTag::Time).map_or("00:00:00", String::as_str);
    let zone = tags.get(&TypeTag::Zone).map_or("+00:00", String::as_str);

    Some(format!("{date}T{time}{zone}"))
}

/// Synthesizes the message instant from decoded tags.
///
/// Returns [`None`] if there is nothing to build an instant from or the
/// result is not a valid RFC 3339 instant; the caller keeps its previous
/// message time in that case.
///
/// # Examples
///
/// ```rust
/// use nmea0183_codec::{TagMap, fusion::fuse, template::TypeTag};
///
/// let mut tags = TagMap::new();
/// tags.insert(TypeTag::Time, "11:09:10.59".to_string());
/// tags.insert(TypeTag::Date, "2020-09-15".to_string());
///
/// let instant = fuse(&tags).unwrap();
/// assert_eq!(instant.unix_timestamp(), 1_600_168_150);
/// ```
pub fn fuse(tags: &TagMap) -> Option<OffsetDateTime> {
    let instant = compose(tags)?;
    OffsetDateTime::parse(&instant, &Rfc3339).ok()
}
