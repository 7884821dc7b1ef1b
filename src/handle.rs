//! # Data Store
//!
//! A [`Handle`] keeps the latest value of every variable seen so far, when
//! each was last updated and the message time synthesized from the sentence
//! stream. It is fed by [`Handle::parse`] and read back either directly or as
//! regenerated sentences through [`Handle::write_sentence`].
//!
//! A handle is a plain single-owner value: every mutation takes `&mut self`,
//! so merges on one handle never interleave. Use one handle per data source,
//! or wrap a shared one in a mutex.

use std::{collections::HashMap, fmt, sync::Arc};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use tracing::{trace, warn};

use crate::{
    Error, fusion,
    position::{lat_long_to_float, lat_long_to_string, position_to_float},
    sentences::{Decoded, Header, Sentences, TagMap, VariableMap},
};

/// What [`Handle::parse`] does with a sentence whose checksum does not match.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ChecksumPolicy {
    #[default]
    /// The sentence is dropped and [`Error::ChecksumMismatch`] is returned.
    Discard,

    /// The best-effort decode is merged anyway; the mismatch is only logged.
    Merge,
}

/// Handle settings.
///
/// # Examples
///
/// ```rust
/// use nmea0183_codec::{ChecksumPolicy, Preferences};
///
/// let preferences = Preferences::new()
///     .real_time(false)
///     .auto_clear_secs(60)
///     .checksum_policy(ChecksumPolicy::Merge);
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
#[must_use]
pub struct Preferences {
    /// Use the wall clock as "now" instead of the message time.
    real_time: bool,

    /// Maximum age of a variable, zero to keep everything.
    auto_clear_period: Duration,

    /// Checksum mismatch handling in [`Handle::parse`].
    checksum_policy: ChecksumPolicy,
}

impl Preferences {
    /// Creates preferences with default settings.
    ///
    /// The default settings are:
    /// - real time: `true`
    /// - auto clear period: zero (no eviction)
    /// - checksum policy: [`ChecksumPolicy::Discard`]
    pub fn new() -> Self {
        Preferences {
            real_time: true,
            auto_clear_period: Duration::ZERO,
            checksum_policy: ChecksumPolicy::Discard,
        }
    }

    /// Sets where "now" comes from.
    ///
    /// * `true` - the wall clock, for live instruments
    /// * `false` - the message time synthesized from the parsed sentences,
    ///   for replaying recorded data
    pub fn real_time(mut self, real_time: bool) -> Self {
        self.real_time = real_time;
        self
    }

    /// Sets how long a variable is kept without being refreshed.
    ///
    /// Stale variables are evicted at the start of every merge. A zero or
    /// negative period disables eviction.
    pub fn auto_clear_period(mut self, period: Duration) -> Self {
        self.auto_clear_period = period.max(Duration::ZERO);
        self
    }

    /// Same as [`auto_clear_period`](Self::auto_clear_period) in whole seconds.
    pub fn auto_clear_secs(self, seconds: i64) -> Self {
        self.auto_clear_period(Duration::seconds(seconds))
    }

    /// Sets the checksum mismatch handling.
    pub fn checksum_policy(mut self, policy: ChecksumPolicy) -> Self {
        self.checksum_policy = policy;
        self
    }
}

impl Default for Preferences {
    fn default() -> Self {
        Preferences::new()
    }
}

type Clock = Arc<dyn Fn() -> OffsetDateTime + Send + Sync>;

/// Live store of decoded variables over one set of [`Sentences`].
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use nmea0183_codec::{Handle, Sentences};
///
/// let mut handle = Handle::new(Arc::new(Sentences::default()));
///
/// let header = handle
///     .parse("$GPRMC,110910.59,A,5047.3986,N,00054.6007,W,0.08,0.19,150920,0.24,W,D,V*75")
///     .unwrap();
/// assert_eq!(handle.get("position"), "50° 47.3986'N, 000° 54.6007'W");
/// assert_eq!(handle.get("mag_var"), "-0.24");
///
/// let (lat, long) = handle.position_to_float("position").unwrap();
/// assert!(lat > 50.0 && long < 0.0);
///
/// let sentence = handle.write_sentence(&header.talker, &header.sentence).unwrap();
/// assert_eq!(
///     sentence,
///     "$GPRMC,110910.59,A,5047.3986,N,00054.6007,W,0.08,0.19,150920,0.24,W,D,V*75"
/// );
/// ```
#[derive(Clone)]
pub struct Handle {
    sentences: Arc<Sentences>,
    data: VariableMap,
    history: HashMap<String, OffsetDateTime>,
    message_time: OffsetDateTime,
    preferences: Preferences,
    clock: Clock,
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("data", &self.data)
            .field("history", &self.history)
            .field("message_time", &self.message_time)
            .field("preferences", &self.preferences)
            .finish_non_exhaustive()
    }
}

impl Handle {
    /// Creates an empty handle with default [`Preferences`].
    pub fn new(sentences: Arc<Sentences>) -> Self {
        Handle {
            sentences,
            data: VariableMap::new(),
            history: HashMap::new(),
            message_time: OffsetDateTime::UNIX_EPOCH,
            preferences: Preferences::new(),
            clock: Arc::new(OffsetDateTime::now_utc),
        }
    }

    /// Replaces the preferences.
    pub fn with_preferences(mut self, preferences: Preferences) -> Self {
        self.preferences = preferences;
        self
    }

    /// Replaces the wall clock used in real-time mode.
    pub fn with_clock<F>(mut self, clock: F) -> Self
    where
        F: Fn() -> OffsetDateTime + Send + Sync + 'static,
    {
        self.clock = Arc::new(clock);
        self
    }

    /// Changes the preferences of a live handle.
    pub fn set_preferences(&mut self, preferences: Preferences) {
        self.preferences = preferences;
    }

    /// The current preferences.
    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    /// The definition tables this handle decodes and encodes with.
    pub fn sentences(&self) -> &Arc<Sentences> {
        &self.sentences
    }

    /// The most recently synthesized message time, the Unix epoch until a
    /// sentence carrying a date has been parsed.
    pub fn message_time(&self) -> OffsetDateTime {
        self.message_time
    }

    fn now(&self) -> OffsetDateTime {
        if self.preferences.real_time {
            (self.clock)()
        } else {
            self.message_time
        }
    }

    /// Parses a sentence and merges its variables into the store.
    ///
    /// Returns the talker and sentence id. The message time is updated from
    /// the sentence before its values are stamped, so in historic mode the
    /// values carry the time of the sentence that delivered them.
    ///
    /// On a checksum mismatch the [`ChecksumPolicy`] decides: by default
    /// nothing is merged and the error is returned.
    pub fn parse(&mut self, raw: &str) -> Result<Header, Error> {
        self.parse_prefixed(raw, "")
    }

    /// Like [`parse`](Self::parse), storing every variable as
    /// `prefix + name`.
    ///
    /// Lets one handle keep identical sentences from different sources apart.
    pub fn parse_prefixed(&mut self, raw: &str, prefix: &str) -> Result<Header, Error> {
        let decoded = match self.sentences.decode(raw) {
            Ok(decoded) => decoded,
            Err(Error::ChecksumMismatch {
                expected,
                found,
                decoded: Some(decoded),
            }) if self.preferences.checksum_policy == ChecksumPolicy::Merge => {
                warn!(expected, found, "merging sentence despite check sum error");
                *decoded
            }
            Err(e) => return Err(e),
        };

        let Decoded {
            header,
            values,
            tags,
        } = decoded;

        self.fuse(&tags);
        if prefix.is_empty() {
            self.merge(values);
        } else {
            self.merge(
                values
                    .into_iter()
                    .map(|(name, value)| (format!("{prefix}{name}"), value)),
            );
        }

        Ok(header)
    }

    /// Decodes a sentence without touching the store.
    ///
    /// The result can be filtered and then merged with
    /// [`update`](Self::update).
    pub fn decode(&self, raw: &str) -> Result<Decoded, Error> {
        self.sentences.decode(raw)
    }

    /// Merges externally produced values, updating the message time first
    /// from those whose variable definition carries a type tag.
    pub fn update(&mut self, values: VariableMap) {
        let tags: TagMap = values
            .iter()
            .filter(|(_, value)| !value.is_empty())
            .filter_map(|(name, value)| {
                let tag = self.sentences.variable(name)?.group().tag()?;
                Some((tag, value.clone()))
            })
            .collect();

        self.fuse(&tags);
        self.merge(values);
    }

    fn fuse(&mut self, tags: &TagMap) {
        if let Some(instant) = fusion::fuse(tags) {
            trace!(message_time = %instant, "message time updated");
            self.message_time = instant;
        }
    }

    /// Writes values into the store, all stamped with the same instant.
    ///
    /// Stale entries are evicted first when an auto clear period is set.
    pub fn merge<I>(&mut self, values: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        if self.preferences.auto_clear_period.is_positive() {
            self.delete_before(self.preferences.auto_clear_period);
        }

        let stamp = self.now();
        for (name, value) in values {
            self.history.insert(name.clone(), stamp);
            self.data.insert(name, value);
        }
    }

    /// Removes every variable last updated more than `period` before now.
    ///
    /// Both the value and its update time are removed. A period reaching back
    /// past the earliest representable instant removes nothing.
    pub fn delete_before(&mut self, period: Duration) {
        let Some(cutoff) = self.now().checked_sub(period) else {
            return;
        };
        let data = &mut self.data;

        self.history.retain(|name, updated| {
            if *updated < cutoff {
                trace!(variable = %name, updated = %updated, "evicted stale variable");
                data.remove(name);
                false
            } else {
                true
            }
        });
    }

    /// The current value of a variable, empty if it is not present.
    pub fn get(&self, name: &str) -> &str {
        self.data.get(name).map_or("", String::as_str)
    }

    /// A snapshot of every variable.
    pub fn get_all(&self) -> VariableMap {
        self.data.clone()
    }

    /// When a variable was last updated, the Unix epoch if it is not present.
    pub fn last_update(&self, name: &str) -> OffsetDateTime {
        self.history
            .get(name)
            .copied()
            .unwrap_or(OffsetDateTime::UNIX_EPOCH)
    }

    /// A snapshot of every variable's last update time.
    pub fn all_update_times(&self) -> HashMap<String, OffsetDateTime> {
        self.history.clone()
    }

    /// Regenerates a sentence from the stored values.
    ///
    /// `talker` is written in upper case in front of the sentence id and is
    /// covered by the checksum; it may be empty.
    pub fn write_sentence(&self, talker: &str, sentence: &str) -> Result<String, Error> {
        self.write_sentence_prefixed(talker, sentence, "")
    }

    /// Like [`write_sentence`](Self::write_sentence), reading every variable
    /// as `prefix + name` (see [`parse_prefixed`](Self::parse_prefixed)).
    pub fn write_sentence_prefixed(
        &self,
        talker: &str,
        sentence: &str,
        prefix: &str,
    ) -> Result<String, Error> {
        self.sentences.encode_with(sentence, talker, |name| {
            let value = if prefix.is_empty() {
                self.data.get(name)
            } else {
                self.data.get(&format!("{prefix}{name}"))
            };
            value.map(String::as_str)
        })
    }

    /// Reads a combined `lat, long` variable as signed degrees.
    pub fn position_to_float(&self, name: &str) -> Result<(f64, f64), Error> {
        position_to_float(self.get(name))
    }

    /// Reads separate latitude and longitude variables as signed degrees.
    pub fn lat_long_to_float(&self, lat_name: &str, long_name: &str) -> Result<(f64, f64), Error> {
        lat_long_to_float(self.get(lat_name), self.get(long_name))
    }

    /// Stores signed degrees as a combined `lat, long` variable.
    pub fn set_position(&mut self, lat: f64, long: f64, name: &str) -> Result<(), Error> {
        let (lat, long) = lat_long_to_string(lat, long)?;
        self.merge([(name.to_string(), format!("{lat}, {long}"))]);
        Ok(())
    }

    /// Stores signed degrees as separate latitude and longitude variables.
    pub fn set_lat_long(
        &mut self,
        lat: f64,
        long: f64,
        lat_name: &str,
        long_name: &str,
    ) -> Result<(), Error> {
        let (lat, long) = lat_long_to_string(lat, long)?;
        self.merge([(lat_name.to_string(), lat), (long_name.to_string(), long)]);
        Ok(())
    }
}

impl Sentences {
    /// Creates a [`Handle`] over shared tables.
    pub fn make_handle(self: Arc<Self>) -> Handle {
        Handle::new(self)
    }
}
