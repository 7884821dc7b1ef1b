//! # NMEA 0183 Codec
//!
//! This library converts NMEA 0183 sentences of the form
//! `$TTSSS,D1,D2,...,Dn*CC` into named, human-readable variables and back.
//!
//! The mapping is table driven:
//! - a sentence *format* lists the variables bound to each field position;
//! - every variable has a *template key* describing the wire shape of its
//!   field(s), e.g. `hhmmss.ss` or `lat,NS,long,WE`;
//! - a [`Handle`] keeps the latest value of every variable, when it was
//!   updated and the time carried by the sentence stream, and evicts values
//!   that go stale.
//!
//! Parsing a sentence and writing it back from the store reproduces it,
//! checksum included.
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use nmea0183_codec::{Handle, Preferences, Sentences};
//!
//! let sentences = Arc::new(Sentences::default());
//! let mut handle = Handle::new(sentences)
//!     .with_preferences(Preferences::new().real_time(false).auto_clear_secs(60));
//!
//! handle.parse("$GPZDA,110910.59,15,09,2020,01,30*6D").unwrap();
//! assert_eq!(handle.get("datetime"), "2020-09-15T11:09:10.59+01:30");
//! assert_eq!(handle.message_time().unix_timestamp(), 1_600_162_750);
//!
//! handle.parse("$HCHDM,172.5,M*28").unwrap();
//! assert_eq!(handle.get("hdm"), "172.5,M");
//! assert_eq!(
//!     handle.write_sentence("HC", "hdm").unwrap(),
//!     "$HCHDM,172.5,M*28"
//! );
//! ```

pub mod error;
pub mod fusion;
mod handle;
pub mod nmea0183;
pub mod parsing;
pub mod position;
pub mod sentences;
pub mod template;

pub use error::Error;
pub use handle::{ChecksumPolicy, Handle, Preferences};
pub use sentences::{Decoded, Header, Sentences, TagMap, Tables, VariableMap};

#[cfg(doctest)]
#[doc = include_str!("../README.md")]
struct README;

#[cfg(test)]
mod tests {
    mod roundtrip;
    mod store;
}
