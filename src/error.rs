//! # Error Types
//!
//! This module defines the error type used throughout the codec.
//!
//! Only failures of a whole call are errors. A single field that cannot be
//! converted degrades to an empty value instead, so noisy instrument input
//! never aborts the caller.

use crate::sentences::Decoded;

/// Represents everything that can make a codec or store call fail.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// The provided input contains non-ASCII characters.
    ///
    /// NMEA sentences must be ASCII-only for checksum calculation and field slicing.
    #[error("sentence contains non-ASCII characters")]
    NonAscii,

    /// The sentence is shorter than 5 or longer than 89 characters.
    ///
    /// Contains the length that was found.
    #[error("sentence must be between 5 and 89 characters long, got {0}")]
    InvalidLength(usize),

    /// The sentence does not start with `$`, or its address field is too short
    /// to hold a talker id.
    #[error("sentence must start with a '$' followed by a talker id")]
    MissingStart,

    /// The two characters after the final `*` are not hexadecimal digits.
    #[error("checksum field {0:?} is not two hex digits")]
    InvalidChecksumField(String),

    /// The checksum of the sentence was corrupt or incorrect.
    ///
    /// Contains both the expected checksum (calculated from the sentence body)
    /// and the checksum found on the wire. When produced by a decode, the
    /// best-effort decode of the sentence is attached so the caller can decide
    /// whether to keep it.
    #[error("check sum error: {expected:02X} != {found:02X}")]
    ChecksumMismatch {
        /// The checksum calculated from the sentence body
        expected: u8,
        /// The checksum found in the sentence
        found: u8,
        /// Best-effort decode of the sentence, if one was attempted
        decoded: Option<Box<Decoded>>,
    },

    /// No sentence format is defined for the requested sentence id.
    #[error("no matching sentence definition: {0}")]
    UnknownSentence(String),

    /// A formatted latitude or longitude string could not be read.
    #[error("invalid position string {0:?}")]
    InvalidPosition(String),

    /// A coordinate is not a finite number.
    #[error("invalid coordinate {0}")]
    InvalidCoordinate(f64),
}

impl Error {
    /// Returns `true` for errors caused by bad framing of the raw sentence.
    ///
    /// Nothing is decoded or merged when a sentence is malformed.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            Error::NonAscii
                | Error::InvalidLength(_)
                | Error::MissingStart
                | Error::InvalidChecksumField(_)
        )
    }

    /// Takes the best-effort decode out of a [`Error::ChecksumMismatch`].
    pub fn into_decoded(self) -> Option<Decoded> {
        match self {
            Error::ChecksumMismatch {
                decoded: Some(decoded),
                ..
            } => Some(*decoded),
            _ => None,
        }
    }
}
