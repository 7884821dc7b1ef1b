use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    Error,
    nmea0183::{checksum_hex, frame},
    sentences::Sentences,
    template::TypeTag,
};

/// Variable name to decoded value.
pub type VariableMap = HashMap<String, String>;

/// Type tag to decoded value, collected during one decode.
pub type TagMap = HashMap<TypeTag, String>;

/// The address field of a sentence.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Header {
    /// Two-character talker id as on the wire, e.g. `GP`
    pub talker: String,
    /// Sentence id in lower case, e.g. `rmc`
    pub sentence: String,
}

/// Result of decoding one sentence.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Decoded {
    /// Talker and sentence id
    pub header: Header,
    /// Every variable bound by the sentence format, empty when its fields were
    /// empty or malformed
    pub values: VariableMap,
    /// Non-empty values whose template carries a type tag
    pub tags: TagMap,
}

impl Sentences {
    /// Decodes a raw sentence into variable values.
    ///
    /// * A malformed sentence (length, `$`, non-ASCII, checksum digits) fails
    ///   and nothing is decoded.
    /// * A sentence id without a format decodes to an empty map.
    /// * A checksum mismatch still decodes; the result is returned inside
    ///   [`Error::ChecksumMismatch`] (see [`Error::into_decoded`]).
    /// * A variable whose fields run past the end of the sentence is recorded
    ///   as empty and ends the decode.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use nmea0183_codec::{Error, Sentences};
    ///
    /// let sentences = Sentences::default();
    ///
    /// let decoded = sentences.decode("$GPZDA,110910.59,15,09,2020,01,30*6D").unwrap();
    /// assert_eq!(decoded.values["datetime"], "2020-09-15T11:09:10.59+01:30");
    ///
    /// let err = sentences.decode("$GPZDA,110910.59,15,09,2020,01,30*00").unwrap_err();
    /// assert!(matches!(err, Error::ChecksumMismatch { expected: 0x6D, found: 0x00, .. }));
    /// let decoded = err.into_decoded().unwrap();
    /// assert_eq!(decoded.values["datetime"], "2020-09-15T11:09:10.59+01:30");
    /// ```
    pub fn decode(&self, raw: &str) -> Result<Decoded, Error> {
        let frame = frame(raw)?;
        let decoded = self.decode_body(frame.body())?;

        match frame.verify() {
            Err(Error::ChecksumMismatch {
                expected, found, ..
            }) => {
                warn!(
                    expected,
                    found,
                    sentence = %decoded.header.sentence,
                    "check sum error"
                );
                Err(Error::ChecksumMismatch {
                    expected,
                    found,
                    decoded: Some(Box::new(decoded)),
                })
            }
            Err(e) => Err(e),
            Ok(()) => Ok(decoded),
        }
    }

    fn decode_body(&self, body: &str) -> Result<Decoded, Error> {
        let tokens: Vec<&str> = body.split(',').collect();
        let address = tokens.first().copied().unwrap_or_default();
        let (talker, sentence) = address.split_at_checked(2).ok_or(Error::MissingStart)?;

        let mut decoded = Decoded {
            header: Header {
                talker: talker.to_string(),
                sentence: sentence.to_lowercase(),
            },
            ..Default::default()
        };

        let Some(names) = self.format(&decoded.header.sentence) else {
            debug!(sentence = %decoded.header.sentence, "no sentence definition, ignored");
            return Ok(decoded);
        };

        let mut pointer = 1;
        for name in names {
            let Some(variable) = self.variable(name) else {
                pointer += 1;
                continue;
            };

            let count = variable.group().token_count();
            let Some(fields) = tokens.get(pointer..pointer + count) else {
                debug!(
                    variable = %name,
                    needed = count,
                    available = tokens.len().saturating_sub(pointer),
                    "field underflow"
                );
                decoded.values.insert(name.clone(), String::new());
                break;
            };

            let value = variable.group().decode(fields);
            if let Some(tag) = variable.group().tag()
                && !value.is_empty()
            {
                decoded.tags.insert(tag, value.clone());
            }
            decoded.values.insert(name.clone(), value);
            pointer += count;
        }

        Ok(decoded)
    }

    /// Encodes variable values into a complete sentence, checksum included.
    ///
    /// Variables without a value (or with an empty one) are written as blank
    /// fields, keeping every column in place. Only an undefined sentence id
    /// is an error.
    pub fn encode(
        &self,
        sentence: &str,
        talker: &str,
        values: &VariableMap,
    ) -> Result<String, Error> {
        self.encode_with(sentence, talker, |name| {
            values.get(name).map(String::as_str)
        })
    }

    /// Like [`encode`](Self::encode), reading each variable through `lookup`.
    pub fn encode_with<'v, F>(
        &self,
        sentence: &str,
        talker: &str,
        mut lookup: F,
    ) -> Result<String, Error>
    where
        F: FnMut(&str) -> Option<&'v str>,
    {
        let names = self
            .format(sentence)
            .ok_or_else(|| Error::UnknownSentence(sentence.to_string()))?;

        let mut out = format!("${}{}", talker.to_uppercase(), sentence.to_uppercase());

        for name in names {
            let Some(variable) = self.variable(name) else {
                out.push(',');
                continue;
            };

            let group = variable.group();
            let tokens = match lookup(name).filter(|value| !value.is_empty()) {
                Some(value) => group.encode(value).unwrap_or_else(|| {
                    debug!(variable = %name, value, "value does not fit its template, left blank");
                    vec![String::new(); group.token_count()]
                }),
                None => vec![String::new(); group.token_count()],
            };

            for token in tokens {
                out.push(',');
                out.push_str(&token);
            }
        }

        let cc = checksum_hex(&out);
        out.push('*');
        out.push_str(&cc);

        Ok(out)
    }
}
