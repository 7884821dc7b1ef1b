//! # Sentence Definitions
//!
//! A [`Sentences`] value holds the two tables that drive the codec:
//!
//! * *formats*: sentence id (lower case, e.g. `rmc`) to the ordered list of
//!   variable names bound to its fields, with `n/a` marking a field that binds
//!   nothing;
//! * *variables*: variable name to its template key (see [`crate::template`]).
//!
//! Template keys are resolved when the tables are built. After that the tables
//! are read-only and can be shared between any number of
//! [`Handle`](crate::Handle)s and threads behind an [`Arc`](std::sync::Arc).

mod codec;
mod defaults;

use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::template::Group;

pub use codec::{Decoded, Header, TagMap, VariableMap};

/// Placeholder for a field that exists on the wire but binds no variable.
pub const NOT_APPLICABLE: &str = "n/a";

/// The plain form of the definition tables, as handed over by a config loader.
///
/// With the `serde` feature enabled this is what (de)serializes, e.g. from:
///
/// ```yaml
/// formats:
///   hdm: [hdm]
/// variables:
///   hdm: "x.x,T"
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Tables {
    /// Sentence id to variable names
    pub formats: HashMap<String, Vec<String>>,
    /// Variable name to comma-joined template key
    pub variables: HashMap<String, String>,
}

/// A variable's resolved definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    name: String,
    group: Group,
}

impl Variable {
    /// The variable name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The resolved template group.
    pub fn group(&self) -> &Group {
        &self.group
    }
}

/// Sentence formats and variable definitions, resolved and immutable.
///
/// # Examples
///
/// ```rust
/// use nmea0183_codec::Sentences;
///
/// let sentences = Sentences::new()
///     .with_format("hdm", ["hdm"])
///     .with_variable("hdm", "x.x,T");
///
/// let decoded = sentences.decode("$HCHDM,172.5,M*28").unwrap();
/// assert_eq!(decoded.header.talker, "HC");
/// assert_eq!(decoded.header.sentence, "hdm");
/// assert_eq!(decoded.values["hdm"], "172.5,M");
///
/// let sentence = sentences.encode("hdm", "HC", &decoded.values).unwrap();
/// assert_eq!(sentence, "$HCHDM,172.5,M*28");
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "Tables", into = "Tables"))]
#[derive(Debug, Clone, PartialEq)]
pub struct Sentences {
    formats: HashMap<String, Vec<String>>,
    variables: HashMap<String, Variable>,
}

impl Sentences {
    /// Creates empty tables.
    pub fn new() -> Self {
        Sentences {
            formats: HashMap::new(),
            variables: HashMap::new(),
        }
    }

    /// Builds the tables from a format table and a variable table.
    ///
    /// Sentence ids are normalized to lower case.
    pub fn from_tables(tables: Tables) -> Self {
        let formats = tables
            .formats
            .into_iter()
            .map(|(id, names)| (id.to_lowercase(), names))
            .collect();

        let variables = tables
            .variables
            .into_iter()
            .map(|(name, key)| {
                let group = Group::resolve(&key);
                (name.clone(), Variable { name, group })
            })
            .collect();

        Sentences { formats, variables }
    }

    /// Adds or replaces a sentence format.
    pub fn with_format<I, S>(mut self, sentence: &str, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.formats.insert(
            sentence.to_lowercase(),
            names.into_iter().map(Into::into).collect(),
        );
        self
    }

    /// Adds or replaces a variable definition.
    pub fn with_variable(mut self, name: &str, key: &str) -> Self {
        self.variables.insert(
            name.to_string(),
            Variable {
                name: name.to_string(),
                group: Group::resolve(key),
            },
        );
        self
    }

    /// The variable names bound by a sentence, if the sentence is defined.
    pub fn format(&self, sentence: &str) -> Option<&[String]> {
        self.formats
            .get(&sentence.to_lowercase())
            .map(Vec::as_slice)
    }

    /// The definition of a variable, if any.
    ///
    /// The `n/a` placeholder never resolves to a variable.
    pub fn variable(&self, name: &str) -> Option<&Variable> {
        if name == NOT_APPLICABLE {
            return None;
        }
        self.variables.get(name)
    }

    /// Iterates over the defined sentence ids.
    pub fn sentence_ids(&self) -> impl Iterator<Item = &str> {
        self.formats.keys().map(String::as_str)
    }

    /// Converts back to the plain table form.
    pub fn to_tables(&self) -> Tables {
        Tables {
            formats: self.formats.clone(),
            variables: self
                .variables
                .iter()
                .map(|(name, variable)| (name.clone(), variable.group.key().to_string()))
                .collect(),
        }
    }
}

impl Default for Sentences {
    /// The built-in tables covering AAM, APA, APB, DPT, HDG, HDM, RMC, VHW,
    /// VLW and ZDA.
    fn default() -> Self {
        Sentences::from_tables(defaults::tables())
    }
}

impl From<Tables> for Sentences {
    fn from(tables: Tables) -> Self {
        Sentences::from_tables(tables)
    }
}

impl From<Sentences> for Tables {
    fn from(sentences: Sentences) -> Self {
        sentences.to_tables()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_lowercased() {
        let mut tables = Tables::default();
        tables
            .formats
            .insert("ZDA".to_string(), vec!["datetime".to_string()]);
        tables
            .variables
            .insert("datetime".to_string(), "hhmmss,day,month,year,tz".to_string());

        let sentences = Sentences::from_tables(tables);
        assert!(sentences.format("zda").is_some());
        assert!(sentences.format("ZDA").is_some());
        assert_eq!(sentences.sentence_ids().collect::<Vec<_>>(), ["zda"]);
    }

    #[test]
    fn test_not_applicable_never_resolves() {
        let sentences = Sentences::new().with_variable(NOT_APPLICABLE, "x.x");
        assert!(sentences.variable(NOT_APPLICABLE).is_none());
    }

    #[test]
    fn test_tables_round_trip() {
        let sentences = Sentences::default();
        let rebuilt = Sentences::from_tables(sentences.to_tables());
        assert_eq!(rebuilt, sentences);
    }

    #[test]
    fn test_tables_are_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Sentences>();
    }
}
