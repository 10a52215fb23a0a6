//! Structured pipeline reports.
//!
//! Every processor produces a [`ReportFragment`] holding its parameters and counters. A
//! [`Report`] collects the fragments in registration order behind a metadata section.
//! Serialization lives in [`writer`]; the report itself is just data.
//!
//! The serialized form is a list whose first element is the metadata section and whose
//! following elements each map a processor type to `{name, parameters, output}`:
//!
//! ```text
//! - pairqc: {version: ..., pairs_parsed: 1000}
//! - WindowedQualTrim: {name: QC, parameters: {...}, output: {reads_trimmed: 12, ...}}
//! ```

pub mod writer;

use std::collections::BTreeMap;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

/// A single value in a report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReportValue {
    /// A counter
    Count(u64),
    /// A derived floating point value
    Float(f64),
    /// Free text
    Text(String),
    /// A boolean setting
    Flag(bool),
    /// A frequency table keyed by an integer (e.g. read length)
    Histogram(BTreeMap<usize, u64>),
    /// One frequency table per read position (e.g. quality score distribution)
    PerPosition(Vec<BTreeMap<u8, u64>>),
    /// One value per read position
    Series(Vec<f64>),
}

impl ReportValue {
    /// Returns the counter value, if this is a counter.
    #[must_use]
    pub fn as_count(&self) -> Option<u64> {
        match self {
            Self::Count(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the value rendered for a flat table, or `None` for tabular values.
    #[must_use]
    pub fn as_scalar_string(&self) -> Option<String> {
        match self {
            Self::Count(n) => Some(n.to_string()),
            Self::Float(f) => Some(crate::logging::format_float(*f)),
            Self::Text(s) => Some(s.clone()),
            Self::Flag(b) => Some(b.to_string()),
            Self::Histogram(_) | Self::PerPosition(_) | Self::Series(_) => None,
        }
    }
}

impl From<u64> for ReportValue {
    fn from(value: u64) -> Self {
        Self::Count(value)
    }
}

impl From<usize> for ReportValue {
    fn from(value: usize) -> Self {
        Self::Count(value as u64)
    }
}

impl From<u8> for ReportValue {
    fn from(value: u8) -> Self {
        Self::Count(u64::from(value))
    }
}

impl From<f64> for ReportValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for ReportValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<&str> for ReportValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ReportValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<BTreeMap<usize, u64>> for ReportValue {
    fn from(value: BTreeMap<usize, u64>) -> Self {
        Self::Histogram(value)
    }
}

impl From<Vec<BTreeMap<u8, u64>>> for ReportValue {
    fn from(value: Vec<BTreeMap<u8, u64>>) -> Self {
        Self::PerPosition(value)
    }
}

impl From<Vec<f64>> for ReportValue {
    fn from(value: Vec<f64>) -> Self {
        Self::Series(value)
    }
}

/// An insertion-ordered list of named values, serialized as a map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Entries(Vec<(String, ReportValue)>);

impl Entries {
    /// Creates an empty set of entries.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a value, replacing any existing value with the same key in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ReportValue>) {
        let key = key.into();
        let value = value.into();
        if let Some(slot) = self.0.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.0.push((key, value));
        }
    }

    /// Looks up a value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ReportValue> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Looks up a counter by key.
    #[must_use]
    pub fn count(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(ReportValue::as_count)
    }

    /// Iterates over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ReportValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Entries {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// The report of a single processor.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportFragment {
    /// The processor type (e.g. `WindowedQualTrim`)
    pub processor: &'static str,
    /// The name the stage was registered under
    pub name: String,
    /// Configuration of the stage
    pub parameters: Entries,
    /// Counters and tables accumulated by the stage
    pub output: Entries,
}

impl ReportFragment {
    /// Starts an empty fragment.
    #[must_use]
    pub fn new(processor: &'static str, name: impl Into<String>) -> Self {
        Self { processor, name: name.into(), parameters: Entries::new(), output: Entries::new() }
    }

    /// Adds a parameter.
    #[must_use]
    pub fn parameter(mut self, key: &str, value: impl Into<ReportValue>) -> Self {
        self.parameters.insert(key, value);
        self
    }

    /// Adds an output value.
    #[must_use]
    pub fn output(mut self, key: &str, value: impl Into<ReportValue>) -> Self {
        self.output.insert(key, value);
        self
    }

    /// Looks up an output counter.
    #[must_use]
    pub fn count(&self, key: &str) -> Option<u64> {
        self.output.count(key)
    }
}

/// Serializes the body of a fragment (everything except the processor type).
struct FragmentBody<'a>(&'a ReportFragment);

impl Serialize for FragmentBody<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("name", &self.0.name)?;
        map.serialize_entry("parameters", &self.0.parameters)?;
        map.serialize_entry("output", &self.0.output)?;
        map.end()
    }
}

impl Serialize for ReportFragment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.processor, &FragmentBody(self))?;
        map.end()
    }
}

/// Key of the metadata section in a serialized report.
pub const METADATA_KEY: &str = "pairqc";

/// The aggregated report of a whole pipeline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    /// Run-level information and global counters
    pub metadata: Entries,
    /// One fragment per processor, in registration order
    pub stages: Vec<ReportFragment>,
}

impl Report {
    /// Returns the first stage registered under `name`.
    #[must_use]
    pub fn stage(&self, name: &str) -> Option<&ReportFragment> {
        self.stages.iter().find(|s| s.name == name)
    }
}

impl Serialize for Report {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        struct Metadata<'a>(&'a Entries);
        impl Serialize for Metadata<'_> {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(METADATA_KEY, self.0)?;
                map.end()
            }
        }

        let mut seq = serializer.serialize_seq(Some(self.stages.len() + 1))?;
        seq.serialize_element(&Metadata(&self.metadata))?;
        for stage in &self.stages {
            seq.serialize_element(stage)?;
        }
        seq.end()
    }
}
