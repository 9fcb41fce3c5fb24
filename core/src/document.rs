//! Open document model for report records.
//!
//! A [`Document`] is one decoded unit of a multi-document report: a mapping
//! from field names to loosely-typed YAML values. The pipeline interprets a
//! handful of well-known fields (`start_time`, `report_id`, `test_name`,
//! `record_type`) and passes everything else through opaquely.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_yaml::Value;

/// One decoded record document: an open field bag with typed accessors for
/// the fields the pipeline actually reads.
///
/// # Examples
///
/// ```
/// use report_pipeline_core::Document;
/// use serde_yaml::Value;
///
/// let mut doc = Document::new();
/// doc.insert("test_name", "bridge_reachability");
/// doc.insert("start_time", Value::from(1700000000.0));
///
/// assert_eq!(doc.get_str("test_name"), Some("bridge_reachability"));
/// assert_eq!(doc.get_f64("start_time"), Some(1700000000.0));
/// assert_eq!(doc.get_str("missing"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(BTreeMap<String, Value>);

impl Document {
    /// Returns an empty document.
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Number of fields in the document.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` if the document has no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `true` if the document carries the named field.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Raw value of a field, if present.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// String value of a field. `None` if absent or not a string.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    /// Numeric value of a field. `None` if absent or not a number.
    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.0.get(name).and_then(Value::as_f64)
    }

    /// Inserts or replaces a field.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(name.into(), value.into());
    }

    /// Removes a field, returning its previous value.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.0.remove(name)
    }

    /// Overlays `other` onto this document: every field of `other` is
    /// copied in, overriding any field of the same name already present.
    ///
    /// This is the record-merge primitive: entry fields first, then the
    /// header context layered over them, so header-derived fields such as
    /// `report_id` win on conflict.
    pub fn merge_over(&mut self, other: &Document) {
        for (name, value) in &other.0 {
            self.0.insert(name.clone(), value.clone());
        }
    }

    /// Iterates over `(name, value)` pairs in field-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Serializes the document as a single-line JSON object.
    ///
    /// # Errors
    ///
    /// Fails only if a field value cannot be represented in JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl FromIterator<(String, Value)> for Document {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<BTreeMap<String, Value>> for Document {
    fn from(fields: BTreeMap<String, Value>) -> Self {
        Self(fields)
    }
}
