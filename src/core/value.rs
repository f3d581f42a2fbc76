// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Reading value type system.
//!
//! Provides a unified value representation for decoded service data
//! readings. All variants are serde-serializable.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Unified value type for decoded service data fields.
///
/// A reading field holds a number, a boolean, a text string, an ordered
/// list of one of those, or a nested [`Reading`]. Numbers are uniformly
/// IEEE `f64`, matching the resolution of every supported wire format.
///
/// Serialization is untagged, so a serialized [`Reading`] is a plain JSON
/// object (`{"temperature": 25.0, ...}`) rather than an enum encoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReadingValue {
    /// Boolean flag (e.g. sensor health)
    Bool(bool),

    /// Numeric value in physical units
    Number(f64),

    /// Text value (names, identifiers, URLs, hex dumps)
    Text(String),

    /// Ordered list of numbers (positions, axes, intervals)
    Numbers(Vec<f64>),

    /// Ordered list of booleans (multi-instance detection flags)
    Bools(Vec<bool>),

    /// Ordered list of strings (device identifiers)
    Texts(Vec<String>),

    /// Nested reading (composite structures such as signatures)
    Nested(Reading),
}

impl ReadingValue {
    /// Check if this value is numeric.
    pub fn is_number(&self) -> bool {
        matches!(self, ReadingValue::Number(_))
    }

    /// Check if this value is a list variant.
    pub fn is_list(&self) -> bool {
        matches!(
            self,
            ReadingValue::Numbers(_) | ReadingValue::Bools(_) | ReadingValue::Texts(_)
        )
    }

    /// Try to get the numeric value.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ReadingValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get the boolean value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ReadingValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get the inner string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ReadingValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get the inner number list.
    pub fn as_numbers(&self) -> Option<&[f64]> {
        match self {
            ReadingValue::Numbers(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get the inner boolean list.
    pub fn as_bools(&self) -> Option<&[bool]> {
        match self {
            ReadingValue::Bools(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get the inner string list.
    pub fn as_texts(&self) -> Option<&[String]> {
        match self {
            ReadingValue::Texts(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get the nested reading.
    pub fn as_reading(&self) -> Option<&Reading> {
        match self {
            ReadingValue::Nested(r) => Some(r),
            _ => None,
        }
    }
}

impl From<f64> for ReadingValue {
    fn from(v: f64) -> Self {
        ReadingValue::Number(v)
    }
}

impl From<bool> for ReadingValue {
    fn from(v: bool) -> Self {
        ReadingValue::Bool(v)
    }
}

impl From<&str> for ReadingValue {
    fn from(v: &str) -> Self {
        ReadingValue::Text(v.to_string())
    }
}

impl From<String> for ReadingValue {
    fn from(v: String) -> Self {
        ReadingValue::Text(v)
    }
}

impl From<Vec<f64>> for ReadingValue {
    fn from(v: Vec<f64>) -> Self {
        ReadingValue::Numbers(v)
    }
}

impl From<Vec<bool>> for ReadingValue {
    fn from(v: Vec<bool>) -> Self {
        ReadingValue::Bools(v)
    }
}

impl From<Vec<String>> for ReadingValue {
    fn from(v: Vec<String>) -> Self {
        ReadingValue::Texts(v)
    }
}

impl From<Reading> for ReadingValue {
    fn from(v: Reading) -> Self {
        ReadingValue::Nested(v)
    }
}

impl fmt::Display for ReadingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadingValue::Bool(v) => write!(f, "{v}"),
            ReadingValue::Number(v) => write!(f, "{v}"),
            ReadingValue::Text(v) => write!(f, "\"{v}\""),
            ReadingValue::Numbers(v) => write!(f, "[{} numbers]", v.len()),
            ReadingValue::Bools(v) => write!(f, "[{} booleans]", v.len()),
            ReadingValue::Texts(v) => write!(f, "[{} strings]", v.len()),
            ReadingValue::Nested(v) => write!(f, "{{{} fields}}", v.len()),
        }
    }
}

// =============================================================================
// Reading
// =============================================================================

/// A decoded service data reading: an insertion-ordered mapping from
/// semantic field name to [`ReadingValue`].
///
/// Field order is the order in which the decoder produced the fields, so a
/// serialized reading matches the field layout of the wire format that
/// produced it. Re-inserting an existing field replaces its value in place
/// without moving it.
///
/// Readings are built up by a single decode call and are not mutated after
/// the call returns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Reading {
    fields: Vec<(String, ReadingValue)>,
}

impl Reading {
    /// Create a new empty reading.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of fields in this reading.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if this reading has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Check if a field is present.
    pub fn contains_field(&self, name: &str) -> bool {
        self.fields.iter().any(|(n, _)| n == name)
    }

    /// Get a field value by name.
    pub fn get(&self, name: &str) -> Option<&ReadingValue> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|(n, _)| n == name)
    }

    /// Insert a field, replacing any existing value in place.
    ///
    /// A replaced field keeps its original position; a new field is
    /// appended.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ReadingValue>) {
        let name = name.into();
        let value = value.into();
        match self.position(&name) {
            Some(index) => self.fields[index].1 = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Remove a field, returning its value if it was present.
    pub fn remove(&mut self, name: &str) -> Option<ReadingValue> {
        let index = self.position(name)?;
        Some(self.fields.remove(index).1)
    }

    /// Append a number to a list field, creating the list if absent.
    pub fn push_number(&mut self, name: &str, value: f64) {
        match self.position(name) {
            Some(index) => match &mut self.fields[index].1 {
                ReadingValue::Numbers(list) => list.push(value),
                other => *other = ReadingValue::Numbers(vec![value]),
            },
            None => self
                .fields
                .push((name.to_string(), ReadingValue::Numbers(vec![value]))),
        }
    }

    /// Append a boolean to a list field, creating the list if absent.
    pub fn push_bool(&mut self, name: &str, value: bool) {
        match self.position(name) {
            Some(index) => match &mut self.fields[index].1 {
                ReadingValue::Bools(list) => list.push(value),
                other => *other = ReadingValue::Bools(vec![value]),
            },
            None => self
                .fields
                .push((name.to_string(), ReadingValue::Bools(vec![value]))),
        }
    }

    /// Append a string to a list field, creating the list if absent.
    pub fn push_text(&mut self, name: &str, value: String) {
        match self.position(name) {
            Some(index) => match &mut self.fields[index].1 {
                ReadingValue::Texts(list) => list.push(value),
                other => *other = ReadingValue::Texts(vec![value]),
            },
            None => self
                .fields
                .push((name.to_string(), ReadingValue::Texts(vec![value]))),
        }
    }

    /// Merge another reading into this one, field by field.
    ///
    /// Collisions are last-write-wins; stream decoders with other
    /// reconciliation rules handle those fields before merging.
    pub fn merge(&mut self, other: Reading) {
        for (name, value) in other {
            self.insert(name, value);
        }
    }

    /// Iterate fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ReadingValue)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Iterate field names in insertion order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    /// Serialize this reading to a JSON object string, fields in
    /// insertion order.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

impl IntoIterator for Reading {
    type Item = (String, ReadingValue);
    type IntoIter = std::vec::IntoIter<(String, ReadingValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl Serialize for Reading {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Reading {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ReadingVisitor;

        impl<'de> Visitor<'de> for ReadingVisitor {
            type Value = Reading;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of reading fields")
            }

            fn visit_map<A>(self, mut access: A) -> std::result::Result<Reading, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut reading = Reading::new();
                while let Some((name, value)) = access.next_entry::<String, ReadingValue>()? {
                    reading.insert(name, value);
                }
                Ok(reading)
            }
        }

        deserializer.deserialize_map(ReadingVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let mut reading = Reading::new();
        reading.insert("temperature", 25.0);
        reading.insert("isHealthy", true);
        reading.insert("name", "sensor");

        assert_eq!(reading.len(), 3);
        assert_eq!(reading.get("temperature").and_then(|v| v.as_f64()), Some(25.0));
        assert_eq!(reading.get("isHealthy").and_then(|v| v.as_bool()), Some(true));
        assert_eq!(reading.get("name").and_then(|v| v.as_str()), Some("sensor"));
        assert!(reading.get("missing").is_none());
    }

    #[test]
    fn test_insert_preserves_order() {
        let mut reading = Reading::new();
        reading.insert("a", 1.0);
        reading.insert("b", 2.0);
        reading.insert("c", 3.0);
        // Replacing keeps the original position
        reading.insert("a", 9.0);

        let names: Vec<&str> = reading.field_names().collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(reading.get("a").and_then(|v| v.as_f64()), Some(9.0));
    }

    #[test]
    fn test_remove() {
        let mut reading = Reading::new();
        reading.insert("a", 1.0);
        reading.insert("b", 2.0);

        assert_eq!(reading.remove("a"), Some(ReadingValue::Number(1.0)));
        assert_eq!(reading.remove("a"), None);
        assert_eq!(reading.len(), 1);
    }

    #[test]
    fn test_push_number_creates_then_appends() {
        let mut reading = Reading::new();
        reading.push_number("acceleration", 0.5);
        reading.push_number("acceleration", -0.5);

        assert_eq!(
            reading.get("acceleration").and_then(|v| v.as_numbers()),
            Some(&[0.5, -0.5][..])
        );
    }

    #[test]
    fn test_push_bool_and_text() {
        let mut reading = Reading::new();
        reading.push_bool("isMotionDetected", true);
        reading.push_bool("isMotionDetected", false);
        reading.push_text("deviceIds", "001122334455/2".to_string());

        assert_eq!(
            reading.get("isMotionDetected").and_then(|v| v.as_bools()),
            Some(&[true, false][..])
        );
        assert_eq!(
            reading.get("deviceIds").and_then(|v| v.as_texts()).map(|t| t.len()),
            Some(1)
        );
    }

    #[test]
    fn test_merge_last_write_wins() {
        let mut a = Reading::new();
        a.insert("x", 1.0);
        a.insert("y", 2.0);

        let mut b = Reading::new();
        b.insert("y", 9.0);
        b.insert("z", 3.0);

        a.merge(b);
        assert_eq!(a.get("x").and_then(|v| v.as_f64()), Some(1.0));
        assert_eq!(a.get("y").and_then(|v| v.as_f64()), Some(9.0));
        assert_eq!(a.get("z").and_then(|v| v.as_f64()), Some(3.0));
    }

    #[test]
    fn test_serialize_preserves_order() {
        let mut reading = Reading::new();
        reading.insert("txPower", -4.0);
        reading.insert("namespace", "00112233445566778899");
        reading.insert("instance", "aabbccddeeff");

        let json = serde_json::to_string(&reading).unwrap();
        assert_eq!(
            json,
            "{\"txPower\":-4.0,\"namespace\":\"00112233445566778899\",\
             \"instance\":\"aabbccddeeff\"}"
        );
    }

    #[test]
    fn test_to_json() {
        let mut reading = Reading::new();
        reading.insert("temperature", 25.0);
        reading.insert("isHealthy", true);
        assert_eq!(reading.to_json(), "{\"temperature\":25.0,\"isHealthy\":true}");
    }

    #[test]
    fn test_round_trip() {
        let mut nested = Reading::new();
        nested.insert("timestamp", 1688328591.0);

        let mut reading = Reading::new();
        reading.insert("position", vec![-73.57121, 45.50887]);
        reading.insert("isContactDetected", vec![true]);
        reading.insert("signature", nested);

        let json = serde_json::to_string(&reading).unwrap();
        let decoded: Reading = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, reading);
    }

    #[test]
    fn test_value_accessors() {
        assert_eq!(ReadingValue::Number(1.5).as_f64(), Some(1.5));
        assert_eq!(ReadingValue::Number(1.5).as_bool(), None);
        assert_eq!(ReadingValue::Bool(true).as_bool(), Some(true));
        assert!(ReadingValue::Numbers(vec![1.0]).is_list());
        assert!(!ReadingValue::Number(1.0).is_list());
        assert!(ReadingValue::Nested(Reading::new()).as_reading().is_some());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", ReadingValue::Number(25.0)), "25");
        assert_eq!(format!("{}", ReadingValue::Bool(false)), "false");
        assert_eq!(format!("{}", ReadingValue::Text("a".into())), "\"a\"");
        assert_eq!(
            format!("{}", ReadingValue::Numbers(vec![1.0, 2.0])),
            "[2 numbers]"
        );
    }
}
