//! Records for per-step diagnostics.
//!
//! Environments attach a [`Record`] to every step so that embedding
//! applications can log rewards and parsed game state without depending on
//! the environment's internals.
use crate::error::DelveError;
use chrono::prelude::{DateTime, Local};
use std::collections::{
    hash_map::{IntoIter, Iter, Keys},
    HashMap,
};

/// Represents possible types of values in a [`Record`].
#[derive(Debug, Clone)]
pub enum RecordValue {
    /// Scalar, e.g., reward or a parsed status field.
    Scalar(f32),

    /// DateTime.
    DateTime(DateTime<Local>),

    /// String, e.g., the classified screen kind.
    String(String),
}

#[derive(Debug)]
/// Represents a record.
pub struct Record(HashMap<String, RecordValue>);

impl Record {
    /// Constructs an empty record.
    pub fn empty() -> Self {
        Self(HashMap::new())
    }

    /// Constructs a record from a slice of `(key, value)` pairs.
    pub fn from_slice<K: Into<String> + Clone>(s: &[(K, RecordValue)]) -> Self {
        Self(
            s.iter()
                .map(|(k, v)| (k.clone().into(), v.clone()))
                .collect(),
        )
    }

    /// Constructs a record containing a single scalar value.
    pub fn from_scalar(name: impl Into<String>, value: f32) -> Self {
        Self(HashMap::from([(name.into(), RecordValue::Scalar(value))]))
    }

    /// Gets the value of the given key.
    pub fn get(&self, k: &str) -> Option<&RecordValue> {
        self.0.get(k)
    }

    /// Inserts a key-value pair into the record.
    pub fn insert(&mut self, k: impl Into<String>, v: RecordValue) {
        self.0.insert(k.into(), v);
    }

    /// Returns an iterator over key-value pairs in the record.
    pub fn iter(&self) -> Iter<'_, String, RecordValue> {
        self.0.iter()
    }

    /// Returns an iterator over keys in the record.
    pub fn keys(&self) -> Keys<'_, String, RecordValue> {
        self.0.keys()
    }

    /// Merges records.
    pub fn merge(self, record: Record) -> Self {
        Record(self.0.into_iter().chain(record.0).collect())
    }

    /// Merges records, inplace.
    pub fn merge_inplace(&mut self, record: Record) {
        for (k, v) in record.iter() {
            self.0.insert(k.clone(), v.clone());
        }
    }

    /// Gets scalar value.
    pub fn get_scalar(&self, k: &str) -> Result<f32, DelveError> {
        if let Some(v) = self.0.get(k) {
            match v {
                RecordValue::Scalar(v) => Ok(*v),
                _ => Err(DelveError::RecordValueType(k.to_string())),
            }
        } else {
            Err(DelveError::RecordKeyNotFound(k.to_string()))
        }
    }

    /// Gets string value.
    pub fn get_string(&self, k: &str) -> Result<String, DelveError> {
        if let Some(v) = self.0.get(k) {
            match v {
                RecordValue::String(s) => Ok(s.clone()),
                _ => Err(DelveError::RecordValueType(k.to_string())),
            }
        } else {
            Err(DelveError::RecordKeyNotFound(k.to_string()))
        }
    }

    /// Returns `true` when the record has no entry.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl IntoIterator for Record {
    type Item = (String, RecordValue);
    type IntoIter = IntoIter<String, RecordValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::{Record, RecordValue};

    #[test]
    fn merge_overwrites_and_keeps() {
        let rec1 = Record::from_slice(&[
            ("a", RecordValue::Scalar(0.1)),
            ("b", RecordValue::Scalar(0.2)),
        ]);
        let rec2 = Record::from_slice(&[
            ("b", RecordValue::Scalar(1.2)),
            ("c", RecordValue::String("map_view".into())),
        ]);
        let rec = rec1.merge(rec2);
        assert_eq!(rec.get_scalar("a").unwrap(), 0.1);
        assert_eq!(rec.get_scalar("b").unwrap(), 1.2);
        assert_eq!(rec.get_string("c").unwrap(), "map_view");
    }

    #[test]
    fn typed_access_checks() {
        let rec = Record::from_scalar("reward", -0.1);
        assert!(rec.get_string("reward").is_err());
        assert!(rec.get_scalar("missing").is_err());
    }
}
