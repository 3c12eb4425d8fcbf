//! Student metrics record supplied to the prediction engine.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Named numeric metrics for one student in one course.
///
/// Values are kept as loose JSON so that records arriving from a request body
/// can be fed in untouched; coercion to `f64` happens at lookup time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricsRecord(BTreeMap<String, Value>);

impl MetricsRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Numeric value for `key`, 0.0 when missing or not coercible.
    pub fn value_or_zero(&self, key: &str) -> f64 {
        match self.0.get(key) {
            None | Some(Value::Null) => 0.0,
            Some(value) => coerce(value).unwrap_or_else(|| {
                tracing::warn!("Metric {} has non-numeric value {}, using 0", key, value);
                0.0
            }),
        }
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for MetricsRecord {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        let mut record = Self::new();
        for (key, value) in iter {
            record.insert(key, value);
        }
        record
    }
}

/// Coerce a JSON value to a finite float: numbers, numeric strings and booleans.
fn coerce(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}
