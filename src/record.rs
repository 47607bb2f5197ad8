//! Raw records flowing between source extractors and model transformers
//!
//! A [`Record`] is a flat mapping of field name to JSON value, produced one
//! at a time by a source extractor and immediately projected onto a catalog
//! model.

use serde_json::{Map, Value};

/// Field name → scalar value
pub type Record = Map<String, Value>;

/// Build a record from `(field, value)` pairs
///
/// # Example
/// ```
/// use catalog_extract::record::record_from;
///
/// let record = record_from([("cluster", "prod"), ("schema", "sales")]);
/// assert_eq!(record["cluster"], "prod");
/// ```
pub fn record_from<K, V, I>(pairs: I) -> Record
where
    K: Into<String>,
    V: Into<Value>,
    I: IntoIterator<Item = (K, V)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Non-null string value of a field
///
/// Numbers and booleans are rendered as strings; null, arrays and objects
/// yield `None`.
pub fn field_str(record: &Record, field: &str) -> Option<String> {
    match record.get(field)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Names of `required` fields with no [`field_str`] value in `record`
///
/// A field counts as missing when it is absent, null, an array or an object.
pub fn missing_fields<'a>(record: &Record, required: &[&'a str]) -> Vec<&'a str> {
    required
        .iter()
        .copied()
        .filter(|field| field_str(record, field).is_none())
        .collect()
}
