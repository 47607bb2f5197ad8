//! Static field enrichment
//!
//! Merges a fixed set of fields into every record, overwriting values the
//! record already carries.

use crate::etl::Transformer;
use crate::record::Record;
use eyre::Result;

/// Transformer that merges static fields into each record
///
/// # Example
/// ```
/// use catalog_extract::etl::Transformer;
/// use catalog_extract::record::record_from;
/// use catalog_extract::transform::StaticFields;
///
/// let enrich = StaticFields::new(record_from([("product", "tableau")]));
/// let record = enrich.transform(record_from([("email", "ana@example.com")])).unwrap();
/// assert_eq!(record["product"], "tableau");
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticFields {
    fields: Record,
}

impl StaticFields {
    pub fn new(fields: Record) -> Self {
        Self { fields }
    }

    /// Apply the static fields to a record in place
    pub fn apply(&self, record: &mut Record) {
        for (key, value) in &self.fields {
            record.insert(key.clone(), value.clone());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Transformer for StaticFields {
    type Input = Record;
    type Output = Record;

    fn transform(&self, mut input: Self::Input) -> Result<Self::Output> {
        self.apply(&mut input);
        Ok(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::record_from;

    #[test]
    fn test_static_fields_overwrite() {
        let enrich = StaticFields::new(record_from([("product", "tableau")]));
        let output = enrich
            .transform(record_from([("product", "other"), ("email", "a@b.c")]))
            .unwrap();
        assert_eq!(output["product"], "tableau");
        assert_eq!(output["email"], "a@b.c");
        assert_eq!(output.len(), 2);
    }

    #[test]
    fn test_empty_static_fields_pass_through() {
        let enrich = StaticFields::default();
        assert!(enrich.is_empty());
        let output = enrich.transform(record_from([("a", 1)])).unwrap();
        assert_eq!(output, record_from([("a", 1)]));
    }
}
