//! Record-to-model transformer
//!
//! Projects a flat [`Record`] onto a typed catalog model. Field names in the
//! record must match the model's fields; models that reject unknown fields
//! fail the transformation rather than silently dropping data.

use crate::etl::Transformer;
use crate::model::CatalogModel;
use crate::record::Record;
use eyre::{Context, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::marker::PhantomData;

/// Transformer that deserializes records into model `M`
///
/// # Example
/// ```
/// use catalog_extract::etl::Transformer;
/// use catalog_extract::model::DashboardOwner;
/// use catalog_extract::record::record_from;
/// use catalog_extract::transform::RecordToModel;
///
/// let transformer = RecordToModel::<DashboardOwner>::new();
/// let owner = transformer
///     .transform(record_from([
///         ("dashboard_group_id", "Finance"),
///         ("dashboard_id", "Revenue"),
///         ("email", "ana@example.com"),
///     ]))
///     .unwrap();
/// assert_eq!(owner.email, "ana@example.com");
/// ```
pub struct RecordToModel<M> {
    _model: PhantomData<fn() -> M>,
}

impl<M> Default for RecordToModel<M> {
    fn default() -> Self {
        Self {
            _model: PhantomData,
        }
    }
}

impl<M> RecordToModel<M> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<M> Transformer for RecordToModel<M>
where
    M: CatalogModel + DeserializeOwned + Send,
{
    type Input = Record;
    type Output = M;

    fn transform(&self, input: Self::Input) -> Result<Self::Output> {
        log::trace!("Projecting record onto {}: {:?}", M::MODEL_NAME, input);
        serde_json::from_value(Value::Object(input))
            .with_context(|| format!("Failed to build {} from record", M::MODEL_NAME))
    }
}
