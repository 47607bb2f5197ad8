//! Record transformers
//!
//! [`RecordToModel`] projects raw records onto catalog models and
//! [`StaticFields`] merges fixed fields into every record.

mod record_to_model;
mod static_fields;

pub use record_to_model::RecordToModel;
pub use static_fields::StaticFields;
