//! Catalog Extract
//!
//! Extractors that pull metadata from Tableau and Snowflake and shape it
//! into data catalog models

pub mod cli;
pub mod client;
pub mod config;
pub mod etl;
pub mod extractor;
pub mod model;
pub mod record;
pub mod storage;
pub mod transform;

// Re-exports for convenience
pub use client::{GraphQlSource, SnowflakeClient, SqlSource, TableauClient};
pub use config::ConfigTree;
pub use etl::{Extractor, IdentityTransformer, Loader, ModelExtractor, Pipeline, Transformer};
pub use extractor::{
    SnowflakeTableOwnerExtractor, TableauDashboardOwnerExtractor, TableauDashboardUserExtractor,
    TableauDashboardViewExtractor,
};
pub use record::Record;
pub use storage::NdjsonWriter;
