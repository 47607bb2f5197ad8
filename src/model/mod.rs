//! Catalog models produced by the extractors
//!
//! Every model deserializes from a flat [`Record`](crate::record::Record)
//! whose field names match the model's fields exactly, and serializes back
//! to the same shape for downstream loaders.

mod dashboard_owner;
mod dashboard_query;
mod table_owner;
mod user;

pub use dashboard_owner::DashboardOwner;
pub use dashboard_query::DashboardQuery;
pub use table_owner::TableOwner;
pub use user::User;

/// Cluster assigned when a record does not name one
pub const DEFAULT_CLUSTER: &str = "gold";

/// A catalog entity with a stable key
pub trait CatalogModel {
    /// Human readable model name used in logs and errors
    const MODEL_NAME: &'static str;

    /// Key identifying this entity in the catalog
    fn key(&self) -> String;
}

pub(crate) fn default_cluster() -> String {
    DEFAULT_CLUSTER.to_string()
}

/// Key of a dashboard in the catalog
pub fn dashboard_key(product: &str, cluster: &str, group_id: &str, dashboard_id: &str) -> String {
    format!("{product}_dashboard://{cluster}.{group_id}/{dashboard_id}")
}
