use super::{CatalogModel, default_cluster};
use serde::{Deserialize, Serialize};

/// Owners of a database table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableOwner {
    pub db_name: String,
    pub schema: String,
    pub table_name: String,
    pub owners: Vec<String>,
    #[serde(default = "default_cluster")]
    pub cluster: String,
}

impl TableOwner {
    /// Key of the owned table
    pub fn table_key(&self) -> String {
        format!(
            "{}://{}.{}/{}",
            self.db_name, self.cluster, self.schema, self.table_name
        )
    }
}

impl CatalogModel for TableOwner {
    const MODEL_NAME: &'static str = "TableOwner";

    fn key(&self) -> String {
        self.table_key()
    }
}
