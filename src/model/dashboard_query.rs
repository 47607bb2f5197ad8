use super::{CatalogModel, dashboard_key, default_cluster};
use serde::{Deserialize, Serialize};

/// A query (for Tableau, a view) attached to a dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DashboardQuery {
    pub dashboard_group_id: String,
    pub dashboard_id: String,
    pub query_name: String,
    pub query_id: String,
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_text: Option<String>,
    #[serde(default)]
    pub product: String,
    #[serde(default = "default_cluster")]
    pub cluster: String,
}

impl CatalogModel for DashboardQuery {
    const MODEL_NAME: &'static str = "DashboardQuery";

    fn key(&self) -> String {
        format!(
            "{}/query/{}",
            dashboard_key(
                &self.product,
                &self.cluster,
                &self.dashboard_group_id,
                &self.dashboard_id
            ),
            self.query_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_key() {
        let query: DashboardQuery = serde_json::from_value(json!({
            "dashboard_group_id": "Sales",
            "dashboard_id": "Pipeline",
            "query_name": "0. Overview",
            "query_id": "view-1",
            "product": "tableau",
            "cluster": "prod"
        }))
        .unwrap();

        assert_eq!(query.url, "");
        assert_eq!(query.query_text, None);
        assert_eq!(
            query.key(),
            "tableau_dashboard://prod.Sales/Pipeline/query/view-1"
        );
    }
}
