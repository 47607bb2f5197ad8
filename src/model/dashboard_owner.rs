use super::{CatalogModel, dashboard_key, default_cluster};
use serde::{Deserialize, Serialize};

/// Owner (by email) of a dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DashboardOwner {
    pub dashboard_group_id: String,
    pub dashboard_id: String,
    pub email: String,
    #[serde(default)]
    pub product: String,
    #[serde(default = "default_cluster")]
    pub cluster: String,
}

impl DashboardOwner {
    /// Key of the owned dashboard
    pub fn dashboard_key(&self) -> String {
        dashboard_key(
            &self.product,
            &self.cluster,
            &self.dashboard_group_id,
            &self.dashboard_id,
        )
    }
}

impl CatalogModel for DashboardOwner {
    const MODEL_NAME: &'static str = "DashboardOwner";

    fn key(&self) -> String {
        format!("{}/owner/{}", self.dashboard_key(), self.email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_and_keys() {
        let owner: DashboardOwner = serde_json::from_value(json!({
            "dashboard_group_id": "Finance",
            "dashboard_id": "Quarterly Revenue",
            "email": "ana@example.com"
        }))
        .unwrap();

        assert_eq!(owner.cluster, "gold");
        assert_eq!(owner.product, "");
        assert_eq!(
            owner.dashboard_key(),
            "_dashboard://gold.Finance/Quarterly Revenue"
        );
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result = serde_json::from_value::<DashboardOwner>(json!({
            "dashboard_group_id": "Finance",
            "dashboard_id": "Revenue",
            "email": "ana@example.com",
            "mail": "typo@example.com"
        }));
        assert!(result.is_err());
    }
}
