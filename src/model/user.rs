use super::CatalogModel;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A catalog user, identified by email
///
/// Fields the model does not name are kept in `other_key_values`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(flatten)]
    pub other_key_values: BTreeMap<String, String>,
}

impl CatalogModel for User {
    const MODEL_NAME: &'static str = "User";

    fn key(&self) -> String {
        self.email.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extra_fields_kept() {
        let user: User = serde_json::from_value(json!({
            "email": "bo@example.com",
            "full_name": "Bo Diaz",
            "first_name": "bdiaz",
            "product": "tableau"
        }))
        .unwrap();

        assert_eq!(user.key(), "bo@example.com");
        assert_eq!(user.full_name.as_deref(), Some("Bo Diaz"));
        assert_eq!(user.last_name, None);
        assert_eq!(user.other_key_values.get("product").map(String::as_str), Some("tableau"));

        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["product"], "tableau");
        assert!(value.get("last_name").is_none());
    }
}
