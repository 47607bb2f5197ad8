//! Catalog users from Tableau workbook owners

use super::graphql::{TableauExtractor, Workbook, WorkbookQuery};
use crate::client::TableauConfig;
use crate::model::User;
use crate::record::Record;
use serde_json::Value;

/// Extracts the owner of every workbook as a catalog [`User`]
///
/// The Tableau username lands in `first_name` and the display name in
/// `full_name`. One user is emitted per workbook, so owners of several
/// workbooks appear more than once.
pub type TableauDashboardUserExtractor<S> = TableauExtractor<S, UserQuery>;

#[derive(Debug, Default, Clone, Copy)]
pub struct UserQuery;

impl WorkbookQuery for UserQuery {
    type Model = User;

    const SCOPE: &'static str = "extractor.tableau_dashboard_user";

    const QUERY: &'static str = r#"query {
        workbooks {
            owner {
                username
                name
                email
            }
        }
    }"#;

    fn records(&self, _config: &TableauConfig, workbooks: Vec<Workbook>) -> Vec<Record> {
        workbooks
            .into_iter()
            .filter_map(|w| {
                let owner = w.owner?;
                let Some(email) = owner.email else {
                    log::warn!(
                        "Ignoring workbook owner '{}' without an email",
                        owner.username.as_deref().unwrap_or("unknown")
                    );
                    return None;
                };
                let mut record = Record::new();
                record.insert("email".to_string(), Value::String(email));
                record.insert("full_name".to_string(), owner.name.into());
                record.insert("first_name".to_string(), owner.username.into());
                Some(record)
            })
            .collect()
    }
}
