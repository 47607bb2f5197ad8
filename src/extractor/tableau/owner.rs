//! Dashboard owners from Tableau workbooks

use super::graphql::{TableauExtractor, Workbook, WorkbookQuery, sanitize_workbook_name};
use crate::client::TableauConfig;
use crate::model::DashboardOwner;
use crate::record::{Record, record_from};

/// Extracts the owner of every workbook as a [`DashboardOwner`]
///
/// Workbooks in excluded projects are dropped. Workbooks whose project or
/// name is hidden (null) are skipped with a warning, as are workbooks with
/// no owner email.
///
/// # Example
/// ```no_run
/// use catalog_extract::client::{PersonalAccessToken, TableauClient, TableauConfig};
/// use catalog_extract::etl::Extractor;
/// use catalog_extract::extractor::TableauDashboardOwnerExtractor;
///
/// # async fn example(config: TableauConfig) -> eyre::Result<()> {
/// let token = PersonalAccessToken::new("catalog", "secret");
/// let client = TableauClient::sign_in(&config, &token).await?;
/// let mut extractor = TableauDashboardOwnerExtractor::new(client, config);
/// while let Some(owner) = extractor.extract().await? {
///     println!("{} owns {}", owner.email, owner.dashboard_id);
/// }
/// # Ok(())
/// # }
/// ```
pub type TableauDashboardOwnerExtractor<S> = TableauExtractor<S, OwnerQuery>;

#[derive(Debug, Default, Clone, Copy)]
pub struct OwnerQuery;

impl WorkbookQuery for OwnerQuery {
    type Model = DashboardOwner;

    const SCOPE: &'static str = "extractor.tableau_dashboard_owner";

    const QUERY: &'static str = r#"query {
        workbooks {
            name
            projectName
            owner {
                email
            }
            projectVizportalUrlId
            vizportalUrlId
        }
    }"#;

    fn records(&self, config: &TableauConfig, workbooks: Vec<Workbook>) -> Vec<Record> {
        workbooks
            .into_iter()
            .filter(|w| {
                w.project_name
                    .as_deref()
                    .is_none_or(|project| !config.is_excluded(project))
            })
            .filter_map(|w| {
                let Some((project, name)) = w.project_and_name() else {
                    log::warn!(
                        "Ignoring workbook (ID:{}) in project (ID:{}) because of a lack of permission",
                        w.vizportal_url_id.as_deref().unwrap_or("unknown"),
                        w.project_vizportal_url_id.as_deref().unwrap_or("unknown"),
                    );
                    return None;
                };
                let Some(email) = w.owner.as_ref().and_then(|o| o.email.as_deref()) else {
                    log::warn!("Ignoring workbook '{}' in project '{}' without an owner email", name, project);
                    return None;
                };
                Some(record_from([
                    ("cluster", config.cluster.clone()),
                    ("dashboard_group_id", project.to_string()),
                    ("dashboard_id", sanitize_workbook_name(name)),
                    ("email", email.to_string()),
                ]))
            })
            .collect()
    }
}
