//! Dashboard queries from Tableau workbook views

use super::graphql::{TableauExtractor, Workbook, WorkbookQuery, sanitize_workbook_name};
use crate::client::TableauConfig;
use crate::model::DashboardQuery;
use crate::record::{Record, record_from};

/// Extracts every view of every workbook as a [`DashboardQuery`]
///
/// The query text and URL both point at the view in the Tableau web UI:
/// `{tableau_base_url}/#{site_path}/views/{path}`.
pub type TableauDashboardViewExtractor<S> = TableauExtractor<S, ViewQuery>;

#[derive(Debug, Default, Clone, Copy)]
pub struct ViewQuery;

impl WorkbookQuery for ViewQuery {
    type Model = DashboardQuery;

    const SCOPE: &'static str = "extractor.tableau_dashboard_view";

    const QUERY: &'static str = r#"query {
        workbooks {
            name
            projectName
            views {
                id
                index
                name
                path
            }
        }
    }"#;

    fn records(&self, config: &TableauConfig, workbooks: Vec<Workbook>) -> Vec<Record> {
        let site_url_path = config.site_url_path();
        let mut records = Vec::new();

        for workbook in workbooks {
            let Some((project, name)) = workbook.project_and_name() else {
                log::warn!(
                    "Ignoring views of workbook (ID:{}) because of a lack of permission",
                    workbook.vizportal_url_id.as_deref().unwrap_or("unknown")
                );
                continue;
            };
            if config.is_excluded(project) {
                continue;
            }
            let dashboard_id = sanitize_workbook_name(name);

            for view in workbook.views.iter().flatten() {
                let Some(path) = view.path.as_deref().filter(|p| !p.is_empty()) else {
                    continue;
                };
                let Some(id) = view.id.as_deref() else {
                    log::warn!("Ignoring view '{}' of '{}' without an ID", path, name);
                    continue;
                };
                let url = format!(
                    "{}/#{}/views/{}",
                    config.tableau_base_url, site_url_path, path
                );
                let query_name = format!(
                    "{}. {}",
                    view.index.map(|i| i.to_string()).unwrap_or_default(),
                    view.name.as_deref().unwrap_or_default()
                );
                records.push(record_from([
                    ("dashboard_group_id", project.to_string()),
                    ("dashboard_id", dashboard_id.clone()),
                    ("query_name", query_name),
                    ("query_id", id.to_string()),
                    ("query_text", url.clone()),
                    ("url", url),
                    ("cluster", config.cluster.clone()),
                ]));
            }
        }

        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::etl::Extractor;
    use crate::extractor::tableau::graphql::tests::{FixedSource, config};
    use serde_json::json;

    fn workbooks() -> serde_json::Value {
        json!({
            "workbooks": [
                {
                    "name": "Pipeline's Health",
                    "projectName": "Sales",
                    "views": [
                        {"id": "v-1", "index": 0, "name": "Overview", "path": "PipelinesHealth/Overview"},
                        {"id": "v-2", "index": 1, "name": "Hidden", "path": ""},
                        {"id": "v-3", "index": 2, "name": "No path", "path": null},
                        {"id": "v-4", "index": 3, "name": "Detail", "path": "PipelinesHealth/Detail"}
                    ]
                },
                {
                    "name": "Scratch",
                    "projectName": "Sandbox",
                    "views": [{"id": "v-5", "index": 0, "name": "Tmp", "path": "Scratch/Tmp"}]
                },
                {
                    "name": null,
                    "projectName": "Sales",
                    "views": [{"id": "v-6", "index": 0, "name": "Secret", "path": "Secret/View"}]
                },
                {
                    "name": "Empty",
                    "projectName": "Sales",
                    "views": null
                }
            ]
        })
    }

    #[tokio::test]
    async fn test_view_extraction() {
        let mut extractor =
            TableauDashboardViewExtractor::new(FixedSource::new(workbooks()), config());
        assert_eq!(extractor.scope(), "extractor.tableau_dashboard_view");

        let first = extractor.extract().await.unwrap().unwrap();
        assert_eq!(
            first,
            DashboardQuery {
                dashboard_group_id: "Sales".to_string(),
                dashboard_id: "Pipelines Health".to_string(),
                query_name: "0. Overview".to_string(),
                query_id: "v-1".to_string(),
                url: "https://tableau.example.com/#/views/PipelinesHealth/Overview".to_string(),
                query_text: Some(
                    "https://tableau.example.com/#/views/PipelinesHealth/Overview".to_string()
                ),
                product: "tableau".to_string(),
                cluster: "prod".to_string(),
            }
        );

        let second = extractor.extract().await.unwrap().unwrap();
        assert_eq!(second.query_name, "3. Detail");
        assert_eq!(second.query_id, "v-4");

        assert!(extractor.extract().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_view_without_id_skipped() {
        let source = FixedSource::new(json!({
            "workbooks": [{
                "name": "Pipeline",
                "projectName": "Sales",
                "views": [
                    {"id": null, "index": 0, "name": "Orphan", "path": "Pipeline/Orphan"},
                    {"index": 1, "name": "Unlisted", "path": "Pipeline/Unlisted"},
                    {"id": "v-9", "index": 2, "name": "Summary", "path": "Pipeline/Summary"}
                ]
            }]
        }));
        let mut extractor = TableauDashboardViewExtractor::new(source, config());

        let queries = extractor.extract_all().await.unwrap();
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].query_id, "v-9");
        assert_eq!(queries[0].query_name, "2. Summary");
    }

    #[tokio::test]
    async fn test_site_name_in_url() {
        let mut config = config();
        config.site_name = "emea".to_string();
        let mut extractor =
            TableauDashboardViewExtractor::new(FixedSource::new(workbooks()), config);

        let first = extractor.extract().await.unwrap().unwrap();
        assert_eq!(
            first.url,
            "https://tableau.example.com/#/site/emea/views/PipelinesHealth/Overview"
        );
    }
}
