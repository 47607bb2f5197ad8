//! Shared GraphQL extraction for Tableau workbooks

use crate::client::{GraphQlSource, TableauConfig};
use crate::etl::{Extractor, ModelExtractor};
use crate::model::CatalogModel;
use crate::record::{Record, record_from};
use crate::transform::{RecordToModel, StaticFields};
use eyre::{Context, Result};
use regex::Regex;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::sync::LazyLock;

/// Scope of the raw GraphQL record extractor
pub const GRAPHQL_SCOPE: &str = "extractor.tableau_graphql_api";

/// A workbook as returned by the Metadata API
///
/// Every field is optional: the API returns null for objects the signed-in
/// user lacks permission to see.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Workbook {
    pub name: Option<String>,
    pub project_name: Option<String>,
    pub owner: Option<WorkbookOwner>,
    pub project_vizportal_url_id: Option<String>,
    pub vizportal_url_id: Option<String>,
    pub views: Option<Vec<View>>,
}

impl Workbook {
    /// Project and name, when both are visible
    pub fn project_and_name(&self) -> Option<(&str, &str)> {
        Some((self.project_name.as_deref()?, self.name.as_deref()?))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WorkbookOwner {
    pub email: Option<String>,
    pub name: Option<String>,
    pub username: Option<String>,
}

/// A sheet or dashboard view inside a workbook
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct View {
    pub id: Option<String>,
    pub index: Option<i64>,
    pub name: Option<String>,
    pub path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WorkbooksResponse {
    workbooks: Vec<Workbook>,
}

static UNSAFE_NAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[/']").expect("static pattern"));

/// Strip characters that cannot appear in a workbook ID (`/` and `'`)
pub fn sanitize_workbook_name(name: &str) -> String {
    UNSAFE_NAME_CHARS.replace_all(name, "").into_owned()
}

/// Per-extractor GraphQL query and workbook-to-record mapping
pub trait WorkbookQuery: Send + Sync {
    /// Catalog model the records are projected onto
    type Model: CatalogModel + DeserializeOwned + Send;

    /// Config scope of the extractor
    const SCOPE: &'static str;

    /// GraphQL query fetching the workbooks
    const QUERY: &'static str;

    /// Filter and reshape workbooks into records for [`Self::Model`]
    fn records(&self, config: &TableauConfig, workbooks: Vec<Workbook>) -> Vec<Record>;
}

/// Raw record extractor over the Metadata API
///
/// The query runs once, on the first call to `extract`; the mapped records
/// are cached and returned one per call with `product: tableau` merged in.
pub struct TableauGraphQlExtractor<S, Q> {
    source: S,
    config: TableauConfig,
    query: Q,
    static_fields: StaticFields,
    records: Option<std::vec::IntoIter<Record>>,
}

impl<S, Q> TableauGraphQlExtractor<S, Q>
where
    S: GraphQlSource,
    Q: WorkbookQuery,
{
    pub fn new(source: S, config: TableauConfig, query: Q) -> Self {
        Self {
            source,
            config,
            query,
            static_fields: StaticFields::new(record_from([("product", "tableau")])),
            records: None,
        }
    }

    pub fn config(&self) -> &TableauConfig {
        &self.config
    }

    async fn execute(&self) -> Result<Vec<Record>> {
        let data = self
            .source
            .query(Q::QUERY)
            .await
            .with_context(|| format!("Failed to query workbooks for {}", Q::SCOPE))?;
        let response: WorkbooksResponse = serde_json::from_value(data)
            .with_context(|| "Failed to parse workbooks from GraphQL response")?;

        log::debug!("Fetched {} workbook(s)", response.workbooks.len());

        Ok(self.query.records(&self.config, response.workbooks))
    }
}

impl<S, Q> Extractor for TableauGraphQlExtractor<S, Q>
where
    S: GraphQlSource,
    Q: WorkbookQuery,
{
    type Item = Record;

    async fn extract(&mut self) -> Result<Option<Self::Item>> {
        if self.records.is_none() {
            let records = self.execute().await?;
            log::info!("{} produced {} record(s)", Q::SCOPE, records.len());
            self.records = Some(records.into_iter());
        }

        Ok(self.records.as_mut().and_then(Iterator::next).map(|mut record| {
            self.static_fields.apply(&mut record);
            record
        }))
    }

    fn scope(&self) -> &str {
        GRAPHQL_SCOPE
    }

    async fn close(&mut self) -> Result<()> {
        self.records = None;
        Ok(())
    }
}

/// Tableau extractor emitting one [`WorkbookQuery::Model`] per call
pub struct TableauExtractor<S, Q: WorkbookQuery> {
    inner: ModelExtractor<TableauGraphQlExtractor<S, Q>, RecordToModel<Q::Model>>,
}

impl<S, Q> TableauExtractor<S, Q>
where
    S: GraphQlSource,
    Q: WorkbookQuery + Default,
{
    /// Create an extractor reading from `source`
    pub fn new(source: S, config: TableauConfig) -> Self {
        let raw = TableauGraphQlExtractor::new(source, config, Q::default());
        Self {
            inner: ModelExtractor::new(Q::SCOPE, raw, RecordToModel::new()),
        }
    }

    pub fn config(&self) -> &TableauConfig {
        self.inner.inner().config()
    }
}

impl<S, Q> Extractor for TableauExtractor<S, Q>
where
    S: GraphQlSource,
    Q: WorkbookQuery,
{
    type Item = Q::Model;

    async fn extract(&mut self) -> Result<Option<Self::Item>> {
        self.inner.extract().await
    }

    fn scope(&self) -> &str {
        self.inner.scope()
    }

    async fn close(&mut self) -> Result<()> {
        self.inner.close().await
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::{Value, json};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// GraphQL source answering every query with a fixed response
    pub(crate) struct FixedSource {
        pub data: Value,
        pub calls: AtomicUsize,
    }

    impl FixedSource {
        pub fn new(data: Value) -> Self {
            Self {
                data,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl GraphQlSource for FixedSource {
        async fn query(&self, _query: &str) -> Result<Value> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.data.clone())
        }
    }

    pub(crate) fn config() -> TableauConfig {
        TableauConfig {
            api_base_url: "https://tableau.example.com".to_string(),
            api_version: "3.19".to_string(),
            site_name: String::new(),
            tableau_base_url: "https://tableau.example.com".to_string(),
            cluster: "prod".to_string(),
            excluded_projects: vec!["Sandbox".to_string()],
            verify_request: true,
            access_token_name: None,
            access_token_secret: None,
        }
    }

    #[derive(Default)]
    struct NamesQuery;

    impl WorkbookQuery for NamesQuery {
        type Model = crate::model::User;
        const SCOPE: &'static str = "extractor.test_names";
        const QUERY: &'static str = "query { workbooks { name } }";

        fn records(&self, _config: &TableauConfig, workbooks: Vec<Workbook>) -> Vec<Record> {
            workbooks
                .into_iter()
                .filter_map(|w| w.name)
                .map(|name| record_from([("email", name)]))
                .collect()
        }
    }

    #[test]
    fn test_sanitize_workbook_name() {
        assert_eq!(sanitize_workbook_name("Sales/Ops 'Q1'"), "SalesOps Q1");
        assert_eq!(sanitize_workbook_name("plain"), "plain");
    }

    #[tokio::test]
    async fn test_query_runs_once_and_merges_static_fields() {
        let source = FixedSource::new(json!({
            "workbooks": [{"name": "a@x.io"}, {"name": null}, {"name": "b@x.io"}]
        }));
        let mut extractor = TableauGraphQlExtractor::new(source, config(), NamesQuery);

        let first = extractor.extract().await.unwrap().unwrap();
        assert_eq!(first["email"], "a@x.io");
        assert_eq!(first["product"], "tableau");
        let second = extractor.extract().await.unwrap().unwrap();
        assert_eq!(second["email"], "b@x.io");
        assert!(extractor.extract().await.unwrap().is_none());
        assert!(extractor.extract().await.unwrap().is_none());

        assert_eq!(extractor.source.calls.load(Ordering::SeqCst), 1);
        assert_eq!(extractor.scope(), GRAPHQL_SCOPE);
    }

    #[tokio::test]
    async fn test_model_extractor_scope() {
        let source = FixedSource::new(json!({"workbooks": []}));
        let mut extractor = TableauExtractor::<_, NamesQuery>::new(source, config());
        assert_eq!(extractor.scope(), "extractor.test_names");
        assert!(extractor.extract().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_malformed_response_errors() {
        let source = FixedSource::new(json!({"workbooks": "nope"}));
        let mut extractor = TableauGraphQlExtractor::new(source, config(), NamesQuery);
        assert!(extractor.extract().await.is_err());
    }
}
