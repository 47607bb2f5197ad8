//! Snowflake table owners
//!
//! Reads table ownership from `{database}.INFORMATION_SCHEMA.TABLES` and
//! emits one [`TableOwner`] per table. Owners in Snowflake are roles; a
//! [`RoleMapping`] turns each role into the identity the catalog expects
//! (typically an email address).

use crate::client::SqlSource;
use crate::etl::Extractor;
use crate::model::TableOwner;
use crate::record::{Record, field_str, missing_fields};
use eyre::{Context, Result};
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use std::sync::Arc;

/// Scope of the table owner extractor
pub const SCOPE: &str = "extractor.snowflake_table_owner";

/// Shared config section for Snowflake extractors
pub const SHARED_SCOPE: &str = "snowflake";

/// Cluster name used when the catalog is not used as the cluster
pub const DEFAULT_CLUSTER_NAME: &str = "master";

const SQL_STATEMENT: &str = "
    SELECT
        lower({cluster_source}) AS cluster,
        lower(t.table_schema) AS schema,
        lower(t.table_name) AS table_name,
        lower(t.table_owner) AS table_owner
    FROM
        {database}.INFORMATION_SCHEMA.TABLES t
    {where_clause_suffix};
    ";

const REQUIRED_FIELDS: [&str; 4] = ["cluster", "schema", "table_name", "table_owner"];

/// Maps a Snowflake role name to a catalog owner identity
///
/// # Example
/// ```
/// use catalog_extract::extractor::RoleMapping;
///
/// let mapping = RoleMapping::template("{role}@example.com");
/// assert_eq!(mapping.map("analyst"), "analyst@example.com");
///
/// let custom = RoleMapping::from_fn(|role| role.to_uppercase());
/// assert_eq!(custom.map("sysadmin"), "SYSADMIN");
/// ```
#[derive(Clone)]
pub struct RoleMapping(Arc<dyn Fn(&str) -> String + Send + Sync>);

impl RoleMapping {
    /// Use the role name as-is
    pub fn identity() -> Self {
        Self::from_fn(|role| role.to_string())
    }

    /// Substitute the role for `{role}` in `template`
    pub fn template(template: impl Into<String>) -> Self {
        let template = template.into();
        Self::from_fn(move |role| template.replace("{role}", role))
    }

    /// Look the role up in `roles`, falling back to `fallback` (a template)
    /// or the role itself
    pub fn table(roles: HashMap<String, String>, fallback: Option<String>) -> Self {
        Self::from_fn(move |role| match (roles.get(role), &fallback) {
            (Some(identity), _) => identity.clone(),
            (None, Some(template)) => template.replace("{role}", role),
            (None, None) => role.to_string(),
        })
    }

    /// Arbitrary mapping function
    pub fn from_fn(f: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn map(&self, role: &str) -> String {
        (self.0)(role)
    }
}

impl Default for RoleMapping {
    fn default() -> Self {
        Self::identity()
    }
}

impl std::fmt::Debug for RoleMapping {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("RoleMapping")
    }
}

/// Role mapping as written in configuration
///
/// ```yaml
/// role_user_mapping:
///   type: table
///   roles:
///     sysadmin: platform@example.com
///   fallback: "{role}@example.com"
/// ```
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum RoleMappingSpec {
    Identity,
    Template {
        template: String,
    },
    Table {
        roles: HashMap<String, String>,
        #[serde(default)]
        fallback: Option<String>,
    },
}

impl<'de> Deserialize<'de> for RoleMapping {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RoleMappingSpec::deserialize(deserializer)? {
            RoleMappingSpec::Identity => Self::identity(),
            RoleMappingSpec::Template { template } => Self::template(template),
            RoleMappingSpec::Table { roles, fallback } => Self::table(roles, fallback),
        })
    }
}

/// Settings for [`SnowflakeTableOwnerExtractor`]
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SnowflakeTableOwnerConfig {
    /// Raw SQL appended after the `FROM` clause
    pub where_clause_suffix: String,
    /// Cluster name used when `use_catalog_as_cluster_name` is false
    pub cluster_key: String,
    /// Use each table's catalog (database) name as its cluster
    pub use_catalog_as_cluster_name: bool,
    /// Database name identifying the source type in the catalog
    pub database_key: String,
    /// Snowflake database whose `INFORMATION_SCHEMA` is read
    pub snowflake_database: String,
    pub role_user_mapping: RoleMapping,
}

impl Default for SnowflakeTableOwnerConfig {
    fn default() -> Self {
        Self {
            where_clause_suffix: " WHERE t.table_owner IS NOT NULL ".to_string(),
            cluster_key: DEFAULT_CLUSTER_NAME.to_string(),
            use_catalog_as_cluster_name: true,
            database_key: "snowflake".to_string(),
            snowflake_database: "prod".to_string(),
            role_user_mapping: RoleMapping::identity(),
        }
    }
}

impl SnowflakeTableOwnerConfig {
    /// Render the `INFORMATION_SCHEMA` statement for this configuration
    pub fn sql_statement(&self) -> String {
        let cluster_source = if self.use_catalog_as_cluster_name {
            "t.table_catalog".to_string()
        } else {
            format!("'{}'", self.cluster_key.replace('\'', "''"))
        };

        SQL_STATEMENT
            .replace("{cluster_source}", &cluster_source)
            .replace("{database}", &self.snowflake_database)
            .replace("{where_clause_suffix}", &self.where_clause_suffix)
    }
}

/// Extracts table ownership from Snowflake's `INFORMATION_SCHEMA`
///
/// # Example
/// ```no_run
/// use catalog_extract::client::{SnowflakeClient, SnowflakeConfig};
/// use catalog_extract::etl::Extractor;
/// use catalog_extract::extractor::{SnowflakeTableOwnerConfig, SnowflakeTableOwnerExtractor};
///
/// # async fn example(config: SnowflakeConfig) -> eyre::Result<()> {
/// let client = SnowflakeClient::try_new(&config, config.auth()?)?;
/// let mut extractor =
///     SnowflakeTableOwnerExtractor::new(client, SnowflakeTableOwnerConfig::default());
/// while let Some(owner) = extractor.extract().await? {
///     println!("{} owned by {:?}", owner.table_name, owner.owners);
/// }
/// # Ok(())
/// # }
/// ```
pub struct SnowflakeTableOwnerExtractor<S> {
    source: S,
    sql: String,
    database: String,
    role_mapping: RoleMapping,
    rows: Option<std::vec::IntoIter<Record>>,
}

impl<S: SqlSource> SnowflakeTableOwnerExtractor<S> {
    pub fn new(source: S, config: SnowflakeTableOwnerConfig) -> Self {
        let sql = config.sql_statement();
        log::info!("SQL for snowflake table owner: {}", sql);

        Self {
            source,
            sql,
            database: config.database_key,
            role_mapping: config.role_user_mapping,
            rows: None,
        }
    }

    /// The statement sent to Snowflake
    pub fn sql(&self) -> &str {
        &self.sql
    }

    fn to_model(&self, row: &Record) -> Option<TableOwner> {
        let missing = missing_fields(row, &REQUIRED_FIELDS);
        if !missing.is_empty() {
            log::warn!(
                "Skipping table owner row missing {}: {:?}",
                missing.join(", "),
                row
            );
            return None;
        }

        Some(TableOwner {
            db_name: self.database.clone(),
            schema: field_str(row, "schema")?,
            table_name: field_str(row, "table_name")?,
            owners: vec![self.role_mapping.map(&field_str(row, "table_owner")?)],
            cluster: field_str(row, "cluster")?,
        })
    }
}

impl<S: SqlSource> Extractor for SnowflakeTableOwnerExtractor<S> {
    type Item = TableOwner;

    async fn extract(&mut self) -> Result<Option<Self::Item>> {
        if self.rows.is_none() {
            let rows = self
                .source
                .execute(&self.sql)
                .await
                .with_context(|| "Failed to query Snowflake table owners")?;
            self.rows = Some(rows.into_iter());
        }

        while let Some(row) = self.rows.as_mut().and_then(Iterator::next) {
            if let Some(owner) = self.to_model(&row) {
                return Ok(Some(owner));
            }
        }
        Ok(None)
    }

    fn scope(&self) -> &str {
        SCOPE
    }

    async fn close(&mut self) -> Result<()> {
        self.rows = None;
        Ok(())
    }
}
