//! CLI helper functions

use crate::{
    client::{
        PersonalAccessToken, SnowflakeClient, SnowflakeConfig, TableauClient, TableauConfig,
    },
    config::{ConfigTree, value_or_env},
    etl::{Extractor, IdentityTransformer, Pipeline},
    extractor::{
        SnowflakeTableOwnerConfig, SnowflakeTableOwnerExtractor, WorkbookQuery, snowflake,
        tableau,
    },
    storage::NdjsonWriter,
};
use eyre::{Context, Result};
use serde::Serialize;
use std::path::Path;

/// Load the configuration file
///
/// A missing file yields an empty configuration so that every setting can
/// still come from scoped defaults; a present but invalid file is an error.
pub fn load_config(path: impl AsRef<Path>) -> Result<ConfigTree> {
    let path = path.as_ref();
    if !path.exists() {
        log::warn!("Configuration file {} not found", path.display());
        return Ok(ConfigTree::empty());
    }
    ConfigTree::read(path)
}

/// Tableau settings for the extractor registered under `scope`
pub fn tableau_config(config: &ConfigTree, scope: &str) -> Result<TableauConfig> {
    config.section(scope, tableau::SHARED_SCOPE)
}

/// Sign in to Tableau
///
/// Credentials come from the config, or the environment variables
/// `TABLEAU_ACCESS_TOKEN_NAME` and `TABLEAU_ACCESS_TOKEN_SECRET`.
pub async fn load_tableau_client(config: &TableauConfig) -> Result<TableauClient> {
    let token = PersonalAccessToken::new(
        value_or_env(config.access_token_name.clone(), "TABLEAU_ACCESS_TOKEN_NAME")?,
        value_or_env(
            config.access_token_secret.clone(),
            "TABLEAU_ACCESS_TOKEN_SECRET",
        )?,
    );
    TableauClient::sign_in(config, &token)
        .await
        .context("Failed to create Tableau client")
}

/// Snowflake connection settings
pub fn snowflake_config(config: &ConfigTree) -> Result<SnowflakeConfig> {
    config.section(snowflake::SCOPE, snowflake::SHARED_SCOPE)
}

/// Snowflake table owner settings
pub fn snowflake_table_owner_config(config: &ConfigTree) -> Result<SnowflakeTableOwnerConfig> {
    config.section(snowflake::SCOPE, snowflake::SHARED_SCOPE)
}

/// Create a Snowflake client
///
/// The token comes from the config or the `SNOWFLAKE_TOKEN` environment
/// variable.
pub fn load_snowflake_client(config: &SnowflakeConfig) -> Result<SnowflakeClient> {
    SnowflakeClient::try_new(config, config.auth()?).context("Failed to create Snowflake client")
}

fn writer<T: Serialize>(output: Option<&Path>) -> NdjsonWriter<T> {
    match output {
        Some(path) => NdjsonWriter::new(path),
        None => NdjsonWriter::stdout(),
    }
}

/// Run `extractor` to exhaustion and write every model as NDJSON
///
/// Pipeline: Extractor → IdentityTransformer → NdjsonWriter
pub async fn extract_to_ndjson<E>(extractor: E, output: Option<&Path>) -> Result<usize>
where
    E: Extractor,
    E::Item: Serialize,
{
    let mut pipeline = Pipeline::new(extractor, IdentityTransformer::new(), writer(output));
    pipeline.run().await
}

async fn extract_tableau<Q>(config: &ConfigTree, output: Option<&Path>) -> Result<usize>
where
    Q: WorkbookQuery + Default,
    Q::Model: Serialize,
{
    let tableau = tableau_config(config, Q::SCOPE)?;
    log::info!("Connecting to Tableau...");
    let client = load_tableau_client(&tableau).await?;
    let extractor = tableau::TableauExtractor::<_, Q>::new(client, tableau);
    extract_to_ndjson(extractor, output).await
}

/// Extract Tableau workbook owners as dashboard owners
pub async fn extract_tableau_owners(config: &ConfigTree, output: Option<&Path>) -> Result<usize> {
    extract_tableau::<tableau::OwnerQuery>(config, output).await
}

/// Extract Tableau workbook owners as catalog users
pub async fn extract_tableau_users(config: &ConfigTree, output: Option<&Path>) -> Result<usize> {
    extract_tableau::<tableau::UserQuery>(config, output).await
}

/// Extract Tableau views as dashboard queries
pub async fn extract_tableau_views(config: &ConfigTree, output: Option<&Path>) -> Result<usize> {
    extract_tableau::<tableau::ViewQuery>(config, output).await
}

/// Extract Snowflake table owners
pub async fn extract_snowflake_owners(
    config: &ConfigTree,
    output: Option<&Path>,
) -> Result<usize> {
    let connection = snowflake_config(config)?;
    let client = load_snowflake_client(&connection)?;
    let extractor = SnowflakeTableOwnerExtractor::new(client, snowflake_table_owner_config(config)?);
    extract_to_ndjson(extractor, output).await
}

/// Verify Tableau credentials by signing in
pub async fn test_tableau_auth(config: &ConfigTree) -> Result<()> {
    let tableau = tableau_config(config, tableau::OwnerQuery::SCOPE)?;
    let client = load_tableau_client(&tableau).await?;
    log::info!("✓ Signed in to Tableau at {}", client);
    Ok(())
}

/// Verify Snowflake credentials with a trivial statement
pub async fn test_snowflake_auth(config: &ConfigTree) -> Result<()> {
    let client = load_snowflake_client(&snowflake_config(config)?)?;
    client
        .test_connection()
        .await
        .with_context(|| format!("Failed to query Snowflake at {}", client.url()))?;
    log::info!("✓ Connected to Snowflake at {}", client.url());
    Ok(())
}
