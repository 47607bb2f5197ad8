//! Snowflake client module
//!
//! Executes statements through the Snowflake SQL API (`/api/v2/statements`)
//! and returns result rows as records keyed by lower-cased column name.

use super::{SnowflakeAuth, SqlSource, TokenType};
use crate::config::value_or_env;
use crate::record::Record;
use eyre::{Context, Result, eyre};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};
use url::Url;

const TOKEN_TYPE_HEADER: &str = "x-snowflake-authorization-token-type";

/// Connection settings for the Snowflake SQL API
#[derive(Debug, Clone, Deserialize)]
pub struct SnowflakeConfig {
    /// Account URL, e.g. `https://myorg-myaccount.snowflakecomputing.com`
    pub account_url: String,
    #[serde(default)]
    pub warehouse: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    /// Default database for the session
    #[serde(default)]
    pub database: Option<String>,
    /// Statement timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub token_type: TokenType,
}

fn default_timeout_secs() -> u64 {
    60
}

impl SnowflakeConfig {
    /// Resolve authentication from config, falling back to `SNOWFLAKE_TOKEN`
    pub fn auth(&self) -> Result<SnowflakeAuth> {
        let token = value_or_env(self.token.clone(), "SNOWFLAKE_TOKEN")?;
        let token_type = match std::env::var("SNOWFLAKE_TOKEN_TYPE") {
            Ok(value) if self.token.is_none() => value
                .parse()
                .map_err(|_| eyre!("Invalid SNOWFLAKE_TOKEN_TYPE: {}", value))?,
            _ => self.token_type.clone(),
        };
        Ok(SnowflakeAuth::new(&token_type, token))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatementResponse {
    #[serde(default)]
    result_set_meta_data: Option<ResultSetMetaData>,
    #[serde(default)]
    data: Vec<Vec<Value>>,
    #[serde(default)]
    statement_handle: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResultSetMetaData {
    #[serde(default)]
    row_type: Vec<ColumnType>,
    #[serde(default)]
    partition_info: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct ColumnType {
    name: String,
}

#[derive(Debug, Deserialize)]
struct PartitionResponse {
    #[serde(default)]
    data: Vec<Vec<Value>>,
}

/// Client for the Snowflake SQL API
///
/// # Example
/// ```no_run
/// use catalog_extract::client::{SnowflakeAuth, SnowflakeClient, SnowflakeConfig, SqlSource};
///
/// # async fn example(config: SnowflakeConfig) -> eyre::Result<()> {
/// let client = SnowflakeClient::try_new(&config, SnowflakeAuth::Oauth("token".into()))?;
/// let rows = client.execute("SELECT current_user() AS user_name").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct SnowflakeClient {
    client: Client,
    url: Url,
    warehouse: Option<String>,
    role: Option<String>,
    database: Option<String>,
    timeout_secs: u64,
}

impl SnowflakeClient {
    /// Create a new client from config and resolved authentication
    pub fn try_new(config: &SnowflakeConfig, auth: SnowflakeAuth) -> Result<Self> {
        let url = Url::parse(&config.account_url)
            .with_context(|| format!("Invalid Snowflake account_url: {}", config.account_url))?;

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::AUTHORIZATION,
            format!("Bearer {}", auth.token()).parse()?,
        );
        headers.insert(TOKEN_TYPE_HEADER, auth.token_type_header().parse()?);
        headers.insert(reqwest::header::ACCEPT, "application/json".parse()?);
        let client = Client::builder().default_headers(headers).build()?;

        log::debug!("Snowflake client for {} using {} auth", url, auth);

        Ok(Self {
            client,
            url,
            warehouse: config.warehouse.clone(),
            role: config.role.clone(),
            database: config.database.clone(),
            timeout_secs: config.timeout_secs,
        })
    }

    /// Get the base URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Verify connectivity and credentials with a trivial statement
    pub async fn test_connection(&self) -> Result<()> {
        self.execute("SELECT 1 AS ok").await.map(|_| ())
    }

    fn statement_body(&self, statement: &str) -> Value {
        let mut body = json!({
            "statement": statement,
            "timeout": self.timeout_secs,
        });
        for (key, value) in [
            ("warehouse", &self.warehouse),
            ("role", &self.role),
            ("database", &self.database),
        ] {
            if let Some(value) = value {
                body[key] = Value::String(value.clone());
            }
        }
        body
    }

    async fn fetch_partition(&self, handle: &str, partition: usize) -> Result<Vec<Vec<Value>>> {
        let url = self.url.join(&format!("/api/v2/statements/{}", handle))?;
        log::debug!("Fetching result partition {} of statement {}", partition, handle);

        let response = self
            .client
            .get(url)
            .query(&[("partition", partition)])
            .send()
            .await
            .map_err(|e| eyre!("Failed to send partition request: {}", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            eyre::bail!(
                "Failed to fetch partition {} of statement {} ({}): {}",
                partition,
                handle,
                status,
                body
            );
        }

        let page: PartitionResponse = response
            .json()
            .await
            .with_context(|| format!("Failed to parse partition {} response", partition))?;
        Ok(page.data)
    }
}

fn rows_to_records(columns: &[String], rows: Vec<Vec<Value>>) -> Vec<Record> {
    rows.into_iter()
        .map(|row| columns.iter().cloned().zip(row).collect())
        .collect()
}

impl SqlSource for SnowflakeClient {
    async fn execute(&self, statement: &str) -> Result<Vec<Record>> {
        let url = self.url.join("/api/v2/statements")?;
        log::debug!("Executing statement via {}", url);

        let response = self
            .client
            .post(url)
            .json(&self.statement_body(statement))
            .send()
            .await
            .map_err(|e| eyre!("Failed to send statement: {}", e))?;

        let status = response.status();
        if status == StatusCode::ACCEPTED {
            let body = response.text().await.unwrap_or_default();
            eyre::bail!(
                "Statement did not finish within {}s: {}",
                self.timeout_secs,
                body
            );
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            eyre::bail!("Snowflake statement failed ({}): {}", status, body);
        }

        let result: StatementResponse = response
            .json()
            .await
            .with_context(|| "Failed to parse statement response")?;

        if let Some(message) = &result.message {
            log::debug!("Snowflake: {}", message);
        }

        let meta = result
            .result_set_meta_data
            .ok_or_else(|| eyre!("Statement response has no result set metadata"))?;
        let columns: Vec<String> = meta
            .row_type
            .iter()
            .map(|c| c.name.to_lowercase())
            .collect();

        let mut records = rows_to_records(&columns, result.data);

        if meta.partition_info.len() > 1 {
            let handle = result
                .statement_handle
                .ok_or_else(|| eyre!("Multi-partition result has no statement handle"))?;
            for partition in 1..meta.partition_info.len() {
                let rows = self.fetch_partition(&handle, partition).await?;
                records.extend(rows_to_records(&columns, rows));
            }
        }

        log::info!("Statement returned {} row(s)", records.len());

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SnowflakeConfig {
        SnowflakeConfig {
            account_url: "https://acme.snowflakecomputing.com".to_string(),
            warehouse: Some("CATALOG_WH".to_string()),
            role: None,
            database: Some("PROD".to_string()),
            timeout_secs: 30,
            token: Some("token".to_string()),
            token_type: TokenType::Oauth,
        }
    }

    #[test]
    fn test_statement_body() {
        let client = SnowflakeClient::try_new(&config(), config().auth().unwrap()).unwrap();
        let body = client.statement_body("SELECT 1");
        assert_eq!(body["statement"], "SELECT 1");
        assert_eq!(body["timeout"], 30);
        assert_eq!(body["warehouse"], "CATALOG_WH");
        assert_eq!(body["database"], "PROD");
        assert!(body.get("role").is_none());
    }

    #[test]
    fn test_rows_to_records() {
        let columns = vec!["schema".to_string(), "table_name".to_string()];
        let rows = vec![
            vec![json!("sales"), json!("orders")],
            vec![json!("hr"), Value::Null],
        ];
        let records = rows_to_records(&columns, rows);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["schema"], "sales");
        assert_eq!(records[0]["table_name"], "orders");
        assert!(records[1]["table_name"].is_null());
    }
}
