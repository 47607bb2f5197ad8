//! Tableau client module
//!
//! Signs in to the Tableau REST API with a personal access token and runs
//! queries against the Metadata API (`/api/metadata/graphql`).

use super::{GraphQlSource, PersonalAccessToken};
use eyre::{Context, Result, eyre};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use url::Url;

const AUTH_HEADER: &str = "x-tableau-auth";

/// Connection settings shared by all Tableau extractors
///
/// Read from the `tableau` config section, optionally overridden per
/// extractor scope.
#[derive(Debug, Clone, Deserialize)]
pub struct TableauConfig {
    /// Base URL of the REST and Metadata APIs
    pub api_base_url: String,
    /// REST API version used for sign-in, e.g. `3.19`
    pub api_version: String,
    /// Site content URL; empty for the default site
    #[serde(default)]
    pub site_name: String,
    /// Base URL used to build links to views
    pub tableau_base_url: String,
    /// Catalog cluster the dashboards belong to
    pub cluster: String,
    /// Projects whose workbooks are skipped
    #[serde(default)]
    pub excluded_projects: Vec<String>,
    /// Verify TLS certificates
    #[serde(default = "default_verify_request")]
    pub verify_request: bool,
    #[serde(default)]
    pub access_token_name: Option<String>,
    #[serde(default)]
    pub access_token_secret: Option<String>,
}

fn default_verify_request() -> bool {
    true
}

impl TableauConfig {
    /// Whether workbooks in `project` should be skipped
    pub fn is_excluded(&self, project: &str) -> bool {
        self.excluded_projects.iter().any(|p| p == project)
    }

    /// Path segment identifying the site in view URLs
    ///
    /// Empty for the default site, `/site/{site_name}` otherwise.
    pub fn site_url_path(&self) -> String {
        if self.site_name.is_empty() {
            String::new()
        } else {
            format!("/site/{}", self.site_name)
        }
    }
}

#[derive(Debug, Deserialize)]
struct SignInResponse {
    credentials: SignInCredentials,
}

#[derive(Debug, Deserialize)]
struct SignInCredentials {
    token: String,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

/// Authenticated client for the Tableau Metadata API
///
/// # Example
/// ```no_run
/// use catalog_extract::client::{GraphQlSource, PersonalAccessToken, TableauClient, TableauConfig};
///
/// # async fn example(config: TableauConfig) -> eyre::Result<()> {
/// let token = PersonalAccessToken::new("catalog", "secret");
/// let client = TableauClient::sign_in(&config, &token).await?;
/// let data = client.query("query { workbooks { name } }").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct TableauClient {
    client: Client,
    url: Url,
    token: String,
}

impl TableauClient {
    fn build_http(config: &TableauConfig) -> Result<(Client, Url)> {
        let url = Url::parse(&config.api_base_url)
            .with_context(|| format!("Invalid Tableau api_base_url: {}", config.api_base_url))?;
        if !config.verify_request {
            log::warn!("TLS certificate verification disabled for {}", url);
        }
        let client = Client::builder()
            .danger_accept_invalid_certs(!config.verify_request)
            .build()?;
        Ok((client, url))
    }

    /// Create a client from an already issued auth token
    pub fn with_token(config: &TableauConfig, token: impl Into<String>) -> Result<Self> {
        let (client, url) = Self::build_http(config)?;
        Ok(Self {
            client,
            url,
            token: token.into(),
        })
    }

    /// Sign in with a personal access token
    ///
    /// POSTs the token to `/api/{api_version}/auth/signin` and keeps the
    /// returned credentials token for Metadata API requests.
    pub async fn sign_in(config: &TableauConfig, credentials: &PersonalAccessToken) -> Result<Self> {
        let (client, url) = Self::build_http(config)?;
        let signin_url = url.join(&format!("/api/{}/auth/signin", config.api_version))?;

        log::debug!(
            "Signing in to {} as '{}' (site: '{}')",
            signin_url,
            credentials.name,
            config.site_name
        );

        let payload = json!({
            "credentials": {
                "name": credentials.name,
                "personalAccessTokenSecret": credentials.secret,
                "site": { "contentUrl": config.site_name }
            }
        });

        let response = client
            .post(signin_url)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| eyre!("Failed to send sign-in request: {}", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            eyre::bail!("Tableau sign-in failed ({}): {}", status, body);
        }

        let signed_in: SignInResponse = response
            .json()
            .await
            .with_context(|| "Failed to parse Tableau sign-in response")?;

        log::info!("Signed in to Tableau at {}", url);

        Ok(Self {
            client,
            url,
            token: signed_in.credentials.token,
        })
    }

    /// Metadata API endpoint
    pub fn metadata_url(&self) -> Result<Url> {
        Ok(self.url.join("/api/metadata/graphql")?)
    }

    /// Get the base URL.
    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl GraphQlSource for TableauClient {
    async fn query(&self, query: &str) -> Result<Value> {
        let url = self.metadata_url()?;
        log::debug!("Running GraphQL query against {}", url);
        log::trace!("{}", query);

        let payload = json!({ "query": query, "variables": {} });
        let response = self
            .client
            .post(url)
            .header(AUTH_HEADER, &self.token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| eyre!("Failed to send GraphQL request: {}", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            eyre::bail!("Tableau Metadata API request failed ({}): {}", status, body);
        }

        let result: GraphQlResponse = response
            .json()
            .await
            .with_context(|| "Failed to parse GraphQL response")?;

        let messages: Vec<&str> = result.errors.iter().map(|e| e.message.as_str()).collect();
        match result.data {
            Some(data) if !data.is_null() => {
                if !messages.is_empty() {
                    log::warn!("GraphQL query returned partial data: {}", messages.join("; "));
                }
                Ok(data)
            }
            _ => eyre::bail!("GraphQL query returned no data: {}", messages.join("; ")),
        }
    }
}

impl std::fmt::Display for TableauClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.url)
    }
}
