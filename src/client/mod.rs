//! API clients for the metadata sources
//!
//! [`TableauClient`] talks to the Tableau REST and Metadata (GraphQL) APIs;
//! [`SnowflakeClient`] runs statements through the Snowflake SQL API. The
//! extractors only depend on the [`GraphQlSource`] and [`SqlSource`] traits,
//! so tests can substitute in-memory sources.

mod auth;
mod snowflake;
mod tableau;

pub use auth::{PersonalAccessToken, SnowflakeAuth, TokenType};
pub use snowflake::{SnowflakeClient, SnowflakeConfig};
pub use tableau::{TableauClient, TableauConfig};

use crate::record::Record;
use eyre::Result;
use serde_json::Value;

/// A source that answers GraphQL queries
pub trait GraphQlSource: Send + Sync {
    /// Execute `query` and return the `data` object of the response
    fn query(&self, query: &str) -> impl std::future::Future<Output = Result<Value>> + Send;
}

/// A source that executes SQL statements
pub trait SqlSource: Send + Sync {
    /// Execute `statement` and return every result row as a record
    fn execute(
        &self,
        statement: &str,
    ) -> impl std::future::Future<Output = Result<Vec<Record>>> + Send;
}
