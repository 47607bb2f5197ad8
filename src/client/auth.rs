use clap::ValueEnum;
use serde::Deserialize;
use std::str::FromStr;

/// Tableau personal access token used to sign in to the REST API
#[derive(Clone)]
pub struct PersonalAccessToken {
    pub name: String,
    pub secret: String,
}

impl PersonalAccessToken {
    pub fn new(name: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            secret: secret.into(),
        }
    }
}

impl std::fmt::Debug for PersonalAccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersonalAccessToken")
            .field("name", &self.name)
            .field("secret", &"***")
            .finish()
    }
}

/// Snowflake SQL API authentication
#[derive(Clone)]
pub enum SnowflakeAuth {
    /// OAuth access token
    Oauth(String),
    /// Pre-signed key-pair JWT
    KeypairJwt(String),
}

impl SnowflakeAuth {
    pub fn new(r#type: &TokenType, token: String) -> Self {
        match r#type {
            TokenType::Oauth => Self::Oauth(token),
            TokenType::KeypairJwt => Self::KeypairJwt(token),
        }
    }

    pub(crate) fn token(&self) -> &str {
        match self {
            Self::Oauth(token) | Self::KeypairJwt(token) => token,
        }
    }

    /// Value of the `X-Snowflake-Authorization-Token-Type` header
    pub(crate) fn token_type_header(&self) -> &'static str {
        match self {
            Self::Oauth(_) => "OAUTH",
            Self::KeypairJwt(_) => "KEYPAIR_JWT",
        }
    }
}

impl std::fmt::Display for SnowflakeAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Oauth(_) => write!(f, "OAuth"),
            Self::KeypairJwt(_) => write!(f, "KeypairJwt"),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    #[default]
    Oauth,
    KeypairJwt,
}

impl FromStr for TokenType {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "oauth" => Ok(Self::Oauth),
            "keypair_jwt" | "jwt" => Ok(Self::KeypairJwt),
            _ => Err(()),
        }
    }
}
