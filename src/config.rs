//! Scoped configuration tree
//!
//! Configuration is read from a YAML file into a [`ConfigTree`]. Each
//! extractor reads its settings from its own scope (for example
//! `extractor.tableau_dashboard_view`) and falls back to a shared section
//! (`tableau`, `snowflake`) for anything the scope does not set.
//!
//! Example format:
//! ```yaml
//! tableau:
//!   api_base_url: https://tableau.example.com
//!   api_version: "3.19"
//!   tableau_base_url: https://tableau.example.com
//!   cluster: prod
//!   excluded_projects: [Sandbox]
//! extractor:
//!   tableau_dashboard_view:
//!     excluded_projects: [Sandbox, Archive]
//! ```

use eyre::{Context, Result};
use serde::de::DeserializeOwned;
use serde_yaml::{Mapping, Value};
use std::path::Path;

/// A YAML configuration tree supporting dotted scope lookup and fallback
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigTree {
    root: Value,
}

impl Default for ConfigTree {
    fn default() -> Self {
        Self::empty()
    }
}

impl ConfigTree {
    /// An empty configuration
    pub fn empty() -> Self {
        Self {
            root: Value::Mapping(Mapping::new()),
        }
    }

    /// Wrap an existing YAML value
    pub fn from_value(root: Value) -> Self {
        match root {
            Value::Null => Self::empty(),
            root => Self { root },
        }
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let root: Value =
            serde_yaml::from_str(content).with_context(|| "Failed to parse YAML configuration")?;
        Ok(Self::from_value(root))
    }

    /// Read configuration from a YAML file
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("Reading configuration from {}", path.display());
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration: {}", path.display()))?;
        Self::from_yaml_str(&content)
            .with_context(|| format!("Invalid configuration: {}", path.display()))
    }

    /// Look up a value by dotted path
    pub fn get(&self, path: &str) -> Option<&Value> {
        path.split('.')
            .filter(|segment| !segment.is_empty())
            .try_fold(&self.root, |node, segment| node.get(segment))
    }

    /// Subtree at a dotted path, or an empty tree when the path is absent
    pub fn scoped(&self, scope: &str) -> ConfigTree {
        self.get(scope)
            .cloned()
            .map(Self::from_value)
            .unwrap_or_default()
    }

    /// Merge `fallback` underneath this tree
    ///
    /// Keys set here win; nested mappings are merged recursively.
    pub fn with_fallback(self, fallback: ConfigTree) -> ConfigTree {
        Self {
            root: merge(self.root, fallback.root),
        }
    }

    /// Whether the tree holds no settings
    pub fn is_empty(&self) -> bool {
        match &self.root {
            Value::Mapping(m) => m.is_empty(),
            Value::Null => true,
            _ => false,
        }
    }

    /// Deserialize the tree into a typed config section
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T> {
        serde_yaml::from_value(self.root.clone())
            .with_context(|| "Failed to deserialize configuration section")
    }

    /// Typed section for `scope`, falling back to the `shared` section
    pub fn section<T: DeserializeOwned>(&self, scope: &str, shared: &str) -> Result<T> {
        self.scoped(scope)
            .with_fallback(self.scoped(shared))
            .deserialize()
            .with_context(|| format!("Invalid configuration for '{}'", scope))
    }
}

fn merge(primary: Value, fallback: Value) -> Value {
    match (primary, fallback) {
        (Value::Mapping(mut primary), Value::Mapping(fallback)) => {
            for (key, fallback_value) in fallback {
                let merged = match primary.remove(&key) {
                    Some(value) => merge(value, fallback_value),
                    None => fallback_value,
                };
                primary.insert(key, merged);
            }
            Value::Mapping(primary)
        }
        (Value::Null, fallback) => fallback,
        (primary, _) => primary,
    }
}

/// Use `value` when set, otherwise read the environment variable `var`
pub fn value_or_env(value: Option<String>, var: &str) -> Result<String> {
    match value {
        Some(value) => Ok(value),
        None => std::env::var(var)
            .with_context(|| format!("{} not configured and environment variable not set", var)),
    }
}
