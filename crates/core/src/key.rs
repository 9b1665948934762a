use serde::{Deserialize, Serialize};

use crate::error::StorageError;

/// Deployment environment. Forms the first segment of every object key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[serde(rename = "dev", alias = "development")]
    Development,
    #[serde(rename = "stage", alias = "staging")]
    Staging,
    #[serde(rename = "prod", alias = "production")]
    Production,
}

impl Environment {
    pub fn tag(&self) -> &'static str {
        match self {
            Environment::Development => "dev",
            Environment::Staging => "stage",
            Environment::Production => "prod",
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

impl std::str::FromStr for Environment {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dev" | "development" => Ok(Environment::Development),
            "stage" | "staging" => Ok(Environment::Staging),
            "prod" | "production" => Ok(Environment::Production),
            _ => Err(StorageError::InvalidEnvironment(s.to_string())),
        }
    }
}

/// Content category, the segment between the environment namespace and the
/// caller's path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Csv,
    Images,
}

impl Category {
    pub fn tag(&self) -> &'static str {
        match self {
            Category::Csv => "csv",
            Category::Images => "images",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// Maps logical paths onto bucket keys of the form
/// `<env>/[dev-<user>/]<category>/<path>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBuilder {
    environment: Environment,
    dev_user: Option<String>,
}

impl KeyBuilder {
    pub fn new(environment: Environment, dev_user: Option<&str>) -> Self {
        let dev_user = dev_user.filter(|u| !u.is_empty()).map(str::to_string);
        Self {
            environment,
            dev_user,
        }
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    pub fn dev_user(&self) -> Option<&str> {
        self.dev_user.as_deref()
    }

    /// The namespace every key of this builder starts with, without a
    /// trailing slash.
    pub fn namespace(&self) -> String {
        match (&self.environment, &self.dev_user) {
            (Environment::Development, Some(user)) => {
                format!("{}/dev-{user}", self.environment)
            }
            _ => self.environment.to_string(),
        }
    }

    /// Full object key for `path` under `category`.
    pub fn build(&self, category: Category, path: &str) -> String {
        let mut key = format!("{}/{category}", self.namespace());
        for segment in segments(path) {
            key.push('/');
            key.push_str(segment);
        }
        key
    }

    /// Listing prefix for `prefix` under `category`. Unlike [`build`], a
    /// trailing `/` survives so that `scraped/a/` does not also match
    /// `scraped/ab/`. An empty prefix lists the whole category.
    ///
    /// [`build`]: KeyBuilder::build
    pub fn build_prefix(&self, category: Category, prefix: &str) -> String {
        let mut key = self.build(category, prefix);
        if prefix.is_empty() || prefix.ends_with('/') {
            key.push('/');
        }
        key
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty() && *s != ".")
}
