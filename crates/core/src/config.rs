use serde::{Deserialize, Serialize};

const DEFAULT_BUCKET: &str = "default";
const DEFAULT_REGION: &str = "auto";

/// Connection settings for an S3-compatible bucket (AWS S3, Cloudflare R2,
/// MinIO, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub bucket_name: String,
    pub region: String,
    /// Custom endpoint for non-AWS backends. When set, requests use
    /// path-style addressing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            access_key_id: String::new(),
            secret_access_key: String::new(),
            bucket_name: DEFAULT_BUCKET.to_string(),
            region: DEFAULT_REGION.to_string(),
            endpoint: None,
        }
    }
}

impl StorageConfig {
    /// Read settings from the process environment. `S3_*` variables win over
    /// the older `R2_*` names; unset values fall back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(env_var)
    }

    /// Build a config from an arbitrary variable source. Empty values count
    /// as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| {
            [format!("S3_{name}"), format!("R2_{name}")]
                .iter()
                .find_map(|var| lookup(var.as_str()).filter(|v| !v.is_empty()))
        };
        let defaults = Self::default();
        Self {
            access_key_id: get("ACCESS_KEY_ID").unwrap_or_default(),
            secret_access_key: get("SECRET_ACCESS_KEY").unwrap_or_default(),
            bucket_name: get("BUCKET_NAME").unwrap_or(defaults.bucket_name),
            region: get("REGION").unwrap_or(defaults.region),
            endpoint: get("ENDPOINT"),
        }
    }

    pub fn uses_custom_endpoint(&self) -> bool {
        self.endpoint.as_deref().is_some_and(|e| !e.is_empty())
    }
}

/// Developer identifier used to namespace development data (`DEV_USER`).
pub fn dev_user_from_env() -> Option<String> {
    env_var("DEV_USER")
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = StorageConfig::from_lookup(lookup(&[]));
        assert_eq!(config.bucket_name, "default");
        assert_eq!(config.region, "auto");
        assert_eq!(config.endpoint, None);
        assert!(config.access_key_id.is_empty());
        assert!(!config.uses_custom_endpoint());
    }

    #[test]
    fn reads_r2_variables() {
        let config = StorageConfig::from_lookup(lookup(&[
            ("R2_ACCESS_KEY_ID", "key"),
            ("R2_SECRET_ACCESS_KEY", "secret"),
            ("R2_BUCKET_NAME", "scrapes"),
            ("R2_ENDPOINT", "https://acct.r2.cloudflarestorage.com"),
        ]));
        assert_eq!(config.access_key_id, "key");
        assert_eq!(config.secret_access_key, "secret");
        assert_eq!(config.bucket_name, "scrapes");
        assert_eq!(config.region, "auto");
        assert!(config.uses_custom_endpoint());
    }

    #[test]
    fn s3_variables_take_precedence() {
        let config = StorageConfig::from_lookup(lookup(&[
            ("S3_BUCKET_NAME", "primary"),
            ("R2_BUCKET_NAME", "legacy"),
            ("S3_REGION", ""),
            ("R2_REGION", "eu-central-1"),
        ]));
        assert_eq!(config.bucket_name, "primary");
        assert_eq!(config.region, "eu-central-1");
    }
}
