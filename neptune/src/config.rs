//! Provider block parsing and AWS SDK configuration

use crate::tags::{DefaultTagsConfig, IgnoreTagsConfig, KeyValueTags};
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_neptune::config::Credentials;
use thiserror::Error;
use tfplug::types::{AttributePath, Dynamic, DynamicValue};
use tfplug::TfplugError;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("region is required (set in provider config or AWS_REGION env var)")]
    MissingRegion,

    #[error("access_key and secret_key must be set together")]
    IncompleteCredentials,

    #[error("invalid value for {attribute}: {source}")]
    InvalidAttribute {
        attribute: String,
        #[source]
        source: TfplugError,
    },
}

/// Provider configuration after environment fallbacks are applied
#[derive(Debug, Clone, Default)]
pub struct ProviderConfig {
    pub region: String,
    pub profile: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub token: Option<String>,
    pub endpoint: Option<String>,
    pub default_tags: DefaultTagsConfig,
    pub ignore_tags: IgnoreTagsConfig,
}

impl ProviderConfig {
    pub fn from_config(config: &DynamicValue) -> Result<Self, ConfigError> {
        let region = optional_string(config, "region")?
            .or_else(|| env_var("AWS_REGION"))
            .or_else(|| env_var("AWS_DEFAULT_REGION"))
            .ok_or(ConfigError::MissingRegion)?;

        let profile = optional_string(config, "profile")?.or_else(|| env_var("AWS_PROFILE"));

        let access_key = optional_string(config, "access_key")?;
        let secret_key = optional_string(config, "secret_key")?;
        if access_key.is_some() != secret_key.is_some() {
            return Err(ConfigError::IncompleteCredentials);
        }

        let default_tags_path = AttributePath::new("default_tags").index(0).attribute("tags");
        let default_tags = config
            .get_string_map(&default_tags_path)
            .map_err(|source| invalid("default_tags", source))?;

        let ignore_tags = AttributePath::new("ignore_tags").index(0);
        let keys = config
            .get_string_set(&ignore_tags.clone().attribute("keys"))
            .map_err(|source| invalid("ignore_tags.keys", source))?;
        let key_prefixes = config
            .get_string_set(&ignore_tags.attribute("key_prefixes"))
            .map_err(|source| invalid("ignore_tags.key_prefixes", source))?;

        Ok(Self {
            region,
            profile,
            access_key,
            secret_key,
            token: optional_string(config, "token")?,
            endpoint: optional_string(config, "endpoint")?,
            default_tags: DefaultTagsConfig {
                tags: KeyValueTags::from(default_tags),
            },
            ignore_tags: IgnoreTagsConfig {
                keys: keys.into_iter().collect(),
                key_prefixes,
            },
        })
    }

    pub fn partition(&self) -> &'static str {
        partition_for_region(&self.region)
    }

    /// Shared AWS configuration; explicit settings override the default chain
    pub async fn load_sdk_config(&self) -> SdkConfig {
        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(self.region.clone()));

        if let Some(profile) = &self.profile {
            loader = loader.profile_name(profile);
        }
        if let (Some(access_key), Some(secret_key)) = (&self.access_key, &self.secret_key) {
            loader = loader.credentials_provider(Credentials::new(
                access_key,
                secret_key,
                self.token.clone(),
                None,
                "terraform",
            ));
        }
        if let Some(endpoint) = &self.endpoint {
            loader = loader.endpoint_url(endpoint);
        }

        loader.load().await
    }
}

/// AWS partition a region belongs to
pub fn partition_for_region(region: &str) -> &'static str {
    if region.starts_with("cn-") {
        "aws-cn"
    } else if region.starts_with("us-gov-") {
        "aws-us-gov"
    } else if region.starts_with("us-isob-") {
        "aws-iso-b"
    } else if region.starts_with("us-iso-") {
        "aws-iso"
    } else {
        "aws"
    }
}

fn optional_string(config: &DynamicValue, name: &str) -> Result<Option<String>, ConfigError> {
    match config.get(&AttributePath::new(name)) {
        None | Some(Dynamic::Null) => Ok(None),
        Some(Dynamic::String(s)) if s.is_empty() => Ok(None),
        Some(Dynamic::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(invalid(
            name,
            TfplugError::TypeMismatch {
                path: name.to_string(),
                expected: "string".to_string(),
                actual: other.type_name().to_string(),
            },
        )),
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

fn invalid(attribute: &str, source: TfplugError) -> ConfigError {
    ConfigError::InvalidAttribute {
        attribute: attribute.to_string(),
        source,
    }
}
