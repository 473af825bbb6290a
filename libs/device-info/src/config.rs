//! Configuration for device information collection.
//!
//! Layered the same way as the server configuration:
//! 1) defaults -> 2) YAML file (if provided) -> 3) env (`DEVICE_INFO__*`)

use crate::error::DeviceInfoError;
use crate::notifications::ChangeFeed;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

/// Environment variable prefix; `__` separates nested keys.
pub const ENV_PREFIX: &str = "DEVICE_INFO__";

/// Env keys taken verbatim instead of being parsed as YAML-like scalars
const APP_TEXT_KEYS: [&str; 3] = ["app.name", "app.version", "app.build"];

/// Application identity for hosts without a bundle manifest
///
/// Unquoted numbers in YAML (`build: 42`) are accepted and kept as text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppIdentity {
    #[serde(deserialize_with = "scalar_as_text")]
    pub name: Option<String>,
    #[serde(deserialize_with = "scalar_as_text")]
    pub version: Option<String>,
    #[serde(deserialize_with = "scalar_as_text")]
    pub build: Option<String>,
}

fn scalar_as_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Unsigned(u64),
        Signed(i64),
        Float(f64),
        Flag(bool),
    }

    Ok(
        Option::<Scalar>::deserialize(deserializer)?.map(|scalar| match scalar {
            Scalar::Text(text) => text,
            Scalar::Unsigned(n) => n.to_string(),
            Scalar::Signed(n) => n.to_string(),
            Scalar::Float(n) => n.to_string(),
            Scalar::Flag(b) => b.to_string(),
        }),
    )
}

/// Merge `DEVICE_INFO__*` variables over `figment`.
///
/// App identity keys bypass scalar parsing so `1.0` stays `"1.0"`.
fn merge_env(figment: Figment) -> Figment {
    let env = Env::prefixed(ENV_PREFIX).split("__");
    let figment = figment.merge(env.clone().ignore(&APP_TEXT_KEYS));

    let app_env = env.only(&APP_TEXT_KEYS);
    app_env.iter().fold(figment, |figment, (key, value)| {
        figment.merge(Serialized::default(key.as_str(), value))
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceInfoConfig {
    pub app: AppIdentity,
    /// Refresh pulled fields before every shared read
    pub refresh_before_read: bool,
    /// Capacity of the environment change feed
    pub change_buffer: usize,
}

impl Default for DeviceInfoConfig {
    fn default() -> Self {
        Self {
            app: AppIdentity::default(),
            refresh_before_read: true,
            change_buffer: ChangeFeed::DEFAULT_CAPACITY,
        }
    }
}

impl DeviceInfoConfig {
    /// Load layered configuration.
    ///
    /// # Errors
    /// Returns `DeviceInfoError::ConfigFileMissing` if `path` is given but is
    /// not a file, and `DeviceInfoError::InvalidConfig` if a layer cannot be
    /// deserialized.
    pub fn load(path: Option<&Path>) -> Result<Self, DeviceInfoError> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));

        if let Some(path) = path {
            if !path.is_file() {
                return Err(DeviceInfoError::ConfigFileMissing(path.to_path_buf()));
            }
            figment = figment.merge(Yaml::file(path));
        }

        let config: Self = merge_env(figment).extract()?;

        tracing::debug!(
            refresh_before_read = config.refresh_before_read,
            change_buffer = config.change_buffer,
            "Loaded device information config"
        );

        Ok(config.normalized())
    }

    fn normalized(mut self) -> Self {
        self.change_buffer = self.change_buffer.max(1);
        self
    }

    /// Change feed sized by this configuration
    #[must_use]
    pub fn change_feed(&self) -> ChangeFeed {
        ChangeFeed::new(self.change_buffer)
    }
}
