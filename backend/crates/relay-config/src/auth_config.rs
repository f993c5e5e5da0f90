use crate::{ConfigError, ConfigErrorResult, DEFAULT_AUTH_ENABLED};

use serde::Deserialize;

/// Shared-secret check on the HTTP publish and search endpoints.
///
/// On by default, so a bare configuration fails validation until a key and
/// secret are supplied or auth is switched off explicitly.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub enabled: bool,
    /// Expected value of the `key` request header
    pub key: Option<String>,
    /// Expected value of the `secret` request header
    pub secret: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            enabled: DEFAULT_AUTH_ENABLED,
            key: None,
            secret: None,
        }
    }
}

impl AuthConfig {
    /// Open endpoints, no credentials checked
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> ConfigErrorResult<()> {
        if !self.enabled {
            return Ok(());
        }

        let present = |value: &Option<String>| value.as_deref().is_some_and(|v| !v.is_empty());

        if !present(&self.key) || !present(&self.secret) {
            return Err(ConfigError::auth(
                "auth.key and auth.secret are required when auth.enabled = true",
            ));
        }

        Ok(())
    }

    /// True when auth is disabled or both values match
    pub fn accepts(&self, key: Option<&str>, secret: Option<&str>) -> bool {
        if !self.enabled {
            return true;
        }

        matches!(
            (self.key.as_deref(), self.secret.as_deref(), key, secret),
            (Some(expected_key), Some(expected_secret), Some(key), Some(secret))
                if expected_key == key && expected_secret == secret
        )
    }
}
