//! Store configuration parsed from environment variables.

use std::env::VarError;

pub const NAMESPACE_ENV: &str = "PERSISTED_STATE_NAMESPACE";
pub const ABSENT_POLICY_ENV: &str = "PERSISTED_STATE_ABSENT_POLICY";
pub const NAMESPACE_SEPARATOR: char = ':';

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown {ABSENT_POLICY_ENV}: '{0}' (expected 'remove' or 'skip')")]
    UnknownAbsentPolicy(String),
    #[error("{NAMESPACE_ENV} must not contain '{NAMESPACE_SEPARATOR}': '{0}'")]
    InvalidNamespace(String),
    #[error("{0} is set but is not valid unicode")]
    NotUnicode(String),
}

/// What `write` does with a value whose encoding is JSON `null`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AbsentValuePolicy {
    /// Delete the stored entry so the next hydration falls back to the default.
    #[default]
    Remove,
    /// Leave whatever is stored untouched.
    Skip,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreConfig {
    /// Prefix prepended to every key as `"{namespace}:{key}"`.
    pub namespace: Option<String>,
    pub absent_policy: AbsentValuePolicy,
}

impl StoreConfig {
    /// Build config from environment variables.
    ///
    /// Optional:
    /// - `PERSISTED_STATE_NAMESPACE`: key prefix; unset or blank means none
    /// - `PERSISTED_STATE_ABSENT_POLICY`: `remove` (default) or `skip`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for an unknown policy, a namespace containing
    /// the separator, or a variable that is not valid unicode.
    pub fn from_env() -> Result<Self, ConfigError> {
        let namespace = env_var(NAMESPACE_ENV)?;
        let absent_policy = env_var(ABSENT_POLICY_ENV)?;
        Self::from_lookup(|name| match name {
            NAMESPACE_ENV => namespace.clone(),
            ABSENT_POLICY_ENV => absent_policy.clone(),
            _ => None,
        })
    }

    /// Build config from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for an unknown policy or a namespace
    /// containing the separator.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let namespace = parse_namespace(lookup(NAMESPACE_ENV).as_deref())?;
        let absent_policy = parse_absent_policy(lookup(ABSENT_POLICY_ENV).as_deref())?;
        Ok(Self { namespace, absent_policy })
    }

    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    #[must_use]
    pub fn with_absent_policy(mut self, policy: AbsentValuePolicy) -> Self {
        self.absent_policy = policy;
        self
    }

    /// Key actually used in the backing store for logical `key`.
    #[must_use]
    pub fn storage_key(&self, key: &str) -> String {
        match &self.namespace {
            Some(ns) => format!("{ns}{NAMESPACE_SEPARATOR}{key}"),
            None => key.to_owned(),
        }
    }
}

/// Read `name`; unset is `None`, non-unicode is an error.
fn env_var(name: &str) -> Result<Option<String>, ConfigError> {
    match std::env::var(name) {
        Ok(value) => Ok(Some(value)),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(_)) => Err(ConfigError::NotUnicode(name.to_owned())),
    }
}

fn parse_namespace(raw: Option<&str>) -> Result<Option<String>, ConfigError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    if raw.contains(NAMESPACE_SEPARATOR) {
        return Err(ConfigError::InvalidNamespace(raw.to_owned()));
    }
    Ok(Some(raw.to_owned()))
}

fn parse_absent_policy(raw: Option<&str>) -> Result<AbsentValuePolicy, ConfigError> {
    match raw.map_or("remove", str::trim) {
        "remove" => Ok(AbsentValuePolicy::Remove),
        "skip" => Ok(AbsentValuePolicy::Skip),
        other => Err(ConfigError::UnknownAbsentPolicy(other.to_owned())),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
