use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::utils::error::Error;

const DEFAULT_REQUEUE_AFTER_SECONDS: u64 = 60;
const DEFAULT_ERROR_REQUEUE_SECONDS: u64 = 5;

/// Operator settings read from the process environment.
#[derive(Debug, Clone, PartialEq)]
pub struct OperatorConfig {
    /// Namespace to watch. `None` watches all namespaces.
    pub watch_namespace: Option<String>,

    /// Delay before a successfully reconciled resource is checked again.
    pub requeue_after: Duration,

    /// Delay before a failed reconciliation is retried.
    pub error_requeue_after: Duration,
}

impl Default for OperatorConfig {
    fn default() -> Self {
        OperatorConfig {
            watch_namespace: None,
            requeue_after: Duration::from_secs(DEFAULT_REQUEUE_AFTER_SECONDS),
            error_requeue_after: Duration::from_secs(DEFAULT_ERROR_REQUEUE_SECONDS),
        }
    }
}

impl OperatorConfig {
    /// Reads `WATCH_NAMESPACE`, `REQUEUE_AFTER_SECONDS` and `ERROR_REQUEUE_SECONDS`.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let watch_namespace = lookup("WATCH_NAMESPACE").filter(|namespace| !namespace.is_empty());

        let requeue_after = Duration::from_secs(parse_or(
            &lookup,
            "REQUEUE_AFTER_SECONDS",
            DEFAULT_REQUEUE_AFTER_SECONDS,
        )?);
        let error_requeue_after = Duration::from_secs(parse_or(
            &lookup,
            "ERROR_REQUEUE_SECONDS",
            DEFAULT_ERROR_REQUEUE_SECONDS,
        )?);

        Ok(OperatorConfig {
            watch_namespace,
            requeue_after,
            error_requeue_after,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, Error>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| Error::ConfigError(format!("{} must be a number, got {:?}", key, raw))),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use super::OperatorConfig;

    fn lookup_from(values: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let values: HashMap<String, String> = values
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| values.get(key).cloned()
    }

    #[test]
    fn uses_defaults_when_unset() {
        let config = OperatorConfig::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config, OperatorConfig::default());
    }

    #[test]
    fn reads_overrides() {
        let config = OperatorConfig::from_lookup(lookup_from(&[
            ("WATCH_NAMESPACE", "openstack"),
            ("REQUEUE_AFTER_SECONDS", "120"),
            ("ERROR_REQUEUE_SECONDS", " 10 "),
        ]))
        .unwrap();

        assert_eq!(config.watch_namespace, Some("openstack".to_string()));
        assert_eq!(config.requeue_after, Duration::from_secs(120));
        assert_eq!(config.error_requeue_after, Duration::from_secs(10));
    }

    #[test]
    fn empty_namespace_watches_everything() {
        let config = OperatorConfig::from_lookup(lookup_from(&[("WATCH_NAMESPACE", "")])).unwrap();

        assert_eq!(config.watch_namespace, None);
    }

    #[test]
    fn rejects_malformed_durations() {
        let result = OperatorConfig::from_lookup(lookup_from(&[("REQUEUE_AFTER_SECONDS", "soon")]));

        assert!(result.is_err());
    }
}
