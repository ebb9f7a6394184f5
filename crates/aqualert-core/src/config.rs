use crate::error::AqualertError;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

pub const DEFAULT_SCORER_URL: &str = "http://localhost:8000";
pub const DEFAULT_SCORER_TIMEOUT_MS: u64 = 5000;
/// Longest scorer timeout accepted from configuration.
pub const MAX_SCORER_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_ALERT_AUDIENCE: &str = "Village authorities";

pub const ENV_SCORER_URL: &str = "AQUALERT_SCORER_URL";
pub const ENV_SCORER_TIMEOUT_MS: &str = "AQUALERT_SCORER_TIMEOUT_MS";
pub const ENV_SCORER_ENABLED: &str = "AQUALERT_SCORER_ENABLED";
pub const ENV_ALERT_AUDIENCE: &str = "AQUALERT_ALERT_AUDIENCE";
pub const ENV_THRESHOLDS: &str = "AQUALERT_THRESHOLDS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScorerConfig {
    pub enabled: bool,
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: DEFAULT_SCORER_URL.to_string(),
            timeout: Duration::from_millis(DEFAULT_SCORER_TIMEOUT_MS),
        }
    }
}

impl ScorerConfig {
    /// Set the timeout, clamped to [`MAX_SCORER_TIMEOUT_MS`]. Zero is rejected.
    pub fn with_timeout_ms(mut self, millis: u64) -> Result<Self, AqualertError> {
        self.timeout = Duration::from_millis(checked_timeout(millis)?);
        Ok(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub scorer: ScorerConfig,
    pub alert_audience: String,
    /// Custom threshold table; the built-in table is used when unset.
    pub thresholds_path: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            scorer: ScorerConfig::default(),
            alert_audience: DEFAULT_ALERT_AUDIENCE.to_string(),
            thresholds_path: None,
        }
    }
}

impl EngineConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, AqualertError> {
        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Read configuration from an arbitrary key lookup.
    pub fn from_source<F>(lookup: F) -> Result<Self, AqualertError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = load_or(&lookup, ENV_SCORER_URL, DEFAULT_SCORER_URL.to_string())?;
        let timeout_ms: u64 = load_or(&lookup, ENV_SCORER_TIMEOUT_MS, DEFAULT_SCORER_TIMEOUT_MS)?;
        let enabled: bool = load_or(&lookup, ENV_SCORER_ENABLED, true)?;
        let alert_audience =
            load_or(&lookup, ENV_ALERT_AUDIENCE, DEFAULT_ALERT_AUDIENCE.to_string())?;
        let thresholds_path = lookup(ENV_THRESHOLDS)
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            scorer: ScorerConfig {
                enabled,
                base_url,
                timeout: Duration::from_millis(checked_timeout(timeout_ms)?),
            },
            alert_audience,
            thresholds_path,
        })
    }
}

fn checked_timeout(millis: u64) -> Result<u64, AqualertError> {
    if millis == 0 {
        warn!("Invalid {ENV_SCORER_TIMEOUT_MS} value: must be positive");
        return Err(AqualertError::Config {
            key: ENV_SCORER_TIMEOUT_MS.to_string(),
            value: millis.to_string(),
            reason: "timeout must be at least 1ms".to_string(),
        });
    }
    if millis > MAX_SCORER_TIMEOUT_MS {
        warn!("scorer timeout {millis}ms exceeds {MAX_SCORER_TIMEOUT_MS}ms, clamping");
        return Ok(MAX_SCORER_TIMEOUT_MS);
    }
    Ok(millis)
}

fn load_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, AqualertError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key).filter(|s| !s.trim().is_empty()) {
        None => {
            info!("{key} not set, using default");
            Ok(default)
        }
        Some(raw) => raw.trim().parse::<T>().map_err(|e| {
            warn!("Invalid {key} value: {e}");
            AqualertError::Config {
                key: key.to_string(),
                value: raw.clone(),
                reason: e.to_string(),
            }
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn source(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = EngineConfig::from_source(source(&[])).unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.scorer.base_url, "http://localhost:8000");
        assert_eq!(config.scorer.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_values_read_from_source() {
        let config = EngineConfig::from_source(source(&[
            (ENV_SCORER_URL, "http://scorer.internal:9000"),
            (ENV_SCORER_TIMEOUT_MS, "1500"),
            (ENV_SCORER_ENABLED, "false"),
            (ENV_ALERT_AUDIENCE, "community"),
            (ENV_THRESHOLDS, "/etc/aqualert/limits.json"),
        ]))
        .unwrap();
        assert_eq!(config.scorer.base_url, "http://scorer.internal:9000");
        assert_eq!(config.scorer.timeout, Duration::from_millis(1500));
        assert!(!config.scorer.enabled);
        assert_eq!(config.alert_audience, "community");
        assert_eq!(
            config.thresholds_path,
            Some(PathBuf::from("/etc/aqualert/limits.json"))
        );
    }

    #[test]
    fn test_timeout_clamped() {
        let config =
            EngineConfig::from_source(source(&[(ENV_SCORER_TIMEOUT_MS, "60000")])).unwrap();
        assert_eq!(config.scorer.timeout, Duration::from_millis(MAX_SCORER_TIMEOUT_MS));
    }

    #[test]
    fn test_invalid_timeout_is_config_error() {
        let err =
            EngineConfig::from_source(source(&[(ENV_SCORER_TIMEOUT_MS, "soon")])).unwrap_err();
        assert!(matches!(err, AqualertError::Config { ref key, .. } if key == ENV_SCORER_TIMEOUT_MS));
    }

    #[test]
    fn test_zero_timeout_is_config_error() {
        let err = EngineConfig::from_source(source(&[(ENV_SCORER_TIMEOUT_MS, "0")])).unwrap_err();
        assert!(matches!(err, AqualertError::Config { ref value, .. } if value == "0"));
        assert!(ScorerConfig::default().with_timeout_ms(0).is_err());
    }

    #[test]
    fn test_with_timeout_ms_clamps() {
        let scorer = ScorerConfig::default().with_timeout_ms(9000).unwrap();
        assert_eq!(scorer.timeout, Duration::from_millis(MAX_SCORER_TIMEOUT_MS));
        let scorer = ScorerConfig::default().with_timeout_ms(250).unwrap();
        assert_eq!(scorer.timeout, Duration::from_millis(250));
    }
}
