// Process configuration, read once at startup from environment variables
// (after an optional `.env` file has been loaded by `main`).

use crate::api::DEFAULT_BASE_URL;
use crate::menu::MenuProfile;
use crate::poll::PollPolicy;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_key: Option<String>,
    pub base_url: String,
    pub assistant_id: Option<String>,
    pub vector_store_id: Option<String>,
    pub registry_path: PathBuf,
    pub menu: MenuProfile,
    pub poll: PollPolicy,
}

impl Config {
    /// Build the configuration from the real process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key lookup. Blank values count as
    /// unset; numbers that do not parse fall back to their default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let defaults = PollPolicy::default();
        let poll = PollPolicy {
            interval: match parse_or(get("POLL_INTERVAL_MS"), "POLL_INTERVAL_MS", 0u64) {
                // Zero would poll without pausing and never reach max_wait.
                0 => defaults.interval,
                ms => Duration::from_millis(ms),
            },
            backoff: match parse_or(get("POLL_BACKOFF"), "POLL_BACKOFF", defaults.backoff) {
                b if b.is_finite() && b >= 1.0 => b,
                b => {
                    tracing::warn!(value = b, "POLL_BACKOFF must be a finite number of at least 1.0, keeping a fixed interval");
                    defaults.backoff
                }
            },
            max_interval: Duration::from_millis(parse_or(
                get("POLL_MAX_INTERVAL_MS"),
                "POLL_MAX_INTERVAL_MS",
                defaults.max_interval.as_millis() as u64,
            )),
            max_wait: get("POLL_MAX_WAIT_SECS").and_then(|v| match v.parse::<u64>() {
                Ok(secs) => Some(Duration::from_secs(secs)),
                Err(_) => {
                    tracing::warn!(value = %v, "POLL_MAX_WAIT_SECS is not a number, waiting without a deadline");
                    None
                }
            }),
        };

        let menu = match get("ASSISTANT_CLI_MENU").as_deref() {
            Some(v) if v.eq_ignore_ascii_case("extended") => MenuProfile::Extended,
            Some(v) if !v.eq_ignore_ascii_case("standard") => {
                tracing::warn!(value = %v, "unknown ASSISTANT_CLI_MENU, using the standard menu");
                MenuProfile::Standard
            }
            _ => MenuProfile::Standard,
        };

        Config {
            api_key: get("OPENAI_API_KEY"),
            base_url: get("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            assistant_id: get("ASSISTANT_ID"),
            vector_store_id: get("VECTOR_STORE_ID"),
            registry_path: get("ASSISTANTS_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(default_registry_path),
            menu,
            poll,
        }
    }
}

/// `~/.assistant_cli/assistants.json`, or the current directory when there
/// is no home directory.
pub fn default_registry_path() -> PathBuf {
    let dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    dir.join(".assistant_cli").join("assistants.json")
}

fn parse_or<T: FromStr + Copy>(value: Option<String>, key: &str, default: T) -> T {
    match value {
        None => default,
        Some(v) => v.parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %v, "ignoring unparsable setting");
            default
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Config {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|k| env.get(k).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let cfg = config(&[]);
        assert_eq!(cfg.api_key, None);
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.assistant_id, None);
        assert_eq!(cfg.menu, MenuProfile::Standard);
        assert_eq!(cfg.poll, PollPolicy::default());
        assert_eq!(cfg.registry_path, default_registry_path());
    }

    #[test]
    fn reads_ids_and_poll_settings() {
        let cfg = config(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("ASSISTANT_ID", "asst_1"),
            ("VECTOR_STORE_ID", " vs_1 "),
            ("ASSISTANTS_FILE", "/tmp/a.json"),
            ("ASSISTANT_CLI_MENU", "Extended"),
            ("POLL_INTERVAL_MS", "250"),
            ("POLL_BACKOFF", "1.5"),
            ("POLL_MAX_WAIT_SECS", "60"),
        ]);
        assert_eq!(cfg.api_key.as_deref(), Some("sk-test"));
        assert_eq!(cfg.assistant_id.as_deref(), Some("asst_1"));
        assert_eq!(cfg.vector_store_id.as_deref(), Some("vs_1"));
        assert_eq!(cfg.registry_path, PathBuf::from("/tmp/a.json"));
        assert_eq!(cfg.menu, MenuProfile::Extended);
        assert_eq!(cfg.poll.interval, Duration::from_millis(250));
        assert_eq!(cfg.poll.backoff, 1.5);
        assert_eq!(cfg.poll.max_wait, Some(Duration::from_secs(60)));
    }

    #[test]
    fn blank_and_bad_values_fall_back() {
        let cfg = config(&[
            ("ASSISTANT_ID", "   "),
            ("POLL_INTERVAL_MS", "soon"),
            ("POLL_MAX_WAIT_SECS", "forever"),
        ]);
        assert_eq!(cfg.assistant_id, None);
        assert_eq!(cfg.poll.interval, Duration::from_secs(1));
        assert_eq!(cfg.poll.max_wait, None);
    }

    #[test]
    fn zero_interval_falls_back_to_default() {
        let cfg = config(&[("POLL_INTERVAL_MS", "0"), ("POLL_MAX_WAIT_SECS", "5")]);
        assert_eq!(cfg.poll.interval, Duration::from_secs(1));
        assert_eq!(cfg.poll.max_wait, Some(Duration::from_secs(5)));
    }

    #[test]
    fn non_finite_or_shrinking_backoff_is_rejected() {
        for value in ["inf", "-inf", "NaN", "0.5", "-2"] {
            let cfg = config(&[("POLL_BACKOFF", value)]);
            assert_eq!(cfg.poll.backoff, 1.0, "POLL_BACKOFF={value}");
            assert_eq!(
                cfg.poll.next_delay(Duration::from_secs(1)),
                Duration::from_secs(1)
            );
        }

        let cfg = config(&[("POLL_BACKOFF", "1e300")]);
        assert_eq!(cfg.poll.next_delay(Duration::from_secs(1)), cfg.poll.max_interval);
    }
}
