//! Runtime settings for the CLI: flags, environment and config file merged.

pub(crate) mod config;
pub(crate) mod terminal;

use std::time::Duration;

use anyhow::{Context, Result};
use coursekit_core::api::{
    ApiClient, ApiTimeouts, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_REQUEST_TIMEOUT_SECS,
};
use coursekit_core::course::DEFAULT_POLL_INTERVAL;
use coursekit_core::state::{AppState, FileKeyValueStore};
use coursekit_core::{ApplyPolicy, SessionConfig};
use tracing::debug;

use crate::cli::Cli;
use config::FileConfig;

/// Service URL used when no flag, environment variable or config sets one.
pub(crate) const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Environment variable overriding the config file's `base_url`.
pub(crate) const BACKEND_URL_ENV: &str = "COURSEKIT_BACKEND_URL";

#[derive(Debug, Clone)]
pub(crate) struct Settings {
    pub base_url: String,
    pub timeouts: ApiTimeouts,
    pub session: SessionConfig,
    pub log_level: &'static str,
    pub quiet: bool,
}

impl Settings {
    /// Precedence: CLI flag > environment > config file > default.
    pub(crate) fn resolve(args: &Cli, file: Option<&FileConfig>, env_base_url: Option<String>) -> Self {
        let base_url = args
            .base_url
            .clone()
            .or_else(|| env_base_url.filter(|url| !url.trim().is_empty()))
            .or_else(|| file.and_then(|cfg| cfg.base_url.clone()))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let poll_interval = args
            .poll_interval
            .or_else(|| file.and_then(|cfg| cfg.poll_interval_secs))
            .map_or(DEFAULT_POLL_INTERVAL, Duration::from_secs);

        let timeouts = ApiTimeouts {
            connect: Duration::from_secs(
                file.and_then(|cfg| cfg.connect_timeout_secs)
                    .unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS),
            ),
            request: Duration::from_secs(
                file.and_then(|cfg| cfg.request_timeout_secs)
                    .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
            ),
        };

        let log_level = terminal::cli_log_level(args.verbose, args.quiet)
            .or_else(|| file.and_then(|cfg| cfg.verbosity).map(config::VerbositySetting::level))
            .unwrap_or("info");

        Self {
            base_url,
            timeouts,
            session: SessionConfig {
                poll_interval,
                apply_policy: file
                    .and_then(|cfg| cfg.stale_responses)
                    .unwrap_or(ApplyPolicy::LatestRequest),
            },
            log_level,
            quiet: args.quiet,
        }
    }

    /// App state over the persisted session store.
    pub(crate) fn open_state(&self) -> Result<AppState> {
        let api = ApiClient::with_timeouts(&self.base_url, self.timeouts)
            .with_context(|| format!("Invalid service URL '{}'", self.base_url))?;
        let store = FileKeyValueStore::open_default()?;
        debug!(path = %store.path().display(), "Using session store");
        Ok(AppState::restore(api, Box::new(store))?)
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).expect("args parse")
    }

    #[test]
    fn test_defaults_without_config() {
        let settings = Settings::resolve(&parse(&["coursekit", "courses"]), None, None);
        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.session.poll_interval, Duration::from_secs(10));
        assert_eq!(settings.session.apply_policy, ApplyPolicy::LatestRequest);
        assert_eq!(settings.timeouts, ApiTimeouts::default());
        assert_eq!(settings.log_level, "info");
    }

    #[test]
    fn test_flag_beats_env_beats_file() {
        let file = FileConfig {
            base_url: Some("http://file".to_string()),
            poll_interval_secs: Some(30),
            ..FileConfig::default()
        };

        let settings = Settings::resolve(
            &parse(&["coursekit", "courses"]),
            Some(&file),
            Some("http://env".to_string()),
        );
        assert_eq!(settings.base_url, "http://env");
        assert_eq!(settings.session.poll_interval, Duration::from_secs(30));

        let settings = Settings::resolve(
            &parse(&["coursekit", "--base-url", "http://flag", "--poll-interval", "2", "courses"]),
            Some(&file),
            Some("http://env".to_string()),
        );
        assert_eq!(settings.base_url, "http://flag");
        assert_eq!(settings.session.poll_interval, Duration::from_secs(2));

        let settings =
            Settings::resolve(&parse(&["coursekit", "courses"]), Some(&file), Some(" ".to_string()));
        assert_eq!(settings.base_url, "http://file");
    }

    #[test]
    fn test_file_verbosity_and_policy_apply() {
        let file = FileConfig {
            verbosity: Some(config::VerbositySetting::Quiet),
            stale_responses: Some(ApplyPolicy::ArrivalOrder),
            request_timeout_secs: Some(60),
            ..FileConfig::default()
        };
        let settings = Settings::resolve(&parse(&["coursekit", "courses"]), Some(&file), None);
        assert_eq!(settings.log_level, "error");
        assert_eq!(settings.session.apply_policy, ApplyPolicy::ArrivalOrder);
        assert_eq!(settings.timeouts.request, Duration::from_secs(60));

        let settings = Settings::resolve(&parse(&["coursekit", "-v", "courses"]), Some(&file), None);
        assert_eq!(settings.log_level, "debug", "CLI flag beats file verbosity");
    }
}
