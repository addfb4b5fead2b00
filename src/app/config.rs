//! File configuration for CLI defaults.
//!
//! `config.toml` accepts a flat subset of TOML: one `key = value` per line,
//! double-quoted strings, non-negative integers and `#` comments. Tables,
//! arrays, bare strings and multi-line values are rejected.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use coursekit_core::ApplyPolicy;

/// Config file configuration for coursekit defaults.
#[derive(Debug, Clone, Default)]
pub(crate) struct FileConfig {
    /// Course service base URL.
    pub base_url: Option<String>,
    /// Seconds between polls while materials are generating.
    pub poll_interval_secs: Option<u64>,
    /// Total request timeout in seconds.
    pub request_timeout_secs: Option<u64>,
    /// Connect timeout in seconds.
    pub connect_timeout_secs: Option<u64>,
    /// Default verbosity mode.
    pub verbosity: Option<VerbositySetting>,
    /// How racing poll responses are applied.
    pub stale_responses: Option<ApplyPolicy>,
}

impl FileConfig {
    /// Validates config values against runtime and CLI constraints.
    pub(crate) fn validate(&self) -> Result<()> {
        validate_secs("poll_interval_secs", self.poll_interval_secs)?;
        validate_secs("request_timeout_secs", self.request_timeout_secs)?;
        validate_secs("connect_timeout_secs", self.connect_timeout_secs)?;
        if let Some(base_url) = &self.base_url
            && base_url.trim().is_empty()
        {
            bail!("Invalid config value for `base_url`: must not be empty");
        }
        Ok(())
    }
}

fn validate_secs(field: &str, value: Option<u64>) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };
    if !(1..=3600).contains(&value) {
        bail!("Invalid config value for `{field}`: {value}. Expected range: 1..=3600");
    }
    Ok(())
}

/// Supported config verbosity labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum VerbositySetting {
    Default,
    Verbose,
    Quiet,
    Debug,
}

impl VerbositySetting {
    /// Log level used when neither `RUST_LOG` nor a CLI flag decides.
    #[must_use]
    pub(crate) fn level(self) -> &'static str {
        match self {
            Self::Default => "info",
            Self::Verbose | Self::Debug => "debug",
            Self::Quiet => "error",
        }
    }
}

/// Loaded config metadata.
#[derive(Debug, Clone)]
pub(crate) struct LoadedConfig {
    /// Resolved config path if a base directory is known.
    pub path: Option<PathBuf>,
    /// Parsed file config when a config file exists and was valid.
    pub config: Option<FileConfig>,
}

/// Resolves default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/coursekit/config.toml`
/// 2. `$HOME/.config/coursekit/config.toml`
#[must_use]
pub(crate) fn resolve_default_config_path() -> Option<PathBuf> {
    if let Some(xdg_config_home) = env_var_non_empty_os("XDG_CONFIG_HOME") {
        return Some(
            PathBuf::from(xdg_config_home)
                .join("coursekit")
                .join("config.toml"),
        );
    }

    let home = env_var_non_empty_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("coursekit")
            .join("config.toml"),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<std::ffi::OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Loads config from default path if present.
pub(crate) fn load_default_file_config() -> Result<LoadedConfig> {
    let path = resolve_default_config_path();
    let config = match path.as_deref() {
        Some(path_ref) if path_ref.exists() => Some(load_file_config(path_ref)?),
        _ => None,
    };
    Ok(LoadedConfig { path, config })
}

fn load_file_config(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    parse_config_str(&raw)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))
}

fn parse_config_str(raw: &str) -> Result<FileConfig> {
    let mut cfg = FileConfig::default();
    for (line_index, raw_line) in raw.lines().enumerate() {
        let line = strip_inline_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }
        let line_no = line_index + 1;

        let Some((raw_key, raw_value)) = line.split_once('=') else {
            bail!("Invalid config syntax on line {line_no}: expected key = value");
        };

        let key = raw_key.trim();
        let value = raw_value.trim();
        let context = || format!("Invalid `{key}` value on line {line_no}");

        match key {
            "base_url" => {
                cfg.base_url = Some(parse_string_literal(value).with_context(context)?);
            }
            "poll_interval_secs" => {
                cfg.poll_interval_secs = Some(parse_integer_u64(value).with_context(context)?);
            }
            "request_timeout_secs" => {
                cfg.request_timeout_secs = Some(parse_integer_u64(value).with_context(context)?);
            }
            "connect_timeout_secs" => {
                cfg.connect_timeout_secs = Some(parse_integer_u64(value).with_context(context)?);
            }
            "verbosity" => {
                let parsed = parse_string_literal(value).with_context(context)?;
                cfg.verbosity = Some(parse_verbosity(&parsed).with_context(|| {
                    format!("Invalid `verbosity` value '{parsed}' on line {line_no}")
                })?);
            }
            "stale_responses" => {
                let parsed = parse_string_literal(value).with_context(context)?;
                cfg.stale_responses = Some(parse_apply_policy(&parsed).with_context(|| {
                    format!("Invalid `stale_responses` value '{parsed}' on line {line_no}")
                })?);
            }
            unknown => {
                bail!("Unknown configuration key: '{unknown}' on line {line_no}");
            }
        }
    }
    cfg.validate()?;
    Ok(cfg)
}

fn strip_inline_comment(line: &str) -> &str {
    let mut in_string = false;
    for (index, ch) in line.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..index],
            _ => {}
        }
    }
    line
}

fn parse_string_literal(raw_value: &str) -> Result<String> {
    if raw_value.len() < 2 || !raw_value.starts_with('"') || !raw_value.ends_with('"') {
        bail!("Expected double-quoted string");
    }
    Ok(raw_value[1..raw_value.len() - 1].to_string())
}

fn parse_integer_u64(raw_value: &str) -> Result<u64> {
    let token = raw_value.trim();
    if token.is_empty() {
        bail!("Expected integer value");
    }
    let value = token.parse::<i128>()?;
    if value < 0 {
        bail!("Expected non-negative integer");
    }
    u64::try_from(value).map_err(|_| anyhow::anyhow!("Integer value out of range for u64"))
}

fn parse_verbosity(value: &str) -> Result<VerbositySetting> {
    match value {
        "default" => Ok(VerbositySetting::Default),
        "verbose" => Ok(VerbositySetting::Verbose),
        "quiet" => Ok(VerbositySetting::Quiet),
        "debug" => Ok(VerbositySetting::Debug),
        _ => bail!("Expected one of: default, verbose, quiet, debug"),
    }
}

fn parse_apply_policy(value: &str) -> Result<ApplyPolicy> {
    match value {
        "latest-request" => Ok(ApplyPolicy::LatestRequest),
        "arrival-order" => Ok(ApplyPolicy::ArrivalOrder),
        _ => bail!("Expected one of: latest-request, arrival-order"),
    }
}
