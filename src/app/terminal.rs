use std::io::IsTerminal;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

pub(crate) fn no_color_env_requested() -> bool {
    std::env::var_os("NO_COLOR").is_some_and(|value| !value.is_empty())
}

pub(crate) fn is_dumb_terminal() -> bool {
    std::env::var("TERM")
        .map(|value| value.eq_ignore_ascii_case("dumb"))
        .unwrap_or(false)
}

pub(crate) fn should_disable_color(no_color_env: bool, dumb_terminal: bool) -> bool {
    no_color_env || dumb_terminal
}

pub(crate) fn should_use_spinner(
    stderr_is_terminal: bool,
    quiet: bool,
    dumb_terminal: bool,
) -> bool {
    stderr_is_terminal && !quiet && !dumb_terminal
}

/// Log level from CLI flags, before `RUST_LOG` and the config file.
///
/// Returns `None` when no flag was given.
pub(crate) fn cli_log_level(verbose: u8, quiet: bool) -> Option<&'static str> {
    if quiet {
        return Some("error");
    }
    match verbose {
        0 => None,
        1 => Some("debug"),
        _ => Some("trace"),
    }
}

/// Installs the stderr subscriber. `RUST_LOG` wins over `default_level`.
pub(crate) fn init_tracing(default_level: &str) {
    let no_color = should_disable_color(no_color_env_requested(), is_dumb_terminal());
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(!no_color)
        .with_env_filter(filter)
        .try_init();
}

/// Spinner on stderr, or a hidden bar when output is not interactive.
pub(crate) fn spinner(quiet: bool, message: &str) -> ProgressBar {
    if !should_use_spinner(std::io::stderr().is_terminal(), quiet, is_dumb_terminal()) {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        bar.set_style(style);
    }
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(120));
    bar
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_disable_color_any_source() {
        assert!(!should_disable_color(false, false));
        assert!(should_disable_color(true, false));
        assert!(should_disable_color(false, true));
    }

    #[test]
    fn test_spinner_only_on_interactive_terminal() {
        assert!(should_use_spinner(true, false, false));
        assert!(!should_use_spinner(false, false, false));
        assert!(!should_use_spinner(true, true, false));
        assert!(!should_use_spinner(true, false, true));
    }

    #[test]
    fn test_cli_log_level() {
        assert_eq!(cli_log_level(0, false), None);
        assert_eq!(cli_log_level(1, false), Some("debug"));
        assert_eq!(cli_log_level(3, false), Some("trace"));
        assert_eq!(cli_log_level(2, true), Some("error"));
    }
}
