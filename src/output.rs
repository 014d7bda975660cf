//! # Output Configuration
//!
//! This module controls how both tools present output: whether colors are
//! used, how report fragments are highlighted, and how the `log` backend is
//! set up.
//!
//! Color choice is an explicit [`OutputConfig`] value that callers pass to
//! [`init_logging`] and to the report formatters. Nothing in the crate keeps
//! color state in a global.
//!
//! ## Respecting User Preferences
//!
//! The module respects the following environment variables and flags:
//! - `--color=never|always|auto` - CLI flag for color control
//! - `NO_COLOR` - Disables colors when set (per https://no-color.org/)
//! - `CLICOLOR=0` - Disables colors
//! - `CLICOLOR_FORCE=1` - Forces colors even in non-TTY
//! - `TERM=dumb` - Disables colors for dumb terminals
//!
//! ## Usage
//!
//! ```rust,ignore
//! use edm_tools::output::{init_logging, OutputConfig};
//!
//! let config = OutputConfig::from_env_and_flag("auto");
//! init_logging("edm", false, &config);
//! log::info!("Setting up dependency \"{}\"", config.green("libfoo"));
//! ```

use console::Style;
use log::{Level, LevelFilter};
use std::env;
use std::io::Write;

/// Output configuration for controlling colors.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colors should be used in output.
    pub use_color: bool,
}

impl OutputConfig {
    /// Create an output configuration from environment and CLI flag.
    ///
    /// # Arguments
    /// * `color_flag` - The value of the --color CLI flag: "always", "never", or "auto"
    ///
    /// In auto mode, colors are disabled if:
    /// - `NO_COLOR` environment variable is set (any value, including empty)
    /// - `CLICOLOR=0` is set
    /// - `TERM=dumb` is set
    /// - stderr is not a TTY (unless `CLICOLOR_FORCE=1`)
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    /// Detect whether color output is supported based on environment.
    fn detect_color_support() -> bool {
        // The presence of the variable (even if empty) disables colors
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }

        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }

        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }

        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }

        // Log output goes to stderr
        console::Term::stderr().features().colors_supported()
    }

    /// Create a configuration with colors always enabled.
    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    /// Create a configuration with colors always disabled.
    pub fn without_color() -> Self {
        Self { use_color: false }
    }

    fn paint(&self, style: Style, text: &str) -> String {
        if self.use_color {
            style.force_styling(true).apply_to(text).to_string()
        } else {
            text.to_string()
        }
    }

    /// Highlight names and successful states.
    pub fn green(&self, text: &str) -> String {
        self.paint(Style::new().green(), text)
    }

    /// Highlight failures and remote information.
    pub fn red(&self, text: &str) -> String {
        self.paint(Style::new().red(), text)
    }

    /// Highlight warnings such as a detached HEAD.
    pub fn yellow(&self, text: &str) -> String {
        self.paint(Style::new().yellow(), text)
    }

    /// Style for a whole log line of the given level.
    fn level_style(&self, level: Level) -> Option<Style> {
        if !self.use_color {
            return None;
        }
        let style = match level {
            Level::Trace | Level::Debug => Style::new().color256(8),
            Level::Info => return None,
            Level::Warn => Style::new().yellow(),
            Level::Error => Style::new().red(),
        };
        Some(style.force_styling(true))
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// Format a log line as `[<tool>]: <message>`, styled by level when colors
/// are enabled.
pub fn format_line(config: &OutputConfig, tool: &str, level: Level, message: &str) -> String {
    let line = format!("[{}]: {}", tool, message);
    match config.level_style(level) {
        Some(style) => style.apply_to(line).to_string(),
        None => line,
    }
}

/// Initialise the `env_logger` backend for one of the binaries.
///
/// `verbose` selects `debug` instead of `info`; `RUST_LOG` still overrides
/// the level. Calling this more than once is harmless.
pub fn init_logging(tool: &'static str, verbose: bool, config: &OutputConfig) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let config = config.clone();

    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format(move |buf, record| {
            let message = record.args().to_string();
            writeln!(buf, "{}", format_line(&config, tool, record.level(), &message))
        })
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn with_env<F: FnOnce()>(vars: &[(&str, Option<&str>)], f: F) {
        let saved: Vec<_> = vars.iter().map(|(k, _)| (*k, env::var_os(k))).collect();
        for (key, value) in vars {
            match value {
                Some(v) => env::set_var(key, v),
                None => env::remove_var(key),
            }
        }
        f();
        for (key, value) in saved {
            match value {
                Some(v) => env::set_var(key, v),
                None => env::remove_var(key),
            }
        }
    }

    #[test]
    #[serial]
    fn test_auto_respects_no_color() {
        with_env(
            &[("NO_COLOR", Some("")), ("CLICOLOR_FORCE", Some("1"))],
            || assert!(!OutputConfig::from_env_and_flag("auto").use_color),
        );
    }

    #[test]
    #[serial]
    fn test_auto_respects_clicolor_zero() {
        with_env(
            &[
                ("NO_COLOR", None),
                ("CLICOLOR", Some("0")),
                ("CLICOLOR_FORCE", Some("1")),
            ],
            || assert!(!OutputConfig::from_env_and_flag("auto").use_color),
        );
    }

    #[test]
    #[serial]
    fn test_auto_clicolor_force() {
        with_env(
            &[
                ("NO_COLOR", None),
                ("CLICOLOR", None),
                ("CLICOLOR_FORCE", Some("1")),
            ],
            || assert!(OutputConfig::from_env_and_flag("auto").use_color),
        );
    }

    #[test]
    #[serial]
    fn test_always_ignores_no_color() {
        with_env(&[("NO_COLOR", Some("1"))], || {
            assert!(OutputConfig::from_env_and_flag("always").use_color)
        });
    }

    #[test]
    fn test_color_always() {
        let config = OutputConfig::from_env_and_flag("always");
        assert!(config.use_color);
    }

    #[test]
    fn test_color_never() {
        let config = OutputConfig::from_env_and_flag("never");
        assert!(!config.use_color);
    }

    #[test]
    fn test_paint_without_color_is_plain() {
        let config = OutputConfig::without_color();
        assert_eq!(config.green("libfoo"), "libfoo");
        assert_eq!(config.red("dirty"), "dirty");
        assert_eq!(config.yellow("detached HEAD"), "detached HEAD");
    }

    #[test]
    fn test_paint_with_color_adds_escape_codes() {
        let config = OutputConfig::with_color();
        let painted = config.green("libfoo");
        assert!(painted.contains("libfoo"));
        assert!(painted.contains('\u{1b}'));
    }

    #[test]
    fn test_format_line_plain() {
        let config = OutputConfig::without_color();
        assert_eq!(
            format_line(&config, "edm", Level::Warn, "already exists"),
            "[edm]: already exists"
        );
    }

    #[test]
    fn test_format_line_info_is_never_styled() {
        let config = OutputConfig::with_color();
        assert_eq!(
            format_line(&config, "edm", Level::Info, "Done."),
            "[edm]: Done."
        );
    }

    #[test]
    fn test_format_line_error_is_styled_with_color() {
        let config = OutputConfig::with_color();
        let line = format_line(&config, "edm", Level::Error, "Aborting.");
        assert!(line.contains("[edm]: Aborting."));
        assert!(line.contains('\u{1b}'));
    }
}
