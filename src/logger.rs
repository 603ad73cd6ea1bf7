//! Structured console logging for poolwatch
//!
//! Provides tagged, colored log output with per-module debug gating:
//! debug lines for a tag are only shown when the process was started with
//! `--debug-<tag>` (or the blanket `--debug` flag).

use chrono::Utc;
use colored::*;
use once_cell::sync::Lazy;
use std::env;
use std::io::{self, Write};

static CMD_ARGS: Lazy<Vec<String>> = Lazy::new(|| env::args().collect());

/// Log categories, one per subsystem
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTag {
    System,
    Config,
    Rpc,
    Database,
    Extract,
}

impl LogTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogTag::System => "SYSTEM",
            LogTag::Config => "CONFIG",
            LogTag::Rpc => "RPC",
            LogTag::Database => "DATABASE",
            LogTag::Extract => "EXTRACT",
        }
    }

    /// Key used in `--debug-<key>` command line flags
    pub fn to_debug_key(&self) -> &'static str {
        match self {
            LogTag::System => "system",
            LogTag::Config => "config",
            LogTag::Rpc => "rpc",
            LogTag::Database => "database",
            LogTag::Extract => "extract",
        }
    }

    fn colored_label(&self) -> ColoredString {
        match self {
            LogTag::System => self.as_str().green().bold(),
            LogTag::Config => self.as_str().cyan().bold(),
            LogTag::Rpc => self.as_str().bright_green().bold(),
            LogTag::Database => self.as_str().bright_blue().bold(),
            LogTag::Extract => self.as_str().magenta().bold(),
        }
    }
}

/// Check if debug output is enabled for a tag via command line args
pub fn is_debug_enabled(tag: LogTag) -> bool {
    let flag = format!("--debug-{}", tag.to_debug_key());
    CMD_ARGS.iter().any(|a| a == "--debug" || *a == flag)
}

/// Log at ERROR level (always shown)
pub fn error(tag: LogTag, message: &str) {
    write_line("❌", tag, &message.red());
}

/// Log at WARNING level
pub fn warning(tag: LogTag, message: &str) {
    write_line("⚠", tag, &message.yellow());
}

/// Log at INFO level
pub fn info(tag: LogTag, message: &str) {
    write_line("ℹ", tag, &message.normal());
}

/// Log at DEBUG level (only shown with --debug-<tag> or --debug)
pub fn debug(tag: LogTag, message: &str) {
    if !is_debug_enabled(tag) {
        return;
    }
    write_line("🐛", tag, &message.dimmed());
}

fn write_line(icon: &str, tag: LogTag, message: &ColoredString) {
    let timestamp = Utc::now().format("%H:%M:%S");
    println!(
        "{} {} {} {}",
        icon,
        tag.colored_label(),
        format!("[{}]", timestamp).dimmed(),
        message
    );
    let _ = io::stdout().flush();
}
