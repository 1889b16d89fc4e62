use std::fmt;
use std::str::FromStr;

use anyhow::Result;
use thiserror::Error;
use tracing::{debug, warn};

use crate::db::Database;

const MODE_SETTING_KEY: &str = "presentation_mode";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum PresentationMode {
    Boxed,
    #[default]
    Plain,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown presentation mode '{0}' (expected boxed or plain)")]
pub(crate) struct UnknownMode(pub(crate) String);

impl PresentationMode {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            PresentationMode::Boxed => "boxed",
            PresentationMode::Plain => "plain",
        }
    }

    /// Parses the answer to the toggle dialog: `1`/`0` or the mode names.
    pub(crate) fn from_toggle_answer(raw: &str) -> Option<Self> {
        match raw.trim() {
            "1" => Some(PresentationMode::Boxed),
            "0" => Some(PresentationMode::Plain),
            other => other.parse().ok(),
        }
    }

    pub(crate) fn render(self, message: &str) -> String {
        match self {
            PresentationMode::Boxed => boxed(message),
            PresentationMode::Plain => message.to_string(),
        }
    }
}

impl fmt::Display for PresentationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PresentationMode {
    type Err = UnknownMode;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "boxed" => Ok(PresentationMode::Boxed),
            "plain" => Ok(PresentationMode::Plain),
            _ => Err(UnknownMode(raw.trim().to_string())),
        }
    }
}

fn boxed(message: &str) -> String {
    let expanded = message.replace('\t', "    ");
    let lines: Vec<&str> = expanded.split('\n').collect();
    let width = lines
        .iter()
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0);
    let border = "*".repeat(width + 5);

    let mut out = String::with_capacity((width + 6) * (lines.len() + 2));
    out.push_str(&border);
    for line in lines {
        let pad = width - line.chars().count();
        out.push_str("\n*  ");
        out.push_str(line);
        out.push_str(&" ".repeat(pad));
        out.push_str(" *");
    }
    out.push('\n');
    out.push_str(&border);
    out
}

/// Durable single-valued store for the chosen presentation mode.
pub(crate) trait ModeStore {
    fn mode(&self) -> Result<PresentationMode>;
    fn set_mode(&mut self, mode: PresentationMode) -> Result<()>;
}

impl ModeStore for Database {
    fn mode(&self) -> Result<PresentationMode> {
        let Some(entry) = self.setting(MODE_SETTING_KEY)? else {
            return Ok(PresentationMode::default());
        };
        debug!(key = %entry.key, updated_at = %entry.updated_at, "loaded presentation mode");
        match entry.value.parse() {
            Ok(mode) => Ok(mode),
            Err(err) => {
                warn!(key = %entry.key, %err, "stored presentation mode is invalid, using plain");
                Ok(PresentationMode::default())
            }
        }
    }

    fn set_mode(&mut self, mode: PresentationMode) -> Result<()> {
        self.set_setting(MODE_SETTING_KEY, mode.as_str())
    }
}
