use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

use tracing::warn;

pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub ytdlp_bin: PathBuf,
    pub player_bin: PathBuf,
    pub page_size: usize,
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var_os(key))
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<OsString>,
    {
        Self {
            ytdlp_bin: bin_from_env(lookup("YT_DLP_BIN"), "yt-dlp"),
            player_bin: bin_from_env(lookup("YT_PLAYER_BIN"), "mpv"),
            page_size: page_size_from_env(lookup("YT_PAGE_SIZE")),
        }
    }
}

fn bin_from_env(env_value: Option<OsString>, fallback: &str) -> PathBuf {
    match env_value {
        Some(value) if !value.is_empty() => PathBuf::from(value),
        _ => PathBuf::from(fallback),
    }
}

fn page_size_from_env(env_value: Option<OsString>) -> usize {
    let Some(raw) = env_value else {
        return DEFAULT_PAGE_SIZE;
    };
    match raw.to_string_lossy().trim().parse::<usize>() {
        Ok(size) if size > 0 => size,
        _ => {
            warn!(value = ?raw, "ignoring invalid YT_PAGE_SIZE, using {DEFAULT_PAGE_SIZE}");
            DEFAULT_PAGE_SIZE
        }
    }
}
