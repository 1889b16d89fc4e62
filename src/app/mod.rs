mod playback;
mod presentation;
mod process;
mod prompt;
mod provider;
mod results;
mod selection;
mod session;


use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::Cli;
use crate::config::Settings;
use crate::db::Database;
use crate::paths::settings_file_path;

use self::playback::MpvSink;
use self::presentation::ModeStore;
use self::prompt::{Console, Prompter};
use self::provider::YtDlpProvider;
use self::session::Session;

pub fn run(_cli: Cli) -> Result<()> {
    let settings = Settings::from_env();
    let provider = YtDlpProvider::new(settings.ytdlp_bin.clone());
    let sink = MpvSink::new(settings.player_bin.clone());

    ensure_tool(provider.bin(), "pip install yt-dlp")?;
    ensure_tool(sink.bin(), "install mpv with your system package manager")?;

    let store = open_store()?;
    let mode = store.mode()?;
    info!(%mode, page_size = settings.page_size, "starting session");

    let prompter = Prompter::new(Console::stdio(), mode);
    let mut session = Session::new(prompter, provider, sink, store, settings.page_size);
    session.run()
}

fn ensure_tool(bin: &Path, install_hint: &str) -> Result<()> {
    let resolved = which::which(bin).with_context(|| {
        format!(
            "required tool '{}' was not found; install it with: {install_hint}",
            bin.display()
        )
    })?;
    info!(tool = %resolved.display(), "found dependency");
    Ok(())
}

fn open_store() -> Result<Database> {
    let db_path = settings_file_path()?;
    let db = Database::open(&db_path)?;
    db.migrate()?;
    Ok(db)
}
