mod args;
mod chat;
mod dirs;
mod export;
mod spinner;
mod views;

use std::io;

use chat_app::{AppPaths, AppState, ensure_app_data_dir, import_legacy_settings};
use tracing_subscriber::EnvFilter;

const API_KEY_ENV: &str = "CHATAI_API_KEY";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let args = args::parse_args().map_err(|err| {
        eprintln!("{err}");
        args::print_help();
        io::Error::new(io::ErrorKind::InvalidInput, "invalid arguments")
    })?;

    let data_dir = match args.data_dir {
        Some(dir) => dir,
        None => dirs::resolve_data_dir().map_err(io::Error::other)?,
    };
    let paths = AppPaths::new(data_dir);
    ensure_app_data_dir(&paths)
        .map_err(|err| io::Error::other(format!("create data dir: {err}")))?;

    let state = AppState::new(paths.db_path.clone());
    state
        .setup_db()
        .map_err(|err| io::Error::other(format!("failed to initialize database: {err}")))?;
    tracing::debug!(db = %state.config.db_path.display(), "database ready");

    let credential = std::env::var(API_KEY_ENV).ok();
    match state.open_db() {
        Ok(mut db) => {
            if let Err(err) =
                import_legacy_settings(&mut db, &paths.legacy_settings_path, credential.as_deref())
            {
                eprintln!("failed to import legacy settings: {err}");
            }
        }
        Err(err) => eprintln!("failed to open database for legacy import: {err}"),
    }

    views::run_main_menu(&state)?;
    Ok(())
}
