use std::{fs, path::Path, sync::Mutex};

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_FILE: &str = "now-playing.log";
const DEFAULT_FILTER: &str = "now_playing=info";

/// Route tracing output to a log file under `dir`.
///
/// The terminal belongs to the UI, so nothing is written to stdout/stderr.
/// If the file can't be opened the subscriber still installs, just without
/// an output layer.
pub fn init(dir: &Path) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());

    let file = fs::create_dir_all(dir)
        .and_then(|_| {
            fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(dir.join(LOG_FILE))
        })
        .ok();

    let layer = file.map(|f| fmt::layer().with_ansi(false).with_writer(Mutex::new(f)));

    let _ = tracing_subscriber::registry().with(filter).with(layer).try_init();
}
