use std::{
    env,
    io::{self, stdout},
    path::PathBuf,
    time::Instant,
};

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
};

use now_playing::{
    app::{self, App},
    config::{config_dir, Config},
    logging,
    now_playing::Artwork,
    resolver::{AssetResolver, BundleResolver, IMAGE_EXTENSIONS},
    rodio_output::RodioBackend,
    PlaybackSession,
};

fn main() -> io::Result<()> {
    let dir = config_dir();
    logging::init(&dir);

    let mut config = Config::load_or_default(&dir);
    match env::args().nth(1).as_deref() {
        Some("-h" | "--help") => {
            eprintln!("Usage: now-playing [asset-dir]");
            return Ok(());
        }
        Some(asset_dir) => config.asset_dir = PathBuf::from(asset_dir),
        None => {}
    }
    if !config.asset_dir.is_dir() {
        tracing::warn!(dir = %config.asset_dir.display(), "asset directory does not exist");
    }

    let backend = RodioBackend::open_default().map_err(io::Error::other)?;
    let artwork = match BundleResolver::new(&config.asset_dir)
        .extensions(IMAGE_EXTENSIONS)
        .resolve(&config.artwork)
    {
        Some(asset) => Artwork::from_bytes(&asset.bytes),
        None => {
            tracing::warn!(name = %config.artwork, "cover art not found, trying embedded art");
            None
        }
    };
    let session = PlaybackSession::new(backend, BundleResolver::new(&config.asset_dir));
    let mut app = App::new(session, config, artwork);

    let mut terminal = ratatui::init();
    if let Err(err) = execute!(stdout(), EnableMouseCapture) {
        tracing::warn!(%err, "mouse capture unavailable, scrub bar is keyboard only");
    }
    app.activate(Instant::now());
    let result = app::run(&mut terminal, &mut app);
    let _ = execute!(stdout(), DisableMouseCapture);
    ratatui::restore();
    result
}
