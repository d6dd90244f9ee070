//! A single-screen terminal player for one bundled track.
//!
//! [`session::PlaybackSession`] owns the playback state and is handed to the
//! [`app::App`] view, which only renders and forwards gestures. Audio goes
//! through an [`backend::AudioBackend`]: [`rodio_output::RodioBackend`] for a
//! real device, [`simulated::SimulatedBackend`] for tests. Assets are looked
//! up by name through an injected [`resolver::AssetResolver`].

pub mod app;
pub mod backend;
pub mod config;
pub mod controls;
pub mod error;
pub mod gauge;
pub mod logging;
pub mod now_playing;
pub mod probe;
pub mod progress;
pub mod resolver;
pub mod rodio_output;
pub mod session;
pub mod simulated;
pub mod theme;
pub mod timer;
pub mod volume;

pub use error::LoadError;
pub use session::{format_time, PlaybackSession};
