//! The audio primitive a session drives
//!
//! A backend turns asset bytes into a prepared track. The session owns the
//! track exclusively and releases it by dropping it.

use std::time::Duration;

use crate::error::Result;
use crate::probe::TrackMeta;
use crate::resolver::Asset;

/// A loaded, paused-at-zero track.
pub trait PlaybackTrack {
    fn duration(&self) -> Duration;

    /// Current playback position; never past [`duration`](Self::duration).
    fn position(&self) -> Duration;

    /// True while the position is advancing. Turns false on its own when
    /// the end of the track is reached.
    fn is_playing(&self) -> bool;

    fn play(&mut self);

    fn pause(&mut self);

    fn set_position(&mut self, position: Duration);

    /// Tags read while preparing, if the container had any.
    fn meta(&self) -> &TrackMeta;

    /// Embedded cover art bytes.
    fn cover(&self) -> Option<&[u8]> {
        None
    }
}

pub trait AudioBackend {
    type Track: PlaybackTrack;

    fn prepare(&mut self, asset: Asset) -> Result<Self::Track>;
}
