//! Playback state for a single track
//!
//! [`PlaybackSession`] sits between the view and an [`AudioBackend`]. The
//! view issues transport commands (play, pause, seek) and calls
//! [`tick`](PlaybackSession::tick) on a fixed cadence to refresh the displayed
//! position. Before a successful [`load`](PlaybackSession::load) every
//! transport command is a no-op and both times read zero.

use std::time::Duration;

use tracing::{debug, error, info};

use crate::backend::{AudioBackend, PlaybackTrack};
use crate::error::{LoadError, Result};
use crate::probe::TrackMeta;
use crate::resolver::AssetResolver;

pub struct PlaybackSession<B: AudioBackend, R: AssetResolver> {
    backend: B,
    resolver: R,
    track: Option<B::Track>,
    name: Option<String>,
    is_playing: bool,
    duration: f64,
    position: f64,
}

impl<B: AudioBackend, R: AssetResolver> PlaybackSession<B, R> {
    pub fn new(backend: B, resolver: R) -> Self {
        PlaybackSession {
            backend,
            resolver,
            track: None,
            name: None,
            is_playing: false,
            duration: 0.0,
            position: 0.0,
        }
    }

    /// Resolve and prepare the named asset.
    ///
    /// Any previously loaded track is released first, so a failed load leaves
    /// the session unloaded. The failure is logged here and returned; it is
    /// never retried.
    pub fn load(&mut self, name: &str) -> Result<()> {
        self.close();

        let prepared = self
            .resolver
            .resolve(name)
            .ok_or_else(|| LoadError::NotFound {
                name: name.to_string(),
            })
            .and_then(|asset| self.backend.prepare(asset));

        match prepared {
            Ok(track) => {
                self.duration = track.duration().as_secs_f64();
                self.track = Some(track);
                self.name = Some(name.to_string());
                info!(name, duration = self.duration, "track loaded");
                Ok(())
            }
            Err(err) => {
                error!(name, %err, "failed to load audio");
                Err(err)
            }
        }
    }

    pub fn play(&mut self) {
        let Some(track) = self.track.as_mut() else {
            return;
        };
        if track.is_playing() {
            self.is_playing = true;
            return;
        }
        track.play();
        self.is_playing = track.is_playing();
        self.position = clamp_secs(track.position().as_secs_f64(), self.duration);
        debug!(position = self.position, "play");
    }

    pub fn pause(&mut self) {
        let Some(track) = self.track.as_mut() else {
            return;
        };
        if !self.is_playing && !track.is_playing() {
            return;
        }
        track.pause();
        self.is_playing = false;
        self.position = clamp_secs(track.position().as_secs_f64(), self.duration);
        debug!(position = self.position, "pause");
    }

    /// The play/pause button.
    pub fn toggle(&mut self) {
        if self.is_playing {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Move the playhead to `target` seconds, clamped to the track.
    ///
    /// Play state is left alone. A NaN target seeks to zero.
    pub fn seek(&mut self, target: f64) {
        let Some(track) = self.track.as_mut() else {
            return;
        };
        let target = if target.is_nan() { 0.0 } else { target };
        let clamped = clamp_secs(target, self.duration);
        track.set_position(Duration::from_secs_f64(clamped));
        if !self.is_playing && track.is_playing() {
            track.pause();
        }
        self.position = clamped;
        debug!(position = clamped, "seek");
    }

    /// Seek relative to where the primitive is now, not the last tick.
    pub fn seek_by(&mut self, delta: f64) {
        let Some(track) = self.track.as_ref() else {
            return;
        };
        let current = track.position().as_secs_f64();
        self.seek(current + delta);
    }

    /// Slider binding: `ratio` of the way through the track.
    pub fn seek_fraction(&mut self, ratio: f64) {
        let ratio = if ratio.is_nan() { 0.0 } else { ratio.clamp(0.0, 1.0) };
        self.seek(ratio * self.duration);
    }

    /// Refresh the cached position from the primitive and return it.
    ///
    /// Also picks up the primitive stopping at the end of the track.
    pub fn tick(&mut self) -> f64 {
        let Some(track) = self.track.as_ref() else {
            return self.position;
        };
        self.position = clamp_secs(track.position().as_secs_f64(), self.duration);
        let playing = track.is_playing();
        if self.is_playing && !playing {
            debug!(position = self.position, "playback reached end of track");
        }
        self.is_playing = playing;
        self.position
    }

    /// Release the track and return to the unloaded state.
    pub fn close(&mut self) {
        if let Some(mut track) = self.track.take() {
            track.pause();
            drop(track);
            info!(name = self.name.as_deref().unwrap_or_default(), "track released");
        }
        self.name = None;
        self.is_playing = false;
        self.duration = 0.0;
        self.position = 0.0;
    }

    pub fn is_loaded(&self) -> bool {
        self.track.is_some()
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn position_seconds(&self) -> f64 {
        self.position
    }

    pub fn duration_seconds(&self) -> f64 {
        self.duration
    }

    /// Fraction of the track played, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        if self.duration > 0.0 {
            (self.position / self.duration).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Name the current track was loaded under.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn meta(&self) -> Option<&TrackMeta> {
        self.track.as_ref().map(|t| t.meta())
    }

    pub fn cover(&self) -> Option<&[u8]> {
        self.track.as_ref().and_then(|t| t.cover())
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl<B: AudioBackend, R: AssetResolver> Drop for PlaybackSession<B, R> {
    fn drop(&mut self) {
        self.close();
    }
}

fn clamp_secs(secs: f64, duration: f64) -> f64 {
    secs.clamp(0.0, duration)
}

/// `MM:SS`, zero padded and floored. Minutes keep counting past an hour.
///
/// Negative or non-finite input reads as `00:00`.
pub fn format_time(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{:02}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_time_pads_and_floors() {
        assert_eq!(format_time(0.0), "00:00");
        assert_eq!(format_time(65.0), "01:05");
        assert_eq!(format_time(3599.0), "59:59");
        assert_eq!(format_time(59.999), "00:59");
        assert_eq!(format_time(180.0), "03:00");
    }

    #[test]
    fn format_time_keeps_counting_minutes() {
        assert_eq!(format_time(3600.0), "60:00");
        assert_eq!(format_time(6000.0), "100:00");
    }

    #[test]
    fn format_time_out_of_domain_reads_zero() {
        assert_eq!(format_time(-3.0), "00:00");
        assert_eq!(format_time(f64::NAN), "00:00");
        assert_eq!(format_time(f64::INFINITY), "00:00");
    }

    #[test]
    fn clamp_bounds_to_track() {
        assert_eq!(clamp_secs(-1.0, 10.0), 0.0);
        assert_eq!(clamp_secs(11.0, 10.0), 10.0);
        assert_eq!(clamp_secs(4.5, 10.0), 4.5);
        assert_eq!(clamp_secs(f64::INFINITY, 10.0), 10.0);
    }
}
