//! A silent backend driven by a hand-advanced clock
//!
//! Tracks are probed exactly like the rodio backend does, so duration and
//! rejection of bad assets match, but nothing reaches an output device and
//! time only moves when the clock is advanced.

use std::{cell::Cell, rc::Rc, time::Duration};

use crate::backend::{AudioBackend, PlaybackTrack};
use crate::error::Result;
use crate::probe::{probe, TrackMeta};
use crate::resolver::Asset;

/// A mono 16-bit PCM WAV of `seconds` of silence, for fixtures.
pub fn silent_wav(seconds: u32, sample_rate: u32) -> Vec<u8> {
    let data_len = seconds * sample_rate * 2;
    let mut out = Vec::with_capacity(44 + data_len as usize);
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_len).to_le_bytes());
    out.extend_from_slice(b"WAVEfmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes()); // PCM
    out.extend_from_slice(&1u16.to_le_bytes()); // mono
    out.extend_from_slice(&sample_rate.to_le_bytes());
    out.extend_from_slice(&(sample_rate * 2).to_le_bytes());
    out.extend_from_slice(&2u16.to_le_bytes());
    out.extend_from_slice(&16u16.to_le_bytes());
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());
    out.resize(44 + data_len as usize, 0);
    out
}

/// Shared, single-threaded time source.
#[derive(Debug, Clone, Default)]
pub struct ManualClock(Rc<Cell<Duration>>);

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.0.get()
    }

    pub fn advance(&self, by: Duration) {
        self.0.set(self.0.get() + by);
    }

    pub fn advance_secs(&self, secs: f64) {
        self.advance(Duration::from_secs_f64(secs));
    }
}

#[derive(Debug, Clone, Default)]
pub struct SimulatedBackend {
    clock: ManualClock,
    prepared: usize,
}

impl SimulatedBackend {
    pub fn new(clock: ManualClock) -> Self {
        SimulatedBackend { clock, prepared: 0 }
    }

    pub fn clock(&self) -> &ManualClock {
        &self.clock
    }

    /// Number of tracks successfully prepared so far.
    pub fn prepared(&self) -> usize {
        self.prepared
    }
}

impl AudioBackend for SimulatedBackend {
    type Track = SimulatedTrack;

    fn prepare(&mut self, asset: Asset) -> Result<SimulatedTrack> {
        let probed = probe(&asset)?;
        self.prepared += 1;
        Ok(SimulatedTrack {
            clock: self.clock.clone(),
            duration: probed.duration,
            base: Duration::ZERO,
            started_at: None,
            meta: probed.meta,
            cover: probed.cover,
        })
    }
}

#[derive(Debug)]
pub struct SimulatedTrack {
    clock: ManualClock,
    duration: Duration,
    base: Duration,
    started_at: Option<Duration>,
    meta: TrackMeta,
    cover: Option<Vec<u8>>,
}

impl PlaybackTrack for SimulatedTrack {
    fn duration(&self) -> Duration {
        self.duration
    }

    fn position(&self) -> Duration {
        let elapsed = self
            .started_at
            .map(|start| self.clock.now().saturating_sub(start))
            .unwrap_or_default();
        (self.base + elapsed).min(self.duration)
    }

    fn is_playing(&self) -> bool {
        self.started_at.is_some() && self.position() < self.duration
    }

    fn play(&mut self) {
        if self.position() >= self.duration {
            self.base = Duration::ZERO;
            self.started_at = None;
        }
        if self.started_at.is_none() {
            self.started_at = Some(self.clock.now());
        }
    }

    fn pause(&mut self) {
        self.base = self.position();
        self.started_at = None;
    }

    fn set_position(&mut self, position: Duration) {
        // A track that ran out on its own is stopped, not playing
        if self.started_at.is_some() && self.position() >= self.duration {
            self.started_at = None;
        }
        self.base = position.min(self.duration);
        if self.started_at.is_some() {
            self.started_at = Some(self.clock.now());
        }
    }

    fn meta(&self) -> &TrackMeta {
        &self.meta
    }

    fn cover(&self) -> Option<&[u8]> {
        self.cover.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(secs: u32) -> (ManualClock, SimulatedTrack) {
        let clock = ManualClock::new();
        let mut backend = SimulatedBackend::new(clock.clone());
        let asset = Asset::new("t", silent_wav(secs, 8000)).with_extension("wav");
        let track = backend.prepare(asset).unwrap();
        assert_eq!(backend.prepared(), 1);
        (clock, track)
    }

    #[test]
    fn advances_only_while_playing() {
        let (clock, mut t) = track(10);
        clock.advance_secs(2.0);
        assert_eq!(t.position(), Duration::ZERO);

        t.play();
        clock.advance_secs(3.0);
        assert_eq!(t.position(), Duration::from_secs(3));

        t.pause();
        clock.advance_secs(3.0);
        assert_eq!(t.position(), Duration::from_secs(3));
        assert!(!t.is_playing());
    }

    #[test]
    fn stops_at_end_and_replays_from_zero() {
        let (clock, mut t) = track(4);
        t.play();
        clock.advance_secs(9.0);
        assert_eq!(t.position(), Duration::from_secs(4));
        assert!(!t.is_playing());

        t.play();
        assert_eq!(t.position(), Duration::ZERO);
        assert!(t.is_playing());
    }

    #[test]
    fn set_position_after_natural_end_stays_stopped() {
        let (clock, mut t) = track(4);
        t.play();
        clock.advance_secs(6.0);
        assert!(!t.is_playing());

        t.set_position(Duration::from_secs(1));
        clock.advance_secs(2.0);
        assert_eq!(t.position(), Duration::from_secs(1));
        assert!(!t.is_playing());
    }

    #[test]
    fn set_position_while_playing_keeps_going() {
        let (clock, mut t) = track(10);
        t.play();
        clock.advance_secs(1.0);
        t.set_position(Duration::from_secs(6));
        clock.advance_secs(1.0);
        assert_eq!(t.position(), Duration::from_secs(7));
    }
}
