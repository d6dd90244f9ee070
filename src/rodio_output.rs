use std::{io::Cursor, rc::Rc, sync::Arc, time::Duration};

use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};

use crate::backend::{AudioBackend, PlaybackTrack};
use crate::error::{LoadError, Result};
use crate::probe::{probe, TrackMeta};
use crate::resolver::Asset;

/// Plays through the default output device.
pub struct RodioBackend {
    stream: Rc<OutputStream>,
}

impl RodioBackend {
    pub fn open_default() -> Result<Self> {
        let stream = OutputStreamBuilder::from_default_device()
            .map_err(|e| LoadError::Output(e.to_string()))?
            .open_stream_or_fallback()
            .map_err(|e| LoadError::Output(e.to_string()))?;
        Ok(RodioBackend {
            stream: Rc::new(stream),
        })
    }
}

impl AudioBackend for RodioBackend {
    type Track = RodioTrack;

    fn prepare(&mut self, asset: Asset) -> Result<RodioTrack> {
        let probed = probe(&asset)?;

        let sink = Sink::connect_new(self.stream.mixer());
        sink.pause();
        let source = Decoder::new(Cursor::new(asset.bytes.clone()))
            .map_err(|e| LoadError::undecodable(&asset.name, e))?;
        sink.append(source);

        Ok(RodioTrack {
            stream: Rc::clone(&self.stream),
            bytes: asset.bytes,
            sink,
            paused: true,
            duration: probed.duration,
            seek_base: Duration::ZERO,
            meta: probed.meta,
            cover: probed.cover,
        })
    }
}

pub struct RodioTrack {
    stream: Rc<OutputStream>,
    bytes: Arc<[u8]>,
    sink: Sink,
    paused: bool,
    duration: Duration,
    seek_base: Duration,
    meta: TrackMeta,
    cover: Option<Vec<u8>>,
}

impl RodioTrack {
    fn is_finished(&self) -> bool {
        self.sink.empty()
    }
}

impl PlaybackTrack for RodioTrack {
    fn duration(&self) -> Duration {
        self.duration
    }

    fn position(&self) -> Duration {
        if self.is_finished() {
            return self.duration;
        }
        (self.seek_base + self.sink.get_pos()).min(self.duration)
    }

    fn is_playing(&self) -> bool {
        !self.paused && !self.is_finished()
    }

    fn play(&mut self) {
        if self.is_finished() {
            self.set_position(Duration::ZERO);
        }
        self.sink.play();
        self.paused = false;
    }

    fn pause(&mut self) {
        self.sink.pause();
        self.paused = true;
    }

    fn set_position(&mut self, position: Duration) {
        let target = position.min(self.duration);
        // A track that ran out on its own is stopped, not playing
        if self.is_finished() {
            self.paused = true;
        }

        // Seek a fresh decoder over the same bytes and swap it in on a new sink
        let mut source = match Decoder::new(Cursor::new(self.bytes.clone())) {
            Ok(source) => source,
            Err(err) => {
                tracing::warn!(%err, "decoder rebuild failed, seek ignored");
                return;
            }
        };
        let base = match source.try_seek(target) {
            Ok(()) => target,
            Err(err) => {
                tracing::warn!(%err, ?target, "decoder refused seek, restarting from zero");
                Duration::ZERO
            }
        };

        self.sink.stop();
        let new_sink = Sink::connect_new(self.stream.mixer());
        new_sink.set_volume(self.sink.volume());
        if self.paused {
            new_sink.pause();
        }
        new_sink.append(source);

        self.sink = new_sink;
        self.seek_base = base;
    }

    fn meta(&self) -> &TrackMeta {
        &self.meta
    }

    fn cover(&self) -> Option<&[u8]> {
        self.cover.as_deref()
    }
}

impl Drop for RodioTrack {
    fn drop(&mut self) {
        self.sink.stop();
    }
}
