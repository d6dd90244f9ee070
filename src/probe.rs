use std::{io::Cursor, time::Duration};

use symphonia::core::{
    codecs::{DecoderOptions, CODEC_TYPE_NULL},
    formats::{FormatOptions, FormatReader},
    io::MediaSourceStream,
    meta::{MetadataOptions, MetadataRevision, StandardTagKey},
    probe::Hint,
};

use crate::error::{LoadError, Result};
use crate::resolver::Asset;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackMeta {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
}

impl TrackMeta {
    fn absorb(&mut self, rev: &MetadataRevision) {
        for tag in rev.tags() {
            let slot = match tag.std_key {
                Some(StandardTagKey::TrackTitle) => &mut self.title,
                Some(StandardTagKey::Artist) => &mut self.artist,
                Some(StandardTagKey::Album) => &mut self.album,
                _ => continue,
            };
            let value = tag.value.to_string();
            if slot.is_none() && !value.trim().is_empty() {
                *slot = Some(value.trim().to_string());
            }
        }
    }
}

/// What the container header says about an asset.
#[derive(Debug, Clone)]
pub struct ProbedTrack {
    pub duration: Duration,
    pub meta: TrackMeta,
    pub cover: Option<Vec<u8>>,
}

/// Open the asset with symphonia and read its duration, tags and cover art.
///
/// Fails with [`LoadError::Undecodable`] when no format reader or decoder
/// accepts the bytes, so every backend rejects the same assets.
pub fn probe(asset: &Asset) -> Result<ProbedTrack> {
    let source = Cursor::new(asset.bytes.clone());
    let mss = MediaSourceStream::new(Box::new(source), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = asset.extension.as_deref() {
        hint.with_extension(ext);
    }

    let mut probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .map_err(|e| LoadError::undecodable(&asset.name, e))?;

    let mut meta = TrackMeta::default();
    let mut cover = None;
    // ID3 tags are read by the probe, container tags by the reader
    if let Some(rev) = probed.metadata.get().as_ref().and_then(|m| m.current()) {
        meta.absorb(rev);
        cover = rev.visuals().first().map(|v| v.data.to_vec());
    }
    if let Some(rev) = probed.format.metadata().current() {
        meta.absorb(rev);
        if cover.is_none() {
            cover = rev.visuals().first().map(|v| v.data.to_vec());
        }
    }

    let mut reader = probed.format;
    let track = reader
        .default_track()
        .filter(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .or_else(|| {
            reader
                .tracks()
                .iter()
                .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        })
        .cloned()
        .ok_or_else(|| LoadError::undecodable(&asset.name, "no audio track"))?;

    symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| LoadError::undecodable(&asset.name, e))?;

    let time_base = track
        .codec_params
        .time_base
        .ok_or_else(|| LoadError::undecodable(&asset.name, "track has no time base"))?;
    let n_frames = match track.codec_params.n_frames {
        Some(n) => n,
        None => count_frames(reader.as_mut(), track.id),
    };
    let time = time_base.calc_time(n_frames);

    Ok(ProbedTrack {
        duration: Duration::from_secs_f64(time.seconds as f64 + time.frac),
        meta,
        cover,
    })
}

// Streams without a frame count in the header (VBR mp3 without a Xing
// frame) are measured by walking the packets.
fn count_frames(reader: &mut dyn FormatReader, track_id: u32) -> u64 {
    let mut frames = 0u64;
    while let Ok(packet) = reader.next_packet() {
        if packet.track_id() == track_id {
            frames += packet.dur;
        }
    }
    frames
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulated::silent_wav;

    #[test]
    fn wav_duration_comes_from_header() {
        let asset = Asset::new("tone", silent_wav(3, 8000)).with_extension("wav");
        let probed = probe(&asset).unwrap();
        assert_eq!(probed.duration, Duration::from_secs(3));
        assert_eq!(probed.meta, TrackMeta::default());
        assert!(probed.cover.is_none());
    }

    #[test]
    fn garbage_is_undecodable() {
        let asset = Asset::new("noise", vec![0x42u8; 512]);
        match probe(&asset) {
            Err(LoadError::Undecodable { name, .. }) => assert_eq!(name, "noise"),
            other => panic!("expected Undecodable, got {other:?}"),
        }
    }

    #[test]
    fn empty_asset_is_undecodable() {
        let asset = Asset::new("empty", Vec::new()).with_extension("mp3");
        assert!(matches!(probe(&asset), Err(LoadError::Undecodable { .. })));
    }
}
