//! Audio Decoding Utilities
//!
//! **Purpose:** Decode audio files into interleaved f32 [`Track`] buffers
//!
//! Uses symphonia for format-agnostic decoding (MP3, FLAC, AAC, WAV, OGG, etc.)

use anyhow::{bail, Context, Result};
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::models::Track;

/// Decode audio file to an interleaved f32 track
///
/// **Algorithm:**
/// 1. Open file and probe format using symphonia
/// 2. Find default audio track
/// 3. Create decoder for track codec
/// 4. Decode all packets, copying interleaved f32 samples
/// 5. Skip corrupt packets (logged), stop at end of stream
///
/// # Errors
/// * File I/O errors
/// * Unsupported format
/// * No decodable audio
pub fn decode_track(file_path: &Path) -> Result<Track> {
    tracing::debug!(path = %file_path.display(), "Decoding audio file");

    let file = std::fs::File::open(file_path)
        .with_context(|| format!("Failed to open audio file: {}", file_path.display()))?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    // Create format hint from file extension
    let mut hint = Hint::new();
    if let Some(extension) = file_path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(extension);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .with_context(|| format!("Failed to probe audio file: {}", file_path.display()))?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .context("No audio track found in file")?;

    let track_id = track.id;
    let mut sample_rate = track.codec_params.sample_rate;
    let mut channels = track.codec_params.channels.map(|c| c.count());

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .with_context(|| format!("Failed to create decoder for: {}", file_path.display()))?;

    let mut samples: Vec<f32> = Vec::new();
    let mut sample_buf: Option<SampleBuffer<f32>> = None;
    let mut skipped_packets = 0usize;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                // End of stream
                break;
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => {
                return Err(anyhow::anyhow!("Error reading packet: {}", e));
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            Err(SymphoniaError::DecodeError(e)) => {
                // Corrupt frame: drop it and keep going
                skipped_packets += 1;
                tracing::warn!(path = %file_path.display(), error = %e, "Skipping undecodable packet");
                continue;
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to decode packet in: {}", file_path.display()));
            }
        };

        let spec = *decoded.spec();
        sample_rate.get_or_insert(spec.rate);
        channels.get_or_insert(spec.channels.count());

        let buf = sample_buf.get_or_insert_with(|| {
            SampleBuffer::<f32>::new(decoded.capacity() as u64, spec)
        });
        if buf.capacity() < decoded.capacity() * spec.channels.count() {
            *buf = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
        }
        buf.copy_interleaved_ref(decoded);
        samples.extend_from_slice(buf.samples());
    }

    let (Some(sample_rate), Some(channels)) = (sample_rate, channels) else {
        bail!("No decodable audio in: {}", file_path.display());
    };

    let track = Track::new(samples, channels, sample_rate);

    tracing::debug!(
        path = %file_path.display(),
        sample_rate,
        channels,
        frames = track.frame_count(),
        skipped_packets,
        "Audio decoding complete"
    );

    Ok(track)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_decode_audio_file_not_found() {
        let result = decode_track(Path::new("/nonexistent/file.mp3"));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Failed to open audio file"));
    }

    #[test]
    fn test_decode_garbage_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("noise.mp3");
        std::fs::write(&path, b"definitely not an mp3 stream").unwrap();

        assert!(decode_track(&path).is_err());
    }

    #[test]
    fn test_decode_stereo_wav_keeps_channels() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("stereo.wav");

        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for _ in 0..8000 {
            writer.write_sample(i16::MAX / 2).unwrap();
            writer.write_sample(-(i16::MAX / 2)).unwrap();
        }
        writer.finalize().unwrap();

        let track = decode_track(&path).unwrap();
        assert_eq!(track.channels(), 2);
        assert_eq!(track.sample_rate(), 8000);
        assert_eq!(track.frame_count(), 8000);
        assert_eq!(track.duration_ms(), 1000);
        assert!(track.samples()[0] > 0.49 && track.samples()[1] < -0.49);
    }
}
