//! Encode trimmed tracks to the configured output format
//!
//! - MP3 via LAME (`mp3lame-encoder`), constant bitrate
//! - WAV via `hound`, 16-bit PCM
//!
//! Samples are clamped to [-1.0, 1.0] at encode time; gain applied upstream
//! may push peaks past full scale.

use std::path::Path;
use thiserror::Error;

use crate::models::{OutputFormat, Track};

/// Export errors
#[derive(Debug, Error)]
pub enum ExportError {
    /// Track has no frames to encode
    #[error("Nothing to export: track is empty")]
    EmptyTrack,

    /// Encoder rejected the stream parameters or the samples
    #[error("Encoding failed: {0}")]
    Encode(String),

    /// Output file could not be written
    #[error("Writing {path} failed: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Track encoder for one output format
#[derive(Debug, Clone, Copy)]
pub struct TrackExporter {
    format: OutputFormat,
    mp3_bitrate_kbps: u32,
}

impl TrackExporter {
    pub fn new(format: OutputFormat, mp3_bitrate_kbps: u32) -> Self {
        Self {
            format,
            mp3_bitrate_kbps,
        }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Encode `track` and write it to `output_path`
    pub fn export(&self, track: &Track, output_path: &Path) -> Result<(), ExportError> {
        if track.is_empty() {
            return Err(ExportError::EmptyTrack);
        }

        match self.format {
            OutputFormat::Wav => self.write_wav(track, output_path),
            OutputFormat::Mp3 => {
                let bytes = self.encode_mp3(track)?;
                std::fs::write(output_path, bytes).map_err(|source| ExportError::Write {
                    path: output_path.display().to_string(),
                    source,
                })
            }
        }
    }

    fn write_wav(&self, track: &Track, output_path: &Path) -> Result<(), ExportError> {
        let channels = u16::try_from(track.channels())
            .map_err(|_| ExportError::Encode(format!("Too many channels: {}", track.channels())))?;

        let spec = hound::WavSpec {
            channels,
            sample_rate: track.sample_rate(),
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let mut writer = hound::WavWriter::create(output_path, spec).map_err(|e| wav_error(e, output_path))?;
        for &sample in track.samples() {
            writer
                .write_sample(to_i16(sample))
                .map_err(|e| wav_error(e, output_path))?;
        }
        writer.finalize().map_err(|e| wav_error(e, output_path))
    }

    fn encode_mp3(&self, track: &Track) -> Result<Vec<u8>, ExportError> {
        use mp3lame_encoder::{Builder, DualPcm, FlushNoGap};

        let channels = track.channels();
        let lame_channels: u8 = if channels == 1 { 1 } else { 2 };

        let mut builder =
            Builder::new().ok_or_else(|| ExportError::Encode("LAME encoder init failed".to_string()))?;

        builder
            .set_num_channels(lame_channels)
            .map_err(|e| ExportError::Encode(format!("LAME set channels failed: {:?}", e)))?;
        builder
            .set_sample_rate(track.sample_rate())
            .map_err(|e| ExportError::Encode(format!("LAME set sample rate failed: {:?}", e)))?;
        builder
            .set_brate(lame_bitrate(self.mp3_bitrate_kbps))
            .map_err(|e| ExportError::Encode(format!("LAME set bitrate failed: {:?}", e)))?;
        builder
            .set_quality(mp3lame_encoder::Quality::Best)
            .map_err(|e| ExportError::Encode(format!("LAME set quality failed: {:?}", e)))?;

        let mut encoder = builder
            .build()
            .map_err(|e| ExportError::Encode(format!("LAME build failed: {:?}", e)))?;

        // Deinterleave; extra channels beyond stereo are dropped
        let num_frames = track.frame_count();
        let mut left: Vec<i16> = Vec::with_capacity(num_frames);
        let mut right: Vec<i16> = Vec::with_capacity(num_frames);

        for frame in track.samples().chunks_exact(channels) {
            let l = to_i16(frame[0]);
            let r = if channels == 1 { l } else { to_i16(frame[1]) };
            left.push(l);
            right.push(r);
        }

        let mut mp3_output: Vec<u8> =
            Vec::with_capacity(mp3lame_encoder::max_required_buffer_size(num_frames));

        let input = DualPcm {
            left: &left,
            right: &right,
        };

        let encoded_size = encoder
            .encode(input, mp3_output.spare_capacity_mut())
            .map_err(|e| ExportError::Encode(format!("LAME encode failed: {:?}", e)))?;

        // SAFETY: encoder wrote encoded_size bytes into spare capacity
        unsafe {
            mp3_output.set_len(encoded_size);
        }

        mp3_output.reserve(7200);
        let flush_size = encoder
            .flush::<FlushNoGap>(mp3_output.spare_capacity_mut())
            .map_err(|e| ExportError::Encode(format!("LAME flush failed: {:?}", e)))?;

        // SAFETY: encoder wrote flush_size bytes into spare capacity
        unsafe {
            mp3_output.set_len(mp3_output.len() + flush_size);
        }

        Ok(mp3_output)
    }
}

fn to_i16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * 32767.0) as i16
}

fn wav_error(e: hound::Error, path: &Path) -> ExportError {
    match e {
        hound::Error::IoError(source) => ExportError::Write {
            path: path.display().to_string(),
            source,
        },
        other => ExportError::Encode(other.to_string()),
    }
}

/// Nearest LAME constant bitrate at or below `kbps` (minimum 96)
fn lame_bitrate(kbps: u32) -> mp3lame_encoder::Bitrate {
    use mp3lame_encoder::Bitrate;

    match kbps {
        0..=111 => Bitrate::Kbps96,
        112..=127 => Bitrate::Kbps112,
        128..=159 => Bitrate::Kbps128,
        160..=191 => Bitrate::Kbps160,
        192..=223 => Bitrate::Kbps192,
        224..=255 => Bitrate::Kbps224,
        256..=319 => Bitrate::Kbps256,
        _ => Bitrate::Kbps320,
    }
}
