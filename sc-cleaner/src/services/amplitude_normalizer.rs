//! Amplify quiet tracks up to a target loudness
//!
//! Runs before silence detection so quiet-but-non-silent passages are not
//! classified as silence by the fixed threshold.

use crate::models::Track;

/// Loudness normalizer (boost only, never attenuates)
#[derive(Debug, Clone, Copy)]
pub struct AmplitudeNormalizer {
    target_volume_db: f64,
}

impl AmplitudeNormalizer {
    pub fn new(target_volume_db: f64) -> Self {
        Self { target_volume_db }
    }

    /// Return the track amplified to the target if it is quieter, else unchanged
    ///
    /// Digital silence (`-inf` dBFS) is returned unchanged: no finite gain
    /// reaches the target.
    pub fn normalize(&self, track: Track) -> Track {
        let loudness = track.loudness_dbfs();

        if loudness.is_finite() && loudness < self.target_volume_db {
            let required_gain = self.target_volume_db - loudness;
            tracing::debug!(
                loudness_db = loudness,
                gain_db = required_gain,
                "Amplifying track to target volume"
            );
            track.apply_gain(required_gain)
        } else {
            track
        }
    }
}
