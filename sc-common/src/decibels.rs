//! Decibel / linear amplitude conversions
//!
//! All levels are relative to digital full scale (dBFS): 0 dB is a full-scale
//! signal, quieter signals are negative.

/// Convert dB to linear amplitude
pub fn db_to_linear(db: f64) -> f64 {
    10.0_f64.powf(db / 20.0)
}

/// Convert linear amplitude to dB
///
/// Returns `f64::NEG_INFINITY` for zero amplitude.
pub fn linear_to_db(linear: f64) -> f64 {
    if linear <= 0.0 {
        return f64::NEG_INFINITY;
    }
    20.0 * linear.log10()
}

/// RMS of a sample block, accumulated in f64
pub fn rms(samples: &[f32]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }

    let sum_squares: f64 = samples.iter().map(|&s| f64::from(s) * f64::from(s)).sum();
    (sum_squares / samples.len() as f64).sqrt()
}
