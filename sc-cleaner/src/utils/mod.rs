//! Utility modules for sc-cleaner

pub mod audio_decoder;

pub use audio_decoder::decode_track;
