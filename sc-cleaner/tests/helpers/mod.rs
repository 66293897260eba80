//! Test Helper Utilities
//!
//! Shared utilities for testing sc-cleaner

#![allow(dead_code)]

pub mod audio_generator;

// Re-export commonly used items
pub use audio_generator::{
    generate_test_library, generate_test_wav, measure_wav, AudioConfig, Part, WavSummary,
};
