//! # silence-cutter common library
//!
//! Shared code for the silence-cutter workspace:
//! - Error type
//! - Configuration file resolution and loading
//! - Decibel conversions

pub mod config;
pub mod decibels;
pub mod error;

pub use error::{Error, Result};
