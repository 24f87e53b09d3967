//! wf-core: Shared types and utilities for WaveForge
//!
//! This crate provides the foundational types used across all WaveForge
//! crates: the stereo [`AudioBuffer`], the supported [`SampleRate`] set,
//! and decibel conversion helpers.

mod buffer;
mod error;

pub use buffer::*;
pub use error::*;

/// Supported sample rates
///
/// The processing core is specified for 44.1 and 48 kHz only; the file
/// loader conforms everything else to one of these two rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[repr(u32)]
pub enum SampleRate {
    Hz44100 = 44100,
    Hz48000 = 48000,
}

impl SampleRate {
    /// Validate a raw rate in Hz
    pub fn from_hz(hz: u32) -> CoreResult<Self> {
        match hz {
            44100 => Ok(Self::Hz44100),
            48000 => Ok(Self::Hz48000),
            other => Err(CoreError::UnsupportedSampleRate(other)),
        }
    }

    #[inline]
    pub fn as_u32(self) -> u32 {
        self as u32
    }

    #[inline]
    pub fn as_f64(self) -> f64 {
        self as u32 as f64
    }
}

impl Default for SampleRate {
    fn default() -> Self {
        Self::Hz48000
    }
}

/// Convert decibels to linear gain
#[inline]
pub fn db_to_linear(db: f64) -> f64 {
    10.0_f64.powf(db / 20.0)
}

/// Convert linear gain to decibels (caller guards against zero)
#[inline]
pub fn linear_to_db(linear: f64) -> f64 {
    20.0 * linear.log10()
}
