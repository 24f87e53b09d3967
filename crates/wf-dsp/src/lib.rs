//! wf-dsp: DSP primitives for WaveForge
//!
//! Scalar f64 building blocks shared by the analysis and mastering crates:
//! - RBJ cookbook biquad filters (direct form I)
//! - One-pole low-pass smoother for crossovers
//! - In-place radix-2 complex FFT with a Hann window helper

pub mod biquad;
pub mod fft;
pub mod onepole;

pub use biquad::{Biquad, BiquadCoeffs};
pub use fft::{fft_in_place, hann_window};
pub use onepole::OnePole;
