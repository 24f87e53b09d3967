//! wf-file: Audio file decode and export for WaveForge
//!
//! Decodes WAV and MP3 into the core's stereo [`wf_core::AudioBuffer`] and
//! exports IEEE-float stereo WAV. Everything the DSP core should never see
//! (mono sources, odd sample rates, integer formats) is normalized here.

mod audio_file;
mod error;

pub use audio_file::{decode_audio, write_wav, AudioFormat};
pub use error::{FileError, FileResult};
