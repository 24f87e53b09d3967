//! wf-master: Loudness analysis and mastering chain for WaveForge
//!
//! The numeric engine of the application:
//! - **Analysis**: K-weighted integrated loudness, true peak, RMS, crest
//!   factor and a normalized spectrum ([`AudioAnalyzer`])
//! - **Mastering chain**: high-pass, three-band EQ, pseudo-stem rebalance,
//!   three-band compression, soft-clip saturation, stereo imaging, lookahead
//!   brick-wall limiting and loudness normalization ([`MasteringChain`])
//! - **Auto preset**: metrics-driven parameter derivation
//!   ([`AutoPresetEngine`]) plus fixed genre presets ([`GenrePreset`])
//!
//! The whole core is synchronous and allocation-bounded; a chain clones its
//! input, keeps all stage state for the duration of one `process` call, and
//! never fails on finite input.

pub mod analysis;
pub mod auto_preset;
pub mod chain;
pub mod dynamics;
pub mod eq;
pub mod limiter;
pub mod loudness;
pub mod presets;
pub mod saturation;
pub mod settings;
pub mod stereo;

pub use analysis::{AnalysisMetrics, AudioAnalyzer, SPECTRUM_BINS};
pub use auto_preset::{AutoPresetEngine, AutoPresetSnapshot, STRENGTH_MAX, STRENGTH_MIN};
pub use chain::{MasteringChain, MasteringOutcome};
pub use loudness::{integrated_lufs, LoudnessNormalizer, SILENCE_LUFS};
pub use presets::GenrePreset;
pub use settings::MasteringSettings;
