//! Built-in mastering presets
//!
//! `Auto` derives its parameters from analysis metrics (see
//! [`crate::auto_preset`]); every other preset is a fixed override applied
//! on top of the current settings.

use crate::settings::MasteringSettings;

/// Built-in preset set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenrePreset {
    /// Metrics-driven; parameters come from the auto-preset engine
    Auto,
    Pop,
    HipHop,
    Edm,
    Rock,
    Acoustic,
}

impl GenrePreset {
    /// All built-in presets, in display order
    pub fn all() -> [GenrePreset; 6] {
        [
            Self::Auto,
            Self::Pop,
            Self::HipHop,
            Self::Edm,
            Self::Rock,
            Self::Acoustic,
        ]
    }

    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Auto => "Auto",
            Self::Pop => "Pop",
            Self::HipHop => "Hip-Hop",
            Self::Edm => "EDM",
            Self::Rock => "Rock",
            Self::Acoustic => "Acoustic",
        }
    }

    /// One-line description
    pub fn description(&self) -> &'static str {
        match self {
            Self::Auto => "Derives every parameter from the analysis of the material",
            Self::Pop => "Present vocals, controlled low end, streaming loudness",
            Self::HipHop => "Weighty lows, relaxed high-pass, loud target",
            Self::Edm => "Dense, wide and loud with saturated transients",
            Self::Rock => "Mid-forward energy with moderate dynamics control",
            Self::Acoustic => "Gentle dynamics, natural width, conservative loudness",
        }
    }

    /// Case-insensitive lookup by display name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::all()
            .into_iter()
            .find(|preset| preset.name().eq_ignore_ascii_case(name))
    }

    /// True for the metrics-driven preset
    pub fn is_auto(&self) -> bool {
        matches!(self, Self::Auto)
    }

    /// Apply this preset's fixed overrides
    ///
    /// `Auto` intentionally changes nothing here — the caller runs the
    /// auto-preset engine instead and applies its snapshot.
    pub fn apply(&self, settings: &mut MasteringSettings) {
        match self {
            Self::Auto => {}
            Self::Pop => {
                settings.equalizer.low_shelf_gain_db = 0.8;
                settings.equalizer.mid_gain_db = 0.6;
                settings.equalizer.mid_freq_hz = 2200.0;
                settings.equalizer.high_shelf_gain_db = 1.2;
                settings.rebalance.vocal_gain_db = 1.5;
                settings.multiband.low.ratio = 2.2;
                settings.multiband.mid.ratio = 2.0;
                settings.multiband.high.ratio = 1.8;
                settings.saturation.drive = 0.18;
                settings.stereo.width = 1.06;
                settings.loudness.target_lufs = -12.0;
            }
            Self::HipHop => {
                settings.high_pass.cutoff_hz = 22.0;
                settings.equalizer.low_shelf_freq_hz = 90.0;
                settings.equalizer.low_shelf_gain_db = 1.8;
                settings.equalizer.high_shelf_gain_db = 0.8;
                settings.rebalance.drum_gain_db = 1.2;
                settings.multiband.low.ratio = 2.6;
                settings.multiband.low.threshold_db = -22.0;
                settings.saturation.drive = 0.20;
                settings.stereo.width = 1.02;
                settings.loudness.target_lufs = -12.0;
            }
            Self::Edm => {
                settings.equalizer.low_shelf_gain_db = 1.5;
                settings.equalizer.high_shelf_gain_db = 1.5;
                settings.multiband.low.ratio = 2.8;
                settings.multiband.mid.ratio = 2.4;
                settings.multiband.high.ratio = 2.2;
                settings.saturation.drive = 0.25;
                settings.stereo.width = 1.12;
                settings.limiter.ceiling_dbtp = -0.9;
                settings.loudness.target_lufs = -9.0;
            }
            Self::Rock => {
                settings.equalizer.mid_gain_db = 1.0;
                settings.equalizer.mid_freq_hz = 1800.0;
                settings.equalizer.high_shelf_gain_db = 0.6;
                settings.rebalance.instrument_gain_db = 1.0;
                settings.multiband.mid.ratio = 2.2;
                settings.saturation.drive = 0.18;
                settings.stereo.width = 1.04;
                settings.loudness.target_lufs = -12.0;
            }
            Self::Acoustic => {
                settings.high_pass.cutoff_hz = 24.0;
                settings.equalizer.high_shelf_gain_db = 0.5;
                settings.multiband.low.ratio = 1.4;
                settings.multiband.mid.ratio = 1.3;
                settings.multiband.high.ratio = 1.3;
                settings.saturation.drive = 0.06;
                settings.stereo.width = 1.0;
                settings.limiter.ceiling_dbtp = -1.2;
                settings.loudness.target_lufs = -16.0;
            }
        }
    }
}
