//! Mastering chain configuration
//!
//! One sub-record per stage, each with an `enabled` flag and its numeric
//! parameters. Field names carry explicit units. Values are not validated
//! here — every stage clamps its own inputs at construction.

use serde::{Deserialize, Serialize};

/// High-pass cleanup stage settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighPassSettings {
    pub enabled: bool,
    /// Cutoff frequency, clamped by the stage to 20-120 Hz
    pub cutoff_hz: f64,
}

impl Default for HighPassSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            cutoff_hz: 28.0,
        }
    }
}

/// Three-band equalizer settings (low shelf, mid bell, high shelf)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EqualizerSettings {
    pub enabled: bool,
    pub low_shelf_freq_hz: f64,
    pub low_shelf_gain_db: f64,
    pub mid_freq_hz: f64,
    pub mid_gain_db: f64,
    /// Bell Q, clamped by the stage to 0.3-6.0
    pub mid_q: f64,
    pub high_shelf_freq_hz: f64,
    pub high_shelf_gain_db: f64,
    /// Shelf Q for both shelves, clamped by the stage to 0.3-3.0
    pub shelf_q: f64,
}

impl Default for EqualizerSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            low_shelf_freq_hz: 120.0,
            low_shelf_gain_db: 0.0,
            mid_freq_hz: 1400.0,
            mid_gain_db: 0.0,
            mid_q: 1.2,
            high_shelf_freq_hz: 8200.0,
            high_shelf_gain_db: 0.0,
            shelf_q: 0.8,
        }
    }
}

/// Pseudo-stem rebalance settings
///
/// Each gain drives a fixed pair of peaking filters per channel; the stage
/// is a no-op when all three gains sit below 0.01 dB.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebalanceSettings {
    pub enabled: bool,
    /// Vocal emphasis, clamped by the stage to +/-6 dB
    pub vocal_gain_db: f64,
    /// Drum emphasis, clamped by the stage to +/-6 dB
    pub drum_gain_db: f64,
    /// Instrument emphasis, clamped by the stage to +/-6 dB
    pub instrument_gain_db: f64,
}

impl Default for RebalanceSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            vocal_gain_db: 0.0,
            drum_gain_db: 0.0,
            instrument_gain_db: 0.0,
        }
    }
}

/// Per-band compressor settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompressorBandSettings {
    pub threshold_db: f64,
    pub ratio: f64,
    pub attack_ms: f64,
    pub release_ms: f64,
}

/// Three-band compressor settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultibandSettings {
    pub enabled: bool,
    /// Low/mid crossover, clamped by the stage to 80-400 Hz
    pub low_cut_hz: f64,
    /// Mid/high crossover, clamped by the stage to 1500-8000 Hz
    pub high_cut_hz: f64,
    pub low: CompressorBandSettings,
    pub mid: CompressorBandSettings,
    pub high: CompressorBandSettings,
}

impl Default for MultibandSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            low_cut_hz: 160.0,
            high_cut_hz: 4000.0,
            low: CompressorBandSettings {
                threshold_db: -19.5,
                ratio: 2.0,
                attack_ms: 20.0,
                release_ms: 200.0,
            },
            mid: CompressorBandSettings {
                threshold_db: -18.0,
                ratio: 1.8,
                attack_ms: 14.0,
                release_ms: 165.0,
            },
            high: CompressorBandSettings {
                threshold_db: -16.5,
                ratio: 1.6,
                attack_ms: 10.0,
                release_ms: 145.0,
            },
        }
    }
}

/// Soft-clip saturation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaturationSettings {
    pub enabled: bool,
    /// Normalized drive, clamped by the stage to 0-1
    pub drive: f64,
}

impl Default for SaturationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            drive: 0.15,
        }
    }
}

/// Stereo imager settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StereoSettings {
    pub enabled: bool,
    /// Side scale, clamped by the stage to 0.7-1.3
    pub width: f64,
}

impl Default for StereoSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            width: 1.0,
        }
    }
}

/// Brick-wall limiter settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LimiterSettings {
    pub enabled: bool,
    pub ceiling_dbtp: f64,
    /// Lookahead, clamped by the stage to 0.5-10 ms
    pub lookahead_ms: f64,
}

impl Default for LimiterSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            ceiling_dbtp: -1.0,
            lookahead_ms: 5.0,
        }
    }
}

/// Loudness normalizer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoudnessSettings {
    pub enabled: bool,
    pub target_lufs: f64,
}

impl Default for LoudnessSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            target_lufs: -14.0,
        }
    }
}

/// Complete mastering chain configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MasteringSettings {
    pub high_pass: HighPassSettings,
    pub equalizer: EqualizerSettings,
    pub rebalance: RebalanceSettings,
    pub multiband: MultibandSettings,
    pub saturation: SaturationSettings,
    pub stereo: StereoSettings,
    pub limiter: LimiterSettings,
    pub loudness: LoudnessSettings,
}

impl MasteringSettings {
    /// All stages switched off (useful as a pass-through baseline)
    pub fn bypass() -> Self {
        Self {
            high_pass: HighPassSettings {
                enabled: false,
                ..Default::default()
            },
            equalizer: EqualizerSettings {
                enabled: false,
                ..Default::default()
            },
            rebalance: RebalanceSettings {
                enabled: false,
                ..Default::default()
            },
            multiband: MultibandSettings {
                enabled: false,
                ..Default::default()
            },
            saturation: SaturationSettings {
                enabled: false,
                ..Default::default()
            },
            stereo: StereoSettings {
                enabled: false,
                ..Default::default()
            },
            limiter: LimiterSettings {
                enabled: false,
                ..Default::default()
            },
            loudness: LoudnessSettings {
                enabled: false,
                ..Default::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conservative_defaults() {
        let settings = MasteringSettings::default();
        assert_eq!(settings.equalizer.low_shelf_gain_db, 0.0);
        assert_eq!(settings.equalizer.mid_gain_db, 0.0);
        assert_eq!(settings.equalizer.high_shelf_gain_db, 0.0);
        assert!(settings.multiband.low.ratio <= 2.0);
        assert!(settings.multiband.high.ratio >= 1.6);
        assert_eq!(settings.limiter.ceiling_dbtp, -1.0);
        assert_eq!(settings.loudness.target_lufs, -14.0);
        assert_eq!(settings.stereo.width, 1.0);
        assert_eq!(settings.saturation.drive, 0.15);
    }

    #[test]
    fn test_serde_round_trip() {
        let settings = MasteringSettings::default();
        let json = serde_json::to_string(&settings).unwrap();
        let back: MasteringSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, settings);
    }

    #[test]
    fn test_bypass_disables_everything() {
        let settings = MasteringSettings::bypass();
        assert!(!settings.high_pass.enabled);
        assert!(!settings.equalizer.enabled);
        assert!(!settings.rebalance.enabled);
        assert!(!settings.multiband.enabled);
        assert!(!settings.saturation.enabled);
        assert!(!settings.stereo.enabled);
        assert!(!settings.limiter.enabled);
        assert!(!settings.loudness.enabled);
    }
}
