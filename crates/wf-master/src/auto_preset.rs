//! Metrics-driven parameter derivation
//!
//! Reads one [`AnalysisMetrics`] and synthesizes a full set of chain
//! parameters. Derivation is pure arithmetic over the metrics plus a user
//! strength factor, so identical inputs always produce identical snapshots.

use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisMetrics;
use crate::settings::MasteringSettings;

/// Lower bound of the user strength factor
pub const STRENGTH_MIN: f64 = 0.5;
/// Upper bound of the user strength factor
pub const STRENGTH_MAX: f64 = 2.0;

/// Loudness targets the engine snaps to (LUFS)
const TARGET_CHOICES: [f64; 4] = [-16.0, -14.0, -12.0, -9.0];

/// Every numeric parameter the auto engine derives
///
/// Flattened so a UI can diff it against the live settings; one
/// [`apply_to`](AutoPresetSnapshot::apply_to) call copies it in and
/// force-enables all stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoPresetSnapshot {
    pub high_pass_cutoff_hz: f64,

    pub low_shelf_freq_hz: f64,
    pub low_shelf_gain_db: f64,
    pub mid_freq_hz: f64,
    pub mid_gain_db: f64,
    pub mid_q: f64,
    pub high_shelf_freq_hz: f64,
    pub high_shelf_gain_db: f64,
    pub shelf_q: f64,

    pub low_threshold_db: f64,
    pub mid_threshold_db: f64,
    pub high_threshold_db: f64,
    pub low_ratio: f64,
    pub mid_ratio: f64,
    pub high_ratio: f64,
    pub low_attack_ms: f64,
    pub mid_attack_ms: f64,
    pub high_attack_ms: f64,
    pub low_release_ms: f64,
    pub mid_release_ms: f64,
    pub high_release_ms: f64,

    pub saturation_drive: f64,
    pub stereo_width: f64,
    pub limiter_ceiling_dbtp: f64,
    pub limiter_lookahead_ms: f64,
    pub target_lufs: f64,
}

impl AutoPresetSnapshot {
    /// Copy every derived parameter into the settings tree and enable all
    /// stages
    pub fn apply_to(&self, settings: &mut MasteringSettings) {
        settings.high_pass.enabled = true;
        settings.high_pass.cutoff_hz = self.high_pass_cutoff_hz;

        settings.equalizer.enabled = true;
        settings.equalizer.low_shelf_freq_hz = self.low_shelf_freq_hz;
        settings.equalizer.low_shelf_gain_db = self.low_shelf_gain_db;
        settings.equalizer.mid_freq_hz = self.mid_freq_hz;
        settings.equalizer.mid_gain_db = self.mid_gain_db;
        settings.equalizer.mid_q = self.mid_q;
        settings.equalizer.high_shelf_freq_hz = self.high_shelf_freq_hz;
        settings.equalizer.high_shelf_gain_db = self.high_shelf_gain_db;
        settings.equalizer.shelf_q = self.shelf_q;

        settings.rebalance.enabled = true;

        settings.multiband.enabled = true;
        settings.multiband.low.threshold_db = self.low_threshold_db;
        settings.multiband.mid.threshold_db = self.mid_threshold_db;
        settings.multiband.high.threshold_db = self.high_threshold_db;
        settings.multiband.low.ratio = self.low_ratio;
        settings.multiband.mid.ratio = self.mid_ratio;
        settings.multiband.high.ratio = self.high_ratio;
        settings.multiband.low.attack_ms = self.low_attack_ms;
        settings.multiband.mid.attack_ms = self.mid_attack_ms;
        settings.multiband.high.attack_ms = self.high_attack_ms;
        settings.multiband.low.release_ms = self.low_release_ms;
        settings.multiband.mid.release_ms = self.mid_release_ms;
        settings.multiband.high.release_ms = self.high_release_ms;

        settings.saturation.enabled = true;
        settings.saturation.drive = self.saturation_drive;

        settings.stereo.enabled = true;
        settings.stereo.width = self.stereo_width;

        settings.limiter.enabled = true;
        settings.limiter.ceiling_dbtp = self.limiter_ceiling_dbtp;
        settings.limiter.lookahead_ms = self.limiter_lookahead_ms;

        settings.loudness.enabled = true;
        settings.loudness.target_lufs = self.target_lufs;
    }
}

/// Maps metrics to chain parameters
pub struct AutoPresetEngine;

impl AutoPresetEngine {
    /// Derive a snapshot from metrics at the given strength
    ///
    /// Strength is clamped to [0.5, 2.0]; 1.0 is neutral.
    pub fn derive(metrics: &AnalysisMetrics, strength: f64) -> AutoPresetSnapshot {
        let s = strength.clamp(STRENGTH_MIN, STRENGTH_MAX);

        // Spectral band energies: low = first 20%, mid = 20-70%, high = rest
        let bins = &metrics.spectrum;
        let low_end = bins.len() * 20 / 100;
        let mid_end = bins.len() * 70 / 100;
        let low_energy = mean(&bins[..low_end]);
        let mid_energy = mean(&bins[low_end..mid_end]);
        let high_energy = mean(&bins[mid_end..]);

        let low_to_mid = low_energy / mid_energy.max(1e-9);
        let high_to_mid = high_energy / mid_energy.max(1e-9);
        let avg_energy = (low_energy + mid_energy + high_energy) / 3.0;
        let mid_to_avg = mid_energy / avg_energy.max(1e-9);

        // Character factors, all in [0, 1]
        let dynamics = unit((metrics.crest_factor_db - 8.0) / 8.0);
        let loudness_lift = unit((-12.0 - metrics.integrated_lufs) / 12.0);
        let compression_intensity = unit(0.35 * dynamics + 0.40 * loudness_lift)
            * (0.8 + 0.35 * (s - 1.0));
        let bass_heavy = unit((low_to_mid - 1.10) / 0.70);
        let bass_light = unit((0.92 - low_to_mid) / 0.50);
        let bright = unit((high_to_mid - 1.08) / 0.55);
        let dark = unit((0.90 - high_to_mid) / 0.45);
        let mid_hole = unit((0.95 - mid_to_avg) / 0.35);
        let peak_risk = unit((metrics.true_peak_dbtp + 0.5) / 0.8);

        // Corrective EQ: lean mixes get shelf support, heavy mixes get the
        // high-pass pushed up instead of a cut
        let high_pass_cutoff_hz =
            (24.0 + bass_light * 9.0 * s + peak_risk * 4.0 * s - bass_heavy * 6.0)
                .clamp(20.0, 40.0);

        let low_shelf_freq_hz = (110.0 + bass_heavy * 40.0 - bass_light * 20.0).clamp(80.0, 180.0);
        let mid_freq_hz = (1500.0 - mid_hole * 500.0 + bright * 400.0).clamp(700.0, 2800.0);
        let high_shelf_freq_hz = (9000.0 - dark * 1500.0 + bright * 1200.0).clamp(6500.0, 12000.0);

        let low_shelf_gain_db = ((bass_light * 1.4 - bass_heavy * 1.0) * s).clamp(-2.8, 2.8);
        let mid_gain_db = (mid_hole * 1.2 * s).clamp(-1.2, 2.2);
        let high_shelf_gain_db = ((dark * 1.3 - bright * 0.9) * s).clamp(-2.4, 2.6);

        let shelf_q = (0.70 + 0.25 * bass_heavy + 0.15 * dark).clamp(0.55, 1.20);
        let mid_q = (1.0 + mid_hole * 1.2).clamp(1.0, 2.2);

        // Compression: thresholds track the program RMS, ratios and timing
        // track how much density the material asks for
        let base_threshold_db =
            (metrics.rms_dbfs + 8.5 - compression_intensity * 2.3 * s).clamp(-30.0, -12.0);
        let low_threshold_db = base_threshold_db - 1.5;
        let mid_threshold_db = base_threshold_db;
        let high_threshold_db = base_threshold_db + 1.5;

        let low_ratio = (1.4 + compression_intensity * s * 0.90).clamp(1.2, 3.2);
        let mid_ratio = (1.3 + compression_intensity * s * 0.85).clamp(1.2, 3.0);
        let high_ratio = (1.2 + compression_intensity * s * 0.80).clamp(1.1, 2.8);

        let attack_ms = 12.0 + dynamics * 14.0;
        let release_ms = 140.0 + dynamics * 120.0;
        let low_attack_ms = attack_ms + 6.0;
        let mid_attack_ms = attack_ms;
        let high_attack_ms = attack_ms - 4.0;
        let low_release_ms = release_ms + 35.0;
        let mid_release_ms = release_ms;
        let high_release_ms = release_ms - 20.0;

        let saturation_drive = ((0.08 + 0.16 * compression_intensity) * s).clamp(0.0, 0.35);
        let stereo_width = (1.0 + (0.05 * bright + 0.05 * compression_intensity) * s
            - 0.04 * bass_heavy)
            .clamp(0.90, 1.14);

        let limiter_ceiling_dbtp =
            (-1.0 - peak_risk * 0.6 + (1.0 - compression_intensity) * 0.2).clamp(-1.8, -0.8);
        let limiter_lookahead_ms = (2.0 + dynamics * 4.0 + peak_risk * 1.5).clamp(1.2, 8.0);

        let target_lufs = nearest_target(metrics.integrated_lufs);

        AutoPresetSnapshot {
            high_pass_cutoff_hz,
            low_shelf_freq_hz,
            low_shelf_gain_db,
            mid_freq_hz,
            mid_gain_db,
            mid_q,
            high_shelf_freq_hz,
            high_shelf_gain_db,
            shelf_q,
            low_threshold_db,
            mid_threshold_db,
            high_threshold_db,
            low_ratio,
            mid_ratio,
            high_ratio,
            low_attack_ms,
            mid_attack_ms,
            high_attack_ms,
            low_release_ms,
            mid_release_ms,
            high_release_ms,
            saturation_drive,
            stereo_width,
            limiter_ceiling_dbtp,
            limiter_lookahead_ms,
            target_lufs,
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn unit(x: f64) -> f64 {
    x.clamp(0.0, 1.0)
}

fn nearest_target(integrated_lufs: f64) -> f64 {
    TARGET_CHOICES
        .iter()
        .copied()
        .min_by(|a, b| {
            (a - integrated_lufs)
                .abs()
                .partial_cmp(&(b - integrated_lufs).abs())
                .unwrap()
        })
        .unwrap()
}
