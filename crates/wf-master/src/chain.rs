//! Complete mastering chain
//!
//! Runs the stages in fixed order over a clone of the input:
//! high-pass -> equalizer -> rebalance -> multiband -> saturation ->
//! stereo -> limiter -> loudness normalizer, with a second limiter pass
//! after normalization. Normalization applies a blind global gain, so the
//! safety pass is not optional whenever the limiter is enabled.

use wf_core::AudioBuffer;

use crate::dynamics::MultibandCompressor;
use crate::eq::{EqualizerStage, HighPassStage, RebalanceStage};
use crate::limiter::BrickwallLimiter;
use crate::loudness::LoudnessNormalizer;
use crate::saturation::SaturationStage;
use crate::settings::MasteringSettings;
use crate::stereo::StereoImager;

/// Total dispatch steps, including the limiter safety pass
const CHAIN_STEPS: u32 = 9;

/// Result of one chain run
#[derive(Debug, Clone)]
pub struct MasteringOutcome {
    /// Processed audio, same length and rate as the input
    pub audio: AudioBuffer,
    /// Loudness normalizer gain (dB, 0 when disabled)
    pub applied_gain_db: f64,
    /// Deepest limiter gain reduction across both passes (dB)
    pub peak_reduction_db: f64,
    /// Final multiband gain reduction per band (dB), low/mid/high
    pub band_reduction_db: [f64; 3],
    /// Human-readable stage summary
    pub summary: Vec<String>,
}

/// Ordered stage dispatch with progress reporting
pub struct MasteringChain {
    settings: MasteringSettings,
}

impl MasteringChain {
    /// Create a chain for one configuration
    pub fn new(settings: MasteringSettings) -> Self {
        Self { settings }
    }

    /// Chain configuration
    pub fn settings(&self) -> &MasteringSettings {
        &self.settings
    }

    /// Process without progress reporting
    pub fn process(&self, input: &AudioBuffer) -> MasteringOutcome {
        self.process_with_progress(input, |_, _| {})
    }

    /// Process a buffer, reporting `(percent, message)` before each enabled
    /// stage
    ///
    /// Progress values are monotonically non-decreasing and end at 100. The
    /// input is never mutated; all stage state lives for this call only.
    pub fn process_with_progress<F>(&self, input: &AudioBuffer, mut progress: F) -> MasteringOutcome
    where
        F: FnMut(u8, &str),
    {
        let sample_rate = input.sample_rate().as_f64();
        let mut audio = input.clone();
        let mut summary = Vec::new();

        let mut applied_gain_db = 0.0;
        let mut peak_reduction_db = 0.0f64;
        let mut band_reduction_db = [0.0; 3];

        let mut step = 0u32;
        let report = |step: u32, message: &str, progress: &mut F| {
            let percent = (step * 100 / CHAIN_STEPS) as u8;
            progress(percent, message);
            log::debug!("mastering [{percent:>3}%] {message}");
        };

        if self.settings.high_pass.enabled {
            report(step, "High-pass filter", &mut progress);
            HighPassStage::new(&self.settings.high_pass, sample_rate).process(&mut audio);
            summary.push(format!(
                "High-pass: {:.0} Hz",
                self.settings.high_pass.cutoff_hz.clamp(20.0, 120.0)
            ));
        }
        step += 1;

        if self.settings.equalizer.enabled {
            report(step, "Equalizer", &mut progress);
            EqualizerStage::new(&self.settings.equalizer, sample_rate).process(&mut audio);
            summary.push(format!(
                "EQ: low {:+.1} dB, mid {:+.1} dB, high {:+.1} dB",
                self.settings.equalizer.low_shelf_gain_db,
                self.settings.equalizer.mid_gain_db,
                self.settings.equalizer.high_shelf_gain_db,
            ));
        }
        step += 1;

        if self.settings.rebalance.enabled {
            report(step, "Stem rebalance", &mut progress);
            RebalanceStage::new(&self.settings.rebalance, sample_rate).process(&mut audio);
            summary.push(format!(
                "Rebalance: vocal {:+.1} dB, drums {:+.1} dB, instruments {:+.1} dB",
                self.settings.rebalance.vocal_gain_db,
                self.settings.rebalance.drum_gain_db,
                self.settings.rebalance.instrument_gain_db,
            ));
        }
        step += 1;

        if self.settings.multiband.enabled {
            report(step, "Multiband compressor", &mut progress);
            let mut multiband = MultibandCompressor::new(&self.settings.multiband, sample_rate);
            multiband.process(&mut audio);
            band_reduction_db = [
                multiband.low_gain_reduction_db(),
                multiband.mid_gain_reduction_db(),
                multiband.high_gain_reduction_db(),
            ];
            summary.push(format!(
                "Multiband GR: {:.1}/{:.1}/{:.1} dB",
                band_reduction_db[0], band_reduction_db[1], band_reduction_db[2]
            ));
        }
        step += 1;

        if self.settings.saturation.enabled {
            report(step, "Saturation", &mut progress);
            SaturationStage::new(&self.settings.saturation).process(&mut audio);
            summary.push(format!(
                "Saturation: drive {:.2}",
                self.settings.saturation.drive.clamp(0.0, 1.0)
            ));
        }
        step += 1;

        if self.settings.stereo.enabled {
            report(step, "Stereo imager", &mut progress);
            StereoImager::new(&self.settings.stereo).process(&mut audio);
            summary.push(format!(
                "Stereo width: {:.2}",
                self.settings.stereo.width.clamp(0.7, 1.3)
            ));
        }
        step += 1;

        if self.settings.limiter.enabled {
            report(step, "Limiter", &mut progress);
            let mut limiter = BrickwallLimiter::new(&self.settings.limiter, sample_rate);
            limiter.process(&mut audio);
            peak_reduction_db = peak_reduction_db.max(limiter.peak_reduction_db());
        }
        step += 1;

        if self.settings.loudness.enabled {
            report(step, "Loudness normalizer", &mut progress);
            let normalizer = LoudnessNormalizer::new(&self.settings.loudness);
            applied_gain_db = normalizer.process(&mut audio);
            summary.push(format!(
                "Loudness: {:+.1} dB toward {:.0} LUFS",
                applied_gain_db, self.settings.loudness.target_lufs
            ));

            // Safety pass: normalization gain can push peaks back over the
            // ceiling
            if self.settings.limiter.enabled {
                step += 1;
                report(step, "Limiter safety pass", &mut progress);
                let mut limiter = BrickwallLimiter::new(&self.settings.limiter, sample_rate);
                limiter.process(&mut audio);
                peak_reduction_db = peak_reduction_db.max(limiter.peak_reduction_db());
            }
        }

        if self.settings.limiter.enabled {
            summary.push(format!(
                "Limiter: ceiling {:.1} dBTP, peak reduction {:.1} dB",
                self.settings.limiter.ceiling_dbtp, peak_reduction_db
            ));
        }

        progress(100, "Complete");

        MasteringOutcome {
            audio,
            applied_gain_db,
            peak_reduction_db,
            band_reduction_db,
            summary,
        }
    }
}
