//! Three-band compression
//!
//! A one-pole crossover splits each sample into low/mid/high, each band runs
//! through its own envelope-follower compressor, and the bands are summed
//! back. Each band owns ONE compressor instance fed by both channels in
//! turn, so envelope and gain state track the combined channel behavior —
//! see DESIGN.md for the channel-sharing note.

use wf_core::AudioBuffer;
use wf_dsp::OnePole;

use crate::settings::{CompressorBandSettings, MultibandSettings};

/// Envelope-follower compressor for a single band
pub struct BandCompressor {
    threshold_db: f64,
    ratio: f64,
    attack: f64,
    release: f64,
    envelope: f64,
    gain: f64,
}

impl BandCompressor {
    /// Create from band settings; attack floors at 0.1 ms, release at 1 ms,
    /// ratio at 1:1
    pub fn new(settings: &CompressorBandSettings, sample_rate: f64) -> Self {
        let attack_s = settings.attack_ms.max(0.1) * 1e-3;
        let release_s = settings.release_ms.max(1.0) * 1e-3;

        Self {
            threshold_db: settings.threshold_db,
            ratio: settings.ratio.max(1.0),
            attack: (-1.0 / (attack_s * sample_rate)).exp(),
            release: (-1.0 / (release_s * sample_rate)).exp(),
            envelope: 0.0,
            gain: 1.0,
        }
    }

    /// Process one sample and advance envelope/gain state
    #[inline]
    pub fn process(&mut self, input: f64) -> f64 {
        let level = input.abs();
        self.envelope = if level > self.envelope {
            self.attack * self.envelope + (1.0 - self.attack) * level
        } else {
            self.release * self.envelope + (1.0 - self.release) * level
        };

        let in_db = 20.0 * self.envelope.max(1e-9).log10();
        let out_db = if in_db <= self.threshold_db {
            in_db
        } else {
            self.threshold_db + (in_db - self.threshold_db) / self.ratio
        };

        let target = 10.0_f64.powf((out_db - in_db) / 20.0);
        self.gain = if target < self.gain {
            self.attack * self.gain + (1.0 - self.attack) * target
        } else {
            self.release * self.gain + (1.0 - self.release) * target
        };

        input * self.gain
    }

    /// Current gain reduction in dB (positive numbers mean reduction)
    pub fn gain_reduction_db(&self) -> f64 {
        -20.0 * self.gain.max(1e-9).log10()
    }
}

/// Three-way split, compress, sum
pub struct MultibandCompressor {
    low_lp: [OnePole; 2],
    high_lp: [OnePole; 2],
    low: BandCompressor,
    mid: BandCompressor,
    high: BandCompressor,
}

impl MultibandCompressor {
    /// Crossovers clamp to 80-400 Hz (low) and 1500-8000 Hz (high)
    pub fn new(settings: &MultibandSettings, sample_rate: f64) -> Self {
        let low_cut = settings.low_cut_hz.clamp(80.0, 400.0);
        let high_cut = settings.high_cut_hz.clamp(1500.0, 8000.0);

        Self {
            low_lp: [
                OnePole::new(low_cut, sample_rate),
                OnePole::new(low_cut, sample_rate),
            ],
            high_lp: [
                OnePole::new(high_cut, sample_rate),
                OnePole::new(high_cut, sample_rate),
            ],
            low: BandCompressor::new(&settings.low, sample_rate),
            mid: BandCompressor::new(&settings.mid, sample_rate),
            high: BandCompressor::new(&settings.high, sample_rate),
        }
    }

    /// Split, compress, and sum every sample in place
    pub fn process(&mut self, buffer: &mut AudioBuffer) {
        let (left, right) = buffer.channels_mut();

        for i in 0..left.len() {
            let l = left[i] as f64;
            let r = right[i] as f64;

            let low_l = self.low_lp[0].process(l);
            let low_r = self.low_lp[1].process(r);
            let high_l = l - self.high_lp[0].process(l);
            let high_r = r - self.high_lp[1].process(r);
            let mid_l = l - low_l - high_l;
            let mid_r = r - low_r - high_r;

            let low_l = self.low.process(low_l);
            let low_r = self.low.process(low_r);
            let mid_l = self.mid.process(mid_l);
            let mid_r = self.mid.process(mid_r);
            let high_l = self.high.process(high_l);
            let high_r = self.high.process(high_r);

            left[i] = (low_l + mid_l + high_l) as f32;
            right[i] = (low_r + mid_r + high_r) as f32;
        }
    }

    /// Low-band gain reduction after processing, in dB
    pub fn low_gain_reduction_db(&self) -> f64 {
        self.low.gain_reduction_db()
    }

    /// Mid-band gain reduction after processing, in dB
    pub fn mid_gain_reduction_db(&self) -> f64 {
        self.mid.gain_reduction_db()
    }

    /// High-band gain reduction after processing, in dB
    pub fn high_gain_reduction_db(&self) -> f64 {
        self.high.gain_reduction_db()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;
    use wf_core::SampleRate;

    fn band(threshold_db: f64, ratio: f64) -> CompressorBandSettings {
        CompressorBandSettings {
            threshold_db,
            ratio,
            attack_ms: 5.0,
            release_ms: 50.0,
        }
    }

    #[test]
    fn test_quiet_signal_passes_untouched() {
        let mut comp = BandCompressor::new(&band(-10.0, 4.0), 48000.0);

        // -40 dB tone stays far below threshold
        let mut max_error = 0.0f64;
        for i in 0..48000 {
            let x = 0.01 * (2.0 * PI * 440.0 * i as f64 / 48000.0).sin();
            let y = comp.process(x);
            max_error = max_error.max((y - x).abs());
        }
        assert!(max_error < 1e-4, "quiet signal altered by {max_error}");
        assert!(comp.gain_reduction_db() < 0.1);
    }

    #[test]
    fn test_loud_signal_is_reduced() {
        let mut comp = BandCompressor::new(&band(-20.0, 4.0), 48000.0);

        let mut out_peak = 0.0f64;
        for i in 0..96000 {
            let x = 0.9 * (2.0 * PI * 440.0 * i as f64 / 48000.0).sin();
            let y = comp.process(x);
            if i > 48000 {
                out_peak = out_peak.max(y.abs());
            }
        }

        // ~ -1 dB input over a -20 dB threshold at 4:1 leaves ~14 dB of
        // reduction once the envelope settles
        assert!(out_peak < 0.35, "expected heavy reduction, got {out_peak}");
        assert!(comp.gain_reduction_db() > 6.0);
    }

    #[test]
    fn test_gain_reduction_starts_at_zero() {
        let comp = BandCompressor::new(&band(-20.0, 2.0), 48000.0);
        assert_eq!(comp.gain_reduction_db(), 0.0);
    }

    #[test]
    fn test_ratio_floors_at_unity() {
        let mut comp = BandCompressor::new(&band(-20.0, 0.2), 48000.0);

        // A ratio below 1 would expand; the floor keeps output <= input
        let mut expanded = false;
        for i in 0..48000 {
            let x = 0.9 * (2.0 * PI * 440.0 * i as f64 / 48000.0).sin();
            let y = comp.process(x);
            if y.abs() > x.abs() + 1e-9 {
                expanded = true;
            }
        }
        assert!(!expanded);
    }

    #[test]
    fn test_multiband_preserves_length() {
        let settings = MultibandSettings::default();
        let mut comp = MultibandCompressor::new(&settings, 48000.0);

        let samples: Vec<f32> = (0..9600)
            .map(|i| 0.5 * (2.0 * PI * 220.0 * i as f64 / 48000.0).sin() as f32)
            .collect();
        let mut buf = AudioBuffer::new(samples.clone(), samples, SampleRate::Hz48000);
        let len = buf.len();

        comp.process(&mut buf);
        assert_eq!(buf.len(), len);
    }

    #[test]
    fn test_multiband_quiet_passthrough_sums_bands() {
        // With thresholds far above the signal the band split must sum back
        // to the input exactly (mid is defined as the residual)
        let settings = MultibandSettings {
            low: band(0.0, 2.0),
            mid: band(0.0, 2.0),
            high: band(0.0, 2.0),
            ..Default::default()
        };
        let mut comp = MultibandCompressor::new(&settings, 48000.0);

        let samples: Vec<f32> = (0..48000)
            .map(|i| 0.2 * (2.0 * PI * 500.0 * i as f64 / 48000.0).sin() as f32)
            .collect();
        let reference = AudioBuffer::new(samples.clone(), samples, SampleRate::Hz48000);
        let mut buf = reference.clone();
        comp.process(&mut buf);

        for (y, x) in buf.left().iter().zip(reference.left()).skip(1000) {
            assert!((y - x).abs() < 1e-5, "split/sum drifted: {y} vs {x}");
        }
    }

    #[test]
    fn test_multiband_reduces_only_loud_band() {
        // Loud bass, no highs: low band compresses, high band stays clean
        let settings = MultibandSettings {
            low: band(-25.0, 3.0),
            mid: band(-25.0, 3.0),
            high: band(-25.0, 3.0),
            ..Default::default()
        };
        let mut comp = MultibandCompressor::new(&settings, 48000.0);

        let samples: Vec<f32> = (0..96000)
            .map(|i| 0.8 * (2.0 * PI * 60.0 * i as f64 / 48000.0).sin() as f32)
            .collect();
        let mut buf = AudioBuffer::new(samples.clone(), samples, SampleRate::Hz48000);
        comp.process(&mut buf);

        assert!(comp.low_gain_reduction_db() > 3.0);
        assert!(comp.high_gain_reduction_db() < 1.0);
    }
}
