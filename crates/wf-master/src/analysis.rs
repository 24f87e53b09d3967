//! Audio analysis for mastering decisions
//!
//! Produces the objective metrics the auto-preset engine consumes:
//! integrated loudness, true peak, RMS, crest factor, and a normalized
//! 128-bin magnitude spectrum.

use serde::{Deserialize, Serialize};
use wf_core::{linear_to_db, AudioBuffer};
use wf_dsp::{fft_in_place, hann_window};

use crate::loudness::integrated_lufs;

/// Number of bins in the downsampled spectrum
pub const SPECTRUM_BINS: usize = 128;

/// FFT size for spectral analysis
const FFT_SIZE: usize = 2048;

/// Oversampling factor for the true-peak estimate
const TRUE_PEAK_FACTOR: usize = 4;

/// Objective metrics of one analysis pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisMetrics {
    /// Integrated loudness (LUFS)
    pub integrated_lufs: f64,
    /// Inter-sample peak estimate (dBTP)
    pub true_peak_dbtp: f64,
    /// Whole-buffer RMS (dBFS)
    pub rms_dbfs: f64,
    /// Peak-to-RMS ratio (dB)
    pub crest_factor_db: f64,
    /// Magnitude spectrum, 128 values normalized to [0, 1] by the maximum
    pub spectrum: Vec<f64>,
}

impl AnalysisMetrics {
    /// Sentinel metrics for buffers too short to analyze
    pub fn degenerate() -> Self {
        Self {
            integrated_lufs: -70.0,
            true_peak_dbtp: -90.0,
            rms_dbfs: -90.0,
            crest_factor_db: 0.0,
            spectrum: vec![0.0; SPECTRUM_BINS],
        }
    }
}

/// Whole-buffer analyzer
pub struct AudioAnalyzer {
    window: Vec<f64>,
}

impl AudioAnalyzer {
    /// Create an analyzer (caches the Hann window)
    pub fn new() -> Self {
        Self {
            window: hann_window(FFT_SIZE),
        }
    }

    /// Compute all metrics for a buffer
    pub fn analyze(&self, buffer: &AudioBuffer) -> AnalysisMetrics {
        if buffer.len() < 2 {
            return AnalysisMetrics::degenerate();
        }

        let peak = true_peak_linear(buffer.left(), buffer.right());
        let rms = rms_linear(buffer.left(), buffer.right());

        AnalysisMetrics {
            integrated_lufs: integrated_lufs(buffer),
            true_peak_dbtp: linear_to_db(peak.max(1e-9)),
            rms_dbfs: linear_to_db(rms.max(1e-9)),
            crest_factor_db: linear_to_db(peak.max(1e-9) / rms.max(1e-9)),
            spectrum: self.spectrum(buffer),
        }
    }

    /// Normalized magnitude spectrum of the buffer center
    fn spectrum(&self, buffer: &AudioBuffer) -> Vec<f64> {
        let mono = buffer.to_mono();

        // Center-aligned window, zero-padded when the buffer is shorter
        let copied = mono.len().min(FFT_SIZE);
        let src_start = (mono.len() - copied) / 2;
        let dst_start = (FFT_SIZE - copied) / 2;

        let mut re = vec![0.0f64; FFT_SIZE];
        let mut im = vec![0.0f64; FFT_SIZE];
        re[dst_start..dst_start + copied]
            .copy_from_slice(&mono[src_start..src_start + copied]);
        for (sample, w) in re.iter_mut().zip(self.window.iter()) {
            *sample *= w;
        }

        fft_in_place(&mut re, &mut im);

        let magnitudes: Vec<f64> = (0..FFT_SIZE / 2)
            .map(|i| (re[i] * re[i] + im[i] * im[i]).sqrt())
            .collect();

        // Nearest-index downsample to 128 bins, normalized by the maximum
        let step = magnitudes.len() / SPECTRUM_BINS;
        let mut bins: Vec<f64> = (0..SPECTRUM_BINS).map(|i| magnitudes[i * step]).collect();

        let max = bins.iter().copied().fold(0.0f64, f64::max);
        if max > 0.0 {
            for bin in bins.iter_mut() {
                *bin /= max;
            }
        }
        bins
    }
}

impl Default for AudioAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Inter-sample peak estimate via 4x linear interpolation, both channels
pub(crate) fn true_peak_linear(left: &[f32], right: &[f32]) -> f64 {
    let mut peak = 0.0f64;

    for channel in [left, right] {
        if channel.is_empty() {
            continue;
        }
        for pair in channel.windows(2) {
            let a = pair[0] as f64;
            let b = pair[1] as f64;
            for k in 0..TRUE_PEAK_FACTOR {
                let frac = k as f64 / TRUE_PEAK_FACTOR as f64;
                peak = peak.max((a + (b - a) * frac).abs());
            }
        }
        peak = peak.max(channel[channel.len() - 1].abs() as f64);
    }

    peak
}

fn rms_linear(left: &[f32], right: &[f32]) -> f64 {
    let n = left.len().min(right.len());
    if n == 0 {
        return 0.0;
    }

    let mut sum = 0.0f64;
    for i in 0..n {
        let l = left[i] as f64;
        let r = right[i] as f64;
        sum += (l * l + r * r) * 0.5;
    }
    (sum / n as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;
    use wf_core::SampleRate;

    fn sine_buffer(freq: f64, amplitude: f64, frames: usize) -> AudioBuffer {
        let samples: Vec<f32> = (0..frames)
            .map(|i| (amplitude * (2.0 * PI * freq * i as f64 / 48000.0).sin()) as f32)
            .collect();
        AudioBuffer::new(samples.clone(), samples, SampleRate::Hz48000)
    }

    #[test]
    fn test_degenerate_for_short_buffers() {
        let analyzer = AudioAnalyzer::new();
        let metrics = analyzer.analyze(&AudioBuffer::silent(1, SampleRate::Hz48000));

        assert_eq!(metrics.integrated_lufs, -70.0);
        assert_eq!(metrics.true_peak_dbtp, -90.0);
        assert_eq!(metrics.rms_dbfs, -90.0);
        assert_eq!(metrics.crest_factor_db, 0.0);
        assert_eq!(metrics.spectrum, vec![0.0; SPECTRUM_BINS]);
    }

    #[test]
    fn test_silence_metrics() {
        let analyzer = AudioAnalyzer::new();
        let metrics = analyzer.analyze(&AudioBuffer::silent(96000, SampleRate::Hz48000));

        assert_eq!(metrics.integrated_lufs, -70.0);
        assert!(metrics.true_peak_dbtp <= -180.0 + 1e-6);
        assert_eq!(metrics.crest_factor_db, 0.0);
        assert!(metrics.spectrum.iter().all(|&b| b == 0.0));
    }

    #[test]
    fn test_full_scale_sine_metrics() {
        let analyzer = AudioAnalyzer::new();
        let metrics = analyzer.analyze(&sine_buffer(1000.0, 1.0, 96000));

        assert!((metrics.rms_dbfs - (-3.01)).abs() < 0.05);
        assert!(metrics.true_peak_dbtp.abs() < 0.05);
        assert!((metrics.crest_factor_db - 3.01).abs() < 0.05);
    }

    #[test]
    fn test_spectrum_normalized() {
        let analyzer = AudioAnalyzer::new();
        let metrics = analyzer.analyze(&sine_buffer(1000.0, 0.5, 96000));

        let max = metrics
            .spectrum
            .iter()
            .copied()
            .fold(0.0f64, f64::max);
        assert!((max - 1.0).abs() < 1e-12);
        assert!(metrics
            .spectrum
            .iter()
            .all(|&b| (0.0..=1.0).contains(&b)));
        assert_eq!(metrics.spectrum.len(), SPECTRUM_BINS);
    }

    #[test]
    fn test_spectrum_peak_tracks_frequency() {
        let analyzer = AudioAnalyzer::new();

        // 937.5 Hz falls exactly on downsampled bin 5
        // (bin width 48000/2048 = 23.4375 Hz, downsample step 8)
        let metrics = analyzer.analyze(&sine_buffer(937.5, 0.5, 96000));
        let peak_bin = metrics
            .spectrum
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(peak_bin, 5);
    }

    #[test]
    fn test_true_peak_exceeds_sample_peak_between_samples() {
        // Two alternating samples: linear interpolation cannot exceed the
        // endpoints, but the estimate must at least reach the sample peak
        let left = vec![0.5f32, -0.5, 0.5, -0.5];
        let right = vec![0.0f32; 4];
        let peak = true_peak_linear(&left, &right);
        assert!((peak - 0.5).abs() < 1e-9);
    }
}
