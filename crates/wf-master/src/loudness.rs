//! Integrated loudness measurement and normalization
//!
//! ITU-R BS.1770-4 style measurement: K-weighting pre-filter, 400 ms blocks
//! with 100 ms hop, absolute gate at -70 LUFS, relative gate 10 LU below the
//! absolutely-gated mean.

use wf_core::{db_to_linear, AudioBuffer, SampleRate};
use wf_dsp::{Biquad, BiquadCoeffs};

use crate::settings::LoudnessSettings;

/// Absolute gate threshold (LUFS), also the silence sentinel
pub const SILENCE_LUFS: f64 = -70.0;

const BLOCK_SECONDS: f64 = 0.4;
const HOP_SECONDS: f64 = 0.1;
const MEASUREMENT_RATE: f64 = 48000.0;

/// K-weighting pre-filter pair
///
/// Stage 1 is the +4 dB high shelf, stage 2 the ~60 Hz highpass, with the
/// standard 48 kHz coefficients. Channels measured at 44.1 kHz are filtered
/// here and then resampled to 48 kHz before blocking.
struct KWeighting {
    shelf: Biquad,
    highpass: Biquad,
}

impl KWeighting {
    fn new() -> Self {
        let shelf = BiquadCoeffs {
            b0: 1.53512485958697,
            b1: -2.69169618940638,
            b2: 1.19839281085285,
            a1: -1.69065929318241,
            a2: 0.73248077421585,
        };
        let highpass = BiquadCoeffs {
            b0: 1.0,
            b1: -2.0,
            b2: 1.0,
            a1: -1.99004745483398,
            a2: 0.99007225036621,
        };

        Self {
            shelf: Biquad::new(shelf),
            highpass: Biquad::new(highpass),
        }
    }

    fn filter(&mut self, samples: &[f32]) -> Vec<f64> {
        samples
            .iter()
            .map(|&x| self.highpass.process(self.shelf.process(x as f64)))
            .collect()
    }
}

/// Linear resample to 48 kHz with clamped edge indices
fn resample_to_48k(samples: &[f64], source_rate: f64) -> Vec<f64> {
    if samples.is_empty() {
        return Vec::new();
    }

    let out_len = (samples.len() as f64 * MEASUREMENT_RATE / source_rate).round() as usize;
    let last = samples.len() - 1;

    (0..out_len)
        .map(|i| {
            let pos = i as f64 * source_rate / MEASUREMENT_RATE;
            let i0 = (pos.floor() as usize).min(last);
            let i1 = (i0 + 1).min(last);
            let frac = pos - i0 as f64;
            samples[i0] + (samples[i1] - samples[i0]) * frac
        })
        .collect()
}

fn block_lufs(power: f64) -> f64 {
    -0.691 + 10.0 * power.max(1e-12).log10()
}

/// Integrated loudness of a whole buffer, in LUFS
///
/// Returns [`SILENCE_LUFS`] when no block passes the absolute gate (silence
/// or buffers shorter than one 400 ms block).
pub fn integrated_lufs(buffer: &AudioBuffer) -> f64 {
    let rate = buffer.sample_rate();

    let mut left = KWeighting::new().filter(buffer.left());
    let mut right = KWeighting::new().filter(buffer.right());

    if rate != SampleRate::Hz48000 {
        left = resample_to_48k(&left, rate.as_f64());
        right = resample_to_48k(&right, rate.as_f64());
    }

    let block = (BLOCK_SECONDS * MEASUREMENT_RATE) as usize;
    let hop = (HOP_SECONDS * MEASUREMENT_RATE) as usize;
    if left.len() < block {
        return SILENCE_LUFS;
    }

    // Mean-square power per 400 ms block
    let mut powers = Vec::with_capacity(left.len() / hop + 1);
    let mut start = 0;
    while start + block <= left.len() {
        let mut sum = 0.0;
        for i in start..start + block {
            sum += (left[i] * left[i] + right[i] * right[i]) * 0.5;
        }
        powers.push(sum / block as f64);
        start += hop;
    }

    // Absolute gate
    let gated: Vec<f64> = powers
        .iter()
        .copied()
        .filter(|&p| block_lufs(p) > SILENCE_LUFS)
        .collect();
    if gated.is_empty() {
        return SILENCE_LUFS;
    }

    let abs_mean = gated.iter().sum::<f64>() / gated.len() as f64;
    let abs_integrated = block_lufs(abs_mean);

    // Relative gate, 10 LU below the absolutely-gated loudness
    let relative_threshold = abs_integrated - 10.0;
    let rel_gated: Vec<f64> = gated
        .iter()
        .copied()
        .filter(|&p| block_lufs(p) > relative_threshold)
        .collect();
    if rel_gated.is_empty() {
        return abs_integrated;
    }

    let rel_mean = rel_gated.iter().sum::<f64>() / rel_gated.len() as f64;
    block_lufs(rel_mean)
}

/// Global gain toward a target integrated loudness
pub struct LoudnessNormalizer {
    target_lufs: f64,
}

impl LoudnessNormalizer {
    /// Create from settings
    pub fn new(settings: &LoudnessSettings) -> Self {
        Self {
            target_lufs: settings.target_lufs,
        }
    }

    /// Measure, then apply one uniform linear gain; returns the gain in dB
    ///
    /// The gain can push peaks above the limiter ceiling, which is why the
    /// chain re-runs the limiter after this stage whenever it is enabled.
    pub fn process(&self, buffer: &mut AudioBuffer) -> f64 {
        let current = integrated_lufs(buffer);
        let gain_db = self.target_lufs - current;
        let gain = db_to_linear(gain_db) as f32;

        let (left, right) = buffer.channels_mut();
        for s in left.iter_mut() {
            *s *= gain;
        }
        for s in right.iter_mut() {
            *s *= gain;
        }

        gain_db
    }
}
