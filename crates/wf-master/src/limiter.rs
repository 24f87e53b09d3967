//! Lookahead brick-wall limiter
//!
//! Forward peak scan over the lookahead window with instant attack and
//! smoothed release, followed by a true-peak safety check: if 4x linear
//! interpolation still finds energy above the ceiling, one constant trim is
//! applied across the whole buffer.

use wf_core::{db_to_linear, AudioBuffer};

use crate::analysis::true_peak_linear;
use crate::settings::LimiterSettings;

/// Release time constant of the smoothed gain recovery (seconds)
const RELEASE_SECONDS: f64 = 0.05;

/// Brick-wall limiter with lookahead
pub struct BrickwallLimiter {
    ceiling: f64,
    lookahead: usize,
    release: f64,
    min_gain: f64,
}

impl BrickwallLimiter {
    /// Lookahead is clamped to 0.5-10 ms and floors at one sample
    pub fn new(settings: &LimiterSettings, sample_rate: f64) -> Self {
        let lookahead_ms = settings.lookahead_ms.clamp(0.5, 10.0);
        let lookahead = (lookahead_ms * 1e-3 * sample_rate).round() as usize;

        Self {
            ceiling: db_to_linear(settings.ceiling_dbtp),
            lookahead: lookahead.max(1),
            release: (-1.0 / (RELEASE_SECONDS * sample_rate)).exp(),
            min_gain: 1.0,
        }
    }

    /// Limit the buffer in place
    pub fn process(&mut self, buffer: &mut AudioBuffer) {
        let n = buffer.len();
        if n == 0 {
            return;
        }

        let (left, right) = buffer.channels_mut();
        let mut gain = 1.0f64;

        for i in 0..n {
            // Peak over the lookahead window, both channels
            let end = (i + self.lookahead).min(n - 1);
            let mut peak = 0.0f64;
            for j in i..=end {
                peak = peak.max(left[j].abs() as f64).max(right[j].abs() as f64);
            }

            let desired = if peak > self.ceiling {
                self.ceiling / peak
            } else {
                1.0
            };

            // Instant attack, smoothed release
            gain = if desired < gain {
                desired
            } else {
                self.release * gain + (1.0 - self.release) * desired
            };
            self.min_gain = self.min_gain.min(gain);

            left[i] = (left[i] as f64 * gain) as f32;
            right[i] = (right[i] as f64 * gain) as f32;
        }

        // True-peak safety: inter-sample overshoot gets one constant trim
        let true_peak = true_peak_linear(left, right);
        if true_peak > self.ceiling {
            let trim = self.ceiling / true_peak;
            self.min_gain = self.min_gain.min(trim);
            for s in left.iter_mut() {
                *s = (*s as f64 * trim) as f32;
            }
            for s in right.iter_mut() {
                *s = (*s as f64 * trim) as f32;
            }
        }
    }

    /// Deepest gain reduction applied, in dB
    pub fn peak_reduction_db(&self) -> f64 {
        -20.0 * self.min_gain.max(1e-9).log10()
    }
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

    fn settings(ceiling_dbtp: f64) -> LimiterSettings {
        LimiterSettings {
            enabled: true,
            ceiling_dbtp,
            lookahead_ms: 5.0,
        }
    }

    #[test]
    fn test_quiet_signal_untouched() {
        let mut limiter = BrickwallLimiter::new(&settings(-1.0), 48000.0);

        let reference = sine_buffer(440.0, 0.2, 9600);
        let mut buf = reference.clone();
        limiter.process(&mut buf);

        assert_eq!(buf, reference);
        assert_eq!(limiter.peak_reduction_db(), 0.0);
    }

    #[test]
    fn test_ceiling_is_enforced() {
        let mut limiter = BrickwallLimiter::new(&settings(-1.0), 48000.0);

        let mut buf = sine_buffer(440.0, 1.0, 96000);
        limiter.process(&mut buf);

        let ceiling = db_to_linear(-1.0);
        let true_peak = true_peak_linear(buf.left(), buf.right());
        assert!(
            true_peak <= ceiling + 1e-4,
            "true peak {true_peak} above ceiling {ceiling}"
        );
        assert!(limiter.peak_reduction_db() > 0.5);
    }

    #[test]
    fn test_hard_ceiling_on_transients() {
        let mut limiter = BrickwallLimiter::new(&settings(-3.0), 48000.0);

        // Silence with a single full-scale click
        let mut left = vec![0.0f32; 4800];
        left[2400] = 1.0;
        let right = left.clone();
        let mut buf = AudioBuffer::new(left, right, SampleRate::Hz48000);
        limiter.process(&mut buf);

        let ceiling = db_to_linear(-3.0);
        assert!(buf.sample_peak() as f64 <= ceiling + 1e-4);
    }

    #[test]
    fn test_lookahead_reduces_before_the_peak() {
        let mut limiter = BrickwallLimiter::new(&settings(-6.0), 48000.0);

        let mut left = vec![0.5f32; 4800];
        left[1000] = 1.0;
        let right = left.clone();
        let mut buf = AudioBuffer::new(left, right, SampleRate::Hz48000);
        limiter.process(&mut buf);

        // The 0.5 plateau right before the click is already pulled down to
        // make room for the transient: gain there is ceiling / clickPeak
        let ceiling = db_to_linear(-6.0);
        let before = buf.left()[999] as f64;
        assert!(
            before <= 0.5 * ceiling + 1e-4,
            "lookahead did not anticipate, got {before}"
        );
    }

    #[test]
    fn test_empty_buffer() {
        let mut limiter = BrickwallLimiter::new(&settings(-1.0), 48000.0);
        let mut buf = AudioBuffer::silent(0, SampleRate::Hz48000);
        limiter.process(&mut buf);
        assert!(buf.is_empty());
    }
}
