//! Biquad filter implementation (direct form I)
//!
//! Coefficient designs follow the Audio EQ Cookbook (RBJ). All math is f64;
//! instances are single-channel, so processors allocate one filter per
//! channel per band.

use std::f64::consts::PI;

/// Biquad coefficients, normalized by a0
#[derive(Debug, Clone, Copy)]
pub struct BiquadCoeffs {
    pub b0: f64,
    pub b1: f64,
    pub b2: f64,
    pub a1: f64,
    pub a2: f64,
}

impl Default for BiquadCoeffs {
    fn default() -> Self {
        // Unity pass-through
        Self {
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
        }
    }
}

impl BiquadCoeffs {
    /// Calculate highpass filter coefficients
    pub fn high_pass(freq: f64, q: f64, sample_rate: f64) -> Self {
        let omega = 2.0 * PI * freq / sample_rate;
        let sin_omega = omega.sin();
        let cos_omega = omega.cos();
        let alpha = sin_omega / (2.0 * q);

        let b0 = (1.0 + cos_omega) / 2.0;
        let b1 = -(1.0 + cos_omega);
        let b2 = (1.0 + cos_omega) / 2.0;
        let a0 = 1.0 + alpha;
        let a1 = -2.0 * cos_omega;
        let a2 = 1.0 - alpha;

        Self {
            b0: b0 / a0,
            b1: b1 / a0,
            b2: b2 / a0,
            a1: a1 / a0,
            a2: a2 / a0,
        }
    }

    /// Calculate peaking EQ filter coefficients
    pub fn peaking(freq: f64, gain_db: f64, q: f64, sample_rate: f64) -> Self {
        let a = 10.0_f64.powf(gain_db / 40.0);
        let omega = 2.0 * PI * freq / sample_rate;
        let sin_omega = omega.sin();
        let cos_omega = omega.cos();
        let alpha = sin_omega / (2.0 * q);

        let b0 = 1.0 + alpha * a;
        let b1 = -2.0 * cos_omega;
        let b2 = 1.0 - alpha * a;
        let a0 = 1.0 + alpha / a;
        let a1 = -2.0 * cos_omega;
        let a2 = 1.0 - alpha / a;

        Self {
            b0: b0 / a0,
            b1: b1 / a0,
            b2: b2 / a0,
            a1: a1 / a0,
            a2: a2 / a0,
        }
    }

    /// Calculate low shelf filter coefficients
    pub fn low_shelf(freq: f64, gain_db: f64, q: f64, sample_rate: f64) -> Self {
        let a = 10.0_f64.powf(gain_db / 40.0);
        let omega = 2.0 * PI * freq / sample_rate;
        let sin_omega = omega.sin();
        let cos_omega = omega.cos();
        let alpha = sin_omega / (2.0 * q);
        let two_sqrt_a_alpha = 2.0 * a.sqrt() * alpha;

        let b0 = a * ((a + 1.0) - (a - 1.0) * cos_omega + two_sqrt_a_alpha);
        let b1 = 2.0 * a * ((a - 1.0) - (a + 1.0) * cos_omega);
        let b2 = a * ((a + 1.0) - (a - 1.0) * cos_omega - two_sqrt_a_alpha);
        let a0 = (a + 1.0) + (a - 1.0) * cos_omega + two_sqrt_a_alpha;
        let a1 = -2.0 * ((a - 1.0) + (a + 1.0) * cos_omega);
        let a2 = (a + 1.0) + (a - 1.0) * cos_omega - two_sqrt_a_alpha;

        Self {
            b0: b0 / a0,
            b1: b1 / a0,
            b2: b2 / a0,
            a1: a1 / a0,
            a2: a2 / a0,
        }
    }

    /// Calculate high shelf filter coefficients
    pub fn high_shelf(freq: f64, gain_db: f64, q: f64, sample_rate: f64) -> Self {
        let a = 10.0_f64.powf(gain_db / 40.0);
        let omega = 2.0 * PI * freq / sample_rate;
        let sin_omega = omega.sin();
        let cos_omega = omega.cos();
        let alpha = sin_omega / (2.0 * q);
        let two_sqrt_a_alpha = 2.0 * a.sqrt() * alpha;

        let b0 = a * ((a + 1.0) + (a - 1.0) * cos_omega + two_sqrt_a_alpha);
        let b1 = -2.0 * a * ((a - 1.0) + (a + 1.0) * cos_omega);
        let b2 = a * ((a + 1.0) + (a - 1.0) * cos_omega - two_sqrt_a_alpha);
        let a0 = (a + 1.0) - (a - 1.0) * cos_omega + two_sqrt_a_alpha;
        let a1 = 2.0 * ((a - 1.0) - (a + 1.0) * cos_omega);
        let a2 = (a + 1.0) - (a - 1.0) * cos_omega - two_sqrt_a_alpha;

        Self {
            b0: b0 / a0,
            b1: b1 / a0,
            b2: b2 / a0,
            a1: a1 / a0,
            a2: a2 / a0,
        }
    }
}

/// Single-channel biquad filter, direct form I
///
/// y[n] = b0*x[n] + b1*x[n-1] + b2*x[n-2] - a1*y[n-1] - a2*y[n-2]
#[derive(Debug, Clone, Default)]
pub struct Biquad {
    coeffs: BiquadCoeffs,
    x1: f64,
    x2: f64,
    y1: f64,
    y2: f64,
}

impl Biquad {
    /// Create a filter with the given coefficients
    pub fn new(coeffs: BiquadCoeffs) -> Self {
        Self {
            coeffs,
            ..Default::default()
        }
    }

    /// Replace coefficients, keeping state
    pub fn set_coeffs(&mut self, coeffs: BiquadCoeffs) {
        self.coeffs = coeffs;
    }

    /// Process a single sample and advance state
    #[inline]
    pub fn process(&mut self, input: f64) -> f64 {
        let c = &self.coeffs;
        let output =
            c.b0 * input + c.b1 * self.x1 + c.b2 * self.x2 - c.a1 * self.y1 - c.a2 * self.y2;

        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = output;

        output
    }

    /// Clear filter history
    pub fn reset(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f64, sample_rate: f64, len: usize) -> Vec<f64> {
        (0..len)
            .map(|i| (2.0 * PI * freq * i as f64 / sample_rate).sin())
            .collect()
    }

    #[test]
    fn test_zero_gain_peaking_is_identity() {
        let mut filter = Biquad::new(BiquadCoeffs::peaking(1000.0, 0.0, 1.4, 48000.0));

        for &input in sine(333.0, 48000.0, 4096).iter() {
            let output = filter.process(input);
            assert!(
                (output - input).abs() < 1e-9,
                "expected identity, got {output} for {input}"
            );
        }
    }

    #[test]
    fn test_high_pass_rejects_dc() {
        let mut filter = Biquad::new(BiquadCoeffs::high_pass(100.0, 0.707, 48000.0));

        let mut last = 1.0;
        for _ in 0..48000 {
            last = filter.process(1.0);
        }
        assert!(last.abs() < 1e-6, "DC should be removed, got {last}");
    }

    #[test]
    fn test_low_shelf_boosts_low_frequencies() {
        let mut filter = Biquad::new(BiquadCoeffs::low_shelf(200.0, 6.0, 0.9, 48000.0));

        // Steady-state RMS of a tone far below the corner comes out ~6 dB
        // hotter
        let input = sine(25.0, 48000.0, 48000);
        let output: Vec<f64> = input.iter().map(|&x| filter.process(x)).collect();

        let rms_in: f64 =
            (input[24000..].iter().map(|x| x * x).sum::<f64>() / 24000.0).sqrt();
        let rms_out: f64 =
            (output[24000..].iter().map(|x| x * x).sum::<f64>() / 24000.0).sqrt();
        let gain_db = 20.0 * (rms_out / rms_in).log10();
        assert!((gain_db - 6.0).abs() < 0.5, "expected ~6 dB, got {gain_db:.2}");
    }

    #[test]
    fn test_high_shelf_leaves_lows_alone() {
        let mut filter = Biquad::new(BiquadCoeffs::high_shelf(8000.0, 4.0, 0.8, 48000.0));

        let input = sine(100.0, 48000.0, 48000);
        let output: Vec<f64> = input.iter().map(|&x| filter.process(x)).collect();

        let rms_in: f64 =
            (input[24000..].iter().map(|x| x * x).sum::<f64>() / 24000.0).sqrt();
        let rms_out: f64 =
            (output[24000..].iter().map(|x| x * x).sum::<f64>() / 24000.0).sqrt();
        let gain_db = 20.0 * (rms_out / rms_in).log10();
        assert!(gain_db.abs() < 0.2, "lows should pass, got {gain_db:.2} dB");
    }

    #[test]
    fn test_reset_clears_history() {
        let mut filter = Biquad::new(BiquadCoeffs::high_pass(100.0, 0.707, 48000.0));
        filter.process(1.0);
        filter.process(-1.0);
        filter.reset();

        let mut reference = Biquad::new(BiquadCoeffs::high_pass(100.0, 0.707, 48000.0));
        assert_eq!(filter.process(0.5), reference.process(0.5));
    }
}
