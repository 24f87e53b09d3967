//! Filter-based chain stages: high-pass cleanup, three-band EQ,
//! pseudo-stem rebalance
//!
//! Every stage owns one biquad per channel per band and streams the buffer
//! in place. Parameter ranges are clamped here, at the stage edge.

use wf_core::AudioBuffer;
use wf_dsp::{Biquad, BiquadCoeffs};

use crate::settings::{EqualizerSettings, HighPassSettings, RebalanceSettings};

/// Second-order high-pass cleanup
pub struct HighPassStage {
    filters: [Biquad; 2],
}

impl HighPassStage {
    /// Cutoff is clamped to 20-120 Hz, Q fixed at 0.707
    pub fn new(settings: &HighPassSettings, sample_rate: f64) -> Self {
        let cutoff = settings.cutoff_hz.clamp(20.0, 120.0);
        let coeffs = BiquadCoeffs::high_pass(cutoff, 0.707, sample_rate);
        Self {
            filters: [Biquad::new(coeffs), Biquad::new(coeffs)],
        }
    }

    /// Stream the buffer through both channel filters
    pub fn process(&mut self, buffer: &mut AudioBuffer) {
        let (left, right) = buffer.channels_mut();
        for s in left.iter_mut() {
            *s = self.filters[0].process(*s as f64) as f32;
        }
        for s in right.iter_mut() {
            *s = self.filters[1].process(*s as f64) as f32;
        }
    }
}

/// Low-shelf, mid-bell, high-shelf cascade
pub struct EqualizerStage {
    low: [Biquad; 2],
    mid: [Biquad; 2],
    high: [Biquad; 2],
}

impl EqualizerStage {
    /// Shelf Q is clamped to 0.3-3.0, bell Q to 0.3-6.0; gains and center
    /// frequencies pass through unchanged
    pub fn new(settings: &EqualizerSettings, sample_rate: f64) -> Self {
        let shelf_q = settings.shelf_q.clamp(0.3, 3.0);
        let bell_q = settings.mid_q.clamp(0.3, 6.0);

        let low = BiquadCoeffs::low_shelf(
            settings.low_shelf_freq_hz,
            settings.low_shelf_gain_db,
            shelf_q,
            sample_rate,
        );
        let mid = BiquadCoeffs::peaking(
            settings.mid_freq_hz,
            settings.mid_gain_db,
            bell_q,
            sample_rate,
        );
        let high = BiquadCoeffs::high_shelf(
            settings.high_shelf_freq_hz,
            settings.high_shelf_gain_db,
            shelf_q,
            sample_rate,
        );

        Self {
            low: [Biquad::new(low), Biquad::new(low)],
            mid: [Biquad::new(mid), Biquad::new(mid)],
            high: [Biquad::new(high), Biquad::new(high)],
        }
    }

    /// Stream the buffer through the per-channel cascades
    pub fn process(&mut self, buffer: &mut AudioBuffer) {
        let (left, right) = buffer.channels_mut();
        for s in left.iter_mut() {
            let x = self.low[0].process(*s as f64);
            let x = self.mid[0].process(x);
            *s = self.high[0].process(x) as f32;
        }
        for s in right.iter_mut() {
            let x = self.low[1].process(*s as f64);
            let x = self.mid[1].process(x);
            *s = self.high[1].process(x) as f32;
        }
    }
}

/// One pseudo-stem: two peaking filters fed by a weighted share of the
/// stem gain
struct StemBand {
    centers_hz: [f64; 2],
    weights: [f64; 2],
    qs: [f64; 2],
}

const VOCAL_BAND: StemBand = StemBand {
    centers_hz: [2800.0, 1200.0],
    weights: [0.70, 0.35],
    qs: [1.1, 1.0],
};

const DRUM_BAND: StemBand = StemBand {
    centers_hz: [95.0, 4200.0],
    weights: [0.70, 0.35],
    qs: [0.9, 1.1],
};

const INSTRUMENT_BAND: StemBand = StemBand {
    centers_hz: [650.0, 5200.0],
    weights: [0.60, 0.30],
    qs: [1.0, 1.1],
};

/// Pseudo-stem rebalance: six peaking filters per channel emulating
/// vocal/drum/instrument stem weighting
pub struct RebalanceStage {
    // Filters in fixed order: vocal pair, drum pair, instrument pair
    filters: Vec<[Biquad; 2]>,
    active: bool,
}

impl RebalanceStage {
    /// Stem gains are clamped to +/-6 dB; all three below 0.01 dB makes the
    /// stage a no-op
    pub fn new(settings: &RebalanceSettings, sample_rate: f64) -> Self {
        let gains = [
            settings.vocal_gain_db.clamp(-6.0, 6.0),
            settings.drum_gain_db.clamp(-6.0, 6.0),
            settings.instrument_gain_db.clamp(-6.0, 6.0),
        ];
        let active = gains.iter().any(|g| g.abs() >= 0.01);

        let mut filters = Vec::with_capacity(6);
        for (band, gain) in [VOCAL_BAND, DRUM_BAND, INSTRUMENT_BAND].iter().zip(gains) {
            for i in 0..2 {
                let coeffs = BiquadCoeffs::peaking(
                    band.centers_hz[i],
                    gain * band.weights[i],
                    band.qs[i],
                    sample_rate,
                );
                filters.push([Biquad::new(coeffs), Biquad::new(coeffs)]);
            }
        }

        Self { filters, active }
    }

    /// Stream the buffer through all six filters per channel, fixed order
    pub fn process(&mut self, buffer: &mut AudioBuffer) {
        if !self.active {
            return;
        }

        let (left, right) = buffer.channels_mut();
        for s in left.iter_mut() {
            let mut x = *s as f64;
            for pair in self.filters.iter_mut() {
                x = pair[0].process(x);
            }
            *s = x as f32;
        }
        for s in right.iter_mut() {
            let mut x = *s as f64;
            for pair in self.filters.iter_mut() {
                x = pair[1].process(x);
            }
            *s = x as f32;
        }
    }
}
