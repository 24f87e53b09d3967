//! Soft-clip saturation
//!
//! tanh waveshaper with drive-normalized output so unity-level material
//! keeps its peak level as drive increases.

use wf_core::AudioBuffer;

use crate::settings::SaturationSettings;

/// Stateless per-channel tanh soft clip
pub struct SaturationStage {
    drive: f64,
    active: bool,
}

impl SaturationStage {
    /// Normalized drive is clamped to 0-1 and mapped to a 1-7x input gain;
    /// zero drive leaves the signal untouched
    pub fn new(settings: &SaturationSettings) -> Self {
        let normalized = settings.drive.clamp(0.0, 1.0);
        Self {
            drive: 1.0 + normalized * 6.0,
            active: normalized > 1e-6,
        }
    }

    /// Shape every sample, both channels independently
    pub fn process(&self, buffer: &mut AudioBuffer) {
        if !self.active {
            return;
        }

        let norm = self.drive.tanh();
        let (left, right) = buffer.channels_mut();
        for s in left.iter_mut() {
            *s = ((*s as f64 * self.drive).tanh() / norm) as f32;
        }
        for s in right.iter_mut() {
            *s = ((*s as f64 * self.drive).tanh() / norm) as f32;
        }
    }
}
