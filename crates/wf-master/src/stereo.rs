//! Stereo imaging
//!
//! Mid/side width scaling: mid stays untouched, side is multiplied by the
//! width factor.

use wf_core::AudioBuffer;

use crate::settings::StereoSettings;

/// Mid/side width processor
pub struct StereoImager {
    width: f64,
    active: bool,
}

impl StereoImager {
    /// Width is clamped to 0.7-1.3; a width of ~1.0 is a no-op
    pub fn new(settings: &StereoSettings) -> Self {
        let width = settings.width.clamp(0.7, 1.3);
        Self {
            width,
            active: (width - 1.0).abs() > 1e-6,
        }
    }

    /// Rescale the side signal of every frame
    pub fn process(&self, buffer: &mut AudioBuffer) {
        if !self.active {
            return;
        }

        let (left, right) = buffer.channels_mut();
        for i in 0..left.len() {
            let l = left[i] as f64;
            let r = right[i] as f64;
            let mid = (l + r) * 0.5;
            let side = (l - r) * 0.5 * self.width;
            left[i] = (mid + side) as f32;
            right[i] = (mid - side) as f32;
        }
    }
}
