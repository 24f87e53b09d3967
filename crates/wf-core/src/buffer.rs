//! Stereo audio buffer

use crate::SampleRate;

/// Deinterleaved stereo sample container
///
/// Samples are normalized floats; values outside [-1, 1] are permitted
/// mid-chain and only clamped by integer export paths. Both channels always
/// have the same length — construction truncates the longer side.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    left: Vec<f32>,
    right: Vec<f32>,
    sample_rate: SampleRate,
}

impl AudioBuffer {
    /// Create a buffer from channel data, truncating to the shorter side
    pub fn new(mut left: Vec<f32>, mut right: Vec<f32>, sample_rate: SampleRate) -> Self {
        let frames = left.len().min(right.len());
        left.truncate(frames);
        right.truncate(frames);
        Self {
            left,
            right,
            sample_rate,
        }
    }

    /// Create a silent buffer of the given length
    pub fn silent(frames: usize, sample_rate: SampleRate) -> Self {
        Self {
            left: vec![0.0; frames],
            right: vec![0.0; frames],
            sample_rate,
        }
    }

    /// Number of sample frames per channel
    pub fn len(&self) -> usize {
        self.left.len()
    }

    /// True if the buffer holds no frames
    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }

    /// Sample rate
    pub fn sample_rate(&self) -> SampleRate {
        self.sample_rate
    }

    /// Duration in seconds
    pub fn duration(&self) -> f64 {
        self.len() as f64 / self.sample_rate.as_f64()
    }

    /// Left channel samples
    pub fn left(&self) -> &[f32] {
        &self.left
    }

    /// Right channel samples
    pub fn right(&self) -> &[f32] {
        &self.right
    }

    /// Mutable access to both channels at once
    pub fn channels_mut(&mut self) -> (&mut [f32], &mut [f32]) {
        (&mut self.left, &mut self.right)
    }

    /// Largest absolute sample value across both channels
    pub fn sample_peak(&self) -> f32 {
        let l = self.left.iter().map(|s| s.abs()).fold(0.0f32, f32::max);
        let r = self.right.iter().map(|s| s.abs()).fold(0.0f32, f32::max);
        l.max(r)
    }

    /// Mono mix, (L+R)/2
    pub fn to_mono(&self) -> Vec<f64> {
        self.left
            .iter()
            .zip(self.right.iter())
            .map(|(&l, &r)| (l as f64 + r as f64) * 0.5)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncates_to_shorter_side() {
        let buf = AudioBuffer::new(vec![0.1; 10], vec![0.2; 7], SampleRate::Hz48000);
        assert_eq!(buf.len(), 7);
        assert_eq!(buf.left().len(), buf.right().len());
    }

    #[test]
    fn test_duration() {
        let buf = AudioBuffer::silent(48000, SampleRate::Hz48000);
        assert!((buf.duration() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_sample_peak() {
        let buf = AudioBuffer::new(
            vec![0.1, -0.4, 0.2],
            vec![0.3, 0.0, -0.25],
            SampleRate::Hz44100,
        );
        assert!((buf.sample_peak() - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_to_mono() {
        let buf = AudioBuffer::new(vec![1.0, 0.0], vec![0.0, 1.0], SampleRate::Hz48000);
        assert_eq!(buf.to_mono(), vec![0.5, 0.5]);
    }
}
