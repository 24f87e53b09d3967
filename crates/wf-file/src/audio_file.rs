//! Audio file reading and writing
//!
//! Reads WAV (hound) and MP3 (symphonia) into the core's stereo
//! [`AudioBuffer`]: mono is duplicated into both channels, anything above
//! two channels is rejected, and unsupported sample rates are conformed to
//! 44.1 or 48 kHz by linear interpolation. Export is always IEEE-float
//! stereo WAV at the buffer's rate, written unclamped.

use std::fs::File;
use std::path::Path;

use symphonia::core::audio::{AudioBufferRef, Signal};
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use wf_core::{AudioBuffer, SampleRate};

use crate::{FileError, FileResult};

/// Supported input container formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Wav,
    Mp3,
    Unknown,
}

impl AudioFormat {
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .as_deref()
        {
            Some("wav") | Some("wave") => Self::Wav,
            Some("mp3") => Self::Mp3,
            _ => Self::Unknown,
        }
    }
}

/// Decode an audio file into a stereo buffer at a supported rate
pub fn decode_audio<P: AsRef<Path>>(path: P) -> FileResult<AudioBuffer> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(FileError::NotFound(path.display().to_string()));
    }

    let (channels, source_rate) = match AudioFormat::from_path(path) {
        AudioFormat::Wav => read_wav(path)?,
        AudioFormat::Mp3 => read_mp3(path)?,
        AudioFormat::Unknown => {
            return Err(FileError::UnsupportedFormat(path.display().to_string()))
        }
    };

    let (left, right) = match channels.len() {
        1 => {
            let mono = channels.into_iter().next().unwrap();
            (mono.clone(), mono)
        }
        2 => {
            let mut iter = channels.into_iter();
            (iter.next().unwrap(), iter.next().unwrap())
        }
        n => return Err(FileError::UnsupportedChannels(n)),
    };

    // Conform everything else: below 46 kHz goes to 44.1, above to 48
    let rate = match SampleRate::from_hz(source_rate) {
        Ok(rate) => return Ok(AudioBuffer::new(left, right, rate)),
        Err(_) if source_rate < 46000 => SampleRate::Hz44100,
        Err(_) => SampleRate::Hz48000,
    };

    log::info!(
        "Resampling {} Hz -> {} Hz",
        source_rate,
        rate.as_u32()
    );
    let left = resample_linear(&left, source_rate, rate.as_u32());
    let right = resample_linear(&right, source_rate, rate.as_u32());
    Ok(AudioBuffer::new(left, right, rate))
}

/// Write a buffer as IEEE-float stereo WAV at its sample rate
///
/// Samples are written as-is; peak compliance is the chain's job.
pub fn write_wav<P: AsRef<Path>>(path: P, buffer: &AudioBuffer) -> FileResult<()> {
    let spec = hound::WavSpec {
        channels: 2,
        sample_rate: buffer.sample_rate().as_u32(),
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };

    let mut writer = hound::WavWriter::create(path.as_ref(), spec)?;
    for i in 0..buffer.len() {
        writer.write_sample(buffer.left()[i])?;
        writer.write_sample(buffer.right()[i])?;
    }
    writer.finalize()?;
    Ok(())
}

/// Read a WAV file into deinterleaved f32 channels
fn read_wav(path: &Path) -> FileResult<(Vec<Vec<f32>>, u32)> {
    let reader = hound::WavReader::open(path)?;
    let spec = reader.spec();
    let num_channels = spec.channels as usize;

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .into_samples::<f32>()
            .map(|s| s.unwrap_or(0.0))
            .collect(),
        hound::SampleFormat::Int => {
            let max_value = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.unwrap_or(0) as f32 / max_value)
                .collect()
        }
    };

    Ok((deinterleave(&samples, num_channels), spec.sample_rate))
}

/// Read an MP3 file via symphonia
fn read_mp3(path: &Path) -> FileResult<(Vec<Vec<f32>>, u32)> {
    let file = File::open(path).map_err(|_| FileError::NotFound(path.display().to_string()))?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| FileError::DecodeError(e.to_string()))?;

    let mut format_reader = probed.format;
    let track = format_reader
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != symphonia::core::codecs::CODEC_TYPE_NULL)
        .ok_or_else(|| FileError::InvalidFile("No audio track found".to_string()))?;

    let track_id = track.id;
    let num_channels = track.codec_params.channels.map(|c| c.count()).unwrap_or(2);
    let sample_rate = track.codec_params.sample_rate.unwrap_or(44100);

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| FileError::DecodeError(e.to_string()))?;

    let mut channels: Vec<Vec<f32>> = vec![Vec::new(); num_channels];

    loop {
        match format_reader.next_packet() {
            Ok(packet) => {
                if packet.track_id() != track_id {
                    continue;
                }
                match decoder.decode(&packet) {
                    Ok(decoded) => copy_audio_buffer(&decoded, &mut channels),
                    // Skip corrupt frames, keep decoding
                    Err(symphonia::core::errors::Error::DecodeError(_)) => continue,
                    Err(e) => return Err(FileError::DecodeError(e.to_string())),
                }
            }
            Err(symphonia::core::errors::Error::IoError(e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => return Err(FileError::DecodeError(e.to_string())),
        }
    }

    Ok((channels, sample_rate))
}

/// Copy samples from a symphonia buffer into deinterleaved f32 channels
fn copy_audio_buffer(buffer: &AudioBufferRef, output: &mut [Vec<f32>]) {
    match buffer {
        AudioBufferRef::F32(buf) => {
            for (ch, out_ch) in output.iter_mut().enumerate() {
                if ch < buf.spec().channels.count() {
                    out_ch.extend(buf.chan(ch).iter().copied());
                }
            }
        }
        AudioBufferRef::F64(buf) => {
            for (ch, out_ch) in output.iter_mut().enumerate() {
                if ch < buf.spec().channels.count() {
                    out_ch.extend(buf.chan(ch).iter().map(|&s| s as f32));
                }
            }
        }
        AudioBufferRef::S16(buf) => {
            for (ch, out_ch) in output.iter_mut().enumerate() {
                if ch < buf.spec().channels.count() {
                    out_ch.extend(buf.chan(ch).iter().map(|&s| s as f32 / 32768.0));
                }
            }
        }
        AudioBufferRef::S32(buf) => {
            for (ch, out_ch) in output.iter_mut().enumerate() {
                if ch < buf.spec().channels.count() {
                    out_ch.extend(buf.chan(ch).iter().map(|&s| s as f32 / 2147483648.0));
                }
            }
        }
        _ => {
            // MP3 decodes to one of the above; other layouts produce silence
            log::warn!("Unexpected sample format from decoder");
        }
    }
}

fn deinterleave(samples: &[f32], num_channels: usize) -> Vec<Vec<f32>> {
    let num_frames = samples.len() / num_channels.max(1);
    let mut channels = vec![vec![0.0f32; num_frames]; num_channels];

    for (i, chunk) in samples.chunks_exact(num_channels).enumerate() {
        for (ch, &sample) in chunk.iter().enumerate() {
            channels[ch][i] = sample;
        }
    }

    channels
}

/// Linear-interpolation resampler with clamped edges
fn resample_linear(samples: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
    if samples.is_empty() || from_rate == to_rate {
        return samples.to_vec();
    }

    let ratio = from_rate as f64 / to_rate as f64;
    let out_len = (samples.len() as f64 / ratio).round() as usize;
    let last = samples.len() - 1;

    (0..out_len)
        .map(|i| {
            let pos = i as f64 * ratio;
            let i0 = (pos.floor() as usize).min(last);
            let i1 = (i0 + 1).min(last);
            let frac = (pos - i0 as f64) as f32;
            samples[i0] + (samples[i1] - samples[i0]) * frac
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_path() {
        assert_eq!(AudioFormat::from_path(Path::new("x.wav")), AudioFormat::Wav);
        assert_eq!(AudioFormat::from_path(Path::new("x.WAVE")), AudioFormat::Wav);
        assert_eq!(AudioFormat::from_path(Path::new("x.mp3")), AudioFormat::Mp3);
        assert_eq!(
            AudioFormat::from_path(Path::new("x.flac")),
            AudioFormat::Unknown
        );
        assert_eq!(AudioFormat::from_path(Path::new("x")), AudioFormat::Unknown);
    }

    #[test]
    fn test_deinterleave() {
        let channels = deinterleave(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2);
        assert_eq!(channels[0], vec![1.0, 3.0, 5.0]);
        assert_eq!(channels[1], vec![2.0, 4.0, 6.0]);
    }

    #[test]
    fn test_resample_preserves_duration() {
        let samples = vec![0.5f32; 22050];
        let out = resample_linear(&samples, 22050, 44100);
        assert_eq!(out.len(), 44100);
        assert!(out.iter().all(|&s| (s - 0.5).abs() < 1e-6));
    }

    #[test]
    fn test_resample_same_rate_is_copy() {
        let samples = vec![0.1f32, 0.2, 0.3];
        assert_eq!(resample_linear(&samples, 48000, 48000), samples);
    }

    #[test]
    fn test_wav_round_trip() {
        let dir = std::env::temp_dir();
        let path = dir.join("wf_file_round_trip.wav");

        let left: Vec<f32> = (0..1000).map(|i| (i as f32 * 0.01).sin() * 1.2).collect();
        let right: Vec<f32> = left.iter().map(|s| -s).collect();
        let buffer = AudioBuffer::new(left, right, SampleRate::Hz48000);

        write_wav(&path, &buffer).unwrap();
        let decoded = decode_audio(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(decoded.sample_rate(), SampleRate::Hz48000);
        assert_eq!(decoded.len(), buffer.len());
        // Float WAV is written unclamped, so out-of-range samples survive
        for (a, b) in decoded.left().iter().zip(buffer.left()) {
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_mono_wav_duplicates_channels() {
        let dir = std::env::temp_dir();
        let path = dir.join("wf_file_mono.wav");

        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 44100,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for i in 0..441 {
            writer.write_sample((i as i16) * 30).unwrap();
        }
        writer.finalize().unwrap();

        let decoded = decode_audio(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(decoded.sample_rate(), SampleRate::Hz44100);
        assert_eq!(decoded.left(), decoded.right());
    }

    #[test]
    fn test_rejects_multichannel() {
        let dir = std::env::temp_dir();
        let path = dir.join("wf_file_quad.wav");

        let spec = hound::WavSpec {
            channels: 4,
            sample_rate: 48000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for _ in 0..400 {
            writer.write_sample(0i16).unwrap();
        }
        writer.finalize().unwrap();

        let result = decode_audio(&path);
        std::fs::remove_file(&path).ok();

        assert!(matches!(result, Err(FileError::UnsupportedChannels(4))));
    }

    #[test]
    fn test_odd_rate_is_conformed() {
        let dir = std::env::temp_dir();
        let path = dir.join("wf_file_32k.wav");

        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 32000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for _ in 0..3200 {
            writer.write_sample(1000i16).unwrap();
            writer.write_sample(-1000i16).unwrap();
        }
        writer.finalize().unwrap();

        let decoded = decode_audio(&path).unwrap();
        std::fs::remove_file(&path).ok();

        // 32 kHz < 46 kHz, so it conforms to 44.1 kHz
        assert_eq!(decoded.sample_rate(), SampleRate::Hz44100);
        let expected = (3200.0f64 * 44100.0 / 32000.0).round() as usize;
        assert_eq!(decoded.len(), expected);
    }

    #[test]
    fn test_missing_file() {
        let result = decode_audio("/nonexistent/path/audio.wav");
        assert!(matches!(result, Err(FileError::NotFound(_))));
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = std::env::temp_dir();
        let path = dir.join("wf_file_bogus.xyz");
        std::fs::write(&path, b"not audio").unwrap();

        let result = decode_audio(&path);
        std::fs::remove_file(&path).ok();

        assert!(matches!(result, Err(FileError::UnsupportedFormat(_))));
    }
}
