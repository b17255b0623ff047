use std::f64::consts::TAU;

use crate::{
    codec::wav::{WAV_MAX_DATA_BYTES, encode_wav_pcm16_mono},
    foundation::error::{MediaError, MediaResult},
};

/// Sample rate used for voice-note placeholders.
pub const TONE_SAMPLE_RATE: u32 = 22_050;

/// Synthesis parameters for the placeholder tone.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ToneParams {
    /// Output sample rate in Hz.
    pub sample_rate: u32,
    /// Sine frequency in Hz.
    pub frequency_hz: f64,
    /// Peak sample magnitude at full envelope.
    pub amplitude: u16,
}

impl Default for ToneParams {
    fn default() -> Self {
        Self {
            sample_rate: TONE_SAMPLE_RATE,
            frequency_hz: 440.0,
            amplitude: 10_000,
        }
    }
}

impl ToneParams {
    /// Check rate, frequency and amplitude ranges.
    pub fn validate(&self) -> MediaResult<()> {
        if self.sample_rate == 0 {
            return Err(MediaError::validation("tone sample_rate must be > 0"));
        }
        if !self.frequency_hz.is_finite() || self.frequency_hz < 0.0 {
            return Err(MediaError::validation(
                "tone frequency_hz must be finite and >= 0",
            ));
        }
        if i16::try_from(self.amplitude).is_err() {
            return Err(MediaError::validation(format!(
                "tone amplitude {} exceeds {}",
                self.amplitude,
                i16::MAX
            )));
        }
        Ok(())
    }
}

/// Mono 16-bit PCM buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AudioArtifact {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Signed 16-bit samples.
    pub samples: Vec<i16>,
}

impl AudioArtifact {
    /// Encode as a RIFF/WAVE file.
    pub fn to_wav_bytes(&self) -> MediaResult<Vec<u8>> {
        encode_wav_pcm16_mono(&self.samples, self.sample_rate)
    }

    /// Length in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / f64::from(self.sample_rate)
    }

    /// Largest absolute sample value in `range`; `0` when the range is empty or out of bounds.
    pub fn peak(&self, range: std::ops::Range<usize>) -> u16 {
        self.samples
            .get(range)
            .unwrap_or_default()
            .iter()
            .map(|s| s.unsigned_abs())
            .max()
            .unwrap_or(0)
    }
}

/// Linear attack/release envelope: `clamp(min(4t, 4(d - t), 1), 0, 1)`.
pub fn fade_gain(t: f64, duration_secs: f64) -> f64 {
    (4.0 * t).min(4.0 * (duration_secs - t)).min(1.0).clamp(0.0, 1.0)
}

/// Synthesize `duration_seconds` of a faded sine tone.
///
/// The result holds exactly `sample_rate * duration_seconds` samples.
pub fn synthesize_tone(duration_seconds: i64, params: &ToneParams) -> MediaResult<AudioArtifact> {
    if duration_seconds <= 0 {
        return Err(MediaError::invalid_duration(format!(
            "duration_seconds must be > 0, got {duration_seconds}"
        )));
    }
    params.validate()?;
    let total = tone_sample_count(duration_seconds, params.sample_rate)?;

    let rate = f64::from(params.sample_rate);
    let duration = duration_seconds as f64;
    let amplitude = f64::from(params.amplitude);

    let samples = (0..total)
        .map(|i| {
            let t = i as f64 / rate;
            let v = amplitude * fade_gain(t, duration) * (TAU * params.frequency_hz * t).sin();
            v.round() as i16
        })
        .collect();

    Ok(AudioArtifact {
        sample_rate: params.sample_rate,
        samples,
    })
}

/// Sample count for a positive duration, checked against the WAV size limit before allocating.
fn tone_sample_count(duration_seconds: i64, sample_rate: u32) -> MediaResult<usize> {
    let samples = u64::try_from(duration_seconds)
        .ok()
        .and_then(|secs| secs.checked_mul(u64::from(sample_rate)));
    match samples {
        Some(n) if n.saturating_mul(2) <= u64::from(WAV_MAX_DATA_BYTES) => {
            usize::try_from(n).map_err(|_| {
                MediaError::invalid_duration(format!("{n} samples do not fit in memory"))
            })
        }
        _ => Err(MediaError::invalid_duration(format!(
            "{duration_seconds} s at {sample_rate} Hz exceeds the 4 GiB WAV data limit"
        ))),
    }
}

/// Synthesize and encode a tone as WAV bytes.
pub fn encode_tone(duration_seconds: i64, params: &ToneParams) -> MediaResult<Vec<u8>> {
    synthesize_tone(duration_seconds, params)?.to_wav_bytes()
}

#[cfg(test)]
#[path = "../../tests/unit/audio/tone.rs"]
mod tests;
