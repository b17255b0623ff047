//! Canonical RIFF/WAVE writer for 16-bit PCM.

use crate::foundation::error::{MediaError, MediaResult};

/// `RIFF` header + `fmt ` chunk + `data` chunk header.
pub const WAV_HEADER_BYTES: usize = 44;

/// Largest `data` chunk a RIFF file can describe (its size field is `36 + data` in a `u32`).
pub const WAV_MAX_DATA_BYTES: u32 = u32::MAX - 36;

const PCM_FORMAT_TAG: u16 = 1;
const BITS_PER_SAMPLE: u16 = 16;

/// Encode mono 16-bit little-endian PCM samples.
pub fn encode_wav_pcm16_mono(samples: &[i16], sample_rate: u32) -> MediaResult<Vec<u8>> {
    if sample_rate == 0 {
        return Err(MediaError::validation("wav sample_rate must be > 0"));
    }

    let channels: u16 = 1;
    let block_align = channels * (BITS_PER_SAMPLE / 8);
    let byte_rate = sample_rate
        .checked_mul(u32::from(block_align))
        .ok_or_else(|| MediaError::validation("wav byte rate overflows u32"))?;
    let data_bytes = u32::try_from(samples.len() * usize::from(block_align))
        .ok()
        .filter(|&n| n <= WAV_MAX_DATA_BYTES)
        .ok_or_else(|| MediaError::validation("wav data chunk exceeds 4 GiB"))?;

    let mut out = Vec::with_capacity(WAV_HEADER_BYTES + data_bytes as usize);
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_bytes).to_le_bytes());
    out.extend_from_slice(b"WAVE");

    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&PCM_FORMAT_TAG.to_le_bytes());
    out.extend_from_slice(&channels.to_le_bytes());
    out.extend_from_slice(&sample_rate.to_le_bytes());
    out.extend_from_slice(&byte_rate.to_le_bytes());
    out.extend_from_slice(&block_align.to_le_bytes());
    out.extend_from_slice(&BITS_PER_SAMPLE.to_le_bytes());

    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_bytes.to_le_bytes());
    for s in samples {
        out.extend_from_slice(&s.to_le_bytes());
    }
    Ok(out)
}
