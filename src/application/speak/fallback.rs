//! Placeholder audio served when the upstream is unavailable and the
//! development fallback is switched on.

use std::io::Cursor;
use std::sync::OnceLock;

use bytes::Bytes;
use hound::{SampleFormat, WavSpec, WavWriter};
use tracing::warn;

pub const PLACEHOLDER_CONTENT_TYPE: &str = "audio/wav";

const SAMPLE_RATE: u32 = 16_000;
const DURATION_MS: u32 = 500;

/// Half a second of 16 kHz mono silence, rendered once per process.
pub fn placeholder_audio() -> Bytes {
    static AUDIO: OnceLock<Bytes> = OnceLock::new();
    AUDIO
        .get_or_init(|| match render_silence(SAMPLE_RATE, DURATION_MS) {
            Ok(wav) => Bytes::from(wav),
            Err(e) => {
                warn!("Failed to render placeholder audio: {}", e);
                Bytes::new()
            }
        })
        .clone()
}

fn render_silence(sample_rate: u32, duration_ms: u32) -> Result<Vec<u8>, hound::Error> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut buf = Vec::new();
    {
        let mut writer = WavWriter::new(Cursor::new(&mut buf), spec)?;
        let samples = sample_rate * duration_ms / 1000;
        for _ in 0..samples {
            writer.write_sample(0i16)?;
        }
        writer.finalize()?;
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_is_a_riff_wave() {
        let audio = placeholder_audio();
        assert_eq!(&audio[..4], b"RIFF");
        assert_eq!(&audio[8..12], b"WAVE");
        // header + 8000 samples * 2 bytes
        assert!(audio.len() > 8000 * 2);
    }

    #[test]
    fn placeholder_is_rendered_once() {
        let a = placeholder_audio();
        let b = placeholder_audio();
        assert_eq!(a.as_ptr(), b.as_ptr());
    }
}
