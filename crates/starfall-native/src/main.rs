use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use starfall_core::{AcquireError, AmplitudeSource, BlowDetector, BlowParams};

const POLL_INTERVAL: Duration = Duration::from_millis(16);
const REPORT_EVERY: u32 = 30;
const DEFAULT_TIMEOUT_SECS: u64 = 30;

type Ring = Arc<Mutex<VecDeque<u8>>>;

/// Default input device feeding a ring of the most recent 8-bit samples,
/// centred on 128 like a WebAudio byte time-domain snapshot.
struct CpalMic {
    stream: Option<cpal::Stream>,
    ring: Ring,
}

impl AmplitudeSource for CpalMic {
    fn read_time_domain(&mut self, buf: &mut [u8]) {
        let Ok(ring) = self.ring.lock() else {
            buf.fill(128);
            return;
        };
        let missing = buf.len().saturating_sub(ring.len());
        buf[..missing].fill(128);
        let skip = ring.len().saturating_sub(buf.len());
        for (dst, src) in buf[missing..].iter_mut().zip(ring.iter().skip(skip)) {
            *dst = *src;
        }
    }

    fn release(&mut self) {
        if let Some(stream) = self.stream.take() {
            if let Err(e) = stream.pause() {
                log::warn!("[mic] pause failed: {e}");
            }
            log::info!("[mic] input stream released");
        }
    }
}

impl Drop for CpalMic {
    fn drop(&mut self) {
        self.release();
    }
}

#[inline]
fn to_u8(sample: f32) -> u8 {
    ((sample.clamp(-1.0, 1.0) * 127.0) + 128.0).round() as u8
}

fn push_frames(ring: &Ring, cap: usize, channels: usize, data: impl Iterator<Item = f32>) {
    let Ok(mut ring) = ring.lock() else {
        return;
    };
    // First channel only
    for s in data.step_by(channels.max(1)) {
        if ring.len() == cap {
            ring.pop_front();
        }
        ring.push_back(to_u8(s));
    }
}

fn acquire(window: usize) -> Result<CpalMic, AcquireError> {
    let host = cpal::default_host();
    let device = host
        .default_input_device()
        .ok_or(AcquireError::Unsupported)?;
    let config = device
        .default_input_config()
        .map_err(|e| AcquireError::Device(e.to_string()))?;
    let channels = config.channels() as usize;
    log::info!(
        "[mic] {} @ {} Hz, {} ch, {:?}",
        device.name().unwrap_or_else(|_| "input".into()),
        config.sample_rate().0,
        channels,
        config.sample_format()
    );

    let ring: Ring = Arc::new(Mutex::new(VecDeque::with_capacity(window)));
    let err_fn = |err: cpal::StreamError| log::error!("[mic] input stream error: {err}");
    let sink = Arc::clone(&ring);
    let stream = match config.sample_format() {
        cpal::SampleFormat::F32 => device.build_input_stream(
            &config.into(),
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                push_frames(&sink, window, channels, data.iter().copied())
            },
            err_fn,
            None,
        ),
        cpal::SampleFormat::I16 => device.build_input_stream(
            &config.into(),
            move |data: &[i16], _: &cpal::InputCallbackInfo| {
                push_frames(
                    &sink,
                    window,
                    channels,
                    data.iter().map(|&s| s as f32 / i16::MAX as f32),
                )
            },
            err_fn,
            None,
        ),
        cpal::SampleFormat::U16 => device.build_input_stream(
            &config.into(),
            move |data: &[u16], _: &cpal::InputCallbackInfo| {
                push_frames(
                    &sink,
                    window,
                    channels,
                    data.iter().map(|&s| s as f32 / u16::MAX as f32 * 2.0 - 1.0),
                )
            },
            err_fn,
            None,
        ),
        other => {
            return Err(AcquireError::Device(format!(
                "unsupported sample format {other:?}"
            )))
        }
    }
    .map_err(|e| AcquireError::Device(e.to_string()))?;

    stream
        .play()
        .map_err(|e| AcquireError::Device(e.to_string()))?;
    Ok(CpalMic {
        stream: Some(stream),
        ring,
    })
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .init();

    let timeout = std::env::args()
        .nth(1)
        .map(|s| s.parse::<u64>())
        .transpose()?
        .unwrap_or(DEFAULT_TIMEOUT_SECS);
    let timeout = Duration::from_secs(timeout);

    let params = BlowParams::default();
    let window = params.window;
    let mut detector: BlowDetector<CpalMic> = BlowDetector::new(params);
    let start = Instant::now();
    let now_ms = || start.elapsed().as_secs_f64() * 1000.0;

    let activation = detector
        .begin()
        .ok_or_else(|| anyhow::anyhow!("detector refused a new activation"))?;
    if !detector.complete(activation, acquire(window), now_ms()) {
        anyhow::bail!("no microphone available");
    }
    log::info!("blow into the microphone ({}s timeout)", timeout.as_secs());

    let mut frames = 0u32;
    let fired = loop {
        if detector.sample(now_ms()) {
            break true;
        }
        if start.elapsed() >= timeout {
            break false;
        }
        frames += 1;
        if frames % REPORT_EVERY == 0 {
            log::info!("score {:.2}", detector.score());
        }
        thread::sleep(POLL_INTERVAL);
    };
    detector.end();

    if fired {
        log::info!("blow detected after {:.1}s", start.elapsed().as_secs_f32());
        Ok(())
    } else {
        anyhow::bail!("no blow detected within {}s", timeout.as_secs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mic_with(samples: &[u8]) -> CpalMic {
        CpalMic {
            stream: None,
            ring: Arc::new(Mutex::new(samples.iter().copied().collect())),
        }
    }

    #[test]
    fn to_u8_centres_on_128() {
        assert_eq!(to_u8(0.0), 128);
        assert_eq!(to_u8(1.0), 255);
        assert_eq!(to_u8(-1.0), 1);
        assert_eq!(to_u8(4.0), 255);
        assert_eq!(to_u8(-4.0), 1);
    }

    #[test]
    fn short_ring_is_left_padded_with_silence() {
        let mut mic = mic_with(&[10, 20, 30]);
        let mut buf = [0u8; 6];
        mic.read_time_domain(&mut buf);
        assert_eq!(buf, [128, 128, 128, 10, 20, 30]);
    }

    #[test]
    fn long_ring_yields_newest_samples() {
        let mut mic = mic_with(&[1, 2, 3, 4, 5]);
        let mut buf = [0u8; 3];
        mic.read_time_domain(&mut buf);
        assert_eq!(buf, [3, 4, 5]);
    }

    #[test]
    fn push_frames_keeps_first_channel_and_caps_ring() {
        let ring: Ring = Arc::new(Mutex::new(VecDeque::new()));
        // Interleaved stereo: left is full scale, right is silence
        let stereo = [1.0, 0.0, -1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        push_frames(&ring, 3, 2, stereo.iter().copied());
        let got: Vec<u8> = ring.lock().unwrap().iter().copied().collect();
        assert_eq!(got, vec![1, 128, 255]);
    }

    #[test]
    fn release_without_stream_is_idempotent() {
        let mut mic = mic_with(&[]);
        mic.release();
        mic.release();
        assert!(mic.stream.is_none());
    }
}
