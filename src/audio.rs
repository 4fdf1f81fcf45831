use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use log::warn;
use rodio::{OutputStream, Sink, Source};

use crate::error::{AppError, AppResult};

const SAMPLE_RATE: u32 = 44100;
const CHIME_FREQ_HZ: f32 = 880.0;
const CHIME_DURATION_MS: u64 = 450;
const CHIME_VOLUME: f32 = 0.3;

/// Host audio capability: play the short reminder cue. Best-effort, like the
/// notifier; playback failures never affect scheduling or persistence.
pub trait AudioCue: Send + Sync {
    fn play(&self) -> AppResult<()>;
}

/// No-op cue for headless hosts.
pub struct SilentCue;

impl AudioCue for SilentCue {
    fn play(&self) -> AppResult<()> {
        Ok(())
    }
}

enum CueCommand {
    Play,
}

/// Rodio-backed chime. The output stream and sink are not `Send`, so a
/// dedicated audio thread owns them and receives commands over a channel.
/// The thread and the device are only opened on first use.
pub struct ChimeCue {
    tx: Arc<Mutex<Option<Sender<CueCommand>>>>,
}

impl ChimeCue {
    pub fn new() -> Self {
        Self {
            tx: Arc::new(Mutex::new(None)),
        }
    }

    fn ensure_thread(&self) -> AppResult<Sender<CueCommand>> {
        let mut guard = self.tx.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(tx) = guard.as_ref() {
            return Ok(tx.clone());
        }

        let (tx, rx) = mpsc::channel::<CueCommand>();

        thread::Builder::new()
            .name("reminder-chime".to_string())
            .spawn(move || {
                let mut _stream: Option<OutputStream> = None;
                let mut sink: Option<Sink> = None;

                fn ensure_sink(
                    stream: &mut Option<OutputStream>,
                    sink: &mut Option<Sink>,
                ) -> Result<(), String> {
                    if sink.is_none() {
                        let (s, handle) = OutputStream::try_default()
                            .map_err(|e| format!("Failed to create audio output stream: {}", e))?;
                        let new_sink = Sink::try_new(&handle)
                            .map_err(|e| format!("Failed to create audio sink: {}", e))?;
                        new_sink.set_volume(CHIME_VOLUME);
                        *stream = Some(s);
                        *sink = Some(new_sink);
                    }
                    Ok(())
                }

                while let Ok(cmd) = rx.recv() {
                    match cmd {
                        CueCommand::Play => {
                            if let Err(e) = ensure_sink(&mut _stream, &mut sink) {
                                warn!("reminder chime unavailable: {}", e);
                                continue;
                            }
                            if let Some(ref s) = sink {
                                s.append(Chime::new());
                            }
                        }
                    }
                }
            })
            .map_err(|e| AppError::audio(e.to_string()))?;

        let tx_clone = tx.clone();
        *guard = Some(tx);
        Ok(tx_clone)
    }
}

impl Default for ChimeCue {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioCue for ChimeCue {
    fn play(&self) -> AppResult<()> {
        let tx = self.ensure_thread()?;
        tx.send(CueCommand::Play)
            .map_err(|e| AppError::audio(e.to_string()))
    }
}

/// Short decaying sine chime, synthesized instead of shipping a sample file.
struct Chime {
    sample_rate: u32,
    num_sample: usize,
    total_samples: usize,
}

impl Chime {
    fn new() -> Self {
        let total_samples = (SAMPLE_RATE as u64 * CHIME_DURATION_MS / 1000) as usize;
        Self {
            sample_rate: SAMPLE_RATE,
            num_sample: 0,
            total_samples,
        }
    }
}

impl Iterator for Chime {
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        if self.num_sample >= self.total_samples {
            return None;
        }

        let t = self.num_sample as f32 / self.sample_rate as f32;
        let envelope = 1.0 - self.num_sample as f32 / self.total_samples as f32;
        self.num_sample += 1;

        let sample = (2.0 * std::f32::consts::PI * CHIME_FREQ_HZ * t).sin();
        Some(sample * envelope * 0.25)
    }
}

impl Source for Chime {
    fn current_frame_len(&self) -> Option<usize> {
        Some(self.total_samples - self.num_sample)
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        Some(Duration::from_millis(CHIME_DURATION_MS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chime_is_finite_and_decays() {
        let samples: Vec<f32> = Chime::new().collect();
        assert_eq!(samples.len(), (SAMPLE_RATE as u64 * CHIME_DURATION_MS / 1000) as usize);

        // Envelope pushes late samples toward silence
        let head = samples[100].abs();
        let tail = samples[samples.len() - 2].abs();
        assert!(tail < head || tail < 0.01);
    }

    #[test]
    fn test_silent_cue_never_fails() {
        assert!(SilentCue.play().is_ok());
    }
}
