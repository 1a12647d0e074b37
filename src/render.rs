//! Offline host for the tone player.
//!
//! A square-wave oscillator stands in for the buzzer and the timer interrupt
//! is simulated by stepping the player once per 1/64 note, writing the samples
//! that elapse between two ticks. Everything is integer arithmetic, like on
//! the target.

use std::io::{Seek, Write};

use hound::{SampleFormat, WavSpec, WavWriter};
use mml_tone::note::TICKS_PER_WHOLE;
use mml_tone::{NoteContext, ToneOutput, TonePlayer};

use crate::error::RenderError;

const TICKS_PER_QUARTER: u64 = TICKS_PER_WHOLE as u64 / 4;
const SECONDS_PER_MINUTE: u64 = 60;
// keeps the highest pitch (B8, 7902 Hz) under Nyquist
const MIN_SAMPLE_RATE: u32 = 16_000;
const HALF_PHASE: u32 = 1 << 31;

/// Stores the state of the simulated buzzer
pub struct SquareWave {
    sample_rate: u32,
    volume: i16,
    frequency: u16,
    phase: u32,
    increment: u32,
    configured: Option<u8>,
    notes_played: usize,
}

impl SquareWave {
    pub fn new(sample_rate: u32, volume: i16) -> Self {
        SquareWave {
            sample_rate,
            volume,
            frequency: 0,
            phase: 0,
            increment: 0,
            configured: None,
            notes_played: 0,
        }
    }

    /// Next PCM sample, 0 while silent
    pub fn next_sample(&mut self) -> i16 {
        if self.frequency == 0 {
            return 0;
        }
        self.phase = self.phase.wrapping_add(self.increment);
        if self.phase < HALF_PHASE {
            self.volume
        } else {
            self.volume.saturating_neg()
        }
    }

    pub fn notes_played(&self) -> usize {
        self.notes_played
    }
}

impl ToneOutput for SquareWave {
    fn configure(&mut self, channel: u8) {
        log::debug!("Buzzer configured on channel {}", channel);
        self.configured = Some(channel);
    }

    fn play(&mut self, channel: u8, frequency: u16) {
        if frequency == 0 {
            self.silence(channel);
            return;
        }
        if self.configured != Some(channel) {
            log::warn!("Playing on unconfigured channel {}", channel);
        }
        // 32-bit phase accumulator, one full turn per period
        self.increment = (((frequency as u64) << 32) / self.sample_rate as u64) as u32;
        self.frequency = frequency;
        self.notes_played += 1;
    }

    fn silence(&mut self, _channel: u8) {
        self.frequency = 0;
        self.increment = 0;
        self.phase = 0;
    }
}

/// Rendering parameters
#[derive(Debug, Clone, Copy)]
pub struct RenderSettings {
    pub tempo: u32,
    pub sample_rate: u32,
    pub volume: i16,
    pub context: NoteContext,
}

impl RenderSettings {
    pub fn new(tempo: u32, sample_rate: u32, volume: i16, context: NoteContext) -> Result<Self, RenderError> {
        if tempo == 0 {
            return Err(RenderError::InvalidSetting("tempo must be at least 1".to_owned()));
        }
        if sample_rate < MIN_SAMPLE_RATE {
            return Err(RenderError::InvalidSetting(format!(
                "sample rate must be at least {} Hz",
                MIN_SAMPLE_RATE
            )));
        }
        if volume <= 0 {
            return Err(RenderError::InvalidSetting("volume must be at least 1".to_owned()));
        }
        if context.duration == 0 {
            return Err(RenderError::InvalidSetting("duration must be at least 1".to_owned()));
        }
        Ok(RenderSettings {
            tempo,
            sample_rate,
            volume,
            context,
        })
    }

    pub fn wav_spec(&self) -> WavSpec {
        WavSpec {
            channels: 1,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        }
    }

    /// Samples elapsed after `ticks` ticks, rounded down. Used cumulatively so
    /// fractional tick lengths never drift.
    fn samples_at(&self, ticks: u64) -> u64 {
        ticks * self.sample_rate as u64 * SECONDS_PER_MINUTE / (self.tempo as u64 * TICKS_PER_QUARTER)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSummary {
    pub ticks: u64,
    pub samples: u64,
    pub notes: usize,
}

/// Collapse any whitespace run (newlines, tabs, repeated spaces) into the
/// single space the player uses as a delimiter.
pub fn normalize_score(source: &[u8]) -> Vec<u8> {
    let mut score = Vec::with_capacity(source.len());
    for token in source.split(|b| b.is_ascii_whitespace()).filter(|t| !t.is_empty()) {
        if !score.is_empty() {
            score.push(b' ');
        }
        score.extend_from_slice(token);
    }
    score
}

/// Play `score` to completion, writing its samples into `writer`.
pub fn render<W: Write + Seek>(
    score: &[u8],
    settings: &RenderSettings,
    writer: &mut WavWriter<W>,
) -> Result<RenderSummary, RenderError> {
    let buzzer = SquareWave::new(settings.sample_rate, settings.volume);
    let mut player = TonePlayer::with_context(0, score, buzzer, settings.context);
    player.setup();
    player.start();

    let mut ticks = 0u64;
    let mut samples = 0u64;
    loop {
        player.step();
        if player.finished() {
            break;
        }
        ticks += 1;

        let until = settings.samples_at(ticks);
        while samples < until {
            writer.write_sample(player.output_mut().next_sample())?;
            samples += 1;
        }
    }

    Ok(RenderSummary {
        ticks,
        samples,
        notes: player.output().notes_played(),
    })
}
