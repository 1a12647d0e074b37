//! Tick-driven melody player.
//!
//! [`TonePlayer::tick`] is meant to be called from a periodic timer whose
//! period is one 1/64 note. Each call does a bounded amount of work: it either
//! counts down the note that is sounding, or decodes the buffered token and
//! starts it. Reading the following token out of the score happens in
//! [`TonePlayer::fetch_next`], which is only allowed in the tick after a
//! decode, so the two costs never land in the same tick.

use crate::note::{self, DecodedNote, NoteContext};
use crate::output::ToneOutput;
use crate::score::{Score, TokenBuffer};

const START_OFFSET: usize = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    /// Not started, or stopped.
    Idle,
    /// Decoding and sustaining notes on every tick.
    Armed,
    /// The score ran out. Only [`TonePlayer::reset`] leaves this state.
    Finished,
}

/// Flags about the note currently sounding.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NoteFlags {
    /// The sounding note is the last one of the score.
    pub last: bool,
    /// Silence one tick before the note ends.
    pub cut: bool,
    /// A note was decoded on the previous tick; the next token may be fetched.
    pub refreshed: bool,
    /// The token buffer was filled since the last decode.
    pub prefetched: bool,
}

pub struct TonePlayer<S, O> {
    channel: u8,
    score: S,
    output: O,
    state: PlayerState,
    flags: NoteFlags,
    initial: NoteContext,
    context: NoteContext,
    countdown: u8,
    read_offset: usize,
    play_offset: usize,
    buffer: TokenBuffer,
}

impl<S: Score, O: ToneOutput> TonePlayer<S, O> {
    /// Player for `score` on `channel` of `output`, starting from octave 4
    /// and quarter notes.
    pub fn new(channel: u8, score: S, output: O) -> Self {
        Self::with_context(channel, score, output, NoteContext::default())
    }

    /// Player whose octave and duration start from `context` instead of the
    /// defaults. [`reset`](Self::reset) goes back to this context.
    pub fn with_context(channel: u8, score: S, output: O, context: NoteContext) -> Self {
        // never start from a zero duration, it has nothing to fall back on
        let context = NoteContext::new(context.octave, context.duration);
        Self {
            channel,
            score,
            output,
            state: PlayerState::Idle,
            flags: NoteFlags::default(),
            initial: context,
            context,
            countdown: 0,
            read_offset: START_OFFSET,
            play_offset: START_OFFSET,
            buffer: TokenBuffer::new(),
        }
    }

    /// Configure the output channel. Call once before playing.
    pub fn setup(&mut self) {
        self.output.configure(self.channel);
    }

    /// Start or resume playback. Does nothing once the score has finished.
    pub fn start(&mut self) {
        if self.state == PlayerState::Idle {
            log::debug!("channel {}: start", self.channel);
            self.state = PlayerState::Armed;
        }
    }

    /// Silence the output and pause. Position, countdown and the
    /// finished/last flags are kept, so [`start`](Self::start) resumes.
    pub fn stop(&mut self) {
        self.output.silence(self.channel);
        if self.state == PlayerState::Armed {
            log::debug!("channel {}: stop", self.channel);
            self.state = PlayerState::Idle;
        }
    }

    /// Silence the output and rewind to the beginning of the score, as if
    /// freshly constructed. Playback needs a new [`start`](Self::start).
    pub fn reset(&mut self) {
        log::debug!("channel {}: reset", self.channel);
        self.output.silence(self.channel);
        self.state = PlayerState::Idle;
        self.flags = NoteFlags::default();
        self.context = self.initial;
        self.countdown = 0;
        self.read_offset = START_OFFSET;
        self.play_offset = START_OFFSET;
        self.buffer.clear();
    }

    /// Copy the next token of the score into the lookahead buffer.
    ///
    /// Only does something before the first note or in the tick following a
    /// decode, and at most once per decode; any other call is a no-op.
    pub fn fetch_next(&mut self) {
        let window_open = self.read_offset == START_OFFSET || self.flags.refreshed;
        if !window_open || self.flags.prefetched {
            return;
        }
        self.play_offset = self.read_offset;
        self.flags.prefetched = true;
        if self.buffer.fill(&self.score, &mut self.read_offset) {
            log::trace!("channel {}: fetched {:?}", self.channel, self.buffer);
        }
    }

    /// Advance playback by one tick.
    pub fn tick(&mut self) {
        if self.state != PlayerState::Armed {
            return;
        }

        if self.flags.cut && self.countdown == 1 {
            self.output.silence(self.channel);
        }

        // first tick after a decode: close the fetch window
        if self.countdown >= note::base_ticks(self.context.duration) - 1 {
            self.flags.refreshed = false;
        }

        if self.countdown > 0 {
            self.countdown -= 1;
            return;
        }

        // nothing new was fetched since the last decode
        if self.play_offset == self.read_offset {
            log::debug!("channel {}: finished", self.channel);
            self.state = PlayerState::Finished;
            // release the last note once; later ticks make no output calls
            self.output.silence(self.channel);
            return;
        }

        if self.read_offset >= self.score.len() {
            self.flags.last = true;
        }

        let note = note::parse(self.buffer.as_bytes(), &mut self.context);
        self.flags.prefetched = false;
        self.sound(&note);
        self.flags.refreshed = true;

        self.countdown = note.sustain();
        self.flags.cut = note.cut;
    }

    /// One timer period as a driver would run it: refill the lookahead
    /// buffer if allowed, then tick.
    pub fn step(&mut self) {
        self.fetch_next();
        self.tick();
    }

    fn sound(&mut self, note: &DecodedNote) {
        log::trace!(
            "channel {}: {} at {} Hz for {} ticks",
            self.channel,
            note,
            note.frequency,
            note.ticks
        );
        if note.is_rest() {
            self.output.silence(self.channel);
        } else {
            self.output.play(self.channel, note.frequency);
        }
    }

    pub fn started(&self) -> bool {
        self.state == PlayerState::Armed
    }

    pub fn finished(&self) -> bool {
        self.state == PlayerState::Finished
    }

    pub fn last(&self) -> bool {
        self.flags.last
    }

    /// True during the tick following a decode, when fetching is allowed.
    pub fn refreshed(&self) -> bool {
        self.flags.refreshed
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn flags(&self) -> NoteFlags {
        self.flags
    }

    pub fn octave(&self) -> u8 {
        self.context.octave
    }

    pub fn duration(&self) -> u8 {
        self.context.duration
    }

    /// Ticks left before the sounding note ends.
    pub fn countdown(&self) -> u8 {
        self.countdown
    }

    pub fn read_offset(&self) -> usize {
        self.read_offset
    }

    pub fn play_offset(&self) -> usize {
        self.play_offset
    }

    /// The buffered, not yet decoded token.
    pub fn token(&self) -> &[u8] {
        self.buffer.as_bytes()
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }

    pub fn into_output(self) -> O {
        self.output
    }
}
