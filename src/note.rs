//! Note token decoding.
//!
//! A token looks like `[octave]letter[accidental][duration]['.']['/']`, for
//! example `4C#16./`. Fields that are left out fall back to the octave and
//! duration carried in a [`NoteContext`], and anything that does not make
//! sense decodes to a rest instead of failing.

use core::fmt;

use crate::pitch;

/// Ticks in a whole note; one tick is a 1/64 note.
pub const TICKS_PER_WHOLE: u8 = 64;

/// Octave used until a token sets one.
pub const DEFAULT_OCTAVE: u8 = 4;
/// Duration used until a token sets one (quarter note).
pub const DEFAULT_DURATION: u8 = 4;

const SEMITONES_PER_OCTAVE: i16 = 12;

/// Note names, in the order of the pitch table (which starts on A).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Letter {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
}

// indexed by `Letter as usize`
const LETTERS: [Letter; 7] = [
    Letter::A,
    Letter::B,
    Letter::C,
    Letter::D,
    Letter::E,
    Letter::F,
    Letter::G,
];
const SEMITONE_OFFSETS: [u8; 7] = [0, 2, 3, 5, 7, 8, 10];
// octaves are numbered from C but the table starts on A
const OCTAVE_CORRECTIONS: [u8; 7] = [0, 0, 1, 1, 1, 1, 1];

impl Letter {
    /// Case-insensitive lookup, `None` for anything that is not A-G.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte.to_ascii_uppercase() {
            b @ b'A'..=b'G' => Some(LETTERS[(b - b'A') as usize]),
            _ => None,
        }
    }

    /// Offset in semitones from A within one table octave.
    pub fn semitone(self) -> u8 {
        SEMITONE_OFFSETS[self as usize]
    }

    fn octave_correction(self) -> u8 {
        OCTAVE_CORRECTIONS[self as usize]
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Letter::A => "A",
            Letter::B => "B",
            Letter::C => "C",
            Letter::D => "D",
            Letter::E => "E",
            Letter::F => "F",
            Letter::G => "G",
        };
        f.write_str(symbol)
    }
}

/// Net semitone shift written after the letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accidental {
    Natural,
    Sharp,
    Flat,
}

impl Accidental {
    fn from_shift(shift: i8) -> Self {
        match shift {
            s if s > 0 => Accidental::Sharp,
            s if s < 0 => Accidental::Flat,
            _ => Accidental::Natural,
        }
    }

    /// Semitone shift applied to the pitch index.
    pub fn shift(self) -> i16 {
        match self {
            Accidental::Natural => 0,
            Accidental::Sharp => 1,
            Accidental::Flat => -1,
        }
    }
}

/// What a token sounds like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pitch {
    Rest,
    Tone { letter: Letter, accidental: Accidental },
}

/// Octave and duration carried from one token to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteContext {
    pub octave: u8,
    pub duration: u8,
}

impl NoteContext {
    /// A duration of 0 would mean "reuse the previous one" with nothing to
    /// reuse, so it is replaced by the default.
    pub fn new(octave: u8, duration: u8) -> Self {
        Self {
            octave,
            duration: if duration == 0 { DEFAULT_DURATION } else { duration },
        }
    }
}

impl Default for NoteContext {
    fn default() -> Self {
        Self::new(DEFAULT_OCTAVE, DEFAULT_DURATION)
    }
}

/// Result of decoding one token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedNote {
    pub octave: u8,
    pub pitch: Pitch,
    pub duration: u8,
    pub dotted: bool,
    pub cut: bool,
    /// Semitone index, `None` for rests and pitches off the table.
    pub index: Option<u8>,
    /// 0 Hz means silence.
    pub frequency: u16,
    /// Total ticks the note lasts, including the tick spent decoding it.
    pub ticks: u8,
}

impl DecodedNote {
    /// Countdown left once the decoding tick has been spent.
    pub fn sustain(&self) -> u8 {
        self.ticks.saturating_sub(1)
    }

    pub fn is_rest(&self) -> bool {
        self.frequency == 0
    }
}

impl fmt::Display for DecodedNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.pitch {
            Pitch::Rest => write!(f, "R{}", self.duration)?,
            Pitch::Tone { letter, accidental } => {
                let symbol = match accidental {
                    Accidental::Natural => "",
                    Accidental::Sharp => "#",
                    Accidental::Flat => "-",
                };
                write!(f, "{}{}{}{}", self.octave, letter, symbol, self.duration)?
            }
        }
        if self.dotted {
            f.write_str(".")?;
        }
        if self.cut {
            f.write_str("/")?;
        }
        Ok(())
    }
}

/// Ticks of an undotted note, never less than one.
pub fn base_ticks(duration: u8) -> u8 {
    if duration == 0 {
        return 1;
    }
    (TICKS_PER_WHOLE / duration).max(1)
}

/// Ticks of a note, dotted notes last half as long again (rounded down).
pub fn note_ticks(duration: u8, dotted: bool) -> u8 {
    let ticks = base_ticks(duration);
    if dotted {
        ticks + (ticks >> 1)
    } else {
        ticks
    }
}

/// Table index of a letter at a given octave, `None` if it falls off the table.
pub fn pitch_index(letter: Letter, accidental: Accidental, octave: u8) -> Option<u8> {
    let octave = octave as i16 - letter.octave_correction() as i16;
    let index = letter.semitone() as i16 + octave * SEMITONES_PER_OCTAVE + accidental.shift();
    if (0..=pitch::MAX_PITCH as i16).contains(&index) {
        Some(index as u8)
    } else {
        None
    }
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        // the token ends at the first terminator, if any
        let end = bytes
            .iter()
            .position(|&b| b == 0 || b == b' ')
            .unwrap_or(bytes.len());
        Self {
            bytes: &bytes[..end],
            pos: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn bump(&mut self) {
        self.pos += 1;
    }

    fn eat(&mut self, f: impl Fn(u8) -> bool) -> Option<u8> {
        let b = self.peek().filter(|&b| f(b))?;
        self.bump();
        Some(b)
    }

    fn digit(&mut self) -> Option<u8> {
        self.eat(|b| b.is_ascii_digit()).map(|b| b - b'0')
    }
}

/// Decode one token.
///
/// `context` is updated when the token carries an octave digit or a nonzero
/// duration, and supplies them otherwise.
pub fn parse(token: &[u8], context: &mut NoteContext) -> DecodedNote {
    let mut reader = Reader::new(token);

    if let Some(octave) = reader.digit() {
        context.octave = octave;
    }

    // the letter slot is always consumed, even when it is not a letter
    let letter_byte = reader.peek();
    let letter = letter_byte.and_then(Letter::from_byte);
    if letter_byte.is_some() {
        reader.bump();
    }

    let mut shift = 0i8;
    if reader.eat(|b| b == b'#' || b == b'+').is_some() {
        shift += 1;
    }
    if reader.eat(|b| b == b'-').is_some() {
        shift -= 1;
    }
    let accidental = Accidental::from_shift(shift);

    let mut duration = 0u8;
    if let Some(d) = reader.digit() {
        duration = d;
        if let Some(d) = reader.digit() {
            duration = duration * 10 + d;
        }
    }
    if duration == 0 {
        duration = context.duration;
    } else {
        context.duration = duration;
    }

    let dotted = reader.eat(|b| b == b'.').is_some();
    let cut = reader.eat(|b| b == b'/').is_some();

    let pitch = match letter {
        Some(letter) => Pitch::Tone { letter, accidental },
        None => {
            if let Some(b) = letter_byte.filter(|b| !b.eq_ignore_ascii_case(&b'R')) {
                log::debug!("unrecognized note letter {:?}, playing a rest", b as char);
            }
            Pitch::Rest
        }
    };
    let index = match pitch {
        Pitch::Tone { letter, accidental } => pitch_index(letter, accidental, context.octave),
        Pitch::Rest => None,
    };

    DecodedNote {
        octave: context.octave,
        pitch,
        duration,
        dotted,
        cut,
        index,
        frequency: pitch::frequency_of(index),
        ticks: note_ticks(duration, dotted),
    }
}
