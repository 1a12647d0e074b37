//! Semitone pitch table.
//!
//! Index 0 is A0 (27.5 Hz) and every step is one equal-tempered semitone, up
//! to B8 at index 98. Only the lowest octave is stored; the rest of the table
//! is derived at compile time by doubling, so no floating point is involved.

/// Number of addressable pitches (A0..=B8).
pub const PITCH_COUNT: usize = 99;

/// Highest valid pitch index (B8).
pub const MAX_PITCH: u8 = (PITCH_COUNT - 1) as u8;

const SEMITONES_PER_OCTAVE: usize = 12;

// A0 .. G#0 in microhertz, 27.5 * 2^(n/12)
const BASE_OCTAVE_UHZ: [u64; SEMITONES_PER_OCTAVE] = [
    27_500_000, 29_135_235, 30_867_706, 32_703_196,
    34_647_829, 36_708_096, 38_890_873, 41_203_445,
    43_653_529, 46_249_303, 48_999_429, 51_913_087,
];

const fn microhertz(index: usize) -> u64 {
    BASE_OCTAVE_UHZ[index % SEMITONES_PER_OCTAVE] << (index / SEMITONES_PER_OCTAVE)
}

const fn build_table() -> [u16; PITCH_COUNT] {
    let mut table = [0u16; PITCH_COUNT];
    let mut i = 0;
    while i < PITCH_COUNT {
        table[i] = ((microhertz(i) + 500_000) / 1_000_000) as u16;
        i += 1;
    }
    table
}

/// Frequencies in whole Hz, rounded to nearest.
pub static FREQUENCIES: [u16; PITCH_COUNT] = build_table();

/// Frequency in Hz of a pitch index. Out of range indices are silent (0 Hz).
pub fn frequency(index: u8) -> u16 {
    FREQUENCIES.get(index as usize).copied().unwrap_or(0)
}

/// Frequency of an optional pitch, `None` being a rest.
pub fn frequency_of(pitch: Option<u8>) -> u16 {
    pitch.map(frequency).unwrap_or(0)
}
