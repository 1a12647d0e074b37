//! Tick-driven player for a compact MML-style melody notation.
//!
//! A score is a run of space separated tokens such as `4C8 D E16. R8 G/`.
//! [`TonePlayer`] decodes them one at a time and drives a single-pitch
//! [`ToneOutput`] (a buzzer, a PWM pin, a software oscillator) from a periodic
//! timer whose period is one 1/64 note. The crate is `no_std`, allocation free
//! and uses no floating point.
//!
//! ```
//! use mml_tone::{ToneOutput, TonePlayer};
//!
//! struct Buzzer(u16);
//!
//! impl ToneOutput for Buzzer {
//!     fn configure(&mut self, _channel: u8) {}
//!     fn play(&mut self, _channel: u8, frequency: u16) {
//!         self.0 = frequency;
//!     }
//!     fn silence(&mut self, _channel: u8) {
//!         self.0 = 0;
//!     }
//! }
//!
//! let mut player = TonePlayer::new(9, "4A8 C16", Buzzer(0));
//! player.setup();
//! player.start();
//! player.step();
//! assert_eq!(player.output().0, 440);
//! while !player.finished() {
//!     player.step();
//! }
//! assert_eq!(player.output().0, 0);
//! ```

#![cfg_attr(not(test), no_std)]

pub mod note;
pub mod output;
pub mod pitch;
pub mod player;
pub mod score;

pub use note::{parse, DecodedNote, NoteContext};
pub use output::ToneOutput;
pub use pitch::frequency;
pub use player::{PlayerState, TonePlayer};
pub use score::{Score, TokenBuffer};
