//! What the player needs from the hardware.

/// A single-pitch tone generator, such as a buzzer driven by a timer/PWM pin.
pub trait ToneOutput {
    /// Prepare `channel` for tone generation. Called once, from
    /// [`TonePlayer::setup`](crate::TonePlayer::setup).
    fn configure(&mut self, channel: u8);

    /// Start a tone at `frequency` Hz. 0 Hz must behave like [`silence`].
    ///
    /// [`silence`]: ToneOutput::silence
    fn play(&mut self, channel: u8, frequency: u16);

    /// Stop any tone on `channel`.
    fn silence(&mut self, channel: u8);
}

impl<T: ToneOutput + ?Sized> ToneOutput for &mut T {
    fn configure(&mut self, channel: u8) {
        (**self).configure(channel)
    }

    fn play(&mut self, channel: u8, frequency: u16) {
        (**self).play(channel, frequency)
    }

    fn silence(&mut self, channel: u8) {
        (**self).silence(channel)
    }
}
