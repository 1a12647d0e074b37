use std::path::PathBuf;
use clap::Parser;

// Renders an MML tone score to WAV through a simulated buzzer
#[derive(Debug, Parser)]
#[clap(author, version, about, long_about = None)]
pub struct MmlToneArgs {
    /// Input score file (space separated note tokens, e.g. "4C8 D E16.")
    pub input_file: PathBuf,
    /// Output file (In wav format)
    #[arg(short, long)]
    output_file: Option<PathBuf>,
    /// Tempo in quarter notes per minute
    #[arg(short, long, default_value_t = 120)]
    pub tempo: u32,
    /// Output sample rate in Hz
    #[arg(long, default_value_t = 44_100)]
    pub sample_rate: u32,
    /// Octave used until the score sets one
    #[arg(long, default_value_t = 4)]
    pub octave: u8,
    /// Note value used until the score sets one (4 = quarter note)
    #[arg(long, default_value_t = 4)]
    pub duration: u8,
    /// Square wave amplitude
    #[arg(long, default_value_t = 8_000)]
    pub volume: i16,
}

impl MmlToneArgs {
    pub fn get_output_path(&self) -> PathBuf {
        self.output_file.clone().unwrap_or(self.input_file.with_extension("wav"))
    }
}
