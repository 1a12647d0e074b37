use std::process;

use args::MmlToneArgs;
use clap::Parser;
use error::RenderError;
use hound::WavWriter;
use mml_tone::NoteContext;
use render::RenderSettings;

mod args;
mod error;
mod render;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args: MmlToneArgs = MmlToneArgs::parse();

    if let Err(err) = run(&args) {
        log::error!("Failed to render {}: {}", args.input_file.display(), err);
        process::exit(1);
    }
}

fn run(args: &MmlToneArgs) -> Result<(), RenderError> {
    let context = NoteContext {
        octave: args.octave,
        duration: args.duration,
    };
    let settings = RenderSettings::new(args.tempo, args.sample_rate, args.volume, context)?;

    let source = std::fs::read(&args.input_file)?;
    let score = render::normalize_score(&source);
    if score.is_empty() {
        return Err(RenderError::EmptyScore);
    }

    let output_path = args.get_output_path();
    log::info!("Rendering {} at {} bpm...", args.input_file.display(), settings.tempo);
    let mut writer = WavWriter::create(&output_path, settings.wav_spec())?;
    let summary = render::render(&score, &settings, &mut writer)?;
    writer.finalize()?;

    let seconds = summary.samples / settings.sample_rate as u64;
    log::info!(
        "Wrote {} ({} notes, {} ticks, {}s)",
        output_path.display(),
        summary.notes,
        summary.ticks,
        seconds
    );
    Ok(())
}
