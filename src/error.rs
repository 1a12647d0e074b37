use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    #[error("Invalid setting: {0}")]
    InvalidSetting(String),

    #[error("Score contains no notes")]
    EmptyScore,
}
