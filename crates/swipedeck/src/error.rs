use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeckError {
    #[error("deck has no slides")]
    Empty,

    #[error("slide ids must be sequential from 1: expected {expected}, found {found}")]
    NonSequentialId { expected: u32, found: u32 },

    #[error("slide {slide}: {reason}")]
    InvalidBlock { slide: u32, reason: String },

    #[error("slide {slide}: a choice slide needs exactly two options, found {count}")]
    ChoiceOptions { slide: u32, count: usize },

    #[error("slide {slide}: only one choice slide is allowed (first was {first})")]
    MultipleChoice { slide: u32, first: u32 },

    #[error("slide {slide}: the choice slide cannot be the last slide")]
    ChoiceIsLast { slide: u32 },

    #[error("slide {slide}: a reveal slide must come after the choice slide")]
    RevealWithoutChoice { slide: u32 },

    #[error("slide {slide}: {kind} slide is missing its `{field}` section")]
    MissingSection {
        slide: u32,
        kind: &'static str,
        field: &'static str,
    },

    #[error("position {position} is out of range for a deck of {size} slides")]
    OutOfRange { position: usize, size: usize },

    #[error("invalid deck YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
}

#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("audio player `{0}` is not installed or not on PATH")]
    Unavailable(String),

    #[error("failed to start audio player `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}
