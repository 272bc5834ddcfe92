/// Errors that abort a session.  Losing the game is not one of them; that is
/// `GameStatus::Ending`.

#[derive(thiserror::Error, Debug)]
pub enum GameError {
    /// Terminal I/O failed
    #[error("terminal I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("terminal is {width}x{height}, need at least {min_width}x{min_height}")]
    TerminalTooSmall {
        width: u16,
        height: u16,
        min_width: u16,
        min_height: u16,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("cannot parse {name}={value:?}")]
    InvalidEnv { name: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, GameError>;
