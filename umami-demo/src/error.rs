use umami::{Console, HandlerId, LoggingLevel};

#[derive(Debug, thiserror::Error)]
pub enum DemoError {
    #[error(transparent)]
    Args(#[from] umami::Error),

    #[error("{left} + {right} does not fit in 32 bits")]
    Overflow { left: i32, right: i32 },

    #[error("nothing handles \"{0}\"")]
    UnknownHandler(HandlerId),
}

pub type Result<T> = std::result::Result<T, DemoError>;

/// Report `err` through the console and exit with status 1.
pub fn fail(console: &mut dyn Console, err: &DemoError) -> ! {
    match err {
        DemoError::Args(inner) => umami::fatal(console, inner),
        other => {
            console.error(LoggingLevel::Zero, &other.to_string());
            std::process::exit(1);
        }
    }
}
