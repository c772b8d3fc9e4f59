use crate::console::Console;
use crate::option::{ArgKind, HandlerId, ValueKind};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("option \"{name}\" is {kind} but was declared with {arg}")]
    InvalidOption {
        name: String,
        arg: ArgKind,
        kind: ValueKind,
    },

    #[error("can't register option group \"{group}\": registry is full ({capacity} groups)")]
    RegistryFull { group: String, capacity: usize },

    #[error("a different option group named \"{0}\" is already registered")]
    DuplicateGroup(String),

    #[error("couldn't find a handler option for \"{0}\" to link its options to")]
    UnresolvedHandler(HandlerId),

    #[error("option \"{option}\" in group \"{group}\" has no destination")]
    UnboundDestination { group: String, option: String },

    #[error("option \"{option}\" is {kind} but its destination holds {bound}")]
    InvalidType {
        option: String,
        kind: ValueKind,
        bound: &'static str,
    },

    #[error("too many arguments to parse ({count} > {capacity})")]
    TooManyArguments { count: usize, capacity: usize },

    #[error("stray argument \"{0}\" found")]
    StrayArgument(String),

    #[error("option \"{0}\" requires an argument")]
    MissingArgument(String),

    #[error("option \"{option}\" expects {kind}, got \"{text}\"")]
    BadValue {
        option: String,
        kind: ValueKind,
        text: String,
    },

    #[error("option not found: {0}")]
    NotFound(String),

    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
}

impl Error {
    /// True for errors caused by malformed tables or registration order,
    /// as opposed to errors in the parsed command line.
    pub fn is_setup(&self) -> bool {
        matches!(
            self,
            Error::InvalidOption { .. }
                | Error::RegistryFull { .. }
                | Error::DuplicateGroup(_)
                | Error::UnresolvedHandler(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Report a fatal error through the console and terminate with status 1.
pub fn fatal(console: &mut dyn Console, err: &Error) -> ! {
    console.error(crate::console::LoggingLevel::Zero, &format!("Fatal error! {}", err));
    std::process::exit(1);
}
