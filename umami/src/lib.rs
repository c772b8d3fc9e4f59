//! Declarative long-option parsing with handler dispatch.
//!
//! Callers describe options as tables bound to caller-owned [`Slot`]s, group
//! them, and register the groups with a [`Context`]. One parse pass consumes
//! the argument vector group by group:
//! - `-name` and `--name` are equivalent; a value is the following token
//! - every argv position is consumed at most once across all groups
//! - a handler option ends the pass and names the handler to run; a second
//!   pass with that handler also scans the group linked to it
//!
//! ```no_run
//! use umami::{Context, HandlerId, Opt, OptionGroup, OptionTable, Slot};
//!
//! const RUN: HandlerId = HandlerId::new("run");
//!
//! let verbose = Slot::new(false);
//! let mut ctx = Context::new("tool");
//! ctx.register_or_exit(
//!     OptionGroup::new(
//!         "Options",
//!         OptionTable::new()
//!             .option(Opt::handler("run", RUN).description("Run the tool"))
//!             .option(Opt::flag("verbose", &verbose).description("Chatty output")),
//!     ),
//!     None,
//! );
//! let argv: Vec<String> = std::env::args().collect();
//! let handler = ctx.parse_or_exit(&argv, None, true);
//! ```

mod context;
mod error;
mod group;
mod ledger;
mod option;
mod value;

pub mod console;
pub mod getopt;
pub mod help;

pub use console::{Capture, ColorMode, Console, LoggingLevel, Severity, Terminal};
pub use context::{Context, ContextBuilder, Flow};
pub use error::{fatal, Error, Result};
pub use group::{GroupId, OptionGroup, OptionTable, Registered, Registry, MAX_OPTION_GROUPS};
pub use ledger::{Ledger, MAX_CLI_ARGS};
pub use option::{ArgKind, Decoding, Destination, HandlerId, Opt, ValueKind, MAX_PARSED_STRING_LEN};
pub use value::{FromValue, IntoValue, Slot, Value};
