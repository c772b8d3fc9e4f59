use umami::{Context, Flow, LoggingLevel};

use crate::arguments::{self, Cmdline};
use crate::commands;
use crate::error::Result;

/// Parse `argv`, run the selected handler and return the exit status.
pub fn run(ctx: &mut Context, cmdline: &Cmdline, argv: &[String]) -> Result<i32> {
    arguments::register(ctx, cmdline)?;

    let handler = match arguments::parse_args(ctx, argv)? {
        Flow::Help { forced, .. } => return Ok(i32::from(forced)),
        Flow::Done(handler) => handler,
    };

    if cmdline.verbose.get() {
        commands::summary(cmdline, ctx.console_mut());
    }

    match handler {
        Some(handler) => commands::run(handler, cmdline, ctx.console_mut())?,
        None => ctx
            .console_mut()
            .print(LoggingLevel::Zero, "Nothing to do. Try --help."),
    }
    Ok(0)
}
