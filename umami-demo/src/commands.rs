use umami::{Console, HandlerId, LoggingLevel};

use crate::arguments::{Cmdline, Level, HELLO, SUM};
use crate::error::{DemoError, Result};

const OUT: LoggingLevel = LoggingLevel::Zero;

/// Run the handler selected on the command line.
pub fn run(handler: HandlerId, cmd: &Cmdline, console: &mut dyn Console) -> Result<()> {
    tracing::debug!(handler = %handler, "running handler");
    match handler {
        HELLO => hello(cmd, console),
        SUM => sum(cmd, console),
        other => Err(DemoError::UnknownHandler(other)),
    }
}

fn hello(cmd: &Cmdline, console: &mut dyn Console) -> Result<()> {
    let mut line = format!("{}, {}!", cmd.greeting.get(), cmd.name.get());
    match cmd.level() {
        Level::Quiet => line = line.to_lowercase(),
        Level::Loud => line = line.to_uppercase(),
        Level::Normal => {}
    }
    for _ in 0..cmd.times.get() {
        console.print(OUT, &line);
    }
    Ok(())
}

fn sum(cmd: &Cmdline, console: &mut dyn Console) -> Result<()> {
    let (left, right) = (cmd.left.get(), cmd.right.get());
    let total = left
        .checked_add(right)
        .ok_or(DemoError::Overflow { left, right })?;
    console.print(OUT, &format!("{} + {} = {}", left, right, total));
    Ok(())
}

/// Print the program options as parsed.
pub fn summary(cmd: &Cmdline, console: &mut dyn Console) {
    console.sub_header(OUT, "Parsed Options");
    let name_note = if cmd.name_given.get() { "" } else { " (default)" };
    console.print(OUT, &format!("name:  {}{}", cmd.name.get(), name_note));
    console.print(OUT, &format!("level: {:?}", cmd.level()));
    console.print(OUT, &format!("ratio: {}", cmd.ratio.get()));
    console.print(OUT, &format!("seed:  {}", cmd.seed.get()));
    console.print(OUT, &format!("mask:  0x{:02x}", cmd.mask.get()));
}
