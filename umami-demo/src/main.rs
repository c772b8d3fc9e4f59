mod app;
mod arguments;
mod commands;
mod error;

use tracing_subscriber::EnvFilter;
use umami::{ColorMode, Context, LoggingLevel, Terminal};

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let argv: Vec<String> = std::env::args().collect();
    let cmdline = arguments::Cmdline::default();
    let mut ctx = Context::builder("umami-demo")
        .console(Terminal::stdio(LoggingLevel::One, ColorMode::Auto))
        .build();

    match app::run(&mut ctx, &cmdline, &argv) {
        Ok(code) => std::process::exit(code),
        Err(err) => error::fail(ctx.console_mut(), &err),
    }
}
