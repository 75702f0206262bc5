use anyhow::Result;
use log::error;
use std::env;
use std::io::IsTerminal;
use std::process;

use quire::app::{build_application, configure_logging, load_configuration};
use quire::cli::parse_invocation;
use quire::display::ColourManager;
use quire::io::{ConsoleIo, Io};

fn main() {
    match run() {
        Ok(code) => process::exit(code),
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn run() -> Result<i32> {
    let invocation = match parse_invocation(env::args().skip(1)) {
        Ok(invocation) => invocation,
        Err(e) => {
            ConsoleIo::new().write_error(&format!("\n{}\n", e));
            return Ok(1);
        }
    };

    let settings = load_configuration(&invocation.globals)?;
    configure_logging(&invocation.globals, &settings)?;

    let decorated = ColourManager::resolve_decoration(
        invocation.globals.color,
        invocation.globals.no_color,
        std::io::stdout().is_terminal(),
    );
    let mut io = ConsoleIo::with_decoration(decorated);

    let mut app = build_application(settings)?;
    Ok(app.execute(invocation, &mut io)?)
}
