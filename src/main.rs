//! Bag-Pattern previewer (default binary).
//!
//! Prints the upcoming pieces of a pattern, coloured when stdout is a terminal.

use std::io::{self, IsTerminal, Write};

use anyhow::Result;

use bag_pattern::cli::{run, Config, USAGE};

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = Config::from_env().apply_args(&args)?;
    if config.help {
        print!("{USAGE}");
        return Ok(());
    }

    let colored = !config.no_color && io::stdout().is_terminal();
    let mut buf = Vec::with_capacity(256);
    run(&config, &mut buf, colored)?;

    let mut stdout = io::stdout().lock();
    stdout.write_all(&buf)?;
    stdout.flush()?;
    Ok(())
}
