//! Shellkit CLI - interactive job-control shell
//!
//! Usage:
//!   shellkit               # interactive prompt
//!   shellkit -c 'sleep 3 &'  # run one command line, then shut down
//!
//! The loop order matters: finished background jobs are reaped and
//! reported before each prompt, never later than that.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::Parser;
use shellkit::{LineOutcome, Shell};
use tracing_subscriber::EnvFilter;

/// Shellkit - job-control shell
#[derive(Parser, Debug)]
#[command(name = "shellkit")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Execute a single command line and exit
    #[arg(short = 'c')]
    command: Option<String>,
}

const PROMPT: &str = ": ";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let mut shell = Shell::new();
    shell
        .install_signal_handlers()
        .context("failed to install signal handlers")?;

    if let Some(line) = args.command {
        shell.run_line(&line)?;
        shell.shutdown();
        return Ok(());
    }

    repl(&mut shell)
}

fn repl(shell: &mut Shell) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        for done in shell.reap_background() {
            println!("{done}");
        }

        print!("{PROMPT}");
        stdout.flush()?;

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break, // EOF
            Ok(_) => match shell.run_line(&line) {
                Ok(LineOutcome::Continue) => {}
                Ok(LineOutcome::Exit) => break,
                Err(err @ shellkit::Error::Fork(_)) => {
                    // Without fork capability the shell cannot continue.
                    eprintln!("shellkit: {err}");
                    shell.shutdown();
                    std::process::exit(1);
                }
                Err(err) => eprintln!("shellkit: {err}"),
            },
            // A signal landed mid-read; discard and re-prompt.
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err.into()),
        }
    }

    shell.shutdown();
    Ok(())
}
