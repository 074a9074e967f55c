mod args;
mod poll;

use clap::Parser;
use log::{debug, error};
use std::io;
use std::process::exit;

use crate::args::Args;
use crate::poll::{menu, PollResult};

fn run(args: &Args) -> PollResult<()> {
    let rules = poll::validate_tiebreak(args.tiebreak.as_deref())?;
    let input = match args.input.clone() {
        Some(path) => path,
        None => menu::prompt_archive_path(io::stdin().lock(), io::stdout())
            .unwrap_or_else(|_| menu::DEFAULT_ARCHIVE.to_string()),
    };
    debug!("run: input: {:?} rules: {:?}", input, rules);

    let result = match poll::run_poll(
        &input,
        &rules,
        args.out.as_deref(),
        args.reference.as_deref(),
    )? {
        Some(x) => x,
        None => {
            println!("No votes were recorded");
            return Ok(());
        }
    };

    let shown = if args.batch {
        menu::print_winner(io::stdout(), &result)
            .and_then(|_| menu::print_voters(io::stdout(), &result))
    } else {
        menu::show_menu(io::stdin().lock(), io::stdout(), &result)
    };
    if let Err(e) = shown {
        error!("Could not write to the console: {}", e);
    }
    Ok(())
}

fn main() {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poll::PollError;

    #[test]
    fn unknown_tiebreak_fails_before_asking_for_the_archive() {
        // No input path: a prompt would block on stdin.
        let args = Args::parse_from(["pollparser", "--tiebreak", "random", "--batch"]);
        assert!(args.input.is_none());
        assert!(matches!(run(&args), Err(PollError::Whatever { .. })));
    }
}
