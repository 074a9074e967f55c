// The interactive side of the tool: asking for the archive and showing the results.

use std::io::{BufRead, Write};

use poll_tally::AggregateResult;

pub const DEFAULT_ARCHIVE: &str = "data.zip";

/// Prints the usage notes and reads the archive path from `input`.
///
/// An empty answer (or no answer at all) selects `data.zip`.
pub fn prompt_archive_path<R: BufRead, W: Write>(
    mut input: R,
    mut output: W,
) -> std::io::Result<String> {
    writeln!(output, "Cmdline Usage: pollparser <path to zipped poll file>")?;
    writeln!(output, "Note: Parses users.txt")?;
    writeln!(output, "Note: Parses favourites.txt")?;
    writeln!(
        output,
        "Enter the filepath to a zipped data file(press enter for \"{}\"):",
        DEFAULT_ARCHIVE
    )?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    let path = line.trim();
    if path.is_empty() {
        Ok(DEFAULT_ARCHIVE.to_string())
    } else {
        Ok(path.to_string())
    }
}

pub fn print_winner<W: Write>(mut output: W, result: &AggregateResult) -> std::io::Result<()> {
    writeln!(
        output,
        "Most voted for colour: {} with {} votes",
        result.winning_colour, result.vote_count
    )
}

pub fn print_voters<W: Write>(mut output: W, result: &AggregateResult) -> std::io::Result<()> {
    for user in result.ordered_voters.iter() {
        writeln!(output, "{}", user.name)?;
    }
    Ok(())
}

/// Shows the menu until the user quits or the input ends.
pub fn show_menu<R: BufRead, W: Write>(
    mut input: R,
    mut output: W,
    result: &AggregateResult,
) -> std::io::Result<()> {
    loop {
        writeln!(output, "1. Print most popular colour")?;
        writeln!(
            output,
            "2. Print list of users who voted for the colour, ordered"
        )?;
        writeln!(output, "q. Quit")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(());
        }
        match line.trim() {
            s if s.eq_ignore_ascii_case("q") => return Ok(()),
            "1" => print_winner(&mut output, result)?,
            "2" => print_voters(&mut output, result)?,
            _ => writeln!(output, "Invalid input")?,
        }
    }
}
