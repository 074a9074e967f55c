use clap::Parser;

/// Finds the most popular colour in a zipped poll.
///
/// The archive must contain `users.txt` (lines of `<id><TAB><name>`) and
/// `favourites.txt` (lines of `<user id><SPACE><colour>`).
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The zip archive with the poll data. If not provided, the path is asked
    /// for on the standard input.
    #[clap(value_parser)]
    pub input: Option<String>,

    /// (file path, 'stdout' or empty) If specified, a summary of the poll will be written in JSON format
    /// to the given location.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference file containing the expected summary in JSON format. If provided,
    /// pollparser will check that the computed summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (default first) How to break ties between colours: 'first' picks the colour voted first,
    /// 'alphabetical' picks the smallest colour name.
    #[clap(long, value_parser)]
    pub tiebreak: Option<String>,

    /// If passed as an argument, prints the results once instead of showing the menu.
    #[clap(long, takes_value = false)]
    pub batch: bool,

    // Other arguments
    /// If passed as an argument, will turn on debug logging on the standard error.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
