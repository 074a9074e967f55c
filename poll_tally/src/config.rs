// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

pub type UserId = i32;

/// A survey participant, as read from one line of `users.txt`.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub name: String,
}

/// A favourite-colour vote, as read from one line of `favourites.txt`.
///
/// The user id is not checked against the known users: a vote from an
/// unknown id is kept and counted, it simply matches no voter.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Favourite {
    pub user_id: UserId,
    pub colour: String,
}

// ******** Output data structures *********

/// The outcome of a poll.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct AggregateResult {
    pub winning_colour: String,
    /// Number of favourite rows citing the winning colour.
    pub vote_count: u64,
    /// Users who voted for the winning colour, ordered by name.
    /// Each user appears at most once.
    pub ordered_voters: Vec<User>,
    /// Every colour with its number of votes, in the order in which the
    /// colours first appear among the favourites.
    pub tally: Vec<(String, u64)>,
}

impl AggregateResult {
    pub fn voter_names(&self) -> Vec<String> {
        self.ordered_voters.iter().map(|u| u.name.clone()).collect()
    }
}

/// Errors that prevent the tally from completing.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum TallyError {
    /// There is no favourite to count, hence no winning colour.
    NoVotesRecorded,
}

impl Error for TallyError {}

impl Display for TallyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TallyError::NoVotesRecorded => write!(f, "No votes were recorded"),
        }
    }
}

/// Reasons for rejecting a single line of input.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum LineParseError {
    /// The separator does not occur in the line (or the separator is empty).
    MissingSeparator,
    /// The id field is empty or not an integer.
    InvalidId(String),
    /// A text field is empty once trimmed.
    EmptyField(&'static str),
}

impl Error for LineParseError {}

impl Display for LineParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LineParseError::MissingSeparator => write!(f, "missing field separator"),
            LineParseError::InvalidId(s) => write!(f, "invalid id {:?}", s),
            LineParseError::EmptyField(name) => write!(f, "empty {} field", name),
        }
    }
}

// ********* Configuration **********

/// How to pick a winner among colours sharing the highest count.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum TieBreakMode {
    /// The colour whose first vote comes earliest in the favourites wins.
    FirstEncountered,
    /// The lexicographically smallest colour wins.
    ColourOrder,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct TallyRules {
    pub tiebreak_mode: TieBreakMode,
}

impl TallyRules {
    pub const DEFAULT_RULES: TallyRules = TallyRules {
        tiebreak_mode: TieBreakMode::FirstEncountered,
    };
}
