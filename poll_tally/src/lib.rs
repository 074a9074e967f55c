mod config;
pub mod manual;
pub mod records;

use log::{debug, info};

use std::{
    collections::{HashMap, HashSet},
    ops::AddAssign,
};

pub use crate::config::*;
pub use crate::records::{parse_favourites, parse_records, parse_users, ParsedRecords, RejectedLine};

// **** Private structures ****

#[derive(Eq, PartialEq, Debug, Clone, Copy, PartialOrd, Ord, Hash)]
struct VoteCount(u64);

impl VoteCount {
    const EMPTY: VoteCount = VoteCount(0);
}

impl AddAssign for VoteCount {
    fn add_assign(&mut self, rhs: VoteCount) {
        self.0 += rhs.0;
    }
}

/// Runs the tally with the default rules.
///
/// See [aggregate_with_rules].
pub fn aggregate(users: &[User], favourites: &[Favourite]) -> Result<AggregateResult, TallyError> {
    aggregate_with_rules(users, favourites, &TallyRules::DEFAULT_RULES)
}

/// Computes the most voted colour and the users who voted for it.
///
/// Arguments:
/// * `users` the known participants
/// * `favourites` the votes, one per row. A user may vote more than once, each
/// row counts towards the tally.
/// * `rules` how to break ties between colours with the same number of votes
///
/// Fails with [TallyError::NoVotesRecorded] when there are no favourites.
pub fn aggregate_with_rules(
    users: &[User],
    favourites: &[Favourite],
    rules: &TallyRules,
) -> Result<AggregateResult, TallyError> {
    info!(
        "Processing {:?} votes from {:?} users, rules: {:?}",
        favourites.len(),
        users.len(),
        rules
    );

    let tally = compute_tally(favourites);
    let (winning_colour, vote_count) =
        select_winner(&tally, rules.tiebreak_mode).ok_or(TallyError::NoVotesRecorded)?;
    debug!(
        "aggregate: winner {:?} with {:?} votes out of {:?} colours",
        winning_colour,
        vote_count,
        tally.len()
    );

    let voter_ids: HashSet<UserId> = favourites
        .iter()
        .filter(|f| f.colour == winning_colour)
        .map(|f| f.user_id)
        .collect();

    // A user listed twice in the users file is only shown once.
    let mut seen: HashSet<UserId> = HashSet::new();
    let mut ordered_voters: Vec<User> = users
        .iter()
        .filter(|u| voter_ids.contains(&u.id) && seen.insert(u.id))
        .cloned()
        .collect();
    ordered_voters.sort_by(|a, b| a.name.cmp(&b.name));

    let unknown = voter_ids.len() - seen.len();
    if unknown > 0 {
        debug!(
            "aggregate: {} voters for {:?} are not registered users",
            unknown, winning_colour
        );
    }

    Ok(AggregateResult {
        winning_colour,
        vote_count: vote_count.0,
        ordered_voters,
        tally: tally.into_iter().map(|(c, vc)| (c, vc.0)).collect(),
    })
}

// Colours are returned in the order of their first vote.
fn compute_tally(favourites: &[Favourite]) -> Vec<(String, VoteCount)> {
    let mut tally: Vec<(String, VoteCount)> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();
    for f in favourites.iter() {
        let idx = *positions.entry(f.colour.as_str()).or_insert_with(|| {
            tally.push((f.colour.clone(), VoteCount::EMPTY));
            tally.len() - 1
        });
        tally[idx].1 += VoteCount(1);
    }
    tally
}

fn select_winner(
    tally: &[(String, VoteCount)],
    tiebreak: TieBreakMode,
) -> Option<(String, VoteCount)> {
    let mut best: Option<&(String, VoteCount)> = None;
    for entry in tally.iter() {
        best = match best {
            None => Some(entry),
            Some(b) if entry.1 > b.1 => Some(entry),
            Some(b) if entry.1 == b.1 && tiebreak == TieBreakMode::ColourOrder && entry.0 < b.0 => {
                Some(entry)
            }
            x => x,
        };
    }
    best.cloned()
}
