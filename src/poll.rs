use log::{debug, info, warn};

use poll_tally::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::io::{Read, Seek};
use std::time::Instant;

use serde::Serialize;
use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;
use zip::ZipArchive;

pub mod io_common;
pub mod io_zip;
pub mod menu;

use crate::poll::io_common::simplify_file_name;
use crate::poll::io_zip::{FAVOURITES_ENTRY, USERS_ENTRY};

#[derive(Debug, Snafu)]
pub enum PollError {
    #[snafu(display("Could not find file: {path}"))]
    ArchiveNotFound { path: String },
    #[snafu(display("Error opening file {path}: {source}"))]
    OpeningArchive {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("File {path} is not a readable zip archive: {source}"))]
    CorruptArchive {
        source: zip::result::ZipError,
        path: String,
    },
    #[snafu(display("Error reading entry {entry}: {source}"))]
    ReadingEntry {
        source: zip::result::ZipError,
        entry: String,
    },
    #[snafu(display("Error decompressing entry {entry}: {source}"))]
    DecodingEntry {
        source: std::io::Error,
        entry: String,
    },
    #[snafu(display("Error writing summary to {path}: {source}"))]
    WritingSummary {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error reading reference summary {path}: {source}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Invalid JSON: {source}"))]
    ParsingJson { source: serde_json::Error },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type PollResult<T> = Result<T, PollError>;

/// The records read from a poll archive.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct PollData {
    pub users: ParsedRecords<User>,
    pub favourites: ParsedRecords<Favourite>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize)]
pub struct OutputConfig {
    pub archive: String,
    pub tiebreak: String,
}

/// Reads both entries of an opened archive.
///
/// Missing entries give empty collections.
pub fn read_poll_data<R: Read + Seek>(archive: &mut ZipArchive<R>) -> PollResult<PollData> {
    let users = io_zip::read_entry_records(
        archive,
        USERS_ENTRY,
        records::USERS_SEPARATOR,
        User::from_fields,
    )?;
    let favourites = io_zip::read_entry_records(
        archive,
        FAVOURITES_ENTRY,
        records::FAVOURITES_SEPARATOR,
        Favourite::from_fields,
    )?;
    Ok(PollData { users, favourites })
}

/// Opens the archive at `path` and parses both entries.
pub fn load_poll(path: &str) -> PollResult<PollData> {
    info!("Attempting to read poll archive {:?}", path);
    let start = Instant::now();
    let data = {
        let mut archive = io_zip::open_archive(path)?;
        read_poll_data(&mut archive)?
    };
    info!(
        "Successfully parsed the files in {} seconds",
        start.elapsed().as_secs_f64()
    );
    Ok(data)
}

pub fn validate_tiebreak(tiebreak: Option<&str>) -> PollResult<TallyRules> {
    let tiebreak_mode = match tiebreak {
        None | Some("first") => TieBreakMode::FirstEncountered,
        Some("alphabetical") => TieBreakMode::ColourOrder,
        Some(x) => {
            whatever!(
                "Cannot use tiebreak mode {:?}: expected 'first' or 'alphabetical'",
                x
            )
        }
    };
    Ok(TallyRules { tiebreak_mode })
}

fn tiebreak_name(rules: &TallyRules) -> String {
    match rules.tiebreak_mode {
        TieBreakMode::FirstEncountered => "first".to_string(),
        TieBreakMode::ColourOrder => "alphabetical".to_string(),
    }
}

pub fn build_summary_js(
    archive_path: &str,
    rules: &TallyRules,
    data: &PollData,
    result: &AggregateResult,
) -> JSValue {
    let c = OutputConfig {
        archive: simplify_file_name(archive_path),
        tiebreak: tiebreak_name(rules),
    };
    let tally: Vec<JSValue> = result
        .tally
        .iter()
        .map(|(colour, votes)| json!({"colour": colour, "votes": votes}))
        .collect();
    json!({
        "config": c,
        "results": {
            "colour": result.winning_colour,
            "votes": result.vote_count,
            "voters": result.voter_names(),
            "tally": tally,
            "rejectedLines": {
                "users": data.users.rejected.len(),
                "favourites": data.favourites.rejected.len(),
            }
        }
    })
}

fn write_summary(out: &str, pretty_js: &str) -> PollResult<()> {
    if out == "stdout" {
        println!("{}", pretty_js);
        Ok(())
    } else {
        info!("Writing summary to {:?}", out);
        fs::write(out, pretty_js).context(WritingSummarySnafu { path: out })
    }
}

pub fn read_summary(path: &str) -> PollResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    debug!("read content: {:?}", contents);
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}

/// Compares the computed summary with a reference file, printing a diff on mismatch.
pub fn check_summary(reference_path: &str, pretty_js_stats: &str) -> PollResult<()> {
    let summary_ref = read_summary(reference_path)?;
    let pretty_js_summary_ref =
        serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
    if pretty_js_summary_ref != pretty_js_stats {
        warn!("Found differences with the reference summary");
        print_diff(pretty_js_summary_ref.as_str(), pretty_js_stats, "\n");
        whatever!("Difference detected between calculated summary and reference summary")
    }
    Ok(())
}

/// Loads the archive, tallies the votes and handles the summary options.
///
/// Returns `None` when the archive holds no valid vote.
pub fn run_poll(
    archive_path: &str,
    rules: &TallyRules,
    out: Option<&str>,
    reference: Option<&str>,
) -> PollResult<Option<AggregateResult>> {
    let data = load_poll(archive_path)?;
    info!(
        "Parsed {} users and {} favourites",
        data.users.records.len(),
        data.favourites.records.len()
    );

    let result = match aggregate_with_rules(&data.users.records, &data.favourites.records, rules)
    {
        Ok(x) => x,
        Err(TallyError::NoVotesRecorded) => {
            warn!("No favourites in {:?}, there is no winning colour", archive_path);
            return Ok(None);
        }
    };

    if out.is_some() || reference.is_some() {
        let result_js = build_summary_js(archive_path, rules, &data, &result);
        let pretty_js_stats =
            serde_json::to_string_pretty(&result_js).context(ParsingJsonSnafu {})?;
        if let Some(out_path) = out {
            write_summary(out_path, &pretty_js_stats)?;
        }
        if let Some(reference_path) = reference {
            check_summary(reference_path, &pretty_js_stats)?;
        }
    }

    Ok(Some(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use zip::write::FileOptions;
    use zip::ZipWriter;

    fn temp_path(name: &str, extension: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "pollparser_{}_{}.{}",
            std::process::id(),
            name,
            extension
        ))
    }

    fn write_archive(name: &str, entries: &[(&str, &str)]) -> PathBuf {
        let path = temp_path(name, "zip");
        let file = fs::File::create(&path).unwrap();
        let mut writer = ZipWriter::new(file);
        for (entry, content) in entries {
            writer.start_file(*entry, FileOptions::default()).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap();
        path
    }

    fn sample_archive(name: &str) -> PathBuf {
        write_archive(
            name,
            &[
                (USERS_ENTRY, "1\tBob\n2\tAmy\n3\tCy\noops\n"),
                (FAVOURITES_ENTRY, "1 red\n2 red\nabc red\n3 blue\n"),
            ],
        )
    }

    #[test]
    fn load_and_tally() {
        let path = sample_archive("load_and_tally");
        let res = run_poll(path.to_str().unwrap(), &TallyRules::DEFAULT_RULES, None, None)
            .unwrap()
            .unwrap();
        assert_eq!(res.winning_colour, "red");
        assert_eq!(res.vote_count, 2);
        assert_eq!(res.voter_names(), vec!["Amy", "Bob"]);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn missing_entry_gives_empty_collection() {
        let path = write_archive("missing_users", &[(FAVOURITES_ENTRY, "1 red\n2 blue\n1 red\n")]);
        let data = load_poll(path.to_str().unwrap()).unwrap();
        assert!(data.users.records.is_empty());
        assert_eq!(data.favourites.records.len(), 3);

        let res = run_poll(path.to_str().unwrap(), &TallyRules::DEFAULT_RULES, None, None)
            .unwrap()
            .unwrap();
        assert_eq!(res.winning_colour, "red");
        assert!(res.ordered_voters.is_empty());
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn no_votes_is_not_fatal() {
        let path = write_archive("no_votes", &[(USERS_ENTRY, "1\tBob\n")]);
        let res = run_poll(path.to_str().unwrap(), &TallyRules::DEFAULT_RULES, None, None).unwrap();
        assert!(res.is_none());
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn missing_archive_is_fatal() {
        let res = run_poll(
            "/no/such/dir/poll.zip",
            &TallyRules::DEFAULT_RULES,
            None,
            None,
        );
        assert!(matches!(res, Err(PollError::ArchiveNotFound { .. })));
    }

    #[test]
    fn tiebreak_options() {
        assert_eq!(
            validate_tiebreak(None).unwrap().tiebreak_mode,
            TieBreakMode::FirstEncountered
        );
        assert_eq!(
            validate_tiebreak(Some("alphabetical")).unwrap().tiebreak_mode,
            TieBreakMode::ColourOrder
        );
        assert!(validate_tiebreak(Some("random")).is_err());
    }

    #[test]
    fn summary_round_trips_through_reference() {
        let path = sample_archive("summary");
        let out = temp_path("summary", "json");
        let rules = TallyRules::DEFAULT_RULES;
        run_poll(
            path.to_str().unwrap(),
            &rules,
            Some(out.to_str().unwrap()),
            None,
        )
        .unwrap();

        let js = read_summary(out.to_str().unwrap()).unwrap();
        let archive_name = path.file_name().unwrap().to_str().unwrap();
        assert_eq!(js["config"]["archive"], archive_name);
        assert_eq!(js["config"]["tiebreak"], "first");
        assert_eq!(js["results"]["colour"], "red");
        assert_eq!(js["results"]["votes"], 2);
        assert_eq!(js["results"]["voters"], json!(["Amy", "Bob"]));
        assert_eq!(js["results"]["tally"][1], json!({"colour": "blue", "votes": 1}));
        assert_eq!(js["results"]["rejectedLines"]["users"], 1);
        assert_eq!(js["results"]["rejectedLines"]["favourites"], 1);

        // The written summary is its own reference.
        let res = run_poll(
            path.to_str().unwrap(),
            &rules,
            None,
            Some(out.to_str().unwrap()),
        );
        assert!(res.is_ok());

        let alphabetical = validate_tiebreak(Some("alphabetical")).unwrap();
        let res = run_poll(
            path.to_str().unwrap(),
            &alphabetical,
            None,
            Some(out.to_str().unwrap()),
        );
        assert!(matches!(res, Err(PollError::Whatever { .. })));

        fs::remove_file(&path).unwrap();
        fs::remove_file(&out).unwrap();
    }
}
