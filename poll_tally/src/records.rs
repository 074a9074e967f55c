// Tolerant line parsing: each line becomes a record or a rejection, never an abort.

use log::{debug, warn};
use std::io::BufRead;

use crate::config::*;

pub const USERS_SEPARATOR: &str = "\t";
pub const FAVOURITES_SEPARATOR: &str = " ";

/// A line that could not be turned into a record.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RejectedLine {
    /// 1-based line number in the source.
    pub lineno: usize,
    pub line: String,
    pub error: LineParseError,
}

/// The outcome of parsing a stream: records in source order, and the lines
/// that were dropped.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ParsedRecords<T> {
    pub records: Vec<T>,
    pub rejected: Vec<RejectedLine>,
}

impl<T> ParsedRecords<T> {
    pub fn empty() -> ParsedRecords<T> {
        ParsedRecords {
            records: Vec::new(),
            rejected: Vec::new(),
        }
    }
}

const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

/// Reads `reader` until the end and maps every line through `line_to_record`.
///
/// Lines end at `\n`, `\r\n` or a lone `\r`, and a leading byte order mark is
/// ignored. Lines are split on the first occurrence of `separator`. Lines that
/// fail are logged and collected in `rejected`; they do not stop the parsing.
/// Only a failure of the underlying stream is returned as an error.
pub fn parse_records<R, T, F>(
    mut reader: R,
    separator: &str,
    line_to_record: F,
) -> std::io::Result<ParsedRecords<T>>
where
    R: BufRead,
    F: Fn(&str, &str) -> Result<T, LineParseError>,
{
    let mut res: ParsedRecords<T> = ParsedRecords::empty();
    let mut buf: Vec<u8> = Vec::new();
    let mut lineno: usize = 0;
    let mut first_chunk = true;
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let mut chunk: &[u8] = &buf;
        if first_chunk {
            first_chunk = false;
            if let Some(rest) = chunk.strip_prefix(UTF8_BOM) {
                chunk = rest;
            }
        }
        if let Some(rest) = chunk.strip_suffix(b"\n") {
            chunk = rest;
        } else if chunk.is_empty() {
            // Only a byte order mark.
            continue;
        }
        // A `\r` ends a line by itself; the one of a `\r\n` must not add an empty line.
        let mut lines: Vec<&[u8]> = chunk.split(|b| *b == b'\r').collect();
        if chunk.ends_with(b"\r") {
            lines.pop();
        }
        for bytes in lines {
            lineno += 1;
            let line = String::from_utf8_lossy(bytes).into_owned();
            let parsed =
                split_fields(&line, separator).and_then(|(f0, f1)| line_to_record(f0, f1));
            match parsed {
                Ok(record) => res.records.push(record),
                Err(error) => {
                    warn!("Could not parse line {}: {:?} ({})", lineno, line, error);
                    res.rejected.push(RejectedLine {
                        lineno,
                        line,
                        error,
                    });
                }
            }
        }
    }
    debug!(
        "parse_records: {} lines, {} records, {} rejected",
        lineno,
        res.records.len(),
        res.rejected.len()
    );
    Ok(res)
}

fn split_fields<'a>(line: &'a str, separator: &str) -> Result<(&'a str, &'a str), LineParseError> {
    if separator.is_empty() {
        return Err(LineParseError::MissingSeparator);
    }
    line.split_once(separator)
        .ok_or(LineParseError::MissingSeparator)
}

fn parse_id(field: &str) -> Result<UserId, LineParseError> {
    let s = field.trim();
    s.parse::<UserId>()
        .map_err(|_| LineParseError::InvalidId(s.to_string()))
}

fn parse_text(field: &str, name: &'static str) -> Result<String, LineParseError> {
    let s = field.trim();
    if s.is_empty() {
        Err(LineParseError::EmptyField(name))
    } else {
        Ok(s.to_string())
    }
}

impl User {
    /// Builds a user from the `id` and `name` fields of a line.
    pub fn from_fields(id: &str, name: &str) -> Result<User, LineParseError> {
        Ok(User {
            id: parse_id(id)?,
            name: parse_text(name, "name")?,
        })
    }
}

impl Favourite {
    /// Builds a vote from the `user id` and `colour` fields of a line.
    pub fn from_fields(user_id: &str, colour: &str) -> Result<Favourite, LineParseError> {
        Ok(Favourite {
            user_id: parse_id(user_id)?,
            colour: parse_text(colour, "colour")?,
        })
    }
}

pub fn parse_users<R: BufRead>(reader: R, separator: &str) -> std::io::Result<ParsedRecords<User>> {
    parse_records(reader, separator, User::from_fields)
}

pub fn parse_favourites<R: BufRead>(
    reader: R,
    separator: &str,
) -> std::io::Result<ParsedRecords<Favourite>> {
    parse_records(reader, separator, Favourite::from_fields)
}
