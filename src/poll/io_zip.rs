// Primitives for reading the poll entries out of a zip archive.

use log::{debug, info, warn};
use snafu::prelude::*;

use std::fs::File;
use std::io::{BufReader, Read, Seek};

use zip::read::ZipFile;
use zip::result::ZipError;
use zip::ZipArchive;

use poll_tally::{LineParseError, ParsedRecords};

use crate::poll::{CorruptArchiveSnafu, DecodingEntrySnafu, PollError, PollResult};

pub const USERS_ENTRY: &str = "users.txt";
pub const FAVOURITES_ENTRY: &str = "favourites.txt";

pub fn open_archive(path: &str) -> PollResult<ZipArchive<File>> {
    let file = File::open(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            PollError::ArchiveNotFound {
                path: path.to_string(),
            }
        } else {
            PollError::OpeningArchive {
                source,
                path: path.to_string(),
            }
        }
    })?;
    ZipArchive::new(file).context(CorruptArchiveSnafu { path })
}

/// Looks up an entry by name.
///
/// Returns `None` when the archive has no such entry.
pub fn open_entry<'a, R: Read + Seek>(
    archive: &'a mut ZipArchive<R>,
    entry: &str,
) -> PollResult<Option<ZipFile<'a>>> {
    match archive.by_name(entry) {
        Ok(file) => Ok(Some(file)),
        Err(ZipError::FileNotFound) => Ok(None),
        Err(source) => Err(PollError::ReadingEntry {
            source,
            entry: entry.to_string(),
        }),
    }
}

/// Parses all the lines of an entry into records.
///
/// A missing entry is logged and gives no records. The entry stream is
/// dropped before returning, whatever the outcome.
pub fn read_entry_records<R, T, F>(
    archive: &mut ZipArchive<R>,
    entry: &str,
    separator: &str,
    line_to_record: F,
) -> PollResult<ParsedRecords<T>>
where
    R: Read + Seek,
    F: Fn(&str, &str) -> Result<T, LineParseError>,
{
    let file = match open_entry(archive, entry)? {
        Some(f) => f,
        None => {
            warn!("No {} file found in the archive", entry);
            return Ok(ParsedRecords::empty());
        }
    };
    debug!(
        "read_entry_records: {}: {} bytes compressed, {} bytes",
        entry,
        file.compressed_size(),
        file.size()
    );
    let records = poll_tally::parse_records(BufReader::new(file), separator, line_to_record)
        .context(DecodingEntrySnafu { entry })?;
    info!(
        "Read {} records from {} ({} lines skipped)",
        records.records.len(),
        entry,
        records.rejected.len()
    );
    Ok(records)
}
