//! Delimited-row encoding for a conversation log.
//!
//! One row per entry, three fields (`user_id`, `username`, `text`) separated by
//! [`FIELD_DELIMITER`] and every row terminated by `\r\n`. A field that
//! contains the delimiter, a double quote or a line break is wrapped in double
//! quotes with inner quotes doubled, so arbitrary message text round-trips.
//! Blobs without any quoting are read exactly as before quoting existed.

use tracing::warn;

use crate::core::models::Entry;
use crate::errors::BotError;

pub const FIELD_DELIMITER: char = ':';
pub const ROW_TERMINATOR: &str = "\r\n";
const QUOTE: char = '"';
const FIELDS_PER_ROW: usize = 3;

#[must_use]
pub fn encode(entries: &[Entry]) -> String {
    let mut out = String::new();
    for entry in entries {
        encode_field(&mut out, &entry.user_id);
        out.push(FIELD_DELIMITER);
        encode_field(&mut out, &entry.username);
        out.push(FIELD_DELIMITER);
        encode_field(&mut out, &entry.text);
        out.push_str(ROW_TERMINATOR);
    }
    out
}

fn encode_field(out: &mut String, field: &str) {
    if field.contains([FIELD_DELIMITER, QUOTE, '\r', '\n']) {
        out.push(QUOTE);
        out.push_str(&field.replace(QUOTE, "\"\""));
        out.push(QUOTE);
    } else {
        out.push_str(field);
    }
}

/// Decodes a stored blob, treating a corrupt blob as an empty log.
#[must_use]
pub fn decode(blob: &str) -> Vec<Entry> {
    try_decode(blob).unwrap_or_else(|e| {
        warn!("Discarding unreadable message log: {}", e);
        Vec::new()
    })
}

/// Decodes a stored blob.
///
/// # Errors
///
/// Returns `BotError::CodecError` when a quoted field is never closed or a row
/// does not carry exactly three fields.
pub fn try_decode(blob: &str) -> Result<Vec<Entry>, BotError> {
    parse_rows(blob)?
        .into_iter()
        .enumerate()
        .map(|(idx, row)| {
            if row.len() != FIELDS_PER_ROW {
                return Err(BotError::CodecError(format!(
                    "row {} has {} fields, expected {}",
                    idx + 1,
                    row.len(),
                    FIELDS_PER_ROW
                )));
            }
            let mut fields = row.into_iter();
            Ok(Entry {
                user_id: fields.next().unwrap_or_default(),
                username: fields.next().unwrap_or_default(),
                text: fields.next().unwrap_or_default(),
            })
        })
        .collect()
}

fn parse_rows(blob: &str) -> Result<Vec<Vec<String>>, BotError> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut row_open = false;
    let mut chars = blob.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == QUOTE {
                if chars.peek() == Some(&QUOTE) {
                    chars.next();
                    field.push(QUOTE);
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
            continue;
        }

        match c {
            QUOTE if field.is_empty() => {
                in_quotes = true;
                row_open = true;
            }
            FIELD_DELIMITER => {
                row.push(std::mem::take(&mut field));
                row_open = true;
            }
            '\r' | '\n' => {
                if c == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                // blank lines carry no row
                if row_open || !field.is_empty() {
                    row.push(std::mem::take(&mut field));
                    rows.push(std::mem::take(&mut row));
                }
                row_open = false;
            }
            _ => {
                field.push(c);
                row_open = true;
            }
        }
    }

    if in_quotes {
        return Err(BotError::CodecError("unterminated quoted field".to_string()));
    }
    if row_open || !field.is_empty() {
        row.push(field);
        rows.push(row);
    }

    Ok(rows)
}
