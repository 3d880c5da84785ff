// src/catalog/record.rs

//! Delimited-text record parsing.
//!
//! The catalog format is a single flat table: a header row naming the
//! fields, then one book per line. Quoted fields may contain the delimiter.

use serde::Serialize;

use crate::error::{AppError, Result};

/// One catalog row as an ordered list of named string fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of a field, if the header set contains it.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Value of a field, treating blank values as absent.
    pub fn non_blank(&self, name: &str) -> Option<&str> {
        self.get(name).filter(|value| !value.trim().is_empty())
    }

    /// Set a field, replacing the value in place if the name already exists.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|(key, _)| key == name)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (key, value) in iter {
            record.set(key, value);
        }
        record
    }
}

/// Parse delimited text into records keyed by the header row.
///
/// Blank lines are skipped. Rows shorter than the header are padded with
/// empty strings; extra trailing tokens are ignored.
pub fn parse_records(text: &str, delimiter: char) -> Result<Vec<Record>> {
    let text = text.trim_start_matches('\u{feff}').trim();
    let mut lines = text.lines();

    let header_line = lines
        .next()
        .filter(|line| !line.trim().is_empty())
        .ok_or_else(|| AppError::parse_failed(1, "missing header row"))?;

    let headers: Vec<String> = tokenize(header_line, delimiter)
        .iter()
        .map(|h| clean_field(h))
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(AppError::parse_failed(1, "header row has no field names"));
    }

    let records = lines
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let values = tokenize(line, delimiter);
            headers
                .iter()
                .enumerate()
                .map(|(i, header)| {
                    let value = values.get(i).map(|v| clean_field(v)).unwrap_or_default();
                    (header.clone(), value)
                })
                .collect::<Record>()
        })
        .collect();

    Ok(records)
}

/// Split one line into raw tokens.
///
/// A quote toggles quoted mode unless escaped as `\"`, or doubled as `""`
/// inside quoted mode; escaped quotes are kept as literal characters.
/// `\\` is a literal backslash.
fn tokenize(line: &str, delimiter: char) -> Vec<String> {
    let mut values = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'\\') => {
                chars.next();
                current.push('\\');
            }
            '\\' if chars.peek() == Some(&'"') => {
                chars.next();
                current.push('"');
            }
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                chars.next();
                current.push('"');
            }
            '"' => in_quotes = !in_quotes,
            c if c == delimiter && !in_quotes => values.push(std::mem::take(&mut current)),
            c => current.push(c),
        }
    }

    values.push(current);
    values
}

/// Trim whitespace and one surrounding pair of quotes.
fn clean_field(raw: &str) -> String {
    let trimmed = raw.trim();
    let unquoted = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed);
    unquoted.to_string()
}

/// Serialize records back to delimited text.
///
/// The header is the union of field names in first-seen order. Every value
/// is quoted with inner quotes doubled and backslashes escaped.
pub fn to_delimited(records: &[Record], delimiter: char) -> String {
    let mut headers: Vec<&str> = Vec::new();
    for record in records {
        for (name, _) in record.fields() {
            if !headers.contains(&name) {
                headers.push(name);
            }
        }
    }

    let sep = delimiter.to_string();
    let mut out = headers
        .iter()
        .map(|h| quote(h))
        .collect::<Vec<_>>()
        .join(&sep);
    out.push('\n');

    for record in records {
        let row = headers
            .iter()
            .map(|h| quote(record.get(h).unwrap_or("")))
            .collect::<Vec<_>>()
            .join(&sep);
        out.push_str(&row);
        out.push('\n');
    }

    out
}

fn quote(value: &str) -> String {
    format!(
        "\"{}\"",
        value.replace('\\', "\\\\").replace('"', "\"\"")
    )
}
