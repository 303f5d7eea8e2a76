// Line and column splitting for the tab/comma input format

use serde::{Deserialize, Serialize};

/// Field separators. Each line is split on `primary` first, then every
/// resulting piece is split again on `secondary`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delimiters {
    pub primary: char,
    pub secondary: char,
}

impl Default for Delimiters {
    fn default() -> Self {
        Self {
            primary: '\t',
            secondary: ',',
        }
    }
}

/// One tokenized input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// 1-based line number in the source text
    pub line: usize,
    pub fields: Vec<String>,
}

impl Row {
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// True for a line holding nothing but whitespace. A line made of bare
    /// delimiters has several (empty) columns and is not blank.
    pub fn is_blank(&self) -> bool {
        matches!(self.fields.as_slice(), [only] if only.is_empty())
    }

    pub fn get(&self, column: usize) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    /// Optional trailing column, empty when absent.
    pub fn get_or_empty(&self, column: usize) -> &str {
        self.get(column).unwrap_or("")
    }
}

/// Split raw text into rows. No quoting or escaping is supported, so a
/// delimiter can never appear inside a field value.
///
/// Empty input yields a single row holding one empty field; callers are
/// expected to skip blank rows.
pub fn tokenize(text: &str, delimiters: &Delimiters) -> Vec<Row> {
    text.split('\n')
        .enumerate()
        .map(|(idx, line)| Row {
            line: idx + 1,
            fields: split_line(line.strip_suffix('\r').unwrap_or(line), delimiters),
        })
        .collect()
}

fn split_line(line: &str, delimiters: &Delimiters) -> Vec<String> {
    line.split(delimiters.primary)
        .flat_map(|field| field.split(delimiters.secondary))
        .map(|piece| piece.trim().to_string())
        .collect()
}
