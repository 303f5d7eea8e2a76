// Typed event records and year normalization

use crate::error::{PipelineError, Result, RowError, RowErrorKind};
use crate::tokenize::{Delimiters, Row, tokenize};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use tracing::{debug, warn};

const COL_LOCATION: usize = 0;
const COL_LONGITUDE: usize = 1;
const COL_LATITUDE: usize = 2;
const COL_YEAR: usize = 3;
const COL_NAME: usize = 4;
const COL_NOTE: usize = 5;
const COL_TYPE: usize = 6;
const MIN_COLUMNS: usize = 5;

/// A geographic position in degrees.
///
/// Equality and hashing are exact on the bit pattern, with `-0.0` treated
/// as `0.0`. There is no tolerance for near-duplicate readings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    fn bits(&self) -> (u64, u64) {
        (canonical_bits(self.latitude), canonical_bits(self.longitude))
    }

    /// Euclidean distance in raw degree space.
    pub fn planar_distance(&self, other: &Coordinate) -> f64 {
        let dlat = self.latitude - other.latitude;
        let dlon = self.longitude - other.longitude;
        (dlat * dlat + dlon * dlon).sqrt()
    }
}

fn canonical_bits(value: f64) -> u64 {
    if value == 0.0 { 0.0f64.to_bits() } else { value.to_bits() }
}

impl PartialEq for Coordinate {
    fn eq(&self, other: &Self) -> bool {
        self.bits() == other.bits()
    }
}

impl Eq for Coordinate {}

impl Hash for Coordinate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bits().hash(state);
    }
}

/// Identifies the real-world event a row describes: the same person in the
/// same year recorded at two places.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdentityKey {
    pub name: String,
    pub year: i32,
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.name, self.year)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    pub coordinate: Coordinate,
    pub year: i32,
    pub identity: IdentityKey,
    pub title: String,
    pub weight: f64,
    /// Source line the event was parsed from
    pub line: usize,
}

/// What to do with rows that fail to parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowPolicy {
    /// Abort the whole load
    #[default]
    Strict,
    /// Skip the row and report it
    Lenient,
}

impl RowPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            RowPolicy::Strict => "strict",
            RowPolicy::Lenient => "lenient",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    pub delimiters: Delimiters,
    pub policy: RowPolicy,
}

/// Non-fatal conditions found while loading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Warning {
    /// Input had no data rows
    EmptyInput,
    /// All events share one year, so every weight is 0
    DegenerateYearRange { year: i32 },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::EmptyInput => write!(f, "input contains no data rows"),
            Warning::DegenerateYearRange { year } => write!(
                f,
                "every event is dated {}; weights collapse to 0",
                year
            ),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParsedEvents {
    /// Sorted ascending by year, ties in input order
    pub events: Vec<Event>,
    /// Rows skipped under the lenient policy
    pub skipped: Vec<RowError>,
    pub warnings: Vec<Warning>,
}

/// A row whose numeric columns parsed but whose weight is not known yet.
struct RawRecord {
    line: usize,
    coordinate: Coordinate,
    year: i32,
    name: String,
    title: String,
}

/// Tokenize `text`, parse every non-blank row and weight the result by the
/// year range of the accepted rows.
pub fn parse_events(text: &str, options: &ParseOptions) -> Result<ParsedEvents> {
    let rows = tokenize(text, &options.delimiters);

    let mut records = Vec::new();
    let mut errors = Vec::new();
    for row in rows.iter().filter(|r| !r.is_blank()) {
        match parse_row(row) {
            Ok(record) => records.push(record),
            Err(kind) => errors.push(RowError {
                line: row.line,
                kind,
            }),
        }
    }

    if !errors.is_empty() {
        match options.policy {
            RowPolicy::Strict => return Err(PipelineError::MalformedRows(errors)),
            RowPolicy::Lenient => {
                for e in &errors {
                    warn!("Skipping {}", e);
                }
            }
        }
    }

    let mut warnings = Vec::new();
    if records.is_empty() && errors.is_empty() {
        warnings.push(Warning::EmptyInput);
    }

    let events = normalize(records, &mut warnings);
    debug!(
        "Parsed {} event(s), skipped {} row(s)",
        events.len(),
        errors.len()
    );

    Ok(ParsedEvents {
        events,
        skipped: errors,
        warnings,
    })
}

fn parse_row(row: &Row) -> std::result::Result<RawRecord, RowErrorKind> {
    if row.len() < MIN_COLUMNS {
        return Err(RowErrorKind::TooFewColumns { found: row.len() });
    }

    let lon_raw = row.get_or_empty(COL_LONGITUDE);
    let longitude = parse_finite(lon_raw)
        .ok_or_else(|| RowErrorKind::InvalidLongitude(lon_raw.to_string()))?;

    let lat_raw = row.get_or_empty(COL_LATITUDE);
    let latitude = parse_finite(lat_raw)
        .ok_or_else(|| RowErrorKind::InvalidLatitude(lat_raw.to_string()))?;

    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(RowErrorKind::CoordinateOutOfRange {
            latitude,
            longitude,
        });
    }

    let year_raw = row.get_or_empty(COL_YEAR);
    let year: i32 = year_raw
        .parse()
        .map_err(|_| RowErrorKind::InvalidYear(year_raw.to_string()))?;

    let location = row.get_or_empty(COL_LOCATION);
    let name = row.get_or_empty(COL_NAME);
    let title = format!(
        "{} - {} - {} - {} {}",
        location,
        name,
        year,
        row.get_or_empty(COL_NOTE),
        row.get_or_empty(COL_TYPE)
    );

    Ok(RawRecord {
        line: row.line,
        coordinate: Coordinate::new(latitude, longitude),
        year,
        name: name.to_string(),
        title,
    })
}

fn parse_finite(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn normalize(mut records: Vec<RawRecord>, warnings: &mut Vec<Warning>) -> Vec<Event> {
    let Some(y_min) = records.iter().map(|r| r.year).min() else {
        return Vec::new();
    };
    let y_max = records.iter().map(|r| r.year).max().unwrap_or(y_min);

    if y_min == y_max {
        warn!("Degenerate year range: every event is dated {}", y_min);
        warnings.push(Warning::DegenerateYearRange { year: y_min });
    }

    // sort_by_key is stable, equal years keep input order
    records.sort_by_key(|r| r.year);

    records
        .into_iter()
        .map(|r| Event {
            coordinate: r.coordinate,
            year: r.year,
            weight: year_weight(r.year, y_min, y_max),
            identity: IdentityKey {
                name: r.name,
                year: r.year,
            },
            title: r.title,
            line: r.line,
        })
        .collect()
}

/// Position of `year` within `[y_min, y_max]`, 0 when the range is empty.
pub fn year_weight(year: i32, y_min: i32, y_max: i32) -> f64 {
    if y_max <= y_min {
        return 0.0;
    }
    (f64::from(year) - f64::from(y_min)) / (f64::from(y_max) - f64::from(y_min))
}
