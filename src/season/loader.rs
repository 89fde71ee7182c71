use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use super::derive::{with_inferred_fastest_laps, with_shared_factors};
use super::record::{Classification, EventRecord, SessionKind};
use crate::error::ScoringError;

const UNKNOWN_DRIVER: &str = "Unknown Driver";

/// All recorded results of one season.
#[derive(Debug, Clone, PartialEq)]
pub struct Season {
    pub year: u16,
    pub records: Vec<EventRecord>,
}

impl Season {
    pub fn empty(year: u16) -> Self {
        Self {
            year,
            records: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// A cell that may hold a number or text, as exported from dataframe tooling.
/// Any other JSON value is kept as is.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Cell {
    Number(f64),
    Text(String),
    Flag(bool),
    Other(serde_json::Value),
}

impl Cell {
    fn as_text(&self) -> String {
        match self {
            Cell::Number(n) if n.fract() == 0.0 => format!("{}", *n as i64),
            Cell::Number(n) => n.to_string(),
            Cell::Text(s) => s.trim().to_string(),
            Cell::Flag(b) => b.to_string(),
            Cell::Other(value) => value.to_string(),
        }
    }

    fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            Cell::Text(s) => s.trim().parse().ok(),
            Cell::Flag(_) | Cell::Other(_) => None,
        }
    }

    /// Text content of a scalar cell; `None` for nulls and nested values.
    fn as_label(&self) -> Option<String> {
        match self {
            Cell::Number(_) | Cell::Text(_) => Some(self.as_text()),
            Cell::Flag(_) | Cell::Other(_) => None,
        }
    }

    /// Boolean reading of a flag column: `true`, `1`, `"True"`, `"0"` and so on.
    fn as_flag(&self) -> Option<bool> {
        match self {
            Cell::Flag(b) => Some(*b),
            Cell::Number(n) if *n == 0.0 => Some(false),
            Cell::Number(n) if *n == 1.0 => Some(true),
            Cell::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Some(true),
                "false" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }
}

/// One row of a season file. Unknown columns are ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SeasonRow {
    #[serde(default)]
    full_name: Option<Cell>,
    #[serde(default)]
    abbreviation: Option<Cell>,
    #[serde(default)]
    driver_number: Option<Cell>,
    #[serde(default)]
    classified_position: Option<Cell>,
    #[serde(default)]
    status: Option<Cell>,
    #[serde(default)]
    points: Option<Cell>,
    #[serde(default)]
    round: Option<Cell>,
    #[serde(default)]
    session_type: Option<Cell>,
    #[serde(default)]
    is_fastest_lap: Option<Cell>,
}

impl SeasonRow {
    fn label(cell: &Option<Cell>) -> Option<String> {
        cell.as_ref().and_then(Cell::as_label)
    }

    /// Explicit fastest-lap flag, `None` when absent or unreadable.
    fn fastest_lap_flag(&self) -> Option<bool> {
        self.is_fastest_lap.as_ref().and_then(Cell::as_flag)
    }
}

/// Path of a season's file inside the data directory.
pub fn season_path(data_dir: &Path, year: u16) -> PathBuf {
    data_dir.join(format!("season_{}.json", year))
}

/// Seasons with a file in `data_dir`, ascending.
pub fn available_seasons(data_dir: &Path) -> Result<Vec<u16>> {
    let pattern = data_dir.join("season_*.json");
    let pattern = pattern.to_string_lossy();
    let mut years: Vec<u16> = glob::glob(&pattern)
        .with_context(|| format!("Invalid data directory pattern {}", pattern))?
        .filter_map(|entry| entry.ok())
        .filter_map(|path| {
            path.file_stem()?
                .to_str()?
                .strip_prefix("season_")?
                .parse()
                .ok()
        })
        .collect();
    years.sort_unstable();
    years.dedup();
    Ok(years)
}

/// Load a season from the data directory.
///
/// A missing file is an empty season, not an error. A file that exists but
/// cannot be read or parsed is an error. Individual broken rows are logged and
/// kept with zero-valued fields, or skipped when they have no usable round.
pub fn load_season(data_dir: &Path, year: u16) -> Result<Season> {
    let path = season_path(data_dir, year);
    if !path.exists() {
        log::warn!("{} ({} not found)", ScoringError::MissingData { season: year }, path.display());
        return Ok(Season::empty(year));
    }

    let file = File::open(&path)
        .with_context(|| format!("Failed to open season file at {}", path.display()))?;
    let rows: Vec<serde_json::Value> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse season file at {}", path.display()))?;

    log::debug!("Read {} rows from {}", rows.len(), path.display());
    Ok(season_from_rows(year, rows))
}

/// Parse season rows from a JSON string.
pub fn parse_season(year: u16, json: &str) -> Result<Season> {
    let rows: Vec<serde_json::Value> =
        serde_json::from_str(json).context("Failed to parse season rows")?;
    Ok(season_from_rows(year, rows))
}

fn season_from_rows(year: u16, rows: Vec<serde_json::Value>) -> Season {
    let mut records = Vec::with_capacity(rows.len());
    let mut flags = Vec::with_capacity(rows.len());

    for (index, value) in rows.into_iter().enumerate() {
        let row: SeasonRow = match serde_json::from_value(value) {
            Ok(row) => row,
            Err(e) => {
                log::warn!(
                    "{}",
                    ScoringError::MalformedRecord {
                        driver: format!("row {}", index + 1),
                        round: 0,
                        reason: format!("unreadable row: {}", e),
                    }
                );
                continue;
            }
        };
        if let Some(record) = record_from_row(&row) {
            flags.push(row.fastest_lap_flag());
            records.push(record);
        }
    }

    let records = with_shared_factors(records);
    let records = with_inferred_fastest_laps(records, &flags, year);

    if records.is_empty() {
        log::warn!("{}", ScoringError::MissingData { season: year });
    }
    Season { year, records }
}

fn record_from_row(row: &SeasonRow) -> Option<EventRecord> {
    let driver = driver_identity(row);

    let round = match row.round.as_ref().and_then(Cell::as_number) {
        Some(n) if n >= 1.0 && n.fract() == 0.0 => n as u32,
        _ => {
            log::warn!(
                "Skipping row for {}: no usable round ({:?})",
                driver,
                row.round.as_ref().map(Cell::as_text)
            );
            return None;
        }
    };

    let classification = match &row.classified_position {
        Some(Cell::Number(n)) => Classification::from_number(*n)
            .unwrap_or_else(|| Classification::NotClassified(n.to_string())),
        Some(cell @ Cell::Text(_)) => Classification::parse(&cell.as_text()),
        Some(Cell::Other(serde_json::Value::Null)) | None => Classification::Missing,
        Some(cell) => Classification::NotClassified(cell.as_text()),
    };
    if !classification.is_recognized() {
        log::warn!(
            "{}",
            ScoringError::MalformedRecord {
                driver: driver.clone(),
                round,
                reason: format!("unrecognized classification '{}'", classification),
            }
        );
    }

    let official_points = match &row.points {
        None => 0.0,
        Some(cell) => match cell.as_number() {
            Some(points) if points.is_finite() => points,
            Some(_) => 0.0,
            None => {
                log::warn!(
                    "{}",
                    ScoringError::MalformedRecord {
                        driver: driver.clone(),
                        round,
                        reason: format!("unparseable points '{}'", cell.as_text()),
                    }
                );
                0.0
            }
        },
    };

    Some(EventRecord {
        driver,
        abbreviation: SeasonRow::label(&row.abbreviation).filter(|a| !a.is_empty()),
        session: SeasonRow::label(&row.session_type)
            .as_deref()
            .map(SessionKind::parse)
            .unwrap_or(SessionKind::Other),
        round,
        classification,
        status: SeasonRow::label(&row.status),
        official_points,
        fastest_lap: row.fastest_lap_flag().unwrap_or(false),
        shared_factor: 1.0,
    })
}

/// Full name, else "Driver <number>", else the abbreviation.
fn driver_identity(row: &SeasonRow) -> String {
    let present = |cell: &Option<Cell>| {
        SeasonRow::label(cell).filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("nan"))
    };

    if let Some(name) = present(&row.full_name) {
        return name;
    }
    if let Some(number) = present(&row.driver_number) {
        return format!("Driver {}", number);
    }
    present(&row.abbreviation).unwrap_or_else(|| UNKNOWN_DRIVER.to_string())
}
