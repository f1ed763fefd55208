//! Constellation label table.
//!
//! Text rows of the form
//!
//! ```text
//! # abbreviation, name, RA "H M", Dec "D M"
//! Ori, Orion, 5 35, 5 0
//! ```
//!
//! Lines starting with `#` are dropped before tokenizing, so comments may
//! contain commas or quotes. Any fields after the fourth are ignored.

use std::path::Path;

use csv::{ReaderBuilder, Trim};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::angle::{Dms, Hms};
use crate::observe::{AltAz, Observe, ObserveError};
use crate::star::EquatorialPosition;
use crate::visibility::{observe_all, ObserveFailure, Visible, VisibilityConfig};

const FIELD_NAMES: [&str; 4] = ["abbreviation", "name", "right ascension", "declination"];

#[derive(Debug, Error)]
pub enum ConstellationError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("line {line}: missing {field} field")]
    MissingField { line: usize, field: &'static str },

    #[error("line {line}: {field} `{value}` is not two numbers")]
    BadAngle {
        line: usize,
        field: &'static str,
        value: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstellationEntry {
    pub abbreviation: String,
    pub name: String,
    /// Right ascension as written in the table, "H M".
    pub right_ascension: String,
    /// Declination as written in the table, "D M".
    pub declination: String,
    /// Label anchor on the sky.
    pub reference: EquatorialPosition,
}

/// A constellation that is above the horizon.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibleConstellation<'a> {
    pub index: usize,
    pub entry: &'a ConstellationEntry,
    pub altaz: AltAz,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstellationTable {
    entries: Vec<ConstellationEntry>,
}

impl ConstellationTable {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConstellationError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let table = Self::parse(&text)?;
        info!(
            "Loaded {} constellations from {}",
            table.len(),
            path.display()
        );
        Ok(table)
    }

    pub fn parse(text: &str) -> Result<Self, ConstellationError> {
        // Keep the source line number of every row handed to the tokenizer.
        let mut line_numbers = Vec::new();
        let mut kept = String::with_capacity(text.len());
        for (i, line) in text.lines().enumerate() {
            let trimmed = line.trim_start();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            line_numbers.push(i + 1);
            kept.push_str(line);
            kept.push('\n');
        }

        let mut rdr = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(kept.as_bytes());

        let mut entries = Vec::with_capacity(line_numbers.len());
        for (row, result) in rdr.records().enumerate() {
            let record = result?;
            let line = line_numbers.get(row).copied().unwrap_or(row + 1);
            let field = |i: usize| -> Result<String, ConstellationError> {
                record
                    .get(i)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .ok_or(ConstellationError::MissingField {
                        line,
                        field: FIELD_NAMES[i],
                    })
            };

            let abbreviation = field(0)?;
            let name = field(1)?;
            let right_ascension = field(2)?;
            let declination = field(3)?;

            let (ra_h, ra_m) = split_pair(&right_ascension, line, FIELD_NAMES[2])?;
            let (dec_d, dec_m) = split_pair(&declination, line, FIELD_NAMES[3])?;
            let reference = EquatorialPosition::fixed(
                Hms::from_components(ra_h, ra_m),
                Dms::from_components(dec_d, dec_m),
            );

            entries.push(ConstellationEntry {
                abbreviation,
                name,
                right_ascension,
                declination,
                reference,
            });
        }

        debug!("Parsed {} constellation rows", entries.len());
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[ConstellationEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Apparent position of every constellation anchor, in table order.
    pub fn altaz<O: Observe + ?Sized>(
        &self,
        observer: &O,
        instant: &O::Instant,
    ) -> Vec<Result<AltAz, ObserveError>> {
        let positions: Vec<&EquatorialPosition> =
            self.entries.iter().map(|e| &e.reference).collect();
        observe_all(observer, &positions, instant)
    }

    /// Constellations above the horizon threshold of `config`.
    ///
    /// Constellations have no brightness, so the magnitude limit is ignored.
    pub fn visible<O: Observe + ?Sized>(
        &self,
        observer: &O,
        instant: &O::Instant,
        config: &VisibilityConfig,
    ) -> Visible<VisibleConstellation<'_>> {
        let mut entries = Vec::new();
        let mut failures = Vec::new();
        for (index, (entry, result)) in self
            .entries
            .iter()
            .zip(self.altaz(observer, instant))
            .enumerate()
        {
            match result {
                Ok(altaz) if config.above_horizon(altaz.altitude_deg) => {
                    entries.push(VisibleConstellation {
                        index,
                        entry,
                        altaz,
                    });
                }
                Ok(_) => {}
                Err(error) => {
                    warn!("Skipping constellation {}: {}", entry.abbreviation, error);
                    failures.push(ObserveFailure { index, error });
                }
            }
        }
        debug!(
            "{} of {} constellations visible",
            entries.len(),
            self.entries.len()
        );
        Visible { entries, failures }
    }
}

/// Split a whitespace-separated "A B" pair into two numbers.
fn split_pair(
    value: &str,
    line: usize,
    field: &'static str,
) -> Result<(f64, f64), ConstellationError> {
    let bad = || ConstellationError::BadAngle {
        line,
        field,
        value: value.to_string(),
    };
    let mut parts = value.split_whitespace();
    let (Some(a), Some(b), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(bad());
    };
    let a: f64 = a.parse().map_err(|_| bad())?;
    let b: f64 = b.parse().map_err(|_| bad())?;
    Ok((a, b))
}
