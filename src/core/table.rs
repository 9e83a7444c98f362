//! The credit line table.
//!
//! Desks maintain credit lines as a grid: one row per ordered pair of houses
//! and one column per tenor, each cell holding a capacity symbol. The table
//! expands those rows into individual [`CreditLine`] records keyed by
//! `(source, destination, product, tenor)`.

use crate::core::capacity::GradeSchedule;
use crate::core::house::HouseId;
use crate::core::line::CreditLine;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Tenor columns of the line grid, shortest first.
pub const STANDARD_TENORS: [&str; 25] = [
    "spot", "on", "tn", "sn", "1w", "2w", "3w", "1m", "2m", "3m", "4m", "5m", "6m", "7m", "8m",
    "9m", "10m", "11m", "1y", "2y", "3y", "4y", "5y", "6y", "10y",
];

/// Symbol used for grid cells that are left empty.
pub const BLOCKED_SYMBOL: &str = "X";

/// Errors arising from loading a line table.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("failed to read line table: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse line table: {0}")]
    Json(#[from] serde_json::Error),
}

/// `(source, destination, product, tenor)`, all upper case.
pub type LineKey = (HouseId, HouseId, String, String);

fn default_product() -> String {
    "swap".to_string()
}

/// One row of the line grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineTableRow {
    pub from: String,
    pub to: String,
    #[serde(default = "default_product")]
    pub product: String,
    /// Tenor code -> capacity symbol. Missing tenors are blocked.
    #[serde(default)]
    pub tenors: BTreeMap<String, String>,
    #[serde(default)]
    pub can_switch: bool,
    #[serde(default)]
    pub allows_switch: bool,
}

impl LineTableRow {
    /// Expand the row into one line per standard tenor.
    pub fn to_lines(&self, grades: &GradeSchedule) -> Vec<CreditLine> {
        let symbols: BTreeMap<String, &str> = self
            .tenors
            .iter()
            .map(|(tenor, symbol)| (tenor.trim().to_lowercase(), symbol.as_str()))
            .collect();

        for tenor in symbols.keys() {
            if !STANDARD_TENORS.contains(&tenor.as_str()) {
                warn!(
                    "Ignoring unknown tenor '{}' on {} -> {}",
                    tenor, self.from, self.to
                );
            }
        }

        STANDARD_TENORS
            .iter()
            .map(|tenor| {
                let symbol = symbols.get(*tenor).copied().unwrap_or(BLOCKED_SYMBOL);
                CreditLine::from_symbol(
                    HouseId::new(&self.from),
                    HouseId::new(&self.to),
                    &self.product,
                    tenor,
                    symbol,
                    grades,
                )
                .with_switch_flags(self.can_switch, self.allows_switch)
            })
            .collect()
    }
}

/// On-disk layout of a line table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LineTableFile {
    pub rows: Vec<LineTableRow>,
    /// Houses permitted to switch regardless of their line flags.
    #[serde(default)]
    pub switchers: Vec<String>,
}

/// All known credit lines, keyed by `(source, destination, product, tenor)`.
///
/// Lookups are case-insensitive. The table is the single owner of line
/// records; routing graphs copy the amounts they need at build time.
#[derive(Debug, Clone, Default)]
pub struct CreditLineTable {
    lines: BTreeMap<LineKey, CreditLine>,
    switchers: BTreeSet<HouseId>,
}

impl CreditLineTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from grid rows.
    pub fn from_rows<'a>(
        rows: impl IntoIterator<Item = &'a LineTableRow>,
        grades: &GradeSchedule,
    ) -> Self {
        let mut table = Self::new();
        for row in rows {
            for line in row.to_lines(grades) {
                table.insert(line);
            }
        }
        table
    }

    /// Parse a JSON line table.
    pub fn from_json_str(json: &str, grades: &GradeSchedule) -> Result<Self, TableError> {
        let file: LineTableFile = serde_json::from_str(json)?;
        let mut table = Self::from_rows(&file.rows, grades);
        for house in &file.switchers {
            table.add_switcher(HouseId::new(house));
        }
        debug!(
            "Loaded {} credit lines from {} rows",
            table.len(),
            file.rows.len()
        );
        Ok(table)
    }

    /// Read and parse a JSON line table from disk.
    pub fn from_json_file(path: impl AsRef<Path>, grades: &GradeSchedule) -> Result<Self, TableError> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content, grades)
    }

    /// Insert a line, returning the one it replaced.
    pub fn insert(&mut self, line: CreditLine) -> Option<CreditLine> {
        let key = (
            line.source().clone(),
            line.destination().clone(),
            line.product().to_string(),
            line.tenor().to_string(),
        );
        self.lines.insert(key, line)
    }

    /// Mark a house as switch-capable.
    pub fn add_switcher(&mut self, house: HouseId) {
        self.switchers.insert(house);
    }

    pub fn get(&self, source: &str, destination: &str, product: &str, tenor: &str) -> Option<&CreditLine> {
        self.lines.get(&Self::key(source, destination, product, tenor))
    }

    pub fn get_mut(
        &mut self,
        source: &str,
        destination: &str,
        product: &str,
        tenor: &str,
    ) -> Option<&mut CreditLine> {
        self.lines.get_mut(&Self::key(source, destination, product, tenor))
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> impl Iterator<Item = &CreditLine> {
        self.lines.values()
    }

    /// Lines for one product and tenor, ordered by `(source, destination)`.
    pub fn lines_for(&self, product: &str, tenor: &str) -> Vec<&CreditLine> {
        let product = product.trim().to_uppercase();
        let tenor = tenor.trim().to_uppercase();
        self.lines
            .values()
            .filter(|l| l.product() == product && l.tenor() == tenor)
            .collect()
    }

    /// Every house named on either end of a line.
    pub fn houses(&self) -> BTreeSet<HouseId> {
        self.lines
            .keys()
            .flat_map(|(source, destination, _, _)| [source.clone(), destination.clone()])
            .collect()
    }

    /// Houses explicitly registered as switchers plus the source of every
    /// line flagged `can_switch`.
    pub fn switchers(&self) -> BTreeSet<HouseId> {
        self.lines
            .values()
            .filter(|l| l.can_switch())
            .map(|l| l.source().clone())
            .chain(self.switchers.iter().cloned())
            .collect()
    }

    /// Clear usage on every line, typically at the start of a session.
    pub fn reset_usage(&mut self) {
        for line in self.lines.values_mut() {
            line.reset_usage();
        }
    }

    fn key(source: &str, destination: &str, product: &str, tenor: &str) -> LineKey {
        (
            HouseId::new(source),
            HouseId::new(destination),
            product.trim().to_uppercase(),
            tenor.trim().to_uppercase(),
        )
    }
}

impl FromIterator<CreditLine> for CreditLineTable {
    fn from_iter<T: IntoIterator<Item = CreditLine>>(iter: T) -> Self {
        let mut table = Self::new();
        for line in iter {
            table.insert(line);
        }
        table
    }
}
