//! Capacity symbols used in the upstream credit-line grid.
//!
//! Desks record credit lines as short symbols rather than amounts: a letter
//! grade, a literal figure, a blocked or unlimited marker, or a figure with a
//! trailing note meaning the line has to be confirmed before use.

use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Upper bound on any credit amount. Also the basis of the switch-edge
/// weight inversion.
pub const MAX_CREDIT: i64 = 1_000_000;

/// Administrative status of a credit line, independent of its remaining amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    Open,
    Closed,
    /// The line exists but must be confirmed with the counterparty first.
    NeedsCheck,
}

/// Errors arising from capacity symbol parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CapacityError {
    #[error("unrecognized capacity symbol '{0}'")]
    Unrecognized(String),
    #[error("capacity amount in '{0}' is out of range")]
    OutOfRange(String),
}

/// Amount and status decoded from a capacity symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityQuote {
    pub amount: i64,
    pub availability: Availability,
}

impl CapacityQuote {
    /// A quote for `amount`; zero is reported as closed.
    pub fn open(amount: i64) -> Self {
        let availability = if amount > 0 {
            Availability::Open
        } else {
            Availability::Closed
        };
        Self {
            amount,
            availability,
        }
    }

    /// A blocked line with no capacity.
    pub fn closed() -> Self {
        Self {
            amount: 0,
            availability: Availability::Closed,
        }
    }

    /// A quote for `amount` that must be confirmed before use.
    pub fn needs_check(amount: i64) -> Self {
        Self {
            amount,
            availability: Availability::NeedsCheck,
        }
    }

    /// Strictly decode a capacity symbol.
    ///
    /// Symbols are case-insensitive and trimmed. Recognized forms:
    ///
    /// - a grade from `grades` (`"B"`)
    /// - a literal amount (`"250"`, `"1,000"`)
    /// - the unlimited marker (`"U"`, `"UNLIMITED"`, `"*"`)
    /// - the blocked marker (`"X"`, `"-"`, `"NONE"`)
    /// - an amount or grade with a trailing note (`"20?"`, `"15 tbc"`, `"B?"`),
    ///   which is flagged [`Availability::NeedsCheck`]
    ///
    /// # Examples
    ///
    /// ```
    /// use creditline_engine::core::capacity::{Availability, CapacityQuote, GradeSchedule};
    ///
    /// let grades = GradeSchedule::default();
    /// let quote = CapacityQuote::parse("20 tbc", &grades).unwrap();
    /// assert_eq!(quote.amount, 20);
    /// assert_eq!(quote.availability, Availability::NeedsCheck);
    /// ```
    pub fn parse(symbol: &str, grades: &GradeSchedule) -> Result<Self, CapacityError> {
        let code = symbol.trim().to_uppercase();
        match code.as_str() {
            "" => return Err(CapacityError::Unrecognized(symbol.to_string())),
            "X" | "-" | "NONE" => return Ok(Self::closed()),
            "U" | "UNLIMITED" | "*" => return Ok(Self::open(MAX_CREDIT)),
            "?" => return Ok(Self::needs_check(0)),
            _ => {}
        }

        if let Some(amount) = grades.get(&code) {
            return Ok(Self::open(amount));
        }
        if let Some(amount) = code.strip_suffix('?').and_then(|g| grades.get(g.trim())) {
            return Ok(Self::needs_check(amount));
        }

        let split = code
            .find(|c: char| !(c.is_ascii_digit() || c == ',' || c == '_'))
            .unwrap_or(code.len());
        let (prefix, note) = code.split_at(split);
        let digits = match ungroup_digits(prefix) {
            Some(digits) => digits,
            None => return Err(CapacityError::Unrecognized(symbol.to_string())),
        };
        let amount: i64 = digits
            .parse()
            .map_err(|_| CapacityError::OutOfRange(symbol.to_string()))?;

        if note.trim().is_empty() {
            Ok(Self::open(amount))
        } else {
            Ok(Self::needs_check(amount))
        }
    }
}

/// Strip thousands separators from a run of digits.
///
/// Separators (`,` or `_`) are only accepted between well-formed groups: a
/// leading group of one to three digits followed by groups of exactly three.
fn ungroup_digits(prefix: &str) -> Option<String> {
    let mut groups = prefix.split([',', '_']);
    let head = groups.next()?;
    if head.is_empty() {
        return None;
    }
    let mut digits = head.to_string();
    let mut grouped = false;
    for group in groups {
        if group.len() != 3 {
            return None;
        }
        grouped = true;
        digits.push_str(group);
    }
    if grouped && head.len() > 3 {
        return None;
    }
    Some(digits)
}

/// Decode a capacity symbol, degrading to a closed zero-capacity quote when
/// the symbol cannot be read. The failure is reported on the `warn` channel.
pub fn capacity_from_symbol(symbol: &str, grades: &GradeSchedule) -> CapacityQuote {
    CapacityQuote::parse(symbol, grades).unwrap_or_else(|e| {
        warn!("{}; treating as zero capacity", e);
        CapacityQuote::closed()
    })
}

/// Letter grade to capacity table.
///
/// Grade keys are stored upper case; tables deserialized from JSON are
/// normalized on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, i64>", into = "BTreeMap<String, i64>")]
pub struct GradeSchedule {
    grades: BTreeMap<String, i64>,
}

impl GradeSchedule {
    pub fn empty() -> Self {
        Self {
            grades: BTreeMap::new(),
        }
    }

    /// Add or replace a grade.
    pub fn with_grade(mut self, grade: &str, amount: i64) -> Self {
        self.grades.insert(grade.trim().to_uppercase(), amount);
        self
    }

    pub fn get(&self, grade: &str) -> Option<i64> {
        self.grades.get(grade).copied()
    }

    pub fn len(&self) -> usize {
        self.grades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grades.is_empty()
    }
}

impl Default for GradeSchedule {
    fn default() -> Self {
        Self::empty()
            .with_grade("S", 100)
            .with_grade("A", 50)
            .with_grade("B", 20)
            .with_grade("C", 10)
            .with_grade("D", 5)
    }
}

impl From<BTreeMap<String, i64>> for GradeSchedule {
    fn from(map: BTreeMap<String, i64>) -> Self {
        map.into_iter()
            .fold(Self::empty(), |s, (grade, amount)| s.with_grade(&grade, amount))
    }
}

impl From<GradeSchedule> for BTreeMap<String, i64> {
    fn from(schedule: GradeSchedule) -> Self {
        schedule.grades
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(symbol: &str) -> Result<CapacityQuote, CapacityError> {
        CapacityQuote::parse(symbol, &GradeSchedule::default())
    }

    #[test]
    fn test_grade_symbols() {
        assert_eq!(parse("B").unwrap(), CapacityQuote::open(20));
        assert_eq!(parse(" s ").unwrap(), CapacityQuote::open(100));
        assert_eq!(parse("d").unwrap().availability, Availability::Open);
    }

    #[test]
    fn test_literal_amounts() {
        assert_eq!(parse("250").unwrap(), CapacityQuote::open(250));
        assert_eq!(parse("1,500").unwrap().amount, 1500);
        assert_eq!(parse("2_500_000").unwrap().amount, 2_500_000);
        assert_eq!(parse("0").unwrap(), CapacityQuote::closed());
    }

    #[test]
    fn test_markers() {
        assert_eq!(parse("x").unwrap(), CapacityQuote::closed());
        assert_eq!(parse("-").unwrap(), CapacityQuote::closed());
        assert_eq!(parse("Unlimited").unwrap().amount, MAX_CREDIT);
        assert_eq!(parse("*").unwrap().availability, Availability::Open);
    }

    #[test]
    fn test_needs_check() {
        assert_eq!(parse("20?").unwrap(), CapacityQuote::needs_check(20));
        assert_eq!(parse("15 tbc").unwrap(), CapacityQuote::needs_check(15));
        assert_eq!(parse("b?").unwrap(), CapacityQuote::needs_check(20));
        assert_eq!(parse("?").unwrap(), CapacityQuote::needs_check(0));
    }

    #[test]
    fn test_unrecognized() {
        assert!(matches!(parse("Q"), Err(CapacityError::Unrecognized(_))));
        assert!(matches!(parse("   "), Err(CapacityError::Unrecognized(_))));
        assert!(matches!(
            parse("99999999999999999999"),
            Err(CapacityError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_misplaced_separators_rejected() {
        for symbol in ["1,5", "15,", ",500", "1,50,000", "1000,000", "1__000", "12,34 tbc"] {
            assert!(
                matches!(parse(symbol), Err(CapacityError::Unrecognized(_))),
                "{} should not parse",
                symbol
            );
        }
        assert_eq!(
            capacity_from_symbol("1,5", &GradeSchedule::default()),
            CapacityQuote::closed()
        );
    }

    #[test]
    fn test_lenient_defaults_to_zero() {
        let quote = capacity_from_symbol("junk", &GradeSchedule::default());
        assert_eq!(quote, CapacityQuote::closed());
    }

    #[test]
    fn test_custom_schedule_from_json() {
        let grades: GradeSchedule = serde_json::from_str(r#"{"aa": 75, "e": 1}"#).unwrap();
        assert_eq!(grades.get("AA"), Some(75));
        let quote = CapacityQuote::parse("aa", &grades).unwrap();
        assert_eq!(quote.amount, 75);
        assert!(CapacityQuote::parse("B", &grades).is_err());
    }
}
