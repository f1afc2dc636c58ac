//! Cardinalities as used by cardinality-based feature models: a list of
//! closed integer intervals, where an absent upper bound means "unbounded".

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

static INTERVAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(\d+)\s*,\s*(\d+|\*)\s*$").expect("interval regex"));

#[derive(Debug, Error)]
pub enum CardinalityError {
    #[error("invalid interval `{0}`: use `min,max` or `min,*`, intervals separated by `;`")]
    InvalidInterval(String),
    #[error("cardinality must contain at least one interval")]
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub lower: u64,
    /// `None` stands for `*` (unbounded).
    pub upper: Option<u64>,
}

impl Interval {
    pub fn new(lower: u64, upper: Option<u64>) -> Self {
        Self { lower, upper }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cardinality {
    pub intervals: Vec<Interval>,
}

impl Cardinality {
    pub fn new(intervals: Vec<Interval>) -> Self {
        Self { intervals }
    }

    /// The empty cardinality, used for features that have no group.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn single(lower: u64, upper: Option<u64>) -> Self {
        Self::new(vec![Interval::new(lower, upper)])
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Whether zero instances satisfy this cardinality.
    pub fn admits_zero(&self) -> bool {
        self.intervals.iter().any(|interval| interval.lower == 0)
    }

    /// Smallest lower bound over all intervals.
    pub fn min_lower(&self) -> Option<u64> {
        self.intervals.iter().map(|interval| interval.lower).min()
    }

    /// Largest upper bound over all intervals; `Some(None)` if any interval
    /// is unbounded.
    pub fn max_upper(&self) -> Option<Option<u64>> {
        if self.intervals.is_empty() {
            return None;
        }
        if self.intervals.iter().any(|interval| interval.upper.is_none()) {
            return Some(None);
        }
        Some(self.intervals.iter().filter_map(|interval| interval.upper).max())
    }

    /// String form shown on the canvas, e.g. `<1, 2>, <4, *>` with angle
    /// brackets or `[1, 2]` with square brackets.
    pub fn to_display_str(&self, left: &str, right: &str) -> String {
        if self.intervals.is_empty() {
            return format!("{left}{right}");
        }
        self.intervals
            .iter()
            .map(|interval| {
                let upper = match interval.upper {
                    Some(value) => value.to_string(),
                    None => "*".to_string(),
                };
                format!("{left}{}, {upper}{right}", interval.lower)
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// String form presented in edit fields: `1,2; 4,*`.
    pub fn to_edit_str(&self) -> String {
        self.intervals
            .iter()
            .map(|interval| {
                let upper = match interval.upper {
                    Some(value) => value.to_string(),
                    None => "*".to_string(),
                };
                format!("{},{upper}", interval.lower)
            })
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Parses the edit-field form back into a cardinality.
    pub fn parse_edit_str(raw: &str) -> Result<Self, CardinalityError> {
        if raw.trim().is_empty() {
            return Err(CardinalityError::Empty);
        }
        let mut intervals = Vec::new();
        for part in raw.split(';') {
            let captures = INTERVAL_RE
                .captures(part)
                .ok_or_else(|| CardinalityError::InvalidInterval(part.trim().to_string()))?;
            let lower: u64 = captures[1]
                .parse()
                .map_err(|_| CardinalityError::InvalidInterval(part.trim().to_string()))?;
            let upper = if &captures[2] == "*" {
                None
            } else {
                Some(
                    captures[2]
                        .parse()
                        .map_err(|_| CardinalityError::InvalidInterval(part.trim().to_string()))?,
                )
            };
            intervals.push(Interval::new(lower, upper));
        }
        Ok(Self::new(intervals))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_intervals() {
        let card = Cardinality::parse_edit_str("1,2; 4,*").unwrap();
        assert_eq!(
            card.intervals,
            vec![Interval::new(1, Some(2)), Interval::new(4, None)]
        );
    }

    #[test]
    fn parse_rejects_malformed_input() {
        assert!(Cardinality::parse_edit_str("1").is_err());
        assert!(Cardinality::parse_edit_str("a,b").is_err());
        assert!(Cardinality::parse_edit_str("1,2,3").is_err());
        assert!(Cardinality::parse_edit_str("").is_err());
    }

    #[test]
    fn edit_str_round_trips() {
        let card = Cardinality::new(vec![Interval::new(0, Some(1)), Interval::new(3, None)]);
        assert_eq!(card.to_edit_str(), "0,1; 3,*");
        assert_eq!(Cardinality::parse_edit_str(&card.to_edit_str()).unwrap(), card);
    }

    #[test]
    fn display_str_uses_brackets() {
        let card = Cardinality::single(1, None);
        assert_eq!(card.to_display_str("<", ">"), "<1, *>");
        assert_eq!(Cardinality::empty().to_display_str("[", "]"), "[]");
    }

    #[test]
    fn bounds_helpers() {
        let card = Cardinality::new(vec![Interval::new(0, Some(2)), Interval::new(4, Some(6))]);
        assert!(card.admits_zero());
        assert_eq!(card.min_lower(), Some(0));
        assert_eq!(card.max_upper(), Some(Some(6)));
        assert_eq!(Cardinality::single(1, None).max_upper(), Some(None));
    }
}
