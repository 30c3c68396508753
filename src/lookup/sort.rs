//! Sort criteria accepted by the scholar tools.
//!
//! Ordering itself is always done by the provider; these enums only validate
//! the caller's choice and map it to the provider's parameter.

use crate::error::ScoutError;
use std::fmt;
use std::str::FromStr;

/// Ordering for publication search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaperSort {
    #[default]
    Relevance,
    Date,
}

impl PaperSort {
    pub const VALUES: &'static [&'static str] = &["relevance", "date"];
}

impl FromStr for PaperSort {
    type Err = ScoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "relevance" => Ok(PaperSort::Relevance),
            "date" => Ok(PaperSort::Date),
            _ => Err(ScoutError::InvalidInput(format!(
                "sort_by must be 'relevance' or 'date', got '{}'",
                s
            ))),
        }
    }
}

impl fmt::Display for PaperSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaperSort::Relevance => write!(f, "relevance"),
            PaperSort::Date => write!(f, "date"),
        }
    }
}

/// Ordering for an author's publication list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PublicationSort {
    #[default]
    CitedBy,
    Year,
}

impl PublicationSort {
    pub const VALUES: &'static [&'static str] = &["citedby", "year"];
}

impl FromStr for PublicationSort {
    type Err = ScoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "citedby" => Ok(PublicationSort::CitedBy),
            "year" => Ok(PublicationSort::Year),
            _ => Err(ScoutError::InvalidInput(format!(
                "sort_by must be 'citedby' or 'year', got '{}'",
                s
            ))),
        }
    }
}

impl fmt::Display for PublicationSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublicationSort::CitedBy => write!(f, "citedby"),
            PublicationSort::Year => write!(f, "year"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paper_sort_parse() {
        assert_eq!("relevance".parse::<PaperSort>().unwrap(), PaperSort::Relevance);
        assert_eq!("Date".parse::<PaperSort>().unwrap(), PaperSort::Date);
        assert!("citedby".parse::<PaperSort>().is_err());
    }

    #[test]
    fn test_publication_sort_parse() {
        assert_eq!("citedby".parse::<PublicationSort>().unwrap(), PublicationSort::CitedBy);
        assert_eq!(" YEAR ".parse::<PublicationSort>().unwrap(), PublicationSort::Year);
        assert!("date".parse::<PublicationSort>().is_err());
        assert!("".parse::<PublicationSort>().is_err());
    }

    #[test]
    fn test_display_matches_wire_values() {
        assert_eq!(PaperSort::Date.to_string(), "date");
        assert_eq!(PublicationSort::CitedBy.to_string(), "citedby");
        assert_eq!(PaperSort::VALUES, &["relevance", "date"]);
    }
}
