//! Natural ordering of a resource type's identifiers.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

/// How identifiers are compared before the direction is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComparisonKind {
    Numeric,
    #[default]
    Lexical,
}

/// Ordering of a resource type: the record field holding the identifier,
/// the direction of list responses and how identifiers compare.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct OrderingSpec {
    pub field: String,
    #[serde(default)]
    pub direction: Direction,
    #[serde(default)]
    pub comparison: ComparisonKind,
}

impl OrderingSpec {
    pub fn new(field: impl Into<String>, direction: Direction, comparison: ComparisonKind) -> Self {
        Self {
            field: field.into(),
            direction,
            comparison,
        }
    }

    pub fn numeric_descending(field: impl Into<String>) -> Self {
        Self::new(field, Direction::Descending, ComparisonKind::Numeric)
    }

    pub fn lexical_ascending(field: impl Into<String>) -> Self {
        Self::new(field, Direction::Ascending, ComparisonKind::Lexical)
    }

    /// Compare two identifiers in list order.
    ///
    /// Numeric comparison places identifiers that fail to parse after all
    /// numeric ones, ordered lexically among themselves.
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        let natural = match self.comparison {
            ComparisonKind::Lexical => a.cmp(b),
            ComparisonKind::Numeric => match (a.parse::<i64>(), b.parse::<i64>()) {
                (Ok(x), Ok(y)) => x.cmp(&y),
                (Ok(_), Err(_)) => Ordering::Less,
                (Err(_), Ok(_)) => Ordering::Greater,
                (Err(_), Err(_)) => a.cmp(b),
            },
        };
        match self.direction {
            Direction::Ascending => natural,
            Direction::Descending => natural.reverse(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_compares_by_value() {
        let spec = OrderingSpec::new("id", Direction::Ascending, ComparisonKind::Numeric);
        assert_eq!(spec.compare("9", "10"), Ordering::Less);
        assert_eq!(spec.compare("100", "20"), Ordering::Greater);
        assert_eq!(spec.compare("7", "7"), Ordering::Equal);
    }

    #[test]
    fn test_lexical_compares_by_string() {
        let spec = OrderingSpec::lexical_ascending("name");
        assert_eq!(spec.compare("9", "10"), Ordering::Greater);
        assert_eq!(spec.compare("docx", "jpg"), Ordering::Less);
    }

    #[test]
    fn test_descending_reverses() {
        let spec = OrderingSpec::numeric_descending("id");
        assert_eq!(spec.compare("9", "10"), Ordering::Greater);
        assert_eq!(spec.compare("100", "20"), Ordering::Less);
    }

    #[test]
    fn test_unparseable_numeric_sorts_last() {
        let spec = OrderingSpec::new("id", Direction::Ascending, ComparisonKind::Numeric);
        assert_eq!(spec.compare("abc", "5"), Ordering::Greater);
        assert_eq!(spec.compare("5", "abc"), Ordering::Less);
        assert_eq!(spec.compare("abc", "abd"), Ordering::Less);
    }

    #[test]
    fn test_deserialize_defaults() {
        let spec: OrderingSpec = serde_yaml::from_str("field: name").unwrap();
        assert_eq!(spec.direction, Direction::Ascending);
        assert_eq!(spec.comparison, ComparisonKind::Lexical);

        let spec: OrderingSpec =
            serde_yaml::from_str("field: id\ndirection: descending\ncomparison: numeric").unwrap();
        assert_eq!(spec, OrderingSpec::numeric_descending("id"));
    }
}
