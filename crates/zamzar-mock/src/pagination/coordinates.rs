//! Page coordinates: a bounded limit plus an optional anchor.

use super::anchor::{Anchor, Orientation};
use super::PaginationError;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::ops::Range;

/// Largest page a client may request
pub const MAX_LIMIT: usize = 50;
/// Page size used when the client asks for none, or for an invalid one
pub const DEFAULT_LIMIT: usize = MAX_LIMIT;

/// Where a page sits within an ordered sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCoordinates {
    anchor: Option<Anchor>,
    limit: usize,
}

impl Default for PageCoordinates {
    fn default() -> Self {
        Self {
            anchor: None,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageCoordinates {
    /// Build coordinates, clamping the requested limit.
    ///
    /// Absent or non-positive limits fall back to `DEFAULT_LIMIT`; anything
    /// above `MAX_LIMIT` is clamped to it.
    pub fn new(anchor: Option<Anchor>, limit: Option<i64>) -> Self {
        let limit = match limit {
            Some(l) if l >= 1 => (l as u64).min(MAX_LIMIT as u64) as usize,
            _ => DEFAULT_LIMIT,
        };
        Self { anchor, limit }
    }

    pub fn with_limit(limit: i64) -> Self {
        Self::new(None, Some(limit))
    }

    pub fn with_anchor(anchor: Anchor) -> Self {
        Self::new(Some(anchor), None)
    }

    /// Read `limit`, `before` and `after` from decoded query parameters.
    ///
    /// A `limit` that is not an integer is treated as absent. Supplying both
    /// `before` and `after` is rejected.
    pub fn from_query(query: &HashMap<String, String>) -> Result<Self, PaginationError> {
        let limit = query.get("limit").and_then(|l| l.trim().parse::<i64>().ok());
        let anchor = match (query.get("before"), query.get("after")) {
            (Some(_), Some(_)) => return Err(PaginationError::ConflictingAnchors),
            (Some(before), None) => Some(Anchor::before(before.as_str())),
            (None, Some(after)) => Some(Anchor::after(after.as_str())),
            (None, None) => None,
        };
        Ok(Self::new(anchor, limit))
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn anchor(&self) -> Option<&Anchor> {
        self.anchor.as_ref()
    }

    /// Resolve the window of `items` this page covers.
    ///
    /// `items` must already be in the resource type's list order; anchors
    /// are located by comparing the text of each record's `id_field`.
    pub fn range(&self, items: &[Value], id_field: &str) -> Result<Range<usize>, PaginationError> {
        let len = items.len();
        let Some(anchor) = &self.anchor else {
            return Ok(0..self.limit.min(len));
        };

        let index = index_of(items, id_field, &anchor.reference)
            .ok_or_else(|| PaginationError::AnchorNotFound(anchor.reference.clone()))?;

        let range = match anchor.orientation {
            Orientation::After => {
                let from = (index + 1).min(len);
                let to = (from + self.limit).min(len);
                from..to
            }
            Orientation::Before => {
                let to = index;
                let from = to.saturating_sub(self.limit);
                from..to
            }
        };
        Ok(range)
    }

    /// Slice `items` down to this page.
    pub fn apply_to<'a>(
        &self,
        items: &'a [Value],
        id_field: &str,
    ) -> Result<&'a [Value], PaginationError> {
        let range = self.range(items, id_field)?;
        Ok(&items[range])
    }
}

impl fmt::Display for PageCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.anchor {
            Some(anchor) => write!(f, "PageCoordinates{{anchor={anchor}, limit={}}}", self.limit),
            None => write!(f, "PageCoordinates{{limit={}}}", self.limit),
        }
    }
}

fn index_of(items: &[Value], id_field: &str, reference: &str) -> Option<usize> {
    items.iter().position(|item| {
        item.get(id_field)
            .map(|id| value_text(id) == reference)
            .unwrap_or(false)
    })
}

/// Text form of a JSON scalar, as it would appear in a query string.
///
/// Strings are returned unquoted; numbers and booleans use their JSON form.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
