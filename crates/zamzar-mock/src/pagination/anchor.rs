//! Pagination cursors.

use std::fmt;

/// Which side of the referenced record the page lies on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Before,
    After,
}

/// A cursor naming the record a page starts after or ends before
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    pub reference: String,
    pub orientation: Orientation,
}

impl Anchor {
    pub fn after(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            orientation: Orientation::After,
        }
    }

    pub fn before(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            orientation: Orientation::Before,
        }
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.orientation {
            Orientation::After => write!(f, "after {}", self.reference),
            Orientation::Before => write!(f, "before {}", self.reference),
        }
    }
}
