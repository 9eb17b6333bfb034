//! Sort orders

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use metaquery_schema::{Property, Value};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

/// Sort by one property of the root type
#[derive(Debug, Clone)]
pub struct Order {
    property: Arc<Property>,
    direction: Direction,
    ignore_case: bool,
}

impl Order {
    pub fn new(property: Arc<Property>, direction: Direction) -> Self {
        Self {
            property,
            direction,
            ignore_case: false,
        }
    }

    pub fn asc(property: Arc<Property>) -> Self {
        Self::new(property, Direction::Ascending)
    }

    pub fn desc(property: Arc<Property>) -> Self {
        Self::new(property, Direction::Descending)
    }

    pub fn ignore_case(mut self, ignore_case: bool) -> Self {
        self.ignore_case = ignore_case;
        self
    }

    pub fn property(&self) -> &Arc<Property> {
        &self.property
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_ascending(&self) -> bool {
        self.direction == Direction::Ascending
    }

    pub fn is_ignore_case(&self) -> bool {
        self.ignore_case
    }

    /// The store can sort on this: a persisted, simple property
    pub fn is_persisted(&self) -> bool {
        self.property.is_persisted() && self.property.is_simple()
    }

    /// Compare two values read for this order's property
    ///
    /// A null on either side, or an incomparable pair, compares equal so the
    /// stable sort keeps input order for those rows.
    pub fn compare(&self, a: &Value, b: &Value) -> Ordering {
        if a.is_null() || b.is_null() {
            return Ordering::Equal;
        }
        let ordering = match (self.ignore_case, a.as_str(), b.as_str()) {
            (true, Some(x), Some(y)) => x.to_lowercase().cmp(&y.to_lowercase()),
            _ => a.compare(b).unwrap_or(Ordering::Equal),
        };
        match self.direction {
            Direction::Ascending => ordering,
            Direction::Descending => ordering.reverse(),
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = if self.ignore_case { "i" } else { "" };
        let direction = match self.direction {
            Direction::Ascending => "asc",
            Direction::Descending => "desc",
        };
        write!(f, "{}:{}{}", self.property.name(), prefix, direction)
    }
}
