//! Persistent location stack.
//!
//! Every operation returns a NEW stack sharing structure with the old one,
//! so earlier handles stay valid as snapshots.

use crate::utils::error::ReplayError;
use rpds::VectorSync;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// A currently executing position
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Location {
    pub file: String,
    pub line: u32,
}

impl Location {
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// Parses `FILE:LINE`, splitting on the last colon so paths may contain colons
impl FromStr for Location {
    type Err = ReplayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ReplayError::InvalidLocation(s.to_string());
        let (file, line) = s.rsplit_once(':').ok_or_else(invalid)?;
        if file.is_empty() {
            return Err(invalid());
        }
        let line = line.trim().parse::<u32>().map_err(|_| invalid())?;
        Ok(Location::new(file, line))
    }
}

/// Stack of locations, one per open frame, bottom first
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocationStack {
    v: VectorSync<Location>,
}

impl LocationStack {
    /// Create a new, empty stack.
    pub fn new() -> Self {
        Self {
            v: VectorSync::new_sync(),
        }
    }

    pub fn len(&self) -> usize {
        self.v.len()
    }

    pub fn is_empty(&self) -> bool {
        self.v.is_empty()
    }

    /// Innermost location
    pub fn top(&self) -> Option<&Location> {
        self.v.last()
    }

    /// Push a location, returning a new stack.
    pub fn push(&self, location: Location) -> Self {
        Self {
            v: self.v.push_back(location),
        }
    }

    /// Drop the top location, returning a new stack.
    /// Returns None if the stack is empty.
    pub fn pop(&self) -> Option<Self> {
        Some(Self {
            v: self.v.drop_last()?,
        })
    }

    /// Swap the top location for another, returning a new stack.
    /// Returns None if the stack is empty.
    pub fn replace_top(&self, location: Location) -> Option<Self> {
        let top = self.len().checked_sub(1)?;
        Some(Self {
            v: self.v.set(top, location)?,
        })
    }

    /// Locations from bottom (outermost) to top (innermost)
    pub fn iter(&self) -> impl Iterator<Item = &Location> {
        self.v.iter()
    }

    pub fn to_vec(&self) -> Vec<Location> {
        self.v.iter().cloned().collect()
    }
}

impl Default for LocationStack {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<Location> for LocationStack {
    fn from_iter<I: IntoIterator<Item = Location>>(iter: I) -> Self {
        iter.into_iter()
            .fold(LocationStack::new(), |stack, location| stack.push(location))
    }
}

impl fmt::Display for LocationStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, location) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", location)?;
        }
        f.write_str("]")
    }
}
