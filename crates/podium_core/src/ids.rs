//! Identifier newtypes for the three key columns of the input tables.
//!
//! Student names and discipline names come from human-edited spreadsheets,
//! so the charset is deliberately permissive (accented letters, spaces).
//! What we do enforce, strictly and in one place:
//! - non-empty after trimming ASCII whitespace
//! - no control characters (tabs/newlines would corrupt CSV round-trips)
//! - bounded length
//!
//! Values are stored trimmed; equality and ordering are plain string
//! comparisons on the trimmed form.

use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

const MAX_LEN: usize = 120;

/// Errors returned when validating or parsing identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdError {
    Empty,
    TooLong,
    ControlChar,
}

impl fmt::Display for IdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdError::Empty => write!(f, "identifier is empty"),
            IdError::TooLong => write!(f, "identifier exceeds {MAX_LEN} characters"),
            IdError::ControlChar => write!(f, "identifier contains a control character"),
        }
    }
}

impl std::error::Error for IdError {}

#[inline]
fn check_trimmed(s: &str) -> Result<&str, IdError> {
    let t = s.trim();
    if t.is_empty() {
        return Err(IdError::Empty);
    }
    if t.chars().count() > MAX_LEN {
        return Err(IdError::TooLong);
    }
    if t.chars().any(char::is_control) {
        return Err(IdError::ControlChar);
    }
    Ok(t)
}

macro_rules! name_newtype {
    ($(#[$m:meta])* $name:ident) => {
        $(#[$m])*
        #[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(String);

        impl $name {
            #[inline] pub fn as_str(&self) -> &str { &self.0 }
        }

        impl fmt::Display for $name {
            #[inline]
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
        }

        impl FromStr for $name {
            type Err = IdError;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                check_trimmed(s).map(|t| $name(t.to_owned()))
            }
        }

        impl TryFrom<&str> for $name {
            type Error = IdError;
            #[inline]
            fn try_from(value: &str) -> Result<Self, Self::Error> { value.parse() }
        }
    }
}

name_newtype!(
    /// Student name; the unique key of the grade table.
    StudentName
);
name_newtype!(
    /// Registration identifier carried alongside a student through the run.
    Registration
);
name_newtype!(
    /// Discipline name; the unique key of the seat table and a grade column.
    Discipline
);

// === Tests ===
