use std::fmt;

/// Text used for a reading that never arrived.
pub const ABSENT_READING: &str = "None";

/// The single line obtained from the sensor for one run.
///
/// The value is kept exactly as decoded; it is never parsed as a number.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Reading(Option<String>);

impl Reading {
    /// reading with a value
    pub fn new(value: impl Into<String>) -> Self {
        Reading(Some(value.into()))
    }

    /// reading that carries no data
    pub fn absent() -> Self {
        Reading(None)
    }

    /// get value
    pub fn value(&self) -> Option<&str> {
        self.0.as_deref()
    }

    /// is absent
    pub fn is_absent(&self) -> bool {
        self.0.is_none()
    }
}

impl From<Option<String>> for Reading {
    fn from(value: Option<String>) -> Self {
        Reading(value)
    }
}

/// Writes the value verbatim, or [`ABSENT_READING`].
impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(value) => f.write_str(value),
            None => f.write_str(ABSENT_READING),
        }
    }
}
