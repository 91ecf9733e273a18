//! The error type for calendrical computations.
//!
//! Every failure in this crate is terminal for the call that produced it:
//! there is no retry, no default-value substitution, and no partial success.

use alloc::borrow::Cow;
use core::fmt;

/// The category of a [`TemporaError`].
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A (year, month, day) combination that does not exist on the calendar.
    InvalidDate,
    /// A field value or computed result outside its legal range.
    Range,
    /// A field argument the receiving type does not support.
    UnsupportedField,
    /// A unit argument the receiving type does not support.
    UnsupportedUnit,
    /// Integer overflow in an intermediate or final computation.
    Overflow,
    /// Textual input that does not match the expected pattern.
    Parse,
    /// A value reconstructed outside the documented minimal field layout.
    Deserialization,
    /// An internal invariant was breached.
    Assert,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::InvalidDate => "InvalidDate",
            Self::Range => "Range",
            Self::UnsupportedField => "UnsupportedField",
            Self::UnsupportedUnit => "UnsupportedUnit",
            Self::Overflow => "Overflow",
            Self::Parse => "Parse",
            Self::Deserialization => "Deserialization",
            Self::Assert => "Assert",
        })
    }
}

/// The error returned by fallible calendrical operations.
///
/// Errors are built through the kind constructors and enriched with a
/// message, e.g. `TemporaError::range().with_message("..")`. Parse errors
/// additionally carry the byte index of the first failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemporaError {
    kind: ErrorKind,
    msg: Cow<'static, str>,
    index: Option<usize>,
}

impl TemporaError {
    #[inline]
    #[must_use]
    const fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            msg: Cow::Borrowed(""),
            index: None,
        }
    }

    /// Creates an [`ErrorKind::InvalidDate`] error.
    #[inline]
    #[must_use]
    pub const fn invalid_date() -> Self {
        Self::new(ErrorKind::InvalidDate)
    }

    /// Creates an [`ErrorKind::Range`] error.
    #[inline]
    #[must_use]
    pub const fn range() -> Self {
        Self::new(ErrorKind::Range)
    }

    /// Creates an [`ErrorKind::UnsupportedField`] error.
    #[inline]
    #[must_use]
    pub const fn unsupported_field() -> Self {
        Self::new(ErrorKind::UnsupportedField)
    }

    /// Creates an [`ErrorKind::UnsupportedUnit`] error.
    #[inline]
    #[must_use]
    pub const fn unsupported_unit() -> Self {
        Self::new(ErrorKind::UnsupportedUnit)
    }

    /// Creates an [`ErrorKind::Overflow`] error.
    #[inline]
    #[must_use]
    pub const fn overflow() -> Self {
        Self::new(ErrorKind::Overflow)
    }

    /// Creates an [`ErrorKind::Parse`] error.
    #[inline]
    #[must_use]
    pub const fn parse() -> Self {
        Self::new(ErrorKind::Parse)
    }

    /// Creates an [`ErrorKind::Deserialization`] error.
    #[inline]
    #[must_use]
    pub const fn deserialization() -> Self {
        Self::new(ErrorKind::Deserialization)
    }

    /// Creates an [`ErrorKind::Assert`] error.
    #[inline]
    #[must_use]
    pub const fn assert() -> Self {
        Self::new(ErrorKind::Assert)
    }

    /// Attaches a message to this error.
    #[must_use]
    pub fn with_message(mut self, msg: impl Into<Cow<'static, str>>) -> Self {
        self.msg = msg.into();
        self
    }

    /// Attaches the byte index of the first failure to this error.
    #[inline]
    #[must_use]
    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    /// Returns this error's kind.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns this error's message.
    #[inline]
    #[must_use]
    pub fn message(&self) -> &str {
        &self.msg
    }

    /// Returns the byte index of the first failure, if this is a parse error
    /// that recorded one.
    #[inline]
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        self.index
    }
}

impl fmt::Display for TemporaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if !self.msg.is_empty() {
            write!(f, ": {}", self.msg)?;
        }
        if let Some(index) = self.index {
            write!(f, " (at index {index})")?;
        }
        Ok(())
    }
}

impl core::error::Error for TemporaError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_round_trip() {
        let err = TemporaError::range().with_message("year out of range");
        assert_eq!(err.kind(), ErrorKind::Range);
        assert_eq!(err.message(), "year out of range");
        assert_eq!(err.index(), None);
    }

    #[test]
    fn parse_error_carries_index() {
        let err = TemporaError::parse()
            .with_message("unexpected character")
            .with_index(7);
        assert_eq!(err.index(), Some(7));
        assert!(alloc::format!("{err}").contains("index 7"));
    }
}
