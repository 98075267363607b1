//! Error types.

use core::fmt;

/// The kind of an error.
///
/// Grammar rules, the percent-codec, the mutation API and reference
/// resolution all report failures with this type.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ErrorKind {
    /// The input ended where the grammar required more.
    Incomplete,
    /// The input is present but does not match the grammar.
    Syntax,
    /// A repetition has no further element.
    ///
    /// Only returned by [`RangeRule`](crate::grammar::RangeRule) steps;
    /// never surfaced by the parsing entry points.
    EndOfRange,
    /// The base of a reference resolution has no scheme,
    /// or has neither an authority nor an absolute path.
    NotABase,
    /// The input, or the result of a mutation, would exceed [`MAX_SIZE`](crate::MAX_SIZE).
    LengthExceeded,
    /// A constructor was given text that cannot be parsed.
    InvalidArgument,
    /// A lookup requested an element that does not exist.
    OutOfRange,
}

impl ErrorKind {
    pub(crate) fn description(self) -> &'static str {
        match self {
            Self::Incomplete => "unexpected end of input",
            Self::Syntax => "unexpected character",
            Self::EndOfRange => "end of range",
            Self::NotABase => "not a base URI",
            Self::LengthExceeded => "maximum length exceeded",
            Self::InvalidArgument => "invalid argument",
            Self::OutOfRange => "out of range",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

#[cfg(feature = "impl-error")]
impl crate::Error for ErrorKind {}

/// An error occurred when parsing a URI (reference).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ParseError {
    pub(crate) index: usize,
    pub(crate) kind: ErrorKind,
}

impl ParseError {
    pub(crate) const fn new(index: usize, kind: ErrorKind) -> Self {
        Self { index, kind }
    }

    /// Returns the index at which the error occurred.
    ///
    /// This is the furthest position the grammar reached before failing.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the detailed cause of the error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ErrorKind::LengthExceeded => f.write_str("input length exceeds the maximum"),
            kind => write!(f, "{} at index {}", kind, self.index),
        }
    }
}

#[cfg(feature = "impl-error")]
impl crate::Error for ParseError {}

impl From<ParseError> for ErrorKind {
    fn from(e: ParseError) -> Self {
        e.kind
    }
}
