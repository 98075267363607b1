//! A small grammar-rule composition engine.
//!
//! Every rule implements [`Rule`]: it reads from a [`Cursor`] and either
//! advances the cursor past what it consumed and yields a value, or leaves
//! the cursor where it was and yields an [`ErrorKind`].
//!
//! Rules are plain values, composed by value:
//!
//! - tuples of rules are sequences, yielding tuples of values;
//! - [`optional`] turns a failure into `None`;
//! - [`variant`] tries alternatives in order;
//! - [`range`] repeats an element rule between a lower and an upper bound
//!   without materializing the elements.
//!
//! # Examples
//!
//! ```
//! use compact_uri::grammar::{ch, charset::DIGIT, optional, parse_all, token};
//!
//! // 1*DIGIT [ "." 1*DIGIT ]
//! let rule = (token(DIGIT), optional((ch(b'.'), token(DIGIT))));
//!
//! let (int, frac) = parse_all("3.14", &rule)?;
//! assert_eq!(int, "3");
//! assert_eq!(frac.map(|(_, f)| f), Some("14"));
//!
//! assert!(parse_all("3.", &rule).is_err());
//! # Ok::<_, compact_uri::ParseError>(())
//! ```

mod any;
pub mod charset;
mod range;

pub use any::AnyRule;
pub use charset::CharSet;
pub use range::{range, Range, RangeIter, RangeOf, RangeRule};

use crate::{
    error::{ErrorKind, ParseError},
    table::MAX_SIZE,
};

/// The result type of rules.
pub type Result<T, E = ErrorKind> = core::result::Result<T, E>;

/// A read position over an input string.
///
/// # Invariants
///
/// `pos <= src.len()` and `pos` is on the boundary of a UTF-8 code point.
/// Rules only ever step over ASCII bytes, which keeps the latter.
#[derive(Clone, Copy, Debug)]
pub struct Cursor<'a> {
    src: &'a str,
    pos: usize,
    furthest: usize,
}

impl<'a> Cursor<'a> {
    /// Creates a cursor at the start of the given string.
    #[must_use]
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            furthest: 0,
        }
    }

    /// Returns the whole input.
    #[must_use]
    pub fn source(&self) -> &'a str {
        self.src
    }

    /// Returns the current position.
    #[must_use]
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Returns the furthest position at which a rule has failed.
    #[must_use]
    pub fn furthest(&self) -> usize {
        self.furthest.max(self.pos)
    }

    /// Checks whether the cursor is at the end of input.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pos == self.src.len()
    }

    /// Returns the unread bytes.
    #[must_use]
    pub fn remaining(&self) -> &'a [u8] {
        &self.src.as_bytes()[self.pos..]
    }

    /// Returns the byte at the current position.
    #[must_use]
    pub fn peek(&self) -> Option<u8> {
        self.peek_at(0)
    }

    /// Returns the byte `i` bytes after the current position.
    #[must_use]
    pub fn peek_at(&self, i: usize) -> Option<u8> {
        self.src.as_bytes().get(self.pos + i).copied()
    }

    /// Skips `n` bytes.
    ///
    /// The caller must only skip ASCII bytes.
    pub fn advance(&mut self, n: usize) {
        debug_assert!(self.remaining()[..n].is_ascii());
        self.pos += n;
    }

    /// Returns the input from `start` to the current position.
    #[must_use]
    pub fn slice_from(&self, start: usize) -> &'a str {
        &self.src[start..self.pos]
    }

    /// Moves the cursor back to `pos`, remembering how far it got.
    pub fn reset(&mut self, pos: usize) {
        debug_assert!(pos <= self.pos);
        self.furthest = self.furthest.max(self.pos);
        self.pos = pos;
    }

    /// Records a failure at the current position and returns `kind`.
    pub fn fail(&mut self, kind: ErrorKind) -> ErrorKind {
        self.furthest = self.furthest.max(self.pos);
        kind
    }

    /// Records a failure due to the current byte, which is either
    /// [`Incomplete`](ErrorKind::Incomplete) at the end of input or
    /// [`Syntax`](ErrorKind::Syntax) otherwise.
    pub fn unexpected(&mut self) -> ErrorKind {
        let kind = if self.is_empty() {
            ErrorKind::Incomplete
        } else {
            ErrorKind::Syntax
        };
        self.fail(kind)
    }

    /// Runs `f`, restoring the position if it fails.
    pub fn attempt<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let start = self.pos;
        let res = f(self);
        if res.is_err() {
            self.reset(start);
        }
        res
    }
}

/// A grammar rule.
///
/// On success, `parse` advances the cursor past the consumed input.
/// On failure, the cursor must be left at its position before the call.
pub trait Rule<'a> {
    /// The value produced on success.
    type Value;

    /// Parses from the cursor.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the input does not match the rule.
    fn parse(&self, cur: &mut Cursor<'a>) -> Result<Self::Value>;
}

impl<'a, R: Rule<'a> + ?Sized> Rule<'a> for &R {
    type Value = R::Value;

    fn parse(&self, cur: &mut Cursor<'a>) -> Result<Self::Value> {
        (**self).parse(cur)
    }
}

/// Parses the whole string with a rule.
///
/// # Errors
///
/// Returns `Err` if the string is longer than [`MAX_SIZE`](crate::MAX_SIZE),
/// if the rule fails, or if input remains after the rule succeeds.
/// The error index is the furthest position the rule reached.
pub fn parse_all<'a, R: Rule<'a>>(s: &'a str, rule: &R) -> Result<R::Value, ParseError> {
    if s.len() > MAX_SIZE {
        return Err(ParseError::new(0, ErrorKind::LengthExceeded));
    }
    let mut cur = Cursor::new(s);
    match rule.parse(&mut cur) {
        Ok(v) if cur.is_empty() => Ok(v),
        Ok(_) => Err(ParseError::new(cur.furthest(), ErrorKind::Syntax)),
        Err(ErrorKind::EndOfRange) => Err(ParseError::new(cur.furthest(), ErrorKind::Syntax)),
        Err(kind) => Err(ParseError::new(cur.furthest(), kind)),
    }
}

/// Rule for a single literal byte.
///
/// This struct is created by [`ch`].
#[derive(Clone, Copy, Debug)]
pub struct CharRule(u8);

/// Matches exactly the byte `c`, which must be ASCII.
#[must_use]
pub const fn ch(c: u8) -> CharRule {
    assert!(c.is_ascii(), "non-ASCII literal");
    CharRule(c)
}

impl<'a> Rule<'a> for CharRule {
    type Value = ();

    fn parse(&self, cur: &mut Cursor<'a>) -> Result<()> {
        if cur.peek() == Some(self.0) {
            cur.advance(1);
            Ok(())
        } else {
            Err(cur.unexpected())
        }
    }
}

/// Rule for a literal string.
///
/// This struct is created by [`lit`].
#[derive(Clone, Copy, Debug)]
pub struct LitRule(&'static str);

/// Matches exactly the ASCII string `s`.
#[must_use]
pub const fn lit(s: &'static str) -> LitRule {
    assert!(s.is_ascii(), "non-ASCII literal");
    LitRule(s)
}

impl<'a> Rule<'a> for LitRule {
    type Value = ();

    fn parse(&self, cur: &mut Cursor<'a>) -> Result<()> {
        let rem = cur.remaining();
        let lit = self.0.as_bytes();
        if rem.starts_with(lit) {
            cur.advance(lit.len());
            Ok(())
        } else if lit.starts_with(rem) {
            Err(cur.fail(ErrorKind::Incomplete))
        } else {
            Err(cur.fail(ErrorKind::Syntax))
        }
    }
}

/// Rule for a single byte from a set.
///
/// This struct is created by [`delim`].
#[derive(Clone, Copy, Debug)]
pub struct DelimRule(CharSet);

/// Matches one byte from `cs`, yielding it.
#[must_use]
pub const fn delim(cs: CharSet) -> DelimRule {
    DelimRule(cs)
}

impl<'a> Rule<'a> for DelimRule {
    type Value = u8;

    fn parse(&self, cur: &mut Cursor<'a>) -> Result<u8> {
        match cur.peek() {
            Some(x) if self.0.contains(x) => {
                cur.advance(1);
                Ok(x)
            }
            _ => Err(cur.unexpected()),
        }
    }
}

/// Rule for a non-empty run of bytes from a set.
///
/// This struct is created by [`token`].
#[derive(Clone, Copy, Debug)]
pub struct TokenRule(CharSet);

/// Matches one or more bytes from `cs`, yielding the matched string.
#[must_use]
pub const fn token(cs: CharSet) -> TokenRule {
    TokenRule(cs)
}

impl<'a> Rule<'a> for TokenRule {
    type Value = &'a str;

    fn parse(&self, cur: &mut Cursor<'a>) -> Result<&'a str> {
        let n = self.0.find_if_not(cur.remaining());
        if n == 0 {
            return Err(cur.unexpected());
        }
        let start = cur.pos();
        cur.advance(n);
        Ok(cur.slice_from(start))
    }
}

/// Rule for an optional element.
///
/// This struct is created by [`optional`].
#[derive(Clone, Copy, Debug)]
pub struct Optional<R>(R);

/// Matches `rule` or nothing.
///
/// A [`Syntax`](ErrorKind::Syntax) or [`Incomplete`](ErrorKind::Incomplete)
/// failure of `rule` yields `None`; other errors are propagated.
#[must_use]
pub const fn optional<R>(rule: R) -> Optional<R> {
    Optional(rule)
}

impl<'a, R: Rule<'a>> Rule<'a> for Optional<R> {
    type Value = Option<R::Value>;

    fn parse(&self, cur: &mut Cursor<'a>) -> Result<Self::Value> {
        let start = cur.pos();
        match self.0.parse(cur) {
            Ok(v) => Ok(Some(v)),
            Err(ErrorKind::Syntax | ErrorKind::Incomplete) => {
                debug_assert_eq!(cur.pos(), start, "rule did not restore the cursor");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

macro_rules! impl_sequence {
    ($($R:ident)+) => {
        impl<'a, $($R: Rule<'a>),+> Rule<'a> for ($($R,)+) {
            type Value = ($($R::Value,)+);

            #[allow(non_snake_case)]
            fn parse(&self, cur: &mut Cursor<'a>) -> Result<Self::Value> {
                let ($($R,)+) = self;
                cur.attempt(|cur| Ok(($($R.parse(cur)?,)+)))
            }
        }
    };
}

impl_sequence!(A);
impl_sequence!(A B);
impl_sequence!(A B C);
impl_sequence!(A B C D);
impl_sequence!(A B C D E);
impl_sequence!(A B C D E F);
impl_sequence!(A B C D E F G);
impl_sequence!(A B C D E F G H);

/// Rule for a set of alternatives.
///
/// This struct is created by [`variant`].
#[derive(Clone, Copy, Debug)]
pub struct Variant<T>(T);

/// Matches the first of a tuple of alternatives that succeeds.
///
/// Alternatives are tried in declaration order. If all of them fail,
/// the error of the last one is returned.
#[must_use]
pub const fn variant<T>(rules: T) -> Variant<T> {
    Variant(rules)
}

macro_rules! impl_variant {
    ($Enum:ident, $n:literal; $($R:ident $V:ident)+) => {
        #[doc = concat!("The value of a [`Variant`] rule with ", $n, " alternatives.")]
        #[derive(Clone, Copy, Debug, PartialEq, Eq)]
        #[allow(missing_docs)]
        pub enum $Enum<$($R),+> {
            $($V($R),)+
        }

        impl<'a, $($R: Rule<'a>),+> Rule<'a> for Variant<($($R,)+)> {
            type Value = $Enum<$($R::Value),+>;

            #[allow(non_snake_case, unused_assignments)]
            fn parse(&self, cur: &mut Cursor<'a>) -> Result<Self::Value> {
                let ($($R,)+) = &self.0;
                let mut err;
                $(
                    match $R.parse(cur) {
                        Ok(v) => return Ok($Enum::$V(v)),
                        Err(e) => err = e,
                    }
                )+
                Err(err)
            }
        }
    };
}

impl_variant!(Variant2, 2; A V0 B V1);
impl_variant!(Variant3, 3; A V0 B V1 C V2);
impl_variant!(Variant4, 4; A V0 B V1 C V2 D V3);
impl_variant!(Variant5, 5; A V0 B V1 C V2 D V3 E V4);

#[cfg(test)]
mod tests {
    use super::{charset::*, *};

    #[test]
    fn literals() {
        let mut cur = Cursor::new("ab");
        assert_eq!(ch(b'b').parse(&mut cur), Err(ErrorKind::Syntax));
        assert_eq!(cur.pos(), 0);
        assert_eq!(ch(b'a').parse(&mut cur), Ok(()));
        assert_eq!(lit("bc").parse(&mut cur), Err(ErrorKind::Incomplete));
        assert_eq!(lit("b").parse(&mut cur), Ok(()));
        assert_eq!(ch(b'c').parse(&mut cur), Err(ErrorKind::Incomplete));
        assert!(cur.is_empty());
    }

    #[test]
    fn tokens() {
        assert_eq!(parse_all("123", &token(DIGIT)), Ok("123"));
        assert_eq!(
            parse_all("", &token(DIGIT)).unwrap_err().kind(),
            ErrorKind::Incomplete
        );
        let e = parse_all("12a", &token(DIGIT)).unwrap_err();
        assert_eq!((e.index(), e.kind()), (2, ErrorKind::Syntax));
        assert_eq!(parse_all("+", &delim(SCHEME)), Ok(b'+'));
    }

    #[test]
    fn sequence_restores() {
        let rule = (token(ALPHA), ch(b':'), token(DIGIT));
        let mut cur = Cursor::new("ab:x");
        assert_eq!(rule.parse(&mut cur), Err(ErrorKind::Syntax));
        assert_eq!(cur.pos(), 0);
        assert_eq!(cur.furthest(), 3);
        assert_eq!(parse_all("ab:12", &rule), Ok(("ab", (), "12")));
    }

    #[test]
    fn optional_presence() {
        let rule = (token(ALPHA), optional((ch(b'='), optional(token(DIGIT)))));
        assert_eq!(parse_all("k", &rule), Ok(("k", None)));
        assert_eq!(parse_all("k=", &rule), Ok(("k", Some(((), None)))));
        assert_eq!(parse_all("k=1", &rule), Ok(("k", Some(((), Some("1"))))));
    }

    #[test]
    fn variant_order() {
        let rule = variant((token(DIGIT), token(ALPHA.or(DIGIT))));
        assert_eq!(parse_all("12", &rule), Ok(Variant2::V0("12")));
        assert_eq!(parse_all("a1", &rule), Ok(Variant2::V1("a1")));

        // The error of the last alternative is returned.
        let rule = variant((lit("ab"), ch(b'x')));
        let mut cur = Cursor::new("a");
        assert_eq!(rule.parse(&mut cur), Err(ErrorKind::Syntax));
        assert_eq!(cur.pos(), 0);
        let rule = variant((ch(b'x'), lit("ab")));
        let mut cur = Cursor::new("a");
        assert_eq!(rule.parse(&mut cur), Err(ErrorKind::Incomplete));
        let mut cur = Cursor::new("b");
        assert_eq!(rule.parse(&mut cur), Err(ErrorKind::Syntax));
    }

    #[test]
    fn leftover_input() {
        let e = parse_all("abc1", &token(ALPHA)).unwrap_err();
        assert_eq!((e.index(), e.kind()), (3, ErrorKind::Syntax));
    }
}
