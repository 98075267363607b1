use super::{AnyRule, Cursor, Result, Rule};
use crate::error::ErrorKind;
use core::{fmt, iter::FusedIterator};

/// An element rule for a repetition.
///
/// A repetition is parsed by calling [`begin`](Self::begin) once and then
/// [`increment`](Self::increment) until it returns [`EndOfRange`](ErrorKind::EndOfRange).
/// Either step may return `EndOfRange` to signal that no further element
/// exists; such a step may still consume input, for instance a lone `"/"`
/// that opens an empty path.
///
/// Element rules are stored inline inside every [`Range`] they produce,
/// so they must be small and must not borrow anything.
pub trait RangeRule<'a>: Clone + Send + Sync + 'static {
    /// The value of an element.
    type Value;

    /// Parses the first element.
    ///
    /// # Errors
    ///
    /// Returns `EndOfRange` if the repetition is empty, or another error
    /// if the input is malformed.
    fn begin(&self, cur: &mut Cursor<'a>) -> Result<Self::Value>;

    /// Parses a subsequent element.
    ///
    /// # Errors
    ///
    /// Returns `EndOfRange` if no element follows, or another error
    /// if the input is malformed.
    fn increment(&self, cur: &mut Cursor<'a>) -> Result<Self::Value>;
}

/// Rule for a bounded repetition.
///
/// This struct is created by [`range`].
#[derive(Clone, Copy, Debug)]
pub struct RangeOf<R> {
    rule: R,
    min: usize,
    max: usize,
}

/// Matches between `min` and `max` elements of `rule`, inclusive.
///
/// The value is a [`Range`] recording the matched span and element count;
/// the elements themselves are parsed again lazily on iteration.
///
/// # Panics
///
/// Panics if `min > max`.
#[must_use]
pub const fn range<R>(rule: R, min: usize, max: usize) -> RangeOf<R> {
    assert!(min <= max, "invalid bounds");
    RangeOf { rule, min, max }
}

impl<'a, R: RangeRule<'a>> Rule<'a> for RangeOf<R> {
    type Value = Range<'a, R::Value>;

    fn parse(&self, cur: &mut Cursor<'a>) -> Result<Self::Value> {
        let start = cur.pos();
        let mut n = 0;

        let mut step = self.rule.begin(cur);
        loop {
            match step {
                Ok(_) => {
                    n += 1;
                    if n > self.max {
                        cur.reset(start);
                        return Err(cur.fail(ErrorKind::Syntax));
                    }
                }
                Err(ErrorKind::EndOfRange) => break,
                Err(e) => {
                    cur.reset(start);
                    return Err(e);
                }
            }
            step = self.rule.increment(cur);
        }

        if n < self.min {
            let kind = cur.unexpected();
            cur.reset(start);
            return Err(kind);
        }
        Ok(Range {
            s: cur.slice_from(start),
            n,
            rule: AnyRule::new(self.rule.clone()),
        })
    }
}

/// A parsed repetition.
///
/// Holds the matched span, the element count and a copy of the element rule,
/// from which the elements are re-parsed on demand.
pub struct Range<'a, V> {
    s: &'a str,
    n: usize,
    rule: AnyRule<'a, V>,
}

impl<'a, V> Range<'a, V> {
    /// Returns the matched span.
    #[must_use]
    pub fn as_str(&self) -> &'a str {
        self.s
    }

    /// Returns the number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.n
    }

    /// Checks whether there is no element.
    ///
    /// The span may be non-empty even so.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Returns an iterator over the elements.
    #[must_use]
    pub fn iter(&self) -> RangeIter<'_, 'a, V> {
        RangeIter {
            rule: &self.rule,
            cur: Cursor::new(self.s),
            started: false,
            remaining: self.n,
        }
    }
}

impl<V> Clone for Range<'_, V> {
    fn clone(&self) -> Self {
        Self {
            s: self.s,
            n: self.n,
            rule: self.rule.clone(),
        }
    }
}

impl<V> fmt::Debug for Range<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Range")
            .field("s", &self.s)
            .field("n", &self.n)
            .finish_non_exhaustive()
    }
}

impl<'r, 'a, V> IntoIterator for &'r Range<'a, V> {
    type Item = V;
    type IntoIter = RangeIter<'r, 'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator over the elements of a [`Range`].
pub struct RangeIter<'r, 'a, V> {
    rule: &'r AnyRule<'a, V>,
    cur: Cursor<'a>,
    started: bool,
    remaining: usize,
}

impl<V> Iterator for RangeIter<'_, '_, V> {
    type Item = V;

    fn next(&mut self) -> Option<V> {
        if self.remaining == 0 {
            return None;
        }
        let step = if self.started {
            self.rule.increment(&mut self.cur)
        } else {
            self.started = true;
            self.rule.begin(&mut self.cur)
        };
        match step {
            Ok(v) => {
                self.remaining -= 1;
                Some(v)
            }
            Err(_) => {
                debug_assert!(false, "element count out of sync with span");
                self.remaining = 0;
                None
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for RangeIter<'_, '_, V> {}

impl<V> FusedIterator for RangeIter<'_, '_, V> {}

impl<V> fmt::Debug for RangeIter<'_, '_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RangeIter")
            .field("remaining", &self.remaining)
            .finish_non_exhaustive()
    }
}
