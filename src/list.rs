//! Delimiter-separated lists: query parameters and path segments.

use alloc::string::String;

/// The elements of a region, walked from both ends.
///
/// The element count is known up front, so a region of zero elements and a
/// region of one empty element are told apart by `remaining` alone.
#[derive(Clone, Debug)]
pub(crate) struct Split<'a> {
    s: &'a str,
    sep: u8,
    front: usize,
    back: usize,
    remaining: usize,
}

impl<'a> Split<'a> {
    pub(crate) fn new(s: &'a str, sep: u8, count: usize) -> Self {
        Self {
            s,
            sep,
            front: 0,
            back: s.len(),
            remaining: count,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.remaining
    }

    pub(crate) fn next(&mut self) -> Option<&'a str> {
        match self.remaining {
            0 => None,
            1 => {
                self.remaining = 0;
                Some(&self.s[self.front..self.back])
            }
            _ => {
                let region = &self.s.as_bytes()[self.front..self.back];
                let i = region.iter().position(|&x| x == self.sep)?;
                let elem = &self.s[self.front..self.front + i];
                self.front += i + 1;
                self.remaining -= 1;
                Some(elem)
            }
        }
    }

    pub(crate) fn next_back(&mut self) -> Option<&'a str> {
        match self.remaining {
            0 => None,
            1 => {
                self.remaining = 0;
                Some(&self.s[self.front..self.back])
            }
            _ => {
                let region = &self.s.as_bytes()[self.front..self.back];
                let i = self.front + region.iter().rposition(|&x| x == self.sep)?;
                let elem = &self.s[i + 1..self.back];
                self.back = i;
                self.remaining -= 1;
                Some(elem)
            }
        }
    }
}

/// Returns the byte offset where element `i` starts.
///
/// One past the last element, this is `s.len() + 1`, as if a separator
/// followed the region.
fn start_of(s: &str, sep: u8, i: usize) -> usize {
    if i == 0 {
        return 0;
    }
    s.bytes()
        .enumerate()
        .filter(|&(_, x)| x == sep)
        .nth(i - 1)
        .map_or(s.len() + 1, |(j, _)| j + 1)
}

/// Replaces the elements `first..last` of a non-empty list with `k`
/// elements already joined by `sep`, returning the new region text.
///
/// Removing every element yields an empty string, which the caller must
/// tell apart from a single empty element.
pub(crate) fn splice(
    s: &str,
    sep: u8,
    count: usize,
    (first, last): (usize, usize),
    new: &str,
    k: usize,
) -> String {
    debug_assert!(first <= last && last <= count && count > 0);
    let lo = start_of(s, sep, first);
    let mut out = String::with_capacity(s.len() + new.len() + 1);
    if first < last {
        let hi = start_of(s, sep, last) - 1;
        if k > 0 {
            out.push_str(&s[..lo]);
            out.push_str(new);
            out.push_str(&s[hi..]);
        } else if first == 0 && last == count {
            // Nothing left.
        } else if first > 0 {
            out.push_str(&s[..lo - 1]);
            out.push_str(&s[hi..]);
        } else {
            out.push_str(&s[hi + 1..]);
        }
    } else if k == 0 {
        out.push_str(s);
    } else if first < count {
        out.push_str(&s[..lo]);
        out.push_str(new);
        out.push(char::from(sep));
        out.push_str(&s[lo..]);
    } else {
        out.push_str(s);
        out.push(char::from(sep));
        out.push_str(new);
    }
    out
}
