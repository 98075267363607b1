use crate::{
    error::ErrorKind,
    grammar::{
        charset::{PCHAR, SEGMENT_NZ_NC},
        range, CharSet, Cursor, Range, RangeOf, RangeRule, Result, Rule,
    },
    pct_enc::{pct_encoded, PctStr},
};

/// A parsed path: its text, its segment count and the segments.
pub type Path<'a> = Range<'a, PctStr<'a>>;

/// `segment = *pchar`
#[derive(Clone, Copy, Debug, Default)]
pub struct SegmentRule;

impl<'a> Rule<'a> for SegmentRule {
    type Value = PctStr<'a>;

    fn parse(&self, cur: &mut Cursor<'a>) -> Result<PctStr<'a>> {
        pct_encoded(PCHAR).parse(cur)
    }
}

fn non_empty<'a>(cur: &mut Cursor<'a>, cs: CharSet) -> Result<PctStr<'a>> {
    let seg = pct_encoded(cs).parse(cur)?;
    if seg.is_empty() {
        Err(cur.unexpected())
    } else {
        Ok(seg)
    }
}

/// `segment-nz = 1*pchar`
#[derive(Clone, Copy, Debug, Default)]
pub struct SegmentNzRule;

impl<'a> Rule<'a> for SegmentNzRule {
    type Value = PctStr<'a>;

    fn parse(&self, cur: &mut Cursor<'a>) -> Result<PctStr<'a>> {
        non_empty(cur, PCHAR)
    }
}

/// `segment-nz-nc = 1*( unreserved / pct-encoded / sub-delims / "@" )`
#[derive(Clone, Copy, Debug, Default)]
pub struct SegmentNzNcRule;

impl<'a> Rule<'a> for SegmentNzNcRule {
    type Value = PctStr<'a>;

    fn parse(&self, cur: &mut Cursor<'a>) -> Result<PctStr<'a>> {
        non_empty(cur, SEGMENT_NZ_NC)
    }
}

// Whether a byte can follow a "/" inside a path.
fn continues_path(x: Option<u8>) -> bool {
    x.is_some_and(|x| x == b'/' || x == b'%' || PCHAR.contains(x))
}

// "/" segment
fn slash_segment<'a>(cur: &mut Cursor<'a>) -> Result<PctStr<'a>> {
    if cur.peek() != Some(b'/') {
        return Err(ErrorKind::EndOfRange);
    }
    cur.attempt(|cur| {
        cur.advance(1);
        SegmentRule.parse(cur)
    })
}

/// `path-abempty = *( "/" segment )`
///
/// A lone `"/"` is consumed but counts no segment.
#[derive(Clone, Copy, Debug, Default)]
pub struct PathAbemptyRule;

impl<'a> RangeRule<'a> for PathAbemptyRule {
    type Value = PctStr<'a>;

    fn begin(&self, cur: &mut Cursor<'a>) -> Result<PctStr<'a>> {
        if cur.peek() == Some(b'/') && !continues_path(cur.peek_at(1)) {
            cur.advance(1);
            return Err(ErrorKind::EndOfRange);
        }
        slash_segment(cur)
    }

    fn increment(&self, cur: &mut Cursor<'a>) -> Result<PctStr<'a>> {
        slash_segment(cur)
    }
}

/// `path-absolute = "/" [ segment-nz *( "/" segment ) ]`
#[derive(Clone, Copy, Debug, Default)]
pub struct PathAbsoluteRule;

impl<'a> RangeRule<'a> for PathAbsoluteRule {
    type Value = PctStr<'a>;

    fn begin(&self, cur: &mut Cursor<'a>) -> Result<PctStr<'a>> {
        if cur.peek() != Some(b'/') {
            return Err(cur.unexpected());
        }
        match cur.peek_at(1) {
            Some(b'/') => {
                cur.advance(1);
                let kind = cur.fail(ErrorKind::Syntax);
                cur.reset(cur.pos() - 1);
                Err(kind)
            }
            x if continues_path(x) => cur.attempt(|cur| {
                cur.advance(1);
                SegmentNzRule.parse(cur)
            }),
            _ => {
                cur.advance(1);
                Err(ErrorKind::EndOfRange)
            }
        }
    }

    fn increment(&self, cur: &mut Cursor<'a>) -> Result<PctStr<'a>> {
        slash_segment(cur)
    }
}

/// `path-rootless = segment-nz *( "/" segment )`
#[derive(Clone, Copy, Debug, Default)]
pub struct PathRootlessRule;

impl<'a> RangeRule<'a> for PathRootlessRule {
    type Value = PctStr<'a>;

    fn begin(&self, cur: &mut Cursor<'a>) -> Result<PctStr<'a>> {
        SegmentNzRule.parse(cur)
    }

    fn increment(&self, cur: &mut Cursor<'a>) -> Result<PctStr<'a>> {
        slash_segment(cur)
    }
}

/// `path-noscheme = segment-nz-nc *( "/" segment )`
#[derive(Clone, Copy, Debug, Default)]
pub struct PathNoschemeRule;

impl<'a> RangeRule<'a> for PathNoschemeRule {
    type Value = PctStr<'a>;

    fn begin(&self, cur: &mut Cursor<'a>) -> Result<PctStr<'a>> {
        SegmentNzNcRule.parse(cur)
    }

    fn increment(&self, cur: &mut Cursor<'a>) -> Result<PctStr<'a>> {
        slash_segment(cur)
    }
}

/// `path-empty = 0<pchar>`
#[derive(Clone, Copy, Debug, Default)]
pub struct PathEmptyRule;

impl<'a> RangeRule<'a> for PathEmptyRule {
    type Value = PctStr<'a>;

    fn begin(&self, _cur: &mut Cursor<'a>) -> Result<PctStr<'a>> {
        Err(ErrorKind::EndOfRange)
    }

    fn increment(&self, _cur: &mut Cursor<'a>) -> Result<PctStr<'a>> {
        Err(ErrorKind::EndOfRange)
    }
}

/// Matches any number of elements of a path rule.
pub(crate) const fn path<R>(rule: R) -> RangeOf<R> {
    range(rule, 0, usize::MAX)
}

/// Counts the segments of a validated path text.
///
/// `"/"` has none; otherwise every `'/'` starts one, and a non-empty
/// rootless path has one more.
pub(crate) fn count_segments(path: &str) -> usize {
    match path {
        "" | "/" => 0,
        _ => {
            let slashes = path.bytes().filter(|&x| x == b'/').count();
            if path.starts_with('/') {
                slashes
            } else {
                slashes + 1
            }
        }
    }
}
