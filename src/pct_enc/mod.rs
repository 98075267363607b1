//! Percent-encoding utilities.
//!
//! The free functions in this module work on raw bytes bounded by a
//! [`CharSet`]: bytes in the set are left as they are and every other byte
//! is written as a `%XX` triplet with uppercase hexadecimal digits.

use crate::{
    error::ErrorKind,
    grammar::{CharSet, Cursor, Result, Rule},
};
use alloc::{borrow::Cow, string::String, vec::Vec};
use core::{cmp::Ordering, fmt, hash, iter::FusedIterator, str};

const fn gen_octet_table(hi: bool) -> [u8; 256] {
    let mut out = [0xff; 256];
    let shift = if hi { 4 } else { 0 };

    let mut i = 0;
    while i < 10 {
        out[(i + b'0') as usize] = i << shift;
        i += 1;
    }
    while i < 16 {
        out[(i - 10 + b'A') as usize] = i << shift;
        out[(i - 10 + b'a') as usize] = i << shift;
        i += 1;
    }
    out
}

const OCTET_TABLE_HI: &[u8; 256] = &gen_octet_table(true);
const OCTET_TABLE_LO: &[u8; 256] = &gen_octet_table(false);

/// Decodes a percent-encoded octet, assuming that the bytes are hexadecimal.
pub(crate) fn decode_octet(hi: u8, lo: u8) -> u8 {
    debug_assert!(hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit());
    OCTET_TABLE_HI[hi as usize] | OCTET_TABLE_LO[lo as usize]
}

pub(crate) fn encode_byte(x: u8) -> &'static str {
    const TABLE: &[u8; 256 * 3] = &{
        const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

        let mut i = 0;
        let mut table = [0; 256 * 3];
        while i < 256 {
            table[i * 3] = b'%';
            table[i * 3 + 1] = HEX_DIGITS[i >> 4];
            table[i * 3 + 2] = HEX_DIGITS[i & 0b1111];
            i += 1;
        }
        table
    };

    const TABLE_STR: &str = match str::from_utf8(TABLE) {
        Ok(s) => s,
        Err(_) => unreachable!(),
    };

    &TABLE_STR[x as usize * 3..x as usize * 3 + 3]
}

/// Validates a percent-encoded string and returns its decoded length.
///
/// Every byte must either be a member of `cs` or start a `%XX` triplet.
///
/// # Errors
///
/// Returns [`Incomplete`](ErrorKind::Incomplete) if the input ends inside a triplet,
/// or [`Syntax`](ErrorKind::Syntax) on any other invalid byte.
///
/// # Examples
///
/// ```
/// use compact_uri::{grammar::charset::PCHAR, pct_enc, ErrorKind};
///
/// assert_eq!(pct_enc::validate(b"a%20b", PCHAR), Ok(3));
/// assert_eq!(pct_enc::validate(b"a%2", PCHAR), Err(ErrorKind::Incomplete));
/// assert_eq!(pct_enc::validate(b"a%2g", PCHAR), Err(ErrorKind::Syntax));
/// assert_eq!(pct_enc::validate(b"a b", PCHAR), Err(ErrorKind::Syntax));
/// ```
pub fn validate(s: &[u8], cs: CharSet) -> Result<usize> {
    let mut cur = Cursor::new(str::from_utf8(s).map_err(|_| ErrorKind::Syntax)?);
    let v = PctEncodedRule(cs).parse(&mut cur)?;
    if cur.is_empty() {
        Ok(v.decoded_len())
    } else {
        Err(ErrorKind::Syntax)
    }
}

/// Returns the decoded length of a string, assuming that it is validly encoded.
///
/// Never reads out of bounds, even on malformed input.
#[must_use]
pub fn decoded_len_unchecked(s: &[u8]) -> usize {
    let mut i = 0;
    let mut n = 0;
    while i < s.len() {
        i += if s[i] == b'%' { 3 } else { 1 };
        n += 1;
    }
    n
}

/// Decodes a validly encoded string into `dest`, returning the number of
/// bytes written.
///
/// # Panics
///
/// Panics if `dest` is shorter than the decoded length.
pub fn decode_into(dest: &mut [u8], s: &[u8]) -> usize {
    let mut n = 0;
    for x in DecodedBytes::new(s) {
        dest[n] = x;
        n += 1;
    }
    n
}

/// Returns the length of `s` after encoding with `cs`.
#[must_use]
pub fn encoded_len(s: &[u8], cs: CharSet) -> usize {
    s.iter().map(|&x| if cs.contains(x) { 1 } else { 3 }).sum()
}

/// Percent-encodes `s` with `cs`, appending the output to `buf`.
pub fn encode_into(buf: &mut String, s: &[u8], cs: CharSet) {
    let mut rem = s;
    while !rem.is_empty() {
        let i = cs.find_if_not(rem);
        let (allowed, rest) = rem.split_at(i);
        // Members of a set are ASCII.
        buf.push_str(str::from_utf8(allowed).unwrap_or_default());
        if let [x, rest @ ..] = rest {
            buf.push_str(encode_byte(*x));
            rem = rest;
        } else {
            rem = rest;
        }
    }
}

/// Percent-encodes `s` with `cs`.
///
/// # Examples
///
/// ```
/// use compact_uri::{grammar::charset::PCHAR, pct_enc};
///
/// assert_eq!(pct_enc::encode("a b/ç", PCHAR), "a%20b%2F%C3%A7");
/// ```
#[must_use]
pub fn encode(s: &str, cs: CharSet) -> String {
    let mut buf = String::with_capacity(encoded_len(s.as_bytes(), cs));
    encode_into(&mut buf, s.as_bytes(), cs);
    buf
}

/// Rule for a run of bytes from a set or percent-encoded triplets.
///
/// This struct is created by [`pct_encoded`].
#[derive(Clone, Copy, Debug)]
pub struct PctEncodedRule(CharSet);

/// Matches zero or more bytes that are members of `cs` or start a `%XX`
/// triplet, yielding a [`PctStr`].
///
/// A `'%'` not followed by two hexadecimal digits fails the rule.
#[must_use]
pub const fn pct_encoded(cs: CharSet) -> PctEncodedRule {
    PctEncodedRule(cs)
}

impl<'a> Rule<'a> for PctEncodedRule {
    type Value = PctStr<'a>;

    fn parse(&self, cur: &mut Cursor<'a>) -> Result<PctStr<'a>> {
        let start = cur.pos();
        let mut decoded_len = 0;
        loop {
            let n = self.0.find_if_not(cur.remaining());
            cur.advance(n);
            decoded_len += n;

            if cur.peek() != Some(b'%') {
                break;
            }
            match (cur.peek_at(1), cur.peek_at(2)) {
                (Some(hi), Some(lo)) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit() => {
                    cur.advance(3);
                    decoded_len += 1;
                }
                (Some(hi), _) if !hi.is_ascii_hexdigit() => {
                    return Err(fail(cur, start, 1, ErrorKind::Syntax));
                }
                (_, Some(_)) => return Err(fail(cur, start, 2, ErrorKind::Syntax)),
                _ => {
                    let n = cur.remaining().len();
                    return Err(fail(cur, start, n, ErrorKind::Incomplete));
                }
            }
        }
        Ok(PctStr {
            encoded: cur.slice_from(start),
            decoded_len,
        })
    }
}

fn fail(cur: &mut Cursor<'_>, start: usize, offset: usize, kind: ErrorKind) -> ErrorKind {
    cur.advance(offset);
    cur.reset(start);
    kind
}

/// A validly percent-encoded string slice, with its decoded length.
///
/// # Comparison
///
/// `PctStr` slices are compared by their *decoded* bytes, so `"a%62"` equals `"ab"`.
/// Comparison with a `str` compares the decoded bytes with the bytes of the `str`.
///
/// # Examples
///
/// ```
/// use compact_uri::pct_enc::PctStr;
///
/// let s = PctStr::new("%C2%A1Hola%21")?;
/// assert_eq!(s.decoded_len(), 7);
/// assert_eq!(s.decode_utf8().unwrap(), "¡Hola!");
/// assert_eq!(s, "¡Hola!");
/// assert_eq!(s, PctStr::new("%c2%a1Hol%61!")?);
/// # Ok::<_, compact_uri::ErrorKind>(())
/// ```
#[derive(Clone, Copy)]
pub struct PctStr<'a> {
    encoded: &'a str,
    decoded_len: usize,
}

impl<'a> PctStr<'a> {
    /// An empty `PctStr`.
    pub const EMPTY: PctStr<'static> = PctStr {
        encoded: "",
        decoded_len: 0,
    };

    /// Checks the percent-encoded triplets of a string and wraps it.
    ///
    /// Bytes other than `'%'` are not checked.
    ///
    /// # Errors
    ///
    /// Returns `Err` if a `'%'` is not followed by two hexadecimal digits.
    pub fn new(s: &'a str) -> Result<Self> {
        let b = s.as_bytes();
        let mut i = 0;
        let mut n = 0;
        while i < b.len() {
            if b[i] == b'%' {
                match (b.get(i + 1), b.get(i + 2)) {
                    (Some(hi), Some(lo)) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit() => {
                        i += 3;
                    }
                    (Some(hi), _) if !hi.is_ascii_hexdigit() => return Err(ErrorKind::Syntax),
                    (_, Some(_)) => return Err(ErrorKind::Syntax),
                    _ => return Err(ErrorKind::Incomplete),
                }
            } else {
                i += 1;
            }
            n += 1;
        }
        Ok(Self {
            encoded: s,
            decoded_len: n,
        })
    }

    /// Wraps a string whose every byte is a member of `cs` or starts a triplet.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the string is not validly encoded with `cs`.
    pub fn new_in(s: &'a str, cs: CharSet) -> Result<Self> {
        validate(s.as_bytes(), cs).map(|decoded_len| Self {
            encoded: s,
            decoded_len,
        })
    }

    /// Checks the percent-encoded triplets of a string and wraps it.
    ///
    /// # Panics
    ///
    /// Panics if a `'%'` is not followed by two hexadecimal digits.
    /// For a non-panicking variant, use [`new`](Self::new).
    #[must_use]
    pub fn new_or_panic(s: &'a str) -> Self {
        match Self::new(s) {
            Ok(s) => s,
            Err(kind) => panic!("invalid percent-encoded string: {kind}"),
        }
    }

    /// Wraps a string assuming validity.
    pub(crate) fn new_validated(s: &'a str) -> Self {
        Self {
            encoded: s,
            decoded_len: decoded_len_unchecked(s.as_bytes()),
        }
    }

    /// Wraps a validated string whose decoded length is already known.
    pub(crate) fn with_decoded_len(s: &'a str, decoded_len: usize) -> Self {
        debug_assert_eq!(decoded_len, decoded_len_unchecked(s.as_bytes()));
        Self {
            encoded: s,
            decoded_len,
        }
    }

    /// Returns the encoded string.
    #[must_use]
    pub fn as_str(&self) -> &'a str {
        self.encoded
    }

    /// Returns the encoded length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.encoded.len()
    }

    /// Checks whether the string is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.encoded.is_empty()
    }

    /// Returns the decoded length in bytes.
    #[must_use]
    pub fn decoded_len(&self) -> usize {
        self.decoded_len
    }

    /// Checks whether the string contains no triplet.
    #[must_use]
    pub fn is_unencoded(&self) -> bool {
        self.decoded_len == self.encoded.len()
    }

    /// Returns an iterator over decoded chunks.
    pub fn decode(&self) -> Decode<'a> {
        Decode {
            source: self.encoded,
        }
    }

    /// Returns an iterator over decoded bytes.
    pub fn bytes(&self) -> DecodedBytes<'a> {
        DecodedBytes::new(self.encoded.as_bytes())
    }

    /// Decodes into `dest`, returning the number of bytes written.
    ///
    /// # Panics
    ///
    /// Panics if `dest` is shorter than [`decoded_len`](Self::decoded_len).
    pub fn decode_into(&self, dest: &mut [u8]) -> usize {
        decode_into(dest, self.encoded.as_bytes())
    }

    /// Decodes to bytes, allocating only if the string contains a triplet.
    #[must_use]
    pub fn to_bytes(&self) -> Cow<'a, [u8]> {
        if self.is_unencoded() {
            return Cow::Borrowed(self.encoded.as_bytes());
        }
        let mut buf = Vec::with_capacity(self.decoded_len);
        for chunk in self.decode() {
            match chunk {
                DecodedChunk::Unencoded(s) => buf.extend_from_slice(s.as_bytes()),
                DecodedChunk::PctDecoded(x) => buf.push(x),
            }
        }
        Cow::Owned(buf)
    }

    /// Decodes to a string, allocating only if the string contains a triplet.
    ///
    /// # Errors
    ///
    /// Returns `Err` containing the decoded bytes if they are not valid UTF-8.
    pub fn decode_utf8(&self) -> Result<Cow<'a, str>, Vec<u8>> {
        match self.to_bytes() {
            Cow::Borrowed(_) => Ok(Cow::Borrowed(self.encoded)),
            Cow::Owned(v) => String::from_utf8(v)
                .map(Cow::Owned)
                .map_err(|e| e.into_bytes()),
        }
    }

    /// Decodes to a string, replacing invalid UTF-8 sequences with
    /// [`U+FFFD REPLACEMENT CHARACTER`][U+FFFD].
    ///
    /// [U+FFFD]: char::REPLACEMENT_CHARACTER
    #[must_use]
    pub fn decode_utf8_lossy(&self) -> Cow<'a, str> {
        match self.decode_utf8() {
            Ok(s) => s,
            Err(v) => Cow::Owned(String::from_utf8_lossy(&v).into_owned()),
        }
    }

    /// Compares the decoded bytes of two strings, ignoring ASCII case.
    #[must_use]
    pub fn cmp_ignore_ascii_case(&self, other: &PctStr<'_>) -> Ordering {
        self.bytes()
            .map(|x| x.to_ascii_lowercase())
            .cmp(other.bytes().map(|x| x.to_ascii_lowercase()))
    }

    /// Checks whether the decoded bytes of two strings are equal, ignoring ASCII case.
    #[must_use]
    pub fn eq_ignore_ascii_case(&self, other: &PctStr<'_>) -> bool {
        self.decoded_len == other.decoded_len
            && self.cmp_ignore_ascii_case(other) == Ordering::Equal
    }

    /// Hashes the decoded bytes, ignoring ASCII case.
    ///
    /// Consistent with [`eq_ignore_ascii_case`](Self::eq_ignore_ascii_case).
    pub fn hash_ignore_ascii_case<H: hash::Hasher>(&self, state: &mut H) {
        self.hash_with(state, |x| x.to_ascii_lowercase());
    }

    // Hashes through a stack block so that the result is independent of encoding.
    fn hash_with<H: hash::Hasher>(&self, state: &mut H, fold: fn(u8) -> u8) {
        let mut buf = [0; 32];
        let mut len = 0;
        for x in self.bytes() {
            buf[len] = fold(x);
            len += 1;
            if len == buf.len() {
                state.write(&buf);
                len = 0;
            }
        }
        state.write(&buf[..len]);
        state.write_usize(self.decoded_len);
    }
}

impl Default for PctStr<'_> {
    fn default() -> Self {
        PctStr::EMPTY
    }
}

impl PartialEq<PctStr<'_>> for PctStr<'_> {
    fn eq(&self, other: &PctStr<'_>) -> bool {
        if self.decoded_len != other.decoded_len {
            return false;
        }
        if self.is_unencoded() && other.is_unencoded() {
            return self.encoded == other.encoded;
        }
        self.bytes().eq(other.bytes())
    }
}

impl Eq for PctStr<'_> {}

impl PartialEq<str> for PctStr<'_> {
    fn eq(&self, other: &str) -> bool {
        self.decoded_len == other.len() && self.bytes().eq(other.bytes())
    }
}

impl PartialEq<&str> for PctStr<'_> {
    fn eq(&self, other: &&str) -> bool {
        *self == **other
    }
}

impl PartialEq<PctStr<'_>> for str {
    fn eq(&self, other: &PctStr<'_>) -> bool {
        other == self
    }
}

impl PartialOrd<PctStr<'_>> for PctStr<'_> {
    fn partial_cmp(&self, other: &PctStr<'_>) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PctStr<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.bytes().cmp(other.bytes())
    }
}

impl hash::Hash for PctStr<'_> {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.hash_with(state, |x| x);
    }
}

impl fmt::Debug for PctStr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.encoded, f)
    }
}

impl fmt::Display for PctStr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.encoded)
    }
}

/// An iterator over the decoded bytes of a [`PctStr`].
#[derive(Clone, Debug)]
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct DecodedBytes<'a> {
    source: &'a [u8],
}

impl<'a> DecodedBytes<'a> {
    fn new(source: &'a [u8]) -> Self {
        Self { source }
    }
}

impl Iterator for DecodedBytes<'_> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        match self.source {
            [b'%', hi, lo, rem @ ..] => {
                self.source = rem;
                Some(decode_octet(*hi, *lo))
            }
            [x, rem @ ..] => {
                self.source = rem;
                Some(*x)
            }
            [] => None,
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.source.len();
        (n.div_ceil(3), Some(n))
    }
}

impl FusedIterator for DecodedBytes<'_> {}

/// An iterator used to decode a [`PctStr`].
///
/// This struct is created by [`PctStr::decode`].
///
/// See the [`DecodedChunk`] type for documentation of the items yielded by this iterator.
#[derive(Clone, Debug)]
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Decode<'a> {
    source: &'a str,
}

/// An item returned by the [`Decode`] iterator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecodedChunk<'a> {
    /// An unencoded subslice.
    Unencoded(&'a str),
    /// A percent-encoded octet, decoded (for example, `"%20"` decoded as `0x20`).
    PctDecoded(u8),
}

impl<'a> Iterator for Decode<'a> {
    type Item = DecodedChunk<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.source.is_empty() {
            return None;
        }
        let i = self.source.find('%').unwrap_or(self.source.len());
        let s;
        if i == 0 {
            (s, self.source) = self.source.split_at(3);
            let x = decode_octet(s.as_bytes()[1], s.as_bytes()[2]);
            Some(DecodedChunk::PctDecoded(x))
        } else {
            (s, self.source) = self.source.split_at(i);
            Some(DecodedChunk::Unencoded(s))
        }
    }
}

impl FusedIterator for Decode<'_> {}

/// Normalizes the encoding of a validly encoded string, appending it to `buf`.
///
/// Triplets that encode a member of `unreserved` are decoded, the hexadecimal
/// digits of other triplets are uppercased, and unencoded letters are
/// lowercased if `lowercase` is set.
pub(crate) fn normalize_into(buf: &mut String, s: &str, unreserved: CharSet, lowercase: bool) {
    for chunk in (Decode { source: s }) {
        match chunk {
            DecodedChunk::Unencoded(s) if lowercase => {
                buf.extend(s.chars().map(|c| c.to_ascii_lowercase()));
            }
            DecodedChunk::Unencoded(s) => buf.push_str(s),
            DecodedChunk::PctDecoded(x) if unreserved.contains(x) => {
                let x = if lowercase { x.to_ascii_lowercase() } else { x };
                buf.push(x as char);
            }
            DecodedChunk::PctDecoded(x) => buf.push_str(encode_byte(x)),
        }
    }
}
