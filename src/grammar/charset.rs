//! Character sets from RFC 3986.
//!
//! The predefined set constants in this module are documented with
//! the ABNF notation of [RFC 5234].
//!
//! [RFC 5234]: https://datatracker.ietf.org/doc/html/rfc5234

/// A set of ASCII bytes, used to bound table-driven scans.
///
/// Sets are composed at construction time with [`or`](Self::or) and
/// [`sub`](Self::sub) and are never mutated afterwards. Non-ASCII bytes
/// are never members.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CharSet(u64, u64);

impl CharSet {
    /// The empty set.
    pub const EMPTY: Self = Self(0, 0);

    /// Creates a set that contains exactly the given bytes.
    ///
    /// # Panics
    ///
    /// Panics if any of the bytes is not ASCII.
    #[must_use]
    pub const fn new(mut bytes: &[u8]) -> Self {
        let mut set = 0;
        while let [cur, rem @ ..] = bytes {
            assert!(cur.is_ascii(), "cannot add non-ASCII byte to a set");
            set |= 1u128 << *cur;
            bytes = rem;
        }
        Self(set as u64, (set >> 64) as u64)
    }

    /// Returns the union of two sets.
    #[must_use]
    pub const fn or(self, other: Self) -> Self {
        Self(self.0 | other.0, self.1 | other.1)
    }

    /// Returns the bytes in `self` but not in `other`.
    #[must_use]
    pub const fn sub(self, other: Self) -> Self {
        Self(self.0 & !other.0, self.1 & !other.1)
    }

    /// Checks whether every member of `self` is a member of `other`.
    #[must_use]
    pub const fn is_subset(self, other: Self) -> bool {
        self.0 & other.0 == self.0 && self.1 & other.1 == self.1
    }

    /// Checks whether the byte is a member of the set.
    #[inline]
    #[must_use]
    pub const fn contains(self, x: u8) -> bool {
        let bits = if x < 64 {
            self.0
        } else if x < 128 {
            self.1
        } else {
            return false;
        };
        bits & (1u64 << (x & 63)) != 0
    }

    /// Returns the index of the first byte that is not a member,
    /// or the length of `s` if there is none.
    #[inline]
    #[must_use]
    pub fn find_if_not(self, s: &[u8]) -> usize {
        s.iter().position(|&x| !self.contains(x)).unwrap_or(s.len())
    }

    /// Returns the index of the first byte that is a member,
    /// or the length of `s` if there is none.
    #[inline]
    #[must_use]
    pub fn find_if(self, s: &[u8]) -> usize {
        s.iter().position(|&x| self.contains(x)).unwrap_or(s.len())
    }

    /// Checks whether every byte of `s` is a member of the set.
    #[must_use]
    pub const fn contains_all(self, s: &[u8]) -> bool {
        let mut i = 0;
        while i < s.len() {
            if !self.contains(s[i]) {
                return false;
            }
            i += 1;
        }
        true
    }
}

const fn new(bytes: &[u8]) -> CharSet {
    CharSet::new(bytes)
}

/// `ALPHA = %x41-5A / %x61-7A`
pub const ALPHA: CharSet = new(b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz");

/// `DIGIT = %x30-39`
pub const DIGIT: CharSet = new(b"0123456789");

/// `HEXDIG = DIGIT / "A" / "B" / "C" / "D" / "E" / "F"`
pub const HEXDIG: CharSet = DIGIT.or(new(b"ABCDEFabcdef"));

/// `unreserved = ALPHA / DIGIT / "-" / "." / "_" / "~"`
pub const UNRESERVED: CharSet = ALPHA.or(DIGIT).or(new(b"-._~"));

/// `gen-delims = ":" / "/" / "?" / "#" / "[" / "]" / "@"`
pub const GEN_DELIMS: CharSet = new(b":/?#[]@");

/// `sub-delims = "!" / "$" / "&" / "'" / "(" / ")"
///             / "*" / "+" / "," / ";" / "="`
pub const SUB_DELIMS: CharSet = new(b"!$&'()*+,;=");

/// `reserved = gen-delims / sub-delims`
pub const RESERVED: CharSet = GEN_DELIMS.or(SUB_DELIMS);

/// `scheme = ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`
pub const SCHEME: CharSet = ALPHA.or(DIGIT).or(new(b"+-."));

/// `userinfo = *( unreserved / pct-encoded / sub-delims / ":" )`, unencoded part.
pub const USERINFO: CharSet = UNRESERVED.or(SUB_DELIMS).or(new(b":"));

/// The user part of userinfo: [`USERINFO`] without `":"`.
pub const USER: CharSet = USERINFO.sub(new(b":"));

/// The password part of userinfo, which may itself contain `":"`.
pub const PASSWORD: CharSet = USERINFO;

/// `reg-name = *( unreserved / pct-encoded / sub-delims )`, unencoded part.
pub const REG_NAME: CharSet = UNRESERVED.or(SUB_DELIMS);

/// `IPvFuture = "v" 1*HEXDIG "." 1*( unreserved / sub-delims / ":" )`, address part.
pub const IPV_FUTURE: CharSet = UNRESERVED.or(SUB_DELIMS).or(new(b":"));

/// `pchar = unreserved / pct-encoded / sub-delims / ":" / "@"`, unencoded part.
pub const PCHAR: CharSet = UNRESERVED.or(SUB_DELIMS).or(new(b":@"));

/// `segment-nz-nc = 1*( unreserved / pct-encoded / sub-delims / "@" )`, unencoded part.
pub const SEGMENT_NZ_NC: CharSet = PCHAR.sub(new(b":"));

/// `path = *( pchar / "/" )`, unencoded part.
pub const PATH: CharSet = PCHAR.or(new(b"/"));

/// `query = *( pchar / "/" / "?" )`, unencoded part.
pub const QUERY: CharSet = PCHAR.or(new(b"/?"));

/// `fragment = *( pchar / "/" / "?" )`, unencoded part.
pub const FRAGMENT: CharSet = QUERY;

/// The key of a query parameter: [`QUERY`] without `"&"` and `"="`.
pub const PARAM_KEY: CharSet = QUERY.sub(new(b"&="));

/// The value of a query parameter: [`QUERY`] without `"&"`.
pub const PARAM_VALUE: CharSet = QUERY.sub(new(b"&"));
