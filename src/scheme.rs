//! Scheme names and the known-scheme table.

use crate::grammar::charset;
use core::{fmt, hash};
use ref_cast::{ref_cast_custom, RefCastCustom};

/// A [scheme] component.
///
/// [scheme]: https://datatracker.ietf.org/doc/html/rfc3986#section-3.1
///
/// # Comparison
///
/// `Scheme`s are compared and hashed case-insensitively.
///
/// # Examples
///
/// ```
/// use compact_uri::{parse_uri, Scheme};
///
/// const SCHEME_HTTP: &Scheme = Scheme::new_or_panic("http");
///
/// let uri = parse_uri("HTTP://EXAMPLE.COM/")?;
/// let scheme = uri.scheme().unwrap();
///
/// // Case-insensitive comparison.
/// assert_eq!(scheme, SCHEME_HTTP);
/// // Case-sensitive comparison.
/// assert_eq!(scheme.as_str(), "HTTP");
/// # Ok::<_, compact_uri::ParseError>(())
/// ```
#[derive(RefCastCustom)]
#[repr(transparent)]
pub struct Scheme {
    inner: str,
}

impl Scheme {
    #[ref_cast_custom]
    #[inline]
    pub(crate) const fn new_validated(scheme: &str) -> &Scheme;

    /// Converts a string slice to `&Scheme`.
    ///
    /// # Panics
    ///
    /// Panics if the string is not a valid scheme name according to
    /// [Section 3.1 of RFC 3986][scheme]. For a non-panicking variant,
    /// use [`new`](Self::new).
    ///
    /// [scheme]: https://datatracker.ietf.org/doc/html/rfc3986#section-3.1
    #[inline]
    #[must_use]
    pub const fn new_or_panic(s: &str) -> &Scheme {
        match Self::new(s) {
            Some(scheme) => scheme,
            None => panic!("invalid scheme"),
        }
    }

    /// Converts a string slice to `&Scheme`, returning `None` if the conversion fails.
    #[inline]
    #[must_use]
    pub const fn new(s: &str) -> Option<&Scheme> {
        if matches!(s.as_bytes(), [first, rem @ ..]
            if first.is_ascii_alphabetic() && charset::SCHEME.contains_all(rem))
        {
            Some(Scheme::new_validated(s))
        } else {
            None
        }
    }

    /// Returns the scheme as a string slice, without the trailing `':'`.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Looks the scheme up in the known-scheme table.
    #[must_use]
    pub fn id(&self) -> SchemeId {
        SchemeId::from_name(&self.inner)
    }
}

impl PartialEq for Scheme {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.inner.eq_ignore_ascii_case(&other.inner)
    }
}

impl Eq for Scheme {}

impl hash::Hash for Scheme {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        for x in self.inner.bytes() {
            state.write_u8(x.to_ascii_lowercase());
        }
        state.write_u8(0xff);
    }
}

impl fmt::Debug for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.inner, f)
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inner)
    }
}

/// A well-known scheme.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SchemeId {
    /// No scheme is present.
    #[default]
    None,
    /// A scheme not in the table.
    Unknown,
    /// `ftp`
    Ftp,
    /// `file`
    File,
    /// `http`
    Http,
    /// `https`
    Https,
    /// `ws`
    Ws,
    /// `wss`
    Wss,
}

static KNOWN: [(&str, SchemeId, Option<u16>); 6] = [
    ("ftp", SchemeId::Ftp, Some(21)),
    ("file", SchemeId::File, None),
    ("http", SchemeId::Http, Some(80)),
    ("https", SchemeId::Https, Some(443)),
    ("ws", SchemeId::Ws, Some(80)),
    ("wss", SchemeId::Wss, Some(443)),
];

impl SchemeId {
    /// Looks up a scheme name, ignoring ASCII case.
    ///
    /// Returns `Unknown` for a name not in the table, including the empty name.
    ///
    /// # Examples
    ///
    /// ```
    /// use compact_uri::SchemeId;
    ///
    /// assert_eq!(SchemeId::from_name("HTTPS"), SchemeId::Https);
    /// assert_eq!(SchemeId::from_name("gopher"), SchemeId::Unknown);
    /// ```
    #[must_use]
    pub fn from_name(s: &str) -> SchemeId {
        KNOWN
            .iter()
            .find(|(name, ..)| name.eq_ignore_ascii_case(s))
            .map_or(SchemeId::Unknown, |&(_, id, _)| id)
    }

    /// Returns the lowercase name of a known scheme.
    #[must_use]
    pub fn as_str(self) -> Option<&'static str> {
        KNOWN
            .iter()
            .find(|(_, id, _)| *id == self)
            .map(|&(name, ..)| name)
    }

    /// Returns the default port of a known scheme, if it has one.
    ///
    /// ```
    /// use compact_uri::SchemeId;
    ///
    /// assert_eq!(SchemeId::Https.default_port(), Some(443));
    /// assert_eq!(SchemeId::File.default_port(), None);
    /// ```
    #[must_use]
    pub fn default_port(self) -> Option<u16> {
        KNOWN
            .iter()
            .find(|(_, id, _)| *id == self)
            .and_then(|&(.., port)| port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation() {
        assert!(Scheme::new("svn+ssh").is_some());
        assert!(Scheme::new("a1.-+").is_some());
        assert!(Scheme::new("").is_none());
        assert!(Scheme::new("1a").is_none());
        assert!(Scheme::new("a b").is_none());
        assert_eq!(Scheme::new_or_panic("WSS").id(), SchemeId::Wss);
    }

    #[test]
    #[should_panic = "invalid scheme"]
    fn invalid_or_panic() {
        let _ = Scheme::new_or_panic("+");
    }

    #[test]
    fn table() {
        for id in [
            SchemeId::Ftp,
            SchemeId::File,
            SchemeId::Http,
            SchemeId::Https,
            SchemeId::Ws,
            SchemeId::Wss,
        ] {
            assert_eq!(SchemeId::from_name(id.as_str().unwrap()), id);
        }
        assert_eq!(SchemeId::Unknown.as_str(), None);
        assert_eq!(SchemeId::None.default_port(), None);
        assert_eq!(SchemeId::from_name(""), SchemeId::Unknown);
    }
}
