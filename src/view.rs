use crate::{
    authority::{host_of, AuthorityView},
    error::{ErrorKind, ParseError},
    grammar::{parse_all, Rule},
    params::Params,
    pct_enc::PctStr,
    resolve,
    rfc::{AbsoluteUriRule, Host, HostType, RelativeRefRule, UriReferenceRule, UriRule},
    scheme::{Scheme, SchemeId},
    segments::Segments,
    table::{Component, Table, FRAG, HOST, PASS, PATH, PORT, QUERY, SCHEME, USER},
    url::Url,
};
use alloc::{borrow::ToOwned, string::String, sync::Arc};
use borrow_or_share::{BorrowOrShare, Bos};
use core::{
    cmp::Ordering,
    hash::{self, Hash},
};

#[cfg(feature = "net")]
use std::net::{Ipv4Addr, Ipv6Addr};

/// A parsed URI reference: its text and the [`Table`] that indexes it.
///
/// # Variants
///
/// Two variants of `UriView` are available: `UriView<&str>` (borrowed) and
/// `UriView<String>` (owned). `UriView<&'a str>` outputs references with
/// lifetime `'a` where possible (thanks to [`borrow-or-share`](borrow_or_share)):
///
/// ```
/// use compact_uri::parse_uri;
///
/// // Keep the path after dropping the view.
/// let path = parse_uri("foo:bar")?.encoded_path();
/// assert_eq!(path, "bar");
/// # Ok::<_, compact_uri::ParseError>(())
/// ```
///
/// # Comparison
///
/// `UriView`s are compared component by component, in the order scheme, user,
/// password, host, port, path, query and fragment. The scheme and the host
/// are compared case-insensitively, and percent-encoded octets compare equal
/// to the bytes they encode. A present component always differs from an
/// absent one.
///
/// ```
/// use compact_uri::parse_uri;
///
/// assert_eq!(parse_uri("HTTP://Example.COM/%7Euser")?, parse_uri("http://example.com/~user")?);
/// assert_ne!(parse_uri("http://h/p?")?, parse_uri("http://h/p")?);
/// # Ok::<_, compact_uri::ParseError>(())
/// ```
#[derive(Clone, Copy)]
pub struct UriView<T> {
    pub(crate) text: T,
    pub(crate) table: Table,
}

/// Parses a `URI-reference`.
///
/// # Errors
///
/// Returns `Err` if the string does not match the `URI-reference` rule, or is
/// longer than [`MAX_SIZE`](crate::MAX_SIZE).
pub fn parse_uri_reference(s: &str) -> Result<UriView<&str>, ParseError> {
    UriView::parse_with(s, &UriReferenceRule)
}

/// Parses a `URI`, which must have a scheme.
///
/// # Errors
///
/// Returns `Err` if the string does not match the `URI` rule.
pub fn parse_uri(s: &str) -> Result<UriView<&str>, ParseError> {
    UriView::parse_with(s, &UriRule)
}

/// Parses a `relative-ref`, which must not have a scheme.
///
/// # Errors
///
/// Returns `Err` if the string does not match the `relative-ref` rule.
pub fn parse_relative_ref(s: &str) -> Result<UriView<&str>, ParseError> {
    UriView::parse_with(s, &RelativeRefRule)
}

/// Parses an `absolute-URI`, which has a scheme and no fragment.
///
/// # Errors
///
/// Returns `Err` if the string does not match the `absolute-URI` rule.
pub fn parse_absolute_uri(s: &str) -> Result<UriView<&str>, ParseError> {
    UriView::parse_with(s, &AbsoluteUriRule)
}

impl<'a> UriView<&'a str> {
    /// Parses a `URI-reference`.
    ///
    /// Equivalent to [`parse_uri_reference`].
    ///
    /// # Errors
    ///
    /// Returns `Err` if the string does not match the `URI-reference` rule.
    pub fn parse(s: &'a str) -> Result<Self, ParseError> {
        parse_uri_reference(s)
    }

    /// Parses a string with any rule that yields a [`Table`].
    ///
    /// # Errors
    ///
    /// Returns `Err` if the rule does not match the whole string.
    pub fn parse_with<R: Rule<'a, Value = Table>>(s: &'a str, rule: &R) -> Result<Self, ParseError> {
        let table = parse_all(s, rule)?;
        table.debug_check(s);
        Ok(UriView { text: s, table })
    }

    /// Creates a new `UriView<String>` by cloning the text of this `UriView<&str>`.
    #[must_use]
    pub fn to_owned(&self) -> UriView<String> {
        UriView {
            text: self.text.to_owned(),
            table: self.table,
        }
    }
}

impl UriView<String> {
    /// Borrows this `UriView<String>` as `UriView<&str>`.
    #[allow(clippy::should_implement_trait)]
    #[must_use]
    pub fn borrow(&self) -> UriView<&str> {
        UriView {
            text: &self.text,
            table: self.table,
        }
    }

    /// Consumes this `UriView<String>` and yields the underlying [`String`].
    #[must_use]
    pub fn into_string(self) -> String {
        self.text
    }
}

impl<'i, 'o, T: BorrowOrShare<'i, 'o, str>> UriView<T> {
    /// Returns the URI reference as a string slice.
    #[must_use]
    pub fn as_str(&'i self) -> &'o str {
        self.text.borrow_or_share()
    }

    /// Returns a component with its delimiters.
    ///
    /// ```
    /// use compact_uri::{parse_uri, Component};
    ///
    /// let uri = parse_uri("http://user:pw@host:80/p?q#f")?;
    /// assert_eq!(uri.slice(Component::User), "//user");
    /// assert_eq!(uri.slice(Component::Password), ":pw@");
    /// assert_eq!(uri.slice(Component::Port), ":80");
    /// # Ok::<_, compact_uri::ParseError>(())
    /// ```
    #[must_use]
    pub fn slice(&'i self, c: Component) -> &'o str {
        self.get(c.id())
    }

    fn get(&'i self, id: usize) -> &'o str {
        self.table.get(self.as_str(), id)
    }

    fn pct(&'i self, id: usize, skip_front: usize, skip_back: usize) -> PctStr<'o> {
        let s = self.get(id);
        PctStr::with_decoded_len(&s[skip_front..s.len() - skip_back], self.table.decoded_len_of(id))
    }

    /// Returns the [scheme], without the trailing `':'`.
    ///
    /// [scheme]: https://datatracker.ietf.org/doc/html/rfc3986#section-3.1
    #[must_use]
    pub fn scheme(&'i self) -> Option<&'o Scheme> {
        let s = self.get(SCHEME);
        s.strip_suffix(':').map(Scheme::new_validated)
    }

    /// Returns the [authority] as an [`AuthorityView`].
    ///
    /// [authority]: https://datatracker.ietf.org/doc/html/rfc3986#section-3.2
    #[must_use]
    pub fn authority(&'i self) -> Option<AuthorityView<'o>> {
        self.has_authority()
            .then(|| AuthorityView::from_table(self.as_str(), &self.table))
    }

    /// Returns the authority text, without the leading `"//"`.
    ///
    /// The result is empty if there is no authority.
    #[must_use]
    pub fn encoded_authority(&'i self) -> &'o str {
        let s = self.table.get_range(self.as_str(), USER, PATH);
        s.get(2..).unwrap_or_default()
    }

    /// Returns the encoded userinfo, without the trailing `'@'`.
    #[must_use]
    pub fn encoded_userinfo(&'i self) -> Option<PctStr<'o>> {
        if !self.has_userinfo() {
            return None;
        }
        let s = self.table.get_range(self.as_str(), USER, HOST);
        Some(PctStr::new_validated(&s[2..s.len() - 1]))
    }

    /// Returns the encoded user, which is empty if there is no userinfo.
    #[must_use]
    pub fn encoded_user(&'i self) -> PctStr<'o> {
        if self.has_authority() {
            self.pct(USER, 2, 0)
        } else {
            PctStr::EMPTY
        }
    }

    /// Returns the encoded password.
    #[must_use]
    pub fn encoded_password(&'i self) -> Option<PctStr<'o>> {
        self.has_password().then(|| self.pct(PASS, 1, 1))
    }

    /// Returns the encoded host, with the brackets of an IP literal.
    ///
    /// The result is empty if there is no authority.
    #[must_use]
    pub fn encoded_host(&'i self) -> PctStr<'o> {
        self.pct(HOST, 0, 0)
    }

    /// Returns the parsed host, if there is an authority.
    ///
    /// ```
    /// use compact_uri::{parse_uri, Host};
    ///
    /// let uri = parse_uri("http://127.0.0.1/")?;
    /// assert_eq!(uri.host(), Some(Host::Ipv4([127, 0, 0, 1])));
    /// let uri = parse_uri("http://[v7.abc]/")?;
    /// assert_eq!(uri.host(), Some(Host::IpvFuture("v7.abc")));
    /// # Ok::<_, compact_uri::ParseError>(())
    /// ```
    #[must_use]
    pub fn host(&'i self) -> Option<Host<'o>> {
        host_of(
            self.get(HOST),
            self.table.host_type(),
            self.table.host_address(),
            self.table.decoded_len_of(HOST),
        )
    }

    /// Returns the port digits, without the leading `':'`.
    #[must_use]
    pub fn port(&'i self) -> Option<&'o str> {
        self.get(PORT).strip_prefix(':')
    }

    /// Returns the encoded path.
    #[must_use]
    pub fn encoded_path(&'i self) -> PctStr<'o> {
        self.pct(PATH, 0, 0)
    }

    /// Returns an iterator over the path segments.
    ///
    /// ```
    /// use compact_uri::parse_uri_reference;
    ///
    /// let segs = |s| parse_uri_reference(s).unwrap().segments().map(|s| s.as_str()).collect::<Vec<_>>();
    /// assert_eq!(segs("/"), [""; 0]);
    /// assert_eq!(segs("/a//b/"), ["a", "", "b", ""]);
    /// assert_eq!(segs("a%2Fb/c"), ["a%2Fb", "c"]);
    /// ```
    #[must_use]
    pub fn segments(&'i self) -> Segments<'o> {
        Segments::new(self.get(PATH), self.table.segment_count())
    }

    /// Returns the encoded query, without the leading `'?'`.
    #[must_use]
    pub fn encoded_query(&'i self) -> Option<PctStr<'o>> {
        self.has_query().then(|| self.pct(QUERY, 1, 0))
    }

    /// Returns an iterator over the query parameters.
    ///
    /// The iterator is empty if there is no query, while an empty query has
    /// one parameter with an empty key and no value.
    #[must_use]
    pub fn params(&'i self) -> Params<'o> {
        match self.get(QUERY).strip_prefix('?') {
            Some(q) => Params::new(q, self.table.param_count()),
            None => Params::new("", 0),
        }
    }

    /// Returns the encoded fragment, without the leading `'#'`.
    #[must_use]
    pub fn encoded_fragment(&'i self) -> Option<PctStr<'o>> {
        self.has_fragment().then(|| self.pct(FRAG, 1, 0))
    }

    /// Borrows this view as `UriView<&str>`.
    #[must_use]
    pub fn as_view(&'i self) -> UriView<&'o str> {
        UriView {
            text: self.as_str(),
            table: self.table,
        }
    }

    /// Returns the component table.
    #[must_use]
    pub fn table(&'i self) -> &'i Table {
        &self.table
    }

    /// Returns the length of the text in bytes.
    #[must_use]
    pub fn len(&'i self) -> usize {
        self.table.total_len()
    }

    /// Checks whether the text is empty.
    #[must_use]
    pub fn is_empty(&'i self) -> bool {
        self.len() == 0
    }

    /// Checks whether a scheme is present.
    #[must_use]
    pub fn has_scheme(&'i self) -> bool {
        self.table.len_of(SCHEME) > 0
    }

    /// Returns the known-scheme id.
    #[must_use]
    pub fn scheme_id(&'i self) -> SchemeId {
        self.table.scheme_id()
    }

    /// Checks whether an authority is present.
    #[must_use]
    pub fn has_authority(&'i self) -> bool {
        self.table.len_of(USER) > 0
    }

    /// Checks whether a userinfo is present.
    #[must_use]
    pub fn has_userinfo(&'i self) -> bool {
        self.table.len_of(PASS) > 0
    }

    /// Checks whether a password is present.
    ///
    /// `"//user:@host"` has an empty password, `"//user@host"` has none.
    #[must_use]
    pub fn has_password(&'i self) -> bool {
        self.table.len_of(PASS) > 1
    }

    /// Returns the kind of the host.
    #[must_use]
    pub fn host_type(&'i self) -> HostType {
        self.table.host_type()
    }

    /// Returns the address bytes of an IP host, IPv4 in the first four.
    #[must_use]
    pub fn host_address(&'i self) -> [u8; 16] {
        self.table.host_address()
    }

    /// Checks whether a port is present, possibly empty.
    #[must_use]
    pub fn has_port(&'i self) -> bool {
        self.table.len_of(PORT) > 0
    }

    /// Returns the numeric port, if the port is non-empty and fits `u16`.
    #[must_use]
    pub fn port_number(&'i self) -> Option<u16> {
        self.table.port_number()
    }

    /// Checks whether the path starts with `'/'`.
    #[must_use]
    pub fn is_path_absolute(&'i self) -> bool {
        self.as_str()[self.table.start(PATH)..].starts_with('/')
    }

    /// Checks whether a query is present, possibly empty.
    #[must_use]
    pub fn has_query(&'i self) -> bool {
        self.table.len_of(QUERY) > 0
    }

    /// Checks whether a fragment is present, possibly empty.
    #[must_use]
    pub fn has_fragment(&'i self) -> bool {
        self.table.len_of(FRAG) > 0
    }

    /// Returns the IPv4 address of the host.
    #[cfg(feature = "net")]
    #[must_use]
    pub fn ipv4_address(&'i self) -> Option<Ipv4Addr> {
        let a = self.host_address();
        (self.host_type() == HostType::Ipv4).then(|| Ipv4Addr::new(a[0], a[1], a[2], a[3]))
    }

    /// Returns the IPv6 address of the host.
    #[cfg(feature = "net")]
    #[must_use]
    pub fn ipv6_address(&'i self) -> Option<Ipv6Addr> {
        (self.host_type() == HostType::Ipv6).then(|| Ipv6Addr::from(self.host_address()))
    }
}

impl<T: Bos<str>> UriView<T> {
    /// Resolves a URI reference against this view as the base.
    ///
    /// Equivalent to [`resolve`](crate::resolve()).
    ///
    /// # Errors
    ///
    /// Returns [`NotABase`](ErrorKind::NotABase) if this view has no scheme, or
    /// has neither an authority nor an absolute path.
    pub fn resolve<U: Bos<str>>(&self, reference: &UriView<U>) -> Result<Url, ErrorKind> {
        resolve::resolve(&self.as_view(), &reference.as_view())
    }

    /// Copies the view into a [`PersistedUri`] whose text is reference-counted.
    #[must_use]
    pub fn persist(&self) -> PersistedUri {
        PersistedUri {
            text: Arc::from(self.as_str()),
            table: self.table,
        }
    }

    fn key_cmp(&self, other: &UriView<impl Bos<str>>) -> Ordering {
        let (a, b) = (self.as_view(), other.as_view());
        match (a.scheme(), b.scheme()) {
            (Some(x), Some(y)) => cmp_ignore_case(x.as_str(), y.as_str()),
            (x, y) => x.is_some().cmp(&y.is_some()),
        }
        .then_with(|| a.user_key().cmp(&b.user_key()))
            .then_with(|| a.encoded_password().cmp(&b.encoded_password()))
            .then_with(|| match (a.host_key(), b.host_key()) {
                (Some(x), Some(y)) => x.cmp_ignore_ascii_case(&y),
                (x, y) => x.is_some().cmp(&y.is_some()),
            })
            .then_with(|| a.port().cmp(&b.port()))
            .then_with(|| a.path_key().cmp(&b.path_key()))
            .then_with(|| a.encoded_query().cmp(&b.encoded_query()))
            .then_with(|| a.encoded_fragment().cmp(&b.encoded_fragment()))
    }
}

fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    let lower = |x: u8| x.to_ascii_lowercase();
    a.bytes().map(lower).cmp(b.bytes().map(lower))
}

impl<'a> UriView<&'a str> {
    fn user_key(&self) -> Option<PctStr<'a>> {
        self.has_userinfo().then(|| self.encoded_user())
    }

    fn host_key(&self) -> Option<PctStr<'a>> {
        self.has_authority().then(|| self.encoded_host())
    }

    fn path_key(&self) -> (bool, PctStr<'a>) {
        let p = self.encoded_path().as_str();
        match p.strip_prefix('/') {
            Some(rest) => (true, PctStr::new_validated(rest)),
            None => (false, PctStr::new_validated(p)),
        }
    }
}

impl<T: Bos<str>, U: Bos<str>> PartialEq<UriView<U>> for UriView<T> {
    fn eq(&self, other: &UriView<U>) -> bool {
        self.key_cmp(other) == Ordering::Equal
    }
}

impl<T: Bos<str>> Eq for UriView<T> {}

impl<T: Bos<str>> PartialOrd for UriView<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: Bos<str>> Ord for UriView<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key_cmp(other)
    }
}

impl<T: Bos<str>> Hash for UriView<T> {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        let v = self.as_view();
        v.scheme().hash(state);
        v.user_key().hash(state);
        v.encoded_password().hash(state);
        match v.host_key() {
            Some(h) => {
                state.write_u8(1);
                h.hash_ignore_ascii_case(state);
            }
            None => state.write_u8(0),
        }
        v.port().hash(state);
        v.path_key().hash(state);
        v.encoded_query().hash(state);
        v.encoded_fragment().hash(state);
    }
}

impl<'a> TryFrom<&'a str> for UriView<&'a str> {
    type Error = ErrorKind;

    /// Parses a `URI-reference`, reporting any grammar failure as
    /// [`InvalidArgument`](ErrorKind::InvalidArgument).
    fn try_from(s: &'a str) -> Result<Self, ErrorKind> {
        parse_uri_reference(s).map_err(|e| invalid_argument(e.kind()))
    }
}

pub(crate) fn invalid_argument(kind: ErrorKind) -> ErrorKind {
    match kind {
        ErrorKind::LengthExceeded => kind,
        _ => ErrorKind::InvalidArgument,
    }
}

impl<'a> From<UriView<&'a str>> for &'a str {
    fn from(v: UriView<&'a str>) -> &'a str {
        v.text
    }
}

impl From<UriView<&str>> for UriView<String> {
    fn from(v: UriView<&str>) -> Self {
        v.to_owned()
    }
}

impl<T: Bos<str>> AsRef<str> for UriView<T> {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// A URI reference whose text is shared by reference counting.
///
/// Cloning a `PersistedUri` copies the table and bumps the count;
/// the text is never copied.
///
/// ```
/// use compact_uri::parse_uri;
///
/// let persisted = {
///     let text = String::from("https://example.com/a?b");
///     parse_uri(&text)?.persist()
/// };
/// let copy = persisted.clone();
/// assert_eq!(copy.view().encoded_path(), "/a");
/// assert_eq!(copy.as_str(), persisted.as_str());
/// # Ok::<_, compact_uri::ParseError>(())
/// ```
#[derive(Clone)]
pub struct PersistedUri {
    text: Arc<str>,
    table: Table,
}

impl PersistedUri {
    /// Returns the text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Borrows the text as a [`UriView<&str>`].
    #[must_use]
    pub fn view(&self) -> UriView<&str> {
        UriView {
            text: &self.text,
            table: self.table,
        }
    }
}

impl PartialEq for PersistedUri {
    fn eq(&self, other: &Self) -> bool {
        self.view() == other.view()
    }
}

impl Eq for PersistedUri {}

impl Hash for PersistedUri {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        Hash::hash(&self.view(), state);
    }
}
