use crate::{
    error::{ErrorKind, ParseError},
    grammar::{
        charset::{self, REG_NAME, UNRESERVED, USERINFO},
        parse_all,
    },
    normalize::remove_dot_segments,
    params::ParamsMut,
    pct_enc::{self, PctStr},
    rfc::{self, AuthorityRule, Host, HostRule, HostType, PortRule, SchemeRule, UriReferenceRule, Userinfo, UserinfoRule},
    scheme::SchemeId,
    segments::SegmentsMut,
    table::{Table, END, FRAG, HOST, MAX_SIZE, PASS, PATH, PORT, QUERY, SCHEME, USER},
    view::{invalid_argument, parse_uri_reference, UriView},
};
use alloc::string::{String, ToString};
use borrow_or_share::Bos;
use core::{cmp::Ordering, hash, ops::Deref, str::FromStr};

type Result<T, E = ErrorKind> = core::result::Result<T, E>;

/// A URI reference that owns its text and is edited in place.
///
/// A `Url` dereferences to [`UriView<String>`], which provides every accessor.
/// Each setter validates its input first, then grows the buffer at most once,
/// then rewrites the text and the table. A setter that returns `Err` has
/// changed nothing.
///
/// Setters keep the text a valid URI reference: setting an authority in front
/// of a rootless path prefixes the path with `'/'`, a path that starts with
/// `"//"` and has no authority in front is prefixed with `"/."`, and the first
/// segment of a relative reference that contains a `':'` is prefixed with `"./"`.
///
/// # Examples
///
/// ```
/// use compact_uri::Url;
///
/// let mut url = Url::parse("http://example.com/a/b")?;
/// url.set_encoded_query("q=1")?.set_fragment("top")?;
/// assert_eq!(url.as_str(), "http://example.com/a/b?q=1#top");
///
/// url.remove_authority();
/// url.set_encoded_path("//x")?;
/// assert_eq!(url.as_str(), "http:/.//x?q=1#top");
///
/// url.remove_scheme().set_encoded_path("a:b")?;
/// assert_eq!(url.as_str(), "./a:b?q=1#top");
/// # Ok::<_, Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone)]
pub struct Url {
    view: UriView<String>,
}

impl Url {
    /// Creates an empty `Url`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            view: UriView {
                text: String::new(),
                table: Table::default(),
            },
        }
    }

    /// Parses a `URI-reference` into a new `Url`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the string does not match the `URI-reference` rule.
    pub fn parse(s: &str) -> Result<Self, ParseError> {
        parse_uri_reference(s).map(|v| Self::from_view(&v))
    }

    /// Copies a view into a new `Url`.
    #[must_use]
    pub fn from_view<T: Bos<str>>(v: &UriView<T>) -> Self {
        Self {
            view: v.as_view().to_owned(),
        }
    }

    pub(crate) fn from_parts(text: String, table: Table) -> Self {
        table.debug_check(&text);
        Self {
            view: UriView { text, table },
        }
    }

    /// Consumes this `Url` and yields the underlying [`String`].
    #[must_use]
    pub fn into_string(self) -> String {
        self.view.text
    }

    /// Returns the capacity of the buffer in bytes.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.view.text.capacity()
    }

    /// Makes sure the buffer holds at least `n` bytes.
    ///
    /// The buffer grows to the larger of `n` and one and a half times its
    /// capacity, but never beyond [`MAX_SIZE`].
    ///
    /// # Errors
    ///
    /// Returns [`LengthExceeded`](ErrorKind::LengthExceeded) if `n` exceeds [`MAX_SIZE`].
    pub fn reserve(&mut self, n: usize) -> Result<&mut Self> {
        if n > MAX_SIZE {
            return Err(ErrorKind::LengthExceeded);
        }
        let cap = self.capacity();
        if n > cap {
            let new_cap = cap.saturating_add(cap / 2).max(n).min(MAX_SIZE);
            trace!("growing buffer from {} to {} bytes", cap, new_cap);
            let len = self.view.text.len();
            self.view.text.reserve_exact(new_cap - len);
        }
        Ok(self)
    }

    // Buffer protocol.

    /// Replaces components `first..last` with `parts`, one per component.
    ///
    /// The caller has validated the parts and reserved room for them,
    /// and refreshes the metadata afterwards.
    fn replace(&mut self, first: usize, last: usize, parts: &[&str]) {
        debug_assert_eq!(parts.len(), last - first);
        let t = &mut self.view.table;
        let start = t.start(first);
        let end = t.start(last);
        let new_len: usize = parts.iter().map(|p| p.len()).sum();
        match parts {
            [part] => self.view.text.replace_range(start..end, part),
            _ => self.view.text.replace_range(start..end, &parts.concat()),
        }
        t.adjust(last, END, new_len as i64 - (end - start) as i64);
        for (i, part) in parts[..parts.len() - 1].iter().enumerate() {
            t.split(first + i, part.len());
        }
        t.debug_check(&self.view.text);
    }

    /// Empties components `first..last`.
    fn erase(&mut self, first: usize, last: usize) {
        let t = &mut self.view.table;
        let start = t.start(first);
        let end = t.start(last);
        self.view.text.replace_range(start..end, "");
        t.adjust(last, END, -((end - start) as i64));
        t.collapse(first, last, start);
        t.debug_check(&self.view.text);
    }

    /// Checks the final length and reserves room before replacing.
    fn try_replace(&mut self, first: usize, last: usize, parts: &[&str]) -> Result<()> {
        let t = &self.view.table;
        let kept = t.total_len() - (t.start(last) - t.start(first));
        let new_len: usize = parts.iter().map(|p| p.len()).sum();
        if new_len > MAX_SIZE - kept {
            return Err(ErrorKind::LengthExceeded);
        }
        self.reserve(kept + new_len)?;
        self.replace(first, last, parts);
        Ok(())
    }

    fn component(&self, id: usize) -> &str {
        self.view.table.get(&self.view.text, id)
    }

    fn sync_path(&mut self) {
        let p = self.component(PATH);
        let (n, nseg) = (pct_enc::decoded_len_unchecked(p.as_bytes()), rfc::count_segments(p));
        self.view.table.set_decoded(PATH, n);
        self.view.table.set_segment_count(nseg);
    }

    fn sync_query(&mut self) {
        let (n, nparam) = match self.component(QUERY).strip_prefix('?') {
            Some(q) => (pct_enc::decoded_len_unchecked(q.as_bytes()), rfc::count_params(q)),
            None => (0, 0),
        };
        self.view.table.set_decoded(QUERY, n);
        self.view.table.set_param_count(nparam);
    }

    fn sync_fragment(&mut self) {
        let n = self
            .component(FRAG)
            .strip_prefix('#')
            .map_or(0, |f| pct_enc::decoded_len_unchecked(f.as_bytes()));
        self.view.table.set_decoded(FRAG, n);
    }

    /// Writes a validated path, prefixing it if the grammar requires.
    pub(crate) fn write_path(&mut self, path: &str) -> Result<()> {
        let prefix = path_prefix(self.has_scheme(), self.has_authority(), path);
        let fixed;
        let path = if prefix.is_empty() {
            path
        } else {
            fixed = [prefix, path].concat();
            &fixed
        };
        self.try_replace(PATH, QUERY, &[path])?;
        self.sync_path();
        Ok(())
    }

    /// Cuts the path down to its leading `'/'`, if any.
    pub(crate) fn truncate_path(&mut self) {
        let keep = usize::from(self.is_path_absolute());
        let t = &mut self.view.table;
        let start = t.start(PATH) + keep;
        let end = t.start(QUERY);
        self.view.text.replace_range(start..end, "");
        t.adjust(QUERY, END, -((end - start) as i64));
        t.debug_check(&self.view.text);
        self.sync_path();
    }

    /// Writes a validated query, without the `'?'`.
    pub(crate) fn write_query(&mut self, query: &str) -> Result<()> {
        self.try_replace(QUERY, FRAG, &[&["?", query].concat()])?;
        self.sync_query();
        Ok(())
    }

    /// Writes an authority from its parts with their delimiters, the user
    /// part starting with `"//"`.
    fn write_authority(&mut self, user: &str, pass: &str, host: &str, port: &str) -> Result<()> {
        let path = self.component(PATH);
        if path.is_empty() || path.starts_with('/') {
            self.try_replace(USER, PATH, &[user, pass, host, port])
        } else {
            let fixed = ["/", path].concat();
            self.try_replace(USER, QUERY, &[user, pass, host, port, &fixed])?;
            self.sync_path();
            Ok(())
        }
    }

    // Setters.

    /// Sets the scheme.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the string does not match the `scheme` rule.
    pub fn set_scheme(&mut self, scheme: &str) -> Result<&mut Self> {
        let scheme = parse_all(scheme, &SchemeRule)?;
        self.try_replace(SCHEME, USER, &[&[scheme, ":"].concat()])?;
        self.view.table.apply_scheme(scheme);
        Ok(self)
    }

    /// Removes the scheme.
    pub fn remove_scheme(&mut self) -> &mut Self {
        if !self.has_scheme() {
            return self;
        }
        let path = self.component(PATH);
        let prefix = path_prefix(false, self.has_authority(), path);
        if prefix.is_empty() {
            self.erase(SCHEME, USER);
        } else {
            let fixed = [prefix, path].concat();
            self.replace(SCHEME, QUERY, &["", "", "", "", "", &fixed]);
            self.sync_path();
        }
        self.view.table.set_decoded(SCHEME, 0);
        self.view.table.set_scheme_id(SchemeId::None);
        self
    }

    /// Sets the authority, given without the leading `"//"`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the string does not match the `authority` rule.
    pub fn set_encoded_authority(&mut self, s: &str) -> Result<&mut Self> {
        let a = parse_all(s, &AuthorityRule)?;
        let (user, pass) = userinfo_parts(a.userinfo.as_ref());
        let port = a.port.map(|p| [":", p.raw].concat()).unwrap_or_default();
        self.write_authority(&user, &pass, a.host.raw, &port)?;
        self.view.table.apply_authority(&a);
        Ok(self)
    }

    /// Removes the authority.
    pub fn remove_authority(&mut self) -> &mut Self {
        if !self.has_authority() {
            return self;
        }
        let path = self.component(PATH);
        if path.starts_with("//") {
            let fixed = ["/.", path].concat();
            self.replace(USER, QUERY, &["", "", "", "", &fixed]);
            self.sync_path();
        } else {
            self.erase(USER, PATH);
        }
        let t = &mut self.view.table;
        for id in [USER, PASS, HOST, PORT] {
            t.set_decoded(id, 0);
        }
        t.set_host_meta(HostType::None, [0; 16]);
        t.set_port_number(None);
        self
    }

    /// Sets the userinfo, adding an empty host if there is no authority.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the string does not match the `userinfo` rule.
    pub fn set_encoded_userinfo(&mut self, s: &str) -> Result<&mut Self> {
        let ui = parse_all(s, &UserinfoRule)?;
        let (user, pass) = userinfo_parts(Some(&ui));
        if self.has_authority() {
            self.try_replace(USER, HOST, &[&user, &pass])?;
        } else {
            self.write_authority(&user, &pass, "", "")?;
            self.view.table.set_host_meta(HostType::Name, [0; 16]);
        }
        let t = &mut self.view.table;
        t.set_decoded(USER, ui.user.decoded_len());
        t.set_decoded(PASS, ui.password.map_or(0, |pw| pw.decoded_len()));
        Ok(self)
    }

    /// Sets the userinfo from decoded text.
    ///
    /// The first `':'` separates the user from the password and is kept;
    /// every other character outside the userinfo set is percent-encoded.
    ///
    /// # Errors
    ///
    /// Returns [`LengthExceeded`](ErrorKind::LengthExceeded) if the result would be too long.
    pub fn set_userinfo(&mut self, s: &str) -> Result<&mut Self> {
        let encoded = match s.split_once(':') {
            Some((user, password)) => {
                let mut buf = pct_enc::encode(user, charset::USER);
                buf.push(':');
                pct_enc::encode_into(&mut buf, password.as_bytes(), USERINFO);
                buf
            }
            None => pct_enc::encode(s, charset::USER),
        };
        self.set_encoded_userinfo(&encoded)
    }

    /// Removes the userinfo.
    pub fn remove_userinfo(&mut self) -> &mut Self {
        if self.has_userinfo() {
            self.replace(USER, HOST, &["//", ""]);
            self.view.table.set_decoded(USER, 0);
            self.view.table.set_decoded(PASS, 0);
        }
        self
    }

    /// Sets the host, adding an authority if there is none.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the string does not match the `host` rule.
    pub fn set_encoded_host(&mut self, s: &str) -> Result<&mut Self> {
        let h = parse_all(s, &HostRule)?;
        if self.has_authority() {
            self.try_replace(HOST, PORT, &[s])?;
        } else {
            self.write_authority("//", "", s, "")?;
        }
        self.view.table.apply_host(&h);
        Ok(self)
    }

    /// Sets the host from decoded text.
    ///
    /// An IP literal or an IPv4 address is set as is; anything else is
    /// percent-encoded into a registered name.
    ///
    /// # Errors
    ///
    /// Returns [`LengthExceeded`](ErrorKind::LengthExceeded) if the result would be too long.
    pub fn set_host(&mut self, s: &str) -> Result<&mut Self> {
        match parse_all(s, &HostRule) {
            Ok(h) if !matches!(h.host, Host::RegName(_)) => self.set_encoded_host(s),
            _ => self.set_encoded_host(&pct_enc::encode(s, REG_NAME)),
        }
    }

    /// Sets the port, adding an authority if there is none.
    ///
    /// # Errors
    ///
    /// Returns [`LengthExceeded`](ErrorKind::LengthExceeded) if the result would be too long.
    pub fn set_port(&mut self, port: u16) -> Result<&mut Self> {
        self.set_encoded_port(&port.to_string())
    }

    /// Sets the port digits, adding an authority if there is none.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the string has a character that is not a digit.
    pub fn set_encoded_port(&mut self, s: &str) -> Result<&mut Self> {
        let p = parse_all(s, &PortRule)?;
        let part = [":", s].concat();
        if self.has_authority() {
            self.try_replace(PORT, PATH, &[&part])?;
        } else {
            self.write_authority("//", "", "", &part)?;
            self.view.table.set_host_meta(HostType::Name, [0; 16]);
        }
        self.view.table.apply_port(Some(&p));
        Ok(self)
    }

    /// Removes the port.
    pub fn remove_port(&mut self) -> &mut Self {
        if self.has_port() {
            self.erase(PORT, PATH);
            self.view.table.apply_port(None);
        }
        self
    }

    /// Sets the path.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the string has a character outside `pchar` and `'/'`,
    /// or a malformed percent-encoded octet.
    pub fn set_encoded_path(&mut self, s: &str) -> Result<&mut Self> {
        PctStr::new_in(s, charset::PATH)?;
        self.write_path(s)?;
        Ok(self)
    }

    /// Sets the path from decoded text, where `'/'` separates segments.
    ///
    /// # Errors
    ///
    /// Returns [`LengthExceeded`](ErrorKind::LengthExceeded) if the result would be too long.
    pub fn set_path(&mut self, s: &str) -> Result<&mut Self> {
        self.write_path(&pct_enc::encode(s, charset::PATH))?;
        Ok(self)
    }

    /// Sets the query, given without the leading `'?'`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the string has a character outside the query set,
    /// or a malformed percent-encoded octet.
    pub fn set_encoded_query(&mut self, s: &str) -> Result<&mut Self> {
        PctStr::new_in(s, charset::QUERY)?;
        self.write_query(s)?;
        Ok(self)
    }

    /// Sets the query from decoded text.
    ///
    /// `'&'` and `'='` are kept as delimiters.
    ///
    /// # Errors
    ///
    /// Returns [`LengthExceeded`](ErrorKind::LengthExceeded) if the result would be too long.
    pub fn set_query(&mut self, s: &str) -> Result<&mut Self> {
        self.write_query(&pct_enc::encode(s, charset::QUERY))?;
        Ok(self)
    }

    /// Removes the query.
    pub fn remove_query(&mut self) -> &mut Self {
        if self.has_query() {
            self.erase(QUERY, FRAG);
            self.sync_query();
        }
        self
    }

    /// Sets the fragment, given without the leading `'#'`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the string has a character outside the fragment set,
    /// or a malformed percent-encoded octet.
    pub fn set_encoded_fragment(&mut self, s: &str) -> Result<&mut Self> {
        PctStr::new_in(s, charset::FRAGMENT)?;
        self.try_replace(FRAG, END, &[&["#", s].concat()])?;
        self.sync_fragment();
        Ok(self)
    }

    /// Sets the fragment from decoded text.
    ///
    /// # Errors
    ///
    /// Returns [`LengthExceeded`](ErrorKind::LengthExceeded) if the result would be too long.
    pub fn set_fragment(&mut self, s: &str) -> Result<&mut Self> {
        let mut buf = String::with_capacity(s.len() + 1);
        buf.push('#');
        pct_enc::encode_into(&mut buf, s.as_bytes(), charset::FRAGMENT);
        self.try_replace(FRAG, END, &[&buf])?;
        self.sync_fragment();
        Ok(self)
    }

    /// Removes the fragment.
    pub fn remove_fragment(&mut self) -> &mut Self {
        if self.has_fragment() {
            self.erase(FRAG, END);
            self.sync_fragment();
        }
        self
    }

    /// Empties the `Url`, keeping its buffer.
    pub fn clear(&mut self) -> &mut Self {
        self.view.text.clear();
        self.view.table = Table::default();
        self
    }

    /// Removes the dot segments of the path.
    ///
    /// See [`remove_dot_segments`](crate::remove_dot_segments) for the treatment
    /// of relative paths.
    ///
    /// # Errors
    ///
    /// Returns [`LengthExceeded`](ErrorKind::LengthExceeded) if a prefix
    /// required by the grammar makes the result too long.
    pub fn normalize_path(&mut self) -> Result<&mut Self> {
        let path = remove_dot_segments(self.component(PATH));
        self.write_path(&path)?;
        Ok(self)
    }

    /// Normalizes the `Url` per [Section 6.2.2 of RFC 3986][norm].
    ///
    /// The scheme and the host are lowercased, percent-encoded octets of
    /// unreserved characters are decoded, the hexadecimal digits of the other
    /// octets are uppercased and the dot segments of the path are removed.
    ///
    /// [norm]: https://datatracker.ietf.org/doc/html/rfc3986#section-6.2.2
    ///
    /// # Errors
    ///
    /// Returns [`LengthExceeded`](ErrorKind::LengthExceeded) if a prefix
    /// required by the grammar makes the result too long.
    ///
    /// # Examples
    ///
    /// ```
    /// use compact_uri::Url;
    ///
    /// let mut url = Url::parse("HTTP://%75ser@EXAMPLE.com/a/./b/../%7e%2f?%41#%3a")?;
    /// url.normalize()?;
    /// assert_eq!(url.as_str(), "http://user@example.com/a/~%2F?A#%3A");
    /// # Ok::<_, Box<dyn std::error::Error>>(())
    /// ```
    pub fn normalize(&mut self) -> Result<&mut Self> {
        let v = self.view.borrow();
        let mut buf = String::with_capacity(v.len());
        if let Some(scheme) = v.scheme() {
            buf.extend(scheme.as_str().chars().map(|c| c.to_ascii_lowercase()));
            buf.push(':');
        }
        if v.has_authority() {
            buf.push_str("//");
            if let Some(ui) = v.encoded_userinfo() {
                pct_enc::normalize_into(&mut buf, ui.as_str(), UNRESERVED, false);
                buf.push('@');
            }
            pct_enc::normalize_into(&mut buf, v.encoded_host().as_str(), UNRESERVED, true);
            if let Some(port) = v.port() {
                buf.push(':');
                buf.push_str(port);
            }
        }
        let mut path = String::with_capacity(v.encoded_path().len());
        pct_enc::normalize_into(&mut path, v.encoded_path().as_str(), UNRESERVED, false);
        let path = remove_dot_segments(&path);
        buf.push_str(path_prefix(v.has_scheme(), v.has_authority(), &path));
        buf.push_str(&path);
        if let Some(q) = v.encoded_query() {
            buf.push('?');
            pct_enc::normalize_into(&mut buf, q.as_str(), UNRESERVED, false);
        }
        if let Some(f) = v.encoded_fragment() {
            buf.push('#');
            pct_enc::normalize_into(&mut buf, f.as_str(), UNRESERVED, false);
        }
        let table = parse_all(&buf, &UriReferenceRule)?;
        self.view = UriView { text: buf, table };
        Ok(self)
    }

    /// Returns a proxy that edits the query parameters.
    pub fn params_mut(&mut self) -> ParamsMut<'_> {
        ParamsMut::new(self)
    }

    /// Returns a proxy that edits the path segments.
    pub fn segments_mut(&mut self) -> SegmentsMut<'_> {
        SegmentsMut::new(self)
    }
}

/// Returns the prefix that keeps a path valid in front of the given components.
pub(crate) fn path_prefix(has_scheme: bool, has_authority: bool, path: &str) -> &'static str {
    if has_authority {
        if path.is_empty() || path.starts_with('/') {
            ""
        } else {
            "/"
        }
    } else if path.starts_with("//") {
        "/."
    } else if !has_scheme && path.split('/').next().is_some_and(|seg| seg.contains(':')) {
        "./"
    } else {
        ""
    }
}

fn userinfo_parts(ui: Option<&Userinfo<'_>>) -> (String, String) {
    match ui {
        Some(ui) => {
            let pass = match ui.password {
                Some(pw) => [":", pw.as_str(), "@"].concat(),
                None => "@".into(),
            };
            (["//", ui.user.as_str()].concat(), pass)
        }
        None => ("//".into(), String::new()),
    }
}

impl Default for Url {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for Url {
    type Target = UriView<String>;

    fn deref(&self) -> &UriView<String> {
        &self.view
    }
}

impl FromStr for Url {
    type Err = ErrorKind;

    /// Parses a `URI-reference`, reporting any grammar failure as
    /// [`InvalidArgument`](ErrorKind::InvalidArgument).
    fn from_str(s: &str) -> Result<Self> {
        Url::parse(s).map_err(|e| invalid_argument(e.kind()))
    }
}

impl From<UriView<&str>> for Url {
    fn from(v: UriView<&str>) -> Self {
        Self::from_view(&v)
    }
}

impl From<Url> for String {
    fn from(url: Url) -> String {
        url.into_string()
    }
}

impl AsRef<str> for Url {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl PartialEq for Url {
    fn eq(&self, other: &Self) -> bool {
        self.view == other.view
    }
}

impl Eq for Url {}

impl PartialOrd for Url {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Url {
    fn cmp(&self, other: &Self) -> Ordering {
        self.view.cmp(&other.view)
    }
}

impl hash::Hash for Url {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.view.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Component;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    /// The table of an edited `Url` must be the one a fresh parse builds.
    fn check(u: &Url, expected: &str) {
        assert_eq!(u.as_str(), expected);
        let fresh = url(expected);
        assert_eq!(u.table(), fresh.table(), "{expected}");
    }

    #[test]
    fn set_path_shifts_only_later_components() {
        let mut u = url("http://user@host:8080/a/b?q=1#f");
        let before = *u.table();
        u.set_encoded_path("/longer/path/here").unwrap();
        check(&u, "http://user@host:8080/longer/path/here?q=1#f");

        let delta = u.len() - before.total_len();
        for c in [Component::Scheme, Component::User, Component::Password, Component::Host, Component::Port] {
            assert_eq!(u.table().offset(c), before.offset(c));
            assert_eq!(u.table().len(c), before.len(c));
        }
        for c in [Component::Query, Component::Fragment] {
            assert_eq!(u.table().offset(c), before.offset(c) + delta);
        }
        assert_eq!(u.slice(Component::Host), "host");
    }

    #[test]
    fn scheme() {
        let mut u = url("//h/p");
        u.set_scheme("HTTPS").unwrap();
        check(&u, "HTTPS://h/p");
        assert_eq!(u.scheme_id(), SchemeId::Https);
        assert_eq!(u.set_scheme("1x").unwrap_err(), ErrorKind::Syntax);
        assert_eq!(u.set_scheme("").unwrap_err(), ErrorKind::Incomplete);
        u.remove_scheme();
        check(&u, "//h/p");
        assert_eq!(u.scheme_id(), SchemeId::None);

        let mut u = url("urn:a:b");
        u.remove_scheme();
        check(&u, "./a:b");
    }

    #[test]
    fn authority() {
        let mut u = url("mailto:a/b");
        u.set_encoded_authority("u:p@[::1]:80").unwrap();
        check(&u, "mailto://u:p@[::1]:80/a/b");
        assert_eq!(u.host_type(), HostType::Ipv6);

        u.set_encoded_host("example.com").unwrap();
        check(&u, "mailto://u:p@example.com:80/a/b");
        u.set_encoded_userinfo("me").unwrap();
        check(&u, "mailto://me@example.com:80/a/b");
        u.set_port(8080).unwrap();
        check(&u, "mailto://me@example.com:8080/a/b");
        u.remove_port().remove_userinfo();
        check(&u, "mailto://example.com/a/b");
        u.remove_authority();
        check(&u, "mailto:/a/b");

        assert!(u.set_encoded_authority("a b").is_err());
        assert!(u.set_encoded_port("8x").is_err());
        assert!(u.set_encoded_host("[::1").is_err());
        check(&u, "mailto:/a/b");
    }

    #[test]
    fn authority_from_parts() {
        let mut u = url("p");
        u.set_encoded_port("1").unwrap();
        check(&u, "//:1/p");
        assert_eq!(u.host_type(), HostType::Name);

        let mut u = url("");
        u.set_encoded_userinfo("a:b").unwrap();
        check(&u, "//a:b@");

        let mut u = url("x:");
        u.set_host("ex ample").unwrap();
        check(&u, "x://ex%20ample");
        u.set_host("10.0.0.1").unwrap();
        check(&u, "x://10.0.0.1");
        assert_eq!(u.host_address()[..4], [10, 0, 0, 1]);

        let mut u = url("http://h//x");
        u.remove_authority();
        check(&u, "http:/.//x");
    }

    #[test]
    fn decoded_setters() {
        let mut u = url("http://h");
        u.set_path("/a b/c%d").unwrap();
        check(&u, "http://h/a%20b/c%25d");
        u.set_query("x=1 2&y#").unwrap();
        check(&u, "http://h/a%20b/c%25d?x=1%202&y%23");
        assert_eq!(u.params().len(), 2);
        u.set_fragment("f g").unwrap();
        check(&u, "http://h/a%20b/c%25d?x=1%202&y%23#f%20g");
        u.set_userinfo("us er:pa:ss").unwrap();
        check(&u, "http://us%20er:pa:ss@h/a%20b/c%25d?x=1%202&y%23#f%20g");
        assert_eq!(u.encoded_password().unwrap(), "pa:ss");
    }

    #[test]
    fn path_fixups() {
        let mut u = url("http://h");
        u.set_encoded_path("a/b").unwrap();
        check(&u, "http://h/a/b");

        let mut u = url("");
        u.set_encoded_path("a:b/c").unwrap();
        check(&u, "./a:b/c");
        u.set_encoded_path("//x").unwrap();
        check(&u, "/.//x");
        assert!(u.set_encoded_path("a?b").is_err());
        assert!(u.set_encoded_path("%2").is_err());
    }

    #[test]
    fn query_and_fragment() {
        let mut u = url("a:b");
        u.set_encoded_query("").unwrap();
        check(&u, "a:b?");
        assert_eq!(u.params().len(), 1);
        u.set_encoded_fragment("").unwrap();
        check(&u, "a:b?#");
        u.remove_query().remove_fragment();
        check(&u, "a:b");
        assert!(u.set_encoded_query("a#b").is_err());
        assert!(u.set_encoded_fragment("#").is_err());
    }

    #[test]
    fn normalize() {
        let mut u = url("HTTP://User@Example.COM:80/a/%2E%2e/b/./c%7E?%7e#%7E");
        u.normalize().unwrap();
        check(&u, "http://User@example.com:80/b/c~?~#~");
        let once = u.clone();
        u.normalize().unwrap();
        assert_eq!(u.as_str(), once.as_str());

        let mut u = url("a/../b:c");
        u.normalize_path().unwrap();
        check(&u, "./b:c");
        u.normalize_path().unwrap();
        check(&u, "./b:c");
    }

    #[test]
    fn growth() {
        let mut u = Url::new();
        assert_eq!(u.capacity(), 0);
        u.reserve(10).unwrap();
        assert!(u.capacity() >= 10);
        let cap = u.capacity();
        u.reserve(cap + 1).unwrap();
        assert!(u.capacity() >= cap + cap / 2);
        assert_eq!(u.reserve(MAX_SIZE + 1).unwrap_err(), ErrorKind::LengthExceeded);
        u.clear();
        check(&u, "");
    }

    #[test]
    fn from_str() {
        let u: Url = "http://h/".parse().unwrap();
        assert_eq!(u, url("HTTP://H/"));
        assert_eq!("http://h /".parse::<Url>().unwrap_err(), ErrorKind::InvalidArgument);
    }
}
