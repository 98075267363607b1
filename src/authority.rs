use crate::{
    error::ParseError,
    grammar::parse_all,
    pct_enc::PctStr,
    rfc::{Authority, AuthorityRule, Host, HostType},
    table::{Table, HOST, PASS, PATH, PORT, USER},
};

// Offsets of the user, password, host and port, then the end.
const A_USER: usize = 0;
const A_PASS: usize = 1;
const A_HOST: usize = 2;
const A_PORT: usize = 3;
const A_END: usize = 4;

/// An [authority] component, with offsets relative to its own text.
///
/// Obtained from [`UriView::authority`](crate::UriView::authority) or by
/// [`parse_authority`]. The view copies what it needs out of the table of
/// its URI reference, so it does not borrow that table.
///
/// [authority]: https://datatracker.ietf.org/doc/html/rfc3986#section-3.2
///
/// # Examples
///
/// ```
/// use compact_uri::{parse_uri, HostType};
///
/// let uri = parse_uri("ftp://anon:secret@[::1]:2121/pub")?;
/// let auth = uri.authority().unwrap();
/// assert_eq!(auth.as_str(), "anon:secret@[::1]:2121");
/// assert_eq!(auth.encoded_user(), "anon");
/// assert_eq!(auth.encoded_password().unwrap(), "secret");
/// assert_eq!(auth.host_type(), HostType::Ipv6);
/// assert_eq!(auth.port_number(), Some(2121));
/// # Ok::<_, compact_uri::ParseError>(())
/// ```
#[derive(Clone, Copy)]
pub struct AuthorityView<'a> {
    text: &'a str,
    offset: [u32; 5],
    decoded: [u32; 3],
    host_type: HostType,
    ip_addr: [u8; 16],
    port_number: Option<u16>,
}

/// Parses an `authority`, without the leading `"//"`.
///
/// # Errors
///
/// Returns `Err` if the string does not match the `authority` rule.
///
/// ```
/// use compact_uri::{parse_authority, Host};
///
/// let auth = parse_authority("user@192.168.0.1:8080")?;
/// assert_eq!(auth.host(), Host::Ipv4([192, 168, 0, 1]));
/// assert_eq!(auth.port(), Some("8080"));
/// assert!(parse_authority("a b").is_err());
/// # Ok::<_, compact_uri::ParseError>(())
/// ```
pub fn parse_authority(s: &str) -> Result<AuthorityView<'_>, ParseError> {
    let a = parse_all(s, &AuthorityRule)?;
    Ok(AuthorityView::from_parsed(s, &a))
}

impl<'a> AuthorityView<'a> {
    fn from_parsed(text: &'a str, a: &Authority<'a>) -> Self {
        let (user, pass, pass_decoded) = match a.userinfo {
            Some(ui) => match ui.password {
                Some(pw) => (ui.user, pw.len() + 2, pw.decoded_len()),
                None => (ui.user, 1, 0),
            },
            None => (PctStr::EMPTY, 0, 0),
        };
        let port = a.port.map_or(0, |p| p.raw.len() + 1);
        let mut offset = [0; 5];
        offset[A_PASS] = user.len();
        offset[A_HOST] = offset[A_PASS] + pass;
        offset[A_PORT] = offset[A_HOST] + a.host.raw.len();
        offset[A_END] = offset[A_PORT] + port;
        debug_assert_eq!(offset[A_END], text.len());
        Self {
            text,
            offset: offset.map(|x| x as u32),
            decoded: [
                user.decoded_len() as u32,
                pass_decoded as u32,
                a.host.decoded_len() as u32,
            ],
            host_type: a.host.host.host_type(),
            ip_addr: a.host.host.address(),
            port_number: a.port.and_then(|p| p.number),
        }
    }

    /// Copies the authority out of the table of a URI reference.
    pub(crate) fn from_table(uri: &'a str, t: &Table) -> Self {
        let base = t.start(USER) + 2;
        let rebase = |id| (t.start(id) - base) as u32;
        Self {
            text: &uri[base..t.start(PATH)],
            offset: [0, rebase(PASS), rebase(HOST), rebase(PORT), rebase(PATH)],
            decoded: [
                t.decoded_len_of(USER) as u32,
                t.decoded_len_of(PASS) as u32,
                t.decoded_len_of(HOST) as u32,
            ],
            host_type: t.host_type(),
            ip_addr: t.host_address(),
            port_number: t.port_number(),
        }
    }

    fn get(&self, id: usize) -> &'a str {
        &self.text[self.offset[id] as usize..self.offset[id + 1] as usize]
    }

    /// Returns the authority as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &'a str {
        self.text
    }

    /// Checks whether a userinfo is present.
    #[must_use]
    pub fn has_userinfo(&self) -> bool {
        self.offset[A_HOST] > self.offset[A_PASS]
    }

    /// Returns the encoded userinfo, without the trailing `'@'`.
    #[must_use]
    pub fn encoded_userinfo(&self) -> Option<PctStr<'a>> {
        self.has_userinfo()
            .then(|| PctStr::new_validated(&self.text[..self.offset[A_HOST] as usize - 1]))
    }

    /// Returns the encoded user, which is empty if there is no userinfo.
    #[must_use]
    pub fn encoded_user(&self) -> PctStr<'a> {
        PctStr::with_decoded_len(self.get(A_USER), self.decoded[A_USER] as usize)
    }

    /// Checks whether a password is present.
    #[must_use]
    pub fn has_password(&self) -> bool {
        self.offset[A_HOST] - self.offset[A_PASS] > 1
    }

    /// Returns the encoded password.
    #[must_use]
    pub fn encoded_password(&self) -> Option<PctStr<'a>> {
        let s = self.get(A_PASS);
        self.has_password()
            .then(|| PctStr::with_decoded_len(&s[1..s.len() - 1], self.decoded[A_PASS] as usize))
    }

    /// Returns the encoded host, with the brackets of an IP literal.
    #[must_use]
    pub fn encoded_host(&self) -> PctStr<'a> {
        PctStr::with_decoded_len(self.get(A_HOST), self.decoded[A_HOST] as usize)
    }

    /// Returns the parsed host.
    #[must_use]
    pub fn host(&self) -> Host<'a> {
        match host_of(self.get(A_HOST), self.host_type, self.ip_addr, self.decoded[A_HOST] as usize) {
            Some(host) => host,
            None => Host::RegName(PctStr::EMPTY),
        }
    }

    /// Returns the kind of the host.
    #[must_use]
    pub fn host_type(&self) -> HostType {
        self.host_type
    }

    /// Returns the address bytes of an IP host, IPv4 in the first four.
    #[must_use]
    pub fn host_address(&self) -> [u8; 16] {
        self.ip_addr
    }

    /// Checks whether a port is present, possibly empty.
    #[must_use]
    pub fn has_port(&self) -> bool {
        self.offset[A_END] > self.offset[A_PORT]
    }

    /// Returns the port digits, without the leading `':'`.
    #[must_use]
    pub fn port(&self) -> Option<&'a str> {
        self.get(A_PORT).strip_prefix(':')
    }

    /// Returns the numeric port, if the port is non-empty and fits `u16`.
    #[must_use]
    pub fn port_number(&self) -> Option<u16> {
        self.port_number
    }
}

/// Rebuilds a host from its text and the metadata of a table.
pub(crate) fn host_of(
    raw: &str,
    host_type: HostType,
    addr: [u8; 16],
    decoded_len: usize,
) -> Option<Host<'_>> {
    Some(match host_type {
        HostType::None => return None,
        HostType::Ipv4 => Host::Ipv4([addr[0], addr[1], addr[2], addr[3]]),
        HostType::Ipv6 => Host::Ipv6(addr),
        HostType::IpvFuture => Host::IpvFuture(&raw[1..raw.len() - 1]),
        HostType::Name => Host::RegName(PctStr::with_decoded_len(raw, decoded_len)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_uri;

    #[test]
    fn rebased_matches_parsed() {
        for s in [
            "http://user:pw@host:80/p",
            "http://@h",
            "http://u:@h:",
            "http://%41b@[v1.x]:99999/",
            "http://",
        ] {
            let uri = parse_uri(s).unwrap();
            let a = uri.authority().unwrap();
            let b = parse_authority(uri.encoded_authority()).unwrap();
            assert_eq!(a.offset, b.offset, "{s}");
            assert_eq!(a.decoded, b.decoded, "{s}");
            assert_eq!(a.host(), b.host());
            assert_eq!(a.port_number(), b.port_number());
        }
    }

    #[test]
    fn parts() {
        let a = parse_authority("u%20x:p%40@Example.COM:8080").unwrap();
        assert_eq!(a.encoded_userinfo().unwrap(), "u x:p@");
        assert_eq!(a.encoded_user().decoded_len(), 3);
        assert_eq!(a.encoded_password().unwrap(), "p@");
        assert_eq!(a.encoded_host(), "Example.COM");
        assert_eq!(a.port_number(), Some(8080));

        let a = parse_authority("h:99999").unwrap();
        assert!(a.has_port());
        assert_eq!(a.port(), Some("99999"));
        assert_eq!(a.port_number(), None);
        assert!(!a.has_userinfo() && !a.has_password());

        let a = parse_authority("").unwrap();
        assert_eq!(a.host(), Host::RegName(PctStr::EMPTY));
        assert_eq!(a.host_type(), HostType::Name);
    }
}
