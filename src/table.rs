//! The component table.

use crate::{
    pct_enc::{self, PctStr},
    rfc::{Authority, HostType, ParsedHost, Path, Port, Query},
    scheme::SchemeId,
};

/// The maximum length in bytes of a URI reference.
pub const MAX_SIZE: usize = u32::MAX as usize - 1;

type Pos = u32;

/// A component of a URI reference.
///
/// Each component owns its delimiters: the scheme its trailing `':'`,
/// the user the leading `"//"`, the password its leading `':'` and the
/// trailing `'@'` of the userinfo, the port its `':'`, the query its `'?'`
/// and the fragment its `'#'`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Component {
    /// `scheme ":"`
    Scheme,
    /// `"//" user`
    User,
    /// `[ ":" password ] "@"`
    Password,
    /// `host`
    Host,
    /// `":" port`
    Port,
    /// `path`
    Path,
    /// `"?" query`
    Query,
    /// `"#" fragment`
    Fragment,
}

impl Component {
    /// All components in order.
    pub const ALL: [Component; 8] = [
        Component::Scheme,
        Component::User,
        Component::Password,
        Component::Host,
        Component::Port,
        Component::Path,
        Component::Query,
        Component::Fragment,
    ];

    pub(crate) const fn id(self) -> usize {
        self as usize
    }
}

pub(crate) const SCHEME: usize = Component::Scheme.id();
pub(crate) const USER: usize = Component::User.id();
pub(crate) const PASS: usize = Component::Password.id();
pub(crate) const HOST: usize = Component::Host.id();
pub(crate) const PORT: usize = Component::Port.id();
pub(crate) const PATH: usize = Component::Path.id();
pub(crate) const QUERY: usize = Component::Query.id();
pub(crate) const FRAG: usize = Component::Fragment.id();
pub(crate) const END: usize = 8;

/// Offsets of the components of a URI reference within its text,
/// plus per-component metadata.
///
/// Component `c` spans `offset(c)..offset(c) + len(c)`; the offsets are
/// non-decreasing and the first one is zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Table {
    offset: [Pos; 9],
    decoded: [Pos; 8],
    nseg: Pos,
    nparam: Pos,
    ip_addr: [u8; 16],
    port_number: Option<u16>,
    host_type: HostType,
    scheme_id: SchemeId,
}

impl Table {
    /// Returns the start of a component.
    #[must_use]
    pub fn offset(&self, c: Component) -> usize {
        self.offset[c.id()] as usize
    }

    /// Returns the length of a component, delimiters included.
    #[must_use]
    pub fn len(&self, c: Component) -> usize {
        self.len_of(c.id())
    }

    /// Returns the decoded length of a component, delimiters excluded.
    #[must_use]
    pub fn decoded_len(&self, c: Component) -> usize {
        self.decoded[c.id()] as usize
    }

    /// Returns the length of the whole text.
    #[must_use]
    pub fn total_len(&self) -> usize {
        self.offset[END] as usize
    }

    /// Returns the number of path segments.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.nseg as usize
    }

    /// Returns the number of query parameters, zero if there is no query.
    #[must_use]
    pub fn param_count(&self) -> usize {
        self.nparam as usize
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

    /// Returns the numeric port.
    #[must_use]
    pub fn port_number(&self) -> Option<u16> {
        self.port_number
    }

    /// Returns the known-scheme id.
    #[must_use]
    pub fn scheme_id(&self) -> SchemeId {
        self.scheme_id
    }

    pub(crate) fn start(&self, id: usize) -> usize {
        self.offset[id] as usize
    }

    pub(crate) fn decoded_len_of(&self, id: usize) -> usize {
        self.decoded[id] as usize
    }

    pub(crate) fn len_of(&self, id: usize) -> usize {
        (self.offset[id + 1] - self.offset[id]) as usize
    }

    pub(crate) fn get<'s>(&self, s: &'s str, id: usize) -> &'s str {
        &s[self.start(id)..self.start(id + 1)]
    }

    /// Returns the text of components `first..last`.
    pub(crate) fn get_range<'s>(&self, s: &'s str, first: usize, last: usize) -> &'s str {
        &s[self.start(first)..self.start(last)]
    }

    /// Sets the length of a component, shifting every later component.
    pub(crate) fn set_size(&mut self, id: usize, n: usize) {
        let delta = n as i64 - self.len_of(id) as i64;
        self.adjust(id + 1, END, delta);
    }

    /// Sets the length of a component without moving later components.
    pub(crate) fn split(&mut self, id: usize, n: usize) {
        debug_assert!(self.offset[id] as usize + n <= self.offset[END] as usize);
        self.offset[id + 1] = self.offset[id] + n as Pos;
    }

    /// Shifts the offsets `first..=last` by `delta`.
    pub(crate) fn adjust(&mut self, first: usize, last: usize, delta: i64) {
        for off in &mut self.offset[first..=last] {
            *off = (*off as i64 + delta) as Pos;
        }
    }

    /// Moves the starts of the components strictly between `first` and `last` to `n`.
    pub(crate) fn collapse(&mut self, first: usize, last: usize, n: usize) {
        for off in &mut self.offset[first + 1..last] {
            *off = n as Pos;
        }
    }

    pub(crate) fn set_decoded(&mut self, id: usize, n: usize) {
        self.decoded[id] = n as Pos;
    }

    pub(crate) fn set_segment_count(&mut self, n: usize) {
        self.nseg = n as Pos;
    }

    pub(crate) fn set_param_count(&mut self, n: usize) {
        self.nparam = n as Pos;
    }

    pub(crate) fn set_host_meta(&mut self, host_type: HostType, ip_addr: [u8; 16]) {
        self.host_type = host_type;
        self.ip_addr = ip_addr;
    }

    pub(crate) fn set_port_number(&mut self, n: Option<u16>) {
        self.port_number = n;
    }

    pub(crate) fn set_scheme_id(&mut self, id: SchemeId) {
        self.scheme_id = id;
    }

    /// Checks the structural invariants.
    pub(crate) fn debug_check(&self, s: &str) {
        debug_assert_eq!(self.offset[0], 0);
        debug_assert!(self.offset.windows(2).all(|w| w[0] <= w[1]));
        debug_assert_eq!(self.offset[END] as usize, s.len());
    }

    // The apply protocol: a table under construction from parsed parts is
    // extended one component at a time, in order.

    pub(crate) fn apply_scheme(&mut self, scheme: &str) {
        self.set_size(SCHEME, scheme.len() + 1);
        self.set_decoded(SCHEME, scheme.len());
        self.scheme_id = SchemeId::from_name(scheme);
    }

    pub(crate) fn apply_authority(&mut self, a: &Authority<'_>) {
        match a.userinfo {
            Some(ui) => {
                self.set_size(USER, ui.user.len() + 2);
                self.set_decoded(USER, ui.user.decoded_len());
                match ui.password {
                    Some(pw) => {
                        self.set_size(PASS, pw.len() + 2);
                        self.set_decoded(PASS, pw.decoded_len());
                    }
                    None => {
                        self.set_size(PASS, 1);
                        self.set_decoded(PASS, 0);
                    }
                }
            }
            None => {
                self.set_size(USER, 2);
                self.set_decoded(USER, 0);
                self.set_size(PASS, 0);
                self.set_decoded(PASS, 0);
            }
        }
        self.apply_host(&a.host);
        self.apply_port(a.port.as_ref());
    }

    pub(crate) fn apply_host(&mut self, h: &ParsedHost<'_>) {
        self.set_size(HOST, h.raw.len());
        self.set_decoded(HOST, h.decoded_len());
        self.set_host_meta(h.host.host_type(), h.host.address());
    }

    pub(crate) fn apply_port(&mut self, p: Option<&Port<'_>>) {
        match p {
            Some(p) => {
                self.set_size(PORT, p.raw.len() + 1);
                self.set_decoded(PORT, p.raw.len());
                self.port_number = p.number;
            }
            None => {
                self.set_size(PORT, 0);
                self.set_decoded(PORT, 0);
                self.port_number = None;
            }
        }
    }

    pub(crate) fn apply_path(&mut self, p: &Path<'_>) {
        let s = p.as_str();
        self.set_size(PATH, s.len());
        self.set_decoded(PATH, pct_enc::decoded_len_unchecked(s.as_bytes()));
        self.nseg = p.len() as Pos;
    }

    pub(crate) fn apply_query(&mut self, q: Option<&Query<'_>>) {
        match q {
            Some(q) => {
                let s = q.as_str();
                self.set_size(QUERY, s.len() + 1);
                self.set_decoded(QUERY, pct_enc::decoded_len_unchecked(s.as_bytes()));
                self.nparam = q.len() as Pos;
            }
            None => {
                self.set_size(QUERY, 0);
                self.set_decoded(QUERY, 0);
                self.nparam = 0;
            }
        }
    }

    pub(crate) fn apply_fragment(&mut self, f: Option<PctStr<'_>>) {
        match f {
            Some(f) => {
                self.set_size(FRAG, f.len() + 1);
                self.set_decoded(FRAG, f.decoded_len());
            }
            None => {
                self.set_size(FRAG, 0);
                self.set_decoded(FRAG, 0);
            }
        }
    }
}
